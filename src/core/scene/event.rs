//=========================================================================
// Scene Events
//=========================================================================
//
// Payloads of the activation protocol and the context handlers see while
// the protocol runs.
//
// Order per activation:
//   Unloaded(outgoing) → Loaded(incoming) → ActiveChanged(outgoing, incoming)
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{SceneId, SceneTransition, TransitionQueue};

//=== SceneInfo ===========================================================

/// Identity of a scene at the moment a notification was produced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SceneInfo {
    pub id: SceneId,
    pub name: String,
    pub build_index: Option<usize>,
}

//=== SceneEvent ==========================================================

/// Lifecycle notification fired by the activation protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneEvent {
    /// The outgoing scene lost its active flag.
    Unloaded { scene: SceneInfo },

    /// The incoming scene gained its active flag.
    Loaded { scene: SceneInfo },

    /// The active reference moved from `previous` to `current`.
    ///
    /// `previous == current` when a scene is reloaded.
    ActiveChanged {
        previous: SceneInfo,
        current: SceneInfo,
    },
}

impl SceneEvent {
    /// Handler name this event is delivered under.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unloaded { .. } => "scene_unloaded",
            Self::Loaded { .. } => "scene_loaded",
            Self::ActiveChanged { .. } => "active_scene_changed",
        }
    }
}

//=== SceneContext ========================================================

/// Read-only view of the scene list handed to game object handlers.
///
/// The snapshot is taken after the active flag has moved, so it always
/// shows exactly one active scene and dense build indices. Handlers that
/// want to change the list queue a [`SceneTransition`]; queued transitions
/// are applied after the current activation has finished notifying.
///
/// Requests are not re-entrant. An activation requested from an unload
/// handler does not run before the current scene's load handlers: the
/// current activation delivers all three notifications first, then the
/// queued transitions run in request order, each with its own full
/// unload, load and changed sequence.
pub struct SceneContext<'a> {
    pub(crate) scenes: &'a [SceneInfo],
    pub(crate) active: usize,
    pub(crate) transitions: &'a mut TransitionQueue,
}

impl SceneContext<'_> {
    /// All scenes in build order.
    pub fn scenes(&self) -> &[SceneInfo] {
        self.scenes
    }

    /// The scene that is active for this notification.
    pub fn active_scene(&self) -> &SceneInfo {
        &self.scenes[self.active]
    }

    pub fn scene_by_name(&self, name: &str) -> Option<&SceneInfo> {
        self.scenes.iter().find(|scene| scene.name == name)
    }

    /// Queues a transition to run once the current activation completes.
    ///
    /// The list is unchanged when this returns; see [`SceneContext`].
    pub fn request(&mut self, transition: SceneTransition) {
        self.transitions.push(transition);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
