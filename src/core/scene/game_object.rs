//=========================================================================
// Game Object
//=========================================================================
//
// Notification target owned by a scene.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{SceneContext, SceneEvent, SceneInfo};

//=== GameObject Trait ====================================================

/// Receives scene lifecycle notifications.
///
/// Every handler has an empty default, so an object only implements the
/// notifications it cares about. Objects whose [`is_active`](Self::is_active)
/// returns `false` are skipped during delivery.
///
/// ```rust
/// # use aetheric_scenes::prelude::*;
/// struct Music;
///
/// impl GameObject for Music {
///     fn on_scene_loaded(&mut self, scene: &SceneInfo, _context: &mut SceneContext<'_>) {
///         println!("now playing the {} theme", scene.name);
///     }
/// }
/// ```
pub trait GameObject {
    /// Whether this object currently takes part in notifications.
    fn is_active(&self) -> bool {
        true
    }

    /// Called on the outgoing scene's objects when it loses the active flag.
    fn on_scene_unloaded(&mut self, _scene: &SceneInfo, _context: &mut SceneContext<'_>) {}

    /// Called on the incoming scene's objects once it is active.
    fn on_scene_loaded(&mut self, _scene: &SceneInfo, _context: &mut SceneContext<'_>) {}

    /// Called on the incoming scene's objects after loading completes.
    fn on_active_scene_changed(
        &mut self,
        _previous: &SceneInfo,
        _current: &SceneInfo,
        _context: &mut SceneContext<'_>,
    ) {
    }

    /// Routes `event` to the matching handler.
    fn receive(&mut self, event: &SceneEvent, context: &mut SceneContext<'_>) {
        match event {
            SceneEvent::Unloaded { scene } => self.on_scene_unloaded(scene, context),
            SceneEvent::Loaded { scene } => self.on_scene_loaded(scene, context),
            SceneEvent::ActiveChanged { previous, current } => {
                self.on_active_scene_changed(previous, current, context)
            }
        }
    }
}
