//=========================================================================
// Scene System
//=========================================================================
//
// Ordered scene list with exactly one active scene.
//
// Architecture:
//   SceneList
//     ├─ scenes: Vec<Scene>          (position == build index)
//     ├─ active: usize               (position of the active member)
//     └─ subscribers: Vec<Sender<SceneEvent>>
//
// Flow:
//   set_active() → Unloaded(outgoing) → Loaded(incoming)
//                → ActiveChanged(outgoing, incoming) → queued transitions
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

//=== Module Declarations =================================================

mod event;
mod game_object;
mod scene_list;
mod transition_queue;

//=== Public API ==========================================================

pub use event::{SceneContext, SceneEvent, SceneInfo};
pub use game_object::GameObject;
pub use scene_list::{SceneList, DEFAULT_SCENE_NAME, DEFAULT_TRANSITION_LIMIT};
pub use transition_queue::{SceneTransition, TransitionQueue};

//=== Scene Id ============================================================

static NEXT_SCENE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique scene identity.
///
/// Allocated once when a [`Scene`] is constructed. Scenes are not `Clone`,
/// so an id names exactly one scene for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(u64);

impl SceneId {
    fn next() -> Self {
        Self(NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scene#{}", self.0)
    }
}

//=== Scene Selector ======================================================

/// Identifies a scene for loading: by name, by build index, or by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SceneSelector {
    /// First scene with this name.
    Name(String),

    /// Scene at this build index.
    Index(usize),

    /// Scene with this identity.
    Id(SceneId),
}

impl From<&str> for SceneSelector {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for SceneSelector {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<usize> for SceneSelector {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<SceneId> for SceneSelector {
    fn from(id: SceneId) -> Self {
        Self::Id(id)
    }
}

//=== Scene ===============================================================

/// Kind assigned to scenes that do not declare one.
pub const DEFAULT_SCENE_KIND: &str = "Scene";

/// A named container of game objects.
///
/// The active flag and build index belong to the owning [`SceneList`];
/// they are readable here but only the list changes them. A scene that is
/// not in any list has no build index.
pub struct Scene {
    id: SceneId,
    name: String,
    kind: String,
    build_index: Option<usize>,
    is_active: bool,
    game_objects: Vec<Box<dyn GameObject>>,
}

impl Scene {
    //--- Construction -----------------------------------------------------

    /// Creates a scene with exactly the given name.
    ///
    /// Use [`SceneList::create_scene`] to get a name that does not clash
    /// with scenes already in a list.
    pub fn new(name: impl Into<String>, is_active: bool) -> Self {
        Self {
            id: SceneId::next(),
            name: name.into(),
            kind: DEFAULT_SCENE_KIND.to_string(),
            build_index: None,
            is_active,
            game_objects: Vec::new(),
        }
    }

    /// Sets the kind used by path-based lookups.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Adds a game object, builder style.
    pub fn with_game_object<G: GameObject + 'static>(mut self, object: G) -> Self {
        self.add_game_object(object);
        self
    }

    //--- Accessors --------------------------------------------------------

    pub fn id(&self) -> SceneId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Position in the owning list, `None` while detached.
    pub fn build_index(&self) -> Option<usize> {
        self.build_index
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Snapshot of this scene's identity for notifications.
    pub fn info(&self) -> SceneInfo {
        SceneInfo {
            id: self.id,
            name: self.name.clone(),
            build_index: self.build_index,
        }
    }

    //--- Game Objects -----------------------------------------------------

    pub fn add_game_object<G: GameObject + 'static>(&mut self, object: G) {
        self.game_objects.push(Box::new(object));
    }

    pub fn game_objects(&self) -> &[Box<dyn GameObject>] {
        &self.game_objects
    }

    pub fn game_objects_mut(&mut self) -> &mut Vec<Box<dyn GameObject>> {
        &mut self.game_objects
    }

    /// Game objects currently flagged active.
    pub fn active_game_objects(&self) -> impl Iterator<Item = &Box<dyn GameObject>> + '_ {
        self.game_objects.iter().filter(|object| object.is_active())
    }

    //--- Internal Helpers -------------------------------------------------

    /// Delivers `event` to every active game object.
    ///
    /// Activity is checked per object at delivery time, so a handler that
    /// deactivates a later sibling keeps it from receiving the event.
    pub(crate) fn broadcast(&mut self, event: &SceneEvent, context: &mut SceneContext<'_>) {
        for object in self.game_objects.iter_mut() {
            if object.is_active() {
                object.receive(event, context);
            }
        }
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("build_index", &self.build_index)
            .field("is_active", &self.is_active)
            .field("game_objects", &self.game_objects.len())
            .finish()
    }
}

//=== Tests ===============================================================
