//=========================================================================
// Scene Registry
//=========================================================================
//
// Owns the game's scene list and answers lookups by name, path, build
// index or id.
//
// Architecture:
// ```text
//     SceneRegistryBuilder ──build()──> SceneRegistry
//                                          ├─ scenes: SceneList
//                                          └─ resolver: Option<Box<dyn SceneModuleResolver>>
// ```
//
// One registry exists per running game. It is an ordinary value held by
// whatever owns the game loop; dropping it tears the scenes down.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::Receiver;
use log::{debug, warn};

//=== Module Declarations =================================================

mod builder;
mod resolver;

//=== Public API ==========================================================

pub use builder::SceneRegistryBuilder;
pub use resolver::SceneModuleResolver;

//=== Internal Dependencies ===============================================

use crate::core::scene::{Scene, SceneEvent, SceneList, SceneSelector};

//=== SceneRegistry =======================================================

/// The game's scene list plus lookup and load conveniences.
///
/// Lookups and loads that find nothing return `None`; they never fail.
///
/// # Examples
///
/// ```rust
/// use aetheric_scenes::prelude::*;
///
/// let mut registry = SceneRegistry::new();
/// let menu = registry.create_scene("Menu", false);
/// registry.scenes_mut().append(menu)?;
///
/// assert_eq!(registry.load_scene("Menu").map(Scene::name), Some("Menu"));
/// assert_eq!(registry.load_scene(0usize).map(Scene::name), Some("Untitled"));
/// assert!(registry.load_scene(7usize).is_none());
/// # Ok::<(), SceneError>(())
/// ```
pub struct SceneRegistry {
    scenes: SceneList,
    resolver: Option<Box<dyn SceneModuleResolver>>,
}

impl SceneRegistry {
    //--- Construction -----------------------------------------------------

    /// Creates a registry with default settings and one `"Untitled"` scene.
    pub fn new() -> Self {
        SceneRegistryBuilder::new().build()
    }

    pub fn builder() -> SceneRegistryBuilder {
        SceneRegistryBuilder::new()
    }

    /// Consumes the registry and hands back its scene list.
    pub fn into_scenes(self) -> SceneList {
        self.scenes
    }

    /// Creates a detached scene named after the first free variant of `name`.
    ///
    /// Names are checked against the scenes registered right now.
    pub fn create_scene(&self, name: &str, is_active: bool) -> Scene {
        self.scenes.create_scene(name, is_active)
    }

    //--- Access -----------------------------------------------------------

    pub fn scenes(&self) -> &SceneList {
        &self.scenes
    }

    pub fn scenes_mut(&mut self) -> &mut SceneList {
        &mut self.scenes
    }

    pub fn active_scene(&self) -> &Scene {
        self.scenes.active()
    }

    /// Subscribes to lifecycle notifications; see [`SceneList::subscribe`].
    pub fn subscribe(&mut self) -> Receiver<SceneEvent> {
        self.scenes.subscribe()
    }

    //--- Lookup -----------------------------------------------------------

    /// First scene with the given name.
    pub fn scene_by_name(&self, name: &str) -> Option<&Scene> {
        self.scenes.find_by_name(name)
    }

    /// Scene whose kind is declared by the module at `path`.
    ///
    /// The resolver must report exactly one scene kind for the module.
    /// Modules declaring none or several kinds yield `None`, as do paths
    /// the resolver cannot load and registries without a resolver.
    pub fn scene_by_path(&self, path: &str) -> Option<&Scene> {
        let Some(resolver) = self.resolver.as_deref() else {
            warn!("No scene module resolver configured, cannot look up '{}'", path);
            return None;
        };

        let Some(kinds) = resolver.resolve(path) else {
            debug!("Scene module '{}' could not be resolved", path);
            return None;
        };

        match kinds.as_slice() {
            [kind] => self.scenes.find_by_kind(kind),
            [] => {
                debug!("Scene module '{}' declares no scene kinds", path);
                None
            }
            _ => {
                warn!(
                    "Scene module '{}' declares {} scene kinds ({:?}), lookup is ambiguous",
                    path,
                    kinds.len(),
                    kinds
                );
                None
            }
        }
    }

    //--- Loading ----------------------------------------------------------

    /// Activates the first scene with the given name.
    pub fn load_scene_by_name(&mut self, name: &str) -> Option<&Scene> {
        self.load_scene(SceneSelector::Name(name.to_string()))
    }

    /// Activates the scene at `index`; `None` if out of range.
    pub fn load_scene_by_build_index(&mut self, index: usize) -> Option<&Scene> {
        self.load_scene(SceneSelector::Index(index))
    }

    /// Activates the scene a name, build index or id designates.
    pub fn load_scene(&mut self, selector: impl Into<SceneSelector>) -> Option<&Scene> {
        let selector = selector.into();
        debug!("Loading scene {:?}", selector);

        let loaded = self.scenes.activate_selected(&selector);
        if loaded.is_none() {
            debug!("No scene matches {:?}", selector);
        }
        loaded
    }
}

impl Default for SceneRegistry {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
