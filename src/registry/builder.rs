//=========================================================================
// Scene Registry Builder
//=========================================================================

//=== External Dependencies ===============================================

use log::info;

//=== Internal Dependencies ===============================================

use super::{SceneModuleResolver, SceneRegistry};
use crate::core::error::Result;
use crate::core::scene::{Scene, SceneList, DEFAULT_SCENE_NAME, DEFAULT_TRANSITION_LIMIT};

//=== SceneRegistryBuilder ================================================

/// Builder for configuring and constructing a [`SceneRegistry`].
///
/// # Default Values
///
/// - **Default scene name**: `"Untitled"`
/// - **Transition limit**: 64 deferred transitions per activation
/// - **Resolver**: none (path lookups return `None`)
///
/// # Examples
///
/// ```rust
/// use aetheric_scenes::prelude::*;
///
/// let registry = SceneRegistryBuilder::new()
///     .with_default_scene_name("Boot")
///     .with_transition_limit(16)
///     .with_resolver(|path: &str| {
///         (path == "scenes/menu.scn").then(|| vec!["MenuScene".to_string()])
///     })
///     .build();
///
/// assert_eq!(registry.scenes().active().name(), "Boot");
/// ```
pub struct SceneRegistryBuilder {
    default_scene_name: String,
    transition_limit: usize,
    resolver: Option<Box<dyn SceneModuleResolver>>,
}

impl SceneRegistryBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            default_scene_name: DEFAULT_SCENE_NAME.to_string(),
            transition_limit: DEFAULT_TRANSITION_LIMIT,
            resolver: None,
        }
    }

    /// Sets the name of the scene a fresh registry starts with.
    ///
    /// Default: `"Untitled"`
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty or only whitespace.
    pub fn with_default_scene_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        assert!(!name.trim().is_empty(), "Default scene name must not be empty");
        self.default_scene_name = name;
        self
    }

    /// Sets how many deferred transitions one activation may trigger.
    ///
    /// Handlers that keep requesting activations from inside their own
    /// notifications are cut off after this many.
    ///
    /// Default: 64
    ///
    /// # Panics
    ///
    /// Panics if `limit == 0`.
    pub fn with_transition_limit(mut self, limit: usize) -> Self {
        assert!(limit > 0, "Transition limit must be positive");
        self.transition_limit = limit;
        self
    }

    /// Sets the resolver used by [`SceneRegistry::scene_by_path`].
    pub fn with_resolver<R>(mut self, resolver: R) -> Self
    where
        R: SceneModuleResolver + 'static,
    {
        self.resolver = Some(Box::new(resolver));
        self
    }

    /// Builds a registry holding a single default scene.
    pub fn build(self) -> SceneRegistry {
        info!(
            "Building scene registry (default scene: '{}', transition limit: {})",
            self.default_scene_name, self.transition_limit
        );

        let scenes = SceneList::with_default_name(&self.default_scene_name);
        self.finish(scenes)
    }

    /// Builds a registry from scenes in build order.
    ///
    /// # Errors
    ///
    /// Fails like [`SceneList::from_scenes`] unless exactly one scene is active.
    pub fn build_with(self, scenes: Vec<Scene>) -> Result<SceneRegistry> {
        let scenes = SceneList::from_scenes(scenes)?;

        info!(
            "Building scene registry with {} scenes (transition limit: {})",
            scenes.len(),
            self.transition_limit
        );

        Ok(self.finish(scenes))
    }

    fn finish(self, mut scenes: SceneList) -> SceneRegistry {
        scenes.set_transition_limit(self.transition_limit);
        SceneRegistry {
            scenes,
            resolver: self.resolver,
        }
    }
}

impl Default for SceneRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
