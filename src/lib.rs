//=========================================================================
// Aetheric Scenes — Library Root
//
// Scene registry for the Aetheric Engine.
//
// Responsibilities:
// - Keep an ordered list of scenes with exactly one active scene
// - Keep every scene's build index equal to its position
// - Notify game objects, in a fixed order, when the active scene changes
// - Look scenes up by name, module path, build index or id
//
// Typical usage:
// ```rust
// use aetheric_scenes::prelude::*;
//
// let mut registry = SceneRegistry::new();
// let level = registry.create_scene("Level", false);
// registry.scenes_mut().append(level).unwrap();
// registry.load_scene("Level");
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the scene list, scenes, notifications and errors.
// `registry` wraps a scene list with lookup and load conveniences and
// is what a game loop normally owns.
//
pub mod core;
pub mod prelude;
pub mod registry;

//--- Public Exports ------------------------------------------------------

pub use crate::core::error::{SceneError, Violation};
pub use crate::core::scene::{Scene, SceneList};
pub use registry::{SceneRegistry, SceneRegistryBuilder};
