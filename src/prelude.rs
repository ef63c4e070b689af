//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use aetheric_scenes::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Registry
pub use crate::registry::{SceneModuleResolver, SceneRegistry, SceneRegistryBuilder};

// Scene system
pub use crate::core::scene::{
    GameObject, Scene, SceneContext, SceneEvent, SceneId, SceneInfo, SceneList, SceneSelector,
    SceneTransition,
};

// Errors
pub use crate::core::error::{SceneError, Violation};
