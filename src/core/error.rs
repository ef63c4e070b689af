//=========================================================================
// Scene Errors
//=========================================================================
//
// Failure modes of scene list mutations.
//
// Every error is detected before the list is touched, so a failed call
// leaves the list exactly as it was. Lookups that find nothing are not
// errors; they return `None`.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Violation ===========================================================

/// A precondition that would break the single-active-scene invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Bulk construction requires exactly one active scene.
    #[error("expected exactly one active scene, found {0}")]
    ActiveCount(usize),

    /// The active scene cannot leave the list.
    #[error("cannot remove active scene '{name}'")]
    RemoveActive { name: String },

    /// Appending an active scene would create a second active scene.
    #[error("scene '{name}' is already active; use insert_active to add and activate it")]
    InsertActive { name: String },

    /// Replacing the active scene requires an active successor.
    #[error("replacement for the active scene at position {position} must be active")]
    ReplaceActiveWithInactive { position: usize },
}

//=== SceneError ==========================================================

/// Errors returned by [`SceneList`](crate::core::scene::SceneList) mutations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The operation would leave the list with zero or several active scenes.
    #[error("invariant violation: {0}")]
    InvariantViolation(#[from] Violation),

    /// A positional mutation addressed a slot past the end of the list.
    #[error("position {position} out of bounds for {len} scenes")]
    OutOfBounds { position: usize, len: usize },
}

/// Result alias for scene list operations.
pub type Result<T> = std::result::Result<T, SceneError>;

//=========================================================================
// Tests
//=========================================================================
