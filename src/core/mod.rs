//=========================================================================
// Core
//
// Scene data, the scene list and its invariants.
//
// Notes:
// Everything here runs on the caller's thread. Notifications are
// delivered synchronously; the only cross-thread surface is the event
// channel handed out by `SceneList::subscribe`.
//
//=========================================================================

pub mod error;
pub mod naming;
pub mod scene;
