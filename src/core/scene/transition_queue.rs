//=========================================================================
// Transition Queue
//=========================================================================
//
// Queue for scene transitions.
//
// Game objects queue transitions here while a notification is being
// delivered. The scene list applies the queue once the activation that
// produced it has fired all three notifications.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{SceneId, SceneSelector};

//=== Scene Transition ====================================================

/// A deferred change to the scene list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneTransition {
    /// Activates the selected scene, running the full activation protocol.
    Activate(SceneSelector),

    /// Removes a scene. Rejected if it is active when the queue is applied.
    Remove(SceneId),
}

//=== Transition Queue ====================================================

/// FIFO of transitions requested during notification delivery.
#[derive(Debug, Default)]
pub struct TransitionQueue {
    queue: Vec<SceneTransition>,
}

impl TransitionQueue {
    /// Creates a new empty transition queue.
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Queues a scene transition.
    pub fn push(&mut self, transition: SceneTransition) {
        self.queue.push(transition);
    }

    /// Returns an iterator over the queued transitions.
    pub fn iter(&self) -> impl Iterator<Item = &SceneTransition> {
        self.queue.iter()
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of queued transitions.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Appends all transitions from `other`, preserving order.
    pub fn append(&mut self, other: &mut TransitionQueue) {
        self.queue.append(&mut other.queue);
    }

    /// Takes all transitions from the queue, leaving it empty.
    pub fn take(&mut self) -> Vec<SceneTransition> {
        std::mem::take(&mut self.queue)
    }
}

//=== Tests ===============================================================
