use uuid::Uuid;

use crate::tree::NodeId;

/// A consumer's view of the filesystem: where it currently is. Every terminal
/// or browser keeps its own session; they all share one tree.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    pointer: NodeId,
}

impl Session {
    pub(crate) fn new(pointer: NodeId) -> Session {
        Session {
            id: Uuid::new_v4(),
            pointer,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn pointer(&self) -> NodeId {
        self.pointer
    }

    pub(crate) fn set_pointer(&mut self, pointer: NodeId) {
        tracing::debug!(session = %self.id, from = %self.pointer, to = %pointer, "Moving pointer");
        self.pointer = pointer;
    }
}
