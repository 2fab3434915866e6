/// Handle to a node stored in a [`GenericTree`](super::GenericTree).
///
/// A tree recycles the slots of deleted nodes, bumping the slot's
/// generation each time. A handle kept after its node was deleted carries the
/// old generation, so it is detectably stale rather than pointing at whatever
/// took the slot over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) index: usize,
    pub(crate) generation: u32,
}

impl NodeId {
    pub(crate) fn new(index: usize, generation: u32) -> NodeId {
        NodeId { index, generation }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

#[derive(Debug, Clone)]
pub struct Node<T> {
    pub(crate) key: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) data: T,
}

impl<T> Node<T> {
    pub(crate) fn new(key: String, data: T) -> Node<T> {
        Node {
            key,
            parent: None,
            children: Vec::new(),
            data,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    pub(crate) fn insert(&mut self, child: NodeId) {
        self.children.push(child);
    }

    // Removes the first occurrence only; a node is never listed twice.
    pub(crate) fn delete(&mut self, child: NodeId) -> bool {
        match self.children.iter().position(|c| *c == child) {
            Some(idx) => {
                self.children.remove(idx);
                true
            }
            None => false,
        }
    }
}
