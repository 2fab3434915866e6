// A labeled, ordered tree with glob search over node labels. The tree knows
// nothing about files or directories; the payload type `T` carries whatever
// the caller needs.
//
// Nodes are kept in an arena owned by the tree. Parents and children refer to
// each other through `NodeId`s, so there is exactly one owner for every node
// and no reference cycles. Freed slots are reused; the per-slot generation
// keeps old handles from resolving to the newcomer.

mod glob;
mod node;

pub use glob::Pattern;
pub use node::{Node, NodeId};

use std::collections::VecDeque;

use crate::errors::{FsError, FsErrorType, Result};

/// Where to attach or what to delete: a concrete node, or every node whose
/// key matches a glob pattern.
#[derive(Debug, Clone, Copy)]
pub enum Locator<'a> {
    Node(NodeId),
    Pattern(&'a str),
}

impl From<NodeId> for Locator<'_> {
    fn from(id: NodeId) -> Self {
        Locator::Node(id)
    }
}

impl<'a> From<&'a str> for Locator<'a> {
    fn from(pattern: &'a str) -> Self {
        Locator::Pattern(pattern)
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    node: Option<Node<T>>,
}

#[derive(Debug, Clone)]
pub struct GenericTree<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    root: Option<NodeId>,
}

impl<T> Default for GenericTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> GenericTree<T> {
    pub fn new() -> GenericTree<T> {
        GenericTree {
            slots: Vec::new(),
            free: Vec::new(),
            root: None,
        }
    }

    /// A tree that starts out with a root node.
    pub fn with_root(key: &str, data: T) -> (GenericTree<T>, NodeId) {
        let mut tree = GenericTree::new();
        let root = tree.allocate(Node::new(key.to_string(), data));
        tree.root = Some(root);
        (tree, root)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of nodes currently reachable from the root.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of node slots the arena holds, live or free.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_ok()
    }

    pub fn get(&self, id: NodeId) -> Result<&Node<T>> {
        match self.slots.get(id.index) {
            Some(Slot {
                generation,
                node: Some(node),
            }) if *generation == id.generation => Ok(node),
            _ => Err(stale(id)),
        }
    }

    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut Node<T>> {
        match self.slots.get_mut(id.index) {
            Some(Slot {
                generation,
                node: Some(node),
            }) if *generation == id.generation => Ok(node),
            _ => Err(stale(id)),
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).ok().and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.get(id) {
            Ok(node) => &node.children,
            Err(_) => &[],
        }
    }

    /// Creates a node labeled `key` and attaches it as the last child of the
    /// located parent. With no parent the node becomes the root, which is
    /// only allowed while the tree is rootless. A pattern locator attaches to
    /// the first match in pre-order.
    pub fn insert(&mut self, key: &str, parent: Option<Locator>, data: T) -> Result<NodeId> {
        let parent = match parent {
            None => {
                if self.root.is_some() {
                    tracing::info!("Refusing to replace existing root with {}", key);
                    return Err(FsError::new(
                        FsErrorType::RootAlreadyExists,
                        "Tree already has a root. Please specify the node's parent.".to_string(),
                    ));
                }
                None
            }
            Some(Locator::Node(id)) => {
                if !self.contains(id) {
                    return Err(parent_not_found(&id.to_string()));
                }
                Some(id)
            }
            Some(Locator::Pattern(pattern)) => match self.search(pattern).first() {
                Some(id) => Some(*id),
                None => return Err(parent_not_found(pattern)),
            },
        };

        let mut node = Node::new(key.to_string(), data);
        node.parent = parent;
        let id = self.allocate(node);
        match parent {
            Some(p) => self.get_mut(p)?.insert(id),
            None => self.root = Some(id),
        }
        Ok(id)
    }

    /// Removes the located node(s) together with their subtrees. Deleting the
    /// root leaves the tree empty.
    pub fn delete(&mut self, target: Locator) -> Result<()> {
        let targets = match target {
            Locator::Node(id) if self.contains(id) => vec![id],
            Locator::Node(_) => Vec::new(),
            Locator::Pattern(pattern) => self.search(pattern),
        };
        if targets.is_empty() {
            let msg = match target {
                Locator::Node(id) => format!("Target node not found: {}", id),
                Locator::Pattern(p) => format!("Target node not found: {}", p),
            };
            tracing::info!("{}", msg);
            return Err(FsError::new(FsErrorType::TargetNotFound, msg));
        }

        for id in targets {
            // An earlier match may have been an ancestor of this one.
            if !self.contains(id) {
                continue;
            }
            let parent = self.get(id)?.parent;
            match parent {
                Some(parent) => {
                    self.get_mut(parent)?.delete(id);
                }
                None => self.root = None,
            }
            self.discard(id);
        }
        Ok(())
    }

    /// Every node whose key matches `pattern`, root first, children visited
    /// left to right.
    pub fn search(&self, pattern: &str) -> Vec<NodeId> {
        match self.root {
            Some(root) => self.search_from(root, &Pattern::new(pattern)),
            None => Vec::new(),
        }
    }

    /// Pre-order search over `start` and all of its descendants.
    pub fn search_from(&self, start: NodeId, pattern: &Pattern) -> Vec<NodeId> {
        self.descendants(start)
            .into_iter()
            .filter(|id| {
                self.get(*id)
                    .map(|n| pattern.matches(&n.key))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Direct children of `parent` whose key matches `pattern`.
    pub fn find(&self, parent: NodeId, pattern: &Pattern) -> Vec<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .filter(|id| {
                self.get(*id)
                    .map(|n| pattern.matches(&n.key))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Direct children of `parent` labeled exactly `name`.
    pub fn find_exact(&self, parent: NodeId, name: &str) -> Vec<NodeId> {
        self.find(parent, &Pattern::literal(name))
    }

    /// Nodes grouped by depth: the root alone, then its children, and so on.
    pub fn traverse(&self) -> Vec<Vec<NodeId>> {
        let mut levels = Vec::new();
        let mut level: Vec<NodeId> = self.root.into_iter().collect();
        while !level.is_empty() {
            let next: Vec<NodeId> = level
                .iter()
                .flat_map(|id| self.children(*id).iter().copied())
                .collect();
            levels.push(level);
            level = next;
        }
        levels
    }

    /// `start` followed by its descendants in pre-order.
    pub fn descendants(&self, start: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let Ok(node) = self.get(id) else {
                continue;
            };
            out.push(id);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Chain of ids from the root down to `id`, inclusive.
    pub fn lineage(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = VecDeque::new();
        let mut current = Some(id);
        while let Some(c) = current {
            chain.push_front(c);
            current = self.parent(c);
        }
        chain.into()
    }

    pub fn relabel(&mut self, id: NodeId, key: &str) -> Result<()> {
        self.get_mut(id)?.key = key.to_string();
        Ok(())
    }

    fn allocate(&mut self, node: Node<T>) -> NodeId {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.node = Some(node);
                NodeId::new(index, slot.generation)
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId::new(self.slots.len() - 1, 0)
            }
        }
    }

    // Frees `id` and everything below it. The caller unlinks it first.
    fn discard(&mut self, id: NodeId) {
        for gone in self.descendants(id) {
            if let Some(slot) = self.slots.get_mut(gone.index) {
                slot.node = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(gone.index);
            }
        }
    }
}

fn stale(id: NodeId) -> FsError {
    FsError::new(
        FsErrorType::TargetNotFound,
        format!("Node {} no longer exists", id),
    )
}

fn parent_not_found(locator: &str) -> FsError {
    tracing::info!("Parent node not found: {}", locator);
    FsError::new(
        FsErrorType::ParentNotFound,
        format!("Parent node not found: {}", locator),
    )
}
