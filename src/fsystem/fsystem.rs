// The virtual filesystem. Directories and files are nodes of a
// `GenericTree<Entry>`; the root directory has an empty key and can never be
// removed or renamed.
//
// Every operation checks everything it needs before touching the tree, so a
// failed call leaves the structure exactly as it was.

use std::str::FromStr;

use tracing::instrument;

use crate::errors::{FsError, FsErrorType, Result};
use crate::fsystem::path::validate_name;
use crate::fsystem::{Entry, EntryKind, Session, Snapshot};
use crate::tree::{GenericTree, Node, NodeId};

/// How `cat` treats the file: read it, replace its contents, or append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatMode {
    Read,
    Overwrite,
    Append,
}

impl FromStr for CatMode {
    type Err = FsError;

    fn from_str(s: &str) -> Result<CatMode> {
        match s {
            "" => Ok(CatMode::Read),
            ">" => Ok(CatMode::Overwrite),
            ">>" => Ok(CatMode::Append),
            other => Err(FsError::new(
                FsErrorType::InvalidArgument,
                format!("Unknown cat mode: {}", other),
            )),
        }
    }
}

/// Either a path to resolve or a node handle already in hand.
#[derive(Debug, Clone, Copy)]
pub enum Location<'a> {
    Path(&'a str),
    Node(NodeId),
}

impl<'a> From<&'a str> for Location<'a> {
    fn from(path: &'a str) -> Self {
        Location::Path(path)
    }
}

impl From<NodeId> for Location<'_> {
    fn from(id: NodeId) -> Self {
        Location::Node(id)
    }
}

#[derive(Debug, Clone)]
pub struct VirtualFileSystem {
    pub(super) tree: GenericTree<Entry>,
    pub(super) root: NodeId,
}

impl Default for VirtualFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualFileSystem {
    pub fn new() -> VirtualFileSystem {
        let (tree, root) = GenericTree::with_root("", Entry::Directory);
        VirtualFileSystem { tree, root }
    }

    /// A fresh session whose pointer sits at the root.
    pub fn session(&self) -> Session {
        Session::new(self.root)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn tree(&self) -> &GenericTree<Entry> {
        &self.tree
    }

    pub fn node(&self, id: NodeId) -> Result<&Node<Entry>> {
        self.tree.get(id)
    }

    pub fn key(&self, id: NodeId) -> Result<&str> {
        Ok(self.tree.get(id)?.key())
    }

    pub fn is_directory(&self, id: NodeId) -> bool {
        self.tree
            .get(id)
            .map(|n| n.data().is_directory())
            .unwrap_or(false)
    }

    pub fn is_file(&self, id: NodeId) -> bool {
        self.tree
            .get(id)
            .map(|n| n.data().is_file())
            .unwrap_or(false)
    }

    #[instrument(skip(self, session), fields(session = %session.id()))]
    pub fn mkdir(&mut self, session: &Session, path: &str) -> Result<NodeId> {
        let (parent, name) = self.resolve_parent(session, path)?;
        self.require_directory(parent)?;
        if !self.tree.find_exact(parent, &name).is_empty() {
            tracing::info!("Name {} is already taken", name);
            return Err(FsError::new(
                FsErrorType::NameTaken,
                format!("Name already taken: {}", name),
            ));
        }
        self.tree.insert(&name, Some(parent.into()), Entry::Directory)
    }

    /// Removes a directory and everything below it. If the session was
    /// inside it, the session moves up to the removed directory's parent.
    #[instrument(skip(self, session), fields(session = %session.id()))]
    pub fn rmdir(&mut self, session: &mut Session, path: &str) -> Result<()> {
        let node = self.resolve(session, path)?;
        if node == self.root {
            tracing::info!("Refusing to delete root");
            return Err(FsError::new(
                FsErrorType::CannotDeleteRoot,
                "You cannot delete the root directory.".to_string(),
            ));
        }
        self.require_directory(node)?;

        let parent = self.tree.parent(node);
        let relocate = self.tree.is_ancestor_or_self(node, session.pointer());
        self.tree.delete(node.into())?;
        if let (true, Some(parent)) = (relocate, parent) {
            session.set_pointer(parent);
        }
        Ok(())
    }

    #[instrument(skip(self, session), fields(session = %session.id()))]
    pub fn cd(&self, session: &mut Session, path: &str) -> Result<NodeId> {
        let node = self.resolve(session, path)?;
        self.require_directory(node)?;
        session.set_pointer(node);
        Ok(node)
    }

    /// Reads, overwrites or appends to a file. Writing creates the file when
    /// it does not exist yet. Only reads return contents.
    #[instrument(skip(self, session, contents), fields(session = %session.id()))]
    pub fn cat(
        &mut self,
        session: &Session,
        mode: CatMode,
        path: &str,
        contents: Option<&str>,
    ) -> Result<Option<String>> {
        let (parent, name) = self.resolve_parent(session, path)?;
        let matches = self.tree.find_exact(parent, &name);
        let existing = matches.iter().copied().find(|id| self.is_file(*id));
        if existing.is_none() && !matches.is_empty() {
            tracing::info!("{} is a directory", path);
            return Err(not_a_file(path));
        }

        match mode {
            CatMode::Read => {
                let id = existing.ok_or_else(|| {
                    tracing::info!("No file at {}", path);
                    FsError::new(FsErrorType::FileNotFound, format!("File not found: {}", path))
                })?;
                Ok(self.tree.get(id)?.data().contents().map(str::to_string))
            }
            CatMode::Overwrite | CatMode::Append => {
                let contents = contents.ok_or_else(|| FsError::missing_argument("contents"))?;
                self.require_directory(parent)?;
                let id = match existing {
                    Some(id) => id,
                    None => self
                        .tree
                        .insert(&name, Some(parent.into()), Entry::file(""))?,
                };
                if let Entry::File { contents: current } = self.tree.get_mut(id)?.data_mut() {
                    if mode == CatMode::Overwrite {
                        *current = contents.to_string();
                    } else {
                        current.push_str(contents);
                    }
                }
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, session), fields(session = %session.id()))]
    pub fn rm(&mut self, session: &Session, path: &str) -> Result<()> {
        let node = self.resolve(session, path)?;
        if !self.is_file(node) {
            tracing::info!("{} is not a file", path);
            return Err(not_a_file(self.key(node)?));
        }
        self.tree.delete(node.into())
    }

    /// Relabels a node in place. A sibling with the new name only blocks the
    /// rename when it is of the same kind.
    #[instrument(skip(self, session), fields(session = %session.id()))]
    pub fn rn(&mut self, session: &Session, path: &str, name: &str) -> Result<()> {
        validate_name(name)?;
        let node = self.resolve(session, path)?;
        let parent = match self.tree.parent(node) {
            Some(parent) if node != self.root => parent,
            _ => {
                tracing::info!("Refusing to rename root");
                return Err(FsError::new(
                    FsErrorType::CannotRenameRoot,
                    "You cannot rename the root directory.".to_string(),
                ));
            }
        };
        let kind = self.kind(node)?;
        if self.has_sibling(parent, name, kind, Some(node)) {
            tracing::info!("Rename of {} to {} conflicts", path, name);
            return Err(FsError::new(
                FsErrorType::RenameConflict,
                format!("Rename failed. Name already taken: {}", name),
            ));
        }
        self.tree.relabel(node, name)
    }

    /// Deep-copies `target` into the `destination` directory and returns the
    /// new copy. The source is left untouched.
    #[instrument(skip(self, session), fields(session = %session.id()))]
    pub fn cp(
        &mut self,
        session: &Session,
        target: Location,
        destination: Location,
    ) -> Result<NodeId> {
        let target = self.locate(session, target)?;
        let destination = self.locate(session, destination)?;
        self.check_destination(target, destination, None)?;
        let snapshot = self.snapshot(target)?;
        self.graft(destination, &snapshot)
    }

    /// Moves `target` into `destination` by deleting it and inserting a deep
    /// copy. The moved nodes get new ids; handles to the old ones go stale.
    #[instrument(skip(self, session), fields(session = %session.id()))]
    pub fn mv(
        &mut self,
        session: &mut Session,
        target: Location,
        destination: Location,
    ) -> Result<NodeId> {
        let target = self.locate(session, target)?;
        let destination = self.locate(session, destination)?;
        if self.tree.is_ancestor_or_self(target, destination) {
            let msg = format!(
                "Cannot move {} into itself",
                self.display_path(target)?
            );
            tracing::info!("{}", msg);
            return Err(FsError::new(FsErrorType::InvalidDestination, msg));
        }
        // the target leaves its old place first, so it never collides with itself
        self.check_destination(target, destination, Some(target))?;

        let snapshot = self.snapshot(target)?;
        let parent = self.tree.parent(target);
        let relocate = self.tree.is_ancestor_or_self(target, session.pointer());
        self.tree.delete(target.into())?;
        let moved = self.graft(destination, &snapshot)?;
        if let (true, Some(parent)) = (relocate, parent) {
            session.set_pointer(parent);
        }
        Ok(moved)
    }

    /// Direct children of `path`, or of the session's pointer. The order is
    /// insertion order; see [`VirtualFileSystem::sorted`] for display order.
    #[instrument(skip(self, session), fields(session = %session.id()))]
    pub fn ls(&self, session: &Session, path: Option<&str>) -> Result<Vec<NodeId>> {
        let node = match path {
            Some(path) => self.resolve(session, path)?,
            None => self.pointer(session)?,
        };
        if !self.is_directory(node) {
            let shown = match path {
                Some(path) => path.to_string(),
                None => self.display_path(node)?,
            };
            tracing::info!("{} is not a directory", shown);
            return Err(not_a_directory(&shown));
        }
        Ok(self.tree.children(node).to_vec())
    }

    /// Every node in the tree whose name matches the glob `query`.
    #[instrument(skip(self))]
    pub fn whereis(&self, query: &str) -> Vec<NodeId> {
        self.tree.search(query)
    }

    /// Directories before files, then by name.
    pub fn sorted(&self, ids: &[NodeId]) -> Vec<NodeId> {
        let mut sorted = ids.to_vec();
        sorted.sort_by_key(|id| {
            let node = self.tree.get(*id).ok();
            let is_file = node.map(|n| n.data().is_file()).unwrap_or(true);
            let key = node.map(|n| n.key().to_string()).unwrap_or_default();
            (is_file, key)
        });
        sorted
    }

    pub fn snapshot(&self, id: NodeId) -> Result<Snapshot> {
        let node = self.tree.get(id)?;
        let children = node
            .children()
            .iter()
            .map(|child| self.snapshot(*child))
            .collect::<Result<Vec<Snapshot>>>()?;
        Ok(Snapshot {
            name: node.key().to_string(),
            kind: node.data().kind(),
            contents: node.data().contents().map(str::to_string),
            children,
        })
    }

    fn graft(&mut self, parent: NodeId, snapshot: &Snapshot) -> Result<NodeId> {
        let id = self
            .tree
            .insert(&snapshot.name, Some(parent.into()), snapshot.entry())?;
        for child in &snapshot.children {
            self.graft(id, child)?;
        }
        Ok(id)
    }

    fn locate(&self, session: &Session, location: Location) -> Result<NodeId> {
        match location {
            Location::Path(path) => self.resolve(session, path),
            Location::Node(id) => self.tree.get(id).map(|_| id),
        }
    }

    // The copy lands in `destination`, which has to be a directory without a
    // same-kind entry of the same name, `except` aside.
    fn check_destination(
        &self,
        target: NodeId,
        destination: NodeId,
        except: Option<NodeId>,
    ) -> Result<()> {
        self.require_directory(destination)?;
        let name = self.key(target)?;
        if self.has_sibling(destination, name, self.kind(target)?, except) {
            tracing::info!("{} already exists in destination", name);
            return Err(FsError::new(
                FsErrorType::NameTaken,
                format!("Name already taken: {}", name),
            ));
        }
        Ok(())
    }

    fn has_sibling(
        &self,
        parent: NodeId,
        name: &str,
        kind: EntryKind,
        except: Option<NodeId>,
    ) -> bool {
        self.tree
            .find_exact(parent, name)
            .into_iter()
            .filter(|id| Some(*id) != except)
            .any(|id| self.kind(id).map(|k| k == kind).unwrap_or(false))
    }

    fn kind(&self, id: NodeId) -> Result<EntryKind> {
        Ok(self.tree.get(id)?.data().kind())
    }

    fn require_directory(&self, id: NodeId) -> Result<()> {
        if self.is_directory(id) {
            return Ok(());
        }
        let key = self.key(id)?;
        tracing::info!("{} is not a directory", key);
        Err(not_a_directory(key))
    }
}

fn not_a_directory(what: &str) -> FsError {
    FsError::new(
        FsErrorType::NotADirectory,
        format!("Not a directory: {}", what),
    )
}

fn not_a_file(what: &str) -> FsError {
    FsError::new(FsErrorType::NotAFile, format!("Not a file: {}", what))
}
