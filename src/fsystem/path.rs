// Path algebra: turning strings into nodes and nodes back into strings.

use crate::errors::{FsError, FsErrorType, Result};
use crate::fsystem::{Session, VirtualFileSystem};
use crate::tree::NodeId;

impl VirtualFileSystem {
    /// Resolves `path` to a node. Paths starting with `/` are taken from the
    /// root, anything else from the session's pointer. Empty and `.`
    /// segments are skipped and `..` climbs one level. Names are matched
    /// literally, so `*` in a path is just a character.
    pub fn resolve(&self, session: &Session, path: &str) -> Result<NodeId> {
        let mut current = if path.starts_with('/') {
            self.root
        } else {
            self.pointer(session)?
        };

        let segments: Vec<&str> = path.split('/').collect();
        for (i, segment) in segments.iter().enumerate() {
            match *segment {
                "" | "." => continue,
                ".." => {
                    if current == self.root {
                        tracing::info!("Tried to climb above root with {}", path);
                        return Err(FsError::new(
                            FsErrorType::NoPathBeyondRoot,
                            "No more directories beyond root directory.".to_string(),
                        ));
                    }
                    current = self.tree.parent(current).ok_or_else(|| {
                        FsError::new(
                            FsErrorType::TargetNotFound,
                            format!("Node {} is detached from the tree", current),
                        )
                    })?;
                }
                name => {
                    current = self.child_named(current, name).ok_or_else(|| {
                        let msg = format!("Path not found: {}", segments[..=i].join("/"));
                        tracing::info!("{}", msg);
                        FsError::new(FsErrorType::PathNotFound, msg)
                    })?;
                }
            }
        }
        Ok(current)
    }

    /// Keys from the root down to `id`, joined by `/`. The root itself has an
    /// empty key, so it renders as `""` and its children as `/name`.
    pub fn absolute_path(&self, id: NodeId) -> Result<String> {
        self.tree.get(id)?;
        let keys = self
            .tree
            .lineage(id)
            .into_iter()
            .map(|n| self.tree.get(n).map(|node| node.key().to_string()))
            .collect::<Result<Vec<String>>>()?;
        Ok(keys.join("/"))
    }

    /// Like `absolute_path` but shows the root as `/`.
    pub fn display_path(&self, id: NodeId) -> Result<String> {
        let path = self.absolute_path(id)?;
        if path.is_empty() {
            Ok("/".to_string())
        } else {
            Ok(path)
        }
    }

    /// Splits `path` into its parent directory and leaf name, resolving the
    /// parent. Trailing slashes are ignored.
    pub(crate) fn resolve_parent(&self, session: &Session, path: &str) -> Result<(NodeId, String)> {
        let (parent_path, name) = split_leaf(path);
        validate_name(name)?;
        let parent = self.resolve(session, parent_path)?;
        Ok((parent, name.to_string()))
    }

    pub(crate) fn pointer(&self, session: &Session) -> Result<NodeId> {
        if self.tree.contains(session.pointer()) {
            Ok(session.pointer())
        } else {
            tracing::info!(session = %session.id(), "Working directory was removed");
            Err(FsError::new(
                FsErrorType::TargetNotFound,
                "Working directory no longer exists".to_string(),
            ))
        }
    }

    // Exact-name child lookup. When a directory and a file share a name the
    // directory wins, since only directories can be walked through.
    fn child_named(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        let matches = self.tree.find_exact(parent, name);
        matches
            .iter()
            .copied()
            .find(|id| self.is_directory(*id))
            .or_else(|| matches.first().copied())
    }
}

pub(crate) fn split_leaf(path: &str) -> (&str, &str) {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) => ("/", &trimmed[1..]),
        Some(idx) => (&trimmed[..idx], &trimmed[idx + 1..]),
        None => ("", trimmed),
    }
}

pub(crate) fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') {
        tracing::info!("Rejected name {:?}", name);
        return Err(FsError::new(
            FsErrorType::InvalidName,
            format!("Invalid name: {:?}", name),
        ));
    }
    Ok(())
}
