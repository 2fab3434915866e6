use serde::Serialize;

/// Payload of a filesystem node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Directory,
    File { contents: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Directory,
    File,
}

impl Entry {
    pub fn file(contents: impl Into<String>) -> Entry {
        Entry::File {
            contents: contents.into(),
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Entry::Directory => EntryKind::Directory,
            Entry::File { .. } => EntryKind::File,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Entry::Directory)
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Entry::File { .. })
    }

    pub fn contents(&self) -> Option<&str> {
        match self {
            Entry::File { contents } => Some(contents),
            Entry::Directory => None,
        }
    }
}

/// Owned copy of a subtree, detached from any tree. Used to deep-copy nodes
/// and to dump a subtree as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Snapshot>,
}

impl Snapshot {
    pub(crate) fn entry(&self) -> Entry {
        match self.kind {
            EntryKind::Directory => Entry::Directory,
            EntryKind::File => Entry::file(self.contents.clone().unwrap_or_default()),
        }
    }
}
