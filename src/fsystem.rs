// Directory/file semantics on top of the generic tree. Paths are resolved
// against a caller-owned `Session`, so several consumers can walk the same
// tree independently.

mod entry;
#[allow(clippy::module_inception)]
mod fsystem;
mod path;
mod session;

pub use entry::{Entry, EntryKind, Snapshot};
pub use fsystem::{CatMode, Location, VirtualFileSystem};
pub use session::Session;
