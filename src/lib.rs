//! In-memory hierarchical filesystem.
//!
//! [`tree::GenericTree`] is a labeled, ordered tree with glob search over
//! node names. [`fsystem::VirtualFileSystem`] layers directories, files and
//! path resolution on top of it, and [`shell::Terminal`] drives the
//! filesystem from command lines.

pub mod config;
pub mod errors;
pub mod fsystem;
pub mod log;
mod locations;
pub mod seed;
pub mod shell;
pub mod tree;

pub use errors::{FsError, FsErrorType, Result};
pub use fsystem::{CatMode, Entry, Location, Session, VirtualFileSystem};
pub use tree::{GenericTree, NodeId};
