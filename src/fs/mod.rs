//! Filesystem module

pub mod entry;
pub mod layout;
pub mod ops;

pub use entry::{Entry, EntryKind};
pub use layout::Layout;
