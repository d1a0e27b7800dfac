//! File system abstractions for dirserve.
//!
//! This module provides the listing row type ([`entry::DirEntry`]), the
//! root-contained path resolver ([`root::Root`]) and the four directory
//! operations in [`ops`].

pub mod entry;
pub mod ops;
pub mod root;

pub use entry::{DirEntry, EntryKind};
pub use root::{join_relative, Root};
