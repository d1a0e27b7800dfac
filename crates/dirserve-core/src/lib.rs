//! dirserve core library — UI-agnostic file manager logic.
//!
//! `dirserve-core` provides the directory operations behind the dirserve web
//! server and the navigation model its browser client follows. It is
//! decoupled from HTTP so the same logic can be tested directly.
//!
//! # Modules
//!
//! - [`fs`] — Root-contained path resolution ([`Root`]), the listing row type
//!   ([`DirEntry`]) and the list/upload/delete/read operations.
//! - [`nav`] — Navigation [`History`] and the [`NavigationSession`] view-model.
//! - [`error`] — Unified error type ([`CoreError`]) and result alias ([`CoreResult`]).

pub mod error;
pub mod fs;
pub mod nav;

pub use error::{CoreError, CoreResult};
pub use fs::ops::{delete_entry, list_directory, read_text, write_upload};
pub use fs::{join_relative, DirEntry, EntryKind, Root};
pub use nav::history::History;
pub use nav::session::{ListingSource, ListingView, NavigationSession, Row, RowAction, ROOT_LABEL};
