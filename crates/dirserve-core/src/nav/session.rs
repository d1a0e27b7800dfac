//! Navigation session: the client-side view-model of a file listing.
//!
//! A [`NavigationSession`] is created when a listing view is mounted and
//! dropped when the view goes away. It owns its [`History`], issues a listing
//! request through a [`ListingSource`] on every transition, and exposes the
//! last successful render as a [`ListingView`].

use crate::error::CoreResult;
use crate::fs::entry::{DirEntry, EntryKind};
use crate::fs::ops::list_directory;
use crate::fs::root::{join_relative, Root};
use crate::nav::history::History;

/// Label shown instead of the empty path.
pub const ROOT_LABEL: &str = "Root";

/// Anything that can answer a listing request for a relative path.
pub trait ListingSource {
    fn list(&self, path: &str) -> CoreResult<Vec<DirEntry>>;
}

impl ListingSource for Root {
    fn list(&self, path: &str) -> CoreResult<Vec<DirEntry>> {
        list_directory(self, path)
    }
}

impl<S: ListingSource + ?Sized> ListingSource for &S {
    fn list(&self, path: &str) -> CoreResult<Vec<DirEntry>> {
        (**self).list(path)
    }
}

/// What clicking a row does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    /// Descend into the directory at this relative path.
    Navigate(String),
    /// Open the file at this relative path in the text viewer.
    View(String),
}

/// One rendered listing row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub name: String,
    pub kind: EntryKind,
    pub open: RowAction,
    /// Target of the row's delete button. Pressing it must not also trigger
    /// [`Row::open`].
    pub delete_path: String,
}

/// Everything a frontend needs to draw the current listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingView {
    pub path_label: String,
    pub rows: Vec<Row>,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    /// Directory that the upload form posts into.
    pub upload_path: String,
}

#[derive(Debug, Clone)]
struct Rendered {
    path: String,
    entries: Vec<DirEntry>,
}

/// A mounted listing view with its own navigation history.
///
/// Immutable: all transitions consume the session and return a new one.
#[derive(Debug, Clone)]
pub struct NavigationSession<S> {
    source: S,
    history: History,
    current_path: String,
    rendered: Option<Rendered>,
}

impl<S: ListingSource> NavigationSession<S> {
    /// Mounts a session on the root and performs the initial load.
    ///
    /// History starts empty; the initial load is not recorded as a visit.
    pub fn mount(source: S) -> Self {
        Self {
            source,
            history: History::new(),
            current_path: String::new(),
            rendered: None,
        }
        .load()
    }

    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Visits `path`, recording it in history unless it is already current.
    pub fn navigate_to(self, path: &str) -> Self {
        tracing::debug!("navigating to {:?}", path);
        Self {
            history: self.history.navigate_to(path),
            current_path: path.to_string(),
            ..self
        }
        .load()
    }

    /// Steps back in history. No-op (and no request) at the first entry.
    pub fn go_back(self) -> Self {
        match self.history.go_back() {
            Some((history, path)) => Self {
                history,
                current_path: path,
                ..self
            }
            .load(),
            None => self,
        }
    }

    /// Steps forward in history. No-op (and no request) at the last entry.
    pub fn go_forward(self) -> Self {
        match self.history.go_forward() {
            Some((history, path)) => Self {
                history,
                current_path: path,
                ..self
            }
            .load(),
            None => self,
        }
    }

    /// Jumps to the root, always adding a history entry.
    pub fn go_to_root(self) -> Self {
        Self {
            history: self.history.go_to_root(),
            current_path: String::new(),
            ..self
        }
        .load()
    }

    /// Re-lists the current path, e.g. after an upload or delete.
    pub fn refresh(self) -> Self {
        self.load()
    }

    /// Builds the view of the last successful listing.
    pub fn view(&self) -> ListingView {
        let (path, entries): (&str, &[DirEntry]) = match &self.rendered {
            Some(r) => (r.path.as_str(), r.entries.as_slice()),
            None => ("", &[]),
        };

        let rows = entries
            .iter()
            .map(|entry| {
                let full = join_relative(path, &entry.name);
                let open = if entry.is_dir() {
                    RowAction::Navigate(full.clone())
                } else {
                    RowAction::View(full.clone())
                };
                Row {
                    name: entry.name.clone(),
                    kind: entry.kind,
                    open,
                    delete_path: full,
                }
            })
            .collect();

        ListingView {
            path_label: if path.is_empty() {
                ROOT_LABEL.to_string()
            } else {
                path.to_string()
            },
            rows,
            can_go_back: self.history.can_go_back(),
            can_go_forward: self.history.can_go_forward(),
            upload_path: path.to_string(),
        }
    }

    fn load(self) -> Self {
        match self.source.list(&self.current_path) {
            Ok(entries) => {
                tracing::debug!("loaded {} entries from {:?}", entries.len(), self.current_path);
                let rendered = Rendered {
                    path: self.current_path.clone(),
                    entries,
                };
                Self {
                    rendered: Some(rendered),
                    ..self
                }
            }
            Err(e) => {
                // Previous listing stays on screen.
                tracing::warn!("failed to load {:?}: {e}", self.current_path);
                self
            }
        }
    }
}
