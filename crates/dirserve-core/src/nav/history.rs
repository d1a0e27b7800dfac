//! Navigation history with back/forward support.

/// Immutable navigation history: visited relative paths plus a cursor.
///
/// Every mutation returns a **new** `History` instance. Entries are only
/// ever appended; going back or forward moves the cursor without touching
/// the sequence, so navigating after going back keeps the forward entries
/// in place (they just end up before the new one).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    entries: Vec<String>,
    index: Option<usize>,
}

impl History {
    /// Creates an empty history with no current entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a visit to `path`.
    ///
    /// The path is appended unless it equals the entry under the cursor, in
    /// which case the history is returned unchanged.
    pub fn navigate_to(&self, path: &str) -> Self {
        if self.current() == Some(path) {
            return self.clone();
        }
        self.append(path)
    }

    /// Records a visit to the root. Always appends, even when the cursor is
    /// already on the root.
    pub fn go_to_root(&self) -> Self {
        self.append("")
    }

    /// Moves the cursor one step back. Returns the new History and the path
    /// to navigate to, or `None` when already at the first entry.
    pub fn go_back(&self) -> Option<(Self, String)> {
        let index = self.index.filter(|&i| i > 0)? - 1;
        Some(self.at(index))
    }

    /// Moves the cursor one step forward. Returns the new History and the
    /// path to navigate to, or `None` when already at the last entry.
    pub fn go_forward(&self) -> Option<(Self, String)> {
        let index = self.index.filter(|&i| i + 1 < self.entries.len())? + 1;
        Some(self.at(index))
    }

    /// Returns `true` if the cursor is past the first entry.
    pub fn can_go_back(&self) -> bool {
        self.index.is_some_and(|i| i > 0)
    }

    /// Returns `true` if the cursor is before the last entry.
    pub fn can_go_forward(&self) -> bool {
        self.index.is_some_and(|i| i + 1 < self.entries.len())
    }

    /// The path under the cursor, if any navigation has happened.
    pub fn current(&self) -> Option<&str> {
        self.index.map(|i| self.entries[i].as_str())
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    fn append(&self, path: &str) -> Self {
        let mut entries = self.entries.clone();
        entries.push(path.to_string());
        let index = Some(entries.len() - 1);
        Self { entries, index }
    }

    fn at(&self, index: usize) -> (Self, String) {
        let path = self.entries[index].clone();
        let history = Self {
            entries: self.entries.clone(),
            index: Some(index),
        };
        (history, path)
    }
}
