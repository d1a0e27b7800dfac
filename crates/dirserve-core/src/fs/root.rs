//! Root-contained path resolution.
//!
//! Every client-supplied path is interpreted relative to a single configured
//! root. [`Root`] is the only way the rest of the crate turns such a path into
//! a filesystem location, and it guarantees the result stays under the root:
//! parent-directory components are rejected lexically, and symlinks are
//! checked after canonicalization.

use std::path::{Component, Path, PathBuf};

use crate::error::{CoreError, CoreResult};

/// A canonicalized base directory that all relative paths resolve under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Root {
    path: PathBuf,
}

impl Root {
    /// Opens `path` as a root directory.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the path does not exist.
    /// - [`CoreError::NotADirectory`] if it is not a directory.
    pub fn open(path: &Path) -> CoreResult<Self> {
        let canonical = path
            .canonicalize()
            .map_err(|e| CoreError::from_io(e, path))?;
        if !canonical.is_dir() {
            return Err(CoreError::NotADirectory(canonical));
        }
        Ok(Self { path: canonical })
    }

    /// Returns the canonical root path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lexically joins `relative` onto the root.
    ///
    /// Empty and `.` segments are ignored, so `""` maps to the root itself.
    ///
    /// # Errors
    ///
    /// [`CoreError::OutsideRoot`] if the path contains `..`, is absolute, or
    /// carries a drive prefix.
    pub fn join(&self, relative: &str) -> CoreResult<PathBuf> {
        let mut joined = self.path.clone();
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(segment) => joined.push(segment),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(CoreError::OutsideRoot(relative.to_string()));
                }
            }
        }
        Ok(joined)
    }

    /// Resolves `relative` to an existing canonical path under the root,
    /// following symlinks.
    ///
    /// # Errors
    ///
    /// - [`CoreError::OutsideRoot`] if the path escapes the root, lexically or
    ///   through a symlink.
    /// - [`CoreError::NotFound`] / [`CoreError::PermissionDenied`] if the path
    ///   cannot be resolved.
    pub fn resolve(&self, relative: &str) -> CoreResult<PathBuf> {
        let joined = self.join(relative)?;
        self.contain(relative, &joined)
    }

    /// Resolves `relative` to an entry *inside* some directory under the root
    /// without following the final component.
    ///
    /// The parent is canonicalized and checked for containment; the last
    /// component is appended verbatim so that a symlink names the link itself.
    ///
    /// # Errors
    ///
    /// [`CoreError::OutsideRoot`] when `relative` names the root itself or
    /// escapes it; otherwise the same errors as [`Root::resolve`] for the
    /// parent directory.
    pub fn resolve_entry(&self, relative: &str) -> CoreResult<PathBuf> {
        let joined = self.join(relative)?;
        let name = match joined.file_name() {
            Some(name) if joined != self.path => name.to_owned(),
            _ => return Err(CoreError::OutsideRoot(relative.to_string())),
        };
        let parent = joined
            .parent()
            .ok_or_else(|| CoreError::OutsideRoot(relative.to_string()))?;
        let parent = self.contain(relative, parent)?;
        Ok(parent.join(name))
    }

    fn contain(&self, relative: &str, path: &Path) -> CoreResult<PathBuf> {
        let canonical = path
            .canonicalize()
            .map_err(|e| CoreError::from_io(e, path))?;
        if !canonical.starts_with(&self.path) {
            tracing::warn!(
                "rejected path {relative:?}: resolves to {} outside root",
                canonical.display()
            );
            return Err(CoreError::OutsideRoot(relative.to_string()));
        }
        Ok(canonical)
    }
}

/// Composes the relative path of `name` inside `parent`.
///
/// The root is the empty string, so its children are just their names.
pub fn join_relative(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}
