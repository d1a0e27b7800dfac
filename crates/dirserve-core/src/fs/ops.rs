//! Directory operations: listing, upload, deletion and text reads.
//!
//! Every function takes a [`Root`] and a client-supplied relative path, and
//! is independently callable: nothing is cached between calls.

use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};
use crate::fs::entry::{DirEntry, EntryKind};
use crate::fs::root::Root;

/// Lists the immediate contents of the directory at `relative`.
///
/// The returned entries are in filesystem order. Entries whose type cannot
/// be read are skipped. Symlinks are reported as [`EntryKind::File`].
///
/// # Errors
///
/// - [`CoreError::OutsideRoot`] — the path escapes the root.
/// - [`CoreError::NotFound`] — the path does not exist.
/// - [`CoreError::NotADirectory`] — the path is not a directory.
/// - [`CoreError::PermissionDenied`] — read access is denied.
/// - [`CoreError::Io`] — any other I/O error.
///
/// # Examples
///
/// ```no_run
/// use dirserve_core::{list_directory, Root};
/// use std::path::Path;
///
/// let root = Root::open(Path::new("/srv/share")).unwrap();
/// for entry in list_directory(&root, "docs").unwrap() {
///     println!("{} ({:?})", entry.name, entry.kind);
/// }
/// ```
pub fn list_directory(root: &Root, relative: &str) -> CoreResult<Vec<DirEntry>> {
    let path = root.resolve(relative)?;
    read_directory(&path)
}

fn read_directory(path: &Path) -> CoreResult<Vec<DirEntry>> {
    if !path.is_dir() {
        return Err(CoreError::NotADirectory(path.to_path_buf()));
    }

    let read_dir = std::fs::read_dir(path).map_err(|e| CoreError::from_io(e, path))?;

    let mut entries = Vec::new();
    for dir_entry in read_dir {
        let dir_entry = match dir_entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        let file_type = match dir_entry.file_type() {
            Ok(ft) => ft,
            Err(_) => continue,
        };
        entries.push(DirEntry::new(
            dir_entry.file_name().to_string_lossy().into_owned(),
            EntryKind::from_file_type(file_type),
        ));
    }

    Ok(entries)
}

/// Writes `contents` as `file_name` inside the directory at `relative`.
///
/// An existing file with the same name is overwritten. Returns the absolute
/// path the file was stored under.
///
/// # Errors
///
/// - [`CoreError::InvalidName`] — `file_name` is not a single plain name.
/// - [`CoreError::OutsideRoot`] — the directory path escapes the root.
/// - [`CoreError::NotFound`] / [`CoreError::NotADirectory`] — the target
///   directory is missing or is not a directory.
/// - [`CoreError::Io`] — the write failed.
pub fn write_upload(
    root: &Root,
    relative: &str,
    file_name: &str,
    contents: &[u8],
) -> CoreResult<PathBuf> {
    if !is_valid_filename(file_name) {
        return Err(CoreError::InvalidName(file_name.to_string()));
    }

    let dir = root.resolve(relative)?;
    if !dir.is_dir() {
        return Err(CoreError::NotADirectory(dir));
    }

    let target = dir.join(file_name);
    std::fs::write(&target, contents).map_err(|e| CoreError::from_io(e, &target))?;

    Ok(target)
}

/// Deletes the file or directory at `relative`.
///
/// Directories are removed recursively. A symlink is removed itself; its
/// target is left alone.
///
/// # Errors
///
/// - [`CoreError::OutsideRoot`] — the path escapes the root or names the root.
/// - [`CoreError::NotFound`] — `relative` does not exist.
/// - [`CoreError::Io`] — any I/O failure during deletion.
pub fn delete_entry(root: &Root, relative: &str) -> CoreResult<()> {
    let path = root.resolve_entry(relative)?;

    // symlink_metadata does not follow the final link
    let meta = std::fs::symlink_metadata(&path).map_err(|e| CoreError::from_io(e, &path))?;

    if meta.is_dir() {
        std::fs::remove_dir_all(&path)?;
    } else {
        std::fs::remove_file(&path)?;
    }

    Ok(())
}

/// Reads the whole file at `relative` as text.
///
/// Invalid UTF-8 sequences are replaced with U+FFFD; binary files are not
/// detected.
///
/// # Errors
///
/// - [`CoreError::OutsideRoot`] — the path escapes the root.
/// - [`CoreError::NotFound`] — the path does not exist.
/// - [`CoreError::NotAFile`] — the path is not a regular file.
/// - [`CoreError::Io`] — the read failed.
pub fn read_text(root: &Root, relative: &str) -> CoreResult<String> {
    let path = root.resolve(relative)?;
    if !path.is_file() {
        return Err(CoreError::NotAFile(path));
    }

    let bytes = std::fs::read(&path).map_err(|e| CoreError::from_io(e, &path))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn is_valid_filename(name: &str) -> bool {
    if name.is_empty() || name == "." || name == ".." {
        return false;
    }
    if name.contains('/') || name.contains('\0') {
        return false;
    }
    #[cfg(windows)]
    if name.contains('\\') || name.contains(':') {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Root) {
        let tmp = TempDir::new().unwrap();
        let root = Root::open(tmp.path()).unwrap();
        (tmp, root)
    }

    fn names(entries: &[DirEntry]) -> Vec<&str> {
        let mut names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    #[test]
    fn list_directory_classifies_entries() {
        let (tmp, root) = setup();
        fs::write(tmp.path().join("file1.txt"), "hello").unwrap();
        fs::write(tmp.path().join("file2.txt"), "world").unwrap();
        fs::create_dir(tmp.path().join("subdir")).unwrap();

        let entries = list_directory(&root, "").unwrap();

        assert_eq!(names(&entries), vec!["file1.txt", "file2.txt", "subdir"]);
        for entry in &entries {
            let expected = if entry.name == "subdir" {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            assert_eq!(entry.kind, expected, "{}", entry.name);
        }
    }

    #[test]
    fn list_directory_empty() {
        let (_tmp, root) = setup();
        assert!(list_directory(&root, "").unwrap().is_empty());
    }

    #[test]
    fn list_directory_nested() {
        let (tmp, root) = setup();
        fs::create_dir_all(tmp.path().join("a/b")).unwrap();
        fs::write(tmp.path().join("a/b/deep.txt"), "").unwrap();

        let entries = list_directory(&root, "a/b").unwrap();
        assert_eq!(entries, vec![DirEntry::new("deep.txt", EntryKind::File)]);
    }

    #[test]
    fn list_directory_includes_hidden_files() {
        let (tmp, root) = setup();
        fs::write(tmp.path().join(".env"), "").unwrap();

        assert_eq!(names(&list_directory(&root, "").unwrap()), vec![".env"]);
    }

    #[test]
    fn list_directory_missing_is_not_found() {
        let (_tmp, root) = setup();
        let err = list_directory(&root, "nope").unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[test]
    fn list_directory_on_file_is_not_a_directory() {
        let (tmp, root) = setup();
        fs::write(tmp.path().join("file.txt"), "").unwrap();

        let err = list_directory(&root, "file.txt").unwrap_err();
        assert!(matches!(err, CoreError::NotADirectory(_)));
    }

    #[test]
    fn list_directory_rejects_traversal() {
        let (_tmp, root) = setup();
        let err = list_directory(&root, "../").unwrap_err();
        assert!(matches!(err, CoreError::OutsideRoot(_)));
    }

    #[test]
    fn write_upload_then_list_and_read() {
        let (_tmp, root) = setup();

        let stored = write_upload(&root, "", "notes.txt", b"hello").unwrap();

        assert_eq!(stored, root.path().join("notes.txt"));
        assert!(list_directory(&root, "")
            .unwrap()
            .contains(&DirEntry::new("notes.txt", EntryKind::File)));
        assert_eq!(read_text(&root, "notes.txt").unwrap(), "hello");
    }

    #[test]
    fn write_upload_into_subdirectory() {
        let (tmp, root) = setup();
        fs::create_dir(tmp.path().join("docs")).unwrap();

        write_upload(&root, "docs", "a.md", b"# title").unwrap();

        assert_eq!(fs::read_to_string(tmp.path().join("docs/a.md")).unwrap(), "# title");
    }

    #[test]
    fn write_upload_overwrites_existing_file() {
        let (tmp, root) = setup();
        fs::write(tmp.path().join("same.txt"), "old").unwrap();

        write_upload(&root, "", "same.txt", b"new").unwrap();

        assert_eq!(fs::read_to_string(tmp.path().join("same.txt")).unwrap(), "new");
    }

    #[test]
    fn write_upload_rejects_invalid_names() {
        let (tmp, root) = setup();
        for bad in ["", ".", "..", "../escape.txt", "a/b.txt", "nul\0.txt"] {
            let err = write_upload(&root, "", bad, b"x").unwrap_err();
            assert!(matches!(err, CoreError::InvalidName(_)), "{bad:?}");
        }
        assert!(fs::read_dir(tmp.path()).unwrap().next().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn write_upload_keeps_backslash_in_name() {
        let (tmp, root) = setup();

        write_upload(&root, "", "a\\b.txt", b"x").unwrap();

        assert!(tmp.path().join("a\\b.txt").is_file());
    }

    #[test]
    fn write_upload_missing_directory_is_not_found() {
        let (_tmp, root) = setup();
        let err = write_upload(&root, "missing", "a.txt", b"x").unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[test]
    fn write_upload_into_file_is_not_a_directory() {
        let (tmp, root) = setup();
        fs::write(tmp.path().join("plain"), "").unwrap();

        let err = write_upload(&root, "plain", "a.txt", b"x").unwrap_err();
        assert!(matches!(err, CoreError::NotADirectory(_)));
    }

    #[test]
    fn delete_entry_removes_file() {
        let (tmp, root) = setup();
        fs::write(tmp.path().join("doomed.txt"), "bye").unwrap();

        delete_entry(&root, "doomed.txt").unwrap();

        assert!(!tmp.path().join("doomed.txt").exists());
        assert!(list_directory(&root, "").unwrap().is_empty());
    }

    #[test]
    fn delete_entry_removes_directory_recursively() {
        let (tmp, root) = setup();
        fs::create_dir_all(tmp.path().join("tree/inner/deeper")).unwrap();
        fs::write(tmp.path().join("tree/a.txt"), "a").unwrap();
        fs::write(tmp.path().join("tree/inner/deeper/b.txt"), "b").unwrap();

        delete_entry(&root, "tree").unwrap();

        assert!(!tmp.path().join("tree").exists());
    }

    #[test]
    fn delete_entry_twice_is_not_found() {
        let (tmp, root) = setup();
        fs::write(tmp.path().join("once.txt"), "").unwrap();

        delete_entry(&root, "once.txt").unwrap();
        let err = delete_entry(&root, "once.txt").unwrap_err();

        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[test]
    fn delete_entry_below_a_file_is_not_found() {
        let (tmp, root) = setup();
        fs::write(tmp.path().join("file.txt"), "").unwrap();

        let err = delete_entry(&root, "file.txt/x").unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)), "{err:?}");

        let err = delete_entry(&root, "file.txt/x/y").unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)), "{err:?}");
        assert!(tmp.path().join("file.txt").exists());
    }

    #[test]
    fn delete_entry_refuses_root() {
        let (tmp, root) = setup();
        fs::write(tmp.path().join("keep.txt"), "").unwrap();

        let err = delete_entry(&root, "").unwrap_err();

        assert!(matches!(err, CoreError::OutsideRoot(_)));
        assert!(tmp.path().join("keep.txt").exists());
    }

    #[test]
    fn delete_entry_rejects_traversal() {
        let (_tmp, root) = setup();
        let err = delete_entry(&root, "../sibling").unwrap_err();
        assert!(matches!(err, CoreError::OutsideRoot(_)));
    }

    #[cfg(unix)]
    #[test]
    fn delete_entry_removes_symlink_not_target() {
        let (tmp, root) = setup();
        fs::create_dir(tmp.path().join("real")).unwrap();
        fs::write(tmp.path().join("real/data.txt"), "keep").unwrap();
        std::os::unix::fs::symlink(tmp.path().join("real"), tmp.path().join("link")).unwrap();

        delete_entry(&root, "link").unwrap();

        assert!(fs::symlink_metadata(tmp.path().join("link")).is_err());
        assert!(tmp.path().join("real/data.txt").exists());
    }

    #[test]
    fn read_text_decodes_utf8() {
        let (tmp, root) = setup();
        fs::write(tmp.path().join("hangul.txt"), "안녕하세요").unwrap();

        assert_eq!(read_text(&root, "hangul.txt").unwrap(), "안녕하세요");
    }

    #[test]
    fn read_text_replaces_invalid_utf8() {
        let (tmp, root) = setup();
        fs::write(tmp.path().join("bin.dat"), [b'o', b'k', 0xFF, 0xFE]).unwrap();

        let text = read_text(&root, "bin.dat").unwrap();

        assert!(text.starts_with("ok"));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn read_text_missing_is_not_found() {
        let (_tmp, root) = setup();
        let err = read_text(&root, "ghost.txt").unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[test]
    fn read_text_on_directory_is_not_a_file() {
        let (tmp, root) = setup();
        fs::create_dir(tmp.path().join("dir")).unwrap();

        let err = read_text(&root, "dir").unwrap_err();
        assert!(matches!(err, CoreError::NotAFile(_)));
    }

    #[test]
    fn valid_filename_accepts_plain_names() {
        assert!(is_valid_filename("notes.txt"));
        assert!(is_valid_filename(".hidden"));
        assert!(is_valid_filename("with space.md"));
        assert!(is_valid_filename("한글.txt"));
    }
}
