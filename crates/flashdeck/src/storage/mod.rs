//! Storage layer for flashdeck.
//!
//! Both stores keep their records in a single pretty-printed JSON file and
//! rewrite the whole file on every mutation. Files are opened only for the
//! duration of one read or write.

pub mod credentials;
pub mod flashcards;

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};

pub use credentials::CredentialStore;
pub use flashcards::{FlashcardStore, SeedPolicy, SubjectGroup};

/// Create the parent directory of `path` if it doesn't exist.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}

/// Read and parse a JSON file.
///
/// Any failure, including a missing file, is reported as
/// [`Error::StorageRead`]; callers decide on the fallback.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).map_err(|e| Error::storage_read(path, e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| Error::storage_read(path, e.to_string()))
}

/// Serialize `value` and overwrite `path` with it.
///
/// The content goes to a sibling temp file first and is then renamed over
/// the target, so readers never see a half-written file.
pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;

    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');

    let tmp = temp_path(path);
    if let Err(source) = fs::write(&tmp, content).and_then(|()| fs::rename(&tmp, path)) {
        let _ = fs::remove_file(&tmp);
        return Err(Error::storage_write(path, source));
    }

    debug!("Wrote {}", path.display());
    Ok(())
}

/// Write `initial` to `path` unless the file already exists.
///
/// Returns `true` if the file was created.
pub(crate) fn bootstrap_json<T: Serialize + ?Sized>(path: &Path, initial: &T) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    write_json(path, initial)?;
    Ok(true)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.json");

        let mut map = BTreeMap::new();
        map.insert("alice".to_string(), "pw1".to_string());
        write_json(&path, &map).unwrap();

        let back: BTreeMap<String, String> = read_json(&path).unwrap();
        assert_eq!(back, map);
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result: Result<Vec<String>> = read_json(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(Error::StorageRead { .. })));
    }

    #[test]
    fn test_read_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.json");
        fs::write(&path, "{ not json").unwrap();

        let result: Result<Vec<String>> = read_json(&path);
        assert!(matches!(result, Err(Error::StorageRead { .. })));
    }

    #[test]
    fn test_write_keeps_unicode_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unicode.json");
        write_json(&path, &vec!["⚛️ Ideal Gas Law".to_string()]).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("⚛️ Ideal Gas Law"));
    }

    #[test]
    fn test_bootstrap_only_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");

        assert!(bootstrap_json(&path, &BTreeMap::<String, String>::new()).unwrap());
        fs::write(&path, "{\"bob\": \"x\"}").unwrap();
        assert!(!bootstrap_json(&path, &BTreeMap::<String, String>::new()).unwrap());

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("bob"));
    }

    #[test]
    fn test_write_into_unwritable_location() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where a directory is expected
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let result = write_json(&blocker.join("data.json"), &Vec::<String>::new());
        assert!(result.is_err());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_failed_write_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let tmp = temp_path(&path);
        // Writes through the temp path hit a full device
        std::os::unix::fs::symlink("/dev/full", &tmp).unwrap();

        let err = write_json(&path, &vec!["x".to_string()]).unwrap_err();
        assert!(err.is_storage_write());
        assert!(fs::symlink_metadata(&tmp).is_err());
        assert!(!path.exists());
    }
}
