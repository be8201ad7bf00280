//! Declaration loading.
//!
//! A source is either one `.json` file holding a single root declaration, or
//! a directory whose `.json` files (not recursive) each hold one. Directory
//! entries are read in file-name order so that source order, and with it
//! every auto-placed offset, does not depend on the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use rmap_ir::Decl;

use crate::driver::DriverError;

/// One loaded root declaration and the file it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Source {
    pub path: PathBuf,
    pub decl: Decl,
}

/// Load every root declaration under `path`.
///
/// # Errors
///
/// Fails on the first unreadable or malformed file, or when a directory
/// holds no declaration files.
pub fn load_sources(path: &Path) -> Result<Vec<Source>, DriverError> {
    let files = if path.is_dir() {
        declaration_files(path)?
    } else {
        vec![path.to_path_buf()]
    };
    if files.is_empty() {
        return Err(DriverError::NoSources {
            path: path.to_path_buf(),
        });
    }

    files
        .into_iter()
        .map(|file| {
            let text = fs::read_to_string(&file).map_err(|source| DriverError::Io {
                path: file.clone(),
                source,
            })?;
            let decl = serde_json::from_str(&text).map_err(|source| DriverError::Parse {
                path: file.clone(),
                source,
            })?;
            tracing::debug!(path = %file.display(), "loaded declaration");
            Ok(Source { path: file, decl })
        })
        .collect()
}

fn declaration_files(dir: &Path) -> Result<Vec<PathBuf>, DriverError> {
    let io_error = |source| DriverError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests {
    use pretty_assertions::assert_eq;
    use rmap_ir::DeclKind;

    use super::*;

    fn write(dir: &Path, name: &str, decl: &Decl) {
        fs::write(dir.join(name), serde_json::to_string(decl).unwrap()).unwrap();
    }

    #[test]
    fn test_directory_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b.json", &Decl::named(DeclKind::Component, "B"));
        write(dir.path(), "a.json", &Decl::named(DeclKind::Component, "A"));
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let sources = load_sources(dir.path()).unwrap();
        let names: Vec<_> = sources.iter().map(|s| s.decl.name().unwrap()).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn test_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let decl = Decl::named(DeclKind::Component, "ONLY").attr("width", "32");
        write(dir.path(), "only.json", &decl);

        let sources = load_sources(&dir.path().join("only.json")).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].decl, decl);
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_sources(dir.path()),
            Err(DriverError::NoSources { .. })
        ));
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.json"), "{\"kind\": \"gizmo\"}").unwrap();
        assert!(matches!(
            load_sources(dir.path()),
            Err(DriverError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_sources(&dir.path().join("absent.json")),
            Err(DriverError::Io { .. })
        ));
    }
}
