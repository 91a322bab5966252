//! Bundle metadata cleanup.

use std::fs;
use std::path::Path;
use thaw_core::{CleanupConfig, Diagnostic, Error, Result};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Strip non-essential metadata from a materialized bundle.
///
/// Removes the allow-listed file names from the bundle root and the
/// allow-listed directory names recursively anywhere below it. The lists
/// are plain configuration data; no name is special-cased here. Removal
/// failures are collected as warnings, never fatal.
pub fn cleanup_bundle(root: &Path, config: &CleanupConfig) -> Result<Vec<Diagnostic>> {
    if !root.is_dir() {
        return Err(Error::bundle_root_not_found(root.display().to_string()));
    }

    let mut warnings = Vec::new();

    for file in &config.files {
        let path = root.join(file);
        match fs::remove_file(&path) {
            Ok(()) => debug!("removed {}", path.display()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                warn!("failed to remove {}: {err}", path.display());
                warnings.push(Diagnostic::new(
                    path.display().to_string(),
                    format!("remove failed: {err}"),
                ));
            }
        }
    }

    let mut walker = WalkDir::new(root).min_depth(1).into_iter();
    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("failed to walk bundle entry: {err}");
                let path = err
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                warnings.push(Diagnostic::new(path, format!("walk error: {err}")));
                continue;
            }
        };

        if !entry.file_type().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if !config.dirs.iter().any(|dir| dir.as_str() == name) {
            continue;
        }

        match fs::remove_dir_all(entry.path()) {
            Ok(()) => debug!("removed {}", entry.path().display()),
            Err(err) => {
                warn!("failed to remove {}: {err}", entry.path().display());
                warnings.push(Diagnostic::new(
                    entry.path().display().to_string(),
                    format!("remove failed: {err}"),
                ));
            }
        }

        // Contents are gone, do not descend into them
        walker.skip_current_dir();
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_allow_listed_entries() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("Plugins/Foo.appex/SC_Info")).unwrap();
        std::fs::create_dir_all(root.join("_CodeSignature")).unwrap();
        std::fs::write(root.join("iTunesMetadata.plist"), b"meta").unwrap();
        std::fs::write(root.join("embedded.mobileprovision"), b"profile").unwrap();
        std::fs::write(root.join("MainApp"), b"keep").unwrap();
        std::fs::write(root.join("Plugins/Foo.appex/SC_Info/MainApp.sinf"), b"x").unwrap();

        let warnings = cleanup_bundle(root, &CleanupConfig::default()).unwrap();

        assert!(warnings.is_empty());
        assert!(!root.join("iTunesMetadata.plist").exists());
        assert!(!root.join("embedded.mobileprovision").exists());
        assert!(!root.join("_CodeSignature").exists());
        assert!(!root.join("Plugins/Foo.appex/SC_Info").exists());
        assert!(root.join("MainApp").exists());
        assert!(root.join("Plugins/Foo.appex").exists());
    }

    #[test]
    fn test_missing_entries_are_not_errors() {
        let dir = tempfile::tempdir().unwrap();
        let warnings = cleanup_bundle(dir.path(), &CleanupConfig::default()).unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_allow_listed_file_only_removed_at_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("Nested")).unwrap();
        std::fs::write(root.join("Nested/iTunesMetadata.plist"), b"meta").unwrap();

        cleanup_bundle(root, &CleanupConfig::default()).unwrap();

        assert!(root.join("Nested/iTunesMetadata.plist").exists());
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        assert!(cleanup_bundle(&dir.path().join("gone"), &CleanupConfig::default()).is_err());
    }
}
