//! Recursive bundle scan for encrypted Mach-O binaries.

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thaw_core::{Diagnostic, Error, MachBinary, Result, ScanConfig, ScanReport};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Walk every regular file under `root` and collect the Mach-O binaries
/// whose encryption system ID is nonzero, with paths made relative to
/// `root`.
///
/// Per-file failures (unreadable files, walk errors below the root) are
/// logged, recorded in [`ScanReport::skipped`], and never abort the scan.
/// A missing, non-directory, or unreadable root is fatal: a scan that
/// cannot enter the bundle at all must not report "nothing encrypted".
/// Binaries are sorted by path so output is deterministic regardless of
/// traversal order.
pub fn scan_bundle(root: &Path, config: &ScanConfig) -> Result<ScanReport> {
    if !root.is_dir() {
        return Err(Error::bundle_root_not_found(root.display().to_string()));
    }

    let mut report = ScanReport::new();
    let mut files: Vec<PathBuf> = Vec::new();

    for entry in WalkDir::new(root).follow_links(config.follow_symlinks) {
        match entry {
            Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
            Ok(_) => {}
            Err(err) if err.depth() == 0 || err.path() == Some(root) => {
                // The root itself could not be traversed
                return Err(match err.into_io_error() {
                    Some(io) => Error::Io(io),
                    None => Error::bundle_root_not_found(root.display().to_string()),
                });
            }
            Err(err) => {
                warn!("failed to walk bundle entry: {err}");
                let path = err
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                report.skipped.push(Diagnostic::new(path, format!("walk error: {err}")));
            }
        }
    }

    debug!("scanning {} files under {}", files.len(), root.display());

    // Each file parse is independent, so the parallel path just merges
    // per-worker results after all workers complete.
    let visits: Vec<std::result::Result<Option<MachBinary>, Diagnostic>> = if config.parallel {
        files.par_iter().map(|path| visit_file(root, path)).collect()
    } else {
        files.iter().map(|path| visit_file(root, path)).collect()
    };

    for visit in visits {
        match visit {
            Ok(Some(binary)) => report.binaries.push(binary),
            Ok(None) => {}
            Err(diagnostic) => report.skipped.push(diagnostic),
        }
    }

    report.binaries.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(report)
}

/// Parse one file, filtering out non-containers and cleartext binaries.
fn visit_file(root: &Path, path: &Path) -> std::result::Result<Option<MachBinary>, Diagnostic> {
    match thaw_macho::parse_file(path) {
        Ok(Some(mut binary)) if binary.is_encrypted() => {
            binary.path = path
                .strip_prefix(root)
                .unwrap_or(path)
                .to_string_lossy()
                .into_owned();
            Ok(Some(binary))
        }
        Ok(_) => Ok(None),
        Err(err) => {
            warn!("failed to parse {}: {err}", path.display());
            Err(Diagnostic::new(
                path.display().to_string(),
                format!("parse failed: {err}"),
            ))
        }
    }
}
