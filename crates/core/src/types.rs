//! Common types used throughout the bundle inspector

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Mach-O file type for standalone executables
pub const MH_EXECUTE: u32 = 2;

/// Mach-O file type for dynamic libraries
pub const MH_DYLIB: u32 = 6;

/// One parsed Mach-O binary and its encryption status.
///
/// Created once per file during a scan and immutable afterwards. A
/// `crypt_id` of zero means the file carries no active encryption; the
/// scanner filters such records out, the parser does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachBinary {
    /// Path relative to the bundle root
    pub path: String,
    /// File type taken verbatim from the Mach-O header
    pub file_type: u32,
    /// Absolute file offset of the LC_ENCRYPTION_INFO_64 command, 0 if absent
    pub crypt_command_offset: u64,
    /// Start of the encrypted byte range
    pub crypt_offset: u32,
    /// Size of the encrypted byte range
    pub crypt_size: u32,
    /// Encryption system ID, nonzero while the range is still encrypted
    pub crypt_id: u32,
}

impl MachBinary {
    pub fn is_executable(&self) -> bool {
        self.file_type == MH_EXECUTE
    }

    pub fn is_encrypted(&self) -> bool {
        self.crypt_id != 0
    }
}

impl std::fmt::Display for MachBinary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (type {}, crypt offset {:#x}, size {:#x}, id {})",
            self.path, self.file_type, self.crypt_offset, self.crypt_size, self.crypt_id
        )
    }
}

/// A sub-bundle (app extension) descriptor supplied by the instrumentation
/// session. Opaque input to the classifier, validated only by prefix match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubBundle {
    /// Unique identifier
    pub id: String,
    /// Directory prefix, relative to the bundle root, owning nested binaries
    #[serde(rename = "path")]
    pub bundle_path: String,
    /// Executable name, informational only
    pub executable: String,
    /// Absolute on-device path, informational only
    #[serde(rename = "absolutePath")]
    pub absolute_path: String,
}

/// A non-fatal finding collected during scanning or classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub path: String,
    pub detail: String,
}

impl Diagnostic {
    pub fn new(path: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            detail: detail.into(),
        }
    }
}

/// Result of one bundle scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    /// Encrypted binaries found under the root, sorted by path
    pub binaries: Vec<MachBinary>,
    /// Files that could not be read or parsed and were skipped
    pub skipped: Vec<Diagnostic>,
}

impl ScanReport {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            binaries: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl Default for ScanReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Partition of scanned binaries between the main app and its sub-bundles.
///
/// Every input record appears in exactly one group; anomalies are reported
/// in addition to, never instead of, placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    /// Binaries owned by the main app, keyed by relative path
    pub main: HashMap<String, MachBinary>,
    /// Binaries owned by each sub-bundle, keyed by sub-bundle id then path
    pub sub_bundles: HashMap<String, HashMap<String, MachBinary>>,
    /// Executables found outside any sub-bundle that are not the declared
    /// main executable
    pub anomalies: Vec<Diagnostic>,
}

impl Classification {
    /// Total number of binaries across all groups
    pub fn total(&self) -> usize {
        self.main.len() + self.sub_bundles.values().map(HashMap::len).sum::<usize>()
    }
}
