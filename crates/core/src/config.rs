//! Inspector configuration

use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Bundle cleanup settings
    pub cleanup: CleanupConfig,
    /// Scan settings
    pub scan: ScanConfig,
}

/// Allow-lists of bundle metadata to strip before scanning.
///
/// Plain data owned by the orchestration layer; the defaults match what the
/// App Store leaves behind in an installed bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupConfig {
    /// Exact file names removed from the bundle root
    pub files: Vec<String>,
    /// Directory names removed recursively anywhere in the tree
    pub dirs: Vec<String>,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            files: vec![
                "iTunesMetadata.plist".to_string(),
                "embedded.mobileprovision".to_string(),
            ],
            dirs: vec!["SC_Info".to_string(), "_CodeSignature".to_string()],
        }
    }
}

/// Directory scan configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Parse files on a worker pool instead of sequentially
    pub parallel: bool,
    /// Follow symlinks while walking the bundle
    pub follow_symlinks: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            follow_symlinks: false,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| crate::Error::config(e.to_string()))
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &std::path::Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| crate::Error::config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
