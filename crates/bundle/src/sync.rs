//! Orchestration of the dump pipeline: materialize, clean, scan, classify.

use crate::{classify, cleanup_bundle, scan_bundle};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thaw_core::{Classification, Config, Diagnostic, Result, ScanReport, SubBundle};
use tracing::info;

/// Boundary for the collaborator that copies the on-device bundle to local
/// storage (SSH/SFTP in production). The core never touches the network
/// itself; it only requires that `dest` ends up structurally identical to
/// the remote bundle.
pub trait BundleSource {
    fn materialize(&self, dest: &Path) -> Result<()>;
}

/// Everything produced by one dump run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpReport {
    pub cleanup: Vec<Diagnostic>,
    pub scan: ScanReport,
    pub classification: Classification,
}

/// Sequences one bundle dump end to end
pub struct BundleSync {
    config: Config,
}

impl BundleSync {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Copy the remote bundle into `dest` through the collaborator boundary
    pub fn pull(&self, source: &dyn BundleSource, dest: &Path) -> Result<()> {
        info!("materializing bundle into {}", dest.display());
        source.materialize(dest)
    }

    /// Clean, scan, and classify an already materialized bundle.
    ///
    /// `main_executable` and `sub_bundles` come from the instrumentation
    /// session attached to the live process and are treated as opaque input.
    pub fn run(
        &self,
        root: &Path,
        main_executable: &str,
        sub_bundles: &[SubBundle],
    ) -> Result<DumpReport> {
        let cleanup = cleanup_bundle(root, &self.config.cleanup)?;
        let scan = scan_bundle(root, &self.config.scan)?;

        for binary in &scan.binaries {
            info!("collected binary {binary}");
        }

        let classification = classify(scan.binaries.clone(), main_executable, sub_bundles);

        info!(
            "classified {} main and {} sub-bundle binaries",
            classification.main.len(),
            classification.total() - classification.main.len()
        );

        Ok(DumpReport {
            cleanup,
            scan,
            classification,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{encrypted_macho, plain_macho};
    use thaw_core::{MH_DYLIB, MH_EXECUTE};

    struct LocalFixture {
        main: Vec<u8>,
        extension: Vec<u8>,
        library: Vec<u8>,
    }

    impl BundleSource for LocalFixture {
        fn materialize(&self, dest: &Path) -> Result<()> {
            std::fs::create_dir_all(dest.join("Plugins/Foo.appex"))?;
            std::fs::create_dir_all(dest.join("Frameworks/Lib.framework"))?;
            std::fs::create_dir_all(dest.join("SC_Info"))?;
            std::fs::write(dest.join("MainApp"), &self.main)?;
            std::fs::write(dest.join("Plugins/Foo.appex/Foo"), &self.extension)?;
            std::fs::write(dest.join("Frameworks/Lib.framework/Lib"), &self.library)?;
            std::fs::write(dest.join("iTunesMetadata.plist"), b"meta")?;
            Ok(())
        }
    }

    #[test]
    fn test_end_to_end_dump() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("bundle");

        let source = LocalFixture {
            main: encrypted_macho(MH_EXECUTE, 1),
            extension: encrypted_macho(MH_EXECUTE, 1),
            library: plain_macho(MH_DYLIB),
        };

        let sync = BundleSync::new(Config::default());
        sync.pull(&source, &root).unwrap();

        let sub_bundles = vec![SubBundle {
            id: "foo".to_string(),
            bundle_path: "Plugins/Foo.appex".to_string(),
            executable: "Foo".to_string(),
            absolute_path: "/var/containers/Foo.appex".to_string(),
        }];

        let report = sync.run(&root, "MainApp", &sub_bundles).unwrap();

        // Cleanup ran before the scan
        assert!(!root.join("iTunesMetadata.plist").exists());
        assert!(!root.join("SC_Info").exists());

        // Cleartext library excluded; partition matches the descriptors
        assert_eq!(report.scan.binaries.len(), 2);
        assert_eq!(
            report.classification.main.keys().collect::<Vec<_>>(),
            vec!["MainApp"]
        );
        assert!(report.classification.sub_bundles["foo"].contains_key("Plugins/Foo.appex/Foo"));
        assert!(report.classification.anomalies.is_empty());
        assert_eq!(report.classification.total(), 2);
    }

    #[test]
    fn test_run_on_missing_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let sync = BundleSync::new(Config::default());
        assert!(sync.run(&dir.path().join("gone"), "MainApp", &[]).is_err());
    }
}
