//! Ownership classification of scanned binaries.

use std::collections::HashMap;
use thaw_core::{Classification, Diagnostic, MachBinary, SubBundle};
use tracing::warn;

/// Partition binaries between the main app and its sub-bundles.
///
/// A binary belongs to the first descriptor, in the order supplied, whose
/// `bundle_path` prefixes its path. Descriptor order comes from the
/// instrumentation session and is authoritative, so this is deliberately
/// first-match rather than longest-prefix-match.
///
/// An unclaimed executable whose path is not `main_executable` is an
/// anomaly (typically a sub-bundle requiring a newer OS than the device
/// runs, which leaves its binary encrypted); it is reported and still
/// placed in the main group. Nothing is ever dropped: every input record
/// lands in exactly one group.
pub fn classify(
    binaries: Vec<MachBinary>,
    main_executable: &str,
    sub_bundles: &[SubBundle],
) -> Classification {
    let mut main = HashMap::new();
    let mut grouped: HashMap<String, HashMap<String, MachBinary>> = HashMap::new();
    let mut anomalies = Vec::new();

    'next: for binary in binaries {
        for sub_bundle in sub_bundles {
            if binary.path.starts_with(&sub_bundle.bundle_path) {
                grouped
                    .entry(sub_bundle.id.clone())
                    .or_default()
                    .insert(binary.path.clone(), binary);
                continue 'next;
            }
        }

        if binary.is_executable() && binary.path != main_executable {
            warn!(
                "executable {} is not within any sub-bundle and is not the \
                 main executable; a sub-bundle likely requires a newer OS \
                 version and its binary will stay encrypted",
                binary.path
            );
            anomalies.push(Diagnostic::new(
                binary.path.clone(),
                "executable outside any sub-bundle",
            ));
        }

        main.insert(binary.path.clone(), binary);
    }

    Classification {
        main,
        sub_bundles: grouped,
        anomalies,
    }
}
