//! Bundle scanning, cleanup, and encrypted-binary classification.
//!
//! Works on an already materialized local copy of an application bundle:
//! strips non-essential metadata, finds every Mach-O file still carrying an
//! active encryption record, and partitions those binaries between the main
//! app and its sub-bundles.

pub mod classify;
pub mod cleanup;
pub mod scanner;
pub mod sync;

pub use classify::classify;
pub use cleanup::cleanup_bundle;
pub use scanner::scan_bundle;
pub use sync::{BundleSource, BundleSync, DumpReport};

#[cfg(test)]
pub(crate) mod testutil {
    use thaw_macho::{LC_ENCRYPTION_INFO_64, MH_MAGIC_64};

    /// Minimal 64-bit Mach-O image with one encryption-info command
    pub fn encrypted_macho(file_type: u32, crypt_id: u32) -> Vec<u8> {
        let mut data = header(file_type, 1, 24);
        data.extend_from_slice(&LC_ENCRYPTION_INFO_64.to_le_bytes());
        data.extend_from_slice(&24u32.to_le_bytes()); // cmdsize
        data.extend_from_slice(&0x4000u32.to_le_bytes()); // cryptoff
        data.extend_from_slice(&0x8000u32.to_le_bytes()); // cryptsize
        data.extend_from_slice(&crypt_id.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes()); // pad
        data
    }

    /// Mach-O image whose encryption record reports crypt_id 0
    pub fn plain_macho(file_type: u32) -> Vec<u8> {
        encrypted_macho(file_type, 0)
    }

    fn header(file_type: u32, ncmds: u32, sizeofcmds: u32) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&MH_MAGIC_64.to_le_bytes());
        data.extend_from_slice(&0x0100000Cu32.to_le_bytes()); // cputype arm64
        data.extend_from_slice(&0u32.to_le_bytes()); // cpusubtype
        data.extend_from_slice(&file_type.to_le_bytes());
        data.extend_from_slice(&ncmds.to_le_bytes());
        data.extend_from_slice(&sizeofcmds.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes()); // flags
        data.extend_from_slice(&0u32.to_le_bytes()); // reserved
        data
    }
}
