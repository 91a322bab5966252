//! Mach-O container parsing for encryption metadata.
//!
//! Reads the 64-bit header and the self-describing load-command stream by
//! explicit byte offsets, extracting the LC_ENCRYPTION_INFO_64 payload when
//! present. Not a general Mach-O SDK: relocations, symbol tables, and code
//! signatures are out of scope.

pub mod error;
pub mod macho;
pub mod reader;

pub use error::{ParseError, ParseResult};
pub use macho::{parse, parse_file, LC_ENCRYPTION_INFO_64, MH_MAGIC_64};
