//! Mach-O header and load-command walk.
//!
//! Only the pieces needed to locate encryption metadata are interpreted: the
//! fixed header, the `(cmd, cmdsize)` prefix of every load command, and the
//! LC_ENCRYPTION_INFO_64 payload. Everything else is skipped by its declared
//! size; load commands are variable-length and self-describing, so the
//! cursor never assumes a fixed stride.

use crate::error::{ParseError, ParseResult};
use crate::reader::ByteReader;
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;
use thaw_core::MachBinary;
use tracing::debug;

/// Magic number for 64-bit little-endian Mach-O binaries
pub const MH_MAGIC_64: u32 = 0xFEEDFACF;

/// Load command carrying encryption metadata in 64-bit binaries
pub const LC_ENCRYPTION_INFO_64: u32 = 0x2C;

/// Size of the `(cmd, cmdsize)` load-command prefix
const LOAD_COMMAND_HEADER_SIZE: usize = 8;

/// Declared size of a well-formed LC_ENCRYPTION_INFO_64 command: the prefix
/// plus cryptoff, cryptsize, cryptid, and pad
const ENCRYPTION_INFO_COMMAND_SIZE: usize = 24;

/// Parse a Mach-O container from raw bytes.
///
/// Returns `None` for anything that is not a well-formed 64-bit Mach-O
/// file: wrong magic, truncated header or command stream, or a command
/// whose declared size is impossible. Malformed input is never an error
/// here so a single bad file cannot abort a bundle-wide scan.
///
/// The returned record's `path` is left empty for the caller to fill, and
/// its crypt fields stay zero unless an encryption-info command is present.
/// When several encryption-info commands occur, the last one wins.
pub fn parse(data: &[u8]) -> Option<MachBinary> {
    match parse_inner(data) {
        Ok(binary) => Some(binary),
        Err(err) => {
            debug!("not a parsable Mach-O container: {err}");
            None
        }
    }
}

fn parse_inner(data: &[u8]) -> ParseResult<MachBinary> {
    let mut reader = ByteReader::new(data);

    // Header: magic, cputype, cpusubtype, filetype, ncmds, sizeofcmds,
    // flags, reserved
    let magic = reader.read_u32()?;
    if magic != MH_MAGIC_64 {
        return Err(ParseError::malformed(format!(
            "magic {magic:#010x} is not MH_MAGIC_64"
        )));
    }

    let _cputype = reader.read_u32()?;
    let _cpusubtype = reader.read_u32()?;
    let file_type = reader.read_u32()?;
    let ncmds = reader.read_u32()?;
    let _sizeofcmds = reader.read_u32()?;
    let _flags = reader.read_u32()?;
    let _reserved = reader.read_u32()?;

    let mut binary = MachBinary {
        path: String::new(),
        file_type,
        crypt_command_offset: 0,
        crypt_offset: 0,
        crypt_size: 0,
        crypt_id: 0,
    };

    for _ in 0..ncmds {
        let cmd_start = reader.offset();
        let cmd = reader.read_u32()?;
        let cmdsize = reader.read_u32()? as usize;

        if cmdsize < LOAD_COMMAND_HEADER_SIZE {
            return Err(ParseError::malformed(format!(
                "cmdsize {cmdsize} smaller than command header"
            )));
        }

        // The whole declared command must fit in the file, interpreted or not
        let payload = cmdsize - LOAD_COMMAND_HEADER_SIZE;
        if payload > reader.remaining() {
            return Err(ParseError::truncated(payload, reader.remaining()));
        }

        if cmd == LC_ENCRYPTION_INFO_64 {
            // A declared size below the fixed payload would make the field
            // reads swallow bytes of the next command
            if cmdsize < ENCRYPTION_INFO_COMMAND_SIZE {
                return Err(ParseError::malformed(format!(
                    "encryption info cmdsize {cmdsize} below fixed payload"
                )));
            }

            // Payload: cryptoff, cryptsize, cryptid, pad
            let crypt_offset = reader.read_u32()?;
            let crypt_size = reader.read_u32()?;
            let crypt_id = reader.read_u32()?;

            binary.crypt_command_offset = cmd_start as u64;
            binary.crypt_offset = crypt_offset;
            binary.crypt_size = crypt_size;
            binary.crypt_id = crypt_id;
        }

        // cmdsize is authoritative, including for encryption-info commands
        // padded beyond their fixed payload.
        reader.set_offset(cmd_start + cmdsize);
    }

    Ok(binary)
}

/// Parse a Mach-O container from a file on disk.
///
/// Only I/O failures surface as errors; structural problems yield
/// `Ok(None)` like [`parse`]. The record's `path` is set to the given path.
pub fn parse_file(path: &Path) -> ParseResult<Option<MachBinary>> {
    let file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Ok(None);
    }

    let mmap = unsafe { Mmap::map(&file)? };

    Ok(parse(&mmap).map(|mut binary| {
        binary.path = path.to_string_lossy().into_owned();
        binary
    }))
}
