//! Bounds-checked little-endian cursor over a byte slice.
//!
//! The Mach-O containers inspected here are always little-endian, so the
//! byte order is fixed once instead of being carried per read.

use crate::error::{ParseError, ParseResult};

pub struct ByteReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn set_offset(&mut self, offset: usize) {
        self.offset = offset;
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    pub fn read_u32(&mut self) -> ParseResult<u32> {
        if self.offset + 4 > self.data.len() {
            return Err(ParseError::truncated(4, self.remaining()));
        }
        let bytes = [
            self.data[self.offset],
            self.data[self.offset + 1],
            self.data[self.offset + 2],
            self.data[self.offset + 3],
        ];
        self.offset += 4;
        Ok(u32::from_le_bytes(bytes))
    }

    pub fn read_u64(&mut self) -> ParseResult<u64> {
        if self.offset + 8 > self.data.len() {
            return Err(ParseError::truncated(8, self.remaining()));
        }
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&self.data[self.offset..self.offset + 8]);
        self.offset += 8;
        Ok(u64::from_le_bytes(bytes))
    }

    pub fn skip(&mut self, count: usize) -> ParseResult<()> {
        if self.offset + count > self.data.len() {
            return Err(ParseError::truncated(count, self.remaining()));
        }
        self.offset += count;
        Ok(())
    }
}
