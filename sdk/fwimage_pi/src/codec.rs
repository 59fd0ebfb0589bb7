//! Fixed-width little-endian field codecs.
//!
//! Reads are bounds-checked against the slice and report the failing offset. Writes produce fixed-width
//! byte arrays; the 24 and 32-bit writers truncate to the field width, so callers validate magnitude
//! before encoding a length.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: Apache-2.0
//!
use core::fmt;
use scroll::{LE, Pread};

/// Largest value representable in a 24-bit length field.
pub const MAX_U24: u32 = 0x00FF_FFFF;

/// A read ran past the end of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecError {
    /// Offset the read started at.
    pub offset: usize,
    /// Width of the field in bytes.
    pub width: usize,
    /// Length of the buffer that was read.
    pub len: usize,
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-byte read at offset {:#x} exceeds buffer of {:#x} bytes", self.width, self.offset, self.len)
    }
}

impl core::error::Error for CodecError {}

fn out_of_range(buf: &[u8], offset: usize, width: usize) -> CodecError {
    CodecError { offset, width, len: buf.len() }
}

/// Read a little-endian `u16` at `offset`.
pub fn read16(buf: &[u8], offset: usize) -> Result<u16, CodecError> {
    buf.pread_with::<u16>(offset, LE).map_err(|_| out_of_range(buf, offset, 2))
}

/// Read a little-endian 24-bit value at `offset`.
pub fn read24(buf: &[u8], offset: usize) -> Result<u32, CodecError> {
    let end = offset.checked_add(3).ok_or_else(|| out_of_range(buf, offset, 3))?;
    match buf.get(offset..end) {
        Some(bytes) => Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], 0])),
        None => Err(out_of_range(buf, offset, 3)),
    }
}

/// Read a little-endian `u32` at `offset`.
pub fn read32(buf: &[u8], offset: usize) -> Result<u32, CodecError> {
    buf.pread_with::<u32>(offset, LE).map_err(|_| out_of_range(buf, offset, 4))
}

/// Read a little-endian `u64` at `offset`.
pub fn read64(buf: &[u8], offset: usize) -> Result<u64, CodecError> {
    buf.pread_with::<u64>(offset, LE).map_err(|_| out_of_range(buf, offset, 8))
}

/// Encode `value` as two little-endian bytes.
pub fn write16(value: u16) -> [u8; 2] {
    value.to_le_bytes()
}

/// Encode the low 24 bits of `value` as three little-endian bytes.
pub fn write24(value: u32) -> [u8; 3] {
    let bytes = value.to_le_bytes();
    [bytes[0], bytes[1], bytes[2]]
}

/// Encode the low 32 bits of `value` as four little-endian bytes.
pub fn write32(value: u64) -> [u8; 4] {
    (value as u32).to_le_bytes()
}

/// Encode `value` as eight little-endian bytes.
pub fn write64(value: u64) -> [u8; 8] {
    value.to_le_bytes()
}

/// Wrapping byte sum of `bytes`.
pub fn sum8(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |sum, value| sum.wrapping_add(*value))
}

/// Wrapping sum of the little-endian 16-bit words in `bytes`. A trailing odd byte is ignored.
pub fn sum16(bytes: &[u8]) -> u16 {
    bytes.chunks_exact(2).fold(0u16, |sum, word| sum.wrapping_add(u16::from_le_bytes([word[0], word[1]])))
}
