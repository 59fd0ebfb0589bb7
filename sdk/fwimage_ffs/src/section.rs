//! Section encoding and decoding for UEFI Firmware File System (FFS) sections.
//!
//! A section is a common section header (24-bit total length and a type byte) followed by its
//! payload. This module builds sections from payload bytes, builds the RAW pad sections used as
//! length fillers, and walks a serialized section stream.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: Apache-2.0
//!
use alloc::vec::Vec;
use core::mem;

use fwimage_pi::{
    codec::{self, MAX_U24},
    fw_fs::ffs::section::{self, header},
};
use r_efi::efi;
use zerocopy::{FromBytes, IntoBytes};

use crate::{config::HeaderFormat, FirmwareImageError};

/// Size of a standard common section header.
pub const HEADER_SIZE: usize = mem::size_of::<section::Header>();

/// Size of an extended common section header.
pub const EXTENDED_HEADER_SIZE: usize = mem::size_of::<section::Header2>();

/// Build a section of `section_type` around `payload` using a standard header.
///
/// Fails with [`FirmwareImageError::UnknownSectionType`] for a type outside the section table and with
/// [`FirmwareImageError::SectionTooLarge`] when the total length does not fit 24 bits. A length of exactly
/// 0xFFFFFF is rejected as well, since that size field marks an extended header.
pub fn make_section(section_type: u8, payload: &[u8]) -> Result<Vec<u8>, FirmwareImageError> {
    make_section_with_format(section_type, payload, HeaderFormat::Standard)
}

/// Build a section of `section_type` around `payload`.
///
/// With [`HeaderFormat::Extended`] a section whose length does not fit 24 bits gets an
/// `EFI_COMMON_SECTION_HEADER2` with the length in the 32-bit extended field. Sections that do fit
/// always use the standard header. The 24-bit value 0xFFFFFF is reserved for the extended marker, so
/// a standard length of exactly 0xFFFFFF takes the extended header too.
pub fn make_section_with_format(
    section_type: u8,
    payload: &[u8],
    format: HeaderFormat,
) -> Result<Vec<u8>, FirmwareImageError> {
    if section::Type::from_raw(section_type).is_none() {
        return Err(FirmwareImageError::UnknownSectionType(section_type));
    }

    let standard_size = payload.len() as u64 + HEADER_SIZE as u64;
    if standard_size < MAX_U24 as u64 {
        let mut buf = Vec::with_capacity(standard_size as usize);
        buf.extend_from_slice(section::Header { size: codec::write24(standard_size as u32), section_type }.as_bytes());
        buf.extend_from_slice(payload);
        log::debug!("section type {section_type:#04x} length {standard_size:#x}");
        return Ok(buf);
    }

    let extended_size = payload.len() as u64 + EXTENDED_HEADER_SIZE as u64;
    match format {
        HeaderFormat::Standard => {
            Err(FirmwareImageError::SectionTooLarge { size: standard_size, max: MAX_U24 as u64 })
        }
        HeaderFormat::Extended if extended_size > u32::MAX as u64 => {
            Err(FirmwareImageError::SectionTooLarge { size: extended_size, max: u32::MAX as u64 })
        }
        HeaderFormat::Extended => {
            let header = section::Header2 {
                header: section::Header { size: codec::write24(MAX_U24), section_type },
                extended_size: (extended_size as u32).into(),
            };
            let mut buf = Vec::with_capacity(extended_size as usize);
            buf.extend_from_slice(header.as_bytes());
            buf.extend_from_slice(payload);
            log::debug!("section type {section_type:#04x} extended length {extended_size:#x}");
            Ok(buf)
        }
    }
}

/// Build a RAW section of exactly `size` bytes, filled with zeros.
///
/// Returns an empty buffer when `size` is smaller than a section header.
pub fn make_pad_section(size: usize) -> Result<Vec<u8>, FirmwareImageError> {
    if size < HEADER_SIZE {
        return Ok(Vec::new());
    }
    log::trace!("pad section of {size:#x} bytes");
    make_section(section::raw_type::RAW, &alloc::vec![0u8; size - HEADER_SIZE])
}

fn ucs2_nul_terminated(text: &str) -> Vec<u8> {
    text.encode_utf16().chain(core::iter::once(0)).flat_map(u16::to_le_bytes).collect()
}

/// Build a USER_INTERFACE section holding `name` as a nul-terminated UCS-2 string.
pub fn ui_section(name: &str) -> Result<Vec<u8>, FirmwareImageError> {
    make_section(section::raw_type::USER_INTERFACE, &ucs2_nul_terminated(name))
}

/// Build a VERSION section holding `build_number` followed by `text` as a nul-terminated UCS-2 string.
pub fn version_section(build_number: u16, text: &str) -> Result<Vec<u8>, FirmwareImageError> {
    let mut payload = Vec::from(header::Version { build_number: build_number.into() }.as_bytes());
    payload.extend(ucs2_nul_terminated(text));
    make_section(section::raw_type::VERSION, &payload)
}

/// A section parsed out of a byte buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionRef<'a> {
    section_type: u8,
    header_size: usize,
    data: &'a [u8],
}

impl<'a> SectionRef<'a> {
    /// The raw section type byte.
    pub fn section_type_raw(&self) -> u8 {
        self.section_type
    }

    /// The section type when it is in the section table.
    pub fn section_type(&self) -> Option<section::Type> {
        section::Type::from_raw(self.section_type)
    }

    /// Size of the common header (4, or 8 for an extended header).
    pub fn header_size(&self) -> usize {
        self.header_size
    }

    /// Total section length, header included.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// The payload following the common header.
    pub fn payload(&self) -> &'a [u8] {
        &self.data[self.header_size..]
    }

    /// The full serialized section.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    /// For a GUID-defined section, the GUID-defined header fields and the data at `data_offset`.
    pub fn guid_defined(&self) -> Result<Option<(header::GuidDefined, &'a [u8])>, FirmwareImageError> {
        if self.section_type != section::raw_type::encapsulated::GUID_DEFINED {
            return Ok(None);
        }
        let (guid_header, _) = header::GuidDefined::read_from_prefix(self.payload()).map_err(|_| {
            FirmwareImageError::Truncated {
                offset: self.header_size,
                needed: mem::size_of::<header::GuidDefined>() as u64,
                available: self.payload().len() as u64,
            }
        })?;
        let data_offset = guid_header.data_offset.get() as usize;
        match self.data.get(data_offset..) {
            Some(data) if data_offset >= self.header_size + mem::size_of::<header::GuidDefined>() => {
                Ok(Some((guid_header, data)))
            }
            _ => Err(FirmwareImageError::InvalidHeader { offset: 0, reason: "GUID-defined data offset out of range" }),
        }
    }

    /// For a GUID-defined section, the section definition GUID.
    pub fn definition_guid(&self) -> Option<efi::Guid> {
        self.guid_defined().ok().flatten().map(|(h, _)| efi::Guid::from_bytes(&h.section_definition_guid))
    }
}

/// Parse the section at the start of `buf`.
///
/// A standard header with all-ones length is read as an extended header.
pub fn parse_section(buf: &[u8]) -> Result<SectionRef<'_>, FirmwareImageError> {
    let (header, _) = section::Header::read_from_prefix(buf).map_err(|_| FirmwareImageError::Truncated {
        offset: 0,
        needed: HEADER_SIZE as u64,
        available: buf.len() as u64,
    })?;

    let (header_size, size) = match codec::read24(&header.size, 0)? {
        MAX_U24 => (EXTENDED_HEADER_SIZE, codec::read32(buf, HEADER_SIZE)? as usize),
        size => (HEADER_SIZE, size as usize),
    };

    if size < header_size {
        return Err(FirmwareImageError::InvalidHeader { offset: 0, reason: "section length smaller than its header" });
    }
    let data = buf.get(..size).ok_or(FirmwareImageError::Truncated {
        offset: 0,
        needed: size as u64,
        available: buf.len() as u64,
    })?;

    Ok(SectionRef { section_type: header.section_type, header_size, data })
}

/// Iterator over the sections of a 4-byte aligned section stream.
///
/// Offsets are relative to the start of the stream, which must itself be 4-byte aligned in the
/// enclosing file. Iteration ends at the end of the buffer or after the first error.
pub struct SectionIterator<'a> {
    buf: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> SectionIterator<'a> {
    /// Iterate the sections in `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0, failed: false }
    }
}

impl<'a> Iterator for SectionIterator<'a> {
    type Item = Result<SectionRef<'a>, FirmwareImageError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.offset = crate::align::align_up(self.offset, 4);
        if self.failed || self.offset >= self.buf.len() {
            return None;
        }
        match parse_section(&self.buf[self.offset..]) {
            Ok(section) => {
                self.offset += section.size();
                Some(Ok(section))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(relocate(err, self.offset)))
            }
        }
    }
}

/// Shift the offset carried by a parse error by `base`.
pub(crate) fn relocate(err: FirmwareImageError, base: usize) -> FirmwareImageError {
    match err {
        FirmwareImageError::Truncated { offset, needed, available } => {
            FirmwareImageError::Truncated { offset: offset + base, needed, available }
        }
        FirmwareImageError::InvalidHeader { offset, reason } => {
            FirmwareImageError::InvalidHeader { offset: offset + base, reason }
        }
        FirmwareImageError::ChecksumMismatch { offset, expected, actual } => {
            FirmwareImageError::ChecksumMismatch { offset: offset + base, expected, actual }
        }
        other => other,
    }
}
