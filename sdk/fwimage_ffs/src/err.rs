//! Error types and conversions for the firmware image assembly crate.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: Apache-2.0

use alloc::string::String;
use core::fmt;
use fwimage_pi::{CodecError, GuidError};
use r_efi::efi;

/// Error definitions for firmware image assembly and parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FirmwareImageError {
    /// GUID text was malformed.
    InvalidGuid(GuidError),
    /// The section type is not in the section type table.
    UnknownSectionType(u8),
    /// The file type is not in the file type table.
    UnknownFileType(u8),
    /// A dependency expression was requested for a file type that does not carry one.
    UnsupportedDepexType(u8),
    /// A dependency expression was requested with no GUIDs.
    EmptyDepex,
    /// A file was built without a name and no content hasher is available.
    MissingName,
    /// The section length does not fit its header length field.
    SectionTooLarge {
        /// Total section length, header included
        size: u64,
        /// Largest length the header can hold
        max: u64,
    },
    /// The file length does not fit its header length field.
    FileTooLarge {
        /// Total file length, header included
        size: u64,
        /// Largest length the header can hold
        max: u64,
    },
    /// The volume content exceeds the declared volume size.
    VolumeOverflow {
        /// Declared volume size
        declared: u64,
        /// Size of the content accumulated so far
        actual: u64,
    },
    /// The declared volume size is not a multiple of the block size.
    UnalignedVolumeSize {
        /// Declared volume size
        size: u64,
        /// Block size
        block_size: u32,
    },
    /// A file's length field disagrees with its byte length.
    LengthMismatch {
        /// Length recorded in the file header
        declared: u64,
        /// Number of bytes supplied
        actual: u64,
    },
    /// A section alignment or stream offset is not a multiple of 4.
    InvalidAlignment {
        /// Offset of the section stream in its file
        offset: usize,
        /// Requested section alignment
        alignment: usize,
    },
    /// The injected compressor failed.
    CompressionFailed(String),
    /// A header field has an invalid value.
    InvalidHeader {
        /// Offset of the structure in the parsed buffer
        offset: usize,
        /// What was wrong
        reason: &'static str,
    },
    /// A checksum did not verify.
    ChecksumMismatch {
        /// Offset of the structure in the parsed buffer
        offset: usize,
        /// Expected checksum or sum value
        expected: u32,
        /// Value found
        actual: u32,
    },
    /// A structure extends past the end of its buffer.
    Truncated {
        /// Offset the structure starts at
        offset: usize,
        /// Bytes the structure needs
        needed: u64,
        /// Bytes available from `offset`
        available: u64,
    },
}

impl fmt::Display for FirmwareImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FirmwareImageError::InvalidGuid(err) => write!(f, "invalid GUID: {err}"),
            FirmwareImageError::UnknownSectionType(t) => write!(f, "unknown section type {t:#04x}"),
            FirmwareImageError::UnknownFileType(t) => write!(f, "unknown file type {t:#04x}"),
            FirmwareImageError::UnsupportedDepexType(t) => {
                write!(f, "file type {t:#04x} does not take a dependency expression")
            }
            FirmwareImageError::EmptyDepex => write!(f, "dependency expression has no GUIDs"),
            FirmwareImageError::MissingName => write!(f, "file has no name and no content hasher"),
            FirmwareImageError::SectionTooLarge { size, max } => {
                write!(f, "section length {size:#x} exceeds maximum {max:#x}")
            }
            FirmwareImageError::FileTooLarge { size, max } => write!(f, "file length {size:#x} exceeds maximum {max:#x}"),
            FirmwareImageError::VolumeOverflow { declared, actual } => {
                write!(f, "volume content {actual:#x} exceeds declared size {declared:#x}")
            }
            FirmwareImageError::UnalignedVolumeSize { size, block_size } => {
                write!(f, "volume size {size:#x} is not a multiple of block size {block_size:#x}")
            }
            FirmwareImageError::LengthMismatch { declared, actual } => {
                write!(f, "file header declares {declared:#x} bytes but {actual:#x} were supplied")
            }
            FirmwareImageError::InvalidAlignment { offset, alignment } => {
                write!(f, "section stream at {offset:#x} cannot be aligned to {alignment:#x}")
            }
            FirmwareImageError::CompressionFailed(reason) => write!(f, "compression failed: {reason}"),
            FirmwareImageError::InvalidHeader { offset, reason } => write!(f, "invalid header at {offset:#x}: {reason}"),
            FirmwareImageError::ChecksumMismatch { offset, expected, actual } => {
                write!(f, "checksum mismatch at {offset:#x}: expected {expected:#x}, found {actual:#x}")
            }
            FirmwareImageError::Truncated { offset, needed, available } => {
                write!(f, "structure at {offset:#x} needs {needed:#x} bytes, {available:#x} available")
            }
        }
    }
}

impl core::error::Error for FirmwareImageError {}

impl From<GuidError> for FirmwareImageError {
    fn from(value: GuidError) -> Self {
        FirmwareImageError::InvalidGuid(value)
    }
}

impl From<CodecError> for FirmwareImageError {
    fn from(value: CodecError) -> Self {
        FirmwareImageError::Truncated {
            offset: value.offset,
            needed: value.width as u64,
            available: value.len.saturating_sub(value.offset) as u64,
        }
    }
}

impl From<FirmwareImageError> for efi::Status {
    fn from(value: FirmwareImageError) -> Self {
        match value {
            FirmwareImageError::InvalidGuid(_)
            | FirmwareImageError::UnknownSectionType(_)
            | FirmwareImageError::UnknownFileType(_)
            | FirmwareImageError::EmptyDepex
            | FirmwareImageError::MissingName
            | FirmwareImageError::UnalignedVolumeSize { .. }
            | FirmwareImageError::InvalidAlignment { .. }
            | FirmwareImageError::LengthMismatch { .. } => efi::Status::INVALID_PARAMETER,
            FirmwareImageError::UnsupportedDepexType(_) => efi::Status::UNSUPPORTED,
            FirmwareImageError::SectionTooLarge { .. }
            | FirmwareImageError::FileTooLarge { .. }
            | FirmwareImageError::VolumeOverflow { .. } => efi::Status::BAD_BUFFER_SIZE,
            FirmwareImageError::CompressionFailed(_) => efi::Status::DEVICE_ERROR,
            FirmwareImageError::InvalidHeader { .. }
            | FirmwareImageError::ChecksumMismatch { .. }
            | FirmwareImageError::Truncated { .. } => efi::Status::VOLUME_CORRUPTED,
        }
    }
}
