//! Error type for the NVAR record codec.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: Apache-2.0

use core::fmt;
use fwimage_pi::CodecError;

/// Error definitions for NVAR record parsing and serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NvarError {
    /// A record does not start with the `NVAR` signature.
    CorruptStore {
        /// Offset of the record in the store
        offset: usize,
        /// Signature found
        signature: u32,
    },
    /// A record length is smaller than the record header.
    InvalidLength {
        /// Offset of the record in the store
        offset: usize,
        /// Length field found
        length: u16,
    },
    /// A record extends past the end of the store.
    TruncatedRecord {
        /// Offset of the record in the store
        offset: usize,
        /// Bytes the record needs
        needed: u64,
        /// Bytes available from `offset`
        available: u64,
    },
    /// A record flagged as named has no nul byte after its name.
    MissingNameTerminator {
        /// Offset of the record in the store
        offset: usize,
    },
    /// A name contains a byte that is not printable ASCII.
    InvalidName {
        /// Position of the byte in the name
        position: usize,
        /// The byte found
        byte: u8,
    },
    /// A serialized record does not fit the 16-bit length field.
    RecordTooLarge {
        /// Serialized length
        length: usize,
        /// Largest length the field can hold
        max: usize,
    },
    /// A next link points outside the store or at a record before its own.
    NextOutOfRange {
        /// Offset of the linking record
        offset: usize,
        /// Absolute offset the link resolves to
        target: u64,
    },
    /// An update was linked to a record that already has a next link.
    AlreadyLinked {
        /// Offset of the linked record
        offset: usize,
        /// Relative next link it holds
        next: u32,
    },
    /// Following next links visited more records than the store can hold.
    ChainLoop {
        /// Offset the walk started at
        offset: usize,
        /// Links followed before giving up
        hops: usize,
    },
    /// A record does not fit in the remaining store capacity.
    StoreFull {
        /// Capacity of the store
        capacity: usize,
        /// Length the store would need
        needed: usize,
    },
}

impl fmt::Display for NvarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NvarError::CorruptStore { offset, signature } => {
                write!(f, "bad record signature {signature:#010x} at {offset:#x}")
            }
            NvarError::InvalidLength { offset, length } => write!(f, "record at {offset:#x} has length {length:#x}"),
            NvarError::TruncatedRecord { offset, needed, available } => {
                write!(f, "record at {offset:#x} needs {needed:#x} bytes, {available:#x} available")
            }
            NvarError::MissingNameTerminator { offset } => write!(f, "record at {offset:#x} has an unterminated name"),
            NvarError::InvalidName { position, byte } => {
                write!(f, "name byte {byte:#04x} at position {position} is not printable ASCII")
            }
            NvarError::RecordTooLarge { length, max } => write!(f, "record length {length:#x} exceeds maximum {max:#x}"),
            NvarError::NextOutOfRange { offset, target } => {
                write!(f, "record at {offset:#x} links to {target:#x}, outside the store")
            }
            NvarError::AlreadyLinked { offset, next } => {
                write!(f, "record at {offset:#x} is already linked {next:#x} bytes ahead")
            }
            NvarError::ChainLoop { offset, hops } => {
                write!(f, "update chain from {offset:#x} did not end after {hops} links")
            }
            NvarError::StoreFull { capacity, needed } => {
                write!(f, "store of {capacity:#x} bytes cannot hold {needed:#x} bytes")
            }
        }
    }
}

impl core::error::Error for NvarError {}

impl From<CodecError> for NvarError {
    fn from(value: CodecError) -> Self {
        NvarError::TruncatedRecord {
            offset: value.offset,
            needed: value.width as u64,
            available: value.len.saturating_sub(value.offset) as u64,
        }
    }
}
