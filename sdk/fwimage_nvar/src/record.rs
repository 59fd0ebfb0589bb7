//! NVAR record encoding and decoding.
//!
//! A record is a 10-byte header followed by its body:
//!
//! | Offset | Size | Field                                       |
//! |--------|------|---------------------------------------------|
//! | 0x00   | 4    | Signature, `NVAR`                           |
//! | 0x04   | 2    | Record length, header included              |
//! | 0x06   | 3    | Next record, relative to this record's start |
//! | 0x09   | 1    | Attributes                                  |
//!
//! When [`attributes::ASCII_NAME`] is set the body starts with a GUID store index and a nul-terminated
//! ASCII name; the rest of the body is the variable data.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: Apache-2.0
//!
use alloc::{
    string::{String, ToString},
    vec::Vec,
};
use core::fmt;

use fwimage_pi::codec::{self, MAX_U24};

use crate::NvarError;

/// Record attribute bits.
pub mod attributes {
    /// The variable is visible at runtime.
    pub const RUNTIME: u8 = 0x01;
    /// The body starts with a GUID store index and a nul-terminated ASCII name.
    pub const ASCII_NAME: u8 = 0x02;
    /// The vendor GUID is stored in full instead of as a store index. Only the index form is decoded.
    pub const GUID: u8 = 0x04;
    /// The record holds only data and updates an earlier named record.
    pub const DATA_ONLY: u8 = 0x08;
    /// An extended header trails the data. Not interpreted here.
    pub const EXT_HEADER: u8 = 0x10;
    /// Hardware error record variable.
    pub const HW_ERROR_RECORD: u8 = 0x20;
    /// Authenticated write access variable.
    pub const AUTH_WRITE: u8 = 0x40;
    /// The record is live. Cleared when a record is deleted.
    pub const VALID: u8 = 0x80;
}

/// `NVAR` read as a little-endian `u32`.
pub const SIGNATURE: u32 = u32::from_le_bytes(*b"NVAR");

/// Signature value of erased space after the last record.
pub const END_OF_REGION: u32 = 0xFFFF_FFFF;

/// Next-field value of a record with no successor.
pub const NO_NEXT: u32 = MAX_U24;

/// Size of the record header.
pub const HEADER_SIZE: usize = 10;

const SIGNATURE_SIZE: usize = 4;
const LENGTH_OFFSET: usize = 4;
pub(crate) const NEXT_OFFSET: usize = 6;
const ATTRIBUTES_OFFSET: usize = 9;

/// The name part of a named record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableName {
    /// Index of the vendor GUID in the store's GUID table.
    pub guid_index: u8,
    /// Printable ASCII variable name.
    pub name: String,
}

/// An owned record, ready to serialize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NvarRecord {
    /// Attribute byte. [`attributes::ASCII_NAME`] and [`attributes::DATA_ONLY`] are recomputed on
    /// serialization from whether `name` is set.
    pub attributes: u8,
    /// Vendor GUID index and variable name.
    pub name: Option<VariableName>,
    /// Variable data.
    pub data: Vec<u8>,
}

impl NvarRecord {
    /// A valid named variable.
    pub fn named(guid_index: u8, name: &str, data: &[u8]) -> Self {
        Self {
            attributes: attributes::VALID | attributes::ASCII_NAME,
            name: Some(VariableName { guid_index, name: name.to_string() }),
            data: data.to_vec(),
        }
    }

    /// A valid data-only record, as written when a variable is updated in place.
    pub fn data_only(data: &[u8]) -> Self {
        Self { attributes: attributes::VALID | attributes::DATA_ONLY, name: None, data: data.to_vec() }
    }
}

/// Encode `record` with its next field set to [`NO_NEXT`].
///
/// Links depend on where records end up, so they are never carried through serialization.
pub fn serialize(record: &NvarRecord) -> Result<Vec<u8>, NvarError> {
    let mut attrs = record.attributes;
    let mut body = Vec::new();
    match &record.name {
        Some(VariableName { guid_index, name }) => {
            if let Some((position, byte)) = name.bytes().enumerate().find(|(_, b)| !(0x20..=0x7E).contains(b)) {
                return Err(NvarError::InvalidName { position, byte });
            }
            attrs = (attrs | attributes::ASCII_NAME) & !attributes::DATA_ONLY;
            body.push(*guid_index);
            body.extend_from_slice(name.as_bytes());
            body.push(0);
        }
        None => attrs &= !attributes::ASCII_NAME,
    }
    body.extend_from_slice(&record.data);

    let length = HEADER_SIZE + body.len();
    let length_field =
        u16::try_from(length).map_err(|_| NvarError::RecordTooLarge { length, max: u16::MAX as usize })?;

    let mut buf = Vec::with_capacity(length);
    buf.extend_from_slice(&codec::write32(SIGNATURE as u64));
    buf.extend_from_slice(&codec::write16(length_field));
    buf.extend_from_slice(&codec::write24(NO_NEXT));
    buf.push(attrs);
    buf.extend_from_slice(&body);
    Ok(buf)
}

/// A record parsed in place from a store buffer.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RecordRef<'a> {
    offset: usize,
    length: u16,
    next: u32,
    attributes: u8,
    name: Option<(u8, &'a [u8])>,
    data: &'a [u8],
}

/// Parse the record at `offset` in `buffer`.
///
/// Returns `Ok(None)` at the end of the region: an all-ones signature, or no bytes left.
pub fn parse(buffer: &[u8], offset: usize) -> Result<Option<RecordRef<'_>>, NvarError> {
    let remaining = buffer.get(offset..).ok_or(NvarError::TruncatedRecord {
        offset,
        needed: SIGNATURE_SIZE as u64,
        available: 0,
    })?;
    if remaining.len() < SIGNATURE_SIZE {
        if remaining.iter().all(|&b| b == 0xFF) {
            return Ok(None);
        }
        return Err(NvarError::TruncatedRecord {
            offset,
            needed: SIGNATURE_SIZE as u64,
            available: remaining.len() as u64,
        });
    }

    let signature = codec::read32(remaining, 0)?;
    if signature == END_OF_REGION {
        return Ok(None);
    }
    if signature != SIGNATURE {
        return Err(NvarError::CorruptStore { offset, signature });
    }
    if remaining.len() < HEADER_SIZE {
        return Err(NvarError::TruncatedRecord {
            offset,
            needed: HEADER_SIZE as u64,
            available: remaining.len() as u64,
        });
    }

    let length = codec::read16(remaining, LENGTH_OFFSET)?;
    if (length as usize) < HEADER_SIZE {
        return Err(NvarError::InvalidLength { offset, length });
    }
    let record = remaining.get(..length as usize).ok_or(NvarError::TruncatedRecord {
        offset,
        needed: length as u64,
        available: remaining.len() as u64,
    })?;
    let next = codec::read24(record, NEXT_OFFSET)?;
    let attrs = record[ATTRIBUTES_OFFSET];
    let body = &record[HEADER_SIZE..];

    let (name, data) = if attrs & attributes::ASCII_NAME != 0 {
        let (&guid_index, rest) = body.split_first().ok_or(NvarError::MissingNameTerminator { offset })?;
        let end = rest.iter().position(|&b| b == 0).ok_or(NvarError::MissingNameTerminator { offset })?;
        (Some((guid_index, &rest[..end])), &rest[end + 1..])
    } else {
        (None, body)
    };

    Ok(Some(RecordRef { offset, length, next, attributes: attrs, name, data }))
}

impl<'a> RecordRef<'a> {
    /// Offset of the record in its store.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Record length, header included.
    pub fn length(&self) -> usize {
        self.length as usize
    }

    /// The attribute byte.
    pub fn attributes(&self) -> u8 {
        self.attributes
    }

    /// Whether the record is marked valid.
    pub fn is_valid(&self) -> bool {
        self.attributes & attributes::VALID != 0
    }

    /// Whether the record carries data without a name.
    pub fn is_data_only(&self) -> bool {
        self.attributes & attributes::DATA_ONLY != 0
    }

    /// GUID store index of a named record.
    pub fn guid_index(&self) -> Option<u8> {
        self.name.map(|(index, _)| index)
    }

    /// Name bytes of a named record, terminator excluded.
    pub fn name(&self) -> Option<&'a [u8]> {
        self.name.map(|(_, name)| name)
    }

    /// Name of a named record when it is valid UTF-8.
    pub fn name_str(&self) -> Option<&'a str> {
        self.name().and_then(|name| core::str::from_utf8(name).ok())
    }

    /// Variable data.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// The stored next field, relative to this record.
    pub fn next_raw(&self) -> u32 {
        self.next
    }

    /// Absolute offset of the next record in the update chain.
    pub fn next(&self) -> Option<usize> {
        match self.next {
            NO_NEXT => None,
            relative => Some(self.offset + relative as usize),
        }
    }

    /// Copy the record out of its buffer.
    pub fn to_record(&self) -> NvarRecord {
        NvarRecord {
            attributes: self.attributes,
            name: self.name.map(|(guid_index, name)| VariableName {
                guid_index,
                name: String::from_utf8_lossy(name).into_owned(),
            }),
            data: self.data.to_vec(),
        }
    }
}

impl fmt::Debug for RecordRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordRef")
            .field("offset", &self.offset)
            .field("length", &self.length)
            .field("next", &self.next)
            .field("attributes", &self.attributes)
            .field("guid_index", &self.guid_index())
            .field("name", &self.name().map(String::from_utf8_lossy))
            .field("data_len", &self.data.len())
            .finish()
    }
}
