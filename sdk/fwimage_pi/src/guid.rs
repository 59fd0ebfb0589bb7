//! GUID text and binary conversion.
//!
//! GUIDs are written as the canonical 36-character `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx` form. The
//! binary form is the 16-byte mixed-endian layout used throughout firmware images: the first three
//! fields are little-endian and the trailing eight bytes are stored in text order. Text input is
//! accepted in either case; text output is always lowercase.
//!
//! ## Examples
//!
//! ```rust
//! use fwimage_pi::guid::{guid_to_bytes, guid_to_text};
//!
//! let bytes = guid_to_bytes("EE4E5898-3914-4259-9D6E-DC7BD79403CF")?;
//! assert_eq!(bytes[..4], [0x98, 0x58, 0x4e, 0xee]);
//! assert_eq!(guid_to_text(&bytes), "ee4e5898-3914-4259-9d6e-dc7bd79403cf");
//! # Ok::<(), fwimage_pi::GuidError>(())
//! ```
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: Apache-2.0
//!
use alloc::string::{String, ToString};
use core::fmt;
use r_efi::efi;
use uuid::Uuid;

/// Length of the canonical GUID text form.
pub const GUID_TEXT_LEN: usize = 36;

/// Size of a binary GUID.
pub const GUID_SIZE: usize = 16;

/// Dash positions of the canonical text form.
const DASH_POSITIONS: [usize; 4] = [8, 13, 18, 23];

/// Error type for GUID parsing operations
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum GuidError {
    /// The text is not exactly [`GUID_TEXT_LEN`] characters long.
    InvalidLength {
        /// Expected number of characters
        expected: usize,
        /// Actual number of characters found
        actual: usize,
    },
    /// A character that should be a hex digit is not one.
    InvalidHexCharacter {
        /// Position of the invalid character in the string
        position: usize,
        /// The invalid character that was found
        character: char,
    },
    /// A dash is missing from, or present outside of, the canonical dash positions.
    MisplacedSeparator {
        /// Position of the offending character
        position: usize,
    },
}

impl fmt::Display for GuidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuidError::InvalidLength { expected, actual } => {
                write!(f, "Invalid GUID length: expected {expected} characters, found {actual}")
            }
            GuidError::InvalidHexCharacter { position, character } => {
                write!(f, "Invalid hex character '{character}' at position {position}")
            }
            GuidError::MisplacedSeparator { position } => {
                write!(f, "Expected a separator layout of 8-4-4-4-12, mismatch at position {position}")
            }
        }
    }
}

impl core::error::Error for GuidError {}

/// Check that `text` has the exact canonical shape and return the 128-bit value of its digits.
fn parse_canonical(text: &str) -> Result<u128, GuidError> {
    let count = text.chars().count();
    if count != GUID_TEXT_LEN {
        return Err(GuidError::InvalidLength { expected: GUID_TEXT_LEN, actual: count });
    }
    let mut value = 0u128;
    for (position, c) in text.chars().enumerate() {
        let dash_expected = DASH_POSITIONS.contains(&position);
        match (dash_expected, c.to_digit(16)) {
            (true, _) if c == '-' => (),
            (true, _) => return Err(GuidError::MisplacedSeparator { position }),
            (false, Some(digit)) => value = (value << 4) | digit as u128,
            (false, None) if c == '-' => return Err(GuidError::MisplacedSeparator { position }),
            (false, None) => return Err(GuidError::InvalidHexCharacter { position, character: c }),
        }
    }
    Ok(value)
}

/// Convert canonical GUID text into its 16-byte binary form.
pub fn guid_to_bytes(text: &str) -> Result<[u8; GUID_SIZE], GuidError> {
    Ok(Uuid::from_u128(parse_canonical(text)?).to_bytes_le())
}

/// Convert a 16-byte binary GUID into lowercase canonical text.
pub fn guid_to_text(bytes: &[u8; GUID_SIZE]) -> String {
    Uuid::from_bytes_le(*bytes).hyphenated().to_string()
}

/// Parse canonical GUID text into an [`efi::Guid`].
pub fn parse_guid(text: &str) -> Result<efi::Guid, GuidError> {
    Ok(efi::Guid::from_bytes(&guid_to_bytes(text)?))
}

/// Format an [`efi::Guid`] as lowercase canonical text.
pub fn format_guid(guid: &efi::Guid) -> String {
    guid_to_text(guid.as_bytes())
}

/// A GUID with all bits set, used as the name of pad files.
pub const ALL_ONES: efi::Guid = efi::Guid::from_fields(
    0xFFFF_FFFF,
    0xFFFF,
    0xFFFF,
    0xFF,
    0xFF,
    &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF],
);
