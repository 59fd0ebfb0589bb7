//! Firmware File System (FFS) File Attribute Definitions
//!
//! Based on the values defined in the UEFI Platform Initialization (PI) Specification V1.8A Section 3.2.3.1
//! EFI_FFS_FILE_HEADER.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: Apache-2.0
//!

/// Raw FFS attribute constant definitions
pub mod raw {
    /// Large file attribute
    pub const LARGE_FILE: u8 = 0x01;
    /// 2-byte data alignment
    pub const DATA_ALIGNMENT_2: u8 = 0x02;
    /// File must be at a fixed address
    pub const FIXED: u8 = 0x04;
    /// Data alignment mask
    pub const DATA_ALIGNMENT: u8 = 0x38;
    /// File checksum attribute
    pub const CHECKSUM: u8 = 0x40;
}

/// Shift of the data alignment field within the attribute byte.
pub const DATA_ALIGNMENT_SHIFT: u8 = 3;

/// Extract the 3-bit data alignment field from an attribute byte.
pub const fn data_alignment(attributes: u8) -> u8 {
    (attributes & raw::DATA_ALIGNMENT) >> DATA_ALIGNMENT_SHIFT
}

/// Place a 3-bit data alignment value into the data alignment field of an attribute byte.
pub const fn with_data_alignment(attributes: u8, alignment: u8) -> u8 {
    (attributes & !raw::DATA_ALIGNMENT) | ((alignment << DATA_ALIGNMENT_SHIFT) & raw::DATA_ALIGNMENT)
}
