//! Firmware Volume (FV) Definitions
//!
//! Based on the values defined in the UEFI Platform Initialization (PI) Specification V1.8A 3.1 Firmware Storage
//! Code Definitions.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: Apache-2.0
//!
use zerocopy::byteorder::little_endian::{U16, U32, U64};
use zerocopy_derive::*;

/// Firmware File System revision number
pub const FFS_REVISION: u8 = 2;

/// Firmware volume signature, `"_FVH"` read as a little-endian `u32`.
pub const SIGNATURE: u32 = u32::from_le_bytes(*b"_FVH");

/// Length of a volume header carrying a single block map entry and its terminator.
pub const HEADER_LENGTH: usize = 0x48;

/// Default block size of a volume block map.
pub const DEFAULT_BLOCK_SIZE: u32 = 0x1000;

/// Offset of the 16-bit checksum field within [`Header`].
pub const CHECKSUM_OFFSET: usize = 0x32;

/// Firmware volume attribute bits (EFI_FVB_ATTRIBUTES_2)
pub mod attributes {
    /// Reads of the volume are enabled
    pub const READ_STATUS: u32 = 0x0000_0004;
    /// Unwritten bits read as 1
    pub const ERASE_POLARITY: u32 = 0x0000_0800;
    /// Default attributes of an assembled volume: all capability and status bits set, erase polarity 1,
    /// 64KB alignment capability.
    pub const DEFAULT: u32 = 0x0004_FEFF;
}

/// EFI_FIRMWARE_VOLUME_HEADER, without the trailing block map
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
pub struct Header {
    /// First 16 bytes are zeros for compatibility
    pub zero_vector: [u8; 16],
    /// File system type GUID
    pub file_system_guid: [u8; 16],
    /// Total volume length in bytes
    pub fv_length: U64,
    /// Firmware volume signature
    pub signature: U32,
    /// Volume attributes
    pub attributes: U32,
    /// Length of the header including the block map
    pub header_length: U16,
    /// Header checksum
    pub checksum: U16,
    /// Offset to extended header (0 if none)
    pub ext_header_offset: U16,
    /// Reserved byte (must be 0)
    pub reserved: u8,
    /// Header revision number
    pub revision: u8,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
/// Firmware volume block map entry describing physical layout
pub struct BlockMapEntry {
    /// Number of blocks of this size
    pub num_blocks: U32,
    /// Length of each block
    pub length: U32,
}
