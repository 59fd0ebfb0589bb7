//! Firmware File System (FFS) Section Definitions
//!
//! Based on the values defined in the UEFI Platform Initialization (PI) Specification V1.8A Section 3.2.4
//! Firmware File Section.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: Apache-2.0
//!
use zerocopy::byteorder::little_endian::{U16, U32};
use zerocopy_derive::*;

/// Firmware File System Section Types
/// Note: Typically called `EFI_SECTION_*` in EDK II code.
pub mod raw_type {
    /// Encapsulated section type constants
    pub mod encapsulated {
        /// Compression encapsulated section
        pub const COMPRESSION: u8 = 0x01;
        /// GUID-defined encapsulated section
        pub const GUID_DEFINED: u8 = 0x02;
    }
    /// Tiano-compressed section. Shares its value with [`encapsulated::COMPRESSION`].
    pub const TIANO_COMPRESSED: u8 = encapsulated::COMPRESSION;
    /// PE32 executable section
    pub const PE32: u8 = 0x10;
    /// Position-independent code section
    pub const PIC: u8 = 0x11;
    /// Terse executable section
    pub const TE: u8 = 0x12;
    /// DXE dependency expression section
    pub const DXE_DEPEX: u8 = 0x13;
    /// Version information section
    pub const VERSION: u8 = 0x14;
    /// User interface string section
    pub const USER_INTERFACE: u8 = 0x15;
    /// Compatibility16 section
    pub const COMPATIBILITY16: u8 = 0x16;
    /// Firmware volume image section
    pub const FIRMWARE_VOLUME_IMAGE: u8 = 0x17;
    /// Freeform GUID subtype section
    pub const FREEFORM_SUBTYPE_GUID: u8 = 0x18;
    /// Raw data section
    pub const RAW: u8 = 0x19;
    /// PEI dependency expression section
    pub const PEI_DEPEX: u8 = 0x1B;
    /// SMM dependency expression section
    pub const SMM_DEPEX: u8 = 0x1C;
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
/// Section type enumeration for firmware file sections
pub enum Type {
    /// Tiano-compressed section
    TianoCompressed = raw_type::TIANO_COMPRESSED,
    /// GUID-defined section
    GuidDefined = raw_type::encapsulated::GUID_DEFINED,
    /// PE32 executable
    Pe32 = raw_type::PE32,
    /// Position-independent code
    Pic = raw_type::PIC,
    /// Terse executable
    Te = raw_type::TE,
    /// DXE dependency expression
    DxeDepex = raw_type::DXE_DEPEX,
    /// Version information
    Version = raw_type::VERSION,
    /// User interface string
    UserInterface = raw_type::USER_INTERFACE,
    /// Compatibility16 binary
    Compatibility16 = raw_type::COMPATIBILITY16,
    /// Firmware volume image
    FirmwareVolumeImage = raw_type::FIRMWARE_VOLUME_IMAGE,
    /// Freeform GUID subtype
    FreeformSubtypeGuid = raw_type::FREEFORM_SUBTYPE_GUID,
    /// Raw data
    Raw = raw_type::RAW,
    /// PEI dependency expression
    PeiDepex = raw_type::PEI_DEPEX,
    /// SMM dependency expression
    SmmDepex = raw_type::SMM_DEPEX,
}

const NAMED_TYPES: [(&str, Type); 14] = [
    ("TIANO_COMPRESSED", Type::TianoCompressed),
    ("GUID_DEFINED", Type::GuidDefined),
    ("PE32", Type::Pe32),
    ("PIC", Type::Pic),
    ("TE", Type::Te),
    ("DXE_DEPEX", Type::DxeDepex),
    ("VERSION", Type::Version),
    ("USER_INTERFACE", Type::UserInterface),
    ("COMPATIBILITY16", Type::Compatibility16),
    ("FIRMWARE_VOLUME_IMAGE", Type::FirmwareVolumeImage),
    ("FREEFORM_SUBTYPE_GUID", Type::FreeformSubtypeGuid),
    ("RAW", Type::Raw),
    ("PEI_DEPEX", Type::PeiDepex),
    ("SMM_DEPEX", Type::SmmDepex),
];

impl Type {
    /// Decode a raw section type byte. Returns `None` for types outside the table.
    pub fn from_raw(value: u8) -> Option<Self> {
        NAMED_TYPES.iter().map(|(_, t)| *t).find(|t| *t as u8 == value)
    }

    /// Look up a section type by its build-description name (e.g. `"PE32"`, `"DXE_DEPEX"`).
    pub fn from_name(name: &str) -> Option<Self> {
        NAMED_TYPES.iter().find(|(n, _)| *n == name).map(|(_, t)| *t)
    }
}

/// EFI_COMMON_SECTION_HEADER per PI spec 1.8A 3.2.4.1
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
pub struct Header {
    /// Section size (24-bit), header included
    pub size: [u8; 3],
    /// Section type identifier
    pub section_type: u8,
}

/// EFI_COMMON_SECTION_HEADER2 per PI spec 1.8A 3.2.4.1
///
/// Used when `size` is all ones; the real length is in `extended_size`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
pub struct Header2 {
    /// Common header with `size` set to 0xFFFFFF
    pub header: Header,
    /// Extended 32-bit section size
    pub extended_size: U32,
}

/// Section header structures
pub mod header {
    use super::*;

    /// EFI_GUID_DEFINED_SECTION per PI spec 1.8A 3.2.5.7, without the common header.
    #[repr(C)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
    pub struct GuidDefined {
        /// GUID identifying the section format
        pub section_definition_guid: [u8; 16],
        /// Offset to section data from start of header
        pub data_offset: U16,
        /// Section attributes
        pub attributes: U16,
    }

    /// EFI_VERSION_SECTION per PI spec 1.8A 3.2.5.15, without the common header.
    #[repr(C)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
    pub struct Version {
        /// Build number
        pub build_number: U16,
    }
}

/// GUID-defined section attribute bits
pub mod guid_defined_attributes {
    /// The section content must be processed (e.g. decompressed) before use
    pub const PROCESSING_REQUIRED: u16 = 0x01;
    /// The section carries authentication status
    pub const AUTH_STATUS_VALID: u16 = 0x02;
}
