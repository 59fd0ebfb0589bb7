//! Firmware File System (FFS) File Definitions
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
use zerocopy::byteorder::little_endian::U64;
use zerocopy_derive::*;

/// Raw FFS file constant definitions
pub mod raw {
    /// File State Bits
    pub mod state {
        /// File header is under construction
        pub const HEADER_CONSTRUCTION: u8 = 0x01;
        /// File header is valid
        pub const HEADER_VALID: u8 = 0x02;
        /// File data is valid
        pub const DATA_VALID: u8 = 0x04;
        /// File is marked for update
        pub const MARKED_FOR_UPDATE: u8 = 0x08;
        /// File has been deleted
        pub const DELETED: u8 = 0x10;
        /// File header is invalid
        pub const HEADER_INVALID: u8 = 0x20;
        /// Top bit of the state byte. Set when the state is stored with erase polarity 1.
        pub const ERASE_POLARITY_HINT: u8 = 0x80;
    }

    /// File Type Definitions
    pub mod r#type {
        /// Raw data file
        pub const RAW: u8 = 0x01;
        /// Freeform file
        pub const FREEFORM: u8 = 0x02;
        /// Security (SEC) core file
        pub const SECURITY_CORE: u8 = 0x03;
        /// PEI core file
        pub const PEI_CORE: u8 = 0x04;
        /// DXE core file
        pub const DXE_CORE: u8 = 0x05;
        /// Pre-EFI module (PEIM) file
        pub const PEIM: u8 = 0x06;
        /// Driver Execution Environment (DXE) driver file
        pub const DRIVER: u8 = 0x07;
        /// Combined PEIM and driver file
        pub const COMBINED_PEIM_DRIVER: u8 = 0x08;
        /// Application file
        pub const APPLICATION: u8 = 0x09;
        /// System Management Mode (SMM) file
        pub const SMM: u8 = 0x0A;
        /// Firmware volume image file
        pub const FIRMWARE_VOLUME_IMAGE: u8 = 0x0B;
        /// Combined SMM and DXE file
        pub const COMBINED_SMM_DXE: u8 = 0x0C;
        /// SMM core file
        pub const SMM_CORE: u8 = 0x0D;
        /// Debug file type minimum value
        pub const DEBUG_MIN: u8 = 0xE0;
        /// Debug file type maximum value
        pub const DEBUG_MAX: u8 = 0xEF;
        /// FFS pad file type
        pub const FFS_PAD: u8 = 0xF0;
    }
}

/// State byte of a freshly built file: header and data valid, stored with erase polarity 0.
pub const STATE_DATA_VALID: u8 =
    raw::state::HEADER_CONSTRUCTION | raw::state::HEADER_VALID | raw::state::DATA_VALID;

/// State byte of a pad file, already stored with erase polarity 1.
pub const STATE_PAD: u8 = !STATE_DATA_VALID;

/// Value of the data checksum byte when the data checksum attribute is clear.
pub const FIXED_DATA_CHECKSUM: u8 = 0xAA;

/// Firmware file type
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Type {
    /// Raw file type
    Raw,
    /// Free form file
    FreeForm,
    /// Security core file
    SecurityCore,
    /// PEI core file
    PeiCore,
    /// DXE core file
    DxeCore,
    /// PEI module file
    Peim,
    /// Driver file
    Driver,
    /// Combined PEIM driver file
    CombinedPeimDriver,
    /// Application file
    Application,
    /// SMM driver file
    Smm,
    /// Firmware volume image file
    FirmwareVolumeImage,
    /// Combined SMM/DXE file
    CombinedSmmDxe,
    /// SMM core file
    SmmCore,
    /// A file in the debug range (`DEBUG_MIN..=DEBUG_MAX`)
    Debug(u8),
    /// A FFS padding file
    FfsPad,
}

/// Names accepted by [`Type::from_name`], with the type each names.
const NAMED_TYPES: [(&str, Type); 16] = [
    ("RAW", Type::Raw),
    ("FREEFORM", Type::FreeForm),
    ("SECURITY_CORE", Type::SecurityCore),
    ("PEI_CORE", Type::PeiCore),
    ("DXE_CORE", Type::DxeCore),
    ("PEIM", Type::Peim),
    ("DRIVER", Type::Driver),
    ("COMBINED_PEIM_DRIVER", Type::CombinedPeimDriver),
    ("APPLICATION", Type::Application),
    ("SMM", Type::Smm),
    ("FIRMWARE_VOLUME_IMAGE", Type::FirmwareVolumeImage),
    ("COMBINED_SMM_DXE", Type::CombinedSmmDxe),
    ("SMM_CORE", Type::SmmCore),
    ("DEBUG_MIN", Type::Debug(raw::r#type::DEBUG_MIN)),
    ("DEBUG_MAX", Type::Debug(raw::r#type::DEBUG_MAX)),
    ("FFS_PAD", Type::FfsPad),
];

impl Type {
    /// The raw file type byte.
    pub const fn raw(self) -> u8 {
        match self {
            Type::Raw => raw::r#type::RAW,
            Type::FreeForm => raw::r#type::FREEFORM,
            Type::SecurityCore => raw::r#type::SECURITY_CORE,
            Type::PeiCore => raw::r#type::PEI_CORE,
            Type::DxeCore => raw::r#type::DXE_CORE,
            Type::Peim => raw::r#type::PEIM,
            Type::Driver => raw::r#type::DRIVER,
            Type::CombinedPeimDriver => raw::r#type::COMBINED_PEIM_DRIVER,
            Type::Application => raw::r#type::APPLICATION,
            Type::Smm => raw::r#type::SMM,
            Type::FirmwareVolumeImage => raw::r#type::FIRMWARE_VOLUME_IMAGE,
            Type::CombinedSmmDxe => raw::r#type::COMBINED_SMM_DXE,
            Type::SmmCore => raw::r#type::SMM_CORE,
            Type::Debug(value) => value,
            Type::FfsPad => raw::r#type::FFS_PAD,
        }
    }

    /// Decode a raw file type byte. Returns `None` for types outside the table.
    pub const fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            raw::r#type::RAW => Type::Raw,
            raw::r#type::FREEFORM => Type::FreeForm,
            raw::r#type::SECURITY_CORE => Type::SecurityCore,
            raw::r#type::PEI_CORE => Type::PeiCore,
            raw::r#type::DXE_CORE => Type::DxeCore,
            raw::r#type::PEIM => Type::Peim,
            raw::r#type::DRIVER => Type::Driver,
            raw::r#type::COMBINED_PEIM_DRIVER => Type::CombinedPeimDriver,
            raw::r#type::APPLICATION => Type::Application,
            raw::r#type::SMM => Type::Smm,
            raw::r#type::FIRMWARE_VOLUME_IMAGE => Type::FirmwareVolumeImage,
            raw::r#type::COMBINED_SMM_DXE => Type::CombinedSmmDxe,
            raw::r#type::SMM_CORE => Type::SmmCore,
            raw::r#type::DEBUG_MIN..=raw::r#type::DEBUG_MAX => Type::Debug(value),
            raw::r#type::FFS_PAD => Type::FfsPad,
            _ => return None,
        })
    }

    /// Look up a file type by its build-description name (e.g. `"DRIVER"`, `"FFS_PAD"`).
    pub fn from_name(name: &str) -> Option<Self> {
        NAMED_TYPES.iter().find(|(n, _)| *n == name).map(|(_, t)| *t)
    }
}

// EFI_FFS_FILE_HEADER
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
/// Firmware file header structure per PI Specification
pub struct Header {
    /// Unique file GUID identifier, in binary GUID layout
    pub name: [u8; 16],
    /// Header checksum value
    pub integrity_check_header: u8,
    /// File checksum value
    pub integrity_check_file: u8,
    /// Type of file (see file type constants)
    pub file_type: u8,
    /// File attributes
    pub attributes: u8,
    /// 24-bit file size in bytes
    pub size: [u8; 3],
    /// File state (see state constants)
    pub state: u8,
}

// EFI_FFS_FILE_HEADER2
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
/// Extended firmware file header structure for files of 16MB or larger
pub struct Header2 {
    /// Standard file header
    pub header: Header,
    /// Extended 64-bit file size for large files
    pub extended_size: U64,
}

/// Offset of the state byte within [`Header`].
pub const STATE_OFFSET: usize = 0x17;
/// Offset of the 24-bit size field within [`Header`].
pub const SIZE_OFFSET: usize = 0x14;
/// Offset of the attributes byte within [`Header`].
pub const ATTRIBUTES_OFFSET: usize = 0x13;
