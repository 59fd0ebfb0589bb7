//! Build options for sections, files, and volumes.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: Apache-2.0
//!
use fwimage_pi::fw_fs::{fv, guid};
use r_efi::efi;

/// Selects the header layout used for sections and files.
///
/// `Standard` headers carry 24-bit lengths and overflow is an error. `Extended` headers
/// (`EFI_COMMON_SECTION_HEADER2`, `EFI_FFS_FILE_HEADER2`) are only used when a length does not fit
/// the 24-bit field.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(any(test, feature = "serde"), derive(serde::Deserialize, serde::Serialize))]
pub enum HeaderFormat {
    /// 24-bit length fields only.
    #[default]
    Standard,
    /// 32-bit section lengths and 64-bit file lengths for content that needs them.
    Extended,
}

/// Options for building a single FFS file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(any(test, feature = "serde"), derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(any(test, feature = "serde"), serde(default))]
pub struct FileOptions {
    /// Header layout for the file header. Sections are framed by the caller before they reach the file
    /// builder, so their format is chosen where they are made.
    pub header_format: HeaderFormat,
    /// Compute a data checksum and set the checksum attribute. When clear the data checksum byte is
    /// the fixed value 0xAA.
    pub data_checksum: bool,
    /// Value of the 3-bit data alignment attribute field. Any nonzero value makes the volume assembler
    /// place the file on a block boundary.
    pub alignment: u8,
    /// Absolute alignment, in bytes, for each section start. Zero means the mandatory 4 bytes only; larger
    /// values must be multiples of 4.
    pub section_alignment: u32,
}

/// Options for assembling a firmware volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(any(test, feature = "serde"), derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(any(test, feature = "serde"), serde(default))]
pub struct VolumeConfig {
    /// Declared volume size in bytes. Must be a multiple of `block_size`.
    pub size: u64,
    /// Size of each block in the block map.
    pub block_size: u32,
    /// File system GUID in binary layout.
    pub file_system_guid: [u8; 16],
    /// Volume attribute word.
    pub attributes: u32,
    /// Header revision.
    pub revision: u8,
}

impl VolumeConfig {
    /// A default configuration for a volume of `size` bytes.
    pub fn with_size(size: u64) -> Self {
        Self { size, ..Default::default() }
    }

    /// The file system GUID as an [`efi::Guid`].
    pub fn file_system(&self) -> efi::Guid {
        efi::Guid::from_bytes(&self.file_system_guid)
    }
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            size: 0,
            block_size: fv::DEFAULT_BLOCK_SIZE,
            file_system_guid: *guid::EFI_FIRMWARE_FILE_SYSTEM2_GUID.as_bytes(),
            attributes: fv::attributes::DEFAULT,
            revision: fv::FFS_REVISION,
        }
    }
}
