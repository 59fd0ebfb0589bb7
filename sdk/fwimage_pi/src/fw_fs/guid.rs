//! Well-known GUIDs for firmware storage.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: Apache-2.0
//!
use r_efi::efi;

/// EFI_FIRMWARE_FILE_SYSTEM2_GUID (8c8ce578-8a3d-4f1c-9935-896185c32dd3)
pub const EFI_FIRMWARE_FILE_SYSTEM2_GUID: efi::Guid =
    efi::Guid::from_fields(0x8c8ce578, 0x8a3d, 0x4f1c, 0x99, 0x35, &[0x89, 0x61, 0x85, 0xc3, 0x2d, 0xd3]);

/// EFI_FIRMWARE_FILE_SYSTEM3_GUID (5473c07a-3dcb-4dca-bd6f-1e9689e7349a)
pub const EFI_FIRMWARE_FILE_SYSTEM3_GUID: efi::Guid =
    efi::Guid::from_fields(0x5473c07a, 0x3dcb, 0x4dca, 0xbd, 0x6f, &[0x1e, 0x96, 0x89, 0xe7, 0x34, 0x9a]);

/// LZMA_CUSTOM_DECOMPRESS_GUID (ee4e5898-3914-4259-9d6e-dc7bd79403cf)
pub const LZMA_SECTION: efi::Guid =
    efi::Guid::from_fields(0xee4e5898, 0x3914, 0x4259, 0x9d, 0x6e, &[0xdc, 0x7b, 0xd7, 0x94, 0x03, 0xcf]);
