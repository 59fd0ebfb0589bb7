//! Content-derived file names.
//!
//! A file built without a name is named after its content: the hasher sees the aligned section
//! stream that becomes the file payload, so identical content always yields the same name.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: Apache-2.0
//!
use r_efi::efi;

#[cfg(any(test, feature = "mockall"))]
use mockall::automock;

/// Derives a file name from file content.
#[cfg_attr(any(test, feature = "mockall"), automock)]
pub trait ContentHasher {
    /// Name for a file whose aligned payload is `payload`. Must be deterministic.
    fn name_for(&self, payload: &[u8]) -> efi::Guid;
}

/// Names a file with the first 16 bytes of the SHA-1 digest of its payload.
#[cfg(feature = "sha1")]
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha1ContentHasher;

#[cfg(feature = "sha1")]
impl ContentHasher for Sha1ContentHasher {
    fn name_for(&self, payload: &[u8]) -> efi::Guid {
        use sha1::{Digest, Sha1};

        let digest = Sha1::digest(payload);
        let mut name = [0u8; 16];
        name.copy_from_slice(&digest[..16]);
        efi::Guid::from_bytes(&name)
    }
}
