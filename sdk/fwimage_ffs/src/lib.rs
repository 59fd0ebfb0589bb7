//! Assembly of Firmware File System images as described in the UEFI Platform
//! Initialization Specification.
//!
//! This crate builds FFS sections, files, and firmware volumes from in-memory
//! payloads, and validates them on the way back in. Compression and content
//! naming are supplied through the [`compress::Compressor`] and
//! [`hash::ContentHasher`] traits.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: Apache-2.0
//!
#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

pub mod align;
pub mod compress;
pub mod config;
pub mod depex;
pub mod err;
pub mod file;
pub mod hash;
pub mod section;
pub mod volume;

pub use err::FirmwareImageError;
