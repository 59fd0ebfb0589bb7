//! Platform Initialization (PI) firmware storage definitions.
//!
//! This crate carries the constants and on-disk header layouts used to build and inspect Firmware File
//! System (FFS) files, their sections, and the Firmware Volumes (FV) that hold them, along with the
//! little-endian field codecs and GUID text conversion shared by the image builder and the NVRAM
//! store codec.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: Apache-2.0
//!
#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

pub mod codec;
pub mod fw_fs;
pub mod guid;

pub use codec::CodecError;
pub use guid::GuidError;
