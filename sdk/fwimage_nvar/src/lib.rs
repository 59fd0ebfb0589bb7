//! Codec for NVAR variable records.
//!
//! NVAR records form the legacy NVRAM variable store found inside firmware images. Each record is
//! parsed in place from a buffer slice at a given offset; links between records are relative byte
//! offsets, so a store is modeled as one owned buffer and offsets into it.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: Apache-2.0
//!
#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

pub mod err;
pub mod record;
pub mod store;

pub use err::NvarError;
pub use record::{parse, serialize, NvarRecord, RecordRef, VariableName};
pub use store::{NvarStore, NvarStoreBuilder};
