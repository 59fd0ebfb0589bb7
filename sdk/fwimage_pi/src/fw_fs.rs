//! Firmware Storage Definitions
//!
//! Based on the values defined in the UEFI Platform Initialization (PI) Specification V1.8A Volume 3
//! Shared Architectural Elements.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: Apache-2.0
//!
pub mod ffs;
pub mod fv;
pub mod guid;
