//! Dependency Expression (DEPEX) opcode values
//!
//! Based on the values defined in the UEFI Platform Initialization (PI) Specification V1.8A Volume 2
//! Section 10.7 Dependency Expression Instruction Set.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: Apache-2.0
//!

/// Schedule before the driver named by the following GUID. Must be the only opcode.
pub const BEFORE: u8 = 0x00;
/// Schedule after the driver named by the following GUID. Must be the only opcode.
pub const AFTER: u8 = 0x01;
/// Push the availability of the protocol named by the following GUID.
pub const PUSH: u8 = 0x02;
/// Logical AND of the two operands on top of the stack.
pub const AND: u8 = 0x03;
/// Logical OR of the two operands on top of the stack.
pub const OR: u8 = 0x04;
/// Logical NOT of the operand on top of the stack.
pub const NOT: u8 = 0x05;
/// Push TRUE.
pub const TRUE: u8 = 0x06;
/// Push FALSE.
pub const FALSE: u8 = 0x07;
/// Last opcode of every expression.
pub const END: u8 = 0x08;
/// Schedule on request. Must be the first opcode.
pub const SOR: u8 = 0x09;

/// Returns true if `opcode` is followed by a 16-byte GUID operand.
pub const fn takes_guid(opcode: u8) -> bool {
    matches!(opcode, BEFORE | AFTER | PUSH)
}
