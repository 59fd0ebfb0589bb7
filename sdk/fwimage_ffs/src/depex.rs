//! Dependency expression (DEPEX) sections.
//!
//! A generated expression requires every listed protocol GUID: each GUID is pushed in the order
//! given, the pushes are combined with `count - 1` AND opcodes, and END closes the expression. An
//! expression that is always satisfied is the two-byte `TRUE END` form.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: Apache-2.0
//!
use alloc::vec::Vec;

use fwimage_pi::{
    fw_fs::ffs::{depex as opcode, file, section::raw_type},
    guid::{self, GUID_SIZE},
};
use r_efi::efi;

use crate::{section::make_section, FirmwareImageError};

/// The dependencies of a driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepexExpression {
    /// Always dispatchable.
    True,
    /// Dispatchable once every listed protocol is installed.
    Guids(Vec<efi::Guid>),
}

impl DepexExpression {
    /// Build an expression from build-description tokens: a lone `"TRUE"`, or a list of canonical GUIDs.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Self, FirmwareImageError> {
        let tokens: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
        match tokens.as_slice() {
            ["TRUE"] => Ok(DepexExpression::True),
            _ => Ok(DepexExpression::Guids(
                tokens.iter().map(|t| guid::parse_guid(t)).collect::<Result<Vec<_>, _>>()?,
            )),
        }
    }

    /// Encode the expression as DEPEX bytecode.
    pub fn to_bytecode(&self) -> Result<Vec<u8>, FirmwareImageError> {
        let guids = match self {
            DepexExpression::True => return Ok(alloc::vec![opcode::TRUE, opcode::END]),
            DepexExpression::Guids(guids) if guids.is_empty() => return Err(FirmwareImageError::EmptyDepex),
            DepexExpression::Guids(guids) => guids,
        };

        let mut bytecode = Vec::with_capacity(guids.len() * (GUID_SIZE + 2) + 1);
        for guid in guids {
            bytecode.push(opcode::PUSH);
            bytecode.extend_from_slice(guid.as_bytes());
        }
        bytecode.resize(bytecode.len() + guids.len() - 1, opcode::AND);
        bytecode.push(opcode::END);
        Ok(bytecode)
    }
}

/// The DEPEX section type carried by files of `file_type`, if that type takes a dependency expression.
pub fn depex_section_type(file_type: u8) -> Option<u8> {
    match file_type {
        file::raw::r#type::PEIM => Some(raw_type::PEI_DEPEX),
        file::raw::r#type::DRIVER => Some(raw_type::DXE_DEPEX),
        file::raw::r#type::SMM => Some(raw_type::SMM_DEPEX),
        _ => None,
    }
}

/// Build the DEPEX section for a file of `file_type`.
///
/// PEIM files get a PEI_DEPEX section, DRIVER files a DXE_DEPEX section, and SMM files an SMM_DEPEX
/// section. Any other file type fails with [`FirmwareImageError::UnsupportedDepexType`].
pub fn build_depex(file_type: u8, expression: &DepexExpression) -> Result<Vec<u8>, FirmwareImageError> {
    let section_type = depex_section_type(file_type).ok_or(FirmwareImageError::UnsupportedDepexType(file_type))?;
    let bytecode = expression.to_bytecode()?;
    log::debug!("depex for file type {file_type:#04x}: {} bytes", bytecode.len());
    make_section(section_type, &bytecode)
}

/// A decoded DEPEX opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    /// Schedule before the named driver.
    Before(efi::Guid),
    /// Schedule after the named driver.
    After(efi::Guid),
    /// Push the availability of the named protocol.
    Push(efi::Guid),
    /// Logical AND.
    And,
    /// Logical OR.
    Or,
    /// Logical NOT.
    Not,
    /// Push TRUE.
    True,
    /// Push FALSE.
    False,
    /// End of expression.
    End,
    /// Schedule on request.
    Sor,
}

/// Decode DEPEX bytecode up to and including its END opcode.
pub fn parse_depex(bytecode: &[u8]) -> Result<Vec<Opcode>, FirmwareImageError> {
    let mut opcodes = Vec::new();
    let mut offset = 0;
    while let Some(&op) = bytecode.get(offset) {
        let guid = if opcode::takes_guid(op) {
            let operand = bytecode.get(offset + 1..offset + 1 + GUID_SIZE).ok_or(FirmwareImageError::Truncated {
                offset,
                needed: (GUID_SIZE + 1) as u64,
                available: (bytecode.len() - offset) as u64,
            })?;
            let mut bytes = [0u8; GUID_SIZE];
            bytes.copy_from_slice(operand);
            offset += GUID_SIZE;
            Some(efi::Guid::from_bytes(&bytes))
        } else {
            None
        };
        offset += 1;

        let decoded = match (op, guid) {
            (opcode::BEFORE, Some(g)) => Opcode::Before(g),
            (opcode::AFTER, Some(g)) => Opcode::After(g),
            (opcode::PUSH, Some(g)) => Opcode::Push(g),
            (opcode::AND, _) => Opcode::And,
            (opcode::OR, _) => Opcode::Or,
            (opcode::NOT, _) => Opcode::Not,
            (opcode::TRUE, _) => Opcode::True,
            (opcode::FALSE, _) => Opcode::False,
            (opcode::SOR, _) => Opcode::Sor,
            (opcode::END, _) => {
                opcodes.push(Opcode::End);
                return Ok(opcodes);
            }
            _ => return Err(FirmwareImageError::InvalidHeader { offset: offset - 1, reason: "unknown DEPEX opcode" }),
        };
        opcodes.push(decoded);
    }
    Err(FirmwareImageError::InvalidHeader { offset, reason: "DEPEX has no END opcode" })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::section::parse_section;
    use alloc::vec;

    const GUID_A: &str = "8c8ce578-8a3d-4f1c-9935-896185c32dd3";
    const GUID_B: &str = "26baccb1-6f42-11d4-bce7-0080c73c8881";

    #[test]
    fn true_shortcut() {
        let section = build_depex(file::raw::r#type::DRIVER, &DepexExpression::True).unwrap();
        assert_eq!(section, [0x06, 0x00, 0x00, raw_type::DXE_DEPEX, 0x06, 0x08]);
        assert_eq!(DepexExpression::from_tokens(&["TRUE"]).unwrap(), DepexExpression::True);
    }

    #[test]
    fn two_guids_for_a_driver() {
        let expression = DepexExpression::from_tokens(&[GUID_A, GUID_B]).unwrap();
        let section = build_depex(file::raw::r#type::DRIVER, &expression).unwrap();
        let parsed = parse_section(&section).unwrap();
        assert_eq!(parsed.section_type_raw(), raw_type::DXE_DEPEX);

        let a = guid::guid_to_bytes(GUID_A).unwrap();
        let b = guid::guid_to_bytes(GUID_B).unwrap();
        let mut expected = vec![0x02];
        expected.extend_from_slice(&a);
        expected.push(0x02);
        expected.extend_from_slice(&b);
        expected.extend([0x03, 0x08]);
        assert_eq!(parsed.payload(), &expected[..]);

        assert_eq!(
            parse_depex(parsed.payload()).unwrap(),
            vec![
                Opcode::Push(efi::Guid::from_bytes(&a)),
                Opcode::Push(efi::Guid::from_bytes(&b)),
                Opcode::And,
                Opcode::End
            ]
        );
    }

    #[test]
    fn and_count_is_one_less_than_guid_count() {
        let guid = guid::parse_guid(GUID_A).unwrap();
        for count in 1..5 {
            let bytecode = DepexExpression::Guids(vec![guid; count]).to_bytecode().unwrap();
            let ops = parse_depex(&bytecode).unwrap();
            assert_eq!(ops.iter().filter(|op| **op == Opcode::And).count(), count - 1);
            assert_eq!(ops.last(), Some(&Opcode::End));
        }
    }

    #[test]
    fn section_type_follows_file_type() {
        let pei = build_depex(file::raw::r#type::PEIM, &DepexExpression::True).unwrap();
        assert_eq!(pei[3], raw_type::PEI_DEPEX);
        let smm = build_depex(file::raw::r#type::SMM, &DepexExpression::True).unwrap();
        assert_eq!(smm[3], raw_type::SMM_DEPEX);
        assert_eq!(
            build_depex(file::raw::r#type::APPLICATION, &DepexExpression::True),
            Err(FirmwareImageError::UnsupportedDepexType(file::raw::r#type::APPLICATION))
        );
    }

    #[test]
    fn empty_and_malformed_input() {
        assert_eq!(
            build_depex(file::raw::r#type::DRIVER, &DepexExpression::Guids(vec![])),
            Err(FirmwareImageError::EmptyDepex)
        );
        assert!(matches!(DepexExpression::from_tokens(&["not-a-guid"]), Err(FirmwareImageError::InvalidGuid(_))));
        assert!(matches!(parse_depex(&[0x02, 0x01, 0x02]), Err(FirmwareImageError::Truncated { offset: 0, .. })));
        assert!(matches!(parse_depex(&[0x06]), Err(FirmwareImageError::InvalidHeader { offset: 1, .. })));
        assert!(matches!(parse_depex(&[0x06, 0xE0, 0x08]), Err(FirmwareImageError::InvalidHeader { offset: 1, .. })));
        assert_eq!(parse_depex(&[0x09, 0x06, 0x08]).unwrap(), vec![Opcode::Sor, Opcode::True, Opcode::End]);
    }
}
