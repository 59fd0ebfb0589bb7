//! LZMA-compressed GUID-defined sections.
//!
//! The payload sections are aligned into one stream, handed to a [`Compressor`], and the result is
//! wrapped in a GUID-defined section tagged with the LZMA custom decompress GUID. The compressor
//! output must be in the "LZMA alone" layout: five bytes of properties, then an 8-byte little-endian
//! uncompressed size, then the range-coded data. The size field is always overwritten with the real
//! payload length, since compressors that stream their input write it as unknown.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: Apache-2.0
//!
use alloc::{string::String, vec::Vec};
use core::{fmt, mem, ops::Range};

use fwimage_pi::{
    codec,
    fw_fs::{
        ffs::section::{guid_defined_attributes, header, raw_type},
        guid,
    },
};
use zerocopy::IntoBytes;

#[cfg(any(test, feature = "mockall"))]
use mockall::automock;

use crate::{align::align_sections, section, FirmwareImageError};

/// Location of the uncompressed-size field in an "LZMA alone" stream header.
pub const LZMA_SIZE_FIELD: Range<usize> = 5..13;

/// Offset of the compressed data from the start of the GUID-defined section.
pub const GUID_DEFINED_DATA_OFFSET: u16 = (section::HEADER_SIZE + mem::size_of::<header::GuidDefined>()) as u16;

/// A compressor failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressorError(pub String);

impl fmt::Display for CompressorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl core::error::Error for CompressorError {}

/// Compresses a byte stream. Calls are synchronous and may block.
#[cfg_attr(any(test, feature = "mockall"), automock)]
pub trait Compressor {
    /// Compress `data` into an "LZMA alone" stream.
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CompressorError>;
}

/// Build a compressed GUID-defined section from `sections`.
pub fn compress_sections<S: AsRef<[u8]>>(
    compressor: &dyn Compressor,
    sections: &[S],
) -> Result<Vec<u8>, FirmwareImageError> {
    let payload = align_sections(0, 0, sections)?;
    let mut stream =
        compressor.compress(&payload).map_err(|err| FirmwareImageError::CompressionFailed(err.0))?;

    if stream.len() < LZMA_SIZE_FIELD.end {
        return Err(FirmwareImageError::CompressionFailed(alloc::format!(
            "compressed stream of {:#x} bytes is shorter than an LZMA header",
            stream.len()
        )));
    }
    stream[LZMA_SIZE_FIELD].copy_from_slice(&codec::write64(payload.len() as u64));
    log::debug!("compressed {:#x} bytes of sections to {:#x}", payload.len(), stream.len());

    let guid_header = header::GuidDefined {
        section_definition_guid: *guid::LZMA_SECTION.as_bytes(),
        data_offset: GUID_DEFINED_DATA_OFFSET.into(),
        attributes: guid_defined_attributes::PROCESSING_REQUIRED.into(),
    };
    let mut content = Vec::with_capacity(mem::size_of::<header::GuidDefined>() + stream.len());
    content.extend_from_slice(guid_header.as_bytes());
    content.extend_from_slice(&stream);
    section::make_section(raw_type::encapsulated::GUID_DEFINED, &content)
}

/// In-process LZMA compressor.
#[cfg(any(test, feature = "lzma"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct LzmaCompressor;

#[cfg(any(test, feature = "lzma"))]
impl Compressor for LzmaCompressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CompressorError> {
        let mut compressed = Vec::new();
        lzma_rs::lzma_compress(&mut &data[..], &mut compressed).map_err(|err| CompressorError(err.to_string()))?;
        Ok(compressed)
    }
}

/// Compresses by piping data through an external program, e.g. `lzma --format=lzma -9 -c`.
#[cfg(any(test, feature = "std"))]
#[derive(Debug, Clone)]
pub struct CommandCompressor {
    program: String,
    args: Vec<String>,
}

#[cfg(any(test, feature = "std"))]
impl CommandCompressor {
    /// Run `program` with `args`, feeding the data on stdin and reading the stream from stdout.
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self { program: program.into(), args: args.into_iter().map(Into::into).collect() }
    }
}

#[cfg(any(test, feature = "std"))]
impl Default for CommandCompressor {
    fn default() -> Self {
        Self::new("lzma", ["--format=lzma", "-9", "-c"])
    }
}

#[cfg(any(test, feature = "std"))]
impl Compressor for CommandCompressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CompressorError> {
        use std::{
            io::Write,
            process::{Command, Stdio},
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| CompressorError(std::format!("failed to start {}: {err}", self.program)))?;

        let Some(mut stdin) = child.stdin.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(CompressorError(std::format!("{} has no stdin", self.program)));
        };

        // stdout is drained by wait_with_output while the input is still being written.
        let input = data.to_vec();
        let writer = std::thread::spawn(move || stdin.write_all(&input));

        let output = child.wait_with_output().map_err(|err| CompressorError(err.to_string()))?;
        match writer.join() {
            Ok(Ok(())) => (),
            Ok(Err(err)) => return Err(CompressorError(std::format!("writing to {}: {err}", self.program))),
            Err(_) => return Err(CompressorError(std::format!("writing to {} panicked", self.program))),
        }

        if !output.status.success() {
            return Err(CompressorError(std::format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(output.stdout)
    }
}
