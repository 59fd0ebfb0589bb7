//! Firmware volume assembly and decoding.
//!
//! A volume is a 0x48-byte header (one block map entry and its terminator) followed by FFS files on
//! 8-byte boundaries, filled with 0xFF up to the declared size. Assembly runs in three phases:
//! [`VolumeBuilder::new`] emits the header, [`VolumeBuilder::append`] adds one file at a time, and
//! [`VolumeBuilder::finish`] pads to the declared size. The first failure poisons the builder.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: Apache-2.0
//!
use alloc::vec::Vec;
use core::{fmt, mem};

use fwimage_pi::{
    codec,
    fw_fs::{
        ffs::{
            attributes::{self, raw::LARGE_FILE},
            file::{self, raw::state},
        },
        fv,
    },
    guid,
};
use r_efi::efi;
use zerocopy::{FromBytes, IntoBytes};

use crate::{
    align::align_up,
    config::VolumeConfig,
    file::{build_ffs_pad, FileRef, HEADER_SIZE as FILE_HEADER_SIZE},
    section::relocate,
    FirmwareImageError,
};

/// Files start on 8-byte boundaries of the volume.
pub const FILE_ALIGNMENT: usize = 8;

/// Alignment of files whose data alignment attribute is zero.
pub const MIN_FILE_ALIGNMENT: usize = 16;

/// Fill value of erased flash.
pub const ERASE_BYTE: u8 = 0xFF;

/// Incremental firmware volume assembler.
///
/// ## Examples
///
/// ```rust
/// use fwimage_ffs::{config::VolumeConfig, file::build_ffs, volume::{VolumeBuilder, VolumeRef}};
/// use fwimage_pi::{fw_fs::ffs::file, guid::parse_guid};
///
/// let name = parse_guid("5d4f7a3c-7a61-4f1e-9d8b-1c2b3a4d5e6f")?;
/// let sections: [&[u8]; 1] = [&[0x08, 0x00, 0x00, 0x19, 1, 2, 3, 4]];
/// let driver = build_ffs(file::raw::r#type::FREEFORM, Some(name), &sections)?;
///
/// let mut builder = VolumeBuilder::new(VolumeConfig::with_size(0x2000))?;
/// builder.append(&driver)?;
/// let bytes = builder.finish()?;
///
/// assert_eq!(bytes.len(), 0x2000);
/// let volume = VolumeRef::new(&bytes)?;
/// assert_eq!(volume.files().next().unwrap()?.name(), name);
/// # Ok::<(), Box<dyn core::error::Error>>(())
/// ```
pub struct VolumeBuilder {
    config: VolumeConfig,
    buf: Vec<u8>,
    failure: Option<FirmwareImageError>,
}

impl VolumeBuilder {
    /// Emit the volume header for `config`.
    ///
    /// The declared size must be a nonzero multiple of the block size.
    pub fn new(config: VolumeConfig) -> Result<Self, FirmwareImageError> {
        let block_size = config.block_size;
        if block_size == 0 || config.size % block_size as u64 != 0 {
            return Err(FirmwareImageError::UnalignedVolumeSize { size: config.size, block_size });
        }
        let num_blocks = u32::try_from(config.size / block_size as u64)
            .map_err(|_| FirmwareImageError::UnalignedVolumeSize { size: config.size, block_size })?;

        let header = fv::Header {
            zero_vector: [0u8; 16],
            file_system_guid: config.file_system_guid,
            fv_length: config.size.into(),
            signature: fv::SIGNATURE.into(),
            attributes: config.attributes.into(),
            header_length: (fv::HEADER_LENGTH as u16).into(),
            checksum: 0u16.into(),
            ext_header_offset: 0u16.into(),
            reserved: 0,
            revision: config.revision,
        };

        let mut buf = Vec::with_capacity(fv::HEADER_LENGTH);
        buf.extend_from_slice(header.as_bytes());
        buf.extend_from_slice(fv::BlockMapEntry { num_blocks: num_blocks.into(), length: block_size.into() }.as_bytes());
        buf.extend_from_slice(fv::BlockMapEntry { num_blocks: 0u32.into(), length: 0u32.into() }.as_bytes());

        let checksum = 0u16.wrapping_sub(codec::sum16(&buf));
        buf[fv::CHECKSUM_OFFSET..fv::CHECKSUM_OFFSET + 2].copy_from_slice(&codec::write16(checksum));

        log::debug!(
            "volume {} size {:#x}, {num_blocks} blocks of {block_size:#x}",
            guid::format_guid(&config.file_system()),
            config.size
        );
        Ok(Self { config, buf, failure: None })
    }

    /// Bytes assembled so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Number of bytes assembled so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Always false: the header is emitted on construction.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    fn check_failure(&self) -> Result<(), FirmwareImageError> {
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn fail<T>(&mut self, err: FirmwareImageError) -> Result<T, FirmwareImageError> {
        self.failure = Some(err.clone());
        Err(err)
    }

    /// Append one serialized FFS file.
    ///
    /// The file's length field must equal `file.len()`. Files with a zero data alignment attribute
    /// start on a 16-byte boundary, any other alignment starts on a block boundary; an FFS_PAD file
    /// fills the gap. A state byte with its top bit clear is inverted before the file is written.
    /// On failure nothing is written and the builder stays failed.
    pub fn append(&mut self, file: &[u8]) -> Result<(), FirmwareImageError> {
        self.check_failure()?;
        match self.place(file) {
            Ok(placed) => {
                self.buf.extend(placed);
                Ok(())
            }
            Err(err) => self.fail(err),
        }
    }

    // Produces the bytes `file` adds to the volume, alignment pad file included.
    fn place(&self, file: &[u8]) -> Result<Vec<u8>, FirmwareImageError> {
        let (header, _) = file::Header::read_from_prefix(file).map_err(|_| FirmwareImageError::Truncated {
            offset: self.buf.len(),
            needed: FILE_HEADER_SIZE as u64,
            available: file.len() as u64,
        })?;
        let declared = if header.attributes & LARGE_FILE == 0 {
            codec::read24(&header.size, 0)? as u64
        } else {
            codec::read64(file, FILE_HEADER_SIZE)?
        };
        if declared != file.len() as u64 {
            return Err(FirmwareImageError::LengthMismatch { declared, actual: file.len() as u64 });
        }

        let alignment = match attributes::data_alignment(header.attributes) {
            0 => MIN_FILE_ALIGNMENT,
            _ => self.config.block_size as usize,
        };
        let position = self.buf.len();
        let mut gap = align_up(position, alignment) - position;
        if gap != 0 {
            while gap <= FILE_HEADER_SIZE {
                gap += alignment;
            }
        }
        log::trace!("file at {position:#x}: alignment {alignment:#x}, pad {gap:#x}");

        let mut placed = build_ffs_pad(gap)?;
        let file_offset = placed.len();
        placed.extend_from_slice(file);
        placed.resize(align_up(placed.len(), FILE_ALIGNMENT), ERASE_BYTE);

        let state_byte = &mut placed[file_offset + file::STATE_OFFSET];
        if *state_byte & state::ERASE_POLARITY_HINT == 0 {
            log::warn!(
                "file {} state {:#04x} stored with erase polarity 0, inverting",
                guid::guid_to_text(&header.name),
                *state_byte
            );
            *state_byte = !*state_byte;
        }

        log::debug!(
            "file {} type {:#04x} at {:#x}, length {declared:#x}",
            guid::guid_to_text(&header.name),
            header.file_type,
            position + file_offset
        );
        Ok(placed)
    }

    /// Pad the volume to its declared size with 0xFF and return it.
    pub fn finish(self) -> Result<Vec<u8>, FirmwareImageError> {
        self.check_failure()?;
        let Self { config, mut buf, .. } = self;
        if buf.len() as u64 > config.size {
            return Err(FirmwareImageError::VolumeOverflow { declared: config.size, actual: buf.len() as u64 });
        }
        log::debug!("volume content {:#x} of {:#x} bytes", buf.len(), config.size);
        buf.resize(config.size as usize, ERASE_BYTE);
        Ok(buf)
    }
}

impl fmt::Debug for VolumeBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VolumeBuilder")
            .field("config", &self.config)
            .field("len", &self.buf.len())
            .field("failure", &self.failure)
            .finish()
    }
}

/// Assemble a volume from `config` and serialized `files`.
pub fn fv_assemble<S: AsRef<[u8]>>(config: &VolumeConfig, files: &[S]) -> Result<Vec<u8>, FirmwareImageError> {
    let mut builder = VolumeBuilder::new(*config)?;
    for file in files {
        builder.append(file.as_ref())?;
    }
    builder.finish()
}

/// A validated firmware volume inside a byte buffer.
#[derive(Clone)]
pub struct VolumeRef<'a> {
    data: &'a [u8],
    header: fv::Header,
    block_map: Vec<fv::BlockMapEntry>,
    content_offset: usize,
}

impl<'a> VolumeRef<'a> {
    /// Parse the volume at the start of `buffer`.
    ///
    /// Validates the signature, header length, header checksum, declared length, and block map.
    pub fn new(buffer: &'a [u8]) -> Result<Self, FirmwareImageError> {
        let (header, _) = fv::Header::read_from_prefix(buffer).map_err(|_| FirmwareImageError::Truncated {
            offset: 0,
            needed: mem::size_of::<fv::Header>() as u64,
            available: buffer.len() as u64,
        })?;

        if header.signature.get() != fv::SIGNATURE {
            return Err(FirmwareImageError::InvalidHeader { offset: 0x28, reason: "missing _FVH signature" });
        }

        let header_length = header.header_length.get() as usize;
        if header_length < mem::size_of::<fv::Header>() || header_length % 2 != 0 {
            return Err(FirmwareImageError::InvalidHeader { offset: 0x30, reason: "bad header length" });
        }
        let header_bytes = buffer.get(..header_length).ok_or(FirmwareImageError::Truncated {
            offset: 0,
            needed: header_length as u64,
            available: buffer.len() as u64,
        })?;

        let sum = codec::sum16(header_bytes);
        if sum != 0 {
            return Err(FirmwareImageError::ChecksumMismatch {
                offset: fv::CHECKSUM_OFFSET,
                expected: 0,
                actual: sum as u32,
            });
        }

        let fv_length = header.fv_length.get();
        if fv_length < header_length as u64 {
            return Err(FirmwareImageError::InvalidHeader { offset: 0x20, reason: "volume shorter than its header" });
        }
        if fv_length > buffer.len() as u64 {
            return Err(FirmwareImageError::Truncated {
                offset: 0,
                needed: fv_length,
                available: buffer.len() as u64,
            });
        }

        let mut block_map = <[fv::BlockMapEntry]>::ref_from_bytes(&header_bytes[mem::size_of::<fv::Header>()..])
            .map_err(|_| FirmwareImageError::InvalidHeader { offset: 0x38, reason: "block map is not whole entries" })?
            .to_vec();
        if block_map.pop().map(|entry| entry.num_blocks.get() == 0 && entry.length.get() == 0) != Some(true) {
            return Err(FirmwareImageError::InvalidHeader { offset: 0x38, reason: "block map is not terminated" });
        }
        if block_map.is_empty() || block_map.iter().any(|entry| entry.num_blocks.get() == 0 || entry.length.get() == 0)
        {
            return Err(FirmwareImageError::InvalidHeader { offset: 0x38, reason: "empty block map entry" });
        }

        let content_offset = align_up(header_length, FILE_ALIGNMENT);
        Ok(Self { data: &buffer[..fv_length as usize], header, block_map, content_offset })
    }

    /// Declared volume length.
    pub fn size(&self) -> u64 {
        self.header.fv_length.get()
    }

    /// The file system GUID.
    pub fn file_system_guid(&self) -> efi::Guid {
        efi::Guid::from_bytes(&self.header.file_system_guid)
    }

    /// The volume attribute word.
    pub fn attributes(&self) -> u32 {
        self.header.attributes.get()
    }

    /// The header revision.
    pub fn revision(&self) -> u8 {
        self.header.revision
    }

    /// Block map entries, terminator excluded.
    pub fn block_map(&self) -> &[fv::BlockMapEntry] {
        &self.block_map
    }

    /// The byte unwritten space reads as.
    pub fn erase_byte(&self) -> u8 {
        if self.attributes() & fv::attributes::ERASE_POLARITY != 0 {
            0xFF
        } else {
            0x00
        }
    }

    /// Iterate the files of the volume, FFS_PAD files excluded, with their offsets in the volume.
    pub fn files_with_offsets(&self) -> impl Iterator<Item = Result<(usize, FileRef<'a>), FirmwareImageError>> {
        FileRefIter { data: self.data, next_offset: self.content_offset, erase_byte: self.erase_byte(), error: false }
            .filter(|result| match result {
                Ok((_, file)) => file.file_type_raw() != file::raw::r#type::FFS_PAD,
                Err(_) => true,
            })
    }

    /// Iterate the files of the volume, FFS_PAD files excluded.
    pub fn files(&self) -> impl Iterator<Item = Result<FileRef<'a>, FirmwareImageError>> {
        self.files_with_offsets().map(|result| result.map(|(_, file)| file))
    }

    /// The first file named `name`.
    ///
    /// The walk stops at the first malformed file, which is returned as an error.
    pub fn find_file(&self, name: &efi::Guid) -> Result<Option<FileRef<'a>>, FirmwareImageError> {
        for result in self.files() {
            let file = result?;
            if file.name() == *name {
                return Ok(Some(file));
            }
        }
        Ok(None)
    }
}

impl fmt::Debug for VolumeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VolumeRef")
            .field("file_system_guid", &guid::format_guid(&self.file_system_guid()))
            .field("size", &self.size())
            .field("attributes", &self.attributes())
            .field("block_map", &self.block_map)
            .finish()
    }
}

struct FileRefIter<'a> {
    data: &'a [u8],
    next_offset: usize,
    erase_byte: u8,
    error: bool,
}

impl<'a> Iterator for FileRefIter<'a> {
    type Item = Result<(usize, FileRef<'a>), FirmwareImageError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.error {
            return None;
        }
        let offset = self.next_offset;
        let remaining = self.data.get(offset..)?;
        let header = remaining.get(..FILE_HEADER_SIZE)?;
        if header.iter().all(|&b| b == self.erase_byte) {
            return None;
        }
        match FileRef::new(remaining) {
            Ok(file) => {
                self.next_offset = align_up(offset + file.size(), FILE_ALIGNMENT);
                Some(Ok((offset, file)))
            }
            Err(err) => {
                self.error = true;
                Some(Err(relocate(err, offset)))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        config::FileOptions,
        depex::{build_depex, DepexExpression},
        file::{build_ffs, FileBuilder},
        section::{make_section, ui_section},
    };
    use alloc::{collections::BTreeMap, string::String, vec};
    use fwimage_pi::fw_fs::ffs::{file::raw::r#type, section::raw_type};
    use log::{Level, LevelFilter, Metadata, Record};
    use serde::Deserialize;
    use std::{env, error::Error, fs::File, path::Path, println};

    // Sample logger for log crate to dump stuff in tests
    struct SimpleLogger;
    impl log::Log for SimpleLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= Level::Info
        }

        fn log(&self, record: &Record) {
            if self.enabled(record.metadata()) {
                println!("{}", record.args());
            }
        }

        fn flush(&self) {}
    }
    static LOGGER: SimpleLogger = SimpleLogger;

    fn set_logger() {
        let _ = log::set_logger(&LOGGER).map(|()| log::set_max_level(LevelFilter::Info));
    }

    fn driver(name: &str, payload: &[u8]) -> Vec<u8> {
        let pe = make_section(raw_type::PE32, payload).unwrap();
        build_ffs(r#type::DRIVER, Some(guid::parse_guid(name).unwrap()), &[&pe]).unwrap()
    }

    const DRIVER_A: &str = "0e9b6c1a-4d2b-4c3e-8f7a-6b5c4d3e2f1a";
    const DRIVER_B: &str = "7f3e2d1c-0b9a-4887-a665-544332211000";

    #[test]
    fn header_layout_and_checksum() {
        set_logger();
        let bytes = fv_assemble::<&[u8]>(&VolumeConfig::with_size(0x3000), &[]).unwrap();
        assert_eq!(bytes.len(), 0x3000);
        assert_eq!(bytes[..16], [0u8; 16]);
        assert_eq!(bytes[0x10..0x20], *fwimage_pi::fw_fs::guid::EFI_FIRMWARE_FILE_SYSTEM2_GUID.as_bytes());
        assert_eq!(codec::read64(&bytes, 0x20).unwrap(), 0x3000);
        assert_eq!(bytes[0x28..0x2C], *b"_FVH");
        assert_eq!(codec::read32(&bytes, 0x2C).unwrap(), 0x0004_FEFF);
        assert_eq!(codec::read16(&bytes, 0x30).unwrap(), 0x48);
        assert_eq!(bytes[0x34..0x37], [0, 0, 0]);
        assert_eq!(bytes[0x37], 2);
        assert_eq!(codec::read32(&bytes, 0x38).unwrap(), 3);
        assert_eq!(codec::read32(&bytes, 0x3C).unwrap(), 0x1000);
        assert_eq!(bytes[0x40..0x48], [0u8; 8]);
        assert_eq!(codec::sum16(&bytes[..0x48]), 0);
        assert!(bytes[0x48..].iter().all(|b| *b == 0xFF));

        let volume = VolumeRef::new(&bytes).unwrap();
        assert_eq!(volume.block_map().len(), 1);
        assert_eq!(volume.files().count(), 0);
    }

    #[test]
    fn unaligned_size_is_rejected() {
        assert_eq!(
            VolumeBuilder::new(VolumeConfig::with_size(0x1800)).unwrap_err(),
            FirmwareImageError::UnalignedVolumeSize { size: 0x1800, block_size: 0x1000 }
        );
        assert!(VolumeBuilder::new(VolumeConfig { block_size: 0, ..VolumeConfig::with_size(0x1000) }).is_err());
    }

    #[test]
    fn files_are_aligned_and_state_inverted() {
        set_logger();
        let a = driver(DRIVER_A, &[0x11; 0x25]);
        let options = FileOptions { alignment: 3, ..Default::default() };
        let pe = make_section(raw_type::PE32, &[0x22; 0x40]).unwrap();
        let b = FileBuilder::new(r#type::DRIVER)
            .name(guid::parse_guid(DRIVER_B).unwrap())
            .options(options)
            .sections(&[&pe])
            .unwrap();

        let bytes = fv_assemble(&VolumeConfig::with_size(0x4000), &[&a, &b]).unwrap();
        let volume = VolumeRef::new(&bytes).unwrap();
        let files: Vec<_> = volume.files_with_offsets().collect::<Result<_, _>>().unwrap();
        assert_eq!(files.len(), 2);

        let (offset_a, file_a) = &files[0];
        assert_eq!(offset_a % MIN_FILE_ALIGNMENT, 0);
        // 0x48 is 8 mod 16, and an 8 byte gap cannot hold a pad file.
        assert_eq!(*offset_a, 0x48 + 0x28);
        assert_eq!(file_a.state(), !file::STATE_DATA_VALID);
        assert_eq!(file_a.content(), &a[0x18..]);

        let (offset_b, file_b) = &files[1];
        assert_eq!(*offset_b, 0x1000);
        assert_eq!(file_b.name(), guid::parse_guid(DRIVER_B).unwrap());
        assert_eq!(file_b.state(), 0xF8);
    }

    #[test]
    fn pad_files_fill_alignment_gaps() {
        // 0x40 bytes, so the file after it needs no pad.
        let a = driver(DRIVER_A, &[0x11; 0x24]);
        let bytes = fv_assemble(&VolumeConfig::with_size(0x1000), &[&a]).unwrap();

        let pad = FileRef::new(&bytes[0x48..]).unwrap();
        assert_eq!(pad.file_type_raw(), r#type::FFS_PAD);
        assert_eq!(pad.size(), 0x28);
        assert_eq!(pad.name(), guid::ALL_ONES);

        // a file already on a 16-byte boundary gets no pad file.
        let mut builder = VolumeBuilder::new(VolumeConfig::with_size(0x1000)).unwrap();
        builder.append(&a).unwrap();
        let position = builder.len();
        assert_eq!(position % 16, 0);
        builder.append(&a).unwrap();
        assert_eq!(builder.as_bytes()[position + 0x12], r#type::DRIVER);
    }

    #[test]
    fn files_are_padded_to_eight_bytes() {
        let a = driver(DRIVER_A, &[0x33; 3]);
        assert_eq!(a.len() % 8, 7);
        let mut builder = VolumeBuilder::new(VolumeConfig::with_size(0x1000)).unwrap();
        builder.append(&a).unwrap();
        assert_eq!(builder.len() % 8, 0);
        assert_eq!(builder.as_bytes()[builder.len() - 1], 0xFF);
    }

    #[test]
    fn length_mismatch_leaves_prefix_untouched() {
        let good = driver(DRIVER_A, &[1; 8]);
        let mut bad = driver(DRIVER_B, &[2; 8]);
        bad.push(0);

        let mut builder = VolumeBuilder::new(VolumeConfig::with_size(0x1000)).unwrap();
        builder.append(&good).unwrap();
        let prefix = builder.as_bytes().to_vec();

        let err = builder.append(&bad).unwrap_err();
        assert_eq!(err, FirmwareImageError::LengthMismatch { declared: bad.len() as u64 - 1, actual: bad.len() as u64 });
        assert_eq!(builder.as_bytes(), &prefix[..]);

        // the failure is terminal.
        assert_eq!(builder.append(&good), Err(err.clone()));
        assert_eq!(builder.finish(), Err(err));
    }

    #[test]
    fn overflow_is_reported() {
        let big = driver(DRIVER_A, &[0; 0x1000]);
        assert_eq!(
            fv_assemble(&VolumeConfig::with_size(0x1000), &[&big]),
            Err(FirmwareImageError::VolumeOverflow { declared: 0x1000, actual: 0x1090 })
        );
    }

    #[test]
    fn exact_fit_succeeds() {
        // 0x48 header + 0x28 pad + file == 0x1000.
        let payload_len = 0x1000 - 0x48 - 0x28 - 0x18 - 4;
        let fit = driver(DRIVER_A, &vec![0; payload_len]);
        let bytes = fv_assemble(&VolumeConfig::with_size(0x1000), &[&fit]).unwrap();
        assert_eq!(bytes.len(), 0x1000);
        assert_eq!(VolumeRef::new(&bytes).unwrap().files().count(), 1);
    }

    #[test]
    fn volume_ref_rejects_corruption() {
        let bytes = fv_assemble::<&[u8]>(&VolumeConfig::with_size(0x1000), &[]).unwrap();

        let mut bad = bytes.clone();
        bad[0x28] = b'X';
        assert!(matches!(VolumeRef::new(&bad), Err(FirmwareImageError::InvalidHeader { offset: 0x28, .. })));

        let mut bad = bytes.clone();
        bad[0x2C] ^= 1;
        assert!(matches!(VolumeRef::new(&bad), Err(FirmwareImageError::ChecksumMismatch { .. })));

        assert!(matches!(VolumeRef::new(&bytes[..0x800]), Err(FirmwareImageError::Truncated { needed: 0x1000, .. })));
        assert!(matches!(VolumeRef::new(&bytes[..0x20]), Err(FirmwareImageError::Truncated { .. })));
    }

    #[test]
    fn files_are_found_by_name() {
        set_logger();
        let a = driver(DRIVER_A, &[0x4D, 0x5A, 0x01]);
        let b = FileBuilder::new(r#type::DRIVER)
            .name(guid::parse_guid(DRIVER_B).unwrap())
            .options(FileOptions { alignment: 1, ..Default::default() })
            .sections(&[make_section(raw_type::PE32, &[0x4D, 0x5A, 0x02]).unwrap(), ui_section("DriverB").unwrap()])
            .unwrap();
        let bytes = fv_assemble(&VolumeConfig::with_size(0x4000), &[&a, &b]).unwrap();
        let volume = VolumeRef::new(&bytes).unwrap();

        let found = volume.find_file(&guid::parse_guid(DRIVER_B).unwrap()).unwrap().unwrap();
        assert_eq!(found.content(), &b[0x18..]);
        let pe = found.section(fwimage_pi::fw_fs::ffs::section::Type::Pe32).unwrap().unwrap();
        assert_eq!(pe.payload(), &[0x4D, 0x5A, 0x02]);

        let found = volume.find_file(&guid::parse_guid(DRIVER_A).unwrap()).unwrap().unwrap();
        assert_eq!(found.content(), &a[0x18..]);
        assert_eq!(found.section(fwimage_pi::fw_fs::ffs::section::Type::UserInterface).unwrap(), None);

        assert_eq!(volume.find_file(&guid::ALL_ONES).unwrap(), None);
        assert_eq!(volume.find_file(&guid::parse_guid("1ba0062e-c779-4582-8566-336ae8f78f09").unwrap()).unwrap(), None);
    }

    #[derive(Debug, Deserialize)]
    struct VolumeDescription {
        size: u64,
        files: Vec<FileDescription>,
        expected: Expected,
    }

    #[derive(Debug, Deserialize)]
    struct FileDescription {
        name: Option<String>,
        file_type: String,
        #[serde(default)]
        alignment: u8,
        #[serde(default)]
        depex: Option<Vec<String>>,
        #[serde(default)]
        ui: Option<String>,
        #[serde(default)]
        pe32_size: Option<usize>,
        #[serde(default)]
        raw_size: Option<usize>,
    }

    #[derive(Debug, Deserialize)]
    struct Expected {
        total_number_of_files: usize,
        files: BTreeMap<String, ExpectedFile>,
    }

    #[derive(Debug, Deserialize)]
    struct ExpectedFile {
        offset: usize,
        size: usize,
        file_type: u8,
        number_of_sections: usize,
    }

    fn build_described_file(description: &FileDescription) -> Result<Vec<u8>, Box<dyn Error>> {
        let file_type = file::Type::from_name(&description.file_type).ok_or("unknown file type name")?.raw();
        let mut sections = Vec::new();
        if let Some(tokens) = &description.depex {
            sections.push(build_depex(file_type, &DepexExpression::from_tokens(tokens)?)?);
        }
        if let Some(size) = description.pe32_size {
            sections.push(make_section(raw_type::PE32, &vec![0x5A; size])?);
        }
        if let Some(name) = &description.ui {
            sections.push(ui_section(name)?);
        }
        if let Some(size) = description.raw_size {
            sections.push(make_section(raw_type::RAW, &vec![0xA5; size])?);
        }

        let options = FileOptions { alignment: description.alignment, ..Default::default() };
        let builder = FileBuilder::new(file_type).options(options);
        let builder = match &description.name {
            Some(name) => builder.name(guid::parse_guid(name)?),
            None => builder,
        };
        Ok(builder.sections(&sections)?)
    }

    #[test]
    fn assemble_described_volume() -> Result<(), Box<dyn Error>> {
        set_logger();
        let root = Path::new(&env::var("CARGO_MANIFEST_DIR")?).join("test_resources");
        let description: VolumeDescription =
            serde_yaml::from_reader(File::open(root.join("SAMPLEFV_description.yml"))?)?;

        let files = description.files.iter().map(build_described_file).collect::<Result<Vec<_>, _>>()?;
        let bytes = fv_assemble(&VolumeConfig::with_size(description.size), &files)?;
        assert_eq!(bytes.len() as u64, description.size);

        let volume = VolumeRef::new(&bytes)?;
        let mut expected = description.expected;
        let mut count = 0;
        for result in volume.files_with_offsets() {
            let (offset, file) = result?;
            count += 1;
            let name = guid::format_guid(&file.name());
            if let Some(target) = expected.files.remove(&name) {
                assert_eq!(target.offset, offset, "[{name}] Error with the file offset.");
                assert_eq!(target.size, file.size(), "[{name}] Error with the file size.");
                assert_eq!(target.file_type, file.file_type_raw(), "[{name}] Error with the file type.");
                assert_eq!(
                    target.number_of_sections,
                    file.sections().collect::<Result<Vec<_>, _>>()?.len(),
                    "[{name}] Error with the number of sections."
                );
            }
        }
        assert_eq!(expected.total_number_of_files, count, "The number of files found does not match.");
        assert!(expected.files.is_empty(), "Some file use case has not been run.");
        Ok(())
    }
}
