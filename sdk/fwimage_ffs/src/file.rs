//! FFS file encoding and decoding.
//!
//! A file is a 24-byte header (name, checksums, type, attributes, 24-bit length, state) followed by
//! either an aligned section stream or raw bytes. The header checksum byte is chosen so that every
//! header byte except the state byte sums to zero; the data checksum byte takes part in that sum.
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
    codec::{self, MAX_U24},
    fw_fs::ffs::{
        attributes::{self, raw::LARGE_FILE},
        file::{self, raw::state},
        section::Type as SectionType,
    },
    guid,
};
use r_efi::efi;
use zerocopy::{FromBytes, IntoBytes};

use crate::{
    align::align_sections,
    config::{FileOptions, HeaderFormat},
    hash::ContentHasher,
    section::{relocate, SectionIterator},
    FirmwareImageError,
};

/// Size of a standard FFS file header.
pub const HEADER_SIZE: usize = mem::size_of::<file::Header>();

/// Size of an extended FFS file header.
pub const EXTENDED_HEADER_SIZE: usize = mem::size_of::<file::Header2>();

/// Builds FFS files of one type.
///
/// ## Examples
///
/// ```rust
/// use fwimage_ffs::{file::{FileBuilder, FileRef}, section::make_section};
/// use fwimage_pi::{fw_fs::ffs::{file, section}, guid::parse_guid};
///
/// let name = parse_guid("aa1d3f2e-5a7c-4b2d-9f10-3d2c1b0a9e8f")?;
/// let pe = make_section(section::raw_type::PE32, &[0x4d, 0x5a])?;
/// let bytes = FileBuilder::new(file::raw::r#type::DRIVER).name(name).sections(&[pe])?;
///
/// let file = FileRef::new(&bytes)?;
/// assert_eq!(file.name(), name);
/// assert_eq!(file.size(), 0x18 + 6);
/// # Ok::<(), Box<dyn core::error::Error>>(())
/// ```
#[derive(Clone, Copy)]
pub struct FileBuilder<'a> {
    file_type: u8,
    name: Option<efi::Guid>,
    options: FileOptions,
    hasher: Option<&'a dyn ContentHasher>,
}

impl<'a> FileBuilder<'a> {
    /// A builder for files of raw type `file_type` with default options.
    pub fn new(file_type: u8) -> Self {
        Self { file_type, name: None, options: FileOptions::default(), hasher: None }
    }

    /// Name the file. Without a name the file is named after its content.
    pub fn name(mut self, name: efi::Guid) -> Self {
        self.name = Some(name);
        self
    }

    /// Set the attribute and header options.
    pub fn options(mut self, options: FileOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the strategy used to name files built without a name.
    pub fn hasher(mut self, hasher: &'a dyn ContentHasher) -> Self {
        self.hasher = Some(hasher);
        self
    }

    /// Build a file whose payload is `sections`, aligned for their position after the file header.
    ///
    /// A file that needs an extended header has its sections aligned against the extended header size.
    pub fn sections<S: AsRef<[u8]>>(&self, sections: &[S]) -> Result<Vec<u8>, FirmwareImageError> {
        self.check_type()?;
        let section_alignment = self.options.section_alignment as usize;
        let payload = align_sections(HEADER_SIZE, section_alignment, sections)?;
        if self.options.header_format == HeaderFormat::Extended && HEADER_SIZE + payload.len() > MAX_U24 as usize {
            let payload = align_sections(EXTENDED_HEADER_SIZE, section_alignment, sections)?;
            return self.build(&payload, true);
        }
        self.build(&payload, false)
    }

    /// Build a file whose payload is `data` with no section framing.
    pub fn raw_data(&self, data: &[u8]) -> Result<Vec<u8>, FirmwareImageError> {
        self.check_type()?;
        self.build(data, false)
    }

    fn check_type(&self) -> Result<file::Type, FirmwareImageError> {
        file::Type::from_raw(self.file_type).ok_or(FirmwareImageError::UnknownFileType(self.file_type))
    }

    fn resolve_name(&self, payload: &[u8]) -> Result<efi::Guid, FirmwareImageError> {
        if let Some(name) = self.name {
            return Ok(name);
        }
        match self.hasher {
            Some(hasher) => Ok(hasher.name_for(payload)),
            #[cfg(feature = "sha1")]
            None => Ok(crate::hash::Sha1ContentHasher.name_for(payload)),
            #[cfg(not(feature = "sha1"))]
            None => Err(FirmwareImageError::MissingName),
        }
    }

    fn build(&self, payload: &[u8], extended: bool) -> Result<Vec<u8>, FirmwareImageError> {
        let file_type = self.check_type()?;
        let name = self.resolve_name(payload)?;

        let mut attrs = attributes::with_data_alignment(0, self.options.alignment);
        let integrity_check_file = if self.options.data_checksum {
            attrs |= attributes::raw::CHECKSUM;
            0u8.wrapping_sub(codec::sum8(payload))
        } else {
            file::FIXED_DATA_CHECKSUM
        };

        let mut header = file::Header {
            name: *name.as_bytes(),
            integrity_check_header: 0,
            integrity_check_file,
            file_type: file_type.raw(),
            attributes: attrs,
            size: [0u8; 3],
            state: 0,
        };

        let standard_size = (HEADER_SIZE + payload.len()) as u64;
        let mut buf = if !extended && standard_size <= MAX_U24 as u64 {
            header.size = codec::write24(standard_size as u32);
            header.integrity_check_header = 0u8.wrapping_sub(codec::sum8(header.as_bytes()));
            Vec::from(header.as_bytes())
        } else if self.options.header_format == HeaderFormat::Extended {
            header.attributes |= LARGE_FILE;
            let extended_size = (EXTENDED_HEADER_SIZE + payload.len()) as u64;
            let mut header2 = file::Header2 { header, extended_size: extended_size.into() };
            header2.header.integrity_check_header = 0u8.wrapping_sub(codec::sum8(header2.as_bytes()));
            Vec::from(header2.as_bytes())
        } else {
            return Err(FirmwareImageError::FileTooLarge { size: standard_size, max: MAX_U24 as u64 });
        };

        // state is excluded from the header checksum, so it is filled in last.
        buf[file::STATE_OFFSET] = match file_type {
            file::Type::FfsPad => file::STATE_PAD,
            _ => file::STATE_DATA_VALID,
        };
        buf.extend_from_slice(payload);

        log::debug!(
            "file {} type {:#04x} attributes {:#04x} length {:#x}",
            guid::format_guid(&name),
            file_type.raw(),
            buf[file::ATTRIBUTES_OFFSET],
            buf.len()
        );
        Ok(buf)
    }
}

impl fmt::Debug for FileBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileBuilder")
            .field("file_type", &self.file_type)
            .field("name", &self.name)
            .field("options", &self.options)
            .field("hasher", &self.hasher.is_some())
            .finish()
    }
}

/// Build a file of raw type `file_type` from `sections`.
///
/// A file built without a `name` is named by the default content hasher.
pub fn build_ffs<S: AsRef<[u8]>>(
    file_type: u8,
    name: Option<efi::Guid>,
    sections: &[S],
) -> Result<Vec<u8>, FirmwareImageError> {
    let builder = FileBuilder::new(file_type);
    match name {
        Some(name) => builder.name(name).sections(sections),
        None => builder.sections(sections),
    }
}

/// Build an FFS_PAD file of exactly `size` bytes.
///
/// Returns an empty buffer when `size` is not larger than the file header.
pub fn build_ffs_pad(size: usize) -> Result<Vec<u8>, FirmwareImageError> {
    if size <= HEADER_SIZE {
        return Ok(Vec::new());
    }
    log::trace!("pad file of {size:#x} bytes");
    FileBuilder::new(file::raw::r#type::FFS_PAD).name(guid::ALL_ONES).raw_data(&alloc::vec![0xFF; size - HEADER_SIZE])
}

/// A validated FFS file inside a byte buffer.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FileRef<'a> {
    data: &'a [u8],
    header: file::Header,
    content_offset: usize,
}

impl<'a> FileRef<'a> {
    /// Parse the file at the start of `buffer`.
    ///
    /// Validates the length, the header checksum, the state (header and data valid under either erase
    /// polarity), and the data checksum or its fixed 0xAA value.
    pub fn new(buffer: &'a [u8]) -> Result<Self, FirmwareImageError> {
        let (header, _) = file::Header::read_from_prefix(buffer).map_err(|_| FirmwareImageError::Truncated {
            offset: 0,
            needed: HEADER_SIZE as u64,
            available: buffer.len() as u64,
        })?;

        let (size, content_offset) = if header.attributes & LARGE_FILE == 0 {
            (codec::read24(&header.size, 0)? as u64, HEADER_SIZE)
        } else {
            (codec::read64(buffer, HEADER_SIZE)?, EXTENDED_HEADER_SIZE)
        };
        if size < content_offset as u64 {
            return Err(FirmwareImageError::InvalidHeader { offset: 0, reason: "file length smaller than its header" });
        }
        if size > buffer.len() as u64 {
            return Err(FirmwareImageError::Truncated { offset: 0, needed: size, available: buffer.len() as u64 });
        }
        let data = &buffer[..size as usize];

        let normalized = if header.state & state::ERASE_POLARITY_HINT == 0 { header.state } else { !header.state };
        if normalized & 0xFC != state::DATA_VALID {
            return Err(FirmwareImageError::InvalidHeader { offset: file::STATE_OFFSET, reason: "file is not DATA_VALID" });
        }

        let sum = codec::sum8(&data[..content_offset]).wrapping_sub(header.state);
        if sum != 0 {
            return Err(FirmwareImageError::ChecksumMismatch { offset: 0, expected: 0, actual: sum as u32 });
        }

        if header.attributes & attributes::raw::CHECKSUM == 0 {
            if header.integrity_check_file != file::FIXED_DATA_CHECKSUM {
                return Err(FirmwareImageError::ChecksumMismatch {
                    offset: 0x11,
                    expected: file::FIXED_DATA_CHECKSUM as u32,
                    actual: header.integrity_check_file as u32,
                });
            }
        } else {
            let sum = codec::sum8(&data[content_offset..]).wrapping_add(header.integrity_check_file);
            if sum != 0 {
                return Err(FirmwareImageError::ChecksumMismatch {
                    offset: content_offset,
                    expected: 0,
                    actual: sum as u32,
                });
            }
        }

        Ok(Self { data, header, content_offset })
    }

    /// Total file length, header included.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// The file name.
    pub fn name(&self) -> efi::Guid {
        efi::Guid::from_bytes(&self.header.name)
    }

    /// The raw file type byte.
    pub fn file_type_raw(&self) -> u8 {
        self.header.file_type
    }

    /// The file type when it is in the file type table.
    pub fn file_type(&self) -> Option<file::Type> {
        file::Type::from_raw(self.header.file_type)
    }

    /// The raw attribute byte.
    pub fn attributes_raw(&self) -> u8 {
        self.header.attributes
    }

    /// The raw state byte.
    pub fn state(&self) -> u8 {
        self.header.state
    }

    /// Whether the state byte is stored with erase polarity 1.
    pub fn erase_polarity(&self) -> bool {
        self.header.state & state::ERASE_POLARITY_HINT != 0
    }

    /// The payload following the header.
    pub fn content(&self) -> &'a [u8] {
        &self.data[self.content_offset..]
    }

    /// The full serialized file.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    /// Iterate the sections of the payload. Section offsets in errors are relative to the file start.
    pub fn sections(&self) -> impl Iterator<Item = Result<crate::section::SectionRef<'a>, FirmwareImageError>> + 'a {
        let content_offset = self.content_offset;
        SectionIterator::new(self.content()).map(move |result| result.map_err(|err| relocate(err, content_offset)))
    }

    /// The first section of `section_type`, or `None` when the file has none.
    ///
    /// A malformed section before the match is reported as an error.
    pub fn section(&self, section_type: SectionType) -> Result<Option<crate::section::SectionRef<'a>>, FirmwareImageError> {
        for result in self.sections() {
            let section = result?;
            if section.section_type() == Some(section_type) {
                return Ok(Some(section));
            }
        }
        Ok(None)
    }
}

impl fmt::Debug for FileRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileRef")
            .field("name", &guid::format_guid(&self.name()))
            .field("file_type", &self.header.file_type)
            .field("attributes", &self.header.attributes)
            .field("state", &self.header.state)
            .field("size", &self.size())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        hash::MockContentHasher,
        section::{make_section, make_section_with_format, parse_section},
    };
    use alloc::vec;
    use fwimage_pi::fw_fs::ffs::{file::raw::r#type, section::raw_type};

    const NAME: &str = "1ba0062e-c779-4582-8566-336ae8f78f09";

    fn header_sum_without_state(bytes: &[u8]) -> u8 {
        codec::sum8(&bytes[..HEADER_SIZE]).wrapping_sub(bytes[file::STATE_OFFSET])
    }

    #[test]
    fn header_layout_and_checksum() {
        let name = guid::parse_guid(NAME).unwrap();
        let pe = make_section(raw_type::PE32, &[1, 2, 3, 4]).unwrap();
        let bytes = build_ffs(r#type::DRIVER, Some(name), &[&pe]).unwrap();

        assert_eq!(bytes.len(), 0x18 + 8);
        assert_eq!(bytes[..16], guid::guid_to_bytes(NAME).unwrap());
        assert_eq!(bytes[0x11], 0xAA);
        assert_eq!(bytes[0x12], r#type::DRIVER);
        assert_eq!(bytes[0x13], 0x00);
        assert_eq!(bytes[0x14..0x17], [0x20, 0x00, 0x00]);
        assert_eq!(bytes[0x17], 0x07);
        assert_eq!(header_sum_without_state(&bytes), 0);
        assert_eq!(bytes[0x18..], pe[..]);
    }

    #[test]
    fn sections_are_aligned_inside_the_file() {
        let a = make_section(raw_type::RAW, &[1]).unwrap();
        let b = make_section(raw_type::RAW, &[2]).unwrap();
        let bytes = build_ffs(r#type::FREEFORM, Some(guid::ALL_ONES), &[&a, &b]).unwrap();
        assert_eq!(bytes.len(), 0x18 + 8 + 5);

        let file = FileRef::new(&bytes).unwrap();
        let sections: Vec<_> = file.sections().collect::<Result<_, _>>().unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[1].payload(), &[2]);
    }

    #[test]
    fn unnamed_files_are_content_addressed() {
        let pe = make_section(raw_type::PE32, &[0xEE; 0x10]).unwrap();
        let first = build_ffs(r#type::APPLICATION, None, &[&pe]).unwrap();
        let second = build_ffs(r#type::APPLICATION, None, &[&pe]).unwrap();
        assert_eq!(first[..16], second[..16]);
        assert_eq!(first, second);

        let other = make_section(raw_type::PE32, &[0xEF; 0x10]).unwrap();
        let third = build_ffs(r#type::APPLICATION, None, &[&other]).unwrap();
        assert_ne!(first[..16], third[..16]);
    }

    #[test]
    fn hasher_sees_the_aligned_payload() {
        let a = make_section(raw_type::RAW, &[1]).unwrap();
        let b = make_section(raw_type::RAW, &[2]).unwrap();
        let expected_payload = align_sections(HEADER_SIZE, 0, &[&a, &b]).unwrap();
        let name = guid::parse_guid(NAME).unwrap();

        let mut hasher = MockContentHasher::new();
        hasher.expect_name_for().withf(move |payload| payload == expected_payload.as_slice()).times(1).return_const(name);

        let bytes = FileBuilder::new(r#type::FREEFORM).hasher(&hasher).sections(&[&a, &b]).unwrap();
        assert_eq!(FileRef::new(&bytes).unwrap().name(), name);
    }

    #[test]
    fn unknown_file_type_fails() {
        let sections: [&[u8]; 0] = [];
        assert_eq!(build_ffs(0x0E, Some(guid::ALL_ONES), &sections), Err(FirmwareImageError::UnknownFileType(0x0E)));
        assert_eq!(
            FileBuilder::new(0xF1).name(guid::ALL_ONES).raw_data(&[]),
            Err(FirmwareImageError::UnknownFileType(0xF1))
        );
    }

    #[test]
    fn debug_types_are_accepted() {
        let bytes = FileBuilder::new(0xE3).name(guid::ALL_ONES).raw_data(&[9, 9]).unwrap();
        assert_eq!(FileRef::new(&bytes).unwrap().file_type(), Some(file::Type::Debug(0xE3)));
    }

    #[test]
    fn data_checksum_and_alignment_options() {
        let options = FileOptions { data_checksum: true, alignment: 5, ..Default::default() };
        let bytes = FileBuilder::new(r#type::RAW).name(guid::ALL_ONES).options(options).raw_data(&[1, 2, 3]).unwrap();

        assert_eq!(bytes[0x13], attributes::raw::CHECKSUM | (5 << 3));
        assert_eq!(bytes[0x11], 0u8.wrapping_sub(6));
        assert_eq!(header_sum_without_state(&bytes), 0);
        let file = FileRef::new(&bytes).unwrap();
        assert_eq!(attributes::data_alignment(file.attributes_raw()), 5);
        assert_eq!(file.content(), &[1, 2, 3]);
    }

    #[test]
    fn section_alignment_option() {
        let options = FileOptions { section_alignment: 0x20, ..Default::default() };
        let pe = make_section(raw_type::PE32, &[0; 4]).unwrap();
        let bytes = FileBuilder::new(r#type::DRIVER).name(guid::ALL_ONES).options(options).sections(&[&pe]).unwrap();
        let file = FileRef::new(&bytes).unwrap();
        let sections: Vec<_> = file.sections().collect::<Result<_, _>>().unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].section_type_raw(), raw_type::RAW);
        let pe_offset = bytes.len() - pe.len();
        assert_eq!(pe_offset % 0x20, 0);
    }

    #[test]
    fn section_lookup_by_type() {
        let pe = make_section(raw_type::PE32, &[0x4D, 0x5A]).unwrap();
        let ui = crate::section::ui_section("Shell").unwrap();
        let bytes = build_ffs(r#type::APPLICATION, Some(guid::ALL_ONES), &[&pe, &ui]).unwrap();
        let file = FileRef::new(&bytes).unwrap();

        assert_eq!(file.section(SectionType::Pe32).unwrap().unwrap().payload(), &[0x4D, 0x5A]);
        assert_eq!(file.section(SectionType::UserInterface).unwrap().unwrap().as_bytes(), &ui[..]);
        assert_eq!(file.section(SectionType::Te).unwrap(), None);

        let mut bad = FileBuilder::new(r#type::FREEFORM).name(guid::ALL_ONES).raw_data(&[0x20, 0, 0, raw_type::RAW]).unwrap();
        assert!(matches!(
            FileRef::new(&bad).unwrap().section(SectionType::Pe32),
            Err(FirmwareImageError::Truncated { offset: 0x18, .. })
        ));
        bad[0x18] = 0x04;
        assert_eq!(FileRef::new(&bad).unwrap().section(SectionType::Pe32), Ok(None));
    }

    #[test]
    fn extended_files_align_sections_after_the_extended_header() {
        let options =
            FileOptions { header_format: HeaderFormat::Extended, section_alignment: 0x10, ..Default::default() };
        let pe = make_section(raw_type::PE32, &[0xCC; 4]).unwrap();
        let big = make_section_with_format(raw_type::RAW, &vec![0x11; 0x800000], HeaderFormat::Extended).unwrap();
        let bytes = FileBuilder::new(r#type::DRIVER)
            .name(guid::ALL_ONES)
            .options(options)
            .sections(&[&pe, &big, &big])
            .unwrap();

        assert_eq!(bytes[0x13] & LARGE_FILE, LARGE_FILE);
        let file = FileRef::new(&bytes).unwrap();
        assert_eq!(file.size(), bytes.len());
        assert_eq!(file.content().as_ptr() as usize - bytes.as_ptr() as usize, EXTENDED_HEADER_SIZE);

        let sections: Vec<_> = file.sections().collect::<Result<_, _>>().unwrap();
        let placed: Vec<_> = sections
            .iter()
            .filter(|section| section.section_type_raw() == raw_type::PE32 || section.size() == big.len())
            .collect();
        assert_eq!(placed.len(), 3);
        assert_eq!(placed[0].as_bytes(), &pe[..]);
        for section in placed {
            let offset = section.as_bytes().as_ptr() as usize - bytes.as_ptr() as usize;
            assert_eq!(offset % 0x10, 0, "section at {offset:#x} is not aligned");
        }
    }

    #[test]
    fn oversized_files() {
        let payload = vec![0u8; MAX_U24 as usize - HEADER_SIZE + 1];
        let builder = FileBuilder::new(r#type::RAW).name(guid::ALL_ONES);
        assert_eq!(
            builder.raw_data(&payload),
            Err(FirmwareImageError::FileTooLarge { size: MAX_U24 as u64 + 1, max: MAX_U24 as u64 })
        );

        let options = FileOptions { header_format: HeaderFormat::Extended, ..Default::default() };
        let bytes = builder.options(options).raw_data(&payload).unwrap();
        assert_eq!(bytes[0x13] & LARGE_FILE, LARGE_FILE);
        assert_eq!(bytes[0x14..0x17], [0, 0, 0]);
        assert_eq!(codec::read64(&bytes, 0x18).unwrap(), (EXTENDED_HEADER_SIZE + payload.len()) as u64);
        let file = FileRef::new(&bytes).unwrap();
        assert_eq!(file.content().len(), payload.len());
    }

    #[test]
    fn pad_files() {
        assert!(build_ffs_pad(0).unwrap().is_empty());
        assert!(build_ffs_pad(0x18).unwrap().is_empty());

        let pad = build_ffs_pad(0x20).unwrap();
        assert_eq!(pad.len(), 0x20);
        let file = FileRef::new(&pad).unwrap();
        assert_eq!(file.file_type(), Some(file::Type::FfsPad));
        assert_eq!(file.name().as_bytes(), &[0xFF; 16]);
        assert_eq!(file.size(), 0x20);
        assert_eq!(file.state(), 0xF8);
        assert!(file.erase_polarity());
        assert_eq!(file.content(), &[0xFF; 8]);
        assert_eq!(header_sum_without_state(&pad), 0);
    }

    #[test]
    fn file_ref_rejects_corruption() {
        let pe = make_section(raw_type::PE32, &[1, 2, 3, 4]).unwrap();
        let good = build_ffs(r#type::DRIVER, Some(guid::ALL_ONES), &[&pe]).unwrap();

        assert!(matches!(FileRef::new(&good[..0x10]), Err(FirmwareImageError::Truncated { .. })));
        assert!(matches!(FileRef::new(&good[..0x1C]), Err(FirmwareImageError::Truncated { needed: 0x20, .. })));

        let mut bad = good.clone();
        bad[0x12] = r#type::PEIM;
        assert!(matches!(FileRef::new(&bad), Err(FirmwareImageError::ChecksumMismatch { offset: 0, .. })));

        let mut bad = good.clone();
        bad[0x17] = 0x03;
        assert!(matches!(FileRef::new(&bad), Err(FirmwareImageError::InvalidHeader { offset: 0x17, .. })));

        // state is outside the checksum, so a polarity flip still validates.
        let mut flipped = good.clone();
        flipped[0x17] = !flipped[0x17];
        assert!(FileRef::new(&flipped).unwrap().erase_polarity());

        let options = FileOptions { data_checksum: true, ..Default::default() };
        let mut bad = FileBuilder::new(r#type::RAW).name(guid::ALL_ONES).options(options).raw_data(&[1, 2]).unwrap();
        let last = bad.len() - 1;
        bad[last] ^= 0xFF;
        assert!(matches!(FileRef::new(&bad), Err(FirmwareImageError::ChecksumMismatch { offset: 0x18, .. })));
    }

    #[test]
    fn section_errors_carry_file_offsets() {
        let mut bytes = FileBuilder::new(r#type::FREEFORM)
            .name(guid::ALL_ONES)
            .raw_data(&[0x09, 0x00, 0x00, raw_type::RAW, 0, 0, 0, 0, 0])
            .unwrap();
        assert!(parse_section(FileRef::new(&bytes).unwrap().content()).is_ok());

        // stretch the section past the end of the file.
        bytes[0x18] = 0x20;
        let results: Vec<_> = FileRef::new(&bytes).unwrap().sections().collect();
        assert!(matches!(results[..], [Err(FirmwareImageError::Truncated { offset: 0x18, .. })]));
    }
}
