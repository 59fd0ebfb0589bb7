//! Section stream alignment.
//!
//! Sections inside a file always start on a 4-byte boundary. A caller may also ask for a larger
//! alignment of each section's absolute position in the file, which is met by inserting RAW pad
//! sections. Both that alignment and the offset of the stream in its file must be multiples of 4,
//! which keeps every gap a multiple of 4 and large enough for a pad section header.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: Apache-2.0
//!
use alloc::vec::Vec;

use crate::{section::make_pad_section, FirmwareImageError};

/// Mandatory alignment of every section in a section stream.
pub const SECTION_ALIGNMENT: usize = 4;

/// Round `value` up to a multiple of `align`. An `align` of zero leaves `value` unchanged.
pub const fn align_up(value: usize, align: usize) -> usize {
    if align == 0 {
        return value;
    }
    match value % align {
        0 => value,
        rem => value + (align - rem),
    }
}

/// Concatenate `sections`, each starting on a 4-byte boundary of the output.
///
/// If `pad_align` is nonzero each section additionally starts where `pad_offset + position` is a
/// multiple of `pad_align`, with pad sections filling the gap. `pad_offset` is the offset the output
/// will sit at in its file, usually the file header size. When `pad_align` is larger than 4, both it and
/// `pad_offset` must be multiples of 4, otherwise [`FirmwareImageError::InvalidAlignment`] is returned.
pub fn align_sections<S: AsRef<[u8]>>(
    pad_offset: usize,
    pad_align: usize,
    sections: &[S],
) -> Result<Vec<u8>, FirmwareImageError> {
    if pad_align > SECTION_ALIGNMENT && (pad_align % SECTION_ALIGNMENT != 0 || pad_offset % SECTION_ALIGNMENT != 0) {
        return Err(FirmwareImageError::InvalidAlignment { offset: pad_offset, alignment: pad_align });
    }

    let mut buf = Vec::new();
    for section in sections {
        buf.resize(align_up(buf.len(), SECTION_ALIGNMENT), 0);

        if pad_align > SECTION_ALIGNMENT {
            let position = pad_offset + buf.len();
            let gap = align_up(position, pad_align) - position;
            if gap != 0 {
                log::trace!("padding section at {position:#x} by {gap:#x} to {pad_align:#x} alignment");
                buf.extend(make_pad_section(gap)?);
            }
        }

        buf.extend_from_slice(section.as_ref());
    }
    Ok(buf)
}
