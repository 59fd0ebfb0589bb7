//! NVAR stores.
//!
//! A store owns the bytes of an NVRAM region and hands out [`RecordRef`]s that borrow from it. Records
//! are laid out back to back. A variable that was updated keeps its original named record, whose
//! next link leads, one relative offset at a time, to the data-only record holding the current value.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: Apache-2.0
//!
use alloc::vec::Vec;

use fwimage_pi::codec::{self, MAX_U24};

use crate::{
    record::{self, NvarRecord, RecordRef, HEADER_SIZE, NEXT_OFFSET},
    NvarError,
};

/// An NVRAM region holding NVAR records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NvarStore {
    buf: Vec<u8>,
}

impl NvarStore {
    /// Take ownership of a region.
    pub fn new(buf: Vec<u8>) -> Self {
        Self { buf }
    }

    /// The raw region.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Release the region.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Parse the record at `offset`.
    pub fn record_at(&self, offset: usize) -> Result<Option<RecordRef<'_>>, NvarError> {
        record::parse(&self.buf, offset)
    }

    /// Iterate the records in storage order, stopping at erased space or after the first error.
    pub fn records(&self) -> RecordIter<'_> {
        RecordIter { buf: &self.buf, offset: 0, done: false }
    }

    /// Follow the update chain from the record at `offset` to its last record.
    ///
    /// A link into erased space ends the chain at the linking record, which is what an interrupted
    /// update leaves behind.
    pub fn latest(&self, offset: usize) -> Result<RecordRef<'_>, NvarError> {
        let mut current = self.record_at(offset)?.ok_or(NvarError::NextOutOfRange { offset, target: offset as u64 })?;
        let max_hops = self.buf.len() / HEADER_SIZE;
        for _ in 0..max_hops {
            let Some(target) = current.next() else {
                return Ok(current);
            };
            if target <= current.offset() || target >= self.buf.len() {
                return Err(NvarError::NextOutOfRange { offset: current.offset(), target: target as u64 });
            }
            match self.record_at(target)? {
                Some(next) => {
                    log::trace!("record {:#x} updated by {target:#x}", current.offset());
                    current = next;
                }
                None => {
                    log::warn!("update chain of record {offset:#x} ends in erased space at {target:#x}");
                    return Ok(current);
                }
            }
        }
        Err(NvarError::ChainLoop { offset, hops: max_hops })
    }

    /// Find the named variable `name` and return the record holding its current data.
    pub fn find(&self, name: &str) -> Result<Option<RecordRef<'_>>, NvarError> {
        for result in self.records() {
            let record = result?;
            if record.name() == Some(name.as_bytes()) {
                return self.latest(record.offset()).map(Some);
            }
        }
        Ok(None)
    }
}

/// Iterator over the records of a store.
#[derive(Debug, Clone)]
pub struct RecordIter<'a> {
    buf: &'a [u8],
    offset: usize,
    done: bool,
}

impl<'a> Iterator for RecordIter<'a> {
    type Item = Result<RecordRef<'a>, NvarError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match record::parse(self.buf, self.offset) {
            Ok(Some(record)) => {
                self.offset += record.length();
                Some(Ok(record))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// Lays out records back to back in a region of fixed capacity.
#[derive(Debug, Clone)]
pub struct NvarStoreBuilder {
    capacity: usize,
    buf: Vec<u8>,
}

impl NvarStoreBuilder {
    /// A builder for a region of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self { capacity, buf: Vec::new() }
    }

    /// Append `record` and return its offset.
    pub fn push(&mut self, record: &NvarRecord) -> Result<usize, NvarError> {
        let bytes = record::serialize(record)?;
        let offset = self.buf.len();
        let needed = offset + bytes.len();
        if needed > self.capacity {
            return Err(NvarError::StoreFull { capacity: self.capacity, needed });
        }
        log::debug!("record at {offset:#x}, length {:#x}, attributes {:#04x}", bytes.len(), bytes[9]);
        self.buf.extend(bytes);
        Ok(offset)
    }

    /// Append `record` as the update of the record at `previous`, linking it into that record's chain.
    ///
    /// `previous` must be the last record of its chain; linking a record twice fails with
    /// [`NvarError::AlreadyLinked`].
    pub fn push_update(&mut self, previous: usize, record: &NvarRecord) -> Result<usize, NvarError> {
        // nothing is written unless the linked record exists and ends its chain.
        let linked = record::parse(&self.buf, previous)?.ok_or(NvarError::NextOutOfRange {
            offset: previous,
            target: self.buf.len() as u64,
        })?;
        if linked.next_raw() != record::NO_NEXT {
            return Err(NvarError::AlreadyLinked { offset: previous, next: linked.next_raw() });
        }
        let relative = self.buf.len() - previous;
        if relative > (MAX_U24 - 1) as usize {
            return Err(NvarError::NextOutOfRange { offset: previous, target: self.buf.len() as u64 });
        }

        let offset = self.push(record)?;
        let field = previous + NEXT_OFFSET;
        self.buf[field..field + 3].copy_from_slice(&codec::write24(relative as u32));
        Ok(offset)
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether no record has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Fill the rest of the region with 0xFF.
    pub fn finish(mut self) -> NvarStore {
        self.buf.resize(self.capacity, 0xFF);
        NvarStore::new(self.buf)
    }
}
