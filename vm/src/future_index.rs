//! Offline index of where each page is referenced, used by OPT.

use std::collections::HashMap;

use crate::{
    error::Result,
    reference::decode,
    trace::{TraceReader, TraceSource},
    types::PageNumber,
};

/// Page number to the ascending list of trace positions referencing it.
///
/// Built in one forward pass before the simulation starts and read-only
/// afterwards, so a single index can back every OPT run over the same trace.
#[derive(Debug, Default, Clone)]
pub struct FutureReferenceIndex {
    positions: HashMap<PageNumber, Vec<usize>>,
    references: usize,
}

impl FutureReferenceIndex {
    /// Scans the whole trace. Lines that don't decode are not indexed but
    /// still consume a position.
    pub fn build<S: TraceSource + ?Sized>(source: &S) -> Result<Self> {
        let mut index = FutureReferenceIndex::default();

        for line in TraceReader::open(source)? {
            let (position, line) = line?;

            if let Some(reference) = decode(&line) {
                index.record(reference.page_number, position);
            }
        }

        Ok(index)
    }

    /// Builds from already decoded page numbers, positions `0..`.
    pub fn from_pages<I: IntoIterator<Item = PageNumber>>(pages: I) -> Self {
        let mut index = FutureReferenceIndex::default();

        for (position, page) in pages.into_iter().enumerate() {
            index.record(page, position);
        }

        index
    }

    fn record(&mut self, page: PageNumber, position: usize) {
        let list = self.positions.entry(page).or_default();

        debug_assert!(list.last().map_or(true, |&last| last < position));

        list.push(position);
        self.references += 1;
    }

    /// Smallest recorded position for `page` strictly after `position`.
    pub fn next_reference_after(&self, page: PageNumber, position: usize) -> Option<usize> {
        let list = self.positions.get(&page)?;
        let idx = list.partition_point(|&p| p <= position);

        list.get(idx).copied()
    }

    pub fn references_of(&self, page: PageNumber) -> &[usize] {
        self.positions.get(&page).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn page_count(&self) -> usize {
        self.positions.len()
    }

    pub fn len(&self) -> usize {
        self.references
    }

    pub fn is_empty(&self) -> bool {
        self.references == 0
    }
}
