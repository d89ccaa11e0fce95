use std::{collections::BTreeSet, sync::Arc};

use super::{PageEvent, PageReplacer};
use crate::{future_index::FutureReferenceIndex, types::PageNumber};

/// Belady's optimal replacement, driven by a pre-built index of the whole
/// trace.
///
/// Resident pages are scanned in ascending page number. A page that is never
/// referenced again is evicted on sight; otherwise the page whose next use is
/// farthest away goes. Next uses are distinct trace positions, so the scan
/// order only decides between pages with no future use.
#[derive(Debug)]
pub struct OPTPageReplacer {
    index: Arc<FutureReferenceIndex>,
    resident: BTreeSet<PageNumber>,
    cursor: usize,
}

impl OPTPageReplacer {
    pub fn new(index: Arc<FutureReferenceIndex>) -> Self {
        OPTPageReplacer {
            index,
            resident: BTreeSet::new(),
            cursor: 0,
        }
    }

    /// Trace position of the last fault that needed a victim.
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl PageReplacer for OPTPageReplacer {
    fn page_event(&mut self, event: PageEvent) {
        match event {
            PageEvent::Loaded { page, .. } => {
                self.resident.insert(page);
            }
            PageEvent::Evicted(page) => {
                self.resident.remove(&page);
            }
            PageEvent::Touched(_) => {}
        }
    }

    fn pick_replacement_page(&mut self, position: usize) -> PageNumber {
        self.cursor = position;

        let mut victim = None;
        let mut farthest = 0;

        for &page in &self.resident {
            match self.index.next_reference_after(page, position) {
                None => return page,
                Some(next_use) => {
                    if victim.is_none() || next_use > farthest {
                        farthest = next_use;
                        victim = Some(page);
                    }
                }
            }
        }

        match victim {
            Some(page) => page,
            None => panic!("opt: no resident page to evict"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_replacer::testing::victims;

    fn replacer_for(pages: &[PageNumber]) -> OPTPageReplacer {
        let index = FutureReferenceIndex::from_pages(pages.iter().copied());

        OPTPageReplacer::new(Arc::new(index))
    }

    #[test]
    fn evicts_farthest_next_use() {
        // fault at 3: next uses 1@4, 2@5, 3@9 -> 3
        // fault at 6: 4 is never used again -> 4
        // fault at 9: 1 is never used again and scanned first -> 1
        let pages = [1, 2, 3, 4, 1, 2, 5, 1, 2, 3];
        let mut opt = replacer_for(&pages);

        assert_eq!(victims(&mut opt, 3, &pages), vec![3, 4, 1]);
        assert_eq!(opt.cursor(), 9);
    }

    #[test]
    fn never_used_again_ties_go_to_lowest_page() {
        let pages = [5, 3, 9, 1];
        let mut opt = replacer_for(&pages);

        assert_eq!(victims(&mut opt, 3, &pages), vec![3]);
    }

    #[test]
    fn beats_fifo_and_lru_on_textbook_sequence() {
        let pages = [7, 0, 1, 2, 0, 3, 0, 4, 2, 3, 0, 3, 2, 1, 2, 0, 1, 7, 0, 1];
        let mut opt = replacer_for(&pages);

        // 3 initial loads + 6 replacements = 9 faults
        assert_eq!(victims(&mut opt, 3, &pages), vec![7, 1, 0, 4, 3, 2]);
    }

    #[test]
    #[should_panic]
    fn empty_resident_set_is_fatal() {
        replacer_for(&[]).pick_replacement_page(0);
    }
}
