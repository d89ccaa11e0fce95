use std::collections::{HashSet, VecDeque};

use super::{PageEvent, PageReplacer};
use crate::types::PageNumber;

/// Evicts the page admitted longest ago. Hits don't reorder anything.
#[derive(Debug, Default)]
pub struct FIFOPageReplacer {
    fifo: VecDeque<PageNumber>,
    resident: HashSet<PageNumber>,
}

impl FIFOPageReplacer {
    pub fn new() -> Self {
        FIFOPageReplacer::default()
    }
}

impl PageReplacer for FIFOPageReplacer {
    fn page_event(&mut self, event: PageEvent) {
        match event {
            PageEvent::Loaded { page, .. } => {
                self.fifo.push_back(page);
                self.resident.insert(page);
            }
            PageEvent::Evicted(page) => {
                self.resident.remove(&page);
            }
            PageEvent::Touched(_) => {}
        }
    }

    fn pick_replacement_page(&mut self, _position: usize) -> PageNumber {
        // entries of pages that already left are purged lazily
        while let Some(page) = self.fifo.pop_front() {
            if self.resident.contains(&page) {
                return page;
            }
        }

        panic!("fifo: no resident page to evict");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_replacer::testing::victims;

    #[test]
    fn hits_do_not_refresh_admission_order() {
        let mut fifo = FIFOPageReplacer::new();

        assert_eq!(victims(&mut fifo, 3, &[1, 2, 3, 1, 4]), vec![1]);
    }

    #[test]
    fn classic_belady_sequence() {
        let mut fifo = FIFOPageReplacer::new();
        let pages = [1, 2, 3, 4, 1, 2, 5, 1, 2, 3, 4, 5];

        assert_eq!(victims(&mut fifo, 3, &pages), vec![1, 2, 3, 4, 1, 2]);
    }

    #[test]
    fn stale_entries_are_skipped() {
        let mut fifo = FIFOPageReplacer::new();

        fifo.page_event(PageEvent::Loaded { page: 7, frame: 0 });
        fifo.page_event(PageEvent::Loaded { page: 8, frame: 1 });
        fifo.page_event(PageEvent::Evicted(7));

        assert_eq!(fifo.pick_replacement_page(0), 8);
    }

    #[test]
    #[should_panic]
    fn empty_resident_set_is_fatal() {
        FIFOPageReplacer::new().pick_replacement_page(0);
    }
}
