use std::collections::{HashSet, VecDeque};

use log::trace;

use crate::{
    page_replacer::{PageEvent, PageReplacer},
    page_table::{FrameTable, PageTable},
    reference::{Operation, Reference},
    simulation::Policy,
    stats::{CostModel, RunStatistics, StatisticsCollector},
    types::{FrameNumber, PageNumber},
};

/// Page/frame manager for one simulation run.
///
/// Owns the page table, the frame table and the set of dirty resident pages.
/// Free frames are handed out in ascending order; once they run out every
/// fault evicts the page picked by the replacer and reuses its frame.
pub struct Mmu<REPLACER: PageReplacer> {
    frame_count: usize,
    free_frames: VecDeque<FrameNumber>,
    page_table: PageTable,
    frame_table: FrameTable,
    dirty_pages: HashSet<PageNumber>,
    replacer: REPLACER,
    stats: StatisticsCollector,
}

impl<REPLACER> Mmu<REPLACER>
where
    REPLACER: PageReplacer,
{
    /// # Panics
    ///
    /// Panics if `frame_count` is zero.
    pub fn new(frame_count: usize, replacer: REPLACER) -> Self {
        assert!(frame_count > 0, "mmu: at least one frame is required");

        let free_frames = (0..frame_count).collect();

        Mmu {
            frame_count,
            free_frames,
            page_table: PageTable::with_capacity(frame_count),
            frame_table: FrameTable::new(frame_count),
            dirty_pages: HashSet::new(),
            replacer,
            stats: StatisticsCollector::new(),
        }
    }

    fn evict(&mut self, position: usize) -> FrameNumber {
        let victim = self.replacer.pick_replacement_page(position);

        let frame_idx = match self.page_table.remove(victim) {
            Some(frame_idx) => frame_idx,
            None => panic!("mmu: replacer picked non-resident page {:#X}", victim),
        };

        let evicted = self.frame_table.take(frame_idx);
        let dirty = evicted.map_or(false, |entry| entry.dirty);

        if dirty {
            trace!("mmu: page {:#X} dirty, writing back before reusing frame {}", victim, frame_idx);
        }

        self.dirty_pages.remove(&victim);
        self.stats.record_replacement(dirty);
        self.replacer.page_event(PageEvent::Evicted(victim));

        frame_idx
    }

    fn handle_page_fault(&mut self, page_number: PageNumber, operation: Operation, position: usize) -> FrameNumber {
        self.stats.record_fault();

        let frame_idx = match self.free_frames.pop_front() {
            Some(empty_idx) => empty_idx,
            None => self.evict(position),
        };

        let dirty = operation.is_write();

        self.page_table.set(page_number, frame_idx);
        self.frame_table.set(frame_idx, page_number, dirty);

        if dirty {
            self.dirty_pages.insert(page_number);
        }

        self.replacer.page_event(PageEvent::Loaded {
            page: page_number,
            frame: frame_idx,
        });

        frame_idx
    }

    /// Applies one reference and returns the frame now holding the page.
    pub fn access(&mut self, page_number: PageNumber, operation: Operation, position: usize) -> FrameNumber {
        self.stats.record_access(page_number, operation);

        match self.page_table.get(page_number) {
            Some(frame_idx) => {
                trace!("mmu: {} page {:#X} hit in frame {}", operation, page_number, frame_idx);

                self.stats.record_hit();
                self.replacer.page_event(PageEvent::Touched(page_number));

                if operation.is_write() {
                    self.frame_table.mark_dirty(frame_idx);
                    self.dirty_pages.insert(page_number);
                }

                frame_idx
            }
            None => {
                let frame_idx = self.handle_page_fault(page_number, operation, position);

                trace!("mmu: {} page {:#X} faulted into frame {}", operation, page_number, frame_idx);

                frame_idx
            }
        }
    }

    pub fn apply(&mut self, reference: Reference, position: usize) -> FrameNumber {
        self.access(reference.page_number, reference.operation, position)
    }

    pub fn frame_of(&self, page_number: PageNumber) -> Option<FrameNumber> {
        self.page_table.get(page_number)
    }

    pub fn is_resident(&self, page_number: PageNumber) -> bool {
        self.page_table.get(page_number).is_some()
    }

    pub fn is_dirty(&self, page_number: PageNumber) -> bool {
        self.dirty_pages.contains(&page_number)
    }

    /// Resident pages in ascending order.
    pub fn resident_pages(&self) -> Vec<PageNumber> {
        let mut pages: Vec<_> = self.page_table.pages().collect();
        pages.sort_unstable();
        pages
    }

    pub fn finish(self, policy: Policy, cost_model: CostModel) -> RunStatistics {
        self.stats.finish(self.frame_count, policy, cost_model)
    }
}
