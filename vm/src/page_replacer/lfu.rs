use std::collections::{BTreeSet, HashMap};

use super::{PageEvent, PageReplacer};
use crate::types::PageNumber;

#[derive(Copy, Clone, Debug)]
struct Usage {
    count: u64,
    last_touch: u64,
}

/// Evicts the resident page with the fewest references since it was loaded,
/// breaking ties by the oldest last touch.
///
/// Only resident pages are tracked. A page's count starts over at 1 every
/// time it is loaded again.
#[derive(Debug, Default)]
pub struct LFUPageReplacer {
    usage: HashMap<PageNumber, Usage>,
    // (count, last_touch, page); the first element is the victim
    order: BTreeSet<(u64, u64, PageNumber)>,
    clock: u64,
}

impl LFUPageReplacer {
    pub fn new() -> Self {
        LFUPageReplacer::default()
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn touch(&mut self, page: PageNumber) {
        let now = self.tick();

        if let Some(usage) = self.usage.get_mut(&page) {
            self.order.remove(&(usage.count, usage.last_touch, page));
            usage.count += 1;
            usage.last_touch = now;
            self.order.insert((usage.count, usage.last_touch, page));
        }
    }

    fn load(&mut self, page: PageNumber) {
        let now = self.tick();
        let usage = Usage { count: 1, last_touch: now };

        if let Some(old) = self.usage.insert(page, usage) {
            self.order.remove(&(old.count, old.last_touch, page));
        }

        self.order.insert((usage.count, usage.last_touch, page));
    }

    fn forget(&mut self, page: PageNumber) {
        if let Some(usage) = self.usage.remove(&page) {
            self.order.remove(&(usage.count, usage.last_touch, page));
        }
    }
}

impl PageReplacer for LFUPageReplacer {
    fn page_event(&mut self, event: PageEvent) {
        match event {
            PageEvent::Touched(page) => self.touch(page),
            PageEvent::Loaded { page, .. } => self.load(page),
            PageEvent::Evicted(page) => self.forget(page),
        }
    }

    fn pick_replacement_page(&mut self, _position: usize) -> PageNumber {
        match self.order.first() {
            Some(&(_, _, page)) => page,
            None => panic!("lfu: no resident page to evict"),
        }
    }
}
