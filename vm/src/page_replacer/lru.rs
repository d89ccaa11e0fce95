use linked_hash_map::LinkedHashMap;

use super::{PageEvent, PageReplacer};
use crate::types::{FrameNumber, PageNumber};

/// Evicts the least recently touched page.
///
/// The map keeps resident pages in access order, oldest at the front, so
/// both refreshing a page and popping the victim are O(1).
#[derive(Debug, Default)]
pub struct LRUPageReplacer {
    lru_list: LinkedHashMap<PageNumber, FrameNumber>,
}

impl LRUPageReplacer {
    pub fn new() -> Self {
        LRUPageReplacer::default()
    }
}

impl PageReplacer for LRUPageReplacer {
    fn page_event(&mut self, event: PageEvent) {
        match event {
            PageEvent::Touched(page) => {
                self.lru_list.get_refresh(&page);
            }
            PageEvent::Loaded { page, frame } => {
                self.lru_list.insert(page, frame);
            }
            PageEvent::Evicted(page) => {
                self.lru_list.remove(&page);
            }
        }
    }

    fn pick_replacement_page(&mut self, _position: usize) -> PageNumber {
        match self.lru_list.pop_front() {
            Some((page, _)) => page,
            None => panic!("lru: no resident page to evict"),
        }
    }
}
