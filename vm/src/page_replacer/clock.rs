use std::collections::HashMap;

use super::{PageEvent, PageReplacer};
use crate::types::{FrameNumber, PageNumber};

#[derive(Copy, Clone, Debug)]
struct ClockSlot {
    page: PageNumber,
    referenced: bool,
}

/// Second-chance replacement.
///
/// The hand sweeps over frame slots. A referenced page has its bit cleared
/// and is skipped; the first page found with a clear bit is the victim and
/// the hand stops just past it.
#[derive(Debug, Default)]
pub struct ClockPageReplacer {
    slots: Vec<Option<ClockSlot>>,
    frame_of: HashMap<PageNumber, FrameNumber>,
    hand: usize,
    last_scan: usize,
}

impl ClockPageReplacer {
    pub fn new() -> Self {
        ClockPageReplacer::default()
    }

    fn advance(&mut self) -> usize {
        let current = self.hand;
        self.hand = (self.hand + 1) % self.slots.len();
        current
    }
}

impl PageReplacer for ClockPageReplacer {
    fn page_event(&mut self, event: PageEvent) {
        match event {
            PageEvent::Touched(page) => {
                if let Some(&frame) = self.frame_of.get(&page) {
                    if let Some(slot) = self.slots[frame].as_mut() {
                        slot.referenced = true;
                    }
                }
            }
            PageEvent::Loaded { page, frame } => {
                if frame >= self.slots.len() {
                    self.slots.resize(frame + 1, None);
                }

                self.slots[frame] = Some(ClockSlot { page, referenced: true });
                self.frame_of.insert(page, frame);
            }
            PageEvent::Evicted(page) => {
                if let Some(frame) = self.frame_of.remove(&page) {
                    self.slots[frame] = None;
                }
            }
        }
    }

    fn pick_replacement_page(&mut self, _position: usize) -> PageNumber {
        if self.frame_of.is_empty() {
            panic!("clock: no resident page to evict");
        }

        self.last_scan = 0;

        // every bit is cleared at most once before the hand comes back
        for _ in 0..2 * self.slots.len() {
            let frame = self.advance();
            self.last_scan += 1;

            if let Some(slot) = self.slots[frame].as_mut() {
                if !slot.referenced {
                    return slot.page;
                }

                slot.referenced = false;
            }
        }

        unreachable!("clock: hand went around twice without finding a victim");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_replacer::testing::victims;

    #[test]
    fn all_referenced_wraps_to_first_frame() {
        let mut clock = ClockPageReplacer::new();

        assert_eq!(victims(&mut clock, 3, &[1, 2, 3, 4]), vec![1]);
        assert_eq!(clock.last_scan, 4);
        assert_eq!(clock.hand, 1);
    }

    #[test]
    fn touched_page_gets_second_chance() {
        let mut clock = ClockPageReplacer::new();

        assert_eq!(victims(&mut clock, 3, &[1, 2, 3, 4, 2, 5]), vec![1, 3]);
        assert_eq!(clock.last_scan, 2);
    }

    #[test]
    fn scan_is_bounded_by_twice_the_frames() {
        let frames = 8;
        let mut clock = ClockPageReplacer::new();
        let mut resident: Vec<PageNumber> = Vec::new();
        let mut seed: u64 = 0x2545_F491;

        for position in 0..5_000 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let page = (seed >> 33) % 20;

            if resident.contains(&page) {
                clock.page_event(PageEvent::Touched(page));
                continue;
            }

            let frame = if resident.len() < frames {
                resident.push(page);
                resident.len() - 1
            } else {
                let victim = clock.pick_replacement_page(position);
                assert!(clock.last_scan <= 2 * frames);

                let frame = resident.iter().position(|&p| p == victim).unwrap();
                clock.page_event(PageEvent::Evicted(victim));
                resident[frame] = page;
                frame
            };

            clock.page_event(PageEvent::Loaded { page, frame });
        }
    }

    #[test]
    fn eviction_clears_slot() {
        let mut clock = ClockPageReplacer::new();

        clock.page_event(PageEvent::Loaded { page: 9, frame: 0 });
        clock.page_event(PageEvent::Evicted(9));

        assert!(clock.slots[0].is_none());
        assert!(clock.frame_of.is_empty());
    }

    #[test]
    #[should_panic]
    fn empty_resident_set_is_fatal() {
        ClockPageReplacer::new().pick_replacement_page(0);
    }
}
