//! Victim selection policies.
//!
//! The [`Mmu`](crate::mmu::Mmu) reports every residency change as a
//! [`PageEvent`] and only asks for a victim when all frames are occupied.

mod clock;
mod fifo;
mod lfu;
mod lru;
mod opt;

pub use clock::ClockPageReplacer;
pub use fifo::FIFOPageReplacer;
pub use lfu::LFUPageReplacer;
pub use lru::LRUPageReplacer;
pub use opt::OPTPageReplacer;

use crate::types::{FrameNumber, PageNumber};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PageEvent {
    /// A resident page was referenced again.
    Touched(PageNumber),
    /// A page was brought into `frame` by a fault.
    Loaded { page: PageNumber, frame: FrameNumber },
    /// A page was chosen as victim and is no longer resident.
    Evicted(PageNumber),
}

pub trait PageReplacer {
    fn page_event(&mut self, _event: PageEvent) {}

    /// Picks the resident page to evict. `position` is the trace position of
    /// the reference that faulted.
    ///
    /// # Panics
    ///
    /// Panics when no page is resident: the MMU only asks once every frame
    /// is occupied.
    fn pick_replacement_page(&mut self, position: usize) -> PageNumber;
}
