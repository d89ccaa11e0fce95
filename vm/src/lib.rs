//! Demand-paging simulator core.
//!
//! A trace of `(address, R|W)` references is streamed through an [`mmu::Mmu`]
//! holding a fixed number of physical frames. On a fault with no free frame
//! the active [`page_replacer::PageReplacer`] picks the victim. The
//! [`simulation::Simulator`] runs the cross product of frame counts and
//! policies and hands back one [`stats::RunStatistics`] per run.

pub mod error;
pub mod future_index;
pub mod mmu;
pub mod page_replacer;
pub mod page_table;
pub mod reference;
pub mod simulation;
pub mod stats;
pub mod trace;
pub mod types;
