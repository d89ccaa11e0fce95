//! Run counters and the effective access time model.

use std::{collections::HashMap, time::Duration};

use crate::{reference::Operation, simulation::Policy, types::PageNumber};

/// Two-level memory cost model, in nanoseconds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CostModel {
    pub memory_access_time: f64,
    pub page_fault_service_time: f64,
}

impl CostModel {
    pub const DEFAULT_MEMORY_ACCESS_TIME: f64 = 100.0;
    pub const DEFAULT_PAGE_FAULT_SERVICE_TIME: f64 = 10_000_000.0;

    /// `memory_access_time + fault_rate * page_fault_service_time`
    pub fn effective_access_time(&self, fault_rate: f64) -> f64 {
        self.memory_access_time + fault_rate * self.page_fault_service_time
    }
}

impl Default for CostModel {
    fn default() -> Self {
        CostModel {
            memory_access_time: Self::DEFAULT_MEMORY_ACCESS_TIME,
            page_fault_service_time: Self::DEFAULT_PAGE_FAULT_SERVICE_TIME,
        }
    }
}

/// Accumulates the outcome of every access of one run.
#[derive(Debug, Default)]
pub struct StatisticsCollector {
    total_accesses: u64,
    hits: u64,
    page_faults: u64,
    replacements: u64,
    disk_writes: u64,
    reads: u64,
    writes: u64,
    page_accesses: HashMap<PageNumber, u64>,
}

impl StatisticsCollector {
    pub fn new() -> Self {
        StatisticsCollector::default()
    }

    pub fn record_access(&mut self, page: PageNumber, operation: Operation) {
        self.total_accesses += 1;

        match operation {
            Operation::Read => self.reads += 1,
            Operation::Write => self.writes += 1,
        }

        *self.page_accesses.entry(page).or_insert(0) += 1;
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_fault(&mut self) {
        self.page_faults += 1;
    }

    /// A resident page was evicted; a dirty one costs a write back.
    pub fn record_replacement(&mut self, victim_dirty: bool) {
        self.replacements += 1;

        if victim_dirty {
            self.disk_writes += 1;
        }
    }

    pub fn finish(self, frame_count: usize, policy: Policy, cost_model: CostModel) -> RunStatistics {
        debug_assert_eq!(self.hits + self.page_faults, self.total_accesses);
        debug_assert!(self.disk_writes <= self.replacements);

        RunStatistics {
            frame_count,
            policy,
            total_accesses: self.total_accesses,
            hits: self.hits,
            page_faults: self.page_faults,
            replacements: self.replacements,
            disk_writes: self.disk_writes,
            reads: self.reads,
            writes: self.writes,
            page_accesses: self.page_accesses,
            cost_model,
            elapsed: Duration::ZERO,
            prescan: Duration::ZERO,
        }
    }
}

/// Final result of one `(frame_count, policy)` run.
///
/// Rates and the effective access time are derived from the counters on
/// demand. With no accesses every rate is 0 and the EAT is the plain memory
/// access time.
#[derive(Clone, Debug)]
pub struct RunStatistics {
    pub frame_count: usize,
    pub policy: Policy,
    pub total_accesses: u64,
    pub hits: u64,
    pub page_faults: u64,
    pub replacements: u64,
    pub disk_writes: u64,
    pub reads: u64,
    pub writes: u64,
    pub page_accesses: HashMap<PageNumber, u64>,
    pub cost_model: CostModel,
    /// Wall-clock time of the streaming pass.
    pub elapsed: Duration,
    /// Time spent building the OPT index this run relies on. The index is
    /// built once and shared, so every OPT run over a trace reports the
    /// same value; zero for the other policies.
    pub prescan: Duration,
}

impl RunStatistics {
    fn ratio(&self, count: u64) -> f64 {
        if self.total_accesses == 0 {
            return 0.0;
        }

        count as f64 / self.total_accesses as f64
    }

    pub fn hit_rate(&self) -> f64 {
        self.ratio(self.hits)
    }

    pub fn fault_rate(&self) -> f64 {
        self.ratio(self.page_faults)
    }

    pub fn eat(&self) -> f64 {
        self.cost_model.effective_access_time(self.fault_rate())
    }

    pub fn unique_pages_touched(&self) -> usize {
        self.page_accesses.len()
    }

    /// The `n` most accessed pages, hottest first, ties by page number.
    pub fn hottest_pages(&self, n: usize) -> Vec<(PageNumber, u64)> {
        let mut pages: Vec<_> = self.page_accesses.iter().map(|(&p, &c)| (p, c)).collect();

        pages.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        pages.truncate(n);

        pages
    }
}
