//! Drives whole runs: one fresh [`Mmu`] per `(frame_count, policy)` pair,
//! fed from a single pass over the trace.

use std::{
    fmt,
    str::FromStr,
    sync::Arc,
    time::{Duration, Instant},
};

use log::{debug, info};

use crate::{
    error::{Result, SimError},
    future_index::FutureReferenceIndex,
    mmu::Mmu,
    page_replacer::{
        ClockPageReplacer, FIFOPageReplacer, LFUPageReplacer, LRUPageReplacer, OPTPageReplacer, PageReplacer,
    },
    reference::decode,
    stats::{CostModel, RunStatistics},
    trace::{count_lines, TraceReader, TraceSource},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Policy {
    Fifo,
    Lru,
    Lfu,
    Clock,
    Opt,
}

impl Policy {
    pub const ALL: [Policy; 5] = [Policy::Fifo, Policy::Lru, Policy::Lfu, Policy::Clock, Policy::Opt];

    pub fn name(self) -> &'static str {
        match self {
            Policy::Fifo => "FIFO",
            Policy::Lru => "LRU",
            Policy::Lfu => "LFU",
            Policy::Clock => "CLOCK",
            Policy::Opt => "OPT",
        }
    }

    /// OPT needs the whole trace indexed before it can run.
    pub fn needs_lookahead(self) -> bool {
        self == Policy::Opt
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Policy {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        Policy::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SimError::InvalidConfig(format!("unknown replacement policy {:?}", s)))
    }
}

/// What to do with a trace line that doesn't decode.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Strictness {
    /// Skip it and keep going.
    #[default]
    Lenient,
    /// Fail the run. Blank lines are still skipped.
    Strict,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    pub frame_counts: Vec<usize>,
    pub policies: Vec<Policy>,
    pub cost_model: CostModel,
    pub strictness: Strictness,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            frame_counts: vec![10, 50, 100],
            policies: Policy::ALL.to_vec(),
            cost_model: CostModel::default(),
            strictness: Strictness::default(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.frame_counts.is_empty() {
            return Err(SimError::InvalidConfig("no frame counts given".to_string()));
        }

        if self.policies.is_empty() {
            return Err(SimError::InvalidConfig("no replacement policies given".to_string()));
        }

        if let Some(&zero) = self.frame_counts.iter().find(|&&f| f == 0) {
            return Err(SimError::InvalidFrameCount(zero));
        }

        Ok(())
    }

    /// Policies in configured order, duplicates dropped.
    fn distinct_policies(&self) -> Vec<Policy> {
        let mut policies = Vec::with_capacity(self.policies.len());

        for &policy in &self.policies {
            if !policies.contains(&policy) {
                policies.push(policy);
            }
        }

        policies
    }
}

/// Runs simulations over one trace.
///
/// Each run owns its own MMU and replacer state. The OPT index is built the
/// first time an OPT run needs it and shared read-only by later OPT runs;
/// every OPT run reports the same build time as its pre-scan.
pub struct Simulator<S: TraceSource> {
    source: S,
    config: SimulationConfig,
    line_count: usize,
    future_index: Option<(Arc<FutureReferenceIndex>, Duration)>,
}

impl<S: TraceSource> Simulator<S> {
    /// Checks the configuration and that the trace can be read, before any
    /// run starts.
    pub fn new(source: S, config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let line_count = count_lines(&source).map_err(|e| SimError::TraceUnavailable {
            path: source.location().to_path_buf(),
            source: e,
        })?;

        info!("simulator: trace {} has {} lines", source.location().display(), line_count);

        Ok(Simulator {
            source,
            config,
            line_count,
            future_index: None,
        })
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Every configured frame count against every configured policy, frame
    /// counts outermost.
    pub fn run_all(&mut self) -> Result<Vec<RunStatistics>> {
        let policies = self.config.distinct_policies();
        let frame_counts = self.config.frame_counts.clone();

        let mut results = Vec::with_capacity(frame_counts.len() * policies.len());

        for frame_count in frame_counts {
            for &policy in &policies {
                results.push(self.run(frame_count, policy)?);
            }
        }

        Ok(results)
    }

    pub fn run(&mut self, frame_count: usize, policy: Policy) -> Result<RunStatistics> {
        if frame_count == 0 {
            return Err(SimError::InvalidFrameCount(frame_count));
        }

        info!("simulator: {} frames, policy {}", frame_count, policy);

        let prescan = if policy.needs_lookahead() {
            self.future_index()?.1
        } else {
            Duration::ZERO
        };

        let start = Instant::now();

        let mut stats = match policy {
            Policy::Fifo => self.stream(Mmu::new(frame_count, FIFOPageReplacer::new()), policy)?,
            Policy::Lru => self.stream(Mmu::new(frame_count, LRUPageReplacer::new()), policy)?,
            Policy::Lfu => self.stream(Mmu::new(frame_count, LFUPageReplacer::new()), policy)?,
            Policy::Clock => self.stream(Mmu::new(frame_count, ClockPageReplacer::new()), policy)?,
            Policy::Opt => {
                let (index, _) = self.future_index()?;
                self.stream(Mmu::new(frame_count, OPTPageReplacer::new(index)), policy)?
            }
        };

        stats.elapsed = start.elapsed();
        stats.prescan = prescan;

        info!(
            "simulator: {} frames, policy {}: {} faults, {} replacements, {} disk writes, EAT {:.2} ns",
            frame_count,
            policy,
            stats.page_faults,
            stats.replacements,
            stats.disk_writes,
            stats.eat()
        );

        Ok(stats)
    }

    /// The shared OPT index and the time its one build took.
    fn future_index(&mut self) -> Result<(Arc<FutureReferenceIndex>, Duration)> {
        if let Some((index, built_in)) = &self.future_index {
            return Ok((Arc::clone(index), *built_in));
        }

        let start = Instant::now();
        let index = Arc::new(FutureReferenceIndex::build(&self.source)?);
        let built_in = start.elapsed();

        debug!(
            "simulator: indexed {} references to {} pages for OPT in {:.2?}",
            index.len(),
            index.page_count(),
            built_in
        );

        self.future_index = Some((Arc::clone(&index), built_in));

        Ok((index, built_in))
    }

    fn stream<R: PageReplacer>(&self, mut mmu: Mmu<R>, policy: Policy) -> Result<RunStatistics> {
        let mut skipped = 0usize;

        for line in TraceReader::open(&self.source)? {
            let (position, line) = line?;

            match decode(&line) {
                Some(reference) => {
                    mmu.apply(reference, position);
                }
                None if self.config.strictness == Strictness::Strict && !line.trim().is_empty() => {
                    return Err(SimError::MalformedLine { position, line });
                }
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!("simulator: skipped {} malformed lines", skipped);
        }

        Ok(mmu.finish(policy, self.config.cost_model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{InMemoryTrace, TraceFile};

    fn trace_of(pages: &[u64]) -> InMemoryTrace {
        let text: String = pages.iter().map(|p| format!("{:x} R\n", p << 12)).collect();
        InMemoryTrace::new(text)
    }

    fn config(frame_counts: &[usize], policies: &[Policy]) -> SimulationConfig {
        SimulationConfig {
            frame_counts: frame_counts.to_vec(),
            policies: policies.to_vec(),
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn policy_names_round_trip() {
        for policy in Policy::ALL {
            assert_eq!(policy.to_string().parse::<Policy>().unwrap(), policy);
        }

        assert_eq!("clock".parse::<Policy>().unwrap(), Policy::Clock);
        assert!("MRU".parse::<Policy>().is_err());
    }

    #[test]
    fn rejects_bad_configs() {
        assert!(matches!(
            Simulator::new(trace_of(&[1]), config(&[], &[Policy::Fifo])),
            Err(SimError::InvalidConfig(_))
        ));
        assert!(matches!(
            Simulator::new(trace_of(&[1]), config(&[3], &[])),
            Err(SimError::InvalidConfig(_))
        ));
        assert!(matches!(
            Simulator::new(trace_of(&[1]), config(&[3, 0], &[Policy::Fifo])),
            Err(SimError::InvalidFrameCount(0))
        ));
    }

    #[test]
    fn missing_trace_is_reported_up_front() {
        let result = Simulator::new(TraceFile::new("/no/such/trace"), SimulationConfig::default());

        assert!(matches!(result, Err(SimError::TraceUnavailable { .. })));
    }

    #[test]
    fn cross_product_order() {
        let mut sim = Simulator::new(trace_of(&[1, 2, 3]), config(&[1, 2], &[Policy::Lru, Policy::Fifo, Policy::Lru])).unwrap();

        let runs: Vec<_> = sim
            .run_all()
            .unwrap()
            .into_iter()
            .map(|s| (s.frame_count, s.policy))
            .collect();

        assert_eq!(runs, vec![(1, Policy::Lru), (1, Policy::Fifo), (2, Policy::Lru), (2, Policy::Fifo)]);
    }

    #[test]
    fn opt_index_is_built_once() {
        let mut sim = Simulator::new(trace_of(&[1, 2, 3, 1]), config(&[1, 2], &[Policy::Opt])).unwrap();

        let runs = sim.run_all().unwrap();
        let (first, built_in) = sim.future_index.clone().unwrap();

        let third = sim.run(3, Policy::Opt).unwrap();
        assert!(Arc::ptr_eq(&first, &sim.future_index.as_ref().unwrap().0));

        // every OPT run reports the one shared build, not just the first
        assert!(runs.iter().all(|s| s.prescan == built_in));
        assert_eq!(third.prescan, built_in);
    }

    #[test]
    fn only_opt_pays_for_the_prescan() {
        let mut sim = Simulator::new(trace_of(&[1, 2, 3, 1]), config(&[2], &Policy::ALL)).unwrap();

        for stats in sim.run_all().unwrap() {
            assert_eq!(stats.policy.needs_lookahead(), stats.policy == Policy::Opt);

            if !stats.policy.needs_lookahead() {
                assert_eq!(stats.prescan, Duration::ZERO);
            }
        }

        assert!(sim.future_index.is_some());
    }

    #[test]
    fn non_opt_runs_never_build_the_index() {
        let mut sim = Simulator::new(trace_of(&[1, 2, 3, 1]), config(&[2], &[Policy::Fifo, Policy::Clock])).unwrap();

        sim.run_all().unwrap();
        assert!(sim.future_index.is_none());
    }

    #[test]
    fn strict_mode_fails_on_malformed_line() {
        let trace = InMemoryTrace::new("1000 R\n\n2000 Q\n3000 W\n");
        let mut cfg = config(&[2], &[Policy::Fifo]);

        let lenient = Simulator::new(trace.clone(), cfg.clone()).unwrap().run(2, Policy::Fifo).unwrap();
        assert_eq!(lenient.total_accesses, 2);

        cfg.strictness = Strictness::Strict;
        let err = Simulator::new(trace, cfg).unwrap().run(2, Policy::Fifo).unwrap_err();
        assert!(matches!(err, SimError::MalformedLine { position: 2, .. }));
    }

    #[test]
    fn run_rejects_zero_frames() {
        let mut sim = Simulator::new(trace_of(&[1]), SimulationConfig::default()).unwrap();

        assert!(matches!(sim.run(0, Policy::Lru), Err(SimError::InvalidFrameCount(0))));
    }
}
