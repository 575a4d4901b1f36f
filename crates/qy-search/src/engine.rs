//! Fork-join orchestration of an exhaustive search run.

use std::ops::Range;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use crossbeam_channel::bounded;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use qy_types::{
    internal_error, Candidate, ConfigError, QyResult, ResultHeader, SearchConfig,
};

use crate::encoding::EncodedDomain;
use crate::odometer::Odometer;
use crate::partition::{partition, Partition};
use crate::progress::{ProgressSink, ProgressTick, WorkerProgress, PROGRESS_CHANNEL_CAPACITY};
use crate::scoring::{scorer_for, ScoreFunction};
use crate::sink::ResultSink;
use crate::topk::TopKTracker;

/// Lifecycle of a run. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SearchPhase {
    Configuring,
    Partitioning,
    Scanning,
    Aggregating,
    Done,
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    pub id: Uuid,
    pub name: String,
    pub strategy: String,
    pub dimensions: usize,
    pub step: u32,
    pub keep: usize,
    pub workers: usize,
    /// Points scored across all workers.
    pub points_scanned: u64,
    pub phase: SearchPhase,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Best candidates, ascending by score.
    pub results: Vec<Candidate>,
}

impl SearchReport {
    pub fn best(&self) -> Option<&Candidate> {
        self.results.first()
    }

    pub fn duration_seconds(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}

/// What one worker hands back at the join.
#[derive(Debug)]
struct WorkerOutcome {
    tracker: TopKTracker,
    points: u64,
}

/// Exhaustive search over a bit-ordered float domain.
///
/// The configuration is validated and frozen at construction. [`run`]
/// partitions the outer dimension, scans every partition on its own rayon
/// worker with a private [`TopKTracker`], merges the trackers after the
/// join and hands the sorted winners to a [`ResultSink`].
///
/// [`run`]: SearchEngine::run
pub struct SearchEngine {
    config: SearchConfig,
    scorer: Arc<dyn ScoreFunction>,
    domain: EncodedDomain,
    workers: usize,
    phase: SearchPhase,
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("config", &self.config)
            .field("scorer", &self.scorer.name())
            .field("domain", &self.domain)
            .field("workers", &self.workers)
            .field("phase", &self.phase)
            .finish()
    }
}

impl SearchEngine {
    /// Engine for the built-in strategy named by the configuration.
    pub fn new(config: SearchConfig) -> QyResult<Self> {
        let scorer = scorer_for(config.strategy);
        Self::with_scorer(config, scorer)
    }

    /// Engine for an arbitrary scorer. `config.strategy` is ignored.
    pub fn with_scorer(config: SearchConfig, scorer: Arc<dyn ScoreFunction>) -> QyResult<Self> {
        config.validate()?;
        if scorer.dimensions() != config.dimensions {
            return Err(ConfigError::DimensionMismatch {
                strategy: scorer.name().to_string(),
                expected: scorer.dimensions(),
                actual: config.dimensions,
            }
            .into());
        }

        let domain = EncodedDomain::for_config(&config)?;
        let requested = config.resolved_workers();
        let points = domain.points_per_dimension(config.step);
        let workers = requested.min(usize::try_from(points).unwrap_or(usize::MAX));
        if workers < requested {
            warn!(
                requested,
                workers, "outer dimension has fewer points than workers, clamping worker count"
            );
        }

        Ok(Self {
            config,
            scorer,
            domain,
            workers,
            phase: SearchPhase::Configuring,
        })
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn scorer_name(&self) -> &str {
        self.scorer.name()
    }

    /// Header describing the rows this engine produces.
    pub fn result_header(&self) -> ResultHeader {
        ResultHeader::new(self.config.dimensions, self.config.output_columns)
    }

    fn enter(&mut self, next: SearchPhase) {
        debug_assert!(next > self.phase, "{:?} -> {:?}", self.phase, next);
        debug!(from = ?self.phase, to = ?next, "search phase");
        self.phase = next;
    }

    /// Run the search to completion. An engine runs once.
    pub fn run(
        &mut self,
        progress: &mut dyn ProgressSink,
        sink: &mut dyn ResultSink,
    ) -> QyResult<SearchReport> {
        if self.phase != SearchPhase::Configuring {
            return Err(internal_error!("search {} has already run", self.config.name));
        }
        let started_at = Utc::now();
        info!(
            name = %self.config.name,
            strategy = self.scorer.name(),
            dimensions = self.config.dimensions,
            step = self.config.step,
            keep = self.config.keep,
            workers = self.workers,
            "starting exhaustive search"
        );

        self.enter(SearchPhase::Partitioning);
        let partitions = partition(self.domain, self.config.step, self.workers)?;

        self.enter(SearchPhase::Scanning);
        let outcomes = self.scan(&partitions, progress)?;

        self.enter(SearchPhase::Aggregating);
        let mut global = TopKTracker::new(self.config.keep, self.config.dimensions);
        let mut points_scanned = 0u64;
        for outcome in &outcomes {
            global.merge(&outcome.tracker);
            points_scanned += outcome.points;
        }
        let results = global.into_sorted();

        self.enter(SearchPhase::Done);
        sink.write(&self.result_header(), &results)?;
        progress.finish();

        let report = SearchReport {
            id: Uuid::new_v4(),
            name: self.config.name.clone(),
            strategy: self.scorer.name().to_string(),
            dimensions: self.config.dimensions,
            step: self.config.step,
            keep: self.config.keep,
            workers: self.workers,
            points_scanned,
            phase: self.phase,
            started_at,
            finished_at: Utc::now(),
            results,
        };
        info!(
            points = report.points_scanned,
            retained = report.results.len(),
            best = ?report.best().map(|c| c.score),
            seconds = report.duration_seconds(),
            "search complete"
        );
        Ok(report)
    }

    /// Scan every partition in parallel and wait for all of them.
    fn scan(
        &self,
        partitions: &[Partition],
        progress: &mut dyn ProgressSink,
    ) -> QyResult<Vec<WorkerOutcome>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(partitions.len())
            .thread_name(|i| format!("qy-worker-{i}"))
            .build()
            .map_err(|e| internal_error!("failed to build worker pool: {e}"))?;

        let (tx, rx) = bounded::<ProgressTick>(PROGRESS_CHANNEL_CAPACITY);
        let config = &self.config;
        let scorer: &dyn ScoreFunction = self.scorer.as_ref();
        let inner = self.domain.range();

        let joined = std::thread::scope(|scope| {
            let workers = scope.spawn(move || {
                pool.install(|| {
                    partitions
                        .par_iter()
                        .map(|part| {
                            let reporter = (part.index == 0).then(|| WorkerProgress::new(tx.clone()));
                            scan_partition(part, config, scorer, inner.clone(), reporter)
                        })
                        .collect::<Vec<_>>()
                })
            });

            // Ends once the scan has dropped every sender.
            for tick in rx.iter() {
                progress.report(tick.count, tick.total);
            }
            workers.join()
        });

        joined.map_err(|_| internal_error!("a search worker panicked"))
    }
}

/// Score every point of one partition into a private tracker.
fn scan_partition(
    part: &Partition,
    config: &SearchConfig,
    scorer: &dyn ScoreFunction,
    inner: Range<u32>,
    mut progress: Option<WorkerProgress>,
) -> WorkerOutcome {
    debug!(worker = part.index, low = part.low, high = part.high, "scanning partition");

    let odometer = Odometer::new(config.dimensions, config.step, part.range(), inner);
    let mut tracker = TopKTracker::new(config.keep, config.dimensions);
    let mut outer = part.low;

    let points = odometer.for_each_point(|odometer| {
        if let Some(progress) = progress.as_mut() {
            let now = odometer.current_encoded()[0];
            if now != outer {
                outer = now;
                progress.update(odometer.outer_progress());
            }
        }
        let point = odometer.current();
        tracker.observe(point, scorer.score(point));
    });

    debug!(
        worker = part.index,
        points,
        threshold = tracker.threshold(),
        "partition finished"
    );
    WorkerOutcome { tracker, points }
}
