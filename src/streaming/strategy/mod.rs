//! Scheduling strategies: which level of which object to fetch next
//!
//! Every strategy follows the same shape: gather candidate
//! (object, next level) pairs, score them, select winners under its own
//! policy, then the scheduler issues the fetches. Planning is pure;
//! only [`Scheduler::execute`] touches I/O.

pub mod naive;
pub mod greedy;
pub mod horizon;
pub mod budgeted;

use crate::camera::{ViewpointPredictor, ViewpointSnapshot};
use crate::core::error::Error;
use crate::core::types::Result;
use crate::streaming::catalog::ObjectCatalog;
use crate::streaming::fetch::{MeshFetcher, MeshInstance};
use crate::streaming::metric::MetricKind;
use crate::streaming::throughput::ThroughputEstimator;

/// Scheduling strategy selector
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StrategyKind {
    /// Single best `quality × utility`, no cost normalization
    #[default]
    Naive,
    /// Single best utility-per-fetch-second at predicted completion time
    Greedy,
    /// Single best integrated utility from fetch completion to the horizon
    Horizon,
    /// Budgeted walk bumping the best-ranked objects as far as they fit
    BudgetGreedy,
    /// Budgeted lock-step raising all ranked objects one level at a time
    BudgetUniform,
    /// Lock-step on the visible partition, walk on the invisible remainder
    BudgetHybrid,
}

/// Scheduler configuration, threaded through every pass
///
/// Both selectors are switchable between ticks.
#[derive(Clone, Copy, Debug)]
pub struct SchedulerConfig {
    pub strategy: StrategyKind,
    pub metric: MetricKind,
    /// Future offset used to widen the candidate set and bound the
    /// utility integral (seconds)
    pub horizon_seconds: f32,
    /// Buffering interval converted to a byte budget each tick (seconds)
    pub buffer_seconds: f32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            metric: MetricKind::default(),
            horizon_seconds: 5.0,
            buffer_seconds: 2.0,
        }
    }
}

/// One planned fetch
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchDecision {
    /// Object index in the catalog
    pub object: usize,
    pub level: usize,
}

/// Runs scheduling passes over a catalog.
pub struct Scheduler {
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn set_strategy(&mut self, strategy: StrategyKind) {
        self.config.strategy = strategy;
    }

    pub fn set_metric(&mut self, metric: MetricKind) {
        self.config.metric = metric;
    }

    /// Compute this tick's fetch decisions without issuing any fetch.
    ///
    /// An empty plan is a valid no-op: the budget or horizon excluded
    /// every candidate, or everything is already loaded.
    pub fn plan(
        &self,
        catalog: &ObjectCatalog,
        estimator: &ThroughputEstimator,
        predictor: &ViewpointPredictor,
    ) -> Result<Vec<FetchDecision>> {
        let metric = self.config.metric;
        match self.config.strategy {
            StrategyKind::Naive => {
                naive::plan(catalog, metric, predictor, self.config.horizon_seconds)
            }
            StrategyKind::Greedy => greedy::plan(
                catalog,
                metric,
                estimator,
                predictor,
                self.config.horizon_seconds,
            ),
            StrategyKind::Horizon => horizon::plan(
                catalog,
                metric,
                estimator,
                predictor,
                self.config.horizon_seconds,
            ),
            StrategyKind::BudgetGreedy => budgeted::plan_greedy(
                catalog,
                metric,
                estimator,
                predictor,
                self.config.buffer_seconds,
            ),
            StrategyKind::BudgetUniform => budgeted::plan_uniform(
                catalog,
                metric,
                estimator,
                predictor,
                self.config.buffer_seconds,
            ),
            StrategyKind::BudgetHybrid => budgeted::plan_hybrid(
                catalog,
                metric,
                estimator,
                predictor,
                self.config.buffer_seconds,
            ),
        }
    }

    /// Run one scheduling pass: plan, fetch, return the newly displayed
    /// meshes.
    ///
    /// Re-entrant calls while a pass is in flight are dropped (empty
    /// result). Failures of individual candidates are logged and
    /// skipped; they never abort the rest of the pass.
    pub async fn execute(
        &self,
        catalog: &mut ObjectCatalog,
        fetcher: &MeshFetcher,
        estimator: &mut ThroughputEstimator,
        predictor: &ViewpointPredictor,
    ) -> Result<Vec<MeshInstance>> {
        if !catalog.begin_pass() {
            log::debug!("scheduling pass already in flight, tick dropped");
            return Ok(Vec::new());
        }
        let result = self
            .run_pass(catalog, fetcher, estimator, predictor)
            .await;
        catalog.end_pass();
        result
    }

    async fn run_pass(
        &self,
        catalog: &mut ObjectCatalog,
        fetcher: &MeshFetcher,
        estimator: &mut ThroughputEstimator,
        predictor: &ViewpointPredictor,
    ) -> Result<Vec<MeshInstance>> {
        if catalog.all_loaded() {
            return Ok(Vec::new());
        }

        let decisions = self.plan(catalog, estimator, predictor)?;
        log::debug!(
            "{:?}/{:?} selected {} candidate(s)",
            self.config.strategy,
            self.config.metric,
            decisions.len()
        );

        let mut displayed = Vec::with_capacity(decisions.len());
        for decision in decisions {
            let fetched = catalog
                .object_mut(decision.object)
                .fetch_level(decision.level, fetcher, estimator)
                .await;
            match fetched {
                Ok(instance) => displayed.push(instance),
                Err(err @ Error::AlreadyRequested { .. }) => {
                    // Two passes picked the same candidate; skip it and
                    // keep going
                    log::warn!("{err}");
                }
                Err(err @ (Error::Fetch { .. } | Error::Decode { .. })) => {
                    // Candidate abandoned for the session; the object
                    // stays at its current level
                    log::warn!("{err}");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(displayed)
    }
}

/// Current viewpoint, or the initialization error mandated when no
/// snapshot was ever tracked.
fn current_viewpoint(predictor: &ViewpointPredictor) -> Result<&ViewpointSnapshot> {
    predictor
        .current()
        .ok_or_else(|| Error::Uninitialized("viewpoint".to_string()))
}

/// Candidate (object, next level) pairs for the view-driven strategies:
/// objects visible now or at the horizon, each paired with its first
/// unrequested level.
fn view_candidates(
    catalog: &ObjectCatalog,
    predictor: &ViewpointPredictor,
    horizon_seconds: f32,
) -> Result<Vec<FetchDecision>> {
    let now = current_viewpoint(predictor)?;

    let (mut indices, _) = catalog.partition(now)?;
    if let Some(future) = predictor.predict(horizon_seconds) {
        let (at_horizon, _) = catalog.partition(&future)?;
        for index in at_horizon {
            if !indices.contains(&index) {
                indices.push(index);
            }
        }
    }

    Ok(indices
        .into_iter()
        .filter_map(|index| {
            catalog
                .object(index)
                .next_level()
                .map(|level| FetchDecision { object: index, level })
        })
        .collect())
}

/// Rank object indices by current utility, strictly descending; ties
/// keep encounter order (stable sort).
fn rank_by_utility(
    catalog: &ObjectCatalog,
    metric: MetricKind,
    viewpoint: &ViewpointSnapshot,
    indices: Vec<usize>,
) -> Vec<usize> {
    let mut scored: Vec<(usize, f32)> = indices
        .into_iter()
        .map(|index| (index, metric.score(catalog.object(index), viewpoint)))
        .collect();
    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.into_iter().map(|(index, _)| index).collect()
}
