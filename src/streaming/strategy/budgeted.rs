//! Budget-bounded strategies: walk, lock-step, and the hybrid of both
//!
//! All three convert the throughput estimate into a per-tick byte
//! budget and spend it on incremental level upgrades. When the budget
//! permits no upgrade at all, one level of the best-ranked object with
//! room is imported anyway: a deliberate starvation escape valve that
//! knowingly oversteps the budget.

use super::{current_viewpoint, rank_by_utility, FetchDecision};
use crate::camera::ViewpointPredictor;
use crate::core::types::Result;
use crate::streaming::catalog::ObjectCatalog;
use crate::streaming::metric::MetricKind;
use crate::streaming::object::StreamableObject;
use crate::streaming::throughput::{budget_bytes, ThroughputEstimator};

/// First unrequested level after `level`, skipping any stuck requests.
fn advance(object: &StreamableObject, level: usize) -> Option<usize> {
    (level + 1..object.level_count()).find(|&i| {
        object
            .level(i)
            .map(|l| !l.requested())
            .unwrap_or(false)
    })
}

/// Byte cost of replacing the `base_size` mesh with `level`'s mesh.
fn incremental_cost(object: &StreamableObject, level: usize, base_size: u64) -> f32 {
    let size = object.level(level).map(|l| l.size_bytes).unwrap_or(0);
    size.saturating_sub(base_size) as f32
}

/// Per-object upgrade cursor used while planning.
struct Cursor {
    object: usize,
    next: Option<usize>,
    base_size: u64,
}

impl Cursor {
    fn new(catalog: &ObjectCatalog, object: usize) -> Self {
        Self {
            object,
            next: catalog.object(object).next_level(),
            base_size: catalog.object(object).displayed_size_bytes(),
        }
    }

    /// Plan the next upgrade if its cost fits `remaining`.
    fn try_bump(
        &mut self,
        catalog: &ObjectCatalog,
        remaining: &mut f32,
        decisions: &mut Vec<FetchDecision>,
    ) -> bool {
        let Some(level) = self.next else {
            return false;
        };
        let object = catalog.object(self.object);
        let cost = incremental_cost(object, level, self.base_size);
        if cost > *remaining {
            return false;
        }
        decisions.push(FetchDecision {
            object: self.object,
            level,
        });
        *remaining -= cost;
        self.base_size = object.level(level).map(|l| l.size_bytes).unwrap_or(self.base_size);
        self.next = advance(object, level);
        true
    }
}

/// Walk the ranked objects in order, bumping each as far as the
/// remaining budget allows before moving on.
fn greedy_walk(
    catalog: &ObjectCatalog,
    ranked: &[usize],
    mut remaining: f32,
) -> (Vec<FetchDecision>, f32) {
    let mut decisions = Vec::new();
    for &index in ranked {
        let mut cursor = Cursor::new(catalog, index);
        while cursor.try_bump(catalog, &mut remaining, &mut decisions) {}
    }
    (decisions, remaining)
}

/// Raise all ranked objects one level per pass, in rank order,
/// repeating while at least one object was upgraded.
fn uniform_passes(
    catalog: &ObjectCatalog,
    ranked: &[usize],
    mut remaining: f32,
) -> (Vec<FetchDecision>, f32) {
    let mut decisions = Vec::new();
    let mut cursors: Vec<Cursor> = ranked
        .iter()
        .map(|&index| Cursor::new(catalog, index))
        .collect();

    loop {
        let mut upgraded = false;
        for cursor in &mut cursors {
            if cursor.try_bump(catalog, &mut remaining, &mut decisions) {
                upgraded = true;
            }
        }
        if !upgraded {
            break;
        }
    }
    (decisions, remaining)
}

/// One level of the best-ranked object that still has room to grow,
/// budget notwithstanding.
fn fallback_single(catalog: &ObjectCatalog, ranked: &[usize]) -> Option<FetchDecision> {
    ranked.iter().find_map(|&index| {
        catalog
            .object(index)
            .next_level()
            .map(|level| FetchDecision { object: index, level })
    })
}

/// Ranked walk over every object in the catalog.
pub(super) fn plan_greedy(
    catalog: &ObjectCatalog,
    metric: MetricKind,
    estimator: &ThroughputEstimator,
    predictor: &ViewpointPredictor,
    buffer_seconds: f32,
) -> Result<Vec<FetchDecision>> {
    let now = current_viewpoint(predictor)?;
    let all = (0..catalog.len()).collect();
    let ranked = rank_by_utility(catalog, metric, now, all);
    let budget = budget_bytes(estimator, buffer_seconds);

    let (decisions, _) = greedy_walk(catalog, &ranked, budget);
    if decisions.is_empty() {
        return Ok(fallback_single(catalog, &ranked).into_iter().collect());
    }
    Ok(decisions)
}

/// Lock-step passes over every object in the catalog.
pub(super) fn plan_uniform(
    catalog: &ObjectCatalog,
    metric: MetricKind,
    estimator: &ThroughputEstimator,
    predictor: &ViewpointPredictor,
    buffer_seconds: f32,
) -> Result<Vec<FetchDecision>> {
    let now = current_viewpoint(predictor)?;
    let all = (0..catalog.len()).collect();
    let ranked = rank_by_utility(catalog, metric, now, all);
    let budget = budget_bytes(estimator, buffer_seconds);

    let (decisions, _) = uniform_passes(catalog, &ranked, budget);
    if decisions.is_empty() {
        return Ok(fallback_single(catalog, &ranked).into_iter().collect());
    }
    Ok(decisions)
}

/// Lock-step over the visible partition, then the greedy walk over the
/// invisible partition with whatever budget remains.
pub(super) fn plan_hybrid(
    catalog: &ObjectCatalog,
    metric: MetricKind,
    estimator: &ThroughputEstimator,
    predictor: &ViewpointPredictor,
    buffer_seconds: f32,
) -> Result<Vec<FetchDecision>> {
    let now = current_viewpoint(predictor)?;
    let (visible, invisible) = catalog.partition(now)?;
    let ranked_visible = rank_by_utility(catalog, metric, now, visible);
    let ranked_invisible = rank_by_utility(catalog, metric, now, invisible);
    let budget = budget_bytes(estimator, buffer_seconds);

    let (mut decisions, remaining) = uniform_passes(catalog, &ranked_visible, budget);
    let (rest, _) = greedy_walk(catalog, &ranked_invisible, remaining);
    decisions.extend(rest);

    if decisions.is_empty() {
        let single = fallback_single(catalog, &ranked_visible)
            .or_else(|| fallback_single(catalog, &ranked_invisible));
        return Ok(single.into_iter().collect());
    }
    Ok(decisions)
}
