//! Single best integrated utility from fetch completion to the horizon

use super::{current_viewpoint, view_candidates, FetchDecision};
use crate::camera::ViewpointPredictor;
use crate::core::types::Result;
use crate::streaming::catalog::ObjectCatalog;
use crate::streaming::metric::MetricKind;
use crate::streaming::throughput::ThroughputEstimator;

/// Sub-intervals of the utility integral
const INTEGRAL_SLICES: usize = 4;

/// Floor for projected fetch times
const MIN_FETCH_SECONDS: f32 = 1e-6;

/// Pick the candidate whose utility, integrated from its projected
/// fetch completion to the horizon, is highest (Riemann sum over 4
/// slices, scaled by quality).
///
/// A candidate whose fetch would outlast the horizon is scored with the
/// instantaneous utility-per-second rule instead, but such a fallback
/// candidate only wins when no integral candidate exists at all; even
/// a higher-scoring instantaneous candidate loses to any integral one.
pub(super) fn plan(
    catalog: &ObjectCatalog,
    metric: MetricKind,
    estimator: &ThroughputEstimator,
    predictor: &ViewpointPredictor,
    horizon_seconds: f32,
) -> Result<Vec<FetchDecision>> {
    let now = current_viewpoint(predictor)?;
    let candidates = view_candidates(catalog, predictor, horizon_seconds)?;

    let mut best_integral: Option<(FetchDecision, f32)> = None;
    let mut best_instant: Option<(FetchDecision, f32)> = None;

    for candidate in candidates {
        let object = catalog.object(candidate.object);
        let Some(level) = object.level(candidate.level) else {
            continue;
        };
        let fetch_secs = estimator.fetch_seconds(level.size_bytes).max(MIN_FETCH_SECONDS);

        if fetch_secs < horizon_seconds {
            let dt = (horizon_seconds - fetch_secs) / INTEGRAL_SLICES as f32;
            let mut integral = 0.0;
            for slice in 0..INTEGRAL_SLICES {
                let t = fetch_secs + slice as f32 * dt;
                let sampled = predictor.predict(t);
                let viewpoint = sampled.as_ref().unwrap_or(now);
                integral += metric.score(object, viewpoint) * dt;
            }
            let score = integral * level.quality;
            if best_integral.map_or(true, |(_, top)| score > top) {
                best_integral = Some((candidate, score));
            }
        } else {
            let at_completion = predictor.predict(fetch_secs);
            let viewpoint = at_completion.as_ref().unwrap_or(now);
            let score = metric.score(object, viewpoint) * level.quality / fetch_secs;
            if best_instant.map_or(true, |(_, top)| score > top) {
                best_instant = Some((candidate, score));
            }
        }
    }

    Ok(best_integral
        .or(best_instant)
        .map(|(decision, _)| decision)
        .into_iter()
        .collect())
}
