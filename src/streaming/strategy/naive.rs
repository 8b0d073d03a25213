//! Single best `quality × utility`, no cost normalization

use super::{current_viewpoint, view_candidates, FetchDecision};
use crate::camera::ViewpointPredictor;
use crate::core::types::Result;
use crate::streaming::catalog::ObjectCatalog;
use crate::streaming::metric::MetricKind;

/// Pick the candidate with the highest `quality × utility(now)` among
/// objects visible now or at the horizon.
pub(super) fn plan(
    catalog: &ObjectCatalog,
    metric: MetricKind,
    predictor: &ViewpointPredictor,
    horizon_seconds: f32,
) -> Result<Vec<FetchDecision>> {
    let now = current_viewpoint(predictor)?;
    let candidates = view_candidates(catalog, predictor, horizon_seconds)?;

    let mut best: Option<(FetchDecision, f32)> = None;
    for candidate in candidates {
        let object = catalog.object(candidate.object);
        let quality = object
            .level(candidate.level)
            .map(|l| l.quality)
            .unwrap_or(0.0);
        let score = quality * metric.score(object, now);
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((candidate, score));
        }
    }

    Ok(best.map(|(decision, _)| decision).into_iter().collect())
}
