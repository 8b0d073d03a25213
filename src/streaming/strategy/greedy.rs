//! Single best utility-per-second, measured at fetch completion time

use super::{current_viewpoint, view_candidates, FetchDecision};
use crate::camera::ViewpointPredictor;
use crate::core::types::Result;
use crate::streaming::catalog::ObjectCatalog;
use crate::streaming::metric::MetricKind;
use crate::streaming::throughput::ThroughputEstimator;

/// Floor for projected fetch times
const MIN_FETCH_SECONDS: f32 = 1e-6;

/// Pick the candidate with the highest
/// `utility(at completion) × quality / fetch_seconds`.
///
/// The viewpoint is predicted at the moment the fetch would finish, so
/// slow downloads are scored against where the user will be looking,
/// not where they look now.
pub(super) fn plan(
    catalog: &ObjectCatalog,
    metric: MetricKind,
    estimator: &ThroughputEstimator,
    predictor: &ViewpointPredictor,
    horizon_seconds: f32,
) -> Result<Vec<FetchDecision>> {
    let now = current_viewpoint(predictor)?;
    let candidates = view_candidates(catalog, predictor, horizon_seconds)?;

    let mut best: Option<(FetchDecision, f32)> = None;
    for candidate in candidates {
        let object = catalog.object(candidate.object);
        let Some(level) = object.level(candidate.level) else {
            continue;
        };
        let fetch_secs = estimator.fetch_seconds(level.size_bytes).max(MIN_FETCH_SECONDS);

        let at_completion = predictor.predict(fetch_secs);
        let viewpoint = at_completion.as_ref().unwrap_or(now);
        let score = metric.score(object, viewpoint) * level.quality / fetch_secs;

        if best.map_or(true, |(_, top)| score > top) {
            best = Some((candidate, score));
        }
    }

    Ok(best.map(|(decision, _)| decision).into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::ViewpointSnapshot;
    use crate::core::types::Vec3;
    use crate::streaming::testutil::{loaded_object, record_with_levels};

    fn static_predictor() -> ViewpointPredictor {
        let mut predictor = ViewpointPredictor::new();
        let snapshot = ViewpointSnapshot::desktop(Vec3::ZERO, 0.0, 0.0);
        predictor.track(snapshot, 1.0 / 60.0);
        predictor.track(snapshot, 1.0 / 60.0);
        predictor
    }

    #[test]
    fn test_cost_normalization_prefers_cheap_level() {
        // Same distance; the slightly worse but 8x cheaper level wins
        // once fetch time divides the score
        let heavy = record_with_levels("heavy", [0.0, 0.0, -4.0], &[(10, 0.5), (8000, 0.1)]);
        let light = record_with_levels("light", [0.0, 0.0, -4.0], &[(10, 0.5), (1000, 0.2)]);
        let catalog = ObjectCatalog::new(vec![loaded_object(&heavy), loaded_object(&light)]);
        let predictor = static_predictor();
        let estimator = ThroughputEstimator::new();

        let plan = plan(&catalog, MetricKind::Distance, &estimator, &predictor, 5.0).unwrap();
        assert_eq!(plan, vec![FetchDecision { object: 1, level: 1 }]);
    }

    #[test]
    fn test_scores_at_predicted_completion() {
        // Camera retreating from "near" toward "far" at 8 m/s; the
        // download takes long enough that "far" is the better buy by
        // completion time
        let near = record_with_levels("near", [0.0, 0.0, -2.0], &[(10, 0.5), (4000, 0.1)]);
        let far = record_with_levels("far", [0.0, 0.0, -42.0], &[(10, 0.5), (4000, 0.1)]);
        let catalog = ObjectCatalog::new(vec![loaded_object(&near), loaded_object(&far)]);

        let mut predictor = ViewpointPredictor::new();
        predictor.track(ViewpointSnapshot::desktop(Vec3::ZERO, 0.0, 0.0), 0.1);
        predictor.track(
            ViewpointSnapshot::desktop(Vec3::new(0.0, 0.0, -0.8), 0.0, 0.0),
            0.1,
        );

        // fetch_seconds(4000) at default rates = 80s -> camera ends up
        // around z = -640, far past both; "far" is then the closer one
        let estimator = ThroughputEstimator::new();
        let plan = plan(&catalog, MetricKind::Distance, &estimator, &predictor, 5.0).unwrap();
        assert_eq!(plan, vec![FetchDecision { object: 1, level: 1 }]);
    }
}
