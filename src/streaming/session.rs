//! Session driver tying catalog, estimator, predictor and scheduler
//! together

use crate::camera::{ViewpointPredictor, ViewpointSnapshot};
use crate::core::types::Result;
use crate::streaming::catalog::ObjectCatalog;
use crate::streaming::fetch::{MeshFetcher, MeshInstance};
use crate::streaming::manifest::SceneManifest;
use crate::streaming::metric::MetricKind;
use crate::streaming::strategy::{Scheduler, SchedulerConfig, StrategyKind};
use crate::streaming::throughput::ThroughputEstimator;

/// One streaming session over a static scene.
///
/// Owns all shared state of the cooperative scheduling loop. Drive it
/// with [`prime`](Self::prime) once, then [`tick`](Self::tick) from the
/// render loop.
pub struct StreamSession {
    catalog: ObjectCatalog,
    scheduler: Scheduler,
    estimator: ThroughputEstimator,
    predictor: ViewpointPredictor,
    fetcher: MeshFetcher,
}

impl StreamSession {
    pub fn new(manifest: &SceneManifest, fetcher: MeshFetcher, config: SchedulerConfig) -> Self {
        Self {
            catalog: ObjectCatalog::from_manifest(manifest),
            scheduler: Scheduler::new(config),
            estimator: ThroughputEstimator::new(),
            predictor: ViewpointPredictor::new(),
            fetcher,
        }
    }

    /// Import level 0 of every object so each one has a displayed mesh
    /// for visibility partitioning. Call once before the first tick.
    ///
    /// Unlike a scheduling pass, priming propagates the first failure:
    /// an object that cannot display anything leaves the whole session
    /// unable to partition.
    pub async fn prime(&mut self) -> Result<Vec<MeshInstance>> {
        let mut displayed = Vec::with_capacity(self.catalog.len());
        for index in 0..self.catalog.len() {
            if self.catalog.object(index).next_level() != Some(0) {
                continue;
            }
            let instance = self
                .catalog
                .object_mut(index)
                .fetch_level(0, &self.fetcher, &mut self.estimator)
                .await?;
            displayed.push(instance);
        }
        log::info!("primed {} object(s)", displayed.len());
        Ok(displayed)
    }

    /// Run one scheduling tick against the viewpoint rendered this
    /// frame.
    ///
    /// `snapshot` must reflect the camera after all movement for the
    /// frame was applied; it becomes the prediction baseline for the
    /// next tick.
    pub async fn tick(
        &mut self,
        snapshot: ViewpointSnapshot,
        frame_delta: f32,
    ) -> Result<Vec<MeshInstance>> {
        self.predictor.track(snapshot, frame_delta);
        self.scheduler
            .execute(
                &mut self.catalog,
                &self.fetcher,
                &mut self.estimator,
                &self.predictor,
            )
            .await
    }

    pub fn set_strategy(&mut self, strategy: StrategyKind) {
        self.scheduler.set_strategy(strategy);
    }

    pub fn set_metric(&mut self, metric: MetricKind) {
        self.scheduler.set_metric(metric);
    }

    pub fn catalog(&self) -> &ObjectCatalog {
        &self.catalog
    }

    pub fn estimator(&self) -> &ThroughputEstimator {
        &self.estimator
    }

    pub fn all_loaded(&self) -> bool {
        self.catalog.all_loaded()
    }
}
