//! Adaptive level-of-detail streaming: the decision engine
//!
//! Per tick: partition the catalog against the predicted viewpoint,
//! score candidates with the active metric, let the active strategy
//! select fetches under the throughput budget, import the winners, and
//! feed the measured rates back into the estimator.

pub mod throughput;
pub mod fetch;
pub mod manifest;
pub mod object;
pub mod catalog;
pub mod metric;
pub mod strategy;
pub mod session;

#[cfg(test)]
pub(crate) mod testutil;

pub use throughput::{budget_bytes, harmonic_mean, ThroughputEstimator, DEFAULT_RATE, SAMPLE_WINDOW};
pub use fetch::{MeshCodec, MeshFetcher, MeshGeometry, MeshInstance, SummaryCodec};
pub use manifest::{LevelRecord, ObjectRecord, SceneManifest};
pub use object::{LevelDescriptor, StreamableObject};
pub use catalog::ObjectCatalog;
pub use metric::MetricKind;
pub use strategy::{FetchDecision, Scheduler, SchedulerConfig, StrategyKind};
pub use session::StreamSession;
