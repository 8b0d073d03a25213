//! Lodstream - adaptive level-of-detail streaming for 3D scenes
//!
//! A client-side controller that decides, every scheduling tick, which
//! level of detail of which object to fetch next, given rolling
//! throughput estimates, a predicted viewpoint, and a pluggable
//! utility metric. Rendering, input and codec internals live behind
//! narrow seams; this crate is the decision engine.

pub mod core;
pub mod math;
pub mod camera;
pub mod streaming;

pub use crate::core::{Error, Result};
pub use crate::camera::{CameraRig, ViewpointPredictor, ViewpointSnapshot};
pub use crate::streaming::{
    MetricKind, ObjectCatalog, Scheduler, SchedulerConfig, SceneManifest, StreamSession,
    StrategyKind, ThroughputEstimator,
};
