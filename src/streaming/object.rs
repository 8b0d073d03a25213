//! Per-object level-of-detail state machine

use std::time::Instant;

use crate::core::error::Error;
use crate::core::types::{Quat, Result, Vec3};
use crate::math::Aabb;
use crate::streaming::fetch::{MeshFetcher, MeshGeometry, MeshInstance};
use crate::streaming::manifest::ObjectRecord;
use crate::streaming::throughput::ThroughputEstimator;

/// Floor for measured durations so instant local fetches still produce
/// finite rates
const MIN_SECONDS: f32 = 1e-6;

/// One level of detail of an object
#[derive(Clone, Debug)]
pub struct LevelDescriptor {
    pub file: String,
    pub size_bytes: u64,
    /// Perceptual quality in [0,1]; 1 = lossless
    pub quality: f32,
    loaded: bool,
    requested: bool,
}

impl LevelDescriptor {
    pub fn loaded(&self) -> bool {
        self.loaded
    }

    pub fn requested(&self) -> bool {
        self.requested
    }
}

/// One importable mesh and its streaming state
///
/// The transform is fixed at construction. Levels are requested at most
/// once each; the displayed level is the highest loaded so far and only
/// ever rises. Lower loaded levels stay resident but hidden, so nothing
/// is ever re-fetched.
pub struct StreamableObject {
    name: String,
    position: Vec3,
    rotation: Quat,
    scale: f32,
    levels: Vec<LevelDescriptor>,
    resident: Vec<Option<MeshGeometry>>,
    current_level: i32,
}

impl StreamableObject {
    /// Build from a manifest record.
    pub fn from_record(record: &ObjectRecord) -> Self {
        let levels = record
            .levels
            .iter()
            .map(|l| LevelDescriptor {
                file: l.file.clone(),
                size_bytes: l.size_bytes,
                quality: l.quality(),
                loaded: false,
                requested: false,
            })
            .collect::<Vec<_>>();
        let resident = vec![None; levels.len()];

        Self {
            name: record.name.clone(),
            position: Vec3::from_array(record.position),
            rotation: Quat::from_array(record.rotation).normalize(),
            scale: record.scale,
            levels,
            resident,
            current_level: -1,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn level(&self, index: usize) -> Option<&LevelDescriptor> {
        self.levels.get(index)
    }

    /// Highest level currently displayed; -1 before any import.
    pub fn current_level(&self) -> i32 {
        self.current_level
    }

    /// First level not yet requested, if any.
    pub fn next_level(&self) -> Option<usize> {
        self.levels.iter().position(|l| !l.requested)
    }

    pub fn all_loaded(&self) -> bool {
        self.levels.iter().all(|l| l.loaded)
    }

    /// Geometry of the displayed level.
    pub fn displayed_geometry(&self) -> Option<&MeshGeometry> {
        if self.current_level < 0 {
            return None;
        }
        self.resident[self.current_level as usize].as_ref()
    }

    /// Byte size of the displayed level; 0 before any import.
    pub fn displayed_size_bytes(&self) -> u64 {
        if self.current_level < 0 {
            return 0;
        }
        self.levels[self.current_level as usize].size_bytes
    }

    /// World-space bounds of the displayed mesh.
    pub fn world_bounds(&self) -> Option<Aabb> {
        self.displayed_geometry()
            .map(|g| g.local_bounds.transformed(self.rotation, self.scale, self.position))
    }

    /// World-space surface area of the displayed mesh
    /// (local area scaled by `scale²`).
    pub fn world_surface_area(&self) -> Option<f32> {
        self.displayed_geometry()
            .map(|g| g.surface_area * self.scale * self.scale)
    }

    /// Fetch, decode and display one level.
    ///
    /// The level is marked requested before the first await, so a
    /// concurrent duplicate is rejected without touching I/O. Fetch and
    /// decode failures are distinct errors; both leave the level marked
    /// requested for the rest of the session.
    pub async fn fetch_level(
        &mut self,
        level: usize,
        fetcher: &MeshFetcher,
        estimator: &mut ThroughputEstimator,
    ) -> Result<MeshInstance> {
        if self.levels.is_empty() {
            return Err(Error::Uninitialized(self.name.clone()));
        }
        if level >= self.levels.len() {
            return Err(Error::LevelOutOfRange {
                object: self.name.clone(),
                level,
                count: self.levels.len(),
            });
        }
        if self.levels[level].requested || self.levels[level].loaded {
            return Err(Error::AlreadyRequested {
                object: self.name.clone(),
                level,
            });
        }
        self.levels[level].requested = true;

        let file = self.levels[level].file.clone();

        let fetch_start = Instant::now();
        let bytes = fetcher.fetch(&file).await.map_err(|source| Error::Fetch {
            object: self.name.clone(),
            level,
            source,
        })?;
        let fetch_secs = fetch_start.elapsed().as_secs_f32().max(MIN_SECONDS);
        estimator.record_bandwidth(bytes.len() as f32 / fetch_secs);

        let decode_start = Instant::now();
        let geometry = fetcher.decode(&bytes).map_err(|reason| Error::Decode {
            object: self.name.clone(),
            level,
            reason,
        })?;
        let decode_secs = decode_start.elapsed().as_secs_f32().max(MIN_SECONDS);
        estimator.record_decode_rate(bytes.len() as f32 / decode_secs);

        self.levels[level].loaded = true;
        self.resident[level] = Some(geometry);
        self.current_level = self.current_level.max(level as i32);

        log::debug!(
            "imported '{}' level {} ({} bytes, displayed level {})",
            self.name,
            level,
            bytes.len(),
            self.current_level
        );

        Ok(MeshInstance {
            object: self.name.clone(),
            level,
            geometry,
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
        })
    }
}

#[cfg(test)]
impl StreamableObject {
    /// Test hook: mark a level loaded with the given geometry, no I/O.
    pub(crate) fn force_load_geometry(&mut self, level: usize, geometry: MeshGeometry) {
        self.levels[level].requested = true;
        self.levels[level].loaded = true;
        self.resident[level] = Some(geometry);
        self.current_level = self.current_level.max(level as i32);
    }

    /// Test hook: mark a level requested without I/O (a stuck request).
    pub(crate) fn mark_requested(&mut self, level: usize) {
        self.levels[level].requested = true;
    }
}
