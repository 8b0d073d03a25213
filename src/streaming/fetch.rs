//! Byte fetching and mesh decoding seam
//!
//! Fetch-and-decode is treated as an opaque asynchronous operation with
//! a measurable size, duration and output. Bytes come from a base
//! directory (path or URL strings resolve against it); decoding is a
//! pluggable [`MeshCodec`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::types::{Quat, Vec3};
use crate::math::Aabb;

/// Summary of decoded, displayable geometry
///
/// The renderer keeps the vertex data; the controller only needs the
/// measurements that drive scoring and visibility.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshGeometry {
    pub vertex_count: u32,
    pub triangle_count: u32,
    /// Bounds in the mesh's local space
    pub local_bounds: Aabb,
    /// Surface area in local units
    pub surface_area: f32,
}

/// Decode compressed mesh bytes into a displayable geometry summary.
///
/// Codec internals are a collaborator concern; anything that can turn
/// bytes into a [`MeshGeometry`] plugs in here.
pub trait MeshCodec: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<MeshGeometry, String>;
}

/// Codec for JSON-encoded geometry summaries
///
/// Suits sidecar metadata meshes and tests; real mesh formats implement
/// [`MeshCodec`] over their own wire layout.
pub struct SummaryCodec;

impl MeshCodec for SummaryCodec {
    fn decode(&self, bytes: &[u8]) -> Result<MeshGeometry, String> {
        serde_json::from_slice(bytes).map_err(|e| e.to_string())
    }
}

/// A renderable mesh placed in the scene
#[derive(Clone, Debug)]
pub struct MeshInstance {
    /// Owning object's name
    pub object: String,
    /// Level the geometry was decoded from
    pub level: usize,
    pub geometry: MeshGeometry,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

/// Disk-backed byte source plus codec
pub struct MeshFetcher {
    base_dir: PathBuf,
    codec: Box<dyn MeshCodec>,
}

impl MeshFetcher {
    pub fn new(base_dir: impl Into<PathBuf>, codec: Box<dyn MeshCodec>) -> Self {
        Self {
            base_dir: base_dir.into(),
            codec,
        }
    }

    /// Read the raw bytes of one level file.
    pub async fn fetch(&self, file: &str) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(self.base_dir.join(file)).await
    }

    /// Decode fetched bytes into a geometry summary.
    pub fn decode(&self, bytes: &[u8]) -> Result<MeshGeometry, String> {
        self.codec.decode(bytes)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}
