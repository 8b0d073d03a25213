//! Static scene manifest
//!
//! Enumerates every streamable object, its fixed transform, and its
//! per-level file/size/distortion records. Read once at session start,
//! never rewritten.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::Result;

/// One level-of-detail record
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LevelRecord {
    /// File reference, resolved against the fetcher's base directory
    pub file: String,
    pub size_bytes: u64,
    /// Distortion index in [0,1]; 0 = perceptually lossless
    pub distortion: f32,
}

impl LevelRecord {
    /// Perceptual quality score in [0,1], `1 - distortion`.
    pub fn quality(&self) -> f32 {
        (1.0 - self.distortion).clamp(0.0, 1.0)
    }
}

/// One streamable object entry
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub name: String,
    pub position: [f32; 3],
    /// Quaternion as [x, y, z, w]
    #[serde(default = "identity_rotation")]
    pub rotation: [f32; 4],
    #[serde(default = "unit_scale")]
    pub scale: f32,
    /// Levels ordered by increasing size and quality
    pub levels: Vec<LevelRecord>,
}

fn identity_rotation() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

fn unit_scale() -> f32 {
    1.0
}

/// The full scene descriptor
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SceneManifest {
    pub objects: Vec<ObjectRecord>,
}

impl SceneManifest {
    /// Parse a manifest from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Manifest(e.to_string()))
    }

    /// Read and parse a manifest file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Manifest(format!("{}: {e}", path.display())))?;
        Self::from_json(&text)
    }
}
