//! Shared fixtures for unit tests

use crate::core::types::Vec3;
use crate::math::Aabb;
use crate::streaming::fetch::MeshGeometry;
use crate::streaming::manifest::{LevelRecord, ObjectRecord};
use crate::streaming::object::StreamableObject;

/// Unit cube geometry summary
pub(crate) fn cube_geometry() -> MeshGeometry {
    MeshGeometry {
        vertex_count: 8,
        triangle_count: 12,
        local_bounds: Aabb::from_center_half_extent(Vec3::ZERO, Vec3::splat(0.5)),
        surface_area: 6.0,
    }
}

/// Degenerate zero-extent geometry
pub(crate) fn point_geometry() -> MeshGeometry {
    MeshGeometry {
        vertex_count: 1,
        triangle_count: 0,
        local_bounds: Aabb::from_center_half_extent(Vec3::ZERO, Vec3::ZERO),
        surface_area: 0.0,
    }
}

/// Object record with explicit per-level (size, distortion) pairs
pub(crate) fn record_with_levels(
    name: &str,
    position: [f32; 3],
    levels: &[(u64, f32)],
) -> ObjectRecord {
    ObjectRecord {
        name: name.to_string(),
        position,
        rotation: [0.0, 0.0, 0.0, 1.0],
        scale: 1.0,
        levels: levels
            .iter()
            .enumerate()
            .map(|(i, &(size_bytes, distortion))| LevelRecord {
                file: format!("{name}_l{i}.mesh"),
                size_bytes,
                distortion,
            })
            .collect(),
    }
}

/// Single-level object record at a position
pub(crate) fn record_at(name: &str, position: [f32; 3]) -> ObjectRecord {
    record_with_levels(name, position, &[(1000, 0.1)])
}

/// Object with level 0 already displayed (unit cube), no I/O involved
pub(crate) fn loaded_object(record: &ObjectRecord) -> StreamableObject {
    let mut object = StreamableObject::from_record(record);
    object.force_load_geometry(0, cube_geometry());
    object
}

/// Write a cube-geometry summary file for every level of a record
pub(crate) fn write_levels(dir: &std::path::Path, record: &ObjectRecord) {
    let bytes = serde_json::to_vec(&cube_geometry()).unwrap();
    for level in &record.levels {
        std::fs::write(dir.join(&level.file), &bytes).unwrap();
    }
}
