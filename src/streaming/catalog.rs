//! Catalog of streamable objects and visibility partitioning

use crate::camera::ViewpointSnapshot;
use crate::core::error::Error;
use crate::core::types::Result;
use crate::streaming::manifest::SceneManifest;
use crate::streaming::object::StreamableObject;

/// Owns every streamable object in the scene.
///
/// Also owns the single in-flight guard for scheduling passes: only one
/// pass may run at a time, re-entrant ticks are dropped by the caller
/// when [`begin_pass`](Self::begin_pass) refuses.
pub struct ObjectCatalog {
    objects: Vec<StreamableObject>,
    pass_active: bool,
}

impl ObjectCatalog {
    pub fn new(objects: Vec<StreamableObject>) -> Self {
        Self {
            objects,
            pass_active: false,
        }
    }

    /// Build the object set from a scene manifest.
    pub fn from_manifest(manifest: &SceneManifest) -> Self {
        Self::new(
            manifest
                .objects
                .iter()
                .map(StreamableObject::from_record)
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects(&self) -> &[StreamableObject] {
        &self.objects
    }

    pub fn object(&self, index: usize) -> &StreamableObject {
        &self.objects[index]
    }

    pub fn object_mut(&mut self, index: usize) -> &mut StreamableObject {
        &mut self.objects[index]
    }

    /// True once every level of every object is loaded; further
    /// scheduling ticks are no-ops.
    pub fn all_loaded(&self) -> bool {
        self.objects.iter().all(|o| o.all_loaded())
    }

    /// Split object indices into (visible, invisible) by frustum
    /// containment of each displayed mesh.
    ///
    /// Pure query, encounter order preserved. An object with nothing
    /// loaded yet has no displayed mesh to test and is an error.
    ///
    /// The immersive rig authors its frustum half a turn off in yaw;
    /// the test runs against a gaze-aligned copy, so the caller's
    /// snapshot comes through unmodified.
    pub fn partition(&self, viewpoint: &ViewpointSnapshot) -> Result<(Vec<usize>, Vec<usize>)> {
        let frustum = viewpoint.gaze_aligned().frustum();

        let mut visible = Vec::new();
        let mut invisible = Vec::new();
        for (index, object) in self.objects.iter().enumerate() {
            let bounds = object
                .world_bounds()
                .ok_or_else(|| Error::Uninitialized(object.name().to_string()))?;
            if frustum.intersects_aabb(&bounds) {
                visible.push(index);
            } else {
                invisible.push(index);
            }
        }
        Ok((visible, invisible))
    }

    /// Indices of objects whose displayed mesh intersects the frustum.
    pub fn visible_objects(&self, viewpoint: &ViewpointSnapshot) -> Result<Vec<usize>> {
        self.partition(viewpoint).map(|(visible, _)| visible)
    }

    /// Indices of objects whose displayed mesh lies outside the frustum.
    pub fn invisible_objects(&self, viewpoint: &ViewpointSnapshot) -> Result<Vec<usize>> {
        self.partition(viewpoint).map(|(_, invisible)| invisible)
    }

    /// Claim the scheduling pass slot. Returns false while another pass
    /// is in flight.
    pub fn begin_pass(&mut self) -> bool {
        if self.pass_active {
            return false;
        }
        self.pass_active = true;
        true
    }

    /// Release the scheduling pass slot.
    pub fn end_pass(&mut self) {
        self.pass_active = false;
    }

    pub fn pass_active(&self) -> bool {
        self.pass_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraRig;
    use crate::core::types::{Quat, Vec3};
    use crate::streaming::object::StreamableObject;
    use crate::streaming::testutil::{loaded_object, record_at};

    fn catalog_front_and_back() -> ObjectCatalog {
        ObjectCatalog::new(vec![
            loaded_object(&record_at("front", [0.0, 0.0, -5.0])),
            loaded_object(&record_at("back", [0.0, 0.0, 5.0])),
            loaded_object(&record_at("front_far", [0.0, 0.0, -50.0])),
        ])
    }

    #[test]
    fn test_partition_complementary_and_exhaustive() {
        let catalog = catalog_front_and_back();
        let camera = ViewpointSnapshot::desktop(Vec3::ZERO, 0.0, 0.0);

        let (visible, invisible) = catalog.partition(&camera).unwrap();
        assert_eq!(visible.len() + invisible.len(), catalog.len());

        let mut all: Vec<usize> = visible.iter().chain(invisible.iter()).copied().collect();
        all.sort();
        assert_eq!(all, vec![0, 1, 2]);

        assert_eq!(visible, vec![0, 2]);
        assert_eq!(invisible, vec![1]);
    }

    #[test]
    fn test_partition_requires_loaded_mesh() {
        let catalog = ObjectCatalog::new(vec![
            loaded_object(&record_at("ready", [0.0, 0.0, -5.0])),
            StreamableObject::from_record(&record_at("empty", [0.0, 0.0, -5.0])),
        ]);
        let camera = ViewpointSnapshot::desktop(Vec3::ZERO, 0.0, 0.0);

        let result = catalog.partition(&camera);
        assert!(matches!(result, Err(Error::Uninitialized(name)) if name == "empty"));
    }

    #[test]
    fn test_immersive_partition_counter_rotates() {
        // Native identity on the immersive rig gazes toward +Z once the
        // convention offset is countered
        let catalog = catalog_front_and_back();
        let camera = ViewpointSnapshot::immersive(Vec3::ZERO, Quat::IDENTITY);

        let (visible, invisible) = catalog.partition(&camera).unwrap();
        assert!(visible.contains(&1), "gaze-side object culled: {visible:?}");
        assert!(invisible.contains(&0));

        // Caller's snapshot left untouched end-to-end
        assert_eq!(camera.rig, CameraRig::Immersive { rotation: Quat::IDENTITY });
    }

    #[test]
    fn test_pass_guard() {
        let mut catalog = ObjectCatalog::new(vec![]);
        assert!(catalog.begin_pass());
        assert!(!catalog.begin_pass());
        assert!(catalog.pass_active());
        catalog.end_pass();
        assert!(catalog.begin_pass());
    }

    #[test]
    fn test_all_loaded() {
        let catalog = ObjectCatalog::new(vec![loaded_object(&record_at("only", [0.0; 3]))]);
        assert!(catalog.all_loaded());

        let catalog = ObjectCatalog::new(vec![StreamableObject::from_record(&record_at(
            "pending",
            [0.0; 3],
        ))]);
        assert!(!catalog.all_loaded());
    }
}
