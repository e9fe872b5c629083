//! Headless stand-ins for the render host and the instance host.

use std::collections::BTreeMap;

use glam::Vec3;
use isle_mesh::TerrainMesh;
use isle_terrain::{InstanceHost, InstanceId, MeshSink, TerrainImage};
use tracing::trace;

/// Keeps the most recently presented mesh, texture, and map.
#[derive(Debug, Default)]
pub struct CaptureSink {
    pub mesh: Option<TerrainMesh>,
    pub texture: Option<TerrainImage>,
    pub map: Option<TerrainImage>,
    /// Number of `draw_mesh` plus `draw_map` calls.
    pub frames: u32,
}

impl MeshSink for CaptureSink {
    fn draw_mesh(&mut self, mesh: &TerrainMesh, texture: &TerrainImage) {
        self.mesh = Some(mesh.clone());
        self.texture = Some(texture.clone());
        self.frames += 1;
    }

    fn draw_map(&mut self, map: &TerrainImage) {
        self.map = Some(map.clone());
        self.frames += 1;
    }
}

/// A spawned instance.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    pub position: Vec3,
    pub tag: String,
}

/// Flat instance store keyed by id.
#[derive(Debug, Default)]
pub struct InstanceRegistry {
    instances: BTreeMap<InstanceId, Instance>,
    next_id: u64,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Positions of every instance carrying `tag`, in spawn order.
    pub fn positions(&self, tag: &str) -> Vec<Vec3> {
        self.instances
            .values()
            .filter(|i| i.tag == tag)
            .map(|i| i.position)
            .collect()
    }
}

impl InstanceHost for InstanceRegistry {
    fn spawn(&mut self, position: Vec3, tag: &str) -> InstanceId {
        let id = InstanceId(self.next_id);
        self.next_id += 1;
        trace!(id = id.0, ?position, tag, "instance spawned");
        self.instances.insert(
            id,
            Instance {
                position,
                tag: tag.to_string(),
            },
        );
        id
    }

    fn despawn(&mut self, id: InstanceId) -> bool {
        self.instances.remove(&id).is_some()
    }

    fn tagged(&self, tag: &str) -> Vec<InstanceId> {
        self.instances
            .iter()
            .filter(|(_, i)| i.tag == tag)
            .map(|(id, _)| *id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isle_terrain::VEGETATION_TAG;

    #[test]
    fn test_registry_spawn_and_sweep() {
        let mut registry = InstanceRegistry::new();
        let a = registry.spawn(Vec3::X, VEGETATION_TAG);
        registry.spawn(Vec3::Y, "Marker");
        let c = registry.spawn(Vec3::Z, VEGETATION_TAG);

        assert_eq!(registry.tagged(VEGETATION_TAG), vec![a, c]);
        assert_eq!(registry.positions(VEGETATION_TAG), vec![Vec3::X, Vec3::Z]);
        assert!(registry.despawn(a));
        assert!(!registry.despawn(a));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_capture_sink_keeps_latest_map() {
        use isle_terrain::FilterMode;

        let mut sink = CaptureSink::default();
        sink.draw_map(&TerrainImage::new(2, 2, FilterMode::Point));
        sink.draw_map(&TerrainImage::new(3, 1, FilterMode::Point));
        assert_eq!(sink.map.map(|m| m.dimensions()), Some((3, 1)));
        assert_eq!(sink.frames, 2);
        assert!(sink.mesh.is_none());
    }
}
