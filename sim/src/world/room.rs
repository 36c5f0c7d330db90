use std::hash::{DefaultHasher, Hash, Hasher};

use super::transform::{ObjectTransform, TransformInput};
use crate::collision::{RawSurface, Surface, SurfaceOrigin};

/// A group of triangles placed by one transform: a static sub-mesh of a room,
/// or the geometry of a dynamic object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SurfaceMesh {
    pub transform: TransformInput,
    pub surfaces: Vec<RawSurface>,
}

/// Static geometry sharing one room id.
///
/// Surfaces from sub-meshes follow the plain surfaces. Each sub-mesh keeps one
/// transform, owned here and referenced by index from its surfaces, so dropping
/// the room releases each transform exactly once.
#[derive(Clone, Debug)]
pub struct Room {
    pub room_id: u32,
    pub surfaces: Vec<Surface>,
    pub transforms: Vec<ObjectTransform>,
}

impl Room {
    pub fn build(room_id: u32, statics: &[RawSurface], meshes: &[SurfaceMesh]) -> Self {
        let mesh_surfaces: usize = meshes.iter().map(|m| m.surfaces.len()).sum();
        let mut surfaces = Vec::with_capacity(statics.len() + mesh_surfaces);
        let mut transforms = Vec::with_capacity(meshes.len());

        surfaces.extend(
            statics
                .iter()
                .map(|raw| Surface::from_raw(raw, SurfaceOrigin::Static)),
        );

        for (mesh_index, mesh) in meshes.iter().enumerate() {
            let transform = ObjectTransform::new(&mesh.transform);
            let rotation = transform.rotation();
            let origin = SurfaceOrigin::StaticMesh {
                mesh: mesh_index as u32,
            };
            surfaces.extend(mesh.surfaces.iter().map(|raw| {
                Surface::from_raw_transformed(raw, &rotation, &transform.position, origin)
            }));
            transforms.push(transform);
        }

        Self {
            room_id,
            surfaces,
            transforms,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Transform owning a sub-mesh surface, if the surface came from one.
    pub fn surface_transform(&self, index: usize) -> Option<&ObjectTransform> {
        match self.surfaces.get(index)?.origin {
            SurfaceOrigin::StaticMesh { mesh } => self.transforms.get(mesh as usize),
            _ => None,
        }
    }

    /// Content hash over the derived geometry. Identifies a room's contents
    /// independent of which slot or id it currently sits under.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.surfaces.len().hash(&mut hasher);
        for s in &self.surfaces {
            for v in [s.vertex1, s.vertex2, s.vertex3] {
                v.x.hash(&mut hasher);
                v.y.hash(&mut hasher);
                v.z.hash(&mut hasher);
            }
            s.surface_type.hash(&mut hasher);
            s.terrain.hash(&mut hasher);
            s.room_id.hash(&mut hasher);
            s.face_id.hash(&mut hasher);
        }
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor(y: i32) -> RawSurface {
        RawSurface::new([[0, y, 0], [0, y, 100], [100, y, 0]])
    }

    #[test]
    fn mesh_surfaces_follow_statics_and_share_one_transform() {
        let mesh = SurfaceMesh {
            transform: TransformInput {
                position: [0.0, 50.0, 0.0],
                euler_rotation: [0.0; 3],
            },
            surfaces: vec![floor(0), floor(10)],
        };
        let room = Room::build(3, &[floor(0)], &[mesh]);

        assert_eq!(room.len(), 3);
        assert_eq!(room.transforms.len(), 1);
        assert_eq!(room.surfaces[0].origin, SurfaceOrigin::Static);
        assert_eq!(room.surfaces[2].origin, SurfaceOrigin::StaticMesh { mesh: 0 });
        // The mesh transform lifts its triangles.
        assert_eq!(room.surfaces[1].vertex1.y, 50);
        assert!(room.surface_transform(0).is_none());
        assert!(room.surface_transform(2).is_some());
    }

    #[test]
    fn fingerprint_tracks_content_not_room_id() {
        let a = Room::build(0, &[floor(0)], &[]);
        let b = Room::build(1, &[floor(0)], &[]);
        let c = Room::build(0, &[floor(5)], &[]);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
