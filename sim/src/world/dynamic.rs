use super::transform::{ObjectTransform, TransformInput};
use crate::collision::{RawSurface, Surface, SurfaceOrigin};

/// A movable group of surfaces, e.g. a platform.
///
/// Keeps a private copy of the host triangles so world-space surfaces can be
/// re-derived after every move without the host resending geometry.
#[derive(Clone, Debug)]
pub struct DynamicObject {
    pub transform: ObjectTransform,
    raw: Vec<RawSurface>,
    pub surfaces: Vec<Surface>,
}

impl DynamicObject {
    pub fn new(transform: &TransformInput, raw: &[RawSurface]) -> Self {
        let mut object = Self {
            transform: ObjectTransform::new(transform),
            raw: raw.to_vec(),
            surfaces: Vec::with_capacity(raw.len()),
        };
        object.rebuild_surfaces();
        object
    }

    /// Apply a new pose. Surface count is unchanged, so cached references
    /// (object handle + index) stay valid.
    pub fn move_to(&mut self, transform: &TransformInput) {
        self.transform.update(transform);
        self.rebuild_surfaces();
    }

    fn rebuild_surfaces(&mut self) {
        let rotation = self.transform.rotation();
        let position = self.transform.position;
        self.surfaces.clear();
        self.surfaces.extend(self.raw.iter().map(|raw| {
            Surface::from_raw_transformed(raw, &rotation, &position, SurfaceOrigin::DynamicObject)
        }));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}
