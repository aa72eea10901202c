use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::query::ExactCollider;
use crate::shape::DeformablePart;

/// A part made of one or several exact colliders.
///
/// Its world-space bounds are the merged bounds of all its colliders, enabled or not. The
/// host deforms it by editing the colliders through [`ColliderPart::colliders_mut`].
#[derive(Clone, Debug, PartialEq)]
pub struct ColliderPart<C> {
    colliders: Vec<C>,
    bake_count: u32,
}

impl<C: ExactCollider> ColliderPart<C> {
    /// Creates a part from its colliders.
    ///
    /// # Panics
    ///
    /// Panics if `colliders` is empty: such a part would have no bounds to merge into the
    /// hierarchy.
    pub fn new(colliders: Vec<C>) -> Self {
        assert!(
            !colliders.is_empty(),
            "A collider part must contain at least one collider."
        );

        Self {
            colliders,
            bake_count: 0,
        }
    }

    /// Creates a part with a single collider.
    pub fn single(collider: C) -> Self {
        Self::new(vec![collider])
    }

    /// Mutable access to the colliders of this part.
    pub fn colliders_mut(&mut self) -> &mut [C] {
        &mut self.colliders
    }

    /// The number of times [`DeformablePart::rebake_collider`] was called on this part.
    pub fn bake_count(&self) -> u32 {
        self.bake_count
    }
}

impl<C: ExactCollider> DeformablePart for ColliderPart<C> {
    type Collider = C;

    fn world_aabb(&self) -> Aabb {
        self.colliders
            .iter()
            .fold(Aabb::new_invalid(), |acc, c| acc.merged(&c.aabb()))
    }

    #[inline]
    fn colliders(&self) -> &[C] {
        &self.colliders
    }

    fn rebake_collider(&mut self) {
        self.bake_count += 1;
    }
}
