use crate::bounding_volume::Aabb;
use crate::query::ExactCollider;

/// One deformable part of an object, e.g., one skinned sub-mesh.
///
/// This is the capability the deformation system provides to the hierarchy. It is read-only
/// from the point of view of the hierarchy: every refit asks each part, exactly once, for its
/// current world-space bounds, and every leaf reached by a ray asks its part for its exact
/// colliders.
pub trait DeformablePart {
    /// The exact collider type of this part.
    type Collider: ExactCollider;

    /// The current world-space bounds of this part.
    fn world_aabb(&self) -> Aabb;

    /// The exact colliders of this part.
    ///
    /// Most parts own a single collider. When several are present, a ray query tests them in
    /// order and returns the first one that is hit.
    fn colliders(&self) -> &[Self::Collider];

    /// Re-derives the exact colliders from the current deformed geometry.
    ///
    /// This is typically expensive (e.g., baking a skinned mesh into a static triangle mesh) so
    /// it is only called when [`RebakePolicy`](crate::object::RebakePolicy) decides the part
    /// moved enough. The default implementation does nothing.
    fn rebake_collider(&mut self) {}
}
