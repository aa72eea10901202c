use super::bvh_tree::NodeId;
use super::{Bvh, BvhNode, TraceRecord};
use crate::math::Real;
use crate::query::{cast_ray_on_part, QueryStats, Ray, RayIntersection};
use crate::shape::DeformablePart;

/// Callbacks invoked while a ray traverses a [`Bvh`].
///
/// All methods default to doing nothing. The unit type `()` is the no-op observer used by the
/// fast query, [`TraceRecord`] records node ids for diagnostics, and [`QueryStats`] counts the
/// tests performed. Observers can be combined with a pair `(A, B)`.
pub trait TraversalObserver {
    /// Called when a node is reached, before its bounding test.
    #[inline]
    fn visit(&mut self, _node: NodeId) {}

    /// Called when the ray passed the bounding test of a node.
    #[inline]
    fn aabb_passed(&mut self, _node: NodeId) {}

    /// Called before each exact collider test of a part.
    #[inline]
    fn collider_tested(&mut self, _part: u32) {}

    /// Called when an exact collider of the part of a leaf was hit.
    #[inline]
    fn leaf_hit(&mut self, _node: NodeId) {}
}

impl TraversalObserver for () {}

impl<T: TraversalObserver + ?Sized> TraversalObserver for &mut T {
    #[inline]
    fn visit(&mut self, node: NodeId) {
        (**self).visit(node)
    }

    #[inline]
    fn aabb_passed(&mut self, node: NodeId) {
        (**self).aabb_passed(node)
    }

    #[inline]
    fn collider_tested(&mut self, part: u32) {
        (**self).collider_tested(part)
    }

    #[inline]
    fn leaf_hit(&mut self, node: NodeId) {
        (**self).leaf_hit(node)
    }
}

impl<A: TraversalObserver, B: TraversalObserver> TraversalObserver for (A, B) {
    #[inline]
    fn visit(&mut self, node: NodeId) {
        self.0.visit(node);
        self.1.visit(node);
    }

    #[inline]
    fn aabb_passed(&mut self, node: NodeId) {
        self.0.aabb_passed(node);
        self.1.aabb_passed(node);
    }

    #[inline]
    fn collider_tested(&mut self, part: u32) {
        self.0.collider_tested(part);
        self.1.collider_tested(part);
    }

    #[inline]
    fn leaf_hit(&mut self, node: NodeId) {
        self.0.leaf_hit(node);
        self.1.leaf_hit(node);
    }
}

/// The closest hit found by a ray cast on a [`Bvh`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct BvhRayHit {
    /// The index of the part that was hit.
    pub part: u32,
    /// The leaf referencing that part.
    pub node: NodeId,
    /// The intersection returned by the exact collider of the part.
    pub intersection: RayIntersection,
}

impl BvhRayHit {
    /// The time of impact of the hit along the ray.
    #[inline]
    pub fn time_of_impact(&self) -> Real {
        self.intersection.time_of_impact
    }
}

/// Keeps the hit with the strictly smallest time of impact. Ties keep `first`.
#[inline]
pub(crate) fn keep_closest<T>(
    first: Option<T>,
    second: Option<T>,
    toi: impl Fn(&T) -> Real,
) -> Option<T> {
    match (first, second) {
        (Some(a), Some(b)) => {
            if toi(&b) < toi(&a) {
                Some(b)
            } else {
                Some(a)
            }
        }
        (a, None) => a,
        (None, b) => b,
    }
}

impl Bvh {
    /// Casts a ray on this BVH and returns the closest hit, if any.
    ///
    /// Only subtrees whose bounds are hit by the ray (within `max_time_of_impact`) are
    /// explored. The result is the same as testing the exact colliders of every part and
    /// keeping the closest hit: pruning only changes the amount of work performed.
    ///
    /// `parts` must be the slice this tree was built from.
    pub fn cast_ray<P: DeformablePart>(
        &self,
        parts: &[P],
        ray: &Ray,
        max_time_of_impact: Real,
    ) -> Option<BvhRayHit> {
        self.cast_ray_observed(parts, ray, max_time_of_impact, &mut ())
    }

    /// Casts a ray on this BVH while counting the bounding and exact tests into `stats`.
    pub fn cast_ray_with_stats<P: DeformablePart>(
        &self,
        parts: &[P],
        ray: &Ray,
        max_time_of_impact: Real,
        stats: &mut QueryStats,
    ) -> Option<BvhRayHit> {
        self.cast_ray_observed(parts, ray, max_time_of_impact, stats)
    }

    /// Casts a ray on this BVH while recording the traversal into `trace`.
    ///
    /// The traversal is exactly the same as [`Bvh::cast_ray`]. Node ids are appended to the
    /// collections of `trace`: every node reached goes to `visited`, the nodes whose bounds
    /// were hit go to `passed`, and the leaves whose exact collider was hit go to `hit_leaves`.
    /// A pruned subtree only contributes the `visited` entry of its root.
    pub fn cast_ray_traced<P: DeformablePart>(
        &self,
        parts: &[P],
        ray: &Ray,
        max_time_of_impact: Real,
        trace: &mut TraceRecord,
    ) -> Option<BvhRayHit> {
        self.cast_ray_observed(parts, ray, max_time_of_impact, trace)
    }

    /// Casts a ray on this BVH, reporting every step of the traversal to `observer`.
    pub fn cast_ray_observed<P: DeformablePart, O: TraversalObserver + ?Sized>(
        &self,
        parts: &[P],
        ray: &Ray,
        max_time_of_impact: Real,
        observer: &mut O,
    ) -> Option<BvhRayHit> {
        self.root
            .as_ref()?
            .cast_ray_observed(parts, ray, max_time_of_impact, observer)
    }
}

impl BvhNode {
    /// Casts a ray on the subtree rooted at this node. See [`Bvh::cast_ray_observed`].
    ///
    /// Both children of an internal node are always explored since either of them might
    /// contain the closest hit. When both report a hit at the same distance, the left one wins.
    pub fn cast_ray_observed<P: DeformablePart, O: TraversalObserver + ?Sized>(
        &self,
        parts: &[P],
        ray: &Ray,
        max_time_of_impact: Real,
        observer: &mut O,
    ) -> Option<BvhRayHit> {
        observer.visit(self.id());

        if !self.aabb().intersects_ray(ray, max_time_of_impact) {
            return None;
        }

        observer.aabb_passed(self.id());

        match self {
            BvhNode::Leaf { id, part, .. } => {
                let intersection = cast_ray_on_part(
                    super::part_at(parts, *part),
                    *part,
                    ray,
                    max_time_of_impact,
                    observer,
                )?;
                observer.leaf_hit(*id);

                Some(BvhRayHit {
                    part: *part,
                    node: *id,
                    intersection,
                })
            }
            BvhNode::Internal { left, right, .. } => {
                let left_hit = left.cast_ray_observed(parts, ray, max_time_of_impact, observer);
                let right_hit = right.cast_ray_observed(parts, ray, max_time_of_impact, observer);
                keep_closest(left_hit, right_hit, BvhRayHit::time_of_impact)
            }
        }
    }
}
