//! A binary bounding volume hierarchy over the parts of a deformable object.

pub use bvh_trace::{NodeTraceCategory, NodeTraceFlags, TraceRecord, TraceSink, TraceView};
pub use bvh_traverse::{BvhRayHit, TraversalObserver};
pub use bvh_tree::{BreadthFirst, Bvh, BvhBuildStrategy, BvhNode, NodeId};

pub(crate) use bvh_traverse::keep_closest;

mod bvh_build;
mod bvh_refit;
mod bvh_trace;
mod bvh_traverse;
mod bvh_tree;
mod bvh_validation;


/// The part referenced by a leaf.
///
/// Panics if the part doesn't exist: the tree outlived the parts it was built from.
#[inline]
pub(crate) fn part_at<P>(parts: &[P], part: u32) -> &P {
    parts.get(part as usize).unwrap_or_else(|| {
        panic!(
            "BVH leaf references the part {} but only {} parts exist. \
             The BVH must be rebuilt when the parts it was built from are destroyed.",
            part,
            parts.len()
        )
    })
}
