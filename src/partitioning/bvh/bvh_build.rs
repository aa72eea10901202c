use super::bvh_tree::{BvhBuildStrategy, NodeId};
use super::{Bvh, BvhNode};
use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::shape::DeformablePart;
use ordered_float::OrderedFloat;

impl Bvh {
    /// Builds a BVH over `parts` with the default [`BvhBuildStrategy::MidpointIndex`] strategy.
    ///
    /// Each part becomes one leaf referencing it by its index in `parts`. The same slice (or one
    /// with the same length and order) must be given to every later refit and query.
    ///
    /// Returns an empty tree if `parts` is empty.
    pub fn from_parts<P: DeformablePart>(parts: &[P]) -> Self {
        Self::from_parts_with_strategy(BvhBuildStrategy::default(), parts)
    }

    /// Builds a BVH over `parts` with the given strategy.
    ///
    /// The current world-space bounds of every part are read once.
    pub fn from_parts_with_strategy<P: DeformablePart>(
        strategy: BvhBuildStrategy,
        parts: &[P],
    ) -> Self {
        let aabbs: Vec<Aabb> = parts.iter().map(|part| part.world_aabb()).collect();
        Self::from_aabbs(strategy, &aabbs)
    }

    /// Builds a BVH whose leaf `i` has the bounds `aabbs[i]`.
    pub fn from_aabbs(strategy: BvhBuildStrategy, aabbs: &[Aabb]) -> Self {
        assert!(
            aabbs.len() < u32::MAX as usize / 2,
            "Too many parts for a single BVH."
        );

        let mut leaves: Vec<u32> = (0..aabbs.len() as u32).collect();
        let mut next_id = 0;
        let root = if leaves.is_empty() {
            None
        } else {
            Some(build_subtree(strategy, aabbs, &mut leaves, &mut next_id))
        };

        log::debug!(
            "Built a BVH with {} leaves and {} nodes ({:?}).",
            aabbs.len(),
            next_id,
            strategy
        );

        Bvh {
            root,
            leaf_count: aabbs.len() as u32,
            node_count: next_id,
        }
    }
}

/// Recursively builds the subtree containing all the `leaves`, which must not be empty.
fn build_subtree(
    strategy: BvhBuildStrategy,
    aabbs: &[Aabb],
    leaves: &mut [u32],
    next_id: &mut u32,
) -> BvhNode {
    let id = NodeId(*next_id);
    *next_id += 1;

    if let [part] = *leaves {
        return BvhNode::Leaf {
            id,
            aabb: aabbs[part as usize],
            part,
        };
    }

    if strategy == BvhBuildStrategy::SpatialMedian {
        sort_along_longest_axis(aabbs, leaves);
    }

    // NOTE: `leaves.len() >= 2` so both halves are non-empty.
    let mid = leaves.len() / 2;
    let (left_leaves, right_leaves) = leaves.split_at_mut(mid);
    let left = build_subtree(strategy, aabbs, left_leaves, next_id);
    let right = build_subtree(strategy, aabbs, right_leaves, next_id);

    BvhNode::Internal {
        id,
        aabb: left.aabb().merged(right.aabb()),
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn sort_along_longest_axis(aabbs: &[Aabb], leaves: &mut [u32]) {
    let centroid_aabb = Aabb::from_points(leaves.iter().map(|i| aabbs[*i as usize].center()));
    let axis = centroid_aabb.extents().imax();
    // Stable sort: ties keep the input order.
    leaves.sort_by_key(|i| OrderedFloat(aabbs[*i as usize].center()[axis]));
}
