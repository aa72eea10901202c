use super::{Bvh, BvhNode};
use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::shape::DeformablePart;

impl Bvh {
    /// Updates the bounds of every node from the current bounds of the parts.
    ///
    /// This is a post-order pass: each leaf reads the current world-space bounds of its part
    /// (exactly once per leaf), then every internal node is set to the merge of its two children.
    /// The topology of the tree and the node ids are left untouched.
    ///
    /// This must be called once per simulation step, after the deformation of the step and
    /// before any ray query of that step. Queries against stale bounds don't crash but may miss
    /// parts that moved into the ray, or test parts that moved away from it.
    ///
    /// # Panics
    ///
    /// Panics if a leaf references a part that isn't in `parts`, i.e., if the parts the tree
    /// was built from were destroyed without rebuilding the tree.
    pub fn refit<P: DeformablePart>(&mut self, parts: &[P]) {
        if let Some(root) = &mut self.root {
            root.refit(parts);
        }
    }

    /// Updates the bounds of every node, reading the bounds of each leaf from `leaf_aabb`.
    ///
    /// The closure is given the part index of the leaf.
    pub fn refit_with(&mut self, mut leaf_aabb: impl FnMut(u32) -> Aabb) {
        if let Some(root) = &mut self.root {
            root.refit_with(&mut leaf_aabb);
        }
    }
}

impl BvhNode {
    /// Refits the subtree rooted at this node. See [`Bvh::refit`].
    pub fn refit<P: DeformablePart>(&mut self, parts: &[P]) {
        self.refit_with(&mut |part| super::part_at(parts, part).world_aabb());
    }

    /// Refits the subtree rooted at this node. See [`Bvh::refit_with`].
    pub fn refit_with(&mut self, leaf_aabb: &mut impl FnMut(u32) -> Aabb) {
        match self {
            BvhNode::Leaf { aabb, part, .. } => *aabb = leaf_aabb(*part),
            BvhNode::Internal {
                aabb, left, right, ..
            } => {
                left.refit_with(leaf_aabb);
                right.refit_with(leaf_aabb);
                *aabb = left.aabb().merged(right.aabb());
            }
        }
    }
}
