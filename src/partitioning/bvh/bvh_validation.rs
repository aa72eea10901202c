use super::{Bvh, BvhNode};
use crate::bounding_volume::BoundingVolume;
use crate::shape::DeformablePart;

impl Bvh {
    /// Panics if the tree isn’t well-formed with respect to `parts`.
    ///
    /// The tree is well-formed if:
    /// - it has exactly one leaf per part and every part is referenced by exactly one leaf;
    /// - node ids are the pre-order indices `0..node_count`;
    /// - every leaf has the current bounds of its part;
    /// - every internal node has exactly the merged bounds of its two children.
    ///
    /// This is mostly a utility for debugging and testing. Call it right after a build or a refit.
    pub fn assert_well_formed<P: DeformablePart>(&self, parts: &[P]) {
        assert_eq!(self.leaf_count as usize, parts.len(), "Wrong leaf count.");

        let Some(root) = &self.root else {
            assert_eq!(self.node_count, 0);
            return;
        };

        let mut seen_parts = vec![false; parts.len()];
        let mut next_id = 0;
        self.assert_well_formed_recurse(root, parts, &mut seen_parts, &mut next_id);
        assert_eq!(next_id, self.node_count, "Wrong node count.");
        assert!(seen_parts.iter().all(|seen| *seen));
    }

    fn assert_well_formed_recurse<P: DeformablePart>(
        &self,
        node: &BvhNode,
        parts: &[P],
        seen_parts: &mut [bool],
        next_id: &mut u32,
    ) {
        assert_eq!(node.id().0, *next_id, "Node ids must follow pre-order.");
        *next_id += 1;

        match node {
            BvhNode::Leaf { aabb, part, id } => {
                let part_id = *part as usize;
                assert!(part_id < parts.len(), "Leaf {} references a dead part.", id);
                assert!(!seen_parts[part_id], "Part {} referenced twice.", part);
                seen_parts[part_id] = true;
                assert_eq!(*aabb, parts[part_id].world_aabb(), "Stale leaf {}.", id);
            }
            BvhNode::Internal {
                aabb, left, right, ..
            } => {
                self.assert_well_formed_recurse(left, parts, seen_parts, next_id);
                self.assert_well_formed_recurse(right, parts, seen_parts, next_id);
                assert_eq!(
                    *aabb,
                    left.aabb().merged(right.aabb()),
                    "Internal node {} doesn't match its children.",
                    node.id()
                );
            }
        }
    }
}
