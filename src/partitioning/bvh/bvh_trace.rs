//! Diagnostic records of a ray traversal.

use super::bvh_traverse::TraversalObserver;
use super::{Bvh, BvhNode, NodeId};
use crate::math::Real;
use smallvec::SmallVec;

/// The nodes a traced ray cast went through.
///
/// All three collections are append-only and ordered by time of insertion. A trace belongs
/// to a single query: allocate a new one (or [`clear`](Self::clear) an old one) for every
/// query, and don't share it between queries running concurrently.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct TraceRecord {
    /// Every node whose bounding test was attempted.
    pub visited: Vec<NodeId>,
    /// Every node whose bounding test succeeded.
    pub passed: Vec<NodeId>,
    /// Every leaf whose exact test succeeded.
    pub hit_leaves: Vec<NodeId>,
}

impl TraceRecord {
    /// An empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empties all the collections, keeping their allocations.
    pub fn clear(&mut self) {
        self.visited.clear();
        self.passed.clear();
        self.hit_leaves.clear();
    }

    /// Did the traversal visit no node at all?
    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }
}

impl TraversalObserver for TraceRecord {
    #[inline]
    fn visit(&mut self, node: NodeId) {
        self.visited.push(node);
    }

    #[inline]
    fn aabb_passed(&mut self, node: NodeId) {
        self.passed.push(node);
    }

    #[inline]
    fn leaf_hit(&mut self, node: NodeId) {
        self.hit_leaves.push(node);
    }
}

/// Receives the trace of the winning object of a traced query, for display.
///
/// This is a purely diagnostic consumer: nothing it does feeds back into the queries.
pub trait TraceSink {
    /// Shows `trace`, recorded on `bvh`, for `display_duration` seconds.
    ///
    /// `hit_leaf` is the leaf that produced the closest hit of the query.
    fn show_trace(
        &mut self,
        bvh: &Bvh,
        trace: &TraceRecord,
        hit_leaf: NodeId,
        display_duration: Real,
    );
}

impl TraceSink for () {
    #[inline]
    fn show_trace(&mut self, _: &Bvh, _: &TraceRecord, _: NodeId, _: Real) {}
}

bitflags::bitflags! {
    /// What happened to a node during a traced traversal.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
    pub struct NodeTraceFlags: u8 {
        /// The bounding test of the node was attempted.
        const VISITED = 1;
        /// The bounding test of the node succeeded.
        const PASSED = 1 << 1;
        /// The node is a leaf whose exact test succeeded.
        const HIT_LEAF = 1 << 2;
        /// The node is on the path from the root to the leaf of the closest hit.
        const ON_PATH = 1 << 3;
    }
}

/// The single most relevant thing that happened to a node during a traced traversal.
///
/// Variants are sorted by decreasing priority: a node on the path is reported as
/// [`NodeTraceCategory::Path`] even though it was also visited and passed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeTraceCategory {
    /// On the path from the root to the leaf of the closest hit.
    Path,
    /// A leaf whose exact test succeeded.
    HitLeaf,
    /// The bounding test succeeded.
    Passed,
    /// The bounding test failed.
    Visited,
    /// The traversal never reached this node.
    Untouched,
}

impl From<NodeTraceFlags> for NodeTraceCategory {
    fn from(flags: NodeTraceFlags) -> Self {
        if flags.contains(NodeTraceFlags::ON_PATH) {
            NodeTraceCategory::Path
        } else if flags.contains(NodeTraceFlags::HIT_LEAF) {
            NodeTraceCategory::HitLeaf
        } else if flags.contains(NodeTraceFlags::PASSED) {
            NodeTraceCategory::Passed
        } else if flags.contains(NodeTraceFlags::VISITED) {
            NodeTraceCategory::Visited
        } else {
            NodeTraceCategory::Untouched
        }
    }
}

/// A trace resolved against the tree it was recorded on, ready to be displayed.
///
/// Building a view:
/// - enumerates every node of the tree breadth-first and derives the parent links;
/// - drops the trace entries that aren't nodes of the tree (e.g., a trace recorded before a
///   rebuild), as well as `hit_leaves` entries that aren't leaves, and removes duplicates while
///   keeping the first occurrence;
/// - reconstructs the path from the root to the leaf that produced the closest hit.
#[derive(Clone, Debug)]
pub struct TraceView<'a> {
    bvh: &'a Bvh,
    flags: Vec<NodeTraceFlags>,
    levels: Vec<Vec<NodeId>>,
    visited: Vec<NodeId>,
    passed: Vec<NodeId>,
    hit_leaves: Vec<NodeId>,
    path: SmallVec<[NodeId; 32]>,
}

impl<'a> TraceView<'a> {
    /// Resolves `trace` against `bvh`.
    ///
    /// `hit_leaf` is the leaf of the closest hit, e.g., [`BvhRayHit::node`]. Both subtrees of
    /// every node are explored so `trace.hit_leaves` usually contains more than one leaf, and the
    /// closest one isn't necessarily the first. If `hit_leaf` is `None`, or isn't one of the
    /// recorded hit leaves, the path leads to the first recorded hit leaf instead.
    ///
    /// [`BvhRayHit::node`]: super::BvhRayHit::node
    pub fn new(bvh: &'a Bvh, trace: &TraceRecord, hit_leaf: Option<NodeId>) -> Self {
        let node_count = bvh.node_count() as usize;
        let mut flags = vec![NodeTraceFlags::empty(); node_count];
        let mut levels: Vec<Vec<NodeId>> = Vec::new();
        let mut is_leaf = vec![false; node_count];

        for (node, depth) in bvh.breadth_first() {
            if levels.len() <= depth as usize {
                levels.push(Vec::new());
            }
            levels[depth as usize].push(node.id());
            is_leaf[node.id().index()] = node.is_leaf();
        }

        let mut filter = |ids: &[NodeId], flag: NodeTraceFlags, leaves_only: bool| {
            let mut result = Vec::with_capacity(ids.len());
            for id in ids {
                let Some(node_flags) = flags.get_mut(id.index()) else {
                    continue;
                };
                if (leaves_only && !is_leaf[id.index()]) || node_flags.contains(flag) {
                    continue;
                }
                node_flags.insert(flag);
                result.push(*id);
            }
            result
        };

        let visited = filter(&trace.visited, NodeTraceFlags::VISITED, false);
        let passed = filter(&trace.passed, NodeTraceFlags::PASSED, false);
        let hit_leaves = filter(&trace.hit_leaves, NodeTraceFlags::HIT_LEAF, true);

        let path_end = hit_leaf
            .filter(|id| hit_leaves.contains(id))
            .or_else(|| hit_leaves.first().copied());

        let mut path = SmallVec::new();
        if let Some(path_end) = path_end {
            let parents = bvh.parents();
            let mut curr = Some(path_end);
            while let Some(id) = curr {
                path.push(id);
                flags[id.index()].insert(NodeTraceFlags::ON_PATH);
                curr = parents[id.index()];
            }
            path.reverse();
        }

        Self {
            bvh,
            flags,
            levels,
            visited,
            passed,
            hit_leaves,
            path,
        }
    }

    /// The tree this view was built for.
    pub fn bvh(&self) -> &'a Bvh {
        self.bvh
    }

    /// The deduplicated visited nodes, in traversal order.
    pub fn visited(&self) -> &[NodeId] {
        &self.visited
    }

    /// The deduplicated nodes that passed their bounding test, in traversal order.
    pub fn passed(&self) -> &[NodeId] {
        &self.passed
    }

    /// The deduplicated leaves that were hit, in traversal order.
    pub fn hit_leaves(&self) -> &[NodeId] {
        &self.hit_leaves
    }

    /// The chain of nodes from the root to the leaf of the closest hit.
    ///
    /// Empty if no leaf was hit.
    pub fn path(&self) -> &[NodeId] {
        &self.path
    }

    /// The node ids grouped by depth, each level ordered from left to right.
    pub fn levels(&self) -> &[Vec<NodeId>] {
        &self.levels
    }

    /// Everything that happened to the node `id`.
    ///
    /// Returns empty flags for ids that aren't part of the tree.
    pub fn flags(&self, id: NodeId) -> NodeTraceFlags {
        self.flags.get(id.index()).copied().unwrap_or_default()
    }

    /// The most relevant thing that happened to the node `id`.
    pub fn category(&self, id: NodeId) -> NodeTraceCategory {
        self.flags(id).into()
    }

    /// Iterates through every node of the tree, breadth-first, with its category.
    pub fn nodes(&self) -> impl Iterator<Item = (&'a BvhNode, NodeTraceCategory)> + '_ {
        self.bvh
            .breadth_first()
            .map(move |(node, _)| (node, self.category(node.id())))
    }
}
