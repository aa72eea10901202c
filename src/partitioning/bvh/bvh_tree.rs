use crate::bounding_volume::Aabb;
use alloc::collections::VecDeque;
use core::fmt;

/// The strategy for the one-time build of the tree.
///
/// Both strategies split the list of parts in two halves of equal size (the left half gets
/// the smaller half when the count is odd) and recurse. They only differ by the order of the
/// list being split.
#[derive(Default, Clone, Debug, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum BvhBuildStrategy {
    /// The parts are split at the midpoint of their index range, in the order they were given.
    ///
    /// No sorting happens: the tree shape only depends on the number of parts and two builds
    /// from the same list always produce the same tree and the same node ids. Pruning quality
    /// depends on the input order: parts that are close in the list should be close in space.
    #[default]
    MidpointIndex,
    /// Before each split, the parts are stably sorted by the position of their center along the
    /// longest axis of the bounds of all the centers.
    ///
    /// This produces tighter internal nodes for inputs that are not ordered spatially, at the
    /// cost of a sort per level.
    SpatialMedian,
}

/// Identifier of a node of a [`Bvh`].
///
/// Ids are assigned in depth-first pre-order during the build (the root is `NodeId(0)`, its
/// left subtree comes next, then its right subtree) and never change afterward since refitting
/// doesn't modify the topology of the tree.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct NodeId(pub u32);

impl NodeId {
    /// The id as an index, e.g., into the array returned by [`Bvh::parents`].
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node (internal or leaf) of a BVH.
///
/// Every node exclusively owns its children: the hierarchy is a tree, never a DAG. An internal
/// node always has exactly two children.
#[derive(Clone, Debug, PartialEq)]
pub enum BvhNode {
    /// A node with two children.
    Internal {
        /// The identifier of this node.
        id: NodeId,
        /// The merged bounds of both children.
        aabb: Aabb,
        /// The left child, built from the first half of the parts.
        left: Box<BvhNode>,
        /// The right child, built from the second half of the parts.
        right: Box<BvhNode>,
    },
    /// A node referencing one part of the object.
    Leaf {
        /// The identifier of this node.
        id: NodeId,
        /// The bounds of the part, as of the last build or refit.
        aabb: Aabb,
        /// The index of the part in the slice the tree was built from.
        part: u32,
    },
}

impl BvhNode {
    /// The identifier of this node.
    #[inline]
    pub fn id(&self) -> NodeId {
        match self {
            BvhNode::Internal { id, .. } | BvhNode::Leaf { id, .. } => *id,
        }
    }

    /// The bounding volume of this node.
    #[inline]
    pub fn aabb(&self) -> &Aabb {
        match self {
            BvhNode::Internal { aabb, .. } | BvhNode::Leaf { aabb, .. } => aabb,
        }
    }

    /// Is this node a leaf?
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, BvhNode::Leaf { .. })
    }

    /// The part referenced by this node, if it is a leaf.
    #[inline]
    pub fn part(&self) -> Option<u32> {
        match self {
            BvhNode::Leaf { part, .. } => Some(*part),
            BvhNode::Internal { .. } => None,
        }
    }

    /// The two children of this node, if it is an internal node.
    #[inline]
    pub fn children(&self) -> Option<(&BvhNode, &BvhNode)> {
        match self {
            BvhNode::Internal { left, right, .. } => Some((left, right)),
            BvhNode::Leaf { .. } => None,
        }
    }

    /// The number of leaves of the subtree rooted at this node.
    pub fn leaf_count(&self) -> u32 {
        match self {
            BvhNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
            BvhNode::Leaf { .. } => 1,
        }
    }

    /// The number of levels of the subtree rooted at this node (1 for a leaf).
    pub fn depth(&self) -> u32 {
        match self {
            BvhNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
            BvhNode::Leaf { .. } => 1,
        }
    }

    /// Finds the node with the given id in the subtree rooted at this node.
    pub fn find(&self, id: NodeId) -> Option<&BvhNode> {
        if self.id() == id {
            return Some(self);
        }

        match self {
            BvhNode::Internal { left, right, .. } => {
                // Pre-order ids: the right subtree starts after the whole left subtree.
                if id < right.id() {
                    left.find(id)
                } else {
                    right.find(id)
                }
            }
            BvhNode::Leaf { .. } => None,
        }
    }
}

/// A bounding volume hierarchy built over the parts of one deformable object.
///
/// The tree is built once from the list of parts (see [`Bvh::from_parts`]), then refitted every
/// simulation step with [`Bvh::refit`] so its bounds follow the deformation, and queried with
/// [`Bvh::cast_ray`] or [`Bvh::cast_ray_traced`].
///
/// A `Bvh` built from zero parts is empty: it is a valid state and never reports any hit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bvh {
    pub(super) root: Option<BvhNode>,
    pub(super) leaf_count: u32,
    pub(super) node_count: u32,
}

impl Bvh {
    /// An empty BVH.
    pub fn new() -> Self {
        Self::default()
    }

    /// The root of the tree, or `None` if the tree is empty.
    #[inline]
    pub fn root(&self) -> Option<&BvhNode> {
        self.root.as_ref()
    }

    /// The bounds of the whole tree, or `None` if it is empty.
    #[inline]
    pub fn root_aabb(&self) -> Option<Aabb> {
        self.root.as_ref().map(|root| *root.aabb())
    }

    /// Does this tree contain no leaf at all?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The number of leaves, i.e., the number of parts the tree was built from.
    #[inline]
    pub fn leaf_count(&self) -> u32 {
        self.leaf_count
    }

    /// The total number of nodes (internal nodes and leaves).
    ///
    /// Node ids range from `0` to `node_count() - 1`.
    #[inline]
    pub fn node_count(&self) -> u32 {
        self.node_count
    }

    /// The number of levels of this tree (0 if it is empty).
    pub fn depth(&self) -> u32 {
        self.root.as_ref().map(BvhNode::depth).unwrap_or(0)
    }

    /// Finds the node with the given id.
    pub fn find_node(&self, id: NodeId) -> Option<&BvhNode> {
        self.root.as_ref()?.find(id)
    }

    /// Iterates through all the nodes in breadth-first order, together with their depth.
    ///
    /// The root has depth 0.
    pub fn breadth_first(&self) -> BreadthFirst<'_> {
        let mut queue = VecDeque::new();
        if let Some(root) = &self.root {
            queue.push_back((root, 0));
        }
        BreadthFirst { queue }
    }

    /// Computes the parent of each node, indexed by [`NodeId::index`].
    ///
    /// The root has no parent.
    pub fn parents(&self) -> Vec<Option<NodeId>> {
        let mut parents = vec![None; self.node_count as usize];
        for (node, _) in self.breadth_first() {
            if let Some((left, right)) = node.children() {
                parents[left.id().index()] = Some(node.id());
                parents[right.id().index()] = Some(node.id());
            }
        }
        parents
    }
}

/// Breadth-first iterator over the nodes of a [`Bvh`].
pub struct BreadthFirst<'a> {
    queue: VecDeque<(&'a BvhNode, u32)>,
}

impl<'a> Iterator for BreadthFirst<'a> {
    type Item = (&'a BvhNode, u32);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.queue.pop_front()?;

        if let Some((left, right)) = node.children() {
            self.queue.push_back((left, depth + 1));
            self.queue.push_back((right, depth + 1));
        }

        Some((node, depth))
    }
}
