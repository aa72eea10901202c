use crate::partitioning::{NodeId, TraversalObserver};

/// Counters of the work performed by ray queries.
///
/// These are the numbers a benchmark harness needs to compare hierarchy queries with brute
/// force without re-implementing the traversal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct QueryStats {
    /// The number of non-empty hierarchies whose root was tested.
    pub root_tests: u32,
    /// The number of bounding tests performed.
    pub aabb_tests: u32,
    /// The number of exact collider tests performed.
    pub collider_tests: u32,
}

impl QueryStats {
    /// Resets all the counters to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl TraversalObserver for QueryStats {
    #[inline]
    fn visit(&mut self, _: NodeId) {
        self.aabb_tests += 1;
    }

    #[inline]
    fn collider_tested(&mut self, _: u32) {
        self.collider_tests += 1;
    }
}
