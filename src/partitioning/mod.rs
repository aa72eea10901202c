//! Spatial partitioning tools.

#[doc(inline)]
pub use self::bvh::{
    Bvh, BvhBuildStrategy, BvhNode, BvhRayHit, NodeId, NodeTraceCategory, NodeTraceFlags,
    TraceRecord, TraceSink, TraceView, TraversalObserver,
};

pub mod bvh;

pub(crate) use self::bvh::keep_closest;
