//! Ray queries against deformable objects.
//!
//! * [`Ray`] and the [`ExactCollider`] capability implemented by the geometry of each part.
//! * [`find_closest_hit`] to find the closest object hit by a ray among many objects, each
//!   accelerated by its own [`Bvh`](crate::partitioning::Bvh).
//! * [`ShotResolver`] to resolve one shot per frame, optionally benchmarking the hierarchies
//!   against brute force and forwarding the trace of the winning object to a visualizer.
//! * [`cast_ray_on_parts`] is the brute-force reference every hierarchy query must agree with.

pub use self::brute_force::{cast_ray_on_part, cast_ray_on_parts};
pub use self::closest_hit::{
    find_closest_hit, find_closest_hit_with_stats, ClosestHit, TraversalMode,
};
pub use self::error::QueryError;
pub use self::ray::{
    ray_intersection_with_ball, ray_toi_with_ball, ExactCollider, Ray, RayIntersection,
};
pub use self::shot::{
    BenchmarkSink, LogBenchmarkSink, ShotOptions, ShotOutcome, ShotReport, ShotResolver,
};
pub use self::stats::QueryStats;

pub(crate) use self::error::validate_max_distance;

mod brute_force;
mod closest_hit;
mod error;
mod ray;
mod shot;
mod stats;
