//! Ray-casting related definitions and implementations.

#[doc(inline)]
pub use self::ray::{ExactCollider, Ray, RayIntersection};
pub use self::ray_ball::{ray_intersection_with_ball, ray_toi_with_ball};

#[doc(hidden)]
pub mod ray;
mod ray_aabb;
mod ray_ball;
