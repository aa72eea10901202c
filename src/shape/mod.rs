//! Exact colliders and deformable parts.
//!
//! The hierarchy only ever talks to the two traits exported here:
//! [`DeformablePart`] for the current bounds of a part, and
//! [`ExactCollider`](crate::query::ExactCollider) for the precise ray test of its geometry.
//! The concrete types are small, ready-made implementations of those traits.

pub use self::ball_collider::BallCollider;
pub use self::box_collider::BoxCollider;
pub use self::collider_part::ColliderPart;
pub use self::deformable_part::DeformablePart;

mod ball_collider;
mod box_collider;
mod collider_part;
mod deformable_part;
