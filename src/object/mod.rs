//! Deformable objects: parts, their hierarchy, and the per-step maintenance of both.

pub use self::deformable_object::DeformableObject;
pub use self::rebake_policy::RebakePolicy;

mod deformable_object;
mod rebake_policy;
