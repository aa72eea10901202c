/*!
skinbvh3d
=========

**skinbvh3d** is a small 3-dimensional library for casting rays against
deformable (skinned, animated) objects written with the rust programming
language.

Each object owns a binary bounding volume hierarchy built over its parts. The
hierarchy is refitted every simulation step to follow the deformation and is
queried with one ray at a time, either in a fast mode that only returns the
closest hit, or in a traced mode that also records which nodes were visited,
which passed their bounding test, and which leaves produced a hit.

*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::module_inception)]
#![allow(clippy::manual_range_contains)] // This usually makes it way more verbose that it could be.

extern crate alloc;

#[cfg(feature = "serde-serialize")]
#[macro_use]
extern crate serde;
extern crate num_traits as num;

pub extern crate nalgebra as na;

pub mod bounding_volume;
pub mod object;
pub mod partitioning;
pub mod query;
pub mod shape;

mod real {
    /// The scalar type used throughout this crate.
    pub use f32 as Real;
}

/// Aliases for the mathematical types used by this crate.
pub mod math {
    pub use super::real::*;
    pub use na::{Isometry3, Point3, Vector3};

    /// The default tolerance used for geometric operations.
    pub const DEFAULT_EPSILON: Real = Real::EPSILON;

    /// The dimension of the space.
    pub const DIM: usize = 3;

    /// The point type.
    pub use Point3 as Point;

    /// The vector type.
    pub use Vector3 as Vector;

    /// The transformation matrix type.
    pub use Isometry3 as Isometry;
}
