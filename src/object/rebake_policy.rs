use crate::bounding_volume::Aabb;
use crate::math::Real;

/// Controls when the exact colliders of the parts of a [`DeformableObject`] are rebaked.
///
/// Rebaking (e.g., turning the current pose of a skinned mesh into a static triangle mesh) is
/// expensive, so it is throttled in time and only applied to parts that moved noticeably since
/// their last bake.
///
/// [`DeformableObject`]: crate::object::DeformableObject
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct RebakePolicy {
    /// If `false`, colliders are only baked once, when the object is created.
    pub runtime_bake: bool,
    /// Minimum time, in seconds, between two checks for parts needing a rebake.
    pub bake_interval: Real,
    /// A part is rebaked when the center or the size of its bounds moved by more than this
    /// distance since its last bake.
    pub bounds_change_threshold: Real,
}

impl Default for RebakePolicy {
    fn default() -> Self {
        Self {
            runtime_bake: true,
            bake_interval: 0.05,
            bounds_change_threshold: 0.001,
        }
    }
}

impl RebakePolicy {
    /// A policy that never rebakes after the initial bake.
    pub fn bake_once() -> Self {
        Self {
            runtime_bake: false,
            ..Self::default()
        }
    }

    /// Did a part move enough between its last bake (`baked`) and now (`current`) to need
    /// a rebake?
    pub fn needs_rebake(&self, baked: &Aabb, current: &Aabb) -> bool {
        na::distance(&baked.center(), &current.center()) > self.bounds_change_threshold
            || (current.extents() - baked.extents()).norm() > self.bounds_change_threshold
    }
}
