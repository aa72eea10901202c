use core::mem;

use crate::bounding_volume::Aabb;
use crate::math::{Real, Vector, DIM};
use crate::query::Ray;
use num::Zero;

impl Aabb {
    /// Computes the time of impact of `ray` with this AABB, treated as a solid box.
    ///
    /// If the ray origin is inside of the box the time of impact is zero. Returns `None` if the
    /// ray misses the box or if the entry point is farther than `max_time_of_impact`.
    #[inline]
    pub fn cast_ray(&self, ray: &Ray, max_time_of_impact: Real) -> Option<Real> {
        self.cast_ray_and_get_normal(ray, max_time_of_impact)
            .map(|(toi, _)| toi)
    }

    /// Checks if `ray` hits this AABB before `max_time_of_impact`.
    ///
    /// This is the bounding test performed on every node visited by a hierarchy traversal.
    #[inline]
    pub fn intersects_ray(&self, ray: &Ray, max_time_of_impact: Real) -> bool {
        self.cast_ray(ray, max_time_of_impact).is_some()
    }

    /// Computes the time of impact and the outward normal of the face hit by `ray`.
    ///
    /// The normal is zero if the ray starts inside of the box.
    pub fn cast_ray_and_get_normal(
        &self,
        ray: &Ray,
        max_time_of_impact: Real,
    ) -> Option<(Real, Vector<Real>)> {
        let mut tmin: Real = 0.0;
        let mut tmax: Real = max_time_of_impact;
        let mut normal = Vector::zeros();

        for i in 0usize..DIM {
            if ray.dir[i].is_zero() {
                if ray.origin[i] < self.mins[i] || ray.origin[i] > self.maxs[i] {
                    return None;
                }
            } else {
                let denom = 1.0 / ray.dir[i];
                let mut near_sign = -1.0;
                let mut inter_with_near_halfspace = (self.mins[i] - ray.origin[i]) * denom;
                let mut inter_with_far_halfspace = (self.maxs[i] - ray.origin[i]) * denom;

                if inter_with_near_halfspace > inter_with_far_halfspace {
                    mem::swap(
                        &mut inter_with_near_halfspace,
                        &mut inter_with_far_halfspace,
                    );
                    near_sign = 1.0;
                }

                if inter_with_near_halfspace > tmin {
                    tmin = inter_with_near_halfspace;
                    normal = Vector::zeros();
                    normal[i] = near_sign;
                }
                tmax = tmax.min(inter_with_far_halfspace);

                if tmin > tmax {
                    // This covers the case where tmax is negative because tmin is
                    // initialized at zero.
                    return None;
                }
            }
        }

        Some((tmin, normal))
    }
}
