//! Traits and structure needed to cast rays.

use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector};
use crate::query::QueryError;

/// A ray for ray-casting queries.
///
/// A ray is a half-infinite line starting at an origin point and extending
/// infinitely in a direction. One ray is produced per shot and tested against
/// every live object.
///
/// The direction does not need to be normalized, but all distances reported by
/// this crate are expressed as multiples of `dir`: with a unit direction the
/// time-of-impact is a distance in world units, which is what the `max_distance`
/// filters of the query orchestrator assume.
///
/// # Example
///
/// ```rust
/// use skinbvh3d::query::Ray;
/// use nalgebra::{Point3, Vector3};
///
/// let ray = Ray::new(Point3::origin(), Vector3::new(1.0, 0.0, 0.0));
/// assert_eq!(ray.point_at(5.0), Point3::new(5.0, 0.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[repr(C)]
pub struct Ray {
    /// Starting point of the ray.
    pub origin: Point<Real>,
    /// Direction vector of the ray.
    pub dir: Vector<Real>,
}

impl Ray {
    /// Creates a new ray from an origin point and direction vector.
    pub fn new(origin: Point<Real>, dir: Vector<Real>) -> Ray {
        Ray { origin, dir }
    }

    /// Creates the ray starting at `origin` and pointing toward `target`.
    ///
    /// The direction is normalized. Returns `None` if both points are too close to each other.
    pub fn toward(origin: Point<Real>, target: Point<Real>) -> Option<Ray> {
        let dir = (target - origin).try_normalize(crate::math::DEFAULT_EPSILON)?;
        Some(Ray::new(origin, dir))
    }

    /// Computes a point along the ray at parameter `t`.
    #[inline]
    pub fn point_at(&self, t: Real) -> Point<Real> {
        self.origin + self.dir * t
    }

    /// Checks that this ray can be used for queries.
    ///
    /// The origin and direction must be finite and the direction must not be zero.
    pub fn validate(&self) -> Result<(), QueryError> {
        let finite = self.origin.iter().all(|e| e.is_finite())
            && self.dir.iter().all(|e| e.is_finite());

        if !finite || self.dir.norm_squared() <= crate::math::DEFAULT_EPSILON {
            Err(QueryError::InvalidRay)
        } else {
            Ok(())
        }
    }
}

/// Result of a successful ray cast against an exact collider.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct RayIntersection {
    /// The time of impact of the ray with the collider.
    ///
    /// The hit point is `ray.origin + ray.dir * time_of_impact`. With a normalized direction
    /// this is the distance along the ray.
    pub time_of_impact: Real,

    /// The hit point, in world-space.
    pub point: Point<Real>,

    /// The surface normal at the hit point.
    ///
    /// May be zero when the ray starts inside of the collider.
    pub normal: Vector<Real>,
}

impl RayIntersection {
    /// Creates a new `RayIntersection`.
    #[inline]
    pub fn new(time_of_impact: Real, point: Point<Real>, normal: Vector<Real>) -> RayIntersection {
        RayIntersection {
            time_of_impact,
            point,
            normal,
        }
    }

    /// Creates the intersection of `ray` at `time_of_impact`, computing the hit point.
    #[inline]
    pub fn at(ray: &Ray, time_of_impact: Real, normal: Vector<Real>) -> RayIntersection {
        Self::new(time_of_impact, ray.point_at(time_of_impact), normal)
    }
}

/// The exact (non-bounding-box) intersection test of one piece of real geometry.
///
/// This is the capability a leaf of the hierarchy delegates to. The hierarchy never inspects
/// the geometry itself: skinned meshes baked into triangle soups, analytic shapes, or anything
/// else can be plugged here.
pub trait ExactCollider {
    /// Is this collider currently active?
    ///
    /// Disabled colliders are skipped silently by every query.
    #[inline]
    fn is_enabled(&self) -> bool {
        true
    }

    /// The world-space bounds of this collider.
    fn aabb(&self) -> Aabb;

    /// Casts `ray` on this collider.
    ///
    /// Returns the first intersection with a time of impact in `[0, max_time_of_impact]`, if any.
    fn cast_ray(&self, ray: &Ray, max_time_of_impact: Real) -> Option<RayIntersection>;
}

impl<C: ExactCollider + ?Sized> ExactCollider for &C {
    #[inline]
    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }

    #[inline]
    fn aabb(&self) -> Aabb {
        (**self).aabb()
    }

    #[inline]
    fn cast_ray(&self, ray: &Ray, max_time_of_impact: Real) -> Option<RayIntersection> {
        (**self).cast_ray(ray, max_time_of_impact)
    }
}
