use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector};
use crate::query::{ray_intersection_with_ball, ExactCollider, Ray, RayIntersection};

/// A solid ball placed in world-space.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct BallCollider {
    /// The world-space center of the ball.
    pub center: Point<Real>,
    /// The radius of the ball.
    pub radius: Real,
    /// Disabled colliders are never hit.
    pub enabled: bool,
}

impl BallCollider {
    /// Creates a new enabled ball collider.
    #[inline]
    pub fn new(center: Point<Real>, radius: Real) -> BallCollider {
        BallCollider {
            center,
            radius,
            enabled: true,
        }
    }
}

impl ExactCollider for BallCollider {
    #[inline]
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    fn aabb(&self) -> Aabb {
        Aabb::from_half_extents(self.center, Vector::repeat(self.radius))
    }

    #[inline]
    fn cast_ray(&self, ray: &Ray, max_time_of_impact: Real) -> Option<RayIntersection> {
        ray_intersection_with_ball(&self.center, self.radius, ray)
            .filter(|hit| hit.time_of_impact <= max_time_of_impact)
    }
}
