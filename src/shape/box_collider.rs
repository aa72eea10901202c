use crate::bounding_volume::Aabb;
use crate::math::Real;
use crate::query::{ExactCollider, Ray, RayIntersection};

/// A solid axis-aligned box placed in world-space.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct BoxCollider {
    /// The box geometry.
    pub aabb: Aabb,
    /// Disabled colliders are never hit.
    pub enabled: bool,
}

impl BoxCollider {
    /// Creates a new enabled box collider.
    #[inline]
    pub fn new(aabb: Aabb) -> BoxCollider {
        BoxCollider {
            aabb,
            enabled: true,
        }
    }
}

impl From<Aabb> for BoxCollider {
    fn from(aabb: Aabb) -> Self {
        Self::new(aabb)
    }
}

impl ExactCollider for BoxCollider {
    #[inline]
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    fn aabb(&self) -> Aabb {
        self.aabb
    }

    #[inline]
    fn cast_ray(&self, ray: &Ray, max_time_of_impact: Real) -> Option<RayIntersection> {
        self.aabb
            .cast_ray_and_get_normal(ray, max_time_of_impact)
            .map(|(toi, normal)| RayIntersection::at(ray, toi, normal))
    }
}
