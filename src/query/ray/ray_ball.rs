use na::ComplexField;

use crate::math::{Point, Real, Vector};
use crate::query::{Ray, RayIntersection};
use num::Zero;

/// Computes the time of impact of a ray on a solid ball.
///
/// The first result element is `true` if the ray started inside of the ball, in which case
/// the time of impact is zero.
#[inline]
pub fn ray_toi_with_ball(center: &Point<Real>, radius: Real, ray: &Ray) -> (bool, Option<Real>) {
    let dcenter = ray.origin - *center;

    let a = ray.dir.norm_squared();
    let b = dcenter.dot(&ray.dir);
    let c = dcenter.norm_squared() - radius * radius;

    // Special case for when the dir is zero.
    if a.is_zero() {
        if c > 0.0 {
            return (false, None);
        } else {
            return (true, Some(0.0));
        }
    }

    if c > 0.0 && b > 0.0 {
        (false, None)
    } else {
        let delta = b * b - a * c;

        if delta < 0.0 {
            // no solution
            (false, None)
        } else {
            let t = (-b - ComplexField::sqrt(delta)) / a;

            if t <= 0.0 {
                // origin inside of the ball
                (true, Some(0.0))
            } else {
                (false, Some(t))
            }
        }
    }
}

/// Computes the intersection of a ray with a solid ball, including the hit point and normal.
#[inline]
pub fn ray_intersection_with_ball(
    center: &Point<Real>,
    radius: Real,
    ray: &Ray,
) -> Option<RayIntersection> {
    let (inside, toi) = ray_toi_with_ball(center, radius, ray);

    toi.map(|toi| {
        let point = ray.point_at(toi);
        let normal = if inside {
            Vector::zeros()
        } else {
            (point - *center)
                .try_normalize(crate::math::DEFAULT_EPSILON)
                .unwrap_or_else(Vector::zeros)
        };

        RayIntersection::new(toi, point, normal)
    })
}

#[cfg(test)]
mod test {
    use super::ray_intersection_with_ball;
    use crate::math::{Point, Vector};
    use crate::query::Ray;

    #[test]
    fn ray_ball_hit_point_and_normal() {
        let center = Point::new(5.0, 0.0, 0.0);
        let ray = Ray::new(Point::origin(), Vector::x());
        let hit = ray_intersection_with_ball(&center, 1.0, &ray).unwrap();
        assert_eq!(hit.time_of_impact, 4.0);
        assert_eq!(hit.point, Point::new(4.0, 0.0, 0.0));
        assert_eq!(hit.normal, -Vector::x());
    }

    #[test]
    fn ray_ball_miss() {
        let center = Point::new(5.0, 3.0, 0.0);
        let ray = Ray::new(Point::origin(), Vector::x());
        assert!(ray_intersection_with_ball(&center, 1.0, &ray).is_none());
    }
}
