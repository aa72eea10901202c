use crate::math::Real;
use crate::partitioning::{keep_closest, TraversalObserver};
use crate::query::{ExactCollider, QueryStats, Ray, RayIntersection};
use crate::shape::DeformablePart;

/// Casts a ray on the exact colliders of a single part.
///
/// Disabled colliders are skipped. The enabled ones are tested in order and the first hit is
/// returned, even if a later collider of the same part would have been hit closer: a part is
/// expected to be a single piece of geometry in the common case.
///
/// `part_index` is only used to report the collider tests to `observer`.
pub fn cast_ray_on_part<P: DeformablePart, O: TraversalObserver + ?Sized>(
    part: &P,
    part_index: u32,
    ray: &Ray,
    max_time_of_impact: Real,
    observer: &mut O,
) -> Option<RayIntersection> {
    for collider in part.colliders() {
        if !collider.is_enabled() {
            continue;
        }

        observer.collider_tested(part_index);

        if let Some(hit) = collider.cast_ray(ray, max_time_of_impact) {
            return Some(hit);
        }
    }

    None
}

/// Casts a ray on every part without any acceleration structure.
///
/// Returns the index of the closest part hit together with the intersection. When two parts are
/// hit at the same distance, the one with the smallest index wins, which is also the one a
/// [`Bvh`](crate::partitioning::Bvh) built from `parts` returns.
pub fn cast_ray_on_parts<P: DeformablePart>(
    parts: &[P],
    ray: &Ray,
    max_time_of_impact: Real,
    stats: &mut QueryStats,
) -> Option<(u32, RayIntersection)> {
    let mut best = None;

    for (i, part) in parts.iter().enumerate() {
        let hit = cast_ray_on_part(part, i as u32, ray, max_time_of_impact, stats)
            .map(|hit| (i as u32, hit));
        best = keep_closest(best, hit, |(_, hit)| hit.time_of_impact);
    }

    best
}
