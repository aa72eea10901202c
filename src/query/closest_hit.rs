use crate::math::{Point, Real};
use crate::object::DeformableObject;
use crate::partitioning::{NodeId, TraceRecord};
use crate::query::{validate_max_distance, QueryError, QueryStats, Ray, RayIntersection};
use crate::shape::DeformablePart;

/// How the hierarchy of each object is traversed by [`find_closest_hit`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum TraversalMode {
    /// Only find the closest hit.
    #[default]
    Fast,
    /// Also record the trace of the traversal of the winning object.
    Traced,
}

/// The closest hit of a ray among several objects.
#[derive(Clone, Debug, PartialEq)]
pub struct ClosestHit<K> {
    /// The key of the object that was hit.
    pub target: K,
    /// The index of the part of `target` that was hit.
    pub part: u32,
    /// The leaf of the hierarchy of `target` referencing that part.
    pub node: NodeId,
    /// The intersection with the exact collider of the part.
    pub intersection: RayIntersection,
    /// The trace of the traversal of the hierarchy of `target`.
    ///
    /// Only set with [`TraversalMode::Traced`]. The traces of the other objects are discarded.
    pub trace: Option<TraceRecord>,
}

impl<K> ClosestHit<K> {
    /// The distance along the ray (in multiples of its direction) of the hit.
    #[inline]
    pub fn time_of_impact(&self) -> Real {
        self.intersection.time_of_impact
    }

    /// The world-space hit point.
    #[inline]
    pub fn point(&self) -> Point<Real> {
        self.intersection.point
    }

    /// Replaces the key of the object hit.
    pub fn map_target<K2>(self, f: impl FnOnce(K) -> K2) -> ClosestHit<K2> {
        ClosestHit {
            target: f(self.target),
            part: self.part,
            node: self.node,
            intersection: self.intersection,
            trace: self.trace,
        }
    }
}

/// Finds the closest object hit by `ray`, within `max_distance`.
///
/// Each object is identified by a key `K` (e.g., an entity handle) that is copied into the
/// result. Objects without any part are skipped. A hit is only accepted if its time of impact
/// is at most `max_distance`, and when two objects are hit at the same distance the first one
/// in `objects` wins.
///
/// Not hitting anything is a normal outcome, reported as `Ok(None)`. An error is only returned
/// for malformed inputs: an invalid ray or a negative (or NaN) `max_distance`.
pub fn find_closest_hit<K: Clone, P: DeformablePart>(
    ray: &Ray,
    objects: &[(K, &DeformableObject<P>)],
    max_distance: Real,
    mode: TraversalMode,
) -> Result<Option<ClosestHit<K>>, QueryError> {
    find_closest_hit_with_stats(ray, objects, max_distance, mode, &mut QueryStats::default())
}

/// Same as [`find_closest_hit`], but also accumulates the work performed into `stats`.
///
/// `stats` is not reset: counters are added to its current values.
pub fn find_closest_hit_with_stats<K: Clone, P: DeformablePart>(
    ray: &Ray,
    objects: &[(K, &DeformableObject<P>)],
    max_distance: Real,
    mode: TraversalMode,
    stats: &mut QueryStats,
) -> Result<Option<ClosestHit<K>>, QueryError> {
    ray.validate()?;
    validate_max_distance(max_distance)?;

    let mut best: Option<ClosestHit<K>> = None;
    let mut trace = TraceRecord::new();

    for (key, object) in objects {
        if object.bvh().is_empty() {
            continue;
        }

        stats.root_tests += 1;

        let hit = match mode {
            TraversalMode::Fast => object.bvh().cast_ray_with_stats(
                object.parts(),
                ray,
                max_distance,
                stats,
            ),
            TraversalMode::Traced => {
                trace.clear();
                object.bvh().cast_ray_observed(
                    object.parts(),
                    ray,
                    max_distance,
                    &mut (&mut trace, &mut *stats),
                )
            }
        };

        let Some(hit) = hit else {
            continue;
        };

        if hit.time_of_impact() > max_distance {
            continue;
        }

        if best
            .as_ref()
            .is_some_and(|best| hit.time_of_impact() >= best.time_of_impact())
        {
            continue;
        }

        best = Some(ClosestHit {
            target: key.clone(),
            part: hit.part,
            node: hit.node,
            intersection: hit.intersection,
            trace: match mode {
                TraversalMode::Fast => None,
                TraversalMode::Traced => Some(core::mem::take(&mut trace)),
            },
        });
    }

    if let Some(best) = &best {
        log::trace!(
            "Closest hit at {} on part {} (node {}).",
            best.time_of_impact(),
            best.part,
            best.node
        );
    }

    Ok(best)
}

#[cfg(test)]
mod test {
    use super::{find_closest_hit, find_closest_hit_with_stats, TraversalMode};
    use crate::bounding_volume::Aabb;
    use crate::math::{Point, Real, Vector};
    use crate::object::DeformableObject;
    use crate::partitioning::NodeId;
    use crate::query::{QueryError, QueryStats, Ray};
    use crate::shape::{BoxCollider, ColliderPart};

    type Part = ColliderPart<BoxCollider>;

    /// An object made of a wall of boxes whose front faces are at `z = front`.
    fn wall(front: Real) -> DeformableObject<Part> {
        let parts = (-2..=2)
            .map(|i| {
                ColliderPart::single(BoxCollider::new(Aabb::new(
                    Point::new(i as Real - 0.5, -0.5, front),
                    Point::new(i as Real + 0.5, 0.5, front + 1.0),
                )))
            })
            .collect();
        DeformableObject::new(parts)
    }

    fn shot() -> Ray {
        Ray::new(Point::new(0.1, 0.1, 0.0), Vector::z())
    }

    #[test]
    fn closest_object_wins_with_its_trace_only() {
        let (a, b, c) = (wall(5.0), wall(2.0), wall(8.0));
        let objects = [("a", &a), ("b", &b), ("c", &c)];

        let hit = find_closest_hit(&shot(), &objects, 200.0, TraversalMode::Traced)
            .unwrap()
            .unwrap();
        assert_eq!(hit.target, "b");
        assert_eq!(hit.time_of_impact(), 2.0);
        assert_eq!(hit.point(), Point::new(0.1, 0.1, 2.0));

        let trace = hit.trace.unwrap();
        assert_eq!(trace.visited[0], NodeId(0));
        assert_eq!(trace.hit_leaves, vec![hit.node]);
        assert!(trace
            .visited
            .iter()
            .all(|id| b.bvh().find_node(*id).is_some()));

        let fast = find_closest_hit(&shot(), &objects, 200.0, TraversalMode::Fast)
            .unwrap()
            .unwrap();
        assert_eq!(fast.target, "b");
        assert!(fast.trace.is_none());
    }

    #[test]
    fn hits_beyond_max_distance_are_rejected() {
        let (near, far) = (wall(5.0), wall(8.0));
        let near_only = [(0, &near)];
        assert_eq!(
            find_closest_hit(&shot(), &near_only, 4.0, TraversalMode::Fast),
            Ok(None)
        );

        let both = [(0, &far), (1, &near)];
        let hit = find_closest_hit(&shot(), &both, 6.0, TraversalMode::Traced)
            .unwrap()
            .unwrap();
        assert_eq!(hit.target, 1);

        // The bound is inclusive.
        let hit = find_closest_hit(&shot(), &both, 5.0, TraversalMode::Fast)
            .unwrap()
            .unwrap();
        assert_eq!(hit.target, 1);
        assert_eq!(hit.time_of_impact(), 5.0);
    }

    #[test]
    fn equal_distances_keep_the_first_object() {
        let (a, b) = (wall(3.0), wall(3.0));
        let hit = find_closest_hit(&shot(), &[(1, &b), (0, &a)], 200.0, TraversalMode::Traced)
            .unwrap()
            .unwrap();
        assert_eq!(hit.target, 1);
    }

    #[test]
    fn empty_objects_are_skipped() {
        let empty = DeformableObject::<Part>::new(vec![]);
        let target = wall(3.0);
        let mut stats = QueryStats::default();

        let hit = find_closest_hit_with_stats(
            &shot(),
            &[(0, &empty), (1, &target)],
            200.0,
            TraversalMode::Fast,
            &mut stats,
        )
        .unwrap()
        .unwrap();
        assert_eq!(hit.target, 1);
        assert_eq!(stats.root_tests, 1);
        assert!(stats.aabb_tests > 0);
        assert_eq!(stats.collider_tests, 1);

        let only_empty = [(0, &empty)];
        assert_eq!(
            find_closest_hit(&shot(), &only_empty, 200.0, TraversalMode::Traced),
            Ok(None)
        );
    }

    #[test]
    fn malformed_inputs_are_errors() {
        let target = wall(3.0);
        let objects = [(0, &target)];

        assert_eq!(
            find_closest_hit(&shot(), &objects, -1.0, TraversalMode::Fast),
            Err(QueryError::NegativeMaxDistance(-1.0))
        );

        let degenerate = Ray::new(Point::origin(), Vector::zeros());
        assert_eq!(
            find_closest_hit(&degenerate, &objects, 1.0, TraversalMode::Fast),
            Err(QueryError::InvalidRay)
        );
    }
}
