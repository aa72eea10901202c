use skinbvh3d::bounding_volume::Aabb;
use skinbvh3d::math::{Point, Real, Vector};
use skinbvh3d::object::DeformableObject;
use skinbvh3d::partitioning::{NodeTraceCategory, TraceView};
use skinbvh3d::query::{
    find_closest_hit, find_closest_hit_with_stats, QueryStats, Ray, TraversalMode,
};
use skinbvh3d::shape::{BallCollider, BoxCollider, ColliderPart};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Entity(u32);

/// A column of balls whose front is at distance `front` from the origin, along `+z`.
fn column(front: Real) -> DeformableObject<ColliderPart<BallCollider>> {
    let parts = (-3..=3)
        .map(|j| {
            ColliderPart::single(BallCollider::new(
                Point::new(0.0, j as Real * 2.0, front + 1.0),
                1.0,
            ))
        })
        .collect();
    DeformableObject::new(parts)
}

fn shot() -> Ray {
    Ray::new(Point::origin(), Vector::z())
}

#[test]
fn closest_of_three_objects_with_its_trace() {
    let objects = [column(5.0), column(2.0), column(8.0)];
    let keyed: Vec<_> = objects
        .iter()
        .enumerate()
        .map(|(i, object)| (Entity(i as u32), object))
        .collect();

    let hit = find_closest_hit(&shot(), &keyed, 200.0, TraversalMode::Traced)
        .unwrap()
        .unwrap();
    assert_eq!(hit.target, Entity(1));
    approx::assert_relative_eq!(hit.time_of_impact(), 2.0, epsilon = 1.0e-5);
    approx::assert_relative_eq!(hit.point(), Point::new(0.0, 0.0, 2.0), epsilon = 1.0e-5);
    approx::assert_relative_eq!(hit.intersection.normal, -Vector::z(), epsilon = 1.0e-5);

    // The trace resolves against the winner’s tree and leads to the hit leaf.
    let winner = &objects[1];
    let trace = hit.trace.as_ref().unwrap();
    let view = TraceView::new(winner.bvh(), trace, Some(hit.node));
    assert_eq!(view.path().first(), Some(&winner.bvh().root().unwrap().id()));
    assert_eq!(view.path().last(), Some(&hit.node));
    assert_eq!(view.category(hit.node), NodeTraceCategory::Path);
    assert_eq!(
        winner.bvh().find_node(hit.node).and_then(|node| node.part()),
        Some(hit.part)
    );
}

#[test]
fn fast_and_traced_agree() {
    let mut rng = oorandom::Rand32::new(1234);
    let objects: Vec<_> = (0..8)
        .map(|_| column(rng.rand_float() * 50.0))
        .collect();
    let keyed: Vec<_> = objects.iter().enumerate().collect();

    for _ in 0..100 {
        let origin = Point::new(
            rng.rand_float() * 2.0 - 1.0,
            rng.rand_float() * 14.0 - 7.0,
            -5.0,
        );
        let ray = Ray::new(origin, Vector::new(0.0, rng.rand_float() * 0.1, 1.0).normalize());
        let max_distance = rng.rand_float() * 60.0;

        let mut fast_stats = QueryStats::default();
        let mut traced_stats = QueryStats::default();
        let fast = find_closest_hit_with_stats(
            &ray,
            &keyed,
            max_distance,
            TraversalMode::Fast,
            &mut fast_stats,
        )
        .unwrap();
        let traced = find_closest_hit_with_stats(
            &ray,
            &keyed,
            max_distance,
            TraversalMode::Traced,
            &mut traced_stats,
        )
        .unwrap();

        assert_eq!(fast_stats, traced_stats);
        assert_eq!(fast_stats.root_tests, 8);
        assert_eq!(fast.is_some(), traced.is_some());

        if let (Some(fast), Some(traced)) = (fast, traced) {
            assert_eq!(fast.target, traced.target);
            assert_eq!(fast.intersection, traced.intersection);
            assert!(fast.time_of_impact() <= max_distance);
            assert!(traced.trace.is_some());
        }
    }
}

#[test]
fn max_distance_rejects_hits_beyond_it() {
    // The first object's bounds start closer to the shooter than the second object, but its only
    // enabled collider is far behind.
    let decoy = DeformableObject::new(vec![ColliderPart::new(vec![
        BallCollider {
            enabled: false,
            ..BallCollider::new(Point::new(0.0, 0.0, 2.0), 1.0)
        },
        BallCollider::new(Point::new(0.0, 0.0, 13.0), 1.0),
    ])]);
    let target = column(8.0);
    let empty = DeformableObject::<ColliderPart<BallCollider>>::new(vec![]);
    let objects = [("decoy", &decoy), ("empty", &empty), ("target", &target)];

    let hit = find_closest_hit(&shot(), &objects, 10.0, TraversalMode::Fast)
        .unwrap()
        .unwrap();
    assert_eq!(hit.target, "target");

    let decoy_only = [("decoy", &decoy)];
    assert!(find_closest_hit(&shot(), &decoy_only, 10.0, TraversalMode::Fast)
        .unwrap()
        .is_none());
    let hit = find_closest_hit(&shot(), &decoy_only, 12.0, TraversalMode::Fast)
        .unwrap()
        .unwrap();
    approx::assert_relative_eq!(hit.time_of_impact(), 12.0, epsilon = 1.0e-5);

    assert!(find_closest_hit(&shot(), &objects, 7.5, TraversalMode::Traced)
        .unwrap()
        .is_none());
}

#[test]
fn box_and_ball_objects_share_a_query() {
    // Objects of different part types are queried separately and the closest result kept.
    let boxes = DeformableObject::new(vec![ColliderPart::single(BoxCollider::new(Aabb::new(
        Point::new(-1.0, -1.0, 4.0),
        Point::new(1.0, 1.0, 5.0),
    )))]);
    let balls = column(6.0);

    let box_hit = find_closest_hit(&shot(), &[(0, &boxes)], 200.0, TraversalMode::Fast)
        .unwrap()
        .unwrap();
    let ball_hit = find_closest_hit(&shot(), &[(1, &balls)], 200.0, TraversalMode::Fast)
        .unwrap()
        .unwrap();
    assert_eq!(box_hit.time_of_impact(), 4.0);
    assert!(box_hit.time_of_impact() < ball_hit.time_of_impact());
}
