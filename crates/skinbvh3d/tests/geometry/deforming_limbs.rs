// A skinned character whose limbs swing every step. The colliders are only rebaked from time
// to time so they lag behind the bounds, like baked skinned meshes do.

use skinbvh3d::bounding_volume::Aabb;
use skinbvh3d::math::{Isometry, Point, Real, Vector};
use skinbvh3d::object::{DeformableObject, RebakePolicy};
use skinbvh3d::partitioning::BvhBuildStrategy;
use skinbvh3d::query::{cast_ray_on_parts, QueryStats, Ray};
use skinbvh3d::shape::{BoxCollider, DeformablePart};

struct Limb {
    rest_points: Vec<Point<Real>>,
    pose: Isometry<Real>,
    baked: [BoxCollider; 1],
    bake_count: u32,
}

impl Limb {
    fn new(rng: &mut oorandom::Rand32, anchor: Point<Real>) -> Self {
        let mut rest_points = vec![
            anchor + Vector::new(-0.5, 0.0, -0.5),
            anchor + Vector::new(0.5, 2.0, 0.5),
        ];
        rest_points.extend((0..6).map(|_| {
            anchor
                + Vector::new(
                    rng.rand_float() - 0.5,
                    rng.rand_float() * 2.0,
                    rng.rand_float() - 0.5,
                )
        }));

        Self {
            rest_points,
            pose: Isometry::identity(),
            baked: [BoxCollider::new(Aabb::new_invalid())],
            bake_count: 0,
        }
    }
}

impl DeformablePart for Limb {
    type Collider = BoxCollider;

    fn world_aabb(&self) -> Aabb {
        Aabb::from_points(self.rest_points.iter().map(|pt| self.pose * *pt))
    }

    fn colliders(&self) -> &[BoxCollider] {
        &self.baked
    }

    fn rebake_collider(&mut self) {
        self.baked[0] = BoxCollider::new(self.world_aabb());
        self.bake_count += 1;
    }
}

fn character(
    rng: &mut oorandom::Rand32,
    policy: RebakePolicy,
    strategy: BvhBuildStrategy,
) -> DeformableObject<Limb> {
    let limbs = (0..24)
        .map(|i| Limb::new(rng, Point::new((i % 6) as Real, (i / 6) as Real * 2.0, 0.0)))
        .collect();
    DeformableObject::with_policy(limbs, policy, strategy)
}

fn animate(object: &mut DeformableObject<Limb>, time: Real) {
    for (i, limb) in object.parts_mut().iter_mut().enumerate() {
        let phase = time * 3.0 + i as Real;
        limb.pose = Isometry::new(
            Vector::new(phase.sin() * 0.3, 0.0, phase.cos() * 0.5),
            Vector::z() * (phase.sin() * 0.2),
        );
    }
}

#[test]
fn swinging_limbs_match_brute_force_every_step() {
    let mut rng = oorandom::Rand32::new(7);
    let dt = 1.0 / 60.0;

    // Rebake on every change so the colliders never lag behind the bounds.
    let policy = RebakePolicy {
        runtime_bake: true,
        bake_interval: 0.0,
        bounds_change_threshold: 0.0,
    };

    for strategy in [BvhBuildStrategy::MidpointIndex, BvhBuildStrategy::SpatialMedian] {
        let mut object = character(&mut rng, policy, strategy);

        for step in 0..120 {
            animate(&mut object, step as Real * dt);
            let _ = object.step(dt);
            object.bvh().assert_well_formed(object.parts());

            for _ in 0..10 {
                let origin = Point::new(
                    rng.rand_float() * 6.0 - 0.5,
                    rng.rand_float() * 8.0,
                    -10.0,
                );
                let ray = Ray::new(origin, Vector::new(0.0, 0.0, 1.0));

                let mut stats = QueryStats::default();
                let expected = cast_ray_on_parts(object.parts(), &ray, 200.0, &mut stats);
                let found = object.cast_ray(&ray, 200.0);
                assert_eq!(
                    expected.map(|(part, hit)| (part, hit.time_of_impact)),
                    found.map(|hit| (hit.part, hit.time_of_impact()))
                );
            }
        }
    }
}

#[test]
fn rebakes_follow_the_interval() {
    let mut rng = oorandom::Rand32::new(3);
    let mut object = character(&mut rng, RebakePolicy::default(), BvhBuildStrategy::default());
    let dt = 1.0 / 60.0;

    let mut total = 0;
    for step in 0..60 {
        animate(&mut object, step as Real * dt);
        total += object.step(dt);
    }

    // One second at 60Hz with a 0.05s interval: about 20 checks, and every limb moves.
    let per_limb: Vec<_> = object.parts().iter().map(|limb| limb.bake_count).collect();
    assert!(per_limb.iter().all(|count| *count >= 15 && *count <= 22));
    assert_eq!(
        total,
        per_limb.iter().map(|count| *count as usize - 1).sum::<usize>()
    );
}

#[test]
fn stale_bake_is_what_the_ray_hits() {
    let mut rng = oorandom::Rand32::new(11);
    let limbs = vec![Limb::new(&mut rng, Point::origin())];
    let mut object = DeformableObject::with_policy(
        limbs,
        RebakePolicy::bake_once(),
        BvhBuildStrategy::default(),
    );

    // Move the limb far away: the bounds follow but the collider stays where it was baked.
    object.parts_mut()[0].pose = Isometry::translation(100.0, 0.0, 0.0);
    assert_eq!(object.step(1.0), 0);

    let at_bake = Ray::new(Point::new(0.0, 1.0, -10.0), Vector::z());
    let at_bounds = Ray::new(Point::new(100.0, 1.0, -10.0), Vector::z());
    assert!(object.cast_ray(&at_bake, 200.0).is_none());
    assert!(object.cast_ray(&at_bounds, 200.0).is_none());

    object.parts_mut()[0].rebake_collider();
    assert!(object.cast_ray(&at_bounds, 200.0).is_some());
}
