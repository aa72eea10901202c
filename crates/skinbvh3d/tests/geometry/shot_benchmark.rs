use skinbvh3d::math::{Point, Real, Vector};
use skinbvh3d::object::DeformableObject;
use skinbvh3d::partitioning::{
    Bvh, NodeId, NodeTraceCategory, TraceRecord, TraceSink, TraceView,
};
use skinbvh3d::query::{
    BenchmarkSink, LogBenchmarkSink, Ray, ShotOptions, ShotReport, ShotResolver,
};
use skinbvh3d::shape::{BallCollider, ColliderPart};

/// Counts the categories of the nodes of every trace it is shown.
#[derive(Default)]
struct Visualizer {
    shown: Vec<Vec<NodeTraceCategory>>,
    path_lengths: Vec<usize>,
    durations: Vec<Real>,
}

impl TraceSink for Visualizer {
    fn show_trace(
        &mut self,
        bvh: &Bvh,
        trace: &TraceRecord,
        hit_leaf: NodeId,
        display_duration: Real,
    ) {
        let view = TraceView::new(bvh, trace, Some(hit_leaf));
        assert_eq!(view.path().last(), Some(&hit_leaf));
        self.shown.push(view.nodes().map(|(_, category)| category).collect());
        self.path_lengths.push(view.path().len());
        self.durations.push(display_duration);
    }
}

#[derive(Default)]
struct Reports(Vec<ShotReport>);

impl BenchmarkSink for Reports {
    fn record(&mut self, report: &ShotReport) {
        self.0.push(*report);
    }
}

/// A crowd of creatures, each made of a grid of balls.
fn crowd(rows: usize) -> Vec<DeformableObject<ColliderPart<BallCollider>>> {
    (0..rows)
        .map(|row| {
            let parts = (0..64)
                .map(|i| {
                    ColliderPart::single(BallCollider::new(
                        Point::new((i % 8) as Real, (i / 8) as Real, 10.0 + row as Real * 5.0),
                        0.4,
                    ))
                })
                .collect();
            DeformableObject::new(parts)
        })
        .collect()
}

#[test]
fn hierarchy_does_less_work_than_brute_force() {
    let creatures = crowd(4);
    let keyed: Vec<_> = creatures.iter().enumerate().collect();
    let mut resolver =
        ShotResolver::with_sinks(ShotOptions::default(), Visualizer::default(), Reports::default());

    let ray = Ray::new(Point::new(3.0, 4.0, 0.0), Vector::z());
    let outcome = resolver.resolve(&ray, &keyed).unwrap();

    let hit = outcome.hit.unwrap();
    assert_eq!(hit.target, 0);
    approx::assert_relative_eq!(outcome.end_point, Point::new(3.0, 4.0, 9.6), epsilon = 1.0e-5);

    let report = &resolver.benchmark_sink().0[0];
    assert_eq!(report.brute_force_tests, 4 * 64);
    assert_eq!(report.bvh_root_tests, 4);
    // Only the ball in front of the shooter is tested in each creature.
    assert_eq!(report.bvh_collider_tests, 4);
    assert!(report.bvh_aabb_tests < report.brute_force_tests);
    assert_eq!(Some(outcome.end_point), report.hit_point);

    let visualizer = resolver.trace_sink();
    assert_eq!(visualizer.shown.len(), 1);
    assert_eq!(visualizer.durations, vec![30.0]);
    // A balanced tree over 64 parts has 7 levels.
    assert_eq!(visualizer.path_lengths, vec![7]);
    let on_path = visualizer.shown[0]
        .iter()
        .filter(|category| **category == NodeTraceCategory::Path)
        .count();
    assert_eq!(on_path, 7);
}

#[test]
fn traces_are_only_shown_for_hits() {
    let creatures = crowd(2);
    let keyed: Vec<_> = creatures.iter().map(|c| ((), c)).collect();
    let mut resolver =
        ShotResolver::with_sinks(ShotOptions::default(), Visualizer::default(), LogBenchmarkSink);

    let miss = Ray::new(Point::new(-5.0, 0.0, 0.0), Vector::z());
    let outcome = resolver.resolve(&miss, &keyed).unwrap();
    assert!(outcome.hit.is_none());
    assert_eq!(outcome.end_point, Point::new(-5.0, 0.0, 200.0));
    assert!(!outcome.report.unwrap().hit);
    assert!(resolver.trace_sink().shown.is_empty());

    resolver.options_mut().traced = false;
    let hit = Ray::new(Point::new(0.0, 0.0, 0.0), Vector::z());
    let outcome = resolver.resolve(&hit, &keyed).unwrap();
    assert!(outcome.hit.unwrap().trace.is_none());
    assert!(resolver.trace_sink().shown.is_empty());
}
