use skinbvh3d::math::{Point, Real, Vector};
use skinbvh3d::object::DeformableObject;
use skinbvh3d::partitioning::{
    Bvh, NodeId, NodeTraceCategory, TraceRecord, TraceSink, TraceView,
};
use skinbvh3d::query::{BenchmarkSink, Ray, ShotOptions, ShotReport, ShotResolver};
use skinbvh3d::shape::{BallCollider, ColliderPart};

/// Prints the traversal of each shot, one line per tree level.
struct PrintTrace;

impl TraceSink for PrintTrace {
    fn show_trace(
        &mut self,
        bvh: &Bvh,
        trace: &TraceRecord,
        hit_leaf: NodeId,
        display_duration: Real,
    ) {
        let view = TraceView::new(bvh, trace, Some(hit_leaf));
        println!("Trace (shown for {}s):", display_duration);

        for level in view.levels() {
            let line: String = level
                .iter()
                .map(|id| match view.category(*id) {
                    NodeTraceCategory::Path => 'P',
                    NodeTraceCategory::HitLeaf => 'H',
                    NodeTraceCategory::Passed => 'o',
                    NodeTraceCategory::Visited => 'x',
                    NodeTraceCategory::Untouched => '.',
                })
                .collect();
            println!("    {}", line);
        }
    }
}

struct PrintReport;

impl BenchmarkSink for PrintReport {
    fn record(&mut self, report: &ShotReport) {
        println!(
            "Brute force: {:?} for {} tests, BVH: {:?} for {} aabb + {} collider tests.",
            report.brute_force_time,
            report.brute_force_tests,
            report.bvh_time,
            report.bvh_aabb_tests,
            report.bvh_collider_tests
        );
        if let Some(reduction) = report.reduction_percent() {
            println!("Reduction: {:.1}%", reduction);
        }
    }
}

fn creature(position: Point<Real>) -> DeformableObject<ColliderPart<BallCollider>> {
    let parts = (0..32)
        .map(|i| {
            let offset = Vector::new((i % 4) as Real * 0.5, (i / 4) as Real * 0.25, 0.0);
            ColliderPart::single(BallCollider::new(position + offset, 0.3))
        })
        .collect();
    DeformableObject::new(parts)
}

fn main() {
    let mut creatures: Vec<_> = (0..5)
        .map(|i| creature(Point::new(i as Real * 3.0, 0.0, 10.0 + i as Real)))
        .collect();
    let mut resolver = ShotResolver::with_sinks(ShotOptions::default(), PrintTrace, PrintReport);
    let dt = 1.0 / 60.0;

    for frame in 0..60 {
        let time = frame as Real * dt;

        // Breathing animation.
        for creature in &mut creatures {
            for (i, part) in creature.parts_mut().iter_mut().enumerate() {
                for ball in part.colliders_mut() {
                    ball.radius = 0.3 + 0.05 * (time * 4.0 + i as Real).sin();
                }
            }
            let _ = creature.step(dt);
        }

        if frame % 20 == 0 {
            let ray = Ray::new(Point::new(6.8, 1.0, 0.0), Vector::z());
            let keyed: Vec<_> = creatures.iter().enumerate().collect();
            let outcome = resolver.resolve(&ray, &keyed).unwrap();

            match &outcome.hit {
                Some(hit) => println!(
                    "Frame {}: hit creature {} (part {}) at {}.",
                    frame,
                    hit.target,
                    hit.part,
                    hit.point()
                ),
                None => println!("Frame {}: miss, tracer ends at {}.", frame, outcome.end_point),
            }
        }
    }
}
