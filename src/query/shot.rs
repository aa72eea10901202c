//! Resolution of one shot per frame, with optional benchmarking and trace display.

use core::time::Duration;
use std::time::Instant;

use crate::math::{Point, Real};
use crate::object::DeformableObject;
use crate::partitioning::TraceSink;
use crate::query::{
    cast_ray_on_parts, find_closest_hit_with_stats, validate_max_distance, ClosestHit,
    QueryError, QueryStats, Ray, TraversalMode,
};
use crate::shape::DeformablePart;

/// Configuration of a [`ShotResolver`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct ShotOptions {
    /// Hits farther than this distance along the ray are ignored.
    pub max_distance: Real,
    /// Record the traversal of the winning object and hand it to the trace sink.
    pub traced: bool,
    /// Time a brute-force pass against the hierarchy pass and report both to the benchmark
    /// sink.
    pub benchmark: bool,
    /// How long, in seconds, the trace sink should keep a trace on screen.
    pub trace_display_duration: Real,
}

impl Default for ShotOptions {
    fn default() -> Self {
        Self {
            max_distance: 200.0,
            traced: true,
            benchmark: true,
            trace_display_duration: 30.0,
        }
    }
}

/// Timings and counters of one shot, comparing brute force with the hierarchies.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ShotReport {
    /// Time spent testing every exact collider of every object.
    pub brute_force_time: Duration,
    /// Time spent querying the hierarchies.
    pub bvh_time: Duration,
    /// The number of exact collider tests performed by brute force.
    pub brute_force_tests: u32,
    /// The number of hierarchies whose root was tested.
    pub bvh_root_tests: u32,
    /// The number of bounding tests performed by the hierarchies.
    pub bvh_aabb_tests: u32,
    /// The number of exact collider tests performed by the hierarchies.
    pub bvh_collider_tests: u32,
    /// Did the hierarchy pass hit something?
    pub hit: bool,
    /// The hit point, if any.
    pub hit_point: Option<Point<Real>>,
}

impl ShotReport {
    /// The time saved by the hierarchies, as a percentage of the brute-force time.
    ///
    /// Negative if the hierarchies were slower. `None` if the brute-force time is zero.
    pub fn reduction_percent(&self) -> Option<f64> {
        let brute_force = self.brute_force_time.as_secs_f64();
        if brute_force > 0.0 {
            Some((1.0 - self.bvh_time.as_secs_f64() / brute_force) * 100.0)
        } else {
            None
        }
    }
}

/// Receives the report of every benchmarked shot.
pub trait BenchmarkSink {
    /// Records the report of one shot.
    fn record(&mut self, report: &ShotReport);
}

impl BenchmarkSink for () {
    #[inline]
    fn record(&mut self, _: &ShotReport) {}
}

/// A [`BenchmarkSink`] writing a summary of each shot with [`log::info!`].
#[derive(Copy, Clone, Debug, Default)]
pub struct LogBenchmarkSink;

impl BenchmarkSink for LogBenchmarkSink {
    fn record(&mut self, report: &ShotReport) {
        let reduction = report
            .reduction_percent()
            .map(|p| format!("{:.1}%", p))
            .unwrap_or_else(|| "n/a".to_string());

        log::info!(
            "Brute force: {:?} ({} collider tests). BVH: {:?} ({} roots, {} aabb tests, {} collider tests). Reduction: {}. Hit: {}.",
            report.brute_force_time,
            report.brute_force_tests,
            report.bvh_time,
            report.bvh_root_tests,
            report.bvh_aabb_tests,
            report.bvh_collider_tests,
            reduction,
            report.hit
        );
    }
}

/// The result of [`ShotResolver::resolve`].
#[derive(Clone, Debug, PartialEq)]
pub struct ShotOutcome<K> {
    /// The closest object hit, if any.
    pub hit: Option<ClosestHit<K>>,
    /// Where the shot stops: the hit point, or the point at the maximum distance along the ray.
    ///
    /// This is the end point of a tracer drawn for the shot.
    pub end_point: Point<Real>,
    /// The benchmark report, if benchmarking is enabled.
    pub report: Option<ShotReport>,
}

/// Resolves shots against deformable objects.
///
/// Each shot produces one ray tested against every object. The trace of the winning object
/// is handed to a [`TraceSink`] and the timings to a [`BenchmarkSink`]. Both sinks are
/// injected: `()` can be used for either to discard its data.
#[derive(Clone, Debug, Default)]
pub struct ShotResolver<T = (), B = ()> {
    options: ShotOptions,
    trace_sink: T,
    benchmark_sink: B,
}

impl ShotResolver {
    /// A resolver that discards traces and benchmark reports.
    pub fn new(options: ShotOptions) -> Self {
        Self::with_sinks(options, (), ())
    }
}

impl<T: TraceSink, B: BenchmarkSink> ShotResolver<T, B> {
    /// A resolver writing to the given sinks.
    pub fn with_sinks(options: ShotOptions, trace_sink: T, benchmark_sink: B) -> Self {
        Self {
            options,
            trace_sink,
            benchmark_sink,
        }
    }

    /// The options of this resolver.
    pub fn options(&self) -> &ShotOptions {
        &self.options
    }

    /// Mutable access to the options of this resolver.
    pub fn options_mut(&mut self) -> &mut ShotOptions {
        &mut self.options
    }

    /// The trace sink of this resolver.
    pub fn trace_sink(&self) -> &T {
        &self.trace_sink
    }

    /// The benchmark sink of this resolver.
    pub fn benchmark_sink(&self) -> &B {
        &self.benchmark_sink
    }

    /// Resolves one shot along `ray` against `objects`.
    ///
    /// The objects must have been stepped (refitted) since their last deformation. When
    /// benchmarking is enabled, a brute-force pass over every exact collider runs first so both
    /// passes are timed on the same inputs.
    pub fn resolve<K: Clone, P: DeformablePart>(
        &mut self,
        ray: &Ray,
        objects: &[(K, &DeformableObject<P>)],
    ) -> Result<ShotOutcome<K>, QueryError> {
        ray.validate()?;
        validate_max_distance(self.options.max_distance)?;

        let max_distance = self.options.max_distance;
        let mode = if self.options.traced {
            TraversalMode::Traced
        } else {
            TraversalMode::Fast
        };

        let mut brute_force_stats = QueryStats::default();
        let mut brute_force_time = Duration::ZERO;
        if self.options.benchmark {
            let start = Instant::now();
            for (_, object) in objects {
                let _ = core::hint::black_box(cast_ray_on_parts(
                    core::hint::black_box(object.parts()),
                    ray,
                    max_distance,
                    &mut brute_force_stats,
                ));
            }
            brute_force_time = start.elapsed();
        }

        // Query by position so the winning object can be found again for the trace sink.
        let indexed: Vec<_> = objects
            .iter()
            .enumerate()
            .map(|(i, (_, object))| (i, *object))
            .collect();

        let mut bvh_stats = QueryStats::default();
        let start = Instant::now();
        let hit = find_closest_hit_with_stats(ray, &indexed, max_distance, mode, &mut bvh_stats)?;
        let bvh_time = start.elapsed();

        if let Some(ClosestHit {
            target,
            node,
            trace: Some(trace),
            ..
        }) = &hit
        {
            self.trace_sink.show_trace(
                objects[*target].1.bvh(),
                trace,
                *node,
                self.options.trace_display_duration,
            );
        }

        let hit = hit.map(|hit| hit.map_target(|i| objects[i].0.clone()));

        let end_point = hit
            .as_ref()
            .map(|hit| hit.point())
            .unwrap_or_else(|| ray.point_at(max_distance));

        let report = self.options.benchmark.then(|| ShotReport {
            brute_force_time,
            bvh_time,
            brute_force_tests: brute_force_stats.collider_tests,
            bvh_root_tests: bvh_stats.root_tests,
            bvh_aabb_tests: bvh_stats.aabb_tests,
            bvh_collider_tests: bvh_stats.collider_tests,
            hit: hit.is_some(),
            hit_point: hit.as_ref().map(|hit| hit.point()),
        });

        if let Some(report) = &report {
            self.benchmark_sink.record(report);
        }

        Ok(ShotOutcome {
            hit,
            end_point,
            report,
        })
    }
}
