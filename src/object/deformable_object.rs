use super::RebakePolicy;
use crate::bounding_volume::Aabb;
use crate::math::Real;
use crate::partitioning::{Bvh, BvhBuildStrategy, BvhRayHit, TraceRecord};
use crate::query::Ray;
use crate::shape::DeformablePart;

/// An animated object made of deformable parts, together with the hierarchy built over them.
///
/// The object owns both its parts and its [`Bvh`], so the hierarchy can't outlive the parts it
/// references. The set of parts is fixed at creation: [`DeformableObject::parts_mut`] gives
/// access to the parts themselves but not to the list, and dropping the object drops the whole
/// hierarchy with it.
///
/// Call [`DeformableObject::step`] once per simulation step, after the parts were deformed and
/// before any query of that step.
#[derive(Clone, Debug)]
pub struct DeformableObject<P> {
    parts: Vec<P>,
    bvh: Bvh,
    policy: RebakePolicy,
    bake_timer: Real,
    baked_aabbs: Vec<Aabb>,
    current_aabbs: Vec<Aabb>,
}

impl<P: DeformablePart> DeformableObject<P> {
    /// Creates an object with the default rebake policy and build strategy.
    pub fn new(parts: Vec<P>) -> Self {
        Self::with_policy(parts, RebakePolicy::default(), BvhBuildStrategy::default())
    }

    /// Creates an object, bakes the colliders of all its parts once, and builds its hierarchy.
    ///
    /// An object without any part is valid: it simply never gets hit.
    pub fn with_policy(
        mut parts: Vec<P>,
        policy: RebakePolicy,
        strategy: BvhBuildStrategy,
    ) -> Self {
        for part in &mut parts {
            part.rebake_collider();
        }

        let baked_aabbs: Vec<Aabb> = parts.iter().map(|part| part.world_aabb()).collect();
        let bvh = Bvh::from_aabbs(strategy, &baked_aabbs);

        if parts.is_empty() {
            log::debug!("Created a deformable object without any part.");
        }

        Self {
            current_aabbs: baked_aabbs.clone(),
            parts,
            bvh,
            policy,
            bake_timer: policy.bake_interval,
            baked_aabbs,
        }
    }

    /// The parts of this object, in the order the hierarchy was built from.
    #[inline]
    pub fn parts(&self) -> &[P] {
        &self.parts
    }

    /// Mutable access to the parts of this object, e.g., to deform them.
    ///
    /// The hierarchy is stale until the next [`DeformableObject::step`] or
    /// [`DeformableObject::refit`].
    #[inline]
    pub fn parts_mut(&mut self) -> &mut [P] {
        &mut self.parts
    }

    /// The hierarchy of this object.
    #[inline]
    pub fn bvh(&self) -> &Bvh {
        &self.bvh
    }

    /// The rebake policy of this object.
    #[inline]
    pub fn policy(&self) -> &RebakePolicy {
        &self.policy
    }

    /// Replaces the rebake policy of this object.
    pub fn set_policy(&mut self, policy: RebakePolicy) {
        self.policy = policy;
        self.bake_timer = self.bake_timer.min(policy.bake_interval);
    }

    /// Refits the hierarchy to the current bounds of the parts, without rebaking anything.
    pub fn refit(&mut self) {
        self.read_current_aabbs();
        let current = &self.current_aabbs;
        self.bvh.refit_with(|part| current[part as usize]);
    }

    /// Advances this object by one simulation step of `dt` seconds.
    ///
    /// The hierarchy is refitted (reading the bounds of each part exactly once), then, if the
    /// [`RebakePolicy`] allows it, the colliders of the parts that moved enough since their
    /// last bake are rebaked.
    ///
    /// Returns the number of parts rebaked.
    pub fn step(&mut self, dt: Real) -> usize {
        self.refit();

        if !self.policy.runtime_bake {
            return 0;
        }

        self.bake_timer -= dt;
        if self.bake_timer > 0.0 {
            return 0;
        }
        self.bake_timer = self.policy.bake_interval;

        let mut rebaked = 0;
        for ((part, baked), current) in self
            .parts
            .iter_mut()
            .zip(self.baked_aabbs.iter_mut())
            .zip(self.current_aabbs.iter())
        {
            if self.policy.needs_rebake(baked, current) {
                part.rebake_collider();
                *baked = *current;
                rebaked += 1;
            }
        }

        if rebaked > 0 {
            log::debug!("Rebaked {} of {} parts.", rebaked, self.parts.len());
        }

        rebaked
    }

    /// Casts a ray on this object with its hierarchy.
    pub fn cast_ray(&self, ray: &Ray, max_time_of_impact: Real) -> Option<BvhRayHit> {
        self.bvh.cast_ray(&self.parts, ray, max_time_of_impact)
    }

    /// Casts a ray on this object with its hierarchy, recording the traversal into `trace`.
    pub fn cast_ray_traced(
        &self,
        ray: &Ray,
        max_time_of_impact: Real,
        trace: &mut TraceRecord,
    ) -> Option<BvhRayHit> {
        self.bvh
            .cast_ray_traced(&self.parts, ray, max_time_of_impact, trace)
    }

    fn read_current_aabbs(&mut self) {
        self.current_aabbs.clear();
        self.current_aabbs
            .extend(self.parts.iter().map(|part| part.world_aabb()));
    }
}
