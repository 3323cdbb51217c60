/*!
The narrow physics-query interface the motor and the gameplay layer consume.

Everything the character system needs from a collision engine fits in the
[`PhysicsQueries`] trait: shape casts (time-of-impact sweeps), overlap
collection, and penetration resolution. The production implementation is
[`StaticWorld`](crate::StaticWorld); tests substitute it freely since the
trait is object-safe and deterministic.
*/

use crate::settings::MAX_OVERLAP_HITS;
use crate::types::{CapsuleSpec, ColliderHandle, Iso, MoveHit, PenetrationHit, Vec3};

/// Filters colliders out of a query, in the style of a physics engine's query
/// filter. The predicate returns `true` for colliders that should be tested;
/// a character controller uses it to exclude its own colliders.
#[derive(Clone, Copy, Default)]
pub struct QueryFilter<'a> {
    pub predicate: Option<&'a dyn Fn(ColliderHandle) -> bool>,
}

impl<'a> QueryFilter<'a> {
    /// A filter that accepts every collider.
    #[inline]
    pub fn none() -> Self {
        Self { predicate: None }
    }

    #[inline]
    pub fn with_predicate(predicate: &'a dyn Fn(ColliderHandle) -> bool) -> Self {
        Self {
            predicate: Some(predicate),
        }
    }

    #[inline]
    pub fn allows(&self, collider: ColliderHandle) -> bool {
        self.predicate.map_or(true, |p| p(collider))
    }
}

/// Reusable, fixed-capacity buffer of overlap results.
///
/// Allocated once and handed to overlap queries; the contents are only valid
/// until the next query writes into the buffer. Results past the capacity are
/// silently dropped.
#[derive(Debug)]
pub struct OverlapHits {
    hits: Vec<ColliderHandle>,
    capacity: usize,
}

impl OverlapHits {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            hits: Vec::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.hits.clear();
    }

    /// Records a hit; returns `false` once the buffer is full.
    #[inline]
    pub fn push(&mut self, collider: ColliderHandle) -> bool {
        if self.hits.len() >= self.capacity {
            return false;
        }
        self.hits.push(collider);
        true
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[ColliderHandle] {
        &self.hits
    }
}

impl Default for OverlapHits {
    fn default() -> Self {
        Self::with_capacity(MAX_OVERLAP_HITS)
    }
}

/// Collision primitives the character system depends on.
///
/// Capsule poses (`at`) are the world pose of the capsule *center*; callers
/// that track a base position convert before querying. All queries are
/// synchronous and allocation-free.
pub trait PhysicsQueries {
    /// Sweep a capsule along `translation`, returning the earliest contact.
    /// The hit fraction is relative to the full translation.
    fn cast_capsule(
        &self,
        capsule: CapsuleSpec,
        at: Iso,
        translation: Vec3,
        filter: &QueryFilter<'_>,
    ) -> Option<MoveHit>;

    /// Sweep an oriented box along `translation` (camera obstruction checks).
    fn cast_box(
        &self,
        half_extents: Vec3,
        at: Iso,
        translation: Vec3,
        filter: &QueryFilter<'_>,
    ) -> Option<MoveHit>;

    /// Collect colliders overlapping the capsule (radius grown by `inflate`)
    /// into `out`. Previous contents of `out` are discarded.
    fn overlap_capsule(
        &self,
        capsule: CapsuleSpec,
        at: Iso,
        inflate: f32,
        filter: &QueryFilter<'_>,
        out: &mut OverlapHits,
    );

    /// Collect colliders overlapping a sphere into `out`.
    fn overlap_sphere(
        &self,
        center: Vec3,
        radius: f32,
        filter: &QueryFilter<'_>,
        out: &mut OverlapHits,
    );

    /// Separation vector for the capsule against one specific collider, if the
    /// two actually overlap.
    fn capsule_penetration(
        &self,
        capsule: CapsuleSpec,
        at: Iso,
        collider: ColliderHandle,
    ) -> Option<PenetrationHit>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_buffer_truncates_at_capacity() {
        // Pushing past the fixed capacity must drop hits instead of growing.
        let mut hits = OverlapHits::with_capacity(2);
        assert!(hits.push(ColliderHandle(0)));
        assert!(hits.push(ColliderHandle(1)));
        assert!(!hits.push(ColliderHandle(2)));
        assert_eq!(hits.len(), 2);

        hits.clear();
        assert!(hits.is_empty());
        assert!(hits.push(ColliderHandle(3)));
    }

    #[test]
    fn filter_predicate_excludes_colliders() {
        let exclude = ColliderHandle(7);
        let pred = |c: ColliderHandle| c != exclude;
        let filter = QueryFilter::with_predicate(&pred);
        assert!(filter.allows(ColliderHandle(0)));
        assert!(!filter.allows(exclude));
        assert!(QueryFilter::none().allows(exclude));
    }
}
