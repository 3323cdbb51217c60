/*!
Static collision world: the production [`PhysicsQueries`] implementation.

A bag of [`StaticShape`]s compiled once into parry3d shapes and world poses.
Queries iterate every collider and keep the earliest/closest result; worlds
this controller runs against are small enough that a broad phase would cost
more than it saves.
*/

use nalgebra as na;
use parry3d::{
    query::{self, ShapeCastOptions},
    shape as pshape,
};

use crate::queries::{OverlapHits, PhysicsQueries, QueryFilter};
use crate::settings::DIST_EPS;
use crate::types::{CapsuleSpec, ColliderHandle, Iso, MoveHit, PenetrationHit, StaticShape, Vec3};

struct Compiled {
    shape: pshape::SharedShape,
    pose: Iso,
}

/// Immutable-geometry collision world.
pub struct StaticWorld {
    shapes: Vec<StaticShape>,
    compiled: Vec<Compiled>,
}

impl StaticWorld {
    pub fn new(shapes: impl IntoIterator<Item = StaticShape>) -> Self {
        let mut world = Self {
            shapes: Vec::new(),
            compiled: Vec::new(),
        };
        for shape in shapes {
            world.push(shape);
        }
        world
    }

    /// Adds a collider and returns its handle.
    pub fn push(&mut self, shape: StaticShape) -> ColliderHandle {
        let handle = ColliderHandle(self.shapes.len() as u32);
        self.compiled.push(compile(&shape));
        self.shapes.push(shape);
        handle
    }

    pub fn shapes(&self) -> &[StaticShape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Sweep `moving` from `at` along `translation` against every collider the
    /// filter allows, returning the earliest hit. The contact normal is
    /// flipped, if needed, to oppose the motion.
    fn cast_shape(
        &self,
        moving: &dyn pshape::Shape,
        at: Iso,
        translation: Vec3,
        filter: &QueryFilter<'_>,
    ) -> Option<MoveHit> {
        if translation.norm_squared() <= DIST_EPS * DIST_EPS {
            return None;
        }

        let mut opts = ShapeCastOptions::with_max_time_of_impact(1.0);
        opts.stop_at_penetration = true;

        let mut best: Option<MoveHit> = None;
        for (idx, compiled) in self.compiled.iter().enumerate() {
            let handle = ColliderHandle(idx as u32);
            if !filter.allows(handle) {
                continue;
            }

            if let Ok(Some(hit)) = query::cast_shapes(
                &at,
                &translation,
                moving,
                &compiled.pose,
                &na::Vector3::zeros(),
                &*compiled.shape,
                opts,
            ) {
                if best
                    .as_ref()
                    .map_or(true, |b| hit.time_of_impact < b.fraction)
                {
                    // Use the normal on the moving shape; ensure it opposes the motion.
                    let mut n: Vec3 = hit.normal1.into_inner();
                    if n.dot(&translation) > 0.0 {
                        n = -n;
                    }
                    // Approximate contact point on the moving shape's surface at impact.
                    let at_impact = Iso::from_parts(
                        na::Translation3::from(
                            at.translation.vector + translation * hit.time_of_impact,
                        ),
                        at.rotation,
                    );
                    let point = at_impact * hit.witness1;
                    best = Some(MoveHit {
                        collider: handle,
                        normal: n,
                        point: Vec3::new(point.x, point.y, point.z),
                        fraction: hit.time_of_impact,
                    });
                }
            }
        }
        best
    }

    fn overlap_shape(
        &self,
        moving: &dyn pshape::Shape,
        at: Iso,
        filter: &QueryFilter<'_>,
        out: &mut OverlapHits,
    ) {
        out.clear();
        for (idx, compiled) in self.compiled.iter().enumerate() {
            let handle = ColliderHandle(idx as u32);
            if !filter.allows(handle) {
                continue;
            }
            if let Ok(true) = query::intersection_test(&at, moving, &compiled.pose, &*compiled.shape)
            {
                if !out.push(handle) {
                    break;
                }
            }
        }
    }
}

impl PhysicsQueries for StaticWorld {
    fn cast_capsule(
        &self,
        capsule: CapsuleSpec,
        at: Iso,
        translation: Vec3,
        filter: &QueryFilter<'_>,
    ) -> Option<MoveHit> {
        let shape = pshape::Capsule::new_y(capsule.half_height(), capsule.radius);
        self.cast_shape(&shape, at, translation, filter)
    }

    fn cast_box(
        &self,
        half_extents: Vec3,
        at: Iso,
        translation: Vec3,
        filter: &QueryFilter<'_>,
    ) -> Option<MoveHit> {
        let shape = pshape::Cuboid::new(half_extents);
        self.cast_shape(&shape, at, translation, filter)
    }

    fn overlap_capsule(
        &self,
        capsule: CapsuleSpec,
        at: Iso,
        inflate: f32,
        filter: &QueryFilter<'_>,
        out: &mut OverlapHits,
    ) {
        let inflated = capsule.inflated(inflate);
        let shape = pshape::Capsule::new_y(inflated.half_height(), inflated.radius);
        self.overlap_shape(&shape, at, filter, out);
    }

    fn overlap_sphere(
        &self,
        center: Vec3,
        radius: f32,
        filter: &QueryFilter<'_>,
        out: &mut OverlapHits,
    ) {
        let shape = pshape::Ball::new(radius);
        let at = Iso::from_parts(
            na::Translation3::new(center.x, center.y, center.z),
            na::UnitQuaternion::identity(),
        );
        self.overlap_shape(&shape, at, filter, out);
    }

    fn capsule_penetration(
        &self,
        capsule: CapsuleSpec,
        at: Iso,
        collider: ColliderHandle,
    ) -> Option<PenetrationHit> {
        let compiled = self.compiled.get(collider.0 as usize)?;
        let shape = pshape::Capsule::new_y(capsule.half_height(), capsule.radius);

        let contact = query::contact(&at, &shape, &compiled.pose, &*compiled.shape, 0.0)
            .ok()
            .flatten()?;
        if contact.dist >= 0.0 {
            return None;
        }

        // `normal1` points from the capsule toward the obstruction; separating
        // the capsule means moving it the opposite way by the overlap depth.
        Some(PenetrationHit {
            direction: -contact.normal1.into_inner(),
            depth: -contact.dist,
        })
    }
}

fn compile(shape: &StaticShape) -> Compiled {
    match *shape {
        StaticShape::Plane { normal, dist } => {
            // Plane equation in world space: normal ⋅ x = dist.
            let unit_n = na::Unit::new_normalize(normal);
            let offset = normal * dist;
            Compiled {
                shape: pshape::SharedShape::new(pshape::HalfSpace { normal: unit_n }),
                pose: Iso::from_parts(
                    na::Translation3::new(offset.x, offset.y, offset.z),
                    na::UnitQuaternion::identity(),
                ),
            }
        }
        StaticShape::Cuboid {
            half_extents,
            transform,
        } => Compiled {
            shape: pshape::SharedShape::new(pshape::Cuboid::new(half_extents)),
            pose: transform.iso(),
        },
        StaticShape::Sphere { radius, transform } => Compiled {
            shape: pshape::SharedShape::new(pshape::Ball::new(radius)),
            pose: transform.iso(),
        },
        StaticShape::Capsule {
            radius,
            half_height,
            transform,
        } => Compiled {
            shape: pshape::SharedShape::new(pshape::Capsule::new_y(half_height, radius)),
            pose: transform.iso(),
        },
    }
}
