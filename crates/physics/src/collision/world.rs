//! Collision world containing static geometry.
//!
//! The collision world stores collidable brushes and answers the queries the
//! character controller needs: capsule sweeps for the mover, overlap spheres
//! for the grounding probe and rays for the obstruction resolver.

use glam::Vec3;
use parry3d::math::{Isometry, Point, Real, Vector};
use parry3d::query::{contact, intersection_test, Ray};
use parry3d::shape::SharedShape;

use super::flags::ContentFlags;
use super::trace::{TraceResult, TraceShape};

/// Identifier of a brush inside a [`CollisionWorld`].
pub type BrushId = u32;

/// Binary search iterations for capsule sweeps (~0.025% precision).
const TRACE_ITERATIONS: usize = 12;

/// Filter applied to every world query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryFilter {
    /// Only brushes whose contents intersect this mask are considered.
    pub mask: ContentFlags,
    /// A brush to skip, usually the querying character's own collider.
    pub ignore: Option<BrushId>,
}

impl QueryFilter {
    /// Filter on a content mask without ignoring any brush.
    pub const fn mask(mask: ContentFlags) -> Self {
        Self { mask, ignore: None }
    }

    /// Skip the given brush.
    pub fn ignoring(self, brush: Option<BrushId>) -> Self {
        Self { ignore: brush, ..self }
    }

    #[inline]
    fn accepts(&self, brush: &CollisionBrush) -> bool {
        self.mask.intersects(brush.contents) && self.ignore != Some(brush.id)
    }
}

impl Default for QueryFilter {
    fn default() -> Self {
        Self::mask(ContentFlags::MASK_PLAYER_SOLID)
    }
}

/// A piece of collision geometry in the world.
#[derive(Debug, Clone)]
pub struct CollisionBrush {
    /// Unique identifier for this brush.
    pub id: BrushId,
    /// The collision shape.
    pub shape: SharedShape,
    /// Position and orientation in world space.
    pub transform: Isometry<Real>,
    /// Content flags (solid, ground, trigger, ...).
    pub contents: ContentFlags,
}

/// The collision world containing all static geometry.
///
/// Immutable during a frame; every query takes `&self`.
#[derive(Debug, Default)]
pub struct CollisionWorld {
    brushes: Vec<CollisionBrush>,
    next_id: BrushId,
}

impl CollisionWorld {
    /// Create an empty collision world.
    pub fn new() -> Self {
        Self {
            brushes: Vec::new(),
            next_id: 0,
        }
    }

    /// Add an axis-aligned box to the world.
    ///
    /// # Arguments
    ///
    /// * `center` - Center position of the box in world space
    /// * `half_extents` - Half-size in each axis (x, y, z)
    /// * `contents` - Content flags for collision filtering
    pub fn add_box(&mut self, center: Vec3, half_extents: Vec3, contents: ContentFlags) -> BrushId {
        let shape = SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z);
        let transform = Isometry::translation(center.x, center.y, center.z);
        self.push_brush(shape, transform, contents)
    }

    /// Add a convex hull to the world.
    ///
    /// Returns `None` if the hull couldn't be computed from the points.
    pub fn add_convex_hull(&mut self, points: &[Vec3], contents: ContentFlags) -> Option<BrushId> {
        let parry_points: Vec<Point<Real>> = points.iter().map(|p| to_point(*p)).collect();
        let shape = SharedShape::convex_hull(&parry_points)?;
        Some(self.push_brush(shape, Isometry::identity(), contents))
    }

    /// Remove a brush. Returns whether it existed.
    pub fn remove(&mut self, id: BrushId) -> bool {
        let before = self.brushes.len();
        self.brushes.retain(|brush| brush.id != id);
        self.brushes.len() != before
    }

    /// Remove all collision geometry.
    pub fn clear(&mut self) {
        self.brushes.clear();
    }

    /// Get the number of collision brushes.
    pub fn brush_count(&self) -> usize {
        self.brushes.len()
    }

    /// Sweep a shape from `start` to `end` (both bottom-center positions).
    pub fn trace(&self, start: Vec3, end: Vec3, shape: TraceShape, filter: QueryFilter) -> TraceResult {
        let distance = (end - start).length();

        // No movement - just check if position is valid
        if distance < 0.0001 {
            return if self.point_in_solid(start, shape, filter) {
                TraceResult {
                    fraction: 0.0,
                    end_position: start,
                    hit_normal: Some(Vec3::Y),
                    hit_contents: ContentFlags::SOLID,
                    started_in_solid: true,
                    all_solid: true,
                    hit_brush: None,
                }
            } else {
                TraceResult::no_hit(start)
            };
        }

        self.trace_binary_search(start, end, shape, filter)
    }

    /// Cast a ray and return the nearest hit.
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, filter: QueryFilter) -> TraceResult {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO || max_distance <= 0.0 {
            return TraceResult::no_hit(origin);
        }

        let ray = Ray::new(to_point(origin), Vector::new(dir.x, dir.y, dir.z));

        let closest = self
            .brushes
            .iter()
            .filter(|brush| filter.accepts(brush))
            .filter_map(|brush| {
                brush
                    .shape
                    .cast_ray(&brush.transform, &ray, max_distance, true)
                    .map(|toi| (toi, brush))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0));

        match closest {
            Some((distance, brush)) => TraceResult {
                fraction: distance / max_distance,
                end_position: origin + dir * distance,
                hit_normal: Some(-dir),
                hit_contents: brush.contents,
                started_in_solid: distance <= 0.0,
                all_solid: false,
                hit_brush: Some(brush.id),
            },
            None => TraceResult::no_hit(origin + dir * max_distance),
        }
    }

    /// Check whether a sphere at `center` touches any accepted brush.
    pub fn overlap_sphere(&self, center: Vec3, radius: f32, filter: QueryFilter) -> bool {
        let ball = SharedShape::ball(radius.max(0.0001));
        let transform = Isometry::translation(center.x, center.y, center.z);

        self.brushes.iter().filter(|brush| filter.accepts(brush)).any(|brush| {
            matches!(
                intersection_test(&transform, ball.as_ref(), &brush.transform, brush.shape.as_ref()),
                Ok(true)
            )
        })
    }

    /// Check if a shape with its base at `position` is inside solid geometry.
    pub fn point_in_solid(&self, position: Vec3, shape: TraceShape, filter: QueryFilter) -> bool {
        let test_shape = parry_shape(shape);
        let test_transform = shape_transform(position, shape);

        self.brushes.iter().filter(|brush| filter.accepts(brush)).any(|brush| {
            matches!(
                contact(
                    &test_transform,
                    test_shape.as_ref(),
                    &brush.transform,
                    brush.shape.as_ref(),
                    0.0,
                ),
                Ok(Some(_))
            )
        })
    }

    /// Push a shape out of any geometry it penetrates.
    ///
    /// Returns the corrected base position.
    pub fn resolve_penetration(&self, position: Vec3, shape: TraceShape, filter: QueryFilter) -> Vec3 {
        let test_shape = parry_shape(shape);
        let test_transform = shape_transform(position, shape);

        let mut correction = Vec3::ZERO;
        for brush in self.brushes.iter().filter(|brush| filter.accepts(brush)) {
            if let Ok(Some(hit)) = contact(
                &test_transform,
                test_shape.as_ref(),
                &brush.transform,
                brush.shape.as_ref(),
                0.0,
            ) {
                // normal2 points out of the brush, towards the shape
                let normal = Vec3::new(hit.normal2.x, hit.normal2.y, hit.normal2.z);
                // Touching counts too, so a resting shape gets a small gap
                let depth = (-hit.dist).max(0.0);
                correction += normal * (depth + 0.001);
            }
        }

        position + correction
    }

    // ========================================================================
    // Private helpers
    // ========================================================================

    fn push_brush(&mut self, shape: SharedShape, transform: Isometry<Real>, contents: ContentFlags) -> BrushId {
        let id = self.next_id;
        self.next_id += 1;
        self.brushes.push(CollisionBrush {
            id,
            shape,
            transform,
            contents,
        });
        id
    }

    fn trace_binary_search(&self, start: Vec3, end: Vec3, shape: TraceShape, filter: QueryFilter) -> TraceResult {
        let start_in_solid = self.point_in_solid(start, shape, filter);

        if !self.point_in_solid(end, shape, filter) {
            return TraceResult {
                started_in_solid: start_in_solid,
                ..TraceResult::no_hit(end)
            };
        }

        let mut lo = 0.0_f32;
        let mut hi = 1.0_f32;
        for _ in 0..TRACE_ITERATIONS {
            let mid = (lo + hi) * 0.5;
            if self.point_in_solid(start.lerp(end, mid), shape, filter) {
                hi = mid;
            } else {
                lo = mid;
            }
        }

        let penetrating = start.lerp(end, hi);
        let push = self.resolve_penetration(penetrating, shape, filter) - penetrating;
        let hit_normal = if push.length_squared() > 1e-8 {
            push.normalize()
        } else {
            -(end - start).normalize_or_zero()
        };

        TraceResult {
            fraction: lo,
            end_position: start.lerp(end, lo),
            hit_normal: Some(hit_normal),
            hit_contents: ContentFlags::SOLID,
            started_in_solid: start_in_solid,
            all_solid: start_in_solid && lo < 0.001,
            hit_brush: None,
        }
    }
}

#[inline]
fn to_point(v: Vec3) -> Point<Real> {
    Point::new(v.x, v.y, v.z)
}

fn parry_shape(shape: TraceShape) -> SharedShape {
    match shape {
        TraceShape::Capsule { radius, height } => {
            // Parry capsules are defined by the half-height of the cylinder part
            let half_segment = (height - 2.0 * radius).max(0.0) * 0.5;
            SharedShape::capsule_y(half_segment, radius)
        }
        TraceShape::Sphere { radius } => SharedShape::ball(radius),
        TraceShape::Point => SharedShape::ball(0.001),
    }
}

fn shape_transform(position: Vec3, shape: TraceShape) -> Isometry<Real> {
    let center = position + shape.center_offset();
    Isometry::translation(center.x, center.y, center.z)
}

// ============================================================================
// Tests
// ============================================================================
