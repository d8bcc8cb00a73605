//! Collision shapes and their axis-aligned bounds.

use std::cell::Cell;

use glam::{Affine2, Vec2};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in world space.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Smallest box containing every point.
    pub fn from_points(points: &[Vec2]) -> Self {
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for p in points {
            min = min.min(*p);
            max = max.max(*p);
        }
        Self { min, max }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Half-size along each axis.
    #[inline]
    pub fn extent(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }
}

/// How two volumes are tested against each other.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OverlapMode {
    /// Compare axis-aligned bounds only.
    Aabb,
    /// Compare exact shapes, except for boxes flagged to prefer their bounds.
    #[default]
    Exact,
}

/// Concrete shape of a volume.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Shape {
    /// Local rectangle `[min, max]` placed by `world`.
    Box { world: Affine2, min: Vec2, max: Vec2 },
    /// World-space circle.
    Circle { center: Vec2, radius: f32 },
}

/// A collision shape rebuilt from a composed posture, with a lazily
/// computed AABB.
#[derive(Debug)]
pub struct Volume {
    shape: Shape,
    prefer_aabb: bool,
    aabb: Cell<Option<Aabb>>,
}

impl Volume {
    pub fn new(shape: Shape, prefer_aabb: bool) -> Self {
        Self {
            shape,
            prefer_aabb,
            aabb: Cell::new(None),
        }
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Boxes flagged this way collide through their AABB even in exact mode.
    #[inline]
    pub fn prefers_aabb(&self) -> bool {
        self.prefer_aabb
    }

    /// Replace the shape and drop the cached AABB.
    pub(crate) fn reshape(&mut self, shape: Shape, prefer_aabb: bool) {
        self.shape = shape;
        self.prefer_aabb = prefer_aabb;
        self.aabb.set(None);
    }

    /// World-space corners of a box volume, in winding order.
    pub fn corners(&self) -> Option<[Vec2; 4]> {
        match self.shape {
            Shape::Box { world, min, max } => Some(
                Aabb { min, max }
                    .corners()
                    .map(|c| world.transform_point2(c)),
            ),
            Shape::Circle { .. } => None,
        }
    }

    pub fn aabb(&self) -> Aabb {
        if let Some(cached) = self.aabb.get() {
            return cached;
        }
        let aabb = match self.shape {
            Shape::Box { .. } => {
                let corners = self.corners().unwrap_or_default();
                Aabb::from_points(&corners)
            }
            Shape::Circle { center, radius } => Aabb {
                min: center - Vec2::splat(radius),
                max: center + Vec2::splat(radius),
            },
        };
        self.aabb.set(Some(aabb));
        aabb
    }

    pub fn overlaps(&self, other: &Volume, mode: OverlapMode) -> bool {
        if !self.aabb().overlaps(&other.aabb()) {
            return false;
        }
        if mode == OverlapMode::Aabb {
            return true;
        }
        match (self.exact(), other.exact()) {
            (Exact::Polygon(a), Exact::Polygon(b)) => polygons_overlap(&a, &b),
            (Exact::Circle(c0, r0), Exact::Circle(c1, r1)) => {
                c0.distance_squared(c1) <= (r0 + r1) * (r0 + r1)
            }
            (Exact::Polygon(p), Exact::Circle(c, r)) | (Exact::Circle(c, r), Exact::Polygon(p)) => {
                polygon_circle_overlap(&p, c, r)
            }
        }
    }

    fn exact(&self) -> Exact {
        match self.shape {
            Shape::Circle { center, radius } => Exact::Circle(center, radius),
            Shape::Box { .. } if self.prefer_aabb => Exact::Polygon(self.aabb().corners()),
            Shape::Box { .. } => Exact::Polygon(self.corners().unwrap_or_default()),
        }
    }
}

enum Exact {
    Polygon([Vec2; 4]),
    Circle(Vec2, f32),
}

fn edges(poly: &[Vec2; 4]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    (0..4).map(move |i| (poly[i], poly[(i + 1) % 4]))
}

fn project(poly: &[Vec2; 4], axis: Vec2) -> (f32, f32) {
    poly.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
        let d = p.dot(axis);
        (lo.min(d), hi.max(d))
    })
}

/// Separating-axis test over the edge normals of both quads.
fn polygons_overlap(a: &[Vec2; 4], b: &[Vec2; 4]) -> bool {
    for (p0, p1) in edges(a).chain(edges(b)) {
        let axis = (p1 - p0).perp();
        if axis == Vec2::ZERO {
            continue;
        }
        let (a_lo, a_hi) = project(a, axis);
        let (b_lo, b_hi) = project(b, axis);
        if a_hi < b_lo || b_hi < a_lo {
            return false;
        }
    }
    true
}

fn polygon_contains(poly: &[Vec2; 4], p: Vec2) -> bool {
    let mut inside = false;
    for (a, b) in edges(poly) {
        if (a.y > p.y) != (b.y > p.y) {
            let x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x {
                inside = !inside;
            }
        }
    }
    inside
}

fn segment_distance_squared(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    let ab = b - a;
    let len = ab.length_squared();
    let t = if len > 0.0 {
        ((p - a).dot(ab) / len).clamp(0.0, 1.0)
    } else {
        0.0
    };
    p.distance_squared(a + ab * t)
}

fn polygon_circle_overlap(poly: &[Vec2; 4], center: Vec2, radius: f32) -> bool {
    polygon_contains(poly, center)
        || edges(poly).any(|(a, b)| segment_distance_squared(a, b, center) <= radius * radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::trs_matrix;

    fn square(at: Vec2, rotation: f32, half: f32) -> Volume {
        Volume::new(
            Shape::Box {
                world: trs_matrix(at, rotation, Vec2::ONE),
                min: Vec2::splat(-half),
                max: Vec2::splat(half),
            },
            false,
        )
    }

    #[test]
    fn rotated_squares_need_exact_test() {
        // Bounds touch but the diamond's tip misses the square's corner region.
        let a = square(Vec2::ZERO, 0.0, 1.0);
        let b = square(Vec2::new(2.3, 2.3), 45.0, 1.0);
        assert!(a.overlaps(&b, OverlapMode::Aabb));
        assert!(!a.overlaps(&b, OverlapMode::Exact));
    }

    #[test]
    fn circle_against_box_edge() {
        let b = square(Vec2::ZERO, 0.0, 1.0);
        let near = Volume::new(
            Shape::Circle {
                center: Vec2::new(1.5, 0.0),
                radius: 0.6,
            },
            false,
        );
        let far = Volume::new(
            Shape::Circle {
                center: Vec2::new(1.8, 1.8),
                radius: 1.0,
            },
            false,
        );
        assert!(b.overlaps(&near, OverlapMode::Exact));
        assert!(b.overlaps(&far, OverlapMode::Aabb));
        assert!(!b.overlaps(&far, OverlapMode::Exact));
    }

    #[test]
    fn reshape_invalidates_cached_bounds() {
        let mut v = square(Vec2::ZERO, 0.0, 1.0);
        assert_eq!(v.aabb().extent(), Vec2::ONE);
        v.reshape(
            Shape::Circle {
                center: Vec2::ZERO,
                radius: 3.0,
            },
            false,
        );
        assert_eq!(v.aabb().extent(), Vec2::splat(3.0));
    }
}
