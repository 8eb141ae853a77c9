//! Exact ray/triangle intersection using the edge-vector / plane-normal
//! formulation: intersect the supporting plane, then test barycentric
//! containment of the plane hit point.

use glam::{Vec2, Vec3};

use crate::{PARALLEL_EPSILON, Ray};

/// Slack allowed on barycentric coordinates so that rays through shared
/// edges and vertices are not lost to rounding.
pub const BARYCENTRIC_EPSILON: f32 = 1e-5;

/// Squared cross-product magnitude below which a triangle is degenerate.
const DEGENERATE_EPSILON: f32 = 1e-24;

/// A triangle by value, wound counter-clockwise when seen from the side its
/// normal points to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

/// A ray/triangle hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriangleHit {
    /// World-space hit point.
    pub point: Vec3,
    /// Ray parameter of the hit (`point = origin + t·direction`).
    pub t: f32,
    /// Barycentric coordinates `(s, t)` along the edges `b - a` and `c - a`.
    pub barycentric: Vec2,
}

impl Triangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    /// Unnormalized plane normal `(b - a) × (c - a)`.
    pub fn normal(&self) -> Vec3 {
        (self.b - self.a).cross(self.c - self.a)
    }

    /// True if the two edge vectors are parallel (zero cross product).
    pub fn is_degenerate(&self) -> bool {
        let n = self.normal();
        !n.is_finite() || n.length_squared() < DEGENERATE_EPSILON
    }

    pub fn centroid(&self) -> Vec3 {
        (self.a + self.b + self.c) / 3.0
    }

    /// The point `a + s·(b - a) + t·(c - a)`.
    pub fn point_at(&self, s: f32, t: f32) -> Vec3 {
        self.a + (self.b - self.a) * s + (self.c - self.a) * t
    }

    /// Intersect a half-line with the triangle.
    ///
    /// Degenerate triangles and rays parallel to the plane never hit.
    pub fn intersect(&self, ray: &Ray) -> Option<TriangleHit> {
        let u = self.b - self.a;
        let v = self.c - self.a;
        let n = u.cross(v);
        if !n.is_finite() || n.length_squared() < DEGENERATE_EPSILON {
            return None;
        }

        let j = n.dot(ray.direction);
        if j.abs() <= PARALLEL_EPSILON * n.length() * ray.direction.length() {
            return None;
        }

        let w0 = ray.origin - self.a;
        let k = -n.dot(w0) / j;
        if k < 0.0 {
            return None;
        }

        let point = ray.at(k);

        let uu = u.dot(u);
        let uv = u.dot(v);
        let vv = v.dot(v);
        let w = point - self.a;
        let wu = w.dot(u);
        let wv = w.dot(v);
        let d = uv * uv - uu * vv;

        let s = (uv * wv - vv * wu) / d;
        if !(-BARYCENTRIC_EPSILON..=1.0 + BARYCENTRIC_EPSILON).contains(&s) {
            return None;
        }
        let t = (uv * wu - uu * wv) / d;
        if t < -BARYCENTRIC_EPSILON || s + t > 1.0 + BARYCENTRIC_EPSILON {
            return None;
        }

        Some(TriangleHit {
            point,
            t: k,
            barycentric: Vec2::new(s, t),
        })
    }
}
