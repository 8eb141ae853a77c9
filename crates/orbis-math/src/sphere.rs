use glam::Vec3;

use crate::Ray;

/// A bounding sphere stored with its squared radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius_squared: f32,
}

impl BoundingSphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius_squared: radius * radius,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius_squared.sqrt()
    }

    /// Returns true if `p` lies within the sphere, allowing `epsilon` of slack
    /// on the radius.
    pub fn contains_point(&self, p: Vec3, epsilon: f32) -> bool {
        (p - self.center).length() <= self.radius() + epsilon
    }

    /// Cheap ray/sphere test: the discriminant of `|o + t·d - c|² = r²` in `t`
    /// must be non-negative.
    ///
    /// This tests the infinite line; the box test that follows it in
    /// [`crate::BoundingVolume`] discards volumes behind the origin.
    pub fn ray_intersects(&self, ray: &Ray) -> bool {
        let oc = ray.origin - self.center;
        let a = ray.direction.length_squared();
        let c = oc.length_squared() - self.radius_squared;
        if a == 0.0 {
            return c <= 0.0;
        }
        let b = oc.dot(ray.direction);
        b * b - a * c >= 0.0
    }
}
