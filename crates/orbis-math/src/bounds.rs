//! Two-stage bounding volumes: an AABB plus its enclosing sphere.
//!
//! Volumes are accumulated through a [`BoundsBuilder`] and locked by
//! [`BoundsBuilder::finalize`]. A finalized [`BoundingVolume`] has no mutating
//! methods.

use glam::Vec3;

use crate::{Aabb, BoundingSphere, Ray};

/// Accumulates points into a running axis-aligned box.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoundsBuilder {
    aabb: Aabb,
    count: usize,
}

impl BoundsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, point: Vec3) {
        self.aabb.include(point);
        self.count += 1;
    }

    /// Number of points added so far (duplicates included).
    pub fn count(&self) -> usize {
        self.count
    }

    /// Lock the box and derive the enclosing sphere.
    ///
    /// The sphere is centred on the box midpoint with squared radius equal to
    /// the sum of squared half-extents. Returns `None` if no point was added.
    pub fn finalize(self) -> Option<BoundingVolume> {
        if self.count == 0 || self.aabb.is_empty() {
            return None;
        }
        let half = self.aabb.half_extents();
        Some(BoundingVolume {
            aabb: self.aabb,
            sphere: BoundingSphere {
                center: self.aabb.center(),
                radius_squared: half.length_squared(),
            },
        })
    }
}

/// A finalized, immutable AABB + enclosing sphere pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingVolume {
    aabb: Aabb,
    sphere: BoundingSphere,
}

impl BoundingVolume {
    /// Build a finalized volume directly from a point set.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut builder = BoundsBuilder::new();
        for p in points {
            builder.add(p);
        }
        builder.finalize()
    }

    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    pub fn sphere(&self) -> &BoundingSphere {
        &self.sphere
    }

    pub fn center(&self) -> Vec3 {
        self.sphere.center
    }

    /// Pre-filter for ray queries: sphere discriminant first, then the slab
    /// test. Passing does not guarantee that any contained triangle is hit.
    pub fn ray_intersects(&self, ray: &Ray) -> bool {
        self.sphere.ray_intersects(ray) && self.aabb.ray_intersects(ray)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finalize_empty_is_none() {
        assert!(BoundsBuilder::new().finalize().is_none());
    }

    #[test]
    fn test_sphere_from_half_extents() {
        let mut b = BoundsBuilder::new();
        b.add(Vec3::new(0.0, 0.0, 0.0));
        b.add(Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(b.count(), 2);
        let vol = b.finalize().unwrap();
        assert_eq!(vol.center(), Vec3::new(1.0, 2.0, 3.0));
        assert!((vol.sphere().radius_squared - 14.0).abs() < 1e-6);
    }

    #[test]
    fn test_sphere_contains_every_point() {
        let points = [
            Vec3::new(0.3, 0.9, -0.1),
            Vec3::new(-0.2, 0.7, 0.4),
            Vec3::new(0.1, 1.0, 0.0),
            Vec3::new(0.0, 0.8, -0.5),
        ];
        let vol = BoundingVolume::from_points(points).unwrap();
        for p in points {
            assert!(vol.sphere().contains_point(p, 1e-6), "{p} escapes sphere");
            assert!(vol.aabb().contains_point(p));
        }
    }

    #[test]
    fn test_ray_intersects_requires_both_tests() {
        let vol =
            BoundingVolume::from_points([Vec3::new(-1.0, -1.0, 4.0), Vec3::new(1.0, 1.0, 6.0)])
                .unwrap();
        assert!(vol.ray_intersects(&Ray::new(Vec3::ZERO, Vec3::Z)));
        // The line through the box passes the sphere test, but the box is behind.
        assert!(!vol.ray_intersects(&Ray::new(Vec3::ZERO, -Vec3::Z)));
        assert!(!vol.ray_intersects(&Ray::new(Vec3::ZERO, Vec3::X)));
    }

    #[test]
    fn test_single_point_volume() {
        let vol = BoundingVolume::from_points([Vec3::new(0.0, 1.0, 0.0)]).unwrap();
        assert_eq!(vol.sphere().radius_squared, 0.0);
        assert!(vol.ray_intersects(&Ray::new(Vec3::ZERO, Vec3::Y)));
    }
}
