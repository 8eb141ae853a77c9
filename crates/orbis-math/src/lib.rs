//! f32 geometry primitives for the Orbis terrain engine: rays, axis-aligned
//! boxes, bounding spheres, combined bounding volumes, and exact ray/triangle
//! intersection.

mod aabb;
mod bounds;
mod ray;
mod sphere;
mod triangle;

pub use aabb::{Aabb, PARALLEL_EPSILON};
pub use bounds::{BoundingVolume, BoundsBuilder};
pub use ray::Ray;
pub use sphere::BoundingSphere;
pub use triangle::{BARYCENTRIC_EPSILON, Triangle, TriangleHit};
