use glam::Vec3;

/// A half-line starting at `origin` and extending along `direction` (`t >= 0`).
///
/// The direction does not need to be normalized; all intersection tests in
/// this crate work in the ray's own parameterisation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Ray from the sphere center (the origin) through `point`.
    ///
    /// Returns `None` when `point` has no usable direction (zero length or
    /// non-finite).
    pub fn from_center_through(point: Vec3) -> Option<Self> {
        let direction = point.try_normalize()?;
        Some(Self {
            origin: Vec3::ZERO,
            direction,
        })
    }

    /// Point at parameter `t` along the ray.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
