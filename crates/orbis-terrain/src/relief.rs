//! Fault-voting relief (Fournier style).
//!
//! Random planes through the planet centre split the vertices in two; one
//! side is raised and the other lowered. After all votes are in, the vote
//! totals are rescaled to `[0, 1]` and thresholded against the water level:
//! vertices above it become land and are pushed outward, the rest sit on the
//! flat sea surface at radius 1.

use glam::Vec3;
use orbis_mesh::{Classification, VertexStore};
use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::ReliefError;

/// Smallest elevation a land vertex may have, keeping land strictly above
/// sea level after `f32` rounding.
pub const MIN_LAND_ELEVATION: f32 = 1e-4;

/// Squared length below which a candidate plane normal is discarded.
const MIN_NORMAL_LENGTH_SQUARED: f32 = 1e-12;

/// Relief generation parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReliefParams {
    /// Number of cutting planes.
    pub iterations: u32,
    /// Normalized vote threshold in `[0, 1)` separating water from land.
    pub water_level: f32,
    /// Elevation (in planet radii) of the highest land vertex.
    pub land_height: f32,
}

impl Default for ReliefParams {
    fn default() -> Self {
        Self {
            iterations: 200,
            water_level: 0.5,
            land_height: 0.08,
        }
    }
}

impl ReliefParams {
    pub fn validate(&self) -> Result<(), ReliefError> {
        if !(0.0..1.0).contains(&self.water_level) {
            return Err(ReliefError::InvalidWaterLevel(self.water_level));
        }
        if !self.land_height.is_finite() || self.land_height < MIN_LAND_ELEVATION {
            return Err(ReliefError::InvalidLandHeight(self.land_height));
        }
        Ok(())
    }

    /// Radius of a vertex with normalized vote `n`, or `None` for water.
    pub fn land_radius(&self, n: f32) -> Option<f32> {
        if n <= self.water_level {
            return None;
        }
        let fraction = (n - self.water_level) / (1.0 - self.water_level);
        let elevation = (self.land_height * fraction).clamp(MIN_LAND_ELEVATION, self.land_height);
        Some(1.0 + elevation)
    }
}

/// A plane through the origin and the vote it casts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CuttingPlane {
    /// Unit plane normal.
    pub normal: Vec3,
    /// `+1` raises the positive half-space, `-1` lowers it.
    pub sign: i32,
}

impl CuttingPlane {
    #[inline]
    pub fn vote(&self, point: Vec3) -> i32 {
        if point.dot(self.normal) > 0.0 {
            self.sign
        } else {
            -self.sign
        }
    }
}

/// Draw one cutting plane with a direction uniform over the sphere
/// (rejection sampling in the unit ball).
///
/// Returns the plane and the number of near-zero candidates that had to be
/// resampled. Candidates outside the ball are part of the sampling scheme and
/// are not counted.
pub fn draw_plane<R: Rng>(rng: &mut R) -> (CuttingPlane, u32) {
    let mut degenerate = 0;
    let normal = loop {
        let candidate = Vec3::new(
            rng.random_range(-1.0..=1.0),
            rng.random_range(-1.0..=1.0),
            rng.random_range(-1.0..=1.0),
        );
        let len_sq = candidate.length_squared();
        if len_sq > 1.0 {
            continue;
        }
        if len_sq < MIN_NORMAL_LENGTH_SQUARED {
            degenerate += 1;
            continue;
        }
        break candidate / len_sq.sqrt();
    };
    let sign = if rng.random_bool(0.5) { 1 } else { -1 };
    (CuttingPlane { normal, sign }, degenerate)
}

/// What a relief pass did, for logging and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReliefSummary {
    pub iterations: u32,
    pub land: usize,
    pub water: usize,
    pub min_vote: i32,
    pub max_vote: i32,
    /// Zero-length plane normals that were redrawn.
    pub resampled: u32,
}

impl ReliefSummary {
    pub fn land_fraction(&self) -> f32 {
        let total = self.land + self.water;
        if total == 0 {
            0.0
        } else {
            self.land as f32 / total as f32
        }
    }
}

/// Rewrite every vertex's radius and classification.
///
/// Positions are projected back onto the unit sphere first, so running the
/// pass again over already displaced vertices behaves like a fresh run.
/// Plane draws consume `rng` sequentially; the per-vertex vote sums run on
/// the rayon pool and do not depend on thread count.
pub fn generate<R: Rng>(
    vertices: &mut VertexStore,
    params: &ReliefParams,
    rng: &mut R,
) -> Result<ReliefSummary, ReliefError> {
    params.validate()?;
    if vertices.is_empty() {
        return Err(ReliefError::NoVertices);
    }

    let mut resampled = 0;
    let planes: Vec<CuttingPlane> = (0..params.iterations)
        .map(|_| {
            let (plane, redraws) = draw_plane(rng);
            resampled += redraws;
            plane
        })
        .collect();
    if resampled > 0 {
        warn!(resampled, "Redrew zero-length cutting plane normals");
    }

    let (positions, classes) = vertices.surface_mut();
    let directions: Vec<Vec3> = positions.par_iter().map(|p| p.normalize_or_zero()).collect();
    let votes: Vec<i32> = directions
        .par_iter()
        .map(|&d| planes.iter().map(|plane| plane.vote(d)).sum())
        .collect();

    let min_vote = votes.iter().copied().min().unwrap_or(0);
    let max_vote = votes.iter().copied().max().unwrap_or(0);
    let range = (max_vote - min_vote) as f32;

    let mut land = 0;
    for (i, &vote) in votes.iter().enumerate() {
        let n = if range > 0.0 {
            (vote - min_vote) as f32 / range
        } else {
            0.0
        };
        match params.land_radius(n) {
            Some(radius) => {
                positions[i] = directions[i] * radius;
                classes[i] = Classification::Land;
                land += 1;
            }
            None => {
                positions[i] = directions[i];
                classes[i] = Classification::Water;
            }
        }
    }

    let summary = ReliefSummary {
        iterations: params.iterations,
        land,
        water: votes.len() - land,
        min_vote,
        max_vote,
        resampled,
    };
    debug!(?summary, "Relief generated");
    Ok(summary)
}
