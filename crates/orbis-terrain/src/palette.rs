//! Vertex colouring by classification, elevation, and latitude.

use glam::Vec3;
use orbis_mesh::{Classification, VertexId, VertexStore};

/// Packed RGBA8.
pub type Rgba8 = [u8; 4];

pub const SEA: Rgba8 = [28, 76, 156, 255];
pub const ICE: Rgba8 = [236, 242, 248, 255];
pub const LOWLAND: Rgba8 = [62, 138, 58, 255];
pub const HIGHLAND: Rgba8 = [124, 94, 62, 255];

/// Colouring rules for one terrain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// `|y|` of the unit direction at and above which a vertex is ice.
    pub polar_cap: f32,
    /// Elevation that maps to [`HIGHLAND`].
    pub land_height: f32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            polar_cap: 0.97,
            land_height: 0.08,
        }
    }
}

impl Palette {
    /// Colour of a single vertex. `pole` marks the y-extreme vertices, which
    /// are ice regardless of `polar_cap`.
    pub fn vertex_color(&self, position: Vec3, class: Classification, pole: bool) -> Rgba8 {
        let radius = position.length();
        if pole || (radius > 0.0 && (position.y / radius).abs() >= self.polar_cap) {
            return ICE;
        }
        match class {
            Classification::Water => SEA,
            Classification::Land => {
                let t = ((radius - 1.0) / self.land_height).clamp(0.0, 1.0);
                lerp(LOWLAND, HIGHLAND, t)
            }
        }
    }

    /// Colours for every vertex in the store.
    pub fn colors(&self, vertices: &VertexStore) -> Vec<Rgba8> {
        let poles = vertices.polar_vertices();
        vertices
            .positions()
            .iter()
            .zip(vertices.classifications())
            .enumerate()
            .map(|(i, (&p, &class))| {
                let id = VertexId(i as u32);
                let pole = poles.is_some_and(|(north, south)| id == north || id == south);
                self.vertex_color(p, class, pole)
            })
            .collect()
    }
}

fn lerp(a: Rgba8, b: Rgba8, t: f32) -> Rgba8 {
    let mut out = [0u8; 4];
    for i in 0..4 {
        let v = a[i] as f32 + (b[i] as f32 - a[i] as f32) * t;
        out[i] = v.round().clamp(0.0, 255.0) as u8;
    }
    out
}
