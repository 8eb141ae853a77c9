//! Shared vertex arena: positions, normals, and land/water classification,
//! indexed by [`VertexId`].

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Index of a vertex in a [`VertexStore`]. Stable for the store's lifetime.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct VertexId(pub u32);

impl VertexId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Surface class of a vertex after relief generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    #[default]
    Water,
    Land,
}

/// Structure-of-arrays vertex storage.
///
/// All three arrays always have the same length. Normals start at zero and
/// are written by the normal pass once topology and relief are final.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexStore {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    classifications: Vec<Classification>,
}

impl VertexStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            normals: Vec::with_capacity(capacity),
            classifications: Vec::with_capacity(capacity),
        }
    }

    /// Rebuild a store from raw arrays.
    ///
    /// Returns `None` if the arrays have different lengths.
    pub fn from_parts(
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        classifications: Vec<Classification>,
    ) -> Option<Self> {
        if positions.len() != normals.len() || positions.len() != classifications.len() {
            return None;
        }
        Some(Self {
            positions,
            normals,
            classifications,
        })
    }

    /// Append a vertex (classified as water, zero normal) and return its id.
    pub fn push(&mut self, position: Vec3) -> VertexId {
        let id = VertexId(self.positions.len() as u32);
        self.positions.push(position);
        self.normals.push(Vec3::ZERO);
        self.classifications.push(Classification::Water);
        id
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn contains(&self, id: VertexId) -> bool {
        id.index() < self.positions.len()
    }

    /// Position of a vertex.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn position(&self, id: VertexId) -> Vec3 {
        self.positions[id.index()]
    }

    pub fn normal(&self, id: VertexId) -> Vec3 {
        self.normals[id.index()]
    }

    pub fn classification(&self, id: VertexId) -> Classification {
        self.classifications[id.index()]
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn classifications(&self) -> &[Classification] {
        &self.classifications
    }

    pub fn normals_mut(&mut self) -> &mut [Vec3] {
        &mut self.normals
    }

    /// Split borrow used by relief passes, which rewrite both arrays together.
    pub fn surface_mut(&mut self) -> (&mut [Vec3], &mut [Classification]) {
        (&mut self.positions, &mut self.classifications)
    }

    /// The two y-extreme vertices `(north, south)`.
    ///
    /// Returns `None` for an empty store.
    pub fn polar_vertices(&self) -> Option<(VertexId, VertexId)> {
        if self.positions.is_empty() {
            return None;
        }
        let mut north = 0;
        let mut south = 0;
        for (i, p) in self.positions.iter().enumerate() {
            if p.y > self.positions[north].y {
                north = i;
            }
            if p.y < self.positions[south].y {
                south = i;
            }
        }
        Some((VertexId(north as u32), VertexId(south as u32)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_assigns_sequential_ids() {
        let mut store = VertexStore::new();
        assert_eq!(store.push(Vec3::X), VertexId(0));
        assert_eq!(store.push(Vec3::Y), VertexId(1));
        assert_eq!(store.len(), 2);
        assert_eq!(store.position(VertexId(1)), Vec3::Y);
        assert_eq!(store.classification(VertexId(0)), Classification::Water);
        assert_eq!(store.normal(VertexId(0)), Vec3::ZERO);
    }

    #[test]
    fn test_from_parts_rejects_mismatched_lengths() {
        let ok = VertexStore::from_parts(vec![Vec3::X], vec![Vec3::X], vec![Classification::Land]);
        assert!(ok.is_some());
        let bad = VertexStore::from_parts(vec![Vec3::X], vec![], vec![Classification::Land]);
        assert!(bad.is_none());
    }

    #[test]
    fn test_polar_vertices() {
        let mut store = VertexStore::new();
        store.push(Vec3::X);
        let north = store.push(Vec3::new(0.1, 0.99, 0.0));
        let south = store.push(Vec3::new(0.0, -1.0, 0.0));
        store.push(Vec3::Z);
        assert_eq!(store.polar_vertices(), Some((north, south)));
        assert_eq!(VertexStore::new().polar_vertices(), None);
    }

    #[test]
    fn test_surface_mut_writes_through() {
        let mut store = VertexStore::new();
        let id = store.push(Vec3::X);
        {
            let (positions, classes) = store.surface_mut();
            positions[0] *= 1.5;
            classes[0] = Classification::Land;
        }
        assert_eq!(store.position(id), Vec3::new(1.5, 0.0, 0.0));
        assert_eq!(store.classification(id), Classification::Land);
    }

    #[test]
    fn test_vertex_id_display() {
        assert_eq!(VertexId(17).to_string(), "v17");
    }
}
