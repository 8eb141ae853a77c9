//! Edge-midpoint deduplication for subdivision.

use hashbrown::HashMap;

use crate::{BuildError, VertexId, VertexStore};

/// Maps an unordered vertex pair to the id of its (sphere-projected) midpoint.
///
/// Only lives for the duration of a build; sibling triangles that share an
/// edge resolve to the same midpoint vertex through it.
#[derive(Debug, Default)]
pub struct MidpointCache {
    midpoints: HashMap<(VertexId, VertexId), VertexId>,
}

impl MidpointCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            midpoints: HashMap::with_capacity(capacity),
        }
    }

    /// Number of distinct edges split so far.
    pub fn len(&self) -> usize {
        self.midpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.midpoints.is_empty()
    }

    /// Look up the midpoint of edge `(a, b)`, creating it on the unit sphere
    /// if this is the first time the edge is split.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MidpointCache`] for a self-edge, an unknown
    /// vertex, or an edge whose midpoint cannot be projected (antipodal
    /// endpoints).
    pub fn midpoint(
        &mut self,
        a: VertexId,
        b: VertexId,
        vertices: &mut VertexStore,
    ) -> Result<VertexId, BuildError> {
        if a == b || !vertices.contains(a) || !vertices.contains(b) {
            return Err(BuildError::MidpointCache { a, b });
        }
        let key = if a < b { (a, b) } else { (b, a) };
        if let Some(&mid) = self.midpoints.get(&key) {
            return Ok(mid);
        }

        let sum = vertices.position(a) + vertices.position(b);
        let Some(projected) = sum.try_normalize() else {
            return Err(BuildError::MidpointCache { a, b });
        };
        let mid = vertices.push(projected);
        self.midpoints.insert(key, mid);
        Ok(mid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn two_vertices() -> (VertexStore, VertexId, VertexId) {
        let mut store = VertexStore::new();
        let a = store.push(Vec3::X);
        let b = store.push(Vec3::Y);
        (store, a, b)
    }

    #[test]
    fn test_midpoint_is_on_unit_sphere() {
        let (mut store, a, b) = two_vertices();
        let mut cache = MidpointCache::new();
        let m = cache.midpoint(a, b, &mut store).unwrap();
        let p = store.position(m);
        assert!((p.length() - 1.0).abs() < 1e-6);
        assert!((p - Vec3::new(1.0, 1.0, 0.0).normalize()).length() < 1e-6);
    }

    #[test]
    fn test_midpoint_deduplicates_both_orders() {
        let (mut store, a, b) = two_vertices();
        let mut cache = MidpointCache::new();
        let m1 = cache.midpoint(a, b, &mut store).unwrap();
        let m2 = cache.midpoint(b, a, &mut store).unwrap();
        assert_eq!(m1, m2);
        assert_eq!(store.len(), 3);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_self_edge_rejected() {
        let (mut store, a, _) = two_vertices();
        let mut cache = MidpointCache::new();
        assert_eq!(
            cache.midpoint(a, a, &mut store),
            Err(BuildError::MidpointCache { a, b: a })
        );
    }

    #[test]
    fn test_antipodal_edge_rejected() {
        let mut store = VertexStore::new();
        let a = store.push(Vec3::X);
        let b = store.push(-Vec3::X);
        let mut cache = MidpointCache::new();
        assert!(cache.midpoint(a, b, &mut store).is_err());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_unknown_vertex_rejected() {
        let (mut store, a, _) = two_vertices();
        let mut cache = MidpointCache::new();
        assert!(cache.midpoint(a, VertexId(9), &mut store).is_err());
    }
}
