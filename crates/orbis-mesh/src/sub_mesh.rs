//! Leaf chunks of the icosphere: a triangle list plus its bounding volume.

use orbis_math::{BoundingVolume, BoundsBuilder, Triangle};

use crate::{BuildError, FaceId, MAX_LOCAL_FACES, VertexId, VertexStore};

/// An independently bounded, independently ray-testable chunk of triangles.
///
/// The triangle list never changes after construction. The bounding volume
/// is recomputed (not mutated) when vertex positions move.
#[derive(Clone, Debug)]
pub struct SubMesh {
    id: u32,
    triangles: Vec<[VertexId; 3]>,
    bounds: BoundingVolume,
}

impl SubMesh {
    /// Seal a triangle list into a sub-mesh and finalize its bounds.
    ///
    /// # Errors
    ///
    /// Fails if a corner is outside `vertices`, a triangle is degenerate,
    /// the list holds more than [`MAX_LOCAL_FACES`] triangles, or it is empty.
    /// The sub-mesh id itself is unrestricted; only [`FaceId::pack`] limits it.
    pub fn new(
        id: u32,
        triangles: Vec<[VertexId; 3]>,
        vertices: &VertexStore,
    ) -> Result<Self, BuildError> {
        for (local, tri) in triangles.iter().enumerate() {
            if local >= MAX_LOCAL_FACES as usize {
                return Err(BuildError::FaceIndexOverflow {
                    sub_mesh: id,
                    local: MAX_LOCAL_FACES,
                });
            }
            let face = FaceId::new(id, local as u32);
            if let Some(&vertex) = tri.iter().find(|v| !vertices.contains(**v)) {
                return Err(BuildError::VertexOutOfRange {
                    vertex,
                    len: vertices.len(),
                });
            }
            let [a, b, c] = *tri;
            let geometry = Triangle::new(
                vertices.position(a),
                vertices.position(b),
                vertices.position(c),
            );
            if geometry.is_degenerate() {
                return Err(BuildError::DegenerateFace { face });
            }
        }

        let bounds = Self::bound(id, &triangles, vertices)?;
        Ok(Self {
            id,
            triangles,
            bounds,
        })
    }

    fn bound(
        id: u32,
        triangles: &[[VertexId; 3]],
        vertices: &VertexStore,
    ) -> Result<BoundingVolume, BuildError> {
        let mut builder = BoundsBuilder::new();
        for tri in triangles {
            for &v in tri {
                builder.add(vertices.position(v));
            }
        }
        builder
            .finalize()
            .ok_or(BuildError::EmptyBounds { sub_mesh: id })
    }

    /// Re-derive the bounding volume from the current vertex positions.
    pub fn refresh_bounds(&mut self, vertices: &VertexStore) -> Result<(), BuildError> {
        self.bounds = Self::bound(self.id, &self.triangles, vertices)?;
        Ok(())
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn bounds(&self) -> &BoundingVolume {
        &self.bounds
    }

    pub fn triangles(&self) -> &[[VertexId; 3]] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn triangle(&self, local: u32) -> Option<[VertexId; 3]> {
        self.triangles.get(local as usize).copied()
    }

    /// World-space geometry of a local face.
    pub fn geometry(&self, local: u32, vertices: &VertexStore) -> Option<Triangle> {
        let [a, b, c] = self.triangle(local)?;
        Some(Triangle::new(
            vertices.position(a),
            vertices.position(b),
            vertices.position(c),
        ))
    }

    /// Face ids in local order.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        (0..self.triangles.len() as u32).map(move |local| FaceId::new(self.id, local))
    }

    /// Flat `u32` index list, three per triangle.
    pub fn indices(&self) -> Vec<u32> {
        self.triangles
            .iter()
            .flat_map(|tri| tri.map(|v| v.0))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn quad() -> (VertexStore, Vec<[VertexId; 3]>) {
        let mut store = VertexStore::new();
        let a = store.push(Vec3::new(0.0, 1.0, 0.0));
        let b = store.push(Vec3::new(1.0, 1.0, 0.0));
        let c = store.push(Vec3::new(1.0, 1.0, 1.0));
        let d = store.push(Vec3::new(0.0, 1.0, 1.0));
        (store, vec![[a, c, b], [a, d, c]])
    }

    #[test]
    fn test_new_bounds_every_corner() {
        let (store, tris) = quad();
        let sub = SubMesh::new(7, tris, &store).unwrap();
        assert_eq!(sub.id(), 7);
        assert_eq!(sub.len(), 2);
        let sphere = sub.bounds().sphere();
        for &p in store.positions() {
            assert!(sphere.contains_point(p, 1e-6));
        }
    }

    #[test]
    fn test_face_ids_and_indices() {
        let (store, tris) = quad();
        let sub = SubMesh::new(3, tris, &store).unwrap();
        let ids: Vec<_> = sub.face_ids().collect();
        assert_eq!(ids, vec![FaceId::new(3, 0), FaceId::new(3, 1)]);
        assert_eq!(sub.indices(), vec![0, 2, 1, 0, 3, 2]);
        assert!(sub.triangle(2).is_none());
        assert!(sub.geometry(1, &store).is_some());
    }

    #[test]
    fn test_degenerate_face_rejected() {
        let mut store = VertexStore::new();
        let a = store.push(Vec3::ZERO);
        let b = store.push(Vec3::X);
        let c = store.push(Vec3::X * 2.0);
        let err = SubMesh::new(0, vec![[a, b, c]], &store).unwrap_err();
        assert_eq!(
            err,
            BuildError::DegenerateFace {
                face: FaceId::new(0, 0)
            }
        );
    }

    #[test]
    fn test_out_of_range_vertex_rejected() {
        let (store, _) = quad();
        let err = SubMesh::new(0, vec![[VertexId(0), VertexId(1), VertexId(40)]], &store)
            .unwrap_err();
        assert!(matches!(err, BuildError::VertexOutOfRange { len: 4, .. }));
    }

    #[test]
    fn test_large_sub_mesh_id_accepted() {
        let (store, tris) = quad();
        let sub = SubMesh::new(1 << 20, tris, &store).unwrap();
        let face = sub.face_ids().next().unwrap();
        assert_eq!(face, FaceId::new(1 << 20, 0));
        assert!(face.pack().is_err());
    }

    #[test]
    fn test_empty_sub_mesh_rejected() {
        let (store, _) = quad();
        assert_eq!(
            SubMesh::new(2, Vec::new(), &store).unwrap_err(),
            BuildError::EmptyBounds { sub_mesh: 2 }
        );
    }

    #[test]
    fn test_refresh_bounds_tracks_moved_vertices() {
        let (mut store, tris) = quad();
        let mut sub = SubMesh::new(0, tris, &store).unwrap();
        {
            let (positions, _) = store.surface_mut();
            for p in positions.iter_mut() {
                *p *= 2.0;
            }
        }
        sub.refresh_bounds(&store).unwrap();
        assert!(sub.bounds().aabb().contains_point(Vec3::new(2.0, 2.0, 2.0)));
    }
}
