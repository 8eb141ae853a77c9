//! Vertex normals over the irregular (5/6) valence mesh: the mean of the unit
//! normals of the faces around each vertex.

use glam::Vec3;
use orbis_mesh::{Adjacency, BuildError, SubMesh, VertexId, VertexStore};
use rayon::prelude::*;

/// Write a unit normal for every vertex.
///
/// Phase one walks every face once and adds its unit outward normal to its
/// three corners; a face whose normal cannot be normalized adds nothing.
/// Phase two divides each sum by the vertex degree and normalizes, in
/// parallel over vertices.
///
/// # Errors
///
/// [`BuildError::InvalidDegree`] if any vertex does not have 5 or 6 faces.
pub fn compute_normals(
    sub_meshes: &[SubMesh],
    vertices: &mut VertexStore,
    adjacency: &Adjacency,
) -> Result<(), BuildError> {
    let degrees: Vec<usize> = (0..vertices.len())
        .map(|i| adjacency.degree(VertexId(i as u32)))
        .collect();
    if let Some((i, &degree)) = degrees.iter().enumerate().find(|(_, d)| !(5..=6).contains(*d)) {
        return Err(BuildError::InvalidDegree {
            vertex: VertexId(i as u32),
            degree,
        });
    }

    let positions = vertices.positions();
    let mut sums = vec![Vec3::ZERO; positions.len()];
    for sub in sub_meshes {
        for &[a, b, c] in sub.triangles() {
            let (pa, pb, pc) = (
                positions[a.index()],
                positions[b.index()],
                positions[c.index()],
            );
            let Some(face_normal) = (pb - pa).cross(pc - pa).try_normalize() else {
                continue;
            };
            sums[a.index()] += face_normal;
            sums[b.index()] += face_normal;
            sums[c.index()] += face_normal;
        }
    }

    vertices
        .normals_mut()
        .par_iter_mut()
        .zip(sums.par_iter().zip(degrees.par_iter()))
        .for_each(|(normal, (&sum, &degree))| {
            *normal = (sum / degree as f32).normalize_or_zero();
        });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relief::{ReliefParams, generate};
    use crate::seed::terrain_rng;
    use orbis_mesh::{FaceId, Icosphere};

    #[test]
    fn test_unit_sphere_normals_are_radial() {
        let (mut store, adjacency, subs) = Icosphere::build(2).unwrap().into_parts();
        compute_normals(&subs, &mut store, &adjacency).unwrap();
        for (p, n) in store.positions().iter().zip(store.normals()) {
            assert!((n.length() - 1.0).abs() < 1e-5);
            assert!(n.dot(*p) > 0.99, "normal {n:?} at {p:?} is not radial");
        }
    }

    #[test]
    fn test_relief_normals_point_outward() {
        let (mut store, adjacency, subs) = Icosphere::build(2).unwrap().into_parts();
        generate(&mut store, &ReliefParams::default(), &mut terrain_rng(4)).unwrap();
        compute_normals(&subs, &mut store, &adjacency).unwrap();
        for (p, n) in store.positions().iter().zip(store.normals()) {
            assert!((n.length() - 1.0).abs() < 1e-5);
            assert!(n.dot(p.normalize()) > 0.0);
        }
    }

    #[test]
    fn test_faces_count_equally_regardless_of_area() {
        let (mut store, adjacency, subs) = Icosphere::build(2).unwrap().into_parts();
        generate(&mut store, &ReliefParams::default(), &mut terrain_rng(4)).unwrap();
        compute_normals(&subs, &mut store, &adjacency).unwrap();

        for i in 0..store.len() {
            let v = VertexId(i as u32);
            let faces = adjacency.faces_of(v);
            let mean = faces
                .iter()
                .map(|f| {
                    subs[f.sub_mesh as usize]
                        .geometry(f.local, &store)
                        .unwrap()
                        .normal()
                        .normalize()
                })
                .sum::<Vec3>()
                / faces.len() as f32;
            let expected = mean.normalize();
            let actual = store.normals()[i];
            assert!(
                actual.dot(expected) > 1.0 - 1e-5,
                "vertex {v}: {actual:?} vs {expected:?}"
            );
        }
    }

    #[test]
    fn test_bad_degree_rejected() {
        let mut store = VertexStore::new();
        let a = store.push(Vec3::X);
        let b = store.push(Vec3::Y);
        let c = store.push(Vec3::Z);
        let mut adjacency = Adjacency::with_vertices(3);
        adjacency.record_face(FaceId::new(0, 0), [a, b, c]).unwrap();
        let sub = SubMesh::new(0, vec![[a, b, c]], &store).unwrap();
        assert_eq!(
            compute_normals(&[sub], &mut store, &adjacency),
            Err(BuildError::InvalidDegree {
                vertex: a,
                degree: 1
            })
        );
    }
}
