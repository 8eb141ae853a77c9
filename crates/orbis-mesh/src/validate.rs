//! Whole-mesh topology and orientation checks run at the end of a build.

use glam::Vec3;
use hashbrown::HashMap;

use crate::{BuildError, SubMesh, VertexId, VertexStore};

/// True if the triangle's `(v1 - v0) × (v2 - v0)` normal points away from
/// the sphere center, judged against the triangle centroid.
pub fn triangle_winds_outward(v0: Vec3, v1: Vec3, v2: Vec3) -> bool {
    let face_normal = (v1 - v0).cross(v2 - v0);
    let centroid = (v0 + v1 + v2) / 3.0;
    face_normal.dot(centroid) > 0.0
}

/// Every undirected edge must be shared by exactly two triangles.
pub fn check_manifold(sub_meshes: &[SubMesh]) -> Result<(), BuildError> {
    let mut edges: HashMap<(VertexId, VertexId), u32> = HashMap::new();
    for sub in sub_meshes {
        for tri in sub.triangles() {
            for i in 0..3 {
                let a = tri[i];
                let b = tri[(i + 1) % 3];
                let key = if a < b { (a, b) } else { (b, a) };
                *edges.entry(key).or_insert(0) += 1;
            }
        }
    }

    // Report the smallest offending edge so failures are reproducible.
    let worst = edges
        .into_iter()
        .filter(|&(_, count)| count != 2)
        .min_by_key(|&(key, _)| key);
    match worst {
        Some(((a, b), faces)) => Err(BuildError::NonManifoldEdge { a, b, faces }),
        None => Ok(()),
    }
}

/// Every triangle must wind outward.
pub fn check_winding(sub_meshes: &[SubMesh], vertices: &VertexStore) -> Result<(), BuildError> {
    for sub in sub_meshes {
        for (face, [a, b, c]) in sub.face_ids().zip(sub.triangles().iter().copied()) {
            let outward = triangle_winds_outward(
                vertices.position(a),
                vertices.position(b),
                vertices.position(c),
            );
            if !outward {
                return Err(BuildError::InwardFace { face });
            }
        }
    }
    Ok(())
}
