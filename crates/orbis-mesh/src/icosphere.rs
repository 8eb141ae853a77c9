//! Icosahedron subdivision into bounded sub-meshes.
//!
//! The base icosahedron is built from the golden ratio and projected onto the
//! unit sphere. Level `L` refines every face `L + 1` times, so even level 0
//! is already one subdivision past the bare icosahedron. Each of the 20 base
//! faces is refined through an explicit worklist of `(triangle, depth)` pairs. As soon as the subdivision left for a pending
//! triangle is within the leaf depth, the triangle and its entire subtree are
//! sealed into one [`SubMesh`], so a leaf never holds more than
//! `4^leaf_depth` faces whatever the overall level.

use glam::Vec3;
use tracing::debug;

use crate::{
    Adjacency, BuildError, MidpointCache, SubMesh, VertexId, VertexStore, check_manifold,
    check_winding,
};

/// Subdivisions sealed into a single sub-mesh unless configured otherwise.
pub const DEFAULT_LEAF_DEPTH: u32 = 4;

/// Largest leaf depth. `4^6 = 4096` faces per leaf keeps local indices far
/// inside their packed 16 bits.
pub const MAX_LEAF_DEPTH: u32 = 6;

/// Largest accepted recursion level (about 5.2M faces).
pub const MAX_RECURSION_LEVEL: u32 = 8;

/// Midpoint passes applied at a recursion level.
pub const fn subdivision_passes(level: u32) -> u32 {
    level + 1
}

/// Vertices at a recursion level: `5 · 2^(2L+3) + 2`.
pub fn expected_vertex_count(level: u32) -> usize {
    5 * 2usize.pow(2 * level + 3) + 2
}

/// Faces at a recursion level: `20 · 4^(L+1)`.
pub fn expected_face_count(level: u32) -> usize {
    20 * 4usize.pow(subdivision_passes(level))
}

const BASE_FACES: [[u32; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

fn base_vertices() -> [Vec3; 12] {
    let t = (1.0 + 5f32.sqrt()) / 2.0;
    [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ]
    .map(Vec3::normalize)
}

/// Size summary of a built icosphere, used for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IcosphereStats {
    pub recursion_level: u32,
    pub vertices: usize,
    pub faces: usize,
    pub sub_meshes: usize,
    pub max_sub_mesh_faces: usize,
}

/// Configures and runs an icosphere build.
#[derive(Clone, Copy, Debug)]
pub struct IcosphereBuilder {
    recursion_level: u32,
    leaf_depth: u32,
}

impl IcosphereBuilder {
    pub fn new(recursion_level: u32) -> Self {
        Self {
            recursion_level,
            leaf_depth: DEFAULT_LEAF_DEPTH,
        }
    }

    pub fn with_leaf_depth(mut self, leaf_depth: u32) -> Self {
        self.leaf_depth = leaf_depth;
        self
    }

    /// Build the subdivided icosphere.
    ///
    /// Runs on the calling thread: the midpoint cache has to see sibling
    /// branches in a fixed order to deduplicate shared edges.
    ///
    /// # Errors
    ///
    /// Any violated build invariant aborts the whole build; see
    /// [`BuildError`].
    pub fn build(self) -> Result<Icosphere, BuildError> {
        let level = self.recursion_level;
        if level > MAX_RECURSION_LEVEL {
            return Err(BuildError::LevelTooDeep {
                level,
                max: MAX_RECURSION_LEVEL,
            });
        }
        if self.leaf_depth > MAX_LEAF_DEPTH {
            return Err(BuildError::LeafDepthTooDeep {
                depth: self.leaf_depth,
                max: MAX_LEAF_DEPTH,
            });
        }

        let passes = subdivision_passes(level);
        let expected_vertices = expected_vertex_count(level);
        let mut vertices = VertexStore::with_capacity(expected_vertices);
        for p in base_vertices() {
            vertices.push(p);
        }
        let mut cache = MidpointCache::with_capacity(expected_vertices - 12);

        // Reversed so that base face 0 is popped (and sealed) first.
        let mut pending: Vec<([VertexId; 3], u32)> = BASE_FACES
            .iter()
            .rev()
            .map(|f| (f.map(VertexId), 0))
            .collect();

        let mut leaves: Vec<Vec<[VertexId; 3]>> = Vec::new();
        while let Some((tri, depth)) = pending.pop() {
            let remaining = passes - depth;
            if remaining <= self.leaf_depth {
                leaves.push(refine(tri, remaining, &mut cache, &mut vertices)?);
                continue;
            }
            let children = split(tri, &mut cache, &mut vertices)?;
            for child in children.into_iter().rev() {
                pending.push((child, depth + 1));
            }
        }
        debug!(
            level,
            passes,
            leaf_depth = self.leaf_depth,
            vertices = vertices.len(),
            midpoints = cache.len(),
            leaves = leaves.len(),
            "Subdivision finished"
        );
        drop(cache);

        if vertices.len() != expected_vertices {
            return Err(BuildError::VertexCountMismatch {
                expected: expected_vertices,
                actual: vertices.len(),
            });
        }

        let mut sub_meshes = Vec::with_capacity(leaves.len());
        for (id, triangles) in leaves.into_iter().enumerate() {
            sub_meshes.push(SubMesh::new(id as u32, triangles, &vertices)?);
        }

        let mut adjacency = Adjacency::with_vertices(vertices.len());
        for sub in &sub_meshes {
            for (face, corners) in sub.face_ids().zip(sub.triangles().iter().copied()) {
                adjacency.record_face(face, corners)?;
            }
        }

        check_manifold(&sub_meshes)?;
        check_winding(&sub_meshes, &vertices)?;
        adjacency.validate()?;

        let icosphere = Icosphere {
            vertices,
            adjacency,
            sub_meshes,
            recursion_level: level,
        };
        debug!(stats = ?icosphere.stats(), "Icosphere validated");
        Ok(icosphere)
    }
}

/// Replace one triangle by its four children: three corner triangles and the
/// centre, all keeping the parent's winding.
fn split(
    [v0, v1, v2]: [VertexId; 3],
    cache: &mut MidpointCache,
    vertices: &mut VertexStore,
) -> Result<[[VertexId; 3]; 4], BuildError> {
    let m01 = cache.midpoint(v0, v1, vertices)?;
    let m12 = cache.midpoint(v1, v2, vertices)?;
    let m20 = cache.midpoint(v2, v0, vertices)?;
    Ok([
        [v0, m01, m20],
        [v1, m12, m01],
        [v2, m20, m12],
        [m01, m12, m20],
    ])
}

/// Subdivide `tri` exactly `levels` times, breadth first.
fn refine(
    tri: [VertexId; 3],
    levels: u32,
    cache: &mut MidpointCache,
    vertices: &mut VertexStore,
) -> Result<Vec<[VertexId; 3]>, BuildError> {
    let mut current = vec![tri];
    for _ in 0..levels {
        let mut next = Vec::with_capacity(current.len() * 4);
        for t in current {
            next.extend(split(t, cache, vertices)?);
        }
        current = next;
    }
    Ok(current)
}

/// A validated, subdivided icosphere on the unit sphere.
#[derive(Clone, Debug)]
pub struct Icosphere {
    vertices: VertexStore,
    adjacency: Adjacency,
    sub_meshes: Vec<SubMesh>,
    recursion_level: u32,
}

impl Icosphere {
    /// Build with the default leaf depth.
    pub fn build(recursion_level: u32) -> Result<Self, BuildError> {
        IcosphereBuilder::new(recursion_level).build()
    }

    pub fn vertices(&self) -> &VertexStore {
        &self.vertices
    }

    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    pub fn sub_meshes(&self) -> &[SubMesh] {
        &self.sub_meshes
    }

    pub fn recursion_level(&self) -> u32 {
        self.recursion_level
    }

    pub fn face_count(&self) -> usize {
        self.sub_meshes.iter().map(SubMesh::len).sum()
    }

    pub fn stats(&self) -> IcosphereStats {
        IcosphereStats {
            recursion_level: self.recursion_level,
            vertices: self.vertices.len(),
            faces: self.face_count(),
            sub_meshes: self.sub_meshes.len(),
            max_sub_mesh_faces: self.sub_meshes.iter().map(SubMesh::len).max().unwrap_or(0),
        }
    }

    /// Hand the arenas over to an owner that will mutate vertex data.
    pub fn into_parts(self) -> (VertexStore, Adjacency, Vec<SubMesh>) {
        (self.vertices, self.adjacency, self.sub_meshes)
    }
}
