//! Icosphere topology: vertex arena, edge-midpoint deduplication, per-vertex
//! adjacency, and the builder that partitions a subdivided icosahedron into
//! independently bounded sub-meshes.

mod adjacency;
mod error;
mod face_id;
mod icosphere;
mod midpoint;
mod sub_mesh;
mod validate;
mod vertex;

pub use adjacency::{Adjacency, AdjacencyKind, MAX_VALENCE, ValenceList};
pub use error::BuildError;
pub use face_id::{FaceId, LOCAL_INDEX_BITS, MAX_LOCAL_FACES};
pub use icosphere::{
    DEFAULT_LEAF_DEPTH, Icosphere, IcosphereBuilder, IcosphereStats, MAX_LEAF_DEPTH,
    MAX_RECURSION_LEVEL, expected_face_count, expected_vertex_count, subdivision_passes,
};
pub use midpoint::MidpointCache;
pub use sub_mesh::SubMesh;
pub use validate::{check_manifold, check_winding, triangle_winds_outward};
pub use vertex::{Classification, VertexId, VertexStore};
