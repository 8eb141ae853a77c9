//! Build-time invariant violations.
//!
//! Every variant means the construction algorithm (or data fed back into it
//! from a snapshot) is corrupt. None of them is recoverable: the build is
//! abandoned and no partially valid mesh is returned.

use crate::{AdjacencyKind, FaceId, VertexId};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    /// A vertex would exceed the maximum valence of 6.
    #[error("vertex {vertex} already has 6 {kind} entries")]
    AdjacencyOverflow {
        vertex: VertexId,
        kind: AdjacencyKind,
    },

    /// A face has parallel edge vectors.
    #[error("face {face} is degenerate")]
    DegenerateFace { face: FaceId },

    /// A face normal points towards the sphere center.
    #[error("face {face} is wound inward")]
    InwardFace { face: FaceId },

    /// The midpoint cache was asked for an impossible edge.
    #[error("midpoint cache inconsistency on edge ({a}, {b})")]
    MidpointCache { a: VertexId, b: VertexId },

    /// The number of generated vertices does not match the closed form.
    #[error("expected {expected} vertices, generated {actual}")]
    VertexCountMismatch { expected: usize, actual: usize },

    /// A triangle references a vertex outside the arena.
    #[error("vertex {vertex} is out of range (arena holds {len})")]
    VertexOutOfRange { vertex: VertexId, len: usize },

    /// A face identifier field does not fit its packed bit-width.
    #[error("face id {sub_mesh}:{local} does not fit the packed representation")]
    FaceIndexOverflow { sub_mesh: u32, local: u32 },

    /// A vertex has a face count outside {5, 6}.
    #[error("vertex {vertex} has degree {degree}, expected 5 or 6")]
    InvalidDegree { vertex: VertexId, degree: usize },

    /// Face and neighbour tables disagree for a vertex.
    #[error("vertex {vertex} has {faces} faces but {neighbors} neighbours")]
    AdjacencyMismatch {
        vertex: VertexId,
        faces: usize,
        neighbors: usize,
    },

    /// An edge is not shared by exactly two faces.
    #[error("edge ({a}, {b}) is used by {faces} faces")]
    NonManifoldEdge {
        a: VertexId,
        b: VertexId,
        faces: u32,
    },

    /// A sub-mesh has no points to bound.
    #[error("sub-mesh {sub_mesh} has no vertices to bound")]
    EmptyBounds { sub_mesh: u32 },

    #[error("recursion level {level} exceeds the maximum of {max}")]
    LevelTooDeep { level: u32, max: u32 },

    #[error("leaf depth {depth} exceeds the maximum of {max}")]
    LeafDepthTooDeep { depth: u32, max: u32 },
}
