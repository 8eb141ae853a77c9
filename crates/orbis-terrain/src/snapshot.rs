//! Verbatim persistence of a built terrain as RON.
//!
//! Face identifiers are packed into single `u32`s here and nowhere else.
//! Loading never trusts the file: sub-meshes are re-bounded, adjacency is
//! rebuilt from the triangles and compared with the stored table, and the
//! usual manifold and winding checks run again.

use std::path::Path;

use glam::Vec3;
use orbis_mesh::{
    Adjacency, BuildError, Classification, FaceId, SubMesh, VertexId, VertexStore,
    check_manifold, check_winding,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::Terrain;
use crate::palette::Palette;

/// Errors while saving or restoring a terrain.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot: {0}")]
    ReadError(#[source] std::io::Error),

    #[error("failed to write snapshot: {0}")]
    WriteError(#[source] std::io::Error),

    #[error("failed to parse snapshot: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    #[error("failed to serialize snapshot: {0}")]
    SerializeError(#[source] ron::Error),

    #[error("snapshot holds an invalid mesh: {0}")]
    Invalid(#[from] BuildError),

    #[error("snapshot is inconsistent: {0}")]
    Inconsistent(String),
}

/// Raw arrays of a terrain, as written to disk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainSnapshot {
    pub recursion_level: u32,
    pub polar_cap: f32,
    pub land_height: f32,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub classifications: Vec<Classification>,
    /// Triangle lists, indexed by sub-mesh id.
    pub sub_meshes: Vec<Vec<[u32; 3]>>,
    /// Packed face ids around each vertex.
    pub vertex_faces: Vec<Vec<u32>>,
}

impl Terrain {
    /// Capture the terrain's arrays.
    ///
    /// # Errors
    ///
    /// Fails if a face id does not fit the packed representation.
    pub fn to_snapshot(&self) -> Result<TerrainSnapshot, SnapshotError> {
        let vertices = self.vertices();
        let adjacency = self.adjacency();
        let vertex_faces = (0..vertices.len())
            .map(|i| {
                adjacency
                    .faces_of(VertexId(i as u32))
                    .iter()
                    .map(|f| f.pack())
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TerrainSnapshot {
            recursion_level: self.recursion_level(),
            polar_cap: self.palette().polar_cap,
            land_height: self.palette().land_height,
            positions: vertices.positions().iter().map(|p| p.to_array()).collect(),
            normals: vertices.normals().iter().map(|n| n.to_array()).collect(),
            classifications: vertices.classifications().to_vec(),
            sub_meshes: self
                .sub_meshes()
                .iter()
                .map(|s| s.triangles().iter().map(|t| t.map(|v| v.0)).collect())
                .collect(),
            vertex_faces,
        })
    }

    /// Rebuild and re-validate a terrain from a snapshot.
    pub fn from_snapshot(snapshot: TerrainSnapshot) -> Result<Self, SnapshotError> {
        let TerrainSnapshot {
            recursion_level,
            polar_cap,
            land_height,
            positions,
            normals,
            classifications,
            sub_meshes,
            vertex_faces,
        } = snapshot;

        let vertex_count = positions.len();
        let vertices = VertexStore::from_parts(
            positions.into_iter().map(Vec3::from_array).collect(),
            normals.into_iter().map(Vec3::from_array).collect(),
            classifications,
        )
        .ok_or_else(|| {
            SnapshotError::Inconsistent("vertex arrays have different lengths".to_string())
        })?;
        if vertex_faces.len() != vertex_count {
            return Err(SnapshotError::Inconsistent(format!(
                "{} adjacency entries for {vertex_count} vertices",
                vertex_faces.len()
            )));
        }

        let sub_meshes = sub_meshes
            .into_iter()
            .enumerate()
            .map(|(id, tris)| {
                let tris = tris.into_iter().map(|t| t.map(VertexId)).collect();
                SubMesh::new(id as u32, tris, &vertices)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut adjacency = Adjacency::with_vertices(vertex_count);
        for sub in &sub_meshes {
            for (face, corners) in sub.face_ids().zip(sub.triangles().iter().copied()) {
                adjacency.record_face(face, corners)?;
            }
        }
        for (i, stored) in vertex_faces.iter().enumerate() {
            let mut stored: Vec<FaceId> = stored.iter().map(|&p| FaceId::unpack(p)).collect();
            let mut rebuilt = adjacency.faces_of(VertexId(i as u32)).to_vec();
            stored.sort();
            rebuilt.sort();
            if stored != rebuilt {
                return Err(SnapshotError::Inconsistent(format!(
                    "face adjacency of v{i} does not match its triangles"
                )));
            }
        }
        adjacency.validate()?;
        check_manifold(&sub_meshes)?;
        check_winding(&sub_meshes, &vertices)?;

        let palette = Palette {
            polar_cap,
            land_height,
        };
        let mut terrain =
            Terrain::from_parts(vertices, adjacency, sub_meshes, palette, recursion_level);
        terrain.finish()?;
        Ok(terrain)
    }
}

/// Write a snapshot to `path` as pretty RON, creating parent directories.
pub fn save(path: &Path, snapshot: &TerrainSnapshot) -> Result<(), SnapshotError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(SnapshotError::WriteError)?;
    }
    let pretty = ron::ser::PrettyConfig::new()
        .depth_limit(2)
        .enumerate_arrays(false);
    let serialized =
        ron::ser::to_string_pretty(snapshot, pretty).map_err(SnapshotError::SerializeError)?;
    std::fs::write(path, serialized).map_err(SnapshotError::WriteError)?;
    info!(path = %path.display(), vertices = snapshot.positions.len(), "Saved terrain snapshot");
    Ok(())
}

pub fn load(path: &Path) -> Result<TerrainSnapshot, SnapshotError> {
    let contents = std::fs::read_to_string(path).map_err(SnapshotError::ReadError)?;
    let snapshot: TerrainSnapshot = ron::from_str(&contents).map_err(SnapshotError::ParseError)?;
    info!(path = %path.display(), "Loaded terrain snapshot");
    Ok(snapshot)
}
