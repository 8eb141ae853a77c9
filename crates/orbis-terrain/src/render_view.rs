//! GPU-ready vertex and index buffers for a finished terrain.
//!
//! Uploading is the renderer's job; this module only lays the data out.

use orbis_mesh::{SubMesh, VertexStore};

use crate::palette::Rgba8;

/// One terrain vertex as uploaded to the GPU.
///
/// Layout (28 bytes total):
///   - `[0..12]`  position `[f32; 3]`
///   - `[12..24]` normal `[f32; 3]`
///   - `[24..28]` color `[u8; 4]` (RGBA8)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: Rgba8,
}

static_assertions::assert_eq_size!(TerrainVertex, [u8; 28]);

/// Where a sub-mesh's triangles live in the shared index buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubMeshRange {
    pub sub_mesh: u32,
    pub first_index: u32,
    pub index_count: u32,
}

/// Interleave positions, normals, and colours.
///
/// `colors` shorter than the store leaves the remaining vertices black.
pub fn vertex_buffer(vertices: &VertexStore, colors: &[Rgba8]) -> Vec<TerrainVertex> {
    vertices
        .positions()
        .iter()
        .zip(vertices.normals())
        .enumerate()
        .map(|(i, (p, n))| TerrainVertex {
            position: p.to_array(),
            normal: n.to_array(),
            color: colors.get(i).copied().unwrap_or([0, 0, 0, 255]),
        })
        .collect()
}

/// Concatenate every sub-mesh's triangle list into one index buffer.
pub fn index_buffer(sub_meshes: &[SubMesh]) -> (Vec<u32>, Vec<SubMeshRange>) {
    let total: usize = sub_meshes.iter().map(|s| s.len() * 3).sum();
    let mut indices = Vec::with_capacity(total);
    let mut ranges = Vec::with_capacity(sub_meshes.len());
    for sub in sub_meshes {
        let first_index = indices.len() as u32;
        indices.extend(sub.indices());
        ranges.push(SubMeshRange {
            sub_mesh: sub.id(),
            first_index,
            index_count: indices.len() as u32 - first_index,
        });
    }
    (indices, ranges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbis_mesh::Icosphere;

    #[test]
    fn test_vertex_size_is_28_bytes() {
        assert_eq!(std::mem::size_of::<TerrainVertex>(), 28);
    }

    #[test]
    fn test_vertex_bytes_zero_copy() {
        let v = TerrainVertex {
            position: [1.0, 0.0, 0.0],
            normal: [1.0, 0.0, 0.0],
            color: [10, 20, 30, 255],
        };
        let bytes: &[u8] = bytemuck::bytes_of(&v);
        assert_eq!(bytes.len(), 28);
        assert_eq!(&bytes[24..28], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_buffers_cover_whole_sphere() {
        let sphere = Icosphere::build(2).unwrap();
        let colors = vec![[1, 2, 3, 4]; sphere.vertices().len()];
        let verts = vertex_buffer(sphere.vertices(), &colors);
        assert_eq!(verts.len(), sphere.vertices().len());
        assert!(verts.iter().all(|v| v.color == [1, 2, 3, 4]));

        let (indices, ranges) = index_buffer(sphere.sub_meshes());
        assert_eq!(indices.len(), sphere.face_count() * 3);
        assert!(indices.iter().all(|&i| (i as usize) < verts.len()));
        assert_eq!(ranges.len(), sphere.sub_meshes().len());
        let mut expected_first = 0;
        for range in &ranges {
            assert_eq!(range.first_index, expected_first);
            expected_first += range.index_count;
        }
        assert_eq!(expected_first as usize, indices.len());
    }
}
