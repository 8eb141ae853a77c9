//! Per-vertex face and neighbour tables with a hard valence cap.

use std::fmt;

use crate::{BuildError, FaceId, VertexId};

/// Maximum number of faces (and neighbours) around any vertex of a
/// subdivided icosahedron.
pub const MAX_VALENCE: usize = 6;

/// Which adjacency table overflowed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AdjacencyKind {
    Face,
    Neighbor,
}

impl fmt::Display for AdjacencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdjacencyKind::Face => f.write_str("face"),
            AdjacencyKind::Neighbor => f.write_str("neighbour"),
        }
    }
}

/// Inline list of at most [`MAX_VALENCE`] entries. Never allocates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValenceList<T> {
    items: [T; MAX_VALENCE],
    len: u8,
}

impl<T: Copy + Default> Default for ValenceList<T> {
    fn default() -> Self {
        Self {
            items: [T::default(); MAX_VALENCE],
            len: 0,
        }
    }
}

impl<T: Copy + Default + PartialEq> ValenceList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Returns the entry back if the list is full.
    pub fn push(&mut self, item: T) -> Result<(), T> {
        let len = self.len as usize;
        if len == MAX_VALENCE {
            return Err(item);
        }
        self.items[len] = item;
        self.len += 1;
        Ok(())
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, item: &T) -> bool {
        self.as_slice().contains(item)
    }
}

/// Face and neighbour adjacency for every vertex in a store.
#[derive(Clone, Debug, Default)]
pub struct Adjacency {
    faces: Vec<ValenceList<FaceId>>,
    neighbors: Vec<ValenceList<VertexId>>,
}

impl Adjacency {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vertices(count: usize) -> Self {
        Self {
            faces: vec![ValenceList::new(); count],
            neighbors: vec![ValenceList::new(); count],
        }
    }

    /// Grow the tables to cover `count` vertices.
    pub fn ensure_len(&mut self, count: usize) {
        if self.faces.len() < count {
            self.faces.resize(count, ValenceList::new());
            self.neighbors.resize(count, ValenceList::new());
        }
    }

    /// Number of vertices covered.
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Register a finished triangle: the face goes into each corner's face
    /// list and each edge goes into both endpoints' neighbour lists (once).
    ///
    /// # Errors
    ///
    /// [`BuildError::AdjacencyOverflow`] if a seventh entry would be added,
    /// [`BuildError::VertexOutOfRange`] for a corner the tables do not cover.
    pub fn record_face(&mut self, face: FaceId, corners: [VertexId; 3]) -> Result<(), BuildError> {
        for &v in &corners {
            if v.index() >= self.faces.len() {
                return Err(BuildError::VertexOutOfRange {
                    vertex: v,
                    len: self.faces.len(),
                });
            }
        }

        for &v in &corners {
            self.faces[v.index()]
                .push(face)
                .map_err(|_| BuildError::AdjacencyOverflow {
                    vertex: v,
                    kind: AdjacencyKind::Face,
                })?;
        }

        for i in 0..3 {
            let a = corners[i];
            let b = corners[(i + 1) % 3];
            self.link(a, b)?;
            self.link(b, a)?;
        }
        Ok(())
    }

    fn link(&mut self, from: VertexId, to: VertexId) -> Result<(), BuildError> {
        let list = &mut self.neighbors[from.index()];
        if list.contains(&to) {
            return Ok(());
        }
        list.push(to).map_err(|_| BuildError::AdjacencyOverflow {
            vertex: from,
            kind: AdjacencyKind::Neighbor,
        })
    }

    /// Faces incident to `vertex` (empty for an unknown vertex).
    pub fn faces_of(&self, vertex: VertexId) -> &[FaceId] {
        self.faces
            .get(vertex.index())
            .map_or(&[], ValenceList::as_slice)
    }

    pub fn neighbors_of(&self, vertex: VertexId) -> &[VertexId] {
        self.neighbors
            .get(vertex.index())
            .map_or(&[], ValenceList::as_slice)
    }

    /// Number of faces around `vertex`.
    pub fn degree(&self, vertex: VertexId) -> usize {
        self.faces_of(vertex).len()
    }

    /// Check that every vertex has 5 or 6 faces and as many neighbours as
    /// faces (a closed fan).
    pub fn validate(&self) -> Result<(), BuildError> {
        for (i, (faces, neighbors)) in self.faces.iter().zip(&self.neighbors).enumerate() {
            let vertex = VertexId(i as u32);
            if !(5..=MAX_VALENCE).contains(&faces.len()) {
                return Err(BuildError::InvalidDegree {
                    vertex,
                    degree: faces.len(),
                });
            }
            if faces.len() != neighbors.len() {
                return Err(BuildError::AdjacencyMismatch {
                    vertex,
                    faces: faces.len(),
                    neighbors: neighbors.len(),
                });
            }
        }
        Ok(())
    }
}
