//! Composite face identifiers.
//!
//! In memory a face is always named by the explicit pair
//! `(sub_mesh, local)`. The packed `u32` form only exists for persistence.

use std::fmt;

use crate::BuildError;

/// Bits reserved for the local face index in the packed form.
pub const LOCAL_INDEX_BITS: u32 = 16;

/// Exclusive upper bound on local face indices that can be packed.
pub const MAX_LOCAL_FACES: u32 = 1 << LOCAL_INDEX_BITS;

const SUB_MESH_LIMIT: u32 = 1 << (32 - LOCAL_INDEX_BITS);

/// A triangle named by its sub-mesh and its index within that sub-mesh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId {
    pub sub_mesh: u32,
    pub local: u32,
}

impl FaceId {
    pub const fn new(sub_mesh: u32, local: u32) -> Self {
        Self { sub_mesh, local }
    }

    /// True if both fields fit the packed bit-widths.
    pub const fn is_packable(self) -> bool {
        self.local < MAX_LOCAL_FACES && self.sub_mesh < SUB_MESH_LIMIT
    }

    /// Pack into `[sub_mesh:16][local:16]`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::FaceIndexOverflow`] instead of truncating when a
    /// field does not fit.
    pub fn pack(self) -> Result<u32, BuildError> {
        if !self.is_packable() {
            return Err(BuildError::FaceIndexOverflow {
                sub_mesh: self.sub_mesh,
                local: self.local,
            });
        }
        Ok((self.sub_mesh << LOCAL_INDEX_BITS) | self.local)
    }

    pub const fn unpack(packed: u32) -> Self {
        Self {
            sub_mesh: packed >> LOCAL_INDEX_BITS,
            local: packed & (MAX_LOCAL_FACES - 1),
        }
    }
}

impl fmt::Display for FaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.sub_mesh, self.local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_unpack() {
        let id = FaceId::new(1234, 255);
        let packed = id.pack().unwrap();
        assert_eq!(packed, (1234 << 16) | 255);
        assert_eq!(FaceId::unpack(packed), id);
    }

    #[test]
    fn test_pack_extremes() {
        let id = FaceId::new(SUB_MESH_LIMIT - 1, MAX_LOCAL_FACES - 1);
        assert_eq!(id.pack().unwrap(), u32::MAX);
        assert_eq!(FaceId::unpack(u32::MAX), id);
    }

    #[test]
    fn test_local_overflow_is_error() {
        let id = FaceId::new(0, MAX_LOCAL_FACES);
        assert!(!id.is_packable());
        assert_eq!(
            id.pack(),
            Err(BuildError::FaceIndexOverflow {
                sub_mesh: 0,
                local: MAX_LOCAL_FACES
            })
        );
    }

    #[test]
    fn test_sub_mesh_overflow_is_error() {
        assert!(FaceId::new(SUB_MESH_LIMIT, 0).pack().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(FaceId::new(3, 17).to_string(), "3:17");
    }
}
