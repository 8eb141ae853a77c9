//! Planet terrain on a subdivided icosphere: fault-voting relief, smoothing,
//! vertex normals and colours, ray queries, and snapshot persistence.

mod error;
mod normals;
mod render_view;
mod smoothing;
mod terrain;

pub mod palette;
pub mod relief;
pub mod seed;
pub mod snapshot;

pub use error::{ReliefError, TerrainError};
pub use normals::compute_normals;
pub use palette::{Palette, Rgba8};
pub use relief::{CuttingPlane, ReliefParams, ReliefSummary};
pub use render_view::{SubMeshRange, TerrainVertex, index_buffer, vertex_buffer};
pub use smoothing::smooth;
pub use snapshot::{SnapshotError, TerrainSnapshot};
pub use terrain::{Terrain, TerrainHit, TerrainParams};
