pub mod config;
pub mod coords;
pub mod error;
pub mod generator;
pub mod material;
pub mod mesh;

pub use config::{EdgeMode, FoldPolicy, MeshStyle, TerrainConfig};
pub use error::TerrainError;
pub use generator::{HeightField, TerrainMesher};
pub use mesh::Mesh;
