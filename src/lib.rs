pub mod terrain;

pub use terrain::{
    EdgeMode,
    FoldPolicy,
    HeightField,
    Mesh,
    MeshStyle,
    TerrainConfig,
    TerrainError,
    TerrainMesher,
};
