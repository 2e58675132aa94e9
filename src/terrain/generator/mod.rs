mod cell;
mod cell_info;
mod face;
mod heightmap;
mod mesh;
mod walls;

pub use cell::CellGeometryBuilder;
pub use cell_info::{
    classify_corner,
    CellMeshInfo,
    CornerComponent,
    CornerSlope,
    NeighborInfo,
    SideComponent,
    SideSlope,
};
pub use face::{Face, FaceKind};
pub use heightmap::{
    HeightField,
    HeightmapGenerator,
    NoiseSource,
    StackedPerlin,
};
pub use mesh::TerrainMesher;
pub use walls::{edge_walls, wall_bands, EdgeProfile, ProfileSegment};

#[cfg(test)]
mod tests;
