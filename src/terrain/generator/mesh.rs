use log::{debug, info, trace};
use nalgebra::{Vector2, Vector3};
use rayon::prelude::*;

use crate::terrain::{
    config::{HeightfieldConfig, MeshConfig, MeshStyle, TerrainConfig},
    coords::{GridCoords, CELL_RADIUS},
    error::TerrainError,
    generator::{
        cell::CellGeometryBuilder,
        cell_info::NeighborInfo,
        face::{Face, FaceKind},
        heightmap::{HeightField, HeightmapGenerator},
    },
    material::{MaterialClassifier, TextureAtlas},
    mesh::{Mesh, MeshAssembler},
};

const LAND_TINT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Owns a heightfield and turns it into terrain and water meshes.
pub struct TerrainMesher {
    heightfield: HeightField,
    heightfield_config: HeightfieldConfig,
    config: MeshConfig,
    builder: CellGeometryBuilder,
    classifier: MaterialClassifier,
    atlas: TextureAtlas,
}

impl TerrainMesher {
    pub fn generate(config: &TerrainConfig) -> Result<Self, TerrainError> {
        config.validate()?;
        let heightfield =
            HeightmapGenerator::new(config.heightfield.clone()).generate(config.size)?;
        Ok(Self::assemble(heightfield, config.heightfield.clone(), config.mesh.clone()))
    }

    /// Wraps an existing heightfield. The noise settings used by
    /// [`TerrainMesher::regenerate`] are the defaults, since the field
    /// carries none of its own.
    pub fn from_heightfield(heightfield: HeightField, config: MeshConfig) -> Result<Self, TerrainError> {
        config.validate()?;
        Ok(Self::assemble(heightfield, HeightfieldConfig::default(), config))
    }

    fn assemble(heightfield: HeightField, heightfield_config: HeightfieldConfig, config: MeshConfig) -> Self {
        Self {
            heightfield,
            heightfield_config,
            builder: CellGeometryBuilder::new(&config),
            classifier: MaterialClassifier::new(config.steep_threshold),
            atlas: TextureAtlas::default(),
            config,
        }
    }

    pub fn heightfield(&self) -> &HeightField {
        &self.heightfield
    }

    pub fn config(&self) -> &MeshConfig {
        &self.config
    }

    /// Meshes with the style from the mesh config.
    pub fn mesh(&self) -> Mesh {
        self.mesh_terrain(self.config.style)
    }

    pub fn mesh_terrain(&self, style: MeshStyle) -> Mesh {
        let n = self.heightfield.size() as i32;
        let mut assembler = MeshAssembler::new(LAND_TINT);
        let mut faces = 0;
        for i in 0..n {
            for j in 0..n {
                faces += self.add_cell(&mut assembler, GridCoords::new(i, j), style);
            }
        }
        let mesh = assembler.build();
        self.log_mesh(style, faces, &mesh);
        mesh
    }

    /// Looks the style up by name before touching any cell.
    pub fn mesh_terrain_named(&self, style: &str) -> Result<Mesh, TerrainError> {
        let style: MeshStyle = style.parse()?;
        Ok(self.mesh_terrain(style))
    }

    /// Meshes rows on the rayon pool and joins them in row order, giving the
    /// same buffers as [`TerrainMesher::mesh_terrain`].
    pub fn mesh_terrain_parallel(&self, style: MeshStyle) -> Mesh {
        let n = self.heightfield.size() as i32;
        let rows: Vec<(usize, Mesh)> = (0..n)
            .into_par_iter()
            .map(|i| {
                let mut assembler = MeshAssembler::new(LAND_TINT);
                let faces = (0..n)
                    .map(|j| self.add_cell(&mut assembler, GridCoords::new(i, j), style))
                    .sum::<usize>();
                (faces, assembler.build())
            })
            .collect();

        let faces: usize = rows.iter().map(|(f, _)| f).sum();
        let mesh = Mesh::concat(rows.into_iter().map(|(_, m)| m));
        self.log_mesh(style, faces, &mesh);
        mesh
    }

    fn add_cell(&self, assembler: &mut MeshAssembler, cell: GridCoords, style: MeshStyle) -> usize {
        let Some(info) = NeighborInfo::gather(&self.heightfield, cell) else {
            return 0;
        };
        let center = self.heightfield.grid_to_world(cell.i, cell.j);
        let faces = self.builder.build(style, center, &info);
        trace!("Cell ({}, {}) at level {}: {} faces", cell.i, cell.j, info.level, faces.len());
        for face in &faces {
            assembler.add_face(face, &self.atlas);
        }
        faces.len()
    }

    fn log_mesh(&self, style: MeshStyle, faces: usize, mesh: &Mesh) {
        debug!("{style} style emitted {faces} faces");
        info!(
            "Meshed {n}x{n} terrain ({style}): {} vertices, {} triangles",
            mesh.vertex_count(),
            mesh.triangle_count(),
            n = self.heightfield.size()
        );
    }

    /// Faces of a single cell, as they appear in the terrain mesh.
    pub fn cell_faces(&self, i: i32, j: i32, style: MeshStyle) -> Result<Vec<Face>, TerrainError> {
        let info = NeighborInfo::gather(&self.heightfield, GridCoords::new(i, j)).ok_or(
            TerrainError::OutOfBounds { i, j, size: self.heightfield.size() },
        )?;
        let center = self.heightfield.grid_to_world(i, j);
        Ok(self.builder.build(style, center, &info))
    }

    /// One flat quad per water cell at the configured water elevation.
    pub fn mesh_water(&self) -> Mesh {
        let n = self.heightfield.size() as i32;
        let mut assembler = MeshAssembler::new([1.0, 1.0, 1.0, self.config.water_alpha]);
        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
        let mut cells = 0;
        for i in 0..n {
            for j in 0..n {
                let Some(level) = self.heightfield.level(i, j).filter(|&k| k < 0) else {
                    continue;
                };
                let center = self.heightfield.grid_to_world(i, j);
                let verts = corners
                    .iter()
                    .map(|&(sx, sy)| {
                        let p = center + Vector2::new(sx, sy) * CELL_RADIUS;
                        Vector3::new(p.x, p.y, self.config.water_elevation)
                    })
                    .collect();
                let uvs = corners
                    .iter()
                    .map(|&(sx, sy)| Vector2::new((sx + 1.0) * 0.5, (sy + 1.0) * 0.5))
                    .collect();
                let face = Face::polygon(FaceKind::Water, verts, uvs)
                    .with_material(self.classifier.water_material(level));
                assembler.add_face(&face, &self.atlas);
                cells += 1;
            }
        }
        let mesh = assembler.build();
        info!("Meshed {cells} water cells at z = {}", self.config.water_elevation);
        mesh
    }

    pub fn height_at_world(&self, x: f32, y: f32) -> Result<f32, TerrainError> {
        self.heightfield.height_at_world(x, y)
    }

    /// Replaces the heightfield with a fresh one of the given size, using
    /// the heightfield settings this mesher was created with. A mesher built
    /// by [`TerrainMesher::from_heightfield`] regenerates from
    /// `HeightfieldConfig::default()`.
    pub fn regenerate(&mut self, size: usize) -> Result<(), TerrainError> {
        let heightfield = HeightmapGenerator::new(self.heightfield_config.clone()).generate(size)?;
        info!("Regenerated terrain at {size}x{size}");
        self.heightfield = heightfield;
        Ok(())
    }
}
