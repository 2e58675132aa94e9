// src/terrain/mesh.rs

use nalgebra::Vector3;

use crate::terrain::{
    coords::MaterialId,
    generator::Face,
    material::TextureAtlas,
};

/// Flat render buffers handed to the rendering collaborator.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<f32>,
    pub normals: Vec<f32>,
    pub colors: Vec<f32>,
    pub uvs: Vec<f32>,
    pub indices: Vec<u32>,
    pub materials: Vec<MaterialId>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn position(&self, index: usize) -> Vector3<f32> {
        Vector3::new(
            self.vertices[index * 3],
            self.vertices[index * 3 + 1],
            self.vertices[index * 3 + 2],
        )
    }

    pub fn normal(&self, index: usize) -> Vector3<f32> {
        Vector3::new(
            self.normals[index * 3],
            self.normals[index * 3 + 1],
            self.normals[index * 3 + 2],
        )
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Appends `other`, re-basing its indices past this mesh's vertices.
    pub fn append(&mut self, other: Mesh) {
        let base = self.vertex_count() as u32;
        self.vertices.extend(other.vertices);
        self.normals.extend(other.normals);
        self.colors.extend(other.colors);
        self.uvs.extend(other.uvs);
        self.materials.extend(other.materials);
        self.indices.extend(other.indices.into_iter().map(|i| i + base));
    }

    /// Concatenates meshes in iteration order.
    pub fn concat(parts: impl IntoIterator<Item = Mesh>) -> Mesh {
        parts.into_iter().fold(Mesh::default(), |mut acc, part| {
            acc.append(part);
            acc
        })
    }
}

/// Accumulates faces into one [`Mesh`]. Every face contributes fresh
/// vertices; coincident vertices are never merged.
pub struct MeshAssembler {
    tint: [f32; 4],
    mesh: Mesh,
}

impl MeshAssembler {
    pub fn new(tint: [f32; 4]) -> Self {
        Self { tint, mesh: Mesh::default() }
    }

    pub fn add_face(&mut self, face: &Face, atlas: &TextureAtlas) {
        let base = self.mesh.vertex_count() as u32;
        let n = face.normal;
        for v in &face.verts {
            self.mesh.vertices.extend([v.x, v.y, v.z]);
            self.mesh.normals.extend([n.x, n.y, n.z]);
            self.mesh.colors.extend(self.tint);
            self.mesh.materials.push(face.material.id());
        }
        for tc in &face.tex_coords {
            let uv = atlas.uv(face.material, tc.x, tc.y);
            self.mesh.uvs.extend([uv.x, uv.y]);
        }
        for t in &face.triangles {
            debug_assert!(t.iter().all(|&i| (i as usize) < face.verts.len()));
            self.mesh.indices.extend(t.iter().map(|i| base + i));
        }
    }

    pub fn build(self) -> Mesh {
        self.mesh
    }
}
