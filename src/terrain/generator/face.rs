use nalgebra::{Vector2, Vector3};

use crate::terrain::material::{MaterialClassifier, MaterialLabel};

/// Smallest cross-product length accepted as a real face normal.
const MIN_NORMAL_LENGTH: f32 = 1e-6;

/// What part of the terrain surface a face belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaceKind {
    /// Horizontal walkable surface.
    Top,
    /// Tapered or folded surface spanning one height step.
    Slope,
    /// Vertical wall closing a height gap.
    Skirt,
    /// Water surface.
    Water,
}

/// A convex polygon with a single normal, local texture coordinates and a
/// triangle fan anchored on its first vertex.
#[derive(Clone, Debug, PartialEq)]
pub struct Face {
    pub verts: Vec<Vector3<f32>>,
    pub tex_coords: Vec<Vector2<f32>>,
    pub normal: Vector3<f32>,
    pub material: MaterialLabel,
    pub triangles: Vec<[u32; 3]>,
    pub kind: FaceKind,
}

impl Face {
    /// Builds a face from vertices listed counter-clockwise as seen from the
    /// side the face is meant to be visible from.
    pub fn polygon(kind: FaceKind, verts: Vec<Vector3<f32>>, tex_coords: Vec<Vector2<f32>>) -> Self {
        debug_assert!(verts.len() >= 3, "face needs at least 3 vertices, got {}", verts.len());
        debug_assert_eq!(verts.len(), tex_coords.len(), "one texture coordinate per vertex");

        let normal = first_three_normal(&verts);
        let triangles = (1..verts.len().saturating_sub(1) as u32)
            .map(|v| [0, v, v + 1])
            .collect();

        Self {
            verts,
            tex_coords,
            normal,
            material: MaterialLabel::default(),
            triangles,
            kind,
        }
    }

    /// Horizontal polygon whose vertices may come in either winding; they
    /// are reordered so the face looks up.
    pub fn upward(kind: FaceKind, mut verts: Vec<Vector3<f32>>, mut tex_coords: Vec<Vector2<f32>>) -> Self {
        if signed_area_xy(&verts) < 0.0 {
            verts.reverse();
            tex_coords.reverse();
        }
        Self::polygon(kind, verts, tex_coords)
    }

    /// Fan around an interior anchor; the ring is closed by repeating its
    /// first vertex so every boundary edge gets a triangle.
    pub fn anchored_fan(
        kind: FaceKind,
        anchor: (Vector3<f32>, Vector2<f32>),
        ring: Vec<(Vector3<f32>, Vector2<f32>)>,
    ) -> Self {
        debug_assert!(ring.len() >= 3, "fan ring needs at least 3 vertices");
        let mut verts = Vec::with_capacity(ring.len() + 2);
        let mut tex_coords = Vec::with_capacity(ring.len() + 2);
        verts.push(anchor.0);
        tex_coords.push(anchor.1);
        for (p, uv) in ring.iter().chain(ring.first()) {
            verts.push(*p);
            tex_coords.push(*uv);
        }
        Self::polygon(kind, verts, tex_coords)
    }

    pub fn centroid(&self) -> Vector3<f32> {
        let sum = self.verts.iter().fold(Vector3::zeros(), |acc, v| acc + v);
        sum / self.verts.len() as f32
    }

    /// Labels the face by its centroid height and normal.
    pub fn classify(mut self, classifier: &MaterialClassifier) -> Self {
        self.material = classifier.classify(self.centroid().z, &self.normal);
        self
    }

    pub fn with_material(mut self, material: MaterialLabel) -> Self {
        self.material = material;
        self
    }
}

fn first_three_normal(verts: &[Vector3<f32>]) -> Vector3<f32> {
    if verts.len() < 3 {
        return Vector3::z();
    }
    let n = (verts[1] - verts[0]).cross(&(verts[2] - verts[1]));
    let length = n.norm();
    debug_assert!(
        length > MIN_NORMAL_LENGTH,
        "degenerate face: first three vertices {:?} are collinear",
        &verts[..3]
    );
    if length > MIN_NORMAL_LENGTH {
        n / length
    } else {
        Vector3::z()
    }
}

fn signed_area_xy(verts: &[Vector3<f32>]) -> f32 {
    let n = verts.len();
    (0..n)
        .map(|k| {
            let a = verts[k];
            let b = verts[(k + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum::<f32>()
        * 0.5
}
