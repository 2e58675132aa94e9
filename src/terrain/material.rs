// src/terrain/material.rs

use nalgebra::{Vector2, Vector3};

use crate::terrain::coords::MaterialId;

/// Terrain materials, each backed by one tile of the shared texture atlas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MaterialLabel {
    Rock,
    Snow,
    Dirt,
    HillGrass,
    #[default]
    PlainGrass,
    DarkSand,
    LightSand,
    DarkWater,
    ClearWater,
}

impl MaterialLabel {
    pub const ALL: [MaterialLabel; 9] = [
        MaterialLabel::Rock,
        MaterialLabel::Snow,
        MaterialLabel::Dirt,
        MaterialLabel::HillGrass,
        MaterialLabel::PlainGrass,
        MaterialLabel::DarkSand,
        MaterialLabel::LightSand,
        MaterialLabel::DarkWater,
        MaterialLabel::ClearWater,
    ];

    pub fn id(self) -> MaterialId {
        self as MaterialId
    }

    /// Position of a land material in the height ordering. Water has no rank.
    pub fn rank(self) -> Option<u8> {
        match self {
            MaterialLabel::DarkSand => Some(0),
            MaterialLabel::LightSand => Some(1),
            MaterialLabel::PlainGrass => Some(2),
            MaterialLabel::HillGrass => Some(3),
            MaterialLabel::Dirt => Some(4),
            MaterialLabel::Rock => Some(5),
            MaterialLabel::Snow => Some(6),
            MaterialLabel::DarkWater | MaterialLabel::ClearWater => None,
        }
    }

    pub fn is_water(self) -> bool {
        matches!(self, MaterialLabel::DarkWater | MaterialLabel::ClearWater)
    }
}

// Upper bounds (world z) of each height band, lowest first.
const HEIGHT_BANDS: [(f32, MaterialLabel); 5] = [
    (-1.01, MaterialLabel::DarkSand),
    (-0.01, MaterialLabel::LightSand),
    (0.01, MaterialLabel::PlainGrass),
    (2.01, MaterialLabel::HillGrass),
    (5.01, MaterialLabel::Rock),
];

/// Water cells at or below this level use the dark water tile.
const DEEP_WATER_LEVEL: i32 = -4;

/// Picks a material from a face's height and orientation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MaterialClassifier {
    steep_threshold: Option<f32>,
}

impl MaterialClassifier {
    pub fn new(steep_threshold: Option<f32>) -> Self {
        Self { steep_threshold }
    }

    pub fn classify(&self, height: f32, normal: &Vector3<f32>) -> MaterialLabel {
        let banded = HEIGHT_BANDS
            .iter()
            .find(|(upper, _)| height < *upper)
            .map(|(_, material)| *material)
            .unwrap_or(MaterialLabel::Snow);

        match self.steep_threshold {
            Some(threshold) if normal.z < threshold => {
                if banded.rank() < MaterialLabel::Rock.rank() {
                    MaterialLabel::Dirt
                } else {
                    MaterialLabel::Rock
                }
            }
            _ => banded,
        }
    }

    pub fn water_material(&self, level: i32) -> MaterialLabel {
        if level <= DEEP_WATER_LEVEL {
            MaterialLabel::DarkWater
        } else {
            MaterialLabel::ClearWater
        }
    }
}

/// Fixed layout of the shared terrain texture: one square tile per material.
///
/// ```text
///  v
///  ^  darkwater  clearwater
///  |  hillgrass  plaingrass  darksand  lightsand
///  |  rock       snow        dirt
///  +----------------------------------------> u
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextureAtlas {
    scale: f32,
}

impl Default for TextureAtlas {
    fn default() -> Self {
        Self { scale: 0.2 }
    }
}

impl TextureAtlas {
    pub fn offset(&self, material: MaterialLabel) -> Vector2<f32> {
        match material {
            MaterialLabel::Rock => Vector2::new(0.025, 0.025),
            MaterialLabel::Snow => Vector2::new(0.275, 0.025),
            MaterialLabel::Dirt => Vector2::new(0.525, 0.025),
            MaterialLabel::HillGrass => Vector2::new(0.025, 0.275),
            MaterialLabel::PlainGrass => Vector2::new(0.275, 0.275),
            MaterialLabel::DarkSand => Vector2::new(0.525, 0.275),
            MaterialLabel::LightSand => Vector2::new(0.775, 0.275),
            MaterialLabel::DarkWater => Vector2::new(0.025, 0.525),
            MaterialLabel::ClearWater => Vector2::new(0.275, 0.525),
        }
    }

    /// Maps a local coordinate in [0, 1]² into the material's tile.
    pub fn uv(&self, material: MaterialLabel, u: f32, v: f32) -> Vector2<f32> {
        self.offset(material) + Vector2::new(u, v) * self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use test_case::test_case;

    fn up() -> Vector3<f32> {
        Vector3::new(0.0, 0.0, 1.0)
    }

    #[test_case(-3.0, MaterialLabel::DarkSand)]
    #[test_case(-0.5, MaterialLabel::LightSand)]
    #[test_case(0.0, MaterialLabel::PlainGrass)]
    #[test_case(1.5, MaterialLabel::HillGrass)]
    #[test_case(4.0, MaterialLabel::Rock)]
    #[test_case(7.5, MaterialLabel::Snow)]
    fn test_height_bands(height: f32, expected: MaterialLabel) {
        assert_eq!(MaterialClassifier::default().classify(height, &up()), expected);
    }

    #[test]
    fn test_rank_is_monotonic_in_height() {
        let classifier = MaterialClassifier::default();
        let mut previous = 0;
        for step in -40..=40 {
            let height = step as f32 * 0.25;
            let rank = classifier.classify(height, &up()).rank().unwrap();
            assert!(rank >= previous, "rank dropped at height {height}");
            previous = rank;
        }
    }

    #[test]
    fn test_steep_override() {
        let classifier = MaterialClassifier::new(Some(0.2));
        let wall = Vector3::new(1.0, 0.0, 0.0);
        assert_eq!(classifier.classify(0.0, &wall), MaterialLabel::Dirt);
        assert_eq!(classifier.classify(3.0, &wall), MaterialLabel::Rock);
        assert_eq!(classifier.classify(7.0, &wall), MaterialLabel::Rock);
        assert_eq!(classifier.classify(0.0, &up()), MaterialLabel::PlainGrass);
    }

    #[test]
    fn test_water_material_depth() {
        let classifier = MaterialClassifier::default();
        assert_eq!(classifier.water_material(-1), MaterialLabel::ClearWater);
        assert_eq!(classifier.water_material(-4), MaterialLabel::DarkWater);
    }

    #[test]
    fn test_atlas_tiles_do_not_overlap() {
        let atlas = TextureAtlas::default();
        for (a_idx, a) in MaterialLabel::ALL.iter().enumerate() {
            let a_min = atlas.uv(*a, 0.0, 0.0);
            let a_max = atlas.uv(*a, 1.0, 1.0);
            assert!(a_max.x <= 1.0 && a_max.y <= 1.0);
            for b in &MaterialLabel::ALL[a_idx + 1..] {
                let b_min = atlas.uv(*b, 0.0, 0.0);
                let b_max = atlas.uv(*b, 1.0, 1.0);
                let disjoint = a_max.x <= b_min.x
                    || b_max.x <= a_min.x
                    || a_max.y <= b_min.y
                    || b_max.y <= a_min.y;
                assert!(disjoint, "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn test_atlas_uv_scaling() {
        let uv = TextureAtlas::default().uv(MaterialLabel::PlainGrass, 0.5, 1.0);
        assert_relative_eq!(uv.x, 0.375, epsilon = 1e-6);
        assert_relative_eq!(uv.y, 0.475, epsilon = 1e-6);
    }
}
