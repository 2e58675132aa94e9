// src/terrain/config.rs

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::terrain::error::TerrainError;

/// How a cell's geometry is synthesized from its neighborhood.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeshStyle {
    /// Flat full-size tops with stacked vertical skirts.
    Block,
    /// Block tops with corners notched toward lower diagonal neighbors.
    Indented,
    /// Center/side/corner ring with one-step slopes toward lower neighbors.
    #[default]
    Tapered,
}

impl MeshStyle {
    pub const ALL: [MeshStyle; 3] = [MeshStyle::Block, MeshStyle::Indented, MeshStyle::Tapered];

    pub fn name(self) -> &'static str {
        match self {
            MeshStyle::Block => "block",
            MeshStyle::Indented => "indented",
            MeshStyle::Tapered => "tapered",
        }
    }
}

impl fmt::Display for MeshStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MeshStyle {
    type Err = TerrainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "block" => Ok(MeshStyle::Block),
            "indented" => Ok(MeshStyle::Indented),
            "tapered" => Ok(MeshStyle::Tapered),
            _ => Err(TerrainError::UnknownStyle(s.to_string())),
        }
    }
}

/// What happens at the outer border of the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeMode {
    /// Border cells skirt down to `DEEP_EDGE_LEVEL` so the terrain is capped.
    #[default]
    Sealed,
    /// Missing neighbors count as flush and the border is left open.
    Open,
}

/// Resolution of a corner whose direct sides are not lower but whose
/// diagonal neighbor is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoldPolicy {
    /// Keep the corner flat; favors valleys over hills.
    #[default]
    Tangential,
    /// Drop the corner point one step toward the diagonal neighbor.
    Normal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IslandFalloff {
    /// Width of the falloff band as a fraction of the grid size.
    pub border_fraction: f64,
    /// Lowest shaped value the falloff may push a cell to.
    pub floor: f64,
}

impl Default for IslandFalloff {
    fn default() -> Self {
        Self { border_fraction: 0.25, floor: 0.25 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightfieldConfig {
    pub seed: u32,
    pub octaves: usize,
    pub persistence: f64,
    pub lacunarity: f64,
    /// Noise scale for a 64-cell grid; scaled by `64 / size` so features
    /// keep roughly the same size in cells.
    pub reference_scale: f64,
    /// Multiplier turning a shaped value in [0, 1] into levels.
    pub height_scale: f64,
    pub island: Option<IslandFalloff>,
}

impl Default for HeightfieldConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            octaves: 8,
            persistence: 0.5,
            lacunarity: 2.0,
            reference_scale: 0.5,
            height_scale: 30.0,
            island: Some(IslandFalloff::default()),
        }
    }
}

impl HeightfieldConfig {
    pub fn validate(&self) -> Result<(), TerrainError> {
        if self.octaves == 0 {
            return Err(TerrainError::InvalidConfig("octaves must be at least 1".into()));
        }
        if !(self.persistence > 0.0 && self.persistence <= 1.0) {
            return Err(TerrainError::InvalidConfig(format!(
                "persistence {} must be in (0, 1]",
                self.persistence
            )));
        }
        if !(self.lacunarity > 0.0) {
            return Err(TerrainError::InvalidConfig(format!(
                "lacunarity {} must be positive",
                self.lacunarity
            )));
        }
        if !(self.reference_scale > 0.0) {
            return Err(TerrainError::InvalidConfig(format!(
                "reference scale {} must be positive",
                self.reference_scale
            )));
        }
        if !(self.height_scale > 0.0) {
            return Err(TerrainError::InvalidConfig(format!(
                "height scale {} must be positive",
                self.height_scale
            )));
        }
        if let Some(island) = &self.island {
            if !(island.border_fraction > 0.0 && island.border_fraction <= 0.5) {
                return Err(TerrainError::InvalidConfig(format!(
                    "island border fraction {} must be in (0, 0.5]",
                    island.border_fraction
                )));
            }
            if !(0.0..=1.0).contains(&island.floor) {
                return Err(TerrainError::InvalidConfig(format!(
                    "island floor {} must be in [0, 1]",
                    island.floor
                )));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    pub style: MeshStyle,
    pub edges: EdgeMode,
    pub fold_policy: FoldPolicy,
    /// Faces whose normal z is below this are re-labelled as cliff material.
    pub steep_threshold: Option<f32>,
    /// World height of the water surface.
    pub water_elevation: f32,
    /// Alpha written into the water mesh's vertex colors.
    pub water_alpha: f32,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            style: MeshStyle::default(),
            edges: EdgeMode::default(),
            fold_policy: FoldPolicy::default(),
            steep_threshold: None,
            water_elevation: -0.25,
            water_alpha: 0.75,
        }
    }
}

impl MeshConfig {
    pub fn validate(&self) -> Result<(), TerrainError> {
        if let Some(threshold) = self.steep_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(TerrainError::InvalidConfig(format!(
                    "steep threshold {threshold} must be in [0, 1]"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.water_alpha) {
            return Err(TerrainError::InvalidConfig(format!(
                "water alpha {} must be in [0, 1]",
                self.water_alpha
            )));
        }
        if !self.water_elevation.is_finite() {
            return Err(TerrainError::InvalidConfig("water elevation must be finite".into()));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Cells per grid edge.
    pub size: usize,
    pub heightfield: HeightfieldConfig,
    pub mesh: MeshConfig,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            size: 64,
            heightfield: HeightfieldConfig::default(),
            mesh: MeshConfig::default(),
        }
    }
}

impl TerrainConfig {
    pub fn validate(&self) -> Result<(), TerrainError> {
        if self.size == 0 {
            return Err(TerrainError::InvalidConfig("terrain size must be at least 1".into()));
        }
        self.heightfield.validate()?;
        self.mesh.validate()
    }
}
