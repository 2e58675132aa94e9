use log::{debug, info};
use nalgebra::Vector2;
use noise::{NoiseFn, Perlin};

use crate::terrain::{
    config::HeightfieldConfig,
    coords::{level_to_z, CELL_PITCH, HEIGHT_STEP, MAX_LEVEL, MIN_LEVEL},
    error::TerrainError,
};

/// Grid size the configured noise scale refers to.
const REFERENCE_SIZE: f64 = 64.0;

/// Coherent 2D noise returning values in `[0, 1]`.
pub trait NoiseSource: Send + Sync {
    fn sample(&self, x: f64, y: f64) -> f64;
}

/// Fractal Perlin noise: octaves summed with falling amplitude and rising
/// frequency, normalized back to `[0, 1]`.
pub struct StackedPerlin {
    noise: Perlin,
    octaves: usize,
    persistence: f64,
    lacunarity: f64,
}

impl StackedPerlin {
    pub fn new(config: &HeightfieldConfig) -> Self {
        Self {
            noise: Perlin::new(config.seed),
            octaves: config.octaves,
            persistence: config.persistence,
            lacunarity: config.lacunarity,
        }
    }
}

impl NoiseSource for StackedPerlin {
    fn sample(&self, x: f64, y: f64) -> f64 {
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut noise_height = 0.0;
        let mut max_value = 0.0;

        for _ in 0..self.octaves {
            noise_height += self.noise.get([x * frequency, y * frequency]) * amplitude;

            max_value += amplitude;
            amplitude *= self.persistence;
            frequency *= self.lacunarity;
        }

        let normalized = noise_height / max_value;
        (normalized * 0.5 + 0.5).clamp(0.0, 1.0)
    }
}

/// Square grid of integer height levels. Cell `(i, j)` sits at world
/// `(2i - N, 2j - N)`; a cell is water when its level is negative.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightField {
    size: usize,
    levels: Vec<i32>,
}

impl HeightField {
    /// Builds a field from levels stored with `i` as the outer index.
    pub fn from_levels(size: usize, levels: Vec<i32>) -> Result<Self, TerrainError> {
        if size == 0 {
            return Err(TerrainError::InvalidConfig("terrain size must be at least 1".into()));
        }
        if levels.len() != size * size {
            return Err(TerrainError::LevelCountMismatch {
                expected: size * size,
                actual: levels.len(),
            });
        }
        if let Some((idx, &level)) = levels
            .iter()
            .enumerate()
            .find(|&(_, &k)| !(MIN_LEVEL..=MAX_LEVEL).contains(&k))
        {
            return Err(TerrainError::LevelOutOfRange {
                i: idx / size,
                j: idx % size,
                level,
                min: MIN_LEVEL,
                max: MAX_LEVEL,
            });
        }
        Ok(Self { size, levels })
    }

    /// Builds a field by evaluating `f(i, j)` for every cell.
    pub fn from_fn(size: usize, f: impl Fn(usize, usize) -> i32) -> Result<Self, TerrainError> {
        let levels = (0..size)
            .flat_map(|i| (0..size).map(move |j| (i, j)))
            .map(|(i, j)| f(i, j))
            .collect();
        Self::from_levels(size, levels)
    }

    /// Builds a field from rows given as `rows[j][i]`, so fixtures read like
    /// a map with +y going down.
    pub fn from_rows(rows: &[&[i32]]) -> Result<Self, TerrainError> {
        let size = rows.len();
        if let Some(row) = rows.iter().find(|row| row.len() != size) {
            return Err(TerrainError::LevelCountMismatch { expected: size, actual: row.len() });
        }
        Self::from_fn(size, |i, j| rows[j][i])
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_valid(&self, i: i32, j: i32) -> bool {
        let n = self.size as i32;
        (0..n).contains(&i) && (0..n).contains(&j)
    }

    pub fn level(&self, i: i32, j: i32) -> Option<i32> {
        self.is_valid(i, j)
            .then(|| self.levels[i as usize * self.size + j as usize])
    }

    pub fn height(&self, i: i32, j: i32) -> Option<f32> {
        self.level(i, j).map(level_to_z)
    }

    pub fn is_water(&self, i: i32, j: i32) -> bool {
        self.level(i, j).is_some_and(|k| k < 0)
    }

    pub fn level_from_height(z: f32) -> i32 {
        (z / HEIGHT_STEP).round_ties_even() as i32
    }

    pub fn grid_to_world(&self, i: i32, j: i32) -> Vector2<f32> {
        let n = self.size as f32;
        Vector2::new(i as f32 * CELL_PITCH - n, j as f32 * CELL_PITCH - n)
    }

    /// Nearest cell to a world position. May lie outside the grid.
    pub fn world_to_grid(&self, x: f32, y: f32) -> (i32, i32) {
        let n = self.size as f32;
        (
            ((x + n) / CELL_PITCH).round() as i32,
            ((y + n) / CELL_PITCH).round() as i32,
        )
    }

    /// Ground height under a world position, for avatar placement.
    pub fn height_at_world(&self, x: f32, y: f32) -> Result<f32, TerrainError> {
        if !(x.is_finite() && y.is_finite()) {
            return Err(TerrainError::WorldOutOfBounds { x, y });
        }
        let (i, j) = self.world_to_grid(x, y);
        self.height(i, j).ok_or(TerrainError::WorldOutOfBounds { x, y })
    }

    pub fn levels(&self) -> &[i32] {
        &self.levels
    }

    pub fn water_cells(&self) -> usize {
        self.levels.iter().filter(|&&k| k < 0).count()
    }
}

pub struct HeightmapGenerator {
    config: HeightfieldConfig,
    noise: Box<dyn NoiseSource>,
}

impl HeightmapGenerator {
    pub fn new(config: HeightfieldConfig) -> Self {
        let noise = Box::new(StackedPerlin::new(&config));
        Self { config, noise }
    }

    pub fn with_noise(config: HeightfieldConfig, noise: impl NoiseSource + 'static) -> Self {
        Self { config, noise: Box::new(noise) }
    }

    pub fn generate(&self, size: usize) -> Result<HeightField, TerrainError> {
        if size == 0 {
            return Err(TerrainError::InvalidConfig("terrain size must be at least 1".into()));
        }
        self.config.validate()?;

        let n = size as f64;
        let scale = self.config.reference_scale * REFERENCE_SIZE / n;

        let mut levels = Vec::with_capacity(size * size);
        let mut shaped_min = f64::MAX;
        let mut shaped_max = f64::MIN;
        for i in 0..size {
            for j in 0..size {
                let raw = self.noise.sample(i as f64 / n / scale, j as f64 / n / scale);
                let g = self.apply_island(shape(raw), i, j, size);
                shaped_min = shaped_min.min(g);
                shaped_max = shaped_max.max(g);
                levels.push(self.to_level(g));
            }
        }
        debug!(
            "Shaped heights for {size}x{size} grid span [{shaped_min:.3}, {shaped_max:.3}] (noise scale {scale:.4})"
        );

        let field = HeightField::from_levels(size, levels)?;
        let (lo, hi) = field
            .levels()
            .iter()
            .fold((i32::MAX, i32::MIN), |(lo, hi), &k| (lo.min(k), hi.max(k)));
        info!(
            "Generated {size}x{size} heightfield (seed {}): levels [{lo}, {hi}], {} water cells",
            self.config.seed,
            field.water_cells()
        );
        Ok(field)
    }

    fn apply_island(&self, g: f64, i: usize, j: usize, size: usize) -> f64 {
        let Some(island) = &self.config.island else {
            return g;
        };
        let border = island.border_fraction * size as f64;
        let dist = i.min(size - 1 - i).min(j).min(size - 1 - j) as f64;
        if dist < border {
            (g * (dist / border).sqrt()).max(island.floor)
        } else {
            g
        }
    }

    fn to_level(&self, g: f64) -> i32 {
        let k = ((g - 0.5) * self.config.height_scale).round_ties_even() as i32;
        k.clamp(MIN_LEVEL, MAX_LEVEL)
    }
}

/// Flattens lowlands and sharpens peaks; keeps the result in `[0, 1]`.
fn shape(raw: f64) -> f64 {
    let mut g = ((raw - 0.25) / 0.75).clamp(-1.0, 1.0);
    if g > 0.0 {
        g *= g;
    }
    (g + 1.0) / 2.0
}
