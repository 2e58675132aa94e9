use crate::terrain::{
    config::{HeightfieldConfig, IslandFalloff},
    coords::{MAX_LEVEL, MIN_LEVEL},
    error::TerrainError,
    generator::{HeightField, HeightmapGenerator, NoiseSource},
};
use approx::assert_relative_eq;
use log::info;
use test_case::test_case;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

struct ConstantNoise(f64);

impl NoiseSource for ConstantNoise {
    fn sample(&self, _x: f64, _y: f64) -> f64 {
        self.0
    }
}

fn flat_config() -> HeightfieldConfig {
    HeightfieldConfig { island: None, ..Default::default() }
}

#[test]
fn test_generation_is_deterministic() {
    init_logger();
    let config = HeightfieldConfig { seed: 7, ..Default::default() };
    let first = HeightmapGenerator::new(config.clone()).generate(32).unwrap();
    let second = HeightmapGenerator::new(config).generate(32).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_seed_changes_terrain() {
    init_logger();
    let a = HeightmapGenerator::new(HeightfieldConfig { seed: 1, ..flat_config() })
        .generate(32)
        .unwrap();
    let b = HeightmapGenerator::new(HeightfieldConfig { seed: 2, ..flat_config() })
        .generate(32)
        .unwrap();
    assert_ne!(a.levels(), b.levels());
}

#[test_case(0)]
#[test_case(42)]
#[test_case(1234)]
fn test_levels_stay_in_bounds(seed: u32) {
    init_logger();
    let config = HeightfieldConfig { seed, height_scale: 120.0, ..Default::default() };
    let field = HeightmapGenerator::new(config).generate(24).unwrap();
    assert_eq!(field.levels().len(), 24 * 24);
    for &k in field.levels() {
        assert!((MIN_LEVEL..=MAX_LEVEL).contains(&k), "level {k} out of bounds");
    }
    info!("seed {seed}: {} water cells", field.water_cells());
}

#[test_case(0.0, -5)]
#[test_case(0.5, 2)]
#[test_case(1.0, 15)]
fn test_constant_noise_levels(noise: f64, expected: i32) {
    let field = HeightmapGenerator::with_noise(flat_config(), ConstantNoise(noise))
        .generate(4)
        .unwrap();
    assert!(field.levels().iter().all(|&k| k == expected), "{:?}", field.levels());
}

#[test]
fn test_island_falloff_sinks_border() {
    let field = HeightmapGenerator::with_noise(HeightfieldConfig::default(), ConstantNoise(0.5))
        .generate(4)
        .unwrap();
    for i in 0..4 {
        for j in 0..4 {
            let border = i == 0 || j == 0 || i == 3 || j == 3;
            let expected = if border { -8 } else { 2 };
            assert_eq!(field.level(i, j), Some(expected), "cell ({i}, {j})");
            assert_eq!(field.is_water(i, j), border);
        }
    }
}

#[test]
fn test_island_floor_is_respected() {
    let config = HeightfieldConfig {
        island: Some(IslandFalloff { border_fraction: 0.5, floor: 0.5 }),
        ..Default::default()
    };
    let field = HeightmapGenerator::with_noise(config, ConstantNoise(0.0)).generate(8).unwrap();
    // floor 0.5 maps to level 0, which beats the raw -5
    assert_eq!(field.level(0, 0), Some(0));
}

#[test]
fn test_zero_size_is_rejected() {
    let result = HeightmapGenerator::new(HeightfieldConfig::default()).generate(0);
    assert!(matches!(result, Err(TerrainError::InvalidConfig(_))));
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = HeightfieldConfig { octaves: 0, ..Default::default() };
    assert!(HeightmapGenerator::new(config).generate(8).is_err());
}

#[test]
fn test_grid_world_round_trip() {
    let field = HeightField::from_fn(6, |i, j| (i + j) as i32).unwrap();
    for i in 0..6 {
        for j in 0..6 {
            let p = field.grid_to_world(i, j);
            assert_eq!(field.world_to_grid(p.x, p.y), (i, j));
        }
    }
    let origin = field.grid_to_world(0, 0);
    assert_relative_eq!(origin.x, -6.0);
    assert_relative_eq!(origin.y, -6.0);
}

#[test]
fn test_world_to_grid_rounds_to_nearest_center() {
    let field = HeightField::from_fn(4, |_, _| 0).unwrap();
    // centers at -4, -2, 0, 2
    assert_eq!(field.world_to_grid(-3.2, 0.9), (0, 2));
    assert_eq!(field.world_to_grid(1.8, -1.9), (3, 1));
}

#[test]
fn test_height_queries() {
    let field = HeightField::from_rows(&[&[0, 1, 2], &[-1, 3, 4], &[5, 6, -2]]).unwrap();
    // rows are indexed by j, columns by i
    assert_eq!(field.level(1, 0), Some(1));
    assert_eq!(field.level(0, 1), Some(-1));
    assert_relative_eq!(field.height(2, 2).unwrap(), -1.0);
    assert!(field.is_water(0, 1));
    assert!(!field.is_water(1, 1));
    assert_eq!(field.level(3, 0), None);
    assert_eq!(field.level(0, -1), None);
    assert!(!field.is_water(-1, 0));
    assert_eq!(field.water_cells(), 2);
}

#[test]
fn test_height_at_world() {
    let field = HeightField::from_rows(&[&[0, 1], &[2, 3]]).unwrap();
    // cell (1, 1) is centered on the origin
    assert_relative_eq!(field.height_at_world(0.3, -0.4).unwrap(), 1.5);
    assert_relative_eq!(field.height_at_world(-2.0, -2.0).unwrap(), 0.0);
    assert_eq!(
        field.height_at_world(5.0, 0.0),
        Err(TerrainError::WorldOutOfBounds { x: 5.0, y: 0.0 })
    );
}

#[test_case(f32::NAN, 0.0)]
#[test_case(0.0, f32::NAN)]
#[test_case(f32::INFINITY, 0.0)]
#[test_case(0.0, f32::NEG_INFINITY)]
fn test_height_at_non_finite_world(x: f32, y: f32) {
    let field = HeightField::from_rows(&[&[3, 1], &[2, 2]]).unwrap();
    assert!(matches!(
        field.height_at_world(x, y),
        Err(TerrainError::WorldOutOfBounds { .. })
    ));
}

#[test_case(1.0, 2)]
#[test_case(-0.5, -1)]
#[test_case(0.2, 0)]
#[test_case(1.25, 2)]
#[test_case(0.75, 2)]
#[test_case(-0.25, 0)]
fn test_level_from_height(z: f32, expected: i32) {
    assert_eq!(HeightField::level_from_height(z), expected);
}

#[test]
fn test_from_levels_validation() {
    assert_eq!(
        HeightField::from_levels(2, vec![0; 3]),
        Err(TerrainError::LevelCountMismatch { expected: 4, actual: 3 })
    );
    assert_eq!(
        HeightField::from_levels(2, vec![0, 0, 16, 0]),
        Err(TerrainError::LevelOutOfRange { i: 1, j: 0, level: 16, min: MIN_LEVEL, max: MAX_LEVEL })
    );
    assert!(HeightField::from_rows(&[&[0, 0], &[0]]).is_err());
}
