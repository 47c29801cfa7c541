use crate::biome::TerrainCategory;
use crate::noise::{NoiseLayer, validate_layers};
use crate::zone::{ZoneEntry, ZoneTable};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub const BASE_SEED: i32 = 171;
pub const WATER_SEED: i32 = 109;
pub const BASE_THRESHOLD: f64 = 0.50;
pub const WATER_THRESHOLD: f64 = 0.53;
pub const SAFE_ZONE_RADIUS: f64 = 500.0;
pub const TRANSITION_ZONE_RADIUS: f64 = 1_000.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("zone {index} has a non-finite radius")]
    ZoneNotFinite { index: usize },
    #[error("zone {index} starts at {found}, leaving a gap after {expected}")]
    ZoneGap {
        index: usize,
        expected: f64,
        found: f64,
    },
    #[error("zone {index} starts at {found}, overlapping the previous zone ending at {expected}")]
    ZoneOverlap {
        index: usize,
        expected: f64,
        found: f64,
    },
    #[error("zone {index} is empty")]
    ZoneEmpty { index: usize },
    #[error("zone {index} forces water, which may only be placed procedurally")]
    ZoneForcesWater { index: usize },
    #[error("{noise} threshold {value} is outside [0, 1]")]
    Threshold { noise: &'static str, value: f64 },
    #[error("expected 1 to 4 noise layers, got {0}")]
    LayerCount(usize),
    #[error("noise layer {index} has invalid frequency {value}")]
    LayerFrequency { index: usize, value: f64 },
    #[error("noise layer {index} has invalid weight {value}")]
    LayerWeight { index: usize, value: f64 },
    #[error("noise layer weights sum to {0}, expected 1")]
    LayerWeightSum(f64),
    #[error("{field} must be positive and finite, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("buffer scan needs at least one step")]
    ScanSteps,
    #[error("base cell size {base} must not exceed buffer cell size {buffer}")]
    BaseCellCoarser { base: f64, buffer: f64 },
    #[error("cache bound must be at least 1")]
    CacheBound,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Seed, scales and cut-off of one noise-driven decision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BiomeNoiseSettings {
    pub seed: i32,
    pub layers: Vec<NoiseLayer>,
    /// Unit noise above this value selects the "positive" category.
    pub threshold: f64,
}

impl BiomeNoiseSettings {
    pub fn validate(&self, noise: &'static str) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::Threshold {
                noise,
                value: self.threshold,
            });
        }
        validate_layers(&self.layers)
    }

    /// Grass/sand split: 25 000 world units per primary cycle.
    pub fn default_base() -> Self {
        Self {
            seed: BASE_SEED,
            layers: vec![NoiseLayer::new(0.00004, 0.75), NoiseLayer::new(0.0002, 0.25)],
            threshold: BASE_THRESHOLD,
        }
    }

    /// Water in sand: lake placement, shoreline wobble and edge detail.
    pub fn default_water() -> Self {
        Self {
            seed: WATER_SEED,
            layers: vec![
                NoiseLayer::new(0.0004, 0.5),
                NoiseLayer::new(0.0015, 0.3),
                NoiseLayer::new(0.006, 0.2),
            ],
            threshold: WATER_THRESHOLD,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferSettings {
    /// Minimum distance between water and the nearest grass.
    pub radius: f64,
    /// Candidates farther than this from the origin use the sparse probe tier.
    pub far_distance: f64,
    /// Candidates closer than `safe radius + margin` also scan toward the origin.
    pub origin_scan_margin: f64,
    pub scan_steps: u32,
}

impl Default for BufferSettings {
    fn default() -> Self {
        Self {
            radius: 2_000.0,
            far_distance: 6_000.0,
            origin_scan_margin: 4_000.0,
            scan_steps: 8,
        }
    }
}

impl BufferSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("buffer.radius", self.radius)?;
        positive("buffer.far_distance", self.far_distance)?;
        if !self.origin_scan_margin.is_finite() || self.origin_scan_margin < 0.0 {
            return Err(ConfigError::NotPositive {
                field: "buffer.origin_scan_margin",
                value: self.origin_scan_margin,
            });
        }
        if self.scan_steps == 0 {
            return Err(ConfigError::ScanSteps);
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoSettings {
    pub buffer_cell_size: f64,
    pub base_cell_size: f64,
    /// Entry count at which a cache is cleared, per cache.
    pub max_entries: usize,
}

impl Default for MemoSettings {
    fn default() -> Self {
        Self {
            buffer_cell_size: 16.0,
            base_cell_size: 4.0,
            max_entries: 65_536,
        }
    }
}

impl MemoSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("memo.buffer_cell_size", self.buffer_cell_size)?;
        positive("memo.base_cell_size", self.base_cell_size)?;
        if self.base_cell_size > self.buffer_cell_size {
            return Err(ConfigError::BaseCellCoarser {
                base: self.base_cell_size,
                buffer: self.buffer_cell_size,
            });
        }
        if self.max_entries == 0 {
            return Err(ConfigError::CacheBound);
        }
        Ok(())
    }
}

/// Everything that shapes the world. Two classifiers built from equal
/// configurations produce identical terrain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub zones: Vec<ZoneEntry>,
    pub base: BiomeNoiseSettings,
    pub water: BiomeNoiseSettings,
    pub buffer: BufferSettings,
    pub memo: MemoSettings,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            zones: vec![
                ZoneEntry::new(0.0, SAFE_ZONE_RADIUS, TerrainCategory::Grass),
                ZoneEntry::new(SAFE_ZONE_RADIUS, TRANSITION_ZONE_RADIUS, TerrainCategory::Sand),
            ],
            base: BiomeNoiseSettings::default_base(),
            water: BiomeNoiseSettings::default_water(),
            buffer: BufferSettings::default(),
            memo: MemoSettings::default(),
        }
    }
}

impl TerrainConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ZoneTable::new(self.zones.clone())?;
        self.base.validate("base")?;
        self.water.validate("water")?;
        self.buffer.validate()?;
        self.memo.validate()
    }

    /// Parses and validates a JSON document; missing sections keep their
    /// defaults.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: TerrainConfig = serde_json::from_slice(bytes)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let bytes = std::fs::read(path)?;
        Self::from_json_slice(&bytes)
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

#[cfg(test)]
mod test {
    use crate::biome::TerrainCategory;
    use crate::config::{ConfigError, TerrainConfig};

    #[test]
    fn default_is_valid() {
        TerrainConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = TerrainConfig::from_json_slice(
            br#"{
                "buffer": { "radius": 750.0 },
                "memo": { "max_entries": 1024 }
            }"#,
        )
        .unwrap();
        let defaults = TerrainConfig::default();
        assert_eq!(config.buffer.radius, 750.0);
        assert_eq!(config.buffer.far_distance, defaults.buffer.far_distance);
        assert_eq!(config.memo.max_entries, 1024);
        assert_eq!(config.memo.base_cell_size, defaults.memo.base_cell_size);
        assert_eq!(config.base, defaults.base);
        assert_eq!(config.zones, defaults.zones);
    }

    #[test]
    fn categories_use_lowercase_names() {
        let config = TerrainConfig::from_json_slice(
            br#"{ "zones": [ { "inner_radius": 0.0, "outer_radius": 64.0, "category": "sand" } ] }"#,
        )
        .unwrap();
        assert_eq!(config.zones[0].category, TerrainCategory::Sand);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""category":"sand""#));
        let back = TerrainConfig::from_json_slice(json.as_bytes()).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn rejects_invalid_documents() {
        assert!(matches!(
            TerrainConfig::from_json_slice(br#"{ "water": { "seed": 1, "layers": [ { "frequency": 0.1, "weight": 1.0 } ], "threshold": 1.5 } }"#),
            Err(ConfigError::Threshold { noise: "water", .. })
        ));
        assert!(matches!(
            TerrainConfig::from_json_slice(br#"{ "zones": [ { "inner_radius": 5.0, "outer_radius": 64.0, "category": "grass" } ] }"#),
            Err(ConfigError::ZoneGap { index: 0, .. })
        ));
        assert!(matches!(
            TerrainConfig::from_json_slice(br#"{ "buffer": { "radius": -1.0 } }"#),
            Err(ConfigError::NotPositive { field: "buffer.radius", .. })
        ));
        assert!(matches!(
            TerrainConfig::from_json_slice(br#"{ "memo": { "max_entries": 0 } }"#),
            Err(ConfigError::CacheBound)
        ));
        assert!(matches!(
            TerrainConfig::from_json_slice(br#"{ "memo": { "base_cell_size": 32.0 } }"#),
            Err(ConfigError::BaseCellCoarser { .. })
        ));
        assert!(matches!(
            TerrainConfig::from_json_slice(b"{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            TerrainConfig::load("/nonexistent/terrain.json"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn threshold_bounds_are_inclusive() {
        let mut config = TerrainConfig::default();
        config.base.threshold = 0.0;
        config.water.threshold = 1.0;
        config.validate().unwrap();
        config.base.threshold = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Threshold { noise: "base", .. })
        ));
    }
}
