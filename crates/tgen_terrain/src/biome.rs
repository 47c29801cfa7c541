use crate::config::BiomeNoiseSettings;
use crate::config::ConfigError;
use crate::noise::LayeredNoise;
use crate::zone::ZoneTable;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainCategory {
    Grass,
    Sand,
    Water,
}

impl TerrainCategory {
    pub const ALL: [TerrainCategory; 3] = [
        TerrainCategory::Grass,
        TerrainCategory::Sand,
        TerrainCategory::Water,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            TerrainCategory::Grass => "grass",
            TerrainCategory::Sand => "sand",
            TerrainCategory::Water => "water",
        }
    }

    /// Whether entities may stand on or spawn at this terrain.
    pub const fn is_passable(self) -> bool {
        !matches!(self, TerrainCategory::Water)
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            TerrainCategory::Grass => 0,
            TerrainCategory::Sand => 1,
            TerrainCategory::Water => 2,
        }
    }
}

impl fmt::Display for TerrainCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Coarse grass/sand split, before any water is placed.
#[derive(Clone, Debug)]
pub struct BaseBiomeClassifier {
    zones: ZoneTable,
    noise: LayeredNoise,
    threshold: f64,
}

impl BaseBiomeClassifier {
    pub fn new(zones: ZoneTable, settings: &BiomeNoiseSettings) -> Result<Self, ConfigError> {
        settings.validate("base")?;
        Ok(Self {
            zones,
            noise: LayeredNoise::new(settings.seed, settings.layers.clone())?,
            threshold: settings.threshold,
        })
    }

    pub fn zones(&self) -> &ZoneTable {
        &self.zones
    }

    /// `Grass` or `Sand`; never `Water`.
    pub fn classify_base(&self, x: f64, y: f64) -> TerrainCategory {
        if let Some(forced) = self.zones.zone_for_point(x, y) {
            return forced;
        }
        if self.noise.sample_unit(x, y) > self.threshold {
            TerrainCategory::Sand
        } else {
            TerrainCategory::Grass
        }
    }
}

#[cfg(test)]
mod test {
    use crate::biome::{BaseBiomeClassifier, TerrainCategory};
    use crate::config::{BiomeNoiseSettings, TerrainConfig};
    use crate::noise::NoiseLayer;
    use crate::zone::ZoneTable;

    fn classifier() -> BaseBiomeClassifier {
        let config = TerrainConfig::default();
        BaseBiomeClassifier::new(ZoneTable::new(config.zones).unwrap(), &config.base).unwrap()
    }

    #[test]
    fn never_water() {
        let base = classifier();
        for i in -200..200 {
            let c = base.classify_base(i as f64 * 997.0, i as f64 * -613.0 + 40_000.0);
            assert_ne!(c, TerrainCategory::Water);
        }
    }

    #[test]
    fn zones_override_noise() {
        let base = classifier();
        assert_eq!(base.classify_base(0.0, 0.0), TerrainCategory::Grass);
        assert_eq!(base.classify_base(-350.0, 200.0), TerrainCategory::Grass);
        assert_eq!(base.classify_base(0.0, 750.0), TerrainCategory::Sand);
        assert_eq!(base.classify_base(-640.0, -640.0), TerrainCategory::Sand);
    }

    #[test]
    fn threshold_extremes() {
        let zones = ZoneTable::new(vec![]).unwrap();
        let always_sand = BiomeNoiseSettings {
            seed: 1,
            layers: vec![NoiseLayer::new(0.001, 1.0)],
            threshold: 0.0,
        };
        let always_grass = BiomeNoiseSettings {
            threshold: 1.0,
            ..always_sand.clone()
        };
        let sand = BaseBiomeClassifier::new(zones.clone(), &always_sand).unwrap();
        let grass = BaseBiomeClassifier::new(zones, &always_grass).unwrap();
        for i in 0..100 {
            let (x, y) = (i as f64 * 321.5, i as f64 * 17.25);
            assert_eq!(sand.classify_base(x, y), TerrainCategory::Sand);
            assert_eq!(grass.classify_base(x, y), TerrainCategory::Grass);
        }
    }

    #[test]
    fn both_biomes_appear_outside_zones() {
        let base = classifier();
        let mut sand = 0;
        let mut grass = 0;
        for i in 0..60 {
            for j in 0..60 {
                match base.classify_base(i as f64 * 2_000.0 - 60_000.0, j as f64 * 2_000.0 - 60_000.0) {
                    TerrainCategory::Sand => sand += 1,
                    TerrainCategory::Grass => grass += 1,
                    TerrainCategory::Water => unreachable!(),
                }
            }
        }
        assert!(sand > 900 && grass > 900, "sand {sand}, grass {grass}");
    }

    #[test]
    fn passability() {
        assert!(TerrainCategory::Grass.is_passable());
        assert!(TerrainCategory::Sand.is_passable());
        assert!(!TerrainCategory::Water.is_passable());
        assert_eq!(TerrainCategory::Water.to_string(), "water");
    }
}
