use crate::biome::{BaseBiomeClassifier, TerrainCategory};
use crate::buffer::BufferValidator;
use crate::config::{ConfigError, TerrainConfig};
use crate::memo::SpatialMemo;
use crate::noise::LayeredNoise;
use crate::zone::ZoneTable;

/// Full classification: the base biome with water laid over eligible sand.
pub struct WaterClassifier {
    base: BaseBiomeClassifier,
    buffer: BufferValidator,
    memo: SpatialMemo,
    noise: LayeredNoise,
    threshold: f64,
}

impl WaterClassifier {
    pub fn new(config: &TerrainConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let zones = ZoneTable::new(config.zones.clone())?;
        let safe_radius = zones.safe_radius();
        let memo = SpatialMemo::new(&config.memo);
        let buffer = BufferValidator::new(&config.buffer, safe_radius, memo.quantization_slack());
        Ok(Self {
            base: BaseBiomeClassifier::new(zones, &config.base)?,
            buffer,
            memo,
            noise: LayeredNoise::new(config.water.seed, config.water.layers.clone())?,
            threshold: config.water.threshold,
        })
    }

    pub fn base(&self) -> &BaseBiomeClassifier {
        &self.base
    }

    pub fn buffer(&self) -> &BufferValidator {
        &self.buffer
    }

    pub fn memo(&self) -> &SpatialMemo {
        &self.memo
    }

    #[inline]
    pub fn classify_base(&self, x: f64, y: f64) -> TerrainCategory {
        self.base.classify_base(x, y)
    }

    #[inline]
    pub fn is_far_enough_from_grass(&self, x: f64, y: f64) -> bool {
        self.buffer
            .is_far_enough_from_grass(&self.base, &self.memo, x, y)
    }

    pub fn classify_final(&self, x: f64, y: f64) -> TerrainCategory {
        match self.base.classify_base(x, y) {
            TerrainCategory::Sand => {}
            other => return other,
        }
        if !self.is_far_enough_from_grass(x, y) {
            return TerrainCategory::Sand;
        }
        if self.noise.sample_unit(x, y) > self.threshold {
            TerrainCategory::Water
        } else {
            TerrainCategory::Sand
        }
    }
}

#[cfg(test)]
mod test {
    use crate::biome::TerrainCategory;
    use crate::config::TerrainConfig;
    use crate::water::WaterClassifier;

    #[test]
    fn grass_base_short_circuits() {
        let classifier = WaterClassifier::new(&TerrainConfig::default()).unwrap();
        assert_eq!(classifier.classify_final(10.0, -20.0), TerrainCategory::Grass);
        // Neither cache is touched on the grass path.
        let stats = classifier.memo().stats();
        assert_eq!(stats.buffer.misses + stats.base.misses, 0);
    }

    #[test]
    fn ring_near_spawn_stays_sand() {
        let classifier = WaterClassifier::new(&TerrainConfig::default()).unwrap();
        for i in 0..36 {
            let angle = i as f64 * 10.0_f64.to_radians();
            let (x, y) = (800.0 * angle.cos(), 800.0 * angle.sin());
            assert_eq!(classifier.classify_final(x, y), TerrainCategory::Sand);
        }
    }

    #[test]
    fn water_threshold_one_disables_water() {
        let mut config = TerrainConfig::default();
        config.water.threshold = 1.0;
        let classifier = WaterClassifier::new(&config).unwrap();
        for i in 0..400 {
            let (x, y) = (i as f64 * 397.0 - 80_000.0, i as f64 * 151.0 + 7_000.0);
            assert_ne!(classifier.classify_final(x, y), TerrainCategory::Water);
        }
    }

    #[test]
    fn water_only_where_base_is_sand_and_buffered() {
        let classifier = WaterClassifier::new(&TerrainConfig::default()).unwrap();
        let mut water = 0;
        for i in 0..80 {
            for j in 0..80 {
                let (x, y) = (i as f64 * 1_250.0 - 50_000.0, j as f64 * 1_250.0 - 50_000.0);
                if classifier.classify_final(x, y) == TerrainCategory::Water {
                    water += 1;
                    assert_eq!(classifier.classify_base(x, y), TerrainCategory::Sand);
                    assert!(classifier.is_far_enough_from_grass(x, y));
                }
            }
        }
        assert!(water > 0);
    }
}
