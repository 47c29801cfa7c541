//! Offline measurements of the generated world, used to tune thresholds.
//!
//! Sample coordinates come from a [`XoroshiroRandom`] seeded independently of
//! the world seeds and forked per survey, so runs are reproducible and two
//! surveys with the same seed never share coordinates.

use crate::biome::TerrainCategory;
use crate::classifier::{LifecycleError, TerrainClassifier};
use bevy_math::DVec2;
use serde::{Deserialize, Serialize};
use tgen_random::{Random, XoroshiroRandom};
use thiserror::Error;
use tracing::{info, info_span};

pub const DEFAULT_SURVEY_RADIUS: f64 = 50_000.0;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum SurveyError {
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    #[error("invalid survey region [{min_radius}, {max_radius}]")]
    InvalidRegion { min_radius: f64, max_radius: f64 },
}

/// Annulus around the origin that sample coordinates are drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurveyRegion {
    pub min_radius: f64,
    pub max_radius: f64,
}

impl SurveyRegion {
    pub const fn disk(radius: f64) -> Self {
        Self {
            min_radius: 0.0,
            max_radius: radius,
        }
    }

    pub const fn annulus(min_radius: f64, max_radius: f64) -> Self {
        Self {
            min_radius,
            max_radius,
        }
    }

    /// Requires `0 <= min_radius < max_radius < inf`.
    pub fn validate(&self) -> Result<(), SurveyError> {
        let valid = self.min_radius >= 0.0
            && self.min_radius < self.max_radius
            && self.max_radius.is_finite();
        if valid {
            Ok(())
        } else {
            Err(SurveyError::InvalidRegion {
                min_radius: self.min_radius,
                max_radius: self.max_radius,
            })
        }
    }

    fn points(self, seed: u64, name: &str) -> impl Iterator<Item = DVec2> {
        let mut random = XoroshiroRandom::new(seed).fork_hash(name);
        std::iter::repeat_with(move || {
            random.next_point_in_annulus(self.min_radius, self.max_radius)
        })
    }
}

impl Default for SurveyRegion {
    fn default() -> Self {
        Self::disk(DEFAULT_SURVEY_RADIUS)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    pub samples: usize,
    counts: [usize; 3],
}

impl Distribution {
    pub fn count(&self, category: TerrainCategory) -> usize {
        self.counts[category.index()]
    }

    pub fn percent(&self, category: TerrainCategory) -> f64 {
        percent(self.count(category), self.samples)
    }

    fn record(&mut self, category: TerrainCategory) {
        self.samples += 1;
        self.counts[category.index()] += 1;
    }
}

/// How much of the sand gets flooded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterInSand {
    pub samples: usize,
    /// Samples whose base category is sand.
    pub sand: usize,
    /// Of those, samples that end up as water.
    pub water: usize,
}

impl WaterInSand {
    pub fn percent(&self) -> f64 {
        percent(self.water, self.sand)
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

/// Classifies `samples` random coordinates in `region` and counts each
/// category.
pub fn survey_distribution<T>(
    classifier: &TerrainClassifier<T>,
    region: SurveyRegion,
    samples: usize,
    seed: u64,
) -> Result<Distribution, SurveyError> {
    region.validate()?;
    let _span = info_span!("survey_distribution", samples, seed).entered();
    let mut distribution = Distribution::default();
    for point in region.points(seed, "distribution").take(samples) {
        distribution.record(classifier.try_classify(point.x, point.y)?);
    }
    info!(
        min_radius = region.min_radius,
        max_radius = region.max_radius,
        grass = distribution.percent(TerrainCategory::Grass),
        sand = distribution.percent(TerrainCategory::Sand),
        water = distribution.percent(TerrainCategory::Water),
        "Terrain distribution"
    );
    Ok(distribution)
}

/// Measures the fraction of base-sand coordinates that become water.
pub fn survey_water_in_sand<T>(
    classifier: &TerrainClassifier<T>,
    region: SurveyRegion,
    samples: usize,
    seed: u64,
) -> Result<WaterInSand, SurveyError> {
    region.validate()?;
    let _span = info_span!("survey_water_in_sand", samples, seed).entered();
    let mut result = WaterInSand::default();
    for point in region.points(seed, "water_in_sand").take(samples) {
        result.samples += 1;
        if classifier.try_classify_base(point.x, point.y)? != TerrainCategory::Sand {
            continue;
        }
        result.sand += 1;
        if classifier.try_classify(point.x, point.y)? == TerrainCategory::Water {
            result.water += 1;
        }
    }
    info!(
        sand = result.sand,
        water = result.water,
        percent = result.percent(),
        "Water in sand"
    );
    Ok(result)
}

#[cfg(test)]
mod test {
    use crate::biome::TerrainCategory;
    use crate::classifier::{LifecycleError, TerrainClassifier};
    use crate::config::TerrainConfig;
    use crate::survey::{SurveyError, SurveyRegion, survey_distribution, survey_water_in_sand};
    use crate::texture::GraphicsContext;

    fn headless() -> TerrainClassifier {
        let mut classifier = TerrainClassifier::new(TerrainConfig::default()).unwrap();
        classifier.initialize(GraphicsContext::Headless).unwrap();
        classifier
    }

    #[test]
    fn requires_initialized_classifier() {
        let classifier = TerrainClassifier::<()>::new(TerrainConfig::default()).unwrap();
        assert_eq!(
            survey_distribution(&classifier, SurveyRegion::default(), 10, 0),
            Err(SurveyError::Lifecycle(LifecycleError::NotInitialized))
        );
    }

    #[test]
    fn degenerate_regions_are_errors() {
        let classifier = headless();
        for region in [
            SurveyRegion::disk(0.0),
            SurveyRegion::annulus(900.0, 300.0),
            SurveyRegion::annulus(-1.0, 300.0),
            SurveyRegion::disk(f64::INFINITY),
            SurveyRegion::disk(f64::NAN),
        ] {
            assert!(matches!(
                survey_distribution(&classifier, region, 10, 0),
                Err(SurveyError::InvalidRegion { .. })
            ));
            assert!(matches!(
                survey_water_in_sand(&classifier, region, 10, 0),
                Err(SurveyError::InvalidRegion { .. })
            ));
        }
        assert!(SurveyRegion::default().validate().is_ok());
    }

    #[test]
    fn spawn_disk_is_all_grass() {
        let classifier = headless();
        let distribution = survey_distribution(&classifier, SurveyRegion::disk(499.0), 500, 3).unwrap();
        assert_eq!(distribution.samples, 500);
        assert_eq!(distribution.count(TerrainCategory::Grass), 500);
        assert_eq!(distribution.percent(TerrainCategory::Grass), 100.0);
    }

    #[test]
    fn transition_ring_is_all_sand() {
        let classifier = headless();
        let result =
            survey_water_in_sand(&classifier, SurveyRegion::annulus(500.0, 999.0), 300, 5).unwrap();
        assert_eq!(result.sand, 300);
        assert_eq!(result.water, 0);
        assert_eq!(result.percent(), 0.0);
    }

    #[test]
    fn same_seed_same_result() {
        let classifier = headless();
        let region = SurveyRegion::disk(20_000.0);
        let first = survey_distribution(&classifier, region, 400, 11).unwrap();
        let second = survey_distribution(&headless(), region, 400, 11).unwrap();
        assert_eq!(first, second);
        let counted: usize = TerrainCategory::ALL.iter().map(|&c| first.count(c)).sum();
        assert_eq!(counted, 400);
    }

    #[test]
    fn distribution_over_default_radius() {
        let classifier = headless();
        let distribution = survey_distribution(&classifier, SurveyRegion::default(), 10_000, 0).unwrap();
        let expected = [
            (TerrainCategory::Grass, 46.6),
            (TerrainCategory::Sand, 36.9),
            (TerrainCategory::Water, 16.5),
        ];
        for (category, target) in expected {
            let actual = distribution.percent(category);
            assert!(
                (actual - target).abs() <= 5.0,
                "{category}: {actual:.2}% vs {target}%"
            );
        }
    }

    #[test]
    fn water_takes_a_share_of_sand() {
        let classifier = headless();
        let result = survey_water_in_sand(&classifier, SurveyRegion::default(), 4_000, 0).unwrap();
        assert!(result.sand > 1_000);
        let share = result.percent();
        assert!((20.0..50.0).contains(&share), "{share:.2}%");
    }
}
