pub mod value_noise;

pub use value_noise::ValueNoise;

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};

pub const MAX_LAYERS: usize = 4;
const WEIGHT_TOLERANCE: f64 = 1e-6;

/// One scale of a layered field: input coordinates are multiplied by
/// `frequency` before sampling and the result contributes `weight`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseLayer {
    pub frequency: f64,
    pub weight: f64,
}

impl NoiseLayer {
    pub const fn new(frequency: f64, weight: f64) -> Self {
        Self { frequency, weight }
    }

    /// World units covered by one lattice cell of this layer.
    pub fn wavelength(&self) -> f64 {
        1.0 / self.frequency
    }
}

/// A single seeded field sampled at several scales and blended with fixed
/// weights that sum to one.
#[derive(Clone, Debug, PartialEq)]
pub struct LayeredNoise {
    field: ValueNoise,
    layers: Vec<NoiseLayer>,
}

impl LayeredNoise {
    pub fn new(seed: i32, layers: Vec<NoiseLayer>) -> Result<Self, ConfigError> {
        validate_layers(&layers)?;
        Ok(Self {
            field: ValueNoise::new(seed),
            layers,
        })
    }

    pub fn seed(&self) -> i32 {
        self.field.seed()
    }

    pub fn layers(&self) -> &[NoiseLayer] {
        &self.layers
    }

    /// Weighted sum over layers, in `[-1, 1]`.
    #[inline]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let mut total = 0.0;
        for layer in &self.layers {
            total += layer.weight * self.field.sample(x * layer.frequency, y * layer.frequency);
        }
        total.clamp(-1.0, 1.0)
    }

    /// [`Self::sample`] remapped to `[0, 1]` for comparison against thresholds.
    #[inline]
    pub fn sample_unit(&self, x: f64, y: f64) -> f64 {
        (self.sample(x, y) + 1.0) * 0.5
    }
}

pub(crate) fn validate_layers(layers: &[NoiseLayer]) -> Result<(), ConfigError> {
    if layers.is_empty() || layers.len() > MAX_LAYERS {
        return Err(ConfigError::LayerCount(layers.len()));
    }
    for (index, layer) in layers.iter().enumerate() {
        if !layer.frequency.is_finite() || layer.frequency <= 0.0 {
            return Err(ConfigError::LayerFrequency {
                index,
                value: layer.frequency,
            });
        }
        if !layer.weight.is_finite() || layer.weight < 0.0 {
            return Err(ConfigError::LayerWeight {
                index,
                value: layer.weight,
            });
        }
    }
    let sum: f64 = layers.iter().map(|layer| layer.weight).sum();
    if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(ConfigError::LayerWeightSum(sum));
    }
    Ok(())
}
