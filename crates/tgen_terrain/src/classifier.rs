use crate::biome::TerrainCategory;
use crate::config::{ConfigError, TerrainConfig};
use crate::memo::MemoStats;
use crate::texture::{GraphicsContext, TextureError, TextureSet};
use crate::water::WaterClassifier;
use std::mem;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("terrain classifier is not initialized")]
    NotInitialized,
    #[error("terrain classifier is already initialized")]
    AlreadyInitialized,
    #[error("terrain classifier has been disposed")]
    Disposed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Initialized,
    Disposed,
}

enum Stage<T> {
    Uninitialized(Box<WaterClassifier>),
    Initialized {
        engine: Box<WaterClassifier>,
        textures: Option<TextureSet<T>>,
    },
    Disposed,
}

/// The single entry point for terrain lookups.
///
/// Construction validates the configuration and builds the noise fields, zone
/// table and caches; [`TerrainClassifier::initialize`] then attaches textures
/// when a graphics context is available. Classification is identical with or
/// without textures.
pub struct TerrainClassifier<T = ()> {
    config: TerrainConfig,
    stage: Stage<T>,
}

impl<T> TerrainClassifier<T> {
    pub fn new(config: TerrainConfig) -> Result<Self, ConfigError> {
        let engine = WaterClassifier::new(&config)?;
        Ok(Self {
            config,
            stage: Stage::Uninitialized(Box::new(engine)),
        })
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn initialize(&mut self, graphics: GraphicsContext<'_, T>) -> Result<(), LifecycleError> {
        let engine = match mem::replace(&mut self.stage, Stage::Disposed) {
            Stage::Uninitialized(engine) => engine,
            other => {
                let err = match other {
                    Stage::Initialized { .. } => LifecycleError::AlreadyInitialized,
                    _ => LifecycleError::Disposed,
                };
                self.stage = other;
                return Err(err);
            }
        };

        let textures = match graphics {
            GraphicsContext::Headless => None,
            GraphicsContext::Available(generator) => match TextureSet::generate(generator) {
                Ok(textures) => Some(textures),
                Err(err) => {
                    warn!(error = %err, "Texture generation failed, falling back to headless mode");
                    None
                }
            },
        };
        info!(
            headless = textures.is_none(),
            base_seed = self.config.base.seed,
            water_seed = self.config.water.seed,
            buffer_radius = self.config.buffer.radius,
            "Terrain classifier initialized"
        );
        self.stage = Stage::Initialized { engine, textures };
        Ok(())
    }

    pub fn state(&self) -> LifecycleState {
        match self.stage {
            Stage::Uninitialized(_) => LifecycleState::Uninitialized,
            Stage::Initialized { .. } => LifecycleState::Initialized,
            Stage::Disposed => LifecycleState::Disposed,
        }
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.stage, Stage::Initialized { .. })
    }

    /// True once initialized without textures.
    pub fn is_headless(&self) -> bool {
        matches!(self.stage, Stage::Initialized { textures: None, .. })
    }

    fn engine(&self) -> Result<&WaterClassifier, LifecycleError> {
        match &self.stage {
            Stage::Initialized { engine, .. } => Ok(engine.as_ref()),
            Stage::Uninitialized(_) => Err(LifecycleError::NotInitialized),
            Stage::Disposed => Err(LifecycleError::Disposed),
        }
    }

    fn expect_engine(&self) -> &WaterClassifier {
        match self.engine() {
            Ok(engine) => engine,
            Err(err) => panic!("cannot classify terrain: {err}"),
        }
    }

    /// Final category at `(x, y)`.
    ///
    /// # Panics
    ///
    /// If the classifier is not initialized or has been disposed.
    pub fn classify(&self, x: f64, y: f64) -> TerrainCategory {
        self.expect_engine().classify_final(x, y)
    }

    /// Category before water is laid over sand.
    ///
    /// # Panics
    ///
    /// If the classifier is not initialized or has been disposed.
    pub fn classify_base(&self, x: f64, y: f64) -> TerrainCategory {
        self.expect_engine().classify_base(x, y)
    }

    pub fn try_classify(&self, x: f64, y: f64) -> Result<TerrainCategory, LifecycleError> {
        Ok(self.engine()?.classify_final(x, y))
    }

    pub fn try_classify_base(&self, x: f64, y: f64) -> Result<TerrainCategory, LifecycleError> {
        Ok(self.engine()?.classify_base(x, y))
    }

    pub fn texture_for(&self, category: TerrainCategory) -> Result<&T, TextureError> {
        match &self.stage {
            Stage::Initialized {
                textures: Some(textures),
                ..
            } => Ok(textures.get(category)),
            Stage::Initialized { textures: None, .. } => Err(TextureError::Headless),
            Stage::Uninitialized(_) => Err(TextureError::NotInitialized),
            Stage::Disposed => Err(TextureError::Disposed),
        }
    }

    pub fn memo_stats(&self) -> Result<MemoStats, LifecycleError> {
        Ok(self.engine()?.memo().stats())
    }

    pub fn clear_caches(&self) -> Result<(), LifecycleError> {
        self.engine()?.memo().clear();
        Ok(())
    }

    /// Drops the engine and textures. No further transition is possible.
    pub fn dispose(&mut self) {
        if let Ok(stats) = self.memo_stats() {
            debug!(
                buffer_hit_rate = stats.buffer.hit_rate(),
                base_hit_rate = stats.base.hit_rate(),
                "Terrain classifier disposed"
            );
        }
        self.stage = Stage::Disposed;
    }
}
