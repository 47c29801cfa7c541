pub mod biome;
pub mod buffer;
pub mod classifier;
pub mod config;
pub mod memo;
pub mod noise;
pub mod survey;
pub mod texture;
pub mod water;
pub mod zone;

#[cfg(feature = "bevy")]
pub mod bevy;

pub use biome::TerrainCategory;
pub use classifier::{LifecycleError, LifecycleState, TerrainClassifier};
pub use config::{ConfigError, TerrainConfig};
pub use survey::SurveyError;
pub use texture::{GraphicsContext, TextureError, TextureGenerator};
