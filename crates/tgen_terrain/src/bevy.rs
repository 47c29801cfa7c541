use crate::classifier::TerrainClassifier;
use crate::config::{ConfigError, TerrainConfig};
use crate::texture::GraphicsContext;
use bevy_app::{App, Plugin, Startup};
use bevy_ecs::prelude::{ResMut, Resource};
use tracing::error;

/// Server-side terrain: a headless classifier owned by the world.
#[derive(Resource)]
pub struct Terrain(pub TerrainClassifier);

pub struct TerrainPlugin {
    config: TerrainConfig,
}

impl TerrainPlugin {
    pub fn new(config: TerrainConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl Plugin for TerrainPlugin {
    fn build(&self, app: &mut App) {
        match TerrainClassifier::new(self.config.clone()) {
            Ok(classifier) => {
                app.insert_resource(Terrain(classifier))
                    .add_systems(Startup, initialize_terrain);
            }
            Err(err) => error!("invalid terrain config: {err}"),
        }
    }
}

fn initialize_terrain(mut terrain: ResMut<Terrain>) {
    if let Err(err) = terrain.0.initialize(GraphicsContext::Headless) {
        error!("failed to initialize terrain: {err}");
    }
}
