use crate::biome::TerrainCategory;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TextureError {
    #[error("running headless, no textures available")]
    Headless,
    #[error("classifier is not initialized")]
    NotInitialized,
    #[error("classifier has been disposed")]
    Disposed,
    #[error("graphics unavailable: {0}")]
    Unavailable(String),
}

/// Produces one tile texture per terrain category.
pub trait TextureGenerator {
    type Texture;

    fn generate(&mut self, category: TerrainCategory) -> Result<Self::Texture, TextureError>;
}

/// Whether the caller can render. Server-side simulation passes `Headless`.
pub enum GraphicsContext<'a, T> {
    Headless,
    Available(&'a mut dyn TextureGenerator<Texture = T>),
}

/// Generated textures indexed by category.
pub(crate) struct TextureSet<T> {
    textures: [T; 3],
}

impl<T> TextureSet<T> {
    pub(crate) fn generate(
        generator: &mut dyn TextureGenerator<Texture = T>,
    ) -> Result<Self, TextureError> {
        let [grass, sand, water] = TerrainCategory::ALL;
        Ok(Self {
            textures: [
                generator.generate(grass)?,
                generator.generate(sand)?,
                generator.generate(water)?,
            ],
        })
    }

    pub(crate) fn get(&self, category: TerrainCategory) -> &T {
        &self.textures[category.index()]
    }
}

#[cfg(test)]
mod test {
    use crate::biome::TerrainCategory;
    use crate::texture::{TextureError, TextureGenerator, TextureSet};

    struct FailsOn(TerrainCategory);

    impl TextureGenerator for FailsOn {
        type Texture = TerrainCategory;

        fn generate(&mut self, category: TerrainCategory) -> Result<TerrainCategory, TextureError> {
            if category == self.0 {
                Err(TextureError::Unavailable(format!("{category}")))
            } else {
                Ok(category)
            }
        }
    }

    #[test]
    fn set_is_indexed_by_category() {
        struct Echo;
        impl TextureGenerator for Echo {
            type Texture = TerrainCategory;

            fn generate(&mut self, category: TerrainCategory) -> Result<TerrainCategory, TextureError> {
                Ok(category)
            }
        }
        let set = TextureSet::generate(&mut Echo).unwrap();
        for category in TerrainCategory::ALL {
            assert_eq!(*set.get(category), category);
        }
    }

    #[test]
    fn generator_failure_is_propagated() {
        let err = TextureSet::generate(&mut FailsOn(TerrainCategory::Sand)).err();
        assert_eq!(err, Some(TextureError::Unavailable("sand".into())));
    }
}
