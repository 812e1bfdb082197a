use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::cli::CompressionLevel;
use crate::error::SplitError;
use crate::output::save_png;

/// Destination for exported sprites (file system, preview, test harness)
pub trait SpriteSink {
    fn write_sprite(&mut self, name: &str, sprite: &RgbaImage) -> Result<(), SplitError>;
}

/// Writes each sprite as `<dir>/<name>` PNG
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    compress: Option<CompressionLevel>,
}

impl DirectorySink {
    /// The directory must already exist
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            compress: None,
        }
    }

    pub fn compress(mut self, level: Option<CompressionLevel>) -> Self {
        self.compress = level;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

impl SpriteSink for DirectorySink {
    fn write_sprite(&mut self, name: &str, sprite: &RgbaImage) -> Result<(), SplitError> {
        save_png(sprite, &self.path_for(name), self.compress)
    }
}

/// Keeps sprites in memory, in delivery order
#[derive(Debug, Default)]
pub struct MemorySink {
    sprites: Vec<(String, RgbaImage)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sprites(&self) -> &[(String, RgbaImage)] {
        &self.sprites
    }

    pub fn into_sprites(self) -> Vec<(String, RgbaImage)> {
        self.sprites
    }
}

impl SpriteSink for MemorySink {
    fn write_sprite(&mut self, name: &str, sprite: &RgbaImage) -> Result<(), SplitError> {
        self.sprites.push((name.to_string(), sprite.clone()));
        Ok(())
    }
}
