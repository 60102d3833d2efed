//! Texture cache for stored radar frames.
//!
//! GIFs are decoded once and kept as egui textures keyed by path. A new
//! radar result bumps the state generation, which drops the cache.

use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Decodes the first frame of a GIF file.
pub fn decode_gif(path: &Path) -> Result<ColorImage, String> {
    let bytes = std::fs::read(path).map_err(|e| format!("read {}: {}", path.display(), e))?;
    let image = image::load_from_memory_with_format(&bytes, image::ImageFormat::Gif)
        .map_err(|e| format!("decode {}: {}", path.display(), e))?
        .to_rgba8();

    let (width, height) = image.dimensions();
    Ok(ColorImage::from_rgba_unmultiplied(
        [width as usize, height as usize],
        image.as_raw(),
    ))
}

#[derive(Default)]
pub struct RadarTextures {
    /// `None` marks a frame that failed to decode, so it is not retried
    /// every frame.
    textures: HashMap<PathBuf, Option<TextureHandle>>,
    generation: u64,
}

impl RadarTextures {
    /// Drops every texture if the radar state changed since the last call.
    pub fn sync(&mut self, generation: u64) {
        if generation != self.generation {
            log::debug!("Invalidating {} radar textures", self.textures.len());
            self.textures.clear();
            self.generation = generation;
        }
    }

    /// Texture for `path`, decoding and uploading it on first use.
    pub fn get(&mut self, ctx: &egui::Context, path: &Path) -> Option<TextureHandle> {
        self.textures
            .entry(path.to_path_buf())
            .or_insert_with(|| match decode_gif(path) {
                Ok(image) => Some(ctx.load_texture(
                    path.to_string_lossy(),
                    image,
                    TextureOptions {
                        magnification: egui::TextureFilter::Linear,
                        minification: egui::TextureFilter::Linear,
                        ..Default::default()
                    },
                )),
                Err(e) => {
                    log::warn!("Radar frame unavailable: {}", e);
                    None
                }
            })
            .clone()
    }
}
