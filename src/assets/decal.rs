use std::path::Path;

use anyhow::Context;
use image::RgbaImage;

use crate::{
    assets::font::FontAsset,
    foundation::error::{MemeError, MemeResult},
    raster::surface::Surface,
    text::{
        caption::{TextPainter, fit_font_size},
        layout::TextLayoutEngine,
    },
};

const BANNER_WIDTH: u32 = 500;
const BANNER_HEIGHT: u32 = 90;
const BANNER_PADDING: f32 = 16.0;
const BANNER_COLOR: [u8; 4] = [214, 24, 24, 255];
const BANNER_TEXT: &str = "TRIGGERED";

/// Banner image placed along the bottom edge by the trigger effect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decal {
    image: RgbaImage,
}

impl Decal {
    /// Decode a decal from encoded image bytes.
    pub fn from_bytes(bytes: &[u8]) -> MemeResult<Self> {
        let img = image::load_from_memory(bytes)
            .context("decode decal image from memory")
            .map_err(|e| MemeError::asset(format!("{e:#}")))?;
        Self::from_image(img.to_rgba8())
    }

    /// Read and decode a decal file.
    pub fn from_path(path: impl AsRef<Path>) -> MemeResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("read decal file {}", path.display()))
            .map_err(|e| MemeError::asset(format!("{e:#}")))?;
        Self::from_bytes(&bytes)
    }

    /// Wrap an already-decoded decal.
    pub fn from_image(image: RgbaImage) -> MemeResult<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(MemeError::asset("decal image is empty"));
        }
        Ok(Self { image })
    }

    /// The stock red "TRIGGERED" banner, lettered with `font`.
    pub fn triggered(font: &FontAsset) -> MemeResult<Self> {
        let mut engine = TextLayoutEngine::new(font)?;
        let box_w = BANNER_WIDTH as f32 - 2.0 * BANNER_PADDING;
        let box_h = BANNER_HEIGHT as f32 - BANNER_PADDING;
        let fitted = fit_font_size(&mut engine, BANNER_TEXT, box_w, box_h)?;

        let mut painter = TextPainter::new(font, BANNER_WIDTH, BANNER_HEIGHT)?;
        painter.fill_rect(
            0.0,
            0.0,
            f64::from(BANNER_WIDTH),
            f64::from(BANNER_HEIGHT),
            BANNER_COLOR,
        );
        let top = (BANNER_HEIGHT as f32 - fitted.metrics.block_height(1.0)) / 2.0;
        painter.draw_outlined(&fitted, BANNER_PADDING, top, box_w);
        let surface = painter.finish()?;
        Self::from_image(surface.to_rgba_image())
    }

    /// Straight-alpha decal pixels.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Bilinear resize to `width`, keeping the aspect ratio.
    pub fn scaled_to_width(&self, width: u32) -> MemeResult<Surface> {
        if width == 0 {
            return Err(MemeError::validation("decal width must be non-zero"));
        }
        let (w, h) = self.image.dimensions();
        let height = ((f64::from(h) * f64::from(width) / f64::from(w)).round() as u32).max(1);
        Surface::from_rgba_image(&self.image).resize(width, height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decal.rs"]
mod tests;
