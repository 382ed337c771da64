use std::{cell::RefCell, collections::HashMap};

use image::{Rgba, RgbaImage, imageops::ColorMap};

use crate::foundation::{
    core::Rgba8,
    error::{MemeError, MemeResult},
};

/// Alpha values below this threshold map to the transparent index when one exists.
const TRANSPARENT_ALPHA_THRESHOLD: u8 = 128;

/// NeuQuant sampling factor; 1 is slowest/best, 30 fastest.
const NEUQUANT_SAMPLE_FACTOR: i32 = 10;

/// Indexed color table: index -> straight RGBA8, with an optional transparent index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgba8>,
    transparent: Option<u8>,
}

impl Palette {
    /// Largest palette an indexed frame can carry.
    pub const MAX_COLORS: usize = 256;

    /// Build a palette from explicit colors.
    ///
    /// The transparent entry (if any) is forced to alpha 0 so expansion and matching agree.
    pub fn new(mut colors: Vec<Rgba8>, transparent: Option<u8>) -> MemeResult<Self> {
        if colors.is_empty() {
            return Err(MemeError::validation("palette must contain at least one color"));
        }
        if colors.len() > Self::MAX_COLORS {
            return Err(MemeError::validation(format!(
                "palette has {} colors, at most {} allowed",
                colors.len(),
                Self::MAX_COLORS
            )));
        }
        if let Some(t) = transparent {
            let slot = colors.get_mut(usize::from(t)).ok_or_else(|| {
                MemeError::validation(format!("transparent index {t} outside palette"))
            })?;
            *slot = [0, 0, 0, 0];
        }
        Ok(Self {
            colors,
            transparent,
        })
    }

    /// Build a palette from packed RGB triplets (the GIF color table layout).
    pub fn from_rgb_bytes(rgb: &[u8], transparent: Option<u8>) -> MemeResult<Self> {
        if !rgb.len().is_multiple_of(3) {
            return Err(MemeError::decode("color table length is not a multiple of 3"));
        }
        let colors = rgb
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2], 255])
            .collect();
        Self::new(colors, transparent)
    }

    /// Derive a palette from sample images with NeuQuant.
    ///
    /// When any sample pixel is transparent, one slot is reserved as the transparent index.
    pub fn quantize(samples: &[&RgbaImage], max_colors: usize) -> MemeResult<Self> {
        let max_colors = max_colors.clamp(2, Self::MAX_COLORS);
        let mut pixels = Vec::new();
        let mut has_transparency = false;
        for img in samples {
            for px in img.pixels() {
                if px.0[3] < TRANSPARENT_ALPHA_THRESHOLD {
                    has_transparency = true;
                    continue;
                }
                pixels.extend_from_slice(&[px.0[0], px.0[1], px.0[2], 255]);
            }
        }

        if pixels.is_empty() {
            return Self::new(vec![[0, 0, 0, 0]], Some(0));
        }

        let opaque_slots = if has_transparency {
            max_colors - 1
        } else {
            max_colors
        };
        let nq = color_quant::NeuQuant::new(NEUQUANT_SAMPLE_FACTOR, opaque_slots, &pixels);
        let mut colors: Vec<Rgba8> = nq
            .color_map_rgba()
            .chunks_exact(4)
            .map(|c| [c[0], c[1], c[2], 255])
            .collect();

        let transparent = if has_transparency {
            colors.push([0, 0, 0, 0]);
            Some((colors.len() - 1) as u8)
        } else {
            None
        };
        Self::new(colors, transparent)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`; construction rejects empty palettes.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Transparent index, if any.
    pub fn transparent(&self) -> Option<u8> {
        self.transparent
    }

    /// Color for `index`; indices past the table read as transparent black.
    pub fn color(&self, index: u8) -> Rgba8 {
        self.colors
            .get(usize::from(index))
            .copied()
            .unwrap_or([0, 0, 0, 0])
    }

    /// Packed RGB triplets for the GIF color table.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.colors.len() * 3);
        for c in &self.colors {
            out.extend_from_slice(&c[..3]);
        }
        out
    }

    /// Index of the closest entry to `px`.
    pub fn nearest(&self, px: Rgba8) -> u8 {
        if let Some(t) = self.transparent
            && px[3] < TRANSPARENT_ALPHA_THRESHOLD
        {
            return t;
        }

        let mut best = 0usize;
        let mut best_dist = u32::MAX;
        for (i, c) in self.colors.iter().enumerate() {
            if Some(i as u8) == self.transparent {
                continue;
            }
            let dist = sq_dist(*c, px);
            if dist < best_dist {
                best = i;
                best_dist = dist;
                if dist == 0 {
                    break;
                }
            }
        }
        if best_dist == u32::MAX {
            // only the transparent entry exists
            return self.transparent.unwrap_or(0);
        }
        best as u8
    }

    /// Re-quantize `image` into this palette with Floyd–Steinberg error diffusion.
    ///
    /// Returns one index per pixel in row-major order.
    pub fn dither(&self, image: &RgbaImage) -> Vec<u8> {
        let map = CachedMap::new(self);
        let mut work = image.clone();
        image::imageops::dither(&mut work, &map);
        image::imageops::index_colors(&work, &map).into_raw()
    }
}

/// [`Palette::nearest`] memoized per distinct color for the length of one `dither` call.
struct CachedMap<'a> {
    palette: &'a Palette,
    cache: RefCell<HashMap<Rgba8, u8>>,
}

impl<'a> CachedMap<'a> {
    fn new(palette: &'a Palette) -> Self {
        Self {
            palette,
            cache: RefCell::new(HashMap::new()),
        }
    }

    fn nearest(&self, px: Rgba8) -> u8 {
        *self
            .cache
            .borrow_mut()
            .entry(px)
            .or_insert_with(|| self.palette.nearest(px))
    }
}

impl ColorMap for CachedMap<'_> {
    type Color = Rgba<u8>;

    fn index_of(&self, color: &Rgba<u8>) -> usize {
        usize::from(self.nearest(color.0))
    }

    fn map_color(&self, color: &mut Rgba<u8>) {
        *color = Rgba(self.palette.color(self.nearest(color.0)));
    }
}

fn sq_dist(a: Rgba8, b: Rgba8) -> u32 {
    let mut sum = 0u32;
    for i in 0..4 {
        let d = i32::from(a[i]) - i32::from(b[i]);
        sum += (d * d) as u32;
    }
    sum
}

#[cfg(test)]
#[path = "../../tests/unit/raster/palette.rs"]
mod tests;
