use image::{Rgba, RgbaImage, imageops::FilterType};

use crate::foundation::{
    core::{Bounds, PremulRgba8, mul_div255, premultiply, unpremultiply},
    error::{MemeError, MemeResult},
};

/// True-color canvas in premultiplied RGBA8, row-major, tightly packed.
///
/// All compositing happens on surfaces; indexed frames are expanded into a surface, drawn on,
/// and re-quantized back into a palette.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; width as usize * height as usize * 4],
        }
    }

    /// Wrap premultiplied bytes, validating the length.
    pub fn from_premul(width: u32, height: u32, data: Vec<u8>) -> MemeResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| MemeError::validation("surface size overflow"))?;
        if data.len() != expected {
            return Err(MemeError::validation(format!(
                "surface expects {expected} bytes for {width}x{height}, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Premultiply a straight-alpha image.
    pub fn from_rgba_image(img: &RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for px in img.pixels() {
            data.extend_from_slice(&premultiply(px.0));
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Straight-alpha copy of this surface.
    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            Rgba(unpremultiply(self.pixel(x, y)))
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied pixel at `(x, y)`; callers keep coordinates in range.
    pub fn pixel(&self, x: u32, y: u32) -> PremulRgba8 {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Paint `src` over this surface with its origin at `(x, y)`, clipped to both surfaces.
    pub fn draw_over(&mut self, src: &Surface, x: i64, y: i64) {
        let dst_w = i64::from(self.width);
        let dst_h = i64::from(self.height);
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + i64::from(src.width)).min(dst_w);
        let y1 = (y + i64::from(src.height)).min(dst_h);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let row_len = ((x1 - x0) * 4) as usize;
        for dy in y0..y1 {
            let sy = (dy - y) as usize;
            let sx = (x0 - x) as usize;
            let s_start = (sy * src.width as usize + sx) * 4;
            let d_start = (dy as usize * self.width as usize + x0 as usize) * 4;
            let s_row = &src.data[s_start..s_start + row_len];
            let d_row = &mut self.data[d_start..d_start + row_len];
            for (d, s) in d_row.chunks_exact_mut(4).zip(s_row.chunks_exact(4)) {
                let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
                d.copy_from_slice(&out);
            }
        }
    }

    /// Copy out the `bounds` window, which must lie inside the surface.
    pub fn crop(&self, bounds: Bounds) -> MemeResult<Surface> {
        if bounds.right() > self.width || bounds.bottom() > self.height {
            return Err(MemeError::validation(format!(
                "crop {bounds:?} exceeds surface {}x{}",
                self.width, self.height
            )));
        }
        let mut data = Vec::with_capacity(bounds.area() * 4);
        let row_len = bounds.width as usize * 4;
        for y in bounds.y..bounds.bottom() {
            let start = (y as usize * self.width as usize + bounds.x as usize) * 4;
            data.extend_from_slice(&self.data[start..start + row_len]);
        }
        Surface::from_premul(bounds.width, bounds.height, data)
    }

    /// Bilinear resize to `width`×`height`.
    ///
    /// Filtering runs on premultiplied data so transparent pixels do not bleed color.
    pub fn resize(&self, width: u32, height: u32) -> MemeResult<Surface> {
        if width == 0 || height == 0 {
            return Err(MemeError::validation("resize target must be non-empty"));
        }
        if width == self.width && height == self.height {
            return Ok(self.clone());
        }
        let buf = RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| MemeError::validation("surface buffer length mismatch"))?;
        let resized = image::imageops::resize(&buf, width, height, FilterType::Triangle);
        Surface::from_premul(width, height, resized.into_raw())
    }
}

/// Source-over for premultiplied pixels.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/raster/surface.rs"]
mod tests;
