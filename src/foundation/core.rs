use rand::SeedableRng;
use rand::rngs::StdRng;

/// Straight (non-premultiplied) RGBA8 color.
pub type Rgba8 = [u8; 4];

/// Premultiplied RGBA8 color (r,g,b already multiplied by a).
pub type PremulRgba8 = [u8; 4];

/// Axis-aligned pixel rectangle on the canvas.
///
/// GIF frames may cover only part of the canvas, so a frame's bounds are not necessarily the
/// canvas bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bounds {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Bounds {
    /// Construct bounds from origin and size.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bounds of a `width`×`height` canvas anchored at the origin.
    pub fn canvas(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Exclusive right edge.
    pub fn right(self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Pixel count.
    pub fn area(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// `true` when either side is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Scale all four corners by `factor`, flooring each one independently.
    pub fn scale_floor(self, factor: f64) -> Self {
        // the epsilon absorbs products like 780 * (600 / 780) landing just under an integer
        let scale = |v: u32| -> u32 { (f64::from(v) * factor + 1e-9).floor().max(0.0) as u32 };
        let x0 = scale(self.x);
        let y0 = scale(self.y);
        let x1 = scale(self.right());
        let y1 = scale(self.bottom());
        Self::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
    }
}

/// Convert straight RGBA8 to premultiplied RGBA8.
pub fn premultiply(px: Rgba8) -> PremulRgba8 {
    let a = u16::from(px[3]);
    [
        mul_div255(u16::from(px[0]), a),
        mul_div255(u16::from(px[1]), a),
        mul_div255(u16::from(px[2]), a),
        px[3],
    ]
}

/// Convert premultiplied RGBA8 back to straight RGBA8.
pub fn unpremultiply(px: PremulRgba8) -> Rgba8 {
    let a = u32::from(px[3]);
    if a == 0 {
        return [0, 0, 0, 0];
    }
    if a == 255 {
        return px;
    }
    let un = |c: u8| -> u8 { ((u32::from(c) * 255 + a / 2) / a).min(255) as u8 };
    [un(px[0]), un(px[1]), un(px[2]), px[3]]
}

pub(crate) fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

/// Deterministic per-frame RNG derived from a pipeline seed and a frame index.
///
/// Workers own their generator, so parallel passes draw the same offsets regardless of the
/// order in which frames are scheduled.
pub fn frame_rng(seed: u64, index: usize) -> StdRng {
    StdRng::seed_from_u64(seed ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
