use std::sync::Arc;

use crate::{
    foundation::{
        core::{Bounds, premultiply},
        error::{MemeError, MemeResult},
    },
    raster::{palette::Palette, surface::Surface},
};

/// What happens to a frame's area before the next frame is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Disposal {
    /// No disposal specified.
    #[default]
    Any,
    /// Leave the frame in place.
    Keep,
    /// Clear the frame area to the background.
    Background,
    /// Restore what was there before the frame.
    Previous,
}

/// Loop count metadata, passed through untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Repeat {
    /// Play this many extra times.
    Finite(u16),
    /// Loop forever.
    #[default]
    Infinite,
}

/// Global canvas dimensions of a sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CanvasConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
}

impl CanvasConfig {
    /// Config for a `width`×`height` canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Canvas rectangle at the origin.
    pub fn bounds(self) -> Bounds {
        Bounds::canvas(self.width, self.height)
    }
}

/// One indexed raster of a sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Position in the sequence.
    pub index: usize,
    /// Rectangle this frame covers on the canvas.
    pub bounds: Bounds,
    /// Color table for `pixels`.
    pub palette: Arc<Palette>,
    /// One palette index per pixel of `bounds`, row-major.
    pub pixels: Vec<u8>,
    /// Display duration in 1/100 s.
    pub delay: u16,
    /// Disposal applied after display.
    pub disposal: Disposal,
}

impl Frame {
    /// Build a frame, checking that the pixel buffer matches `bounds`.
    pub fn new(
        index: usize,
        bounds: Bounds,
        palette: Arc<Palette>,
        pixels: Vec<u8>,
        delay: u16,
        disposal: Disposal,
    ) -> MemeResult<Self> {
        if pixels.len() != bounds.area() {
            return Err(MemeError::validation(format!(
                "frame {index} has {} pixels for {}x{} bounds",
                pixels.len(),
                bounds.width,
                bounds.height
            )));
        }
        Ok(Self {
            index,
            bounds,
            palette,
            pixels,
            delay,
            disposal,
        })
    }

    /// Re-quantize `surface` into `palette` and place it at `(x, y)`.
    pub fn from_surface(
        index: usize,
        x: u32,
        y: u32,
        surface: &Surface,
        palette: Arc<Palette>,
        delay: u16,
        disposal: Disposal,
    ) -> MemeResult<Self> {
        let pixels = palette.dither(&surface.to_rgba_image());
        let bounds = Bounds::new(x, y, surface.width(), surface.height());
        Self::new(index, bounds, palette, pixels, delay, disposal)
    }

    /// Expand the indexed pixels into a surface of the frame's own size.
    pub fn to_surface(&self) -> MemeResult<Surface> {
        let lut: Vec<[u8; 4]> = (0..=255u8)
            .map(|i| premultiply(self.palette.color(i)))
            .collect();
        let mut data = Vec::with_capacity(self.pixels.len() * 4);
        for &i in &self.pixels {
            data.extend_from_slice(&lut[usize::from(i)]);
        }
        Surface::from_premul(self.bounds.width, self.bounds.height, data)
    }
}

/// Result of transforming one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The transform produced a new frame.
    Replaced(Frame),
    /// Degenerate geometry; the original frame passes through unchanged.
    Kept(Frame),
}

impl FrameOutcome {
    /// The frame to place in the output sequence.
    pub fn into_frame(self) -> Frame {
        match self {
            Self::Replaced(f) | Self::Kept(f) => f,
        }
    }

    /// The frame, by reference.
    pub fn frame(&self) -> &Frame {
        match self {
            Self::Replaced(f) | Self::Kept(f) => f,
        }
    }

    /// `true` for [`FrameOutcome::Kept`].
    pub fn is_kept(&self) -> bool {
        matches!(self, Self::Kept(_))
    }
}

/// Ordered frames with shared canvas metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sequence {
    /// Frames; `frames[i].index == i`.
    pub frames: Vec<Frame>,
    /// Global canvas size.
    pub config: CanvasConfig,
    /// Loop metadata.
    pub repeat: Repeat,
}

impl Sequence {
    /// Build a sequence, assigning each frame its position as index.
    pub fn new(mut frames: Vec<Frame>, config: CanvasConfig, repeat: Repeat) -> MemeResult<Self> {
        if frames.is_empty() {
            return Err(MemeError::validation("sequence must contain at least one frame"));
        }
        for (i, f) in frames.iter_mut().enumerate() {
            f.index = i;
        }
        Ok(Self {
            frames,
            config,
            repeat,
        })
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// `true` when there are no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Per-frame delays in order.
    pub fn delays(&self) -> Vec<u16> {
        self.frames.iter().map(|f| f.delay).collect()
    }

    /// Verify that every frame sits at its own index.
    pub fn check_order(&self) -> MemeResult<()> {
        for (i, f) in self.frames.iter().enumerate() {
            if f.index != i {
                return Err(MemeError::worker(format!(
                    "frame at position {i} carries index {}",
                    f.index
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/frame.rs"]
mod tests;
