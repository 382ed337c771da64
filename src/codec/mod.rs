//! Boundary between encoded bytes and the in-memory raster model.
//!
//! Decoding produces either a true-color still or an indexed [`Sequence`]; encoding takes the
//! same two shapes back to bytes (PNG for stills, GIF for sequences).

use image::RgbaImage;

use crate::raster::frame::Sequence;

pub(crate) mod decoder;
pub(crate) mod encoder;

/// Raster formats accepted as input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    Png,
    Jpeg,
    Gif,
}

impl SourceFormat {
    /// Lowercase file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
        }
    }
}

/// A decoded single-frame image in straight RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StillImage {
    pub image: RgbaImage,
    pub format: SourceFormat,
}

/// Decoder output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decoded {
    Still(StillImage),
    Sequence(Sequence),
}

impl Decoded {
    /// Canvas width and height.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Still(s) => s.image.dimensions(),
            Self::Sequence(seq) => (seq.config.width, seq.config.height),
        }
    }

    /// Format the input was decoded from.
    pub fn format(&self) -> SourceFormat {
        match self {
            Self::Still(s) => s.format,
            Self::Sequence(_) => SourceFormat::Gif,
        }
    }
}

/// Pipeline output, ready for [`Rendered::encode`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rendered {
    Still(RgbaImage),
    Sequence(Sequence),
}

impl Rendered {
    /// Canvas width and height.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Still(img) => img.dimensions(),
            Self::Sequence(seq) => (seq.config.width, seq.config.height),
        }
    }

    /// Number of frames; 1 for a still.
    pub fn frame_count(&self) -> usize {
        match self {
            Self::Still(_) => 1,
            Self::Sequence(seq) => seq.len(),
        }
    }

    /// File extension of [`Rendered::encode`]'s output.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Still(_) => SourceFormat::Png.extension(),
            Self::Sequence(_) => SourceFormat::Gif.extension(),
        }
    }
}

pub use decoder::decode;
