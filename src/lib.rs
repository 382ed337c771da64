//! memegen captions still images and animated GIFs.
//!
//! Input bytes are decoded into either a true-color still or an indexed [`Sequence`]. A render
//! then runs up to four passes over it:
//!
//! 1. **Shake**: random displaced crops. A still becomes a ten-frame animation; a sequence is
//!    composited frame by frame onto one canvas and cropped from it (serial).
//! 2. **Trigger**: a jittered banner decal along the bottom edge (parallel).
//! 3. **Reduce**: downscale so the longer side fits the maximum dimension, either per frame in
//!    parallel ([`StandardReducer`]) or from in-order composites ([`SerialReducer`]).
//! 4. **Caption**: outlined, upper-cased top and bottom text, fitted by a linear font-size search
//!    and pre-rendered once into a [`CaptionLayer`] that every frame composites (parallel).
//!
//! Parallel passes go through [`FrameCoordinator`], which collects exactly one result per frame
//! and places it by index, so output order never depends on completion order.
//!
//! Pixels are premultiplied RGBA8 while compositing; every write back into a frame is
//! Floyd–Steinberg dithered into a palette.
#![forbid(unsafe_code)]

mod assets;
mod codec;
mod foundation;
mod raster;
mod render;
mod text;

pub use assets::decal::Decal;
pub use assets::font::FontAsset;
pub use codec::{Decoded, Rendered, SourceFormat, StillImage, decode};
pub use foundation::core::{Bounds, PremulRgba8, Rgba8, frame_rng, premultiply, unpremultiply};
pub use foundation::error::{MemeError, MemeResult};
pub use raster::frame::{CanvasConfig, Disposal, Frame, FrameOutcome, Repeat, Sequence};
pub use raster::palette::Palette;
pub use raster::surface::{Surface, over};
pub use render::coordinator::{FrameCoordinator, WorkUnit};
pub use render::overlay::{overlay_sequence, overlay_still};
pub use render::pipeline::render;
pub use render::request::{
    DEFAULT_MAX_DIMENSION, Effect, Quality, RenderContext, RenderRequest, RenderThreading,
};
pub use render::resize::{
    SequenceReducer, SerialReducer, StandardReducer, resize_still, scale_factor,
};
pub use render::shake::{
    SHAKE_DELAY, SHAKE_FRAMES, SHAKE_INTENSITY, crop_size, shake_sequence, shake_still,
};
pub use render::trigger::{TRIGGER_JITTER, TRIGGER_MARGIN, apply_trigger, decal_origin};
pub use text::caption::{
    BORDER_ANGLE_STEP, BORDER_RADIUS, Banner, CaptionLayer, FittedText, LEADING, MARGIN,
    MAX_FONT_SIZE, MIN_FONT_SIZE, fit_font_size, normalize_caption,
};
pub use text::layout::{TextLayoutEngine, TextMetrics};
