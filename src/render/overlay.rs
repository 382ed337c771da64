use image::RgbaImage;

use crate::{
    foundation::error::MemeResult,
    raster::{
        frame::{Frame, FrameOutcome, Sequence},
        surface::Surface,
    },
    render::coordinator::FrameCoordinator,
    text::caption::CaptionLayer,
};

/// Composite the caption layer over a still.
pub fn overlay_still(image: &RgbaImage, layer: &CaptionLayer) -> RgbaImage {
    if layer.is_empty() {
        return image.clone();
    }
    let mut surface = Surface::from_rgba_image(image);
    layer.apply(&mut surface, 0, 0);
    surface.to_rgba_image()
}

/// Composite the caption layer over every frame, re-quantizing into each frame's palette.
///
/// Only the part of the layer under a frame's bounds is drawn into that frame.
#[tracing::instrument(skip_all, fields(frames = seq.len()))]
pub fn overlay_sequence(
    coordinator: &FrameCoordinator<'_>,
    seq: &Sequence,
    layer: &CaptionLayer,
) -> MemeResult<Sequence> {
    if layer.is_empty() {
        return Ok(seq.clone());
    }
    coordinator.map_frames(seq, |frame| overlay_frame(frame, layer))
}

fn overlay_frame(frame: &Frame, layer: &CaptionLayer) -> MemeResult<FrameOutcome> {
    if frame.bounds.is_empty() {
        return Ok(FrameOutcome::Kept(frame.clone()));
    }
    let mut surface = frame.to_surface()?;
    layer.apply(&mut surface, frame.bounds.x, frame.bounds.y);
    Frame::from_surface(
        frame.index,
        frame.bounds.x,
        frame.bounds.y,
        &surface,
        frame.palette.clone(),
        frame.delay,
        frame.disposal,
    )
    .map(FrameOutcome::Replaced)
}
