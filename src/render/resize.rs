use image::RgbaImage;

use crate::{
    foundation::error::{MemeError, MemeResult},
    raster::{
        frame::{CanvasConfig, Disposal, Frame, FrameOutcome, Sequence},
        surface::Surface,
    },
    render::coordinator::FrameCoordinator,
};

/// Downscale factor that brings the longer side of `width`×`height` to `max`.
///
/// Never upscales: returns exactly `1.0` when both sides are within `max`.
pub fn scale_factor(width: u32, height: u32, max: u32) -> MemeResult<f64> {
    if max == 0 {
        return Err(MemeError::validation("max dimension must be >= 1"));
    }
    let factor = if width >= height && width > max {
        f64::from(max) / f64::from(width)
    } else if height > width && height > max {
        f64::from(max) / f64::from(height)
    } else {
        1.0
    };
    Ok(factor)
}

/// Bilinear downscale of a still so its longer side is at most `max`.
pub fn resize_still(image: &RgbaImage, max: u32) -> MemeResult<RgbaImage> {
    let (w, h) = image.dimensions();
    let factor = scale_factor(w, h, max)?;
    if factor == 1.0 {
        return Ok(image.clone());
    }
    let nw = ((f64::from(w) * factor).round() as u32).max(1);
    let nh = ((f64::from(h) * factor).round() as u32).max(1);
    tracing::debug!(from = ?(w, h), to = ?(nw, nh), factor, "resize still");
    let resized = Surface::from_rgba_image(image).resize(nw, nh)?;
    Ok(resized.to_rgba_image())
}

/// Strategy for shrinking every frame of a sequence by one factor taken from frame 0.
pub trait SequenceReducer {
    fn reduce(&self, seq: &Sequence, max: u32) -> MemeResult<Sequence>;
}

/// Factor from frame 0's bounds, the canvas-defining frame.
fn sequence_factor(seq: &Sequence, max: u32) -> MemeResult<f64> {
    let first = seq
        .frames
        .first()
        .ok_or_else(|| MemeError::validation("cannot reduce an empty sequence"))?;
    scale_factor(first.bounds.width, first.bounds.height, max)
}

/// Resizes each frame's own rectangle independently, in parallel.
pub struct StandardReducer<'p> {
    coordinator: FrameCoordinator<'p>,
}

impl<'p> StandardReducer<'p> {
    pub fn new(pool: &'p rayon::ThreadPool) -> Self {
        Self {
            coordinator: FrameCoordinator::new(pool),
        }
    }
}

impl SequenceReducer for StandardReducer<'_> {
    #[tracing::instrument(name = "reduce_standard", skip(self, seq), fields(frames = seq.len()))]
    fn reduce(&self, seq: &Sequence, max: u32) -> MemeResult<Sequence> {
        let factor = sequence_factor(seq, max)?;
        if factor == 1.0 {
            return Ok(seq.clone());
        }

        let mut out = self
            .coordinator
            .map_frames(seq, |frame| resize_frame(frame, factor))?;
        let first = seq.frames[0].bounds.scale_floor(factor);
        if !first.is_empty() {
            out.config = CanvasConfig::new(first.width, first.height);
        }
        tracing::debug!(
            factor,
            width = out.config.width,
            height = out.config.height,
            "reduced sequence"
        );
        Ok(out)
    }
}

fn resize_frame(frame: &Frame, factor: f64) -> MemeResult<FrameOutcome> {
    let target = frame.bounds.scale_floor(factor);
    if target.is_empty() {
        tracing::debug!(index = frame.index, ?target, "degenerate resize target");
        return Ok(FrameOutcome::Kept(frame.clone()));
    }
    let resized = frame.to_surface()?.resize(target.width, target.height)?;
    Frame::from_surface(
        frame.index,
        target.x,
        target.y,
        &resized,
        frame.palette.clone(),
        frame.delay,
        frame.disposal,
    )
    .map(FrameOutcome::Replaced)
}

/// Composites frames in order onto one canvas and resizes the composite.
///
/// Each output frame depends on every earlier frame, so this never runs in parallel.
pub struct SerialReducer;

impl SequenceReducer for SerialReducer {
    #[tracing::instrument(name = "reduce_serial", skip(self, seq), fields(frames = seq.len()))]
    fn reduce(&self, seq: &Sequence, max: u32) -> MemeResult<Sequence> {
        let factor = sequence_factor(seq, max)?;
        if factor == 1.0 {
            return Ok(seq.clone());
        }

        let origin = seq.frames[0].bounds;
        let target = origin.scale_floor(factor);
        if target.is_empty() {
            tracing::debug!(?target, "degenerate resize target, sequence unchanged");
            return Ok(seq.clone());
        }

        let mut canvas = Surface::new(origin.width, origin.height);
        let mut frames = Vec::with_capacity(seq.len());
        for frame in &seq.frames {
            canvas.draw_over(
                &frame.to_surface()?,
                i64::from(frame.bounds.x) - i64::from(origin.x),
                i64::from(frame.bounds.y) - i64::from(origin.y),
            );
            let resized = canvas.resize(target.width, target.height)?;
            frames.push(Frame::from_surface(
                frame.index,
                target.x,
                target.y,
                &resized,
                frame.palette.clone(),
                frame.delay,
                Disposal::Background,
            )?);
        }

        let out = Sequence {
            frames,
            config: CanvasConfig::new(target.width, target.height),
            repeat: seq.repeat,
        };
        out.check_order()?;
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/resize.rs"]
mod tests;
