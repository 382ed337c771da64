use std::sync::Arc;

use image::RgbaImage;
use rand::Rng;

use crate::{
    foundation::{
        core::{Bounds, frame_rng},
        error::MemeResult,
    },
    raster::{
        frame::{CanvasConfig, Disposal, Frame, FrameOutcome, Repeat, Sequence},
        palette::Palette,
        surface::Surface,
    },
    render::coordinator::{FrameCoordinator, WorkUnit},
};

/// Largest displacement in either axis, in px.
pub const SHAKE_INTENSITY: u32 = 10;
/// Frames generated from a still.
pub const SHAKE_FRAMES: usize = 10;
/// Delay of every frame generated from a still, in 1/100 s.
pub const SHAKE_DELAY: u16 = 2;

/// Crop window for a `width`×`height` canvas; `None` when it would be empty.
pub fn crop_size(width: u32, height: u32) -> Option<(u32, u32)> {
    let w = width.checked_sub(2 * SHAKE_INTENSITY)?;
    let h = height.checked_sub(2 * SHAKE_INTENSITY)?;
    (w > 0 && h > 0).then_some((w, h))
}

fn sample_offset(rng: &mut impl Rng) -> (u32, u32) {
    (
        rng.gen_range(0..=SHAKE_INTENSITY),
        rng.gen_range(0..=SHAKE_INTENSITY),
    )
}

/// Animate a still into [`SHAKE_FRAMES`] randomly displaced crops.
///
/// Every frame only reads the shared still, so frames are built in parallel. The palette is
/// derived once from `still` plus `palette_extra` (images drawn later that must keep their
/// colors). A still too small to crop still yields [`SHAKE_FRAMES`] frames, each the full
/// still at zero offset.
#[tracing::instrument(skip_all, fields(width = still.width(), height = still.height()))]
pub fn shake_still(
    coordinator: &FrameCoordinator<'_>,
    still: &RgbaImage,
    palette_extra: &[&RgbaImage],
    seed: u64,
) -> MemeResult<Sequence> {
    let mut samples = vec![still];
    samples.extend_from_slice(palette_extra);
    let palette = Arc::new(Palette::quantize(&samples, Palette::MAX_COLORS)?);
    let source = Surface::from_rgba_image(still);

    let window = crop_size(still.width(), still.height());
    if window.is_none() {
        tracing::debug!("still too small to displace, frames keep full size");
    }
    let (cw, ch) = window.unwrap_or(still.dimensions());

    let units = (0..SHAKE_FRAMES)
        .map(|index| WorkUnit { index, payload: () })
        .collect();
    let outcomes = coordinator.run(units, |unit| {
        let (ox, oy) = match window {
            Some(_) => sample_offset(&mut frame_rng(seed, unit.index)),
            None => (0, 0),
        };
        let crop = source.crop(Bounds::new(ox, oy, cw, ch))?;
        Frame::from_surface(
            unit.index,
            0,
            0,
            &crop,
            palette.clone(),
            SHAKE_DELAY,
            Disposal::Background,
        )
        .map(FrameOutcome::Replaced)
    })?;

    let out = Sequence {
        frames: outcomes.into_iter().map(FrameOutcome::into_frame).collect(),
        config: CanvasConfig::new(cw, ch),
        repeat: Repeat::Infinite,
    };
    out.check_order()?;
    Ok(out)
}

/// Shake an existing animation.
///
/// Frames are composited in order onto one accumulation canvas and each output frame is a
/// displaced crop of the canvas at that point, so this runs strictly in sequence. Source
/// palettes and delays are kept.
#[tracing::instrument(skip_all, fields(frames = seq.len()))]
pub fn shake_sequence(seq: &Sequence, seed: u64) -> MemeResult<Sequence> {
    let Some((cw, ch)) = crop_size(seq.config.width, seq.config.height) else {
        tracing::debug!(
            width = seq.config.width,
            height = seq.config.height,
            "canvas too small to shake"
        );
        return Ok(seq.clone());
    };

    let mut canvas = Surface::new(seq.config.width, seq.config.height);
    let mut frames = Vec::with_capacity(seq.len());
    for frame in &seq.frames {
        canvas.draw_over(
            &frame.to_surface()?,
            i64::from(frame.bounds.x),
            i64::from(frame.bounds.y),
        );
        let mut rng = frame_rng(seed, frame.index);
        let (ox, oy) = sample_offset(&mut rng);
        let crop = canvas.crop(Bounds::new(ox, oy, cw, ch))?;
        frames.push(Frame::from_surface(
            frame.index,
            0,
            0,
            &crop,
            frame.palette.clone(),
            frame.delay,
            Disposal::Background,
        )?);
    }

    let out = Sequence {
        frames,
        config: CanvasConfig::new(cw, ch),
        repeat: seq.repeat,
    };
    out.check_order()?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/shake.rs"]
mod tests;
