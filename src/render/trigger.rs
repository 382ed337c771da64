use rand::Rng;

use crate::{
    assets::decal::Decal,
    foundation::{core::frame_rng, error::MemeResult},
    raster::{
        frame::{Frame, FrameOutcome, Sequence},
        surface::Surface,
    },
    render::coordinator::FrameCoordinator,
};

/// How far the decal overhangs each side of the canvas, in px.
pub const TRIGGER_MARGIN: u32 = 20;
/// Largest per-frame jitter of the decal, in px.
pub const TRIGGER_JITTER: i64 = 6;

// keeps trigger jitter independent of the shake offsets drawn from the same seed
const TRIGGER_SEED_SALT: u64 = 0x7452_4947_4745_5221;

/// Decal origin on the canvas for frame `index`.
pub fn decal_origin(seed: u64, index: usize, canvas_height: u32, decal_height: u32) -> (i64, i64) {
    let mut rng = frame_rng(seed ^ TRIGGER_SEED_SALT, index);
    let jx = rng.gen_range(-TRIGGER_JITTER..=TRIGGER_JITTER);
    let jy = rng.gen_range(0..=TRIGGER_JITTER);
    (
        -i64::from(TRIGGER_MARGIN) + jx,
        i64::from(canvas_height) - i64::from(decal_height) + jy,
    )
}

/// Draw `decal` along the bottom of every frame, jittered per frame.
///
/// The scaled decal is shared read-only, so frames are processed in parallel. Pixels are
/// dithered back into each frame's own palette.
#[tracing::instrument(skip_all, fields(frames = seq.len()))]
pub fn apply_trigger(
    coordinator: &FrameCoordinator<'_>,
    seq: &Sequence,
    decal: &Decal,
    seed: u64,
) -> MemeResult<Sequence> {
    let banner = decal.scaled_to_width(seq.config.width + 2 * TRIGGER_MARGIN)?;
    let canvas_height = seq.config.height;
    coordinator.map_frames(seq, |frame| draw_decal(frame, &banner, canvas_height, seed))
}

fn draw_decal(
    frame: &Frame,
    banner: &Surface,
    canvas_height: u32,
    seed: u64,
) -> MemeResult<FrameOutcome> {
    if frame.bounds.is_empty() {
        return Ok(FrameOutcome::Kept(frame.clone()));
    }
    let (x, y) = decal_origin(seed, frame.index, canvas_height, banner.height());
    let mut surface = frame.to_surface()?;
    surface.draw_over(
        banner,
        x - i64::from(frame.bounds.x),
        y - i64::from(frame.bounds.y),
    );
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

#[cfg(test)]
#[path = "../../tests/unit/render/trigger.rs"]
mod tests;
