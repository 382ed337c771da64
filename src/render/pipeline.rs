use rand::Rng;

use crate::{
    codec::{Decoded, Rendered},
    foundation::error::MemeResult,
    raster::frame::Sequence,
    render::{
        coordinator::FrameCoordinator,
        overlay::{overlay_sequence, overlay_still},
        request::{Quality, RenderContext, RenderRequest, RenderThreading},
        resize::{SequenceReducer, SerialReducer, StandardReducer, resize_still},
        shake::{shake_sequence, shake_still},
        trigger::apply_trigger,
    },
    text::caption::CaptionLayer,
};

/// Caption `input` and apply the requested effects.
///
/// A still without effects stays a still; a shaken still becomes a sequence; a sequence keeps
/// its frame count and delays. Any failed pass aborts the whole render.
#[tracing::instrument(
    skip_all,
    fields(effect = ?request.effect, quality = ?request.quality, max = request.max_dimension)
)]
pub fn render(
    ctx: &RenderContext,
    request: &RenderRequest,
    input: Decoded,
    threading: &RenderThreading,
) -> MemeResult<Rendered> {
    request.validate()?;
    let pool = threading.build_pool()?;
    let coordinator = FrameCoordinator::new(&pool);
    let seed = request
        .seed
        .unwrap_or_else(|| rand::thread_rng().r#gen::<u64>());
    let effect = request.effect;

    match input {
        Decoded::Still(still) if !effect.shakes() => {
            tracing::info!(format = ?still.format, "rendering still");
            let image = resize_still(&still.image, request.max_dimension)?;
            let layer = caption_layer(ctx, request, image.width(), image.height())?;
            Ok(Rendered::Still(overlay_still(&image, &layer)))
        }
        Decoded::Still(still) => {
            tracing::info!(
                format = ?still.format,
                triggered = effect.triggers(),
                "rendering shaken still"
            );
            let image = resize_still(&still.image, request.max_dimension)?;
            let extra = if effect.triggers() {
                vec![ctx.decal.image()]
            } else {
                Vec::new()
            };
            let mut seq = shake_still(&coordinator, &image, &extra, seed)?;
            if effect.triggers() {
                seq = apply_trigger(&coordinator, &seq, &ctx.decal, seed)?;
            }
            finish_sequence(ctx, request, &pool, &coordinator, seq)
        }
        Decoded::Sequence(seq) => {
            tracing::info!(
                frames = seq.len(),
                shake = effect.shakes(),
                triggered = effect.triggers(),
                "rendering sequence"
            );
            let mut seq = seq;
            if effect.shakes() {
                seq = shake_sequence(&seq, seed)?;
            }
            if effect.triggers() {
                seq = apply_trigger(&coordinator, &seq, &ctx.decal, seed)?;
            }
            finish_sequence(ctx, request, &pool, &coordinator, seq)
        }
    }
}

fn finish_sequence(
    ctx: &RenderContext,
    request: &RenderRequest,
    pool: &rayon::ThreadPool,
    coordinator: &FrameCoordinator<'_>,
    seq: Sequence,
) -> MemeResult<Rendered> {
    let standard;
    let reducer: &dyn SequenceReducer = match request.quality {
        Quality::Standard => {
            standard = StandardReducer::new(pool);
            &standard
        }
        Quality::Maximum => &SerialReducer,
    };
    let seq = reducer.reduce(&seq, request.max_dimension)?;

    let layer = caption_layer(ctx, request, seq.config.width, seq.config.height)?;
    let seq = overlay_sequence(coordinator, &seq, &layer)?;
    seq.check_order()?;
    Ok(Rendered::Sequence(seq))
}

fn caption_layer(
    ctx: &RenderContext,
    request: &RenderRequest,
    width: u32,
    height: u32,
) -> MemeResult<CaptionLayer> {
    CaptionLayer::render(
        &ctx.font,
        request.top.as_deref(),
        request.bottom.as_deref(),
        width,
        height,
    )
}
