use std::{io::Cursor, sync::Arc};

use image::ImageFormat;

use crate::{
    codec::{Decoded, SourceFormat, StillImage},
    foundation::{
        core::Bounds,
        error::{MemeError, MemeResult},
    },
    raster::{
        frame::{CanvasConfig, Disposal, Frame, Repeat, Sequence},
        palette::Palette,
    },
};

/// Sniff the format from magic bytes and decode.
///
/// GIF input always decodes to a [`Sequence`], even with a single frame.
#[tracing::instrument(skip_all, fields(len = bytes.len()))]
pub fn decode(bytes: &[u8]) -> MemeResult<Decoded> {
    let format = sniff(bytes)?;
    tracing::debug!(?format, "sniffed input format");
    match format {
        SourceFormat::Gif => decode_gif(bytes).map(Decoded::Sequence),
        SourceFormat::Png | SourceFormat::Jpeg => {
            let image_format = if format == SourceFormat::Png {
                ImageFormat::Png
            } else {
                ImageFormat::Jpeg
            };
            let img = image::load_from_memory_with_format(bytes, image_format)
                .map_err(|e| MemeError::decode(format!("decode {format:?} image: {e}")))?;
            Ok(Decoded::Still(StillImage {
                image: img.to_rgba8(),
                format,
            }))
        }
    }
}

fn sniff(bytes: &[u8]) -> MemeResult<SourceFormat> {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => Ok(SourceFormat::Png),
        Ok(ImageFormat::Jpeg) => Ok(SourceFormat::Jpeg),
        Ok(ImageFormat::Gif) => Ok(SourceFormat::Gif),
        Ok(other) => Err(MemeError::decode(format!(
            "unsupported image format {other:?}, expected png, jpeg or gif"
        ))),
        Err(_) => Err(MemeError::decode("unrecognized image data")),
    }
}

fn decode_gif(bytes: &[u8]) -> MemeResult<Sequence> {
    let mut opts = gif::DecodeOptions::new();
    opts.set_color_output(gif::ColorOutput::Indexed);
    let mut decoder = opts
        .read_info(Cursor::new(bytes))
        .map_err(|e| MemeError::decode(format!("read gif header: {e}")))?;

    let config = CanvasConfig::new(u32::from(decoder.width()), u32::from(decoder.height()));
    let global = decoder.global_palette().map(<[u8]>::to_vec);

    let mut frames = Vec::new();
    while let Some(f) = decoder
        .read_next_frame()
        .map_err(|e| MemeError::decode(format!("read gif frame {}: {e}", frames.len())))?
    {
        let rgb = f
            .palette
            .as_deref()
            .or(global.as_deref())
            .ok_or_else(|| {
                MemeError::decode(format!("gif frame {} has no color table", frames.len()))
            })?;
        // some encoders emit a transparent index past the end of the table
        let transparent = f.transparent.filter(|&t| usize::from(t) < rgb.len() / 3);
        let palette = Palette::from_rgb_bytes(rgb, transparent)?;

        let bounds = Bounds::new(
            u32::from(f.left),
            u32::from(f.top),
            u32::from(f.width),
            u32::from(f.height),
        );
        frames.push(Frame::new(
            frames.len(),
            bounds,
            Arc::new(palette),
            f.buffer.to_vec(),
            f.delay,
            disposal_from_gif(f.dispose),
        )?);
    }

    if frames.is_empty() {
        return Err(MemeError::decode("gif contains no frames"));
    }
    // the loop extension may follow the first frame, so read it last
    let repeat = match decoder.repeat() {
        gif::Repeat::Finite(n) => Repeat::Finite(n),
        gif::Repeat::Infinite => Repeat::Infinite,
    };
    tracing::debug!(
        frames = frames.len(),
        width = config.width,
        height = config.height,
        "decoded gif"
    );
    Sequence::new(frames, config, repeat)
}

fn disposal_from_gif(d: gif::DisposalMethod) -> Disposal {
    match d {
        gif::DisposalMethod::Any => Disposal::Any,
        gif::DisposalMethod::Keep => Disposal::Keep,
        gif::DisposalMethod::Background => Disposal::Background,
        gif::DisposalMethod::Previous => Disposal::Previous,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/codec/decoder.rs"]
mod tests;
