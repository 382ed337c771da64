use std::{borrow::Cow, io::Cursor};

use image::ImageFormat;

use crate::{
    codec::Rendered,
    foundation::error::{MemeError, MemeResult},
    raster::frame::{Disposal, Repeat, Sequence},
};

impl Rendered {
    /// Encode to bytes: PNG for a still, GIF for a sequence.
    #[tracing::instrument(skip_all, fields(frames = self.frame_count()))]
    pub fn encode(&self) -> MemeResult<Vec<u8>> {
        match self {
            Self::Still(img) => {
                let mut buf = Vec::new();
                img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
                    .map_err(|e| MemeError::encode(format!("write png: {e}")))?;
                Ok(buf)
            }
            Self::Sequence(seq) => encode_gif(seq),
        }
    }
}

fn encode_gif(seq: &Sequence) -> MemeResult<Vec<u8>> {
    let width = dim_u16(seq.config.width, "canvas width")?;
    let height = dim_u16(seq.config.height, "canvas height")?;

    let mut buf = Vec::new();
    {
        let mut encoder = gif::Encoder::new(&mut buf, width, height, &[])
            .map_err(|e| MemeError::encode(format!("write gif header: {e}")))?;
        let repeat = match seq.repeat {
            Repeat::Finite(n) => gif::Repeat::Finite(n),
            Repeat::Infinite => gif::Repeat::Infinite,
        };
        encoder
            .set_repeat(repeat)
            .map_err(|e| MemeError::encode(format!("write gif loop extension: {e}")))?;

        for frame in &seq.frames {
            let mut out = gif::Frame::default();
            out.left = dim_u16(frame.bounds.x, "frame left")?;
            out.top = dim_u16(frame.bounds.y, "frame top")?;
            out.width = dim_u16(frame.bounds.width, "frame width")?;
            out.height = dim_u16(frame.bounds.height, "frame height")?;
            out.delay = frame.delay;
            out.dispose = disposal_to_gif(frame.disposal);
            out.transparent = frame.palette.transparent();
            out.palette = Some(frame.palette.to_rgb_bytes());
            out.buffer = Cow::Borrowed(&frame.pixels);
            encoder
                .write_frame(&out)
                .map_err(|e| MemeError::encode(format!("write gif frame {}: {e}", frame.index)))?;
        }
    }
    Ok(buf)
}

fn dim_u16(v: u32, what: &str) -> MemeResult<u16> {
    u16::try_from(v).map_err(|_| MemeError::encode(format!("{what} {v} exceeds gif limit")))
}

fn disposal_to_gif(d: Disposal) -> gif::DisposalMethod {
    match d {
        Disposal::Any => gif::DisposalMethod::Any,
        Disposal::Keep => gif::DisposalMethod::Keep,
        Disposal::Background => gif::DisposalMethod::Background,
        Disposal::Previous => gif::DisposalMethod::Previous,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/codec/encoder.rs"]
mod tests;
