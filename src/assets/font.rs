use std::{path::Path, sync::Arc};

use anyhow::Context;

use crate::foundation::error::{MemeError, MemeResult};

/// Font face bytes, validated once at load.
///
/// Cloning is cheap; the bytes are shared.
#[derive(Clone)]
pub struct FontAsset {
    bytes: Arc<Vec<u8>>,
    family: String,
}

impl std::fmt::Debug for FontAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontAsset")
            .field("family", &self.family)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl FontAsset {
    /// Validate `bytes` as a font face with at least one family.
    pub fn from_bytes(bytes: Vec<u8>) -> MemeResult<Self> {
        if bytes.is_empty() {
            return Err(MemeError::asset("font data is empty"));
        }
        let family = register_family(&mut parley::FontContext::default(), &bytes)?;
        tracing::debug!(%family, len = bytes.len(), "loaded font");
        Ok(Self {
            bytes: Arc::new(bytes),
            family,
        })
    }

    /// Read and validate a font file.
    pub fn from_path(path: impl AsRef<Path>) -> MemeResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font file {}", path.display()))
            .map_err(|e| MemeError::asset(format!("{e:#}")))?;
        Self::from_bytes(bytes)
    }

    /// Raw font bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Primary family name reported by the face.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Glyph-outline handle for rasterization.
    pub fn font_data(&self) -> vello_cpu::peniko::FontData {
        vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(self.bytes.as_ref().clone()),
            0,
        )
    }
}

/// Register `bytes` in `font_ctx` and return the name of the first family they provide.
pub(crate) fn register_family(
    font_ctx: &mut parley::FontContext,
    bytes: &[u8],
) -> MemeResult<String> {
    let families = font_ctx
        .collection
        .register_fonts(parley::fontique::Blob::from(bytes.to_vec()), None);
    let family_id = families
        .first()
        .map(|(id, _)| *id)
        .ok_or_else(|| MemeError::asset("no font families registered from font bytes"))?;
    let family = font_ctx
        .collection
        .family_name(family_id)
        .ok_or_else(|| MemeError::asset("registered font family has no name"))?;
    Ok(family.to_string())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/font.rs"]
mod tests;
