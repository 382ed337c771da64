use crate::{
    assets::{decal::Decal, font::FontAsset},
    foundation::error::{MemeError, MemeResult},
};

/// Default bound on the longer output side, in px.
pub const DEFAULT_MAX_DIMENSION: u32 = 600;

/// Displacement and decal effects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Effect {
    #[default]
    None,
    Shake,
    /// Shake, then the trigger decal on top.
    ShakeTrigger,
}

impl Effect {
    /// Effect from the two CLI-style flags; trigger implies shake.
    pub fn from_flags(shake: bool, trigger: bool) -> Self {
        match (shake, trigger) {
            (_, true) => Self::ShakeTrigger,
            (true, false) => Self::Shake,
            (false, false) => Self::None,
        }
    }

    /// `true` when a shake pass runs.
    pub fn shakes(self) -> bool {
        !matches!(self, Self::None)
    }

    /// `true` when the decal pass runs.
    pub fn triggers(self) -> bool {
        matches!(self, Self::ShakeTrigger)
    }
}

/// Sequence reduction strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Quality {
    /// Frames resized independently, in parallel.
    #[default]
    Standard,
    /// Frames composited in order and the composite resized; serial.
    Maximum,
}

/// What to draw and how.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderRequest {
    pub top: Option<String>,
    pub bottom: Option<String>,
    pub effect: Effect,
    pub quality: Quality,
    pub max_dimension: u32,
    /// Fixes every random draw when set.
    pub seed: Option<u64>,
}

impl Default for RenderRequest {
    fn default() -> Self {
        Self {
            top: None,
            bottom: None,
            effect: Effect::None,
            quality: Quality::Standard,
            max_dimension: DEFAULT_MAX_DIMENSION,
            seed: None,
        }
    }
}

impl RenderRequest {
    pub fn validate(&self) -> MemeResult<()> {
        if self.max_dimension == 0 {
            return Err(MemeError::validation("max dimension must be >= 1"));
        }
        Ok(())
    }
}

/// Resources shared read-only by every pass.
#[derive(Clone, Debug)]
pub struct RenderContext {
    pub font: FontAsset,
    pub decal: Decal,
}

impl RenderContext {
    /// Context using the stock trigger banner.
    pub fn new(font: FontAsset) -> MemeResult<Self> {
        let decal = Decal::triggered(&font)?;
        Ok(Self { font, decal })
    }

    /// Context with a caller-supplied decal.
    pub fn with_decal(font: FontAsset, decal: Decal) -> Self {
        Self { font, decal }
    }
}

/// Worker pool sizing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderThreading {
    /// `None` lets rayon pick; `Some(0)` is rejected.
    pub threads: Option<usize>,
}

impl RenderThreading {
    /// Read `MEMEGEN_THREADS`; unset or unparsable values fall back to the default.
    pub fn from_env() -> Self {
        let threads = std::env::var("MEMEGEN_THREADS")
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok());
        Self { threads }
    }

    pub(crate) fn build_pool(&self) -> MemeResult<rayon::ThreadPool> {
        if self.threads == Some(0) {
            return Err(MemeError::validation("render threading 'threads' must be >= 1 when set"));
        }

        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(n) = self.threads {
            builder = builder.num_threads(n);
        }
        builder
            .build()
            .map_err(|e| MemeError::worker(format!("failed to build rayon thread pool: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/request.rs"]
mod tests;
