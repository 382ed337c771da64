use crate::{
    assets::font::{FontAsset, register_family},
    foundation::error::{MemeError, MemeResult},
};

/// Measured extent of a wrapped layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextMetrics {
    /// Widest line, trailing whitespace excluded.
    pub max_line_width: f32,
    /// Ascent plus descent of one line.
    pub line_height: f32,
    /// Number of wrapped lines.
    pub line_count: usize,
}

impl TextMetrics {
    /// Height budget consumed by the wrapped lines at `leading`.
    pub fn wrapped_height(&self, leading: f32) -> f32 {
        self.line_count as f32 * self.line_height * leading
    }

    /// Height of the drawn block: no extra leading after the last line.
    pub fn block_height(&self, leading: f32) -> f32 {
        if self.line_count == 0 {
            return 0.0;
        }
        self.wrapped_height(leading) - (leading - 1.0) * self.line_height
    }

    /// `true` when the text fits a `width`×`height` box at `leading`.
    pub fn fits(&self, width: f32, height: f32, leading: f32) -> bool {
        self.max_line_width <= width && self.wrapped_height(leading) <= height
    }
}

/// Parley contexts bound to a single registered font family.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    family: String,
}

impl TextLayoutEngine {
    /// Register `font` in a fresh font context.
    pub fn new(font: &FontAsset) -> MemeResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let family = register_family(&mut font_ctx, font.bytes())?;
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family,
        })
    }

    /// Shape `text` at `size_px`, breaking lines at `max_width` when given.
    pub fn layout(
        &mut self,
        text: &str,
        size_px: f32,
        max_width: Option<f32>,
    ) -> MemeResult<parley::Layout<()>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(MemeError::validation("font size must be finite and > 0"));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(max_width);
        Ok(layout)
    }

    /// Lay out and measure in one step.
    pub fn measure(
        &mut self,
        text: &str,
        size_px: f32,
        max_width: Option<f32>,
    ) -> MemeResult<(parley::Layout<()>, TextMetrics)> {
        let layout = self.layout(text, size_px, max_width)?;
        let metrics = measure_layout(&layout);
        Ok((layout, metrics))
    }
}

pub(crate) fn measure_layout(layout: &parley::Layout<()>) -> TextMetrics {
    let mut max_line_width = 0.0f32;
    let mut line_height = 0.0f32;
    let mut line_count = 0usize;
    for line in layout.lines() {
        let m = line.metrics();
        max_line_width = max_line_width.max((m.advance - m.trailing_whitespace).max(0.0));
        line_height = line_height.max(m.ascent + m.descent);
        line_count += 1;
    }
    TextMetrics {
        max_line_width,
        line_height,
        line_count,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
