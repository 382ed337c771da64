use crate::{
    assets::font::FontAsset,
    foundation::error::{MemeError, MemeResult},
    raster::surface::Surface,
    text::layout::{TextLayoutEngine, TextMetrics},
};

/// Largest font size tried by the search.
pub const MAX_FONT_SIZE: f32 = 75.0;
/// Smallest font size the search tries; also used when nothing fits.
pub const MIN_FONT_SIZE: f32 = 21.0;
/// Line advance as a multiple of line height.
pub const LEADING: f32 = 1.4;
/// Distance of each border copy from the anchor, in px.
pub const BORDER_RADIUS: f64 = 3.0;
/// Angular step between border copies, in radians.
pub const BORDER_ANGLE_STEP: f64 = 0.35;
/// Gap between a banner and the canvas edges, in px.
pub const MARGIN: f32 = 18.0;

const BORDER_COLOR: [u8; 4] = [0, 0, 0, 255];
const FILL_COLOR: [u8; 4] = [255, 255, 255, 255];

/// Which edge a caption hugs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Banner {
    Top,
    Bottom,
}

impl Banner {
    /// Canvas height is divided by this to get the banner box height.
    pub fn divisor(self) -> f32 {
        match self {
            Self::Top => 5.0,
            Self::Bottom => 3.75,
        }
    }

    /// Banner box for a `width`×`height` canvas.
    pub fn target_box(self, width: u32, height: u32) -> (f32, f32) {
        let box_width = width as f32 - 2.0 * MARGIN;
        (box_width, height as f32 / self.divisor())
    }
}

/// Caption shaped at the size chosen by [`fit_font_size`].
pub struct FittedText {
    pub size: f32,
    pub metrics: TextMetrics,
    pub layout: parley::Layout<()>,
}

/// Largest size in `MAX_FONT_SIZE..=MIN_FONT_SIZE`, stepping by 1, whose wrapped layout fits
/// the box.
///
/// Fit is not monotonic in size once wrapping reflows, so every size is tried from the top and
/// the first fit wins. When nothing fits the floor size is returned.
pub fn fit_font_size(
    engine: &mut TextLayoutEngine,
    text: &str,
    box_width: f32,
    box_height: f32,
) -> MemeResult<FittedText> {
    let mut size = MAX_FONT_SIZE;
    loop {
        let (layout, metrics) = engine.measure(text, size, Some(box_width))?;
        if metrics.fits(box_width, box_height, LEADING) || size <= MIN_FONT_SIZE {
            return Ok(FittedText {
                size,
                metrics,
                layout,
            });
        }
        size -= 1.0;
    }
}

/// Outlined text drawn into a premultiplied canvas.
pub(crate) struct TextPainter {
    ctx: vello_cpu::RenderContext,
    font: vello_cpu::peniko::FontData,
    width: u16,
    height: u16,
}

impl TextPainter {
    pub(crate) fn new(font: &FontAsset, width: u32, height: u32) -> MemeResult<Self> {
        let width = u16::try_from(width)
            .map_err(|_| MemeError::validation(format!("text canvas width {width} too large")))?;
        let height = u16::try_from(height)
            .map_err(|_| MemeError::validation(format!("text canvas height {height} too large")))?;
        Ok(Self {
            ctx: vello_cpu::RenderContext::new(width, height),
            font: font.font_data(),
            width,
            height,
        })
    }

    /// Fill a rectangle with an opaque color.
    pub(crate) fn fill_rect(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: [u8; 4]) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(paint(color));
        let rect = vello_cpu::kurbo::Rect::new(x0, y0, x1, y1);
        self.ctx.fill_rect(&rect);
    }

    /// Draw `text` with a black ring border and white fill.
    ///
    /// Each line is centered horizontally in `[left, left + box_width]`; the block's first line
    /// starts at `top`.
    pub(crate) fn draw_outlined(&mut self, text: &FittedText, left: f32, top: f32, box_width: f32) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(paint(BORDER_COLOR));
        let mut angle = 0.0f64;
        while angle < std::f64::consts::TAU {
            let dx = (angle.sin() * BORDER_RADIUS) as f32;
            let dy = (angle.cos() * BORDER_RADIUS) as f32;
            self.draw_glyphs(text, left + dx, top + dy, box_width);
            angle += BORDER_ANGLE_STEP;
        }

        self.ctx.set_paint(paint(FILL_COLOR));
        self.draw_glyphs(text, left, top, box_width);
    }

    fn draw_glyphs(&mut self, text: &FittedText, left: f32, top: f32, box_width: f32) {
        let step = text.metrics.line_height * LEADING;
        for (i, line) in text.layout.lines().enumerate() {
            let m = line.metrics();
            let line_width = (m.advance - m.trailing_whitespace).max(0.0);
            let x = left + (box_width - line_width) / 2.0;
            let baseline = top + i as f32 * step + m.ascent;

            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: x + g.x,
                    y: baseline + (g.y - m.baseline),
                });
                self.ctx
                    .glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }

    /// Rasterize everything drawn so far.
    pub(crate) fn finish(mut self) -> MemeResult<Surface> {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        Surface::from_premul(
            u32::from(self.width),
            u32::from(self.height),
            pixmap.data_as_u8_slice().to_vec(),
        )
    }
}

fn paint(color: [u8; 4]) -> vello_cpu::peniko::Color {
    let [r, g, b, a] = color;
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

/// Normalized caption text; `None` when there is nothing to draw.
pub fn normalize_caption(text: Option<&str>) -> Option<String> {
    let t = text?.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_uppercase())
    }
}

/// Both captions pre-rendered once for a canvas size.
///
/// Read-only after construction; every frame worker composites the same layer.
#[derive(Clone, Debug)]
pub struct CaptionLayer {
    surface: Option<Surface>,
    top_size: Option<f32>,
    bottom_size: Option<f32>,
}

impl CaptionLayer {
    /// A layer that draws nothing.
    pub fn empty() -> Self {
        Self {
            surface: None,
            top_size: None,
            bottom_size: None,
        }
    }

    /// Lay out and rasterize `top` and `bottom` for a `width`×`height` canvas.
    #[tracing::instrument(skip(font, top, bottom))]
    pub fn render(
        font: &FontAsset,
        top: Option<&str>,
        bottom: Option<&str>,
        width: u32,
        height: u32,
    ) -> MemeResult<Self> {
        let top = normalize_caption(top);
        let bottom = normalize_caption(bottom);
        if (top.is_none() && bottom.is_none()) || width == 0 || height == 0 {
            return Ok(Self::empty());
        }

        let mut engine = TextLayoutEngine::new(font)?;
        let mut painter = TextPainter::new(font, width, height)?;
        let mut layer = Self::empty();
        let mut drew = false;

        for (banner, text) in [(Banner::Top, top), (Banner::Bottom, bottom)] {
            let Some(text) = text else {
                continue;
            };
            let (box_w, box_h) = banner.target_box(width, height);
            if box_w <= 0.0 || box_h <= 0.0 {
                tracing::debug!(?banner, width, height, "canvas too small for caption");
                continue;
            }

            let fitted = fit_font_size(&mut engine, &text, box_w, box_h)?;
            let block_h = fitted.metrics.block_height(LEADING);
            let top_y = match banner {
                Banner::Top => MARGIN,
                Banner::Bottom => height as f32 - MARGIN - block_h,
            };
            tracing::debug!(
                ?banner,
                size = fitted.size,
                lines = fitted.metrics.line_count,
                "fitted caption"
            );
            painter.draw_outlined(&fitted, MARGIN, top_y, box_w);
            drew = true;

            match banner {
                Banner::Top => layer.top_size = Some(fitted.size),
                Banner::Bottom => layer.bottom_size = Some(fitted.size),
            }
        }

        if drew {
            layer.surface = Some(painter.finish()?);
        }
        Ok(layer)
    }

    /// `true` when nothing will be drawn.
    pub fn is_empty(&self) -> bool {
        self.surface.is_none()
    }

    /// Chosen font size for the top caption.
    pub fn top_size(&self) -> Option<f32> {
        self.top_size
    }

    /// Chosen font size for the bottom caption.
    pub fn bottom_size(&self) -> Option<f32> {
        self.bottom_size
    }

    /// The canvas-sized caption raster.
    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    /// Composite the layer over `target`, whose top-left sits at `(x, y)` on the canvas.
    pub fn apply(&self, target: &mut Surface, x: u32, y: u32) {
        if let Some(layer) = &self.surface {
            target.draw_over(layer, -i64::from(x), -i64::from(y));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/caption.rs"]
mod tests;
