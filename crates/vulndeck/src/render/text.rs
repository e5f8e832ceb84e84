use std::sync::Arc;

use eframe::egui::{self, Color32, FontFamily, FontId, Galley, Pos2, Rect, Stroke};

use crate::theme::Theme;

/// Everything a block needs to paint itself: theme, scale, fade, and whether
/// this pass paints at all.
///
/// A dry pen lays out text and returns heights without touching the painter,
/// so a slide can be measured with exactly the code that draws it.
#[derive(Clone, Copy)]
pub struct Pen<'a> {
    ui: &'a egui::Ui,
    pub theme: &'a Theme,
    pub opacity: f32,
    pub scale: f32,
    /// Seconds since the slide became current.
    pub since_entry: f32,
    /// Center blocks horizontally within their column.
    pub centered: bool,
    dry: bool,
    interactive: bool,
}

impl<'a> Pen<'a> {
    pub fn new(ui: &'a egui::Ui, theme: &'a Theme, scale: f32) -> Self {
        Self {
            ui,
            theme,
            opacity: 1.0,
            scale,
            since_entry: 0.0,
            centered: false,
            dry: false,
            interactive: true,
        }
    }

    pub fn ui(&self) -> &'a egui::Ui {
        self.ui
    }

    pub fn dry(self) -> Self {
        Self {
            dry: true,
            interactive: false,
            ..self
        }
    }

    /// Paint only, no hit-testing. Used for the blur ghosts.
    pub fn passive(self) -> Self {
        Self {
            interactive: false,
            ..self
        }
    }

    pub fn with_opacity(self, opacity: f32) -> Self {
        Self { opacity, ..self }
    }

    pub fn with_centered(self, centered: bool) -> Self {
        Self { centered, ..self }
    }

    pub fn with_since_entry(self, since_entry: f32) -> Self {
        Self {
            since_entry,
            ..self
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Reference pixels to screen pixels.
    pub fn px(&self, v: f32) -> f32 {
        v * self.scale
    }

    pub fn color(&self, c: Color32) -> Color32 {
        Theme::with_opacity(c, self.opacity)
    }

    pub fn layout(&self, text: &str, style: TextSpec, max_width: f32) -> Arc<Galley> {
        let mut job = egui::text::LayoutJob::default();
        job.wrap.max_width = max_width;
        append(&mut job, text, style, self);
        self.ui.painter().layout_job(job)
    }

    /// Lay out `lead` in `lead_style` followed by `rest` in `style`, as one flow.
    pub fn layout_pair(
        &self,
        lead: &str,
        lead_style: TextSpec,
        rest: &str,
        style: TextSpec,
        max_width: f32,
    ) -> Arc<Galley> {
        let mut job = egui::text::LayoutJob::default();
        job.wrap.max_width = max_width;
        append(&mut job, lead, lead_style, self);
        append(&mut job, " ", style, self);
        append(&mut job, rest, style, self);
        self.ui.painter().layout_job(job)
    }

    pub fn galley(&self, pos: Pos2, galley: Arc<Galley>, fallback: Color32) {
        if !self.dry {
            self.ui.painter().galley(pos, galley, self.color(fallback));
        }
    }

    /// Paint text, left-aligned or centered in `width` per the pen, and return
    /// its height.
    pub fn text(&self, text: &str, style: TextSpec, pos: Pos2, width: f32) -> f32 {
        let galley = self.layout(text, style, width);
        let height = galley.rect.height();
        let x = if self.centered {
            pos.x + (width - galley.rect.width()) / 2.0
        } else {
            pos.x
        };
        self.galley(Pos2::new(x, pos.y), galley, style.color);
        height
    }

    pub fn rect_filled(&self, rect: Rect, radius: f32, color: Color32) {
        if !self.dry {
            self.ui.painter().rect_filled(rect, radius, self.color(color));
        }
    }

    pub fn rect_stroke(&self, rect: Rect, radius: f32, width: f32, color: Color32) {
        if !self.dry {
            self.ui.painter().rect_stroke(
                rect,
                radius,
                Stroke::new(width, self.color(color)),
                egui::StrokeKind::Inside,
            );
        }
    }

    pub fn circle_filled(&self, center: Pos2, radius: f32, color: Color32) {
        if !self.dry {
            self.ui
                .painter()
                .circle_filled(center, radius, self.color(color));
        }
    }

    pub fn line(&self, from: Pos2, to: Pos2, width: f32, color: Color32) {
        if !self.dry {
            self.ui
                .painter()
                .line_segment([from, to], Stroke::new(width, self.color(color)));
        }
    }
}

/// Font and color for a run of text. Sizes are in reference pixels.
#[derive(Debug, Clone, Copy)]
pub struct TextSpec {
    pub size: f32,
    pub color: Color32,
    pub monospace: bool,
    pub italics: bool,
    pub uppercase: bool,
    /// Extra spacing between letters, in em.
    pub tracking: f32,
}

impl TextSpec {
    pub fn new(size: f32, color: Color32) -> Self {
        Self {
            size,
            color,
            monospace: false,
            italics: false,
            uppercase: false,
            tracking: 0.0,
        }
    }

    pub fn mono(self) -> Self {
        Self {
            monospace: true,
            ..self
        }
    }

    pub fn italic(self) -> Self {
        Self {
            italics: true,
            ..self
        }
    }

    /// Uppercase with letter spacing, used for labels and kickers.
    pub fn caps(self, tracking: f32) -> Self {
        Self {
            uppercase: true,
            tracking,
            ..self
        }
    }
}

fn append(job: &mut egui::text::LayoutJob, text: &str, spec: TextSpec, pen: &Pen<'_>) {
    let size = pen.px(spec.size);
    let family = if spec.monospace {
        FontFamily::Monospace
    } else {
        FontFamily::Proportional
    };
    let format = egui::text::TextFormat {
        font_id: FontId::new(size, family),
        color: pen.color(spec.color),
        italics: spec.italics,
        extra_letter_spacing: spec.tracking * size,
        ..Default::default()
    };
    if spec.uppercase {
        job.append(&text.to_uppercase(), 0.0, format);
    } else {
        job.append(text, 0.0, format);
    }
}
