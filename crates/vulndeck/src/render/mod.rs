pub mod background;
pub mod blocks;
pub mod text;
pub mod transition;
pub mod widgets;

use eframe::egui::{self, Pos2, Rect, Vec2};

use crate::deck::{Slide, SlideLayout};
use crate::theme::Theme;

use blocks::BlockResponse;
use text::{Pen, TextSpec};
use transition::{MAX_BLUR, SlideVisual};

/// Outer margin around slide content, in reference pixels.
const PADDING: f32 = 80.0;
const HEADER_GAP: f32 = 48.0;
const COLUMN_GAP: f32 = 96.0;
const CENTER_MAX_WIDTH: f32 = 1100.0;
const FULL_MAX_WIDTH: f32 = 1400.0;

/// Where a slide's header and body go.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideFrame {
    /// Container spanning the slide; holds the header.
    pub header: Rect,
    /// Column holding the content blocks, inside `header` horizontally.
    pub body: Rect,
    pub centered: bool,
}

/// Compute the header container and body column for a layout within the
/// slide rect.
pub fn slide_frame(layout: SlideLayout, rect: Rect, scale: f32) -> SlideFrame {
    let inner = rect.shrink(PADDING * scale);
    let capped = |max: f32| {
        let w = inner.width().min(max * scale);
        Rect::from_min_size(
            Pos2::new(inner.center().x - w / 2.0, inner.top()),
            Vec2::new(w, inner.height()),
        )
    };
    match layout {
        SlideLayout::Center => {
            let column = capped(CENTER_MAX_WIDTH);
            SlideFrame {
                header: column,
                body: column,
                centered: true,
            }
        }
        SlideLayout::Split => {
            // Only the body is split; the second column stays empty so the
            // background shows through.
            let w = ((inner.width() - COLUMN_GAP * scale) / 2.0).max(0.0);
            SlideFrame {
                header: inner,
                body: Rect::from_min_size(inner.min, Vec2::new(w, inner.height())),
                centered: false,
            }
        }
        SlideLayout::Full => {
            let column = capped(FULL_MAX_WIDTH);
            SlideFrame {
                header: column,
                body: column,
                centered: false,
            }
        }
    }
}

/// Top of content of height `content_h` centered vertically in `column`,
/// pinned to the top when it overflows.
pub fn vertical_start(column: Rect, content_h: f32) -> f32 {
    (column.center().y - content_h / 2.0).max(column.top())
}

/// Render one slide with the given transition visual. Returns any
/// interaction with the slide's controls.
pub fn render_slide(
    ui: &egui::Ui,
    slide: &Slide,
    theme: &Theme,
    rect: Rect,
    visual: SlideVisual,
    since_entry: f32,
    scale: f32,
) -> BlockResponse {
    if visual.opacity <= 0.0 || scale <= 0.0 {
        return BlockResponse::default();
    }

    let frame = slide_frame(slide.layout, rect, scale);
    let pen = Pen::new(ui, theme, scale)
        .with_centered(frame.centered)
        .with_since_entry(since_entry);

    let dry = pen.dry();
    let header_h = draw_header(&dry, slide, Pos2::ZERO, frame.header.width());
    let body_h = blocks::measure_blocks(&dry, &slide.content, frame.body.width());
    let gap = if slide.content.is_empty() {
        0.0
    } else {
        pen.px(HEADER_GAP)
    };
    let top = vertical_start(frame.header, header_h + gap + body_h) + visual.offset_y * scale;
    let origin = Pos2::new(frame.header.left(), top);

    // Blur stand-in: faint displaced copies around the real pass.
    if visual.blur > 0.5 {
        let spread = pen.px(visual.blur);
        let ghost = pen
            .passive()
            .with_opacity(visual.opacity * 0.25 * (visual.blur / MAX_BLUR));
        for d in [
            Vec2::new(-spread, 0.0),
            Vec2::new(spread, 0.0),
            Vec2::new(0.0, -spread),
            Vec2::new(0.0, spread),
        ] {
            draw_slide_at(&ghost, slide, &frame, origin + d, gap, header_h);
        }
    }

    let sharp = 1.0 - 0.5 * (visual.blur / MAX_BLUR).clamp(0.0, 1.0);
    let main = pen.with_opacity(visual.opacity * sharp);
    draw_slide_at(&main, slide, &frame, origin, gap, header_h)
}

fn draw_slide_at(
    pen: &Pen<'_>,
    slide: &Slide,
    frame: &SlideFrame,
    origin: Pos2,
    gap: f32,
    header_h: f32,
) -> BlockResponse {
    draw_header(pen, slide, origin, frame.header.width());
    // Body keeps the same displacement as the header.
    let body_x = origin.x + (frame.body.left() - frame.header.left());
    let body = Pos2::new(body_x, origin.y + header_h + gap);
    blocks::draw_blocks(pen, &slide.content, body, frame.body.width()).1
}

/// Subtitle, title and accent rule. Returns the height used.
fn draw_header(pen: &Pen<'_>, slide: &Slide, pos: Pos2, width: f32) -> f32 {
    let theme = pen.theme;
    let mut y = pos.y;

    if let Some(subtitle) = slide.subtitle.as_deref() {
        let spec = TextSpec::new(theme.subtitle_size, theme.accent).caps(0.2);
        y += pen.text(subtitle, spec, Pos2::new(pos.x, y), width) + pen.px(16.0);
    }

    let title_size = match slide.layout {
        SlideLayout::Center => theme.title_size,
        SlideLayout::Split | SlideLayout::Full => theme.title_size * 0.75,
    };
    let spec = TextSpec::new(title_size, theme.heading_color);
    y += pen.text(&slide.title, spec, Pos2::new(pos.x, y), width) + pen.px(24.0);

    let rule_w = pen.px(96.0);
    let rule_h = pen.px(4.0);
    let x = if pen.centered {
        pos.x + (width - rule_w) / 2.0
    } else {
        pos.x
    };
    pen.rect_filled(
        Rect::from_min_size(Pos2::new(x, y), Vec2::new(rule_w, rule_h)),
        0.0,
        theme.accent,
    );
    y + rule_h - pos.y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Deck;

    fn screen() -> Rect {
        Rect::from_min_size(Pos2::ZERO, Vec2::new(1920.0, 1080.0))
    }

    #[test]
    fn test_center_frame() {
        let f = slide_frame(SlideLayout::Center, screen(), 1.0);
        assert!(f.centered);
        assert_eq!(f.header, f.body);
        assert_eq!(f.body.width(), CENTER_MAX_WIDTH);
        assert!((f.body.center().x - 960.0).abs() < 1e-3);
    }

    #[test]
    fn test_split_frame_uses_left_column() {
        let f = slide_frame(SlideLayout::Split, screen(), 1.0);
        assert!(!f.centered);
        assert_eq!(f.body.left(), PADDING);
        assert!(f.body.right() < 960.0);
    }

    #[test]
    fn test_split_header_spans_both_columns() {
        let f = slide_frame(SlideLayout::Split, screen(), 1.0);
        assert!(f.header.width() > f.body.width());
        assert_eq!(f.header.left(), f.body.left());
        assert_eq!(f.header.width(), 1920.0 - PADDING * 2.0);
        assert_eq!(f.body.width(), (1920.0 - PADDING * 2.0 - COLUMN_GAP) / 2.0);
    }

    #[test]
    fn test_full_frame_capped_and_centered() {
        let f = slide_frame(SlideLayout::Full, screen(), 1.0);
        assert!(!f.centered);
        assert_eq!(f.header, f.body);
        assert_eq!(f.body.width(), FULL_MAX_WIDTH);
        assert!((f.body.center().x - 960.0).abs() < 1e-3);

        // Narrow windows fall back to the padded width.
        let narrow = Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0));
        let f = slide_frame(SlideLayout::Full, narrow, 1.0);
        assert_eq!(f.body.width(), 800.0 - PADDING * 2.0);
    }

    #[test]
    fn test_frame_scales() {
        let half = Rect::from_min_size(Pos2::ZERO, Vec2::new(960.0, 540.0));
        let f = slide_frame(SlideLayout::Center, half, 0.5);
        assert_eq!(f.body.width(), CENTER_MAX_WIDTH * 0.5);
        assert_eq!(f.body.top(), PADDING * 0.5);
    }

    fn with_ui(mut f: impl FnMut(&mut egui::Ui)) {
        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| f(ui));
        });
    }

    #[test]
    fn test_zero_scale_renders_nothing() {
        let deck = Deck::builtin().unwrap();
        let theme = Theme::light();
        with_ui(|ui| {
            for slide in &deck.slides {
                let response =
                    render_slide(ui, slide, &theme, Rect::ZERO, SlideVisual::STEADY, 1.0, 0.0);
                assert_eq!(response, BlockResponse::default());
            }
        });
    }

    #[test]
    fn test_every_slide_renders() {
        let deck = Deck::builtin().unwrap();
        let theme = Theme::dark();
        with_ui(|ui| {
            for slide in &deck.slides {
                let blurred = SlideVisual {
                    opacity: 0.5,
                    offset_y: -10.0,
                    blur: MAX_BLUR / 2.0,
                };
                for visual in [SlideVisual::STEADY, blurred] {
                    render_slide(ui, slide, &theme, screen(), visual, 0.5, 1.0);
                }
            }
        });
    }

    #[test]
    fn test_vertical_start() {
        let column = Rect::from_min_size(Pos2::new(0.0, 100.0), Vec2::new(500.0, 800.0));
        assert_eq!(vertical_start(column, 200.0), 400.0);
        assert_eq!(vertical_start(column, 2000.0), 100.0);
    }
}
