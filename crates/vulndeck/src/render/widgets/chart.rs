use eframe::egui::{Color32, Pos2, Rect, Vec2};

use crate::deck::ChartPanel;
use crate::render::blocks::icon_glyph;
use crate::render::text::{Pen, TextSpec};
use crate::render::transition::ease_out;
use crate::theme::Theme;

/// Bars wait this long after the slide appears before growing.
pub const GROW_DELAY: f32 = 0.2;
/// Time a bar takes to reach its value.
pub const GROW_DURATION: f32 = 1.0;

/// Filled fraction (0..=1) of a bar with the given percentage, `elapsed`
/// seconds after the slide became current.
pub fn bar_fill(value: u8, elapsed: f32) -> f32 {
    let t = ((elapsed - GROW_DELAY) / GROW_DURATION).clamp(0.0, 1.0);
    value.min(100) as f32 / 100.0 * ease_out(t)
}

/// Draw comparison panels side by side. Returns the height used.
pub fn draw(pen: &Pen<'_>, panels: &[ChartPanel], pos: Pos2, width: f32) -> f32 {
    if panels.is_empty() {
        return 0.0;
    }
    let gap = pen.px(32.0);
    let max_w = pen.px(1024.0).min(width);
    let x0 = pos.x + (width - max_w) / 2.0;
    let count = panels.len() as f32;
    let panel_w = (max_w - gap * (count - 1.0)) / count;

    let dry = pen.dry();
    let height = panels
        .iter()
        .map(|p| draw_panel(&dry, p, Pos2::ZERO, panel_w, None))
        .fold(0.0_f32, f32::max);

    for (i, panel) in panels.iter().enumerate() {
        let x = x0 + i as f32 * (panel_w + gap);
        draw_panel(pen, panel, Pos2::new(x, pos.y), panel_w, Some(height));
    }
    height
}

fn draw_panel(
    pen: &Pen<'_>,
    panel: &ChartPanel,
    pos: Pos2,
    width: f32,
    height: Option<f32>,
) -> f32 {
    let theme = pen.theme;
    let pad = pen.px(24.0);
    let inner_w = width - pad * 2.0;

    let title_spec = TextSpec::new(theme.body_size, Color32::from_rgb(0xE7, 0xE5, 0xE4));
    let label_spec = TextSpec::new(theme.caption_size * 0.85, Color32::from_rgb(0xA8, 0xA2, 0x9E));
    let note_spec = TextSpec::new(theme.caption_size * 0.85, Color32::from_rgb(0xA8, 0xA2, 0x9E));

    let icon = pen.layout(icon_glyph(panel.icon), TextSpec::new(26.0, theme.accent), inner_w);
    let icon_w = icon.rect.width() + pen.px(12.0);
    let title = pen.layout(&panel.title, title_spec, inner_w - icon_w);
    let header_h = title.rect.height().max(icon.rect.height());

    let label_w = pen.px(180.0).min(inner_w * 0.4);
    let track_w = inner_w - label_w - pen.px(16.0);
    let bar_row_h = pen.px(32.0);
    let bars_h = bar_row_h * panel.bars.len() as f32;

    let note = panel.note.as_deref().map(|n| pen.layout(n, note_spec, inner_w));
    let note_h = note.as_ref().map_or(0.0, |g| g.rect.height() + pen.px(24.0));

    let natural = pad * 2.0 + header_h + pen.px(24.0) + bars_h + note_h;
    let h = height.unwrap_or(natural).max(natural);
    let rect = Rect::from_min_size(pos, Vec2::new(width, h));
    pen.rect_filled(rect, pen.px(14.0), Theme::with_opacity(theme.surface, 0.5));
    pen.rect_stroke(rect, pen.px(14.0), pen.px(1.0), theme.border);

    let mut y = pos.y + pad;
    let icon_y = y + (header_h - icon.rect.height()) / 2.0;
    pen.galley(Pos2::new(pos.x + pad, icon_y), icon, theme.accent);
    pen.galley(Pos2::new(pos.x + pad + icon_w, y), title, title_spec.color);
    y += header_h + pen.px(24.0);

    let track_h = pen.px(8.0);
    for bar in &panel.bars {
        let label = pen.layout(&bar.label, label_spec, label_w);
        let label_y = y + (bar_row_h - label.rect.height()) / 2.0;
        pen.galley(Pos2::new(pos.x + pad, label_y), label, label_spec.color);

        let track = Rect::from_min_size(
            Pos2::new(pos.x + pad + label_w + pen.px(16.0), y + (bar_row_h - track_h) / 2.0),
            Vec2::new(track_w, track_h),
        );
        pen.rect_filled(track, track_h / 2.0, Color32::from_rgb(0x44, 0x40, 0x3C));

        let fill = bar_fill(bar.value, pen.since_entry);
        if fill > 0.0 {
            let color = if bar.favorable {
                theme.positive
            } else {
                theme.negative
            };
            let filled = Rect::from_min_size(track.min, Vec2::new(track_w * fill, track_h));
            pen.rect_filled(filled, track_h / 2.0, color);
        }
        y += bar_row_h;
    }

    if let Some(note) = note {
        y += pen.px(24.0);
        pen.galley(Pos2::new(pos.x + pad, y), note, note_spec.color);
    }
    h
}
