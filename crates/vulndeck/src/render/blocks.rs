use eframe::egui::{self, Color32, Pos2, Rect, Sense, Vec2};

use crate::deck::{Block, Card, CompositionPart, Feature, Icon, TextStyle, Tone};
use crate::render::text::{Pen, TextSpec};
use crate::render::widgets;
use crate::theme::Theme;

/// Vertical gap between consecutive blocks, in reference pixels.
const BLOCK_GAP: f32 = 28.0;

/// What the user did with a slide's controls this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BlockResponse {
    pub restart_clicked: bool,
}

impl BlockResponse {
    fn merge(&mut self, other: BlockResponse) {
        self.restart_clicked |= other.restart_clicked;
    }
}

/// Draw blocks top to bottom. Returns the height used and any interaction.
pub fn draw_blocks(pen: &Pen<'_>, blocks: &[Block], pos: Pos2, width: f32) -> (f32, BlockResponse) {
    let mut y = pos.y;
    let mut response = BlockResponse::default();
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            y += pen.px(BLOCK_GAP);
        }
        let (h, r) = draw_block(pen, block, Pos2::new(pos.x, y), width);
        y += h;
        response.merge(r);
    }
    (y - pos.y, response)
}

pub fn measure_blocks(pen: &Pen<'_>, blocks: &[Block], width: f32) -> f32 {
    draw_blocks(&pen.dry(), blocks, Pos2::ZERO, width).0
}

fn draw_block(pen: &Pen<'_>, block: &Block, pos: Pos2, width: f32) -> (f32, BlockResponse) {
    let none = BlockResponse::default();
    match block {
        Block::Paragraph {
            text,
            style,
            highlight,
        } => (
            draw_paragraph(pen, text, *style, highlight.as_deref(), pos, width),
            none,
        ),
        Block::List { items } => (draw_list(pen, items, pos, width), none),
        Block::FeatureList { items } => (draw_feature_list(pen, items, pos, width), none),
        Block::Callout { title, tone, items } => {
            (draw_callout(pen, title, *tone, items, pos, width), none)
        }
        Block::Cards { columns, cards } => (draw_cards(pen, *columns, cards, pos, width), none),
        Block::Equation { terms } => (draw_equation(pen, terms, pos, width), none),
        Block::Tags { items } => (draw_tags(pen, items, pos, width), none),
        Block::Composition { parts, caption } => (
            draw_composition(pen, parts, caption.as_deref(), pos, width),
            none,
        ),
        Block::Rule => (draw_rule(pen, pos, width), none),
        Block::Scanner => (widgets::scanner::draw(pen, pos, width), none),
        Block::Chart { panels } => (widgets::chart::draw(pen, panels, pos, width), none),
        Block::Restart { label } => draw_restart(pen, label, pos, width),
    }
}

fn paragraph_spec(theme: &Theme, style: TextStyle) -> TextSpec {
    match style {
        TextStyle::Body => TextSpec::new(theme.body_size, theme.foreground),
        TextStyle::Lead => TextSpec::new(theme.lead_size, theme.foreground),
        TextStyle::Muted => TextSpec::new(theme.body_size, theme.muted),
        TextStyle::Caption => TextSpec::new(theme.caption_size, theme.muted).italic(),
        TextStyle::Quote => TextSpec::new(theme.lead_size * 1.2, theme.heading_color),
    }
}

fn draw_paragraph(
    pen: &Pen<'_>,
    text: &str,
    style: TextStyle,
    highlight: Option<&str>,
    pos: Pos2,
    width: f32,
) -> f32 {
    let spec = paragraph_spec(pen.theme, style);
    let Some(lead) = highlight else {
        return pen.text(text, spec, pos, width);
    };

    let lead_spec = TextSpec {
        color: pen.theme.accent,
        ..spec
    };
    let galley = pen.layout_pair(lead, lead_spec, text, spec, width);
    let height = galley.rect.height();
    let x = if pen.centered {
        pos.x + (width - galley.rect.width()) / 2.0
    } else {
        pos.x
    };
    pen.galley(Pos2::new(x, pos.y), galley, spec.color);
    height
}

fn draw_list(pen: &Pen<'_>, items: &[String], pos: Pos2, width: f32) -> f32 {
    let spec = TextSpec::new(pen.theme.body_size, pen.theme.foreground);
    let marker_width = pen.px(32.0);
    let spacing = pen.px(10.0);
    let mut y = pos.y;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            y += spacing;
        }
        let marker = pen.layout("\u{2022}", TextSpec { color: pen.theme.accent, ..spec }, marker_width);
        pen.galley(Pos2::new(pos.x, y), marker, pen.theme.accent);
        let galley = pen.layout(item, spec, width - marker_width);
        let h = galley.rect.height();
        pen.galley(Pos2::new(pos.x + marker_width, y), galley, spec.color);
        y += h;
    }
    y - pos.y
}

fn draw_feature_list(pen: &Pen<'_>, items: &[Feature], pos: Pos2, width: f32) -> f32 {
    let theme = pen.theme;
    let pad = pen.px(18.0);
    let gap = pen.px(16.0);
    let icon_width = pen.px(48.0);
    let spec = TextSpec::new(theme.body_size, theme.foreground);
    let mut y = pos.y;

    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            y += gap;
        }
        let galley = pen.layout(&item.text, spec, width - pad * 2.0 - icon_width);
        let row_h = galley.rect.height().max(pen.px(32.0)) + pad * 2.0;
        let row = Rect::from_min_size(Pos2::new(pos.x, y), Vec2::new(width, row_h));
        pen.rect_filled(row, pen.px(10.0), theme.surface);
        pen.rect_stroke(row, pen.px(10.0), pen.px(1.0), theme.border);

        let icon_color = icon_tint(theme, item.icon);
        let glyph = pen.layout(icon_glyph(item.icon), TextSpec::new(28.0, icon_color), icon_width);
        let glyph_y = row.center().y - glyph.rect.height() / 2.0;
        pen.galley(Pos2::new(pos.x + pad, glyph_y), glyph, icon_color);

        let text_y = row.center().y - galley.rect.height() / 2.0;
        pen.galley(Pos2::new(pos.x + pad + icon_width, text_y), galley, spec.color);
        y += row_h;
    }
    y - pos.y
}

fn draw_callout(
    pen: &Pen<'_>,
    title: &str,
    tone: Tone,
    items: &[String],
    pos: Pos2,
    width: f32,
) -> f32 {
    let theme = pen.theme;
    let pad = pen.px(24.0);
    let (mark, mark_color) = match tone {
        Tone::Positive => ("\u{2714}", theme.positive),
        Tone::Negative => ("\u{26A0}", theme.negative),
        Tone::Neutral => ("\u{2022}", theme.accent),
    };

    let inner = pen.dry();
    let title_spec = TextSpec::new(theme.body_size, theme.heading_color);
    let mark_galley = inner.layout(mark, TextSpec::new(theme.body_size, mark_color), width);
    let mark_w = mark_galley.rect.width() + pen.px(10.0);
    let title_h = inner.text(title, title_spec, Pos2::ZERO, width - pad * 2.0 - mark_w);
    let list_h = draw_list(&inner, items, Pos2::ZERO, width - pad * 2.0);
    let body_gap = pen.px(16.0);
    let height = pad * 2.0 + title_h + body_gap + list_h;

    let panel = Rect::from_min_size(pos, Vec2::new(width, height));
    let border = match tone {
        Tone::Negative => Theme::with_opacity(theme.negative, 0.25),
        _ => theme.border,
    };
    pen.rect_filled(panel, pen.px(10.0), theme.tone_surface(tone));
    pen.rect_stroke(panel, pen.px(10.0), pen.px(1.0), border);

    let left = pen.with_centered(false);
    left.galley(Pos2::new(pos.x + pad, pos.y + pad), mark_galley, mark_color);
    left.text(
        title,
        title_spec,
        Pos2::new(pos.x + pad + mark_w, pos.y + pad),
        width - pad * 2.0 - mark_w,
    );
    draw_list(
        &left,
        items,
        Pos2::new(pos.x + pad, pos.y + pad + title_h + body_gap),
        width - pad * 2.0,
    );
    height
}

fn draw_card(pen: &Pen<'_>, card: &Card, pos: Pos2, width: f32, height: Option<f32>) -> f32 {
    let theme = pen.theme;
    let pad = pen.px(24.0);
    let inner_w = width - pad * 2.0;
    let dry = pen.dry();

    let icon_block = if card.icon.is_some() { pen.px(64.0) } else { 0.0 };
    let heading_spec = TextSpec::new(theme.body_size * 1.25, theme.heading_color);
    let label_spec = TextSpec::new(theme.caption_size * 0.8, theme.muted).caps(0.08);
    let text_spec = TextSpec::new(theme.caption_size, theme.foreground);

    let heading_h = dry.text(&card.heading, heading_spec, Pos2::ZERO, inner_w);
    let label_h = card
        .label
        .as_deref()
        .map_or(0.0, |l| dry.text(l, label_spec, Pos2::ZERO, inner_w) + pen.px(10.0));
    let text_h = dry.text(&card.text, text_spec, Pos2::ZERO, inner_w);
    let natural = pad * 2.0 + icon_block + heading_h + pen.px(8.0) + label_h + text_h;
    let h = height.unwrap_or(natural).max(natural);

    let rect = Rect::from_min_size(pos, Vec2::new(width, h));
    pen.rect_filled(rect, pen.px(14.0), theme.surface);
    pen.rect_stroke(rect, pen.px(14.0), pen.px(1.0), theme.border);

    let left = pen.with_centered(false);
    let mut y = pos.y + pad;
    if let Some(icon) = card.icon {
        let center = Pos2::new(pos.x + pad + pen.px(24.0), y + pen.px(24.0));
        pen.circle_filled(center, pen.px(24.0), theme.surface_muted());
        let glyph = pen.layout(icon_glyph(icon), TextSpec::new(24.0, theme.heading_color), inner_w);
        let at = center - glyph.rect.size() / 2.0;
        pen.galley(at, glyph, theme.heading_color);
        y += icon_block;
    }
    y += left.text(&card.heading, heading_spec, Pos2::new(pos.x + pad, y), inner_w) + pen.px(8.0);
    if let Some(label) = card.label.as_deref() {
        y += left.text(label, label_spec, Pos2::new(pos.x + pad, y), inner_w) + pen.px(10.0);
    }
    left.text(&card.text, text_spec, Pos2::new(pos.x + pad, y), inner_w);
    h
}

fn draw_cards(pen: &Pen<'_>, columns: usize, cards: &[Card], pos: Pos2, width: f32) -> f32 {
    let columns = columns.max(1);
    let gap = pen.px(24.0);
    let cell_w = (width - gap * (columns as f32 - 1.0)) / columns as f32;
    let mut y = pos.y;

    for (row_idx, row) in cards.chunks(columns).enumerate() {
        if row_idx > 0 {
            y += gap;
        }
        let dry = pen.dry();
        let row_h = row
            .iter()
            .map(|c| draw_card(&dry, c, Pos2::ZERO, cell_w, None))
            .fold(0.0_f32, f32::max);
        for (col, card) in row.iter().enumerate() {
            let x = pos.x + col as f32 * (cell_w + gap);
            draw_card(pen, card, Pos2::new(x, y), cell_w, Some(row_h));
        }
        y += row_h;
    }
    y - pos.y
}

fn draw_equation(pen: &Pen<'_>, terms: &[Card], pos: Pos2, width: f32) -> f32 {
    let theme = pen.theme;
    let count = terms.len();
    if count == 0 {
        return 0.0;
    }
    let op_w = pen.px(56.0);
    let term_w = pen
        .px(256.0)
        .min((width - op_w * (count as f32 - 1.0)) / count as f32);
    let total_w = term_w * count as f32 + op_w * (count as f32 - 1.0);
    let pad = pen.px(24.0);
    let heading_spec = TextSpec::new(theme.body_size, theme.muted);
    let text_spec = TextSpec::new(theme.caption_size, theme.foreground);

    let dry = pen.dry().with_centered(true);
    let box_h = terms
        .iter()
        .map(|t| {
            dry.text(&t.heading, heading_spec, Pos2::ZERO, term_w - pad * 2.0)
                + pen.px(8.0)
                + dry.text(&t.text, text_spec, Pos2::ZERO, term_w - pad * 2.0)
        })
        .fold(0.0_f32, f32::max)
        + pad * 2.0;

    let centered = pen.with_centered(true);
    let mut x = pos.x + (width - total_w) / 2.0;
    for (i, term) in terms.iter().enumerate() {
        let last = i + 1 == count;
        if i > 0 {
            let (op, op_color) = if last {
                ("=", theme.accent)
            } else {
                ("+", theme.muted)
            };
            let spec = TextSpec::new(theme.lead_size, op_color);
            let g = pen.layout(op, spec, op_w);
            let at = Pos2::new(x + (op_w - g.rect.width()) / 2.0, pos.y + (box_h - g.rect.height()) / 2.0);
            pen.galley(at, g, op_color);
            x += op_w;
        }

        // The result term is emphasized and drawn slightly larger.
        let rect = if last {
            Rect::from_min_size(Pos2::new(x, pos.y), Vec2::new(term_w, box_h)).expand(pen.px(8.0))
        } else {
            Rect::from_min_size(Pos2::new(x, pos.y), Vec2::new(term_w, box_h))
        };
        let (fill, head, body) = if last {
            (theme.accent, Color32::WHITE, Color32::WHITE)
        } else {
            (theme.surface_muted(), theme.muted, theme.foreground)
        };
        pen.rect_filled(rect, pen.px(10.0), fill);
        let inner_w = term_w - pad * 2.0;
        let mut y = rect.center().y - (box_h - pad * 2.0) / 2.0;
        y += centered.text(
            &term.heading,
            TextSpec { color: head, ..heading_spec },
            Pos2::new(x + pad, y),
            inner_w,
        ) + pen.px(8.0);
        centered.text(
            &term.text,
            TextSpec { color: body, ..text_spec },
            Pos2::new(x + pad, y),
            inner_w,
        );
        x += term_w;
    }
    box_h + pen.px(8.0)
}

fn draw_tags(pen: &Pen<'_>, items: &[String], pos: Pos2, width: f32) -> f32 {
    let spec = TextSpec::new(pen.theme.caption_size * 0.9, pen.theme.muted).caps(0.2);
    let joined = items.join("  \u{2022}  ");
    pen.px(24.0) + pen.text(&joined, spec, Pos2::new(pos.x, pos.y + pen.px(24.0)), width)
}

fn draw_composition(
    pen: &Pen<'_>,
    parts: &[CompositionPart],
    caption: Option<&str>,
    pos: Pos2,
    width: f32,
) -> f32 {
    let theme = pen.theme;
    let height = pen.px(192.0);
    let rect = Rect::from_min_size(pos, Vec2::new(width, height));
    pen.rect_filled(rect, pen.px(14.0), theme.surface_muted());
    pen.rect_stroke(rect, pen.px(14.0), pen.px(1.0), theme.border);

    // Stacked share bar along the top edge
    let inset = pen.px(24.0);
    let bar = Rect::from_min_size(
        Pos2::new(rect.left() + inset, rect.top() + pen.px(20.0)),
        Vec2::new(width - inset * 2.0, pen.px(6.0)),
    );
    let mut bar_x = bar.left();
    for (part, w) in parts.iter().zip(share_widths(parts, bar.width())) {
        let color = if part.vulnerable {
            theme.negative
        } else {
            Color32::from_rgb(0x3B, 0x82, 0xF6)
        };
        pen.rect_filled(
            Rect::from_min_size(Pos2::new(bar_x, bar.top()), Vec2::new(w, bar.height())),
            0.0,
            Theme::with_opacity(color, 0.7),
        );
        bar_x += w;
    }

    let tile = pen.px(64.0);
    let label_spec = TextSpec::new(theme.caption_size * 0.75, theme.foreground).mono();
    let slot_w = pen.px(150.0);
    let total_w = slot_w * parts.len() as f32;
    let mut x = rect.center().x - total_w / 2.0;
    let t = pen.since_entry;

    for part in parts {
        let center_x = x + slot_w / 2.0;
        let (fill, alpha, bounce) = if part.vulnerable {
            (theme.negative, 1.0, widgets::bounce(t))
        } else {
            (Color32::from_rgb(0x3B, 0x82, 0xF6), 0.5 * widgets::pulse(t), 0.0)
        };
        let top = rect.center().y - tile / 2.0 - pen.px(16.0) - pen.px(bounce * 12.0);
        let tile_rect = Rect::from_min_size(Pos2::new(center_x - tile / 2.0, top), Vec2::splat(tile));
        pen.rect_filled(tile_rect, pen.px(8.0), Theme::with_opacity(fill, alpha));
        if part.vulnerable {
            let bang = pen.layout("!", TextSpec::new(32.0, Color32::WHITE), tile);
            pen.galley(tile_rect.center() - bang.rect.size() / 2.0, bang, Color32::WHITE);
        }

        let spec = if part.vulnerable {
            TextSpec { color: theme.negative, ..label_spec }
        } else {
            label_spec
        };
        let label = pen.layout(&part.label, spec, slot_w);
        let label_pos = Pos2::new(
            center_x - label.rect.width() / 2.0,
            rect.center().y + tile / 2.0 - pen.px(8.0),
        );
        pen.galley(label_pos, label, spec.color);
        x += slot_w;
    }

    if let Some(caption) = caption {
        let spec = TextSpec::new(theme.caption_size * 0.7, theme.muted);
        let g = pen.layout(caption, spec, width);
        let at = Pos2::new(
            rect.right() - g.rect.width() - pen.px(16.0),
            rect.bottom() - g.rect.height() - pen.px(8.0),
        );
        pen.galley(at, g, spec.color);
    }
    height
}

/// Widths of each part's segment in a bar of `width`, proportional to its share.
fn share_widths(parts: &[CompositionPart], width: f32) -> Vec<f32> {
    let total: u32 = parts.iter().map(|p| u32::from(p.share)).sum();
    if total == 0 {
        return vec![0.0; parts.len()];
    }
    parts
        .iter()
        .map(|p| width * f32::from(p.share) / total as f32)
        .collect()
}

fn draw_rule(pen: &Pen<'_>, pos: Pos2, width: f32) -> f32 {
    let w = pen.px(96.0);
    let h = pen.px(4.0);
    let x = if pen.centered {
        pos.x + (width - w) / 2.0
    } else {
        pos.x
    };
    pen.rect_filled(
        Rect::from_min_size(Pos2::new(x, pos.y), Vec2::new(w, h)),
        0.0,
        pen.theme.accent,
    );
    h
}

fn draw_restart(pen: &Pen<'_>, label: &str, pos: Pos2, width: f32) -> (f32, BlockResponse) {
    let theme = pen.theme;
    let top_margin = pen.px(24.0);
    let spec = TextSpec::new(theme.body_size * 0.8, Color32::WHITE);
    let galley = pen.layout(label, spec, width);
    let pad = Vec2::new(pen.px(32.0), pen.px(12.0));
    let size = galley.rect.size() + pad * 2.0;
    let x = if pen.centered {
        pos.x + (width - size.x) / 2.0
    } else {
        pos.x
    };
    let rect = Rect::from_min_size(Pos2::new(x, pos.y + top_margin), size);

    let mut response = BlockResponse::default();
    let mut hovered = false;
    if pen.is_interactive() && pen.opacity > 0.99 {
        let r = pen
            .ui()
            .interact(rect, egui::Id::new("restart_control"), Sense::click());
        hovered = r.hovered();
        if hovered {
            pen.ui().ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }
        response.restart_clicked = r.clicked();
    }

    let fill = match (theme.is_dark(), hovered) {
        (false, false) => Color32::from_rgb(0x1C, 0x19, 0x17),
        (false, true) => Color32::from_rgb(0x29, 0x25, 0x24),
        (true, false) => theme.accent,
        (true, true) => Color32::from_rgb(0xEA, 0xB3, 0x08),
    };
    pen.rect_filled(rect, size.y / 2.0, fill);
    pen.galley(rect.min + pad, galley, Color32::WHITE);
    (top_margin + size.y, response)
}

pub fn icon_glyph(icon: Icon) -> &'static str {
    match icon {
        Icon::Dot => "\u{2022}",
        Icon::Code => "</>",
        Icon::Server => "\u{2630}",
        Icon::Shield => "\u{1F6E1}",
        Icon::Globe => "\u{1F310}",
        Icon::Activity => "\u{223F}",
        Icon::Terminal => ">_",
        Icon::Search => "\u{1F50D}",
    }
}

fn icon_tint(theme: &Theme, icon: Icon) -> Color32 {
    match icon {
        Icon::Code => Color32::from_rgb(0xF8, 0x71, 0x71),
        Icon::Server => Color32::from_rgb(0xFB, 0x92, 0x3C),
        Icon::Shield => Color32::from_rgb(0x60, 0xA5, 0xFA),
        Icon::Terminal => theme.foreground,
        _ => theme.accent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_glyphs_non_empty() {
        for icon in [
            Icon::Dot,
            Icon::Code,
            Icon::Server,
            Icon::Shield,
            Icon::Globe,
            Icon::Activity,
            Icon::Terminal,
            Icon::Search,
        ] {
            assert!(!icon_glyph(icon).is_empty());
        }
    }

    fn part(label: &str, share: u8) -> CompositionPart {
        CompositionPart {
            label: label.to_string(),
            share,
            vulnerable: false,
        }
    }

    #[test]
    fn test_share_widths_follow_shares() {
        let parts = [part("App", 10), part("Lib", 90)];
        let w = share_widths(&parts, 500.0);
        assert!((w[0] - 50.0).abs() < 1e-3);
        assert!((w[1] - 450.0).abs() < 1e-3);

        // Shares under 100% still fill the bar.
        let parts = [part("a", 20), part("b", 20)];
        assert_eq!(share_widths(&parts, 400.0), vec![200.0, 200.0]);

        assert_eq!(share_widths(&[part("a", 0)], 400.0), vec![0.0]);
    }

    #[test]
    fn test_paragraph_styles_differ() {
        let theme = Theme::light();
        let body = paragraph_spec(&theme, TextStyle::Body);
        let lead = paragraph_spec(&theme, TextStyle::Lead);
        let caption = paragraph_spec(&theme, TextStyle::Caption);
        assert!(lead.size > body.size);
        assert!(caption.size < body.size);
        assert!(caption.italics);
        assert_eq!(paragraph_spec(&theme, TextStyle::Muted).color, theme.muted);
    }

    #[test]
    fn test_response_merge() {
        let mut r = BlockResponse::default();
        r.merge(BlockResponse::default());
        assert!(!r.restart_clicked);
        r.merge(BlockResponse {
            restart_clicked: true,
        });
        r.merge(BlockResponse::default());
        assert!(r.restart_clicked);
    }
}
