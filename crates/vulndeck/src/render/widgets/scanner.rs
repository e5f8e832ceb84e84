use eframe::egui::{Color32, Pos2, Rect, Vec2};

use crate::render::text::{Pen, TextSpec};
use crate::render::transition::ease_out;

/// Seconds the scan line rests on each position.
pub const TICK: f32 = 0.8;
/// Seconds the scan line takes to glide to the next position.
const GLIDE: f32 = 0.5;

/// The listing under scan: `(text, safe)`.
pub const ROWS: [(&str, bool); 6] = [
    ("<html>", true),
    ("  <body>", true),
    ("    <input type='text' />", true),
    ("    <script>eval(input)</script>", false),
    ("  </body>", true),
    ("</html>", true),
];

/// Positions cycled through: one per row plus two idle ticks at the end.
const POSITIONS: usize = ROWS.len() + 2;

pub fn scan_position(elapsed: f32) -> usize {
    (elapsed.max(0.0) / TICK) as usize % POSITIONS
}

pub fn status(position: usize) -> &'static str {
    if position >= ROWS.len() {
        "Scan Complete"
    } else {
        "Analyzing..."
    }
}

/// Whether the "XSS Found" badge is up at this position.
pub fn finding_at(position: usize) -> Option<usize> {
    ROWS.get(position)
        .filter(|(_, safe)| !safe)
        .map(|_| position)
}

/// Scan line position as a fraction of the listing height. Glides from the
/// previous position over the first part of each tick.
pub fn scan_line_fraction(elapsed: f32) -> f32 {
    let pos = scan_position(elapsed);
    let prev = (pos + POSITIONS - 1) % POSITIONS;
    let into_tick = elapsed.max(0.0) % TICK;
    let t = ease_out(into_tick / GLIDE);
    let from = prev as f32 / ROWS.len() as f32;
    let to = pos as f32 / ROWS.len() as f32;
    from + (to - from) * t
}

/// Draw the scanner window. Returns the height used.
pub fn draw(pen: &Pen<'_>, pos: Pos2, width: f32) -> f32 {
    let t = pen.since_entry;
    let position = scan_position(t);

    let box_w = pen.px(560.0).min(width);
    let x = if pen.centered {
        pos.x + (width - box_w) / 2.0
    } else {
        pos.x + (width - box_w).min(pen.px(40.0)) / 2.0
    };
    let pad = pen.px(24.0);
    let row_h = pen.px(30.0);
    let dots_h = pen.px(28.0);
    let footer_h = pen.px(44.0);
    let listing_h = row_h * ROWS.len() as f32;
    let height = pad * 2.0 + dots_h + listing_h + footer_h;

    let frame = Rect::from_min_size(Pos2::new(x, pos.y), Vec2::new(box_w, height));
    pen.rect_filled(frame, pen.px(10.0), Color32::from_rgb(0x1C, 0x19, 0x17));
    pen.rect_stroke(frame, pen.px(10.0), pen.px(1.0), Color32::from_rgb(0x44, 0x40, 0x3C));

    // Window buttons
    for (i, c) in [
        Color32::from_rgb(0xEF, 0x44, 0x44),
        Color32::from_rgb(0xEA, 0xB3, 0x08),
        Color32::from_rgb(0x22, 0xC5, 0x5E),
    ]
    .into_iter()
    .enumerate()
    {
        let center = Pos2::new(
            frame.left() + pad + pen.px(6.0) + i as f32 * pen.px(20.0),
            frame.top() + pad + pen.px(6.0),
        );
        pen.circle_filled(center, pen.px(6.0), c);
    }

    let listing_top = frame.top() + pad + dots_h;
    let number_spec = TextSpec::new(15.0, Color32::from_rgb(0x57, 0x53, 0x4E)).mono();
    let code_spec = TextSpec::new(15.0, Color32::from_rgb(0xD6, 0xD3, 0xD1)).mono();
    let bad_spec = TextSpec::new(15.0, Color32::from_rgb(0xF8, 0x71, 0x71)).mono();
    let finding = finding_at(position);

    for (idx, (text, safe)) in ROWS.iter().enumerate() {
        let row_top = listing_top + idx as f32 * row_h;
        let row_rect = Rect::from_min_size(
            Pos2::new(frame.left() + pad * 0.5, row_top),
            Vec2::new(box_w - pad, row_h),
        );
        if idx == position {
            pen.rect_filled(row_rect, pen.px(4.0), Color32::from_rgb(0x29, 0x25, 0x24));
        }

        let num = pen.layout(&(idx + 1).to_string(), number_spec, pen.px(24.0));
        let num_x = frame.left() + pad + pen.px(24.0) - num.rect.width();
        let text_y = row_top + (row_h - num.rect.height()) / 2.0;
        pen.galley(Pos2::new(num_x, text_y), num, number_spec.color);

        let spec = if *safe { code_spec } else { bad_spec };
        let code = pen.layout(text, spec, box_w - pad * 2.0 - pen.px(40.0));
        pen.galley(
            Pos2::new(frame.left() + pad + pen.px(40.0), text_y),
            code,
            spec.color,
        );

        if finding == Some(idx) {
            draw_badge(pen, row_rect, t % TICK);
        }
    }

    // Scan line, clipped to the listing
    let line_y = (listing_top + scan_line_fraction(t) * listing_h).min(frame.bottom() - pad);
    let gold = Color32::from_rgba_unmultiplied(0xC5, 0xA0, 0x59, 128);
    pen.rect_filled(
        Rect::from_min_size(
            Pos2::new(frame.left(), line_y - pen.px(2.0)),
            Vec2::new(box_w, pen.px(4.0)),
        ),
        0.0,
        gold,
    );

    // Footer
    let footer_top = listing_top + listing_h + pad * 0.5;
    pen.line(
        Pos2::new(frame.left() + pad, footer_top),
        Pos2::new(frame.right() - pad, footer_top),
        pen.px(1.0),
        Color32::from_rgb(0x29, 0x25, 0x24),
    );
    let footer_spec = TextSpec::new(13.0, Color32::from_rgb(0x78, 0x71, 0x6C)).mono();
    let left = pen.layout("Scanner: Active", footer_spec, box_w);
    let label_y = footer_top + pen.px(14.0);
    pen.galley(Pos2::new(frame.left() + pad, label_y), left, footer_spec.color);
    let status_spec = TextSpec {
        color: pen.theme.accent,
        ..footer_spec
    };
    let right = pen.layout(status(position), status_spec, box_w);
    pen.galley(
        Pos2::new(frame.right() - pad - right.rect.width(), label_y),
        right,
        status_spec.color,
    );

    height
}

/// The "XSS Found" badge pops in over the first 0.25 s of the tick.
fn draw_badge(pen: &Pen<'_>, row: Rect, into_tick: f32) {
    let grow = ease_out(into_tick / 0.25);
    if grow <= 0.0 {
        return;
    }
    let spec = TextSpec::new(12.0 * grow, Color32::WHITE).caps(0.05);
    let label = pen.layout("XSS Found", spec, row.width());
    let pad = Vec2::new(pen.px(8.0), pen.px(3.0)) * grow;
    let size = label.rect.size() + pad * 2.0;
    let rect = Rect::from_min_size(
        Pos2::new(row.right() - size.x - pen.px(8.0), row.center().y - size.y / 2.0),
        size,
    );
    pen.rect_filled(rect, pen.px(4.0), Color32::from_rgb(0xDC, 0x26, 0x26));
    pen.galley(rect.min + pad, label, Color32::WHITE);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_cycles() {
        assert_eq!(scan_position(0.0), 0);
        assert_eq!(scan_position(0.79), 0);
        assert_eq!(scan_position(0.81), 1);
        assert_eq!(scan_position(TICK * 7.5), 7);
        assert_eq!(scan_position(TICK * 8.5), 0);
        assert_eq!(scan_position(-3.0), 0);
    }

    #[test]
    fn test_status_labels() {
        for pos in 0..ROWS.len() {
            assert_eq!(status(pos), "Analyzing...");
        }
        assert_eq!(status(ROWS.len()), "Scan Complete");
        assert_eq!(status(ROWS.len() + 1), "Scan Complete");
    }

    #[test]
    fn test_only_script_row_is_flagged() {
        let flagged: Vec<usize> = (0..POSITIONS).filter_map(finding_at).collect();
        assert_eq!(flagged, vec![3]);
    }

    #[test]
    fn test_scan_line_settles_on_position() {
        // Past the glide, the line rests exactly on its row.
        let t = TICK * 2.0 + 0.7;
        assert!((scan_line_fraction(t) - 2.0 / ROWS.len() as f32).abs() < 1e-5);
    }

    #[test]
    fn test_scan_line_wraps_to_top() {
        let settled = scan_line_fraction(TICK * 8.0 + 0.7);
        assert!(settled.abs() < 1e-5);
        // At the start of the wrap tick it is still near the bottom.
        assert!(scan_line_fraction(TICK * 8.0 + 0.001) > 1.0);
    }
}
