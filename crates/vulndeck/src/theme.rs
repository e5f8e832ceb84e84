use eframe::egui::Color32;

use crate::deck::{SlideTheme, Tone};

/// The gold accent shared by both palettes.
pub const ACCENT: Color32 = Color32::from_rgb(0xC5, 0xA0, 0x59);

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub kind: SlideTheme,
    pub background: Color32,
    pub foreground: Color32,
    pub heading_color: Color32,
    pub muted: Color32,
    pub accent: Color32,
    pub surface: Color32,
    pub border: Color32,
    pub positive: Color32,
    pub negative: Color32,
    pub title_size: f32,
    pub subtitle_size: f32,
    pub lead_size: f32,
    pub body_size: f32,
    pub caption_size: f32,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            kind: SlideTheme::Dark,
            background: Color32::from_rgb(0x0C, 0x0A, 0x09),
            foreground: Color32::from_rgb(0xD6, 0xD3, 0xD1),
            heading_color: Color32::WHITE,
            muted: Color32::from_rgb(0x78, 0x71, 0x6C),
            accent: ACCENT,
            surface: Color32::from_rgb(0x29, 0x25, 0x24),
            border: Color32::from_rgb(0x44, 0x40, 0x3C),
            positive: Color32::from_rgb(0x22, 0xC5, 0x5E),
            negative: Color32::from_rgb(0xEF, 0x44, 0x44),
            title_size: 72.0,
            subtitle_size: 20.0,
            lead_size: 30.0,
            body_size: 26.0,
            caption_size: 19.0,
        }
    }

    pub fn light() -> Self {
        Self {
            kind: SlideTheme::Light,
            background: Color32::from_rgb(0xF9, 0xF8, 0xF4),
            foreground: Color32::from_rgb(0x44, 0x40, 0x3C),
            heading_color: Color32::from_rgb(0x1C, 0x19, 0x17),
            muted: Color32::from_rgb(0xA8, 0xA2, 0x9E),
            accent: ACCENT,
            surface: Color32::WHITE,
            border: Color32::from_rgb(0xE7, 0xE5, 0xE4),
            positive: Color32::from_rgb(0x16, 0xA3, 0x4A),
            negative: Color32::from_rgb(0xEF, 0x44, 0x44),
            title_size: 72.0,
            subtitle_size: 20.0,
            lead_size: 30.0,
            body_size: 26.0,
            caption_size: 19.0,
        }
    }

    pub fn for_slide(kind: SlideTheme) -> Self {
        match kind {
            SlideTheme::Dark => Self::dark(),
            SlideTheme::Light => Self::light(),
        }
    }

    pub fn is_dark(&self) -> bool {
        self.kind == SlideTheme::Dark
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        let alpha = (opacity.clamp(0.0, 1.0) * color.a() as f32) as u8;
        Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
    }

    /// Panel fill behind a callout of the given tone.
    pub fn tone_surface(&self, tone: Tone) -> Color32 {
        match tone {
            Tone::Positive | Tone::Neutral => self.surface_muted(),
            Tone::Negative => {
                if self.is_dark() {
                    Color32::from_rgb(0x3B, 0x16, 0x16)
                } else {
                    Color32::from_rgb(0xFE, 0xF2, 0xF2)
                }
            }
        }
    }

    /// Slightly recessed panel color, used behind grouped content.
    pub fn surface_muted(&self) -> Color32 {
        if self.is_dark() {
            Color32::from_rgb(0x1C, 0x19, 0x17)
        } else {
            Color32::from_rgb(0xF5, 0xF5, 0xF4)
        }
    }
}

/// Linear blend between two colors, `t` in 0..=1.
pub fn lerp_color(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Color32::from_rgba_unmultiplied(
        mix(a.r(), b.r()),
        mix(a.g(), b.g()),
        mix(a.b(), b.b()),
        mix(a.a(), b.a()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_slide() {
        assert!(Theme::for_slide(SlideTheme::Dark).is_dark());
        assert!(!Theme::for_slide(SlideTheme::Light).is_dark());
    }

    #[test]
    fn test_palettes_share_accent() {
        assert_eq!(Theme::dark().accent, Theme::light().accent);
        assert_ne!(Theme::dark().background, Theme::light().background);
    }

    #[test]
    fn test_with_opacity() {
        let c = Theme::with_opacity(Color32::from_rgb(10, 20, 30), 0.0);
        assert_eq!(c.a(), 0);
        let c = Theme::with_opacity(Color32::from_rgb(10, 20, 30), 1.0);
        assert_eq!(c, Color32::from_rgb(10, 20, 30));
    }

    #[test]
    fn test_lerp_color_endpoints() {
        let a = Theme::light().background;
        let b = Theme::dark().background;
        assert_eq!(lerp_color(a, b, 0.0), a);
        assert_eq!(lerp_color(a, b, 1.0), b);
        assert_eq!(lerp_color(a, b, 7.0), b);
    }

    #[test]
    fn test_lerp_color_midpoint() {
        let mid = lerp_color(Color32::from_rgb(0, 0, 0), Color32::from_rgb(200, 100, 50), 0.5);
        assert_eq!(mid, Color32::from_rgb(100, 50, 25));
    }
}
