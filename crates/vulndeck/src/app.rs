use eframe::egui::{self, Color32, Pos2, Rect, Sense, Vec2};
use std::path::PathBuf;
use std::time::Instant;

use crate::config::Config;
use crate::deck::{Deck, DeckSource};
use crate::nav::{self, Command, Navigator};
use crate::render;
use crate::render::background::NetworkScene;
use crate::render::transition::{
    SlideTransition, SlideVisual, TransitionFrame, TransitionKind, ease_in_out,
};
use crate::theme::{Theme, lerp_color};

/// Seconds the page background takes to cross-fade between themes.
const BACKGROUND_FADE: f32 = 0.7;
/// Rate at which the progress bar closes the gap to its target, per second.
const PROGRESS_RATE: f32 = 10.0;

/// What the command line and config decided before the window opens.
pub struct LaunchOptions {
    pub deck: Option<PathBuf>,
    /// `None` defers to the config.
    pub windowed: Option<bool>,
    /// 1-indexed.
    pub start_slide: Option<usize>,
}

/// Page background that eases from the previous theme's color to the current one.
#[derive(Debug, Clone)]
struct BackgroundFade {
    from: Color32,
    to: Color32,
    start: Instant,
}

impl BackgroundFade {
    fn new(color: Color32, now: Instant) -> Self {
        Self {
            from: color,
            to: color,
            start: now,
        }
    }

    fn progress(&self, now: Instant) -> f32 {
        now.saturating_duration_since(self.start).as_secs_f32() / BACKGROUND_FADE
    }

    fn color(&self, now: Instant) -> Color32 {
        lerp_color(self.from, self.to, ease_in_out(self.progress(now)))
    }

    fn is_settled(&self, now: Instant) -> bool {
        self.from == self.to || self.progress(now) >= 1.0
    }

    fn retarget(&mut self, target: Color32, now: Instant) {
        if target != self.to {
            self.from = self.color(now);
            self.to = target;
            self.start = now;
        }
    }
}

/// Move `current` toward `target` by an exponential step for a frame of `dt`
/// seconds, snapping once close enough.
fn ease_toward(current: f32, target: f32, dt: f32) -> f32 {
    let diff = target - current;
    if diff.abs() < 1e-3 {
        return target;
    }
    current + diff * (1.0 - (-dt * PROGRESS_RATE).exp())
}

struct DeckApp {
    source: DeckSource,
    deck: Deck,
    nav: Navigator,
    transition_kind: TransitionKind,
    transition: Option<SlideTransition>,
    /// Slide currently on screen and when it appeared, for self-animating widgets.
    shown: (usize, Instant),
    scene: Option<NetworkScene>,
    started: Instant,
    background: BackgroundFade,
    progress_shown: f32,
    show_help: bool,
    fullscreen: bool,
}

impl DeckApp {
    fn new(
        source: DeckSource,
        deck: Deck,
        start_index: usize,
        transition_kind: TransitionKind,
        background: bool,
        now: Instant,
    ) -> Self {
        let nav = Navigator::starting_at(deck.len(), start_index);
        let bg = deck
            .slide(nav.index())
            .map_or(Theme::light().background, |s| Theme::for_slide(s.theme).background);
        let transition = match transition_kind {
            TransitionKind::FadeBlur => Some(SlideTransition::entry(nav.index(), now)),
            TransitionKind::None => None,
        };
        Self {
            source,
            deck,
            nav,
            transition_kind,
            transition,
            shown: (nav.index(), now),
            scene: background.then(NetworkScene::new),
            started: now,
            background: BackgroundFade::new(bg, now),
            progress_shown: 0.0,
            show_help: false,
            fullscreen: false,
        }
    }

    /// Apply one command, from a key or a control. Returns a viewport command
    /// to send once input handling is done.
    fn execute(&mut self, command: Command, now: Instant) -> Option<egui::ViewportCommand> {
        match command {
            Command::Next | Command::Previous => {
                self.navigate(command, now);
                None
            }
            Command::Restart => {
                self.restart(now);
                None
            }
            Command::ToggleHelp => {
                self.show_help = !self.show_help;
                None
            }
            Command::ToggleFullscreen => Some(egui::ViewportCommand::Fullscreen(!self.fullscreen)),
            Command::Quit => Some(egui::ViewportCommand::Close),
        }
    }

    fn navigate(&mut self, command: Command, now: Instant) {
        let from = self.nav.index();
        if !self.nav.apply(command) {
            return;
        }
        let to = self.nav.index();
        tracing::debug!(from, to, "navigate");

        self.transition = match (self.transition_kind, self.transition.take()) {
            (TransitionKind::None, _) => None,
            (TransitionKind::FadeBlur, Some(mut t)) if !t.is_complete(now) => {
                t.retarget(to, now);
                Some(t)
            }
            (TransitionKind::FadeBlur, _) => Some(SlideTransition::new(from, to, now)),
        };
    }

    /// Reload the deck from its source and start over at the first slide.
    /// A failed reload keeps the deck already in memory.
    fn restart(&mut self, now: Instant) {
        match self.source.load() {
            Ok(deck) => {
                tracing::info!(
                    source = %self.source.describe(),
                    slides = deck.len(),
                    "deck reloaded"
                );
                self.deck = deck;
            }
            Err(e) => tracing::warn!("Reload failed, keeping current deck: {e:#}"),
        }
        self.nav = Navigator::new(self.deck.len());
        self.transition = match self.transition_kind {
            TransitionKind::FadeBlur => Some(SlideTransition::entry(0, now)),
            TransitionKind::None => None,
        };
        self.progress_shown = 0.0;
        tracing::info!("restart");
    }

    fn visible(&self, now: Instant) -> TransitionFrame {
        match &self.transition {
            Some(t) => t.frame(now),
            None => TransitionFrame {
                slide: self.nav.index(),
                visual: SlideVisual::STEADY,
            },
        }
    }

    fn since_shown(&mut self, slide: usize, now: Instant) -> f32 {
        if self.shown.0 != slide {
            self.shown = (slide, now);
        }
        now.saturating_duration_since(self.shown.1).as_secs_f32()
    }

    fn compute_scale(rect: Rect) -> f32 {
        let ref_w = 1920.0;
        let ref_h = 1080.0;
        (rect.width() / ref_w).min(rect.height() / ref_h)
    }

    fn draw_chrome(&self, ui: &egui::Ui, theme: &Theme, rect: Rect, scale: f32) -> Vec<Command> {
        let mut clicked = Vec::new();

        // Progress bar along the top edge
        let bar_h = 4.0 * scale;
        ui.painter().rect_filled(
            Rect::from_min_size(rect.min, Vec2::new(rect.width(), bar_h)),
            0.0,
            Theme::with_opacity(theme.border, 0.6),
        );
        ui.painter().rect_filled(
            Rect::from_min_size(rect.min, Vec2::new(rect.width() * self.progress_shown, bar_h)),
            0.0,
            theme.accent,
        );

        // Back, counter, forward in the bottom-right corner
        let size = 48.0 * scale;
        let margin = 32.0 * scale;
        let counter = ui.painter().layout_no_wrap(
            self.nav.counter_label(),
            egui::FontId::monospace(16.0 * scale),
            theme.muted,
        );
        let gap = 16.0 * scale;
        let total_w = size * 2.0 + counter.rect.width() + gap * 2.0;
        let y = rect.bottom() - margin - size;
        let mut x = rect.right() - margin - total_w;

        let back = Rect::from_min_size(Pos2::new(x, y), Vec2::splat(size));
        if nav_button(ui, theme, back, "\u{25C0}", self.nav.can_retreat(), "nav_back", scale) {
            clicked.push(Command::Previous);
        }
        x += size + gap;
        let counter_pos = Pos2::new(x, y + (size - counter.rect.height()) / 2.0);
        ui.painter().galley(counter_pos, counter, theme.muted);
        x = rect.right() - margin - size;
        let forward = Rect::from_min_size(Pos2::new(x, y), Vec2::splat(size));
        if nav_button(ui, theme, forward, "\u{25B6}", self.nav.can_advance(), "nav_forward", scale) {
            clicked.push(Command::Next);
        }

        clicked
    }

    fn is_animating(&self, now: Instant, slide_animated: bool) -> bool {
        self.transition.is_some()
            || slide_animated
            || self.scene.is_some()
            || !self.background.is_settled(now)
            || (self.progress_shown - self.nav.progress()).abs() > 1e-3
    }
}

/// A round arrow control. Disabled controls are dimmed and ignore the pointer.
/// Returns whether it was clicked this frame.
fn nav_button(
    ui: &egui::Ui,
    theme: &Theme,
    rect: Rect,
    glyph: &str,
    enabled: bool,
    id: &str,
    scale: f32,
) -> bool {
    let sense = if enabled { Sense::click() } else { Sense::hover() };
    let response = ui.interact(rect, egui::Id::new(id), sense);
    let hovered = enabled && response.hovered();
    if hovered {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }

    let opacity = if enabled { 1.0 } else { 0.3 };
    let fill = if hovered {
        theme.accent
    } else {
        theme.surface_muted()
    };
    let fg = if hovered { Color32::WHITE } else { theme.foreground };
    ui.painter()
        .circle_filled(rect.center(), rect.width() / 2.0, Theme::with_opacity(fill, opacity));
    ui.painter().circle_stroke(
        rect.center(),
        rect.width() / 2.0,
        egui::Stroke::new(1.0 * scale, Theme::with_opacity(theme.border, opacity)),
    );
    let galley = ui.painter().layout_no_wrap(
        glyph.to_string(),
        egui::FontId::proportional(18.0 * scale),
        Theme::with_opacity(fg, opacity),
    );
    ui.painter().galley(
        rect.center() - galley.rect.size() / 2.0,
        galley,
        Theme::with_opacity(fg, opacity),
    );
    enabled && response.clicked()
}

fn draw_help(ui: &egui::Ui, theme: &Theme, rect: Rect, scale: f32) {
    let shortcuts = [
        ("\u{2192} / Space / PgDn / N", "Next slide"),
        ("\u{2190} / PgUp / P", "Previous slide"),
        ("F", "Toggle fullscreen"),
        ("H / F1", "Toggle this help"),
        ("Q", "Quit"),
    ];

    let bg = Theme::with_opacity(theme.surface_muted(), 0.95);
    let text_color = theme.foreground;
    let key_color = theme.accent;

    let padding = 24.0 * scale;
    let line_height = 32.0 * scale;
    let height = shortcuts.len() as f32 * line_height + padding * 2.0 + 40.0 * scale;
    let width = 440.0 * scale;
    let panel = Rect::from_center_size(rect.center(), Vec2::new(width, height));
    ui.painter().rect_filled(panel, 12.0 * scale, bg);

    let title = ui.painter().layout_no_wrap(
        "Keyboard Shortcuts".to_string(),
        egui::FontId::proportional(20.0 * scale),
        theme.heading_color,
    );
    ui.painter().galley(
        Pos2::new(panel.left() + padding, panel.top() + padding),
        title,
        theme.heading_color,
    );

    let mut y = panel.top() + padding + 40.0 * scale;
    for (key, desc) in shortcuts {
        let key_galley = ui.painter().layout_no_wrap(
            key.to_string(),
            egui::FontId::monospace(15.0 * scale),
            key_color,
        );
        ui.painter()
            .galley(Pos2::new(panel.left() + padding, y), key_galley, key_color);
        let desc_galley = ui.painter().layout_no_wrap(
            desc.to_string(),
            egui::FontId::proportional(15.0 * scale),
            text_color,
        );
        ui.painter().galley(
            Pos2::new(panel.left() + padding + 230.0 * scale, y),
            desc_galley,
            text_color,
        );
        y += line_height;
    }
}

impl eframe::App for DeckApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        // Collect commands first; viewport commands are sent after the input
        // closure (sending inside ctx.input() deadlocks).
        let mut commands = Vec::new();
        let mut dt = 0.0;
        ctx.input(|i| {
            self.fullscreen = i.viewport().fullscreen.unwrap_or(self.fullscreen);
            dt = i.stable_dt;
            for key in nav::BOUND_KEYS {
                if i.key_pressed(key) {
                    commands.extend(nav::command_for_key(key));
                }
            }
        });

        let mut viewport_cmds: Vec<egui::ViewportCommand> = Vec::new();
        for command in commands {
            viewport_cmds.extend(self.execute(command, now));
        }
        for cmd in viewport_cmds {
            ctx.send_viewport_cmd(cmd);
        }

        if self.transition.as_ref().is_some_and(|t| t.is_complete(now)) {
            self.transition = None;
        }

        let frame = self.visible(now);
        let since_entry = self.since_shown(frame.slide, now);
        self.progress_shown = ease_toward(self.progress_shown, self.nav.progress(), dt);

        let Some(slide) = self.deck.slide(frame.slide) else {
            tracing::error!(slide = frame.slide, "slide index out of range");
            return;
        };
        let theme = Theme::for_slide(slide.theme);
        self.background.retarget(theme.background, now);
        let bg = self.background.color(now);
        let time = now.saturating_duration_since(self.started).as_secs_f32();
        let intensity = self.nav.index() as f32 / self.nav.len() as f32;

        let mut clicked = Vec::new();
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                ui.painter().rect_filled(rect, 0.0, bg);
                let scale = Self::compute_scale(rect);
                // Minimized windows report an empty rect; nothing to lay out.
                if scale <= 0.0 {
                    return;
                }

                if let Some(scene) = &self.scene {
                    scene.draw(ui.painter(), rect, &theme, time, intensity);
                }

                let response = render::render_slide(
                    ui,
                    slide,
                    &theme,
                    rect,
                    frame.visual,
                    since_entry,
                    scale,
                );
                if response.restart_clicked {
                    clicked.push(Command::Restart);
                }

                clicked.extend(self.draw_chrome(ui, &theme, rect, scale));

                if self.show_help {
                    draw_help(ui, &theme, rect, scale);
                }
            });

        let slide_animated = slide.is_animated();
        for command in clicked {
            if let Some(cmd) = self.execute(command, now) {
                ctx.send_viewport_cmd(cmd);
            }
        }

        if self.is_animating(now, slide_animated) {
            ctx.request_repaint();
        }
    }
}

/// A window-mode flag on the command line beats `defaults.windowed`.
fn resolve_windowed(flag: Option<bool>, config: &Config) -> bool {
    flag.unwrap_or_else(|| config.windowed())
}

pub fn run(options: LaunchOptions) -> anyhow::Result<()> {
    let config = Config::load_or_default();
    let source = DeckSource::from_option(
        options
            .deck
            .or_else(|| config.deck().map(PathBuf::from)),
    );
    let deck = source.load()?;
    tracing::info!(source = %source.describe(), slides = deck.len(), "deck loaded");

    let windowed = resolve_windowed(options.windowed, &config);
    let start_index = options.start_slide.map_or(0, |s| s.saturating_sub(1));
    let transition_kind = config.transition();
    let background = config.background();
    let title = deck.title.clone();

    let viewport = if windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        native_options,
        Box::new(move |_cc| {
            let mut app = DeckApp::new(
                source,
                deck,
                start_index,
                transition_kind,
                background,
                Instant::now(),
            );
            app.fullscreen = !windowed;
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn app(kind: TransitionKind) -> DeckApp {
        let deck = Deck::builtin().unwrap();
        DeckApp::new(DeckSource::Builtin, deck, 0, kind, false, Instant::now())
    }

    #[test]
    fn test_starts_with_entry_animation() {
        let now = Instant::now();
        let a = app(TransitionKind::FadeBlur);
        let t = a.transition.as_ref().unwrap();
        assert_eq!(t.outgoing, None);
        assert_eq!(t.incoming, 0);
        assert_eq!(a.visible(now).slide, 0);
    }

    #[test]
    fn test_walk_to_the_end() {
        let mut a = app(TransitionKind::FadeBlur);
        let now = Instant::now();
        for _ in 0..9 {
            a.execute(Command::Next, now);
        }
        assert_eq!(a.nav.index(), 9);
        assert!(!a.nav.can_advance());
        assert_eq!(a.nav.progress(), 1.0);

        a.execute(Command::Next, now);
        assert_eq!(a.nav.index(), 9);
    }

    #[test]
    fn test_previous_at_first_is_noop() {
        let mut a = app(TransitionKind::None);
        let before = a.transition.clone().map(|t| t.incoming);
        a.execute(Command::Previous, Instant::now());
        assert_eq!(a.nav.index(), 0);
        assert_eq!(a.transition.map(|t| t.incoming), before);
    }

    #[test]
    fn test_key_and_control_agree() {
        // Arrow key and the forward control both resolve to Command::Next.
        let now = Instant::now();
        let mut by_key = app(TransitionKind::FadeBlur);
        let mut by_click = app(TransitionKind::FadeBlur);
        let key = nav::command_for_key(egui::Key::ArrowRight).unwrap();
        by_key.execute(key, now);
        by_click.execute(Command::Next, now);
        assert_eq!(by_key.nav, by_click.nav);
        assert_eq!(
            by_key.transition.map(|t| t.incoming),
            by_click.transition.map(|t| t.incoming)
        );
    }

    #[test]
    fn test_restart_resets_with_entry_only() {
        let mut a = app(TransitionKind::FadeBlur);
        let now = Instant::now();
        for _ in 0..5 {
            a.execute(Command::Next, now);
        }
        assert_eq!(a.nav.index(), 5);

        let later = now + Duration::from_secs(3);
        a.execute(Command::Restart, later);
        assert_eq!(a.nav.index(), 0);
        let t = a.transition.as_ref().unwrap();
        assert_eq!(t.outgoing, None);
        assert_eq!(t.incoming, 0);
        assert_eq!(a.visible(later).visual.opacity, 0.0);
    }

    #[test]
    fn test_restart_keeps_deck_when_reload_fails() {
        let deck = Deck::builtin().unwrap();
        let now = Instant::now();
        let mut a = DeckApp::new(
            DeckSource::File(PathBuf::from("/nonexistent/deck.yaml")),
            deck,
            0,
            TransitionKind::FadeBlur,
            false,
            now,
        );
        for _ in 0..3 {
            a.execute(Command::Next, now);
        }
        assert_eq!(a.nav.index(), 3);

        let later = now + Duration::from_secs(3);
        a.execute(Command::Restart, later);
        assert_eq!(a.nav.index(), 0);
        assert_eq!(a.deck.len(), 10);
        let t = a.transition.as_ref().unwrap();
        assert_eq!(t.outgoing, None);
        assert_eq!(t.incoming, 0);
        assert_eq!(a.progress_shown, 0.0);
    }

    #[test]
    fn test_window_flag_overrides_config() {
        let mut config = Config::default();
        config.set("defaults.windowed", "true").unwrap();
        assert!(resolve_windowed(None, &config));
        assert!(!resolve_windowed(Some(false), &config));
        assert!(resolve_windowed(Some(true), &Config::default()));
        assert!(!resolve_windowed(None, &Config::default()));
    }

    #[test]
    fn test_scale_of_empty_viewport_is_zero() {
        assert_eq!(DeckApp::compute_scale(Rect::ZERO), 0.0);
        let hd = Rect::from_min_size(Pos2::ZERO, Vec2::new(1920.0, 1080.0));
        assert_eq!(DeckApp::compute_scale(hd), 1.0);
    }

    #[test]
    fn test_rapid_navigation_retargets() {
        let mut a = app(TransitionKind::FadeBlur);
        let t0 = Instant::now() + Duration::from_secs(2);
        a.execute(Command::Next, t0);
        a.execute(Command::Next, t0 + Duration::from_millis(100));
        let t = a.transition.as_ref().unwrap();
        assert_eq!(t.outgoing, Some(0));
        assert_eq!(t.incoming, 2);
        assert_eq!(a.nav.index(), 2);
    }

    #[test]
    fn test_no_transition_kind_swaps_instantly() {
        let mut a = app(TransitionKind::None);
        assert!(a.transition.is_none());
        let now = Instant::now();
        a.execute(Command::Next, now);
        assert!(a.transition.is_none());
        assert_eq!(a.visible(now).slide, 1);
        assert_eq!(a.visible(now).visual, SlideVisual::STEADY);
    }

    #[test]
    fn test_window_commands() {
        let mut a = app(TransitionKind::None);
        let now = Instant::now();
        assert!(matches!(
            a.execute(Command::Quit, now),
            Some(egui::ViewportCommand::Close)
        ));
        assert!(matches!(
            a.execute(Command::ToggleFullscreen, now),
            Some(egui::ViewportCommand::Fullscreen(true))
        ));
        assert!(a.execute(Command::ToggleHelp, now).is_none());
        assert!(a.show_help);
    }

    #[test]
    fn test_start_slide_clamped() {
        let deck = Deck::builtin().unwrap();
        let a = DeckApp::new(
            DeckSource::Builtin,
            deck,
            42,
            TransitionKind::None,
            false,
            Instant::now(),
        );
        assert_eq!(a.nav.index(), 9);
    }

    #[test]
    fn test_since_shown_resets_on_change() {
        let mut a = app(TransitionKind::None);
        let t0 = a.shown.1;
        assert!(a.since_shown(0, t0 + Duration::from_secs(2)) >= 2.0);
        assert_eq!(a.since_shown(1, t0 + Duration::from_secs(3)), 0.0);
    }

    #[test]
    fn test_background_fade() {
        let t0 = Instant::now();
        let light = Theme::light().background;
        let dark = Theme::dark().background;
        let mut fade = BackgroundFade::new(light, t0);
        assert!(fade.is_settled(t0));
        fade.retarget(dark, t0);
        assert_eq!(fade.color(t0), light);
        assert!(!fade.is_settled(t0 + Duration::from_millis(300)));
        let done = t0 + Duration::from_secs(1);
        assert_eq!(fade.color(done), dark);
        assert!(fade.is_settled(done));
    }

    #[test]
    fn test_ease_toward() {
        assert_eq!(ease_toward(0.5, 0.5, 0.016), 0.5);
        let v = ease_toward(0.0, 1.0, 0.016);
        assert!(v > 0.0 && v < 1.0);
        assert_eq!(ease_toward(0.9995, 1.0, 0.016), 1.0);
    }
}
