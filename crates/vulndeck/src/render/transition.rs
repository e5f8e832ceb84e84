use std::time::Instant;

/// Length of each half of a transition (exit, then entry), in seconds.
pub const PHASE_DURATION: f32 = 0.5;
/// Vertical travel of a slide while entering or leaving, in reference pixels.
pub const TRAVEL: f32 = 20.0;
/// Blur radius at the invisible end of a transition, in reference pixels.
pub const MAX_BLUR: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionKind {
    FadeBlur,
    None,
}

impl TransitionKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "none" => Self::None,
            _ => Self::FadeBlur,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::FadeBlur => "fade-blur",
            Self::None => "none",
        }
    }
}

/// How a slide should be drawn this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideVisual {
    pub opacity: f32,
    /// Vertical offset in reference pixels; negative is up.
    pub offset_y: f32,
    pub blur: f32,
}

impl SlideVisual {
    pub const STEADY: Self = Self {
        opacity: 1.0,
        offset_y: 0.0,
        blur: 0.0,
    };

    /// Outgoing slide, `t` = eased exit progress.
    fn exiting(t: f32) -> Self {
        Self {
            opacity: 1.0 - t,
            offset_y: -TRAVEL * t,
            blur: MAX_BLUR * t,
        }
    }

    /// Incoming slide, `t` = eased entry progress.
    fn entering(t: f32) -> Self {
        Self {
            opacity: t,
            offset_y: TRAVEL * (1.0 - t),
            blur: MAX_BLUR * (1.0 - t),
        }
    }
}

/// The single slide visible in a given frame of a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionFrame {
    pub slide: usize,
    pub visual: SlideVisual,
}

/// An in-flight change of the visible slide.
///
/// The timeline runs `0..PHASE_DURATION` for the outgoing slide's exit, then
/// `PHASE_DURATION..2*PHASE_DURATION` for the incoming slide's entry. Only one
/// slide is drawn at any instant.
#[derive(Debug, Clone)]
pub struct SlideTransition {
    pub outgoing: Option<usize>,
    pub incoming: usize,
    start: Instant,
    /// Timeline position at `start`.
    offset: f32,
}

impl SlideTransition {
    pub fn new(from: usize, to: usize, now: Instant) -> Self {
        Self {
            outgoing: Some(from),
            incoming: to,
            start: now,
            offset: 0.0,
        }
    }

    /// Entry-only animation, played on first load and on restart.
    pub fn entry(to: usize, now: Instant) -> Self {
        Self {
            outgoing: None,
            incoming: to,
            start: now,
            offset: PHASE_DURATION,
        }
    }

    fn timeline(&self, now: Instant) -> f32 {
        self.offset + now.saturating_duration_since(self.start).as_secs_f32()
    }

    pub fn is_complete(&self, now: Instant) -> bool {
        self.timeline(now) >= PHASE_DURATION * 2.0
    }

    pub fn frame(&self, now: Instant) -> TransitionFrame {
        let t = self.timeline(now);
        match self.outgoing {
            Some(from) if t < PHASE_DURATION => TransitionFrame {
                slide: from,
                visual: SlideVisual::exiting(ease_out(t / PHASE_DURATION)),
            },
            _ => {
                let raw = ((t - PHASE_DURATION) / PHASE_DURATION).clamp(0.0, 1.0);
                TransitionFrame {
                    slide: self.incoming,
                    visual: SlideVisual::entering(ease_out(raw)),
                }
            }
        }
    }

    /// Point this transition at a new target. The newest request wins: the
    /// slide currently on screen keeps its visibility and nothing is queued.
    pub fn retarget(&mut self, to: usize, now: Instant) {
        let t = self.timeline(now);
        match self.outgoing {
            Some(from) if t < PHASE_DURATION => {
                if from == to {
                    // Heading back to the slide that is still leaving: enter it
                    // again from where the exit got to.
                    *self = Self {
                        outgoing: None,
                        incoming: to,
                        start: now,
                        offset: PHASE_DURATION * 2.0 - t,
                    };
                } else {
                    self.incoming = to;
                    self.start = now;
                    self.offset = t;
                }
            }
            _ => {
                let shown = ((t - PHASE_DURATION) / PHASE_DURATION).clamp(0.0, 1.0);
                *self = Self {
                    outgoing: Some(self.incoming),
                    incoming: to,
                    start: now,
                    offset: (1.0 - shown) * PHASE_DURATION,
                };
            }
        }
    }
}

/// Cubic ease-out: fast start, gentle landing.
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Cubic ease-in-out.
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}
