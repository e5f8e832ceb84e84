//! Self-animating slide widgets. Each one is driven purely by the time since
//! its slide became current, so leaving and returning to a slide replays it.

pub mod chart;
pub mod scanner;

use std::f32::consts::TAU;

/// Soft opacity pulse between 0.5 and 1.0 with a 2 s period.
pub fn pulse(t: f32) -> f32 {
    0.75 + 0.25 * (t * TAU / 2.0).cos()
}

/// Bounce height in 0..=1 with a 1 s period; 1 is the top of the hop.
pub fn bounce(t: f32) -> f32 {
    let phase = t.rem_euclid(1.0);
    (phase * TAU / 2.0).sin().abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_range() {
        for i in 0..200 {
            let v = pulse(i as f32 * 0.037);
            assert!((0.5..=1.0).contains(&v), "{v}");
        }
        assert!((pulse(0.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_bounce_range() {
        for i in 0..200 {
            let v = bounce(i as f32 * 0.041);
            assert!((0.0..=1.0).contains(&v), "{v}");
        }
        assert!(bounce(0.0).abs() < 1e-6);
        assert!((bounce(0.5) - 1.0).abs() < 1e-6);
    }
}
