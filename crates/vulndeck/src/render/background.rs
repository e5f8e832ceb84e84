use std::f32::consts::{PI, TAU};

use eframe::egui::{self, Color32, Pos2, Rect, Stroke};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::theme::{ACCENT, Theme};

const POINT_COUNT: usize = 150;
const STAR_COUNT: usize = 400;
const SEED: u64 = 0x5ca9_4e7;
const CAMERA_Z: f32 = 6.0;
/// Vertical field of view, in degrees.
const FOV: f32 = 45.0;
/// Depths (distance from camera) where fog starts and fully hides geometry.
const FOG_NEAR: f32 = 5.0;
const FOG_FAR: f32 = 15.0;

/// A slowly spinning point cloud shaped like a network globe, drawn behind
/// every slide.
pub struct NetworkScene {
    points: Vec<[f32; 3]>,
    /// Stars as (unit x, unit y, twinkle phase).
    stars: Vec<[f32; 3]>,
    core: Vec<[f32; 3]>,
}

impl NetworkScene {
    pub fn new() -> Self {
        Self::with_seed(SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let points = (0..POINT_COUNT)
            .map(|_| {
                let theta = rng.random::<f32>() * TAU;
                let phi = (rng.random::<f32>() * 2.0 - 1.0).acos();
                let r = 3.0 + rng.random::<f32>() * 0.5;
                [
                    r * phi.sin() * theta.cos(),
                    r * phi.sin() * theta.sin(),
                    r * phi.cos(),
                ]
            })
            .collect();

        let stars = (0..STAR_COUNT)
            .map(|_| {
                [
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                    rng.random::<f32>() * TAU,
                ]
            })
            .collect();

        Self {
            points,
            stars,
            core: icosahedron(),
        }
    }

    #[cfg(test)]
    pub fn points(&self) -> &[[f32; 3]] {
        &self.points
    }

    /// Paint the scene. `intensity` in 0..1 speeds up the spin as the deck
    /// progresses.
    pub fn draw(&self, painter: &egui::Painter, rect: Rect, theme: &Theme, time: f32, intensity: f32) {
        if theme.is_dark() {
            self.draw_stars(painter, rect, time);
        }

        let yaw = time * 0.05 * (1.0 + intensity);
        let pitch = (time * 0.1).sin() * 0.1;
        // Gentle float
        let bob = (time * 0.8).sin() * 0.08;
        let view = |p: [f32; 3]| {
            let [x, y, z] = rotate(p, yaw, pitch);
            [x, y + bob, z]
        };

        let (color, opacity) = if theme.is_dark() {
            (Color32::from_rgb(0x38, 0xBD, 0xF8), 0.8)
        } else {
            (Color32::from_rgb(0x1A, 0x1A, 0x1A), 0.4)
        };

        // Wireframe shell
        let shell = Theme::with_opacity(color, 0.05);
        for ring in 0..6 {
            let lat = -PI / 2.0 + (ring as f32 + 1.0) * PI / 7.0;
            let r = 2.8 * lat.cos();
            let y = 2.8 * lat.sin();
            let pts: Vec<Pos2> = (0..=32)
                .filter_map(|i| {
                    let a = i as f32 / 32.0 * TAU;
                    project(view([r * a.cos(), y, r * a.sin()]), rect)
                })
                .map(|(p, _)| p)
                .collect();
            painter.add(egui::Shape::line(pts, Stroke::new(1.0, shell)));
        }

        // Core
        let core_color = Theme::with_opacity(ACCENT, 0.1);
        for (a, b) in icosahedron_edges(&self.core) {
            if let (Some((pa, _)), Some((pb, _))) = (project(view(a), rect), project(view(b), rect)) {
                painter.line_segment([pa, pb], Stroke::new(1.0, core_color));
            }
        }

        // Points
        let scale = rect.height() / 1080.0;
        for &p in &self.points {
            if let Some((pos, depth)) = project(view(p), rect) {
                let fade = fog(depth);
                if fade <= 0.01 {
                    continue;
                }
                let radius = (12.0 / depth) * scale;
                painter.circle_filled(pos, radius, Theme::with_opacity(color, opacity * fade));
            }
        }
    }

    fn draw_stars(&self, painter: &egui::Painter, rect: Rect, time: f32) {
        let scale = rect.height() / 1080.0;
        for &[x, y, phase] in &self.stars {
            let pos = Pos2::new(
                rect.center().x + x * rect.width() / 2.0,
                rect.center().y + y * rect.height() / 2.0,
            );
            let twinkle = 0.35 + 0.25 * (time * 1.5 + phase).sin();
            painter.circle_filled(pos, 1.2 * scale, Theme::with_opacity(Color32::WHITE, twinkle));
        }
    }
}

impl Default for NetworkScene {
    fn default() -> Self {
        Self::new()
    }
}

/// Rotate about the y axis by `yaw`, then about the x axis by `pitch`.
pub fn rotate([x, y, z]: [f32; 3], yaw: f32, pitch: f32) -> [f32; 3] {
    let (sy, cy) = yaw.sin_cos();
    let (x, z) = (x * cy + z * sy, -x * sy + z * cy);
    let (sp, cp) = pitch.sin_cos();
    let (y, z) = (y * cp - z * sp, y * sp + z * cp);
    [x, y, z]
}

/// Perspective-project a world point onto `rect`. Returns the screen
/// position and the distance from the camera, or `None` behind the camera.
pub fn project([x, y, z]: [f32; 3], rect: Rect) -> Option<(Pos2, f32)> {
    let depth = CAMERA_Z - z;
    if depth <= 0.1 {
        return None;
    }
    let focal = (rect.height() / 2.0) / (FOV.to_radians() / 2.0).tan();
    let c = rect.center();
    Some((
        Pos2::new(c.x + x * focal / depth, c.y - y * focal / depth),
        depth,
    ))
}

/// Visibility (0..=1) of geometry at a given camera distance.
pub fn fog(depth: f32) -> f32 {
    1.0 - ((depth - FOG_NEAR) / (FOG_FAR - FOG_NEAR)).clamp(0.0, 1.0)
}

fn icosahedron() -> Vec<[f32; 3]> {
    let g = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let n = (1.0 + g * g).sqrt();
    let raw = [
        [-1.0, g, 0.0],
        [1.0, g, 0.0],
        [-1.0, -g, 0.0],
        [1.0, -g, 0.0],
        [0.0, -1.0, g],
        [0.0, 1.0, g],
        [0.0, -1.0, -g],
        [0.0, 1.0, -g],
        [g, 0.0, -1.0],
        [g, 0.0, 1.0],
        [-g, 0.0, -1.0],
        [-g, 0.0, 1.0],
    ];
    raw.iter().map(|[x, y, z]| [x / n, y / n, z / n]).collect()
}

/// Edges join vertices at the minimum pairwise distance.
fn icosahedron_edges(vertices: &[[f32; 3]]) -> Vec<([f32; 3], [f32; 3])> {
    let dist = |a: [f32; 3], b: [f32; 3]| {
        ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)).sqrt()
    };
    let mut edges = Vec::new();
    let Some(&first) = vertices.first() else {
        return edges;
    };
    let edge_len = vertices[1..]
        .iter()
        .map(|&v| dist(first, v))
        .fold(f32::MAX, f32::min);
    for (i, &a) in vertices.iter().enumerate() {
        for &b in &vertices[i + 1..] {
            if (dist(a, b) - edge_len).abs() < 1e-3 {
                edges.push((a, b));
            }
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn radius(p: [f32; 3]) -> f32 {
        (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt()
    }

    #[test]
    fn test_points_on_shell() {
        let scene = NetworkScene::new();
        assert_eq!(scene.points().len(), POINT_COUNT);
        for &p in scene.points() {
            let r = radius(p);
            assert!((2.999..=3.501).contains(&r), "{r}");
        }
    }

    #[test]
    fn test_scene_is_deterministic() {
        let a = NetworkScene::with_seed(7);
        let b = NetworkScene::with_seed(7);
        assert_eq!(a.points(), b.points());
    }

    #[test]
    fn test_icosahedron_has_thirty_edges() {
        let v = icosahedron();
        assert_eq!(v.len(), 12);
        assert_eq!(icosahedron_edges(&v).len(), 30);
    }

    #[test]
    fn test_rotate_preserves_length() {
        let p = [1.0, 2.0, -0.5];
        let q = rotate(p, 1.3, -0.4);
        assert!((radius(p) - radius(q)).abs() < 1e-5);
    }

    #[test]
    fn test_project_origin_hits_center() {
        let rect = Rect::from_min_size(Pos2::ZERO, egui::vec2(1920.0, 1080.0));
        let (pos, depth) = project([0.0, 0.0, 0.0], rect).unwrap();
        assert_eq!(pos, rect.center());
        assert_eq!(depth, CAMERA_Z);
        assert!(project([0.0, 0.0, 10.0], rect).is_none());
    }

    #[test]
    fn test_fog() {
        assert_eq!(fog(1.0), 1.0);
        assert_eq!(fog(FOG_NEAR), 1.0);
        assert_eq!(fog(FOG_FAR), 0.0);
        assert!(fog(10.0) > 0.0 && fog(10.0) < 1.0);
    }
}
