//! Software-rendered visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────┬──────────────┬──────────────┬──────────────┐
//! │     HOME     │   PROJECTS   │    SKILLS    │   CONTACT    │  section bar
//! ├──────────────┴──────────────┴──────────────┴──────────────┤
//! │                                                            │
//! │                      particle sphere                       │
//! │                                                            │
//! │                                             ┌────────────┐ │
//! │                                             │ hand inset │ │
//! │                                             └────────────┘ │
//! │  status bar                                                │
//! └────────────────────────────────────────────────────────────┘
//! ```

use std::sync::mpsc::Sender;

use hand_gesture::{HandLandmarks, LandmarkPoint, NavigationIntent, HAND_CONNECTIONS};
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use sphere_motion::{ParticleField, VisualParams};

use crate::error::{AppError, Result};
use crate::session::TrackedFrame;
use crate::source::{SimInput, SimPose};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W:      usize = 960;
pub const WIN_H:      usize = 640;
const NAV_H:          usize = 24;
const STATUS_Y:       usize = WIN_H - 40;
const INSET_W:        usize = 200;
const INSET_H:        usize = 150;
const INSET_X:        usize = WIN_W - INSET_W - 12;
const INSET_Y:        usize = STATUS_Y - INSET_H - 12;
const BG_COLOR:       u32   = 0xFF05050F;
const NAV_BG:         u32   = 0xFF16213E;
const NAV_ACTIVE:     u32   = 0xFF0F3460;
const TEXT_BG:        u32   = 0xFF0F3460;
const INSET_BG:       u32   = 0xFF101020;
const HAND_COLORS:    [u32; 2] = [0xFF00FFFF, 0xFFFF00FF];
const TRACKED_BRIGHTNESS: f32 = 0.8;
const AMBIENT_BRIGHTNESS: f32 = 0.5;

/// Camera distance from the sphere centre, world units.
pub const CAMERA_Z:   f32 = 9.0;
/// Vertical field of view, degrees.
pub const FOV_Y_DEG:  f32 = 50.0;

const SECTIONS: [NavigationIntent; 4] = [
    NavigationIntent::Home,
    NavigationIntent::Projects,
    NavigationIntent::Skills,
    NavigationIntent::Contact,
];

const NUDGE: f32 = 0.02;
const GAP_STEP: f32 = 0.02;

// ════════════════════════════════════════════════════════════════════════════
// Projection
// ════════════════════════════════════════════════════════════════════════════

/// Perspective camera on the +Z axis looking at the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    cx:    f32,
    cy:    f32,
    focal: f32,
}

impl Projection {
    pub fn new(width: usize, height: usize, center_y: f32) -> Self {
        let half_fov = FOV_Y_DEG.to_radians() / 2.0;
        Projection {
            cx:    width as f32 / 2.0,
            cy:    center_y,
            focal: (height as f32 / 2.0) / half_fov.tan(),
        }
    }

    /// Rotate `p` about Y then X and project it.  Returns `(x, y, depth)` in
    /// pixels, or `None` for points at or behind the near plane.
    pub fn project(&self, p: [f32; 3], params: &VisualParams) -> Option<(f32, f32, f32)> {
        let (sy, cy) = params.rotation_y.sin_cos();
        let x1 = p[0] * cy + p[2] * sy;
        let z1 = -p[0] * sy + p[2] * cy;

        let (sx, cx) = params.rotation_x.sin_cos();
        let y2 = p[1] * cx - z1 * sx;
        let z2 = p[1] * sx + z1 * cx;

        let depth = CAMERA_Z - z2;
        if depth <= 0.1 {
            return None;
        }
        Some((
            self.cx + x1 * self.focal / depth,
            self.cy - y2 * self.focal / depth,
            depth,
        ))
    }
}

/// Where a landmark lands inside the hand inset.  Mirrored, like a selfie
/// camera preview.
fn inset_point(p: LandmarkPoint) -> (isize, isize) {
    let x = INSET_X as f32 + (1.0 - p.x.clamp(0.0, 1.0)) * (INSET_W - 1) as f32;
    let y = INSET_Y as f32 + p.y.clamp(0.0, 1.0) * (INSET_H - 1) as f32;
    (x.round() as isize, y.round() as isize)
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

/// Window-level commands that the app handles itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowCommand {
    ToggleTracking,
    Quit,
}

pub struct Visualizer {
    window:     Window,
    buf:        Vec<u32>,
    sim_tx:     Sender<SimInput>,
    projection: Projection,
}

impl Visualizer {
    pub fn new(sim_tx: Sender<SimInput>) -> Result<Self> {
        let mut window = Window::new(
            "Gesture Sphere",
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| AppError::Window(e.to_string()))?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        let view_h = STATUS_Y - NAV_H;
        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            sim_tx,
            projection: Projection::new(WIN_W, view_h, (NAV_H + view_h / 2) as f32),
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll keyboard input.  Pose keys go to the simulator; tracking and
    /// quit come back as commands.
    pub fn poll_input(&mut self) -> Vec<WindowCommand> {
        let mut commands = Vec::new();
        if !self.window.is_open() {
            return commands;
        }

        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);
        let held     = |k: Key| self.window.is_key_pressed(k, KeyRepeat::Yes);

        if one_shot(Key::Q) || one_shot(Key::Escape) {
            commands.push(WindowCommand::Quit);
        }
        if one_shot(Key::G) {
            commands.push(WindowCommand::ToggleTracking);
        }

        let mut inputs = Vec::new();
        let poses = [
            (Key::Key0, SimPose::NoHands),
            (Key::Key1, SimPose::OneHand([false, false, false, false, false])),
            (Key::Key2, SimPose::OneHand([false, true,  false, false, false])),
            (Key::Key3, SimPose::OneHand([false, true,  true,  false, false])),
            (Key::Key4, SimPose::OneHand([false, true,  true,  true,  false])),
            (Key::Key5, SimPose::OneHand([true;  5])),
            (Key::O,    SimPose::TwoHands { closed: false }),
            (Key::F,    SimPose::TwoHands { closed: true  }),
        ];
        for (key, pose) in poses {
            if one_shot(key) {
                inputs.push(SimInput::Pose(pose));
            }
        }

        // Movement repeats while held.  The preview is mirrored, so screen
        // left is image right.
        let moves = [
            (Key::Left,   NUDGE, 0.0),
            (Key::Right, -NUDGE, 0.0),
            (Key::Up,     0.0,  -NUDGE),
            (Key::Down,   0.0,   NUDGE),
        ];
        for (key, dx, dy) in moves {
            if held(key) {
                inputs.push(SimInput::Nudge { dx, dy });
            }
        }
        if held(Key::Z) { inputs.push(SimInput::Separation(-GAP_STEP)); }
        if held(Key::X) { inputs.push(SimInput::Separation( GAP_STEP)); }

        for input in inputs {
            // Nobody listening in demo mode.
            let _ = self.sim_tx.send(input);
        }
        commands
    }

    /// Render one frame.
    pub fn render(
        &mut self,
        particles: &ParticleField,
        params:    &VisualParams,
        frame:     &TrackedFrame,
        section:   NavigationIntent,
        tracking:  bool,
        status:    &str,
    ) {
        self.buf.fill(BG_COLOR);

        // ── Sphere ────────────────────────────────────────────────────────
        let brightness = if tracking { TRACKED_BRIGHTNESS } else { AMBIENT_BRIGHTNESS };
        self.draw_particles(particles, params, brightness);

        // ── Section bar ───────────────────────────────────────────────────
        self.draw_sections(section);

        // ── Hand skeleton ─────────────────────────────────────────────────
        if tracking {
            self.draw_hands(&frame.hands);
        }

        // ── Status bar ────────────────────────────────────────────────────
        self.fill_rect(0, STATUS_Y, WIN_W, WIN_H - STATUS_Y, TEXT_BG);
        self.draw_label(status, 10, STATUS_Y + 8, 0xFFEEEEEE);

        let g = &frame.gesture;
        let readout = if !tracking {
            "tracking off".to_string()
        } else if g.two_hand_active {
            format!(
                "hands 2  gesture {}  dist {:.2}  spread {:.2}",
                g.gesture.as_str(), g.normalized_distance, g.avg_finger_spread,
            )
        } else if g.one_hand_active {
            format!("hands 1  nav {}", g.navigation.as_str())
        } else {
            "hands 0".to_string()
        };
        self.draw_label(&readout, WIN_W / 2, STATUS_Y + 8, 0xFFAADDFF);

        // ── Key legend ────────────────────────────────────────────────────
        self.draw_label(
            "G=tracking  0=none  1-4=nav  5=open  O=two open  F=two fists  arrows=move  Z/X=gap  Q=quit",
            10, WIN_H - 14, 0xFF888888,
        );

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    // ── Sphere ────────────────────────────────────────────────────────────

    fn draw_particles(&mut self, particles: &ParticleField, params: &VisualParams, brightness: f32) {
        let projection = self.projection;
        for (pos, col) in particles.positions().iter().zip(particles.colors()) {
            let Some((x, y, depth)) = projection.project(*pos, params) else { continue };
            if x < 0.0 || y < NAV_H as f32 || y >= STATUS_Y as f32 {
                continue;
            }
            let color = rgb_to_argb(col[0] * brightness, col[1] * brightness, col[2] * brightness);
            let (px, py) = (x as usize, y as usize);
            self.add_pixel(px, py, color);
            if depth < CAMERA_Z {
                self.add_pixel(px + 1, py, color);
                self.add_pixel(px, py + 1, color);
            }
        }
    }

    // ── Section bar ───────────────────────────────────────────────────────

    fn draw_sections(&mut self, active: NavigationIntent) {
        let w = WIN_W / SECTIONS.len();
        for (i, section) in SECTIONS.iter().enumerate() {
            let x = i * w;
            let bg = if *section == active { NAV_ACTIVE } else { NAV_BG };
            self.fill_rect(x, 0, w, NAV_H, bg);
            let label = section.as_str();
            let lx = x + (w.saturating_sub(label.len() * 4)) / 2;
            let fg = if *section == active { 0xFFFFD700 } else { 0xFFAAAAAA };
            self.draw_label(label, lx, NAV_H / 2 - 2, fg);
        }
    }

    // ── Hand inset ────────────────────────────────────────────────────────

    fn draw_hands(&mut self, hands: &[HandLandmarks]) {
        self.fill_rect(INSET_X, INSET_Y, INSET_W, INSET_H, INSET_BG);
        self.draw_border(INSET_X, INSET_Y, INSET_W, INSET_H, 0xFF333355);

        for (hand, &color) in hands.iter().zip(HAND_COLORS.iter()) {
            for &(a, b) in HAND_CONNECTIONS.iter() {
                let (x0, y0) = inset_point(hand.point(a));
                let (x1, y1) = inset_point(hand.point(b));
                self.draw_line(x0, y0, x1, y1, color);
            }
            for p in hand.points() {
                let (x, y) = inset_point(*p);
                self.fill_rect((x - 1).max(0) as usize, (y - 1).max(0) as usize, 3, 3, 0xFFFFFFFF);
            }
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y+h).min(WIN_H) {
            for col in x..(x+w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 { return; }
        for col in x..(x+w).min(WIN_W) {
            if y < WIN_H           { self.buf[y           * WIN_W + col] = color; }
            if y+h-1 < WIN_H       { self.buf[(y+h-1)     * WIN_W + col] = color; }
        }
        for row in y..(y+h).min(WIN_H) {
            if x < WIN_W           { self.buf[row * WIN_W + x    ] = color; }
            if x+w-1 < WIN_W       { self.buf[row * WIN_W + x+w-1] = color; }
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W && y < WIN_H {
            self.buf[y * WIN_W + x] = color;
        }
    }

    /// Additive blend, saturating per channel.
    fn add_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W && y < WIN_H {
            let i = y * WIN_W + x;
            self.buf[i] = add_colors(self.buf[i], color);
        }
    }

    fn draw_line(&mut self, x0: isize, y0: isize, x1: isize, y1: isize, color: u32) {
        let (dx, dy) = ((x1 - x0).abs(), -(y1 - y0).abs());
        let (sx, sy) = (if x0 < x1 { 1 } else { -1 }, if y0 < y1 { 1 } else { -1 });
        let (mut x, mut y, mut err) = (x0, y0, dx + dy);
        loop {
            if x >= 0 && y >= 0 {
                self.set_pixel(x as usize, y as usize, color);
            }
            if x == x1 && y == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
    }

    /// Minimal bitmap font, 3×5 characters for label rendering.
    /// Each character is encoded as 5 rows × 3 bits.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.set_pixel(cx + col, y + row, color);
                    }
                }
            }
            cx += 4; // 3 wide + 1 gap
            if cx + 4 > WIN_W { break; }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '#' => [0b101, 0b111, 0b101, 0b111, 0b101],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Linear RGB in `0..=1` → opaque ARGB.
fn rgb_to_argb(r: f32, g: f32, b: f32) -> u32 {
    let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u32;
    0xFF000000 | (q(r) << 16) | (q(g) << 8) | q(b)
}

/// Per-channel saturating add of two ARGB colours.
fn add_colors(a: u32, b: u32) -> u32 {
    let ch = |shift: u32| (((a >> shift) & 0xFF) + ((b >> shift) & 0xFF)).min(0xFF) << shift;
    0xFF000000 | ch(16) | ch(8) | ch(0)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn proj() -> Projection {
        Projection::new(800, 600, 300.0)
    }

    #[test]
    fn origin_lands_on_centre() {
        let (x, y, d) = proj().project([0.0, 0.0, 0.0], &VisualParams::NEUTRAL).unwrap();
        assert_eq!((x, y), (400.0, 300.0));
        assert_eq!(d, CAMERA_Z);
    }

    #[test]
    fn up_and_right_are_screen_up_and_right() {
        let p = proj();
        let (x, _, _) = p.project([1.0, 0.0, 0.0], &VisualParams::NEUTRAL).unwrap();
        let (_, y, _) = p.project([0.0, 1.0, 0.0], &VisualParams::NEUTRAL).unwrap();
        assert!(x > 400.0);
        assert!(y < 300.0);
    }

    #[test]
    fn nearer_points_spread_further() {
        let p = proj();
        let (far, _, _)  = p.project([1.0, 0.0, -3.0], &VisualParams::NEUTRAL).unwrap();
        let (near, _, _) = p.project([1.0, 0.0,  3.0], &VisualParams::NEUTRAL).unwrap();
        assert!(near > far);
    }

    #[test]
    fn quarter_turn_about_y_moves_x_into_depth() {
        let params = VisualParams { rotation_y: FRAC_PI_2, ..VisualParams::NEUTRAL };
        let (x, _, d) = proj().project([3.0, 0.0, 0.0], &params).unwrap();
        assert!((x - 400.0).abs() < 1e-3);
        assert!((d - 12.0).abs() < 1e-4);
    }

    #[test]
    fn points_behind_camera_are_culled() {
        assert!(proj().project([0.0, 0.0, 9.5], &VisualParams::NEUTRAL).is_none());
    }

    #[test]
    fn inset_is_mirrored() {
        let (left, top)     = inset_point(LandmarkPoint::new(1.0, 0.0));
        let (right, bottom) = inset_point(LandmarkPoint::new(0.0, 1.0));
        assert_eq!((left, top), (INSET_X as isize, INSET_Y as isize));
        assert_eq!(right, (INSET_X + INSET_W - 1) as isize);
        assert_eq!(bottom, (INSET_Y + INSET_H - 1) as isize);
    }

    #[test]
    fn additive_blend_saturates() {
        assert_eq!(add_colors(0xFF808080, 0xFF808080), 0xFFFFFFFF);
        assert_eq!(add_colors(0xFF000010, 0xFF000001), 0xFF000011);
        assert_eq!(rgb_to_argb(1.0, 0.0, 2.0), 0xFFFF00FF);
    }
}
