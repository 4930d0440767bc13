//! Software-rendered particle visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ OPEN  ▇▇▇▇▇▇░░░░                                             │
//! │ PINCH ▇▇░░░░░░░░                                             │
//! │ PULL  ▇▇▇▇▇▇▇▇▇░       · ·  particles  · ·                    │
//! │ TURB  ▇▇▇▇░░░░░░          ·    +    ·     (+ = attractor)    │
//! │ MODE  ▇▇▇▇▇░░░░░ VORTEX     · ·   · ·                        │
//! │ ● hand                                                       │
//! │ status                                                       │
//! │ key legend                                                   │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use std::sync::mpsc::Sender;

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use hand_signal::GestureState;
use particle_control::{ControlState, MODE_COUNT};

use crate::detector::SimInput;
use crate::error::AppError;
use crate::particles::{mode_weights, ParticleField};

// ════════════════════════════════════════════════════════════════════════════
// Look constants
// ════════════════════════════════════════════════════════════════════════════

const BG_COLOR:     u32 = 0xFF05050A;
const HUD_TEXT:     u32 = 0xFFCCCCDD;
const HUD_DIM:      u32 = 0xFF555566;
const BAR_BG:       u32 = 0xFF1A1A2E;
const BAR_FG:       u32 = 0xFF4FC3F7;
const ACTIVE_COLOR: u32 = 0xFF66FF66;
const IDLE_COLOR:   u32 = 0xFFFF5555;
const BAR_W:        usize = 120;
const BAR_H:        usize = 6;

/// Per-mode particle tint: Orbital cyan, Vortex magenta, Bloom gold.
const MODE_TINT: [[f32; 3]; MODE_COUNT] = [
    [0.25, 0.75, 1.00],
    [1.00, 0.25, 0.75],
    [1.00, 0.75, 0.25],
];

/// Additive intensity of one unit-size particle.
const SPLAT: f32 = 60.0;

/// Camera distance from the origin along +z; vertical field of view.
const CAMERA_Z: f32 = 5.0;
const FOV_Y_DEG: f32 = 75.0;

// ════════════════════════════════════════════════════════════════════════════
// Projection
// ════════════════════════════════════════════════════════════════════════════

/// Perspective-project a scene point to pixel coordinates, camera on +z
/// looking at the origin with `y` up.
pub fn project(pos: [f32; 3], width: usize, height: usize) -> Option<(usize, usize)> {
    let depth = CAMERA_Z - pos[2];
    if depth <= 0.1 {
        return None;
    }
    let f = 1.0 / (FOV_Y_DEG.to_radians() / 2.0).tan();
    let aspect = width as f32 / height as f32;
    let nx = pos[0] * f / (depth * aspect);
    let ny = pos[1] * f / depth;
    let sx = (nx + 1.0) * 0.5 * width as f32;
    let sy = (1.0 - ny) * 0.5 * height as f32;
    if sx < 0.0 || sy < 0.0 || sx >= width as f32 || sy >= height as f32 {
        return None;
    }
    Some((sx as usize, sy as usize))
}

/// Particle tint for a fractional mode value.
pub fn mode_tint(mode_current: f32) -> [f32; 3] {
    let w = mode_weights(mode_current);
    let mut c = [0.0; 3];
    for (wi, tint) in w.iter().zip(MODE_TINT.iter()) {
        for k in 0..3 { c[k] += wi * tint[k]; }
    }
    c
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:   Window,
    buf:      Vec<u32>,
    width:    usize,
    height:   usize,
    sim_tx:   Sender<SimInput>,
    pinching: bool,
    pointer:  Option<(f32, f32)>,
}

impl Visualizer {
    pub fn new(width: usize, height: usize, sim_tx: Sender<SimInput>) -> Result<Self, AppError> {
        let mut window = Window::new(
            "Particle Hands",
            width, height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;
        window.set_target_fps(60);

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; width * height],
            width,
            height,
            sim_tx,
            pinching: false,
            pointer: None,
        })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll pointer and keys, forward changes to the simulated detector.
    /// Returns false when the user asked to quit.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);

        if one_shot(Key::Q) || one_shot(Key::Escape) {
            let _ = self.sim_tx.send(SimInput::Quit);
            return false;
        }
        if one_shot(Key::O) {
            let _ = self.sim_tx.send(SimInput::ToggleOpen);
        }
        if one_shot(Key::H) {
            let _ = self.sim_tx.send(SimInput::ToggleVisible);
        }

        if let Some((mx, my)) = self.window.get_mouse_pos(MouseMode::Clamp) {
            let p = (mx / self.width as f32, my / self.height as f32);
            if self.pointer != Some(p) {
                self.pointer = Some(p);
                let _ = self.sim_tx.send(SimInput::Pointer { x: p.0, y: p.1 });
            }
        }

        let down = self.window.get_mouse_down(MouseButton::Left);
        if down != self.pinching {
            self.pinching = down;
            let _ = self.sim_tx.send(SimInput::Pinch(down));
        }

        true
    }

    /// Render one frame.
    pub fn render(
        &mut self,
        field:   &ParticleField,
        gesture: &GestureState,
        control: &ControlState,
        status:  &str,
    ) -> Result<(), AppError> {
        self.buf.fill(BG_COLOR);

        // ── Particles ─────────────────────────────────────────────────────
        let tint = mode_tint(control.mode_current);
        for p in field.particles() {
            if let Some((x, y)) = project(p.pos, self.width, self.height) {
                let amount = SPLAT * p.size;
                self.splat(x, y, [tint[0] * amount, tint[1] * amount, tint[2] * amount]);
            }
        }

        // ── Attractor marker ──────────────────────────────────────────────
        if control.attractor_strength > 0.05 {
            if let Some((x, y)) = project(control.attractor, self.width, self.height) {
                let c = blend(BG_COLOR, 0xFFFFFFFF, control.attractor_strength);
                self.draw_cross(x, y, 5, c);
            }
        }

        // ── HUD ───────────────────────────────────────────────────────────
        let mode_fill = control.mode_current / (MODE_COUNT - 1) as f32;
        let rows: [(&str, f32); 5] = [
            ("OPEN",  gesture.openness),
            ("PINCH", gesture.pinch),
            ("PULL",  control.attractor_strength),
            ("TURB",  control.turbulence),
            ("MODE",  mode_fill),
        ];
        for (i, (label, value)) in rows.iter().enumerate() {
            let y = 10 + i * 12;
            self.draw_label(label, 10, y, HUD_TEXT);
            self.fill_rect(40, y, BAR_W, BAR_H, BAR_BG);
            let w = (value.clamp(0.0, 1.0) * BAR_W as f32) as usize;
            self.fill_rect(40, y, w, BAR_H, BAR_FG);
        }
        self.draw_label(control.mode_target.name(), 40 + BAR_W + 8, 10 + 4 * 12, HUD_TEXT);

        let (dot, text) = if gesture.active { (ACTIVE_COLOR, "HAND") } else { (IDLE_COLOR, "NO HAND") };
        self.fill_rect(10, 74, 5, 5, dot);
        self.draw_label(text, 20, 74, HUD_TEXT);

        // ── Status + legend ───────────────────────────────────────────────
        self.draw_label(status, 10, self.height - 30, HUD_TEXT);
        self.draw_label(
            "MOUSE=MOVE  LEFT BUTTON=PINCH  O=OPEN/CLOSE  H=HIDE HAND  Q=QUIT",
            10, self.height - 16, HUD_DIM,
        );

        self.window.update_with_buffer(&self.buf, self.width, self.height)?;
        Ok(())
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    /// Additively blend a 2×2 splat, saturating each channel.
    fn splat(&mut self, x: usize, y: usize, rgb: [f32; 3]) {
        for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            let (px, py) = (x + dx, y + dy);
            if px >= self.width || py >= self.height { continue; }
            let i = py * self.width + px;
            self.buf[i] = add_rgb(self.buf[i], rgb);
        }
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                self.buf[row * self.width + col] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            self.buf[y * self.width + x] = color;
        }
    }

    fn draw_cross(&mut self, cx: usize, cy: usize, r: usize, color: u32) {
        for d in 0..=r {
            self.set_pixel(cx + d, cy, color);
            self.set_pixel(cx, cy + d, color);
            if let Some(x) = cx.checked_sub(d) { self.set_pixel(x, cy, color); }
            if let Some(y) = cy.checked_sub(d) { self.set_pixel(cx, y, color); }
        }
    }

    /// 3×5 bitmap text, one pixel gap between glyphs.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let bits = glyph(ch);
            for row in 0..5 {
                for col in 0..3 {
                    if bits & (1 << (14 - (row * 3 + col))) != 0 {
                        self.set_pixel(cx + col, y + row, color);
                    }
                }
            }
            cx += 4;
            if cx + 4 > self.width { break; }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// 3×5 font, 15 bits per glyph, top row in the high bits
// ────────────────────────────────────────────────────────────────────────────

fn glyph(c: char) -> u16 {
    match c.to_ascii_uppercase() {
        '0' | 'O' => 0x7B6F,
        '1' => 0x2C97,
        '2' => 0x73E7,
        '3' => 0x73CF,
        '4' => 0x5BC9,
        '5' | 'S' => 0x79CF,
        '6' => 0x79EF,
        '7' => 0x7249,
        '8' => 0x7BEF,
        '9' => 0x7BCF,
        'A' => 0x7BED,
        'B' => 0x6BAE,
        'C' => 0x7927,
        'D' => 0x6B6E,
        'E' => 0x79E7,
        'F' => 0x79E4,
        'G' => 0x796F,
        'H' => 0x5BED,
        'I' => 0x7497,
        'J' => 0x126F,
        'K' => 0x5BAD,
        'L' => 0x4927,
        'M' => 0x5F6D,
        'N' => 0x7B6D,
        'P' => 0x7BE4,
        'Q' => 0x7B79,
        'R' => 0x6BAD,
        'T' => 0x7492,
        'U' => 0x5B6F,
        'V' => 0x5B52,
        'W' => 0x5B7D,
        'X' => 0x5AAD,
        'Y' => 0x5BD2,
        'Z' => 0x72A7,
        '/' => 0x12A4,
        '-' => 0x01C0,
        '.' => 0x0002,
        ',' => 0x0014,
        ':' => 0x0410,
        '=' => 0x0E38,
        '+' => 0x05D0,
        ' ' => 0x0000,
        _   => 0x0080,
    }
}

/// Saturating additive blend of `rgb` (0–255 floats) onto an ARGB pixel.
fn add_rgb(px: u32, rgb: [f32; 3]) -> u32 {
    let ch = |shift: u32, add: f32| {
        let v = ((px >> shift) & 0xFF) as f32 + add;
        (v.clamp(0.0, 255.0) as u32) << shift
    };
    0xFF000000 | ch(16, rgb[0]) | ch(8, rgb[1]) | ch(0, rgb[2])
}

/// Linear blend of two ARGB colors. `t` = 0 → `a`, `t` = 1 → `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let ch = |shift: u32| {
        let ca = ((a >> shift) & 0xFF) as f32;
        let cb = ((b >> shift) & 0xFF) as f32;
        ((ca * (1.0 - t) + cb * t) as u32) << shift
    };
    0xFF000000 | ch(16) | ch(8) | ch(0)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_projects_to_center() {
        assert_eq!(project([0.0, 0.0, 0.0], 800, 600), Some((400, 300)));
    }

    #[test]
    fn up_is_up_on_screen() {
        let (_, y) = project([0.0, 1.0, 0.0], 800, 600).unwrap();
        assert!(y < 300);
    }

    #[test]
    fn behind_camera_or_offscreen_is_culled() {
        assert_eq!(project([0.0, 0.0, 6.0], 800, 600), None);
        assert_eq!(project([100.0, 0.0, 0.0], 800, 600), None);
    }

    #[test]
    fn tint_matches_mode_palette_on_integers() {
        assert_eq!(mode_tint(0.0), MODE_TINT[0]);
        assert_eq!(mode_tint(2.0), MODE_TINT[2]);
    }

    #[test]
    fn additive_blend_saturates() {
        assert_eq!(add_rgb(0xFF000000, [300.0, 10.0, 0.0]), 0xFFFF0A00);
        assert_eq!(add_rgb(0xFFF0F0F0, [100.0, 100.0, 100.0]), 0xFFFFFFFF);
    }

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 0.0), 0xFF000000);
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 1.0), 0xFFFFFFFF);
    }

    #[test]
    fn glyphs_are_distinct_where_it_matters() {
        assert_ne!(glyph('0'), glyph('8'));
        assert_eq!(glyph('a'), glyph('A'));
        assert_eq!(glyph('~'), 0x0080);
    }
}
