//! CPU particle field driven by a [`ControlState`].
//!
//! Each particle has a fixed random seed that places its rest position in
//! a loose cloud and phases its turbulence. Per tick the field blends three
//! force fields, one per mode, using weights derived from the continuous
//! `mode_current`, so a pinch cross-fades between behaviours instead of
//! snapping.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use particle_control::{ControlState, MODE_COUNT};

/// Radius of the rest cloud.
const CLOUD_RADIUS: f32 = 3.0;
/// Orbit radius around the attractor.
const ORBIT_RADIUS: f32 = 1.2;
/// Shell radius a bloom pushes out to.
const BLOOM_RADIUS: f32 = 2.5;
const DAMPING:      f32 = 1.5;
/// Particles further than this from the origin respawn at rest.
const ESCAPE:       f32 = 20.0;

// ════════════════════════════════════════════════════════════════════════════
// Particle
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct Particle {
    pub pos:  [f32; 3],
    pub vel:  [f32; 3],
    /// Uniform in `[-1, 1]³`; fixed for the particle's lifetime.
    pub seed: [f32; 3],
    /// Relative brightness, `[0.5, 1.5)`.
    pub size: f32,
}

impl Particle {
    pub fn home(&self) -> [f32; 3] {
        [
            self.seed[0] * CLOUD_RADIUS,
            self.seed[1] * CLOUD_RADIUS * 0.6,
            self.seed[2] * CLOUD_RADIUS * 0.5,
        ]
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Mode weights
// ════════════════════════════════════════════════════════════════════════════

/// Triangular weights around each mode index; they sum to 1 for any
/// `mode_current` in `[0, MODE_COUNT - 1]`.
pub fn mode_weights(mode_current: f32) -> [f32; MODE_COUNT] {
    let m = mode_current.clamp(0.0, (MODE_COUNT - 1) as f32);
    let mut w = [0.0; MODE_COUNT];
    for (i, wi) in w.iter_mut().enumerate() {
        *wi = (1.0 - (m - i as f32).abs()).max(0.0);
    }
    w
}

// ════════════════════════════════════════════════════════════════════════════
// ParticleField
// ════════════════════════════════════════════════════════════════════════════

pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new(count: usize, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let particles = (0..count)
            .map(|_| {
                let seed = [
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                ];
                let mut p = Particle { pos: [0.0; 3], vel: [0.0; 3], seed, size: rng.gen_range(0.5..1.5) };
                p.pos = p.home();
                p
            })
            .collect();
        ParticleField { particles }
    }

    pub fn len(&self) -> usize { self.particles.len() }

    pub fn is_empty(&self) -> bool { self.particles.is_empty() }

    pub fn particles(&self) -> &[Particle] { &self.particles }

    /// Integrate one tick.
    pub fn step(&mut self, control: &ControlState, dt: f32) {
        if !(dt > 0.0) { return; }

        let w        = mode_weights(control.mode_current);
        let strength = control.attractor_strength;
        let turb     = control.turbulence;
        let t        = control.time;
        let a        = control.attractor;
        let damp     = (-DAMPING * dt).exp();

        for p in &mut self.particles {
            let d = [a[0] - p.pos[0], a[1] - p.pos[1], a[2] - p.pos[2]];
            let r = (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt().max(1e-3);
            let n = [d[0] / r, d[1] / r, d[2] / r];
            // tangent in the xy plane, counter-clockwise around the attractor
            let tan = [-n[1], n[0], 0.0];

            let orbital = [
                n[0] * (r - ORBIT_RADIUS) * 2.0 + tan[0] * 1.5,
                n[1] * (r - ORBIT_RADIUS) * 2.0 + tan[1] * 1.5,
                n[2] * (r - ORBIT_RADIUS) * 2.0,
            ];
            let vortex = [
                n[0] * 1.2 + tan[0] * 3.0,
                n[1] * 1.2 + tan[1] * 3.0,
                (t * 2.0 + p.seed[2] * 6.0).sin() * 1.5 - p.pos[2],
            ];
            let bloom = [
                n[0] * (r - BLOOM_RADIUS) * 1.5,
                n[1] * (r - BLOOM_RADIUS) * 1.5,
                n[2] * (r - BLOOM_RADIUS) * 1.5,
            ];

            let home = p.home();
            let mut acc = [0.0f32; 3];
            for k in 0..3 {
                let field = w[0] * orbital[k] + w[1] * vortex[k] + w[2] * bloom[k];
                acc[k] = strength * field + (1.0 - strength) * (home[k] - p.pos[k]) * 0.8;
            }

            let phase = [p.seed[0] * 10.0, p.seed[1] * 10.0, p.seed[2] * 10.0];
            acc[0] += (t * 1.3 + phase[0]).sin() * turb * 3.0;
            acc[1] += (t * 1.7 + phase[1]).cos() * turb * 3.0;
            acc[2] += (t * 1.1 + phase[2]).sin() * turb * 3.0;

            for k in 0..3 {
                p.vel[k] = (p.vel[k] + acc[k] * dt) * damp;
                p.pos[k] += p.vel[k] * dt;
            }

            let escaped = p.pos.iter().any(|c| !c.is_finite() || c.abs() > ESCAPE);
            if escaped {
                p.pos = home;
                p.vel = [0.0; 3];
            }
        }
    }

    /// Mean particle position; handy for tests and the HUD.
    pub fn centroid(&self) -> [f32; 3] {
        if self.particles.is_empty() {
            return [0.0; 3];
        }
        let mut c = [0.0f32; 3];
        for p in &self.particles {
            for k in 0..3 { c[k] += p.pos[k]; }
        }
        let n = self.particles.len() as f32;
        [c[0] / n, c[1] / n, c[2] / n]
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn control(attractor: [f32; 3], strength: f32, mode_current: f32) -> ControlState {
        ControlState {
            attractor,
            attractor_strength: strength,
            mode_current,
            ..Default::default()
        }
    }

    #[test]
    fn weights_are_one_hot_on_integers() {
        assert_eq!(mode_weights(0.0), [1.0, 0.0, 0.0]);
        assert_eq!(mode_weights(1.0), [0.0, 1.0, 0.0]);
        assert_eq!(mode_weights(2.0), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn weights_cross_fade_and_sum_to_one() {
        for i in 0..=20 {
            let m = i as f32 * 0.1;
            let w = mode_weights(m);
            assert!((w.iter().sum::<f32>() - 1.0).abs() < 1e-5, "m = {}", m);
        }
        assert_eq!(mode_weights(0.5), [0.5, 0.5, 0.0]);
    }

    #[test]
    fn seeded_field_is_deterministic() {
        let a = ParticleField::new(50, 7);
        let b = ParticleField::new(50, 7);
        assert_eq!(a.particles()[13].pos, b.particles()[13].pos);
        assert_eq!(a.len(), 50);
    }

    #[test]
    fn attractor_pulls_the_cloud() {
        let mut f = ParticleField::new(500, 1);
        let c = control([3.0, 0.0, 0.0], 1.0, 0.0);
        for _ in 0..300 { f.step(&c, DT); }
        assert!(f.centroid()[0] > 1.5, "centroid = {:?}", f.centroid());
    }

    #[test]
    fn stays_finite_under_every_mode_and_full_turbulence() {
        let mut f = ParticleField::new(300, 2);
        for mode in [0.0, 0.5, 1.0, 1.5, 2.0] {
            let mut c = control([-4.0, 2.0, 0.0], 1.0, mode);
            c.turbulence = 1.0;
            for i in 0..120 {
                c.time = i as f32 * DT;
                f.step(&c, DT);
            }
        }
        for p in f.particles() {
            assert!(p.pos.iter().all(|v| v.is_finite() && v.abs() <= ESCAPE));
        }
    }

    #[test]
    fn zero_dt_is_a_no_op() {
        let mut f = ParticleField::new(10, 3);
        let before: Vec<_> = f.particles().iter().map(|p| p.pos).collect();
        f.step(&control([1.0, 1.0, 0.0], 1.0, 0.0), 0.0);
        let after: Vec<_> = f.particles().iter().map(|p| p.pos).collect();
        assert_eq!(before, after);
    }
}
