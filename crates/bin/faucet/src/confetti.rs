//! celebration confetti
//!
//! three bursts: a wide one from the lower middle, then one from each side
//! edge. positions are in screen fractions, so the simulation runs without a
//! window and the painter only scales to the current rect.

use eframe::egui::{self, Color32};
use rand::Rng;
use std::time::Duration;

pub const COLORS: [Color32; 5] = [
    Color32::from_rgb(0x00, 0xd2, 0xff),
    Color32::from_rgb(0xff, 0x6b, 0x6b),
    Color32::from_rgb(0x4e, 0xcd, 0xc4),
    Color32::from_rgb(0x45, 0xb7, 0xd1),
    Color32::from_rgb(0x96, 0xce, 0xb4),
];

/// screen fractions per second squared
const GRAVITY: f32 = 1.2;
const DRAG: f32 = 0.9;
const LIFETIME: f32 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Burst {
    pub delay: Duration,
    pub count: usize,
    /// launch direction in degrees, 90 is straight up
    pub angle: f32,
    /// cone width in degrees
    pub spread: f32,
    pub origin: (f32, f32),
}

pub const BURSTS: [Burst; 3] = [
    Burst {
        delay: Duration::ZERO,
        count: 100,
        angle: 90.0,
        spread: 70.0,
        origin: (0.5, 0.6),
    },
    Burst {
        delay: Duration::from_millis(250),
        count: 50,
        angle: 60.0,
        spread: 55.0,
        origin: (0.0, 0.5),
    },
    Burst {
        delay: Duration::from_millis(400),
        count: 50,
        angle: 120.0,
        spread: 55.0,
        origin: (1.0, 0.5),
    },
];

#[derive(Clone, Debug)]
struct Particle {
    pos: egui::Vec2,
    vel: egui::Vec2,
    color: Color32,
    size: f32,
    age: f32,
}

#[derive(Default)]
pub struct Confetti {
    particles: Vec<Particle>,
    /// time since the celebration started, `None` when idle
    elapsed: Option<Duration>,
    fired: usize,
}

impl Confetti {
    pub fn new() -> Self {
        Self::default()
    }

    /// restart the celebration
    pub fn start(&mut self) {
        self.particles.clear();
        self.elapsed = Some(Duration::ZERO);
        self.fired = 0;
    }

    pub fn is_active(&self) -> bool {
        self.elapsed.is_some()
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// advance the simulation by `dt`
    pub fn step(&mut self, dt: Duration, rng: &mut impl Rng) {
        let Some(elapsed) = self.elapsed.as_mut() else {
            return;
        };
        *elapsed += dt;
        let now = *elapsed;

        while let Some(burst) = BURSTS.get(self.fired) {
            if burst.delay > now {
                break;
            }
            self.particles.extend((0..burst.count).map(|_| spawn(burst, rng)));
            self.fired += 1;
        }

        let dt = dt.as_secs_f32();
        for p in &mut self.particles {
            p.vel.y += GRAVITY * dt;
            p.vel *= 1.0 - (1.0 - DRAG) * dt;
            p.pos += p.vel * dt;
            p.age += dt;
        }
        self.particles.retain(|p| p.age < LIFETIME && p.pos.y < 1.1);

        if self.fired == BURSTS.len() && self.particles.is_empty() {
            self.elapsed = None;
        }
    }

    pub fn paint(&self, painter: &egui::Painter, rect: egui::Rect) {
        for p in &self.particles {
            let fade = (1.0 - p.age / LIFETIME).clamp(0.0, 1.0);
            let center = rect.min + egui::vec2(p.pos.x * rect.width(), p.pos.y * rect.height());
            painter.circle_filled(center, p.size, p.color.linear_multiply(fade));
        }
    }
}

fn spawn(burst: &Burst, rng: &mut impl Rng) -> Particle {
    let half = burst.spread / 2.0;
    let angle = (burst.angle + rng.gen_range(-half..=half)).to_radians();
    let speed = rng.gen_range(0.6..1.2);
    Particle {
        pos: egui::vec2(burst.origin.0, burst.origin.1),
        // screen y grows downwards
        vel: egui::vec2(angle.cos() * speed, -angle.sin() * speed),
        color: COLORS[rng.gen_range(0..COLORS.len())],
        size: rng.gen_range(2.5..5.0),
        age: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_bursts_fire_on_schedule() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut confetti = Confetti::new();
        confetti.start();

        confetti.step(Duration::from_millis(16), &mut rng);
        assert_eq!(confetti.particle_count(), 100);

        confetti.step(Duration::from_millis(250), &mut rng);
        assert_eq!(confetti.particle_count(), 150);

        confetti.step(Duration::from_millis(150), &mut rng);
        assert_eq!(confetti.particle_count(), 200);
    }

    #[test]
    fn test_settles_and_goes_idle() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut confetti = Confetti::new();
        assert!(!confetti.is_active());

        confetti.start();
        for _ in 0..400 {
            confetti.step(Duration::from_millis(16), &mut rng);
        }
        assert!(!confetti.is_active());
        assert_eq!(confetti.particle_count(), 0);
    }

    #[test]
    fn test_side_bursts_point_inwards() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            assert!(spawn(&BURSTS[1], &mut rng).vel.x > 0.0);
            assert!(spawn(&BURSTS[2], &mut rng).vel.x < 0.0);
        }
    }

    #[test]
    fn test_restart_clears() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut confetti = Confetti::new();
        confetti.start();
        confetti.step(Duration::from_millis(500), &mut rng);
        confetti.start();
        assert_eq!(confetti.particle_count(), 0);
        assert!(confetti.is_active());
    }
}
