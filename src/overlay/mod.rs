// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Celebration overlay sequencing.
//!
//! This module provides state for the celebratory overlay: a strictly
//! time-ordered sequence of greeting messages fading in and out one at a
//! time, followed by a final title card and a short volley of confetti
//! bursts, with an ambient loop of balloons floating up the screen the whole
//! time.
//!
//! The sequencer holds no timers of its own. It is advanced exclusively by
//! the shared UI tick through [`CelebrationOverlay::advance`], and closing
//! simply drops all animation state, so nothing can fire after close.
//!
//! All positions are screen fractions in `[0, 1]`, with `y = 0` at the top;
//! the renderer scales them to the terminal area.

use rand::{Rng, RngExt};

pub(crate) const MESSAGES: [&str; 10] = [
    "Wishing you a year that feels warm and unhurried.",
    "Someone here is always ready to listen, whenever you need it.",
    "Keep that smile, and keep believing in yourself.",
    "When things get heavy, lean on your people. You never walk alone.",
    "Every one of your dreams will find its way, in its own time.",
    "Thank you for being a wonderful friend. Be proud of yourself.",
    "Slow down today and enjoy every minute that belongs to you.",
    "Whatever happens, there is a steady place for you right here.",
    "Stay strong, stay gentle, stay loved.",
    "Here's to a bright new year. You deserve the very best of it.",
];

const FADE_IN_SECS: f64 = 0.8;
const HOLD_SECS: f64 = 4.2;
const FADE_OUT_SECS: f64 = 0.6;
const FINALE_IN_SECS: f64 = 0.9;

const BURST_COUNT: usize = 4;
const BURST_INTERVAL_SECS: f64 = 0.32;
const BURST_PARTICLES: usize = 110;
const BURST_SPREAD_DEGREES: f64 = 80.0;

const BALLOON_COUNT: usize = 14;
const BALLOON_SPRITES: usize = 3;

// Downward pull on confetti, in screen fractions per second squared.
const GRAVITY: f64 = 0.35;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
    MessageIn(usize),
    MessageHold(usize),
    MessageOut(usize),
    FinaleIn,
    Finale,
}

/// How strongly a fading element should be drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Intensity {
    Faint,
    Rising,
    Bright,
}

/// An ambient balloon sprite drifting up the screen.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Balloon {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) sprite: usize,
    speed: f64,
    drift: f64,
}

/// A single confetti particle.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Particle {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) hue: usize,
    vx: f64,
    vy: f64,
    age: f64,
    ttl: f64,
}

/// State for the celebration overlay.
pub(crate) struct CelebrationOverlay {
    pub(crate) visible: bool,
    phase: Phase,
    elapsed: f64,
    bursts_fired: usize,
    burst_clock: f64,
    balloons: Vec<Balloon>,
    particles: Vec<Particle>,
}

impl CelebrationOverlay {
    pub(crate) fn new() -> Self {
        Self {
            visible: false,
            phase: Phase::MessageIn(0),
            elapsed: 0.0,
            bursts_fired: 0,
            burst_clock: 0.0,
            balloons: Vec::new(),
            particles: Vec::new(),
        }
    }

    /// Starts the sequence from the first message.
    pub(crate) fn open(&mut self, rng: &mut impl Rng) {
        self.visible = true;
        self.phase = Phase::MessageIn(0);
        self.elapsed = 0.0;
        self.bursts_fired = 0;
        self.burst_clock = 0.0;
        self.particles.clear();

        self.balloons = (0..BALLOON_COUNT)
            .map(|i| Balloon {
                x: rng.random_range(0.06..0.94),
                y: rng.random_range(0.5..1.1),
                sprite: i % BALLOON_SPRITES,
                speed: 1.0 / rng.random_range(8.0..14.0),
                drift: rng.random_range(-0.015..0.015),
            })
            .collect();
    }

    /// Ends the sequence and drops every in-flight effect.
    pub(crate) fn close(&mut self) {
        self.visible = false;
        self.balloons.clear();
        self.particles.clear();
    }

    pub(crate) fn toggle(&mut self, rng: &mut impl Rng) {
        if self.visible {
            self.close();
        } else {
            self.open(rng);
        }
    }

    /// Steps the sequence by `dt` seconds. Does nothing while closed.
    pub(crate) fn advance(&mut self, dt: f64, rng: &mut impl Rng) {
        if !self.visible {
            return;
        }

        self.elapsed += dt;
        self.step_phase();
        self.step_balloons(dt, rng);
        self.step_particles(dt, rng);
    }

    fn step_phase(&mut self) {
        loop {
            let limit = match self.phase {
                Phase::MessageIn(_) => FADE_IN_SECS,
                Phase::MessageHold(_) => HOLD_SECS,
                Phase::MessageOut(_) => FADE_OUT_SECS,
                Phase::FinaleIn => FINALE_IN_SECS,
                Phase::Finale => return,
            };

            if self.elapsed < limit {
                return;
            }

            self.elapsed -= limit;
            self.phase = match self.phase {
                Phase::MessageIn(i) => Phase::MessageHold(i),
                Phase::MessageHold(i) => Phase::MessageOut(i),
                Phase::MessageOut(i) if i + 1 < MESSAGES.len() => Phase::MessageIn(i + 1),
                Phase::MessageOut(_) => Phase::FinaleIn,
                Phase::FinaleIn => Phase::Finale,
                Phase::Finale => Phase::Finale,
            };
        }
    }

    fn step_balloons(&mut self, dt: f64, rng: &mut impl Rng) {
        for balloon in &mut self.balloons {
            balloon.y -= balloon.speed * dt;
            balloon.x = (balloon.x + balloon.drift * dt).clamp(0.0, 1.0);

            // Respawn below the viewport at a fresh horizontal offset once
            // the balloon has floated past the top.
            if balloon.y < -0.08 {
                balloon.y = 1.05;
                balloon.x = rng.random_range(0.06..0.94);
                balloon.speed = 1.0 / rng.random_range(8.0..14.0);
                balloon.drift = rng.random_range(-0.015..0.015);
            }
        }
    }

    fn step_particles(&mut self, dt: f64, rng: &mut impl Rng) {
        if self.phase == Phase::Finale && self.bursts_fired < BURST_COUNT {
            self.burst_clock += dt;
            while self.bursts_fired < BURST_COUNT
                && self.burst_clock >= self.bursts_fired as f64 * BURST_INTERVAL_SECS
            {
                self.fire_burst(rng);
                self.bursts_fired += 1;
            }
        }

        for particle in &mut self.particles {
            particle.age += dt;
            particle.vy += GRAVITY * dt;
            particle.x += particle.vx * dt;
            particle.y += particle.vy * dt;
        }
        self.particles.retain(|p| p.age < p.ttl && p.y < 1.1);
    }

    fn fire_burst(&mut self, rng: &mut impl Rng) {
        let origin_x = rng.random_range(0.2..0.8);
        let origin_y = 0.9;

        for _ in 0..BURST_PARTICLES {
            let offset = rng.random_range(-BURST_SPREAD_DEGREES / 2.0..BURST_SPREAD_DEGREES / 2.0)
                .to_radians();
            let speed = rng.random_range(0.25..0.7);

            self.particles.push(Particle {
                x: origin_x,
                y: origin_y,
                hue: rng.random_range(0..6),
                vx: speed * offset.sin(),
                vy: -speed * offset.cos(),
                age: 0.0,
                ttl: rng.random_range(1.2..2.0),
            });
        }
    }

    /// The greeting currently on screen, with its fade intensity.
    pub(crate) fn message(&self) -> Option<(&'static str, Intensity)> {
        match self.phase {
            Phase::MessageIn(i) => {
                let intensity = if self.elapsed < FADE_IN_SECS / 2.0 {
                    Intensity::Faint
                } else {
                    Intensity::Rising
                };
                Some((MESSAGES[i], intensity))
            }
            Phase::MessageHold(i) => Some((MESSAGES[i], Intensity::Bright)),
            Phase::MessageOut(i) => Some((MESSAGES[i], Intensity::Faint)),
            _ => None,
        }
    }

    /// Whether the final title card is on screen, and how strongly.
    pub(crate) fn finale(&self) -> Option<Intensity> {
        match self.phase {
            Phase::FinaleIn => Some(if self.elapsed < FINALE_IN_SECS / 2.0 {
                Intensity::Faint
            } else {
                Intensity::Rising
            }),
            Phase::Finale => Some(Intensity::Bright),
            _ => None,
        }
    }

    pub(crate) fn balloons(&self) -> &[Balloon] {
        &self.balloons
    }

    pub(crate) fn particles(&self) -> &[Particle] {
        &self.particles
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn run(overlay: &mut CelebrationOverlay, seconds: f64, rng: &mut StdRng) {
        let mut remaining = seconds;
        while remaining > 0.0 {
            overlay.advance(0.25, rng);
            remaining -= 0.25;
        }
    }

    #[test]
    fn opens_on_the_first_message() {
        let mut rng = rng();
        let mut overlay = CelebrationOverlay::new();
        overlay.open(&mut rng);

        assert!(overlay.visible);
        assert_eq!(overlay.message().map(|(m, _)| m), Some(MESSAGES[0]));
        assert_eq!(overlay.balloons().len(), BALLOON_COUNT);
        assert!(overlay.finale().is_none());
    }

    #[test]
    fn messages_play_in_order_then_the_finale() {
        let mut rng = rng();
        let mut overlay = CelebrationOverlay::new();
        overlay.open(&mut rng);

        let per_message = FADE_IN_SECS + HOLD_SECS + FADE_OUT_SECS;

        // Half way through the second message's hold.
        run(&mut overlay, per_message + FADE_IN_SECS + HOLD_SECS / 2.0, &mut rng);
        assert_eq!(
            overlay.message(),
            Some((MESSAGES[1], Intensity::Bright))
        );

        // Past the end of the last message.
        let mut overlay = CelebrationOverlay::new();
        let mut rng2 = StdRng::seed_from_u64(1);
        overlay.open(&mut rng2);
        run(
            &mut overlay,
            per_message * MESSAGES.len() as f64 + FINALE_IN_SECS + 1.0,
            &mut rng2,
        );
        assert!(overlay.message().is_none());
        assert_eq!(overlay.finale(), Some(Intensity::Bright));
    }

    #[test]
    fn finale_fires_a_fixed_volley_of_bursts() {
        let mut rng = rng();
        let mut overlay = CelebrationOverlay::new();
        overlay.open(&mut rng);
        overlay.phase = Phase::Finale;
        overlay.elapsed = 0.0;

        run(&mut overlay, 2.0, &mut rng);
        assert_eq!(overlay.bursts_fired, BURST_COUNT);
        assert!(!overlay.particles().is_empty());

        // Particles decay; no fifth burst ever arrives.
        run(&mut overlay, 15.0, &mut rng);
        assert_eq!(overlay.bursts_fired, BURST_COUNT);
        assert!(overlay.particles().is_empty());
    }

    #[test]
    fn balloons_stay_in_bounds_and_respawn() {
        let mut rng = rng();
        let mut overlay = CelebrationOverlay::new();
        overlay.open(&mut rng);

        run(&mut overlay, 60.0, &mut rng);

        assert_eq!(overlay.balloons().len(), BALLOON_COUNT);
        for balloon in overlay.balloons() {
            assert!((0.0..=1.0).contains(&balloon.x), "x = {}", balloon.x);
            assert!(balloon.y >= -0.08 && balloon.y <= 1.1, "y = {}", balloon.y);
        }
    }

    #[test]
    fn close_cancels_everything() {
        let mut rng = rng();
        let mut overlay = CelebrationOverlay::new();
        overlay.open(&mut rng);
        overlay.phase = Phase::Finale;
        run(&mut overlay, 2.0, &mut rng);
        assert!(!overlay.particles().is_empty());

        overlay.close();
        assert!(!overlay.visible);
        assert!(overlay.particles().is_empty());
        assert!(overlay.balloons().is_empty());

        // Advancing a closed overlay is inert.
        run(&mut overlay, 5.0, &mut rng);
        assert!(overlay.particles().is_empty());
    }

    #[test]
    fn reopening_restarts_the_sequence() {
        let mut rng = rng();
        let mut overlay = CelebrationOverlay::new();
        overlay.open(&mut rng);
        run(&mut overlay, 30.0, &mut rng);

        overlay.close();
        overlay.open(&mut rng);
        assert_eq!(overlay.message().map(|(m, _)| m), Some(MESSAGES[0]));
        assert_eq!(overlay.bursts_fired, 0);
    }
}
