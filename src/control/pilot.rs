use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::control::pid::{HeadingPid, wrap_angle};
use crate::core::{Action, Observation};

pub trait Pilot {
    /// Chooses the next action from the observation and current heading.
    fn act(&mut self, observation: &Observation, heading: f64) -> Action;
    fn reset(&mut self);
}

/// Points the nose at the target and burns once roughly aligned.
pub struct TargetSeeker {
    pid: HeadingPid,
    alignment_tolerance: f64, // rad
}

impl Default for TargetSeeker {
    fn default() -> Self {
        TargetSeeker::new(HeadingPid::new(1.5, 0.0, 0.3), 0.3)
    }
}

impl TargetSeeker {
    pub fn new(pid: HeadingPid, alignment_tolerance: f64) -> Self {
        Self {
            pid: pid.with_output_limit(1.0),
            alignment_tolerance,
        }
    }

    pub fn bearing(observation: &Observation) -> f64 {
        (observation.target_y - observation.rocket_y).atan2(observation.target_x - observation.rocket_x)
    }
}

impl Pilot for TargetSeeker {
    fn act(&mut self, observation: &Observation, heading: f64) -> Action {
        let bearing = TargetSeeker::bearing(observation);
        let turn = self.pid.update(bearing, heading);

        let misalignment = wrap_angle(bearing - heading).abs();
        let thrust = if misalignment <= self.alignment_tolerance {
            1.0
        } else {
            0.0
        };

        Action::new(thrust, turn)
    }

    fn reset(&mut self) {
        self.pid.reset();
    }
}

pub struct RandomPilot {
    rng: ChaCha8Rng,
}

impl RandomPilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Pilot for RandomPilot {
    fn act(&mut self, _observation: &Observation, _heading: f64) -> Action {
        Action::new(self.rng.gen_range(0.0..=1.0), self.rng.gen_range(-1.0..=1.0))
    }

    fn reset(&mut self) {}
}

#[derive(Default)]
pub struct IdlePilot;

impl Pilot for IdlePilot {
    fn act(&mut self, _observation: &Observation, _heading: f64) -> Action {
        Action::idle()
    }

    fn reset(&mut self) {}
}
