use rand::Rng;
use rapier2d::na::Vector2;
use serde::{Deserialize, Serialize};

use crate::core::SimConfig;

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
pub enum Termination {
    OutOfBounds,
    Timeout,
    Collision,
}

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Default)]
pub enum EpisodePhase {
    #[default]
    Running,
    Terminated(Termination),
}

impl EpisodePhase {
    pub fn is_terminated(&self) -> bool {
        matches!(self, EpisodePhase::Terminated(_))
    }
}

/// Agent command for a single tick.
#[derive(PartialEq, Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Action {
    /// Forward thrust, nominally in `[0, 1]`.
    pub thrust: f64,
    /// Heading change, nominally in `[-1, 1]`.
    pub turn: f64,
}

impl Action {
    pub fn new(thrust: f64, turn: f64) -> Self {
        Action { thrust, turn }
    }

    pub fn idle() -> Self {
        Action::default()
    }
}

impl From<(f64, f64)> for Action {
    fn from((thrust, turn): (f64, f64)) -> Self {
        Action { thrust, turn }
    }
}

#[derive(PartialEq, Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Observation {
    pub rocket_x: f64,
    pub rocket_y: f64,
    pub rocket_vel_x: f64,
    pub rocket_vel_y: f64,
    pub planet_x: f64,
    pub planet_y: f64,
    pub planet_m: f64,
    pub target_x: f64,
    pub target_y: f64,
}

impl Observation {
    pub const SIZE: usize = 9;

    pub fn to_array(&self) -> [f64; Observation::SIZE] {
        [
            self.rocket_x,
            self.rocket_y,
            self.rocket_vel_x,
            self.rocket_vel_y,
            self.planet_x,
            self.planet_y,
            self.planet_m,
            self.target_x,
            self.target_y,
        ]
    }
}

/// What an external renderer needs to draw one frame.
#[derive(PartialEq, Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RenderState {
    pub rocket_x: f64,
    pub rocket_y: f64,
    pub rocket_angle: f64,
    pub planet_x: f64,
    pub planet_y: f64,
    pub target_x: f64,
    pub target_y: f64,
}

/// Everything that changes within one episode. Positions are in the
/// normalized `[0, 1] x [0, 1]` frame with the origin in the top-left corner.
#[derive(PartialEq, Clone, Debug)]
pub struct EpisodeState {
    pub rocket_position: Vector2<f64>,
    pub rocket_velocity: Vector2<f64>,
    pub rocket_angle: f64,
    pub planet_position: Vector2<f64>,
    pub planet_mass: f64,
    pub target_position: Vector2<f64>,
    pub min_distance: f64,
    pub time_step: u32,
}

impl EpisodeState {
    /// Lays out a fresh scene; `min_distance` starts at the true rocket-target gap.
    pub fn new(
        rocket_position: Vector2<f64>,
        rocket_velocity: Vector2<f64>,
        rocket_angle: f64,
        planet_position: Vector2<f64>,
        planet_mass: f64,
        target_position: Vector2<f64>,
    ) -> Self {
        let mut state = EpisodeState {
            rocket_position,
            rocket_velocity,
            rocket_angle,
            planet_position,
            planet_mass,
            target_position,
            min_distance: 0.0,
            time_step: 0,
        };
        state.min_distance = state.distance_to_target();
        state
    }

    pub fn sample(config: &SimConfig, rng: &mut impl Rng) -> Self {
        let target_position = Vector2::new(
            config.target_spawn_x().sample(rng),
            rng.gen_range(0.0..=1.0),
        );
        let planet_position =
            Vector2::new(config.planet_x.sample(rng), config.planet_y.sample(rng));
        let planet_mass = config.planet_mass.sample(rng);

        let rocket_position = Vector2::new(
            config.rocket_spawn_x().sample(rng),
            config.rocket_spawn_y.sample(rng),
        );
        let speed = rng.gen_range(0.0..=config.max_init_speed);
        let rocket_angle = rng.gen_range(-config.max_init_angle..=config.max_init_angle);
        let rocket_velocity = Vector2::new(rocket_angle.cos(), rocket_angle.sin()) * speed;

        EpisodeState::new(
            rocket_position,
            rocket_velocity,
            rocket_angle,
            planet_position,
            planet_mass,
            target_position,
        )
    }

    pub fn distance_to_target(&self) -> f64 {
        (self.target_position - self.rocket_position).norm()
    }

    pub fn distance_to_planet(&self) -> f64 {
        (self.planet_position - self.rocket_position).norm()
    }

    pub fn in_frame(&self) -> bool {
        let position = self.rocket_position;
        (0.0..=1.0).contains(&position.x) && (0.0..=1.0).contains(&position.y)
    }

    /// Folds the current rocket-target gap into `min_distance`.
    pub fn record_distance(&mut self) -> f64 {
        let distance = self.distance_to_target();
        if distance < self.min_distance {
            self.min_distance = distance;
        }
        distance
    }

    pub fn observation(&self) -> Observation {
        Observation {
            rocket_x: self.rocket_position.x,
            rocket_y: self.rocket_position.y,
            rocket_vel_x: self.rocket_velocity.x,
            rocket_vel_y: self.rocket_velocity.y,
            planet_x: self.planet_position.x,
            planet_y: self.planet_position.y,
            planet_m: self.planet_mass,
            target_x: self.target_position.x,
            target_y: self.target_position.y,
        }
    }

    pub fn render_state(&self) -> RenderState {
        RenderState {
            rocket_x: self.rocket_position.x,
            rocket_y: self.rocket_position.y,
            rocket_angle: self.rocket_angle,
            planet_x: self.planet_position.x,
            planet_y: self.planet_position.y,
            target_x: self.target_position.x,
            target_y: self.target_position.y,
        }
    }
}
