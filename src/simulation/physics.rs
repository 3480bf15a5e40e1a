use log::warn;
use rapier2d::na::Vector2;

use crate::core::{Action, EpisodeState, SimConfig};

/// Single explicit Euler tick for a rocket under thrust and one point mass.
///
/// Stored positions stay in normalized frame units; the integration itself
/// runs in km and km/s through `distance_factor` and `speed_factor`.
pub struct RocketPhysics {
    // Integration parameters
    step_duration: f64,   // s
    speed_factor: f64,    // km/s
    distance_factor: f64, // km

    // Gravity
    gravity: bool,
    gravity_constant: f64,       // km^3 / (kg s^2)
    min_gravity_separation: f64, // normalized

    // Engine
    rocket_acceleration: f64,   // km/s^2
    rocket_rotation_angle: f64, // rad
}

impl RocketPhysics {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            step_duration: config.step_duration,
            speed_factor: config.speed_factor,
            distance_factor: config.distance_factor,
            gravity: config.gravity,
            gravity_constant: config.gravity_constant,
            min_gravity_separation: config.min_gravity_separation,
            rocket_acceleration: config.rocket_acceleration,
            rocket_rotation_angle: config.rocket_rotation_angle,
        }
    }

    /// Inverse-square pull toward the planet in km/s^2.
    pub fn gravity_acceleration(
        &self,
        rocket: Vector2<f64>,
        planet: Vector2<f64>,
        planet_mass: f64,
    ) -> Vector2<f64> {
        if !self.gravity {
            return Vector2::zeros();
        }

        let separation = planet - rocket;
        let mut distance = separation.norm();
        let direction = if distance > 0.0 {
            separation / distance
        } else {
            Vector2::zeros()
        };

        if distance < self.min_gravity_separation {
            warn!(
                "rocket within {:.2e} of the planet, clamping gravity separation",
                distance
            );
            distance = self.min_gravity_separation;
        }

        let r_km = distance * self.distance_factor;
        direction * (self.gravity_constant * planet_mass / (r_km * r_km))
    }

    pub fn turned_heading(&self, heading: f64, turn: f64) -> f64 {
        heading + self.rocket_rotation_angle * turn
    }

    /// Engine acceleration in km/s^2, pointing halfway through this tick's rotation.
    pub fn thrust_acceleration(&self, heading: f64, action: Action) -> Vector2<f64> {
        let final_heading = self.turned_heading(heading, action.turn);
        let mid_heading = (heading + final_heading) / 2.0;

        Vector2::new(mid_heading.cos(), mid_heading.sin()) * (self.rocket_acceleration * action.thrust)
    }

    /// Advances the rocket one tick and returns the applied acceleration.
    pub fn update(&self, state: &mut EpisodeState, action: Action) -> Vector2<f64> {
        let dt = self.step_duration;

        let acceleration = self.gravity_acceleration(
            state.rocket_position,
            state.planet_position,
            state.planet_mass,
        ) + self.thrust_acceleration(state.rocket_angle, action);

        let position_km = state.rocket_position * self.distance_factor
            + state.rocket_velocity * self.speed_factor * dt
            + acceleration * (0.5 * dt * dt);

        state.rocket_position = position_km / self.distance_factor;
        state.rocket_velocity += acceleration * dt / self.speed_factor;
        state.rocket_angle = self.turned_heading(state.rocket_angle, action.turn);

        acceleration
    }
}
