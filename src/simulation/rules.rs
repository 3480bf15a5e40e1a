use crate::core::{Action, EpisodeState, SimConfig, Termination};

/// Bonus granted on the tick that ends the episode, rewarding close approaches.
pub fn terminal_bonus(min_distance: f64) -> f64 {
    200.0 / (1.0 + 100.0 * min_distance) - 2.0
}

/// Per-tick fuel and steering penalty; both costs are non-positive.
pub fn control_cost(config: &SimConfig, action: Action) -> f64 {
    action.thrust.abs() * config.fuel_cost + action.turn.abs() * config.turn_cost
}

pub fn reward(config: &SimConfig, action: Action, done: bool, min_distance: f64) -> f64 {
    let mut reward = control_cost(config, action);

    if done {
        reward += terminal_bonus(min_distance);
    }

    reward
}

/// First satisfied termination condition, checked as bounds, clock, planet.
pub fn check_termination(config: &SimConfig, state: &EpisodeState) -> Option<Termination> {
    if !state.in_frame() {
        return Some(Termination::OutOfBounds);
    }

    if state.time_step > config.max_steps {
        return Some(Termination::Timeout);
    }

    match config.collision_radius {
        Some(radius) if state.distance_to_planet() < radius => Some(Termination::Collision),
        _ => None,
    }
}
