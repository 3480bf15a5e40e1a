use crate::core::{Action, Observation, RenderState, SimError, Termination};

/// Diagnostics reported alongside each transition.
#[derive(PartialEq, Clone, Copy, Debug, Default)]
pub struct StepInfo {
    pub termination: Option<Termination>,
    pub time_step: u32,
    pub distance_to_target: f64,
    pub min_distance: f64,
    /// Combined gravity and thrust acceleration applied this tick, km/s^2.
    pub acceleration_x: f64,
    pub acceleration_y: f64,
}

#[derive(PartialEq, Clone, Copy, Debug)]
pub struct StepOutcome {
    pub observation: Observation,
    pub reward: f64,
    pub done: bool,
    pub info: StepInfo,
}

pub trait Environment {
    fn reset(&mut self) -> Observation;
    fn step(&mut self, action: Action) -> Result<StepOutcome, SimError>;
    fn get_observation(&self) -> Observation;
    fn render_state(&self) -> RenderState;
}
