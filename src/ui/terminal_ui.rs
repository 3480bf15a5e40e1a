use crate::core::{Action, EpisodePhase, Environment, StepOutcome, Termination};
use crate::simulation::SlingshotEnv;

pub struct DisplayData {
    pub time_step: u32,
    pub phase: String,

    pub rocket_x: f64,
    pub rocket_y: f64,
    pub heading_deg: f64,
    pub speed: f64,

    pub thrust: f64,
    pub turn: f64,
    pub acceleration: f64, // km/s^2

    pub distance_to_target: f64,
    pub min_distance: f64,
    pub distance_to_planet: f64,
    pub reward: f64,
}

pub fn format_termination(termination: Termination) -> String {
    match termination {
        Termination::OutOfBounds => "OUT OF BOUNDS".to_string(),
        Termination::Timeout => "TIMEOUT".to_string(),
        Termination::Collision => "COLLISION".to_string(),
    }
}

pub fn format_phase(phase: &EpisodePhase) -> String {
    match phase {
        EpisodePhase::Running => "RUNNING".to_string(),
        EpisodePhase::Terminated(reason) => format!("TERMINATED ({})", format_termination(*reason)),
    }
}

pub fn display_data(env: &SlingshotEnv, action: Action, outcome: &StepOutcome) -> DisplayData {
    let render = env.render_state();
    let obs = outcome.observation;

    DisplayData {
        time_step: outcome.info.time_step,
        phase: format_phase(&env.phase()),
        rocket_x: render.rocket_x,
        rocket_y: render.rocket_y,
        heading_deg: render.rocket_angle.to_degrees(),
        speed: obs.rocket_vel_x.hypot(obs.rocket_vel_y),
        thrust: action.thrust,
        turn: action.turn,
        acceleration: outcome.info.acceleration_x.hypot(outcome.info.acceleration_y),
        distance_to_target: outcome.info.distance_to_target,
        min_distance: outcome.info.min_distance,
        distance_to_planet: env.state().distance_to_planet(),
        reward: outcome.reward,
    }
}

pub fn log_to_terminal(env: &SlingshotEnv, action: Action, outcome: &StepOutcome) {
    let display_data = display_data(env, action, outcome);

    print!("\x1B[2J\x1B[1;1H");

    println!("--- Episode ---");
    println!("Step: {}", display_data.time_step);
    println!("Phase: {}", display_data.phase);

    println!("\n--- Rocket ---");
    println!(
        "Position: ({:.4}, {:.4})",
        display_data.rocket_x, display_data.rocket_y
    );
    println!("Heading: {:.1}deg", display_data.heading_deg);
    println!("Speed: {:.5}", display_data.speed);

    println!("\n--- Pilot ---");
    println!("Thrust: {:.2}", display_data.thrust);
    println!("Turn: {:.2}", display_data.turn);
    println!("Acceleration: {:.3e}km/s^2", display_data.acceleration);

    println!("\n--- Scoring ---");
    println!("Target Distance: {:.4}", display_data.distance_to_target);
    println!("Min Distance: {:.4}", display_data.min_distance);
    println!("Planet Distance: {:.4}", display_data.distance_to_planet);
    println!("Reward: {:.3}", display_data.reward);
    println!("----------------------\n");
}

pub fn print_episode_summary(episode: usize, env: &SlingshotEnv, total_reward: f64) {
    println!(
        "episode {:>3}: {:<28} steps {:>4}  min distance {:.4}  return {:>8.3}",
        episode,
        format_phase(&env.phase()),
        env.time_step(),
        env.min_distance(),
        total_reward
    );
}
