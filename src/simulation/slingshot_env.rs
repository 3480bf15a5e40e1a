use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::{
    Action, Environment, EpisodePhase, EpisodeState, Observation, RenderState, SimConfig,
    SimError, StepInfo, StepOutcome,
};
use crate::simulation::physics::RocketPhysics;
use crate::simulation::rules;

/// Rocket, planet and target in one normalized frame; reach the target
/// without leaving the frame, running out of time or hitting the planet.
pub struct SlingshotEnv {
    config: SimConfig,
    physics: RocketPhysics,
    rng: ChaCha8Rng,
    seed: u64,
    state: EpisodeState,
    phase: EpisodePhase,
}

impl SlingshotEnv {
    /// Validates `config` and draws the first episode from `seed`.
    pub fn new(config: SimConfig, seed: u64) -> Result<Self, SimError> {
        config.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let state = EpisodeState::sample(&config, &mut rng);

        Ok(Self {
            physics: RocketPhysics::new(&config),
            config,
            rng,
            seed,
            state,
            phase: EpisodePhase::Running,
        })
    }

    /// Starts from a hand-built scene instead of a sampled one.
    pub fn with_state(config: SimConfig, state: EpisodeState, seed: u64) -> Result<Self, SimError> {
        let mut env = SlingshotEnv::new(config, seed)?;
        env.state = state;
        Ok(env)
    }

    /// Reseeds the generator and starts a new episode from it.
    pub fn reset_with_seed(&mut self, seed: u64) -> Observation {
        self.seed = seed;
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.reset()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn state(&self) -> &EpisodeState {
        &self.state
    }

    pub fn phase(&self) -> EpisodePhase {
        self.phase
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn time_step(&self) -> u32 {
        self.state.time_step
    }

    pub fn min_distance(&self) -> f64 {
        self.state.min_distance
    }

    pub fn is_done(&self) -> bool {
        self.phase.is_terminated()
    }
}

impl Environment for SlingshotEnv {
    fn reset(&mut self) -> Observation {
        self.state = EpisodeState::sample(&self.config, &mut self.rng);
        self.phase = EpisodePhase::Running;

        debug!(
            "new episode: rocket ({:.3}, {:.3}), planet ({:.3}, {:.3}) {:.2e} kg, target ({:.3}, {:.3})",
            self.state.rocket_position.x,
            self.state.rocket_position.y,
            self.state.planet_position.x,
            self.state.planet_position.y,
            self.state.planet_mass,
            self.state.target_position.x,
            self.state.target_position.y,
        );

        self.state.observation()
    }

    fn step(&mut self, action: Action) -> Result<StepOutcome, SimError> {
        if self.phase.is_terminated() {
            warn!("step called on a finished episode");
            return Err(SimError::EpisodeFinished {
                time_step: self.state.time_step,
            });
        }

        let acceleration = self.physics.update(&mut self.state, action);
        self.state.time_step = self.state.time_step.saturating_add(1);

        let termination = rules::check_termination(&self.config, &self.state);
        let done = termination.is_some();
        // the bonus is scored on the minimum reached before this tick's position
        let reward = rules::reward(&self.config, action, done, self.state.min_distance);
        let distance = self.state.record_distance();

        if let Some(reason) = termination {
            self.phase = EpisodePhase::Terminated(reason);
            info!(
                "episode over after {} steps: {:?}, min distance {:.4}, reward {:.2}",
                self.state.time_step, reason, self.state.min_distance, reward
            );
        }

        Ok(StepOutcome {
            observation: self.state.observation(),
            reward,
            done,
            info: StepInfo {
                termination,
                time_step: self.state.time_step,
                distance_to_target: distance,
                min_distance: self.state.min_distance,
                acceleration_x: acceleration.x,
                acceleration_y: acceleration.y,
            },
        })
    }

    fn get_observation(&self) -> Observation {
        self.state.observation()
    }

    fn render_state(&self) -> RenderState {
        self.state.render_state()
    }
}

#[cfg(test)]
mod env_tests {
    use super::*;
    use crate::core::{ConfigError, SpawnRange, Termination};
    use rand::Rng;
    use rapier2d::na::Vector2;

    /// Nothing but the clock can end an episode.
    fn clock_only() -> SimConfig {
        SimConfig {
            gravity: false,
            collision_radius: None,
            max_init_speed: 0.0,
            rocket_spawn_y: SpawnRange::new(0.5, 0.5),
            ..SimConfig::slingshot()
        }
    }

    /// Slingshot frame without gravity: one velocity unit moves one frame unit per tick.
    fn drifting(rocket: (f64, f64), velocity: (f64, f64), target: (f64, f64)) -> SlingshotEnv {
        let state = EpisodeState::new(
            Vector2::new(rocket.0, rocket.1),
            Vector2::new(velocity.0, velocity.1),
            0.0,
            Vector2::new(0.5, 0.9),
            1e24,
            Vector2::new(target.0, target.1),
        );
        let config = SimConfig {
            gravity: false,
            ..SimConfig::slingshot()
        };
        SlingshotEnv::with_state(config, state, 0).unwrap()
    }

    #[test]
    fn reset_matches_get_observation() {
        let mut env = SlingshotEnv::new(SimConfig::default(), 42).unwrap();

        for _ in 0..5 {
            let obs = env.reset();
            assert_eq!(obs, env.get_observation());
            assert_eq!(obs.to_array(), env.get_observation().to_array());
        }
    }

    #[test]
    fn same_seed_same_episode() {
        let mut a = SlingshotEnv::new(SimConfig::default(), 9).unwrap();
        let mut b = SlingshotEnv::new(SimConfig::default(), 9).unwrap();
        assert_eq!(a.get_observation(), b.get_observation());

        let action = Action::new(0.7, 0.2);
        for _ in 0..20 {
            let left = a.step(action);
            let right = b.step(action);
            match (left, right) {
                (Ok(left), Ok(right)) => assert_eq!(left, right),
                (Err(_), Err(_)) => break,
                _ => panic!("identical environments diverged"),
            }
        }
    }

    #[test]
    fn different_seeds_differ() {
        let a = SlingshotEnv::new(SimConfig::default(), 1).unwrap();
        let b = SlingshotEnv::new(SimConfig::default(), 2).unwrap();

        assert_ne!(a.get_observation(), b.get_observation());
    }

    #[test]
    fn reset_with_seed_replays_the_episode() {
        let mut env = SlingshotEnv::new(SimConfig::default(), 100).unwrap();
        let first = env.get_observation();

        env.reset();
        assert_ne!(env.get_observation(), first, "plain reset draws a fresh scene");

        assert_eq!(env.reset_with_seed(100), first);
        assert_eq!(env.seed(), 100);
    }

    #[test]
    fn time_step_counts_steps() {
        let mut env = SlingshotEnv::new(clock_only(), 3).unwrap();

        for n in 1..=50 {
            let outcome = env.step(Action::idle()).unwrap();
            assert_eq!(env.time_step(), n);
            assert_eq!(outcome.info.time_step, n);
            assert!(!outcome.done);
        }

        env.reset();
        assert_eq!(env.time_step(), 0);
    }

    #[test]
    fn idle_episode_times_out_after_max_steps() {
        let config = clock_only();
        let max_steps = config.max_steps;
        let mut env = SlingshotEnv::new(config, 4).unwrap();

        let mut calls = 0;
        let last = loop {
            let outcome = env.step(Action::idle()).unwrap();
            calls += 1;
            assert_eq!(outcome.reward == 0.0, !outcome.done, "idle steps cost nothing");
            if outcome.done {
                break outcome;
            }
            assert!(calls <= max_steps, "episode must end on the clock");
        };

        assert_eq!(calls, max_steps + 1);
        assert_eq!(last.info.termination, Some(Termination::Timeout));
        assert_eq!(env.phase(), EpisodePhase::Terminated(Termination::Timeout));
    }

    #[test]
    fn leaving_the_frame_ends_that_step() {
        let mut env = drifting((0.9, 0.5), (0.6, 0.0), (0.95, 0.2));

        let outcome = env.step(Action::idle()).unwrap();

        assert!((outcome.observation.rocket_x - 1.5).abs() < 1e-9);
        assert!(outcome.done);
        assert_eq!(outcome.info.termination, Some(Termination::OutOfBounds));
    }

    #[test]
    fn done_whenever_rocket_is_outside_frame() {
        let mut env = SlingshotEnv::new(SimConfig::free_flight(), 77).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(77);

        for _ in 0..20 {
            loop {
                let action = Action::new(rng.gen_range(0.0..=1.0), rng.gen_range(-1.0..=1.0));
                let outcome = env.step(action).unwrap();
                let obs = outcome.observation;
                let outside = !(0.0..=1.0).contains(&obs.rocket_x)
                    || !(0.0..=1.0).contains(&obs.rocket_y);
                if outside {
                    assert!(outcome.done, "rocket outside the frame must end the episode");
                }
                if outcome.done {
                    break;
                }
            }
            env.reset();
        }
    }

    #[test]
    fn min_distance_never_grows() {
        let mut env = SlingshotEnv::new(SimConfig::default(), 5).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        for _ in 0..10 {
            let mut previous = env.min_distance();
            loop {
                let action = Action::new(rng.gen_range(0.0..=1.0), rng.gen_range(-1.0..=1.0));
                let outcome = env.step(action).unwrap();
                assert!(outcome.info.min_distance <= previous);
                assert!(outcome.info.min_distance <= outcome.info.distance_to_target);
                previous = outcome.info.min_distance;
                if outcome.done {
                    break;
                }
            }
            env.reset();
        }
    }

    #[test]
    fn passing_over_target_earns_full_bonus() {
        let mut env = drifting((0.85, 0.5), (0.1, 0.0), (0.95, 0.5));

        let over_target = env.step(Action::idle()).unwrap();
        assert!(!over_target.done);
        assert_eq!(over_target.reward, 0.0);
        assert!(env.min_distance() < 1e-9);

        let exit = env.step(Action::idle()).unwrap();
        assert_eq!(exit.info.termination, Some(Termination::OutOfBounds));
        assert!((exit.reward - 198.0).abs() < 1e-6, "got {}", exit.reward);
    }

    #[test]
    fn final_position_is_scored_after_the_bonus() {
        let mut env = drifting((0.85, 0.5), (0.1, 0.0), (0.95, 0.5));
        env.state.time_step = env.config.max_steps;
        let before = env.min_distance();

        let outcome = env.step(Action::new(0.0, 1.0)).unwrap();

        assert_eq!(outcome.info.termination, Some(Termination::Timeout));
        let expected = -0.1 + rules::terminal_bonus(before);
        assert!((outcome.reward - expected).abs() < 1e-9, "got {}", outcome.reward);
        assert!(outcome.reward < 20.0, "landing on the target this tick earns no bonus");
        assert!(outcome.info.distance_to_target < 1e-9);
        assert!(env.min_distance() < 1e-9, "minimum still records the final position");
    }

    #[test]
    fn step_counter_saturates() {
        let config = SimConfig {
            max_steps: u32::MAX - 1,
            ..clock_only()
        };
        let mut env = SlingshotEnv::new(config, 6).unwrap();
        env.state.time_step = u32::MAX;

        let outcome = env.step(Action::idle()).unwrap();

        assert_eq!(outcome.info.time_step, u32::MAX);
        assert_eq!(outcome.info.termination, Some(Termination::Timeout));
    }

    #[test]
    fn hitting_the_planet_collides() {
        let state = EpisodeState::new(
            Vector2::new(0.4, 0.5),
            Vector2::new(0.06, 0.0),
            0.0,
            Vector2::new(0.5, 0.5),
            1e23,
            Vector2::new(0.95, 0.5),
        );
        let mut env = SlingshotEnv::with_state(SimConfig::slingshot(), state, 0).unwrap();

        let outcome = env.step(Action::idle()).unwrap();

        assert_eq!(outcome.info.termination, Some(Termination::Collision));
        assert!(outcome.info.acceleration_x > 0.0, "planet pulls the rocket in");
    }

    #[test]
    fn stepping_a_finished_episode_is_rejected() {
        let mut env = drifting((0.9, 0.5), (0.6, 0.0), (0.95, 0.2));
        env.step(Action::idle()).unwrap();
        let frozen = env.state().clone();

        let result = env.step(Action::new(1.0, 1.0));

        assert!(matches!(result, Err(SimError::EpisodeFinished { time_step: 1 })));
        assert_eq!(env.state(), &frozen, "rejected step leaves the state alone");

        env.reset();
        assert!(env.step(Action::idle()).is_ok());
    }

    #[test]
    fn invalid_config_is_refused() {
        let config = SimConfig {
            distance_factor: -1.0,
            ..SimConfig::default()
        };

        assert!(matches!(
            SlingshotEnv::new(config, 0),
            Err(SimError::Config(ConfigError::NonPositive { .. }))
        ));
    }

    #[test]
    fn render_state_tracks_heading() {
        let mut env = drifting((0.2, 0.5), (0.0, 0.0), (0.95, 0.5));

        env.step(Action::new(0.0, 1.0)).unwrap();
        let render = env.render_state();

        assert!((render.rocket_angle - env.config().rocket_rotation_angle).abs() < 1e-12);
        assert_eq!(render.rocket_x, env.get_observation().rocket_x);
    }

    #[test]
    fn instances_run_independently_on_threads() {
        let run = |seed: u64| {
            let mut env = SlingshotEnv::new(SimConfig::default(), seed).unwrap();
            let mut total = 0.0;
            loop {
                let outcome = env.step(Action::new(0.5, 0.1)).unwrap();
                total += outcome.reward;
                if outcome.done {
                    return (total, env.time_step());
                }
            }
        };

        let handles: Vec<_> = (0..4u64)
            .map(|seed| std::thread::spawn(move || run(seed)))
            .collect();

        for (seed, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), run(seed as u64));
        }
    }
}
