use std::{f64::consts::PI, fs, path::Path};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::ConfigError;

const STEP_DURATION: f64 = 3600.0; // s / tick
const SPEED_FACTOR: f64 = 20.0; // km/s per normalized velocity unit
const MAX_STEPS: u32 = 200;
const MAX_INIT_SPEED: f64 = 1.0 / (2.0 * MAX_STEPS as f64);
const SLINGSHOT_DISTANCE_FACTOR: f64 = SPEED_FACTOR * STEP_DURATION; // km per frame
const FREE_FLIGHT_DISTANCE_FACTOR: f64 = SPEED_FACTOR / MAX_INIT_SPEED * STEP_DURATION;
// km^3 / (kg s^2), folded with the frame scale so planetary pull stays
// comparable to full thrust at mid-frame separations.
const SLINGSHOT_GRAVITY: f64 = 6.674e-19 / SLINGSHOT_DISTANCE_FACTOR;
const NEWTON_GRAVITY: f64 = 6.674e-20;

/// Closed interval a value is drawn from on reset.
#[derive(Serialize, Deserialize, PartialEq, Clone, Copy, Debug)]
pub struct SpawnRange {
    pub min: f64,
    pub max: f64,
}

impl SpawnRange {
    pub const fn new(min: f64, max: f64) -> Self {
        SpawnRange { min, max }
    }

    /// Uniform draw from `[min, max]`; a degenerate range yields `min`.
    pub fn sample(&self, rng: &mut impl Rng) -> f64 {
        if self.max <= self.min {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    fn check(&self, field: &'static str) -> Result<(), ConfigError> {
        for value in [self.min, self.max] {
            if value.is_infinite() {
                return Err(ConfigError::NonFinite { field, value });
            }
        }
        if self.min > self.max || self.min.is_nan() || self.max.is_nan() {
            return Err(ConfigError::InvalidRange {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug, Default, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// Gravity on, planet collisions end the episode.
    #[default]
    Slingshot,
    /// No gravity, strong engine, rocket spawns near the left edge.
    FreeFlight,
}

/// Physical and tunable constants for one environment instance.
#[derive(Serialize, Deserialize, PartialEq, Clone, Debug)]
#[serde(default)]
pub struct SimConfig {
    // integration
    pub step_duration: f64,   // s
    pub speed_factor: f64,    // km/s
    pub distance_factor: f64, // km
    pub gravity: bool,
    pub gravity_constant: f64,       // km^3 / (kg s^2)
    pub min_gravity_separation: f64, // normalized

    // rocket
    pub rocket_acceleration: f64,   // km/s^2 at full thrust
    pub rocket_rotation_angle: f64, // rad at full turn
    pub max_init_speed: f64,
    pub max_init_angle: f64,
    /// Zero pins the rocket to the left edge.
    pub rocket_spawn_x_max: f64,
    pub rocket_spawn_y: SpawnRange,

    // scene
    pub target_spawn_x_min: f64,
    pub planet_x: SpawnRange,
    pub planet_y: SpawnRange,
    pub planet_mass: SpawnRange, // kg

    // episode
    pub max_steps: u32,
    pub collision_radius: Option<f64>,
    pub fuel_cost: f64,
    pub turn_cost: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig::slingshot()
    }
}

impl SimConfig {
    pub fn slingshot() -> Self {
        Self {
            step_duration: STEP_DURATION,
            speed_factor: SPEED_FACTOR,
            distance_factor: SLINGSHOT_DISTANCE_FACTOR,
            gravity: true,
            gravity_constant: SLINGSHOT_GRAVITY,
            min_gravity_separation: 1e-3,
            rocket_acceleration: 1e-7,
            rocket_rotation_angle: PI / 6.0,
            max_init_speed: MAX_INIT_SPEED,
            max_init_angle: PI / 6.0,
            rocket_spawn_x_max: 0.0,
            rocket_spawn_y: SpawnRange::new(0.2, 0.8),
            target_spawn_x_min: 0.9,
            planet_x: SpawnRange::new(0.35, 0.75),
            planet_y: SpawnRange::new(0.2, 0.8),
            planet_mass: SpawnRange::new(1e23, 1e25),
            max_steps: MAX_STEPS,
            collision_radius: Some(0.05),
            fuel_cost: -1.0,
            turn_cost: -0.1,
        }
    }

    pub fn free_flight() -> Self {
        Self {
            distance_factor: FREE_FLIGHT_DISTANCE_FACTOR,
            gravity: false,
            gravity_constant: NEWTON_GRAVITY,
            rocket_acceleration: 0.02,
            rocket_spawn_x_max: 0.1,
            collision_radius: None,
            ..SimConfig::slingshot()
        }
    }

    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Slingshot => SimConfig::slingshot(),
            Preset::FreeFlight => SimConfig::free_flight(),
        }
    }

    /// Parses a JSON document; missing fields fall back to the slingshot preset.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        SimConfig::from_json_str(&json)
    }

    pub fn rocket_spawn_x(&self) -> SpawnRange {
        SpawnRange::new(0.0, self.rocket_spawn_x_max)
    }

    pub fn target_spawn_x(&self) -> SpawnRange {
        SpawnRange::new(self.target_spawn_x_min, 1.0)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("step_duration", self.step_duration),
            ("speed_factor", self.speed_factor),
            ("distance_factor", self.distance_factor),
            ("gravity_constant", self.gravity_constant),
            ("min_gravity_separation", self.min_gravity_separation),
            ("rocket_acceleration", self.rocket_acceleration),
            ("rocket_rotation_angle", self.rocket_rotation_angle),
            ("max_init_speed", self.max_init_speed),
            ("max_init_angle", self.max_init_angle),
            ("collision_radius", self.collision_radius.unwrap_or(0.0)),
            ("fuel_cost", self.fuel_cost),
            ("turn_cost", self.turn_cost),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
        }

        // the timeout must stay reachable by the step counter
        if self.max_steps == u32::MAX {
            return Err(ConfigError::MaxStepsTooLarge {
                value: self.max_steps,
                limit: u32::MAX,
            });
        }

        for (field, value) in [
            ("step_duration", self.step_duration),
            ("speed_factor", self.speed_factor),
            ("distance_factor", self.distance_factor),
            ("min_gravity_separation", self.min_gravity_separation),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        for (field, value) in [
            ("gravity_constant", self.gravity_constant),
            ("max_init_speed", self.max_init_speed),
            ("max_init_angle", self.max_init_angle),
            ("collision_radius", self.collision_radius.unwrap_or(0.0)),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigError::Negative { field, value });
            }
        }

        self.rocket_spawn_x().check("rocket_spawn_x")?;
        self.rocket_spawn_y.check("rocket_spawn_y")?;
        self.target_spawn_x().check("target_spawn_x")?;
        self.planet_x.check("planet_x")?;
        self.planet_y.check("planet_y")?;
        self.planet_mass.check("planet_mass")?;

        Ok(())
    }
}
