// Loop rate, log location, joint naming and leg geometry loading
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::kinematics::{Leg, LegGeometry};

// Sampler loop frequency
pub const LOOP_HZ: u64 = 50;

// Append-only record log (JSON Lines)
pub const LOG_PATH: &str = "fk_log.jsonl";

// Channel depths
pub const JOINT_STATE_QUEUE: usize = 10;
pub const POSITION_QUEUE: usize = 16;

// Joint names published by the sensor feed
pub const FRONT_LEFT_JOINTS: [&str; 3] = ["leg_front_l_1", "leg_front_l_2", "leg_front_l_3"];
pub const BACK_LEFT_JOINTS: [&str; 3] = ["leg_back_l_1", "leg_back_l_2", "leg_back_l_3"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No legs configured")]
    NoLegs,

    #[error("Duplicate leg tag '{0}'")]
    DuplicateTag(String),

    #[error("Loop rate must be between 1 and 1000 Hz, got {0}")]
    InvalidLoopRate(u64),

    #[error("Tick limit must be at least 1")]
    ZeroTickLimit,
}

/// Built-in legs: Pupper front-left and back-left
pub fn default_legs() -> Vec<Leg> {
    vec![
        Leg::new(
            "leg_front_l",
            "f",
            FRONT_LEFT_JOINTS,
            LegGeometry::pupper_front_left(),
        ),
        Leg::new(
            "leg_back_l",
            "b",
            BACK_LEFT_JOINTS,
            LegGeometry::pupper_back_left(),
        ),
    ]
}

/// Load leg definitions from a JSON array file
pub fn load_legs(path: &Path) -> Result<Vec<Leg>, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let legs: Vec<Leg> = serde_json::from_str(&contents)?;
    Ok(legs)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub loop_hz: u64,
    pub log_path: PathBuf,
    /// Stop after this many ticks (runs until the feed closes if None)
    pub max_ticks: Option<u64>,
    pub legs: Vec<Leg>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            loop_hz: LOOP_HZ,
            log_path: PathBuf::from(LOG_PATH),
            max_ticks: None,
            legs: default_legs(),
        }
    }
}

impl RuntimeConfig {
    pub fn tick_period(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.loop_hz.max(1))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=1000).contains(&self.loop_hz) {
            return Err(ConfigError::InvalidLoopRate(self.loop_hz));
        }
        if self.max_ticks == Some(0) {
            return Err(ConfigError::ZeroTickLimit);
        }
        if self.legs.is_empty() {
            return Err(ConfigError::NoLegs);
        }
        // Tags become log keys, so they must be unique
        for (i, leg) in self.legs.iter().enumerate() {
            if self.legs[..i].iter().any(|other| other.tag == leg.tag) {
                return Err(ConfigError::DuplicateTag(leg.tag.clone()));
            }
        }
        Ok(())
    }
}
