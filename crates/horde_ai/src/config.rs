//! Agent and behavior configuration
//!
//! Every struct deserializes with defaults for missing fields, so a config
//! file only needs to name what it changes.

use crate::error::{AiError, Result};
use crate::state::StateId;
use crate::waypoint::WaypointNetwork;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Per-agent settings shared by every archetype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// State entered on start
    pub initial_state: StateId,
    /// Default target volume radius
    pub stopping_distance: f32,
    /// Sensor sphere radius in local units
    pub sensor_radius: f32,
    /// Sensor sphere center relative to the agent, in local units
    pub sensor_offset: Vec3,
    /// Patrol waypoints in random order instead of sequentially
    pub random_patrol: bool,
    /// Seed for the agent's random stream; the agent id is used when absent
    pub rng_seed: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            initial_state: StateId::Patrol,
            stopping_distance: 1.0,
            sensor_radius: 10.0,
            sensor_offset: Vec3::ZERO,
            random_patrol: false,
            rng_seed: None,
        }
    }
}

/// Zombie traits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZombieConfig {
    pub health: i32,
    /// Field of view in degrees
    pub fov: f32,
    pub sight: f32,
    pub hearing: f32,
    pub aggression: f32,
    pub intelligence: f32,
    /// Starting satisfaction, 1 is full
    pub satisfaction: f32,
    pub replenish_rate: f32,
    pub depletion_rate: f32,
}

impl Default for ZombieConfig {
    fn default() -> Self {
        Self {
            health: 100,
            fov: 50.0,
            sight: 0.5,
            hearing: 1.0,
            aggression: 0.5,
            intelligence: 0.5,
            satisfaction: 1.0,
            replenish_rate: 0.5,
            depletion_rate: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatrolConfig {
    pub speed: f32,
    /// Degrees off the steering target before stopping to turn
    pub turn_on_spot_threshold: f32,
    pub slerp_speed: f32,
}

impl Default for PatrolConfig {
    fn default() -> Self {
        Self {
            speed: 2.0,
            turn_on_spot_threshold: 90.0,
            slerp_speed: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertedConfig {
    /// Seconds without a fresh threat before returning to patrol
    pub max_duration: f32,
    pub waypoint_angle_threshold: f32,
    pub threat_angle_threshold: f32,
}

impl Default for AlertedConfig {
    fn default() -> Self {
        Self {
            max_duration: 10.0,
            waypoint_angle_threshold: 90.0,
            threat_angle_threshold: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuitConfig {
    pub speed: f32,
    pub slerp_speed: f32,
    /// Re-path delay per unit of threat distance
    pub repath_distance_multiplier: f32,
    pub repath_visual_min: f32,
    pub repath_visual_max: f32,
    pub repath_audio_min: f32,
    pub repath_audio_max: f32,
    /// Seconds before giving up the chase
    pub max_duration: f32,
    pub look_at_weight: f32,
    pub look_at_angle_threshold: f32,
}

impl Default for PursuitConfig {
    fn default() -> Self {
        Self {
            speed: 3.0,
            slerp_speed: 5.0,
            repath_distance_multiplier: 0.035,
            repath_visual_min: 0.05,
            repath_visual_max: 5.0,
            repath_audio_min: 0.25,
            repath_audio_max: 5.0,
            max_duration: 40.0,
            look_at_weight: 0.7,
            look_at_angle_threshold: 15.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackConfig {
    pub speed: f32,
    pub stopping_distance: f32,
    pub look_at_weight: f32,
    pub look_at_angle_threshold: f32,
    pub slerp_speed: f32,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            speed: 0.0,
            stopping_distance: 1.0,
            look_at_weight: 0.7,
            look_at_angle_threshold: 15.0,
            slerp_speed: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedingConfig {
    pub slerp_speed: f32,
    /// Animation state that counts as eating
    pub feeding_state_name: String,
    /// Animation layer the eating state plays on
    pub feeding_layer: String,
    /// Satisfaction above which feeding stops
    pub satisfied_threshold: f32,
}

impl Default for FeedingConfig {
    fn default() -> Self {
        Self {
            slerp_speed: 5.0,
            feeding_state_name: "Feeding".to_string(),
            feeding_layer: "Cinematic".to_string(),
            satisfied_threshold: 0.9,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleConfig {
    pub min_duration: f32,
    pub max_duration: f32,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            min_duration: 10.0,
            max_duration: 60.0,
        }
    }
}

/// Everything needed to build a zombie agent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HordeConfig {
    pub agent: AgentConfig,
    pub zombie: ZombieConfig,
    pub patrol: PatrolConfig,
    pub alerted: AlertedConfig,
    pub pursuit: PursuitConfig,
    pub attack: AttackConfig,
    pub feeding: FeedingConfig,
    pub idle: IdleConfig,
    /// Optional patrol route shared by every agent built from this config
    pub waypoints: Option<WaypointNetwork>,
}

impl HordeConfig {
    /// Parse and validate a config from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded horde config from {}", path.display());
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every value against its allowed range
    pub fn validate(&self) -> Result<()> {
        check_range("agent.stopping_distance", self.agent.stopping_distance, 0.0, 15.0)?;
        check_positive("agent.sensor_radius", self.agent.sensor_radius)?;

        let zombie = &self.zombie;
        if !(0..=100).contains(&zombie.health) {
            return Err(invalid("zombie.health", format!("{} not in 0..=100", zombie.health)));
        }
        check_range("zombie.fov", zombie.fov, 10.0, 360.0)?;
        check_range("zombie.sight", zombie.sight, 0.0, 1.0)?;
        check_range("zombie.hearing", zombie.hearing, 0.0, 1.0)?;
        check_range("zombie.aggression", zombie.aggression, 0.0, 1.0)?;
        check_range("zombie.intelligence", zombie.intelligence, 0.0, 1.0)?;
        check_range("zombie.satisfaction", zombie.satisfaction, 0.0, 1.0)?;
        check_non_negative("zombie.replenish_rate", zombie.replenish_rate)?;
        check_non_negative("zombie.depletion_rate", zombie.depletion_rate)?;

        check_range("patrol.speed", self.patrol.speed, 0.0, 3.0)?;
        check_range("alerted.max_duration", self.alerted.max_duration, 1.0, 60.0)?;
        check_range("pursuit.speed", self.pursuit.speed, 0.0, 10.0)?;
        check_positive("pursuit.max_duration", self.pursuit.max_duration)?;
        check_range("pursuit.look_at_weight", self.pursuit.look_at_weight, 0.0, 1.0)?;
        check_range(
            "pursuit.look_at_angle_threshold",
            self.pursuit.look_at_angle_threshold,
            0.0,
            90.0,
        )?;
        if self.pursuit.repath_visual_min > self.pursuit.repath_visual_max {
            return Err(invalid("pursuit.repath_visual_min", "exceeds repath_visual_max".into()));
        }
        if self.pursuit.repath_audio_min > self.pursuit.repath_audio_max {
            return Err(invalid("pursuit.repath_audio_min", "exceeds repath_audio_max".into()));
        }
        check_range("attack.speed", self.attack.speed, 0.0, 10.0)?;
        check_range("attack.look_at_weight", self.attack.look_at_weight, 0.0, 1.0)?;
        check_range(
            "attack.look_at_angle_threshold",
            self.attack.look_at_angle_threshold,
            0.0,
            90.0,
        )?;
        check_range("feeding.satisfied_threshold", self.feeding.satisfied_threshold, 0.0, 1.0)?;
        check_non_negative("idle.min_duration", self.idle.min_duration)?;
        if self.idle.min_duration > self.idle.max_duration {
            return Err(invalid("idle.min_duration", "exceeds idle.max_duration".into()));
        }

        if let Some(network) = &self.waypoints {
            network.validate()?;
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> AiError {
    AiError::InvalidConfig { field, reason }
}

fn check_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<()> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("{} not in {}..={}", value, min, max)))
    }
}

fn check_positive(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{} must be positive", value)))
    }
}

fn check_non_negative(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{} must not be negative", value)))
    }
}
