//! Labor configuration with documented constants
//!
//! All magic numbers used by the job engine are collected here with
//! explanations of their purpose and how they interact with each other.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::city::resource::ResourceType;
use crate::population::worker::{Role, WorkerStatus};

/// How a building's level scales the base slot count of its jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotScaling {
    /// `floor(base * max(1, level))`
    #[default]
    Linear,
    /// Level is ignored; every built building offers its base slots
    Flat,
}

impl SlotScaling {
    pub fn slots(&self, base_slots: f32, level: u32) -> u32 {
        let factor = match self {
            SlotScaling::Linear => level.max(1) as f32,
            SlotScaling::Flat => 1.0,
        };
        (base_slots * factor).floor().max(0.0) as u32
    }
}

/// Errors raised while loading or validating a [`LaborConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Configuration for the job assignment and production engine
///
/// Defaults are tuned so a fresh village with no buildings still has
/// enough global work to start construction, and so food shortages
/// dominate every other consideration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LaborConfig {
    // === WORKER ELIGIBILITY ===
    /// Youngest age allowed to take a job
    pub min_work_age: u32,

    /// Oldest age allowed to take a job
    pub max_work_age: u32,

    /// Minimum health (0-100) required to be assigned
    ///
    /// Workers below this are left to recover rather than worked harder.
    pub min_work_health: f32,

    /// Background roles that never take ordinary jobs
    pub excluded_roles: Vec<Role>,

    /// Statuses that take a worker out of the labor pool
    pub blocked_statuses: Vec<WorkerStatus>,

    // === SLOT INVENTORY ===
    /// Builder slots on the global site, independent of any building
    pub global_builder_slots: u32,

    /// Gatherer slots on the global site
    pub global_gatherer_slots: u32,

    /// How building level multiplies base slots
    pub slot_scaling: SlotScaling,

    // === NEED ESTIMATION ===
    /// Food eaten per person per day
    pub food_upkeep_per_person: f32,

    /// Days of food buffer at which food urgency reaches zero
    ///
    /// Urgency is `max(0, food_buffer_days - days_of_food)`, so with the
    /// default of 3.0 an empty granary scores 3.0.
    pub food_buffer_days: f32,

    /// Food urgency above which low-value jobs are emptied
    pub food_crisis_urgency: f32,

    // === CONSTRUCTION STAFFING ===
    /// Builders kept desirable while anything is under construction
    ///
    /// Prevents the deadlock where no builder exists to start a site.
    pub builder_floor: u32,

    /// Target days to finish the active construction work
    pub construction_horizon_days: f32,

    /// Construction work a single builder performs per day
    ///
    /// Ceiling = ceil(remaining_work / (builder_work_per_day * horizon)).
    pub builder_work_per_day: f32,

    // === PROCESSING GATES ===
    /// Sawyers are never assigned while wood is below this
    pub min_wood_for_sawyers: f32,

    /// Wood stock above which plank production is actively encouraged
    pub comfortable_wood: f32,

    /// Smiths are never assigned while metal is below this
    pub min_metal_for_smiths: f32,

    /// Metal stock above which tool/weapon production is encouraged
    pub comfortable_metal: f32,

    // === PRODUCTION ===
    /// Resources a gatherer can come back with
    pub gatherer_candidates: Vec<ResourceType>,

    /// Seed for the engine's RNG; `None` draws from entropy
    pub rng_seed: Option<u64>,
}

impl Default for LaborConfig {
    fn default() -> Self {
        Self {
            min_work_age: 14,
            max_work_age: 70,
            min_work_health: 30.0,
            excluded_roles: vec![Role::Monarch, Role::Royal],
            blocked_statuses: vec![
                WorkerStatus::Drafted,
                WorkerStatus::Traveling,
                WorkerStatus::Away,
                WorkerStatus::Dead,
            ],

            global_builder_slots: 4,
            global_gatherer_slots: 2,
            slot_scaling: SlotScaling::Linear,

            food_upkeep_per_person: 1.0,
            food_buffer_days: 3.0,
            food_crisis_urgency: 2.0,

            builder_floor: 2,
            construction_horizon_days: 7.0,
            builder_work_per_day: 10.0,

            min_wood_for_sawyers: 3.0,
            comfortable_wood: 20.0,
            min_metal_for_smiths: 2.0,
            comfortable_metal: 10.0,

            gatherer_candidates: vec![ResourceType::Food, ResourceType::Wood, ResourceType::Stone],
            rng_seed: None,
        }
    }
}

impl LaborConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: LaborConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file on disk
    pub fn load_from_toml(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_work_age > self.max_work_age {
            return Err(ConfigError::Invalid(format!(
                "min_work_age ({}) should be <= max_work_age ({})",
                self.min_work_age, self.max_work_age
            )));
        }

        if !(0.0..=100.0).contains(&self.min_work_health) {
            return Err(ConfigError::Invalid(format!(
                "min_work_health ({}) must be within 0..=100",
                self.min_work_health
            )));
        }

        if self.construction_horizon_days <= 0.0 || self.builder_work_per_day <= 0.0 {
            return Err(ConfigError::Invalid(
                "construction horizon and builder work rate must be positive".into(),
            ));
        }

        if self.food_buffer_days <= 0.0 || self.food_upkeep_per_person < 0.0 {
            return Err(ConfigError::Invalid(
                "food_buffer_days must be positive and upkeep non-negative".into(),
            ));
        }

        if self.min_wood_for_sawyers > self.comfortable_wood
            || self.min_metal_for_smiths > self.comfortable_metal
        {
            return Err(ConfigError::Invalid(
                "processing gate minimums must not exceed their comfortable levels".into(),
            ));
        }

        if self.gatherer_candidates.is_empty() {
            return Err(ConfigError::Invalid(
                "gatherer_candidates must name at least one resource".into(),
            ));
        }

        Ok(())
    }
}
