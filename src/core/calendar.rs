//! Calendar system for day and season tracking
//!
//! The village advances one day per tick. Seasons rotate every
//! `days_per_season` days and scale resource production through
//! [`SeasonalModifiers`].

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::city::resource::ResourceType;

/// Seasons of the year, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    pub fn next(&self) -> Self {
        match self {
            Season::Spring => Season::Summer,
            Season::Summer => Season::Autumn,
            Season::Autumn => Season::Winter,
            Season::Winter => Season::Spring,
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "spring" => Some(Season::Spring),
            "summer" => Some(Season::Summer),
            "autumn" | "fall" => Some(Season::Autumn),
            "winter" => Some(Season::Winter),
            _ => None,
        }
    }
}

/// Calendar tracks simulation time with day granularity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Calendar {
    day: u64,
    days_per_season: u64,
}

impl Calendar {
    pub fn new(days_per_season: u64) -> Self {
        Self {
            day: 0,
            days_per_season: days_per_season.max(1),
        }
    }

    pub fn advance(&mut self) {
        self.day += 1;
    }

    pub fn current_day(&self) -> u64 {
        self.day
    }

    pub fn current_year(&self) -> u64 {
        self.day / (self.days_per_season * 4)
    }

    pub fn current_season(&self) -> Season {
        let index = (self.day / self.days_per_season) % 4;
        Season::ALL[index as usize]
    }

    pub fn days_per_season(&self) -> u64 {
        self.days_per_season
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new(30)
    }
}

/// Season x resource production multipliers
///
/// Anything not listed produces at 1.0.
#[derive(Debug, Clone, Default)]
pub struct SeasonalModifiers {
    multipliers: AHashMap<(Season, ResourceType), f32>,
}

impl SeasonalModifiers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Growing season boosts food; winter cuts it and slows the quarry
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        table.set(Season::Spring, ResourceType::Food, 1.2);
        table.set(Season::Summer, ResourceType::Food, 1.5);
        table.set(Season::Autumn, ResourceType::Food, 1.1);
        table.set(Season::Winter, ResourceType::Food, 0.7);
        table.set(Season::Winter, ResourceType::Wood, 1.1);
        table.set(Season::Winter, ResourceType::Stone, 0.8);
        table
    }

    pub fn set(&mut self, season: Season, resource: ResourceType, multiplier: f32) {
        self.multipliers.insert((season, resource), multiplier);
    }

    pub fn get(&self, season: Season, resource: ResourceType) -> f32 {
        self.multipliers
            .get(&(season, resource))
            .copied()
            .unwrap_or(1.0)
    }

    pub fn len(&self) -> usize {
        self.multipliers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.multipliers.is_empty()
    }
}
