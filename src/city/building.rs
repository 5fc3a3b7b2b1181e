//! Building records as seen by the job engine
//!
//! Buildings are owned by the building subsystem. The job engine only
//! reads their type, level, and built flag to derive job slots.

use serde::{Deserialize, Serialize};

use crate::core::types::BuildingId;

/// Type of building
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingType {
    House,
    Farm,
    HuntingLodge,
    WoodcutterLodge,
    Quarry,
    Mine,
    LumberMill,
    Blacksmith,
    Armory,
    BuildersHall,
    Market,
    Library,
    WarCollege,
    MageTower,
}

impl BuildingType {
    /// Case-insensitive lookup used by the data loaders
    ///
    /// Accepts both `lumber_mill` and `lumbermill` spellings.
    pub fn parse(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '_' && *c != '-' && *c != ' ')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "house" => Some(BuildingType::House),
            "farm" => Some(BuildingType::Farm),
            "huntinglodge" => Some(BuildingType::HuntingLodge),
            "woodcutterlodge" => Some(BuildingType::WoodcutterLodge),
            "quarry" => Some(BuildingType::Quarry),
            "mine" => Some(BuildingType::Mine),
            "lumbermill" => Some(BuildingType::LumberMill),
            "blacksmith" => Some(BuildingType::Blacksmith),
            "armory" => Some(BuildingType::Armory),
            "buildershall" => Some(BuildingType::BuildersHall),
            "market" => Some(BuildingType::Market),
            "library" => Some(BuildingType::Library),
            "warcollege" => Some(BuildingType::WarCollege),
            "magetower" => Some(BuildingType::MageTower),
            _ => None,
        }
    }
}

/// Read-only view of a building instance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuildingRecord {
    pub id: BuildingId,
    pub building_type: BuildingType,
    pub level: u32,
    pub built: bool,
}

impl BuildingRecord {
    /// A finished level-1 building
    pub fn built(id: BuildingId, building_type: BuildingType) -> Self {
        Self {
            id,
            building_type,
            level: 1,
            built: true,
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Only finished buildings of level 1+ offer jobs
    pub fn offers_jobs(&self) -> bool {
        self.built && self.level >= 1
    }
}
