//! Resource types held in the village stockpile

use serde::{Deserialize, Serialize};
use std::fmt;

/// A stockpiled resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Food,
    Wood,
    Stone,
    Metal,
    Planks,
    Weapons,
    Tools,
    Gold,
}

impl ResourceType {
    pub const ALL: [ResourceType; 8] = [
        ResourceType::Food,
        ResourceType::Wood,
        ResourceType::Stone,
        ResourceType::Metal,
        ResourceType::Planks,
        ResourceType::Weapons,
        ResourceType::Tools,
        ResourceType::Gold,
    ];

    /// Case-insensitive lookup used by the data loaders
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "food" => Some(ResourceType::Food),
            "wood" => Some(ResourceType::Wood),
            "stone" => Some(ResourceType::Stone),
            "metal" => Some(ResourceType::Metal),
            "planks" => Some(ResourceType::Planks),
            "weapons" => Some(ResourceType::Weapons),
            "tools" => Some(ResourceType::Tools),
            "gold" => Some(ResourceType::Gold),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ResourceType::Food => "food",
            ResourceType::Wood => "wood",
            ResourceType::Stone => "stone",
            ResourceType::Metal => "metal",
            ResourceType::Planks => "planks",
            ResourceType::Weapons => "weapons",
            ResourceType::Tools => "tools",
            ResourceType::Gold => "gold",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_names() {
        for resource in ResourceType::ALL {
            assert_eq!(ResourceType::parse(resource.name()), Some(resource));
        }
        assert_eq!(ResourceType::parse("PLANKS"), Some(ResourceType::Planks));
        assert_eq!(ResourceType::parse("mana"), None);
    }
}
