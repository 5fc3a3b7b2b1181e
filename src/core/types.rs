//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a person in the population
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorkerId(pub u64);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

/// Building identifier, assigned by whoever owns the buildings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BuildingId(pub u64);

/// Where a job slot lives: a constructed building, or the always-present
/// global site that hosts baseline builder/gatherer work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SiteId {
    Global,
    Building(BuildingId),
}

impl SiteId {
    pub fn is_global(&self) -> bool {
        matches!(self, SiteId::Global)
    }

    pub fn building(&self) -> Option<BuildingId> {
        match self {
            SiteId::Global => None,
            SiteId::Building(id) => Some(*id),
        }
    }
}

impl From<BuildingId> for SiteId {
    fn from(id: BuildingId) -> Self {
        SiteId::Building(id)
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteId::Global => write!(f, "global"),
            SiteId::Building(id) => write!(f, "b{}", id.0),
        }
    }
}

/// Error parsing a [`SiteId`] from its string form
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid site id: {0}")]
pub struct ParseSiteIdError(pub String);

impl FromStr for SiteId {
    type Err = ParseSiteIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("global") {
            return Ok(SiteId::Global);
        }
        s.strip_prefix('b')
            .and_then(|rest| rest.parse::<u64>().ok())
            .map(|raw| SiteId::Building(BuildingId(raw)))
            .ok_or_else(|| ParseSiteIdError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_building_id_keeps_supplied_value() {
        let id = BuildingId(17);
        assert_eq!(serde_json::to_string(&id).expect("serialize"), "17");
        assert_eq!(serde_json::from_str::<BuildingId>("17").expect("deserialize"), id);
    }

    #[test]
    fn test_site_id_string_form() {
        assert_eq!(SiteId::Global.to_string(), "global");
        assert_eq!(SiteId::Building(BuildingId(42)).to_string(), "b42");

        assert_eq!("global".parse::<SiteId>(), Ok(SiteId::Global));
        assert_eq!("GLOBAL".parse::<SiteId>(), Ok(SiteId::Global));
        assert_eq!("b42".parse::<SiteId>(), Ok(SiteId::Building(BuildingId(42))));
        assert!("farm".parse::<SiteId>().is_err());
        assert!("b".parse::<SiteId>().is_err());
    }

    #[test]
    fn test_site_id_ordering_puts_global_first() {
        let mut sites = vec![SiteId::Building(BuildingId(3)), SiteId::Global];
        sites.sort();
        assert_eq!(sites[0], SiteId::Global);
    }

    #[test]
    fn test_site_building_accessor() {
        assert_eq!(SiteId::Global.building(), None);
        assert!(SiteId::Global.is_global());
        let site: SiteId = BuildingId(7).into();
        assert_eq!(site.building(), Some(BuildingId(7)));
    }
}
