//! Construction sites - the work queue builders are staffed against

use serde::{Deserialize, Serialize};

use crate::core::types::BuildingId;

/// A building currently under construction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstructionSite {
    pub building: BuildingId,
    /// Work units still needed to finish
    pub remaining_work: f32,
}

impl ConstructionSite {
    pub fn new(building: BuildingId, remaining_work: f32) -> Self {
        Self {
            building,
            remaining_work,
        }
    }
}

/// Total outstanding work across every active site
pub fn total_remaining_work(sites: &[ConstructionSite]) -> f32 {
    sites.iter().map(|s| s.remaining_work.max(0.0)).sum()
}

/// Whether any site still needs work
pub fn construction_active(sites: &[ConstructionSite]) -> bool {
    sites.iter().any(|s| s.remaining_work > 0.0)
}

/// How many builders the active work justifies
///
/// Formula: max(floor, ceil(remaining / (work_per_day * horizon_days)))
/// - No active work => 0
/// - 100 work, 10/day, 7 days => ceil(1.43) = 2
/// - 500 work, 10/day, 7 days => ceil(7.14) = 8
pub fn builder_ceiling(
    sites: &[ConstructionSite],
    work_per_day: f32,
    horizon_days: f32,
    floor: u32,
) -> u32 {
    if !construction_active(sites) {
        return 0;
    }
    let daily_capacity = (work_per_day * horizon_days).max(f32::EPSILON);
    let needed = (total_remaining_work(sites) / daily_capacity).ceil() as u32;
    needed.max(floor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_sites_no_builders() {
        assert!(!construction_active(&[]));
        assert_eq!(builder_ceiling(&[], 10.0, 7.0, 2), 0);
    }

    #[test]
    fn test_finished_sites_are_inactive() {
        let sites = [ConstructionSite::new(BuildingId(1), 0.0)];
        assert!(!construction_active(&sites));
        assert_eq!(builder_ceiling(&sites, 10.0, 7.0, 2), 0);
    }

    #[test]
    fn test_ceiling_respects_floor() {
        let sites = [ConstructionSite::new(BuildingId(1), 10.0)];
        assert_eq!(builder_ceiling(&sites, 10.0, 7.0, 2), 2);
    }

    #[test]
    fn test_ceiling_scales_with_work() {
        let sites = [
            ConstructionSite::new(BuildingId(1), 300.0),
            ConstructionSite::new(BuildingId(2), 200.0),
        ];
        assert!((total_remaining_work(&sites) - 500.0).abs() < 0.01);
        assert_eq!(builder_ceiling(&sites, 10.0, 7.0, 2), 8);
    }
}
