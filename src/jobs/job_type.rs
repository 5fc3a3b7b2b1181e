//! Job types and their fixed properties

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::population::worker::Skill;

/// Every kind of job a worker can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    Builder,
    Foreman,
    Farmer,
    Hunter,
    Gatherer,
    Woodcutter,
    Quarrier,
    Miner,
    Sawyer,
    Blacksmith,
    Weaponsmith,
    Merchant,
    Scholar,
    MilitaryTheorist,
    Wizard,
}

/// Broad grouping that drives the scoring heuristics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobCategory {
    /// Only useful while something is under construction
    Construction,
    Food,
    /// Random basic resource each day
    Gathering,
    RawMaterial,
    /// Converts an upstream resource into a refined good
    Processing,
    Commerce,
    /// No resource payoff today
    NoPayoff,
}

impl JobType {
    pub const ALL: [JobType; 15] = [
        JobType::Builder,
        JobType::Foreman,
        JobType::Farmer,
        JobType::Hunter,
        JobType::Gatherer,
        JobType::Woodcutter,
        JobType::Quarrier,
        JobType::Miner,
        JobType::Sawyer,
        JobType::Blacksmith,
        JobType::Weaponsmith,
        JobType::Merchant,
        JobType::Scholar,
        JobType::MilitaryTheorist,
        JobType::Wizard,
    ];

    pub fn category(&self) -> JobCategory {
        match self {
            JobType::Builder | JobType::Foreman => JobCategory::Construction,
            JobType::Farmer | JobType::Hunter => JobCategory::Food,
            JobType::Gatherer => JobCategory::Gathering,
            JobType::Woodcutter | JobType::Quarrier | JobType::Miner => JobCategory::RawMaterial,
            JobType::Sawyer | JobType::Blacksmith | JobType::Weaponsmith => JobCategory::Processing,
            JobType::Merchant => JobCategory::Commerce,
            JobType::Scholar | JobType::MilitaryTheorist | JobType::Wizard => JobCategory::NoPayoff,
        }
    }

    /// Tie-break order when two slots score the same; lower goes first
    pub fn priority_rank(&self) -> u8 {
        match self {
            JobType::Builder => 0,
            JobType::Foreman => 1,
            JobType::Farmer => 2,
            JobType::Hunter => 3,
            JobType::Gatherer => 4,
            JobType::Woodcutter => 5,
            JobType::Quarrier => 6,
            JobType::Miner => 7,
            JobType::Sawyer => 8,
            JobType::Blacksmith => 9,
            JobType::Weaponsmith => 10,
            JobType::Merchant => 11,
            JobType::Scholar => 12,
            JobType::MilitaryTheorist => 13,
            JobType::Wizard => 14,
        }
    }

    /// Skills that make someone better at this job
    pub fn relevant_skills(&self) -> &'static [Skill] {
        match self {
            JobType::Builder => &[Skill::Construction, Skill::Masonry, Skill::Carpentry],
            JobType::Foreman => &[Skill::Construction, Skill::Leadership],
            JobType::Farmer => &[Skill::Farming, Skill::Foraging],
            JobType::Hunter => &[Skill::Hunting, Skill::Combat],
            JobType::Gatherer => &[Skill::Foraging, Skill::Farming, Skill::Woodcutting],
            JobType::Woodcutter => &[Skill::Woodcutting, Skill::Carpentry],
            JobType::Quarrier => &[Skill::Masonry, Skill::Mining],
            JobType::Miner => &[Skill::Mining, Skill::Masonry],
            JobType::Sawyer => &[Skill::Carpentry, Skill::Woodcutting],
            JobType::Blacksmith => &[Skill::Smithing],
            JobType::Weaponsmith => &[Skill::Smithing, Skill::Combat],
            JobType::Merchant => &[Skill::Trade],
            JobType::Scholar => &[Skill::Scholarship],
            JobType::MilitaryTheorist => &[Skill::Tactics, Skill::Leadership],
            JobType::Wizard => &[Skill::Arcana, Skill::Scholarship],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            JobType::Builder => "builder",
            JobType::Foreman => "foreman",
            JobType::Farmer => "farmer",
            JobType::Hunter => "hunter",
            JobType::Gatherer => "gatherer",
            JobType::Woodcutter => "woodcutter",
            JobType::Quarrier => "quarrier",
            JobType::Miner => "miner",
            JobType::Sawyer => "sawyer",
            JobType::Blacksmith => "blacksmith",
            JobType::Weaponsmith => "weaponsmith",
            JobType::Merchant => "merchant",
            JobType::Scholar => "scholar",
            JobType::MilitaryTheorist => "military_theorist",
            JobType::Wizard => "wizard",
        }
    }

    /// Case-insensitive lookup used by the data loaders
    pub fn parse(name: &str) -> Option<Self> {
        let lowered = name.to_lowercase().replace([' ', '-'], "_");
        JobType::ALL.into_iter().find(|job| job.name() == lowered)
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
