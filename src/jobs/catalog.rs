//! Job catalog - what each job yields and where it is done
//!
//! The catalog is static configuration: loaded once (defaults or TOML),
//! validated at load time, and never mutated by the daily tick.

use ahash::AHashMap;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::city::building::BuildingType;
use crate::city::resource::ResourceType;
use crate::core::calendar::{Season, SeasonalModifiers};
use crate::jobs::job_type::JobType;

/// One catalog entry
#[derive(Debug, Clone, PartialEq)]
pub struct JobSpec {
    pub job: JobType,
    /// Building type that hosts this job; `None` means global-only
    pub host: Option<BuildingType>,
    /// Slots per level-1 host building
    pub base_slots: f32,
    /// Per-worker daily yield; negative amounts are consumption
    pub yields: Vec<(ResourceType, f32)>,
}

/// Catalog of all job types
#[derive(Debug, Clone, Default)]
pub struct JobCatalog {
    specs: AHashMap<JobType, JobSpec>,
    seasons: SeasonalModifiers,
}

impl JobCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard village job table
    pub fn with_defaults() -> Self {
        use BuildingType as B;
        use ResourceType as R;

        let mut catalog = Self::new();
        let table: [(JobType, Option<BuildingType>, f32, Vec<(ResourceType, f32)>); 15] = [
            (JobType::Builder, None, 0.0, vec![]),
            (JobType::Foreman, Some(B::BuildersHall), 1.0, vec![]),
            (JobType::Farmer, Some(B::Farm), 4.0, vec![(R::Food, 3.75)]),
            (JobType::Hunter, Some(B::HuntingLodge), 2.0, vec![(R::Food, 2.5)]),
            // Gatherer output is drawn at random each day
            (JobType::Gatherer, None, 0.0, vec![]),
            (JobType::Woodcutter, Some(B::WoodcutterLodge), 3.0, vec![(R::Wood, 2.5)]),
            (JobType::Quarrier, Some(B::Quarry), 3.0, vec![(R::Stone, 1.5)]),
            (JobType::Miner, Some(B::Mine), 2.0, vec![(R::Metal, 1.0)]),
            (JobType::Sawyer, Some(B::LumberMill), 2.0, vec![(R::Wood, -2.0), (R::Planks, 1.5)]),
            (JobType::Blacksmith, Some(B::Blacksmith), 2.0, vec![(R::Metal, -1.0), (R::Tools, 0.5)]),
            (JobType::Weaponsmith, Some(B::Armory), 2.0, vec![(R::Metal, -1.0), (R::Weapons, 0.5)]),
            (JobType::Merchant, Some(B::Market), 2.0, vec![(R::Gold, 2.0)]),
            (JobType::Scholar, Some(B::Library), 2.0, vec![]),
            (JobType::MilitaryTheorist, Some(B::WarCollege), 1.0, vec![]),
            (JobType::Wizard, Some(B::MageTower), 1.0, vec![]),
        ];
        for (job, host, base_slots, yields) in table {
            catalog.specs.insert(
                job,
                JobSpec {
                    job,
                    host,
                    base_slots,
                    yields,
                },
            );
        }
        catalog.seasons = SeasonalModifiers::with_defaults();
        catalog
    }

    /// Add a job spec, rejecting a second entry for the same job
    pub fn add(&mut self, spec: JobSpec) -> Result<(), CatalogLoadError> {
        if self.specs.contains_key(&spec.job) {
            return Err(CatalogLoadError::Duplicate(spec.job.to_string()));
        }
        self.specs.insert(spec.job, spec);
        Ok(())
    }

    pub fn get(&self, job: JobType) -> Option<&JobSpec> {
        self.specs.get(&job)
    }

    /// Per-worker daily yield; jobs missing from the catalog yield nothing
    pub fn yield_for(&self, job: JobType) -> &[(ResourceType, f32)] {
        self.specs
            .get(&job)
            .map(|spec| spec.yields.as_slice())
            .unwrap_or(&[])
    }

    /// Jobs hosted by a building type, in tie-break order
    pub fn jobs_for_building(&self, building_type: BuildingType) -> Vec<&JobSpec> {
        let mut specs: Vec<&JobSpec> = self
            .specs
            .values()
            .filter(|spec| spec.host == Some(building_type))
            .collect();
        specs.sort_by_key(|spec| spec.job.priority_rank());
        specs
    }

    pub fn seasons(&self) -> &SeasonalModifiers {
        &self.seasons
    }

    pub fn seasons_mut(&mut self) -> &mut SeasonalModifiers {
        &mut self.seasons
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Load a catalog from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self, CatalogLoadError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CatalogLoadError::Io(e.to_string()))?;
        Self::parse_toml(&content)
    }

    /// Parse a catalog from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self, CatalogLoadError> {
        let toml_data: TomlCatalog =
            toml::from_str(content).map_err(|e| CatalogLoadError::Parse(e.to_string()))?;

        let mut catalog = Self::new();
        for job in toml_data.jobs {
            catalog.add(job.into_spec()?)?;
        }
        for entry in toml_data.seasons {
            let season = Season::parse(&entry.season)
                .ok_or_else(|| CatalogLoadError::InvalidSeason(entry.season.clone()))?;
            let resource = parse_resource(&entry.resource)?;
            catalog.seasons.set(season, resource, entry.multiplier);
        }
        Ok(catalog)
    }
}

/// Error type for catalog loading
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogLoadError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid job type: {0}")]
    InvalidJobType(String),
    #[error("Invalid building type: {0}")]
    InvalidBuildingType(String),
    #[error("Invalid resource type: {0}")]
    InvalidResourceType(String),
    #[error("Invalid season: {0}")]
    InvalidSeason(String),
    #[error("Duplicate job entry: {0}")]
    Duplicate(String),
}

/// TOML representation of the catalog file
#[derive(Debug, Deserialize)]
struct TomlCatalog {
    jobs: Vec<TomlJob>,
    #[serde(default)]
    seasons: Vec<TomlSeasonModifier>,
}

/// TOML representation of a single job
#[derive(Debug, Deserialize)]
struct TomlJob {
    job: String,
    #[serde(default)]
    host: Option<String>,
    #[serde(default)]
    base_slots: f32,
    #[serde(default)]
    yields: Vec<TomlResourceAmount>,
}

#[derive(Debug, Deserialize)]
struct TomlResourceAmount {
    resource: String,
    amount: f32,
}

#[derive(Debug, Deserialize)]
struct TomlSeasonModifier {
    season: String,
    resource: String,
    multiplier: f32,
}

fn parse_resource(name: &str) -> Result<ResourceType, CatalogLoadError> {
    ResourceType::parse(name).ok_or_else(|| CatalogLoadError::InvalidResourceType(name.to_string()))
}

impl TomlJob {
    fn into_spec(self) -> Result<JobSpec, CatalogLoadError> {
        let job = JobType::parse(&self.job).ok_or(CatalogLoadError::InvalidJobType(self.job))?;

        let host = match self.host {
            Some(name) => Some(
                BuildingType::parse(&name).ok_or(CatalogLoadError::InvalidBuildingType(name))?,
            ),
            None => None,
        };

        let yields = self
            .yields
            .into_iter()
            .map(|ra| Ok((parse_resource(&ra.resource)?, ra.amount)))
            .collect::<Result<Vec<_>, CatalogLoadError>>()?;

        Ok(JobSpec {
            job,
            host,
            base_slots: self.base_slots.max(0.0),
            yields,
        })
    }
}
