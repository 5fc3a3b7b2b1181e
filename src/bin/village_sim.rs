//! Headless Village Simulation
//!
//! Runs the daily job loop for a small village and prints a summary.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Parser;
use dynasty_jobs::city::{
    BuildingRecord, BuildingType, ConstructionSite, ResourceDelta, ResourcePool, ResourceType,
};
use dynasty_jobs::core::error::Result;
use dynasty_jobs::core::{BuildingId, Calendar, LaborConfig, WorkerId};
use dynasty_jobs::jobs::{JobCatalog, JobManager, JobType};
use dynasty_jobs::population::{Population, Skill, Worker};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Headless village sim - watch the job engine staff a village
#[derive(Parser, Debug)]
#[command(name = "village_sim")]
#[command(about = "Run the village job loop for a number of days")]
struct Args {
    /// Days to simulate
    #[arg(long, default_value_t = 120)]
    days: u64,

    /// Starting population
    #[arg(long, default_value_t = 20)]
    population: usize,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Job catalog TOML (defaults to the built-in table)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Labor config TOML (defaults to the built-in values)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,

    /// Print a line per day
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Serialize)]
struct SimSummary {
    days: u64,
    seed: u64,
    population: usize,
    final_stock: BTreeMap<ResourceType, f32>,
    jobs: BTreeMap<JobType, usize>,
    construction_finished_day: Option<u64>,
    total_released: usize,
    total_assigned: usize,
}

const SKILLS: [Skill; 6] = [
    Skill::Farming,
    Skill::Hunting,
    Skill::Woodcutting,
    Skill::Masonry,
    Skill::Construction,
    Skill::Carpentry,
];

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let catalog = match &args.catalog {
        Some(path) => JobCatalog::load_from_toml(path)?,
        None => JobCatalog::with_defaults(),
    };
    let mut config = match &args.config {
        Some(path) => LaborConfig::load_from_toml(path)?,
        None => LaborConfig::default(),
    };
    config.rng_seed = Some(seed.wrapping_add(1));
    let mut manager = JobManager::new(catalog, config)?;

    let mut population = spawn_population(args.population, &mut rng);
    let mut buildings = starting_buildings();
    let house = BuildingId(100);
    let mut construction = vec![ConstructionSite::new(house, 400.0)];

    let mut stock = ResourcePool::with_default_caps();
    stock.set(ResourceType::Food, 40.0);
    stock.set(ResourceType::Wood, 10.0);

    let mut calendar = Calendar::default();
    let mut finished_day = None;
    let mut total_released = 0;
    let mut total_assigned = 0;

    tracing::info!(
        "Village sim: {} days, {} villagers, seed {}",
        args.days,
        population.len(),
        seed
    );

    for _ in 0..args.days {
        let day = calendar.current_day();
        let season = calendar.current_season();

        total_released += manager.refresh_slots(&buildings, &mut population);
        let report = manager.run_allocation_cycle(&mut population, &stock, &construction);
        total_released += report.released;
        total_assigned += report.assigned;

        let mut delta: ResourceDelta = manager.daily_production(&population, season);
        let upkeep = population.living_count() as f32 * manager.config().food_upkeep_per_person;
        *delta.entry(ResourceType::Food).or_insert(0.0) -= upkeep;
        stock.apply_delta(&delta);

        // Builders work the active site
        let builders = manager.count_of_type(JobType::Builder) as f32;
        let work = builders * manager.config().builder_work_per_day;
        for site in construction.iter_mut() {
            site.remaining_work = (site.remaining_work - work).max(0.0);
        }
        if finished_day.is_none() && construction.iter().all(|s| s.remaining_work <= 0.0) {
            finished_day = Some(day);
            construction.clear();
            buildings.push(BuildingRecord::built(house, BuildingType::House));
            tracing::info!("Construction finished on day {}", day);
        }

        if args.verbose {
            eprintln!(
                "day {:>4} {:?}: food {:>6.1} wood {:>6.1} stone {:>6.1} planks {:>5.1} | assigned {} released {} idle {}",
                day,
                season,
                stock.get(ResourceType::Food),
                stock.get(ResourceType::Wood),
                stock.get(ResourceType::Stone),
                stock.get(ResourceType::Planks),
                report.assigned,
                report.released,
                report.idle_workers
            );
        }

        calendar.advance();
    }

    let summary = SimSummary {
        days: args.days,
        seed,
        population: population.living_count(),
        final_stock: ResourceType::ALL.iter().map(|r| (*r, stock.get(*r))).collect(),
        jobs: manager.ledger().job_counts(),
        construction_finished_day: finished_day,
        total_released,
        total_assigned,
    };

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        _ => print_text(&summary),
    }
    Ok(())
}

fn print_text(summary: &SimSummary) {
    println!("Village Summary");
    println!("===============");
    println!("Days: {} (seed {})", summary.days, summary.seed);
    println!("Population: {}", summary.population);
    match summary.construction_finished_day {
        Some(day) => println!("House finished on day {}", day),
        None => println!("House still under construction"),
    }
    println!("Assignments made: {}, releases: {}", summary.total_assigned, summary.total_released);
    println!();
    println!("Stock:");
    for (resource, amount) in &summary.final_stock {
        println!("  {:<8} {:>8.1}", resource, amount);
    }
    println!();
    println!("Jobs:");
    for (job, count) in &summary.jobs {
        println!("  {:<18} {:>3}", job, count);
    }
}

fn spawn_population(count: usize, rng: &mut ChaCha8Rng) -> Population {
    let mut population = Population::new();
    for i in 0..count {
        let id = WorkerId(i as u64);
        let age = rng.gen_range(8..72);
        let mut worker = Worker::new(id, format!("Villager {}", i + 1), age)
            .with_health(rng.gen_range(40.0..100.0))
            .with_happiness(rng.gen_range(50.0..100.0));
        if rng.gen_bool(0.6) {
            let skill = SKILLS[rng.gen_range(0..SKILLS.len())];
            worker = worker.with_skill(skill, rng.gen_range(50..1200));
        }
        population.insert(worker);
    }
    population
}

fn starting_buildings() -> Vec<BuildingRecord> {
    vec![
        BuildingRecord::built(BuildingId(1), BuildingType::Farm),
        BuildingRecord::built(BuildingId(2), BuildingType::WoodcutterLodge),
        BuildingRecord::built(BuildingId(3), BuildingType::Quarry),
        BuildingRecord::built(BuildingId(4), BuildingType::LumberMill),
        BuildingRecord::built(BuildingId(5), BuildingType::HuntingLodge),
        BuildingRecord::built(BuildingId(6), BuildingType::Library),
    ]
}
