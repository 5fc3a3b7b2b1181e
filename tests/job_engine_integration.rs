//! End-to-end behavior of the job engine through the JobManager facade

use dynasty_jobs::city::{BuildingRecord, BuildingType, ConstructionSite, ResourcePool, ResourceType};
use dynasty_jobs::core::{BuildingId, LaborConfig, Season, SiteId, WorkerId};
use dynasty_jobs::jobs::{
    AssignmentRejected, JobCatalog, JobManager, JobType, LedgerSnapshot, ReleaseRejected,
};
use dynasty_jobs::population::{Population, Skill, Worker, WorkerStatus};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn manager() -> JobManager {
    let config = LaborConfig {
        rng_seed: Some(12345),
        ..LaborConfig::default()
    };
    JobManager::new(JobCatalog::with_defaults(), config).expect("default config is valid")
}

fn building(id: u64, kind: BuildingType) -> BuildingRecord {
    BuildingRecord::built(BuildingId(id), kind)
}

fn site(id: u64) -> SiteId {
    SiteId::Building(BuildingId(id))
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

#[test]
fn test_farmer_production_follows_season() {
    let mut jobs = manager();
    let mut pop = Population::new();
    let farmer = pop.spawn("Ada", 30);
    jobs.refresh_slots(&[building(1, BuildingType::Farm)], &mut pop);
    jobs.assign(&mut pop, farmer, site(1), JobType::Farmer)
        .expect("farm has open slots");

    let summer = jobs.daily_production(&pop, Season::Summer);
    assert!(approx(summer[&ResourceType::Food], 5.625));

    let winter = jobs.daily_production(&pop, Season::Winter);
    assert!(approx(winter[&ResourceType::Food], 2.625));
}

#[test]
fn test_no_sawyers_while_wood_below_minimum() {
    let mut jobs = manager();
    let mut pop = Population::new();
    for i in 0..10 {
        pop.spawn(format!("W{i}"), 30);
    }
    jobs.refresh_slots(&[building(1, BuildingType::LumberMill)], &mut pop);

    let mut stock = ResourcePool::with_default_caps();
    stock.set(ResourceType::Food, 200.0);
    stock.set(ResourceType::Wood, 2.0);

    jobs.run_allocation_cycle(&mut pop, &stock, &[]);
    assert_eq!(jobs.count_of_type(JobType::Sawyer), 0);

    // Same village with enough wood does staff the mill
    stock.set(ResourceType::Wood, 100.0);
    jobs.run_allocation_cycle(&mut pop, &stock, &[]);
    assert!(jobs.count_of_type(JobType::Sawyer) > 0);
}

#[test]
fn test_famine_fills_farm_first() {
    let mut jobs = manager();
    let mut pop = Population::new();
    let ids: Vec<WorkerId> = (0..10).map(|i| pop.spawn(format!("W{i}"), 30)).collect();
    jobs.refresh_slots(
        &[
            building(1, BuildingType::Farm),
            building(2, BuildingType::Quarry),
            building(3, BuildingType::Library),
        ],
        &mut pop,
    );

    let mut stock = ResourcePool::with_default_caps();
    stock.set(ResourceType::Food, 5.0);
    assert!(jobs.estimate_needs(&stock, &pop).food() > 2.0);

    // One free worker: it must go to the farm
    for id in &ids[1..] {
        pop.get_mut(*id).expect("exists").status = WorkerStatus::Away;
    }
    jobs.auto_assign(&mut pop, &stock, &[]);
    assert_eq!(jobs.count_of_type(JobType::Farmer), 1);
    assert_eq!(jobs.total_assigned(), 1);
    assert_eq!(jobs.assignment_of(ids[0]).map(|a| a.site), Some(site(1)));
}

#[test]
fn test_famine_cycles_settle_without_churn() {
    let mut jobs = manager();
    let mut pop = Population::new();
    for i in 0..4 {
        pop.spawn(format!("W{i}"), 30);
    }
    jobs.refresh_slots(&[building(1, BuildingType::Library)], &mut pop);
    let stock = ResourcePool::with_default_caps();

    let first = jobs.run_allocation_cycle(&mut pop, &stock, &[]);
    assert_eq!(jobs.count_of_type(JobType::Scholar), 0);
    assert_eq!(first.assigned, jobs.total_assigned());

    for _ in 0..2 {
        let report = jobs.run_allocation_cycle(&mut pop, &stock, &[]);
        assert_eq!(report.released, 0);
        assert_eq!(report.assigned, 0);
        assert_eq!(jobs.count_of_type(JobType::Scholar), 0);
    }
}

#[test]
fn test_dead_worker_stops_producing_before_refresh() {
    let mut jobs = manager();
    let mut pop = Population::new();
    let farmer = pop.spawn("Ada", 30);
    jobs.refresh_slots(&[building(1, BuildingType::Farm)], &mut pop);
    jobs.assign(&mut pop, farmer, site(1), JobType::Farmer)
        .expect("farm has open slots");
    pop.get_mut(farmer).expect("exists").status = WorkerStatus::Dead;

    let delta = jobs.daily_production(&pop, Season::Summer);
    assert_eq!(delta.get(&ResourceType::Food), None);
    let breakdown = jobs.production_breakdown(&pop, Season::Summer);
    assert!(approx(breakdown.net(ResourceType::Food), 0.0));
}

#[test]
fn test_best_fit_worker_takes_farm_slot() {
    let mut pop = Population::new();
    let smith = pop.insert(Worker::new(WorkerId(1), "Smith", 30).with_skill(Skill::Smithing, 1000));
    let farmer = pop.insert(Worker::new(WorkerId(2), "Farmer", 30).with_skill(Skill::Farming, 1000));

    // A level-1 farm scaled down to a single slot
    let mut catalog = JobCatalog::new();
    for spec in JobCatalog::with_defaults().jobs_for_building(BuildingType::Farm) {
        let mut spec = spec.clone();
        spec.base_slots = 1.0;
        catalog.add(spec).expect("unique");
    }
    let config = LaborConfig {
        global_builder_slots: 0,
        global_gatherer_slots: 0,
        ..LaborConfig::default()
    };
    let mut single = JobManager::new(catalog, config).expect("valid");
    single.refresh_slots(&[building(1, BuildingType::Farm)], &mut pop);
    assert_eq!(single.total_capacity(), 1);

    let stock = ResourcePool::with_default_caps();
    assert_eq!(single.auto_assign(&mut pop, &stock, &[]), 1);
    assert_eq!(single.assignment_of(farmer).map(|a| a.job), Some(JobType::Farmer));
    assert_eq!(single.assignment_of(smith), None);
}

#[test]
fn test_optimize_releases_builders_without_construction() {
    let mut jobs = manager();
    let mut pop = Population::new();
    let builder = pop.spawn("Bob", 30);
    jobs.assign(&mut pop, builder, SiteId::Global, JobType::Builder)
        .expect("global builder slot");

    let stock = ResourcePool::with_default_caps();
    let released = jobs.optimize(&mut pop, &stock, &[]);

    assert_eq!(released, 1);
    assert_eq!(jobs.count_of_type(JobType::Builder), 0);
    let worker = pop.get(builder).expect("exists");
    assert_eq!(worker.status, WorkerStatus::Idle);
    assert_eq!(worker.assignment(), None);
}

#[test]
fn test_builders_staffed_while_construction_active() {
    let mut jobs = manager();
    let mut pop = Population::new();
    for i in 0..8 {
        pop.spawn(format!("W{i}"), 30);
    }
    let mut stock = ResourcePool::with_default_caps();
    stock.set(ResourceType::Food, 200.0);
    // 500 work over 7 days at 10/day needs 8 builders; only 4 global slots
    let sites = [ConstructionSite::new(BuildingId(50), 500.0)];

    jobs.run_allocation_cycle(&mut pop, &stock, &sites);
    assert_eq!(jobs.count_of_type(JobType::Builder), 4);

    // Site finished: next cycle frees them
    let report = jobs.run_allocation_cycle(&mut pop, &stock, &[]);
    assert_eq!(jobs.count_of_type(JobType::Builder), 0);
    assert!(report.released >= 4);
}

#[test]
fn test_gatherer_draws_are_uniform() {
    let mut jobs = manager();
    let mut pop = Population::new();
    let gatherer = pop.spawn("Gil", 30);
    jobs.assign(&mut pop, gatherer, SiteId::Global, JobType::Gatherer)
        .expect("global gatherer slot");

    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let trials = 10_000;
    let mut counts = [0usize; 3];
    for _ in 0..trials {
        // Autumn: food x1.1, wood and stone x1.0
        let out = jobs.daily_production_with(&pop, Season::Autumn, &mut rng);
        assert_eq!(out.len(), 1, "exactly one resource per worker-day");
        let (resource, amount) = out.iter().next().expect("one entry");
        match resource {
            ResourceType::Food => {
                assert!(approx(*amount, 1.1));
                counts[0] += 1;
            }
            ResourceType::Wood => {
                assert!(approx(*amount, 1.0));
                counts[1] += 1;
            }
            ResourceType::Stone => {
                assert!(approx(*amount, 1.0));
                counts[2] += 1;
            }
            other => panic!("gatherer produced {other}"),
        }
    }

    // Expected 3333 each; 5 sigma is about 236
    for count in counts {
        assert!((3100..=3570).contains(&count), "count {count} out of tolerance");
    }
}

#[test]
fn test_release_twice_leaves_ledger_unchanged() {
    let mut jobs = manager();
    let mut pop = Population::new();
    let a = pop.spawn("A", 30);
    let b = pop.spawn("B", 30);
    jobs.assign(&mut pop, a, SiteId::Global, JobType::Gatherer).expect("slot");
    jobs.assign(&mut pop, b, SiteId::Global, JobType::Gatherer).expect("slot");

    assert!(jobs.release(&mut pop, a).is_ok());
    let before = jobs.snapshot();
    assert_eq!(jobs.release(&mut pop, a), Err(ReleaseRejected::NotAssigned(a)));
    assert_eq!(jobs.snapshot(), before);
    assert_eq!(jobs.total_assigned(), 1);
}

#[test]
fn test_assignment_rejections_keep_slot_open() {
    let mut jobs = manager();
    let mut pop = Population::new();
    let a = pop.spawn("A", 30);
    jobs.assign(&mut pop, a, SiteId::Global, JobType::Builder).expect("slot");

    assert_eq!(
        jobs.assign(&mut pop, a, SiteId::Global, JobType::Gatherer),
        Err(AssignmentRejected::AlreadyAssigned(a))
    );
    assert_eq!(
        jobs.assign(&mut pop, a, site(9), JobType::Farmer),
        Err(AssignmentRejected::UnknownSlot {
            site: site(9),
            job: JobType::Farmer
        })
    );
    let gatherer_open = jobs
        .open_slots()
        .into_iter()
        .find(|s| s.job == JobType::Gatherer)
        .expect("gatherer slots");
    assert_eq!(gatherer_open.available, 2);
}

#[test]
fn test_snapshot_round_trip_through_json() {
    let buildings = [
        building(1, BuildingType::Farm),
        building(2, BuildingType::Quarry),
    ];
    let mut jobs = manager();
    let mut pop = Population::new();
    for i in 0..9 {
        pop.spawn(format!("W{i}"), 20 + i);
    }
    jobs.refresh_slots(&buildings, &mut pop);
    let stock = ResourcePool::with_default_caps();
    jobs.run_allocation_cycle(&mut pop, &stock, &[]);
    assert!(jobs.total_assigned() > 0);

    let json = jobs.snapshot().to_json().expect("serialize");
    let snapshot = LedgerSnapshot::from_json(&json).expect("deserialize");

    let mut restored = manager();
    restored.refresh_slots(&buildings, &mut pop);
    restored.restore(&snapshot, &mut pop).expect("restore");

    assert_eq!(restored.open_slots(), jobs.open_slots());
    for worker in pop.iter() {
        assert_eq!(restored.assignment_of(worker.id), jobs.assignment_of(worker.id));
        assert_eq!(worker.assignment(), jobs.assignment_of(worker.id));
    }
}

#[test]
fn test_downgrade_releases_excess_immediately() {
    let mut jobs = manager();
    let mut pop = Population::new();
    let ids: Vec<WorkerId> = (0..8).map(|i| pop.spawn(format!("W{i}"), 30)).collect();
    let farm = building(1, BuildingType::Farm).with_level(2);
    jobs.refresh_slots(&[farm], &mut pop);
    for id in &ids {
        jobs.assign(&mut pop, *id, site(1), JobType::Farmer).expect("8 slots");
    }

    let released = jobs.refresh_slots(&[farm.with_level(1)], &mut pop);
    assert_eq!(released, 4);
    assert_eq!(jobs.count_of_type(JobType::Farmer), 4);
    for id in &ids[4..] {
        assert_eq!(pop.get(*id).map(|w| w.status), Some(WorkerStatus::Idle));
    }
}

#[test]
fn test_dead_worker_pruned_on_refresh() {
    let mut jobs = manager();
    let mut pop = Population::new();
    let a = pop.spawn("A", 30);
    jobs.assign(&mut pop, a, SiteId::Global, JobType::Gatherer).expect("slot");

    pop.get_mut(a).expect("exists").status = WorkerStatus::Dead;
    assert_eq!(jobs.refresh_slots(&[], &mut pop), 1);
    assert_eq!(jobs.total_assigned(), 0);
    assert_eq!(pop.get(a).map(|w| w.status), Some(WorkerStatus::Dead));
}

#[test]
fn test_breakdown_reports_upkeep() {
    let mut jobs = manager();
    let mut pop = Population::new();
    let farmer = pop.spawn("Ada", 30);
    pop.spawn("Kid", 6);
    jobs.refresh_slots(&[building(1, BuildingType::Farm)], &mut pop);
    jobs.assign(&mut pop, farmer, site(1), JobType::Farmer).expect("slot");

    let breakdown = jobs.production_breakdown(&pop, Season::Summer);
    assert!(approx(breakdown.totals[&ResourceType::Food], 5.625));
    assert!(approx(breakdown.net(ResourceType::Food), 5.625 - 2.0));
}

#[test]
fn test_load_engine_from_data_files() {
    let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    let jobs = JobManager::load(&root.join("data/jobs.toml"), &root.join("data/labor.toml"))
        .expect("bundled data loads");
    assert_eq!(jobs.catalog().len(), JobType::ALL.len());
    assert_eq!(jobs.config().global_builder_slots, 4);
}
