//! Critter Headless Simulation Harness
//!
//! Drives the pet engine through scripted scenarios and a seeded random
//! sweep, checking every stat and social-graph invariant along the way.
//! Runs entirely in-process: no storage backend, no networking, no UI.
//!
//! Usage:
//!   cargo run -p critter-simtest
//!   cargo run -p critter-simtest -- --verbose
//!   cargo run -p critter-simtest -- --seed 42 --config tuning.json

use std::collections::BTreeSet;
use std::sync::Arc;

use critter_core::prelude::*;
use critter_logic::config::{validate_config, EngineConfig};
use critter_logic::energy::Energy;
use critter_logic::leveling::xp_threshold;
use critter_logic::status::Mood;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ── Shipped engine configuration ────────────────────────────────────────
const CONFIG_JSON: &str = include_str!("../../../data/engine_config.json");

const DEFAULT_SEED: u64 = 0x5EED;
const SWEEP_STEPS: usize = 5_000;
const OWNERS: [&str; 4] = ["alice", "bob", "carol", "dave"];

type Engine = PetEngine<Arc<ManualClock>, LedgerPayments>;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

struct Options {
    verbose: bool,
    seed: u64,
    config_path: Option<String>,
}

fn parse_args() -> Options {
    let args: Vec<String> = std::env::args().collect();
    let value_after = |flag: &str| {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .cloned()
    };
    Options {
        verbose: args.iter().any(|a| a == "--verbose"),
        seed: value_after("--seed")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SEED),
        config_path: value_after("--config"),
    }
}

fn main() {
    let options = parse_args();
    println!("=== Critter Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Configuration
    let config = match load_config(&options, &mut results) {
        Some(config) => config,
        None => EngineConfig::default(),
    };

    // 2. Lifecycle & defaults
    results.extend(validate_lifecycle(&config, options.verbose));

    // 3. Activity scheduling
    results.extend(validate_activities(&config, options.verbose));

    // 4. Hunger & feeding
    results.extend(validate_feeding(&config, options.verbose));

    // 5. Leveling curve
    results.extend(validate_leveling(options.verbose));

    // 6. Social graph
    results.extend(validate_social(&config, options.verbose));

    // 7. Snapshot round trip
    results.extend(validate_snapshot(&config, options.verbose));

    // 8. Randomized sweep
    results.extend(random_sweep(&config, options.seed, options.verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || options.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn new_engine(config: &EngineConfig) -> Option<(Engine, Arc<ManualClock>)> {
    let clock = Arc::new(ManualClock::new(0));
    PetEngine::with_config(Arc::clone(&clock), LedgerPayments::new(), config.clone())
        .ok()
        .map(|engine| (engine, clock))
}

fn check(results: &mut Vec<TestResult>, name: &str, passed: bool, detail: String) {
    results.push(TestResult {
        name: name.into(),
        passed,
        detail,
    });
}

/// Create a pet, recording a failed check if the engine refuses.
fn adopt(engine: &mut Engine, owner: &Identity, results: &mut Vec<TestResult>) -> Option<PetId> {
    match engine.create(owner.clone()) {
        Ok(id) => Some(id),
        Err(err) => {
            check(results, "create_pet", false, err.to_string());
            None
        }
    }
}

// ── 1. Configuration ────────────────────────────────────────────────────

fn load_config(options: &Options, results: &mut Vec<TestResult>) -> Option<EngineConfig> {
    println!("--- Configuration ---");

    let shipped = EngineConfig::from_json_str(CONFIG_JSON);
    check(
        results,
        "config_shipped_matches_defaults",
        matches!(&shipped, Ok(c) if *c == EngineConfig::default()),
        "data/engine_config.json parses to the built-in defaults".into(),
    );

    let config = match &options.config_path {
        Some(path) => {
            let parsed = std::fs::read_to_string(path)
                .map_err(|e| e.to_string())
                .and_then(|json| EngineConfig::from_json_str(&json).map_err(|e| e.to_string()));
            match parsed {
                Ok(config) => config,
                Err(e) => {
                    check(results, "config_load", false, format!("{}: {}", path, e));
                    return None;
                }
            }
        }
        None => shipped.unwrap_or_default(),
    };

    let errors = validate_config(&config);
    check(
        results,
        "config_valid",
        errors.is_empty(),
        if errors.is_empty() {
            format!("hunger window {} ticks", config.hunger_window)
        } else {
            format!("{:?}", errors)
        },
    );
    if errors.is_empty() {
        Some(config)
    } else {
        None
    }
}

// ── 2. Lifecycle ────────────────────────────────────────────────────────

fn validate_lifecycle(config: &EngineConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Lifecycle ---");
    let mut results = Vec::new();
    let Some((mut engine, _clock)) = new_engine(config) else {
        check(&mut results, "lifecycle_engine", false, "config rejected".into());
        return results;
    };
    let alice = Identity::new("alice");

    let first = engine.create(alice.clone());
    let second = engine.create(alice.clone());
    check(
        &mut results,
        "lifecycle_ids_start_at_one",
        first == Ok(PetId(1)) && second == Ok(PetId(2)),
        format!("issued {:?} and {:?}", first, second),
    );
    let (Ok(first), Ok(second)) = (first, second) else {
        return results;
    };

    let view = engine.get_attributes(first);
    let defaults_ok = view.as_ref().is_ok_and(|v| {
        let s = &v.record.state;
        s.vitals.energy == Energy::MAX
            && s.vitals.health == 100
            && s.vitals.nutrition == config.baseline_nutrition
            && s.progress.level == 1
            && s.progress.xp == 0
            && !s.is_busy()
            && v.status.mood == Mood::Happy
            && v.status.happiness == 100
    });
    check(
        &mut results,
        "lifecycle_newborn_defaults",
        defaults_ok,
        "energy=max health=100 level=1 idle happy".into(),
    );

    let stranger = engine.destroy(first, &Identity::new("mallory"));
    let destroyed = engine.destroy(first, &alice);
    let third = engine.create(alice.clone());
    check(
        &mut results,
        "lifecycle_destroy_owner_only",
        matches!(stranger, Err(PetError::Unauthorized { .. })) && destroyed.is_ok(),
        "non-owner refused, owner allowed".into(),
    );
    check(
        &mut results,
        "lifecycle_ids_not_reused",
        third == Ok(PetId(3)) && engine.len() == 2,
        format!("next id {:?} with {} live pets", third, engine.len()),
    );

    if verbose {
        if let Ok(v) = engine.get_attributes(second) {
            println!("  newborn status: {:?}", v.status);
        }
    }

    results
}

// ── 3. Activities ───────────────────────────────────────────────────────

fn validate_activities(config: &EngineConfig, _verbose: bool) -> Vec<TestResult> {
    println!("--- Activity Scheduling ---");
    let mut results = Vec::new();
    let Some((mut engine, clock)) = new_engine(config) else {
        return results;
    };
    let alice = Identity::new("alice");
    let Some(pet) = adopt(&mut engine, &alice, &mut results) else {
        return results;
    };

    let started = engine.put_to_work(pet, &alice, 50).is_ok();
    clock.advance(10);
    let conflict = engine.put_to_work(pet, &alice, 5);
    check(
        &mut results,
        "activity_conflict_while_busy",
        started && matches!(conflict, Err(PetError::Conflict { free_at: 50, .. })),
        format!("{:?}", conflict.err()),
    );

    clock.set(50);
    let restarted = engine.put_to_work(pet, &alice, 5);
    let resolved_first = restarted.as_ref().is_ok_and(|p| {
        p.state.vitals.energy < Energy::MAX
            && p.state.progress.level > 1
            && p.state.activity.is_some_and(|a| a.started_at == 50)
    });
    check(
        &mut results,
        "activity_resolves_before_restart",
        resolved_first,
        "prior work settled, new work starts at tick 50".into(),
    );

    let zero = engine.put_to_sleep(pet, &alice, 0);
    check(
        &mut results,
        "activity_zero_duration_invalid",
        matches!(zero, Err(PetError::InvalidRequest(_))),
        "zero-tick activity rejected".into(),
    );

    let stranger = engine.put_to_sleep(pet, &Identity::new("mallory"), 5);
    check(
        &mut results,
        "activity_owner_only",
        matches!(stranger, Err(PetError::Unauthorized { .. })),
        "non-owner refused".into(),
    );

    clock.advance(5);
    let first = engine.resolve(pet);
    let again = engine.resolve(pet);
    check(
        &mut results,
        "activity_resolve_idempotent",
        matches!(first, Ok(Some(_))) && matches!(again, Ok(None)),
        "second resolve is a no-op".into(),
    );

    results
}

// ── 4. Feeding ──────────────────────────────────────────────────────────

fn validate_feeding(config: &EngineConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Hunger & Feeding ---");
    let mut results = Vec::new();
    let Some((mut engine, clock)) = new_engine(config) else {
        return results;
    };
    let alice = Identity::new("alice");
    engine.payments_mut().deposit(&alice, 100);
    let Some(pet) = adopt(&mut engine, &alice, &mut results) else {
        return results;
    };

    clock.advance(config.hunger_window);
    let starving = engine.put_to_sleep(pet, &alice, 10);
    check(
        &mut results,
        "feeding_starvation_blocks_sleep",
        matches!(starving, Err(PetError::Starvation { .. })),
        format!("at tick {}", clock.current_tick()),
    );

    let meal = engine.feed(pet, &alice, 10);
    let now = clock.current_tick();
    check(
        &mut results,
        "feeding_renews_hunger",
        meal.as_ref().is_ok_and(|p| {
            p.state.hunger.hungry_at == now + config.hunger_window
                && p.state.vitals.nutrition == config.baseline_nutrition + 10
        }),
        format!("hungry again at {}", now + config.hunger_window),
    );

    check(
        &mut results,
        "feeding_unblocks_sleep",
        engine.put_to_sleep(pet, &alice, 10).is_ok(),
        "fed pet may sleep".into(),
    );

    let busy = engine.feed(pet, &alice, 1);
    check(
        &mut results,
        "feeding_refused_while_busy",
        matches!(busy, Err(PetError::Conflict { .. })) && engine.payments().balance_of(&alice) == 90,
        "no charge for a refused meal".into(),
    );

    clock.advance(10);
    let broke = engine.feed(pet, &alice, 1_000);
    check(
        &mut results,
        "feeding_payment_denied",
        matches!(broke, Err(PetError::PaymentDenied { .. })),
        "meal costing more than the balance is refused".into(),
    );

    clock.advance(config.hunger_window);
    let empty = engine.feed(pet, &alice, 0).is_ok();
    check(
        &mut results,
        "feeding_empty_meal_renews_hunger",
        empty && engine.put_to_sleep(pet, &alice, 1).is_ok(),
        "a zero-unit meal still ends starvation".into(),
    );

    if verbose {
        println!(
            "  ledger collected {} units, alice holds {}",
            engine.payments().collected(),
            engine.payments().balance_of(&alice)
        );
    }

    results
}

// ── 5. Leveling ─────────────────────────────────────────────────────────

fn validate_leveling(verbose: bool) -> Vec<TestResult> {
    println!("--- Leveling ---");
    let mut results = Vec::new();

    let doubling = (1..20).all(|l| xp_threshold(l).map(|t| t * 2) == xp_threshold(l + 1));
    check(
        &mut results,
        "leveling_threshold_doubles",
        doubling && xp_threshold(1) == Some(2),
        "threshold(level) = 2^level".into(),
    );
    check(
        &mut results,
        "leveling_top_is_unreachable",
        xp_threshold(64).is_none(),
        "2^64 does not fit, level 64 is terminal".into(),
    );

    let Some((mut engine, clock)) = new_engine(&EngineConfig::default()) else {
        return results;
    };
    let alice = Identity::new("alice");
    let Some(pet) = adopt(&mut engine, &alice, &mut results) else {
        return results;
    };
    let slept = engine.put_to_sleep(pet, &alice, 6).is_ok();
    clock.advance(6);
    let level = engine
        .get_attributes(pet)
        .map(|v| v.record.state.progress.level)
        .unwrap_or(0);
    check(
        &mut results,
        "leveling_six_tick_nap",
        slept && level == 2,
        format!("level {} after sleeping 6 ticks", level),
    );

    if verbose {
        for l in 1..=5 {
            println!("    level {:2}: {:?} xp to advance", l, xp_threshold(l));
        }
    }

    results
}

// ── 6. Social ───────────────────────────────────────────────────────────

fn validate_social(config: &EngineConfig, _verbose: bool) -> Vec<TestResult> {
    println!("--- Social Graph ---");
    let mut results = Vec::new();
    let Some((mut engine, _clock)) = new_engine(config) else {
        return results;
    };
    let alice = Identity::new("alice");
    let bob = Identity::new("bob");
    let Some(e1) = adopt(&mut engine, &alice, &mut results) else {
        return results;
    };
    let Some(e2) = adopt(&mut engine, &bob, &mut results) else {
        return results;
    };
    let Some(e3) = adopt(&mut engine, &bob, &mut results) else {
        return results;
    };

    let requested = engine.add_fren(e1, e2, &alice).is_ok();
    let pending = engine.get_potential_frens(e2).unwrap_or_default();
    check(
        &mut results,
        "social_request_pending",
        requested && pending == vec![e1],
        format!("pending for {}: {:?}", e2, pending),
    );

    let accepted = engine.accept_fren(e2, &bob, e1).is_ok();
    let mutual = engine.get_frens(e1).unwrap_or_default() == vec![e2]
        && engine.get_frens(e2).unwrap_or_default() == vec![e1];
    check(
        &mut results,
        "social_accept_mutual",
        accepted && mutual && engine.get_potential_frens(e2).is_ok_and(|p| p.is_empty()),
        "edge on both sides, request cleared".into(),
    );

    let declined = engine.add_fren(e3, e1, &bob).is_ok() && engine.decline_fren(e1, &alice, e3).is_ok();
    check(
        &mut results,
        "social_decline_no_edge",
        declined && !engine.get_frens(e1).unwrap_or_default().contains(&e3),
        "declined request leaves frens unchanged".into(),
    );

    let duplicate = engine.add_fren(e1, e2, &alice);
    let selfish = engine.add_fren(e1, e1, &alice);
    check(
        &mut results,
        "social_rejects_bad_requests",
        matches!(duplicate, Err(PetError::InvalidRequest(_)))
            && matches!(selfish, Err(PetError::InvalidRequest(_))),
        "existing frens and self requests refused".into(),
    );

    let destroyed = engine.destroy(e2, &bob).is_ok();
    check(
        &mut results,
        "social_destroy_cascades",
        destroyed && engine.get_frens(e1).is_ok_and(|f| f.is_empty()),
        "destroyed pet vanishes from fren lists".into(),
    );

    results
}

// ── 7. Snapshot ─────────────────────────────────────────────────────────

fn validate_snapshot(config: &EngineConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Snapshot ---");
    let mut results = Vec::new();
    let Some((mut engine, clock)) = new_engine(config) else {
        return results;
    };
    let alice = Identity::new("alice");
    let bob = Identity::new("bob");
    let Some(a) = adopt(&mut engine, &alice, &mut results) else {
        return results;
    };
    let Some(b) = adopt(&mut engine, &bob, &mut results) else {
        return results;
    };
    let worked = engine.put_to_work(a, &alice, 25);
    let requested = engine.add_fren(b, a, &bob);
    clock.advance(7);

    let mut bytes = Vec::new();
    let saved = engine.save(&mut bytes);
    let before = engine.store().records().ok();

    let Some((mut restored, _)) = new_engine(config) else {
        return results;
    };
    let loaded = restored.load(&bytes[..]);
    check(
        &mut results,
        "snapshot_round_trip",
        worked.is_ok()
            && requested.is_ok()
            && saved.is_ok()
            && matches!(loaded, Ok(7))
            && before.is_some()
            && restored.store().records().ok() == before
            && restored.last_id() == engine.last_id(),
        format!("{} bytes", bytes.len()),
    );

    let corrupt = restored.load(&bytes[..bytes.len() / 2]);
    check(
        &mut results,
        "snapshot_corrupt_rejected",
        corrupt.is_err() && restored.len() == 2,
        "truncated snapshot refused, store kept".into(),
    );

    if verbose {
        println!("  snapshot of {} pets is {} bytes", engine.len(), bytes.len());
    }

    results
}

// ── 8. Randomized sweep ─────────────────────────────────────────────────

#[derive(Default)]
struct SweepStats {
    ops: usize,
    accepted: usize,
    rejected: usize,
    unchanged_on_failure: bool,
    violations: Vec<String>,
}

fn random_sweep(config: &EngineConfig, seed: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Randomized Sweep (seed {}) ---", seed);
    let mut results = Vec::new();
    let Some((mut engine, clock)) = new_engine(config) else {
        return results;
    };
    let mut rng = StdRng::seed_from_u64(seed);
    for owner in OWNERS {
        engine.payments_mut().deposit(&Identity::new(owner), 5_000);
    }

    let mut stats = SweepStats {
        unchanged_on_failure: true,
        ..SweepStats::default()
    };
    let mut rejections = [0usize; 6];

    for step in 0..SWEEP_STEPS {
        let before = engine.store().records().ok();
        let outcome = random_op(&mut engine, &clock, &mut rng, config);
        stats.ops += 1;

        match outcome {
            Ok(()) => stats.accepted += 1,
            Err(err) => {
                stats.rejected += 1;
                rejections[error_slot(&err)] += 1;
                if engine.store().records().ok() != before {
                    stats.unchanged_on_failure = false;
                    stats.violations.push(format!("step {}: {} mutated the store", step, err));
                }
            }
        }

        if let Err(violation) = check_invariants(&engine) {
            stats.violations.push(format!("step {}: {}", step, violation));
        }
        if stats.violations.len() > 10 {
            break;
        }
    }

    check(
        &mut results,
        "sweep_invariants_hold",
        stats.violations.is_empty(),
        if stats.violations.is_empty() {
            format!(
                "{} ops, {} accepted, {} rejected, {} live pets",
                stats.ops,
                stats.accepted,
                stats.rejected,
                engine.len()
            )
        } else {
            stats.violations.join("; ")
        },
    );
    check(
        &mut results,
        "sweep_failures_are_atomic",
        stats.unchanged_on_failure,
        "every rejected op left the store untouched".into(),
    );
    check(
        &mut results,
        "sweep_exercised_both_paths",
        stats.accepted > 0 && stats.rejected > 0,
        format!("{} accepted / {} rejected", stats.accepted, stats.rejected),
    );

    if verbose {
        let labels = [
            "unauthorized",
            "conflict",
            "starvation",
            "payment",
            "not_found",
            "invalid",
        ];
        println!("  Rejections by kind:");
        for (label, count) in labels.iter().zip(rejections) {
            println!("    {:12}: {}", label, count);
        }
        println!("  Final tick {}", clock.current_tick());
    }

    results
}

fn random_op(
    engine: &mut Engine,
    clock: &ManualClock,
    rng: &mut StdRng,
    config: &EngineConfig,
) -> Result<(), PetError> {
    let caller = Identity::new(OWNERS[rng.gen_range(0..OWNERS.len())]);
    let upper = engine.last_id().max(1) + 1;
    let pet = PetId(rng.gen_range(1..=upper));
    let other = PetId(rng.gen_range(1..=upper));

    match rng.gen_range(0..12) {
        0 => engine.create(caller).map(|_| ()),
        1 => engine.destroy(pet, &caller).map(|_| ()),
        2 | 3 => engine
            .put_to_sleep(pet, &caller, rng.gen_range(0..500))
            .map(|_| ()),
        4 | 5 => engine
            .put_to_work(pet, &caller, rng.gen_range(0..500))
            .map(|_| ()),
        6 => engine.feed(pet, &caller, rng.gen_range(0..60)).map(|_| ()),
        7 => engine.add_fren(pet, other, &caller),
        8 => engine.accept_fren(pet, &caller, other),
        9 => {
            if rng.gen_bool(0.5) {
                engine.decline_fren(pet, &caller, other)
            } else {
                engine.remove_fren(pet, &caller, other)
            }
        }
        10 => engine.resolve(pet).map(|_| ()),
        _ => {
            let ticks = if rng.gen_bool(0.05) {
                config.hunger_window
            } else {
                rng.gen_range(0..200)
            };
            clock.advance(ticks);
            Ok(())
        }
    }
}

fn error_slot(err: &PetError) -> usize {
    match err {
        PetError::Unauthorized { .. } => 0,
        PetError::Conflict { .. } => 1,
        PetError::Starvation { .. } => 2,
        PetError::PaymentDenied { .. } => 3,
        PetError::NotFound(_) => 4,
        PetError::InvalidRequest(_) => 5,
    }
}

fn check_invariants(engine: &Engine) -> Result<(), String> {
    let records = engine.store().records().map_err(|e| e.to_string())?;
    let live: BTreeSet<PetId> = records.iter().map(|r| r.id).collect();

    for pet in &records {
        let vitals = &pet.state.vitals;
        if vitals.health > 100 || vitals.energy > Energy::MAX {
            return Err(format!("pet {} out of bounds: {:?}", pet.id, vitals));
        }
        let progress = &pet.state.progress;
        if progress.level == 0 || xp_threshold(progress.level).is_some_and(|t| progress.xp >= t) {
            return Err(format!("pet {} has unresolved xp: {:?}", pet.id, progress));
        }
        for fren in &pet.frens.frens {
            let symmetric = records
                .iter()
                .any(|r| r.id == *fren && r.frens.is_fren(pet.id));
            if !symmetric {
                return Err(format!("edge {} -> {} is one-sided", pet.id, fren));
            }
        }
        let unique: BTreeSet<PetId> = pet.frens.potential.iter().copied().collect();
        let clean = unique.len() == pet.frens.potential.len()
            && !unique.contains(&pet.id)
            && unique.iter().all(|p| live.contains(p) && !pet.frens.is_fren(*p));
        if !clean {
            return Err(format!("pet {} has a bad request list", pet.id));
        }
    }
    Ok(())
}
