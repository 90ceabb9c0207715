//! Scenario harness tests
//!
//! Load the shipped scenario, run it through the routine and pin the
//! decision trace: one deterministic pass through every ladder group.

use std::path::PathBuf;

use wildmend::sim::{self, IssuedAction, Scenario};
use wildmend::Routine;

fn asset(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("assets/scenarios")
        .join(name)
}

#[test]
fn test_dungeon_pull_scenario_loads() {
    let scenario = Scenario::load(&asset("dungeon_pull.ron")).expect("scenario parses");
    assert_eq!(scenario.name, "dungeon pull");
    assert_eq!(scenario.ticks.len(), 10);
}

#[test]
fn test_dungeon_pull_decision_trace() {
    let scenario = Scenario::load(&asset("dungeon_pull.ron")).unwrap();
    let routine = Routine::restoration().unwrap();
    let (report, _log) = sim::run(&routine, &scenario);

    let trace: Vec<String> = report
        .ticks
        .iter()
        .map(|t| match (&t.group, &t.rule) {
            (Some(group), Some(rule)) => format!("{group}/{rule}"),
            _ => "idle".to_string(),
        })
        .collect();

    assert_eq!(
        trace,
        vec![
            "upkeep/mark-of-the-wild",
            "steady-state/cenarion-ward",
            "steady-state/lifebloom-tank",
            "steady-state/adaptive-swarm-wounded",
            "steady-state/rejuvenation-missing",
            "emergency-defense/defense-bear-form",
            "abort/cancel-filler-in-crisis",
            "utility/dispel",
            "steady-state/moonfire-spread",
            "fallback-damage/sunfire-refresh",
        ]
    );

    // The pre-pull buff goes out as a self-cast covering the group.
    assert_eq!(
        report.ticks[0].actions,
        vec![IssuedAction::CastOnSelf { name: "Mark of the Wild".to_string() }]
    );
    // The crisis tick cancels, it does not cast.
    assert_eq!(report.ticks[6].actions, vec![IssuedAction::CancelCast]);
    // Every tick in this scenario issues exactly one action.
    assert!(report.ticks.iter().all(|t| t.actions.len() == 1));
}

#[test]
fn test_scenario_runs_are_reproducible() {
    let scenario = Scenario::load(&asset("dungeon_pull.ron")).unwrap();
    let routine = Routine::restoration().unwrap();

    let (first, _) = sim::run(&routine, &scenario);
    let (second, _) = sim::run(&routine, &scenario);

    let encode = |report: &sim::RunReport| serde_json::to_string(report).unwrap();
    assert_eq!(encode(&first), encode(&second));
}
