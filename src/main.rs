//! Wildmend - Reactive Support-Routine Decision Engine
//!
//! Headless entry point: load a scenario, run the restoration routine over
//! it tick by tick, print the decision trace and optionally save a JSON
//! report.

use tracing_subscriber::EnvFilter;

use wildmend::cli;
use wildmend::sim::{self, Scenario};
use wildmend::Routine;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = cli::parse_args();

    let mut scenario = match Scenario::load(&args.scenario) {
        Ok(scenario) => scenario,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    if let Some(limit) = args.ticks {
        scenario.ticks.truncate(limit);
    }

    let routine = match Routine::restoration() {
        Ok(routine) => routine,
        Err(e) => {
            eprintln!("error: invalid catalog configuration: {e}");
            std::process::exit(1);
        }
    };

    println!("Running scenario '{}' ({} ticks)...", scenario.name, scenario.ticks.len());
    if !scenario.description.is_empty() {
        println!("  {}", scenario.description);
    }

    let (report, log) = sim::run(&routine, &scenario);

    for entry in &log.entries {
        println!("[{:>3}] {:?}: {}", entry.tick, entry.event_type, entry.message);
    }
    println!(
        "Scenario complete: {}/{} ticks issued an action.",
        report.active_ticks(),
        report.ticks.len()
    );

    if let Some(path) = args.report {
        match report.save(&path) {
            Ok(()) => println!("Report saved to: {}", path.display()),
            Err(e) => {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
    }
}
