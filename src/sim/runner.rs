//! Scenario execution
//!
//! Drives the routine tick by tick over a scenario, collecting a decision
//! log and a structured run report suitable for saving as JSON.

use std::fs::File;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::log::{DecisionLog, DecisionLogEventType};
use crate::routine::Routine;
use crate::sim::scenario::Scenario;
use crate::sim::world::{IssuedAction, RecordingExecutor, ScriptedWorld};

/// What one tick decided and issued.
#[derive(Clone, Debug, Serialize)]
pub struct TickReport {
    pub tick: usize,
    pub group: Option<String>,
    pub rule: Option<String>,
    pub actions: Vec<IssuedAction>,
}

/// Structured result of a scenario run.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub scenario: String,
    pub ticks: Vec<TickReport>,
}

/// Errors while saving a run report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

impl RunReport {
    /// Save as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), ReportError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Ticks that issued at least one action.
    pub fn active_ticks(&self) -> usize {
        self.ticks.iter().filter(|t| !t.actions.is_empty()).count()
    }
}

/// Run a scenario to completion.
pub fn run(routine: &Routine, scenario: &Scenario) -> (RunReport, DecisionLog) {
    let mut world = ScriptedWorld::default();
    let mut actions = RecordingExecutor::default();
    let mut log = DecisionLog::default();
    let mut ticks = Vec::with_capacity(scenario.ticks.len());

    log.log(
        0,
        DecisionLogEventType::RunEvent,
        format!("scenario '{}' started", scenario.name),
    );

    for (tick, state) in scenario.ticks.iter().enumerate() {
        world.set_state(state.clone());
        let decision = routine.tick(&world, &mut actions);
        let issued = actions.drain();

        match decision {
            Some(decision) => {
                info!(tick, group = decision.group, rule = decision.rule, "decision");
                log.log(
                    tick,
                    DecisionLogEventType::Decision,
                    format!("{}/{}", decision.group, decision.rule),
                );
            }
            None => {
                info!(tick, "idle");
                log.log(tick, DecisionLogEventType::Idle, "no rule applied".to_string());
            }
        }
        for action in &issued {
            log.log(tick, DecisionLogEventType::Action, action.describe());
        }

        ticks.push(TickReport {
            tick,
            group: decision.map(|d| d.group.to_string()),
            rule: decision.map(|d| d.rule.to_string()),
            actions: issued,
        });
    }

    log.log(
        scenario.ticks.len().saturating_sub(1),
        DecisionLogEventType::RunEvent,
        format!("scenario '{}' complete", scenario.name),
    );

    (
        RunReport {
            scenario: scenario.name.clone(),
            ticks,
        },
        log,
    )
}
