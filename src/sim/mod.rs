//! Scripted Simulation Harness
//!
//! Runs the routine without a live game attached: scenarios describe a
//! sequence of per-tick world snapshots, [`world::ScriptedWorld`] serves
//! them through the provider trait, and [`world::RecordingExecutor`]
//! captures whatever the ladder issues. Doubles as the test fixture for
//! the whole crate.

pub mod runner;
pub mod scenario;
pub mod world;

pub use runner::{run, RunReport, TickReport};
pub use scenario::{
    AuraState, CastState, ItemState, OptionValue, PlayerState, Scenario, ScenarioError,
    SpellState, TrinketState, UnitState, WorldState,
};
pub use world::{IssuedAction, RecordingExecutor, ScriptedWorld};
