//! Routines
//!
//! A routine bundles the frozen catalogs, the roster, the registered
//! handle profile and the decision ladder for one agent build. Exactly one
//! ships today; the split keeps the engine reusable for other builds.

pub mod restoration;

pub use restoration::RestorationProfile;

use crate::catalog::{CatalogBuilder, CatalogError, Catalogs};
use crate::engine::{Decision, DecisionEngine, Tick};
use crate::provider::{ActionExecutor, GameStateProvider};
use crate::units::UnitModel;

/// A fully assembled agent: catalogs, roster and ladder.
pub struct Routine {
    pub catalogs: Catalogs,
    pub units: UnitModel,
    pub profile: RestorationProfile,
    engine: DecisionEngine<RestorationProfile>,
}

impl Routine {
    /// Build the restoration-druid routine. Fails fast on catalog
    /// misconfiguration.
    pub fn restoration() -> Result<Self, CatalogError> {
        let mut builder = CatalogBuilder::default();
        let profile = RestorationProfile::register(&mut builder);
        let catalogs = builder.build()?;

        Ok(Self {
            catalogs,
            units: UnitModel::standard(),
            profile,
            engine: DecisionEngine::new(restoration::ladder()),
        })
    }

    /// Run one tick against a fresh snapshot. At most one action goes out
    /// through `actions`; the returned decision names the rule that claimed
    /// the tick, if any.
    pub fn tick(
        &self,
        world: &dyn GameStateProvider,
        actions: &mut dyn ActionExecutor,
    ) -> Option<Decision> {
        let mut tick = Tick::new(world, actions, &self.catalogs, &self.units);
        self.engine.tick(&self.profile, &mut tick)
    }
}
