//! Decision Engine
//!
//! The priority ladder: an ordered sequence of groups, each an ordered
//! sequence of named rules. One evaluation per tick, terminal on first
//! match — the instant a rule reports [`Verdict::Handled`] the tick is over
//! and no later rule in any group runs. Priority is purely positional;
//! there is no scoring.
//!
//! Rules are plain function pointers over a profile (the registered
//! handles) and the per-tick context, which keeps the ordering data-driven
//! and lets the combinator be tested with synthetic tables.

pub mod tick;

use tracing::debug;

pub use tick::Tick;

/// Outcome of evaluating one rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The rule claimed the tick: it issued its action (or deliberately
    /// consumed the tick) and evaluation stops.
    Handled,
    /// The guard did not apply; evaluation continues.
    NotHandled,
}

/// A named guard + action pair.
pub struct Rule<P> {
    pub name: &'static str,
    pub eval: fn(&P, &mut Tick<'_>) -> Verdict,
}

/// An ordered run of rules under one priority band.
pub struct Group<P> {
    pub name: &'static str,
    pub rules: Vec<Rule<P>>,
}

/// Which rule claimed a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    pub group: &'static str,
    pub rule: &'static str,
}

/// The tiered first-match evaluator.
pub struct DecisionEngine<P> {
    groups: Vec<Group<P>>,
}

impl<P> DecisionEngine<P> {
    pub fn new(groups: Vec<Group<P>>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[Group<P>] {
        &self.groups
    }

    /// Evaluate the ladder top to bottom against one snapshot. Returns the
    /// first rule whose guard held, or `None` for an idle tick.
    pub fn tick(&self, profile: &P, tick: &mut Tick<'_>) -> Option<Decision> {
        for group in &self.groups {
            for rule in &group.rules {
                if (rule.eval)(profile, tick) == Verdict::Handled {
                    debug!(group = group.name, rule = rule.name, "rule claimed tick");
                    return Some(Decision {
                        group: group.name,
                        rule: rule.name,
                    });
                }
            }
        }
        debug!("no rule claimed tick");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogBuilder;
    use crate::sim::world::{RecordingExecutor, ScriptedWorld};
    use crate::sim::WorldState;
    use crate::units::UnitModel;

    struct Probe;

    fn not_handled(_: &Probe, _: &mut Tick<'_>) -> Verdict {
        Verdict::NotHandled
    }

    fn handled(_: &Probe, _: &mut Tick<'_>) -> Verdict {
        Verdict::Handled
    }

    fn ladder() -> DecisionEngine<Probe> {
        DecisionEngine::new(vec![
            Group {
                name: "first",
                rules: vec![
                    Rule { name: "skip", eval: not_handled },
                    Rule { name: "claim", eval: handled },
                ],
            },
            Group {
                name: "second",
                rules: vec![Rule { name: "shadowed", eval: handled }],
            },
        ])
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let catalogs = CatalogBuilder::default().build().unwrap();
        let units = UnitModel::standard();
        let world = ScriptedWorld::new(WorldState::default());
        let mut actions = RecordingExecutor::default();
        let mut tick = Tick::new(&world, &mut actions, &catalogs, &units);

        let decision = ladder().tick(&Probe, &mut tick);
        assert_eq!(
            decision,
            Some(Decision { group: "first", rule: "claim" })
        );
    }

    #[test]
    fn test_idle_when_no_guard_holds() {
        let catalogs = CatalogBuilder::default().build().unwrap();
        let units = UnitModel::standard();
        let world = ScriptedWorld::new(WorldState::default());
        let mut actions = RecordingExecutor::default();
        let mut tick = Tick::new(&world, &mut actions, &catalogs, &units);

        let engine = DecisionEngine::new(vec![Group {
            name: "only",
            rules: vec![Rule { name: "skip", eval: not_handled }],
        }]);
        assert_eq!(engine.tick(&Probe, &mut tick), None);
    }
}
