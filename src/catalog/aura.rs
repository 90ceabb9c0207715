//! Aura Catalog
//!
//! Trackable timed status effects. Definitions are registered once at
//! startup through [`crate::catalog::CatalogBuilder`] and frozen; every
//! query afterwards reads live values from the provider — nothing is cached
//! across ticks.

use serde::{Deserialize, Serialize};

use crate::constants::DISPEL_GRACE_WINDOW;
use crate::provider::GameStateProvider;
use crate::units::UnitId;

/// Resistance category a harmful effect requires for removal. An agent's
/// removal capability is a fixed subset of these, bound at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DispelClass {
    Curse,
    Disease,
    Magic,
    Poison,
}

/// Handle into the frozen aura catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AuraId(pub(crate) u16);

/// Variant-specific aura data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AuraKind {
    Buff {
        /// Marks an effect that should be soothed off enemies.
        enrage: bool,
        /// Marks a damage-immunity effect; targets carrying one are skipped.
        immunity: bool,
    },
    Debuff {
        /// Whether deliberate removal is ever worthwhile.
        dispellable: bool,
        /// Stacks required before removal is considered worth an action.
        min_dispel_stacks: u32,
        /// Nonzero: prefer letting the effect run out naturally while it
        /// still has at least this much time left.
        decay_window: f64,
        /// Never let this effect influence targeting decisions.
        ignore: bool,
    },
}

/// A registered trackable status effect.
#[derive(Clone, Debug)]
pub struct AuraDef {
    pub name: &'static str,
    pub id: u32,
    pub dispel_class: Option<DispelClass>,
    /// Dispel urgency, clamped to 0–2 at registration.
    pub priority: u8,
    /// Remaining time (seconds) below which a refresh is due. Strict: equal
    /// remaining does not trigger a refresh.
    pub refresh_threshold: f64,
    pub kind: AuraKind,
}

impl AuraDef {
    pub fn is_buff(&self) -> bool {
        matches!(self.kind, AuraKind::Buff { .. })
    }

    pub fn is_debuff(&self) -> bool {
        matches!(self.kind, AuraKind::Debuff { .. })
    }

    /// Whether this debuff is flagged to never influence targeting.
    pub fn ignored_for_targeting(&self) -> bool {
        matches!(self.kind, AuraKind::Debuff { ignore: true, .. })
    }
}

/// Registration parameters for a beneficial effect.
#[derive(Clone, Debug)]
pub struct BuffSpec {
    pub name: &'static str,
    pub id: u32,
    pub refresh_threshold: f64,
    pub enrage: bool,
    pub immunity: bool,
}

impl BuffSpec {
    pub fn new(name: &'static str, id: u32) -> Self {
        Self {
            name,
            id,
            refresh_threshold: 0.0,
            enrage: false,
            immunity: false,
        }
    }

    pub fn refresh(mut self, seconds: f64) -> Self {
        self.refresh_threshold = seconds;
        self
    }

    pub fn enrage(mut self) -> Self {
        self.enrage = true;
        self
    }

    pub fn immunity(mut self) -> Self {
        self.immunity = true;
        self
    }
}

/// Registration parameters for a harmful effect.
#[derive(Clone, Debug)]
pub struct DebuffSpec {
    pub name: &'static str,
    pub id: u32,
    pub refresh_threshold: f64,
    pub priority: u8,
    pub dispellable: bool,
    pub dispel_class: Option<DispelClass>,
    pub decay_window: f64,
    pub min_dispel_stacks: u32,
    pub ignore: bool,
}

impl DebuffSpec {
    pub fn new(name: &'static str, id: u32) -> Self {
        Self {
            name,
            id,
            refresh_threshold: 0.0,
            priority: 1,
            dispellable: false,
            dispel_class: None,
            decay_window: 0.0,
            min_dispel_stacks: 0,
            ignore: false,
        }
    }

    pub fn refresh(mut self, seconds: f64) -> Self {
        self.refresh_threshold = seconds;
        self
    }

    pub fn priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Mark dispellable under the given resistance category.
    pub fn dispel(mut self, class: DispelClass) -> Self {
        self.dispellable = true;
        self.dispel_class = Some(class);
        self
    }

    pub fn decay_window(mut self, seconds: f64) -> Self {
        self.decay_window = seconds;
        self
    }

    pub fn min_stacks(mut self, stacks: u32) -> Self {
        self.min_dispel_stacks = stacks;
        self
    }

    pub fn ignored(mut self) -> Self {
        self.ignore = true;
        self
    }
}

/// Frozen, append-only catalog of aura definitions with live per-unit
/// queries.
#[derive(Default)]
pub struct AuraRegistry {
    defs: Vec<AuraDef>,
}

impl AuraRegistry {
    pub(crate) fn from_defs(defs: Vec<AuraDef>) -> Self {
        Self { defs }
    }

    pub fn get(&self, id: AuraId) -> &AuraDef {
        &self.defs[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AuraId, &AuraDef)> {
        self.defs
            .iter()
            .enumerate()
            .map(|(i, def)| (AuraId(i as u16), def))
    }

    /// Whether `unit` currently carries the aura. `own` restricts the match
    /// to applications cast by the player.
    pub fn present(
        &self,
        world: &dyn GameStateProvider,
        aura: AuraId,
        unit: UnitId,
        own: bool,
    ) -> bool {
        world.aura_present(self.get(aura), unit, own)
    }

    /// Remaining duration in seconds; 0 when absent.
    pub fn remaining(
        &self,
        world: &dyn GameStateProvider,
        aura: AuraId,
        unit: UnitId,
        own: bool,
    ) -> f64 {
        world.aura_remaining(self.get(aura), unit, own)
    }

    /// Time in seconds since the aura was (re)applied; 0 when absent.
    pub fn elapsed(
        &self,
        world: &dyn GameStateProvider,
        aura: AuraId,
        unit: UnitId,
        own: bool,
    ) -> f64 {
        world.aura_elapsed(self.get(aura), unit, own)
    }

    pub fn stacks(&self, world: &dyn GameStateProvider, aura: AuraId, unit: UnitId) -> u32 {
        world.aura_stacks(self.get(aura), unit)
    }

    /// Whether the player's own application is due for a refresh: remaining
    /// time strictly below the registered threshold. Remaining exactly at
    /// the threshold does not refresh.
    pub fn needs_refresh(&self, world: &dyn GameStateProvider, aura: AuraId, unit: UnitId) -> bool {
        self.remaining(world, aura, unit, true) < self.get(aura).refresh_threshold
    }

    /// Whether `unit` carries any enrage-flagged buff.
    pub fn enraged(&self, world: &dyn GameStateProvider, unit: UnitId) -> bool {
        self.defs.iter().any(|def| {
            matches!(def.kind, AuraKind::Buff { enrage: true, .. })
                && world.aura_present(def, unit, false)
        })
    }

    /// Whether `unit` carries any immunity-flagged buff.
    pub fn immune(&self, world: &dyn GameStateProvider, unit: UnitId) -> bool {
        self.defs.iter().any(|def| {
            matches!(def.kind, AuraKind::Buff { immunity: true, .. })
                && world.aura_present(def, unit, false)
        })
    }

    /// Highest dispel priority among the removable debuffs `unit` currently
    /// carries, or -1 when nothing qualifies.
    ///
    /// A debuff qualifies when its class is within `capability` and it
    /// survives three rejections: the re-application grace window, the
    /// natural-decay preference, and the minimum-stack gate.
    pub fn dispel_priority(
        &self,
        world: &dyn GameStateProvider,
        unit: UnitId,
        capability: &[DispelClass],
    ) -> i32 {
        let mut priority = -1;

        for def in &self.defs {
            let AuraKind::Debuff {
                dispellable: true,
                min_dispel_stacks,
                decay_window,
                ..
            } = def.kind
            else {
                continue;
            };
            let Some(class) = def.dispel_class else {
                continue;
            };
            if !capability.contains(&class) {
                continue;
            }
            if !world.aura_present(def, unit, false) {
                continue;
            }
            if world.aura_elapsed(def, unit, false) <= DISPEL_GRACE_WINDOW {
                continue;
            }
            if decay_window != 0.0 && decay_window <= world.aura_remaining(def, unit, false) {
                continue;
            }
            if world.aura_stacks(def, unit) < min_dispel_stacks {
                continue;
            }
            priority = priority.max(i32::from(def.priority));
        }

        priority
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogBuilder;
    use crate::sim::world::ScriptedWorld;
    use crate::sim::{AuraState, UnitState, WorldState};

    fn world_with_party1(state: UnitState) -> ScriptedWorld {
        ScriptedWorld::new(WorldState::default().with_unit(UnitId::Party(1), state))
    }

    #[test]
    fn test_needs_refresh_boundary_is_strict() {
        let mut b = CatalogBuilder::default();
        let rejuv = b.buff(BuffSpec::new("Rejuvenation", 774).refresh(3.0));
        let catalogs = b.build().unwrap();

        let at_threshold = world_with_party1(
            UnitState::at(90.0, 10).aura(AuraState::new("Rejuvenation").own().remaining(3.0)),
        );
        assert!(!catalogs
            .auras
            .needs_refresh(&at_threshold, rejuv, UnitId::Party(1)));

        let below = world_with_party1(
            UnitState::at(90.0, 10).aura(AuraState::new("Rejuvenation").own().remaining(2.999)),
        );
        assert!(catalogs.auras.needs_refresh(&below, rejuv, UnitId::Party(1)));
    }

    #[test]
    fn test_dispel_priority_rejects_grace_window() {
        let mut b = CatalogBuilder::default();
        b.debuff(DebuffSpec::new("Bewitch", 211370).dispel(DispelClass::Magic).priority(2));
        let catalogs = b.build().unwrap();

        let settling = world_with_party1(
            UnitState::at(80.0, 10).aura(AuraState::new("Bewitch").elapsed(0.2).remaining(4.0)),
        );
        assert_eq!(
            catalogs
                .auras
                .dispel_priority(&settling, UnitId::Party(1), &[DispelClass::Magic]),
            -1
        );

        let settled = world_with_party1(
            UnitState::at(80.0, 10).aura(AuraState::new("Bewitch").elapsed(0.3).remaining(4.0)),
        );
        assert_eq!(
            catalogs
                .auras
                .dispel_priority(&settled, UnitId::Party(1), &[DispelClass::Magic]),
            2
        );
    }

    #[test]
    fn test_dispel_priority_respects_decay_window() {
        let mut b = CatalogBuilder::default();
        b.debuff(
            DebuffSpec::new("Waking Bane", 386549)
                .dispel(DispelClass::Magic)
                .decay_window(3.0),
        );
        let catalogs = b.build().unwrap();

        // Window 3s: a candidate only once remaining time drops below it.
        let expiring = world_with_party1(
            UnitState::at(80.0, 10).aura(AuraState::new("Waking Bane").elapsed(1.0).remaining(2.0)),
        );
        assert_eq!(
            catalogs
                .auras
                .dispel_priority(&expiring, UnitId::Party(1), &[DispelClass::Magic]),
            1
        );

        // 8s remaining is at/above the window: rejected.
        let fresh = world_with_party1(
            UnitState::at(80.0, 10).aura(AuraState::new("Waking Bane").elapsed(1.0).remaining(8.0)),
        );
        assert_eq!(
            catalogs
                .auras
                .dispel_priority(&fresh, UnitId::Party(1), &[DispelClass::Magic]),
            -1
        );
    }

    #[test]
    fn test_dispel_priority_requires_min_stacks_and_capability() {
        let mut b = CatalogBuilder::default();
        b.debuff(
            DebuffSpec::new("Burst", 240443)
                .dispel(DispelClass::Magic)
                .priority(0)
                .min_stacks(5),
        );
        b.debuff(DebuffSpec::new("Necrotic Burst", 156718).dispel(DispelClass::Disease));
        let catalogs = b.build().unwrap();

        let low_stacks = world_with_party1(
            UnitState::at(80.0, 10)
                .aura(AuraState::new("Burst").elapsed(1.0).stacks(4))
                .aura(AuraState::new("Necrotic Burst").elapsed(1.0)),
        );
        // Burst below threshold, disease outside a Magic/Curse capability.
        assert_eq!(
            catalogs.auras.dispel_priority(
                &low_stacks,
                UnitId::Party(1),
                &[DispelClass::Magic, DispelClass::Curse]
            ),
            -1
        );

        let stacked = world_with_party1(
            UnitState::at(80.0, 10).aura(AuraState::new("Burst").elapsed(1.0).stacks(5)),
        );
        assert_eq!(
            catalogs
                .auras
                .dispel_priority(&stacked, UnitId::Party(1), &[DispelClass::Magic]),
            0
        );
    }

    #[test]
    fn test_dispel_scenario_from_reference() {
        // Capability {Magic, Curse}; Magic debuff elapsed 1.0s, remaining
        // 4.0s, no decay window, 1 stack vs threshold 0 — valid candidate at
        // its configured priority.
        let mut b = CatalogBuilder::default();
        b.debuff(DebuffSpec::new("Forbidden Knowledge", 371352).dispel(DispelClass::Magic).priority(2));
        let catalogs = b.build().unwrap();

        let world = world_with_party1(
            UnitState::at(70.0, 10)
                .aura(AuraState::new("Forbidden Knowledge").elapsed(1.0).remaining(4.0)),
        );
        assert_eq!(
            catalogs.auras.dispel_priority(
                &world,
                UnitId::Party(1),
                &[DispelClass::Magic, DispelClass::Curse]
            ),
            2
        );
    }

    #[test]
    fn test_enrage_and_immunity_folds() {
        let mut b = CatalogBuilder::default();
        b.buff(BuffSpec::new("Ferocity", 211477).enrage());
        b.buff(BuffSpec::new("Divine Aegis", 642).immunity());
        let catalogs = b.build().unwrap();

        let enraged = world_with_party1(UnitState::at(100.0, 10).aura(AuraState::new("Ferocity")));
        assert!(catalogs.auras.enraged(&enraged, UnitId::Party(1)));
        assert!(!catalogs.auras.immune(&enraged, UnitId::Party(1)));

        let shielded =
            world_with_party1(UnitState::at(100.0, 10).aura(AuraState::new("Divine Aegis")));
        assert!(catalogs.auras.immune(&shielded, UnitId::Party(1)));
    }
}
