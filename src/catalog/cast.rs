//! Cast Catalog
//!
//! Executable actions: native spells, usable items and scripted macros.
//! Registered once at startup, immutable afterwards. Usability is a pure
//! read over provider state; execution is fire-and-forget through the
//! [`ActionExecutor`] — no status comes back, the next tick observes the
//! result (or its absence) in fresh world state.

use crate::constants::{ACTION_DELAY, BASE_GCD, GCD_FLOOR};
use crate::provider::{ActionExecutor, GameStateProvider};
use crate::units::UnitId;

/// Handle into the frozen cast catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CastId(pub(crate) u16);

/// Item sub-variants; trinkets carry their equipment slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemKind {
    Consumable,
    Potion,
    Trinket { slot: u8 },
    Weapon,
}

/// Variant-specific cast data.
#[derive(Clone, Debug, PartialEq)]
pub enum CastKind {
    /// Fixed side-channel instruction string. Carries no cooldown or
    /// resource gate.
    Macro { text: &'static str },
    Spell { id: u32 },
    Item { id: u32, kind: ItemKind },
}

/// A registered executable action.
#[derive(Clone, Debug)]
pub struct CastDef {
    pub name: &'static str,
    /// Effective range in yards.
    pub range: i32,
    pub kind: CastKind,
}

impl CastDef {
    /// Numeric id for native variants; macros have none.
    pub fn numeric_id(&self) -> Option<u32> {
        match self.kind {
            CastKind::Macro { .. } => None,
            CastKind::Spell { id } | CastKind::Item { id, .. } => Some(id),
        }
    }
}

/// Effective maximum global cooldown for the current haste level, floored.
pub fn max_gcd(world: &dyn GameStateProvider) -> f64 {
    (BASE_GCD / (1.0 + world.player_haste())).max(GCD_FLOOR)
}

/// Global cooldown remaining after the queue-ahead delay.
pub fn gcd(world: &dyn GameStateProvider) -> f64 {
    (world.gcd_remaining() - ACTION_DELAY).max(0.0)
}

/// Frozen catalog of executable actions.
#[derive(Default)]
pub struct CastCatalog {
    defs: Vec<CastDef>,
}

impl CastCatalog {
    pub(crate) fn from_defs(defs: Vec<CastDef>) -> Self {
        Self { defs }
    }

    pub fn get(&self, id: CastId) -> &CastDef {
        &self.defs[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Remaining cooldown after the queue-ahead delay.
    fn cooldown(&self, world: &dyn GameStateProvider, def: &CastDef) -> f64 {
        (world.spell_cooldown(def) - ACTION_DELAY).max(0.0)
    }

    /// Available charges. A charge whose recharge has effectively finished
    /// (within the queue-ahead delay) already counts.
    pub fn charges(&self, world: &dyn GameStateProvider, cast: CastId) -> u32 {
        let def = self.get(cast);
        let max = world.spell_max_charges(def);
        let mut charges = world.spell_charges(def);
        if charges < max && (world.spell_charge_cooldown(def) - ACTION_DELAY).max(0.0) == 0.0 {
            charges += 1;
        }
        charges
    }

    fn in_range(&self, world: &dyn GameStateProvider, def: &CastDef, unit: UnitId) -> bool {
        world.range_to(unit) <= def.range
    }

    /// Full usability check against `unit`.
    ///
    /// - Spell: resource-ready, off cooldown, in range, not disabled.
    /// - Item: provider-ready and in range; trinkets additionally require
    ///   their per-slot cooldown to be exactly zero.
    /// - Macro: in range and not disabled.
    pub fn usable(&self, world: &dyn GameStateProvider, cast: CastId, unit: UnitId) -> bool {
        let def = self.get(cast);
        match &def.kind {
            CastKind::Macro { .. } => self.in_range(world, def, unit) && !world.cast_disabled(def),
            CastKind::Spell { .. } => {
                world.spell_ready(def)
                    && self.cooldown(world, def) == 0.0
                    && self.in_range(world, def, unit)
                    && !world.cast_disabled(def)
            }
            CastKind::Item { kind, .. } => {
                let ready = match kind {
                    ItemKind::Trinket { slot } => {
                        world.trinket_usable(*slot) && world.trinket_cooldown(*slot) == 0.0
                    }
                    _ => world.item_ready(def),
                };
                ready && self.in_range(world, def, unit)
            }
        }
    }

    /// Relaxed spell check for callers that have established resource
    /// readiness by other means. Unlike the strict check, a stored charge
    /// also satisfies the cooldown gate. Non-spell variants fall back to the
    /// full check.
    pub fn usable_ignoring_resource(
        &self,
        world: &dyn GameStateProvider,
        cast: CastId,
        unit: UnitId,
    ) -> bool {
        let def = self.get(cast);
        match def.kind {
            CastKind::Spell { .. } => {
                (self.cooldown(world, def) == 0.0 || self.charges(world, cast) > 0)
                    && self.in_range(world, def, unit)
                    && !world.cast_disabled(def)
            }
            _ => self.usable(world, cast, unit),
        }
    }

    /// Further relaxed spell check that also skips the range gate, for
    /// actions whose placement the caller controls (self-casts, ground
    /// effects).
    pub fn usable_ignoring_resource_and_range(
        &self,
        world: &dyn GameStateProvider,
        cast: CastId,
    ) -> bool {
        let def = self.get(cast);
        match def.kind {
            CastKind::Spell { .. } => {
                (self.cooldown(world, def) == 0.0 || self.charges(world, cast) > 0)
                    && !world.cast_disabled(def)
            }
            _ => self.usable(world, cast, UnitId::Player),
        }
    }

    /// Issue on the current target resolution.
    pub fn issue(&self, actions: &mut dyn ActionExecutor, cast: CastId) {
        actions.cast(self.get(cast));
    }

    /// Issue redirected at a unit (focus-then-cast).
    pub fn issue_at(&self, actions: &mut dyn ActionExecutor, cast: CastId, unit: UnitId) {
        actions.cast_at(self.get(cast), unit);
    }

    /// Issue on the player.
    pub fn issue_on_self(&self, actions: &mut dyn ActionExecutor, cast: CastId) {
        actions.cast_on_self(self.get(cast));
    }
}
