//! Scripted provider & recording executor
//!
//! [`ScriptedWorld`] answers every provider query from the current
//! [`WorldState`] snapshot; [`RecordingExecutor`] captures issued actions.
//! Together they let the full ladder run headlessly and make assertions in
//! tests trivial.

use serde::Serialize;
use tracing::debug;

use crate::catalog::aura::AuraDef;
use crate::catalog::cast::CastDef;
use crate::provider::{ActionExecutor, GameStateProvider, Role};
use crate::sim::scenario::{AuraState, OptionValue, UnitState, WorldState};
use crate::units::UnitId;

/// Provider implementation backed by a scenario snapshot.
#[derive(Default)]
pub struct ScriptedWorld {
    state: WorldState,
}

impl ScriptedWorld {
    pub fn new(state: WorldState) -> Self {
        Self { state }
    }

    /// Swap in the next tick's snapshot.
    pub fn set_state(&mut self, state: WorldState) {
        self.state = state;
    }

    pub fn state(&self) -> &WorldState {
        &self.state
    }

    fn unit(&self, unit: UnitId) -> Option<&UnitState> {
        self.state.units.get(&unit)
    }

    fn find_aura(&self, aura: &AuraDef, unit: UnitId, own: bool) -> Option<&AuraState> {
        self.unit(unit)?
            .auras
            .iter()
            .find(|a| a.name == aura.name && (!own || a.own))
    }
}

impl GameStateProvider for ScriptedWorld {
    fn health_percent(&self, unit: UnitId) -> f64 {
        self.unit(unit).map_or(0.0, |u| u.health)
    }

    fn range_to(&self, unit: UnitId) -> i32 {
        // Slots not in the snapshot are unreachable.
        self.unit(unit).map_or(999, |u| u.range)
    }

    fn role(&self, unit: UnitId) -> Role {
        self.unit(unit).map_or(Role::None, |u| u.role)
    }

    fn casting(&self, unit: UnitId) -> Option<u32> {
        self.unit(unit)?.casting.as_ref().map(|c| c.spell)
    }

    fn cast_remaining(&self, unit: UnitId) -> f64 {
        self.unit(unit)
            .and_then(|u| u.casting.as_ref())
            .map_or(0.0, |c| c.remaining)
    }

    fn targeting_player(&self, unit: UnitId) -> bool {
        self.unit(unit).is_some_and(|u| u.targeting_player)
    }

    fn npc_id(&self, unit: UnitId) -> Option<u32> {
        match unit {
            UnitId::Target => self.state.target_npc,
            UnitId::Mouseover => self.state.mouseover_npc,
            _ => None,
        }
    }

    fn aura_present(&self, aura: &AuraDef, unit: UnitId, own: bool) -> bool {
        self.find_aura(aura, unit, own).is_some()
    }

    fn aura_remaining(&self, aura: &AuraDef, unit: UnitId, own: bool) -> f64 {
        self.find_aura(aura, unit, own).map_or(0.0, |a| a.remaining)
    }

    fn aura_elapsed(&self, aura: &AuraDef, unit: UnitId, own: bool) -> f64 {
        self.find_aura(aura, unit, own).map_or(0.0, |a| a.elapsed)
    }

    fn aura_stacks(&self, aura: &AuraDef, unit: UnitId) -> u32 {
        self.find_aura(aura, unit, false).map_or(0, |a| a.stacks)
    }

    fn player_mana(&self) -> i32 {
        self.state.player.mana
    }

    fn player_haste(&self) -> f64 {
        self.state.player.haste
    }

    fn player_moving(&self) -> bool {
        self.state.player.moving
    }

    fn player_rooted(&self) -> bool {
        self.state.player.rooted
    }

    fn player_mounted(&self) -> bool {
        self.state.player.mounted
    }

    fn player_in_combat(&self) -> bool {
        self.state.player.in_combat
    }

    fn player_in_raid(&self) -> bool {
        self.state.player.in_raid
    }

    fn can_attack_target(&self) -> bool {
        self.state.can_attack_target
    }

    fn enemies_in_melee(&self) -> u32 {
        self.state.enemies_in_melee
    }

    fn enemies_near_target(&self) -> u32 {
        self.state.enemies_near_target
    }

    fn gcd_remaining(&self) -> f64 {
        self.state.player.gcd_remaining
    }

    fn spell_ready(&self, cast: &CastDef) -> bool {
        self.state.spells.get(cast.name).map_or(true, |s| s.ready)
    }

    fn spell_cooldown(&self, cast: &CastDef) -> f64 {
        self.state.spells.get(cast.name).map_or(0.0, |s| s.cooldown)
    }

    fn spell_charges(&self, cast: &CastDef) -> u32 {
        self.state.spells.get(cast.name).map_or(0, |s| s.charges)
    }

    fn spell_max_charges(&self, cast: &CastDef) -> u32 {
        self.state.spells.get(cast.name).map_or(0, |s| s.max_charges)
    }

    fn spell_charge_cooldown(&self, cast: &CastDef) -> f64 {
        self.state
            .spells
            .get(cast.name)
            .map_or(0.0, |s| s.charge_cooldown)
    }

    fn cast_disabled(&self, cast: &CastDef) -> bool {
        self.state.spells.get(cast.name).is_some_and(|s| s.disabled)
    }

    fn item_ready(&self, cast: &CastDef) -> bool {
        // Unlisted items are not carried.
        self.state.items.get(cast.name).is_some_and(|i| i.ready)
    }

    fn trinket_usable(&self, slot: u8) -> bool {
        self.state.trinkets.get(&slot).is_some_and(|t| t.usable)
    }

    fn trinket_cooldown(&self, slot: u8) -> f64 {
        self.state.trinkets.get(&slot).map_or(0.0, |t| t.cooldown)
    }

    fn option_bool(&self, key: &str) -> Option<bool> {
        match self.state.options.get(key) {
            Some(OptionValue::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    fn option_choice(&self, key: &str) -> Option<usize> {
        match self.state.options.get(key) {
            Some(OptionValue::Choice(index)) => Some(*index),
            _ => None,
        }
    }

    fn toggle_enabled(&self, name: &str) -> bool {
        self.state.toggles.contains(name)
    }

    fn talent_selected(&self, id: u32) -> bool {
        self.state.talents.contains(&id)
    }
}

/// An action captured by the recording executor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum IssuedAction {
    Cast { name: String },
    CastAt { name: String, unit: UnitId },
    CastOnSelf { name: String },
    CancelCast,
}

impl IssuedAction {
    /// Human-readable form for logs.
    pub fn describe(&self) -> String {
        match self {
            IssuedAction::Cast { name } => format!("cast {name}"),
            IssuedAction::CastAt { name, unit } => format!("cast {name} at {unit}"),
            IssuedAction::CastOnSelf { name } => format!("cast {name} on self"),
            IssuedAction::CancelCast => "cancel current cast".to_string(),
        }
    }
}

/// Executor that records instead of acting.
#[derive(Default)]
pub struct RecordingExecutor {
    pub issued: Vec<IssuedAction>,
}

impl RecordingExecutor {
    /// Take everything issued since the last drain.
    pub fn drain(&mut self) -> Vec<IssuedAction> {
        std::mem::take(&mut self.issued)
    }
}

impl ActionExecutor for RecordingExecutor {
    fn cast(&mut self, cast: &CastDef) {
        debug!(name = cast.name, "issue cast");
        self.issued.push(IssuedAction::Cast {
            name: cast.name.to_string(),
        });
    }

    fn cast_at(&mut self, cast: &CastDef, unit: UnitId) {
        debug!(name = cast.name, %unit, "issue focus cast");
        self.issued.push(IssuedAction::CastAt {
            name: cast.name.to_string(),
            unit,
        });
    }

    fn cast_on_self(&mut self, cast: &CastDef) {
        debug!(name = cast.name, "issue self cast");
        self.issued.push(IssuedAction::CastOnSelf {
            name: cast.name.to_string(),
        });
    }

    fn cancel_cast(&mut self) {
        debug!("issue cancel");
        self.issued.push(IssuedAction::CancelCast);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::scenario::{SpellState, UnitState};

    #[test]
    fn test_absent_units_read_dead_and_unreachable() {
        let world = ScriptedWorld::new(WorldState::default());
        assert_eq!(world.health_percent(UnitId::Party(1)), 0.0);
        assert_eq!(world.range_to(UnitId::Party(1)), 999);
        assert_eq!(world.role(UnitId::Party(1)), Role::None);
    }

    #[test]
    fn test_own_aura_filter() {
        let def = AuraDef {
            name: "Rejuvenation",
            id: 774,
            dispel_class: None,
            priority: 0,
            refresh_threshold: 3.0,
            kind: crate::catalog::AuraKind::Buff {
                enrage: false,
                immunity: false,
            },
        };
        let world = ScriptedWorld::new(WorldState::default().with_unit(
            UnitId::Party(1),
            UnitState::at(80.0, 10).aura(AuraState::new("Rejuvenation")),
        ));
        assert!(world.aura_present(&def, UnitId::Party(1), false));
        assert!(!world.aura_present(&def, UnitId::Party(1), true));
    }

    #[test]
    fn test_unlisted_spells_default_ready() {
        let def = CastDef {
            name: "Regrowth",
            range: 40,
            kind: crate::catalog::CastKind::Spell { id: 8936 },
        };
        let world = ScriptedWorld::new(WorldState::default());
        assert!(world.spell_ready(&def));
        assert_eq!(world.spell_cooldown(&def), 0.0);

        let gated = ScriptedWorld::new(WorldState::default().with_spell(
            "Regrowth",
            SpellState {
                ready: false,
                ..Default::default()
            },
        ));
        assert!(!gated.spell_ready(&def));
    }

    #[test]
    fn test_recording_executor_drains_in_order() {
        let def = CastDef {
            name: "Wild Growth",
            range: 40,
            kind: crate::catalog::CastKind::Spell { id: 48438 },
        };
        let mut executor = RecordingExecutor::default();
        executor.cast(&def);
        executor.cast_at(&def, UnitId::Party(2));
        executor.cancel_cast();

        let issued = executor.drain();
        assert_eq!(issued.len(), 3);
        assert_eq!(
            issued[1],
            IssuedAction::CastAt {
                name: "Wild Growth".to_string(),
                unit: UnitId::Party(2)
            }
        );
        assert!(executor.drain().is_empty());
    }
}
