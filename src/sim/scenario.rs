//! Scenario configuration
//!
//! RON scenario files describe a run as a sequence of world snapshots, one
//! per tick. Every field defaults so scenarios stay terse: unlisted units
//! are absent (dead), unlisted spells are ready, unlisted items are not
//! carried.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::provider::Role;
use crate::units::UnitId;

/// A scenario: named sequence of per-tick world snapshots.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub ticks: Vec<WorldState>,
}

/// Errors while loading a scenario file.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse scenario: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("scenario '{0}' has no ticks")]
    Empty(String),
}

impl Scenario {
    /// Load and validate a scenario from a RON file.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let contents = std::fs::read_to_string(path)?;
        let scenario: Scenario = ron::from_str(&contents)?;
        if scenario.ticks.is_empty() {
            return Err(ScenarioError::Empty(scenario.name));
        }
        Ok(scenario)
    }
}

/// One tick's complete world snapshot.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldState {
    /// Roster slots present this tick; absent slots read as dead/unreachable.
    pub units: BTreeMap<UnitId, UnitState>,
    pub player: PlayerState,
    /// Spell state overrides by display name; unlisted spells are ready.
    pub spells: BTreeMap<String, SpellState>,
    /// Items carried, by display name; unlisted items are unavailable.
    pub items: BTreeMap<String, ItemState>,
    /// Trinket state by slot; unlisted slots are unavailable.
    pub trinkets: BTreeMap<u8, TrinketState>,
    /// Option values by registered key.
    pub options: BTreeMap<String, OptionValue>,
    /// Enabled toggles by name.
    pub toggles: BTreeSet<String>,
    /// Selected talent ids.
    pub talents: BTreeSet<u32>,
    pub target_npc: Option<u32>,
    pub mouseover_npc: Option<u32>,
    pub can_attack_target: bool,
    pub enemies_in_melee: u32,
    pub enemies_near_target: u32,
}

impl Default for WorldState {
    fn default() -> Self {
        Self {
            units: BTreeMap::new(),
            player: PlayerState::default(),
            spells: BTreeMap::new(),
            items: BTreeMap::new(),
            trinkets: BTreeMap::new(),
            options: BTreeMap::new(),
            toggles: BTreeSet::new(),
            talents: BTreeSet::new(),
            target_npc: None,
            mouseover_npc: None,
            can_attack_target: true,
            enemies_in_melee: 0,
            enemies_near_target: 1,
        }
    }
}

impl WorldState {
    pub fn with_unit(mut self, id: UnitId, state: UnitState) -> Self {
        self.units.insert(id, state);
        self
    }

    pub fn with_spell(mut self, name: &str, state: SpellState) -> Self {
        self.spells.insert(name.to_string(), state);
        self
    }

    pub fn with_item(mut self, name: &str, state: ItemState) -> Self {
        self.items.insert(name.to_string(), state);
        self
    }

    pub fn with_trinket(mut self, slot: u8, state: TrinketState) -> Self {
        self.trinkets.insert(slot, state);
        self
    }

    pub fn with_option_bool(mut self, key: &str, value: bool) -> Self {
        self.options.insert(key.to_string(), OptionValue::Bool(value));
        self
    }

    pub fn with_option_choice(mut self, key: &str, index: usize) -> Self {
        self.options.insert(key.to_string(), OptionValue::Choice(index));
        self
    }

    pub fn with_toggle(mut self, name: &str) -> Self {
        self.toggles.insert(name.to_string());
        self
    }

    pub fn target_npc(mut self, npc_id: u32) -> Self {
        self.target_npc = Some(npc_id);
        self
    }
}

/// A stored option value: boolean or choice index.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Choice(usize),
}

/// Player-wide state for one tick.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerState {
    /// Resource pool percentage.
    pub mana: i32,
    /// Haste fraction (0.3 = 30%).
    pub haste: f64,
    pub moving: bool,
    pub rooted: bool,
    pub mounted: bool,
    pub in_combat: bool,
    pub in_raid: bool,
    pub gcd_remaining: f64,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            mana: 100,
            haste: 0.0,
            moving: false,
            rooted: false,
            mounted: false,
            in_combat: true,
            in_raid: false,
            gcd_remaining: 0.0,
        }
    }
}

/// Per-unit state for one tick.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitState {
    /// Raw health percentage.
    pub health: f64,
    /// Distance to the player in yards.
    pub range: i32,
    pub role: Role,
    pub casting: Option<CastState>,
    pub targeting_player: bool,
    pub auras: Vec<AuraState>,
}

impl Default for UnitState {
    fn default() -> Self {
        Self {
            health: 100.0,
            range: 30,
            role: Role::None,
            casting: None,
            targeting_player: false,
            auras: Vec::new(),
        }
    }
}

impl UnitState {
    /// A unit at the given health and range.
    pub fn at(health: f64, range: i32) -> Self {
        Self {
            health,
            range,
            ..Self::default()
        }
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn aura(mut self, aura: AuraState) -> Self {
        self.auras.push(aura);
        self
    }

    pub fn casts(mut self, spell: u32, remaining: f64) -> Self {
        self.casting = Some(CastState { spell, remaining });
        self
    }

    pub fn targets_player(mut self) -> Self {
        self.targeting_player = true;
        self
    }
}

/// An in-progress cast.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CastState {
    pub spell: u32,
    pub remaining: f64,
}

/// An aura application on a unit.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AuraState {
    pub name: String,
    pub remaining: f64,
    pub elapsed: f64,
    pub stacks: u32,
    /// Applied by the player.
    pub own: bool,
}

impl Default for AuraState {
    fn default() -> Self {
        Self {
            name: String::new(),
            remaining: 10.0,
            elapsed: 1.0,
            stacks: 1,
            own: false,
        }
    }
}

impl AuraState {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn remaining(mut self, seconds: f64) -> Self {
        self.remaining = seconds;
        self
    }

    pub fn elapsed(mut self, seconds: f64) -> Self {
        self.elapsed = seconds;
        self
    }

    pub fn stacks(mut self, stacks: u32) -> Self {
        self.stacks = stacks;
        self
    }

    pub fn own(mut self) -> Self {
        self.own = true;
        self
    }
}

/// Spell state override for one tick.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellState {
    /// Resource-ready.
    pub ready: bool,
    pub cooldown: f64,
    pub charges: u32,
    pub max_charges: u32,
    pub charge_cooldown: f64,
    pub disabled: bool,
}

impl Default for SpellState {
    fn default() -> Self {
        Self {
            ready: true,
            cooldown: 0.0,
            charges: 0,
            max_charges: 0,
            charge_cooldown: 0.0,
            disabled: false,
        }
    }
}

/// Carried item state.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemState {
    pub ready: bool,
}

impl Default for ItemState {
    fn default() -> Self {
        Self { ready: true }
    }
}

/// Equipped trinket state.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TrinketState {
    pub usable: bool,
    pub cooldown: f64,
}

impl Default for TrinketState {
    fn default() -> Self {
        Self {
            usable: true,
            cooldown: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_round_trips_through_ron() {
        let scenario = Scenario {
            name: "round trip".to_string(),
            description: String::new(),
            ticks: vec![WorldState::default()
                .with_unit(UnitId::Party(1), UnitState::at(55.0, 10))
                .with_toggle("Dispel")],
        };
        let text = ron::to_string(&scenario).unwrap();
        let back: Scenario = ron::from_str(&text).unwrap();
        assert_eq!(back.name, "round trip");
        assert_eq!(back.ticks.len(), 1);
        assert!(back.ticks[0].units.contains_key(&UnitId::Party(1)));
        assert!(back.ticks[0].toggles.contains("Dispel"));
    }

    #[test]
    fn test_world_state_defaults_are_permissive() {
        let state = WorldState::default();
        assert!(state.can_attack_target);
        assert!(state.player.in_combat);
        assert_eq!(state.player.mana, 100);
    }
}
