//! External Interfaces
//!
//! The engine never talks to the live game directly. All transient state is
//! read through [`GameStateProvider`] and the single action issued per tick
//! goes out through [`ActionExecutor`]. Both are object-safe so the routine
//! can run against the real client adapter or against the scripted world in
//! [`crate::sim`] without code changes.
//!
//! Every query is a point-in-time read: the engine treats all answers within
//! one tick as a consistent snapshot and never awaits the outcome of an
//! issued action.

use serde::{Deserialize, Serialize};

use crate::catalog::aura::AuraDef;
use crate::catalog::cast::CastDef;
use crate::units::UnitId;

/// Threat-role classification reported per unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Tank,
    Healer,
    Damage,
    #[default]
    None,
}

/// Read-only query surface over the live environment.
///
/// Aura queries take the full [`AuraDef`] so an implementation can match by
/// display name or numeric id, whichever its backend indexes. The `own` flag
/// restricts the query to applications cast by the player; `own = false`
/// matches any source.
pub trait GameStateProvider {
    // --- per-unit state ---

    /// Raw health percentage (0.0–100.0), before intake scaling.
    fn health_percent(&self, unit: UnitId) -> f64;
    /// Distance from the player to the unit, in yards.
    fn range_to(&self, unit: UnitId) -> i32;
    fn role(&self, unit: UnitId) -> Role;
    /// Spell id of the unit's in-progress cast, if any.
    fn casting(&self, unit: UnitId) -> Option<u32>;
    /// Remaining cast time in seconds (0 when not casting).
    fn cast_remaining(&self, unit: UnitId) -> f64;
    fn targeting_player(&self, unit: UnitId) -> bool;
    /// Creature id behind a resolvable slot (target/mouseover), if known.
    fn npc_id(&self, unit: UnitId) -> Option<u32>;

    // --- per-(aura, unit) state ---

    fn aura_present(&self, aura: &AuraDef, unit: UnitId, own: bool) -> bool;
    fn aura_remaining(&self, aura: &AuraDef, unit: UnitId, own: bool) -> f64;
    fn aura_elapsed(&self, aura: &AuraDef, unit: UnitId, own: bool) -> f64;
    fn aura_stacks(&self, aura: &AuraDef, unit: UnitId) -> u32;

    // --- player state ---

    /// Resource pool level as a percentage (0–100).
    fn player_mana(&self) -> i32;
    /// Haste as a fraction (0.3 = 30% haste).
    fn player_haste(&self) -> f64;
    fn player_moving(&self) -> bool;
    fn player_rooted(&self) -> bool;
    fn player_mounted(&self) -> bool;
    fn player_in_combat(&self) -> bool;
    fn player_in_raid(&self) -> bool;
    fn can_attack_target(&self) -> bool;
    /// Hostiles within melee range of the player.
    fn enemies_in_melee(&self) -> u32;
    /// Hostiles clustered around the current target.
    fn enemies_near_target(&self) -> u32;
    /// Raw global-cooldown remaining, in seconds.
    fn gcd_remaining(&self) -> f64;

    // --- per-cast state ---

    /// Resource-readiness of a spell (the "can afford it right now" check).
    fn spell_ready(&self, cast: &CastDef) -> bool;
    /// Raw remaining cooldown in seconds, before the action-delay clamp.
    fn spell_cooldown(&self, cast: &CastDef) -> f64;
    fn spell_charges(&self, cast: &CastDef) -> u32;
    fn spell_max_charges(&self, cast: &CastDef) -> u32;
    /// Raw remaining recharge time of the next charge, in seconds.
    fn spell_charge_cooldown(&self, cast: &CastDef) -> f64;
    /// Administrative disablement: the operator has excluded this cast.
    fn cast_disabled(&self, cast: &CastDef) -> bool;
    /// Ready-to-use state of an item cast (bag cooldown, charges, stock).
    fn item_ready(&self, cast: &CastDef) -> bool;
    fn trinket_usable(&self, slot: u8) -> bool;
    fn trinket_cooldown(&self, slot: u8) -> f64;

    // --- configuration surface ---

    /// Current value of a boolean option; `None` falls back to the
    /// registered default.
    fn option_bool(&self, key: &str) -> Option<bool>;
    /// Current index of a choice option; `None` falls back to the default.
    fn option_choice(&self, key: &str) -> Option<usize>;
    fn toggle_enabled(&self, name: &str) -> bool;
    fn talent_selected(&self, id: u32) -> bool;
}

/// Write-only surface the engine issues actions through.
///
/// All calls are fire-and-forget: no status is returned and the engine never
/// retries. Success or failure is observed, if at all, through changed world
/// state on a later tick.
pub trait ActionExecutor {
    /// Cast/use on whatever the current target resolution is.
    fn cast(&mut self, cast: &CastDef);
    /// Redirect at a specific unit: a two-step focus-then-cast sequence.
    fn cast_at(&mut self, cast: &CastDef, unit: UnitId);
    /// Cast on the player regardless of current target.
    fn cast_on_self(&mut self, cast: &CastDef);
    /// Cancel the player's in-progress cast.
    fn cancel_cast(&mut self);
}
