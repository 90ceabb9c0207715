//! Roster & Unit Queries
//!
//! The roster is a fixed set of symbolic slots assembled once at startup:
//! the player, the current target, mouseover, four boss slots, four party
//! slots and forty raid slots. Nothing about a slot is stored — health,
//! range, role and aura state are fetched fresh from the provider each tick.
//!
//! A dedicated [`UnitId::None`] sentinel stands in for "nothing qualified".
//! Its health is pinned at [`SENTINEL_HEALTH`] so it loses every
//! lowest-health comparison and fails every health-bound predicate, which
//! keeps the selection code free of null handling.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::catalog::aura::DispelClass;
use crate::catalog::mechanic::{CastSignature, MechanicSignature};
use crate::catalog::Catalogs;
use crate::constants::SENTINEL_HEALTH;
use crate::provider::{GameStateProvider, Role};

/// Stable symbolic identity of a roster slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum UnitId {
    Player,
    Target,
    Mouseover,
    /// Boss frames 1–4.
    Boss(u8),
    /// Party frames 1–4.
    Party(u8),
    /// Raid frames 1–40.
    Raid(u8),
    /// Sentinel: no qualifying unit.
    None,
}

impl UnitId {
    /// Explicit sentinel check, used instead of comparing against a magic
    /// string id.
    pub fn is_none(self) -> bool {
        self == UnitId::None
    }

    pub fn is_player(self) -> bool {
        self == UnitId::Player
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitId::Player => write!(f, "player"),
            UnitId::Target => write!(f, "target"),
            UnitId::Mouseover => write!(f, "mouseover"),
            UnitId::Boss(n) => write!(f, "boss{n}"),
            UnitId::Party(n) => write!(f, "party{n}"),
            UnitId::Raid(n) => write!(f, "raid{n}"),
            UnitId::None => write!(f, "none"),
        }
    }
}

impl FromStr for UnitId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fn slot(s: &str, prefix: &str, max: u8) -> Option<Result<u8, String>> {
            let n = s.strip_prefix(prefix)?;
            Some(match n.parse::<u8>() {
                Ok(n) if (1..=max).contains(&n) => Ok(n),
                _ => Err(format!("{prefix} slot out of range: {s}")),
            })
        }

        match s {
            "player" => Ok(UnitId::Player),
            "target" => Ok(UnitId::Target),
            "mouseover" => Ok(UnitId::Mouseover),
            "none" => Ok(UnitId::None),
            _ => {
                if let Some(n) = slot(s, "boss", 4) {
                    return Ok(UnitId::Boss(n?));
                }
                if let Some(n) = slot(s, "party", 4) {
                    return Ok(UnitId::Party(n?));
                }
                if let Some(n) = slot(s, "raid", 40) {
                    return Ok(UnitId::Raid(n?));
                }
                Err(format!("unknown unit id: {s}"))
            }
        }
    }
}

impl TryFrom<String> for UnitId {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<UnitId> for String {
    fn from(id: UnitId) -> Self {
        id.to_string()
    }
}

/// Fixed roster of trackable entities with derived per-tick queries.
///
/// Scan order is part of the contract: friendlies are visited party 1–4,
/// raid 1–40, player last; enemies mouseover, boss 1–4, target last. Ties in
/// [`lowest_unit`](Self::lowest_unit) resolve to the slot found first.
pub struct UnitModel {
    friendlies: Vec<UnitId>,
    enemies: Vec<UnitId>,
}

impl Default for UnitModel {
    fn default() -> Self {
        Self::standard()
    }
}

impl UnitModel {
    /// The standard group/raid roster.
    pub fn standard() -> Self {
        let mut friendlies = Vec::with_capacity(45);
        friendlies.extend((1..=4).map(UnitId::Party));
        friendlies.extend((1..=40).map(UnitId::Raid));
        friendlies.push(UnitId::Player);

        let mut enemies = Vec::with_capacity(6);
        enemies.push(UnitId::Mouseover);
        enemies.extend((1..=4).map(UnitId::Boss));
        enemies.push(UnitId::Target);

        Self { friendlies, enemies }
    }

    pub fn friendlies(&self) -> &[UnitId] {
        &self.friendlies
    }

    pub fn enemies(&self) -> &[UnitId] {
        &self.enemies
    }

    /// Effective health percentage of a unit: the raw provider reading scaled
    /// by the predicted intake multiplier, rounded up and capped at 100. The
    /// sentinel reports [`SENTINEL_HEALTH`] unconditionally.
    pub fn health(&self, world: &dyn GameStateProvider, catalogs: &Catalogs, unit: UnitId) -> i32 {
        if unit.is_none() {
            return SENTINEL_HEALTH;
        }

        let multiplier = catalogs
            .mechanics
            .intake_multiplier(world, &catalogs.auras, self, unit);
        let scaled = (world.health_percent(unit) * multiplier).ceil() as i32;
        scaled.min(100)
    }

    /// Lowest-health alive friendly within `range` satisfying `predicate`;
    /// sentinel when none qualifies. Equal health keeps the earlier slot.
    pub fn lowest_unit(
        &self,
        world: &dyn GameStateProvider,
        catalogs: &Catalogs,
        range: i32,
        predicate: impl Fn(UnitId) -> bool,
    ) -> UnitId {
        let mut lowest = UnitId::None;
        let mut lowest_hp = SENTINEL_HEALTH;

        for &unit in &self.friendlies {
            let hp = self.health(world, catalogs, unit);
            if hp > 0 && world.range_to(unit) <= range && predicate(unit) && hp < lowest_hp {
                lowest = unit;
                lowest_hp = hp;
            }
        }

        lowest
    }

    /// Number of alive friendlies within `range` satisfying `predicate`.
    pub fn units_fitting(
        &self,
        world: &dyn GameStateProvider,
        catalogs: &Catalogs,
        range: i32,
        predicate: impl Fn(UnitId) -> bool,
    ) -> u32 {
        let mut num = 0;
        for &unit in &self.friendlies {
            if self.health(world, catalogs, unit) > 0
                && world.range_to(unit) <= range
                && predicate(unit)
            {
                num += 1;
            }
        }
        num
    }

    /// Number of alive, in-range friendlies about to take heavy damage:
    /// carrying a heavy-damage status mechanic at or above its stack
    /// threshold, or selected by a heavy-damage incoming cast. Each unit is
    /// counted at most once.
    pub fn heavy_damage_count(
        &self,
        world: &dyn GameStateProvider,
        catalogs: &Catalogs,
        range: i32,
    ) -> u32 {
        let mechanics = &catalogs.mechanics;
        let auras = &catalogs.auras;
        let mut num = 0;

        for &unit in &self.friendlies {
            if self.health(world, catalogs, unit) == 0 || world.range_to(unit) > range {
                continue;
            }

            let threatened = mechanics.iter().any(|mechanic| {
                if !mechanic.heavy_damage {
                    return false;
                }
                match &mechanic.signature {
                    MechanicSignature::Debuff(aura) => {
                        auras.present(world, *aura, unit, false)
                            && auras.stacks(world, *aura, unit) >= mechanic.min_stacks
                    }
                    MechanicSignature::Cast(sig) => {
                        self.cast_selects_unit(world, sig, mechanic.range, unit)
                    }
                    MechanicSignature::Buff { .. } => false,
                }
            });

            if threatened {
                num += 1;
            }
        }

        num
    }

    /// Whether an in-range hostile is casting `sig` in a way that lands on
    /// `unit` (self-only and tank-only refinements included).
    fn cast_selects_unit(
        &self,
        world: &dyn GameStateProvider,
        sig: &CastSignature,
        mechanic_range: i32,
        unit: UnitId,
    ) -> bool {
        if sig.on_tank && unit != self.tank(world) {
            return false;
        }
        self.enemies.iter().any(|&enemy| {
            world.casting(enemy) == Some(sig.spell_id)
                && world.range_to(enemy) <= mechanic_range
                && (!sig.targeted || (unit.is_player() && world.targeting_player(enemy)))
        })
    }

    /// First alive non-player friendly filling the tank role; the player
    /// when the group runs without one.
    pub fn tank(&self, world: &dyn GameStateProvider) -> UnitId {
        for &unit in &self.friendlies {
            if unit.is_player() {
                continue;
            }
            if world.health_percent(unit) > 0.0 && world.role(unit) == Role::Tank {
                return unit;
            }
        }
        UnitId::Player
    }

    /// Dispel-target selection: across alive, in-range friendlies, pick the
    /// unit carrying the highest-priority dispellable debuff the given
    /// capability set can remove; ties resolve to the lower-health unit.
    /// Sentinel when nothing qualifies.
    ///
    /// The running best starts at priority 0 against the sentinel's 999
    /// health, so a priority-0 candidate is only ever adopted through the
    /// lowest-health tie path.
    pub fn dispel_unit(
        &self,
        world: &dyn GameStateProvider,
        catalogs: &Catalogs,
        capability: &[DispelClass],
        range: i32,
    ) -> UnitId {
        // Collect per-unit candidates first; SmallVec keeps the typical
        // party-sized scan off the heap.
        let mut candidates: SmallVec<[(UnitId, i32, i32); 8]> = SmallVec::new();
        for &unit in &self.friendlies {
            let hp = self.health(world, catalogs, unit);
            if hp == 0 || world.range_to(unit) > range {
                continue;
            }
            let priority = catalogs.auras.dispel_priority(world, unit, capability);
            if priority >= 0 {
                candidates.push((unit, priority, hp));
            }
        }

        let mut highest_priority = 0;
        let mut lowest = UnitId::None;
        let mut lowest_hp = SENTINEL_HEALTH;
        for (unit, priority, hp) in candidates {
            if priority > highest_priority {
                highest_priority = priority;
                lowest = unit;
                lowest_hp = hp;
            } else if priority == highest_priority && hp < lowest_hp {
                lowest = unit;
                lowest_hp = hp;
            }
        }

        lowest
    }

    /// Whether the current target should be left out of offensive targeting:
    /// its creature id is on the ignore list, or it carries a debuff flagged
    /// as ignore-worthy.
    pub fn ignore_target(&self, world: &dyn GameStateProvider, catalogs: &Catalogs) -> bool {
        if let Some(npc_id) = world.npc_id(UnitId::Target) {
            if catalogs.npcs.is_ignored(npc_id) {
                return true;
            }
        }

        catalogs.auras.iter().any(|(id, def)| {
            def.ignored_for_targeting() && catalogs.auras.present(world, id, UnitId::Target, false)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::aura::DebuffSpec;
    use crate::catalog::mechanic::MechanicSpec;
    use crate::catalog::CatalogBuilder;
    use crate::sim::world::ScriptedWorld;
    use crate::sim::{AuraState, UnitState, WorldState};

    fn empty_catalogs() -> Catalogs {
        CatalogBuilder::default().build().unwrap()
    }

    #[test]
    fn test_unit_id_round_trips_through_strings() {
        for id in [
            UnitId::Player,
            UnitId::Target,
            UnitId::Mouseover,
            UnitId::Boss(3),
            UnitId::Party(2),
            UnitId::Raid(40),
            UnitId::None,
        ] {
            assert_eq!(id.to_string().parse::<UnitId>().unwrap(), id);
        }
        assert!("raid41".parse::<UnitId>().is_err());
        assert!("party0".parse::<UnitId>().is_err());
        assert!("gibberish".parse::<UnitId>().is_err());
    }

    #[test]
    fn test_roster_scan_order_puts_player_last() {
        let model = UnitModel::standard();
        assert_eq!(model.friendlies().first(), Some(&UnitId::Party(1)));
        assert_eq!(model.friendlies().last(), Some(&UnitId::Player));
        assert_eq!(model.enemies().last(), Some(&UnitId::Target));
    }

    #[test]
    fn test_lowest_unit_skips_dead_and_out_of_range() {
        let model = UnitModel::standard();
        let catalogs = empty_catalogs();
        let world = ScriptedWorld::new(
            WorldState::default()
                .with_unit(UnitId::Party(1), UnitState::at(0.0, 10))
                .with_unit(UnitId::Party(2), UnitState::at(35.0, 80))
                .with_unit(UnitId::Party(3), UnitState::at(70.0, 20))
                .with_unit(UnitId::Player, UnitState::at(90.0, 0)),
        );

        let lowest = model.lowest_unit(&world, &catalogs, 40, |_| true);
        assert_eq!(lowest, UnitId::Party(3));
        assert!(model.health(&world, &catalogs, lowest) > 0);
    }

    #[test]
    fn test_lowest_unit_tie_resolves_to_roster_order() {
        let model = UnitModel::standard();
        let catalogs = empty_catalogs();
        let world = ScriptedWorld::new(
            WorldState::default()
                .with_unit(UnitId::Party(2), UnitState::at(50.0, 10))
                .with_unit(UnitId::Raid(1), UnitState::at(50.0, 10))
                .with_unit(UnitId::Player, UnitState::at(100.0, 0)),
        );

        assert_eq!(model.lowest_unit(&world, &catalogs, 40, |_| true), UnitId::Party(2));
    }

    #[test]
    fn test_lowest_unit_returns_sentinel_when_nothing_qualifies() {
        let model = UnitModel::standard();
        let catalogs = empty_catalogs();
        let world = ScriptedWorld::new(WorldState::default());

        let lowest = model.lowest_unit(&world, &catalogs, 40, |_| true);
        assert!(lowest.is_none());
        assert_eq!(model.health(&world, &catalogs, lowest), SENTINEL_HEALTH);
    }

    #[test]
    fn test_units_fitting_counts_only_matching() {
        let model = UnitModel::standard();
        let catalogs = empty_catalogs();
        let world = ScriptedWorld::new(
            WorldState::default()
                .with_unit(UnitId::Party(1), UnitState::at(40.0, 10))
                .with_unit(UnitId::Party(2), UnitState::at(60.0, 10))
                .with_unit(UnitId::Player, UnitState::at(90.0, 0)),
        );

        let count = model.units_fitting(&world, &catalogs, 40, |u| {
            model.health(&world, &catalogs, u) < 70
        });
        assert_eq!(count, 2);
    }

    #[test]
    fn test_tank_prefers_non_player_tank_role() {
        let model = UnitModel::standard();
        let world = ScriptedWorld::new(
            WorldState::default()
                .with_unit(UnitId::Party(1), UnitState::at(80.0, 10).role(Role::Damage))
                .with_unit(UnitId::Party(2), UnitState::at(80.0, 10).role(Role::Tank))
                .with_unit(UnitId::Player, UnitState::at(100.0, 0)),
        );
        assert_eq!(model.tank(&world), UnitId::Party(2));

        let solo = ScriptedWorld::new(
            WorldState::default().with_unit(UnitId::Player, UnitState::at(100.0, 0)),
        );
        assert_eq!(model.tank(&solo), UnitId::Player);
    }

    #[test]
    fn test_dispel_unit_prefers_priority_then_health() {
        let mut b = CatalogBuilder::default();
        let low = b.debuff(
            DebuffSpec::new("Thunder Clap", 386028)
                .dispel(DispelClass::Magic)
                .priority(0),
        );
        let high = b.debuff(
            DebuffSpec::new("Bewitch", 211370)
                .dispel(DispelClass::Magic)
                .priority(2),
        );
        let catalogs = b.build().unwrap();
        let (low, high) = (catalogs.auras.get(low).name, catalogs.auras.get(high).name);

        let model = UnitModel::standard();
        let world = ScriptedWorld::new(
            WorldState::default()
                .with_unit(
                    UnitId::Party(1),
                    UnitState::at(20.0, 10).aura(AuraState::new(low).elapsed(1.0)),
                )
                .with_unit(
                    UnitId::Party(2),
                    UnitState::at(95.0, 10).aura(AuraState::new(high).elapsed(1.0)),
                )
                .with_unit(UnitId::Player, UnitState::at(100.0, 0)),
        );

        // High priority wins even on the healthier unit.
        assert_eq!(
            model.dispel_unit(&world, &catalogs, &[DispelClass::Magic], 40),
            UnitId::Party(2)
        );
    }

    #[test]
    fn test_dispel_unit_tie_breaks_by_lowest_health() {
        let mut b = CatalogBuilder::default();
        let debuff = b.debuff(DebuffSpec::new("Frightful Roar", 386063).dispel(DispelClass::Magic));
        let catalogs = b.build().unwrap();
        let name = catalogs.auras.get(debuff).name;

        let model = UnitModel::standard();
        let world = ScriptedWorld::new(
            WorldState::default()
                .with_unit(
                    UnitId::Party(1),
                    UnitState::at(80.0, 10).aura(AuraState::new(name).elapsed(1.0)),
                )
                .with_unit(
                    UnitId::Party(2),
                    UnitState::at(30.0, 10).aura(AuraState::new(name).elapsed(1.0)),
                )
                .with_unit(UnitId::Player, UnitState::at(100.0, 0)),
        );

        assert_eq!(
            model.dispel_unit(&world, &catalogs, &[DispelClass::Magic], 40),
            UnitId::Party(2)
        );
    }

    #[test]
    fn test_heavy_damage_count_counts_each_unit_once() {
        let mut b = CatalogBuilder::default();
        let bomb = b.debuff(DebuffSpec::new("Frost Bomb", 386881));
        b.mechanic(MechanicSpec::for_debuff(bomb).heavy_damage());
        b.mechanic(MechanicSpec::for_cast(CastSignature::new(209676)).heavy_damage());
        let catalogs = b.build().unwrap();

        let model = UnitModel::standard();
        // Party 1 carries the debuff AND an enemy is casting the heavy spell:
        // still one unit under threat, counted once.
        let world = ScriptedWorld::new(
            WorldState::default()
                .with_unit(
                    UnitId::Party(1),
                    UnitState::at(90.0, 10).aura(AuraState::new("Frost Bomb")),
                )
                .with_unit(UnitId::Player, UnitState::at(100.0, 0))
                .with_unit(UnitId::Boss(1), UnitState::at(100.0, 30).casts(209676, 2.0)),
        );

        assert_eq!(model.heavy_damage_count(&world, &catalogs, 40), 2);
        // Player (in range, alive) is selected by the untargeted cast too,
        // party1 both ways but once — total 2.
    }

    #[test]
    fn test_ignore_target_sees_npc_list_and_flagged_debuffs() {
        let mut b = CatalogBuilder::default();
        b.npc(151579, false, true);
        let hypnosis = b.debuff(DebuffSpec::new("Hypnosis", 190174).ignored());
        let catalogs = b.build().unwrap();
        let name = catalogs.auras.get(hypnosis).name;
        let model = UnitModel::standard();

        let by_npc = ScriptedWorld::new(
            WorldState::default()
                .with_unit(UnitId::Target, UnitState::at(100.0, 20))
                .target_npc(151579),
        );
        assert!(model.ignore_target(&by_npc, &catalogs));

        let by_debuff = ScriptedWorld::new(WorldState::default().with_unit(
            UnitId::Target,
            UnitState::at(100.0, 20).aura(AuraState::new(name)),
        ));
        assert!(model.ignore_target(&by_debuff, &catalogs));

        let clean = ScriptedWorld::new(
            WorldState::default().with_unit(UnitId::Target, UnitState::at(100.0, 20)),
        );
        assert!(!model.ignore_target(&clean, &catalogs));
    }
}
