//! Mechanic Table
//!
//! Hazard descriptors: incoming hostile casts and harmful or beneficial
//! status effects that should drive interrupt awareness, defensive timing
//! and damage-intake prediction. Each mechanic is bound to exactly one
//! signature kind; the derived predicates are folds over the frozen table.

use crate::catalog::aura::{AuraId, AuraRegistry};
use crate::catalog::cast::max_gcd;
use crate::constants::{ACTION_DELAY, TANK_INTAKE_FACTOR};
use crate::provider::{GameStateProvider, Role};
use crate::units::{UnitId, UnitModel};

/// Handle into the frozen mechanic table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MechanicId(pub(crate) u16);

/// Incoming-cast signature, with optional targeting refinements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CastSignature {
    pub spell_id: u32,
    /// Only fires against the caster's current target.
    pub targeted: bool,
    /// Only fires against the unit filling the tank role.
    pub on_tank: bool,
}

impl CastSignature {
    pub fn new(spell_id: u32) -> Self {
        Self {
            spell_id,
            targeted: false,
            on_tank: false,
        }
    }

    pub fn targeted(mut self) -> Self {
        self.targeted = true;
        self
    }

    pub fn on_tank(mut self) -> Self {
        self.on_tank = true;
        self
    }
}

/// The one signature a mechanic watches for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MechanicSignature {
    Cast(CastSignature),
    Debuff(AuraId),
    Buff {
        aura: AuraId,
        /// Also watch enemies for the buff, not just the unit itself.
        enemy_scoped: bool,
    },
}

/// A registered hazard descriptor.
#[derive(Clone, Debug)]
pub struct MechanicDef {
    pub signature: MechanicSignature,
    pub is_interrupt: bool,
    pub auto_defend: bool,
    pub heavy_damage: bool,
    pub root_break: bool,
    /// Status-signature defensives: watch only the player rather than any
    /// in-range ally.
    pub on_player_only: bool,
    pub min_stacks: u32,
    /// Damage-intake factor; 1.0 means no effect.
    pub multiplier: f64,
    pub range: i32,
}

/// Registration parameters for a mechanic.
#[derive(Clone, Debug)]
pub struct MechanicSpec {
    def: MechanicDef,
}

impl MechanicSpec {
    fn new(signature: MechanicSignature) -> Self {
        Self {
            def: MechanicDef {
                signature,
                is_interrupt: false,
                auto_defend: false,
                heavy_damage: false,
                root_break: false,
                on_player_only: false,
                min_stacks: 0,
                multiplier: 1.0,
                range: 100,
            },
        }
    }

    pub fn for_cast(signature: CastSignature) -> Self {
        Self::new(MechanicSignature::Cast(signature))
    }

    pub fn for_debuff(aura: AuraId) -> Self {
        Self::new(MechanicSignature::Debuff(aura))
    }

    pub fn for_buff(aura: AuraId) -> Self {
        Self::new(MechanicSignature::Buff {
            aura,
            enemy_scoped: false,
        })
    }

    /// Buff signatures only: also watch in-range enemies for the effect.
    pub fn enemy_scoped(mut self) -> Self {
        if let MechanicSignature::Buff { enemy_scoped, .. } = &mut self.def.signature {
            *enemy_scoped = true;
        }
        self
    }

    pub fn interrupt(mut self) -> Self {
        self.def.is_interrupt = true;
        self
    }

    pub fn auto_defend(mut self) -> Self {
        self.def.auto_defend = true;
        self
    }

    pub fn heavy_damage(mut self) -> Self {
        self.def.heavy_damage = true;
        self
    }

    pub fn root_break(mut self) -> Self {
        self.def.root_break = true;
        self
    }

    pub fn on_player_only(mut self) -> Self {
        self.def.on_player_only = true;
        self
    }

    pub fn min_stacks(mut self, stacks: u32) -> Self {
        self.def.min_stacks = stacks;
        self
    }

    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.def.multiplier = multiplier;
        self
    }

    pub fn range(mut self, range: i32) -> Self {
        self.def.range = range;
        self
    }

    pub(crate) fn into_def(self) -> MechanicDef {
        self.def
    }
}

/// Frozen catalog of hazard descriptors with derived folds.
#[derive(Default)]
pub struct MechanicTable {
    defs: Vec<MechanicDef>,
}

impl MechanicTable {
    pub(crate) fn from_defs(defs: Vec<MechanicDef>) -> Self {
        Self { defs }
    }

    pub fn get(&self, id: MechanicId) -> &MechanicDef {
        &self.defs[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MechanicDef> {
        self.defs.iter()
    }

    /// True while any interrupt mechanic is live: its cast signature matched
    /// by an in-range hostile, or its status debuff present on the player.
    pub fn interrupt_incoming(
        &self,
        world: &dyn GameStateProvider,
        auras: &AuraRegistry,
        units: &UnitModel,
    ) -> bool {
        self.defs.iter().any(|mechanic| {
            if !mechanic.is_interrupt {
                return false;
            }
            match mechanic.signature {
                MechanicSignature::Cast(sig) => units.enemies().iter().any(|&enemy| {
                    world.range_to(enemy) <= mechanic.range
                        && world.casting(enemy) == Some(sig.spell_id)
                }),
                MechanicSignature::Debuff(aura) => {
                    auras.present(world, aura, UnitId::Player, false)
                }
                MechanicSignature::Buff { .. } => false,
            }
        })
    }

    /// True while the player's own in-progress cast should be abandoned: an
    /// interrupt mechanic will land before the cast finishes.
    pub fn stop_current_cast(
        &self,
        world: &dyn GameStateProvider,
        auras: &AuraRegistry,
        units: &UnitModel,
    ) -> bool {
        let own_remaining = world.cast_remaining(UnitId::Player);
        if own_remaining == 0.0 {
            return false;
        }

        self.defs.iter().any(|mechanic| {
            if !mechanic.is_interrupt {
                return false;
            }
            match mechanic.signature {
                MechanicSignature::Cast(sig) => units.enemies().iter().any(|&enemy| {
                    world.casting(enemy) == Some(sig.spell_id)
                        && world.cast_remaining(enemy) <= own_remaining
                }),
                MechanicSignature::Debuff(aura) => {
                    auras.present(world, aura, UnitId::Player, false)
                        && auras.remaining(world, aura, UnitId::Player, false) <= own_remaining
                }
                MechanicSignature::Buff { .. } => false,
            }
        })
    }

    /// True while a defensive is warranted: an auto-defend mechanic lands
    /// within one global cooldown plus the action delay.
    pub fn use_defensive(
        &self,
        world: &dyn GameStateProvider,
        auras: &AuraRegistry,
        units: &UnitModel,
    ) -> bool {
        let threshold = max_gcd(world) + ACTION_DELAY;

        self.defs.iter().any(|mechanic| {
            if !mechanic.auto_defend {
                return false;
            }
            match mechanic.signature {
                MechanicSignature::Cast(sig) => units.enemies().iter().any(|&enemy| {
                    world.casting(enemy) == Some(sig.spell_id)
                        && world.cast_remaining(enemy) <= threshold
                        && (!sig.targeted || world.targeting_player(enemy))
                        && (!sig.on_tank
                            || world.range_to(units.tank(world)) <= mechanic.range)
                }),
                MechanicSignature::Debuff(aura) => {
                    if mechanic.on_player_only {
                        auras.present(world, aura, UnitId::Player, false)
                            && auras.remaining(world, aura, UnitId::Player, false) <= threshold
                    } else {
                        units.friendlies().iter().any(|&unit| {
                            auras.present(world, aura, unit, false)
                                && auras.remaining(world, aura, unit, false) <= threshold
                                && world.range_to(unit) <= mechanic.range
                        })
                    }
                }
                MechanicSignature::Buff { .. } => false,
            }
        })
    }

    /// True while a root-break mechanic's status debuff sits on the player.
    pub fn root_break(&self, world: &dyn GameStateProvider, auras: &AuraRegistry) -> bool {
        self.defs.iter().any(|mechanic| {
            mechanic.root_break
                && matches!(mechanic.signature, MechanicSignature::Debuff(aura)
                    if auras.present(world, aura, UnitId::Player, false))
        })
    }

    /// Predicted damage-intake multiplier for a unit.
    ///
    /// Starts at 1.0, picks up the tank baseline, then folds in each
    /// mechanic whose signature currently matches the unit — multiplied in
    /// at most once per mechanic even when several of its match conditions
    /// hold simultaneously.
    pub fn intake_multiplier(
        &self,
        world: &dyn GameStateProvider,
        auras: &AuraRegistry,
        units: &UnitModel,
        unit: UnitId,
    ) -> f64 {
        let mut multiplier = 1.0;

        if world.role(unit) == Role::Tank {
            multiplier *= TANK_INTAKE_FACTOR;
        }

        for mechanic in &self.defs {
            if mechanic.multiplier == 1.0 {
                continue;
            }

            let matches = match mechanic.signature {
                MechanicSignature::Cast(sig) => {
                    if sig.on_tank && unit != units.tank(world) {
                        false
                    } else {
                        units.enemies().iter().any(|&enemy| {
                            if world.casting(enemy) != Some(sig.spell_id) {
                                return false;
                            }
                            // Range only constrains the player's own
                            // prediction; allies stay covered regardless.
                            if unit.is_player() && world.range_to(enemy) > mechanic.range {
                                return false;
                            }
                            !sig.targeted
                                || (unit.is_player() && world.targeting_player(enemy))
                        })
                    }
                }
                MechanicSignature::Debuff(aura) => auras.present(world, aura, unit, false),
                MechanicSignature::Buff { aura, enemy_scoped } => {
                    if enemy_scoped {
                        units.enemies().iter().any(|&enemy| {
                            (!unit.is_player() || world.range_to(enemy) <= mechanic.range)
                                && auras.present(world, aura, enemy, false)
                        })
                    } else {
                        auras.present(world, aura, unit, false)
                    }
                }
            };

            if matches {
                multiplier *= mechanic.multiplier;
            }
        }

        multiplier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::aura::{BuffSpec, DebuffSpec};
    use crate::catalog::{CatalogBuilder, Catalogs};
    use crate::sim::world::ScriptedWorld;
    use crate::sim::{AuraState, UnitState, WorldState};

    fn hazard_catalogs() -> Catalogs {
        let mut b = CatalogBuilder::default();
        let quake = b.debuff(DebuffSpec::new("Quake", 240447));
        let bomb = b.debuff(DebuffSpec::new("Frost Bomb", 386881));
        let ironbark = b.buff(BuffSpec::new("Ironbark", 102342));
        b.mechanic(MechanicSpec::for_cast(CastSignature::new(377004)).auto_defend().interrupt());
        b.mechanic(MechanicSpec::for_debuff(quake).interrupt());
        b.mechanic(MechanicSpec::for_debuff(bomb).auto_defend().heavy_damage());
        b.mechanic(MechanicSpec::for_cast(CastSignature::new(200901)).heavy_damage().multiplier(0.7));
        b.mechanic(MechanicSpec::for_buff(ironbark).multiplier(1.1));
        b.build().unwrap()
    }

    #[test]
    fn test_interrupt_incoming_from_cast_and_debuff() {
        let catalogs = hazard_catalogs();
        let model = UnitModel::standard();

        let casting = ScriptedWorld::new(
            WorldState::default()
                .with_unit(UnitId::Player, UnitState::at(100.0, 0))
                .with_unit(UnitId::Boss(1), UnitState::at(100.0, 30).casts(377004, 2.5)),
        );
        assert!(catalogs
            .mechanics
            .interrupt_incoming(&casting, &catalogs.auras, &model));

        let afflicted = ScriptedWorld::new(WorldState::default().with_unit(
            UnitId::Player,
            UnitState::at(100.0, 0).aura(AuraState::new("Quake")),
        ));
        assert!(catalogs
            .mechanics
            .interrupt_incoming(&afflicted, &catalogs.auras, &model));

        let quiet = ScriptedWorld::new(
            WorldState::default().with_unit(UnitId::Player, UnitState::at(100.0, 0)),
        );
        assert!(!catalogs
            .mechanics
            .interrupt_incoming(&quiet, &catalogs.auras, &model));
    }

    #[test]
    fn test_stop_current_cast_compares_remaining_times() {
        let catalogs = hazard_catalogs();
        let model = UnitModel::standard();

        // Enemy shout lands before our 2.0s cast finishes.
        let losing_race = ScriptedWorld::new(
            WorldState::default()
                .with_unit(UnitId::Player, UnitState::at(100.0, 0).casts(5176, 2.0))
                .with_unit(UnitId::Boss(1), UnitState::at(100.0, 30).casts(377004, 1.0)),
        );
        assert!(catalogs
            .mechanics
            .stop_current_cast(&losing_race, &catalogs.auras, &model));

        // Our cast finishes first: keep casting.
        let winning_race = ScriptedWorld::new(
            WorldState::default()
                .with_unit(UnitId::Player, UnitState::at(100.0, 0).casts(5176, 0.5))
                .with_unit(UnitId::Boss(1), UnitState::at(100.0, 30).casts(377004, 1.0)),
        );
        assert!(!catalogs
            .mechanics
            .stop_current_cast(&winning_race, &catalogs.auras, &model));

        // Not casting at all: nothing to stop.
        let idle = ScriptedWorld::new(
            WorldState::default()
                .with_unit(UnitId::Player, UnitState::at(100.0, 0))
                .with_unit(UnitId::Boss(1), UnitState::at(100.0, 30).casts(377004, 1.0)),
        );
        assert!(!catalogs
            .mechanics
            .stop_current_cast(&idle, &catalogs.auras, &model));
    }

    #[test]
    fn test_use_defensive_threshold() {
        let catalogs = hazard_catalogs();
        let model = UnitModel::standard();

        // No haste: threshold = 1.5 + 0.4 = 1.9s.
        let imminent = ScriptedWorld::new(
            WorldState::default()
                .with_unit(UnitId::Player, UnitState::at(100.0, 0))
                .with_unit(UnitId::Boss(1), UnitState::at(100.0, 30).casts(377004, 1.8)),
        );
        assert!(catalogs
            .mechanics
            .use_defensive(&imminent, &catalogs.auras, &model));

        let distant = ScriptedWorld::new(
            WorldState::default()
                .with_unit(UnitId::Player, UnitState::at(100.0, 0))
                .with_unit(UnitId::Boss(1), UnitState::at(100.0, 30).casts(377004, 2.5)),
        );
        assert!(!catalogs
            .mechanics
            .use_defensive(&distant, &catalogs.auras, &model));

        // Debuff-signature defensive on an ally about to pop.
        let ally_bomb = ScriptedWorld::new(
            WorldState::default()
                .with_unit(UnitId::Player, UnitState::at(100.0, 0))
                .with_unit(
                    UnitId::Party(1),
                    UnitState::at(90.0, 15).aura(AuraState::new("Frost Bomb").remaining(1.0)),
                ),
        );
        assert!(catalogs
            .mechanics
            .use_defensive(&ally_bomb, &catalogs.auras, &model));
    }

    #[test]
    fn test_intake_multiplier_folds_once_per_mechanic() {
        let catalogs = hazard_catalogs();
        let model = UnitModel::standard();

        // Two enemies casting the same 0.7x storm: contributes once.
        let double_storm = ScriptedWorld::new(
            WorldState::default()
                .with_unit(UnitId::Party(1), UnitState::at(60.0, 10))
                .with_unit(UnitId::Boss(1), UnitState::at(100.0, 30).casts(200901, 2.0))
                .with_unit(UnitId::Boss(2), UnitState::at(100.0, 30).casts(200901, 2.0)),
        );
        let m = catalogs.mechanics.intake_multiplier(
            &double_storm,
            &catalogs.auras,
            &model,
            UnitId::Party(1),
        );
        assert!((m - 0.7).abs() < 1e-9);

        // Health applies the fold with ceiling and cap.
        assert_eq!(model.health(&double_storm, &catalogs, UnitId::Party(1)), 42);
    }

    #[test]
    fn test_intake_multiplier_tank_baseline_and_buff() {
        let catalogs = hazard_catalogs();
        let model = UnitModel::standard();

        let world = ScriptedWorld::new(
            WorldState::default().with_unit(
                UnitId::Party(1),
                UnitState::at(90.0, 10)
                    .role(Role::Tank)
                    .aura(AuraState::new("Ironbark")),
            ),
        );
        let m = catalogs
            .mechanics
            .intake_multiplier(&world, &catalogs.auras, &model, UnitId::Party(1));
        assert!((m - 1.1 * 1.1).abs() < 1e-9);

        // 90 * 1.21 caps at 100.
        assert_eq!(model.health(&world, &catalogs, UnitId::Party(1)), 100);
    }

    #[test]
    fn test_root_break_fold() {
        let mut b = CatalogBuilder::default();
        let bindings = b.debuff(DebuffSpec::new("Icy Bindings", 377488));
        b.mechanic(MechanicSpec::for_debuff(bindings).root_break());
        let catalogs = b.build().unwrap();

        let rooted = ScriptedWorld::new(WorldState::default().with_unit(
            UnitId::Player,
            UnitState::at(100.0, 0).aura(AuraState::new("Icy Bindings")),
        ));
        assert!(catalogs.mechanics.root_break(&rooted, &catalogs.auras));

        let free = ScriptedWorld::new(
            WorldState::default().with_unit(UnitId::Player, UnitState::at(100.0, 0)),
        );
        assert!(!catalogs.mechanics.root_break(&free, &catalogs.auras));
    }
}
