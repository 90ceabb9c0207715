//! Per-Tick Context
//!
//! A read-mostly borrow bundle handed to every rule: the provider snapshot,
//! the executor, the frozen catalogs and the roster, plus the handful of
//! bindings the ladder reads repeatedly. Bindings are computed once when
//! the tick opens and passed down — rules never stash shared mutable state
//! between each other.

use crate::catalog::cast;
use crate::catalog::{AuraId, CastId, Catalogs, DispelClass, SettingId, SettingKind, ToggleId};
use crate::constants::DEFAULT_RANGE;
use crate::provider::{ActionExecutor, GameStateProvider};
use crate::units::{UnitId, UnitModel};

/// One tick's view of the world.
pub struct Tick<'a> {
    pub world: &'a dyn GameStateProvider,
    actions: &'a mut dyn ActionExecutor,
    pub catalogs: &'a Catalogs,
    pub units: &'a UnitModel,
    /// Health of the lowest in-range friendly at tick open (sentinel 999
    /// when nobody is in range).
    pub lowest_health: i32,
    /// An attackable, alive target exists.
    pub has_target: bool,
    /// The target should be left out of offensive work: immune, on the
    /// ignore list, or carrying an ignore-flagged debuff.
    pub ignore_target: bool,
}

impl<'a> Tick<'a> {
    pub fn new(
        world: &'a dyn GameStateProvider,
        actions: &'a mut dyn ActionExecutor,
        catalogs: &'a Catalogs,
        units: &'a UnitModel,
    ) -> Self {
        let lowest = units.lowest_unit(world, catalogs, DEFAULT_RANGE, |_| true);
        let lowest_health = units.health(world, catalogs, lowest);
        let has_target =
            units.health(world, catalogs, UnitId::Target) > 0 && world.can_attack_target();
        let ignore_target = catalogs.auras.immune(world, UnitId::Target)
            || units.ignore_target(world, catalogs);

        Self {
            world,
            actions,
            catalogs,
            units,
            lowest_health,
            has_target,
            ignore_target,
        }
    }

    // --- unit queries ---

    pub fn hp(&self, unit: UnitId) -> i32 {
        self.units.health(self.world, self.catalogs, unit)
    }

    pub fn lowest_unit(&self, range: i32, predicate: impl Fn(UnitId) -> bool) -> UnitId {
        self.units
            .lowest_unit(self.world, self.catalogs, range, predicate)
    }

    pub fn units_fitting(&self, range: i32, predicate: impl Fn(UnitId) -> bool) -> u32 {
        self.units
            .units_fitting(self.world, self.catalogs, range, predicate)
    }

    pub fn heavy_damage_count(&self, range: i32) -> u32 {
        self.units
            .heavy_damage_count(self.world, self.catalogs, range)
    }

    pub fn tank(&self) -> UnitId {
        self.units.tank(self.world)
    }

    pub fn dispel_unit(&self, capability: &[DispelClass], range: i32) -> UnitId {
        self.units
            .dispel_unit(self.world, self.catalogs, capability, range)
    }

    // --- aura queries ---

    /// Presence from any source.
    pub fn has_aura(&self, aura: AuraId, unit: UnitId) -> bool {
        self.catalogs.auras.present(self.world, aura, unit, false)
    }

    /// Presence of the player's own application.
    pub fn has_own(&self, aura: AuraId, unit: UnitId) -> bool {
        self.catalogs.auras.present(self.world, aura, unit, true)
    }

    pub fn stacks(&self, aura: AuraId, unit: UnitId) -> u32 {
        self.catalogs.auras.stacks(self.world, aura, unit)
    }

    pub fn needs_refresh(&self, aura: AuraId, unit: UnitId) -> bool {
        self.catalogs.auras.needs_refresh(self.world, aura, unit)
    }

    pub fn enraged(&self, unit: UnitId) -> bool {
        self.catalogs.auras.enraged(self.world, unit)
    }

    // --- cast queries ---

    pub fn usable(&self, cast: CastId, unit: UnitId) -> bool {
        self.catalogs.casts.usable(self.world, cast, unit)
    }

    pub fn usable_ignoring_resource(&self, cast: CastId, unit: UnitId) -> bool {
        self.catalogs
            .casts
            .usable_ignoring_resource(self.world, cast, unit)
    }

    pub fn usable_ignoring_resource_and_range(&self, cast: CastId) -> bool {
        self.catalogs
            .casts
            .usable_ignoring_resource_and_range(self.world, cast)
    }

    /// Whether the player's in-progress cast is this spell.
    pub fn player_casting(&self, cast: CastId) -> bool {
        match self.catalogs.casts.get(cast).numeric_id() {
            Some(id) => self.world.casting(UnitId::Player) == Some(id),
            None => false,
        }
    }

    /// Global cooldown remaining after the queue-ahead delay.
    pub fn gcd(&self) -> f64 {
        cast::gcd(self.world)
    }

    // --- mechanic folds ---

    pub fn interrupt_incoming(&self) -> bool {
        self.catalogs
            .mechanics
            .interrupt_incoming(self.world, &self.catalogs.auras, self.units)
    }

    pub fn stop_current_cast(&self) -> bool {
        self.catalogs
            .mechanics
            .stop_current_cast(self.world, &self.catalogs.auras, self.units)
    }

    pub fn use_defensive(&self) -> bool {
        self.catalogs
            .mechanics
            .use_defensive(self.world, &self.catalogs.auras, self.units)
    }

    pub fn root_break(&self) -> bool {
        self.catalogs
            .mechanics
            .root_break(self.world, &self.catalogs.auras)
    }

    // --- configuration ---

    /// Boolean option value, falling back to the registered default when
    /// the provider has nothing stored.
    pub fn setting(&self, id: SettingId) -> bool {
        let def = self.catalogs.settings.setting(id);
        match def.kind {
            SettingKind::Bool { default } => {
                self.world.option_bool(&def.key).unwrap_or(default)
            }
            SettingKind::Choice { .. } => false,
        }
    }

    /// Selected value of a choice option.
    pub fn choice(&self, id: SettingId) -> &'static str {
        let def = self.catalogs.settings.setting(id);
        match def.kind {
            SettingKind::Choice { values, default } => {
                let index = self
                    .world
                    .option_choice(&def.key)
                    .filter(|&i| i < values.len())
                    .unwrap_or(default);
                values[index]
            }
            SettingKind::Bool { .. } => "",
        }
    }

    pub fn toggled(&self, id: ToggleId) -> bool {
        self.world
            .toggle_enabled(self.catalogs.settings.toggle(id).name)
    }

    // --- actions ---

    pub fn cast(&mut self, cast: CastId) {
        self.catalogs.casts.issue(self.actions, cast);
    }

    pub fn cast_at(&mut self, cast: CastId, unit: UnitId) {
        self.catalogs.casts.issue_at(self.actions, cast, unit);
    }

    pub fn cast_on_self(&mut self, cast: CastId) {
        self.catalogs.casts.issue_on_self(self.actions, cast);
    }

    pub fn cancel_cast(&mut self) {
        self.actions.cancel_cast();
    }
}
