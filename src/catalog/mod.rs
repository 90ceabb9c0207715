//! Startup Catalogs
//!
//! Everything the routine can track or do is declared once, up front,
//! through [`CatalogBuilder`] and frozen into [`Catalogs`] before the first
//! tick. Registration hands back small copyable handles; tick-time code
//! never mutates a catalog and never looks anything up by name.
//!
//! Validation happens at [`CatalogBuilder::build`]: a misconfigured
//! definition is a startup error, not a tick-time surprise.

pub mod aura;
pub mod cast;
pub mod mechanic;

use thiserror::Error;

pub use aura::{AuraDef, AuraId, AuraKind, AuraRegistry, BuffSpec, DebuffSpec, DispelClass};
pub use cast::{CastCatalog, CastDef, CastId, CastKind, ItemKind};
pub use mechanic::{CastSignature, MechanicDef, MechanicId, MechanicSignature, MechanicSpec, MechanicTable};

/// Configuration errors surfaced while freezing the catalogs.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("debuff '{name}' is dispel-eligible but carries no dispel class")]
    DispellableWithoutClass { name: &'static str },
    #[error("choice setting '{name}' has no values")]
    EmptyChoice { name: &'static str },
    #[error("choice setting '{name}' defaults outside its value list")]
    ChoiceDefaultOutOfRange { name: &'static str },
}

/// Handle to a registered option.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SettingId(u16);

/// Handle to a registered toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ToggleId(u16);

/// Handle to a registered talent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TalentId(u16);

/// Value shape of an option.
#[derive(Clone, Debug)]
pub enum SettingKind {
    Bool { default: bool },
    Choice {
        values: &'static [&'static str],
        default: usize,
    },
}

/// A registered user-facing option.
#[derive(Clone, Debug)]
pub struct SettingDef {
    /// Stable lookup key the provider is queried with.
    pub key: String,
    pub display_name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub kind: SettingKind,
}

/// A registered on/off toggle.
#[derive(Clone, Debug)]
pub struct ToggleDef {
    pub name: &'static str,
}

/// A registered talent whose selection state gates behavior.
#[derive(Clone, Copy, Debug)]
pub struct TalentDef {
    pub id: u32,
}

/// Options, toggles and talents declared by the routine.
#[derive(Default)]
pub struct SettingRegistry {
    settings: Vec<SettingDef>,
    toggles: Vec<ToggleDef>,
    talents: Vec<TalentDef>,
}

impl SettingRegistry {
    pub fn setting(&self, id: SettingId) -> &SettingDef {
        &self.settings[id.0 as usize]
    }

    pub fn toggle(&self, id: ToggleId) -> &ToggleDef {
        &self.toggles[id.0 as usize]
    }

    pub fn talent(&self, id: TalentId) -> &TalentDef {
        &self.talents[id.0 as usize]
    }

    pub fn settings(&self) -> &[SettingDef] {
        &self.settings
    }
}

/// A notable creature id: ignored for targeting, or a priority kill.
#[derive(Clone, Copy, Debug)]
pub struct NpcDef {
    pub id: u32,
    pub priority: bool,
    pub ignore: bool,
}

/// Registered creature ids with targeting relevance.
#[derive(Default)]
pub struct NpcTable {
    defs: Vec<NpcDef>,
}

impl NpcTable {
    pub fn is_ignored(&self, npc_id: u32) -> bool {
        self.defs.iter().any(|npc| npc.ignore && npc.id == npc_id)
    }

    pub fn is_priority(&self, npc_id: u32) -> bool {
        self.defs.iter().any(|npc| npc.priority && npc.id == npc_id)
    }
}

/// The frozen startup catalogs.
#[derive(Default)]
pub struct Catalogs {
    pub auras: AuraRegistry,
    pub casts: CastCatalog,
    pub mechanics: MechanicTable,
    pub settings: SettingRegistry,
    pub npcs: NpcTable,
}

/// Startup-only registration interface. Collects definitions, validates and
/// freezes them into [`Catalogs`].
#[derive(Default)]
pub struct CatalogBuilder {
    auras: Vec<AuraDef>,
    casts: Vec<CastDef>,
    mechanics: Vec<MechanicDef>,
    settings: Vec<SettingDef>,
    toggles: Vec<ToggleDef>,
    talents: Vec<TalentDef>,
    npcs: Vec<NpcDef>,
}

impl CatalogBuilder {
    pub fn buff(&mut self, spec: BuffSpec) -> AuraId {
        self.push_aura(AuraDef {
            name: spec.name,
            id: spec.id,
            dispel_class: None,
            priority: 0,
            refresh_threshold: spec.refresh_threshold,
            kind: AuraKind::Buff {
                enrage: spec.enrage,
                immunity: spec.immunity,
            },
        })
    }

    pub fn debuff(&mut self, spec: DebuffSpec) -> AuraId {
        self.push_aura(AuraDef {
            name: spec.name,
            id: spec.id,
            dispel_class: spec.dispel_class,
            // Priorities outside the 0–2 band are clamped, not rejected.
            priority: spec.priority.min(2),
            refresh_threshold: spec.refresh_threshold,
            kind: AuraKind::Debuff {
                dispellable: spec.dispellable,
                min_dispel_stacks: spec.min_dispel_stacks,
                decay_window: spec.decay_window,
                ignore: spec.ignore,
            },
        })
    }

    fn push_aura(&mut self, def: AuraDef) -> AuraId {
        let id = AuraId(self.auras.len() as u16);
        self.auras.push(def);
        id
    }

    pub fn spell(&mut self, name: &'static str, id: u32, range: i32) -> CastId {
        self.push_cast(CastDef {
            name,
            range,
            kind: CastKind::Spell { id },
        })
    }

    pub fn item(&mut self, name: &'static str, id: u32, range: i32, kind: ItemKind) -> CastId {
        self.push_cast(CastDef {
            name,
            range,
            kind: CastKind::Item { id, kind },
        })
    }

    pub fn macro_cast(&mut self, name: &'static str, text: &'static str, range: i32) -> CastId {
        self.push_cast(CastDef {
            name,
            range,
            kind: CastKind::Macro { text },
        })
    }

    fn push_cast(&mut self, def: CastDef) -> CastId {
        let id = CastId(self.casts.len() as u16);
        self.casts.push(def);
        id
    }

    pub fn mechanic(&mut self, spec: MechanicSpec) -> MechanicId {
        let id = MechanicId(self.mechanics.len() as u16);
        self.mechanics.push(spec.into_def());
        id
    }

    pub fn npc(&mut self, id: u32, priority: bool, ignore: bool) {
        self.npcs.push(NpcDef { id, priority, ignore });
    }

    pub fn setting_bool(
        &mut self,
        display_name: &'static str,
        default: bool,
        description: &'static str,
        category: &'static str,
    ) -> SettingId {
        self.push_setting(SettingDef {
            key: display_name.to_lowercase(),
            display_name,
            description,
            category,
            kind: SettingKind::Bool { default },
        })
    }

    pub fn setting_choice(
        &mut self,
        display_name: &'static str,
        values: &'static [&'static str],
        description: &'static str,
        category: &'static str,
    ) -> SettingId {
        self.push_setting(SettingDef {
            key: display_name.to_lowercase(),
            display_name,
            description,
            category,
            kind: SettingKind::Choice { values, default: 0 },
        })
    }

    fn push_setting(&mut self, def: SettingDef) -> SettingId {
        let id = SettingId(self.settings.len() as u16);
        self.settings.push(def);
        id
    }

    pub fn toggle(&mut self, name: &'static str) -> ToggleId {
        let id = ToggleId(self.toggles.len() as u16);
        self.toggles.push(ToggleDef { name });
        id
    }

    pub fn talent(&mut self, id: u32) -> TalentId {
        let handle = TalentId(self.talents.len() as u16);
        self.talents.push(TalentDef { id });
        handle
    }

    /// Validate and freeze. Fails fast on misconfiguration so tick-time
    /// logic never sees an inconsistent definition.
    pub fn build(self) -> Result<Catalogs, CatalogError> {
        for def in &self.auras {
            if let AuraKind::Debuff {
                dispellable: true, ..
            } = def.kind
            {
                if def.dispel_class.is_none() {
                    return Err(CatalogError::DispellableWithoutClass { name: def.name });
                }
            }
        }

        for def in &self.settings {
            if let SettingKind::Choice { values, default } = &def.kind {
                if values.is_empty() {
                    return Err(CatalogError::EmptyChoice {
                        name: def.display_name,
                    });
                }
                if *default >= values.len() {
                    return Err(CatalogError::ChoiceDefaultOutOfRange {
                        name: def.display_name,
                    });
                }
            }
        }

        Ok(Catalogs {
            auras: AuraRegistry::from_defs(self.auras),
            casts: CastCatalog::from_defs(self.casts),
            mechanics: MechanicTable::from_defs(self.mechanics),
            settings: SettingRegistry {
                settings: self.settings,
                toggles: self.toggles,
                talents: self.talents,
            },
            npcs: NpcTable { defs: self.npcs },
        })
    }
}
