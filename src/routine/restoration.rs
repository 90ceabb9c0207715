//! Restoration Druid Routine
//!
//! The shipped agent build: catalog registration for its spells, items,
//! auras, hazards and options, plus the priority ladder itself.
//!
//! ## Ladder shape
//!
//! 1. Abort — cancel an in-flight cast that is about to be wasted
//! 2. Emergency defense — bear-form sequence while a heavy hit is incoming
//! 3. GCD gate — wait out the global cooldown and channels
//! 4. Upkeep — out-of-combat group buff refresh
//! 5. Cooldowns — clutch throughput and self-preservation
//! 6. Utility — dispel, soothe, root break, priority targets
//! 7. Heavy-damage prep — pre-emptive group heal when a raid hit is due
//! 8. Steady state — the maintenance healing core
//! 9. Fallback damage — contribute damage while everyone is healthy
//!
//! Evaluation is first-match: the moment a rule's guard holds its action is
//! issued and the tick ends.

use crate::catalog::{
    AuraId, BuffSpec, CastId, CastSignature, CatalogBuilder, DebuffSpec, DispelClass, ItemKind,
    MechanicSpec, SettingId, ToggleId,
};
use crate::constants::{ACTION_DELAY, CRISIS_HEALTH, DEFAULT_RANGE, GROUP_SCAN_RANGE, STABLE_HEALTH};
use crate::engine::{Group, Rule, Tick, Verdict};
use crate::provider::GameStateProvider;
use crate::units::UnitId;

use Verdict::{Handled, NotHandled};

const TRINKET_TARGETS: &[&str] = &["No Target", "Player", "Lowest Ally", "Target"];

/// Creature id of the season's exploding add, focused on sight.
const EXPLOSIVES_NPC: u32 = 120651;

/// Every handle the restoration ladder reads.
pub struct RestorationProfile {
    /// Debuff classes this build can remove.
    pub capability: &'static [DispelClass],

    // options
    pub bear_form_setting: SettingId,
    pub cat_form_setting: SettingId,
    pub weapon_item_setting: SettingId,
    pub explosive_setting: SettingId,
    pub soothe_setting: SettingId,
    pub healthstone_setting: SettingId,
    pub potion_setting: SettingId,
    pub trinket1_setting: SettingId,
    pub trinket2_setting: SettingId,
    pub trinket1_target: SettingId,
    pub trinket2_target: SettingId,

    // toggles
    pub dispel_toggle: ToggleId,
    pub burst_toggle: ToggleId,

    // spells
    pub adaptive_swarm: CastId,
    pub barkskin: CastId,
    pub bear_form: CastId,
    pub cat_form: CastId,
    pub cenarion_ward: CastId,
    pub convoke: CastId,
    pub flourish: CastId,
    pub frenzied_regeneration: CastId,
    pub innervate: CastId,
    pub ironbark: CastId,
    pub lifebloom: CastId,
    pub mark_of_the_wild: CastId,
    pub moonfire: CastId,
    pub moonkin_form: CastId,
    pub natures_cure: CastId,
    pub natures_swiftness: CastId,
    pub natures_vigil: CastId,
    pub regrowth: CastId,
    pub rejuvenation: CastId,
    pub renewal: CastId,
    pub soothe: CastId,
    pub starfire: CastId,
    pub starsurge: CastId,
    pub sunfire: CastId,
    pub swiftmend: CastId,
    pub tranquility: CastId,
    pub wild_growth: CastId,
    pub wrath: CastId,

    // items
    pub healthstone: CastId,
    pub healing_potion: CastId,
    pub weapon_item: CastId,
    pub trinket1: CastId,
    pub trinket2: CastId,

    // own buffs
    pub adaptive_swarm_buff: AuraId,
    pub barkskin_buff: AuraId,
    pub bear_form_buff: AuraId,
    pub cat_form_buff: AuraId,
    pub clearcasting_buff: AuraId,
    pub incarnation_buff: AuraId,
    pub ironbark_buff: AuraId,
    pub lifebloom_buff: AuraId,
    pub lifebloom_undergrowth_buff: AuraId,
    pub mark_buff: AuraId,
    pub moonkin_form_buff: AuraId,
    pub natures_swiftness_buff: AuraId,
    pub regrowth_buff: AuraId,
    pub rejuvenation_buff: AuraId,
    pub soul_of_the_forest_buff: AuraId,
    pub travel_form_buff: AuraId,
    pub wild_growth_buff: AuraId,

    // own debuffs
    pub adaptive_swarm_debuff: AuraId,
    pub moonfire_debuff: AuraId,
    pub sunfire_debuff: AuraId,

    pub explosives_npc: u32,
}

impl RestorationProfile {
    /// Register the full build into `b` and keep the handles the ladder
    /// needs.
    pub fn register(b: &mut CatalogBuilder) -> Self {
        // ------------------------------------------------------------------
        // Options & toggles
        // ------------------------------------------------------------------
        let bear_form_setting = b.setting_bool(
            "Bear Form Mechanics",
            true,
            "Shift into Bear Form when a heavy mechanic is incoming?",
            "Auto Form",
        );
        let cat_form_setting = b.setting_bool(
            "Cat Form break Root",
            true,
            "Shift into Cat Form when rooted?",
            "Auto Form",
        );
        let weapon_item_setting = b.setting_bool(
            "Neural Synapse Enhancer",
            false,
            "Is the Neural Synapse Enhancer equipped?",
            "Items",
        );
        let healthstone_setting = b.setting_bool(
            "Healthstone Healing",
            true,
            "Use a Healthstone when critically low?",
            "Items",
        );
        let potion_setting = b.setting_bool(
            "Refreshing Healing Potion",
            false,
            "Use a Refreshing Healing Potion when critically low?",
            "Items",
        );
        let trinket1_setting = b.setting_bool("Trinket 1", false, "Use trinket 1 for healing?", "Items");
        let trinket2_setting = b.setting_bool("Trinket 2", false, "Use trinket 2 for healing?", "Items");
        let trinket1_target = b.setting_choice(
            "Trinket 1 target",
            TRINKET_TARGETS,
            "Which target should trinket 1 be cast on?",
            "Items",
        );
        let trinket2_target = b.setting_choice(
            "Trinket 2 target",
            TRINKET_TARGETS,
            "Which target should trinket 2 be cast on?",
            "Items",
        );
        let explosive_setting = b.setting_bool(
            "Explosive",
            true,
            "Focus Explosives when targeted?",
            "Priority",
        );
        let soothe_setting = b.setting_bool(
            "Soothe",
            true,
            "Soothe enraged enemies?",
            "Utility",
        );

        let dispel_toggle = b.toggle("Dispel");
        let burst_toggle = b.toggle("IncomingBurst");

        // ------------------------------------------------------------------
        // Casts
        // ------------------------------------------------------------------
        let adaptive_swarm = b.spell("Adaptive Swarm", 391888, DEFAULT_RANGE);
        let barkskin = b.spell("Barkskin", 22812, DEFAULT_RANGE);
        let bear_form = b.spell("Bear Form", 5487, DEFAULT_RANGE);
        let cat_form = b.spell("Cat Form", 768, DEFAULT_RANGE);
        let cenarion_ward = b.spell("Cenarion Ward", 102351, DEFAULT_RANGE);
        let convoke = b.spell("Convoke the Spirits", 391528, DEFAULT_RANGE);
        let flourish = b.spell("Flourish", 197721, DEFAULT_RANGE);
        let frenzied_regeneration = b.spell("Frenzied Regeneration", 22842, DEFAULT_RANGE);
        let innervate = b.spell("Innervate", 29166, DEFAULT_RANGE);
        let ironbark = b.spell("Ironbark", 102342, DEFAULT_RANGE);
        let lifebloom = b.spell("Lifebloom", 33763, DEFAULT_RANGE);
        let mark_of_the_wild = b.spell("Mark of the Wild", 1126, DEFAULT_RANGE);
        let moonfire = b.spell("Moonfire", 8921, DEFAULT_RANGE);
        let moonkin_form = b.spell("Moonkin Form", 197625, DEFAULT_RANGE);
        let natures_cure = b.spell("Nature's Cure", 88423, DEFAULT_RANGE);
        let natures_swiftness = b.spell("Nature's Swiftness", 132158, DEFAULT_RANGE);
        let natures_vigil = b.spell("Nature's Vigil", 124974, DEFAULT_RANGE);
        let regrowth = b.spell("Regrowth", 8936, DEFAULT_RANGE);
        let rejuvenation = b.spell("Rejuvenation", 774, DEFAULT_RANGE);
        let renewal = b.spell("Renewal", 108238, DEFAULT_RANGE);
        let soothe = b.spell("Soothe", 2908, DEFAULT_RANGE);
        let starfire = b.spell("Starfire", 197628, DEFAULT_RANGE);
        let starsurge = b.spell("Starsurge", 197626, DEFAULT_RANGE);
        let sunfire = b.spell("Sunfire", 93402, DEFAULT_RANGE);
        let swiftmend = b.spell("Swiftmend", 18562, DEFAULT_RANGE);
        let tranquility = b.spell("Tranquility", 740, DEFAULT_RANGE);
        let wild_growth = b.spell("Wild Growth", 48438, DEFAULT_RANGE);
        let wrath = b.spell("Wrath", 5176, DEFAULT_RANGE);

        let healthstone = b.item("Healthstone", 5512, 100, ItemKind::Consumable);
        let healing_potion = b.item("Refreshing Healing Potion", 191380, 100, ItemKind::Potion);
        let weapon_item = b.item("Neural Synapse Enhancer", 168973, DEFAULT_RANGE, ItemKind::Weapon);
        let trinket1 = b.item("trinket1", 1, DEFAULT_RANGE, ItemKind::Trinket { slot: 1 });
        let trinket2 = b.item("trinket2", 2, DEFAULT_RANGE, ItemKind::Trinket { slot: 2 });

        // ------------------------------------------------------------------
        // Own auras
        // ------------------------------------------------------------------
        let adaptive_swarm_buff = b.buff(BuffSpec::new("Adaptive Swarm", 391891));
        let barkskin_buff = b.buff(BuffSpec::new("Barkskin", 22812));
        let bear_form_buff = b.buff(BuffSpec::new("Bear Form", 5487));
        let cat_form_buff = b.buff(BuffSpec::new("Cat Form", 768));
        let clearcasting_buff = b.buff(BuffSpec::new("Clearcasting", 16870));
        let incarnation_buff = b.buff(BuffSpec::new("Incarnation: Tree of Life", 33819));
        let ironbark_buff = b.buff(BuffSpec::new("Ironbark", 102342));
        let lifebloom_buff = b.buff(BuffSpec::new("Lifebloom", 33763).refresh(3.0));
        let lifebloom_undergrowth_buff =
            b.buff(BuffSpec::new("Lifebloom (Undergrowth)", 188550).refresh(3.0));
        let mark_buff = b.buff(BuffSpec::new("Mark of the Wild", 1126).refresh(300.0));
        let moonkin_form_buff = b.buff(BuffSpec::new("Moonkin Form", 197625));
        let natures_swiftness_buff = b.buff(BuffSpec::new("Nature's Swiftness", 132158));
        let regrowth_buff = b.buff(BuffSpec::new("Regrowth", 8936));
        let rejuvenation_buff = b.buff(BuffSpec::new("Rejuvenation", 774).refresh(3.0));
        let soul_of_the_forest_buff = b.buff(BuffSpec::new("Soul of the Forest", 114108));
        let travel_form_buff = b.buff(BuffSpec::new("Travel Form", 783));
        let wild_growth_buff = b.buff(BuffSpec::new("Wild Growth", 48438));

        let adaptive_swarm_debuff = b.debuff(DebuffSpec::new("Adaptive Swarm", 325733));
        let moonfire_debuff = b.debuff(DebuffSpec::new("Moonfire", 164812).refresh(3.0));
        let sunfire_debuff = b.debuff(DebuffSpec::new("Sunfire", 164815).refresh(2.0));

        // ------------------------------------------------------------------
        // Hazards
        // ------------------------------------------------------------------
        register_hazards(b, ironbark_buff, barkskin_buff);

        b.npc(EXPLOSIVES_NPC, true, false);
        b.npc(190174, false, true); // hypnosis bat
        b.npc(89011, false, true); // rylak skyterror
        b.npc(151579, false, true);

        Self {
            capability: &[DispelClass::Magic, DispelClass::Curse, DispelClass::Poison],
            bear_form_setting,
            cat_form_setting,
            weapon_item_setting,
            explosive_setting,
            soothe_setting,
            healthstone_setting,
            potion_setting,
            trinket1_setting,
            trinket2_setting,
            trinket1_target,
            trinket2_target,
            dispel_toggle,
            burst_toggle,
            adaptive_swarm,
            barkskin,
            bear_form,
            cat_form,
            cenarion_ward,
            convoke,
            flourish,
            frenzied_regeneration,
            innervate,
            ironbark,
            lifebloom,
            mark_of_the_wild,
            moonfire,
            moonkin_form,
            natures_cure,
            natures_swiftness,
            natures_vigil,
            regrowth,
            rejuvenation,
            renewal,
            soothe,
            starfire,
            starsurge,
            sunfire,
            swiftmend,
            tranquility,
            wild_growth,
            wrath,
            healthstone,
            healing_potion,
            weapon_item,
            trinket1,
            trinket2,
            adaptive_swarm_buff,
            barkskin_buff,
            bear_form_buff,
            cat_form_buff,
            clearcasting_buff,
            incarnation_buff,
            ironbark_buff,
            lifebloom_buff,
            lifebloom_undergrowth_buff,
            mark_buff,
            moonkin_form_buff,
            natures_swiftness_buff,
            regrowth_buff,
            rejuvenation_buff,
            soul_of_the_forest_buff,
            travel_form_buff,
            wild_growth_buff,
            adaptive_swarm_debuff,
            moonfire_debuff,
            sunfire_debuff,
            explosives_npc: EXPLOSIVES_NPC,
        }
    }
}

/// Encounter hazard data: enrage effects, the dispellable-debuff table and
/// the mechanic watch list.
fn register_hazards(b: &mut CatalogBuilder, ironbark_buff: AuraId, barkskin_buff: AuraId) {
    // Enrage effects worth soothing off enemies.
    for (name, id) in [
        ("Agitation", 390938),
        ("Call of the Flock", 377389),
        ("Enrage Affix", 228318),
        ("Enrage Angerhoof Bull", 190225),
        ("Enraged Regeneration", 397410),
        ("Ferocity", 211477),
        ("Fit of Rage", 396018),
        ("Raging Kin", 383067),
    ] {
        b.buff(BuffSpec::new(name, id).enrage());
    }

    // Dispellable debuffs at their configured urgency.
    use DispelClass::{Curse, Disease, Magic, Poison};
    for (name, id, class, priority) in [
        ("Absolute Zero", 396722, Magic, 1),
        ("Bewitch", 211370, Magic, 2),
        ("Bloodcurdling Shout", 373395, Magic, 2),
        ("Conductive Strike", 376827, Magic, 2),
        ("Death Venom", 156717, Poison, 1),
        ("Enveloping Winds", 224333, Magic, 2),
        ("Forbidden Knowledge", 371352, Magic, 2),
        ("Frightful Roar", 386063, Magic, 2),
        ("Icy Bindings", 377488, Magic, 1),
        ("Monotonous Lecture", 388392, Magic, 2),
        ("Necrotic Burst", 156718, Disease, 1),
        ("Plague Spit", 153524, Disease, 1),
        ("Rotting Wind", 387629, Disease, 2),
        ("Seal Magic", 309404, Magic, 1),
        ("Thunder Clap", 386028, Magic, 0),
        ("Touch of Nothingness", 106113, Magic, 2),
        ("Touch of Ruin", 397911, Curse, 1),
        ("Unlucky Strike", 385313, Curse, 2),
        ("Waking Bane", 386549, Magic, 2),
    ] {
        b.debuff(DebuffSpec::new(name, id).dispel(class).priority(priority));
    }

    // Stacking debuffs only worth a dispel past their threshold.
    let burst = b.debuff(
        DebuffSpec::new("Burst", 240443)
            .dispel(Magic)
            .priority(0)
            .min_stacks(5),
    );
    b.debuff(DebuffSpec::new("Mystic Vapors", 387564).dispel(Magic).min_stacks(2));
    b.debuff(DebuffSpec::new("Oppressive Miasma", 388777).dispel(Magic).priority(0).min_stacks(5));
    b.debuff(DebuffSpec::new("Primal Chill", 372682).dispel(Magic).min_stacks(3));

    // Undispellable hazard markers.
    let frost_bomb = b.debuff(DebuffSpec::new("Frost Bomb", 386881));
    let quake = b.debuff(DebuffSpec::new("Quake", 240447));

    // Mechanic watch list.
    b.mechanic(MechanicSpec::for_debuff(burst).min_stacks(5).heavy_damage());
    b.mechanic(MechanicSpec::for_cast(CastSignature::new(377004)).auto_defend().interrupt()); // Deafening Screech
    b.mechanic(MechanicSpec::for_cast(CastSignature::new(384365)).interrupt()); // Disruptive Shout
    b.mechanic(MechanicSpec::for_cast(CastSignature::new(200901)).heavy_damage().multiplier(0.7)); // Eye of the Storm
    b.mechanic(MechanicSpec::for_debuff(frost_bomb).auto_defend().heavy_damage());
    b.mechanic(MechanicSpec::for_cast(CastSignature::new(381516)).interrupt()); // Interrupting Cloudburst
    b.mechanic(MechanicSpec::for_debuff(quake).interrupt());
    b.mechanic(MechanicSpec::for_cast(CastSignature::new(397892)).interrupt()); // Scream of Pain
    b.mechanic(MechanicSpec::for_cast(CastSignature::new(209676)).heavy_damage().multiplier(0.7)); // Slicing Maelstrom
    b.mechanic(MechanicSpec::for_cast(CastSignature::new(196543)).interrupt()); // Unnerving Howl
    b.mechanic(MechanicSpec::for_cast(CastSignature::new(199726)).interrupt()); // Unruly Yell

    // Active self-mitigation feeds the intake prediction.
    b.mechanic(MechanicSpec::for_buff(ironbark_buff).multiplier(1.1));
    b.mechanic(MechanicSpec::for_buff(barkskin_buff).multiplier(1.1));
}

// ============================================================================
// Ladder
// ============================================================================

fn rule(
    name: &'static str,
    eval: fn(&RestorationProfile, &mut Tick<'_>) -> Verdict,
) -> Rule<RestorationProfile> {
    Rule { name, eval }
}

/// The full restoration priority ladder, outermost group first.
pub fn ladder() -> Vec<Group<RestorationProfile>> {
    vec![
        Group {
            name: "abort",
            rules: vec![
                rule("idle-while-mounted", idle_while_mounted),
                rule("cancel-doomed-cast", cancel_doomed_cast),
                rule("cancel-filler-in-crisis", cancel_filler_in_crisis),
            ],
        },
        Group {
            name: "emergency-defense",
            rules: vec![
                rule("defense-cancel-cast", defense_cancel_cast),
                rule("defense-bear-form", defense_bear_form),
                rule("defense-frenzied-regeneration", defense_frenzied_regeneration),
                rule("defense-hold", defense_hold),
            ],
        },
        Group {
            name: "gcd-gate",
            rules: vec![
                rule("wait-for-gcd", wait_for_gcd),
                rule("hold-while-channeling", hold_while_channeling),
            ],
        },
        Group {
            name: "upkeep",
            rules: vec![rule("mark-of-the-wild", mark_of_the_wild)],
        },
        Group {
            name: "cooldowns",
            rules: vec![
                rule("innervate", innervate),
                rule("barkskin", barkskin),
                rule("ironbark", ironbark),
                rule("weapon-item", weapon_item),
                rule("trinket-1", trinket_1),
                rule("trinket-2", trinket_2),
                rule("renewal", renewal),
                rule("healing-potion", healing_potion),
                rule("healthstone", healthstone),
                rule("flourish", flourish),
                rule("swiftmend", swiftmend),
                rule("natures-swiftness", natures_swiftness),
                rule("regrowth-swiftness", regrowth_swiftness),
                rule("convoke", convoke),
            ],
        },
        Group {
            name: "utility",
            rules: vec![
                rule("dispel", dispel),
                rule("soothe", soothe),
                rule("explosive-moonfire", explosive_moonfire),
                rule("cat-form-root-break", cat_form_root_break),
            ],
        },
        Group {
            name: "heavy-damage-prep",
            rules: vec![
                rule("prep-bonus-swiftmend", prep_bonus_swiftmend),
                rule("prep-wild-growth", prep_wild_growth),
            ],
        },
        Group {
            name: "steady-state",
            rules: vec![
                rule("cenarion-ward", cenarion_ward),
                rule("natures-vigil", natures_vigil),
                rule("sunfire-spread", sunfire_spread),
                rule("moonfire-spread", moonfire_spread),
                rule("lifebloom-tank", lifebloom_tank),
                rule("lifebloom-self", lifebloom_self),
                rule("wild-growth-bonus-swiftmend", wild_growth_bonus_swiftmend),
                rule("wild-growth", wild_growth),
                rule("regrowth-soul-of-the-forest", regrowth_soul_of_the_forest),
                rule("adaptive-swarm-wounded", adaptive_swarm_wounded),
                rule("regrowth-incarnation-60", regrowth_incarnation_60),
                rule("rejuvenation-missing", rejuvenation_missing),
                rule("regrowth-incarnation-80", regrowth_incarnation_80),
                rule("regrowth-clearcasting", regrowth_clearcasting),
                rule("regrowth", regrowth_hard_cast),
                rule("rejuvenation-expiring", rejuvenation_expiring),
                rule("rejuvenation-pre-burst", rejuvenation_pre_burst),
                rule("adaptive-swarm-spread-wounded", adaptive_swarm_spread_wounded),
                rule("adaptive-swarm-enemy", adaptive_swarm_enemy),
                rule("adaptive-swarm-spread", adaptive_swarm_spread),
            ],
        },
        Group {
            name: "fallback-damage",
            rules: vec![
                rule("moonkin-form", moonkin_form),
                rule("moonfire-refresh-few", moonfire_refresh_few),
                rule("sunfire-refresh", sunfire_refresh),
                rule("moonfire-refresh", moonfire_refresh),
                rule("starsurge", starsurge),
                rule("starfire", starfire),
                rule("wrath", wrath),
            ],
        },
    ]
}

// ============================================================================
// Abort
// ============================================================================

fn idle_while_mounted(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if t.world.player_mounted() || t.has_aura(p.travel_form_buff, UnitId::Player) {
        return Handled;
    }
    NotHandled
}

fn cancel_doomed_cast(_: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if t.stop_current_cast() {
        t.cancel_cast();
        return Handled;
    }
    NotHandled
}

fn cancel_filler_in_crisis(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if t.lowest_health < CRISIS_HEALTH
        && (t.player_casting(p.wrath) || t.player_casting(p.starfire))
    {
        t.cancel_cast();
        return Handled;
    }
    NotHandled
}

// ============================================================================
// Emergency defense
// ============================================================================

fn defensive_stance(p: &RestorationProfile, t: &Tick<'_>) -> bool {
    t.setting(p.bear_form_setting) && t.use_defensive()
}

fn defense_cancel_cast(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if defensive_stance(p, t) && t.world.cast_remaining(UnitId::Player) > 0.0 {
        t.cancel_cast();
        return Handled;
    }
    NotHandled
}

fn defense_bear_form(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if defensive_stance(p, t) && !t.has_aura(p.bear_form_buff, UnitId::Player) {
        t.cast(p.bear_form);
        return Handled;
    }
    NotHandled
}

fn defense_frenzied_regeneration(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if defensive_stance(p, t) && t.usable(p.frenzied_regeneration, UnitId::Player) {
        t.cast(p.frenzied_regeneration);
        return Handled;
    }
    NotHandled
}

/// While a heavy hit is incoming, sit in bear form; nothing below this
/// group runs.
fn defense_hold(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if defensive_stance(p, t) {
        return Handled;
    }
    NotHandled
}

// ============================================================================
// GCD gate
// ============================================================================

fn wait_for_gcd(_: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if t.gcd() > 0.0 || t.world.cast_remaining(UnitId::Player) > ACTION_DELAY {
        return Handled;
    }
    NotHandled
}

fn hold_while_channeling(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if t.player_casting(p.tranquility) || t.player_casting(p.convoke) {
        return Handled;
    }
    NotHandled
}

// ============================================================================
// Upkeep
// ============================================================================

fn mark_of_the_wild(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if t.world.player_in_combat() {
        return NotHandled;
    }
    for &unit in t.units.friendlies() {
        if t.usable(p.mark_of_the_wild, unit)
            && t.needs_refresh(p.mark_buff, unit)
            && t.hp(unit) > 0
        {
            // Group-wide buff: one self-cast covers everyone.
            t.cast_on_self(p.mark_of_the_wild);
            return Handled;
        }
    }
    NotHandled
}

// ============================================================================
// Cooldowns
// ============================================================================

fn innervate(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    let lowest = t.lowest_unit(DEFAULT_RANGE, |u| t.hp(u) < 60);
    if !lowest.is_none()
        && t.usable(p.innervate, UnitId::Player)
        && t.world.player_mana() < 80
    {
        t.cast_at(p.innervate, UnitId::Player);
        return Handled;
    }
    NotHandled
}

fn barkskin(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if t.usable(p.barkskin, UnitId::Player) && t.hp(UnitId::Player) < 45 {
        t.cast(p.barkskin);
        return Handled;
    }
    NotHandled
}

fn ironbark(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    let lowest = t.lowest_unit(DEFAULT_RANGE, |u| t.hp(u) < 50);
    // On ourselves, barkskin is the cheaper cover; spend ironbark only once
    // it is down and unavailable.
    if !lowest.is_none()
        && t.usable(p.ironbark, lowest)
        && (lowest != UnitId::Player
            || (!t.usable(p.barkskin, UnitId::Player)
                && !t.has_own(p.barkskin_buff, UnitId::Player)))
    {
        t.cast_at(p.ironbark, lowest);
        return Handled;
    }
    NotHandled
}

fn weapon_item(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if !t.setting(p.weapon_item_setting) {
        return NotHandled;
    }
    let lowest = t.lowest_unit(DEFAULT_RANGE, |u| t.hp(u) < 50);
    if !lowest.is_none() && t.usable(p.weapon_item, UnitId::Player) {
        t.cast(p.weapon_item);
        return Handled;
    }
    NotHandled
}

fn trinket_1(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if !t.setting(p.trinket1_setting) {
        return NotHandled;
    }
    let lowest = t.lowest_unit(DEFAULT_RANGE, |u| t.hp(u) < 50);
    if lowest.is_none()
        || !t.usable(p.trinket1, UnitId::Player)
        || (t.usable(p.weapon_item, UnitId::Player) && t.setting(p.weapon_item_setting))
    {
        return NotHandled;
    }
    match t.choice(p.trinket1_target) {
        "No Target" => t.cast(p.trinket1),
        "Player" => t.cast_at(p.trinket1, UnitId::Player),
        "Lowest Ally" => t.cast_at(p.trinket1, lowest),
        _ => {
            if !(t.has_target && !t.ignore_target) {
                return NotHandled;
            }
            t.cast(p.trinket1);
        }
    }
    Handled
}

fn trinket_2(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if !t.setting(p.trinket2_setting) {
        return NotHandled;
    }
    let lowest = t.lowest_unit(DEFAULT_RANGE, |u| t.hp(u) < 50);
    if lowest.is_none()
        || !t.usable(p.trinket2, UnitId::Player)
        || (t.usable(p.trinket1, UnitId::Player) && t.setting(p.trinket1_setting))
        || (t.usable(p.weapon_item, UnitId::Player) && t.setting(p.weapon_item_setting))
    {
        return NotHandled;
    }
    match t.choice(p.trinket2_target) {
        "No Target" => t.cast(p.trinket2),
        "Player" => t.cast_at(p.trinket2, UnitId::Player),
        "Lowest Ally" => t.cast_at(p.trinket2, lowest),
        _ => {
            if !(t.has_target && !t.ignore_target) {
                return NotHandled;
            }
            t.cast(p.trinket2);
        }
    }
    Handled
}

fn renewal(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if t.usable(p.renewal, UnitId::Player)
        && t.world.player_in_combat()
        && t.hp(UnitId::Player) < 50
    {
        t.cast(p.renewal);
        return Handled;
    }
    NotHandled
}

fn healing_potion(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if t.setting(p.potion_setting)
        && t.usable(p.healing_potion, UnitId::Player)
        && t.hp(UnitId::Player) < 30
    {
        t.cast(p.healing_potion);
        return Handled;
    }
    NotHandled
}

fn healthstone(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if t.setting(p.healthstone_setting)
        && t.usable(p.healthstone, UnitId::Player)
        && t.hp(UnitId::Player) < 40
    {
        t.cast(p.healthstone);
        return Handled;
    }
    NotHandled
}

/// Enough wounded hot-carriers for flourish to be worth the press.
fn flourish_window(p: &RestorationProfile, t: &Tick<'_>) -> bool {
    let wounded_with_hot = t.units_fitting(DEFAULT_RANGE, |u| {
        t.hp(u) < 70 && t.has_aura(p.wild_growth_buff, u)
    });
    let wounded = t.units_fitting(DEFAULT_RANGE, |u| t.hp(u) < 70);
    t.usable(p.flourish, UnitId::Player)
        && (wounded_with_hot > 1 || (wounded > 1 && t.player_casting(p.wild_growth)))
}

fn flourish(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if flourish_window(p, t) {
        t.cast(p.flourish);
        return Handled;
    }
    NotHandled
}

fn swiftmend(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    let lowest = t.lowest_unit(DEFAULT_RANGE, |u| t.hp(u) < 60);
    if !lowest.is_none()
        && t.usable_ignoring_resource(p.swiftmend, lowest)
        && !t.usable(p.natures_swiftness, lowest)
        && !t.has_aura(p.natures_swiftness_buff, UnitId::Player)
        && (t.has_own(p.rejuvenation_buff, lowest) || t.has_own(p.regrowth_buff, lowest))
        && t.world.player_in_combat()
    {
        t.cast_at(p.swiftmend, lowest);
        return Handled;
    }
    NotHandled
}

fn natures_swiftness(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    let lowest = t.lowest_unit(DEFAULT_RANGE, |u| t.hp(u) < 70);
    if !lowest.is_none()
        && t.usable(p.natures_swiftness, UnitId::Player)
        && t.usable(p.regrowth, lowest)
        && t.usable(p.flourish, UnitId::Target)
        && !flourish_window(p, t)
        && !t.has_aura(p.natures_swiftness_buff, UnitId::Player)
        && t.world.player_in_combat()
    {
        t.cast(p.natures_swiftness);
        return Handled;
    }
    NotHandled
}

/// Spend the swiftness proc the tick after it is secured.
fn regrowth_swiftness(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    let lowest = t.lowest_unit(DEFAULT_RANGE, |u| t.hp(u) < 70);
    if !lowest.is_none()
        && t.usable(p.regrowth, lowest)
        && t.has_aura(p.natures_swiftness_buff, UnitId::Player)
    {
        t.cast_at(p.regrowth, lowest);
        return Handled;
    }
    NotHandled
}

fn convoke(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    let lowest = t.lowest_unit(DEFAULT_RANGE, |u| t.hp(u) < 60);
    if !lowest.is_none()
        && t.usable(p.convoke, lowest)
        && t.world.player_in_combat()
        && !t.has_aura(p.moonkin_form_buff, UnitId::Player)
        && !flourish_window(p, t)
        && !t.interrupt_incoming()
    {
        t.cast(p.convoke);
        return Handled;
    }
    NotHandled
}

// ============================================================================
// Utility
// ============================================================================

fn dispel(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if !t.toggled(p.dispel_toggle) {
        return NotHandled;
    }
    let target = t.dispel_unit(p.capability, DEFAULT_RANGE);
    if !target.is_none() && t.usable_ignoring_resource(p.natures_cure, target) {
        t.cast_at(p.natures_cure, target);
        return Handled;
    }
    NotHandled
}

fn soothe(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if t.setting(p.soothe_setting)
        && t.has_target
        && !t.ignore_target
        && t.usable_ignoring_resource(p.soothe, UnitId::Target)
        && t.enraged(UnitId::Target)
        && t.lowest_health > STABLE_HEALTH
    {
        t.cast(p.soothe);
        return Handled;
    }
    NotHandled
}

fn explosive_moonfire(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if t.setting(p.explosive_setting)
        && t.has_target
        && t.usable_ignoring_resource(p.moonfire, UnitId::Target)
        && t.world.npc_id(UnitId::Target) == Some(p.explosives_npc)
        && t.lowest_health > STABLE_HEALTH
    {
        t.cast(p.moonfire);
        return Handled;
    }
    NotHandled
}

fn cat_form_root_break(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if t.setting(p.cat_form_setting)
        && (t.world.player_rooted() || t.root_break())
        && t.usable(p.cat_form, UnitId::Player)
        && !t.has_aura(p.cat_form_buff, UnitId::Player)
        && t.lowest_health > STABLE_HEALTH
    {
        t.cast(p.cat_form);
        return Handled;
    }
    NotHandled
}

// ============================================================================
// Heavy-damage prep
// ============================================================================

fn heavy_damage_window(p: &RestorationProfile, t: &Tick<'_>) -> bool {
    t.usable(p.wild_growth, UnitId::Player) && t.heavy_damage_count(DEFAULT_RANGE) > 2
}

/// Secure the bonus state before the group heal goes out.
fn prep_bonus_swiftmend(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if !heavy_damage_window(p, t) {
        return NotHandled;
    }
    let lowest = t.lowest_unit(DEFAULT_RANGE, |u| {
        t.has_own(p.rejuvenation_buff, u) || t.has_own(p.regrowth_buff, u)
    });
    if !lowest.is_none()
        && t.usable_ignoring_resource(p.swiftmend, lowest)
        && !t.has_aura(p.soul_of_the_forest_buff, UnitId::Player)
    {
        t.cast(p.swiftmend);
        return Handled;
    }
    NotHandled
}

fn prep_wild_growth(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if !heavy_damage_window(p, t) {
        return NotHandled;
    }
    let lowest = t.lowest_unit(DEFAULT_RANGE, |_| true);
    if !lowest.is_none() && t.usable(p.wild_growth, lowest) && !t.world.player_moving() {
        t.cast(p.wild_growth);
        return Handled;
    }
    NotHandled
}

// ============================================================================
// Steady state
// ============================================================================

fn cenarion_ward(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    let lowest = t.lowest_unit(DEFAULT_RANGE, |u| t.hp(u) < 80);
    if !lowest.is_none() && t.usable(p.cenarion_ward, lowest) && t.world.player_in_combat() {
        t.cast_at(p.cenarion_ward, lowest);
        return Handled;
    }
    NotHandled
}

/// Off-burst offensive maintenance is only worth a global while nobody is
/// hurting.
fn offensive_upkeep_window(p: &RestorationProfile, t: &Tick<'_>) -> bool {
    !t.toggled(p.burst_toggle)
        && t.lowest_health > STABLE_HEALTH
        && t.has_target
        && !t.ignore_target
}

fn natures_vigil(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if offensive_upkeep_window(p, t) && t.usable(p.natures_vigil, UnitId::Target) {
        t.cast(p.natures_vigil);
        return Handled;
    }
    NotHandled
}

fn sunfire_spread(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if offensive_upkeep_window(p, t)
        && t.usable(p.sunfire, UnitId::Target)
        && !t.has_own(p.sunfire_debuff, UnitId::Target)
        && t.world.enemies_near_target() >= 3
    {
        t.cast(p.sunfire);
        return Handled;
    }
    NotHandled
}

fn moonfire_spread(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if offensive_upkeep_window(p, t)
        && t.usable(p.moonfire, UnitId::Target)
        && !t.has_own(p.moonfire_debuff, UnitId::Target)
        && t.world.enemies_near_target() < 3
    {
        t.cast(p.moonfire);
        return Handled;
    }
    NotHandled
}

/// Group state feeding the wild-growth hold-off decisions.
struct WildGrowthWindow {
    active: bool,
    target: UnitId,
    sub_60: u32,
}

fn wild_growth_window(p: &RestorationProfile, t: &Tick<'_>) -> WildGrowthWindow {
    let wounded = t.units_fitting(GROUP_SCAN_RANGE, |u| t.hp(u) < 85);
    let sub_60 = t.units_fitting(GROUP_SCAN_RANGE, |u| t.hp(u) < 60);
    let target = t.lowest_unit(DEFAULT_RANGE, |u| t.hp(u) < 85);
    let active = !t.interrupt_incoming()
        && !target.is_none()
        && t.usable(p.wild_growth, target)
        && (wounded >= 3
            || (wounded >= 2
                && !t.world.player_in_raid()
                && t.has_aura(p.soul_of_the_forest_buff, UnitId::Player)));
    WildGrowthWindow { active, target, sub_60 }
}

fn lifebloom_tank(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    let tank = t.tank();
    let wg = wild_growth_window(p, t);
    // Keep the bloom rolling on the tank, but never at the cost of an
    // emergency global: a crisis or a pending group heal outranks it unless
    // the tank itself is about to die.
    if t.usable(p.lifebloom, tank)
        && t.needs_refresh(p.lifebloom_buff, tank)
        && t.needs_refresh(p.lifebloom_undergrowth_buff, tank)
        && !((t.lowest_health < 35 || (wg.active && !t.world.player_moving() && wg.sub_60 > 1))
            && t.hp(tank) > 25)
    {
        t.cast_at(p.lifebloom, tank);
        return Handled;
    }
    NotHandled
}

/// With the undergrowth talent a second bloom fits on the player.
fn lifebloom_self(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    let tank = t.tank();
    if !t.has_aura(p.lifebloom_undergrowth_buff, tank) {
        return NotHandled;
    }
    let wg = wild_growth_window(p, t);
    if t.usable(p.lifebloom, UnitId::Player)
        && t.needs_refresh(p.lifebloom_undergrowth_buff, UnitId::Player)
        && !((t.lowest_health < 40 || (wg.active && !t.world.player_moving() && wg.sub_60 > 1))
            && t.hp(UnitId::Player) > 25)
    {
        t.cast_at(p.lifebloom, UnitId::Player);
        return Handled;
    }
    NotHandled
}

fn wild_growth_bonus_swiftmend(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    let wg = wild_growth_window(p, t);
    if !wg.active || t.has_aura(p.soul_of_the_forest_buff, UnitId::Player) {
        return NotHandled;
    }
    let target = t.lowest_unit(DEFAULT_RANGE, |u| {
        t.has_own(p.rejuvenation_buff, u) || t.has_own(p.regrowth_buff, u)
    });
    if !target.is_none() && t.usable_ignoring_resource(p.swiftmend, target) {
        t.cast_at(p.swiftmend, target);
        return Handled;
    }
    NotHandled
}

fn wild_growth(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    let wg = wild_growth_window(p, t);
    if wg.active && !t.world.player_moving() {
        t.cast_at(p.wild_growth, wg.target);
        return Handled;
    }
    NotHandled
}

fn regrowth_soul_of_the_forest(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if t.interrupt_incoming() && !t.has_aura(p.incarnation_buff, UnitId::Player) {
        return NotHandled;
    }
    let lowest = t.lowest_unit(DEFAULT_RANGE, |u| t.hp(u) < 75);
    if !lowest.is_none()
        && t.usable(p.regrowth, lowest)
        && t.has_aura(p.soul_of_the_forest_buff, UnitId::Player)
        && (!t.world.player_moving() || t.has_aura(p.incarnation_buff, UnitId::Player))
    {
        t.cast_at(p.regrowth, lowest);
        return Handled;
    }
    NotHandled
}

fn adaptive_swarm_wounded(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    let lowest = t.lowest_unit(DEFAULT_RANGE, |u| {
        t.stacks(p.adaptive_swarm_buff, u) < 3 && t.hp(u) < 95
    });
    if !lowest.is_none()
        && t.usable(p.adaptive_swarm, lowest)
        && !(t.lowest_health < CRISIS_HEALTH && t.hp(lowest) > 25)
    {
        t.cast_at(p.adaptive_swarm, lowest);
        return Handled;
    }
    NotHandled
}

fn regrowth_incarnation_60(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    regrowth_incarnation(p, t, 60)
}

fn regrowth_incarnation_80(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    regrowth_incarnation(p, t, 80)
}

fn regrowth_incarnation(p: &RestorationProfile, t: &mut Tick<'_>, band: i32) -> Verdict {
    let lowest = t.lowest_unit(DEFAULT_RANGE, |u| t.hp(u) < band);
    if !lowest.is_none()
        && t.usable(p.regrowth, lowest)
        && t.has_aura(p.incarnation_buff, UnitId::Player)
    {
        t.cast_at(p.regrowth, lowest);
        return Handled;
    }
    NotHandled
}

fn rejuvenation_missing(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    // Banding is deliberately three-tiered: out of raids blanket early; in
    // raids the band tightens, and tightens harder once mana runs low.
    let lowest = if !t.world.player_in_raid() {
        t.lowest_unit(DEFAULT_RANGE, |u| {
            !t.has_own(p.rejuvenation_buff, u) && t.hp(u) < 95
        })
    } else if t.world.player_mana() > 30 {
        t.lowest_unit(DEFAULT_RANGE, |u| {
            !t.has_own(p.rejuvenation_buff, u) && t.hp(u) < 85
        })
    } else {
        t.lowest_unit(DEFAULT_RANGE, |u| {
            !t.has_own(p.rejuvenation_buff, u) && t.hp(u) < 60
        })
    };
    if !lowest.is_none()
        && t.usable(p.rejuvenation, lowest)
        && !(t.lowest_health < CRISIS_HEALTH && t.hp(lowest) > 25)
    {
        t.cast_at(p.rejuvenation, lowest);
        return Handled;
    }
    NotHandled
}

fn regrowth_clearcasting(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if t.interrupt_incoming() {
        return NotHandled;
    }
    let lowest = t.lowest_unit(DEFAULT_RANGE, |u| t.hp(u) < 75);
    if !lowest.is_none()
        && t.usable(p.regrowth, lowest)
        && t.has_aura(p.clearcasting_buff, UnitId::Player)
        && !t.player_casting(p.regrowth)
        && !t.world.player_moving()
    {
        t.cast_at(p.regrowth, lowest);
        return Handled;
    }
    NotHandled
}

fn regrowth_hard_cast(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if t.interrupt_incoming() {
        return NotHandled;
    }
    let lowest = t.lowest_unit(DEFAULT_RANGE, |u| t.hp(u) < 50);
    if !lowest.is_none() && t.usable(p.regrowth, lowest) && !t.world.player_moving() {
        t.cast_at(p.regrowth, lowest);
        return Handled;
    }
    NotHandled
}

fn rejuvenation_expiring(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    // Same three-tier banding as the missing pass, with a tighter
    // raid-with-mana band.
    let lowest = if !t.world.player_in_raid() {
        t.lowest_unit(DEFAULT_RANGE, |u| {
            t.needs_refresh(p.rejuvenation_buff, u) && t.hp(u) < 95
        })
    } else if t.world.player_mana() > 30 {
        t.lowest_unit(DEFAULT_RANGE, |u| {
            t.needs_refresh(p.rejuvenation_buff, u) && t.hp(u) < 75
        })
    } else {
        t.lowest_unit(DEFAULT_RANGE, |u| {
            t.needs_refresh(p.rejuvenation_buff, u) && t.hp(u) < 60
        })
    };
    if !lowest.is_none() && t.usable(p.rejuvenation, lowest) {
        t.cast_at(p.rejuvenation, lowest);
        return Handled;
    }
    NotHandled
}

/// Blanket hots ahead of an announced burst window.
fn rejuvenation_pre_burst(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if !t.toggled(p.burst_toggle) {
        return NotHandled;
    }
    let lowest = t.lowest_unit(DEFAULT_RANGE, |u| t.needs_refresh(p.rejuvenation_buff, u));
    if !lowest.is_none() && t.usable(p.rejuvenation, lowest) {
        t.cast_at(p.rejuvenation, lowest);
        return Handled;
    }
    NotHandled
}

fn adaptive_swarm_spread_wounded(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    let lowest = t.lowest_unit(DEFAULT_RANGE, |u| {
        t.stacks(p.adaptive_swarm_buff, u) < 3 && t.hp(u) < 95
    });
    if !lowest.is_none() && t.usable(p.adaptive_swarm, lowest) {
        t.cast_at(p.adaptive_swarm, lowest);
        return Handled;
    }
    NotHandled
}

fn adaptive_swarm_enemy(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if t.has_target
        && !t.ignore_target
        && t.usable(p.adaptive_swarm, UnitId::Target)
        && t.stacks(p.adaptive_swarm_debuff, UnitId::Target) < 3
    {
        t.cast(p.adaptive_swarm);
        return Handled;
    }
    NotHandled
}

fn adaptive_swarm_spread(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    let lowest = t.lowest_unit(DEFAULT_RANGE, |u| t.stacks(p.adaptive_swarm_buff, u) < 3);
    if !lowest.is_none() && t.usable(p.adaptive_swarm, lowest) {
        t.cast_at(p.adaptive_swarm, lowest);
        return Handled;
    }
    NotHandled
}

// ============================================================================
// Fallback damage
// ============================================================================

fn damage_window(t: &Tick<'_>) -> bool {
    t.has_target && !t.ignore_target && t.lowest_health > CRISIS_HEALTH
}

fn moonkin_form(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if damage_window(t)
        && t.usable(p.moonkin_form, UnitId::Target)
        && !t.has_aura(p.moonkin_form_buff, UnitId::Player)
        && !t.world.player_moving()
    {
        t.cast(p.moonkin_form);
        return Handled;
    }
    NotHandled
}

fn moonfire_refresh_few(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if damage_window(t)
        && t.usable(p.moonfire, UnitId::Target)
        && t.needs_refresh(p.moonfire_debuff, UnitId::Target)
        && t.world.enemies_near_target() < 3
    {
        t.cast(p.moonfire);
        return Handled;
    }
    NotHandled
}

fn sunfire_refresh(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if damage_window(t)
        && t.usable(p.sunfire, UnitId::Target)
        && t.needs_refresh(p.sunfire_debuff, UnitId::Target)
    {
        t.cast(p.sunfire);
        return Handled;
    }
    NotHandled
}

fn moonfire_refresh(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if damage_window(t)
        && t.usable(p.moonfire, UnitId::Target)
        && t.needs_refresh(p.moonfire_debuff, UnitId::Target)
    {
        t.cast(p.moonfire);
        return Handled;
    }
    NotHandled
}

fn starsurge(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if damage_window(t) && t.usable(p.starsurge, UnitId::Target) {
        t.cast(p.starsurge);
        return Handled;
    }
    NotHandled
}

fn starfire(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if damage_window(t)
        && !t.interrupt_incoming()
        && t.usable(p.starfire, UnitId::Target)
        && !t.world.player_moving()
        && t.world.enemies_near_target() > 4
    {
        t.cast(p.starfire);
        return Handled;
    }
    NotHandled
}

fn wrath(p: &RestorationProfile, t: &mut Tick<'_>) -> Verdict {
    if damage_window(t)
        && !t.interrupt_incoming()
        && t.usable(p.wrath, UnitId::Target)
        && !t.world.player_moving()
    {
        t.cast(p.wrath);
        return Handled;
    }
    NotHandled
}
