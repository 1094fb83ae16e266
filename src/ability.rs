//! Ability catalog.
//!
//! Maps raw `(code, params)` entries from unit data to a closed set of
//! semantic ability variants. The catalog is a pure lookup: no state, no
//! I/O, and any unknown code fails fast with
//! [`StatError::UnrecognizedAbility`] instead of being dropped.

use crate::data::AbilityEntry;
use crate::error::StatError;
use serde::{Deserialize, Serialize};

/// Critical strikes always double the damage dealt.
pub(crate) const CRITICAL_MODIFIER: u32 = 100;

/// Triggered ranges and reaches derive from quarters of the declared value.
const QUARTER: f64 = 0.25;

/// Full treasures stretch cat-inflicted effect durations by this factor.
const DURATION_EXTENSION: f64 = 1.2;

/// Enemy trait a unit can specialize against, in the game's display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TargetTrait {
    Red,
    Floating,
    Black,
    Angel,
    Alien,
    Zombie,
    Aku,
    Relic,
    White,
    Metal,
}

impl TargetTrait {
    fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "against_red" => Self::Red,
            "against_float" => Self::Floating,
            "against_black" => Self::Black,
            "against_angel" => Self::Angel,
            "against_alien" => Self::Alien,
            "against_zombie" => Self::Zombie,
            "against_aku" => Self::Aku,
            "against_relic" => Self::Relic,
            "against_white" => Self::White,
            "against_metal" => Self::Metal,
            _ => return None,
        })
    }

    /// Display name of the trait.
    pub fn name(self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Floating => "Floating",
            Self::Black => "Black",
            Self::Angel => "Angel",
            Self::Alien => "Alien",
            Self::Zombie => "Zombie",
            Self::Aku => "Aku",
            Self::Relic => "Relic",
            Self::White => "White",
            Self::Metal => "Metal",
        }
    }
}

/// Hostile effect a unit can be immune to, in the game's display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ImmuneEffect {
    BossWave,
    Knockback,
    Warp,
    Freeze,
    Slow,
    Weaken,
    Curse,
    Wave,
    Surge,
    Toxic,
}

impl ImmuneEffect {
    fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "immune_bosswave" => Self::BossWave,
            "immune_knockback" => Self::Knockback,
            "immune_warp" => Self::Warp,
            "immune_freeze" => Self::Freeze,
            "immune_slow" => Self::Slow,
            "immune_weaken" => Self::Weaken,
            "immune_curse" => Self::Curse,
            "immune_wave" => Self::Wave,
            "immune_surge" => Self::Surge,
            "immune_toxic" => Self::Toxic,
            _ => return None,
        })
    }

    /// Display name of the effect.
    pub fn name(self) -> &'static str {
        match self {
            Self::BossWave => "Boss wave",
            Self::Knockback => "Knockback",
            Self::Warp => "Warp",
            Self::Freeze => "Freeze",
            Self::Slow => "Slow",
            Self::Weaken => "Weaken",
            Self::Curse => "Curse",
            Self::Wave => "Wave",
            Self::Surge => "Surge",
            Self::Toxic => "Toxic",
        }
    }
}

/// Grouping of an ability for display purposes.
///
/// Specialized abilities only function against the unit's target traits (or
/// describe the targeting itself); generic abilities apply unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityCategory {
    Specialized,
    Generic,
}

/// Display parameters of an ability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AbilityDisplay {
    /// The name alone says everything (flag abilities).
    None,
    /// One formatted line, e.g. `"30% for 2.0s ~ 2.4s"`.
    Text(String),
    /// A list, e.g. the trait names of a specialization.
    List(Vec<String>),
}

/// Resolved, render-ready view of one ability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityDescriptor {
    pub name: String,
    pub category: AbilityCategory,
    pub display: AbilityDisplay,
}

/// One semantic ability, parsed from a raw entry.
///
/// The variant set is closed: every code the game data can carry maps to
/// exactly one variant, and anything else is an [`StatError::UnrecognizedAbility`].
#[derive(Debug, Clone, PartialEq)]
pub enum Ability {
    /// Merged `against_*` declarations.
    Specialization { targets: Vec<TargetTrait> },
    /// Can only attack the specialized targets.
    AttackOnly,
    Strong,
    MassiveDamage,
    InsaneDamage,
    Resistant,
    InsaneResistant,
    Knockback { chance: u32 },
    Freeze { chance: u32, duration: u32 },
    Slow { chance: u32, duration: u32 },
    Weaken { chance: u32, duration: u32, multiplier: u32 },
    Curse { chance: u32, duration: u32 },
    Dodge { chance: u32, duration: u32 },
    Survive { chance: u32 },
    /// Attack raised by `modifier` percent below `threshold` percent health.
    Strengthen { threshold: u32, modifier: u32 },
    SavageBlow { chance: u32, modifier: u32 },
    CriticalStrike { chance: u32 },
    MetalKiller { percentage: u32 },
    BreakBarrier { chance: u32 },
    BreakShield { chance: u32 },
    ZombieKiller,
    SoulStrike,
    BaseDestroyer,
    ColossusSlayer,
    SageSlayer,
    WitchSlayer,
    EvaAngelSlayer,
    BehemothSlayer { dodge_chance: u32, dodge_duration: u32 },
    /// Summons another unit on deployment.
    Conjure { unit: u32 },
    Wave { chance: u32, level: u32, mini: bool },
    Surge { chance: u32, level: u32, mini: bool, range: i32, range_offset: i32 },
    Explosion { chance: u32, range: i32 },
    CounterSurge,
    ExtraMoney,
    Metal,
    Kamikaze,
    /// Merged `immune_*` declarations.
    Immunity { effects: Vec<ImmuneEffect> },
    BlockWave,
}

impl Ability {
    /// Parse one raw entry into its catalog variant.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use catstat::{Ability, AbilityEntry};
    ///
    /// let freeze = Ability::parse(&AbilityEntry::new("freeze", &[30, 60])).unwrap();
    /// assert_eq!(freeze, Ability::Freeze { chance: 30, duration: 60 });
    ///
    /// assert!(Ability::parse(&AbilityEntry::new("mega_wave", &[])).is_err());
    /// ```
    pub fn parse(entry: &AbilityEntry) -> Result<Self, StatError> {
        if let Some(target) = TargetTrait::from_code(&entry.code) {
            return Ok(Self::Specialization { targets: vec![target] });
        }
        if let Some(effect) = ImmuneEffect::from_code(&entry.code) {
            return Ok(Self::Immunity { effects: vec![effect] });
        }

        let chance = || entry.param(0).max(0) as u32;
        let ability = match entry.code.as_str() {
            "against_only" => Self::AttackOnly,
            "strong" => Self::Strong,
            "massive_damage" => Self::MassiveDamage,
            "insane_damage" => Self::InsaneDamage,
            "resistant" => Self::Resistant,
            "insane_resistant" => Self::InsaneResistant,
            "knockback" => Self::Knockback { chance: chance() },
            "freeze" => Self::Freeze {
                chance: chance(),
                duration: entry.param(1).max(0) as u32,
            },
            "slow" => Self::Slow {
                chance: chance(),
                duration: entry.param(1).max(0) as u32,
            },
            "weaken" => Self::Weaken {
                chance: chance(),
                duration: entry.param(1).max(0) as u32,
                multiplier: entry.param(2).max(0) as u32,
            },
            "curse" => Self::Curse {
                chance: chance(),
                duration: entry.param(1).max(0) as u32,
            },
            "dodge" => Self::Dodge {
                chance: chance(),
                duration: entry.param(1).max(0) as u32,
            },
            "survive" => Self::Survive { chance: chance() },
            "strengthen" => Self::Strengthen {
                threshold: entry.param(0).max(0) as u32,
                modifier: entry.param(1).max(0) as u32,
            },
            "savage_blow" => Self::SavageBlow {
                chance: chance(),
                modifier: entry.param(1).max(0) as u32,
            },
            "critical_strike" => Self::CriticalStrike { chance: chance() },
            "metal_killer" => Self::MetalKiller {
                percentage: entry.param(0).max(0) as u32,
            },
            "break_barrier" => Self::BreakBarrier { chance: chance() },
            "break_shield" => Self::BreakShield { chance: chance() },
            "zombie_killer" => Self::ZombieKiller,
            "soul_strike" => Self::SoulStrike,
            "base_destroyer" => Self::BaseDestroyer,
            "colossus_slayer" => Self::ColossusSlayer,
            "sage_slayer" => Self::SageSlayer,
            "witch_slayer" => Self::WitchSlayer,
            "eva_angel_slayer" => Self::EvaAngelSlayer,
            "behemoth_slayer" => Self::BehemothSlayer {
                dodge_chance: chance(),
                dodge_duration: entry.param(1).max(0) as u32,
            },
            "conjure" => Self::Conjure {
                unit: entry.param(0).max(0) as u32,
            },
            "wave" => Self::Wave {
                chance: chance(),
                level: entry.param(1).max(0) as u32,
                mini: entry.param(2) != 0,
            },
            "surge" => Self::Surge {
                chance: chance(),
                level: entry.param(1).max(0) as u32,
                mini: entry.param(2) != 0,
                range: entry.param(3) as i32,
                range_offset: entry.param(4) as i32,
            },
            "explosion" => Self::Explosion {
                chance: chance(),
                range: entry.param(1) as i32,
            },
            "counter_surge" => Self::CounterSurge,
            "extra_money" => Self::ExtraMoney,
            "metal" => Self::Metal,
            "kamikaze" => Self::Kamikaze,
            "block_wave" => Self::BlockWave,
            code => {
                return Err(StatError::UnrecognizedAbility {
                    code: code.to_string(),
                })
            }
        };
        Ok(ability)
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Specialization { .. } => "Specialized to",
            Self::AttackOnly => "Attack only",
            Self::Strong => "Strong",
            Self::MassiveDamage => "Massive damage",
            Self::InsaneDamage => "Insane damage",
            Self::Resistant => "Resistant",
            Self::InsaneResistant => "Insane resistant",
            Self::Knockback { .. } => "Knockback",
            Self::Freeze { .. } => "Freeze",
            Self::Slow { .. } => "Slow",
            Self::Weaken { .. } => "Weaken",
            Self::Curse { .. } => "Curse",
            Self::Dodge { .. } => "Dodge",
            Self::Survive { .. } => "Survive",
            Self::Strengthen { .. } => "Strengthen",
            Self::SavageBlow { .. } => "Savage blow",
            Self::CriticalStrike { .. } => "Critical strike",
            Self::MetalKiller { .. } => "Metal killer",
            Self::BreakBarrier { .. } => "Break barrier",
            Self::BreakShield { .. } => "Break shield",
            Self::ZombieKiller => "Zombie killer",
            Self::SoulStrike => "Soul strike",
            Self::BaseDestroyer => "Base destroyer",
            Self::ColossusSlayer => "Colossus slayer",
            Self::SageSlayer => "Sage slayer",
            Self::WitchSlayer => "Witch slayer",
            Self::EvaAngelSlayer => "Eva angel slayer",
            Self::BehemothSlayer { .. } => "Behemoth slayer",
            Self::Conjure { .. } => "Conjure",
            Self::Wave { mini: false, .. } => "Wave",
            Self::Wave { mini: true, .. } => "Mini-wave",
            Self::Surge { mini: false, .. } => "Surge",
            Self::Surge { mini: true, .. } => "Mini-surge",
            Self::Explosion { .. } => "Explosion",
            Self::CounterSurge => "Counter-surge",
            Self::ExtraMoney => "Extra money",
            Self::Metal => "Metal",
            Self::Kamikaze => "Kamikaze",
            Self::Immunity { .. } => "Immune to",
            Self::BlockWave => "Block wave",
        }
    }

    /// Canonical code, as it appears in raw data and `trigger_effects`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Specialization { .. } => "against",
            Self::AttackOnly => "against_only",
            Self::Strong => "strong",
            Self::MassiveDamage => "massive_damage",
            Self::InsaneDamage => "insane_damage",
            Self::Resistant => "resistant",
            Self::InsaneResistant => "insane_resistant",
            Self::Knockback { .. } => "knockback",
            Self::Freeze { .. } => "freeze",
            Self::Slow { .. } => "slow",
            Self::Weaken { .. } => "weaken",
            Self::Curse { .. } => "curse",
            Self::Dodge { .. } => "dodge",
            Self::Survive { .. } => "survive",
            Self::Strengthen { .. } => "strengthen",
            Self::SavageBlow { .. } => "savage_blow",
            Self::CriticalStrike { .. } => "critical_strike",
            Self::MetalKiller { .. } => "metal_killer",
            Self::BreakBarrier { .. } => "break_barrier",
            Self::BreakShield { .. } => "break_shield",
            Self::ZombieKiller => "zombie_killer",
            Self::SoulStrike => "soul_strike",
            Self::BaseDestroyer => "base_destroyer",
            Self::ColossusSlayer => "colossus_slayer",
            Self::SageSlayer => "sage_slayer",
            Self::WitchSlayer => "witch_slayer",
            Self::EvaAngelSlayer => "eva_angel_slayer",
            Self::BehemothSlayer { .. } => "behemoth_slayer",
            Self::Conjure { .. } => "conjure",
            Self::Wave { .. } => "wave",
            Self::Surge { .. } => "surge",
            Self::Explosion { .. } => "explosion",
            Self::CounterSurge => "counter_surge",
            Self::ExtraMoney => "extra_money",
            Self::Metal => "metal",
            Self::Kamikaze => "kamikaze",
            Self::Immunity { .. } => "immune",
            Self::BlockWave => "block_wave",
        }
    }

    /// Whether the ability belongs to the specialized display group.
    pub fn category(&self) -> AbilityCategory {
        match self {
            Self::Specialization { .. }
            | Self::AttackOnly
            | Self::Strong
            | Self::MassiveDamage
            | Self::InsaneDamage
            | Self::Resistant
            | Self::InsaneResistant
            | Self::Knockback { .. }
            | Self::Freeze { .. }
            | Self::Slow { .. }
            | Self::Weaken { .. }
            | Self::Curse { .. }
            | Self::Dodge { .. } => AbilityCategory::Specialized,
            _ => AbilityCategory::Generic,
        }
    }

    /// Whether the ability rides on the unit's attacks as an on-hit effect.
    pub fn is_trigger_effect(&self) -> bool {
        matches!(
            self,
            Self::Knockback { .. }
                | Self::Freeze { .. }
                | Self::Slow { .. }
                | Self::Weaken { .. }
                | Self::Curse { .. }
                | Self::SavageBlow { .. }
                | Self::CriticalStrike { .. }
                | Self::MetalKiller { .. }
                | Self::BreakBarrier { .. }
                | Self::BreakShield { .. }
                | Self::Wave { .. }
                | Self::Surge { .. }
                | Self::Explosion { .. }
        )
    }

    /// Whether the effect expands into attack occurrences of its own.
    pub(crate) fn is_expansion_family(&self) -> bool {
        matches!(
            self,
            Self::Wave { .. } | Self::Surge { .. } | Self::Explosion { .. }
        )
    }

    /// Expected-damage factor of a probability-weighted damage modifier.
    ///
    /// `None` for abilities that do not modify damage odds.
    pub(crate) fn expectation_factor(&self) -> Option<f64> {
        match self {
            Self::CriticalStrike { chance } => {
                Some(1.0 + CRITICAL_MODIFIER as f64 / 100.0 * *chance as f64 / 100.0)
            }
            Self::SavageBlow { chance, modifier } => {
                Some(1.0 + *modifier as f64 / 100.0 * *chance as f64 / 100.0)
            }
            _ => None,
        }
    }

    /// Surge start and reach in battlefield units (quarter-floored).
    pub(crate) fn surge_reach(range: i32, range_offset: i32) -> (i32, i32) {
        let start = (range as f64 * QUARTER).floor() as i32;
        let reach = start + (range_offset as f64 * QUARTER).floor() as i32;
        (start, reach)
    }

    /// Explosion center in battlefield units (quarter-floored).
    pub(crate) fn explosion_start(range: i32) -> i32 {
        (range as f64 * QUARTER).floor() as i32
    }

    /// Display parameters.
    pub fn display(&self) -> AbilityDisplay {
        match self {
            Self::Specialization { targets } => {
                AbilityDisplay::List(targets.iter().map(|t| t.name().to_string()).collect())
            }
            Self::Immunity { effects } => {
                AbilityDisplay::List(effects.iter().map(|e| e.name().to_string()).collect())
            }
            Self::Knockback { chance }
            | Self::Survive { chance }
            | Self::CriticalStrike { chance }
            | Self::BreakBarrier { chance }
            | Self::BreakShield { chance } => AbilityDisplay::Text(format!("{chance}%")),
            Self::MetalKiller { percentage } => AbilityDisplay::Text(format!("{percentage}%")),
            Self::Freeze { chance, duration }
            | Self::Slow { chance, duration }
            | Self::Curse { chance, duration }
            | Self::Dodge { chance, duration } => {
                AbilityDisplay::Text(format!("{chance}% for {}", seconds_range(*duration)))
            }
            Self::Weaken { chance, duration, multiplier } => AbilityDisplay::Text(format!(
                "{chance}% to {multiplier}% for {}",
                seconds_range(*duration)
            )),
            Self::Strengthen { threshold, modifier } => {
                AbilityDisplay::Text(format!("+{modifier}% at {threshold}% health"))
            }
            Self::SavageBlow { chance, modifier } => {
                AbilityDisplay::Text(format!("{chance}% for +{modifier}% damage"))
            }
            Self::BehemothSlayer { dodge_chance, dodge_duration } => AbilityDisplay::Text(
                format!("{dodge_chance}% to dodge for {}", seconds(*dodge_duration)),
            ),
            Self::Conjure { unit } => AbilityDisplay::Text(format!("unit {unit}")),
            Self::Wave { chance, level, .. } => {
                AbilityDisplay::Text(format!("{chance}% level {level}"))
            }
            Self::Surge { chance, level, range, range_offset, .. } => {
                let (start, reach) = Self::surge_reach(*range, *range_offset);
                AbilityDisplay::Text(format!("{chance}% level {level} at {start} ~ {reach}"))
            }
            Self::Explosion { chance, range } => {
                let start = Self::explosion_start(*range);
                AbilityDisplay::Text(format!("{chance}% at {start}"))
            }
            _ => AbilityDisplay::None,
        }
    }

    /// Render-ready descriptor of this ability.
    pub fn descriptor(&self) -> AbilityDescriptor {
        AbilityDescriptor {
            name: self.name().to_string(),
            category: self.category(),
            display: self.display(),
        }
    }
}

/// Resolve one raw entry straight to its descriptor.
///
/// # Examples
///
/// ```rust
/// use catstat::{describe, AbilityCategory, AbilityDisplay, AbilityEntry};
///
/// let descriptor = describe(&AbilityEntry::new("freeze", &[30, 60])).unwrap();
/// assert_eq!(descriptor.name, "Freeze");
/// assert_eq!(descriptor.category, AbilityCategory::Specialized);
/// assert_eq!(
///     descriptor.display,
///     AbilityDisplay::Text(String::from("30% for 2.0s ~ 2.4s"))
/// );
/// ```
pub fn describe(entry: &AbilityEntry) -> Result<AbilityDescriptor, StatError> {
    Ok(Ability::parse(entry)?.descriptor())
}

/// Compile raw entries into resolved abilities, preserving declaration
/// order and merging `against_*` / `immune_*` declarations into one
/// specialization / immunity at the first declaration's position.
pub fn compile_abilities(entries: &[AbilityEntry]) -> Result<Vec<Ability>, StatError> {
    let mut abilities: Vec<Ability> = Vec::with_capacity(entries.len());
    for entry in entries {
        match Ability::parse(entry)? {
            Ability::Specialization { targets } => {
                let merged = abilities.iter_mut().find_map(|a| match a {
                    Ability::Specialization { targets } => Some(targets),
                    _ => None,
                });
                match merged {
                    Some(existing) => existing.extend(targets),
                    None => abilities.push(Ability::Specialization { targets }),
                }
            }
            Ability::Immunity { effects } => {
                let merged = abilities.iter_mut().find_map(|a| match a {
                    Ability::Immunity { effects } => Some(effects),
                    _ => None,
                });
                match merged {
                    Some(existing) => existing.extend(effects),
                    None => abilities.push(Ability::Immunity { effects }),
                }
            }
            ability => abilities.push(ability),
        }
    }
    for ability in &mut abilities {
        match ability {
            Ability::Specialization { targets } => {
                targets.sort();
                targets.dedup();
            }
            Ability::Immunity { effects } => {
                effects.sort();
                effects.dedup();
            }
            _ => {}
        }
    }
    Ok(abilities)
}

/// Frames rendered as seconds, two decimals at most.
fn seconds(frames: u32) -> String {
    let value = (frames as f64 / 30.0 * 100.0).round() / 100.0;
    if value.fract() == 0.0 {
        format!("{value:.1}s")
    } else {
        format!("{value}s")
    }
}

/// Duration range from the base value to its treasure-extended maximum.
fn seconds_range(frames: u32) -> String {
    let extended = (frames as f64 * DURATION_EXTENSION).floor() as u32;
    format!("{} ~ {}", seconds(frames), seconds(extended))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unknown_code() {
        let err = Ability::parse(&AbilityEntry::new("banana", &[1])).unwrap_err();
        assert_eq!(err, StatError::UnrecognizedAbility { code: String::from("banana") });
    }

    #[test]
    fn test_parse_missing_params_read_zero() {
        let wave = Ability::parse(&AbilityEntry::new("wave", &[50])).unwrap();
        assert_eq!(wave, Ability::Wave { chance: 50, level: 0, mini: false });
    }

    #[test]
    fn test_wave_names_follow_mini_flag() {
        let wave = Ability::Wave { chance: 30, level: 3, mini: false };
        let mini = Ability::Wave { chance: 30, level: 1, mini: true };
        assert_eq!(wave.name(), "Wave");
        assert_eq!(mini.name(), "Mini-wave");
        assert_eq!(wave.code(), "wave");
    }

    #[test]
    fn test_attack_only_label() {
        let ability = Ability::parse(&AbilityEntry::new("against_only", &[])).unwrap();
        assert_eq!(ability.name(), "Attack only");
        assert_eq!(ability.category(), AbilityCategory::Specialized);
    }

    #[test]
    fn test_category_split() {
        assert_eq!(
            Ability::Freeze { chance: 30, duration: 60 }.category(),
            AbilityCategory::Specialized
        );
        assert_eq!(
            Ability::CriticalStrike { chance: 50 }.category(),
            AbilityCategory::Generic
        );
        assert_eq!(Ability::Kamikaze.category(), AbilityCategory::Generic);
    }

    #[test]
    fn test_trigger_effect_split() {
        assert!(Ability::Freeze { chance: 30, duration: 60 }.is_trigger_effect());
        assert!(Ability::Wave { chance: 30, level: 1, mini: false }.is_trigger_effect());
        // Dodge protects the unit itself; it never rides on an attack.
        assert!(!Ability::Dodge { chance: 30, duration: 60 }.is_trigger_effect());
        assert!(!Ability::Survive { chance: 50 }.is_trigger_effect());
    }

    #[test]
    fn test_expectation_factors() {
        let critical = Ability::CriticalStrike { chance: 50 };
        let savage = Ability::SavageBlow { chance: 30, modifier: 50 };
        assert_eq!(critical.expectation_factor(), Some(1.5));
        assert_eq!(savage.expectation_factor(), Some(1.15));
        assert_eq!(Ability::Metal.expectation_factor(), None);
    }

    #[test]
    fn test_surge_geometry() {
        assert_eq!(Ability::surge_reach(2000, 1200), (500, 800));
        // Negative offsets floor toward negative infinity.
        assert_eq!(Ability::surge_reach(1000, -100), (250, 225));
        assert_eq!(Ability::explosion_start(1000), 250);
    }

    #[test]
    fn test_duration_display() {
        let freeze = Ability::Freeze { chance: 20, duration: 60 };
        assert_eq!(
            freeze.display(),
            AbilityDisplay::Text(String::from("20% for 2.0s ~ 2.4s"))
        );
        let slow = Ability::Slow { chance: 30, duration: 65 };
        assert_eq!(
            slow.display(),
            AbilityDisplay::Text(String::from("30% for 2.17s ~ 2.6s"))
        );
    }

    #[test]
    fn test_weaken_display() {
        let weaken = Ability::Weaken { chance: 30, duration: 60, multiplier: 50 };
        assert_eq!(
            weaken.display(),
            AbilityDisplay::Text(String::from("30% to 50% for 2.0s ~ 2.4s"))
        );
    }

    #[test]
    fn test_flag_display_is_none() {
        assert_eq!(Ability::ZombieKiller.display(), AbilityDisplay::None);
        assert_eq!(Ability::Metal.display(), AbilityDisplay::None);
    }

    #[test]
    fn test_compile_merges_specializations() {
        let entries = vec![
            AbilityEntry::new("against_black", &[]),
            AbilityEntry::new("strong", &[]),
            AbilityEntry::new("against_red", &[]),
        ];
        let abilities = compile_abilities(&entries).unwrap();
        assert_eq!(abilities.len(), 2);
        // Merged at the first declaration's position, listed in trait order.
        assert_eq!(
            abilities[0],
            Ability::Specialization { targets: vec![TargetTrait::Red, TargetTrait::Black] }
        );
        assert_eq!(abilities[1], Ability::Strong);
    }

    #[test]
    fn test_compile_merges_immunities() {
        let entries = vec![
            AbilityEntry::new("immune_wave", &[]),
            AbilityEntry::new("kamikaze", &[]),
            AbilityEntry::new("immune_freeze", &[]),
        ];
        let abilities = compile_abilities(&entries).unwrap();
        assert_eq!(abilities.len(), 2);
        assert_eq!(
            abilities[0],
            Ability::Immunity { effects: vec![ImmuneEffect::Freeze, ImmuneEffect::Wave] }
        );
    }

    #[test]
    fn test_compile_preserves_declaration_order() {
        let entries = vec![
            AbilityEntry::new("surge", &[30, 2, 0, 2000, 1200]),
            AbilityEntry::new("wave", &[30, 1, 0]),
        ];
        let abilities = compile_abilities(&entries).unwrap();
        assert!(matches!(abilities[0], Ability::Surge { .. }));
        assert!(matches!(abilities[1], Ability::Wave { .. }));
    }

    #[test]
    fn test_compile_fails_fast_on_unknown() {
        let entries = vec![
            AbilityEntry::new("strong", &[]),
            AbilityEntry::new("quantum_strike", &[9]),
        ];
        let err = compile_abilities(&entries).unwrap_err();
        assert!(err.to_string().contains("quantum_strike"));
    }
}
