//! Combat profile of one unit form.
//!
//! [`Stat`] is the engine's root entity: one instance per
//! (unit, form, options) query. Construction validates the options,
//! looks the form up in the registry, compiles its ability entries, and
//! eagerly computes every derived figure, so all accessors afterwards
//! are total and the attack list is reference-stable.

use crate::ability::{compile_abilities, Ability, AbilityCategory, AbilityDescriptor};
use crate::attack::{AreaSpan, AreaType, AttackKind, AttackModel};
use crate::data::{scale_value, FormData, UnitRegistry};
use crate::error::StatError;
use crate::expand::EffectExpander;
use crate::id::{FormIndex, UnitId};
use crate::options::StatOptions;
use serde::Serialize;
use std::fmt;

/// Frames per second of the battle clock.
pub const FPS: u32 = 30;

/// Raw data frames count double in battle time.
const TIME_MULTIPLIER: u32 = 2;

/// Production cooldown never drops below this many frames.
const MIN_COOLDOWN: u32 = 60;

/// Cooldown reduction from maxed blue orbs and treasures, in frames.
const COOLDOWN_DISCOUNT: u32 = 264;

/// Chapter-2 deployment price relative to the base cost.
const PRICE_MULTIPLIER: f64 = 1.5;

/// Where a unit's damage output peaks on the battlefield axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MaxDpsArea {
    /// Intersection of every major attack's span (long-range units).
    Span(AreaSpan),
    /// Area-effect melee units peak exactly at their declared range.
    Point(i32),
    /// Single-target unit; there is no area to merge.
    Single,
    /// The long-range spans never overlap.
    None,
}

impl MaxDpsArea {
    pub fn is_none(&self) -> bool {
        *self == MaxDpsArea::None
    }
}

impl fmt::Display for MaxDpsArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaxDpsArea::Span(span) => write!(f, "{span}"),
            MaxDpsArea::Point(range) => write!(f, "{range}"),
            MaxDpsArea::Single => write!(f, "Single"),
            MaxDpsArea::None => write!(f, "None"),
        }
    }
}

/// The gap in front of a unit that none of its attacks can reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BlindSpot {
    /// Nearest unreachable distance; negative when coverage starts
    /// behind the unit.
    Gap(i32),
    /// Every attack already reaches to or behind the unit's own width.
    None,
}

impl fmt::Display for BlindSpot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlindSpot::Gap(distance) => write!(f, "{distance}"),
            BlindSpot::None => write!(f, "-"),
        }
    }
}

/// Fully resolved combat statistics for one unit form at one level.
///
/// # Examples
///
/// ```rust
/// use catstat::{
///     AttackHit, FormData, FormIndex, Stat, StatOptions, UnitData, UnitId,
///     UnitRegistry,
/// };
///
/// let mut form = FormData::new(1000, 140);
/// form.hits = vec![AttackHit::new(400, 10)];
/// let mut registry = UnitRegistry::new();
/// registry.insert(UnitId::from(1), UnitData::new(30, vec![20, 20, 20], vec![form]));
///
/// let stat = Stat::build(
///     &registry,
///     UnitId::from(1),
///     FormIndex::FIRST,
///     StatOptions::new(),
/// )
/// .unwrap();
/// assert_eq!(stat.health(), 17000);
/// assert_eq!(stat.attacks().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stat {
    unit: UnitId,
    form: FormIndex,
    options: StatOptions,
    health: u32,
    attacks: Vec<AttackModel>,
    specialized: Vec<AbilityDescriptor>,
    generic: Vec<AbilityDescriptor>,
    damage_sum: Option<f64>,
    dps_sum: Option<f64>,
    max_dps_area: MaxDpsArea,
    blind_spot: BlindSpot,
    attack_cycle: u32,
    attack_duration: u32,
    speed: u32,
    knockbacks: u32,
    width: u32,
    range: i32,
    area_effect: bool,
    cost: Option<u32>,
    cooldown: Option<u32>,
    kamikaze: bool,
    long_range: bool,
    single_damage: bool,
}

impl Stat {
    /// Resolve the full profile of `unit`'s `form` under `options`.
    ///
    /// Fails with [`StatError::InvalidOption`] for a zero level,
    /// [`StatError::MissingData`] when the unit or form is absent from
    /// the registry, and [`StatError::UnrecognizedAbility`] when the
    /// form data carries a code the catalog does not know.
    pub fn build(
        registry: &UnitRegistry,
        unit: UnitId,
        form: FormIndex,
        options: StatOptions,
    ) -> Result<Self, StatError> {
        options.validate()?;
        let unit_data = registry
            .unit(unit)
            .ok_or(StatError::MissingData { unit, form })?;
        let form_data = unit_data
            .form(form)
            .ok_or(StatError::MissingData { unit, form })?;

        let mut entries = form_data.abilities.clone();
        if !options.exclude_talents {
            entries.extend(form_data.talents.iter().cloned());
        }
        let abilities = compile_abilities(&entries)?;

        let multiplier = unit_data.level_multiplier(options.level);
        let attack_cycle = attack_cycle(form_data);
        let attacks = EffectExpander::new(
            form_data,
            &abilities,
            multiplier,
            attack_cycle,
            options.dps_no_critical,
        )
        .expand();

        let kamikaze = abilities
            .iter()
            .any(|ability| matches!(ability, Ability::Kamikaze));
        let long_range = form_data.long_range();
        let max_dps_area =
            Self::merge_max_dps_area(&attacks, long_range, form_data.area_effect, form_data.range);
        let damage_sum = Self::damage_sum_of(&attacks, &options, max_dps_area);
        let dps_sum = Self::dps_sum_of(&attacks, &options, max_dps_area, kamikaze);
        let blind_spot = Self::blind_spot_of(&attacks, form_data.width);

        let mut specialized = Vec::new();
        let mut generic = Vec::new();
        for ability in &abilities {
            let descriptor = ability.descriptor();
            match descriptor.category {
                AbilityCategory::Specialized => specialized.push(descriptor),
                AbilityCategory::Generic => generic.push(descriptor),
            }
        }

        Ok(Self {
            unit,
            form,
            options,
            health: scale_value(form_data.health, multiplier),
            attacks,
            specialized,
            generic,
            damage_sum,
            dps_sum,
            max_dps_area,
            blind_spot,
            attack_cycle,
            attack_duration: form_data.attack_duration,
            speed: form_data.speed,
            knockbacks: form_data.knockbacks,
            width: form_data.width,
            range: form_data.range,
            area_effect: form_data.area_effect,
            cost: form_data.cost,
            cooldown: form_data.production_cooldown,
            kamikaze,
            long_range,
            single_damage: form_data.single_damage(),
        })
    }

    /// Health at the queried level, game rounding included.
    pub fn health(&self) -> u32 {
        self.health
    }

    /// The resolved attack list: base hits in pattern order, each
    /// followed by its triggered occurrences in declaration order.
    pub fn attacks(&self) -> &[AttackModel] {
        &self.attacks
    }

    /// Sum of the major attacks' expected damage. `None` when no area
    /// reaches every attack (disjoint long-range spans). With
    /// `sum_no_wave` only the base hits count.
    pub fn damage_sum(&self) -> Option<f64> {
        self.damage_sum
    }

    /// Sum of the major attacks' dps, with the same exclusions as
    /// [`damage_sum`](Self::damage_sum), and `None` for kamikaze units.
    pub fn dps_sum(&self) -> Option<f64> {
        self.dps_sum
    }

    pub fn max_dps_area(&self) -> MaxDpsArea {
        self.max_dps_area
    }

    pub fn blind_spot(&self) -> BlindSpot {
        self.blind_spot
    }

    /// Abilities in the specialized display group, declaration-ordered,
    /// including statuses that ride on the unit's attacks.
    pub fn specialized_abilities(&self) -> &[AbilityDescriptor] {
        &self.specialized
    }

    /// The remaining abilities, same shape as the specialized group.
    pub fn generic_abilities(&self) -> &[AbilityDescriptor] {
        &self.generic
    }

    /// Full attack cycle in battle frames: animation plus cooldown.
    pub fn attack_cycle(&self) -> u32 {
        self.attack_cycle
    }

    pub fn fps(&self) -> u32 {
        FPS
    }

    /// Frames of the cycle spent outside the attack animation.
    pub fn push_duration(&self) -> u32 {
        self.attack_cycle - self.attack_duration
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn knockbacks(&self) -> u32 {
        self.knockbacks
    }

    /// Chapter-2 deployment price. `None` for units that cannot be
    /// deployed normally.
    pub fn production_cost(&self) -> Option<u32> {
        self.cost
            .map(|cost| (cost as f64 * PRICE_MULTIPLIER).floor() as u32)
    }

    /// Recharge time in battle frames with all production speed-ups
    /// applied, never below the game's minimum.
    pub fn production_cooldown(&self) -> Option<u32> {
        self.cooldown.map(|raw| {
            (raw as i64 * TIME_MULTIPLIER as i64 - COOLDOWN_DISCOUNT as i64)
                .max(MIN_COOLDOWN as i64) as u32
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn range(&self) -> i32 {
        self.range
    }

    /// Form-level splash classification of the base attack.
    pub fn area_type(&self) -> AreaType {
        if self.area_effect {
            AreaType::Area
        } else {
            AreaType::SingleRange
        }
    }

    pub fn kamikaze(&self) -> bool {
        self.kamikaze
    }

    pub fn long_range(&self) -> bool {
        self.long_range
    }

    pub fn single_damage(&self) -> bool {
        self.single_damage
    }

    pub fn level(&self) -> u32 {
        self.options.level
    }

    pub fn unit(&self) -> UnitId {
        self.unit
    }

    pub fn form(&self) -> FormIndex {
        self.form
    }

    fn merge_max_dps_area(
        attacks: &[AttackModel],
        long_range: bool,
        area_effect: bool,
        range: i32,
    ) -> MaxDpsArea {
        if long_range {
            let mut majors = attacks.iter().filter(|attack| !attack.is_cascade());
            let first = match majors.next() {
                Some(attack) => attack.span,
                None => return MaxDpsArea::None,
            };
            let intersected = majors.try_fold(first, |merged, attack| {
                merged.intersect(attack.span).ok_or(())
            });
            match intersected {
                Ok(span) => MaxDpsArea::Span(span),
                Err(()) => MaxDpsArea::None,
            }
        } else if area_effect {
            MaxDpsArea::Point(range)
        } else {
            MaxDpsArea::Single
        }
    }

    fn damage_sum_of(
        attacks: &[AttackModel],
        options: &StatOptions,
        max_dps_area: MaxDpsArea,
    ) -> Option<f64> {
        if max_dps_area.is_none() {
            return None;
        }
        Some(Self::summable(attacks, options).map(|attack| attack.damage).sum())
    }

    fn dps_sum_of(
        attacks: &[AttackModel],
        options: &StatOptions,
        max_dps_area: MaxDpsArea,
        kamikaze: bool,
    ) -> Option<f64> {
        if kamikaze || max_dps_area.is_none() {
            return None;
        }
        Some(Self::summable(attacks, options).map(|attack| attack.dps).sum())
    }

    /// The attacks that count toward the aggregate sums: base hits only
    /// under `sum_no_wave`, every non-cascade occurrence otherwise.
    fn summable<'a>(
        attacks: &'a [AttackModel],
        options: &StatOptions,
    ) -> impl Iterator<Item = &'a AttackModel> {
        let base_only = options.sum_no_wave;
        attacks.iter().filter(move |attack| {
            if base_only {
                attack.kind == AttackKind::Base
            } else {
                !attack.is_cascade()
            }
        })
    }

    fn blind_spot_of(attacks: &[AttackModel], width: u32) -> BlindSpot {
        let nearest = attacks.iter().map(|attack| attack.span.begin).min();
        match nearest {
            Some(begin) if -(width as i32) < begin => BlindSpot::Gap(begin - 1),
            _ => BlindSpot::None,
        }
    }
}

/// Animation length plus doubled cooldown, measured from the last hit.
fn attack_cycle(form: &FormData) -> u32 {
    let animation = form.attack_duration as i64 + 1;
    let recovery = form.last_hit_frame() as i64
        + form.attack_cooldown as i64 * TIME_MULTIPLIER as i64
        - 1;
    animation.max(recovery) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{AbilityEntry, AttackHit, UnitData};

    fn registry_with(form: FormData) -> UnitRegistry {
        let mut registry = UnitRegistry::new();
        registry.insert(UnitId::from(1), UnitData::new(50, vec![20, 20, 20, 10, 10], vec![form]));
        registry
    }

    fn build(form: FormData) -> Stat {
        Stat::build(
            &registry_with(form),
            UnitId::from(1),
            FormIndex::FIRST,
            StatOptions::new(),
        )
        .unwrap()
    }

    fn plain_form() -> FormData {
        let mut form = FormData::new(1000, 140);
        form.hits = vec![AttackHit::new(400, 13)];
        form.attack_duration = 20;
        form.attack_cooldown = 10;
        form
    }

    #[test]
    fn test_missing_unit_reports_identity() {
        let registry = UnitRegistry::new();
        let err = Stat::build(
            &registry,
            UnitId::from(7),
            FormIndex::SECOND,
            StatOptions::new(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            StatError::MissingData { unit: UnitId::from(7), form: FormIndex::SECOND }
        );
    }

    #[test]
    fn test_missing_form_reports_identity() {
        let err = Stat::build(
            &registry_with(plain_form()),
            UnitId::from(1),
            FormIndex::THIRD,
            StatOptions::new(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            StatError::MissingData { unit: UnitId::from(1), form: FormIndex::THIRD }
        );
    }

    #[test]
    fn test_zero_level_rejected_before_lookup() {
        let registry = UnitRegistry::new();
        let err = Stat::build(
            &registry,
            UnitId::from(1),
            FormIndex::FIRST,
            StatOptions::new().at_level(0),
        )
        .unwrap_err();
        assert!(matches!(err, StatError::InvalidOption { .. }));
    }

    #[test]
    fn test_attack_cycle_takes_longer_of_animation_and_recovery() {
        // Last hit 13, cooldown 10 doubled: 13 + 20 - 1 = 32 > 21.
        assert_eq!(attack_cycle(&plain_form()), 32);

        let mut slow_animation = plain_form();
        slow_animation.attack_duration = 80;
        assert_eq!(attack_cycle(&slow_animation), 81);
    }

    #[test]
    fn test_push_duration_is_cycle_minus_animation() {
        let stat = build(plain_form());
        assert_eq!(stat.attack_cycle(), 32);
        assert_eq!(stat.push_duration(), 12);
    }

    #[test]
    fn test_production_figures() {
        let mut form = plain_form();
        form.cost = Some(4000);
        form.production_cooldown = Some(200);
        let stat = build(form);
        assert_eq!(stat.production_cost(), Some(6000));
        // 200 * 2 - 264 = 136, above the floor of 60.
        assert_eq!(stat.production_cooldown(), Some(136));

        let mut quick = plain_form();
        quick.production_cooldown = Some(100);
        assert_eq!(build(quick).production_cooldown(), Some(60));
        assert_eq!(build(plain_form()).production_cost(), None);
    }

    #[test]
    fn test_health_scales_with_level() {
        // level 30: 1 + (0.2 + 0.2 + 0.2) * 10 + 0 - 0.2 = 6.8.
        let stat = build(plain_form());
        assert_eq!(stat.health(), 17000);
        assert_eq!(stat.level(), 30);
    }

    #[test]
    fn test_health_with_single_growth_band() {
        // A growth curve shorter than the level's band count contributes
        // only its declared bands: 1 + 0.2 * 10 + 0 - 0.2 = 2.8 at level 30.
        let mut registry = UnitRegistry::new();
        registry.insert(UnitId::from(2), UnitData::new(30, vec![20], vec![plain_form()]));
        let stat = Stat::build(&registry, UnitId::from(2), FormIndex::FIRST, StatOptions::new())
            .unwrap();
        assert_eq!(stat.health(), 7000);
    }

    #[test]
    fn test_ability_groups_split_by_category() {
        let mut form = plain_form();
        form.abilities = vec![
            AbilityEntry::new("against_red", &[]),
            AbilityEntry::new("survive", &[50]),
            AbilityEntry::new("strong", &[]),
        ];
        let stat = build(form);
        let specialized: Vec<&str> = stat
            .specialized_abilities()
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        let generic: Vec<&str> = stat
            .generic_abilities()
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(specialized, vec!["Specialized to", "Strong"]);
        assert_eq!(generic, vec!["Survive"]);
    }

    #[test]
    fn test_kamikaze_suppresses_dps_sum_only() {
        let mut form = plain_form();
        form.abilities = vec![AbilityEntry::new("kamikaze", &[])];
        let stat = build(form);
        assert!(stat.kamikaze());
        assert_eq!(stat.dps_sum(), None);
        assert!(stat.damage_sum().is_some());
    }

    #[test]
    fn test_melee_blind_spot_is_absent() {
        let stat = build(plain_form());
        assert_eq!(stat.blind_spot(), BlindSpot::None);
        assert_eq!(stat.blind_spot().to_string(), "-");
    }

    #[test]
    fn test_single_target_max_dps_area() {
        let stat = build(plain_form());
        assert_eq!(stat.max_dps_area(), MaxDpsArea::Single);
        assert_eq!(stat.max_dps_area().to_string(), "Single");
    }

    #[test]
    fn test_area_melee_max_dps_area_is_point() {
        let mut form = plain_form();
        form.area_effect = true;
        let stat = build(form);
        assert_eq!(stat.max_dps_area(), MaxDpsArea::Point(140));
        assert_eq!(stat.max_dps_area().to_string(), "140");
        assert_eq!(stat.area_type(), AreaType::Area);
    }

    #[test]
    fn test_disjoint_long_range_spans_void_the_sums() {
        let mut form = FormData::new(1000, 500);
        form.hits = vec![
            AttackHit::new(100, 10).with_long_range(0, 100),
            AttackHit::new(100, 20).with_long_range(300, 100),
        ];
        let stat = build(form);
        assert_eq!(stat.max_dps_area(), MaxDpsArea::None);
        assert_eq!(stat.max_dps_area().to_string(), "None");
        assert_eq!(stat.damage_sum(), None);
        assert_eq!(stat.dps_sum(), None);
    }

    #[test]
    fn test_attacks_are_reference_stable() {
        let stat = build(plain_form());
        let first = stat.attacks().as_ptr();
        assert_eq!(stat.attacks().as_ptr(), first);
    }
}
