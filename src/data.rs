//! Unit data records and the read-only registry handle.
//!
//! The engine never loads game files itself; the data-loading collaborator
//! hands it a [`UnitRegistry`] of already-validated records. Everything here
//! derives `Serialize`/`Deserialize`, so registries can also be read from
//! JSON fixtures via [`UnitRegistry::from_json`].

use crate::error::StatError;
use crate::id::{FormIndex, UnitId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Damage and health multiplier with all base treasures collected.
pub const TREASURE_MULTIPLIER: f64 = 2.5;

/// Scale a raw first-level value to the given level multiplier.
///
/// The result is the integer the game itself displays, so the rounding here
/// is part of the data, not presentation.
pub(crate) fn scale_value(raw: u32, multiplier: f64) -> u32 {
    (raw as f64 * TREASURE_MULTIPLIER * multiplier).round() as u32
}

/// One raw ability declaration: a code plus positional numeric parameters.
///
/// Parameter meaning is defined per code by the ability catalog; missing
/// trailing parameters read as 0.
///
/// # Examples
///
/// ```rust
/// use catstat::AbilityEntry;
///
/// let wave = AbilityEntry::new("wave", &[50, 1, 1]); // chance, level, mini
/// assert_eq!(wave.code, "wave");
/// assert_eq!(wave.param(2), 1);
/// assert_eq!(wave.param(7), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityEntry {
    pub code: String,
    #[serde(default)]
    pub params: Vec<i64>,
}

impl AbilityEntry {
    /// Create an entry from a code and its parameters.
    pub fn new(code: &str, params: &[i64]) -> Self {
        Self {
            code: code.to_string(),
            params: params.to_vec(),
        }
    }

    /// Positional parameter access; absent parameters read as 0.
    pub fn param(&self, index: usize) -> i64 {
        self.params.get(index).copied().unwrap_or(0)
    }
}

/// Long-range interval override for a hit.
///
/// `start` and `start + offset` bound the reachable interval; a negative
/// offset is allowed and the bounds are sorted when resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongRange {
    pub start: i32,
    pub offset: i32,
}

/// One hit of a form's base attack pattern.
///
/// Forms deliver one to three hits per attack cycle; `frame` is the
/// cumulative animation frame at which the hit lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackHit {
    /// Raw attack power at the reference level.
    pub damage: u32,

    /// Cumulative animation frame of the hit.
    pub frame: u32,

    /// Long-range interval, when this hit is an omni/long-range strike.
    /// Hits after the first inherit the nearest earlier declaration.
    #[serde(default)]
    pub long_range: Option<LongRange>,

    /// Raw marker that this hit delivers the unit's triggered effects.
    /// Often absent for single-hit units (see the expansion rules).
    #[serde(default)]
    pub triggers_effects: Option<bool>,
}

impl AttackHit {
    /// Create a plain hit with no long-range override and no trigger marker.
    pub fn new(damage: u32, frame: u32) -> Self {
        Self {
            damage,
            frame,
            long_range: None,
            triggers_effects: None,
        }
    }

    /// Declare a long-range interval for this hit.
    pub fn with_long_range(mut self, start: i32, offset: i32) -> Self {
        self.long_range = Some(LongRange { start, offset });
        self
    }

    /// Mark this hit as delivering the unit's triggered effects.
    pub fn triggering(mut self) -> Self {
        self.triggers_effects = Some(true);
        self
    }
}

/// One evolution form of a unit, fully independent of its other forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormData {
    /// Health at the reference level.
    pub health: u32,

    /// Knockback count over the health bar.
    #[serde(default)]
    pub knockbacks: u32,

    /// Movement speed.
    #[serde(default)]
    pub speed: u32,

    /// Deployment cost (chapter-1 price), when the unit is deployable.
    #[serde(default)]
    pub cost: Option<u32>,

    /// Raw production cooldown frames, before speed-ups.
    #[serde(default)]
    pub production_cooldown: Option<u32>,

    /// Standing attack range.
    pub range: i32,

    /// Collision width; 320 for a standard unit.
    pub width: u32,

    /// Whether base hits splash over an area rather than a single target.
    #[serde(default)]
    pub area_effect: bool,

    /// Attack animation length in frames.
    #[serde(default)]
    pub attack_duration: u32,

    /// Raw cooldown frames between attacks (doubled by the game clock).
    #[serde(default)]
    pub attack_cooldown: u32,

    /// The base attack pattern; one to three hits in animation order.
    #[serde(default)]
    pub hits: Vec<AttackHit>,

    /// Ability declarations; order is observable in every output.
    #[serde(default)]
    pub abilities: Vec<AbilityEntry>,

    /// Talent overlay, appended after `abilities` unless excluded by option.
    #[serde(default)]
    pub talents: Vec<AbilityEntry>,
}

impl FormData {
    /// Create a form with the given health and range, the standard width,
    /// and everything else empty. Callers fill the remaining fields.
    pub fn new(health: u32, range: i32) -> Self {
        Self {
            health,
            knockbacks: 0,
            speed: 0,
            cost: None,
            production_cooldown: None,
            range,
            width: 320,
            area_effect: false,
            attack_duration: 0,
            attack_cooldown: 0,
            hits: Vec::new(),
            abilities: Vec::new(),
            talents: Vec::new(),
        }
    }

    /// Whether the form's first hit declares a long-range interval.
    pub fn long_range(&self) -> bool {
        self.hits.first().map_or(false, |h| h.long_range.is_some())
    }

    /// Whether the form delivers a single hit per cycle.
    pub fn single_damage(&self) -> bool {
        self.hits.len() == 1
    }

    /// Long-range interval effective for the hit at `index`: the hit's own
    /// declaration, or the nearest earlier hit's.
    pub(crate) fn long_range_at(&self, index: usize) -> Option<LongRange> {
        self.hits
            .get(..=index)?
            .iter()
            .rev()
            .find_map(|h| h.long_range)
    }

    pub(crate) fn last_hit_frame(&self) -> u32 {
        self.hits.last().map_or(0, |h| h.frame)
    }
}

/// One unit: its growth curve and per-form records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitData {
    /// Highest level the growth curve applies to; higher queries clamp.
    pub max_level: u32,

    /// Growth percents, one per 10-level band.
    pub growth: Vec<u32>,

    /// Evolution forms, first to fourth.
    pub forms: Vec<FormData>,
}

impl UnitData {
    pub fn new(max_level: u32, growth: Vec<u32>, forms: Vec<FormData>) -> Self {
        Self { max_level, growth, forms }
    }

    /// Look up a form record.
    pub fn form(&self, form: FormIndex) -> Option<&FormData> {
        self.forms.get(form.as_usize())
    }

    /// Level multiplier for health and attack power.
    ///
    /// The curve is stepwise: each full 10-level band contributes ten times
    /// its growth fraction, the current band contributes once per level, and
    /// the first band's single-level contribution is rebased so that level 1
    /// yields exactly 1.0.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use catstat::UnitData;
    ///
    /// let unit = UnitData {
    ///     max_level: 50,
    ///     growth: vec![20, 20, 20, 10, 10],
    ///     forms: vec![],
    /// };
    /// assert_eq!(unit.level_multiplier(1), 1.0);
    /// assert_eq!(unit.level_multiplier(50), 8.8);
    /// // Levels past max_level clamp to the max_level figure.
    /// assert_eq!(unit.level_multiplier(130), unit.level_multiplier(50));
    /// ```
    pub fn level_multiplier(&self, level: u32) -> f64 {
        if self.growth.is_empty() {
            return 1.0;
        }
        let effective = level.min(self.max_level);
        let steps = (effective / 10) as usize;
        let remainder = (effective % 10) as f64;
        let fractions: Vec<f64> = self.growth.iter().map(|&p| p as f64 / 100.0).collect();
        let decades: f64 = fractions.iter().take(steps).sum();
        let partial = fractions.get(steps).copied().unwrap_or(0.0);
        1.0 + decades * 10.0 + partial * remainder - fractions[0]
    }
}

/// Read-only registry of unit records, keyed and iterated in id order.
///
/// This is the explicit data handle passed into `Stat::build`; the engine
/// holds no global state.
///
/// # Examples
///
/// ```rust
/// use catstat::{AttackHit, FormData, UnitData, UnitId, UnitRegistry};
///
/// let mut form = FormData::new(1000, 140);
/// form.hits.push(AttackHit::new(80, 10));
///
/// let mut registry = UnitRegistry::new();
/// registry.insert(
///     UnitId::from(1),
///     UnitData { max_level: 30, growth: vec![20, 20, 20], forms: vec![form] },
/// );
/// assert_eq!(registry.len(), 1);
/// assert!(registry.unit(UnitId::from(1)).is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitRegistry {
    units: BTreeMap<UnitId, UnitData>,
}

impl UnitRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a unit record.
    pub fn insert(&mut self, id: UnitId, data: UnitData) {
        self.units.insert(id, data);
    }

    /// Look up a unit record.
    pub fn unit(&self, id: UnitId) -> Option<&UnitData> {
        self.units.get(&id)
    }

    /// Look up a form record, reporting which lookup failed.
    pub fn form(&self, id: UnitId, form: FormIndex) -> Result<&FormData, StatError> {
        self.units
            .get(&id)
            .and_then(|unit| unit.form(form))
            .ok_or(StatError::MissingData { unit: id, form })
    }

    /// Unit ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.units.keys().copied()
    }

    /// Number of units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the registry holds no units.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Deserialize a registry from JSON.
    ///
    /// This is the handoff format from the data-loading collaborator and
    /// the fixture format for tests.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
