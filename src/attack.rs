//! Attack occurrence records.
//!
//! A unit's resolved attack list is a flat sequence of [`AttackModel`]
//! values: the base hits first, then one entry per triggered-effect
//! occurrence (wave, surge, explosion cascades). Family-specific data
//! lives in the [`AttackKind`] tag; shared figures (damage, dps, span)
//! sit on the record itself so downstream code can serialize or render
//! attacks without consulting the engine again.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Family of an attack occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackKind {
    /// A hit of the unit's own attack animation.
    Base,
    Wave,
    Surge,
    /// One blast stage of an explosion; stage 0 is the main blast,
    /// higher stages are the weaker follow-up rings.
    Explosion { cascade: u8 },
}

/// Splash classification of an attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AreaType {
    SingleRange,
    Area,
}

impl fmt::Display for AreaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AreaType::SingleRange => write!(f, "Single range"),
            AreaType::Area => write!(f, "Area"),
        }
    }
}

/// Closed interval on the battlefield axis, in game distance units
/// relative to the unit's position. `begin` may be negative when an
/// attack reaches behind the unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaSpan {
    pub begin: i32,
    pub end: i32,
}

impl AreaSpan {
    pub fn new(begin: i32, end: i32) -> Self {
        Self { begin, end }
    }

    /// Overlap of two spans, or `None` when they are disjoint.
    pub fn intersect(self, other: AreaSpan) -> Option<AreaSpan> {
        let begin = self.begin.max(other.begin);
        let end = self.end.min(other.end);
        if begin <= end {
            Some(AreaSpan { begin, end })
        } else {
            None
        }
    }
}

impl fmt::Display for AreaSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ~ {}", self.begin, self.end)
    }
}

/// One resolved attack occurrence.
///
/// `damage` and `dps` are probability-weighted expectations; `raw_damage`
/// is the level-scaled value before any weighting. `trigger_effects`
/// carries the raw codes of status effects riding on this occurrence and
/// is `None` when the hit declares no trigger capability, while
/// `display_effects` always names the effects that visibly fire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackModel {
    pub kind: AttackKind,
    pub long_range: bool,
    pub raw_damage: u32,
    pub damage: f64,
    pub dps: f64,
    /// Probability this occurrence fires at all; 1.0 when unconditional.
    pub trigger_chance: f64,
    pub critical_chance: f64,
    pub savage_chance: f64,
    pub span: AreaSpan,
    pub area_type: AreaType,
    pub trigger_effects: Option<Vec<String>>,
    pub display_effects: Vec<String>,
}

impl AttackModel {
    /// Whether this occurrence was produced by a triggered effect rather
    /// than the attack animation itself.
    pub fn is_triggered(&self) -> bool {
        self.kind != AttackKind::Base
    }

    /// Whether this is a follow-up blast stage of an explosion.
    pub fn is_cascade(&self) -> bool {
        matches!(self.kind, AttackKind::Explosion { cascade } if cascade > 0)
    }

    /// Range text for this occurrence.
    ///
    /// Base attacks print their full reach, waves only their travel end,
    /// surges and main blasts both bounds, and cascade stages an
    /// open-ended `~ end` since their inner bound is already covered by
    /// the main blast.
    pub fn area_display(&self) -> String {
        match self.kind {
            AttackKind::Base if self.long_range => self.span.to_string(),
            AttackKind::Base => self.span.end.to_string(),
            AttackKind::Wave => self.span.end.to_string(),
            AttackKind::Surge | AttackKind::Explosion { cascade: 0 } => self.span.to_string(),
            AttackKind::Explosion { .. } => format!("~ {}", self.span.end),
        }
    }
}
