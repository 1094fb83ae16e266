//! Triggered-effect expansion.
//!
//! Turns a form's raw hit pattern into the full attack occurrence list:
//! each hit's base occurrence followed by the occurrences its triggered
//! effect families produce (one wave, `level` surges, an explosion with
//! two cascade stages), in ability-declaration order. Status-only effects
//! add no occurrence of their own; they only annotate the hit they ride on.

use crate::ability::Ability;
use crate::attack::{AreaSpan, AreaType, AttackKind, AttackModel};
use crate::data::{scale_value, FormData};
use crate::stat::FPS;

/// Wave travel geometry: every wave starts a fixed distance behind the
/// unit, covers a fixed width, and stretches by a half-width step per
/// level above 1.
const WAVE_BEGIN: i32 = -67;
const WAVE_WIDTH: i32 = 400;
const WAVE_STEP_RATIO: f64 = 0.5;

/// Surge spans pad the declared quarter-range interval by these margins.
const SURGE_BACKWARD: i32 = 250;
const SURGE_FORWARD: i32 = 125;

/// Explosion blast stages cover `start ± (margin + cascade * step)`.
const EXPLOSION_MARGIN: i32 = 75;
const EXPLOSION_MARGIN_STEP: i32 = 100;

/// Cascade stages deal these fractions of the main blast, floored.
const CASCADE_FRACTIONS: [f64; 2] = [0.7, 0.4];

/// Mini waves and mini surges deal a fifth of the base damage.
const MINI_RATIO: f64 = 0.2;

/// Per-hit figures shared by the base occurrence and everything expanded
/// from it.
struct HitContext {
    scaled: u32,
    weighting: f64,
    critical_chance: f64,
    savage_chance: f64,
    /// The hit carries the literal trigger marker in the data.
    declared: bool,
}

/// Expands one form's hits into the resolved attack list.
pub(crate) struct EffectExpander<'a> {
    form: &'a FormData,
    abilities: &'a [Ability],
    multiplier: f64,
    cycle: u32,
    no_critical: bool,
}

impl<'a> EffectExpander<'a> {
    pub(crate) fn new(
        form: &'a FormData,
        abilities: &'a [Ability],
        multiplier: f64,
        cycle: u32,
        no_critical: bool,
    ) -> Self {
        Self { form, abilities, multiplier, cycle, no_critical }
    }

    /// The resolved occurrence list, hit by hit.
    pub(crate) fn expand(&self) -> Vec<AttackModel> {
        let attached: Vec<&Ability> = self
            .abilities
            .iter()
            .filter(|ability| ability.is_trigger_effect())
            .collect();
        let carried: Vec<&Ability> = attached
            .iter()
            .copied()
            .filter(|ability| !ability.is_expansion_family())
            .collect();

        let weighting = if self.no_critical {
            1.0
        } else {
            attached
                .iter()
                .filter_map(|ability| ability.expectation_factor())
                .fold(1.0, |acc, factor| acc * factor)
        };
        let critical_chance = attached
            .iter()
            .find_map(|ability| match ability {
                Ability::CriticalStrike { chance } => Some(*chance as f64 / 100.0),
                _ => None,
            })
            .unwrap_or(0.0);
        let savage_chance = attached
            .iter()
            .find_map(|ability| match ability {
                Ability::SavageBlow { chance, .. } => Some(*chance as f64 / 100.0),
                _ => None,
            })
            .unwrap_or(0.0);

        let mut attacks = Vec::new();
        for (index, hit) in self.form.hits.iter().enumerate() {
            let triggers = hit.triggers_effects.unwrap_or(false) || self.form.single_damage();
            let context = HitContext {
                scaled: scale_value(hit.damage, self.multiplier),
                weighting: if triggers { weighting } else { 1.0 },
                critical_chance: if triggers { critical_chance } else { 0.0 },
                savage_chance: if triggers { savage_chance } else { 0.0 },
                declared: hit.triggers_effects == Some(true),
            };

            attacks.push(self.base_occurrence(index, &context, triggers, &attached));
            if !triggers {
                continue;
            }
            for ability in &attached {
                match ability {
                    Ability::Wave { chance, level, mini } => {
                        attacks.push(self.wave_occurrence(
                            &context, &carried, *chance, *level, *mini,
                        ));
                    }
                    Ability::Surge { chance, level, mini, range, range_offset } => {
                        for _ in 0..*level {
                            attacks.push(self.surge_occurrence(
                                &context, &carried, *chance, *mini, *range, *range_offset,
                            ));
                        }
                    }
                    Ability::Explosion { chance, range } => {
                        attacks.extend(self.explosion_occurrences(
                            &context, &carried, *chance, *range,
                        ));
                    }
                    _ => {}
                }
            }
        }
        attacks
    }

    fn base_occurrence(
        &self,
        index: usize,
        context: &HitContext,
        triggers: bool,
        attached: &[&Ability],
    ) -> AttackModel {
        let long_range = self.form.long_range_at(index);
        let span = match long_range {
            Some(range) => {
                let reach = range.start + range.offset;
                AreaSpan::new(range.start.min(reach), range.start.max(reach))
            }
            None => AreaSpan::new(-(self.form.width as i32), self.form.range),
        };
        let area_type = if self.form.area_effect {
            AreaType::Area
        } else {
            AreaType::SingleRange
        };
        let damage = context.scaled as f64 * context.weighting;
        AttackModel {
            kind: AttackKind::Base,
            long_range: long_range.is_some(),
            raw_damage: context.scaled,
            damage,
            dps: self.per_cycle_dps(damage),
            trigger_chance: 1.0,
            critical_chance: context.critical_chance,
            savage_chance: context.savage_chance,
            span,
            area_type,
            trigger_effects: self.effect_codes(context, triggers, attached),
            display_effects: self.effect_names(triggers, attached),
        }
    }

    fn wave_occurrence(
        &self,
        context: &HitContext,
        carried: &[&Ability],
        chance: u32,
        level: u32,
        mini: bool,
    ) -> AttackModel {
        let end = WAVE_BEGIN + WAVE_WIDTH + wave_step() * (level as i32 - 1);
        self.triggered_occurrence(
            AttackKind::Wave,
            context,
            carried,
            chance,
            mini,
            AreaSpan::new(WAVE_BEGIN, end),
        )
    }

    fn surge_occurrence(
        &self,
        context: &HitContext,
        carried: &[&Ability],
        chance: u32,
        mini: bool,
        range: i32,
        range_offset: i32,
    ) -> AttackModel {
        let (start, reach) = Ability::surge_reach(range, range_offset);
        self.triggered_occurrence(
            AttackKind::Surge,
            context,
            carried,
            chance,
            mini,
            AreaSpan::new(start - SURGE_BACKWARD, reach + SURGE_FORWARD),
        )
    }

    fn explosion_occurrences(
        &self,
        context: &HitContext,
        carried: &[&Ability],
        chance: u32,
        range: i32,
    ) -> Vec<AttackModel> {
        let start = Ability::explosion_start(range);
        let main = self.triggered_occurrence(
            AttackKind::Explosion { cascade: 0 },
            context,
            carried,
            chance,
            false,
            blast_span(start, 0),
        );
        let mut occurrences = vec![main];
        for (stage, fraction) in CASCADE_FRACTIONS.iter().enumerate() {
            let cascade = stage as u8 + 1;
            let raw = (context.scaled as f64 * fraction).floor() as u32;
            let damage = raw as f64 * context.weighting;
            let stage_model = AttackModel {
                kind: AttackKind::Explosion { cascade },
                raw_damage: raw,
                damage,
                dps: self.per_cycle_dps(damage) * chance as f64 / 100.0,
                span: blast_span(start, cascade),
                ..occurrences[0].clone()
            };
            occurrences.push(stage_model);
        }
        occurrences
    }

    fn triggered_occurrence(
        &self,
        kind: AttackKind,
        context: &HitContext,
        carried: &[&Ability],
        chance: u32,
        mini: bool,
        span: AreaSpan,
    ) -> AttackModel {
        let raw = if mini {
            (context.scaled as f64 * MINI_RATIO).round() as u32
        } else {
            context.scaled
        };
        let damage = raw as f64 * context.weighting;
        AttackModel {
            kind,
            long_range: false,
            raw_damage: raw,
            damage,
            dps: self.per_cycle_dps(damage) * chance as f64 / 100.0,
            trigger_chance: chance as f64 / 100.0,
            critical_chance: context.critical_chance,
            savage_chance: context.savage_chance,
            span,
            area_type: AreaType::Area,
            trigger_effects: self.effect_codes(context, true, carried),
            display_effects: self.effect_names(true, carried),
        }
    }

    fn per_cycle_dps(&self, damage: f64) -> f64 {
        damage / self.cycle as f64 * FPS as f64
    }

    /// Raw codes of the effects riding on an occurrence. `None` when the
    /// hit never declared the trigger marker, even if the effects still
    /// fire through the single-attack rule.
    fn effect_codes(
        &self,
        context: &HitContext,
        triggers: bool,
        effects: &[&Ability],
    ) -> Option<Vec<String>> {
        if context.declared && triggers {
            Some(effects.iter().map(|e| e.code().to_string()).collect())
        } else {
            None
        }
    }

    fn effect_names(&self, triggers: bool, effects: &[&Ability]) -> Vec<String> {
        if triggers {
            effects.iter().map(|e| e.name().to_string()).collect()
        } else {
            Vec::new()
        }
    }
}

fn wave_step() -> i32 {
    (WAVE_WIDTH as f64 * WAVE_STEP_RATIO).round() as i32
}

fn blast_span(start: i32, cascade: u8) -> AreaSpan {
    let margin = EXPLOSION_MARGIN + cascade as i32 * EXPLOSION_MARGIN_STEP;
    AreaSpan::new(start - margin, start + margin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::compile_abilities;
    use crate::data::{AbilityEntry, AttackHit, FormData};

    fn expand(form: &FormData, cycle: u32, no_critical: bool) -> Vec<AttackModel> {
        let abilities = compile_abilities(&form.abilities).unwrap();
        EffectExpander::new(form, &abilities, 1.0, cycle, no_critical).expand()
    }

    fn wave_form(level: i64, mini: i64) -> FormData {
        let mut form = FormData::new(1000, 140);
        form.hits = vec![AttackHit::new(400, 10)];
        form.abilities = vec![AbilityEntry::new("wave", &[50, level, mini])];
        form
    }

    #[test]
    fn test_wave_span_stretches_per_level() {
        let attacks = expand(&wave_form(1, 0), 50, false);
        assert_eq!(attacks.len(), 2);
        assert_eq!(attacks[1].kind, AttackKind::Wave);
        assert_eq!(attacks[1].span, AreaSpan::new(-67, 333));

        let attacks = expand(&wave_form(2, 0), 50, false);
        assert_eq!(attacks[1].span, AreaSpan::new(-67, 533));
    }

    #[test]
    fn test_mini_wave_damage_is_rounded_fifth() {
        let attacks = expand(&wave_form(1, 1), 50, false);
        // 400 * 2.5 = 1000 scaled, 1000 * 0.2 = 200.
        assert_eq!(attacks[0].raw_damage, 1000);
        assert_eq!(attacks[1].raw_damage, 200);
        assert_eq!(attacks[1].display_effects, Vec::<String>::new());
        // The wave occurrence never re-lists its own family.
        assert_eq!(attacks[0].display_effects, vec!["Mini-wave".to_string()]);
    }

    #[test]
    fn test_wave_dps_carries_trigger_chance() {
        let attacks = expand(&wave_form(1, 0), 50, false);
        // 1000 / 50 * 30 = 600 for the base hit, halved by the 50% chance.
        assert_eq!(attacks[0].dps, 600.0);
        assert_eq!(attacks[1].dps, 300.0);
        assert_eq!(attacks[1].trigger_chance, 0.5);
        // Per-occurrence damage stays the full expectation.
        assert_eq!(attacks[1].damage, 1000.0);
    }

    #[test]
    fn test_surge_expands_level_occurrences() {
        let mut form = FormData::new(1000, 500);
        form.hits = vec![AttackHit::new(100, 10)];
        form.abilities = vec![AbilityEntry::new("surge", &[30, 2, 0, 2000, 1200])];
        let attacks = expand(&form, 50, false);
        assert_eq!(attacks.len(), 3);
        assert_eq!(attacks[1].kind, AttackKind::Surge);
        assert_eq!(attacks[1].span, AreaSpan::new(250, 925));
        assert_eq!(attacks[2], attacks[1]);
    }

    #[test]
    fn test_explosion_expands_three_stages() {
        let mut form = FormData::new(1000, 500);
        form.hits = vec![AttackHit::new(2040, 10)];
        form.abilities = vec![AbilityEntry::new("explosion", &[30, 1000])];
        let attacks = expand(&form, 50, false);
        assert_eq!(attacks.len(), 4);
        // 2040 * 2.5 = 5100 scaled; cascades floor 0.7 and 0.4 of it.
        assert_eq!(attacks[1].raw_damage, 5100);
        assert_eq!(attacks[2].raw_damage, 3570);
        assert_eq!(attacks[3].raw_damage, 2040);
        assert_eq!(attacks[1].span, AreaSpan::new(175, 325));
        assert_eq!(attacks[2].span, AreaSpan::new(75, 425));
        assert_eq!(attacks[3].span, AreaSpan::new(-25, 525));
        assert_eq!(attacks[2].kind, AttackKind::Explosion { cascade: 1 });
    }

    #[test]
    fn test_families_expand_in_declaration_order() {
        let mut form = FormData::new(1000, 500);
        form.hits = vec![AttackHit::new(100, 10)];
        form.abilities = vec![
            AbilityEntry::new("explosion", &[30, 1000]),
            AbilityEntry::new("wave", &[30, 1, 0]),
        ];
        let attacks = expand(&form, 50, false);
        let kinds: Vec<AttackKind> = attacks.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![
                AttackKind::Base,
                AttackKind::Explosion { cascade: 0 },
                AttackKind::Explosion { cascade: 1 },
                AttackKind::Explosion { cascade: 2 },
                AttackKind::Wave,
            ]
        );
    }

    #[test]
    fn test_unflagged_hit_of_multi_pattern_stays_plain() {
        let mut form = FormData::new(1000, 140);
        form.hits = vec![
            AttackHit::new(100, 10),
            AttackHit::new(100, 20).triggering(),
        ];
        form.abilities = vec![AbilityEntry::new("wave", &[50, 1, 0])];
        let attacks = expand(&form, 50, false);
        // Only the flagged second hit expands.
        assert_eq!(attacks.len(), 3);
        assert_eq!(attacks[0].kind, AttackKind::Base);
        assert_eq!(attacks[0].display_effects, Vec::<String>::new());
        assert_eq!(attacks[1].kind, AttackKind::Base);
        assert_eq!(attacks[1].trigger_effects, Some(vec!["wave".to_string()]));
        assert_eq!(attacks[2].kind, AttackKind::Wave);
        assert_eq!(attacks[2].trigger_effects, Some(Vec::new()));
    }

    #[test]
    fn test_single_hit_fires_effects_without_marker() {
        let mut form = FormData::new(1000, 140);
        form.hits = vec![AttackHit::new(100, 10)];
        form.abilities = vec![AbilityEntry::new("freeze", &[20, 60])];
        let attacks = expand(&form, 50, false);
        assert_eq!(attacks.len(), 1);
        assert_eq!(attacks[0].trigger_effects, None);
        assert_eq!(attacks[0].display_effects, vec!["Freeze".to_string()]);
    }

    #[test]
    fn test_weighting_only_applies_to_triggering_hits() {
        let mut form = FormData::new(1000, 140);
        form.hits = vec![
            AttackHit::new(400, 10),
            AttackHit::new(400, 20).triggering(),
        ];
        form.abilities = vec![AbilityEntry::new("critical_strike", &[50])];
        let attacks = expand(&form, 50, false);
        assert_eq!(attacks[0].damage, 1000.0);
        assert_eq!(attacks[0].critical_chance, 0.0);
        assert_eq!(attacks[1].damage, 1500.0);
        assert_eq!(attacks[1].critical_chance, 0.5);
    }

    #[test]
    fn test_no_critical_collapses_weighting() {
        let mut form = FormData::new(1000, 140);
        form.hits = vec![AttackHit::new(400, 10)];
        form.abilities = vec![
            AbilityEntry::new("critical_strike", &[30]),
            AbilityEntry::new("savage_blow", &[20, 50]),
        ];
        let weighted = expand(&form, 50, false);
        let plain = expand(&form, 50, true);
        assert_eq!(weighted[0].damage, 1000.0 * 1.3 * 1.1);
        assert_eq!(plain[0].damage, 1000.0);
        // The chance fields still report the data either way.
        assert_eq!(plain[0].critical_chance, 0.3);
        assert_eq!(plain[0].savage_chance, 0.2);
    }

    #[test]
    fn test_long_range_hits_inherit_earlier_declaration() {
        let mut form = FormData::new(1000, 500);
        form.hits = vec![
            AttackHit::new(100, 10).with_long_range(300, 400),
            AttackHit::new(100, 20),
        ];
        let attacks = expand(&form, 50, false);
        assert_eq!(attacks[0].span, AreaSpan::new(300, 700));
        assert_eq!(attacks[1].span, AreaSpan::new(300, 700));
        assert!(attacks[1].long_range);
    }

    #[test]
    fn test_backward_long_range_normalizes_span() {
        let mut form = FormData::new(1000, 500);
        form.hits = vec![AttackHit::new(100, 10).with_long_range(400, -467)];
        let attacks = expand(&form, 50, false);
        assert_eq!(attacks[0].span, AreaSpan::new(-67, 400));
    }

    #[test]
    fn test_expansion_is_deterministic() {
        let mut form = FormData::new(1000, 500);
        form.hits = vec![AttackHit::new(100, 10)];
        form.abilities = vec![
            AbilityEntry::new("wave", &[30, 2, 1]),
            AbilityEntry::new("surge", &[30, 2, 0, 2000, 1200]),
        ];
        assert_eq!(expand(&form, 50, false), expand(&form, 50, false));
    }
}
