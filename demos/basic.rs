//! Basic example: Resolving one unit form's combat profile
//!
//! This example demonstrates:
//! - Building a unit registry in code
//! - Resolving a stat profile with default options
//! - Reading the expanded attack list (base hits plus mini-wave occurrences)
//! - Aggregate figures (damage sum, dps sum, max dps area, blind spot)
//! - Re-querying the same unit under different options

use catstat::*;

fn main() -> Result<(), StatError> {
    // One area-effect brawler whose two hits both carry a level-1 mini-wave.
    let mut form = FormData::new(1100, 275);
    form.area_effect = true;
    form.width = 320;
    form.speed = 12;
    form.knockbacks = 3;
    form.cost = Some(750);
    form.production_cooldown = Some(180);
    form.attack_duration = 24;
    form.attack_cooldown = 8;
    form.hits = vec![
        AttackHit::new(275, 8).triggering(),
        AttackHit::new(275, 16).triggering(),
    ];
    form.abilities = vec![AbilityEntry::new("wave", &[50, 1, 1])];

    let mut registry = UnitRegistry::new();
    registry.insert(UnitId::from(600), UnitData::new(30, vec![20, 20, 20], vec![form]));

    // Resolve at the default level 30.
    let stat = Stat::build(&registry, UnitId::from(600), FormIndex::FIRST, StatOptions::new())?;

    println!("=== Unit {} form {} at level {} ===", stat.unit(), stat.form(), stat.level());
    println!("Health: {}", stat.health());
    println!("Range: {} ({})", stat.range(), stat.area_type());
    println!("Attack cycle: {} frames ({} fps)", stat.attack_cycle(), stat.fps());
    println!("Speed: {}, knockbacks: {}", stat.speed(), stat.knockbacks());
    if let (Some(cost), Some(cooldown)) = (stat.production_cost(), stat.production_cooldown()) {
        println!("Deploy: {} money, recharge {} frames", cost, cooldown);
    }

    println!("\nAttacks:");
    for attack in stat.attacks() {
        let effects = if attack.display_effects.is_empty() {
            String::new()
        } else {
            format!("  [{}]", attack.display_effects.join(", "))
        };
        println!(
            "  {:?}: damage {} (expected {:.3}), dps {:.3}, area {}{}",
            attack.kind,
            attack.raw_damage,
            attack.damage,
            attack.dps,
            attack.area_display(),
            effects
        );
    }

    println!("\nAggregates:");
    if let Some(damage) = stat.damage_sum() {
        println!("  Damage sum: {:.3}", damage);
    }
    if let Some(dps) = stat.dps_sum() {
        println!("  Dps sum: {:.3}", dps);
    }
    println!("  Max dps area: {}", stat.max_dps_area());
    println!("  Blind spot: {}", stat.blind_spot());

    println!("\nAbilities:");
    for descriptor in stat.specialized_abilities() {
        println!("  [specialized] {}", descriptor.name);
    }
    for descriptor in stat.generic_abilities() {
        match &descriptor.display {
            AbilityDisplay::Text(text) => println!("  {}: {}", descriptor.name, text),
            AbilityDisplay::List(items) => println!("  {}: {}", descriptor.name, items.join(", ")),
            AbilityDisplay::None => println!("  {}", descriptor.name),
        }
    }

    // The same unit at level 1, and with wave occurrences left out of
    // the sums. Each query is an independent, immutable profile.
    let level_one = Stat::build(
        &registry,
        UnitId::from(600),
        FormIndex::FIRST,
        StatOptions::new().at_level(1),
    )?;
    let base_only = Stat::build(
        &registry,
        UnitId::from(600),
        FormIndex::FIRST,
        StatOptions::new().without_wave_sum(),
    )?;

    println!("\n=== Option variants ===");
    println!("Health at level 1: {}", level_one.health());
    if let (Some(all), Some(base)) = (stat.damage_sum(), base_only.damage_sum()) {
        println!("Damage sum: {:.3} with waves, {:.3} base hits only", all, base);
    }

    Ok(())
}
