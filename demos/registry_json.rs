//! JSON registry example: Loading unit data from the handoff format
//!
//! This example demonstrates:
//! - Deserializing a [`UnitRegistry`] from JSON
//! - Iterating the registry in id order and resolving every form
//! - Serializing a resolved profile back to JSON for a rendering layer
//! - The error reported for a form the data does not have

use catstat::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Two units in the same shape the data-loading side hands over:
    // a long-range archer with a critical strike, and a plain melee
    // unit with a second form.
    let json = r#"{
        "units": {
            "545": {
                "max_level": 60,
                "growth": [20, 20, 20, 20, 20, 20],
                "forms": [{
                    "health": 2000,
                    "range": 410,
                    "width": 320,
                    "attack_duration": 80,
                    "attack_cooldown": 31,
                    "hits": [
                        { "damage": 650, "frame": 20 },
                        { "damage": 350, "frame": 55, "triggers_effects": true }
                    ],
                    "abilities": [{ "code": "critical_strike", "params": [50] }]
                }]
            },
            "600": {
                "max_level": 30,
                "growth": [20, 20, 20],
                "forms": [
                    {
                        "health": 1100,
                        "range": 140,
                        "width": 320,
                        "attack_duration": 20,
                        "attack_cooldown": 10,
                        "hits": [{ "damage": 400, "frame": 13 }]
                    },
                    {
                        "health": 1500,
                        "range": 150,
                        "width": 320,
                        "attack_duration": 20,
                        "attack_cooldown": 10,
                        "hits": [{ "damage": 540, "frame": 13 }]
                    }
                ]
            }
        }
    }"#;

    let registry = UnitRegistry::from_json(json)?;
    println!("Loaded {} units", registry.len());

    // Resolve every form of every unit at the default level.
    println!("\n=== Profiles ===");
    for id in registry.ids() {
        let forms = registry.unit(id).map_or(0, |unit| unit.forms.len());
        for index in 0..forms {
            let form = FormIndex::from(index as u8);
            let stat = Stat::build(&registry, id, form, StatOptions::new())?;
            println!(
                "unit {} form {}: health {}, attacks {}, dps sum {}",
                id,
                form,
                stat.health(),
                stat.attacks().len(),
                stat.dps_sum()
                    .map_or_else(|| "-".to_string(), |dps| format!("{:.3}", dps)),
            );
        }
    }

    // A resolved profile serializes as plain data.
    let archer = Stat::build(&registry, UnitId::from(545), FormIndex::FIRST, StatOptions::new())?;
    println!("\n=== Serialized attack list ===");
    println!("{}", serde_json::to_string_pretty(archer.attacks())?);

    // Asking for a form the data does not carry reports which lookup failed.
    let missing = Stat::build(&registry, UnitId::from(545), FormIndex::THIRD, StatOptions::new());
    println!("\n=== Missing form ===");
    match missing {
        Err(error) => println!("{}", error),
        Ok(_) => unreachable!("unit 545 has a single form"),
    }

    Ok(())
}
