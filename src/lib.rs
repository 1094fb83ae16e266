//! # catstat - Deterministic Combat Stat Engine for Gacha-Game Cat Units
//!
//! A pure calculation engine that turns raw per-form unit records into
//! fully resolved combat profiles:
//! - **Deterministic** resolution (same query → same attack list, bit for bit)
//! - **Pure** computation (no I/O, no globals; the registry is passed in)
//! - **Closed catalog** (every ability code maps to a known variant or
//!   fails fast)
//! - **Eager** construction (all figures computed at build time; every
//!   accessor afterwards is total)
//!
//! ## Core Concepts
//!
//! ### Resolution Pipeline
//!
//! A query flows through a simple pipeline:
//!
//! ```text
//! [UnitRegistry] → [AbilityCatalog] → [EffectExpander] → [Stat]
//! ```
//!
//! 1. **UnitRegistry** hands over the read-only form record
//! 2. **AbilityCatalog** compiles raw (code, params) entries into semantic
//!    abilities
//! 3. **EffectExpander** unrolls triggered effects (waves, surges,
//!    explosion cascades) into concrete attack occurrences
//! 4. **Stat** aggregates health, damage and dps sums, max-dps area,
//!    blind spot, and the ability listings
//!
//! ### Key Features
//!
//! - **Level scaling**: the game's stepwise growth-curve multiplier,
//!   exact to its documented breakpoints
//! - **Expected-value DPS**: critical-strike and savage-blow weighting as
//!   closed-form expectations, switchable off per query
//! - **Trigger expansion**: one wave, `level` surges, three explosion
//!   stages per triggering hit, in ability-declaration order
//! - **Plain-data output**: attack records and ability descriptors
//!   serialize without re-invoking the engine
//!
//! ## Example
//!
//! ```rust
//! use catstat::{
//!     AttackHit, FormData, FormIndex, Stat, StatOptions, UnitData, UnitId,
//!     UnitRegistry,
//! };
//!
//! let mut form = FormData::new(1000, 140);
//! form.hits = vec![AttackHit::new(400, 13)];
//! form.attack_duration = 20;
//! form.attack_cooldown = 10;
//!
//! let mut registry = UnitRegistry::new();
//! registry.insert(UnitId::from(1), UnitData::new(50, vec![20, 20, 20], vec![form]));
//!
//! // Default options: level 30, criticals weighted, talents included.
//! let stat = Stat::build(
//!     &registry,
//!     UnitId::from(1),
//!     FormIndex::FIRST,
//!     StatOptions::new(),
//! )
//! .unwrap();
//!
//! assert_eq!(stat.health(), 17000);
//! assert_eq!(stat.attack_cycle(), 32);
//! assert_eq!(stat.attacks()[0].dps, 6375.0); // 6800 damage / 32 frames * 30 fps
//! ```
//!
//! ## Modules
//!
//! - [`id`] - Unit and form identifier types
//! - [`options`] - Per-query construction options
//! - [`error`] - Error types
//! - [`data`] - Read-only unit registry and form records
//! - [`ability`] - The closed ability catalog
//! - [`attack`] - Attack occurrence records
//! - [`stat`] - The resolved combat profile

pub mod ability;
pub mod attack;
pub mod data;
pub mod error;
mod expand;
pub mod id;
pub mod options;
pub mod stat;

// Re-export main types for convenience
pub use error::StatError;
pub use id::{FormIndex, UnitId};
pub use options::{StatOptions, DEFAULT_LEVEL};
pub use stat::{BlindSpot, MaxDpsArea, Stat, FPS};

// Re-export the data model
pub use data::{AbilityEntry, AttackHit, FormData, LongRange, UnitData, UnitRegistry};

// Re-export catalog and attack records
pub use ability::{
    compile_abilities, describe, Ability, AbilityCategory, AbilityDescriptor, AbilityDisplay,
    ImmuneEffect, TargetTrait,
};
pub use attack::{AreaSpan, AreaType, AttackKind, AttackModel};
