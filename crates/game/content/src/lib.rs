//! Data-driven content definitions and loaders.
//!
//! This crate houses static game content and provides loaders for RON/TOML
//! data files:
//! - Ability catalog (data-driven via RON)
//! - Status effect catalog (data-driven via RON)
//! - Balance tables: combat parameters, class advantage, experience (TOML)
//! - Unit archetypes per class (data-driven via RON)
//!
//! Content is consumed through the core's oracle traits and never appears in
//! game state. All loaders use tactics-core types directly with serde for
//! RON/TOML deserialization.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{AbilityCatalog, BalanceTables, EffectCatalog, UnitArchetype, UnitArchetypes};
