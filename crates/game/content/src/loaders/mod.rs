//! RON/TOML loaders for the shipped content catalogs.

mod abilities;
mod effects;
mod tables;
mod units;

pub use abilities::AbilityCatalog;
pub use effects::EffectCatalog;
pub use tables::BalanceTables;
pub use units::{UnitArchetype, UnitArchetypes};
