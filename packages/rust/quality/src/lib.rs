//! Deterministic quality gate: category scoring plus repair-target
//! selection for the bounded regeneration loop.

pub mod repair;
pub mod scoring;

pub use repair::repair_targets;
pub use scoring::evaluate;
