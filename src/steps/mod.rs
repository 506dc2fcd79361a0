//! The built-in migration steps, versions 1 through 22.
//!
//! Each step registers itself with
//! [`#[migration_step]`](crate::migration_step); [`StepRegistry::builtin`]
//! collects them. Steps read legacy keys with the healing accessors, write
//! the keys of the schema they produce, and drop keys that schema no longer
//! has. Malformed input is logged and replaced, never propagated.
//!
//! [`StepRegistry::builtin`]: crate::StepRegistry::builtin
pub mod cache;
pub mod interface;
pub mod metadata;
pub mod naming;
pub mod notifiers;
pub mod providers;
pub mod redirect;
pub mod schedule;
pub mod words;

/// Config version the built-in steps produce.
pub const CONFIG_VERSION: u32 = 22;
