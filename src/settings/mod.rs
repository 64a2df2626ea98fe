//! Configuration loading and resolution utilities.
//!
//! `load` is the primary entry point: it layers default files, explicit
//! `--config` files, and `HNS_`-prefixed environment variables, then applies
//! CLI overrides and resolves the result into a [`ResolvedConfig`].

mod loader;
mod raw;
mod resolved;
mod sources;

pub(crate) use loader::load;
pub(crate) use resolved::ResolvedConfig;
