//! Hook system for the capture/apply window.
//!
//! Hooks configured under `[[hooks.between]]` run after a target's session
//! has captured its assets and before changes are applied, so minifiers can
//! regenerate the canonical artifacts in between.

mod runner;

pub use runner::*;
