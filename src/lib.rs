//! Maintenance tools for a Project Zomboid installation.
//!
//! `pz-fix-insulation` patches clothing scripts, `pz-save-vacuum` trims old
//! chunks out of multiplayer saves. The two share nothing but the CLI
//! verbosity flags and logging setup.

pub mod cli;
pub mod config;
pub mod insulation;
pub mod logging;
pub mod script;
pub mod vacuum;

#[cfg(test)]
mod test_support;
