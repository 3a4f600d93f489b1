//! pr-activity CLI library exports for integration testing.
//!
//! This module exposes the command-line definition, configuration loading and
//! command implementations used by the `pr-activity` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod reporter;
