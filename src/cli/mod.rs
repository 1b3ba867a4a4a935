// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! CLI module for running the pose pipeline from the shell.
//!
//! This module contains the command-line interface logic, including
//! argument parsing and the `predict` command implementation.

// Modules
/// CLI arguments.
pub mod args;

/// Logging macros and verbosity control.
pub mod logging;

/// Prediction logic.
#[cfg(feature = "backend-ort")]
pub mod predict;
