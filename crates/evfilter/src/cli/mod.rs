//! CLI functionality for the evfilter tool
//!
//! This module contains all CLI-related functionality including:
//! - Scenario files and the scenario runner
//! - The `run` and `check` commands
//! - Output formatting

pub mod check;
pub mod output;
pub mod run;
pub mod scenario;
