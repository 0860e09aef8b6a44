//! Mock filesystem implementations for testing.
//!
//! This module provides `MockFs` and pre-built scenarios for testing
//! the schedstat reader without requiring a Linux `/proc` filesystem.

mod filesystem;
mod scenarios;

pub use filesystem::MockFs;
pub use scenarios::{
    SCENARIO_CPU_FIELDS, SCENARIO_CPUS, SCENARIO_DOMAINS_PER_CPU, schedstat_content,
};
