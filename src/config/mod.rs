//! Configuration module for Nexus-Search
//!
//! Handles loading and validating settings from YAML files and environment
//! variables. Settings are an explicit object passed into the aggregator and
//! backends at construction time; there is no global configuration state.

mod settings;

pub use settings::*;
