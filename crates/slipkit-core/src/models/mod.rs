//! Data models for packing slips and pipeline configuration.

pub mod config;
pub mod slip;
