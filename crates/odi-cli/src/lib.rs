//! CLI library components for the ODI normalizer.

pub mod config;
pub mod logging;
pub mod pipeline;
