//! CLI library components for the IST normalizer.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
