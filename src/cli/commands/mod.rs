//! CLI command implementations

pub mod completions;
pub mod duty;
pub mod export;
pub mod hist;
pub mod info;
pub mod rms;
pub mod stats;
