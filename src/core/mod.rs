//! Core module - analysis engines over the decoded matrix

pub mod capability;
pub mod config;
pub mod duty;
pub mod histogram;
pub mod rms;
pub mod runs;
pub mod stats;

pub use capability::{capability, Capability, NormalModelError};
pub use config::{Config, ConfigError};
pub use duty::{detect_edges, duty_cycle_samples, DutyCycleSummary, Edge, Transition};
pub use histogram::Histogram;
pub use rms::RmsSummary;
pub use runs::RunSet;
pub use stats::{c4, Parameter, ParameterTable, StatsError};
