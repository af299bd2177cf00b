//! RDT: Raw Data Toolkit
//!
//! Decodes circuit-simulator raw output files (text header + binary sample
//! body) and derives manufacturing-style statistics from the waveforms:
//! bias-corrected deviations, process capability against spec limits, duty
//! cycle, RMS, and histograms.

pub mod cli;
pub mod core;
pub mod raw;
