//! Analysis module for waveform measurements
//!
//! This module provides the automatic measurements shown for each channel:
//! - Peak values (Vmax, Vmin, Vpp)
//! - Period and frequency from mean crossings
//! - 10-90% rise and fall time
//! - Duty cycle
//! - Peak statistics inside a time window

pub mod measurements;

pub use measurements::{measure, measure_region, mean_crossings, Measurements, RegionStats};
