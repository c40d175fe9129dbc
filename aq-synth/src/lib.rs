//! Hourly air-quality synthesis and forecasting.
//!
//! This crate turns sparse daily baselines into continuous hourly series
//! and projects short-horizon forecasts from a single live reading.

pub mod alert;
pub mod config;
pub mod curve;
pub mod features;
pub mod forecast;
pub mod pattern;
pub mod random;
pub mod series;
pub mod source;
pub mod spline;
pub mod summary;

/// Points in one synthesized day.
pub const HOURS_PER_DAY: usize = 24;

/// One day's hourly values, hour 0 first.
pub type DailyCurve = [f64; HOURS_PER_DAY];
