//! Propagation-model evaluation for geolocated cellular signal logs.
//!
//! Measurement logs are pooled into a [`dataset::Dataset`], grouped by
//! serving cell, and turned into an empirical path-loss curve that
//! [`comparison::compare`] sets against the analytical models in [`models`].

pub mod comparison;
pub mod config;
pub mod dataset;
pub mod error;
pub mod geodistance;
pub mod models;
pub mod output;
pub mod parser;
pub mod stats;

pub use error::{Result, WalkError};
