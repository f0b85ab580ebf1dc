// Detection domain module
// Anomalies found by monitoring runs

#![allow(clippy::module_inception)]

pub mod detection;
pub mod value_objects;

pub use detection::Detection;
pub use value_objects::{DetectionStatus, Severity};
