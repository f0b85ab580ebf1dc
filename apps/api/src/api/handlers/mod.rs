pub mod agents;
pub mod auth;
pub mod detections;
pub mod preferences;
pub mod sessions;
