//! AI Worker operator console
//!
//! This library provides the session workflow behind the operator console:
//! the agent directory, the session state machine, the processing
//! simulator, cross-agent routing and the HTTP API that exposes them.

pub mod agents;
pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
