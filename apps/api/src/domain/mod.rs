// Domain layer module exports
// Following Hexagonal Architecture and DDD principles
// Domain is independent of infrastructure concerns

pub mod agent;
pub mod detection;
pub mod operator;
pub mod preferences;
pub mod repositories;
pub mod routing;
pub mod session;
