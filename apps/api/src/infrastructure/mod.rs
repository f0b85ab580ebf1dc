// Infrastructure layer module
// In-memory adapters for the domain repositories and demo seed data
// Follows Hexagonal Architecture

pub mod repositories;
pub mod seed;
