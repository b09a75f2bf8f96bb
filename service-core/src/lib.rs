//! service-core: Shared infrastructure for the arena top-up services.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
