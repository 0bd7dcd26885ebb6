//! Shared service plumbing: env config, health probes, request tracing and
//! wire-format helpers.

pub mod config;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
