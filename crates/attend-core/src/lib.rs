//! Core types and client-side state for the attend attendance tracker.
//!
//! This crate is deliberately free of HTTP dependencies. Network access goes
//! through the [`gateway::Gateway`] trait, implemented by `attend-http` and by
//! in-memory fakes in tests.

pub mod attendance;
pub mod auth;
pub mod error;
pub mod gateway;
pub mod ledger;
pub mod registry;
pub mod session;
pub mod stats;
pub mod subject;
pub mod user;

mod timestamp;

#[cfg(test)]
mod fake;
#[cfg(test)]
mod tests;

pub use error::{Error, GatewayError, Result};
