//! Integration test utilities for the ban relay
//!
//! This crate provides an in-process admin API server, a mock webhook host and
//! in-memory stand-ins for the database ports.

pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
