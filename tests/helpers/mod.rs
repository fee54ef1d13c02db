//! Test helpers module
//!
//! This module provides utilities and helpers for testing Campus Events.
//! It includes a mock Google API server, calendar fakes, database helpers,
//! and an in-memory application context.

#![allow(dead_code)]

pub mod calendar_mock;
pub mod database_helper;
pub mod test_context;
pub mod test_data;

pub use calendar_mock::*;
pub use database_helper::*;
pub use test_context::*;
pub use test_data::*;
