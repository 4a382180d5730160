//! Module system tests
//!
//! Tests for activation order, providers, initializers and route gating.

pub mod test_utils;
pub mod property_tests;
pub mod provider_tests;
pub mod route_tests;
