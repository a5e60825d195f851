//! Integration tests for armory-authz
//!
//! These tests verify the interaction between multiple components
//! against a real in-memory SQLite database.

pub mod database_tests;
pub mod permissions_api_tests;
pub mod policy_tests;
