//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//! Ports are small enough that hand-written fakes stay readable and let each
//! test control exactly what the collaborator returns.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
