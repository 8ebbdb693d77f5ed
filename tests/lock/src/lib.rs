//! Shared fixtures for the acceptance tests and the cross-process binary.

pub mod fixtures;
