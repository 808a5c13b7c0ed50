//! Shared fixtures for the Larder integration tests.

pub mod test_util;
