//! Infrastructure layer: record stores, reconciliation, upload jobs, config.

pub mod config;
pub mod jobs;
pub mod reconcile;
pub mod store;

#[cfg(test)]
mod integration_tests;
#[cfg(test)]
mod test_support;
