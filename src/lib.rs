//! Inspect CI jobs from Treeherder-style dashboards: job metadata, log
//! artifacts, performance measurements, sheriff classifications and bug
//! suggestions, assembled into one consolidated detail view.
//!
//! The [`detail::DetailCoordinator`] is the core of the crate: it runs the
//! fetch batch behind a job selection and guarantees that a newer selection
//! supersedes an older one no matter how their responses interleave.

pub mod cli;
pub mod config;
pub mod detail;
pub mod error;
pub mod links;
pub mod model;
pub mod output;
pub mod providers;
