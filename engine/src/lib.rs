// Engine library root: table retrieval, normalization, metrics, goals and the
// dashboard service built on them.

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod goals;
pub mod metrics;
pub mod services;
