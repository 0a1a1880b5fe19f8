//! Keeps a household expense ledger (CSV) and a ChangeLog style text memo in agreement. Each side
//! is read into `ExpenseRecord`s, the records are merged without duplicates, and the merged set is
//! written back to both files.

pub mod args;
mod backup;
pub mod commands;
mod config;
pub mod engine;
mod error;
pub mod journal;
pub mod ledger;
pub mod model;
mod utils;

#[cfg(test)]
mod test;

pub use config::Config;
pub use engine::{Engine, ImportReport, SyncReport};
pub use error::{Error, ErrorType, Result};
