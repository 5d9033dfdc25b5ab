//! Task Ledger Library
//!
//! A file-backed task tracker: a task record store, a user credential
//! directory and a reporting engine, plus the CLI that drives them.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod ledger;
pub mod logging;
pub mod report;
pub mod session;
pub mod store;
pub mod types;
