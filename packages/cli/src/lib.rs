#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for employee production reports.
//!
//! Loads report documents (PDF, pre-extracted text, or previously exported
//! CSV), runs them through extraction and cleaning, and hands the typed
//! records to the analytics and export crates. The `prod_report` binary
//! exposes each operation as a subcommand, and falls back to an
//! interactive menu ([`interactive`]) when none is given.

pub mod commands;
pub mod config;
pub mod interactive;
pub mod pipeline;
