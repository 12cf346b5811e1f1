#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Search, recency filtering, and aggregation of production records.
//!
//! Every stage takes cleaned [`TypedRecord`]s and is a pure function of its
//! inputs: [`search`] narrows records by employee and store, [`recency`]
//! keeps employees who worked recently, and [`aggregate`] computes per-group
//! and grand averages. An empty record set is valid input everywhere and
//! produces an empty result.
//!
//! [`TypedRecord`]: prod_report_production_models::TypedRecord

pub mod aggregate;
pub mod recency;
pub mod search;

pub use aggregate::{aggregate, rank};
pub use recency::filter_recent;
pub use search::filter_records;
