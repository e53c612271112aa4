//! A small Rust client for the LASP LISIRD space-weather data service.
//!
//! This crate implements a `lisird`-style flow: validate a dataset name
//! against a catalog, build a LaTiS query URL for a time range, download the
//! CSV extract, and parse it into a timestamp-indexed table.
//!
//! ## Quick start
//! - Create a [`Client`]; it ships with a bundled catalog of known dataset
//!   names and points at the public LISIRD endpoints.
//! - Call [`Client::fetch_range`] with a dataset and a half-open time range
//!   (start inclusive, end exclusive), or [`Client::fetch_latest`] for just
//!   the most recent record.
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use lisird::{Client, Result};
//!
//! fn main() -> Result<()> {
//!     let client = Client::new()?;
//!
//!     let start = NaiveDate::from_ymd_opt(2005, 5, 5)
//!         .unwrap()
//!         .and_hms_opt(12, 0, 0)
//!         .unwrap();
//!     let end = NaiveDate::from_ymd_opt(2006, 5, 5)
//!         .unwrap()
//!         .and_hms_opt(12, 0, 0)
//!         .unwrap();
//!
//!     let table = client.fetch_range("sorce_tsi_24hr_l3", start, end)?;
//!     for (time, row) in table.rows().take(5) {
//!         println!("{time}  {row:?}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Every fetch is one blocking GET with no caching or retries; transport and
//! parse failures surface as [`Error`] values.

#![forbid(unsafe_code)]

mod catalog;
mod client;
mod error;
mod timeseries;
mod util;

pub use catalog::{Catalog, RemoteCatalog};
pub use client::{Client, LATIS_CATALOG_URL, LATIS_DATA_URL};
pub use error::{Error, Result};
pub use timeseries::TimeSeries;
