//! # Freelance Dashboard
//!
//! Turns the invoicing records of a freelance business, kept in an Airtable
//! table, into a yearly dashboard: revenue per fiscal quarter, contribution
//! ("cotisation") estimates, projected and realized figures.
//!
//! ## Core Concepts
//!
//! - **Transaction**: one invoice line, with an optional invoicing date and an
//!   optional payment date. Its status (draft, waiting, done) is derived from
//!   those two dates.
//! - **Versement**: a transaction that counts as declarable revenue, i.e. a
//!   positive amount that is neither a cotisation nor a subvention.
//! - **Quarter**: a half-open three-month window. Paid versements are declared
//!   in the quarter of their payment date.
//! - **Projected vs. realized**: projected figures include invoiced and draft
//!   work; realized figures only what has been paid.
//!
//! ## Example
//!
//! ```rust,ignore
//! use freelance_dashboard::*;
//!
//! let store = AirtableClient::new(StoreConfig::from_env()?)?;
//! let dashboard = Dashboard::new(store);
//!
//! let summary = dashboard.summarize_year(2023).await?;
//! for quarter in &summary.quarters_details {
//!     println!(
//!         "{}: {} (cotisation {})",
//!         quarter.label,
//!         format_amount(quarter.amount_to_declare),
//!         format_amount(quarter.planned_cotisation)
//!     );
//! }
//! ```

#[cfg(all(feature = "airtable", target_arch = "wasm32"))]
compile_error!("the `airtable` feature holds private credentials and cannot target wasm32");

pub mod config;
pub mod engine;
pub mod error;
pub mod fetcher;
pub mod presentation;
pub mod schema;
pub mod store;
pub mod utils;

#[cfg(all(feature = "airtable", not(target_arch = "wasm32")))]
pub mod airtable;

#[cfg(all(feature = "airtable", not(target_arch = "wasm32")))]
pub use airtable::AirtableClient;
pub use config::StoreConfig;
pub use engine::{
    belongs_to_year, calc_cotisation, is_versement, planned_cotisation, quarter_details,
    summarize, Amounts, Dashboard, QuarterDetails, YearSummary,
};
pub use error::{DashboardError, Result};
pub use fetcher::{normalize_record, partition_by_status, TransactionFetcher};
pub use presentation::{
    quarter_cards, toggle_quarter, year_cards, QuarterCard, SummaryCard, TransactionRow, YearView,
};
pub use schema::*;
pub use store::{
    InMemoryStore, RecordFields, RecordPage, RecordStore, SelectOptions, SortDirection, SortField,
    StoreRecord,
};
pub use utils::*;
