//! Core exchange-rate logic and the collaborators it is handed

pub mod cache;
pub mod clock;
pub mod config;
pub mod converter;
pub mod error;
pub mod history;
pub mod log;
pub mod normalizer;
pub mod quote;
pub mod statistics;
pub mod transport;

// Re-export main types for cleaner imports
pub use clock::{Clock, FixedClock, SystemClock};
pub use converter::{Conversion, clp_to_usd, usd_to_clp};
pub use error::QuoteError;
pub use history::{HistoricalEntry, HistoricalTable, generate_historical_table};
pub use normalizer::Normalizer;
pub use quote::{InstitutionRate, Quote, QuoteDate, QuoteDetail, Source};
pub use statistics::{RateSnapshot, Statistics, derive_statistics};
pub use transport::RateSource;
