//! Canonical quote record and source tags

use crate::core::error::QuoteError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    Mindicador,
    CentralBank,
    Investing,
    Banks,
    Historical,
}

impl Source {
    /// Sources that produce a quote for "now", in dashboard order.
    pub const LIVE: [Source; 4] = [
        Source::Mindicador,
        Source::CentralBank,
        Source::Investing,
        Source::Banks,
    ];

    /// Human readable name of the source.
    pub fn label(&self) -> &'static str {
        match self {
            Source::Mindicador => "Mindicador",
            Source::CentralBank => "Banco Central (SBIF)",
            Source::Investing => "Investing.com",
            Source::Banks => "Bancos",
            Source::Historical => "Histórico",
        }
    }
}

impl Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Source::Mindicador => "mindicador",
                Source::CentralBank => "central-bank",
                Source::Investing => "investing",
                Source::Banks => "banks",
                Source::Historical => "historical",
            }
        )
    }
}

impl FromStr for Source {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mindicador" => Ok(Source::Mindicador),
            "central-bank" | "centralbank" | "central_bank" | "sbif" => Ok(Source::CentralBank),
            "investing" | "investing.com" => Ok(Source::Investing),
            "banks" | "bancos" => Ok(Source::Banks),
            "historical" | "historico" | "histórico" => Ok(Source::Historical),
            _ => Err(QuoteError::UnknownSource(s.to_string())),
        }
    }
}

/// When a quote applies: a whole day for historical snapshots, an instant
/// for live quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteDate {
    Day(NaiveDate),
    Instant(DateTime<Utc>),
}

impl QuoteDate {
    pub fn day(&self) -> NaiveDate {
        match self {
            QuoteDate::Day(day) => *day,
            QuoteDate::Instant(ts) => ts.date_naive(),
        }
    }
}

impl Display for QuoteDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuoteDate::Day(day) => write!(f, "{}", day.format("%Y-%m-%d")),
            QuoteDate::Instant(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S UTC")),
        }
    }
}

/// Buy and sell rate quoted by a single institution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstitutionRate {
    pub institution: String,
    pub buy: f64,
    pub sell: f64,
}

/// Source specific breakdown attached to a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QuoteDetail {
    Banks(Vec<InstitutionRate>),
    /// Extremes recorded with a historical snapshot.
    Historical { min: f64, max: f64 },
}

/// Exchange rate of one source at one point in time, in CLP per 1 USD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub source: Source,
    pub buy_price: f64,
    pub sell_price: f64,
    pub date: QuoteDate,
    pub retrieved_at: DateTime<Utc>,
    pub detail: Option<QuoteDetail>,
}

impl Quote {
    pub fn institutions(&self) -> &[InstitutionRate] {
        match &self.detail {
            Some(QuoteDetail::Banks(rates)) => rates,
            _ => &[],
        }
    }
}
