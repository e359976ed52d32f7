//! Synthetic daily history of the USD/CLP rate.
//!
//! The table is generated from a seed date with a fixed arithmetic rule, so
//! the same `(seed, days)` pair always yields the same values.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const BASE_PRICE: f64 = 850.50;
const SELL_MARKUP: f64 = 5.30;
const BAND: f64 = 3.0;

pub const DEFAULT_DAYS: u32 = 30;

/// Last day of the synthetic table unless configured otherwise.
pub fn default_seed_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 12).unwrap_or_default()
}

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rates recorded for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalEntry {
    pub buy: f64,
    pub sell: f64,
    pub min: f64,
    pub max: f64,
}

impl HistoricalEntry {
    fn for_offset(offset: u32) -> Self {
        let i = f64::from(offset);
        let variation = (i * 0.5 - 7.5) + f64::from(offset % 3) * 2.0;
        let buy = round2(BASE_PRICE + variation);
        HistoricalEntry {
            buy,
            sell: round2(buy + SELL_MARKUP),
            min: round2(buy - BAND),
            max: round2(buy + BAND),
        }
    }
}

/// Read-only table of daily entries, one per calendar day.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistoricalTable {
    entries: BTreeMap<NaiveDate, HistoricalEntry>,
}

impl HistoricalTable {
    pub fn get(&self, date: &NaiveDate) -> Option<&HistoricalEntry> {
        self.entries.get(date)
    }

    /// Looks up an ISO `YYYY-MM-DD` date.
    pub fn get_iso(&self, date: &str) -> Option<&HistoricalEntry> {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .ok()
            .and_then(|d| self.entries.get(&d))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered from the oldest day to the seed day.
    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &HistoricalEntry)> {
        self.entries.iter()
    }

    pub fn earliest(&self) -> Option<(&NaiveDate, &HistoricalEntry)> {
        self.entries.first_key_value()
    }

    pub fn latest(&self) -> Option<(&NaiveDate, &HistoricalEntry)> {
        self.entries.last_key_value()
    }
}

/// Builds `days` consecutive daily entries ending at `seed_date`.
///
/// Offset `i` maps to `seed_date - i days`. Days that would fall before the
/// earliest representable date are skipped.
pub fn generate_historical_table(seed_date: NaiveDate, days: u32) -> HistoricalTable {
    let entries = (0..days)
        .filter_map(|offset| {
            seed_date
                .checked_sub_days(Days::new(u64::from(offset)))
                .map(|date| (date, HistoricalEntry::for_offset(offset)))
        })
        .collect();
    HistoricalTable { entries }
}
