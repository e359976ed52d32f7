//! Display metrics derived from a buy/sell pair.

use crate::core::history::{HistoricalEntry, round2};
use crate::core::quote::{Quote, QuoteDetail};
use serde::Serialize;

/// Anything carrying a buy/sell pair, optionally with recorded extremes.
pub trait RateSnapshot {
    fn buy(&self) -> f64;
    fn sell(&self) -> f64;

    /// Pre-recorded `(min, max)`, which win over the computed ones.
    fn extremes(&self) -> Option<(f64, f64)> {
        None
    }
}

impl RateSnapshot for Quote {
    fn buy(&self) -> f64 {
        self.buy_price
    }

    fn sell(&self) -> f64 {
        self.sell_price
    }

    fn extremes(&self) -> Option<(f64, f64)> {
        match self.detail {
            Some(QuoteDetail::Historical { min, max }) => Some((min, max)),
            _ => None,
        }
    }
}

impl RateSnapshot for HistoricalEntry {
    fn buy(&self) -> f64 {
        self.buy
    }

    fn sell(&self) -> f64 {
        self.sell
    }

    fn extremes(&self) -> Option<(f64, f64)> {
        Some((self.min, self.max))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Statistics {
    pub max: f64,
    pub min: f64,
    pub average: f64,
    /// Sell minus buy. Negative when a source quotes sell below buy.
    pub spread: f64,
    pub buy_change_pct: Option<f64>,
    pub sell_change_pct: Option<f64>,
}

fn change_pct(price: f64, baseline: f64) -> f64 {
    round2((price - baseline) / baseline * 100.0)
}

/// Derives max/min/average/spread and, given a baseline, the percent change
/// of each side against it.
///
/// Never fails: a missing snapshot or non-finite prices give a zeroed
/// record, and an unusable baseline (zero or non-finite) is ignored.
pub fn derive_statistics<S: RateSnapshot + ?Sized>(
    snapshot: Option<&S>,
    baseline_price: Option<f64>,
) -> Statistics {
    let Some(snapshot) = snapshot else {
        return Statistics::default();
    };
    let (buy, sell) = (snapshot.buy(), snapshot.sell());
    if !buy.is_finite() || !sell.is_finite() {
        return Statistics::default();
    }

    let (min, max) = match snapshot.extremes() {
        Some((min, max)) if min.is_finite() && max.is_finite() => (min, max),
        _ => (buy.min(sell), buy.max(sell)),
    };

    let baseline = baseline_price.filter(|b| b.is_finite() && *b != 0.0);

    Statistics {
        max,
        min,
        average: (buy + sell) / 2.0,
        spread: sell - buy,
        buy_change_pct: baseline.map(|b| change_pct(buy, b)),
        sell_change_pct: baseline.map(|b| change_pct(sell, b)),
    }
}
