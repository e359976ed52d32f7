//! Wires the rate sources to the core for one session.

use crate::core::cache::Cache;
use crate::core::config::AppConfig;
use crate::core::{
    Clock, HistoricalTable, Normalizer, Quote, RateSource, Source, Statistics, derive_statistics,
    generate_historical_table,
};
use crate::providers::{HistoricalRequest, MindicadorProvider, MockRateProvider};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use futures::future::join_all;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Result of asking one source for a quote.
#[derive(Debug)]
pub struct SourceOutcome {
    pub source: Source,
    pub result: Result<Quote>,
}

pub struct Dashboard {
    config: AppConfig,
    history: Arc<HistoricalTable>,
    clock: Arc<dyn Clock>,
    cache: Arc<Cache<String, Value>>,
}

impl Dashboard {
    pub fn new(config: AppConfig, clock: Arc<dyn Clock>) -> Self {
        let history = Arc::new(generate_historical_table(
            config.history.seed_date,
            config.history.days,
        ));
        debug!(
            seed_date = %config.history.seed_date,
            entries = history.len(),
            "Generated historical table"
        );
        let cache = Arc::new(match config.cache_ttl_secs {
            Some(secs) => Cache::with_ttl(Duration::from_secs(secs)),
            None => Cache::new(),
        });
        Dashboard {
            config,
            history,
            clock,
            cache,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn history(&self) -> &HistoricalTable {
        &self.history
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn normalizer(&self) -> Normalizer<'_> {
        Normalizer::new(&self.history, self.clock.as_ref())
    }

    /// Day a historical request uses when none is given: today, or the last
    /// day of the table when today is past it.
    pub fn default_historical_day(&self) -> NaiveDate {
        let today = self.clock.today();
        match self.history.latest() {
            Some((latest, _)) => today.min(*latest),
            None => today,
        }
    }

    /// Builds the transport for `source`. Historical requests without a
    /// date use [`Dashboard::default_historical_day`].
    pub fn rate_source(
        &self,
        source: Source,
        date: Option<NaiveDate>,
    ) -> Result<Box<dyn RateSource>> {
        let providers = &self.config.providers;
        let latency = Duration::from_millis(providers.mock_latency_ms());
        let rate_source: Box<dyn RateSource> = match source {
            Source::Mindicador => Box::new(MindicadorProvider::new(
                providers.mindicador_url(),
                Arc::clone(&self.cache),
            )),
            Source::CentralBank | Source::Investing | Source::Banks => {
                Box::new(MockRateProvider::new(source, latency)?)
            }
            Source::Historical => Box::new(HistoricalRequest::new(
                date.unwrap_or_else(|| self.default_historical_day()),
            )),
        };
        Ok(rate_source)
    }

    /// Fetches a payload from `rate_source` and normalizes it.
    pub async fn fetch_quote(&self, rate_source: &dyn RateSource) -> Result<Quote> {
        let source = rate_source.source();
        let payload = rate_source
            .fetch_payload()
            .await
            .with_context(|| format!("Failed to load data from {}", source.label()))?;
        let quote = self.normalizer().normalize_source(source, &payload)?;
        debug!(%source, buy = quote.buy_price, sell = quote.sell_price, "Normalized quote");
        Ok(quote)
    }

    pub async fn quote(&self, source: Source) -> Result<Quote> {
        let rate_source = self.rate_source(source, None)?;
        self.fetch_quote(rate_source.as_ref()).await
    }

    pub async fn historical_quote(&self, date: NaiveDate) -> Result<Quote> {
        let rate_source = self.rate_source(Source::Historical, Some(date))?;
        self.fetch_quote(rate_source.as_ref()).await
    }

    /// Asks every source at once. A failing source only affects its own
    /// outcome; `on_done` runs as each one finishes.
    pub async fn quotes(
        &self,
        sources: &[Source],
        on_done: &(dyn Fn() + Sync),
    ) -> Vec<SourceOutcome> {
        let futures = sources.iter().map(|&source| async move {
            let result = match self.rate_source(source, None) {
                Ok(rate_source) => self.fetch_quote(rate_source.as_ref()).await,
                Err(e) => Err(e),
            };
            if let Err(e) = &result {
                warn!(%source, error = %e, "Source failed");
            }
            on_done();
            SourceOutcome { source, result }
        });
        join_all(futures).await
    }

    pub async fn live_quotes(&self, on_done: &(dyn Fn() + Sync)) -> Vec<SourceOutcome> {
        self.quotes(&Source::LIVE, on_done).await
    }

    /// Statistics of `quote` against the configured baseline.
    pub fn statistics(&self, quote: &Quote) -> Statistics {
        derive_statistics(Some(quote), self.config.baseline_price)
    }
}
