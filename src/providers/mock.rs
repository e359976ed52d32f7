//! Stand-ins for the sources that have no public API yet.
//!
//! They answer with canned payloads after a configurable delay, so callers
//! see the same latency profile as a real request.

use anyhow::{Result, bail};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

use crate::core::normalizer::{CENTRAL_BANK_RATES, INVESTING_RATES};
use crate::core::quote::Source;
use crate::core::transport::RateSource;

pub struct MockRateProvider {
    source: Source,
    latency: Duration,
}

impl MockRateProvider {
    pub fn new(source: Source, latency: Duration) -> Result<Self> {
        match source {
            Source::CentralBank | Source::Investing | Source::Banks => {
                Ok(MockRateProvider { source, latency })
            }
            other => bail!("No mock payload available for {}", other.label()),
        }
    }

    fn payload(&self) -> Value {
        match self.source {
            Source::CentralBank => fixed_pair(CENTRAL_BANK_RATES),
            Source::Investing => fixed_pair(INVESTING_RATES),
            _ => json!({
                "Banco de Chile": {"buy": 844.00, "sell": 854.00},
                "Santander": {"buy": 843.50, "sell": 854.50},
                "BCI": {"buy": 844.10, "sell": 853.90}
            }),
        }
    }
}

fn fixed_pair((buy, sell): (f64, f64)) -> Value {
    json!({ "buy": buy, "sell": sell })
}

#[async_trait]
impl RateSource for MockRateProvider {
    fn source(&self) -> Source {
        self.source
    }

    async fn fetch_payload(&self) -> Result<Value> {
        debug!(
            source = %self.source,
            latency_ms = self.latency.as_millis() as u64,
            "Simulating request"
        );
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(self.payload())
    }
}
