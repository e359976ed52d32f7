use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{Value, json};

use crate::core::quote::Source;
use crate::core::transport::RateSource;

/// Asks for the historical snapshot of one day. The table lives in memory,
/// so there is nothing to fetch beyond the request itself.
pub struct HistoricalRequest {
    date: NaiveDate,
}

impl HistoricalRequest {
    pub fn new(date: NaiveDate) -> Self {
        HistoricalRequest { date }
    }
}

#[async_trait]
impl RateSource for HistoricalRequest {
    fn source(&self) -> Source {
        Source::Historical
    }

    async fn fetch_payload(&self) -> Result<Value> {
        Ok(json!({ "fecha": self.date.format("%Y-%m-%d").to_string() }))
    }
}
