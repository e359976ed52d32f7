//! Transport abstraction for raw rate payloads

use crate::core::quote::Source;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Supplies the raw payload of one source. Implementations only move
/// bytes; checking the shape is left to the normalizer.
#[async_trait]
pub trait RateSource: Send + Sync {
    fn source(&self) -> Source;

    async fn fetch_payload(&self) -> Result<Value>;
}
