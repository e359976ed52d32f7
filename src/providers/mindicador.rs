use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::core::cache::Cache;
use crate::core::quote::Source;
use crate::core::transport::RateSource;

/// Fetches the daily indicators published by mindicador.cl.
pub struct MindicadorProvider {
    base_url: String,
    cache: Arc<Cache<String, Value>>,
}

impl MindicadorProvider {
    pub fn new(base_url: &str, cache: Arc<Cache<String, Value>>) -> Self {
        MindicadorProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            cache,
        }
    }
}

#[async_trait]
impl RateSource for MindicadorProvider {
    fn source(&self) -> Source {
        Source::Mindicador
    }

    #[instrument(name = "MindicadorFetch", skip(self), fields(base_url = %self.base_url))]
    async fn fetch_payload(&self) -> Result<Value> {
        let url = format!("{}/api", self.base_url);
        if let Some(cached) = self.cache.get(&url).await {
            return Ok(cached);
        }

        debug!("Requesting indicators from {}", url);
        let client = reqwest::Client::builder()
            .user_agent(concat!("dolarmon/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for URL: {}", e, url))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {} from {}", response.status(), url));
        }

        let text = response.text().await?;
        let data: Value = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response from {}: {}", url, e))?;
        debug!("Received Mindicador response");

        self.cache.put(url, data.clone()).await;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const API_RESPONSE: &str = r#"{
        "version": "1.7.0",
        "autor": "mindicador.cl",
        "fecha": "2026-02-12T20:00:00.000Z",
        "uf": {
            "codigo": "uf",
            "nombre": "Unidad de fomento (UF)",
            "unidad_medida": "Pesos",
            "fecha": "2026-02-12T03:00:00.000Z",
            "valor": 39012.34
        },
        "dolar": {
            "codigo": "dolar",
            "nombre": "Dólar observado",
            "unidad_medida": "Pesos",
            "fecha": "2026-02-12T03:00:00.000Z",
            "valor": 851.27
        }
    }"#;

    async fn create_mock_server(status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;
        mock_server
    }

    #[tokio::test]
    async fn test_successful_fetch() {
        let mock_server = create_mock_server(200, API_RESPONSE).await;
        let provider = MindicadorProvider::new(&mock_server.uri(), Arc::new(Cache::new()));

        let payload = provider.fetch_payload().await.unwrap();
        assert_eq!(provider.source(), Source::Mindicador);
        assert_eq!(payload["dolar"]["valor"], 851.27);
        assert_eq!(payload["dolar"]["fecha"], "2026-02-12T03:00:00.000Z");
    }

    #[tokio::test]
    async fn test_second_fetch_uses_cache() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api"))
            .respond_with(ResponseTemplate::new(200).set_body_string(API_RESPONSE))
            .expect(1)
            .mount(&mock_server)
            .await;

        let cache = Arc::new(Cache::new());
        let provider = MindicadorProvider::new(&mock_server.uri(), Arc::clone(&cache));
        let first = provider.fetch_payload().await.unwrap();
        let second = provider.fetch_payload().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_api_error_response() {
        let mock_server = create_mock_server(500, "").await;
        let provider = MindicadorProvider::new(&mock_server.uri(), Arc::new(Cache::new()));

        let result = provider.fetch_payload().await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            format!(
                "HTTP error: 500 Internal Server Error from {}/api",
                mock_server.uri()
            )
        );
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let mock_server = create_mock_server(200, "<html>maintenance</html>").await;
        let provider = MindicadorProvider::new(&mock_server.uri(), Arc::new(Cache::new()));

        let result = provider.fetch_payload().await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse JSON response")
        );
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base_url() {
        let mock_server = create_mock_server(200, API_RESPONSE).await;
        let base_url = format!("{}/", mock_server.uri());
        let provider = MindicadorProvider::new(&base_url, Arc::new(Cache::new()));
        assert!(provider.fetch_payload().await.is_ok());
    }
}
