use anyhow::{anyhow, Context, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT},
    Client,
};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use shared_config::AppConfig;

/// Read-only JSON client for the static doctor endpoint.
///
/// The endpoint is unauthenticated and serves a single document, so the
/// client only knows how to GET that document and decode it.
pub struct DataSourceClient {
    client: Client,
    source_url: String,
}

impl DataSourceClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            source_url: config.doctors_api_url.clone(),
        }
    }

    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    pub async fn fetch<T>(&self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        debug!("Making request to {}", self.source_url);

        let response = self
            .client
            .get(&self.source_url)
            .headers(self.get_headers())
            .send()
            .await
            .with_context(|| format!("request to {} failed", self.source_url))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Data source error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                404 => anyhow!("Data source not found: {}", self.source_url),
                _ => anyhow!("Network response was not ok ({})", status),
            });
        }

        let data = response
            .json::<T>()
            .await
            .context("data source returned malformed JSON")?;
        Ok(data)
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> AppConfig {
        AppConfig {
            doctors_api_url: format!("{}/doctors.json", server.uri()),
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_decodes_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/doctors.json"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "name": "Dr. A" }])))
            .mount(&server)
            .await;

        let client = DataSourceClient::new(&config_for(&server));
        let body: Value = client.fetch().await.unwrap();

        assert_eq!(body[0]["name"], "Dr. A");
    }

    #[tokio::test]
    async fn test_fetch_surfaces_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = DataSourceClient::new(&config_for(&server));
        let err = client.fetch::<Value>().await.unwrap_err();

        assert!(err.to_string().contains("Network response was not ok"));
    }

    #[tokio::test]
    async fn test_fetch_rejects_malformed_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = DataSourceClient::new(&config_for(&server));
        assert!(client.fetch::<Value>().await.is_err());
    }
}
