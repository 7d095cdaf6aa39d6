//! HTTP access for metadata documents and the price oracle.

use serde_json::Value;
use std::future::Future;
use std::time::Duration;

use crate::Error;

/// GET a URL and parse the body as JSON.
pub trait JsonFetcher: Send + Sync + 'static {
    fn get_json(&self, url: &str) -> impl Future<Output = Result<Value, Error>> + Send;
}

impl JsonFetcher for reqwest::Client {
    async fn get_json(&self, url: &str) -> Result<Value, Error> {
        let response = self.get(url).send().await?.error_for_status()?;
        Ok(response.json::<Value>().await?)
    }
}

/// HTTP client with the configured request timeout.
pub fn http_client(timeout_secs: u64) -> Result<reqwest::Client, Error> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| Error::Config(format!("HTTP client build failed: {e}")))
}
