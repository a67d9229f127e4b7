use async_trait::async_trait;
use fastrace::trace;
use tracing::{debug, info};
use userdir_config::SourceConfig;
use userdir_types::{DirectoryResponse, ProfileRecord};

use crate::{DirectorySource, FetchError};

pub struct HttpDirectorySource {
    client: reqwest::Client,
    endpoint: String,
    results: u32,
}

impl HttpDirectorySource {
    pub fn new(config: &SourceConfig) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.endpoint.clone(),
            results: config.results,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[trace]
    pub async fn fetch(&self) -> Result<Vec<ProfileRecord>, FetchError> {
        debug!("GET {} results={}", self.endpoint, self.results);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("results", self.results)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::NetworkFailure(format!("HTTP {}", status)));
        }

        let body = response.bytes().await?;
        let records = parse_records(&body)?;
        info!("Fetched {} records from {}", records.len(), self.endpoint);
        Ok(records)
    }
}

#[async_trait]
impl DirectorySource for HttpDirectorySource {
    async fn fetch_records(&self) -> Result<Vec<ProfileRecord>, FetchError> {
        self.fetch().await
    }
}

#[trace]
pub fn parse_records(body: &[u8]) -> Result<Vec<ProfileRecord>, FetchError> {
    let response: DirectoryResponse = serde_json::from_slice(body)?;
    Ok(response.results)
}
