//! mempool.space statistics source.

use crate::config::SourceConfig;
use crate::error::{SourceError, SourceResult};
use crate::http::{HttpClient, HttpResponse, ReqwestClient};
use crate::record::StatRecord;
use crate::source::StatsSource;
use serde_json::Value;
use tracing::{debug, info};

/// Fetches the Lightning Network statistics series from mempool.space.
///
/// The API returns records in descending order by `added`, with `added`
/// in seconds. Neither property is relied upon downstream.
pub struct MempoolSource<C: HttpClient> {
    config: SourceConfig,
    client: C,
}

impl MempoolSource<ReqwestClient> {
    /// Creates a source backed by a `reqwest` client using the configured timeout.
    pub fn from_config(config: SourceConfig) -> SourceResult<Self> {
        let client = ReqwestClient::new(config.timeout)?;
        Ok(Self::new(config, client))
    }
}

impl<C: HttpClient> MempoolSource<C> {
    /// Creates a source with an explicit HTTP client.
    pub fn new(config: SourceConfig, client: C) -> Self {
        Self { config, client }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Ensures the request was processed and answered with `200 OK`.
    fn validate_response(response: &HttpResponse) -> SourceResult<()> {
        match response.status {
            200 => Ok(()),
            status @ (429 | 500..=599) => Err(SourceError::transport_retryable(format!(
                "unexpected HTTP status code: expected 200, received {status}"
            ))),
            status => Err(SourceError::transport_fatal(format!(
                "unexpected HTTP status code: expected 200, received {status}"
            ))),
        }
    }

    /// Decodes the body into records, checking shape before content.
    fn decode_records(body: &[u8]) -> SourceResult<Vec<StatRecord>> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| SourceError::InvalidShape(format!("body is not valid JSON: {e}")))?;

        let items = match value {
            Value::Array(items) => items,
            other => {
                return Err(SourceError::InvalidShape(format!(
                    "expected an array of stat records, received {}",
                    json_type_name(&other)
                )))
            }
        };

        if items.is_empty() {
            return Err(SourceError::EmptyResult);
        }

        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value(item).map_err(|e| {
                    SourceError::InvalidShape(format!("record {index} is malformed: {e}"))
                })
            })
            .collect()
    }
}

impl<C: HttpClient> StatsSource for MempoolSource<C> {
    fn fetch_lightning_stats(&self) -> SourceResult<Vec<StatRecord>> {
        let url = self.config.stats_url();
        debug!(%url, "requesting lightning network statistics");

        let response = self.client.get(&url)?;
        debug!(status = response.status, bytes = response.body.len(), "response received");

        Self::validate_response(&response)?;
        let records = Self::decode_records(&response.body)?;

        info!(count = records.len(), "fetched stat records");
        Ok(records)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
