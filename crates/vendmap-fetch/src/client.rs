//! Reads JSON datasets from files or HTTP endpoints.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use vendmap_core::DataSource;

use crate::error::FetchError;

/// JSON loader for [`DataSource`]s.
///
/// HTTP requests get the configured timeout and `User-Agent`. There is no
/// retry: a failed request is reported once and the caller degrades.
pub struct DataClient {
    client: Client,
}

impl DataClient {
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Read and parse one JSON document.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Io`] when a file source cannot be read.
    /// - [`FetchError::NotFound`] on HTTP 404.
    /// - [`FetchError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`FetchError::Http`] on network or TLS failure.
    /// - [`FetchError::Deserialize`] when the body is not valid JSON.
    pub async fn fetch_json(&self, source: &DataSource) -> Result<Value, FetchError> {
        let body = match source {
            DataSource::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| FetchError::Io {
                        path: path.display().to_string(),
                        source: e,
                    })?
            }
            DataSource::Url(url) => self.fetch_text(url).await?,
        };

        serde_json::from_str(&body).map_err(|e| FetchError::Deserialize {
            context: source.to_string(),
            source: e,
        })
    }

    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                url: url.to_owned(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response.text().await?)
    }

    /// Fetch raw location records.
    ///
    /// Accepts a bare JSON array or an object wrapping it under `locations`
    /// or `data`. Individual records are returned untouched; validation is
    /// the store's job.
    ///
    /// # Errors
    ///
    /// Everything [`Self::fetch_json`] returns, plus
    /// [`FetchError::UnexpectedShape`] when no record array is found.
    pub async fn fetch_locations(&self, source: &DataSource) -> Result<Vec<Value>, FetchError> {
        let doc = self.fetch_json(source).await?;
        match doc {
            Value::Array(records) => Ok(records),
            Value::Object(mut obj) => match obj
                .remove("locations")
                .or_else(|| obj.remove("data"))
            {
                Some(Value::Array(records)) => Ok(records),
                _ => Err(FetchError::UnexpectedShape {
                    source_name: source.to_string(),
                    expected: "an array of location records",
                }),
            },
            _ => Err(FetchError::UnexpectedShape {
                source_name: source.to_string(),
                expected: "an array of location records",
            }),
        }
    }

    /// Fetch the boundary GeoJSON document.
    ///
    /// # Errors
    ///
    /// Everything [`Self::fetch_json`] returns, plus
    /// [`FetchError::UnexpectedShape`] when the document is not a JSON object.
    pub async fn fetch_boundaries(&self, source: &DataSource) -> Result<Value, FetchError> {
        let doc = self.fetch_json(source).await?;
        if doc.is_object() {
            Ok(doc)
        } else {
            Err(FetchError::UnexpectedShape {
                source_name: source.to_string(),
                expected: "a GeoJSON object",
            })
        }
    }
}
