use crate::dashboard::model::Widget;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const WIDGETS_PATH: &str = "/api/widgets";
pub const MAP_DATA_PATH: &str = "/api/map-data";
pub const GENDER_DISTRIBUTION_PATH: &str = "/api/gender-distribution";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("backend error: {0}")]
    Backend(String),
}

/// One stadium bubble for the map widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub stadium: String,
    pub value: f64,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub max: f64,
    #[serde(default)]
    pub intensity: String,
}

impl MapPoint {
    pub fn is_high(&self) -> bool {
        self.intensity == "high"
    }
}

/// Histogram behind the pyramid widget. Men counts come back negative.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenderDistribution {
    pub labels: Vec<String>,
    pub men: Vec<i64>,
    pub women: Vec<i64>,
    #[serde(default)]
    pub max_val: i64,
}

pub struct ApiClient {
    client: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let base = Url::parse(base_url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("viewership-dashboard")
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = self
            .base
            .join(path)
            .map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        tracing::debug!(%url, "GET");
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = resp
            .text()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        decode_body(&body)
    }

    pub fn fetch_widgets(&self) -> Result<Vec<Widget>, FetchError> {
        self.get_json(WIDGETS_PATH)
    }

    pub fn fetch_map_data(&self) -> Result<Vec<MapPoint>, FetchError> {
        self.get_json(MAP_DATA_PATH)
    }

    pub fn fetch_gender_distribution(&self) -> Result<GenderDistribution, FetchError> {
        self.get_json(GENDER_DISTRIBUTION_PATH)
    }
}

/// Decode a response body, surfacing the backend's `{"error": ..}` envelope.
pub fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, FetchError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;
    if let Some(msg) = value.get("error").and_then(Value::as_str) {
        return Err(FetchError::Backend(msg.to_string()));
    }
    serde_json::from_value(value).map_err(|e| FetchError::Decode(e.to_string()))
}

/// Run `job` on a background thread and hand back a receiver for its result.
pub fn spawn_fetch<T, F>(label: &'static str, job: F) -> Receiver<Result<T, FetchError>>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, FetchError> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let spawned = std::thread::Builder::new()
        .name(format!("fetch-{label}"))
        .spawn(move || {
            let result = job();
            if let Err(err) = &result {
                tracing::warn!(label, error = %err, "fetch failed");
            }
            let _ = tx.send(result);
        });
    if let Err(err) = spawned {
        tracing::error!(label, error = %err, "failed to spawn fetch thread");
    }
    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_envelope_is_reported() {
        let err = decode_body::<Vec<MapPoint>>(r#"{"error": "Data file not found"}"#).unwrap_err();
        assert_eq!(err, FetchError::Backend("Data file not found".into()));
    }

    #[test]
    fn wrong_shape_is_a_decode_error() {
        let err = decode_body::<Vec<Widget>>(r#"{"widgets": []}"#).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
        let err = decode_body::<Vec<Widget>>("<html>").unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn gender_distribution_uses_camel_case() {
        let dist: GenderDistribution = decode_body(
            r#"{"labels": ["0.0~0.2%"], "men": [-3], "women": [5], "maxVal": 5}"#,
        )
        .unwrap();
        assert_eq!(dist.max_val, 5);
        assert_eq!(dist.men, vec![-3]);
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            ApiClient::new("not a url", Duration::from_secs(1)),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[test]
    fn spawn_fetch_delivers_result() {
        let rx = spawn_fetch("test", || Ok::<_, FetchError>(7));
        assert_eq!(rx.recv().unwrap(), Ok(7));
    }
}
