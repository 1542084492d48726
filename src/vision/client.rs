//! HTTP client for a Rekognition-shaped vision service.
//!
//! The service exposes `POST {endpoint}/detect-labels` and
//! `POST {endpoint}/detect-text`, both taking `{"Image":{"Bytes":"<base64>"}}`
//! and answering with the `Labels` / `TextDetections` documents below.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use url::Url;

use super::{
    DETECT_LABELS, DETECT_TEXT, LabelDetection, TRACING_TARGET, TextDetection, TextKind,
    VisionImage, VisionService,
};
use crate::config::VisionConfig;
use crate::error::AdlensError;
use crate::geometry::Region;

/// Labels requested per image.
pub const MAX_LABELS: u32 = 20;

/// Confidence floor the service applies to labels.
pub const MIN_LABEL_CONFIDENCE: f64 = 80.0;

/// A [`VisionService`] backed by an HTTP endpoint.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone, Debug)]
pub struct HttpVisionClient {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    http: Client,
    endpoint: Url,
    timeout: Duration,
}

impl HttpVisionClient {
    /// Builds a client for `endpoint`.
    ///
    /// The endpoint is treated as a directory: `https://host/vision` and
    /// `https://host/vision/` both resolve operations under `/vision/`.
    pub fn new(
        endpoint: Url,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, AdlensError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = api_key {
            let value = HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|e| AdlensError::Config(format!("invalid vision API key: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("adlens/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| AdlensError::Config(format!("failed to build HTTP client: {e}")))?;

        let endpoint = with_trailing_slash(endpoint);
        tracing::debug!(
            target: TRACING_TARGET,
            endpoint = %endpoint,
            timeout_ms = timeout.as_millis() as u64,
            "vision client initialized"
        );

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                endpoint,
                timeout,
            }),
        })
    }

    /// Builds a client from configuration, or `None` if no endpoint is set.
    pub fn from_config(config: &VisionConfig) -> Result<Option<Self>, AdlensError> {
        config
            .endpoint
            .clone()
            .map(|endpoint| Self::new(endpoint, config.api_key.as_deref(), config.timeout()))
            .transpose()
    }

    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    fn operation_url(&self, operation: &'static str) -> Result<Url, AdlensError> {
        self.inner
            .endpoint
            .join(operation)
            .map_err(|e| AdlensError::external(operation, format!("bad endpoint URL: {e}")))
    }

    async fn post(
        &self,
        operation: &'static str,
        request: &DetectRequest<'_>,
    ) -> Result<Vec<u8>, AdlensError> {
        let url = self.operation_url(operation)?;
        tracing::debug!(target: TRACING_TARGET, %url, operation, "calling vision service");

        let response = self
            .inner
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.request_error(operation, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                target: TRACING_TARGET,
                operation,
                status = status.as_u16(),
                "vision service returned an error status"
            );
            return Err(AdlensError::external(
                operation,
                format!("HTTP {}: {}", status.as_u16(), body.trim()),
            ));
        }

        response
            .bytes()
            .await
            .map(|body| body.to_vec())
            .map_err(|e| self.request_error(operation, e))
    }

    fn request_error(&self, operation: &'static str, err: reqwest::Error) -> AdlensError {
        if err.is_timeout() {
            AdlensError::ExternalServiceTimeout {
                operation,
                timeout: self.inner.timeout,
            }
        } else {
            AdlensError::external(operation, err.to_string())
        }
    }
}

#[async_trait]
impl VisionService for HttpVisionClient {
    async fn detect_labels(&self, image: &VisionImage) -> Result<Vec<LabelDetection>, AdlensError> {
        let request = DetectRequest {
            image: ImagePayload {
                bytes: image.base64(),
            },
            max_labels: Some(MAX_LABELS),
            min_confidence: Some(MIN_LABEL_CONFIDENCE),
        };
        let body = self.post(DETECT_LABELS, &request).await?;
        parse_labels_response(&body)
    }

    async fn detect_text(&self, image: &VisionImage) -> Result<Vec<TextDetection>, AdlensError> {
        let request = DetectRequest {
            image: ImagePayload {
                bytes: image.base64(),
            },
            max_labels: None,
            min_confidence: None,
        };
        let body = self.post(DETECT_TEXT, &request).await?;
        parse_text_response(&body)
    }
}

/// Parses a `detect-labels` response body.
pub fn parse_labels_response(body: &[u8]) -> Result<Vec<LabelDetection>, AdlensError> {
    let response: LabelsResponse = serde_json::from_slice(body)
        .map_err(|e| AdlensError::external(DETECT_LABELS, format!("malformed response: {e}")))?;

    Ok(response
        .labels
        .into_iter()
        .map(|label| LabelDetection {
            name: label.name,
            confidence: label.confidence,
            instances: label
                .instances
                .into_iter()
                .map(|instance| super::LabelInstance {
                    bounding_box: instance.bounding_box.to_region(),
                    confidence: instance.confidence,
                })
                .collect(),
        })
        .collect())
}

/// Parses a `detect-text` response body.
///
/// Detection types other than `LINE` are treated as words.
pub fn parse_text_response(body: &[u8]) -> Result<Vec<TextDetection>, AdlensError> {
    let response: TextResponse = serde_json::from_slice(body)
        .map_err(|e| AdlensError::external(DETECT_TEXT, format!("malformed response: {e}")))?;

    Ok(response
        .text_detections
        .into_iter()
        .map(|detection| TextDetection {
            text: detection.detected_text,
            kind: if detection.kind == "LINE" {
                TextKind::Line
            } else {
                TextKind::Word
            },
            confidence: detection.confidence,
            bounding_box: detection.geometry.bounding_box.to_region(),
        })
        .collect())
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

// Wire types

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct DetectRequest<'a> {
    image: ImagePayload<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_labels: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_confidence: Option<f64>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ImagePayload<'a> {
    bytes: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LabelsResponse {
    #[serde(default)]
    labels: Vec<WireLabel>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireLabel {
    name: String,
    #[serde(default)]
    confidence: f64,
    #[serde(default)]
    instances: Vec<WireInstance>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireInstance {
    bounding_box: WireBox,
    #[serde(default)]
    confidence: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TextResponse {
    #[serde(default)]
    text_detections: Vec<WireText>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireText {
    detected_text: String,
    #[serde(rename = "Type")]
    kind: String,
    #[serde(default)]
    confidence: f64,
    geometry: WireGeometry,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireGeometry {
    bounding_box: WireBox,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireBox {
    #[serde(default)]
    left: f64,
    #[serde(default)]
    top: f64,
    #[serde(default)]
    width: f64,
    #[serde(default)]
    height: f64,
}

impl WireBox {
    fn to_region<S>(&self) -> Region<S> {
        Region::from_ltwh(self.left, self.top, self.width, self.height)
    }
}
