//! Consumption of external vision-service detections.
//!
//! The service itself (label and text detection) is a black box behind
//! [`VisionService`]. This module owns what happens to its output: rules for
//! bucketing labels and OCR lines ([`rules`]), the categorizer that applies
//! them ([`categorize`]), and composition metrics ([`composition`]).

pub mod categorize;
pub mod client;
pub mod composition;
pub mod rules;

use std::future::Future;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::AdlensError;
use crate::geometry::{Normalized, Region};

pub use categorize::{categorize_labels, categorize_text};
pub use client::HttpVisionClient;
pub use composition::{balance_score, composition_metrics, text_coverage, visual_coverage};

/// Tracing target for vision-service calls.
pub const TRACING_TARGET: &str = "adlens::vision";

/// Operation names used in errors and logs.
pub const DETECT_LABELS: &str = "detect-labels";
pub const DETECT_TEXT: &str = "detect-text";

/// A label detection: an object or concept recognized in the image.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelDetection {
    pub name: String,
    /// Confidence, 0-100.
    pub confidence: f64,
    /// Located occurrences; may be empty for scene-level labels.
    pub instances: Vec<LabelInstance>,
}

impl LabelDetection {
    pub fn new(name: impl Into<String>, confidence: f64) -> Self {
        Self {
            name: name.into(),
            confidence,
            instances: Vec::new(),
        }
    }

    pub fn with_instance(mut self, bounding_box: Region<Normalized>, confidence: f64) -> Self {
        self.instances.push(LabelInstance {
            bounding_box,
            confidence,
        });
        self
    }

    /// Box of the first instance, which stands for the label's placement.
    pub fn primary_box(&self) -> Option<&Region<Normalized>> {
        self.instances.first().map(|i| &i.bounding_box)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LabelInstance {
    pub bounding_box: Region<Normalized>,
    pub confidence: f64,
}

/// Granularity of an OCR detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextKind {
    Line,
    Word,
}

/// An OCR detection.
#[derive(Clone, Debug, PartialEq)]
pub struct TextDetection {
    pub text: String,
    pub kind: TextKind,
    /// Confidence, 0-100.
    pub confidence: f64,
    pub bounding_box: Region<Normalized>,
}

impl TextDetection {
    pub fn line(text: impl Into<String>, confidence: f64, bounding_box: Region<Normalized>) -> Self {
        Self {
            text: text.into(),
            kind: TextKind::Line,
            confidence,
            bounding_box,
        }
    }

    pub fn word(text: impl Into<String>, confidence: f64, bounding_box: Region<Normalized>) -> Self {
        Self {
            kind: TextKind::Word,
            ..Self::line(text, confidence, bounding_box)
        }
    }
}

/// Encoded image bytes sent to a vision service.
///
/// Both detection calls for a file share one `VisionImage`, so the base64
/// body is built once.
#[derive(Debug)]
pub struct VisionImage {
    bytes: Arc<Vec<u8>>,
    base64: OnceLock<String>,
}

impl VisionImage {
    pub fn new(bytes: Arc<Vec<u8>>) -> Self {
        Self {
            bytes,
            base64: OnceLock::new(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Standard base64 of the bytes, encoded on first use.
    pub fn base64(&self) -> &str {
        self.base64.get_or_init(|| STANDARD.encode(self.bytes.as_slice()))
    }
}

impl From<Vec<u8>> for VisionImage {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(Arc::new(bytes))
    }
}

/// The external label/text detection service.
///
/// Implementations return boxes normalized to the image (0-1). One
/// configured instance is shared by every request.
#[async_trait]
pub trait VisionService: Send + Sync {
    /// Detects labels (objects, scenes, concepts) in an image.
    async fn detect_labels(&self, image: &VisionImage) -> Result<Vec<LabelDetection>, AdlensError>;

    /// Detects text lines and words in an image.
    async fn detect_text(&self, image: &VisionImage) -> Result<Vec<TextDetection>, AdlensError>;
}

/// A vision service that never detects anything.
///
/// Used when no endpoint is configured; raster files then carry color and
/// image specs only.
#[derive(Clone, Copy, Debug, Default)]
pub struct OfflineVision;

#[async_trait]
impl VisionService for OfflineVision {
    async fn detect_labels(&self, _image: &VisionImage) -> Result<Vec<LabelDetection>, AdlensError> {
        Ok(Vec::new())
    }

    async fn detect_text(&self, _image: &VisionImage) -> Result<Vec<TextDetection>, AdlensError> {
        Ok(Vec::new())
    }
}

/// Bounds a vision call, mapping expiry to
/// [`AdlensError::ExternalServiceTimeout`].
pub async fn with_timeout<T, F>(
    operation: &'static str,
    timeout: Duration,
    call: F,
) -> Result<T, AdlensError>
where
    F: Future<Output = Result<T, AdlensError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                target: TRACING_TARGET,
                operation,
                timeout_ms = timeout.as_millis() as u64,
                "vision call timed out"
            );
            Err(AdlensError::ExternalServiceTimeout { operation, timeout })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_with_timeout_maps_elapsed() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, AdlensError>(())
        };
        let err = with_timeout(DETECT_TEXT, Duration::from_secs(10), slow)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AdlensError::ExternalServiceTimeout { operation: DETECT_TEXT, .. }
        ));
    }

    #[tokio::test]
    async fn test_offline_vision_detects_nothing() {
        let vision = OfflineVision;
        let image = VisionImage::from(b"img".to_vec());
        assert!(vision.detect_labels(&image).await.unwrap().is_empty());
        assert!(vision.detect_text(&image).await.unwrap().is_empty());
    }

    #[test]
    fn test_vision_image_encodes_once() {
        let image = VisionImage::from(b"hello".to_vec());
        let first = image.base64();
        assert_eq!(first, "aGVsbG8=");
        assert!(std::ptr::eq(first, image.base64()));
        assert_eq!(image.bytes(), b"hello");
    }

    #[test]
    fn test_primary_box_is_first_instance() {
        let label = LabelDetection::new("Person", 99.0)
            .with_instance(Region::from_ltwh(0.1, 0.1, 0.2, 0.2), 98.0)
            .with_instance(Region::from_ltwh(0.5, 0.5, 0.2, 0.2), 90.0);
        assert_eq!(label.primary_box().unwrap().left, 0.1);
        assert!(LabelDetection::new("Sky", 90.0).primary_box().is_none());
    }
}
