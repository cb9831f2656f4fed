//! Client for the deepfake prediction backend.
//!
//! The backend exposes a single `POST /predict` endpoint taking a multipart
//! form with one `file` field, and answers with JSON in one of two shapes:
//! a per-face verdict list, or a "no face detected" notice. Both carry a
//! server-resolved `imagePath` pointing at a rendered preview of the
//! analyzed upload.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Verdict for a single detected face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceVerdict {
    pub is_deepfake: bool,
    /// Model confidence in [0, 1].
    pub confidence: f32,
}

/// Decoded `/predict` response, disambiguated by payload shape: a body with
/// a `faces` array is a per-face analysis, a body with a `message` field is
/// the no-face outcome.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    #[serde(rename_all = "camelCase")]
    Faces {
        faces: Vec<FaceVerdict>,
        image_path: String,
    },
    #[serde(rename_all = "camelCase")]
    NoFace { message: String, image_path: String },
}

impl AnalysisResult {
    /// Server-side path of the rendered preview image.
    pub fn image_path(&self) -> &str {
        match self {
            AnalysisResult::Faces { image_path, .. } => image_path,
            AnalysisResult::NoFace { image_path, .. } => image_path,
        }
    }

    /// True when at least one face was flagged as a deepfake.
    pub fn has_deepfake(&self) -> bool {
        match self {
            AnalysisResult::Faces { faces, .. } => faces.iter().any(|f| f.is_deepfake),
            AnalysisResult::NoFace { .. } => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {0}")]
    Status(reqwest::StatusCode),

    #[error("response was not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Blocking HTTP client bound to one backend base URL.
///
/// No timeout is configured: the upload is a single outstanding request and
/// the caller owns the decision to wait it out.
pub struct PredictClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl PredictClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: reqwest::blocking::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upload one file under the `file` multipart field and decode the
    /// verdict from the JSON body.
    pub fn predict(
        &self,
        file_name: &str,
        media_type: &str,
        bytes: Vec<u8>,
    ) -> Result<AnalysisResult, PredictError> {
        let url = format!("{}/predict", self.base_url);
        debug!(url = %url, file = %file_name, size = bytes.len(), "submitting file for analysis");

        let part = reqwest::blocking::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(media_type)?;
        let form = reqwest::blocking::multipart::Form::new().part("file", part);

        let response = self.http.post(&url).multipart(form).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(PredictError::Status(status));
        }

        let body = response.text()?;
        serde_json::from_str(&body).map_err(PredictError::Decode)
    }

    /// Fetch the raw bytes of the preview image referenced by a result.
    pub fn fetch_preview(&self, image_path: &str) -> Result<Vec<u8>, PredictError> {
        let url = self.preview_url(image_path);
        debug!(url = %url, "fetching analysis preview");
        let response = self.http.get(&url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(PredictError::Status(status));
        }
        Ok(response.bytes()?.to_vec())
    }

    /// Absolute, cache-busted URL for a server-side preview path.
    pub fn preview_url(&self, image_path: &str) -> String {
        cache_busted_url(&self.base_url, image_path, epoch_millis())
    }
}

/// Join a backend base URL with a server-side image path and append a
/// `?t=<millis>` query parameter. The parameter carries no server-side
/// meaning; a changing value forces re-fetch of a same-named file.
pub fn cache_busted_url(base_url: &str, image_path: &str, t_millis: u128) -> String {
    let base = base_url.trim_end_matches('/');
    if image_path.starts_with('/') {
        format!("{base}{image_path}?t={t_millis}")
    } else {
        format!("{base}/{image_path}?t={t_millis}")
    }
}

fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_face_payload() {
        let body = r#"{
            "faces": [
                { "isDeepfake": true, "confidence": 0.93 },
                { "isDeepfake": false, "confidence": 0.81 }
            ],
            "imagePath": "/static/results/out.jpg"
        }"#;
        let result: AnalysisResult = serde_json::from_str(body).unwrap();
        match &result {
            AnalysisResult::Faces { faces, image_path } => {
                assert_eq!(faces.len(), 2);
                assert!(faces[0].is_deepfake);
                assert!(!faces[1].is_deepfake);
                assert_eq!(image_path, "/static/results/out.jpg");
            }
            other => panic!("expected face payload, got {other:?}"),
        }
        assert!(result.has_deepfake());
    }

    #[test]
    fn decodes_no_face_payload() {
        let body = r#"{ "message": "No face detected", "imagePath": "/x.jpg" }"#;
        let result: AnalysisResult = serde_json::from_str(body).unwrap();
        match &result {
            AnalysisResult::NoFace { message, image_path } => {
                assert_eq!(message, "No face detected");
                assert_eq!(image_path, "/x.jpg");
            }
            other => panic!("expected no-face payload, got {other:?}"),
        }
        assert!(!result.has_deepfake());
        assert_eq!(result.image_path(), "/x.jpg");
    }

    #[test]
    fn rejects_unknown_payload_shape() {
        assert!(serde_json::from_str::<AnalysisResult>(r#"{ "foo": 1 }"#).is_err());
        assert!(serde_json::from_str::<AnalysisResult>("not json").is_err());
    }

    #[test]
    fn all_authentic_is_not_deepfake() {
        let result = AnalysisResult::Faces {
            faces: vec![FaceVerdict {
                is_deepfake: false,
                confidence: 0.99,
            }],
            image_path: "/x.jpg".into(),
        };
        assert!(!result.has_deepfake());
    }

    #[test]
    fn cache_busted_url_shape() {
        assert_eq!(
            cache_busted_url("http://127.0.0.1:5000", "/x.jpg", 1234),
            "http://127.0.0.1:5000/x.jpg?t=1234"
        );
        // Trailing slash on the base and missing slash on the path both
        // normalize to a single separator.
        assert_eq!(
            cache_busted_url("http://h/", "x.jpg", 1),
            "http://h/x.jpg?t=1"
        );
    }

    #[test]
    fn preview_url_changes_between_calls() {
        let a = cache_busted_url("http://h", "/x.jpg", 1);
        let b = cache_busted_url("http://h", "/x.jpg", 2);
        assert_ne!(a, b);
        assert!(a.starts_with("http://h/x.jpg?t="));
    }
}
