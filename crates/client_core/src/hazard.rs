//! Road-hazard photo submission: select → preview → submit → result/error → reset.

use std::{path::Path, sync::Arc};

use shared::{error::FailureReason, protocol::HazardResponse};
use tracing::{debug, info, warn};

use crate::{
    outcome::Outcome,
    preview::{Preview, PreviewJob},
    transport::{self, BinaryPart, MultipartPayload, Transport},
};

pub const IMAGE_FIELD: &str = "image";
pub const NOT_AN_IMAGE_ERROR: &str = "Please select an image file (JPG, PNG, etc.)";
pub const HAZARD_FALLBACK_ERROR: &str = "Failed to analyze image. Please try again.";

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    file_name: String,
    content_type: String,
    bytes: Arc<[u8]>,
}

impl ImageAsset {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads a file and declares its type from the extension.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload.bin")
            .to_string();
        let content_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        Ok(Self::new(file_name, content_type, bytes))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_image(&self) -> bool {
        self.content_type
            .trim()
            .to_ascii_lowercase()
            .starts_with("image/")
    }

    fn to_part(&self) -> BinaryPart {
        BinaryPart {
            file_name: self.file_name.clone(),
            content_type: self.content_type.clone(),
            bytes: Arc::clone(&self.bytes),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HazardSubmission {
    asset: Option<ImageAsset>,
    preview: Option<Preview>,
    outcome: Outcome<String>,
    in_flight: bool,
}

impl HazardSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn asset(&self) -> Option<&ImageAsset> {
        self.asset.as_ref()
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn outcome(&self) -> &Outcome<String> {
        &self.outcome
    }

    pub fn analysis(&self) -> Option<&str> {
        self.outcome.result().map(String::as_str)
    }

    pub fn error(&self) -> Option<&str> {
        self.outcome.error()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Accepts an image asset and hands back the decode job for its preview.
    /// A non-image is rejected without touching the current selection.
    pub fn select(&mut self, asset: ImageAsset) -> Option<PreviewJob> {
        if !asset.is_image() {
            warn!(content_type = asset.content_type(), "rejected non-image hazard asset");
            self.outcome = Outcome::Failed(NOT_AN_IMAGE_ERROR.to_string());
            return None;
        }
        let job = PreviewJob::new(Arc::clone(&asset.bytes));
        debug!(file = asset.file_name(), bytes = asset.bytes.len(), "hazard asset selected");
        self.asset = Some(asset);
        self.preview = None;
        self.outcome.clear();
        Some(job)
    }

    /// Drop and browse both land here; only the first offered asset counts.
    pub fn select_first<I>(&mut self, assets: I) -> Option<PreviewJob>
    where
        I: IntoIterator<Item = ImageAsset>,
    {
        let asset = assets.into_iter().next()?;
        self.select(asset)
    }

    /// Stores a finished preview if its asset is still the selected one.
    pub fn attach_preview(&mut self, job: &PreviewJob, preview: Preview) -> bool {
        match &self.asset {
            Some(asset) if Arc::ptr_eq(&asset.bytes, job.source()) => {
                self.preview = Some(preview);
                true
            }
            _ => {
                debug!("discarding preview for an asset that is no longer selected");
                false
            }
        }
    }

    /// `select` followed by the preview decode. Returns whether the asset was accepted.
    pub async fn select_with_preview(&mut self, asset: ImageAsset) -> bool {
        let Some(job) = self.select(asset) else {
            return false;
        };
        match job.run().await {
            Ok(preview) => {
                self.attach_preview(&job, preview);
            }
            Err(err) => warn!(error = %err, "hazard preview unavailable"),
        }
        true
    }

    pub fn submit(&mut self) -> Option<MultipartPayload> {
        if self.in_flight {
            return None;
        }
        let part = self.asset.as_ref()?.to_part();
        self.outcome.clear();
        self.in_flight = true;
        Some(MultipartPayload::new(IMAGE_FIELD, part))
    }

    pub fn complete(&mut self, result: Result<HazardResponse, FailureReason>) {
        if !self.in_flight {
            warn!("hazard completion arrived with no request outstanding; ignoring");
            return;
        }
        self.in_flight = false;
        self.outcome = Outcome::settle(result.map(|response| response.analysis), HAZARD_FALLBACK_ERROR);
        info!(succeeded = self.outcome.result().is_some(), "hazard analysis settled");
    }

    pub async fn submit_with(&mut self, transport: &dyn Transport) -> bool {
        let Some(upload) = self.submit() else {
            return false;
        };
        let result = transport::analyze_hazard(transport, upload).await;
        self.complete(result);
        true
    }

    pub fn reset(&mut self) {
        self.asset = None;
        self.preview = None;
        self.outcome.clear();
    }

    pub fn dismiss_error(&mut self) {
        self.outcome.dismiss_error();
    }
}

#[cfg(test)]
#[path = "tests/hazard_tests.rs"]
mod tests;
