use std::sync::Arc;

use image::GenericImageView;
use thiserror::Error;

const PREVIEW_MAX_DIMENSION: u32 = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("failed to decode image preview: {0}")]
    Decode(#[from] image::ImageError),
    #[error("preview worker stopped: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Pending decode for one selected asset. Holds the asset's own buffer so a
/// finished preview can be matched back to the selection it was made for.
#[derive(Debug, Clone)]
pub struct PreviewJob {
    bytes: Arc<[u8]>,
}

impl PreviewJob {
    pub(crate) fn new(bytes: Arc<[u8]>) -> Self {
        Self { bytes }
    }

    pub(crate) fn source(&self) -> &Arc<[u8]> {
        &self.bytes
    }

    /// Decodes off the async executor.
    pub async fn run(&self) -> Result<Preview, PreviewError> {
        let bytes = Arc::clone(&self.bytes);
        tokio::task::spawn_blocking(move || decode_preview(&bytes)).await?
    }
}

pub fn decode_preview(bytes: &[u8]) -> Result<Preview, PreviewError> {
    let dynamic = image::load_from_memory(bytes)?;
    let (width, height) = dynamic.dimensions();
    let dynamic = if width > PREVIEW_MAX_DIMENSION || height > PREVIEW_MAX_DIMENSION {
        dynamic.thumbnail(PREVIEW_MAX_DIMENSION, PREVIEW_MAX_DIMENSION)
    } else {
        dynamic
    };
    let rgba = dynamic.to_rgba8();
    Ok(Preview {
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    })
}
