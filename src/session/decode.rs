//! Turning a user-selected file into a [`ScanImage`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::GenericImageView;

use crate::classifier::{ImagePayload, PayloadError};
use crate::scan::{PreviewImage, ScanImage};

/// Longest preview edge in pixels; larger images are downscaled for display.
pub const PREVIEW_MAX_EDGE: u32 = 1024;

/// File extensions offered by the image picker.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "webp", "bmp", "gif"];

/// Where a selected image comes from.
#[derive(Clone, Debug)]
pub enum ImageSource {
    Path(PathBuf),
    /// In-memory bytes, e.g. a drag-and-drop without a backing file.
    Bytes { name: String, bytes: Arc<[u8]> },
}

impl ImageSource {
    /// Short label for logs and the status bar.
    pub fn display_name(&self) -> String {
        match self {
            Self::Path(path) => file_label(path),
            Self::Bytes { name, .. } => name.clone(),
        }
    }
}

/// A selected file could not be turned into an image.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Unrecognized image format")]
    UnknownFormat,
    #[error("Failed to decode image: {0}")]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error("Decode worker panicked: {0}")]
    WorkerPanicked(String),
}

/// Read and decode the source. Runs on a worker thread.
pub fn decode_source(source: &ImageSource) -> Result<ScanImage, DecodeError> {
    match source {
        ImageSource::Path(path) => {
            let bytes = std::fs::read(path).map_err(|source| DecodeError::Read {
                path: path.clone(),
                source,
            })?;
            decode_image_bytes(file_label(path), &bytes)
        }
        ImageSource::Bytes { name, bytes } => decode_image_bytes(name.clone(), bytes),
    }
}

/// Sniff the format, decode a preview and keep the original bytes as the payload.
pub fn decode_image_bytes(name: impl Into<String>, bytes: &[u8]) -> Result<ScanImage, DecodeError> {
    let format = image::guess_format(bytes).map_err(|_| DecodeError::UnknownFormat)?;
    let decoded = image::load_from_memory_with_format(bytes, format)?;
    let (width, height) = decoded.dimensions();
    let rgba = if width > PREVIEW_MAX_EDGE || height > PREVIEW_MAX_EDGE {
        decoded.thumbnail(PREVIEW_MAX_EDGE, PREVIEW_MAX_EDGE).to_rgba8()
    } else {
        decoded.to_rgba8()
    };
    let preview = PreviewImage {
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    };
    let payload = ImagePayload::from_bytes(bytes, format.to_mime_type())?;
    Ok(ScanImage::new(name, payload, preview))
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
