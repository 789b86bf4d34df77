use std::sync::Arc;

use uuid::Uuid;

use crate::classifier::ImagePayload;

/// Downscaled RGBA pixels used for on-screen previews.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewImage {
    pub width: u32,
    pub height: u32,
    /// Row-major, unmultiplied RGBA bytes.
    pub rgba: Vec<u8>,
}

impl PreviewImage {
    /// Width divided by height, or 1.0 for a degenerate image.
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }
}

/// An image the user selected, kept both encoded (for the classifier) and
/// decoded (for display).
///
/// Clones share the underlying buffers.
#[derive(Clone, Debug)]
pub struct ScanImage {
    key: Uuid,
    name: String,
    payload: Arc<ImagePayload>,
    preview: Arc<PreviewImage>,
}

impl ScanImage {
    pub fn new(name: impl Into<String>, payload: ImagePayload, preview: PreviewImage) -> Self {
        Self {
            key: Uuid::new_v4(),
            name: name.into(),
            payload: Arc::new(payload),
            preview: Arc::new(preview),
        }
    }

    /// Stable identity used to cache textures for this image.
    pub fn key(&self) -> Uuid {
        self.key
    }

    /// Display name, usually the original file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn payload(&self) -> Arc<ImagePayload> {
        Arc::clone(&self.payload)
    }

    pub fn preview(&self) -> &PreviewImage {
        &self.preview
    }

    /// Encoded image as a `data:` URI.
    pub fn data_uri(&self) -> String {
        self.payload.to_data_uri()
    }
}

impl PartialEq for ScanImage {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}
