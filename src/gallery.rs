//! Gallery accumulation and image download

use log::warn;

use crate::client::{FluxGen, Session};
use crate::types::GeneratedImage;

/// A downloaded image ready to hand to a save dialog
#[derive(Debug, Clone)]
pub struct SavedImage {
    /// `generated-image-<requestId>-<index>.png`
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Ordered collection of generated images, newest batch first
///
/// Images are immutable once added and leave only through [`clear`]
/// (or by dropping the gallery). Dropping an image releases the bytes
/// behind any locally created blob reference.
///
/// [`clear`]: Gallery::clear
#[derive(Debug, Default)]
pub struct Gallery {
    images: Vec<GeneratedImage>,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// All images in display order (newest batch first)
    pub fn images(&self) -> &[GeneratedImage] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Prepend a freshly generated batch
    ///
    /// The batch lands ahead of everything already displayed; order within
    /// the batch is preserved as returned by the backend.
    pub fn add_batch(&mut self, batch: Vec<GeneratedImage>) {
        let mut merged = batch;
        merged.append(&mut self.images);
        self.images = merged;
    }

    /// Empty the gallery and dismiss any outstanding generation error
    pub fn clear(&mut self, session: &mut Session) {
        self.images.clear();
        session.clear_error();
    }

    /// The filename an image is saved under
    pub fn download_filename(image: &GeneratedImage) -> String {
        format!(
            "generated-image-{}-{}.png",
            image.metadata.request_id, image.index
        )
    }

    /// Resolve an image to savable bytes, best effort
    ///
    /// Locally created blobs are served from memory; anything else is
    /// fetched over HTTP. A failed download is logged and yields `None`
    /// rather than surfacing a blocking error.
    pub async fn download(&self, client: &FluxGen, image: &GeneratedImage) -> Option<SavedImage> {
        let filename = Self::download_filename(image);

        let bytes = match &image.blob {
            Some(blob) => blob.as_ref().clone(),
            None => match client.fetch_image_bytes(&image.url).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!("download of {} failed: {}", filename, e);
                    return None;
                }
            },
        };

        Some(SavedImage { filename, bytes })
    }
}
