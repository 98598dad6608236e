//! Media Storage Service
//!
//! Local image storage for profile and dish pictures. Uploads are
//! validated, re-encoded to JPEG and stored content-addressed (SHA-256
//! of the compressed bytes), which deduplicates repeat uploads for
//! free.
//!
//! Image storage is a non-critical side effect: callers that can live
//! without a picture use [`MediaService::store_or_empty`], which
//! degrades to an empty URL instead of failing the parent operation.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::utils::AppError;

/// Maximum upload size (5MB)
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// JPEG quality for stored images
const JPEG_QUALITY: u8 = 85;

/// A stored image reference
#[derive(Debug, Clone)]
pub struct StoredImage {
    /// Public URL the image is served from
    pub url: String,
    /// Stable id of the stored object (content hash)
    pub public_id: String,
}

impl StoredImage {
    /// Placeholder used when an upload was absent or failed
    pub fn empty() -> Self {
        Self {
            url: String::new(),
            public_id: String::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MediaService {
    images_dir: PathBuf,
}

impl MediaService {
    pub fn new(work_dir: &Path) -> Self {
        Self {
            images_dir: work_dir.join("uploads/images"),
        }
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Validate, compress and persist an uploaded image.
    pub fn store(&self, data: &[u8]) -> Result<StoredImage, AppError> {
        if data.is_empty() {
            return Err(AppError::validation("Empty file provided"));
        }
        if data.len() > MAX_FILE_SIZE {
            return Err(AppError::validation(format!(
                "File too large. Maximum size is {}MB",
                MAX_FILE_SIZE / 1024 / 1024
            )));
        }

        let img = image::load_from_memory(data)
            .map_err(|e| AppError::validation(format!("Invalid image: {}", e)))?;

        // Re-encode to JPEG; also strips whatever metadata came along
        let mut buffer = Vec::new();
        {
            let mut cursor = Cursor::new(&mut buffer);
            let rgb_img = img.to_rgb8();
            let encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
            rgb_img
                .write_with_encoder(encoder)
                .map_err(|e| AppError::internal(format!("Failed to compress image: {}", e)))?;
        }

        let mut hasher = Sha256::new();
        hasher.update(&buffer);
        let hash = hex::encode(hasher.finalize());

        fs::create_dir_all(&self.images_dir)
            .map_err(|e| AppError::internal(format!("Failed to create images directory: {}", e)))?;

        let filename = format!("{hash}.jpg");
        let file_path = self.images_dir.join(&filename);

        if !file_path.exists() {
            fs::write(&file_path, &buffer)
                .map_err(|e| AppError::internal(format!("Failed to save file: {}", e)))?;
            tracing::info!(size = buffer.len(), file = %filename, "Image stored");
        } else {
            tracing::info!(file = %filename, "Duplicate image, reusing stored file");
        }

        Ok(StoredImage {
            url: format!("/api/v1/image/{filename}"),
            public_id: hash,
        })
    }

    /// Store an optional upload, degrading to an empty reference on
    /// failure so entity creation never blocks on media.
    pub fn store_or_empty(&self, data: Option<&[u8]>) -> StoredImage {
        match data {
            Some(bytes) => match self.store(bytes) {
                Ok(stored) => stored,
                Err(e) => {
                    tracing::warn!(error = %e, "Image upload failed, continuing without image");
                    StoredImage::empty()
                }
            },
            None => StoredImage::empty(),
        }
    }

    /// Resolve a stored image by filename, rejecting path traversal.
    pub fn resolve(&self, filename: &str) -> Result<PathBuf, AppError> {
        if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
            return Err(AppError::validation("Invalid image name"));
        }
        let path = self.images_dir.join(filename);
        if !path.exists() {
            return Err(AppError::not_found(format!("Image {} not found", filename)));
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_fixture() -> Vec<u8> {
        // 2x2 white PNG built through the image crate itself
        let img = image::RgbImage::from_pixel(2, 2, image::Rgb([255, 255, 255]));
        let mut buffer = Vec::new();
        img.write_to(
            &mut Cursor::new(&mut buffer),
            image::ImageFormat::Png,
        )
        .expect("encode fixture");
        buffer
    }

    #[test]
    fn stores_and_deduplicates() {
        let dir = tempfile::tempdir().expect("tempdir");
        let media = MediaService::new(dir.path());

        let first = media.store(&png_fixture()).expect("store failed");
        let second = media.store(&png_fixture()).expect("store failed");

        assert_eq!(first.public_id, second.public_id);
        assert!(first.url.starts_with("/api/v1/image/"));
        assert_eq!(fs::read_dir(media.images_dir()).unwrap().count(), 1);
    }

    #[test]
    fn rejects_non_image_data() {
        let dir = tempfile::tempdir().expect("tempdir");
        let media = MediaService::new(dir.path());
        assert!(media.store(b"definitely not an image").is_err());
    }

    #[test]
    fn degrades_to_empty_on_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let media = MediaService::new(dir.path());
        let stored = media.store_or_empty(Some(b"garbage"));
        assert!(stored.url.is_empty());
        assert!(stored.public_id.is_empty());
    }

    #[test]
    fn resolve_rejects_traversal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let media = MediaService::new(dir.path());
        assert!(media.resolve("../secrets.txt").is_err());
    }
}
