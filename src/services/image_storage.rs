//! Content-addressed image storage.
//!
//! Uploaded bytes are stored verbatim as `{image_dir}/{sha256_hex}.jpg`.
//! The name depends only on the bytes, so storing the same content twice
//! rewrites the same file with identical data. The `.jpg` suffix is fixed
//! and the bytes are never decoded or validated.
//!
//! Reads fall back to a default image when the requested file is missing,
//! so an item whose image was never written still renders.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tokio::fs;

use crate::{Error, Result};

/// Suffix every stored image name carries.
pub const IMAGE_EXTENSION: &str = ".jpg";

/// Image bytes ready to be served.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Path the bytes were read from.
    pub path: PathBuf,
    pub content_type: String,
    pub data: Vec<u8>,
    /// True when the default image was substituted for a missing file.
    pub is_default: bool,
}

/// Service for storing and loading images by content hash.
pub struct ImageStorageService {
    image_dir: PathBuf,
    default_image: PathBuf,
}

impl ImageStorageService {
    pub fn new(image_dir: impl Into<PathBuf>, default_image: impl Into<PathBuf>) -> Self {
        Self {
            image_dir: image_dir.into(),
            default_image: default_image.into(),
        }
    }

    /// Compute the stored file name for `data`.
    pub fn image_name(data: &[u8]) -> String {
        let digest = Sha256::digest(data);
        format!("{}{}", hex::encode(digest), IMAGE_EXTENSION)
    }

    /// Store `data` and return its file name.
    ///
    /// Creates the image directory on first use.
    pub async fn store(&self, data: &[u8]) -> Result<String> {
        let name = Self::image_name(data);

        fs::create_dir_all(&self.image_dir).await?;
        fs::write(self.image_dir.join(&name), data).await?;

        tracing::debug!(image = %name, bytes = data.len(), "Stored image");
        Ok(name)
    }

    /// Load the image called `name`, or the default image if it is missing.
    ///
    /// Fails with `InvalidInput` when the name does not end in `.jpg` or
    /// would escape the image directory, and with `FileNotFound` when the
    /// default image is missing too.
    pub async fn load(&self, name: &str) -> Result<LoadedImage> {
        validate_image_name(name)?;

        let path = self.image_dir.join(name);
        match read_if_exists(&path).await? {
            Some(data) => Ok(loaded(path, data, false)),
            None => {
                tracing::debug!("Image not found: {}", path.display());
                let data = read_if_exists(&self.default_image)
                    .await?
                    .ok_or_else(|| {
                        Error::FileNotFound(self.default_image.display().to_string())
                    })?;
                Ok(loaded(self.default_image.clone(), data, true))
            }
        }
    }
}

/// Check that a requested image name is a bare `.jpg` file name.
pub fn validate_image_name(name: &str) -> Result<()> {
    if !name.ends_with(IMAGE_EXTENSION) {
        return Err(Error::InvalidInput(format!(
            "Image path does not end with {}",
            IMAGE_EXTENSION
        )));
    }
    if name.contains('/') || name.contains('\\') || name.starts_with("..") {
        return Err(Error::InvalidInput(format!("Invalid image name: {}", name)));
    }
    Ok(())
}

async fn read_if_exists(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path).await {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn loaded(path: PathBuf, data: Vec<u8>, is_default: bool) -> LoadedImage {
    let content_type = mime_guess::from_path(&path)
        .first_or_octet_stream()
        .to_string();
    LoadedImage {
        path,
        content_type,
        data,
        is_default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn service(dir: &Path) -> ImageStorageService {
        ImageStorageService::new(dir.join("images"), dir.join("images/default.jpg"))
    }

    #[test]
    fn test_image_name_is_sha256_hex() {
        assert_eq!(
            ImageStorageService::image_name(b"Hello, World!"),
            "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f.jpg"
        );
        // Empty input still hashes
        assert_eq!(
            ImageStorageService::image_name(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855.jpg"
        );
    }

    #[tokio::test]
    async fn test_store_is_deterministic_and_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let images = service(dir.path());
        let data = b"\x89PNG not really a jpeg".to_vec();

        let first = images.store(&data).await.unwrap();
        let second = images.store(&data).await.unwrap();

        assert_eq!(first, second);
        let stored = std::fs::read(dir.path().join("images").join(&first)).unwrap();
        assert_eq!(stored, data);
    }

    #[tokio::test]
    async fn test_load_existing_image() {
        let dir = tempfile::tempdir().unwrap();
        let images = service(dir.path());
        let name = images.store(b"photo").await.unwrap();

        let loaded = images.load(&name).await.unwrap();
        assert_eq!(loaded.data, b"photo");
        assert_eq!(loaded.content_type, "image/jpeg");
        assert!(!loaded.is_default);
        assert_eq!(loaded.path, dir.path().join("images").join(&name));
    }

    #[tokio::test]
    async fn test_missing_image_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let images = service(dir.path());
        std::fs::create_dir_all(dir.path().join("images")).unwrap();
        std::fs::write(dir.path().join("images/default.jpg"), b"default").unwrap();

        let loaded = images.load("missing.jpg").await.unwrap();
        assert_eq!(loaded.data, b"default");
        assert!(loaded.is_default);
        assert_eq!(loaded.path, dir.path().join("images/default.jpg"));
    }

    #[tokio::test]
    async fn test_missing_default_is_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let images = service(dir.path());

        let err = images.load("missing.jpg").await.unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_non_jpg_rejected_even_if_present() {
        let dir = tempfile::tempdir().unwrap();
        let images = service(dir.path());
        std::fs::create_dir_all(dir.path().join("images")).unwrap();
        std::fs::write(dir.path().join("images/photo.png"), b"png").unwrap();

        let err = images.load("photo.png").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[rstest]
    #[case("abc.jpg", true)]
    #[case("default.jpg", true)]
    #[case("abc.png", false)]
    #[case("abc.JPG", false)]
    #[case("abc", false)]
    #[case("../secret.jpg", false)]
    #[case("nested/abc.jpg", false)]
    #[case("..\\abc.jpg", false)]
    #[case("..jpg", false)]
    fn test_validate_image_name(#[case] name: &str, #[case] valid: bool) {
        assert_eq!(validate_image_name(name).is_ok(), valid);
    }
}
