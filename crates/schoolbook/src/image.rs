//! Image references.
//!
//! A school can carry a reference to an image file picked from local disk.
//! The image bytes are never copied into the register. The reference records
//! where the file was and a BLAKE3 fingerprint of what it held, so a later
//! session can tell whether it still resolves to the same picture.
//!
//! References are not durable: moving, editing or deleting the file breaks
//! them, and nothing tries to repair that.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::ImageConfig;
use crate::error::{Error, Result};

/// Scheme prefix of every reference.
const SCHEME: &str = "file://";

/// Separator between the path and the fingerprint.
const FINGERPRINT_MARKER: &str = "#blake3=";

/// Number of hex characters of the BLAKE3 hash kept in a reference.
const FINGERPRINT_LEN: usize = 16;

/// A reference to a local image file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    path: PathBuf,
    fingerprint: String,
}

/// Whether a reference still resolves to the file it was made from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageStatus {
    /// The file exists and has the recorded content.
    Present,
    /// The file exists but its content changed.
    Changed,
    /// The file is gone or unreadable.
    Missing,
}

impl fmt::Display for ImageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present => write!(f, "present"),
            Self::Changed => write!(f, "changed"),
            Self::Missing => write!(f, "missing"),
        }
    }
}

impl ImageRef {
    /// Make a reference to the image at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist, is not a regular file,
    /// has an extension not listed in `config`, or is larger than allowed.
    pub fn from_file(path: impl AsRef<Path>, config: &ImageConfig) -> Result<Self> {
        let path = path.as_ref();

        let metadata = std::fs::metadata(path)
            .map_err(|e| Error::image(path, format!("cannot read file: {e}")))?;
        if !metadata.is_file() {
            return Err(Error::image(path, "not a regular file"));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if !config.extensions.iter().any(|allowed| *allowed == ext) {
            return Err(Error::image(
                path,
                format!("unsupported image type (allowed: {})", config.extensions.join(", ")),
            ));
        }

        if metadata.len() > config.max_bytes {
            return Err(Error::image(
                path,
                format!(
                    "file is {} bytes, limit is {} bytes",
                    metadata.len(),
                    config.max_bytes
                ),
            ));
        }

        let bytes = std::fs::read(path)?;
        let canonical = std::fs::canonicalize(path)?;
        let fingerprint = fingerprint(&bytes);
        debug!("Referenced image {} ({})", canonical.display(), fingerprint);

        Ok(Self {
            path: canonical,
            fingerprint,
        })
    }

    /// Parse a reference previously produced by the `Display` impl.
    ///
    /// Returns `None` if `reference` is not in the expected format.
    #[must_use]
    pub fn parse(reference: &str) -> Option<Self> {
        let rest = reference.strip_prefix(SCHEME)?;
        let (path, fingerprint) = rest.rsplit_once(FINGERPRINT_MARKER)?;
        if path.is_empty()
            || fingerprint.len() != FINGERPRINT_LEN
            || !fingerprint.chars().all(|c| c.is_ascii_hexdigit())
        {
            return None;
        }
        Some(Self {
            path: PathBuf::from(path),
            fingerprint: fingerprint.to_string(),
        })
    }

    /// The referenced file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Hex fingerprint of the file content when the reference was made.
    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Check the referenced file against the recorded fingerprint.
    #[must_use]
    pub fn status(&self) -> ImageStatus {
        match std::fs::read(&self.path) {
            Ok(bytes) if fingerprint(&bytes) == self.fingerprint => ImageStatus::Present,
            Ok(_) => ImageStatus::Changed,
            Err(_) => ImageStatus::Missing,
        }
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{SCHEME}{}{FINGERPRINT_MARKER}{}",
            self.path.display(),
            self.fingerprint
        )
    }
}

/// Resolve a stored reference string to its current status.
///
/// Strings that are not references at all count as missing.
#[must_use]
pub fn status_of(reference: &str) -> ImageStatus {
    ImageRef::parse(reference).map_or(ImageStatus::Missing, |r| r.status())
}

fn fingerprint(bytes: &[u8]) -> String {
    let hex = blake3::hash(bytes).to_hex();
    hex.as_str()[..FINGERPRINT_LEN].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_reference_from_image_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "oak.png", b"\x89PNG fake");

        let image = ImageRef::from_file(&path, &ImageConfig::default()).unwrap();
        assert_eq!(image.fingerprint().len(), FINGERPRINT_LEN);
        assert_eq!(image.status(), ImageStatus::Present);

        let reference = image.to_string();
        assert!(reference.starts_with("file://"));
        assert!(reference.contains("#blake3="));
    }

    #[test]
    fn test_uppercase_extension_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "OAK.JPG", b"jpeg");
        assert!(ImageRef::from_file(&path, &ImageConfig::default()).is_ok());
    }

    #[test]
    fn test_parse_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "oak.gif", b"GIF89a");
        let image = ImageRef::from_file(&path, &ImageConfig::default()).unwrap();

        let parsed = ImageRef::parse(&image.to_string()).unwrap();
        assert_eq!(parsed, image);
    }

    #[test]
    fn test_parse_rejects_foreign_strings() {
        assert!(ImageRef::parse("blob:http://localhost/1234").is_none());
        assert!(ImageRef::parse("file:///tmp/a.png").is_none());
        assert!(ImageRef::parse("file:///tmp/a.png#blake3=xyz").is_none());
        assert!(ImageRef::parse("file://#blake3=0123456789abcdef").is_none());
    }

    #[test]
    fn test_missing_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = ImageRef::from_file(dir.path().join("nope.png"), &ImageConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("cannot read file"));
    }

    #[test]
    fn test_directory_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = ImageRef::from_file(dir.path(), &ImageConfig::default()).unwrap_err();
        assert!(err.to_string().contains("not a regular file"));
    }

    #[test]
    fn test_wrong_extension_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "notes.txt", b"hello");
        let err = ImageRef::from_file(&path, &ImageConfig::default()).unwrap_err();
        assert!(err.to_string().contains("unsupported image type"));
    }

    #[test]
    fn test_oversized_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "big.png", &[0u8; 64]);
        let config = ImageConfig {
            max_bytes: 16,
            ..ImageConfig::default()
        };
        let err = ImageRef::from_file(&path, &config).unwrap_err();
        assert!(err.to_string().contains("limit is 16 bytes"));
    }

    #[test]
    fn test_status_tracks_file_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "oak.png", b"first");
        let image = ImageRef::from_file(&path, &ImageConfig::default()).unwrap();
        let reference = image.to_string();

        std::fs::write(&path, b"second").unwrap();
        assert_eq!(status_of(&reference), ImageStatus::Changed);

        std::fs::remove_file(&path).unwrap();
        assert_eq!(status_of(&reference), ImageStatus::Missing);
    }

    #[test]
    fn test_status_of_unparseable_reference() {
        assert_eq!(status_of("blob:http://localhost/1"), ImageStatus::Missing);
    }
}
