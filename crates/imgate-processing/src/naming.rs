//! Generated names for stored and transformed images.

use crate::error::ProcessingError;
use std::fmt::{Display, Formatter, Result as FmtResult};
use uuid::Uuid;

/// Longest extension accepted from an uploaded filename.
pub const MAX_EXTENSION_LEN: usize = 10;

/// Extract the extension of an uploaded file's original name.
///
/// Only the final path component is considered, the extension is what follows
/// its last `.`, and the result is lowercased. Names without a usable extension
/// are rejected rather than guessed at.
pub fn extract_extension(filename: &str) -> Result<String, ProcessingError> {
    let base = filename
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename)
        .trim();

    let (stem, extension) = base.rsplit_once('.').ok_or_else(|| {
        ProcessingError::InvalidFilename(format!("'{}' has no file extension", filename))
    })?;

    if stem.is_empty() || extension.is_empty() {
        return Err(ProcessingError::InvalidFilename(format!(
            "'{}' has no file extension",
            filename
        )));
    }

    if extension.len() > MAX_EXTENSION_LEN
        || !extension.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(ProcessingError::InvalidFilename(format!(
            "'{}' has an unsupported file extension",
            filename
        )));
    }

    Ok(extension.to_ascii_lowercase())
}

/// Name of an image in storage: `<stem>.<extension>`.
///
/// The stem of an uploaded image is a random 128-bit identifier rendered as 32
/// hex characters; derived images decorate that stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageName {
    stem: String,
    extension: String,
}

impl ImageName {
    pub fn new(stem: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            stem: stem.into(),
            extension: extension.into(),
        }
    }

    /// Fresh collision-resistant name with the given extension
    pub fn generate(extension: impl Into<String>) -> Self {
        Self::new(Uuid::new_v4().simple().to_string(), extension)
    }

    /// Fresh name for an upload, keeping the extension of its original filename
    pub fn for_upload(original_filename: &str) -> Result<Self, ProcessingError> {
        Ok(Self::generate(extract_extension(original_filename)?))
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Storage key / retrieval filename
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.stem, self.extension)
    }

    /// `<stem>_<suffix>.<extension>`
    pub fn with_suffix(&self, suffix: &str) -> Self {
        Self::new(format!("{}_{}", self.stem, suffix), self.extension.clone())
    }

    /// Same stem, different extension
    pub fn with_extension(&self, extension: &str) -> Self {
        Self::new(self.stem.clone(), extension)
    }
}

impl Display for ImageName {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}.{}", self.stem, self.extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_extension_simple() {
        assert_eq!(extract_extension("cat.png").unwrap(), "png");
        assert_eq!(extract_extension("Holiday.JPG").unwrap(), "jpg");
    }

    #[test]
    fn test_extract_extension_uses_last_dot() {
        assert_eq!(extract_extension("my.holiday.photo.webp").unwrap(), "webp");
    }

    #[test]
    fn test_extract_extension_ignores_directories() {
        assert_eq!(extract_extension("C:\\fakepath\\scan.tiff").unwrap(), "tiff");
        assert!(extract_extension("uploads.d/raw").is_err());
    }

    #[test]
    fn test_extract_extension_rejects_missing() {
        for name in ["noextension", "trailing.", ".png", "", "   "] {
            assert!(
                matches!(
                    extract_extension(name),
                    Err(ProcessingError::InvalidFilename(_))
                ),
                "expected {:?} to be rejected",
                name
            );
        }
    }

    #[test]
    fn test_extract_extension_rejects_odd_characters() {
        assert!(extract_extension("a.p?g").is_err());
        assert!(extract_extension("a.abcdefghijk").is_err());
    }

    #[test]
    fn test_generated_stem_is_hex_token() {
        let name = ImageName::generate("png");
        assert_eq!(name.stem().len(), 32);
        assert!(name.stem().chars().all(|c| c.is_ascii_hexdigit()));
        assert!(!name.stem().contains('-'));
        assert_eq!(name.file_name(), format!("{}.png", name.stem()));
    }

    #[test]
    fn test_generated_names_differ() {
        assert_ne!(ImageName::generate("png"), ImageName::generate("png"));
    }

    #[test]
    fn test_decorations() {
        let name = ImageName::new("abc", "png");
        assert_eq!(name.with_suffix("100x50").file_name(), "abc_100x50.png");
        assert_eq!(name.with_extension("jpeg").file_name(), "abc.jpeg");
        assert_eq!(name.to_string(), "abc.png");
    }
}
