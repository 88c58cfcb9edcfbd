//! Error types for richtext

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RichTextError>;

/// Main error type for richtext
///
/// Only [`RichTextError::InvalidArgument`] and
/// [`RichTextError::PreconditionFailed`] ever leave a render call. Shaping
/// and font failures are caught by the measurer and turned into a native
/// fallback.
#[derive(Debug, Error)]
pub enum RichTextError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("Shaper unavailable: {0}")]
    UnavailableShaper(String),

    #[error("Font loading failed: {0}")]
    FontLoad(#[from] FontLoadError),

    #[error("Canvas error: {0}")]
    Canvas(#[from] CanvasError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RichTextError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::UnavailableShaper(msg.into())
    }

    /// True for the failures a measurer answers with the native path
    pub fn is_fallback_signal(&self) -> bool {
        matches!(
            self,
            Self::UnavailableShaper(_) | Self::FontLoad(_) | Self::Io(_)
        )
    }
}

/// Font loading errors
#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("Font file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid font data")]
    InvalidData,

    #[error("Font has no outline table: {0}")]
    MissingOutlines(String),

    #[error("No font matches family: {0}")]
    NotResolved(String),
}

/// Errors reported by a host canvas
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("No renderer attached")]
    NoRenderer,

    #[error("Refresh failed: {0}")]
    RefreshFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_signal() {
        assert!(RichTextError::unavailable("no shaper").is_fallback_signal());
        assert!(RichTextError::from(FontLoadError::InvalidData).is_fallback_signal());
        assert!(!RichTextError::invalid("colors").is_fallback_signal());
        assert!(!RichTextError::PreconditionFailed("x".into()).is_fallback_signal());
    }

    #[test]
    fn test_display() {
        let err = RichTextError::invalid("colors must be a string, a list, or a mapping");
        assert_eq!(
            err.to_string(),
            "Invalid argument: colors must be a string, a list, or a mapping"
        );
        let err: RichTextError = CanvasError::NoRenderer.into();
        assert_eq!(err.to_string(), "Canvas error: No renderer attached");
    }
}
