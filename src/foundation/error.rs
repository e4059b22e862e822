/// Convenience result type used across textcomp.
pub type TextcompResult<T> = Result<T, TextcompError>;

/// Top-level error taxonomy used by compositor APIs.
///
/// `Rejected` carries a message that is safe to show to an end user verbatim; the session
/// turns it into a warning notice.
#[derive(thiserror::Error, Debug)]
pub enum TextcompError {
    /// Invalid user-provided or document data.
    #[error("validation error: {0}")]
    Validation(String),

    /// An operation would break a store invariant and was refused before any mutation.
    #[error("rejected: {0}")]
    Rejected(String),

    /// A referenced layer, template or preset does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A font, image or other external resource failed to load or decode.
    #[error("asset error: {0}")]
    Asset(String),

    /// Errors while rasterizing or encoding a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TextcompError {
    /// Build a [`TextcompError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TextcompError::Rejected`] value.
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }

    /// Build a [`TextcompError::NotFound`] value.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Build a [`TextcompError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`TextcompError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`TextcompError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Message suitable for a user-facing notice.
    ///
    /// Rejections and lookups already read as user text; everything else keeps its prefix.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected(msg) | Self::NotFound(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
