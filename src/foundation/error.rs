/// Convenience result type used across sketchrun.
pub type SketchResult<T> = Result<T, SketchError>;

/// Top-level error taxonomy used by loader, renderer, and session APIs.
#[derive(thiserror::Error, Debug)]
pub enum SketchError {
    /// An archive could not be opened or its directory could not be read.
    #[error("archive error: {0}")]
    Archive(String),

    /// A project, dependency, or module referenced at activation time does not exist.
    #[error("resolution error: {0}")]
    Resolution(String),

    /// An individual asset failed to decode.
    #[error("decode error: {0}")]
    Decode(String),

    /// Invalid configuration or API arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// The execution engine reported a failure.
    #[error("engine error: {0}")]
    Engine(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SketchError {
    /// Build a [`SketchError::Archive`] value.
    pub fn archive(msg: impl Into<String>) -> Self {
        Self::Archive(msg.into())
    }

    /// Build a [`SketchError::Resolution`] value.
    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::Resolution(msg.into())
    }

    /// Build a [`SketchError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`SketchError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SketchError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`SketchError::Engine`] value.
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
