//! Error types for bindle-core.

use thiserror::Error;

/// Errors that can abort a bundle.
///
/// The first error encountered during loading aborts the whole call; no
/// partial bundle is ever returned.
#[derive(Debug, Error)]
pub enum BundleError {
    /// The parser rejected a module source.
    #[error("failed to parse {location}: {message}")]
    Parse { location: String, message: String },

    /// The resource loader could not produce the module source.
    #[error("failed to load {location}: {source}")]
    Load {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// The resolver could not canonicalize a specifier.
    #[error("failed to resolve '{specifier}' from '{referrer}'")]
    Resolve { specifier: String, referrer: String },
}

impl BundleError {
    /// Create a parse error for a module location.
    pub fn parse(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Create a load error carrying the underlying I/O cause.
    pub fn load(location: impl Into<String>, source: std::io::Error) -> Self {
        Self::Load {
            location: location.into(),
            source,
        }
    }

    /// Create a resolution error for a specifier and its referrer.
    pub fn resolve(specifier: impl Into<String>, referrer: impl Into<String>) -> Self {
        Self::Resolve {
            specifier: specifier.into(),
            referrer: referrer.into(),
        }
    }
}

/// Result type alias for bundling operations.
pub type BundleResult<T> = Result<T, BundleError>;
