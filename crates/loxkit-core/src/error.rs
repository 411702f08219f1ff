//! Error types for the bridge.

/// Errors that can occur while turning a structure file into accessories.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The bridge platform rejects more accessories than the fixed limit,
    /// with no partial-success option.
    #[error(
        "more than {limit} accessories for this bridge, which the platform does not allow; \
         try to filter out unneeded controls"
    )]
    TooManyAccessories {
        /// The platform-imposed accessory limit.
        limit: usize,
    },

    /// A document could not be parsed.
    #[error("parse error at {location}: {message}")]
    Parse {
        /// Where in the document parsing failed.
        location: String,
        /// What went wrong.
        message: String,
    },

    /// JSON (de)serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for bridge operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_many_accessories_message_names_limit() {
        let err = Error::TooManyAccessories { limit: 100 };
        assert!(err.to_string().contains("100"));
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
