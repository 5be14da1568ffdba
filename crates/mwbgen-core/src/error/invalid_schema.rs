use super::Error;

/// Error when the parsed schema graph is inconsistent.
///
/// This occurs when:
/// - A foreign key's local and foreign column counts differ
/// - A foreign key, index, or column references something that does not exist
/// - A table declares the same column twice
/// - Both sides of a relation claim to be the owning side
///
/// These errors abort the build before any output is produced.
#[derive(Debug)]
pub(super) struct InvalidSchema {
    message: Box<str>,
}

impl std::error::Error for InvalidSchema {}

impl core::fmt::Display for InvalidSchema {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid schema: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid schema error.
    ///
    /// The message should name the offending table, column, or foreign key.
    pub fn invalid_schema(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidSchema(InvalidSchema {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is (or was caused by) an invalid schema error.
    pub fn is_invalid_schema(&self) -> bool {
        self.any_in_chain(|kind| matches!(kind, super::ErrorKind::InvalidSchema(_)))
    }
}
