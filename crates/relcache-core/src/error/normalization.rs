use super::Error;

/// Error when a payload does not fit the model it is normalized against.
///
/// This occurs when:
/// - The payload (or a nested related payload) is not an object
/// - A relation field holds an array where an object is expected, or the reverse
/// - A record's primary key is missing or cannot be used as a key
/// - The target table does not exist in the model
///
/// The whole merge is aborted; the cache passed in is left untouched.
#[derive(Debug)]
pub(super) struct NormalizationError {
    message: Box<str>,
}

impl std::error::Error for NormalizationError {}

impl core::fmt::Display for NormalizationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "normalization failed: {}", self.message)
    }
}

impl Error {
    /// Creates a normalization error.
    pub fn normalization(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Normalization(NormalizationError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a normalization error.
    pub fn is_normalization(&self) -> bool {
        self.any_in_chain(|kind| matches!(kind, super::ErrorKind::Normalization(_)))
    }
}
