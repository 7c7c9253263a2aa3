use super::Error;

/// Error when a where-clause cannot be evaluated.
///
/// Examples: a where-clause list entry without a primary key (entries are
/// deduplicated by key), a list of clauses under a `has_one` relation, or a
/// table name the model does not know.
#[derive(Debug)]
pub(super) struct InvalidQuery {
    message: Box<str>,
}

impl std::error::Error for InvalidQuery {}

impl core::fmt::Display for InvalidQuery {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid query: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid query error.
    pub fn invalid_query(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidQuery(InvalidQuery {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid query error.
    pub fn is_invalid_query(&self) -> bool {
        self.any_in_chain(|kind| matches!(kind, super::ErrorKind::InvalidQuery(_)))
    }
}
