use std::fmt;

/// Broad classification of an [`Error`], for callers that branch on
/// failure class without string matching.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    /// Network or HTTP-level failure while talking to the remote service.
    Transport,
    /// A request or response body could not be encoded/decoded.
    Decode,
    /// Input rejected locally, before any request was sent.
    Validation,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Transport => write!(f, "transport"),
            Kind::Decode => write!(f, "decode"),
            Kind::Validation => write!(f, "validation"),
        }
    }
}

/// Error type returned by every fallible operation in this crate.
///
/// Business-level rejections (unknown city, bad tariff, refused order) are
/// *not* errors at this layer: they arrive as ordinary parsed documents
/// carrying an `error`-shaped field, and callers inspect those themselves.
#[derive(Debug)]
pub struct Error {
    kind: Kind,
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl Error {
    pub(crate) fn new(kind: Kind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn with_source(
        kind: Kind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(Kind::Validation, message)
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_decode() {
            Kind::Decode
        } else {
            Kind::Transport
        };
        Self::with_source(kind, err.to_string(), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::with_source(Kind::Validation, err.to_string(), err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(Kind::Decode, err.to_string(), err)
    }
}

impl From<serde_html_form::ser::Error> for Error {
    fn from(err: serde_html_form::ser::Error) -> Self {
        Self::with_source(Kind::Decode, err.to_string(), err)
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, Kind};

    #[test]
    fn validation_errors_carry_their_kind() {
        let err = Error::validation("sender location is empty");
        assert_eq!(err.kind(), Kind::Validation);
        assert_eq!(
            err.to_string(),
            "validation: sender location is empty"
        );
    }
}
