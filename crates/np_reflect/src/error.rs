use alloc::boxed::Box;
use alloc::string::String;
use core::error::Error;
use core::fmt;

use thiserror::Error;

use crate::info::{MethodKind, TypeInfo};
use crate::lexical::LexicalError;

// -----------------------------------------------------------------------------
// ErrorKind

/// Coarse category of a [`ReflectError`].
///
/// Callers that only need to decide how to report a failure can
/// match on this instead of the full error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No usable accessor, or a dynamic handler failed to construct.
    Binding,
    /// A resolved accessor failed while being invoked.
    Access,
    /// A value could not be coerced to the declared type.
    Conversion,
    /// The value's shape does not support the requested operation.
    Unsupported,
    /// A positional write or removal was out of bounds.
    Index,
    /// A probing limit was exhausted.
    Configuration,
    /// A lexical error raised beneath an access.
    Lexical,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Binding => "binding",
            ErrorKind::Access => "access",
            ErrorKind::Conversion => "conversion",
            ErrorKind::Unsupported => "unsupported operation",
            ErrorKind::Index => "index",
            ErrorKind::Configuration => "configuration",
            ErrorKind::Lexical => "lexical",
        };
        f.write_str(name)
    }
}

// -----------------------------------------------------------------------------
// ConversionError

/// A value could not be coerced to a target type.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("cannot convert a value of type `{from}` to `{to}`")]
pub struct ConversionError {
    from: &'static str,
    to: &'static str,
}

impl ConversionError {
    #[inline]
    pub fn new(from: &TypeInfo, to: &TypeInfo) -> Self {
        Self {
            from: from.type_path(),
            to: to.type_path(),
        }
    }

    /// Type path of the rejected value.
    #[inline]
    pub fn from_type(&self) -> &'static str {
        self.from
    }

    /// Type path of the requested target.
    #[inline]
    pub fn to_type(&self) -> &'static str {
        self.to
    }
}

// -----------------------------------------------------------------------------
// InvokeError

/// Failure of a single accessor invocation.
///
/// Accessor bodies return this; the property layer decides
/// whether it is absence, an access error, or a lexical error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InvokeError {
    #[error("index {index} is out of bounds for length {len}")]
    OutOfBounds { index: usize, len: usize },

    #[error("`{member}` of `{owner}` is not publicly accessible")]
    IllegalAccess {
        owner: &'static str,
        member: &'static str,
    },

    #[error("receiver of type `{actual}` is not an instance of `{expected}`")]
    WrongReceiver {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("argument of type `{actual}` does not match `{expected}`")]
    WrongArgument {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("`{member}` of `{owner}` has no implementation")]
    Abstract {
        owner: &'static str,
        member: &'static str,
    },

    #[error("`{member}` cannot be invoked as a {expected} accessor")]
    SignatureMismatch {
        member: &'static str,
        expected: MethodKind,
    },

    #[error("`{member}` does not expose mutable access")]
    ReadOnly { member: &'static str },

    #[error(transparent)]
    Lexical(#[from] LexicalError),

    #[error(transparent)]
    Failed(Box<dyn Error + Send + Sync>),
}

impl InvokeError {
    /// Wraps an arbitrary failure raised by an accessor body.
    #[inline]
    pub fn failed(error: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self::Failed(error.into())
    }

    /// Returns `true` if the invocation failed because the index was
    /// outside the representation's bounds.
    #[inline]
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }
}

// -----------------------------------------------------------------------------
// ReflectError

/// Errors surfaced by the access engine, the property resolver and
/// the handler registry.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReflectError {
    #[error("property `{property}` has no usable {accessor} accessor")]
    Binding {
        property: String,
        accessor: MethodKind,
    },

    #[error("property descriptor `{property}` declares no accessor")]
    EmptyDescriptor { property: String },

    #[error("cannot allocate dynamic property handler `{handler}`")]
    HandlerInit {
        handler: &'static str,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },

    #[error("cannot access property `{host}.{property}`")]
    Access {
        host: &'static str,
        property: String,
        #[source]
        source: InvokeError,
    },

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("cannot {operation} `{type_path}`")]
    Unsupported {
        operation: &'static str,
        type_path: &'static str,
    },

    #[error("cannot shrink `{type_path}` from {len} to {requested} elements")]
    Shrink {
        type_path: &'static str,
        len: usize,
        requested: usize,
    },

    #[error("index {index} is out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("property `{property}` is not a collection")]
    NotCollection { property: String },

    #[error("cannot determine the length of `{property}` within {limit} probes")]
    LengthIndeterminate { property: String, limit: usize },

    #[error(transparent)]
    Lexical(#[from] LexicalError),
}

impl ReflectError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Binding { .. } | Self::EmptyDescriptor { .. } | Self::HandlerInit { .. } => {
                ErrorKind::Binding
            }
            Self::Access { .. } => ErrorKind::Access,
            Self::Conversion(_) => ErrorKind::Conversion,
            Self::Unsupported { .. } | Self::Shrink { .. } | Self::NotCollection { .. } => {
                ErrorKind::Unsupported
            }
            Self::IndexOutOfBounds { .. } => ErrorKind::Index,
            Self::LengthIndeterminate { .. } => ErrorKind::Configuration,
            Self::Lexical(_) => ErrorKind::Lexical,
        }
    }

    #[inline]
    pub(crate) fn unsupported(operation: &'static str, info: &TypeInfo) -> Self {
        Self::Unsupported {
            operation,
            type_path: info.type_path(),
        }
    }

    /// Attaches host and property context to an invocation failure.
    ///
    /// Lexical errors pass through unchanged.
    pub(crate) fn access(host: &'static str, property: &str, source: InvokeError) -> Self {
        match source {
            InvokeError::Lexical(error) => Self::Lexical(error),
            source => Self::Access {
                host,
                property: property.into(),
                source,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{ErrorKind, InvokeError, ReflectError};
    use crate::lexical::{LexicalError, LexicalErrorReason};

    #[test]
    fn access_keeps_lexical_errors() {
        let lexical = LexicalError::new(false, 0, 1, 4, "ab", '$', LexicalErrorReason::LexicalError);
        let error = ReflectError::access("demo::Bean", "name", InvokeError::from(lexical.clone()));

        assert_eq!(error.kind(), ErrorKind::Lexical);
        assert!(matches!(error, ReflectError::Lexical(inner) if inner == lexical));
    }

    #[test]
    fn access_carries_context() {
        let error = ReflectError::access("demo::Bean", "name", InvokeError::failed("boom"));

        assert_eq!(error.kind(), ErrorKind::Access);
        assert_eq!(error.to_string(), "cannot access property `demo::Bean.name`");
        assert_eq!(
            core::error::Error::source(&error).map(ToString::to_string),
            Some("boom".to_string())
        );
    }
}
