use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic, WriteExecutor};

/// Error kinds for filter construction, evaluation and translation.
///
/// Every kind describes a contract violation by the calling layer. None of
/// them is retried; they are surfaced to the caller, which translates them
/// into a validation message.
///
/// # Examples
///
/// ```rust
/// use larder::errors::{ErrorKind, LarderError, LarderResult};
///
/// fn example() -> LarderResult<()> {
///     Err(LarderError::new("value must not be null", ErrorKind::NullArgument))
/// }
/// assert_eq!(example().unwrap_err().kind(), &ErrorKind::NullArgument);
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// A required value, collection, coordinate or candidate was null
    NullArgument,
    /// A membership filter was built from zero usable values
    EmptyValue,
    /// A value is present but outside its permitted domain
    InvalidValue,
    /// A field name cannot be used by the backing store
    InvalidFieldName,
    /// Error while evaluating or translating a filter
    FilterError,

    // Extension Errors - allows external crates to plug in their own error types
    // The String contains the extension name/category (e.g., "geo")
    /// Error from an extension crate
    Extension(String),

    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::NullArgument => write!(f, "Null argument"),
            ErrorKind::EmptyValue => write!(f, "Empty value"),
            ErrorKind::InvalidValue => write!(f, "Invalid value"),
            ErrorKind::InvalidFieldName => write!(f, "Invalid field name"),
            ErrorKind::FilterError => write!(f, "Filter error"),
            ErrorKind::Extension(name) => write!(f, "{} error", name),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom Larder error type.
///
/// `LarderError` carries a message, its [ErrorKind] and an optional cause.
/// A backtrace is captured unresolved on creation and symbolized only when
/// the error is debug-printed.
///
/// # Examples
///
/// ```rust
/// use larder::errors::{ErrorKind, LarderError};
///
/// let cause = LarderError::new("latitude missing", ErrorKind::NullArgument);
/// let err = LarderError::new_with_cause("bad search request", ErrorKind::FilterError, cause);
/// assert!(err.cause().is_some());
/// ```
#[derive(Clone)]
pub struct LarderError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<LarderError>>,
    backtrace: Atomic<Backtrace>,
}

impl LarderError {
    /// Creates a new `LarderError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        LarderError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new_unresolved()),
        }
    }

    /// Creates a new `LarderError` chained to the error that caused it.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: LarderError) -> Self {
        LarderError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new_unresolved()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&LarderError> {
        self.cause.as_deref()
    }
}

impl Display for LarderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for LarderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}: {}\nCaused by: {:?}", self.error_kind, self.message, cause),
            None => {
                let trace = self.backtrace.write_with(|bt| {
                    bt.resolve();
                    format!("{:?}", bt)
                });
                write!(f, "{}: {}\n{}", self.error_kind, self.message, trace)
            }
        }
    }
}

impl Error for LarderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for Larder operations.
pub type LarderResult<T> = Result<T, LarderError>;

#[cfg(feature = "serde")]
impl serde::de::Error for LarderError {
    fn custom<T: Display>(msg: T) -> Self {
        LarderError::new(&msg.to_string(), ErrorKind::InvalidValue)
    }
}

#[cfg(feature = "serde")]
impl serde::ser::Error for LarderError {
    fn custom<T: Display>(msg: T) -> Self {
        LarderError::new(&msg.to_string(), ErrorKind::InternalError)
    }
}

impl From<std::fmt::Error> for LarderError {
    fn from(err: std::fmt::Error) -> Self {
        LarderError::new(&format!("Formatting error: {}", err), ErrorKind::InternalError)
    }
}
