use std::error::Error as StdError;
use std::fmt::Display;

use derive_more::with_trait::Debug;

use crate::error::chain::{Chain, Unwrap, downcast_node};
use crate::error::status::StatusError;

/// An error chain node, as produced and consumed by this crate.
///
/// An `Error` is one of:
///
/// * a [`StatusError`] classification,
/// * a [`CompositeError`] joining several causes without a message of its own,
/// * a formatted message wrapping zero or more causes (see [`errorf!`]),
/// * any other [`std::error::Error`], whose `source()` chain is followed.
///
/// The HTTP status of an error is the status of the classification found in
/// its chain; see [`Error::status_error`] and [`crate::flatten`].
///
/// [`errorf!`]: crate::errorf
pub struct Error {
    repr: Box<ErrorRepr>,
}

#[derive(Debug)]
pub(crate) enum ErrorRepr {
    Status(StatusError),
    Composite(CompositeError),
    Message {
        message: String,
        causes: Vec<Error>,
    },
    Custom(Box<dyn StdError + Send + Sync + 'static>),
}

impl Error {
    fn new(repr: ErrorRepr) -> Self {
        Self {
            repr: Box::new(repr),
        }
    }

    /// Create a new error with a custom error message or error type.
    ///
    /// The error is opaque: it contributes its own message and the messages
    /// of its `source()` chain, but no status code. Unless a classification
    /// is added by wrapping it with [`errorf!`](crate::errorf) or
    /// [`Error::with_status`], it will be reported as 500 Internal Server
    /// Error.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsrest::Error;
    ///
    /// let error = Error::custom("An error occurred");
    /// let error = Error::custom(std::io::Error::other("An error occurred"));
    /// ```
    ///
    /// Errors of this crate's own types are not wrapped again, so their
    /// causes and classification stay visible:
    ///
    /// ```
    /// use jsrest::{Error, StatusCode, StatusError, errorf};
    ///
    /// let error = Error::custom(errorf!(StatusError::NOT_FOUND, "missing"));
    /// assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
    /// ```
    #[must_use]
    pub fn custom<E>(error: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync + 'static>>,
    {
        let error = match error.into().downcast::<Self>() {
            Ok(error) => return *error,
            Err(error) => error,
        };
        let error = match error.downcast::<CompositeError>() {
            Ok(composite) => return Self::from(*composite),
            Err(error) => error,
        };
        match error.downcast::<StatusError>() {
            Ok(status) => Self::from(*status),
            Err(error) => Self::new(ErrorRepr::Custom(error)),
        }
    }

    /// Create a new error from a message and the errors that caused it.
    ///
    /// The message is expected to already describe the causes, the way
    /// `format!("reading config: {err}")` does. This is the building block of
    /// [`Error::compose`]; it never adds a classification.
    #[must_use]
    pub fn message(message: impl Into<String>, causes: Vec<Error>) -> Self {
        Self::new(ErrorRepr::Message {
            message: message.into(),
            causes,
        })
    }

    /// Join several errors into one without adding a message.
    ///
    /// See [`CompositeError`].
    #[must_use]
    pub fn join(causes: impl IntoIterator<Item = Error>) -> Self {
        Self::from(CompositeError::new(causes))
    }

    /// Create a classified error from a message and its causes.
    ///
    /// The returned error wraps every cause. If none of the causes already
    /// carries a [`StatusError`] anywhere in its chain, `status` is joined in
    /// as an additional, last cause; otherwise the existing classification
    /// takes precedence and `status` is dropped.
    ///
    /// Most code should use the [`errorf!`](crate::errorf) macro instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsrest::{Error, StatusError};
    ///
    /// let inner = Error::compose(StatusError::NOT_FOUND, "no such user", Vec::new());
    /// let outer = Error::compose(
    ///     StatusError::BAD_GATEWAY,
    ///     "lookup failed: no such user",
    ///     vec![inner],
    /// );
    ///
    /// assert_eq!(outer.status_error(), Some(StatusError::NOT_FOUND));
    /// ```
    #[must_use]
    pub fn compose(status: StatusError, message: impl Into<String>, causes: Vec<Error>) -> Self {
        Self::classify(Self::message(message, causes), status)
    }

    /// Associate `status` with an existing error.
    ///
    /// This is the same as [`Error::compose`] without a new message: the
    /// error keeps its own text and is joined with `status` unless it already
    /// contains a classification. An `error` that is already an [`Error`] is
    /// used as is, see [`Error::custom`].
    ///
    /// # Examples
    ///
    /// ```
    /// use jsrest::{Error, StatusCode, StatusError};
    ///
    /// let error = Error::with_status("Invalid input", StatusError::BAD_REQUEST);
    /// assert_eq!(error.to_string(), "Invalid input");
    /// assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    /// ```
    #[must_use]
    pub fn with_status<E>(error: E, status: StatusError) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync + 'static>>,
    {
        Self::classify(Self::custom(error), status)
    }

    fn classify(error: Self, status: StatusError) -> Self {
        if error.status_error().is_some() {
            return error;
        }

        Self::join([error, Self::from(status)])
    }

    /// Returns the first [`StatusError`] found in the chain.
    ///
    /// Nodes are visited depth-first, each node before its causes and causes
    /// in the order they were supplied.
    #[must_use]
    pub fn status_error(&self) -> Option<StatusError> {
        self.find::<StatusError>().copied()
    }

    /// Returns the HTTP status code this error should be reported with.
    ///
    /// This is the code of [`Error::status_error`], or 500 Internal Server
    /// Error if the chain carries no classification.
    #[must_use]
    pub fn status_code(&self) -> http::StatusCode {
        crate::resolve_status(self)
    }

    /// Iterates over every node of the chain in pre-order.
    ///
    /// The first item is `self`. Opaque errors are followed through
    /// `source()`; message and composite nodes through all of their causes.
    pub fn chain(&self) -> Chain<'_> {
        Chain::new(self)
    }

    /// Returns the first error of type `E` found in the chain.
    ///
    /// This looks through every node, including the errors wrapped by
    /// [`Error::custom`] and their sources.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsrest::{Error, StatusError, errorf};
    ///
    /// let io = std::io::Error::other("disk on fire");
    /// let error = errorf!(StatusError::INSUFFICIENT_STORAGE, [Error::custom(io)], "write failed");
    ///
    /// assert!(error.find::<std::io::Error>().is_some());
    /// ```
    #[must_use]
    pub fn find<E>(&self) -> Option<&E>
    where
        E: StdError + 'static,
    {
        self.chain().find_map(downcast_node::<E>)
    }

    /// Returns `true` if an error equal to `target` is present in the chain.
    ///
    /// This is the way to check an error against the [`StatusError`]
    /// sentinels.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsrest::{StatusError, errorf};
    ///
    /// let error = errorf!(StatusError::CONFLICT, "revision mismatch");
    /// assert!(error.is(&StatusError::CONFLICT));
    /// assert!(!error.is(&StatusError::NOT_FOUND));
    /// ```
    #[must_use]
    pub fn is<E>(&self, target: &E) -> bool
    where
        E: StdError + PartialEq + 'static,
    {
        self.chain()
            .filter_map(downcast_node::<E>)
            .any(|error| error == target)
    }

    pub(crate) fn repr(&self) -> &ErrorRepr {
        &self.repr
    }

    pub(crate) fn unwrap_causes(&self) -> Unwrap<'_> {
        match self.repr.as_ref() {
            ErrorRepr::Status(_) => Unwrap::Leaf,
            ErrorRepr::Composite(composite) => Unwrap::Multi(composite.causes()),
            ErrorRepr::Message { causes, .. } => match causes.as_slice() {
                [] => Unwrap::Leaf,
                [cause] => Unwrap::Single(cause),
                causes => Unwrap::Multi(causes),
            },
            ErrorRepr::Custom(inner) => inner.source().map_or(Unwrap::Leaf, Unwrap::Single),
        }
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.repr, f)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.repr.as_ref() {
            ErrorRepr::Status(status) => Display::fmt(status, f),
            ErrorRepr::Composite(composite) => Display::fmt(composite, f),
            ErrorRepr::Message { message, .. } => f.write_str(message),
            ErrorRepr::Custom(inner) => Display::fmt(inner, f),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self.unwrap_causes() {
            Unwrap::Leaf => None,
            Unwrap::Single(cause) => Some(cause),
            Unwrap::Multi(causes) => causes
                .first()
                .map(|cause| -> &(dyn StdError + 'static) { cause }),
        }
    }
}

impl From<StatusError> for Error {
    fn from(status: StatusError) -> Self {
        Self::new(ErrorRepr::Status(status))
    }
}

impl From<CompositeError> for Error {
    fn from(composite: CompositeError) -> Self {
        Self::new(ErrorRepr::Composite(composite))
    }
}

/// Several errors that occurred together.
///
/// A composite is transparent: it has no message of its own and is skipped
/// when an error is flattened into a response, only its causes are reported.
/// Displaying a composite displays its first cause, and a composite with no
/// causes at all displays as an empty string.
///
/// # Examples
///
/// ```
/// use jsrest::{CompositeError, Error, StatusError};
///
/// let composite = CompositeError::new([
///     Error::custom("connection reset"),
///     Error::from(StatusError::BAD_GATEWAY),
/// ]);
///
/// assert_eq!(composite.to_string(), "connection reset");
/// assert_eq!(composite.causes().len(), 2);
/// ```
#[derive(Debug)]
pub struct CompositeError {
    causes: Vec<Error>,
}

impl CompositeError {
    /// Creates a composite of the given causes, kept in order.
    #[must_use]
    pub fn new(causes: impl IntoIterator<Item = Error>) -> Self {
        Self {
            causes: causes.into_iter().collect(),
        }
    }

    /// Returns the joined causes.
    #[must_use]
    pub fn causes(&self) -> &[Error] {
        &self.causes
    }

    /// Consumes the composite, returning the joined causes.
    #[must_use]
    pub fn into_causes(self) -> Vec<Error> {
        self.causes
    }
}

impl Display for CompositeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.causes.first() {
            Some(cause) => Display::fmt(cause, f),
            None => Ok(()),
        }
    }
}

impl StdError for CompositeError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.causes
            .first()
            .map(|cause| -> &(dyn StdError + 'static) { cause })
    }
}

/// Create a classified [`Error`] from a format string and wrapped causes.
///
/// The first argument is the [`StatusError`] used when none of the causes is
/// already classified. An optional bracketed list of causes follows; each is
/// converted with [`Error::from`] and wrapped by the new error. The remaining
/// arguments are passed to [`format!`]. The message is formatted before the
/// causes are moved, so the format arguments may refer to the causes.
///
/// # Examples
///
/// ```
/// use jsrest::{Error, StatusCode, StatusError, errorf};
///
/// let cause = Error::custom("error 1");
/// let error = errorf!(StatusError::BAD_GATEWAY, [cause], "error 2: {}", cause);
///
/// assert_eq!(error.to_string(), "error 2: error 1");
/// assert_eq!(error.status_code(), StatusCode::BAD_GATEWAY);
///
/// let content_type = "text/plain";
/// let error = errorf!(StatusError::UNSUPPORTED_MEDIA_TYPE, "Content-Type: {content_type}");
/// assert_eq!(error.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
/// ```
#[macro_export]
macro_rules! errorf {
    ($status:expr, [$($cause:expr),* $(,)?], $($arg:tt)+) => {{
        let message = ::std::format!($($arg)+);
        let causes: ::std::vec::Vec<$crate::Error> = ::std::vec![$($crate::Error::from($cause)),*];
        $crate::Error::compose($status, message, causes)
    }};
    ($status:expr, $($arg:tt)+) => {
        $crate::Error::compose($status, ::std::format!($($arg)+), ::std::vec::Vec::new())
    };
}

/// Implement `From<T> for jsrest::Error`, optionally classifying the error.
///
/// Without a status the error is wrapped with [`Error::custom`]; with one it is
/// wrapped with [`Error::with_status`] and the given [`StatusError`] constant.
///
/// # Examples
///
/// ```
/// use jsrest::{Error, StatusCode, impl_into_jsrest_error};
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("page {0} does not exist")]
/// struct PageNotFound(u32);
/// impl_into_jsrest_error!(PageNotFound, NOT_FOUND);
///
/// let error = Error::from(PageNotFound(3));
/// assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
/// ```
#[macro_export]
macro_rules! impl_into_jsrest_error {
    ($error_ty:ty) => {
        impl From<$error_ty> for $crate::Error {
            fn from(err: $error_ty) -> Self {
                $crate::Error::custom(err)
            }
        }
    };
    ($error_ty:ty, $status:ident) => {
        impl From<$error_ty> for $crate::Error {
            fn from(err: $error_ty) -> Self {
                $crate::Error::with_status(err, $crate::StatusError::$status)
            }
        }
    };
}
pub use impl_into_jsrest_error;
