//! Reading JSON error bodies returned by other services.
//!
//! A service using this crate answers failed requests with a
//! [`WireError`] body. [`read_error`] turns such a response back into an
//! [`Error`] whose messages can be inspected, logged or wrapped into the
//! caller's own errors.

use std::error::Error as StdError;
use std::fmt::Display;

use tracing::debug;

use crate::{Error, StatusCode, StatusError, WireError};

/// An error received from a remote service.
///
/// Each `RemoteError` holds one message of the received body; its
/// [`source`](StdError::source) holds the next one. Walking the sources
/// therefore yields the messages in the order the remote service reported
/// them.
///
/// # Examples
///
/// ```
/// use std::error::Error as _;
///
/// use jsrest::{RemoteError, StatusCode, WireError};
///
/// let wire = WireError::new(
///     StatusCode::NOT_FOUND,
///     vec!["no such page".to_owned(), "[404] Not Found".to_owned()],
/// );
/// let error = RemoteError::from(wire);
///
/// assert_eq!(error.to_string(), "no such page");
/// assert_eq!(error.source().unwrap().to_string(), "[404] Not Found");
/// assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    code: StatusCode,
    message: String,
    source: Option<Box<RemoteError>>,
}

impl RemoteError {
    /// Returns the status code of the response the error was received with.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        self.code
    }

    /// Returns this node's message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the messages of this node and all of its sources, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<&str> {
        let mut messages = vec![self.message.as_str()];
        let mut next = self.source.as_deref();
        while let Some(error) = next {
            messages.push(&error.message);
            next = error.source.as_deref();
        }
        messages
    }
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for RemoteError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|source| -> &(dyn StdError + 'static) { source })
    }
}

impl From<WireError> for RemoteError {
    fn from(wire: WireError) -> Self {
        let code = wire.code;
        let mut messages = wire.messages.into_iter().rev();
        let Some(last) = messages.next() else {
            return Self {
                code,
                message: WireError::NO_MESSAGE.to_owned(),
                source: None,
            };
        };

        messages.fold(
            Self {
                code,
                message: last,
                source: None,
            },
            |source, message| Self {
                code,
                message,
                source: Some(Box::new(source)),
            },
        )
    }
}

impl From<RemoteError> for Error {
    fn from(error: RemoteError) -> Self {
        Error::custom(error)
    }
}

/// Reads the error returned by another service.
///
/// If the body of `response` is a JSON error body, the result wraps a
/// [`RemoteError`] carrying its messages and the response status. Otherwise
/// the result is a bare [`StatusError`] for the response status.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use jsrest::{RemoteError, StatusCode, read_error};
///
/// let response = http::Response::builder()
///     .status(StatusCode::CONFLICT)
///     .body(Bytes::from_static(br#"{"messages":["revision mismatch","[409] Conflict"]}"#))
///     .unwrap();
///
/// let error = read_error(&response);
/// assert_eq!(error.to_string(), "revision mismatch");
/// assert_eq!(error.find::<RemoteError>().unwrap().status_code(), StatusCode::CONFLICT);
/// ```
#[must_use]
pub fn read_error<B>(response: &http::Response<B>) -> Error
where
    B: AsRef<[u8]>,
{
    read_error_parts(response.status(), response.body().as_ref())
}

/// Reads the error returned by another service from its status and body.
///
/// See [`read_error`].
#[must_use]
pub fn read_error_parts(status: StatusCode, body: &[u8]) -> Error {
    match serde_json::from_slice::<Option<WireError>>(body) {
        Ok(wire) => {
            let mut wire = wire.unwrap_or_else(|| WireError::new(status, Vec::new()));
            wire.code = status;
            Error::from(RemoteError::from(wire))
        }
        Err(error) => {
            debug!(%status, %error, "Remote error body is not a JSON error; using the status only");
            Error::from(StatusError::new(status))
        }
    }
}
