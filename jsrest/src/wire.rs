use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::chain::{downcast_node, is_composite};
use crate::{Error, StatusCode, StatusError};

/// The JSON error body sent to clients.
///
/// A `WireError` is the flattened projection of an [`Error`] chain, created
/// with [`flatten`]. Only the messages are serialized; the code is sent on the
/// status line:
///
/// ```json
/// {"messages": ["update failed: no such page", "no such page", "[404] Not Found"]}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireError {
    /// The HTTP status code of the response.
    #[serde(skip, default = "default_code")]
    pub code: StatusCode,
    /// Messages of every node of the error chain, outermost first.
    #[serde(default, deserialize_with = "nullable_messages")]
    pub messages: Vec<String>,
}

fn default_code() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

// `null` is read as no messages
fn nullable_messages<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl WireError {
    /// Message displayed for a wire error without any messages.
    pub const NO_MESSAGE: &'static str = "no error message";

    /// Creates a wire error from a status code and messages.
    #[must_use]
    pub fn new(code: StatusCode, messages: Vec<String>) -> Self {
        Self { code, messages }
    }
}

impl Display for WireError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.messages.first().map_or(Self::NO_MESSAGE, String::as_str))
    }
}

impl From<&Error> for WireError {
    fn from(error: &Error) -> Self {
        flatten(error)
    }
}

/// Returns the status code an error should be reported with.
///
/// This is the code of the first [`StatusError`] met in a depth-first walk of
/// the chain, where a node is checked before its causes and the causes of a
/// node in the order they were supplied. An error without any classification
/// resolves to 500 Internal Server Error.
///
/// # Examples
///
/// ```
/// use jsrest::{Error, StatusCode, StatusError, errorf, resolve_status};
///
/// assert_eq!(resolve_status(&Error::custom("oops")), StatusCode::INTERNAL_SERVER_ERROR);
///
/// let error = errorf!(StatusError::NOT_FOUND, "no such page");
/// assert_eq!(resolve_status(&error), StatusCode::NOT_FOUND);
/// ```
#[must_use]
pub fn resolve_status(error: &Error) -> StatusCode {
    error
        .status_error()
        .map_or(StatusCode::INTERNAL_SERVER_ERROR, |status| status.status_code())
}

/// Flattens an error chain into its wire representation.
///
/// The chain is walked in pre-order: a node before its causes, the causes of
/// a multi-cause node left to right. Every node except a [`CompositeError`]
/// contributes its own message. The code is taken from the last
/// [`StatusError`] visited, or is 500 Internal Server Error when there is
/// none.
///
/// For chains built with [`errorf!`](crate::errorf) only the innermost
/// classification is present, so the code agrees with [`resolve_status`].
///
/// [`CompositeError`]: crate::CompositeError
///
/// # Examples
///
/// ```
/// use jsrest::{Error, StatusCode, StatusError, errorf, flatten};
///
/// let cause = Error::custom("error 1");
/// let error = errorf!(StatusError::BAD_GATEWAY, [cause], "error 2: {}", cause);
///
/// let wire = flatten(&error);
/// assert_eq!(wire.code, StatusCode::BAD_GATEWAY);
/// assert_eq!(
///     wire.messages,
///     ["error 2: error 1", "error 1", "[502] Bad Gateway"]
/// );
/// ```
#[must_use]
pub fn flatten(error: &Error) -> WireError {
    let mut wire = WireError::new(StatusCode::INTERNAL_SERVER_ERROR, Vec::new());

    for node in error.chain() {
        if let Some(status) = downcast_node::<StatusError>(node) {
            wire.code = status.status_code();
        }
        if !is_composite(node) {
            wire.messages.push(node.to_string());
        }
    }

    wire
}
