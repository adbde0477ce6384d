//! Uniform HTTP status errors and JSON codecs for REST services.
//!
//! This crate provides the error model shared by JSON REST services and their
//! clients: a [`StatusError`] for every standard HTTP status, an [`Error`]
//! chain type that keeps track of which status a failure should be reported
//! with, and the codecs that turn requests into typed values and values (or
//! errors) into JSON responses.
//!
//! Errors are usually built with the [`errorf!`] macro, which attaches a
//! status unless a more specific one is already present in the wrapped causes:
//!
//! ```
//! use jsrest::{StatusError, errorf, flatten};
//!
//! let forbidden = errorf!(StatusError::FORBIDDEN, "user may not edit this page");
//! let error = errorf!(
//!     StatusError::BAD_GATEWAY,
//!     [forbidden],
//!     "update failed: {}",
//!     "user may not edit this page"
//! );
//!
//! let wire = flatten(&error);
//! assert_eq!(wire.code, jsrest::StatusCode::FORBIDDEN);
//! assert_eq!(wire.messages[0], "update failed: user may not edit this page");
//! ```

pub mod error;
pub mod headers;
pub mod json;
#[cfg(feature = "client")]
pub mod remote;
mod wire;

pub use error::{CompositeError, Error, StatusError};
#[cfg(feature = "client")]
pub use remote::{RemoteError, read_error, read_error_parts};
pub use wire::{WireError, flatten, resolve_status};

/// A type alias for an HTTP status code.
pub type StatusCode = http::StatusCode;

/// A type alias for a result that can return an [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
