//! Error types and utilities for classifying failures with HTTP statuses.
//!
//! This module provides the [`StatusError`] sentinels, the [`Error`] chain
//! type, the transparent [`CompositeError`] join and the chain walk used to
//! find classifications inside arbitrarily nested causes.

pub(crate) mod chain;
pub(crate) mod error_impl;
mod status;

pub use chain::Chain;
pub use error_impl::{CompositeError, Error, impl_into_jsrest_error};
pub use status::StatusError;
