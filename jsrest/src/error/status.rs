use std::hash::{Hash, Hasher};

use derive_more::Display;

use crate::StatusCode;

/// An error carrying a definite HTTP status code and its reason phrase.
///
/// A `StatusError` is the classification part of an error chain: when an
/// [`Error`](crate::Error) is turned into a response, the status line is taken
/// from the `StatusError` found in the chain. One pre-built value exists for
/// every standard client and server error status, e.g.
/// [`StatusError::NOT_FOUND`].
///
/// Two status errors are equal when their codes are equal.
///
/// # Examples
///
/// ```
/// use jsrest::{StatusCode, StatusError};
///
/// let error = StatusError::new(StatusCode::BAD_GATEWAY);
/// assert_eq!(error, StatusError::BAD_GATEWAY);
/// assert_eq!(error.to_string(), "[502] Bad Gateway");
/// ```
#[derive(Debug, Copy, Clone, Eq, Display)]
#[display("[{code}] {message}")]
pub struct StatusError {
    code: u16,
    message: &'static str,
}

impl StatusError {
    /// Reason phrase used for status codes without a registered one.
    pub const UNASSIGNED_REASON: &'static str = "Unassigned Status";

    /// Creates a status error for `code` with its standard reason phrase.
    ///
    /// Codes without a registered reason phrase get
    /// [`StatusError::UNASSIGNED_REASON`].
    ///
    /// # Examples
    ///
    /// ```
    /// use jsrest::{StatusCode, StatusError};
    ///
    /// let error = StatusError::new(StatusCode::from_u16(599).unwrap());
    /// assert_eq!(error.to_string(), "[599] Unassigned Status");
    /// ```
    #[must_use]
    pub fn new(code: StatusCode) -> Self {
        if let Some(sentinel) = Self::ALL.iter().find(|error| error.code == code.as_u16()) {
            return *sentinel;
        }

        Self {
            code: code.as_u16(),
            message: code.canonical_reason().unwrap_or(Self::UNASSIGNED_REASON),
        }
    }

    /// Returns the numeric status code.
    #[must_use]
    pub const fn code(&self) -> u16 {
        self.code
    }

    /// Returns the status code as an [`http::StatusCode`].
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Returns the reason phrase.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        self.message
    }
}

impl PartialEq for StatusError {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Hash for StatusError {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl std::error::Error for StatusError {}

impl From<StatusCode> for StatusError {
    fn from(code: StatusCode) -> Self {
        Self::new(code)
    }
}

macro_rules! status_errors {
    (
        $(
            $(#[$docs:meta])*
            ($name:ident, $code:literal, $reason:literal);
        )+
    ) => {
        impl StatusError {
            $(
                $(#[$docs])*
                pub const $name: StatusError = StatusError {
                    code: $code,
                    message: $reason,
                };
            )+

            /// Every pre-built status error, in ascending code order.
            pub const ALL: &'static [StatusError] = &[$(Self::$name),+];
        }
    };
}

status_errors! {
    /// 400 Bad Request
    (BAD_REQUEST, 400, "Bad Request");
    /// 401 Unauthorized
    (UNAUTHORIZED, 401, "Unauthorized");
    /// 402 Payment Required
    (PAYMENT_REQUIRED, 402, "Payment Required");
    /// 403 Forbidden
    (FORBIDDEN, 403, "Forbidden");
    /// 404 Not Found
    (NOT_FOUND, 404, "Not Found");
    /// 405 Method Not Allowed
    (METHOD_NOT_ALLOWED, 405, "Method Not Allowed");
    /// 406 Not Acceptable
    (NOT_ACCEPTABLE, 406, "Not Acceptable");
    /// 407 Proxy Authentication Required
    (PROXY_AUTHENTICATION_REQUIRED, 407, "Proxy Authentication Required");
    /// 408 Request Timeout
    (REQUEST_TIMEOUT, 408, "Request Timeout");
    /// 409 Conflict
    (CONFLICT, 409, "Conflict");
    /// 410 Gone
    (GONE, 410, "Gone");
    /// 411 Length Required
    (LENGTH_REQUIRED, 411, "Length Required");
    /// 412 Precondition Failed
    (PRECONDITION_FAILED, 412, "Precondition Failed");
    /// 413 Payload Too Large
    (PAYLOAD_TOO_LARGE, 413, "Payload Too Large");
    /// 414 URI Too Long
    (URI_TOO_LONG, 414, "URI Too Long");
    /// 415 Unsupported Media Type
    (UNSUPPORTED_MEDIA_TYPE, 415, "Unsupported Media Type");
    /// 416 Range Not Satisfiable
    (RANGE_NOT_SATISFIABLE, 416, "Range Not Satisfiable");
    /// 417 Expectation Failed
    (EXPECTATION_FAILED, 417, "Expectation Failed");
    /// 418 I'm a teapot
    (IM_A_TEAPOT, 418, "I'm a teapot");
    /// 421 Misdirected Request
    (MISDIRECTED_REQUEST, 421, "Misdirected Request");
    /// 422 Unprocessable Entity
    (UNPROCESSABLE_ENTITY, 422, "Unprocessable Entity");
    /// 423 Locked
    (LOCKED, 423, "Locked");
    /// 424 Failed Dependency
    (FAILED_DEPENDENCY, 424, "Failed Dependency");
    /// 425 Too Early
    (TOO_EARLY, 425, "Too Early");
    /// 426 Upgrade Required
    (UPGRADE_REQUIRED, 426, "Upgrade Required");
    /// 428 Precondition Required
    (PRECONDITION_REQUIRED, 428, "Precondition Required");
    /// 429 Too Many Requests
    (TOO_MANY_REQUESTS, 429, "Too Many Requests");
    /// 431 Request Header Fields Too Large
    (REQUEST_HEADER_FIELDS_TOO_LARGE, 431, "Request Header Fields Too Large");
    /// 451 Unavailable For Legal Reasons
    (UNAVAILABLE_FOR_LEGAL_REASONS, 451, "Unavailable For Legal Reasons");

    /// 500 Internal Server Error
    (INTERNAL_SERVER_ERROR, 500, "Internal Server Error");
    /// 501 Not Implemented
    (NOT_IMPLEMENTED, 501, "Not Implemented");
    /// 502 Bad Gateway
    (BAD_GATEWAY, 502, "Bad Gateway");
    /// 503 Service Unavailable
    (SERVICE_UNAVAILABLE, 503, "Service Unavailable");
    /// 504 Gateway Timeout
    (GATEWAY_TIMEOUT, 504, "Gateway Timeout");
    /// 505 HTTP Version Not Supported
    (HTTP_VERSION_NOT_SUPPORTED, 505, "HTTP Version Not Supported");
    /// 506 Variant Also Negotiates
    (VARIANT_ALSO_NEGOTIATES, 506, "Variant Also Negotiates");
    /// 507 Insufficient Storage
    (INSUFFICIENT_STORAGE, 507, "Insufficient Storage");
    /// 508 Loop Detected
    (LOOP_DETECTED, 508, "Loop Detected");
    /// 510 Not Extended
    (NOT_EXTENDED, 510, "Not Extended");
    /// 511 Network Authentication Required
    (NETWORK_AUTHENTICATION_REQUIRED, 511, "Network Authentication Required");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_display() {
        assert_eq!(StatusError::BAD_GATEWAY.to_string(), "[502] Bad Gateway");
        assert_eq!(StatusError::FORBIDDEN.to_string(), "[403] Forbidden");
        assert_eq!(StatusError::IM_A_TEAPOT.to_string(), "[418] I'm a teapot");
    }

    #[test]
    fn status_error_new_uses_sentinel() {
        let error = StatusError::new(StatusCode::NOT_FOUND);

        assert_eq!(error, StatusError::NOT_FOUND);
        assert_eq!(error.message(), "Not Found");
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn status_error_new_outside_registry() {
        let error = StatusError::new(StatusCode::OK);
        assert_eq!(error.code(), 200);
        assert_eq!(error.message(), "OK");

        let error = StatusError::new(StatusCode::from_u16(599).unwrap());
        assert_eq!(error.code(), 599);
        assert_eq!(error.message(), StatusError::UNASSIGNED_REASON);
    }

    #[test]
    fn status_error_registry_sorted_and_unique() {
        assert_eq!(StatusError::ALL.len(), 40);
        assert!(StatusError::ALL.windows(2).all(|w| w[0].code < w[1].code));
        assert!(
            StatusError::ALL
                .iter()
                .all(|error| (400..600).contains(&error.code) && !error.message.is_empty())
        );
    }

    #[test]
    fn status_error_equality_ignores_reason() {
        let custom = StatusError {
            code: 404,
            message: "Nothing Here",
        };

        assert_eq!(custom, StatusError::NOT_FOUND);
        assert_ne!(StatusError::NOT_FOUND, StatusError::GONE);
    }
}
