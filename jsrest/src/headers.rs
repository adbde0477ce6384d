//! HTTP header values and helpers used by the JSON codecs.
//!
//! This module provides the content type constants, `Content-Type` parsing
//! and entity tag formatting.

use http::{HeaderMap, HeaderValue};
use mime::Mime;

use crate::error::impl_into_jsrest_error;

/// The `Content-Type` of JSON request and response bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Returns the media type of the request's `Content-Type` header.
///
/// Parameters such as `charset` are stripped, so `application/json;
/// charset=utf-8` yields `application/json`. Returns `Ok(None)` if the header
/// is absent.
///
/// # Errors
///
/// Returns [`InvalidContentType`] if the header is not a valid media type.
///
/// # Examples
///
/// ```
/// use http::HeaderMap;
/// use jsrest::headers::media_type;
///
/// let mut headers = HeaderMap::new();
/// assert_eq!(media_type(&headers).unwrap(), None);
///
/// headers.insert(http::header::CONTENT_TYPE, "application/json; charset=utf-8".parse().unwrap());
/// assert_eq!(media_type(&headers).unwrap(), Some(mime::APPLICATION_JSON));
/// ```
pub fn media_type(headers: &HeaderMap) -> Result<Option<Mime>, InvalidContentType> {
    let Some(value) = headers.get(http::header::CONTENT_TYPE) else {
        return Ok(None);
    };

    let invalid = || InvalidContentType {
        value: String::from_utf8_lossy(value.as_bytes()).into_owned(),
    };
    let mime: Mime = value
        .to_str()
        .map_err(|_| invalid())?
        .parse()
        .map_err(|_| invalid())?;

    Ok(Some(mime.essence_str().parse().map_err(|_| invalid())?))
}

/// A `Content-Type` header value that could not be parsed as a media type.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid content type `{value}`")]
pub struct InvalidContentType {
    pub value: String,
}
impl_into_jsrest_error!(InvalidContentType, UNSUPPORTED_MEDIA_TYPE);

/// Formats `opaque` as a strong entity tag header value.
///
/// The opaque tag is quoted, so `abc` becomes `"abc"`.
///
/// # Errors
///
/// Returns [`InvalidEntityTag`] if the tag contains a double quote, a
/// whitespace or control character, or anything else not allowed in an entity
/// tag.
///
/// # Examples
///
/// ```
/// use jsrest::headers::entity_tag;
///
/// assert_eq!(entity_tag("r-17").unwrap(), "\"r-17\"");
/// assert!(entity_tag("two words").is_err());
/// ```
pub fn entity_tag(opaque: &str) -> Result<HeaderValue, InvalidEntityTag> {
    let valid = opaque
        .bytes()
        .all(|byte| byte == 0x21 || (0x23..=0x7e).contains(&byte) || byte >= 0x80);
    if !valid {
        return Err(InvalidEntityTag {
            opaque: opaque.to_owned(),
        });
    }

    HeaderValue::from_str(&format!("\"{opaque}\"")).map_err(|_| InvalidEntityTag {
        opaque: opaque.to_owned(),
    })
}

/// An opaque tag that cannot be sent as an entity tag.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid entity tag `{opaque}`")]
pub struct InvalidEntityTag {
    pub opaque: String,
}
impl_into_jsrest_error!(InvalidEntityTag, INTERNAL_SERVER_ERROR);

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::CONTENT_TYPE,
            HeaderValue::from_str(content_type).unwrap(),
        );
        headers
    }

    #[test]
    fn media_type_absent() {
        assert!(media_type(&HeaderMap::new()).unwrap().is_none());
    }

    #[test]
    fn media_type_strips_parameters() {
        let headers = headers_with("application/json; charset=utf-8");

        assert_eq!(media_type(&headers).unwrap(), Some(mime::APPLICATION_JSON));
    }

    #[test]
    fn media_type_other() {
        let headers = headers_with("text/plain");

        assert_eq!(media_type(&headers).unwrap(), Some(mime::TEXT_PLAIN));
    }

    #[test]
    fn media_type_invalid() {
        let headers = headers_with("not a media type");

        let error = media_type(&headers).unwrap_err();
        assert_eq!(error.value, "not a media type");
    }

    #[test]
    fn entity_tag_quotes() {
        assert_eq!(entity_tag("abc").unwrap(), "\"abc\"");
        assert_eq!(entity_tag("").unwrap(), "\"\"");
    }

    #[test]
    fn entity_tag_rejects_quotes_and_spaces() {
        assert!(entity_tag("a\"b").is_err());
        assert!(entity_tag("a b").is_err());
        assert!(entity_tag("a\nb").is_err());
    }
}
