//! JSON request and response codecs.
//!
//! This module reads JSON request bodies into typed values and writes values,
//! lists and errors as JSON responses. Every failure is reported as an
//! [`Error`] classified with the status the client should see: 415 for an
//! unsupported `Content-Type`, 400 for a body that cannot be read or decoded
//! and 500 for a response that cannot be encoded.

use std::borrow::Cow;
use std::error::Error as StdError;

use bytes::Bytes;
use http::HeaderValue;
use http_body_util::BodyExt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::impl_into_jsrest_error;
use crate::headers::{JSON_CONTENT_TYPE, entity_tag, media_type};
use crate::{Error, Result, StatusError, errorf, flatten};

/// A value that carries a revision tag.
///
/// The tag is sent as the strong entity tag (`ETag` header) of responses
/// written with [`write_json`]. Its format and versioning policy are up to the
/// implementor, but it must only contain characters allowed in an entity tag
/// (visible ASCII except `"`).
///
/// # Examples
///
/// ```
/// use std::borrow::Cow;
///
/// use jsrest::json::EntityTagged;
///
/// struct Page {
///     revision: u64,
/// }
///
/// impl EntityTagged for Page {
///     fn etag(&self) -> Cow<'_, str> {
///         Cow::Owned(format!("rev-{}", self.revision))
///     }
/// }
/// ```
pub trait EntityTagged {
    /// Returns the opaque revision tag of this value.
    fn etag(&self) -> Cow<'_, str>;
}

impl<T: EntityTagged + ?Sized> EntityTagged for &T {
    fn etag(&self) -> Cow<'_, str> {
        (**self).etag()
    }
}

/// Decodes a JSON request body.
///
/// The `Content-Type` header must be absent or have the media type
/// `application/json`; parameters such as `charset` are ignored. The body
/// must contain a JSON value matching `T`. Object fields that `T` doesn't
/// know are rejected, whether or not `T` is declared with
/// `#[serde(deny_unknown_fields)]`.
///
/// # Errors
///
/// Returns a 415 Unsupported Media Type error if the content type is not
/// JSON, and a 400 Bad Request error if the body can't be decoded into `T`
/// (including when it is empty).
///
/// # Examples
///
/// ```
/// use http::HeaderMap;
/// use jsrest::json::decode_json;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct NewPage {
///     title: String,
/// }
///
/// let page: NewPage = decode_json(&HeaderMap::new(), br#"{"title":"Home"}"#).unwrap();
/// assert_eq!(page.title, "Home");
///
/// let extra = decode_json::<NewPage>(&HeaderMap::new(), br#"{"title":"Home","x":1}"#);
/// assert!(extra.is_err());
/// ```
pub fn decode_json<T>(headers: &http::HeaderMap, body: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    check_content_type(headers)?;
    decode_body(body)
}

/// Reads and decodes a JSON request.
///
/// The content type is checked before the body is read; the whole body is
/// then collected and decoded as in [`decode_json`].
///
/// # Errors
///
/// Returns a 415 Unsupported Media Type error if the content type is not
/// JSON, and a 400 Bad Request error if the body can't be read or decoded.
pub async fn read_json<T, B>(request: http::Request<B>) -> Result<T>
where
    T: DeserializeOwned,
    B: http_body::Body,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    let (head, body) = request.into_parts();
    check_content_type(&head.headers)?;

    let bytes = body
        .collect()
        .await
        .map_err(|error| {
            let error = ReadBodyError(error.into());
            errorf!(
                StatusError::BAD_REQUEST,
                [error],
                "read request body failed ({error})"
            )
        })?
        .to_bytes();

    decode_body(&bytes)
}

fn check_content_type(headers: &http::HeaderMap) -> Result<()> {
    match media_type(headers) {
        Ok(None) => Ok(()),
        Ok(Some(received)) if received == mime::APPLICATION_JSON => Ok(()),
        Ok(Some(received)) => {
            debug!(media_type = %received, "Rejecting request with unsupported content type");
            Err(errorf!(
                StatusError::UNSUPPORTED_MEDIA_TYPE,
                "Content-Type: {received}"
            ))
        }
        Err(invalid) => {
            debug!(content_type = %invalid.value, "Rejecting request with invalid content type");
            Err(errorf!(
                StatusError::UNSUPPORTED_MEDIA_TYPE,
                [invalid],
                "Content-Type: {}",
                invalid.value
            ))
        }
    }
}

fn decode_body<T>(body: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let mut json = serde_json::Deserializer::from_slice(body);
    let mut unknown = Vec::new();
    let mut track_unknown = |path: serde_ignored::Path<'_>| unknown.push(path.to_string());
    let deserializer = serde_ignored::Deserializer::new(&mut json, &mut track_unknown);

    let value = serde_path_to_error::deserialize(deserializer).map_err(|error| {
        debug!(%error, "Rejecting request with undecodable JSON body");
        let error = JsonDeserializeError(error);
        errorf!(
            StatusError::BAD_REQUEST,
            [error],
            "decode JSON request body failed ({error})"
        )
    })?;

    if unknown.is_empty() {
        return Ok(value);
    }

    debug!(fields = ?unknown, "Rejecting request with unknown JSON fields");
    let error = UnknownFieldsError(unknown);
    Err(errorf!(
        StatusError::BAD_REQUEST,
        [error],
        "decode JSON request body failed ({error})"
    ))
}

/// Writes `value` as the JSON body of `response`.
///
/// Sets `Content-Type: application/json` and an `ETag` header built from the
/// value's [`EntityTagged::etag`]. The value is encoded before anything is
/// written, so on error the response is left as it was.
///
/// # Errors
///
/// Returns a 500 Internal Server Error error if the value can't be encoded or
/// its tag is not a valid entity tag.
///
/// # Examples
///
/// ```
/// use std::borrow::Cow;
///
/// use bytes::Bytes;
/// use jsrest::json::{EntityTagged, write_json};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Page {
///     title: String,
/// }
///
/// impl EntityTagged for Page {
///     fn etag(&self) -> Cow<'_, str> {
///         Cow::Borrowed("v1")
///     }
/// }
///
/// let mut response = http::Response::new(Bytes::new());
/// write_json(&mut response, &Page { title: "Home".to_owned() }).unwrap();
///
/// assert_eq!(response.headers()[http::header::ETAG], "\"v1\"");
/// assert_eq!(response.body(), r#"{"title":"Home"}"#);
/// ```
pub fn write_json<T, B>(response: &mut http::Response<B>, value: &T) -> Result<()>
where
    T: Serialize + EntityTagged + ?Sized,
    B: From<Bytes>,
{
    let etag = value.etag();
    write_json_body(response, value, &etag)
}

/// Writes `values` as a JSON array body of `response`.
///
/// Same as [`write_json`], except that the entity tag of the list is given
/// explicitly.
///
/// # Errors
///
/// Returns a 500 Internal Server Error error if the values can't be encoded
/// or `etag` is not a valid entity tag.
pub fn write_json_list<T, B>(
    response: &mut http::Response<B>,
    values: &[T],
    etag: &str,
) -> Result<()>
where
    T: Serialize,
    B: From<Bytes>,
{
    write_json_body(response, values, etag)
}

fn write_json_body<T, B>(response: &mut http::Response<B>, value: &T, etag: &str) -> Result<()>
where
    T: Serialize + ?Sized,
    B: From<Bytes>,
{
    let etag = entity_tag(etag)?;
    let body = encode(value)?;

    let headers = response.headers_mut();
    headers.insert(
        http::header::CONTENT_TYPE,
        HeaderValue::from_static(JSON_CONTENT_TYPE),
    );
    headers.insert(http::header::ETAG, etag);
    *response.body_mut() = B::from(body);

    Ok(())
}

/// Writes `error` as a JSON error response.
///
/// The status line is set to the code of the [flattened](crate::flatten)
/// error and the body to its messages, `{"messages": [...]}`. Encoding the
/// body can't be reported to the client any more, so a failure is only
/// logged and the body left untouched.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use jsrest::json::write_error;
/// use jsrest::{StatusCode, StatusError, errorf};
///
/// let error = errorf!(StatusError::NOT_FOUND, "no such page");
/// let mut response = http::Response::new(Bytes::new());
/// write_error(&mut response, &error);
///
/// assert_eq!(response.status(), StatusCode::NOT_FOUND);
/// assert_eq!(response.body(), r#"{"messages":["no such page","[404] Not Found"]}"#);
/// ```
pub fn write_error<B>(response: &mut http::Response<B>, error: &Error)
where
    B: From<Bytes>,
{
    let wire = flatten(error);

    *response.status_mut() = wire.code;
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        HeaderValue::from_static(JSON_CONTENT_TYPE),
    );

    match encode(&wire) {
        Ok(body) => *response.body_mut() = B::from(body),
        Err(error) => warn!(?error, "Failed to encode error response body"),
    }
}

/// Builds a new JSON error response for `error`.
///
/// See [`write_error`].
#[must_use]
pub fn error_response<B>(error: &Error) -> http::Response<B>
where
    B: From<Bytes>,
{
    let mut response = http::Response::new(B::from(Bytes::new()));
    write_error(&mut response, error);
    response
}

fn encode<T>(value: &T) -> Result<Bytes>
where
    T: Serialize + ?Sized,
{
    // a "reasonable default" for a JSON response size
    const DEFAULT_JSON_SIZE: usize = 128;

    let mut buf = Vec::with_capacity(DEFAULT_JSON_SIZE);
    let mut serializer = serde_json::Serializer::new(&mut buf);
    serde_path_to_error::serialize(value, &mut serializer).map_err(|error| {
        let error = JsonSerializeError(error);
        errorf!(
            StatusError::INTERNAL_SERVER_ERROR,
            [error],
            "encode JSON response failed ({error})"
        )
    })?;

    Ok(Bytes::from(buf))
}

#[derive(Debug, thiserror::Error)]
#[error("could not retrieve request body: {0}")]
struct ReadBodyError(#[source] Box<dyn StdError + Send + Sync>);
impl_into_jsrest_error!(ReadBodyError);

#[derive(Debug, thiserror::Error)]
#[error("JSON deserialization error: {0}")]
struct JsonDeserializeError(serde_path_to_error::Error<serde_json::Error>);
impl_into_jsrest_error!(JsonDeserializeError);

#[derive(Debug, thiserror::Error)]
#[error("unknown field `{}`", .0.join("`, `"))]
struct UnknownFieldsError(Vec<String>);
impl_into_jsrest_error!(UnknownFieldsError);

#[derive(Debug, thiserror::Error)]
#[error("JSON serialization error: {0}")]
struct JsonSerializeError(serde_path_to_error::Error<serde_json::Error>);
impl_into_jsrest_error!(JsonSerializeError);
