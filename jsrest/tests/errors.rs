use jsrest::{Error, StatusCode, StatusError, errorf, flatten, resolve_status};

#[derive(Debug, PartialEq, thiserror::Error)]
#[error("error {0}")]
struct Numbered(u32);

#[test]
fn from_error() {
    let e1 = Numbered(1);
    let e2 = errorf!(StatusError::BAD_GATEWAY, [Error::custom(Numbered(1))], "error 2: {e1}");

    assert!(e2.is(&e1));
    assert!(e2.is(&StatusError::BAD_GATEWAY));

    let wire = flatten(&e2);

    assert_eq!(wire.code, StatusCode::BAD_GATEWAY);
    assert_eq!(
        wire.messages,
        ["error 2: error 1", "error 1", "[502] Bad Gateway"]
    );
}

#[test]
fn from_errors() {
    let e1 = errorf!(StatusError::FORBIDDEN, "error 1");
    let e2 = Numbered(2);
    let e3 = errorf!(
        StatusError::BAD_GATEWAY,
        [e1, Error::custom(Numbered(2))],
        "error 3: {e1} + {e2}"
    );

    assert!(e3.is(&e2));
    assert!(e3.is(&StatusError::FORBIDDEN));
    assert!(!e3.is(&StatusError::BAD_GATEWAY));

    let wire = flatten(&e3);

    assert_eq!(wire.code, StatusCode::FORBIDDEN);
    assert_eq!(
        wire.messages,
        [
            "error 3: error 1 + error 2",
            "error 1",
            "[403] Forbidden",
            "error 2"
        ]
    );
}

#[test]
fn innermost_classification_wins() {
    let inner = errorf!(StatusError::NOT_FOUND, "inner");
    let outer = errorf!(StatusError::CONFLICT, [inner], "outer: {inner}");

    let wire = flatten(&outer);

    assert_eq!(wire.code, StatusCode::NOT_FOUND);
    assert_eq!(
        wire.messages,
        ["outer: inner", "inner", "[404] Not Found"]
    );
    assert_eq!(resolve_status(&outer), StatusCode::NOT_FOUND);
}

#[test]
fn joined_causes_stay_contiguous() {
    let left = Error::message("left", vec![Error::custom("left cause")]);
    let right = Error::message("right", vec![Error::custom("right cause")]);
    let error = errorf!(StatusError::BAD_REQUEST, [Error::join([left, right])], "both");

    let wire = flatten(&error);

    assert_eq!(wire.code, StatusCode::BAD_REQUEST);
    assert_eq!(
        wire.messages,
        [
            "both",
            "left",
            "left cause",
            "right",
            "right cause",
            "[400] Bad Request"
        ]
    );
}

#[test]
fn resolve_status_agrees_with_flatten_for_single_classification() {
    let errors = [
        Error::custom("plain"),
        errorf!(StatusError::GONE, "gone"),
        errorf!(
            StatusError::BAD_GATEWAY,
            [errorf!(StatusError::TOO_MANY_REQUESTS, "slow down")],
            "upstream refused"
        ),
        Error::join([
            Error::custom("a"),
            Error::message("b", vec![Error::from(StatusError::LOCKED)]),
            Error::custom("c"),
        ]),
    ];

    for error in &errors {
        assert_eq!(resolve_status(error), flatten(error).code, "{error:?}");
    }
}

#[test]
fn first_and_last_classification_differ_for_multiple_statuses() {
    let error = Error::message(
        "two statuses",
        vec![
            Error::from(StatusError::UNAUTHORIZED),
            Error::from(StatusError::PAYMENT_REQUIRED),
        ],
    );

    assert_eq!(resolve_status(&error), StatusCode::UNAUTHORIZED);
    assert_eq!(flatten(&error).code, StatusCode::PAYMENT_REQUIRED);
}

#[test]
fn rewrapping_keeps_classification() {
    let classified = errorf!(StatusError::NOT_FOUND, "missing");
    let error = Error::with_status(classified, StatusError::BAD_REQUEST);

    let wire = flatten(&error);
    assert_eq!(wire.code, StatusCode::NOT_FOUND);
    assert_eq!(wire.messages, ["missing", "[404] Not Found"]);

    let wire = flatten(&Error::custom(errorf!(StatusError::NOT_FOUND, "missing")));
    assert_eq!(wire.code, StatusCode::NOT_FOUND);
    assert_eq!(wire.messages, ["missing", "[404] Not Found"]);
}

#[test]
fn sentinels_are_shared_values() {
    let error = errorf!(StatusError::NOT_FOUND, "missing");

    assert_eq!(error.status_error(), Some(StatusError::new(StatusCode::NOT_FOUND)));
    assert_eq!(StatusError::NOT_FOUND.code(), 404);
    assert_eq!(StatusError::NOT_FOUND.message(), "Not Found");
}

#[test]
fn errors_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}

    assert_send_sync::<Error>();
    assert_send_sync::<StatusError>();
    assert_send_sync::<jsrest::WireError>();
}
