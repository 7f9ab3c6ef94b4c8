//! Tests for the error payload shape and constructors.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn store_error() -> Error {
    Error::store_failure("duplicate key value violates unique constraint")
        .with_trace_id(TRACE_ID)
        .with_details(json!({ "step": "insert_profile" }))
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("no secret"), ErrorCode::Unauthorized)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::conflict("already committed"), ErrorCode::Conflict)]
#[case(Error::store_failure("down"), ErrorCode::StoreFailure)]
#[case(Error::partial_commit("orphan"), ErrorCode::PartialCommit)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
#[case("")]
#[case("   ")]
fn try_new_rejects_blank_messages(#[case] message: &str) {
    let err = Error::try_new(ErrorCode::InternalError, message).expect_err("blank must fail");
    assert_eq!(err, ErrorValidationError::EmptyMessage);
}

#[rstest]
fn serialises_camel_case_with_optional_fields(store_error: Error) {
    let value = serde_json::to_value(&store_error).expect("serialise error");
    assert_eq!(
        value,
        json!({
            "code": "store_failure",
            "message": "duplicate key value violates unique constraint",
            "traceId": TRACE_ID,
            "details": { "step": "insert_profile" },
        })
    );
}

#[rstest]
fn omits_absent_trace_id_and_details() {
    let value = serde_json::to_value(Error::not_found("missing")).expect("serialise error");
    assert_eq!(value, json!({ "code": "not_found", "message": "missing" }));
}

#[rstest]
fn deserialising_blank_message_fails() {
    let result = serde_json::from_value::<Error>(json!({ "code": "not_found", "message": " " }));
    assert!(result.is_err());
}

#[rstest]
fn round_trips_through_dto(store_error: Error) {
    let encoded = serde_json::to_string(&store_error).expect("serialise error");
    let decoded: Error = serde_json::from_str(&encoded).expect("deserialise error");
    assert_eq!(decoded, store_error);
}
