use std::path::PathBuf;

use serde_json::Value;
use toolbelt::error::{exit_codes, Error};

#[test]
fn exit_code_user_error() {
    let err = Error::InvalidArgument("bad input".to_string());
    assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    assert_eq!(Error::TitleRequired.exit_code(), exit_codes::USER_ERROR);
    assert_eq!(Error::NoCharacterClasses.exit_code(), exit_codes::USER_ERROR);
}

#[test]
fn exit_code_not_found() {
    let err = Error::ContactNotFound("Alice".to_string());
    assert_eq!(err.exit_code(), exit_codes::NOT_FOUND);
    let err = Error::TaskNotFound { position: 3, len: 1 };
    assert_eq!(err.exit_code(), exit_codes::NOT_FOUND);
}

#[test]
fn exit_code_operation_failed() {
    let err = Error::OperationFailed("boom".to_string());
    assert_eq!(err.exit_code(), exit_codes::OPERATION_FAILED);
    let err = Error::LockFailed(PathBuf::from("tasks.json.lock"));
    assert_eq!(err.exit_code(), exit_codes::OPERATION_FAILED);
}

#[test]
fn messages_match_user_facing_text() {
    assert_eq!(Error::TitleRequired.to_string(), "Title is required!");
    assert_eq!(
        Error::NoCharacterClasses.to_string(),
        "Please select at least one character type"
    );
    assert_eq!(
        Error::ContactNotFound("Bob".to_string()).to_string(),
        "Contact 'Bob' not found."
    );
}

#[test]
fn details_include_corrupt_state_fields() {
    let err = Error::CorruptState {
        path: PathBuf::from("tasks.json"),
        reason: "expected value".to_string(),
    };
    let details = err.details().expect("details");
    assert_eq!(details["path"], Value::String("tasks.json".to_string()));
    assert_eq!(details["reason"], Value::String("expected value".to_string()));
}
