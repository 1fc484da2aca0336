//! Integration tests for the presentation boundary.
//!
//! A problem-response renderer receives errors as JSON; codes, descriptions
//! and kinds must survive the trip unchanged.

#![cfg(feature = "serde")]

use nebula_rules::prelude::*;
use serde_json::json;

#[test]
fn failed_tree_renders_every_error() {
    let rule = or_any([
        ensure(|s: &str| s.contains('@'), RuleError::validation("email.format", "Missing @")).boxed(),
        ensure(|s: &str| s.starts_with('+'), RuleError::validation("phone.format", "Missing +")).boxed(),
    ])
    .unwrap();

    let verdict = evaluate(&rule, "nobody").unwrap();
    assert_eq!(
        verdict.to_json_value().unwrap(),
        json!({
            "success": false,
            "errors": [
                { "code": "email.format", "description": "Missing @", "type": "validation" },
                { "code": "phone.format", "description": "Missing +", "type": "validation" },
            ],
        })
    );
}

#[test]
fn error_round_trips_through_json() {
    let error = RuleError::unauthorized("session.expired", "Log in again");
    let text = serde_json::to_string(&error).unwrap();
    let back: RuleError = serde_json::from_str(&text).unwrap();

    assert_eq!(back, error);
    assert_eq!(back.description(), "Log in again");
    assert_eq!(back.kind(), ErrorKind::Unauthorized);
}

#[test]
fn kind_labels_match_display() {
    for kind in [
        ErrorKind::Failure,
        ErrorKind::Unexpected,
        ErrorKind::Validation,
        ErrorKind::Conflict,
        ErrorKind::NotFound,
        ErrorKind::Unauthorized,
        ErrorKind::Forbidden,
    ] {
        assert_eq!(serde_json::to_value(kind).unwrap(), json!(kind.to_string()));
    }
}
