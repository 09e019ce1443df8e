use status_report::{StatusError, StatusReport};

fn decode(json: &str) -> Result<StatusReport, StatusError> {
    StatusReport::from_json_str(json)
}

#[test]
fn status_accepts_numeric_strings() {
    assert_eq!(decode(r#"{"status":"404"}"#).unwrap().status(), 404);
    assert_eq!(decode(r#"{"status":" 201 "}"#).unwrap().status(), 201);
    assert_eq!(decode(r#"{"status":404.0}"#).unwrap().status(), 404);
    assert_eq!(decode(r#"{}"#).unwrap().status(), 200);
}

#[test]
fn malformed_status_is_a_format_error() {
    for json in [
        r#"{"status":"not-a-number"}"#,
        r#"{"status":true}"#,
        r#"{"status":4.5}"#,
        r#"{"status":[404]}"#,
    ] {
        assert!(
            matches!(decode(json), Err(StatusError::Format(_))),
            "expected format error for {json}"
        );
    }
}

#[test]
fn unknown_level_is_rejected() {
    let json = r#"{"messages":[{"level":"critical","text":"boom"}]}"#;
    assert!(matches!(decode(json), Err(StatusError::Format(_))));

    let upper = r#"{"messages":[{"level":"WARN","text":"boom"}]}"#;
    assert!(matches!(decode(upper), Err(StatusError::Format(_))));

    let missing = r#"{"messages":[{"text":"no level"}]}"#;
    assert!(matches!(decode(missing), Err(StatusError::Format(_))));
}

#[test]
fn message_fields_are_optional() {
    let report = decode(r#"{"messages":[{"level":"info"}]}"#).unwrap();
    assert_eq!(report.messages()[0].text, "");
    assert_eq!(report.messages()[0].hint, None);
    assert_eq!(
        report.to_json_string().unwrap(),
        r#"{"status":200,"success":true,"warning":false,"messages":[{"level":"info"}]}"#
    );
}

#[test]
fn extra_fields_are_ignored_without_extension() {
    let report = decode(r#"{"status":200,"reference":{"path":"/x"},"other":1}"#).unwrap();
    assert_eq!(
        report.to_json_string().unwrap(),
        r#"{"status":200,"success":true,"warning":false}"#
    );
}

#[test]
fn warning_is_read_back() {
    let report = decode(r#"{"warning":true}"#).unwrap();
    assert!(report.warning());
}

#[test]
fn invalid_json_and_non_objects_fail() {
    assert!(matches!(decode("{"), Err(StatusError::Json(_))));
    assert!(matches!(decode("[]"), Err(StatusError::Format(_))));
    assert!(matches!(
        decode(r#"{"data":{"d":[1]}}"#),
        Err(StatusError::Format(_))
    ));
    assert!(matches!(
        decode(r#"{"list":{"l":[1]}}"#),
        Err(StatusError::Format(_))
    ));
}

#[test]
fn reads_from_reader() {
    let raw = br#"{"status":302,"title":"moved"}"#;
    let report: StatusReport = StatusReport::from_reader(&raw[..]).unwrap();
    assert_eq!(report.status(), 302);
    assert_eq!(report.title(), Some("moved"));
}
