use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use status_report::{StatusError, StatusReport};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct ContainedObject {
    attr1: String,
    attr2: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TestExtension {
    contained_object: Option<ContainedObject>,
}

#[test]
fn extension_fields_round_trip() {
    let mut status = StatusReport::<TestExtension>::default();
    status.extension_mut().contained_object = Some(ContainedObject {
        attr1: "hallo".into(),
        attr2: 27,
    });

    let json = status.to_json_string().unwrap();
    assert_eq!(
        json,
        r#"{"status":200,"success":true,"warning":false,"containedObject":{"attr1":"hallo","attr2":27}}"#
    );

    let readback = StatusReport::<TestExtension>::from_json_str(&json).unwrap();
    let contained = readback.extension().contained_object.as_ref().unwrap();
    assert_eq!(contained.attr1, "hallo");
    assert_eq!(contained.attr2, 27);
}

#[test]
fn unset_extension_fields_are_omitted() {
    let status = StatusReport::<TestExtension>::default();
    assert_eq!(
        status.to_json_string().unwrap(),
        r#"{"status":200,"success":true,"warning":false}"#
    );
}

#[test]
fn extension_does_not_see_base_fields() {
    let json = r#"{"status":"500","title":"t","containedObject":{"attr1":"a","attr2":1},"unknown":true}"#;
    let readback = StatusReport::<TestExtension>::from_json_str(json).unwrap();
    assert_eq!(readback.status(), 500);
    assert_eq!(readback.title(), Some("t"));
    assert!(readback.extension().contained_object.is_some());
}

#[test]
fn mistyped_extension_field_is_a_format_error() {
    let json = r#"{"containedObject":{"attr1":"a","attr2":"not a number"}}"#;
    let err = StatusReport::<TestExtension>::from_json_str(json).unwrap_err();
    assert!(matches!(err, StatusError::Format(_)));
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Clashing {
    title: Option<String>,
}

#[test]
fn extension_may_not_shadow_base_fields() {
    let status = StatusReport::with_extension(Clashing {
        title: Some("shadow".into()),
    });
    assert!(status.to_json_string().is_err());
}

#[test]
fn open_map_extension_keeps_unknown_fields() {
    let json = r#"{"status":200,"success":true,"warning":false,"reference":{"path":"/content"},"count":3}"#;
    let report = StatusReport::<Map<String, Value>>::from_json_str(json).unwrap();
    assert_eq!(report.extension().len(), 2);
    assert_eq!(report.to_json_string().unwrap(), json);
}

#[test]
fn null_extension_fields_are_not_written() {
    let json = r#"{"status":200,"success":true,"warning":false,"foo":null,"bar":1}"#;
    let report = StatusReport::<Map<String, Value>>::from_json_str(json).unwrap();
    assert_eq!(report.extension().get("foo"), Some(&Value::Null));
    assert_eq!(
        report.to_json_string().unwrap(),
        r#"{"status":200,"success":true,"warning":false,"bar":1}"#
    );
}
