use serde_json::json;
use status_report::{translate_json, Bundle, BundleSet, StatusError, StatusReport};
use std::collections::HashMap;

const STORED: &str = r#"{
  "title": "thetitle",
  "warning": true,
  "status": "404",
  "messages": [
    {
      "level": "warn",
      "context": "thecontext",
      "label": "thelabel",
      "text": "with hint {}",
      "hint": "thehint"
    }
  ]
}
"#;

fn german() -> HashMap<String, String> {
    [
        ("with hint {}", "mit Hinweis {}"),
        ("thehint", "der Hinweis"),
        ("thetile", "der Titel"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

#[test]
fn translates_text_and_hint() {
    let status: StatusReport = translate_json(STORED, &german()).unwrap();
    assert_eq!(
        status.to_json_string().unwrap(),
        concat!(
            r#"{"status":404,"success":false,"warning":true,"title":"thetitle","#,
            r#""messages":[{"level":"warn","context":"thecontext","label":"thelabel","text":"mit Hinweis der Hinweis"}]}"#
        )
    );
    assert_eq!(
        status.to_json_pretty().unwrap(),
        "{\n  \"status\": 404,\n  \"success\": false,\n  \"warning\": true,\n  \"title\": \"thetitle\",\n  \"messages\": [\n    {\n      \"level\": \"warn\",\n      \"context\": \"thecontext\",\n      \"label\": \"thelabel\",\n      \"text\": \"mit Hinweis der Hinweis\"\n    }\n  ]\n}"
    );
}

#[test]
fn empty_bundle_only_consumes_hint() {
    let empty: HashMap<String, String> = HashMap::new();
    let status: StatusReport = translate_json(STORED, &empty).unwrap();
    let value = status.to_json_value().unwrap();
    assert_eq!(
        value["messages"][0],
        json!({"level": "warn", "context": "thecontext", "label": "thelabel", "text": "with hint thehint"})
    );
}

#[test]
fn title_is_not_translated() {
    let mut bundles = BundleSet::new("en");
    bundles.insert("de", [("thetitle", "der Titel")]);
    let status: StatusReport = translate_json(STORED, &bundles.for_locale("de")).unwrap();
    assert_eq!(status.title(), Some("thetitle"));
}

#[test]
fn decode_errors_surface_from_translate() {
    let bad = r#"{"messages":[{"level":"critical","text":"x"}]}"#;
    let err = translate_json::<status_report::NoExtension, _>(bad, &german()).unwrap_err();
    assert!(matches!(err, StatusError::Format(_)));
}

#[test]
fn bundles_load_from_toml_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("de.toml"),
        "\"with hint {}\" = \"mit Hinweis {}\"\n\n[msg]\nsaved = \"gespeichert\"\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("en.toml"), "thehint = \"the hint\"\n").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let bundles = BundleSet::load_dir(dir.path(), "en").unwrap();
    let de = bundles.for_locale("de-AT");
    assert_eq!(de.lookup("msg.saved"), Some("gespeichert"));
    assert_eq!(de.lookup("thehint"), Some("the hint"));

    let status: StatusReport = translate_json(STORED, &de).unwrap();
    assert_eq!(status.messages()[0].text, "mit Hinweis the hint");
}

#[test]
fn non_string_bundle_values_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("de.toml"), "count = 3\n").unwrap();
    let err = BundleSet::load_dir(dir.path(), "en").unwrap_err();
    assert!(matches!(err, StatusError::Bundle { .. }));
}

#[test]
fn translate_in_place_keeps_other_state() {
    let mut status = StatusReport::new();
    status.set_status(422);
    status.warn("with hint {}", &[]);
    status.data("form").insert("field".into(), "name".into());
    status.translate(&german());

    assert_eq!(status.messages()[0].text, "mit Hinweis {}");
    assert!(status.warning());
    assert_eq!(status.get_data("form").map(|m| m.len()), Some(1));
}
