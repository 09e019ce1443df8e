//! Inspection of stored status documents.

use crate::{
    message::Level,
    report::StatusReport,
    sink::TracingSink,
};
use serde_json::{Map, Value};

/// Decodes `raw` and describes it as a report of its own.
///
/// Counts land in the `summary` and `levels` data sections; inconsistencies
/// are recorded as warn messages. Undecodable input yields status 400 with
/// an error message naming `name`.
pub fn check_document(raw: &str, name: &str) -> StatusReport {
    let sink = TracingSink::new("check");
    let mut summary = StatusReport::new();
    summary.set_title(format!("check {name}"));

    let document: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            summary.set_status(400);
            summary
                .with_logging(&sink)
                .error("{} is not valid JSON: {}", &[&name, &err]);
            return summary;
        }
    };
    let claimed_success = document.get("success").and_then(Value::as_bool);

    let report = match StatusReport::<Map<String, Value>>::from_json_value(document) {
        Ok(report) => report,
        Err(err) => {
            summary.set_status(400);
            summary
                .with_logging(&sink)
                .error("cannot decode {}: {}", &[&name, &err]);
            return summary;
        }
    };

    let overview = summary.data("summary");
    overview.insert("status".into(), report.status().into());
    overview.insert("success".into(), report.success().into());
    overview.insert("warning".into(), report.warning().into());
    overview.insert("messages".into(), report.messages().len().into());
    overview.insert("data".into(), report.data_sections().len().into());
    overview.insert("list".into(), report.list_sections().len().into());
    overview.insert("extra".into(), report.extension().len().into());

    let levels = summary.data("levels");
    for level in [Level::Debug, Level::Info, Level::Warn, Level::Error] {
        let count = report.messages().iter().filter(|m| m.level == level).count();
        levels.insert(level.as_str().into(), count.into());
    }

    let mut logged = summary.with_logging(&sink);
    if let Some(claimed) = claimed_success {
        if claimed != report.success() {
            logged.warn(
                "success field {} disagrees with status {}",
                &[&claimed, &report.status()],
            );
        }
    }
    let has_warnings = report.messages().iter().any(|m| m.level.is_warning());
    if has_warnings && !report.warning() {
        logged.warn("warning flag is false but warn/error messages are present", &[]);
    }
    if !report.is_valid() {
        logged.info("document reports errors", &[]);
    }
    for field in report.extension().keys() {
        logged.debug("extra top-level field {}", &[field]);
    }

    summary
}
