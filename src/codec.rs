//! JSON encoding and decoding of [`StatusReport`].
//!
//! Encoding writes a fixed key order: `status`, `success`, `warning`,
//! `title`, `messages`, `data`, `list`, then any extension fields. Optional
//! keys are left out when empty. Decoding is tolerant: the status code may be
//! a number or a numeric string, `success` is re-derived, and fields outside
//! the base shape are handed to the extension type.

use crate::{
    error::{Result, StatusError},
    message::{Level, Message},
    report::{DEFAULT_STATUS, DataMap, Extension, Sections, StatusReport},
};
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::Error as _,
    ser::{Error as _, SerializeMap},
};
use serde_json::{Map, Value};
use std::io::Read;

const BASE_FIELDS: [&str; 7] = [
    "status", "success", "warning", "title", "messages", "data", "list",
];

impl<X: Extension> Serialize for StatusReport<X> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let extra = extension_fields(&self.extension).map_err(S::Error::custom)?;

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("status", &self.status)?;
        map.serialize_entry("success", &self.success())?;
        map.serialize_entry("warning", &self.warning)?;
        if let Some(title) = &self.title {
            map.serialize_entry("title", title)?;
        }
        if !self.messages.is_empty() {
            map.serialize_entry("messages", &self.messages)?;
        }
        if !self.data.is_empty() {
            map.serialize_entry("data", &self.data)?;
        }
        if !self.list.is_empty() {
            map.serialize_entry("list", &self.list)?;
        }
        for (key, value) in &extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de, X: Extension> Deserialize<'de> for StatusReport<X> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let object = Map::deserialize(deserializer)?;
        decode_object(object).map_err(D::Error::custom)
    }
}

impl<X: Extension> StatusReport<X> {
    /// Compact JSON in canonical key order.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Pretty JSON (two-space indent), same key order as `to_json_string`.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_json_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json_value(value)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_json_value(value)
    }

    pub fn from_json_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(object) => decode_object(object),
            other => Err(StatusError::format(format!(
                "status document must be a JSON object, got {}",
                kind(&other)
            ))),
        }
    }
}

fn extension_fields<X: Extension>(extension: &X) -> Result<Map<String, Value>> {
    match serde_json::to_value(extension)? {
        Value::Null => Ok(Map::new()),
        Value::Object(fields) => {
            let mut out = Map::new();
            for (key, value) in fields {
                if value.is_null() {
                    continue;
                }
                if BASE_FIELDS.contains(&key.as_str()) {
                    return Err(StatusError::format(format!(
                        "extension field {key:?} collides with a base status field"
                    )));
                }
                out.insert(key, value);
            }
            Ok(out)
        }
        other => Err(StatusError::format(format!(
            "extension must serialize to a JSON object, got {}",
            kind(&other)
        ))),
    }
}

pub(crate) fn decode_object<X: Extension>(
    mut object: Map<String, Value>,
) -> Result<StatusReport<X>> {
    let status = match object.shift_remove("status") {
        None | Some(Value::Null) => DEFAULT_STATUS,
        Some(value) => parse_status(&value)?,
    };
    // success is derived from status; an incoming value is not trusted
    object.shift_remove("success");
    let warning = match object.shift_remove("warning") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => b,
        Some(other) => {
            return Err(StatusError::format(format!(
                "warning must be a boolean, got {}",
                kind(&other)
            )));
        }
    };
    let title = optional_string(object.shift_remove("title"), "title")?;
    let messages = match object.shift_remove("messages") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| decode_message(idx, item))
            .collect::<Result<Vec<_>>>()?,
        Some(other) => {
            return Err(StatusError::format(format!(
                "messages must be an array, got {}",
                kind(&other)
            )));
        }
    };
    let data = decode_data(object.shift_remove("data"))?;
    let list = decode_list(object.shift_remove("list"))?;

    let extension = X::deserialize(Value::Object(object))
        .map_err(|e| StatusError::format(format!("extension fields: {e}")))?;

    let mut report = StatusReport::with_extension(extension);
    report.status = status;
    report.title = title;
    report.warning = warning;
    report.messages = messages;
    report.data = data;
    report.list = list;
    Ok(report)
}

fn parse_status(value: &Value) -> Result<i32> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return i32::try_from(i)
                    .map_err(|_| StatusError::format(format!("status out of range: {i}")));
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64 => {
                    Ok(f as i32)
                }
                _ => Err(StatusError::format(format!("status is not an integer: {n}"))),
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<i32>()
            .map_err(|_| StatusError::format(format!("status is not numeric: {s:?}"))),
        other => Err(StatusError::format(format!(
            "status must be a number or numeric string, got {}",
            kind(other)
        ))),
    }
}

fn decode_message(idx: usize, value: Value) -> Result<Message> {
    let mut fields = match value {
        Value::Object(fields) => fields,
        other => {
            return Err(StatusError::format(format!(
                "messages[{idx}] must be an object, got {}",
                kind(&other)
            )));
        }
    };
    let level = match fields.remove("level") {
        Some(Value::String(token)) => token.parse::<Level>()?,
        Some(other) => {
            return Err(StatusError::format(format!(
                "messages[{idx}].level must be a string, got {}",
                kind(&other)
            )));
        }
        None => return Err(StatusError::format(format!("messages[{idx}] has no level"))),
    };
    Ok(Message {
        level,
        context: optional_string(fields.remove("context"), "context")?,
        label: optional_string(fields.remove("label"), "label")?,
        text: optional_string(fields.remove("text"), "text")?.unwrap_or_default(),
        hint: optional_string(fields.remove("hint"), "hint")?,
    })
}

fn decode_data(value: Option<Value>) -> Result<Sections<DataMap>> {
    let mut sections = Sections::default();
    for (name, section) in section_entries(value, "data")? {
        match section {
            Value::Object(map) => {
                sections.get_or_insert_with(&name, || map);
            }
            other => {
                return Err(StatusError::format(format!(
                    "data.{name} must be an object, got {}",
                    kind(&other)
                )));
            }
        }
    }
    Ok(sections)
}

fn decode_list(value: Option<Value>) -> Result<Sections<Vec<DataMap>>> {
    let mut sections = Sections::default();
    for (name, section) in section_entries(value, "list")? {
        let items = match section {
            Value::Array(items) => items,
            other => {
                return Err(StatusError::format(format!(
                    "list.{name} must be an array, got {}",
                    kind(&other)
                )));
            }
        };
        let rows = items
            .into_iter()
            .map(|item| match item {
                Value::Object(row) => Ok(row),
                other => Err(StatusError::format(format!(
                    "list.{name} rows must be objects, got {}",
                    kind(&other)
                ))),
            })
            .collect::<Result<Vec<_>>>()?;
        sections.get_or_insert_with(&name, || rows);
    }
    Ok(sections)
}

fn section_entries(value: Option<Value>, field: &str) -> Result<Map<String, Value>> {
    match value {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(other) => Err(StatusError::format(format!(
            "{field} must be an object, got {}",
            kind(&other)
        ))),
    }
}

fn optional_string(value: Option<Value>, field: &str) -> Result<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(StatusError::format(format!(
            "{field} must be a string, got {}",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
