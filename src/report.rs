use crate::{
    message::{Level, Message},
    sink::LogSink,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::fmt;

/// Key/value content of a `data` section or of one `list` row.
pub type DataMap = serde_json::Map<String, Value>;

/// Additional top-level fields carried next to the base status shape.
///
/// Implemented for every serde type with a default. The value must serialize
/// to a JSON object (or `null` for "nothing"); its fields are merged into the
/// report object on encode and picked from the leftover fields on decode.
/// Fields whose value is `null` are not written, so a `null` top-level
/// field read into an open map extension is dropped on re-encode.
pub trait Extension: Serialize + DeserializeOwned + Default {}

impl<T: Serialize + DeserializeOwned + Default> Extension for T {}

/// The empty extension: contributes no fields, ignores unknown ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoExtension {}

/// Named sections in first-access order.
///
/// A name is created at most once and its value is never replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct Sections<T> {
    entries: Vec<(String, T)>,
}

impl<T> Default for Sections<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> Sections<T> {
    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Returns the section called `name`, creating it with `init` on first use.
    pub fn get_or_insert_with(&mut self, name: &str, init: impl FnOnce() -> T) -> &mut T {
        let idx = match self.entries.iter().position(|(n, _)| n == name) {
            Some(idx) => idx,
            None => {
                self.entries.push((name.to_string(), init()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }
}

impl<T: Default> Sections<T> {
    pub fn get_or_create(&mut self, name: &str) -> &mut T {
        self.get_or_insert_with(name, T::default)
    }
}

impl<T: Serialize> Serialize for Sections<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Result of one request or operation: a status code, leveled messages and
/// named payload sections, encoded once as the JSON response body.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport<X = NoExtension> {
    pub(crate) status: i32,
    pub(crate) title: Option<String>,
    pub(crate) warning: bool,
    pub(crate) messages: Vec<Message>,
    pub(crate) data: Sections<DataMap>,
    pub(crate) list: Sections<Vec<DataMap>>,
    pub(crate) extension: X,
}

pub const DEFAULT_STATUS: i32 = 200;

impl<X: Default> Default for StatusReport<X> {
    fn default() -> Self {
        Self::with_extension(X::default())
    }
}

impl StatusReport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<X> StatusReport<X> {
    pub fn with_extension(extension: X) -> Self {
        Self {
            status: DEFAULT_STATUS,
            title: None,
            warning: false,
            messages: Vec::new(),
            data: Sections::default(),
            list: Sections::default(),
            extension,
        }
    }

    pub fn status(&self) -> i32 {
        self.status
    }

    pub fn set_status(&mut self, status: i32) {
        self.status = status;
    }

    /// Derived from the status code; there is no independent setter.
    pub fn success(&self) -> bool {
        self.status < 400
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn warning(&self) -> bool {
        self.warning
    }

    pub fn set_warning(&mut self, warning: bool) {
        self.warning = warning;
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// True while no error-level message has been recorded.
    pub fn is_valid(&self) -> bool {
        !self.messages.iter().any(|m| m.level == Level::Error)
    }

    pub fn add_message(&mut self, message: Message) {
        if message.level.is_warning() {
            self.warning = true;
        }
        self.messages.push(message);
    }

    /// Renders `template` with `args` and records it at `level`.
    pub fn log(&mut self, level: Level, template: &str, args: &[&dyn fmt::Display]) {
        self.add_message(Message::rendered(level, template, args));
    }

    pub fn debug(&mut self, template: &str, args: &[&dyn fmt::Display]) {
        self.log(Level::Debug, template, args);
    }

    pub fn info(&mut self, template: &str, args: &[&dyn fmt::Display]) {
        self.log(Level::Info, template, args);
    }

    pub fn warn(&mut self, template: &str, args: &[&dyn fmt::Display]) {
        self.log(Level::Warn, template, args);
    }

    pub fn error(&mut self, template: &str, args: &[&dyn fmt::Display]) {
        self.log(Level::Error, template, args);
    }

    /// Records an error tied to an input field, identified by `context` and `label`.
    pub fn validation_error(
        &mut self,
        context: &str,
        label: &str,
        template: &str,
        args: &[&dyn fmt::Display],
    ) {
        self.add_message(
            Message::rendered(Level::Error, template, args)
                .with_context(context)
                .with_label(label),
        );
    }

    /// Returns a handle that records messages and forwards them to `sink`.
    pub fn with_logging<'a>(&'a mut self, sink: &'a dyn LogSink) -> Logged<'a, X> {
        Logged { report: self, sink }
    }

    /// The `data` section called `name`, created empty on first access.
    pub fn data(&mut self, name: &str) -> &mut DataMap {
        self.data.get_or_create(name)
    }

    /// The `list` section called `name`, created empty on first access.
    pub fn list(&mut self, name: &str) -> &mut Vec<DataMap> {
        self.list.get_or_create(name)
    }

    pub fn get_data(&self, name: &str) -> Option<&DataMap> {
        self.data.get(name)
    }

    pub fn get_list(&self, name: &str) -> Option<&Vec<DataMap>> {
        self.list.get(name)
    }

    pub fn data_sections(&self) -> &Sections<DataMap> {
        &self.data
    }

    pub fn list_sections(&self) -> &Sections<Vec<DataMap>> {
        &self.list
    }

    pub fn extension(&self) -> &X {
        &self.extension
    }

    pub fn extension_mut(&mut self) -> &mut X {
        &mut self.extension
    }
}

/// Records messages on a report and forwards the rendered line to a sink.
pub struct Logged<'a, X> {
    report: &'a mut StatusReport<X>,
    sink: &'a dyn LogSink,
}

impl<X> Logged<'_, X> {
    pub fn log(&mut self, level: Level, template: &str, args: &[&dyn fmt::Display]) {
        self.record(Message::rendered(level, template, args), None);
    }

    pub fn debug(&mut self, template: &str, args: &[&dyn fmt::Display]) {
        self.log(Level::Debug, template, args);
    }

    pub fn info(&mut self, template: &str, args: &[&dyn fmt::Display]) {
        self.log(Level::Info, template, args);
    }

    pub fn warn(&mut self, template: &str, args: &[&dyn fmt::Display]) {
        self.log(Level::Warn, template, args);
    }

    pub fn error(&mut self, template: &str, args: &[&dyn fmt::Display]) {
        self.log(Level::Error, template, args);
    }

    /// Like `error`, additionally handing `cause` to the sink. The cause
    /// never reaches the JSON message.
    pub fn error_with_cause(
        &mut self,
        template: &str,
        args: &[&dyn fmt::Display],
        cause: &(dyn std::error::Error + 'static),
    ) {
        self.record(Message::rendered(Level::Error, template, args), Some(cause));
    }

    fn record(&mut self, message: Message, cause: Option<&(dyn std::error::Error + 'static)>) {
        self.sink.record(message.level, &message.text, cause);
        self.report.add_message(message);
    }
}
