pub mod bundle;
pub mod check;
pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod message;
pub mod report;
pub mod sink;
pub mod translate;
pub mod util;

pub use bundle::{Bundle, BundleSet, LocaleBundle};
pub use check::check_document;
pub use error::{Result, StatusError};
pub use message::{Level, Message};
pub use report::{DataMap, Extension, NoExtension, Sections, StatusReport};
pub use sink::{LogSink, NoopSink, TracingSink};
pub use translate::{translate_json, Translator};
