//! Locale bundles: flat key → localized string tables.
//!
//! Keys are looked up verbatim, so a key like `with hint {}` contains a
//! literal `{}`. A [`BundleSet`] holds one table per locale and resolves a
//! requested locale through its parents and then the default locale.

use crate::error::{Result, StatusError};
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::path::Path;
use tracing::debug;

/// Read-only lookup of localized strings.
pub trait Bundle {
    fn lookup(&self, key: &str) -> Option<&str>;
}

impl<S: BuildHasher> Bundle for HashMap<String, String, S> {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl Bundle for BTreeMap<String, String> {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl<B: Bundle + ?Sized> Bundle for &B {
    fn lookup(&self, key: &str) -> Option<&str> {
        (**self).lookup(key)
    }
}

pub type Table = BTreeMap<String, String>;

#[derive(Debug, Clone, Default)]
pub struct BundleSet {
    default_locale: String,
    tables: HashMap<String, Table>,
}

impl BundleSet {
    pub fn new(default_locale: &str) -> Self {
        Self {
            default_locale: normalize_locale(default_locale),
            tables: HashMap::new(),
        }
    }

    /// Adds `entries` to the table for `locale`, overriding existing keys.
    pub fn insert<I, K, V>(&mut self, locale: &str, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let table = self.tables.entry(normalize_locale(locale)).or_default();
        for (k, v) in entries {
            table.insert(k.into(), v.into());
        }
    }

    /// Loads every `<locale>.toml` file in `dir`.
    ///
    /// Nested tables contribute dotted keys (`[msg] saved = ".."` becomes
    /// `msg.saved`). Any non-string leaf is rejected.
    pub fn load_dir(dir: &Path, default_locale: &str) -> Result<Self> {
        let mut set = Self::new(default_locale);
        let entries = std::fs::read_dir(dir).map_err(|e| StatusError::Bundle {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;
        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("toml") {
                paths.push(path);
            }
        }
        paths.sort();
        for path in paths {
            let Some(locale) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let table = load_table(&path)?;
            debug!("bundle locale={} keys={} path={}", locale, table.len(), path.display());
            set.insert(locale, table);
        }
        Ok(set)
    }

    /// Resolves `locale` to a bundle that walks its fallback chain.
    pub fn for_locale(&self, locale: &str) -> LocaleBundle<'_> {
        let chain = locale_chain(locale, &self.default_locale)
            .into_iter()
            .filter_map(|name| self.tables.get(&name))
            .collect();
        LocaleBundle { chain }
    }
}

/// Tables for one locale and its fallbacks, most specific first.
#[derive(Debug, Clone)]
pub struct LocaleBundle<'a> {
    chain: Vec<&'a Table>,
}

impl LocaleBundle<'_> {
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

impl Bundle for LocaleBundle<'_> {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.chain.iter().find_map(|t| t.get(key)).map(String::as_str)
    }
}

fn load_table(path: &Path) -> Result<Table> {
    let bundle_err = |reason: String| StatusError::Bundle {
        path: path.to_path_buf(),
        reason,
    };
    let raw = std::fs::read_to_string(path).map_err(|e| bundle_err(e.to_string()))?;
    let parsed: toml::Table = toml::from_str(&raw).map_err(|e| bundle_err(e.to_string()))?;
    let mut table = Table::new();
    flatten_into(&mut table, "", parsed).map_err(bundle_err)?;
    Ok(table)
}

fn flatten_into(
    out: &mut Table,
    prefix: &str,
    table: toml::Table,
) -> std::result::Result<(), String> {
    for (key, value) in table {
        let full = if prefix.is_empty() {
            key
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            toml::Value::String(s) => {
                out.insert(full, s);
            }
            toml::Value::Table(nested) => flatten_into(out, &full, nested)?,
            other => return Err(format!("{full}: expected a string, got {}", other.type_str())),
        }
    }
    Ok(())
}

pub(crate) fn normalize_locale(locale: &str) -> String {
    locale.trim().replace('-', "_")
}

/// `de_CH` with default `en` yields `["de_CH", "de", "en"]`.
fn locale_chain(locale: &str, default_locale: &str) -> Vec<String> {
    let mut chain: Vec<String> = Vec::new();
    for start in [normalize_locale(locale), default_locale.to_string()] {
        let mut current = start.as_str();
        while !current.is_empty() {
            if !chain.iter().any(|c| c == current) {
                chain.push(current.to_string());
            }
            current = match current.rfind('_') {
                Some(idx) => &current[..idx],
                None => "",
            };
        }
    }
    chain
}
