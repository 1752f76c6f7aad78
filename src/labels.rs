//! Argument labels: the optional external dictionary and the lookup with
//! its fallbacks.
//!
//! The dictionary is a JSON object keyed by function name:
//!
//! ```json
//! { "VLOOKUP": { "ja1": ["検索値", "範囲", "列番号", "検索方法"],
//!                "ja2": ["探す値", "表", "列", "近似一致"],
//!                "en":  ["lookup_value", "table_array", "col_index_num", "range_lookup"] } }
//! ```
//!
//! Lookup never fails. A missing dictionary, entry, variant or slot falls
//! through to the built-in `IF` labels and then to `引数N` / `argN`.

use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::config::{LabelMode, Locale, Variant};
use crate::error::LabelSourceError;
use crate::i18n;

const IF_LABELS_JA: [&str; 3] = ["条件式", "真の場合", "偽の場合"];
const IF_LABELS_EN: [&str; 3] = ["logical_test", "value_if_true", "value_if_false"];

/// Labels for one function, one list per display variant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgLabels {
    pub ja1: Vec<Option<String>>,
    pub ja2: Vec<Option<String>>,
    pub en: Vec<Option<String>>,
}

/// An entry as it appears in the document; variant lists are checked one
/// at a time.
#[derive(Deserialize)]
struct RawArgLabels {
    #[serde(default)]
    ja1: Option<serde_json::Value>,
    #[serde(default)]
    ja2: Option<serde_json::Value>,
    #[serde(default)]
    en: Option<serde_json::Value>,
}

impl RawArgLabels {
    fn into_labels(self, name: &str) -> ArgLabels {
        ArgLabels {
            ja1: variant_list(name, "ja1", self.ja1),
            ja2: variant_list(name, "ja2", self.ja2),
            en: variant_list(name, "en", self.en),
        }
    }
}

/// Non-string slots become empty and fall through at lookup time.
fn variant_list(name: &str, key: &str, raw: Option<serde_json::Value>) -> Vec<Option<String>> {
    match raw {
        None | Some(serde_json::Value::Null) => Vec::new(),
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Some(other) => {
            log::debug!("ignoring {name}.{key}: expected a list, found {other}");
            Vec::new()
        }
    }
}

impl ArgLabels {
    fn slot(&self, variant: Variant, index: usize) -> Option<&str> {
        let list = match variant {
            Variant::Ja1 => &self.ja1,
            Variant::Ja2 => &self.ja2,
            Variant::En => &self.en,
        };
        list.get(index)
            .and_then(Option::as_deref)
            .filter(|s| !s.is_empty())
    }
}

/// Function name (upper-cased) → labels. Read-only once loaded.
#[derive(Debug, Clone, Default)]
pub struct LabelTable {
    entries: FxHashMap<String, ArgLabels>,
}

impl LabelTable {
    /// Parse a dictionary document. Entries that are not objects are skipped,
    /// as are variant lists that are not arrays.
    pub fn from_json(text: &str) -> Result<Self, LabelSourceError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let serde_json::Value::Object(map) = value else {
            return Err(LabelSourceError::NotAnObject);
        };

        let mut entries = FxHashMap::default();
        entries.reserve(map.len());
        for (name, raw) in map {
            if !raw.is_object() {
                log::debug!("skipping label entry {name}: not an object");
                continue;
            }
            match serde_json::from_value::<RawArgLabels>(raw) {
                Ok(raw) => {
                    let labels = raw.into_labels(&name);
                    entries.insert(name.to_uppercase(), labels);
                }
                Err(e) => log::debug!("skipping label entry {name}: {e}"),
            }
        }
        log::debug!("loaded argument labels for {} functions", entries.len());
        Ok(LabelTable { entries })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LabelSourceError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LabelSourceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Like [`LabelTable::load`], but a failure is logged and yields an empty
    /// table so formatting carries on with generic labels.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(table) => table,
            Err(e) => {
                log::warn!("{e}; using generic argument labels");
                LabelTable::default()
            }
        }
    }

    pub fn insert(&mut self, name: &str, labels: ArgLabels) {
        self.entries.insert(name.to_uppercase(), labels);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ArgLabels> {
        self.entries.get(&name.to_uppercase())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Label shown in front of argument `index` (zero-based) of `func`.
#[must_use]
pub fn resolve_arg_label(
    table: &LabelTable,
    func: &str,
    index: usize,
    mode: LabelMode,
    locale: Locale,
) -> String {
    let Some(variant) = mode.variant(locale) else {
        return String::new();
    };

    let func = func.to_uppercase();
    if let Some(label) = table.entries.get(&func).and_then(|l| l.slot(variant, index)) {
        return label.to_string();
    }

    if func == "IF" {
        let (builtin, fallback_locale) = match variant {
            Variant::En => (&IF_LABELS_EN, Locale::En),
            Variant::Ja1 | Variant::Ja2 => (&IF_LABELS_JA, locale),
        };
        return match builtin.get(index) {
            Some(label) => (*label).to_string(),
            None => i18n::generic_arg_label(fallback_locale, index),
        };
    }

    i18n::generic_arg_label(locale, index)
}
