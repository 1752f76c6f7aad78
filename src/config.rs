//! Per-call formatting configuration.
//!
//! Nothing here is global: the caller builds a [`Config`] and hands it to
//! every entry point, so a locale or label-mode switch is just a new value.

use std::str::FromStr;

use crate::labels::LabelTable;

/// Active UI locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Ja,
    En,
}

impl Locale {
    /// Pick a locale from a language tag such as `ja_JP.UTF-8` or `en-US`.
    #[must_use]
    pub fn from_lang_tag(tag: &str) -> Self {
        if tag.trim().to_ascii_lowercase().starts_with("ja") {
            Locale::Ja
        } else {
            Locale::En
        }
    }

    /// Locale from `LC_ALL` / `LANG`, falling back to English.
    #[must_use]
    pub fn from_env() -> Self {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|k| std::env::var(k).ok())
            .find(|v| !v.is_empty())
            .map_or(Locale::En, |v| Locale::from_lang_tag(&v))
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::Ja => "ja",
            Locale::En => "en",
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ja" => Ok(Locale::Ja),
            "en" => Ok(Locale::En),
            other => Err(format!("unknown language: {other} (expected ja or en)")),
        }
    }
}

/// Which label set to show in front of function arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelMode {
    /// `ja1` for a Japanese locale, `en` otherwise.
    #[default]
    Auto,
    Ja1,
    Ja2,
    En,
    Off,
}

impl LabelMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LabelMode::Auto => "auto",
            LabelMode::Ja1 => "ja1",
            LabelMode::Ja2 => "ja2",
            LabelMode::En => "en",
            LabelMode::Off => "off",
        }
    }

    /// The table variant this mode reads, or `None` when labels are off.
    #[must_use]
    pub fn variant(self, locale: Locale) -> Option<Variant> {
        match self {
            LabelMode::Off => None,
            LabelMode::Auto => Some(match locale {
                Locale::Ja => Variant::Ja1,
                Locale::En => Variant::En,
            }),
            LabelMode::Ja1 => Some(Variant::Ja1),
            LabelMode::Ja2 => Some(Variant::Ja2),
            LabelMode::En => Some(Variant::En),
        }
    }
}

impl FromStr for LabelMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(LabelMode::Auto),
            "ja1" => Ok(LabelMode::Ja1),
            "ja2" => Ok(LabelMode::Ja2),
            "en" => Ok(LabelMode::En),
            "off" => Ok(LabelMode::Off),
            other => Err(format!(
                "unknown label mode: {other} (expected auto, ja1, ja2, en or off)"
            )),
        }
    }
}

/// Key into a label table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Ja1,
    Ja2,
    En,
}

/// Everything a formatting call reads besides the formula itself.
#[derive(Debug, Clone, Copy)]
pub struct Config<'a> {
    pub locale: Locale,
    pub label_mode: LabelMode,
    pub labels: &'a LabelTable,
}

impl<'a> Config<'a> {
    #[must_use]
    pub fn new(labels: &'a LabelTable) -> Self {
        Config {
            locale: Locale::default(),
            label_mode: LabelMode::default(),
            labels,
        }
    }

    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    #[must_use]
    pub fn with_label_mode(mut self, mode: LabelMode) -> Self {
        self.label_mode = mode;
        self
    }
}
