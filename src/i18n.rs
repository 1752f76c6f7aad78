//! Two-locale string table for user-facing text.

use crate::config::Locale;

pub struct Strings {
    pub error_prefix: &'static str,
    /// Shown when the label dictionary cannot be loaded.
    pub labels_unavailable: &'static str,
    /// Stem of the generic argument label; the 1-based index is appended.
    pub arg_stem: &'static str,
    pub label_mode_caption: &'static str,
}

const JA: Strings = Strings {
    error_prefix: "エラー: ",
    labels_unavailable: "引数ラベル辞書の読み込みに失敗しました（汎用ラベルで続行します）。",
    arg_stem: "引数",
    label_mode_caption: "引数ラベル表示:",
};

const EN: Strings = Strings {
    error_prefix: "Error: ",
    labels_unavailable: "Failed to load the argument label dictionary (continuing with generic labels).",
    arg_stem: "arg",
    label_mode_caption: "Argument labels:",
};

#[must_use]
pub fn strings(locale: Locale) -> &'static Strings {
    match locale {
        Locale::Ja => &JA,
        Locale::En => &EN,
    }
}

/// `引数3` / `arg3` for the zero-based `index` 2.
#[must_use]
pub fn generic_arg_label(locale: Locale, index: usize) -> String {
    format!("{}{}", strings(locale).arg_stem, index + 1)
}
