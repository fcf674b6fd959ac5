use once_cell::sync::Lazy;
use regex::Regex;

// @module: Verse text cleaning and numbering

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static BRACKET_FOOTNOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[.*?\]").unwrap());
static SUPERSCRIPT_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new("[\u{00b9}\u{00b2}\u{00b3}\u{2070}\u{2074}-\u{2079}]+").unwrap());
static TRAILING_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\d+\s*$").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Remove HTML tags and trim
pub fn strip_html(text: &str) -> String {
    HTML_TAG.replace_all(text, "").trim().to_string()
}

/// Clean a translation line for subtitle display: strip HTML, drop
/// square-bracket footnotes and superscript markers, drop a trailing bare
/// verse number, collapse whitespace. Parenthetical text is preserved.
pub fn clean_translation_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = strip_html(text);
    let text = BRACKET_FOOTNOTE.replace_all(&text, "");
    let text = SUPERSCRIPT_DIGITS.replace_all(&text, "");
    let text = TRAILING_NUMBER.replace_all(&text, "");
    WHITESPACE_RUN.replace_all(&text, " ").trim().to_string()
}

/// Arabic-style verse marker appended to Arabic text: the ordinal rendered in
/// Arabic-Indic digits inside ornate parentheses, e.g. ` ﴿١٢﴾` for verse 12.
pub fn arabic_verse_marker(ordinal: usize) -> String {
    let digits: String = ordinal
        .to_string()
        .chars()
        .map(|d| {
            // '0'..'9' map onto U+0660..U+0669
            char::from_u32(0x0660 + d.to_digit(10).unwrap_or(0)).unwrap_or(d)
        })
        .collect();

    format!(" \u{fd3f}{}\u{fd3e}", digits)
}

/// Prefix a translation line with its 1-based verse ordinal
pub fn number_translation(ordinal: usize, text: &str) -> String {
    format!("{}. {}", ordinal, text)
}
