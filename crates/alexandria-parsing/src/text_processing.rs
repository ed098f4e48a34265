use once_cell::sync::Lazy;
use regex::Regex;

/// Collapse runs of whitespace to a single space and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    static WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
    WS.replace_all(text.trim(), " ").into_owned()
}

/// Tidy a fragment left behind after a span was cut out of a citation.
///
/// Whitespace is collapsed, punctuation orphaned by the cut (`". ."`, `",,"`)
/// is merged into the preceding mark, and leading punctuation is dropped.
/// A trailing period survives; trailing commas and semicolons do not.
pub(crate) fn tidy_fragment(text: &str) -> String {
    static SPACE_BEFORE_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+([.,;:])").unwrap());
    static REPEATED_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"([.,;:])[.,;:]+").unwrap());

    let text = collapse_whitespace(text);
    let text = SPACE_BEFORE_PUNCT.replace_all(&text, "$1");
    let text = REPEATED_PUNCT.replace_all(&text, "$1");
    text.trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '.' | ',' | ';' | ':'))
        .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':'))
        .to_string()
}

/// Bracket nesting depth at every byte offset of `text`.
///
/// `depths[i]` is the depth of the byte at `i`; an opening bracket sits at the
/// outer depth and its contents one level deeper. Unbalanced closers clamp at
/// zero. The vector has `text.len() + 1` entries so the end offset is valid.
pub(crate) fn bracket_depths(text: &str) -> Vec<u32> {
    let mut depths = Vec::with_capacity(text.len() + 1);
    let mut depth = 0u32;
    for b in text.bytes() {
        match b {
            b'(' | b'[' => {
                depths.push(depth);
                depth += 1;
            }
            b')' | b']' => {
                depth = depth.saturating_sub(1);
                depths.push(depth);
            }
            _ => depths.push(depth),
        }
    }
    depths.push(depth);
    depths
}

/// Split on `sep` wherever it occurs outside brackets. Pieces are trimmed and
/// empty pieces dropped.
pub(crate) fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let depths = bracket_depths(text);
    let mut pieces = Vec::new();
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if c == sep && depths[i] == 0 {
            pieces.push(&text[start..i]);
            start = i + c.len_utf8();
        }
    }
    pieces.push(&text[start..]);
    pieces
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Byte offset of the first `c` outside brackets.
pub(crate) fn first_top_level(text: &str, c: char) -> Option<usize> {
    let depths = bracket_depths(text);
    text.char_indices()
        .find(|&(i, ch)| ch == c && depths[i] == 0)
        .map(|(i, _)| i)
}

/// A four-digit year located inside a larger string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct YearMatch {
    pub start: usize,
    pub end: usize,
    pub year: String,
}

/// First run of exactly four digits in `text`.
pub(crate) fn first_year(text: &str) -> Option<YearMatch> {
    static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:^|\D)(\d{4})(?:\D|$)").unwrap());
    let m = YEAR.captures(text)?.get(1)?;
    Some(YearMatch {
        start: m.start(),
        end: m.end(),
        year: m.as_str().to_string(),
    })
}

/// Remove a located year together with the separator in front of it.
pub(crate) fn remove_year(text: &str, found: &YearMatch) -> String {
    let head = text[..found.start]
        .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';'));
    tidy_fragment(&format!("{} {}", head, &text[found.end..]))
}

/// Skip leading punctuation and bracketed annotations such as `[1961]` or
/// `[First published 1964]`.
pub(crate) fn strip_leading_annotations(text: &str) -> &str {
    let mut rest = text;
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '.' | ',' | ';' | ':'));
        match rest.strip_prefix('[').and_then(|r| r.find(']').map(|end| &r[end + 1..])) {
            Some(after) => rest = after,
            None => return rest,
        }
    }
}

/// Skip leading whitespace and punctuation.
pub(crate) fn trim_leading_punct(text: &str) -> &str {
    text.trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '.' | ',' | ';' | ':'))
}

pub(crate) fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Normalize an author or editor list: trim and drop trailing separators.
/// A trailing period is kept since it usually closes an initial or `ed.`.
pub(crate) fn clean_name(raw: &str) -> Option<String> {
    let name = collapse_whitespace(raw);
    non_empty(name.trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':')))
}

/// Normalize a title span: drop `(PDF)` markers, bracketed asides and a
/// trailing language note like `(in Chinese)`, then trim punctuation and a
/// single trailing period.
pub(crate) fn clean_title(raw: &str) -> Option<String> {
    static PDF_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s*\(pdf\)").unwrap());
    static BRACKETED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\[[^\]]*\]").unwrap());
    static LANGUAGE_NOTE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"\s*\(in \p{Lu}\p{Ll}+(?:\s+(?:and|&)\s+\p{Lu}\p{Ll}+)?\)").unwrap()
    });

    let title = PDF_MARKER.replace_all(raw, "");
    let title = BRACKETED.replace_all(&title, "");
    let title = LANGUAGE_NOTE.replace_all(&title, "");
    let title = collapse_whitespace(&title);
    let title = trim_leading_punct(&title)
        .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':'));
    let title = title.strip_suffix('.').unwrap_or(title);
    non_empty(title)
}
