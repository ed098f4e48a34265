use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::text_processing::tidy_fragment;

/// `ISBN`, an optional `-10`/`-13` suffix and colon, then digit groups joined
/// by hyphens or single spaces with an optional final check character `X`.
static ISBN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bISBN(?:-1[03])?:?\s*(?P<isbn>\d[\d-]*(?:\s\d[\d-]*)*X?)").unwrap()
});

/// Where the numeral inside a match really ends.
///
/// Space-joined groups are taken only while the running digit count lands on
/// 10 or 13, so a bare year after the number stays outside it. Returns the
/// numeral's start, the end of the span to cut, and the numeral itself.
fn isbn_number<'t>(caps: &Captures<'t>) -> Option<(usize, usize, &'t str)> {
    let m = caps.name("isbn")?;
    let raw = m.as_str();
    let mut digits = 0;
    let mut offset = 0;
    let mut len = 0;
    for (i, group) in raw.split(' ').enumerate() {
        digits += group
            .chars()
            .filter(|c| c.is_ascii_digit() || matches!(c, 'X' | 'x'))
            .count();
        if i > 0 && digits > 13 {
            break;
        }
        if i == 0 || digits == 10 || digits == 13 {
            len = offset + group.len();
        }
        offset += group.len() + 1;
    }
    let number = raw[..len].trim_end_matches(['-', ' ']);
    Some((m.start(), m.start() + len, number))
}

/// Find the first ISBN and cut every labelled ISBN span out of the text.
///
/// Returns the first numeral sequence (hyphens kept, label excluded) and the
/// text with the labelled spans removed, so running this on its own remainder
/// finds nothing. Without an ISBN the text comes back tidied but otherwise
/// unchanged.
pub fn extract_isbn(text: &str) -> (Option<String>, String) {
    let mut first = None;
    let mut remainder = String::with_capacity(text.len());
    let mut last = 0;
    for caps in ISBN_RE.captures_iter(text) {
        let (Some(whole), Some((_, end, number))) = (caps.get(0), isbn_number(&caps)) else {
            continue;
        };
        first.get_or_insert_with(|| number.to_string());
        remainder.push_str(&text[last..whole.start()]);
        remainder.push(' ');
        last = end;
    }
    remainder.push_str(&text[last..]);
    (first, tidy_fragment(&remainder))
}

/// Byte offset just past the first ISBN numeral, used to truncate trailing
/// archive and retrieval notes.
pub(crate) fn isbn_end(text: &str) -> Option<usize> {
    let caps = ISBN_RE.captures(text)?;
    let (start, _, number) = isbn_number(&caps)?;
    Some(start + number.len())
}

/// Check an ISBN-10 or ISBN-13 check digit. Separators are ignored.
///
/// Extraction never depends on this; it is reported alongside results.
pub fn isbn_checksum_valid(isbn: &str) -> bool {
    let chars: Vec<char> = isbn
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, 'X' | 'x'))
        .collect();
    match chars.len() {
        10 => valid_isbn10(&chars),
        13 => valid_isbn13(&chars),
        _ => false,
    }
}

fn valid_isbn10(chars: &[char]) -> bool {
    let mut sum = 0u32;
    for (i, c) in chars.iter().enumerate() {
        let value = match c {
            'X' | 'x' if i == 9 => 10,
            c => match c.to_digit(10) {
                Some(d) => d,
                None => return false,
            },
        };
        sum += value * (10 - i as u32);
    }
    sum % 11 == 0
}

fn valid_isbn13(chars: &[char]) -> bool {
    let mut sum = 0u32;
    for (i, c) in chars.iter().enumerate() {
        let Some(d) = c.to_digit(10) else {
            return false;
        };
        sum += if i % 2 == 0 { d } else { d * 3 };
    }
    sum % 10 == 0
}
