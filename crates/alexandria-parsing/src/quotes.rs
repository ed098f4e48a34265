use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

/// A quoted span: `start..end` covers the quote marks, `inner` the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct QuotedSpan {
    pub start: usize,
    pub end: usize,
    pub inner: Range<usize>,
}

struct QuoteForm {
    re: Regex,
    open_len: usize,
    close_len: usize,
}

impl QuoteForm {
    fn new(pattern: &str, open: char, close: char) -> Self {
        Self {
            re: Regex::new(pattern).unwrap(),
            open_len: open.len_utf8(),
            close_len: close.len_utf8(),
        }
    }
}

static QUOTE_FORMS: Lazy<Vec<QuoteForm>> = Lazy::new(|| {
    vec![
        QuoteForm::new(r#""(?P<inner>[^"]+)""#, '"', '"'),
        QuoteForm::new(r"“(?P<inner>[^“”]+)”", '“', '”'),
        QuoteForm::new(r"‘(?P<inner>[^‘’]+)’", '‘', '’'),
        // Single quotes double as apostrophes ("Reader's"), so the opening
        // mark must start a word and the closing one must be followed by
        // punctuation or "in".
        QuoteForm::new(
            r"(?:^|[\s(\[])'(?P<inner>[^']+?)'(?:\s*[.,;:]|\s+[Ii]n\b|\s*$)",
            '\'',
            '\'',
        ),
    ]
});

/// The earliest quoted span that plausibly holds a chapter title.
pub(crate) fn find_chapter_quote(text: &str) -> Option<QuotedSpan> {
    QUOTE_FORMS
        .iter()
        .filter_map(|form| {
            let inner = form.re.captures(text)?.name("inner")?;
            Some(QuotedSpan {
                start: inner.start() - form.open_len,
                end: inner.end() + form.close_len,
                inner: inner.range(),
            })
        })
        .min_by_key(|q| q.start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_quotes() {
        let text = r#"Christina Fink, "The Moment of the Monks: Burma, 2007", in Adam Roberts"#;
        let q = find_chapter_quote(text).unwrap();
        assert_eq!(&text[q.inner.clone()], "The Moment of the Monks: Burma, 2007");
        assert_eq!(&text[..q.start], "Christina Fink, ");
        assert_eq!(&text[q.end..], ", in Adam Roberts");
    }

    #[test]
    fn test_single_quotes() {
        let text = "Mead, J. G. (2005). 'Order Cetacea'. In Wilson, D. E.";
        let q = find_chapter_quote(text).unwrap();
        assert_eq!(&text[q.inner.clone()], "Order Cetacea");
        assert_eq!(&text[q.end..], ". In Wilson, D. E.");
    }

    #[test]
    fn test_typographic_quotes() {
        let text = "Smith (1999). “A Chapter”. In Jones (ed.). Book.";
        let q = find_chapter_quote(text).unwrap();
        assert_eq!(&text[q.inner.clone()], "A Chapter");
        assert_eq!(&text[q.end..], ". In Jones (ed.). Book.");
    }

    #[test]
    fn test_apostrophes_are_not_quotes() {
        assert_eq!(
            find_chapter_quote(
                "Underhill, David (1993). Australia's dangerous creatures. Sydney: Reader's Digest Services."
            ),
            None
        );
    }

    #[test]
    fn test_earliest_form_wins() {
        let text = r#"A (2000). 'First'. In "Second" (eds.)"#;
        let q = find_chapter_quote(text).unwrap();
        assert_eq!(&text[q.inner.clone()], "First");
    }
}
