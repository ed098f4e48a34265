use once_cell::sync::Lazy;
use regex::Regex;

use crate::isbn::isbn_end;
use crate::text_processing::collapse_whitespace;

/// Normalize a raw reference-list entry before parsing.
///
/// Removes the footnote caret and back-reference letters (`^ a b`), drops
/// everything after the ISBN (archive notes, retrieval dates, template error
/// text), and strips page markers and `(PDF)` annotations.
pub fn normalize_raw(text: &str) -> String {
    static CARET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\^\s*").unwrap());
    static LOWERCASE_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:\p{Ll}+\s+)+").unwrap());
    static PAGE_MARKER: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?:^|\s)(?i:pp?\.|pages?)\s*(?:\d+|[ivxlc]+\b)(?:\s*[–—-]\s*(?:\d+|[ivxlc]+\b))?\.?")
            .unwrap()
    });
    static PDF_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s*\(pdf\)").unwrap());
    static SPACE_BEFORE_PERIOD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+\.").unwrap());

    let mut text = collapse_whitespace(text);
    text = CARET.replace(&text, "").into_owned();
    text = LOWERCASE_PREFIX.replace(&text, "").into_owned();
    if let Some(end) = isbn_end(&text) {
        text.truncate(end);
    }
    text = PAGE_MARKER.replace_all(&text, "").into_owned();
    text = PDF_MARKER.replace_all(&text, "").into_owned();
    text = SPACE_BEFORE_PERIOD.replace_all(&text, ".").into_owned();
    let text = collapse_whitespace(&text);
    match text.strip_suffix('.') {
        Some(stripped) => stripped.trim_end().to_string(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncates_after_isbn() {
        assert_eq!(
            normalize_raw(
                "Taylor, Isaac (1898). Names and Their Histories: A Handbook of Historical Geography and Topographical Nomenclature. London: Rivingtons. ISBN 978-0-559-29668-0. Archived from the original on July 25, 2020. Retrieved October 12, 2008. {{cite book}}: ISBN / Date incompatibility (help)"
            ),
            "Taylor, Isaac (1898). Names and Their Histories: A Handbook of Historical Geography and Topographical Nomenclature. London: Rivingtons. ISBN 978-0-559-29668-0"
        );
    }

    #[test]
    fn test_page_ranges_after_isbn_dropped() {
        assert_eq!(
            normalize_raw("Smith, John (2000). Book Title. Publisher. ISBN 123-4-567-89012-3. pp. 139–141."),
            "Smith, John (2000). Book Title. Publisher. ISBN 123-4-567-89012-3"
        );
        assert_eq!(
            normalize_raw("Doe, Jane (1995). Another Book. Publisher. ISBN 987-6-543-21098-7. p. 251."),
            "Doe, Jane (1995). Another Book. Publisher. ISBN 987-6-543-21098-7"
        );
    }

    #[test]
    fn test_page_marker_before_isbn_removed() {
        assert_eq!(
            normalize_raw("Butler, Susan (2009). Words. Text Publishing. p. 266. ISBN 978-1-921799-10-5."),
            "Butler, Susan (2009). Words. Text Publishing. ISBN 978-1-921799-10-5"
        );
        assert_eq!(
            normalize_raw("Bonekemper, Edward (2014). Grant and Lee. Regnery Publishing. p. xiv. ISBN 978-1-62157-302-9"),
            "Bonekemper, Edward (2014). Grant and Lee. Regnery Publishing. ISBN 978-1-62157-302-9"
        );
    }

    #[test]
    fn test_pdf_marker_removed() {
        assert_eq!(
            normalize_raw("Author, Name (2010). Book Title (PDF). Publisher. ISBN 111-2-333-44444-5"),
            "Author, Name (2010). Book Title. Publisher. ISBN 111-2-333-44444-5"
        );
    }

    #[test]
    fn test_combined_cleanup() {
        assert_eq!(
            normalize_raw(
                "Author, Name (2010). Book Title (PDF). Publisher. ISBN 111-2-333-44444-5. pp. 139–141. Archived from original."
            ),
            "Author, Name (2010). Book Title. Publisher. ISBN 111-2-333-44444-5"
        );
    }

    #[test]
    fn test_caret_and_backreference_letters() {
        assert_eq!(
            normalize_raw("^ a b Domico, Terry (1988). Bears of the World. Facts on File."),
            "Domico, Terry (1988). Bears of the World. Facts on File"
        );
    }

    #[test]
    fn test_without_isbn_keeps_tail() {
        assert_eq!(
            normalize_raw("Helmholtz, Hermann (2005).  Physiological Optics .  Dover."),
            "Helmholtz, Hermann (2005). Physiological Optics. Dover"
        );
    }
}
