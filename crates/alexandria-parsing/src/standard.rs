//! Type I and Type II extraction: author list, year, title, ISBN.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::isbn::extract_isbn;
use crate::record::StandardWork;
use crate::stop::{StopKeywords, find_stop};
use crate::text_processing::{
    bracket_depths, clean_name, clean_title, collapse_whitespace, first_year, non_empty,
    split_top_level, strip_leading_annotations, tidy_fragment,
};

/// The first parenthesized group holding a four-digit year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DateGroup {
    pub start: usize,
    pub end: usize,
    pub year: Option<String>,
}

pub(crate) fn find_date_group(text: &str) -> Option<DateGroup> {
    static DATE_GROUP: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\((?P<inner>[^()]*\d{4}[^()]*)\)").unwrap());
    let caps = DATE_GROUP.captures(text)?;
    let whole = caps.get(0)?;
    let year = caps
        .name("inner")
        .and_then(|inner| first_year(inner.as_str()))
        .map(|found| found.year);
    Some(DateGroup {
        start: whole.start(),
        end: whole.end(),
        year,
    })
}

/// A "[c. 1540" original-publication marker, which outranks the edition date.
pub(crate) fn circa_year(text: &str) -> Option<String> {
    static CIRCA: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[c\.\s*(\d{4})").unwrap());
    CIRCA.captures(text).map(|caps| caps[1].to_string())
}

/// Split at the stop point; without one the whole text is the head.
pub(crate) fn split_at_stop<'t>(text: &'t str, keywords: &StopKeywords) -> (&'t str, &'t str) {
    match find_stop(text, keywords) {
        Some(i) => text.split_at(i),
        None => (text, ""),
    }
}

/// Type I: `Authors (date). Title. Publisher. ISBN`.
///
/// Without a parenthesized year only the ISBN is recognized and the rest of
/// the text is left in `remaining_text`.
pub fn parse_standard(text: &str, keywords: &StopKeywords) -> StandardWork {
    let text = collapse_whitespace(text);
    let Some(date) = find_date_group(&text) else {
        let (isbn, remaining_text) = extract_isbn(&text);
        return StandardWork {
            isbn,
            remaining_text,
            ..Default::default()
        };
    };

    let authors = clean_name(&text[..date.start]);
    let year = circa_year(&text).or(date.year);
    let after = strip_leading_annotations(&text[date.end..]);
    let (title, rest) = split_at_stop(after, keywords);
    let (isbn, remaining_text) = extract_isbn(rest);

    StandardWork {
        authors,
        year,
        title: clean_title(title),
        isbn,
        remaining_text,
    }
}

/// Type II: the year stands on its own instead of following the authors.
///
/// Three layouts are recognized, tried in order:
/// - `Title (1986) by Author (Publisher)`
/// - `Author (2009). Title. Publisher Press` where the title may span
///   several sentences
/// - `Author, Title, Publisher, 1996`
pub fn parse_standalone_year(text: &str) -> StandardWork {
    static BY_CLAUSE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^\)?[\s,]*by\s+(?P<author>[^()\[\],;]+?)\s*(?:[(\[,;]|\.\s+\p{Lu}\p{Ll}|\.?$)")
            .unwrap()
    });
    static AUTHOR_YEAR_OPENING: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^(?P<authors>[^()]+?)\s*\((?P<date>[^()]*\d{4}[^()]*)\)[.,]?\s*").unwrap()
    });

    let text = collapse_whitespace(text);
    let (isbn, working) = extract_isbn(&text);
    let Some(year) = first_year(&working) else {
        return StandardWork {
            isbn,
            remaining_text: working,
            ..Default::default()
        };
    };
    let before = &working[..year.start];
    let after = &working[year.end..];

    if let Some(caps) = BY_CLAUSE.captures(after)
        && let Some(author) = caps.name("author")
    {
        let title = before.trim_end_matches(|c: char| {
            c.is_whitespace() || matches!(c, '(' | '[' | ',' | '.' | ';' | ':')
        });
        return StandardWork {
            authors: clean_name(author.as_str().trim_end_matches('.')),
            year: Some(year.year),
            title: non_empty(title),
            isbn,
            remaining_text: tidy_fragment(&after[author.end()..]),
        };
    }

    if let Some(caps) = AUTHOR_YEAR_OPENING.captures(&working)
        && let (Some(whole), Some(authors), Some(date)) =
            (caps.get(0), caps.name("authors"), caps.name("date"))
    {
        let rest = &working[whole.end()..];
        let end = title_end_before_imprint(rest);
        return StandardWork {
            authors: clean_name(authors.as_str()),
            year: first_year(date.as_str()).map(|found| found.year),
            title: clean_title(&rest[..end]),
            isbn,
            remaining_text: tidy_fragment(&rest[end..]),
        };
    }

    let prefix = before.trim_end_matches(|c: char| c.is_whitespace() || matches!(c, '(' | '[' | ','));
    let mut segments = split_top_level(prefix, ',');
    let publisher = if segments.len() >= 3 { segments.pop() } else { None };
    let (authors, title) = split_authors_title(&segments.join(", "));

    StandardWork {
        authors,
        year: Some(year.year),
        title,
        isbn,
        remaining_text: tidy_fragment(&format!("{} {}", publisher.unwrap_or_default(), after)),
    }
}

/// Title end for the `Author (year).` opening: the latest sentence break
/// before the first imprint keyword, or the keyword itself.
fn title_end_before_imprint(rest: &str) -> usize {
    static IMPRINT: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"\b(?:Press|Publishing|Publishers?|Verlag)\b|(?i:\bisbn\b)").unwrap()
    });
    let region_end = IMPRINT.find(rest).map_or(rest.len(), |m| m.start());
    let region = &rest[..region_end];
    let depths = bracket_depths(region);
    region
        .char_indices()
        .filter(|&(i, c)| {
            c == '.'
                && depths[i] == 0
                && region[i + 1..].chars().next().is_none_or(char::is_whitespace)
        })
        .map(|(i, _)| i)
        .last()
        .filter(|&i| i > 0)
        .unwrap_or(region_end)
}

/// `Kennedy, Frances H., ed., The Civil War Battlefield Guide` splits after
/// the editor marker; otherwise the last comma separates authors from title.
fn split_authors_title(joined: &str) -> (Option<String>, Option<String>) {
    static EDITOR_MARK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\beds?\.,").unwrap());
    if let Some(m) = EDITOR_MARK.find(joined) {
        return (
            clean_name(&joined[..m.end() - 1]),
            non_empty(&joined[m.end()..]),
        );
    }
    match joined.rfind(", ") {
        Some(i) => (clean_name(&joined[..i]), non_empty(&joined[i + 2..])),
        None => (None, non_empty(joined)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard(text: &str) -> StandardWork {
        parse_standard(text, &StopKeywords::default())
    }

    #[test]
    fn test_find_date_group() {
        let date = find_date_group("Vogelnest, Larry (18 August 2008). Medicine").unwrap();
        assert_eq!(date.year.as_deref(), Some("2008"));
        assert_eq!(date.start, 17);
        assert!(find_date_group("Title (3rd ed.) only").is_none());
    }

    #[test]
    fn test_circa_year() {
        assert_eq!(circa_year("(1950–82) [c. 1540–85]").as_deref(), Some("1540"));
        assert_eq!(circa_year("(1992) [1961]"), None);
    }

    #[test]
    fn test_standard_basic() {
        let r = standard("Butler, Susan (2009). The Dinkum Dictionary: The Origins of Australian Words. Text Publishing. p. 266. ISBN 978-1-921799-10-5.");
        assert_eq!(r.authors.as_deref(), Some("Butler, Susan"));
        assert_eq!(r.year.as_deref(), Some("2009"));
        assert_eq!(
            r.title.as_deref(),
            Some("The Dinkum Dictionary: The Origins of Australian Words")
        );
        assert_eq!(r.isbn.as_deref(), Some("978-1-921799-10-5"));
        assert_eq!(r.remaining_text, "Text Publishing. p. 266.");
    }

    #[test]
    fn test_standard_without_date() {
        let r = standard("Smith, John. My Book Title. Publisher Name. p. 123. ISBN 0-123-45678-9");
        assert_eq!(r.authors, None);
        assert_eq!(r.year, None);
        assert_eq!(r.title, None);
        assert_eq!(r.isbn.as_deref(), Some("0-123-45678-9"));
        assert_eq!(r.remaining_text, "Smith, John. My Book Title. Publisher Name. p. 123.");
    }

    #[test]
    fn test_standard_empty() {
        assert_eq!(standard(""), StandardWork::default());
    }

    #[test]
    fn test_standalone_trailing_year() {
        let r = parse_standalone_year("Barbara Triggs, The Wombat: Common Wombats in Australia, University of New South Wales Press, 1996, ISBN 0-86840-263-X.");
        assert_eq!(r.authors.as_deref(), Some("Barbara Triggs"));
        assert_eq!(r.year.as_deref(), Some("1996"));
        assert_eq!(r.title.as_deref(), Some("The Wombat: Common Wombats in Australia"));
        assert_eq!(r.isbn.as_deref(), Some("0-86840-263-X"));
        assert_eq!(r.remaining_text, "University of New South Wales Press");
    }

    #[test]
    fn test_standalone_without_year() {
        let r = parse_standalone_year("Some Title, Some Publisher");
        assert_eq!(r.year, None);
        assert_eq!(r.title, None);
        assert_eq!(r.remaining_text, "Some Title, Some Publisher");
    }

    #[test]
    fn test_title_end_before_imprint() {
        let rest = "A Study. Of Things. Edwin Mellen Press.";
        assert_eq!(&rest[..title_end_before_imprint(rest)], "A Study. Of Things");
        let rest = "No Breaks Here Press";
        assert_eq!(&rest[..title_end_before_imprint(rest)], "No Breaks Here ");
    }

    #[test]
    fn test_split_authors_title() {
        assert_eq!(
            split_authors_title("Kennedy, Frances H., ed., The Civil War Battlefield Guide, 2nd ed."),
            (
                Some("Kennedy, Frances H., ed.".to_string()),
                Some("The Civil War Battlefield Guide, 2nd ed.".to_string())
            )
        );
        assert_eq!(
            split_authors_title("Only A Title"),
            (None, Some("Only A Title".to_string()))
        );
    }
}
