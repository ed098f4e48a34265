//! Chapter-in-book extraction.
//!
//! ```text
//! Chester, DK (2007). 'Geomythology…'. In Grattan, J (eds.). Living under the shadow. Walnut Creek: Left Coast.
//! Christina Fink, "The Moment of the Monks", in Adam Roberts (eds.), Civil Resistance, Oxford University Press, 2009.
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::isbn::extract_isbn;
use crate::quotes::find_chapter_quote;
use crate::record::ChapterInBook;
use crate::standard::{circa_year, find_date_group};
use crate::stop::{StopKeywords, find_book_title_stop};
use crate::text_processing::{
    clean_name, clean_title, collapse_whitespace, first_top_level, first_year, remove_year,
    trim_leading_punct,
};

/// "in <editors> (eds.)" after the chapter title.
static BOOK_EDITORS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[\s.,;:])[Ii]n:?\s+(?P<names>.+?\(eds?\.?\))\s*[,.:]?").unwrap()
});

/// Parse a chapter citation. The chapter title is the first quoted span;
/// without one only the ISBN is recognized.
pub fn parse_chapter(text: &str, keywords: &StopKeywords) -> ChapterInBook {
    let text = collapse_whitespace(text);
    let Some(quote) = find_chapter_quote(&text) else {
        let (isbn, remaining_text) = extract_isbn(&text);
        return ChapterInBook {
            isbn,
            remaining_text,
            ..Default::default()
        };
    };

    let prefix = &text[..quote.start];
    let (chapter_authors, mut year) = match find_date_group(prefix) {
        Some(date) => (
            clean_name(&prefix[..date.start]),
            circa_year(prefix).or(date.year),
        ),
        None => {
            let authors = prefix.trim_end().strip_suffix(',').unwrap_or(prefix);
            (clean_name(authors), None)
        }
    };
    let chapter_title = clean_title(&text[quote.inner.clone()]);

    let post = &text[quote.end..];
    let (book_authors, book_title, rest) = match BOOK_EDITORS.captures(post) {
        Some(caps) => {
            let names = caps.name("names").map(|m| m.as_str()).unwrap_or_default();
            let consumed = caps.get(0).map_or(0, |m| m.end());
            let tail = trim_leading_punct(&post[consumed..]);
            let end = [first_top_level(tail, ','), find_book_title_stop(tail, keywords)]
                .into_iter()
                .flatten()
                .min()
                .unwrap_or(tail.len());
            (clean_name(names), clean_title(&tail[..end]), &tail[end..])
        }
        None => {
            let tail = trim_leading_punct(post);
            let end = find_book_title_stop(tail, keywords).unwrap_or(tail.len());
            let book_title = clean_title(&tail[..end]);
            let book_authors = book_title.as_ref().and(chapter_authors.clone());
            (book_authors, book_title, &tail[end..])
        }
    };

    let (isbn, mut remaining_text) = extract_isbn(rest);
    if year.is_none()
        && let Some(found) = first_year(&remaining_text)
    {
        remaining_text = remove_year(&remaining_text, &found);
        year = Some(found.year);
    }

    ChapterInBook {
        chapter_authors,
        book_authors,
        year,
        chapter_title,
        book_title,
        isbn,
        remaining_text,
    }
}
