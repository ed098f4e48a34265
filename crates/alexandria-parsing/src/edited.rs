use once_cell::sync::Lazy;
use regex::Regex;

use crate::isbn::extract_isbn;
use crate::record::EditedWork;
use crate::standard::{circa_year, find_date_group, split_at_stop};
use crate::stop::{StopKeywords, last_sentence_break};
use crate::text_processing::{
    bracket_depths, clean_name, clean_title, collapse_whitespace, strip_leading_annotations,
};

/// "(ed.)", "(eds.)", "(eds., trans.)" and similar.
static EDITOR_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\(eds?\.?[^()]*\)").unwrap());

/// Parse an edited work.
///
/// Handles both the editor-first layout
/// (`Author (1999). Editor (ed.). Title. Publisher.`) and the title-first one
/// (`Author (1999). Title. Editor (eds.). Publisher.`). `keywords` should
/// include the edited-work imprints.
pub fn parse_edited(text: &str, keywords: &StopKeywords) -> EditedWork {
    let text = collapse_whitespace(text);
    let Some(date) = find_date_group(&text) else {
        let (isbn, remaining_text) = extract_isbn(&text);
        return EditedWork {
            isbn,
            remaining_text,
            ..Default::default()
        };
    };

    let authors_raw = &text[..date.start];
    let year = circa_year(&text).or(date.year);
    let after = strip_leading_annotations(&text[date.end..]);
    let depths = bracket_depths(after);
    // The closing parenthesis sits at the outer depth.
    let marker = EDITOR_MARKER
        .find_iter(after)
        .find(|m| depths[m.end() - 1] == 0);

    let (editor, title, rest) = match marker {
        Some(m) => {
            let before = &after[..m.start()];
            match last_sentence_break(before, keywords) {
                Some((period, next)) => (clean_name(&before[next..]), &before[..period], &after[m.end()..]),
                None => {
                    let post = strip_leading_annotations(&after[m.end()..]);
                    let (title, rest) = split_at_stop(post, keywords);
                    (clean_name(before), title, rest)
                }
            }
        }
        None => {
            let (title, rest) = split_at_stop(after, keywords);
            (None, title, rest)
        }
    };
    let editor = editor.or_else(|| editor_from_authors(authors_raw));
    let (isbn, remaining_text) = extract_isbn(rest);

    EditedWork {
        authors: clean_name(authors_raw),
        year,
        editor,
        title: clean_title(title),
        isbn,
        remaining_text,
    }
}

/// `Smith, J. (ed.) (1999)`: the author list itself names the editor.
fn editor_from_authors(authors: &str) -> Option<String> {
    EDITOR_MARKER
        .is_match(authors)
        .then(|| EDITOR_MARKER.replace_all(authors, ""))
        .and_then(|names| clean_name(&names))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords() -> StopKeywords {
        StopKeywords::default().with_extra_publishers(&["facts on file".into()])
    }

    #[test]
    fn test_editor_first() {
        let r = parse_edited(
            "Domico, Terry (1988). Jones, Mary (ed.). Bears of the World. Facts on File. ISBN 978-0-8160-1536-8",
            &keywords(),
        );
        assert_eq!(r.authors.as_deref(), Some("Domico, Terry"));
        assert_eq!(r.year.as_deref(), Some("1988"));
        assert_eq!(r.editor.as_deref(), Some("Jones, Mary"));
        assert_eq!(r.title.as_deref(), Some("Bears of the World"));
        assert_eq!(r.isbn.as_deref(), Some("978-0-8160-1536-8"));
        assert_eq!(r.remaining_text, "Facts on File.");
    }

    #[test]
    fn test_title_first() {
        let r = parse_edited(
            "Sahagún, Bernardino de (1950–82) [c. 1540–85]. Florentine Codex, vols. I–XII. Charles E. Dibble and Arthur J.O. Anderson (eds., trans., notes and illus.). Santa Fe: School of American Research. ISBN 978-0-87480-082-1",
            &keywords(),
        );
        assert_eq!(r.authors.as_deref(), Some("Sahagún, Bernardino de"));
        assert_eq!(r.year.as_deref(), Some("1540"));
        assert_eq!(r.editor.as_deref(), Some("Charles E. Dibble and Arthur J.O. Anderson"));
        assert_eq!(r.title.as_deref(), Some("Florentine Codex, vols. I–XII"));
        assert_eq!(r.remaining_text, "Santa Fe: School of American Research.");
    }

    #[test]
    fn test_editor_in_author_list() {
        let r = parse_edited(
            "Smith, John (ed.) (1999). Collected Essays. Penguin.",
            &keywords(),
        );
        assert_eq!(r.authors.as_deref(), Some("Smith, John (ed.)"));
        assert_eq!(r.editor.as_deref(), Some("Smith, John"));
        assert_eq!(r.title.as_deref(), Some("Collected Essays"));
    }

    #[test]
    fn test_without_date() {
        let r = parse_edited("Jones, Mary (ed.). Untitled.", &keywords());
        assert_eq!(r.authors, None);
        assert_eq!(r.editor, None);
        assert_eq!(r.remaining_text, "Jones, Mary (ed.). Untitled.");
    }
}
