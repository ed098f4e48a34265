use serde::Serialize;

/// Author/year/title citation (books, reports, standalone-year entries).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StandardWork {
    pub authors: Option<String>,
    pub year: Option<String>,
    pub title: Option<String>,
    pub isbn: Option<String>,
    pub remaining_text: String,
}

/// A work credited to an editor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EditedWork {
    pub authors: Option<String>,
    pub year: Option<String>,
    /// Editor names without the "(ed.)" marker.
    pub editor: Option<String>,
    pub title: Option<String>,
    pub isbn: Option<String>,
    pub remaining_text: String,
}

/// A chapter published inside an edited book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChapterInBook {
    pub chapter_authors: Option<String>,
    /// Book editors with their "(eds.)" marker, or the chapter authors when
    /// the citation names no editors.
    pub book_authors: Option<String>,
    pub year: Option<String>,
    pub chapter_title: Option<String>,
    pub book_title: Option<String>,
    pub isbn: Option<String>,
    pub remaining_text: String,
}

/// Structured result of parsing one citation.
///
/// Serializes as the flat field set of its variant, absent fields as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CitationRecord {
    Standard(StandardWork),
    Edited(EditedWork),
    Chapter(ChapterInBook),
}

impl CitationRecord {
    pub fn year(&self) -> Option<&str> {
        match self {
            CitationRecord::Standard(r) => r.year.as_deref(),
            CitationRecord::Edited(r) => r.year.as_deref(),
            CitationRecord::Chapter(r) => r.year.as_deref(),
        }
    }

    pub fn isbn(&self) -> Option<&str> {
        match self {
            CitationRecord::Standard(r) => r.isbn.as_deref(),
            CitationRecord::Edited(r) => r.isbn.as_deref(),
            CitationRecord::Chapter(r) => r.isbn.as_deref(),
        }
    }

    /// The work's own title: the book title, or the chapter title for chapters.
    pub fn title(&self) -> Option<&str> {
        match self {
            CitationRecord::Standard(r) => r.title.as_deref(),
            CitationRecord::Edited(r) => r.title.as_deref(),
            CitationRecord::Chapter(r) => r.chapter_title.as_deref(),
        }
    }

    pub fn remaining_text(&self) -> &str {
        match self {
            CitationRecord::Standard(r) => &r.remaining_text,
            CitationRecord::Edited(r) => &r.remaining_text,
            CitationRecord::Chapter(r) => &r.remaining_text,
        }
    }

    /// `(name, value)` pairs in serialization order, for display.
    pub fn fields(&self) -> Vec<(&'static str, Option<&str>)> {
        match self {
            CitationRecord::Standard(r) => vec![
                ("authors", r.authors.as_deref()),
                ("year", r.year.as_deref()),
                ("title", r.title.as_deref()),
                ("isbn", r.isbn.as_deref()),
                ("remaining_text", Some(r.remaining_text.as_str())),
            ],
            CitationRecord::Edited(r) => vec![
                ("authors", r.authors.as_deref()),
                ("year", r.year.as_deref()),
                ("editor", r.editor.as_deref()),
                ("title", r.title.as_deref()),
                ("isbn", r.isbn.as_deref()),
                ("remaining_text", Some(r.remaining_text.as_str())),
            ],
            CitationRecord::Chapter(r) => vec![
                ("chapter_authors", r.chapter_authors.as_deref()),
                ("book_authors", r.book_authors.as_deref()),
                ("year", r.year.as_deref()),
                ("chapter_title", r.chapter_title.as_deref()),
                ("book_title", r.book_title.as_deref()),
                ("isbn", r.isbn.as_deref()),
                ("remaining_text", Some(r.remaining_text.as_str())),
            ],
        }
    }

    /// True when nothing besides leftover text was recognized.
    pub fn is_empty(&self) -> bool {
        self.fields()
            .iter()
            .all(|(name, value)| *name == "remaining_text" || value.is_none())
    }
}

impl From<StandardWork> for CitationRecord {
    fn from(r: StandardWork) -> Self {
        CitationRecord::Standard(r)
    }
}

impl From<EditedWork> for CitationRecord {
    fn from(r: EditedWork) -> Self {
        CitationRecord::Edited(r)
    }
}

impl From<ChapterInBook> for CitationRecord {
    fn from(r: ChapterInBook) -> Self {
        CitationRecord::Chapter(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_flat_with_nulls() {
        let record = CitationRecord::from(StandardWork {
            authors: Some("Butler, Susan".into()),
            year: Some("2009".into()),
            remaining_text: "Text Publishing.".into(),
            ..Default::default()
        });
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "authors": "Butler, Susan",
                "year": "2009",
                "title": null,
                "isbn": null,
                "remaining_text": "Text Publishing."
            })
        );
    }

    #[test]
    fn test_chapter_field_names() {
        let json = serde_json::to_value(CitationRecord::from(ChapterInBook::default())).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        for key in [
            "chapter_authors",
            "book_authors",
            "year",
            "chapter_title",
            "book_title",
            "isbn",
            "remaining_text",
        ] {
            assert!(keys.contains(&key), "missing {key}");
        }
    }

    #[test]
    fn test_accessors() {
        let record = CitationRecord::from(ChapterInBook {
            chapter_title: Some("Order Cetacea".into()),
            isbn: Some("978-0-8018-8221-0".into()),
            ..Default::default()
        });
        assert_eq!(record.title(), Some("Order Cetacea"));
        assert_eq!(record.isbn(), Some("978-0-8018-8221-0"));
        assert_eq!(record.year(), None);
        assert!(!record.is_empty());
        assert!(CitationRecord::from(EditedWork::default()).is_empty());
    }
}
