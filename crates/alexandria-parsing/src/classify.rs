use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ParsingError;
use crate::quotes::find_chapter_quote;

/// The citation layout detected by [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitationFormat {
    /// A quoted chapter title inside an edited book.
    Chapter,
    /// A work carrying an "(ed.)" / "(eds.)" marker.
    Edited,
    /// Author list, parenthesized date, title.
    Standard,
    /// No parentheses, the year stands on its own.
    StandaloneYear,
}

impl CitationFormat {
    /// The extractor used for this layout.
    pub fn parser(self) -> ParserKind {
        match self {
            CitationFormat::Chapter => ParserKind::Type3,
            CitationFormat::Edited => ParserKind::Type5,
            CitationFormat::Standard => ParserKind::Type1,
            CitationFormat::StandaloneYear => ParserKind::Type2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CitationFormat::Chapter => "chapter",
            CitationFormat::Edited => "edited",
            CitationFormat::Standard => "standard",
            CitationFormat::StandaloneYear => "standalone_year",
        }
    }
}

impl fmt::Display for CitationFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explicit extractor selection, named the way the HTTP routes name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParserKind {
    /// Author (date). Title. Publisher.
    Type1,
    /// Author, Title, Publisher, year.
    Type2,
    /// Chapter in an edited book.
    Type3,
    /// Chapter in an edited book without a parenthesized date. Shares the
    /// chapter extractor with [`ParserKind::Type3`].
    Type4,
    /// Edited work.
    Type5,
}

impl ParserKind {
    pub const ALL: [ParserKind; 5] = [
        ParserKind::Type1,
        ParserKind::Type2,
        ParserKind::Type3,
        ParserKind::Type4,
        ParserKind::Type5,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ParserKind::Type1 => "type1",
            ParserKind::Type2 => "type2",
            ParserKind::Type3 => "type3",
            ParserKind::Type4 => "type4",
            ParserKind::Type5 => "type5",
        }
    }
}

impl fmt::Display for ParserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParserKind {
    type Err = ParsingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        let key = key.strip_prefix("type").unwrap_or(&key);
        match key {
            "1" => Ok(ParserKind::Type1),
            "2" => Ok(ParserKind::Type2),
            "3" => Ok(ParserKind::Type3),
            "4" => Ok(ParserKind::Type4),
            "5" => Ok(ParserKind::Type5),
            _ => Err(ParsingError::UnknownParser(s.to_string())),
        }
    }
}

/// Decide which extractor applies. Every input maps to exactly one layout;
/// the checks run in a fixed order and the first match wins.
pub fn classify(text: &str) -> CitationFormat {
    static PAREN_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^)]*\d{4}[^)]*\)").unwrap());
    static BARE_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

    if find_chapter_quote(text).is_some() {
        CitationFormat::Chapter
    } else if text.contains("(ed.") || text.contains("(eds.") {
        CitationFormat::Edited
    } else if PAREN_YEAR.is_match(text) {
        CitationFormat::Standard
    } else if BARE_YEAR.is_match(text) && !text.contains('(') {
        CitationFormat::StandaloneYear
    } else {
        CitationFormat::Standard
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_chapter() {
        assert_eq!(
            classify("Ashton, Sally-Ann (2001b), '163 Limestone head of Cleopatra VII', in Walker, Susan (eds.), Cleopatra of Egypt"),
            CitationFormat::Chapter
        );
        assert_eq!(
            classify(r#"Christina Fink, "The Moment of the Monks", in Adam Roberts (eds.), Civil Resistance, 2009."#),
            CitationFormat::Chapter
        );
    }

    #[test]
    fn test_quote_beats_editor_marker() {
        assert_eq!(
            classify("Mead, J. G. (2005). 'Order Cetacea'. In Wilson, D. E.; Reeder, D. M. (eds.). Mammal Species."),
            CitationFormat::Chapter
        );
    }

    #[test]
    fn test_classify_edited() {
        assert_eq!(
            classify("Domico, Terry (1988). Jones, Mary (ed.). Bears of the World. Facts on File."),
            CitationFormat::Edited
        );
    }

    #[test]
    fn test_classify_standard() {
        assert_eq!(
            classify("Butler, Susan (2009). The Dinkum Dictionary. Text Publishing."),
            CitationFormat::Standard
        );
        // "(4th rev. ed.)" is not an editor marker and the apostrophes are not quotes.
        assert_eq!(
            classify("Underhill, David (1993). Australia's dangerous creatures (4th rev. ed.). Sydney: Reader's Digest Services."),
            CitationFormat::Standard
        );
    }

    #[test]
    fn test_classify_standalone_year() {
        assert_eq!(
            classify("Barbara Triggs, The Wombat: Common Wombats in Australia, University of New South Wales Press, 1996, ISBN 0-86840-263-X."),
            CitationFormat::StandaloneYear
        );
    }

    #[test]
    fn test_classify_fallback_is_standard() {
        assert_eq!(classify(""), CitationFormat::Standard);
        assert_eq!(
            classify("Smith, John. My Book Title. Publisher Name. p. 123. ISBN 0-123-45678-9"),
            CitationFormat::Standard
        );
        // A bare year with parentheses elsewhere is not a standalone-year citation.
        assert_eq!(classify("Title (PDF), 1998"), CitationFormat::Standard);
    }

    #[test]
    fn test_format_maps_to_parser() {
        assert_eq!(CitationFormat::Chapter.parser(), ParserKind::Type3);
        assert_eq!(CitationFormat::Edited.parser(), ParserKind::Type5);
        assert_eq!(CitationFormat::Standard.parser(), ParserKind::Type1);
        assert_eq!(CitationFormat::StandaloneYear.parser(), ParserKind::Type2);
    }

    #[test]
    fn test_parser_kind_from_str() {
        assert_eq!("type1".parse::<ParserKind>().unwrap(), ParserKind::Type1);
        assert_eq!("Type4".parse::<ParserKind>().unwrap(), ParserKind::Type4);
        assert_eq!("5".parse::<ParserKind>().unwrap(), ParserKind::Type5);
        assert!(matches!(
            "type9".parse::<ParserKind>(),
            Err(ParsingError::UnknownParser(s)) if s == "type9"
        ));
        for kind in ParserKind::ALL {
            assert_eq!(kind.as_str().parse::<ParserKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&CitationFormat::StandaloneYear).unwrap(),
            "\"standalone_year\""
        );
        assert_eq!(serde_json::to_string(&ParserKind::Type3).unwrap(), "\"type3\"");
    }
}
