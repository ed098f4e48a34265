#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::ParsingConfig;
use crate::record::CitationRecord;
use crate::stop::StopKeywords;
use crate::{CitationFormat, ParserKind, chapter, classify, cleanup, edited, standard};

/// A configurable citation parser.
///
/// Holds a [`ParsingConfig`] plus the keyword tables derived from it and
/// exposes each step (cleanup, classification, extraction) as a method.
/// Parsing never fails: unrecognized input yields a record whose fields are
/// absent and whose `remaining_text` holds the input.
#[derive(Debug, Clone)]
pub struct CitationParser {
    config: ParsingConfig,
    keywords: StopKeywords,
    edited_keywords: StopKeywords,
}

impl Default for CitationParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CitationParser {
    /// Create a parser with default configuration.
    pub fn new() -> Self {
        Self::with_config(ParsingConfig::default())
    }

    /// Create a parser with a custom configuration.
    pub fn with_config(config: ParsingConfig) -> Self {
        let keywords = config.stop_keywords();
        let edited_keywords = keywords.with_extra_publishers(&config.edited_keywords());
        Self {
            config,
            keywords,
            edited_keywords,
        }
    }

    /// Get a reference to the current config.
    pub fn config(&self) -> &ParsingConfig {
        &self.config
    }

    /// Normalize a raw list entry (see [`normalize_raw`](crate::normalize_raw)).
    pub fn clean(&self, text: &str) -> String {
        cleanup::normalize_raw(text)
    }

    /// Detect the citation layout.
    pub fn classify(&self, text: &str) -> CitationFormat {
        classify::classify(&self.prepare(text))
    }

    /// Classify and parse a single citation.
    pub fn parse(&self, text: &str) -> CitationRecord {
        let text = self.prepare(text);
        let format = classify::classify(&text);
        tracing::debug!(format = %format, parser = %format.parser(), "classified citation");
        self.extract(&text, format.parser())
    }

    /// Parse with an explicitly chosen extractor, skipping classification.
    pub fn parse_with(&self, text: &str, kind: ParserKind) -> CitationRecord {
        let text = self.prepare(text);
        self.extract(&text, kind)
    }

    /// Parse every item, preserving input order. Items are independent; a
    /// bad item never affects the others.
    pub fn parse_batch<S: AsRef<str> + Sync>(&self, items: &[S]) -> Vec<CitationRecord> {
        tracing::info!(count = items.len(), "parsing citation batch");
        #[cfg(feature = "parallel")]
        {
            items.par_iter().map(|item| self.parse(item.as_ref())).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            items.iter().map(|item| self.parse(item.as_ref())).collect()
        }
    }

    fn prepare(&self, text: &str) -> String {
        if self.config.clean_input() {
            cleanup::normalize_raw(text)
        } else {
            text.to_string()
        }
    }

    fn extract(&self, text: &str, kind: ParserKind) -> CitationRecord {
        let record: CitationRecord = match kind {
            ParserKind::Type1 => standard::parse_standard(text, &self.keywords).into(),
            ParserKind::Type2 => standard::parse_standalone_year(text).into(),
            ParserKind::Type3 | ParserKind::Type4 => {
                chapter::parse_chapter(text, &self.keywords).into()
            }
            ParserKind::Type5 => edited::parse_edited(text, &self.edited_keywords).into(),
        };
        if record.is_empty() && !text.trim().is_empty() {
            tracing::debug!(parser = %kind, citation = %text, "no fields recognized");
        }
        record
    }
}
