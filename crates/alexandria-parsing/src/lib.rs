use std::path::PathBuf;

use once_cell::sync::Lazy;
use thiserror::Error;

pub mod chapter;
pub mod classify;
pub mod cleanup;
pub mod config;
pub mod config_file;
pub mod edited;
pub mod isbn;
pub mod parser;
mod quotes;
pub mod record;
pub mod standard;
pub mod stop;
pub mod text_processing;

pub use chapter::parse_chapter;
pub use classify::{CitationFormat, ParserKind, classify};
pub use cleanup::normalize_raw;
pub use config::{ListOverride, ParsingConfig, ParsingConfigBuilder};
pub use edited::parse_edited;
pub use isbn::{extract_isbn, isbn_checksum_valid};
pub use parser::CitationParser;
pub use record::{ChapterInBook, CitationRecord, EditedWork, StandardWork};
pub use standard::{parse_standalone_year, parse_standard};
pub use stop::{StopKeywords, find_book_title_stop, find_stop};

#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error("unknown parser type: {0} (expected type1 through type5)")]
    UnknownParser(String),
    #[error("failed to read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

static DEFAULT_PARSER: Lazy<CitationParser> = Lazy::new(CitationParser::new);

/// Classify and parse a single citation with the default configuration.
///
/// Pipeline:
/// 1. Detect the layout (chapter, edited, standard, standalone year)
/// 2. Run the matching extractor
/// 3. Pull the ISBN out of whatever follows the title
pub fn parse_citation(text: &str) -> CitationRecord {
    DEFAULT_PARSER.parse(text)
}

/// Parse with a named extractor, bypassing classification.
pub fn parse_with(text: &str, kind: ParserKind) -> CitationRecord {
    DEFAULT_PARSER.parse_with(text, kind)
}

/// Parse many citations with the default configuration, in input order.
pub fn parse_batch<S: AsRef<str> + Sync>(items: &[S]) -> Vec<CitationRecord> {
    DEFAULT_PARSER.parse_batch(items)
}
