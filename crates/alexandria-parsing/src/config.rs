use regex::Regex;

use crate::stop::{
    DEFAULT_ABBREVIATIONS, DEFAULT_EDITED_KEYWORDS, DEFAULT_PUBLISHER_KEYWORDS, StopKeywords,
};

/// Controls how a list of values is overridden from its defaults.
#[derive(Debug, Clone, Default)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Append these values to the defaults.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    /// Resolve this override against the given defaults.
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => defaults.to_vec(),
            ListOverride::Replace(v) => v.clone(),
            ListOverride::Extend(v) => {
                let mut result = defaults.to_vec();
                result.extend(v.iter().cloned());
                result
            }
        }
    }
}

/// Configuration for citation parsing.
///
/// Use [`ParsingConfigBuilder`] to construct one from string patterns.
#[derive(Debug, Clone, Default)]
pub struct ParsingConfig {
    /// Imprint words that end a title when they open a sentence.
    pub(crate) publisher_keywords: ListOverride<String>,
    /// Imprints only recognized while bounding edited-work titles.
    pub(crate) edited_keywords: ListOverride<String>,
    /// Tokens whose periods never end a title.
    pub(crate) abbreviations: ListOverride<String>,
    /// "Location: Publisher" detector. `None` uses the built-in pattern.
    pub(crate) location_re: Option<Regex>,
    /// Run [`normalize_raw`](crate::normalize_raw) on every input first.
    pub(crate) clean_input: bool,
}

fn owned(defaults: &[&str]) -> Vec<String> {
    defaults.iter().map(|s| s.to_string()).collect()
}

impl ParsingConfig {
    pub fn clean_input(&self) -> bool {
        self.clean_input
    }

    /// The resolved publisher keyword list.
    pub fn publisher_keywords(&self) -> Vec<String> {
        self.publisher_keywords.resolve(&owned(DEFAULT_PUBLISHER_KEYWORDS))
    }

    /// The resolved edited-work keyword list.
    pub fn edited_keywords(&self) -> Vec<String> {
        self.edited_keywords.resolve(&owned(DEFAULT_EDITED_KEYWORDS))
    }

    pub(crate) fn stop_keywords(&self) -> StopKeywords {
        StopKeywords::new(
            self.publisher_keywords(),
            self.abbreviations.resolve(&owned(DEFAULT_ABBREVIATIONS)),
            self.location_re.clone(),
        )
    }
}

/// Builder for [`ParsingConfig`].
///
/// The location pattern is compiled in [`build()`](Self::build), which fails
/// fast with `regex::Error` if it is invalid.
#[derive(Debug, Clone, Default)]
pub struct ParsingConfigBuilder {
    publisher_keywords: ListOverride<String>,
    edited_keywords: ListOverride<String>,
    abbreviations: ListOverride<String>,
    location_re: Option<String>,
    clean_input: Option<bool>,
}

fn push_extend(list: &mut ListOverride<String>, value: String) {
    match list {
        ListOverride::Extend(v) => v.push(value),
        _ => *list = ListOverride::Extend(vec![value]),
    }
}

impl ParsingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Publisher keywords ──

    pub fn set_publisher_keywords(mut self, keywords: Vec<String>) -> Self {
        self.publisher_keywords = ListOverride::Replace(keywords);
        self
    }

    pub fn add_publisher_keyword(mut self, keyword: String) -> Self {
        push_extend(&mut self.publisher_keywords, keyword);
        self
    }

    // ── Edited-work keywords ──

    pub fn set_edited_keywords(mut self, keywords: Vec<String>) -> Self {
        self.edited_keywords = ListOverride::Replace(keywords);
        self
    }

    pub fn add_edited_keyword(mut self, keyword: String) -> Self {
        push_extend(&mut self.edited_keywords, keyword);
        self
    }

    // ── Abbreviations ──

    pub fn set_abbreviations(mut self, abbreviations: Vec<String>) -> Self {
        self.abbreviations = ListOverride::Replace(abbreviations);
        self
    }

    pub fn add_abbreviation(mut self, abbreviation: String) -> Self {
        push_extend(&mut self.abbreviations, abbreviation);
        self
    }

    // ── Scalars ──

    pub fn location_regex(mut self, pattern: &str) -> Self {
        self.location_re = Some(pattern.to_string());
        self
    }

    pub fn clean_input(mut self, clean: bool) -> Self {
        self.clean_input = Some(clean);
        self
    }

    /// Compile the location pattern and produce a [`ParsingConfig`].
    pub fn build(self) -> Result<ParsingConfig, regex::Error> {
        Ok(ParsingConfig {
            publisher_keywords: self.publisher_keywords,
            edited_keywords: self.edited_keywords,
            abbreviations: self.abbreviations,
            location_re: self.location_re.map(|p| Regex::new(&p)).transpose()?,
            clean_input: self.clean_input.unwrap_or(false),
        })
    }
}
