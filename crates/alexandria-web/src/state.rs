use alexandria_parsing::CitationParser;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub parser: CitationParser,
}

impl AppState {
    pub fn new(parser: CitationParser) -> Self {
        Self { parser }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(CitationParser::new())
    }
}
