use alexandria_parsing::CitationRecord;
use serde::{Deserialize, Serialize};

// ── Service status ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub message: &'static str,
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

// ── Parsing ─────────────────────────────────────────────────────────────

/// A missing or null citation parses as empty text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParseRequest {
    #[serde(default)]
    pub citation: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub citations: Vec<Option<String>>,
    /// Normalize each raw entry before parsing.
    #[serde(default)]
    pub clean: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchResponse {
    pub results: Vec<CitationRecord>,
}
