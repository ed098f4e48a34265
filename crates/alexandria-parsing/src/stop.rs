//! Finding where a title or name span ends.
//!
//! Citations separate their parts with periods and commas, but the same marks
//! also appear inside personal names ("Ulysses S. Grant"), abbreviations
//! ("U.S.", "Vol.") and parenthetical notes ("(3rd ed.)"). The locator walks
//! the candidate separators in order and keeps the earliest one that really
//! ends the span.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::text_processing::bracket_depths;

/// Words that, inside a capitalized run, identify an imprint.
pub const DEFAULT_PUBLISHER_KEYWORDS: &[&str] = &[
    "press",
    "publishing",
    "publishers",
    "publisher",
    "publications",
    "verlag",
    "university",
    "books",
    "society",
    "ltd",
    "inc",
    "co",
    "blackwell",
    "routledge",
    "wiley",
    "macmillan",
    "harpercollins",
    "penguin",
    "springer",
    "elsevier",
    "scribner",
    "norton",
    "knopf",
];

/// Extra imprints recognized when bounding the title of an edited work.
pub const DEFAULT_EDITED_KEYWORDS: &[&str] = &["facts on file"];

/// Tokens whose periods never end a span (compared without trailing dots).
pub const DEFAULT_ABBREVIATIONS: &[&str] = &[
    "U.S", "U.K", "U.N", "D.C", "St", "Mt", "Dr", "Mr", "Mrs", "Ms", "Jr", "Sr", "No", "Vol",
    "vol", "Vols", "vols", "vs", "etc", "cf", "ca", "ed", "eds", "rev", "trans", "Ltd", "Inc",
    "Co", "Ph.D",
];

/// "Location: Publisher", e.g. "London & New York: Routledge" or
/// "Washington, D.C.: Regnery".
pub const DEFAULT_LOCATION_PATTERN: &str = r"^\s*\p{Lu}[\p{L}\p{M}'’-]*(?:\s+(?:&|and|\p{Lu}[\p{L}\p{M}'’-]*)){0,4}(?:,\s*(?:(?:\p{Lu}\.)+|\p{Lu}\p{L}+))?\s*:\s*\S";

static DEFAULT_LOCATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_LOCATION_PATTERN).unwrap());

/// Capitalized words joined by the connectors found in imprint names.
static CAPITALIZED_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(\p{Lu}[\p{L}\p{M}'’&-]*(?:\s+(?:\p{Lu}[\p{L}\p{M}'’&-]*|of|on|and|for|the|de|du|&))*)",
    )
    .unwrap()
});

/// Literal markers that always end a title.
static STOP_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i:\bisbn\b|\bretrieved\b|\barchived\b)|\spp?\.(?:\s|\d)").unwrap()
});

static NEW_SENTENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\p{Lu}").unwrap());

static CAPITALIZED_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s+\p{Lu}\p{Ll}").unwrap());

static VOLUME_BEFORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[Vv]ol(?:ume)?\.?\s*\d+$").unwrap());

/// Text after a period that continues a personal name.
static NAME_CONTINUATION: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // Another initial: "J. R. R. Tolkien"
        Regex::new(r"^\s+\p{Lu}\.").unwrap(),
        // Lone capital glued to punctuation: "vols. I–XII"
        Regex::new(r"^\s+\p{Lu}[^\p{L}\s.,;:]").unwrap(),
        // Forename and initial: "Charles E. Dibble"
        Regex::new(r"^\s+\p{Lu}\p{Ll}+\s+\p{Lu}\.\s").unwrap(),
    ]
});

/// Keyword tables consulted by the locator. Built once per parser.
#[derive(Debug, Clone)]
pub struct StopKeywords {
    publishers: Vec<String>,
    abbreviations: Vec<String>,
    location_re: Regex,
}

impl Default for StopKeywords {
    fn default() -> Self {
        Self::new(
            DEFAULT_PUBLISHER_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            DEFAULT_ABBREVIATIONS.iter().map(|s| s.to_string()).collect(),
            None,
        )
    }
}

impl StopKeywords {
    /// Publisher keywords are matched case-insensitively as whole words;
    /// multi-word keywords ("facts on file") match as a phrase.
    pub fn new(publishers: Vec<String>, abbreviations: Vec<String>, location_re: Option<Regex>) -> Self {
        Self {
            publishers: publishers
                .into_iter()
                .map(|k| k.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            abbreviations,
            location_re: location_re.unwrap_or_else(|| DEFAULT_LOCATION_RE.clone()),
        }
    }

    /// A copy with additional publisher keywords.
    pub fn with_extra_publishers(&self, extra: &[String]) -> Self {
        let mut publishers = self.publishers.clone();
        publishers.extend(extra.iter().cloned());
        Self::new(publishers, self.abbreviations.clone(), Some(self.location_re.clone()))
    }

    pub fn publishers(&self) -> &[String] {
        &self.publishers
    }

    /// Does `after` open with imprint information?
    pub(crate) fn is_publisher_signature(&self, after: &str) -> bool {
        self.location_re.is_match(after) || self.run_names_publisher(after)
    }

    fn run_names_publisher(&self, after: &str) -> bool {
        let Some(run) = CAPITALIZED_RUN.captures(after).and_then(|c| c.get(1)) else {
            return false;
        };
        let words: Vec<String> = run
            .as_str()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect();
        let padded = format!(" {} ", words.join(" "));
        self.publishers
            .iter()
            .any(|kw| padded.contains(&format!(" {kw} ")))
    }

    /// Is the next word a prefix of a single-word publisher keyword
    /// ("Blackwell", "Univ")? Words under four letters never count.
    fn starts_with_keyword_prefix(&self, after: &str) -> bool {
        let word: String = after
            .trim_start()
            .chars()
            .take_while(|c| c.is_alphabetic())
            .collect();
        if word.chars().count() < 4 {
            return false;
        }
        let word = word.to_lowercase();
        self.publishers
            .iter()
            .any(|kw| !kw.contains(' ') && kw.starts_with(&word))
    }

    fn is_abbreviation(&self, token: &str) -> bool {
        let token = token
            .trim_start_matches(['(', '[', '"', '\'', '“', '‘'])
            .trim_end_matches('.');
        self.abbreviations.iter().any(|a| a == token)
    }
}

/// The whitespace-delimited token containing byte offset `i`.
fn token_around(text: &str, i: usize) -> &str {
    let start = text[..i]
        .rfind(char::is_whitespace)
        .map(|p| p + text[p..].chars().next().map_or(1, char::len_utf8))
        .unwrap_or(0);
    let end = text[i..]
        .find(char::is_whitespace)
        .map(|p| i + p)
        .unwrap_or(text.len());
    &text[start..end]
}

/// Does `before` end with a lone capital letter, i.e. an initial?
fn follows_initial(before: &str) -> bool {
    let mut chars = before.chars().rev();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.is_uppercase(),
        (Some(c), Some(prev)) => c.is_uppercase() && !prev.is_alphabetic(),
        _ => false,
    }
}

fn period_ends_span(text: &str, i: usize, keywords: &StopKeywords) -> bool {
    let after = &text[i + 1..];
    if keywords.is_publisher_signature(after) {
        return true;
    }
    if keywords.is_abbreviation(token_around(text, i)) {
        return false;
    }
    if follows_initial(&text[..i]) && CAPITALIZED_WORD.is_match(after) {
        return false;
    }
    if NAME_CONTINUATION.iter().any(|re| re.is_match(after)) {
        return false;
    }
    NEW_SENTENCE.is_match(after)
}

fn first_stop_token(text: &str, depths: &[u32]) -> Option<usize> {
    STOP_TOKEN
        .find_iter(text)
        .map(|m| m.start())
        .find(|&start| depths[start] == 0)
}

fn top_level_positions<'a>(
    text: &'a str,
    depths: &'a [u32],
    mark: char,
) -> impl Iterator<Item = usize> + 'a {
    text.char_indices()
        .filter(move |&(i, c)| c == mark && depths[i] == 0)
        .map(|(i, _)| i)
}

/// Earliest byte offset at which a title or author span must end.
///
/// Candidates are top-level periods that open a new sentence or imprint
/// (periods belonging to initials and abbreviations are skipped), the literal
/// markers `ISBN`, ` p.`, ` pp.`, `retrieved` and `archived`, and top-level
/// commas followed by a publisher keyword or a "Location: Publisher" pair.
/// Anything inside brackets is ignored.
pub fn find_stop(text: &str, keywords: &StopKeywords) -> Option<usize> {
    let depths = bracket_depths(text);

    let period = top_level_positions(text, &depths, '.').find(|&i| period_ends_span(text, i, keywords));
    let token = first_stop_token(text, &depths);
    let comma = top_level_positions(text, &depths, ',').find(|&i| {
        let after = &text[i + 1..];
        keywords.starts_with_keyword_prefix(after) || keywords.is_publisher_signature(after)
    });

    let stop = [period, token, comma].into_iter().flatten().min();
    tracing::trace!(?period, ?token, ?comma, ?stop, "stop candidates");
    stop
}

/// Stop for a book title that follows a chapter title.
///
/// Book titles often run over several sentences ("The American Connection.
/// Vol. 2"), so only imprint information, a sentence break right after a
/// volume number and the literal markers end them.
pub fn find_book_title_stop(text: &str, keywords: &StopKeywords) -> Option<usize> {
    let depths = bracket_depths(text);

    let period = top_level_positions(text, &depths, '.').find(|&i| {
        let after = &text[i + 1..];
        keywords.is_publisher_signature(after)
            || (VOLUME_BEFORE.is_match(&text[..i]) && NEW_SENTENCE.is_match(after))
    });
    let token = first_stop_token(text, &depths);

    [period, token].into_iter().flatten().min()
}

/// The last top-level sentence break in `text`, as `(period, next_start)`.
///
/// Periods of initials and abbreviations are not breaks.
pub(crate) fn last_sentence_break(text: &str, keywords: &StopKeywords) -> Option<(usize, usize)> {
    let depths = bracket_depths(text);
    top_level_positions(text, &depths, '.')
        .filter(|&i| {
            let after = &text[i + 1..];
            after.starts_with(char::is_whitespace)
                && NEW_SENTENCE.is_match(after)
                && !follows_initial(&text[..i])
                && !keywords.is_abbreviation(token_around(text, i))
        })
        .last()
        .map(|i| {
            let after = &text[i + 1..];
            (i, i + 1 + (after.len() - after.trim_start().len()))
        })
}
