use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ParsingError;
use crate::config::{ParsingConfig, ParsingConfigBuilder};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub parsing: Option<ParsingSection>,
    pub server: Option<ServerSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsingSection {
    /// Replace the built-in publisher keywords.
    pub publisher_keywords: Option<Vec<String>>,
    /// Append to the built-in publisher keywords.
    pub extra_publisher_keywords: Option<Vec<String>>,
    /// Append to the edited-work imprints ("facts on file").
    pub extra_edited_keywords: Option<Vec<String>>,
    /// Append to the abbreviations whose periods never end a title.
    pub extra_abbreviations: Option<Vec<String>>,
    /// Override the "Location: Publisher" pattern.
    pub location_regex: Option<String>,
    /// Normalize raw list entries before parsing.
    pub clean_input: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Platform config directory path: `<config_dir>/alexandria/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("alexandria").join("config.toml"))
}

/// Load config by cascading CWD `.alexandria.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".alexandria.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    match read_config(path) {
        Ok(config) => Some(config),
        Err(ParsingError::ConfigRead { .. }) => None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config file");
            None
        }
    }
}

/// Load a config the user asked for explicitly; unlike [`load_from_path`]
/// a missing or malformed file is an error.
pub fn read_config(path: &Path) -> Result<ConfigFile, ParsingError> {
    let content = std::fs::read_to_string(path).map_err(|source| ParsingError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ParsingError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let base_parsing = base.parsing.unwrap_or_default();
    let overlay_parsing = overlay.parsing.unwrap_or_default();
    let base_server = base.server.unwrap_or_default();
    let overlay_server = overlay.server.unwrap_or_default();

    ConfigFile {
        parsing: Some(ParsingSection {
            publisher_keywords: overlay_parsing
                .publisher_keywords
                .or(base_parsing.publisher_keywords),
            extra_publisher_keywords: overlay_parsing
                .extra_publisher_keywords
                .or(base_parsing.extra_publisher_keywords),
            extra_edited_keywords: overlay_parsing
                .extra_edited_keywords
                .or(base_parsing.extra_edited_keywords),
            extra_abbreviations: overlay_parsing
                .extra_abbreviations
                .or(base_parsing.extra_abbreviations),
            location_regex: overlay_parsing.location_regex.or(base_parsing.location_regex),
            clean_input: overlay_parsing.clean_input.or(base_parsing.clean_input),
        }),
        server: Some(ServerSection {
            host: overlay_server.host.or(base_server.host),
            port: overlay_server.port.or(base_server.port),
        }),
    }
}

impl ConfigFile {
    /// Build the parsing configuration described by this file.
    ///
    /// `publisher_keywords` replaces the defaults; when both it and
    /// `extra_publisher_keywords` are given the extras are appended to it.
    pub fn to_parsing_config(&self) -> Result<ParsingConfig, ParsingError> {
        let section = self.parsing.clone().unwrap_or_default();
        let mut builder = ParsingConfigBuilder::new();

        if let Some(keywords) = section.publisher_keywords {
            let mut keywords = keywords;
            keywords.extend(section.extra_publisher_keywords.clone().unwrap_or_default());
            builder = builder.set_publisher_keywords(keywords);
        } else {
            for keyword in section.extra_publisher_keywords.unwrap_or_default() {
                builder = builder.add_publisher_keyword(keyword);
            }
        }
        for keyword in section.extra_edited_keywords.unwrap_or_default() {
            builder = builder.add_edited_keyword(keyword);
        }
        for abbreviation in section.extra_abbreviations.unwrap_or_default() {
            builder = builder.add_abbreviation(abbreviation);
        }
        if let Some(pattern) = section.location_regex {
            builder = builder.location_regex(&pattern);
        }
        if let Some(clean) = section.clean_input {
            builder = builder.clean_input(clean);
        }

        Ok(builder.build()?)
    }
}
