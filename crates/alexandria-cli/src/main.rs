use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use alexandria_parsing::config_file::{self, ConfigFile};
use alexandria_parsing::{CitationParser, CitationRecord, ParserKind};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod output;

use output::ColorMode;

/// Alexandria - Parse free-text bibliographic citations into structured records
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file (defaults to ALEXANDRIA_CONFIG, then
    /// ./.alexandria.toml over the platform config)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a single citation
    Parse {
        /// The citation text
        citation: String,

        /// Extractor to use: auto, or type1 through type5
        #[arg(long, default_value = "auto")]
        parser: String,

        /// Normalize the raw entry first (page markers, trailing notes, "(PDF)")
        #[arg(long)]
        clean: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Print a human-readable summary instead of JSON
        #[arg(long)]
        human: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Print the detected citation format and the extractor it maps to
    Classify {
        /// The citation text
        citation: String,
    },

    /// Print the normalized form of a raw reference-list entry
    Clean {
        /// The citation text
        citation: String,
    },

    /// Parse one citation per line from a file or stdin
    Batch {
        /// Input file; stdin when omitted or "-"
        file: Option<PathBuf>,

        /// Normalize each line before parsing
        #[arg(long)]
        clean: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Serialize)]
struct BatchOutput<'a> {
    results: &'a [CitationRecord],
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "alexandria=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config_file = resolve_config(cli.config)?;

    match cli.command {
        Command::Parse {
            citation,
            parser,
            clean,
            pretty,
            human,
            no_color,
        } => {
            let parser_kind = parse_parser_arg(&parser)?;
            let parser = build_parser(config_file, clean)?;
            let record = match parser_kind {
                Some(kind) => parser.parse_with(&citation, kind),
                None => parser.parse(&citation),
            };

            let mut stdout = std::io::stdout().lock();
            if human {
                let color = ColorMode(!no_color);
                output::print_record(&mut stdout, None, &citation, &record, color)?;
            } else {
                write_json(&mut stdout, &record, pretty)?;
            }
            Ok(())
        }
        Command::Classify { citation } => {
            let parser = build_parser(config_file, false)?;
            let format = parser.classify(&citation);
            println!("{} ({})", format, format.parser());
            Ok(())
        }
        Command::Clean { citation } => {
            let parser = build_parser(config_file, false)?;
            println!("{}", parser.clean(&citation));
            Ok(())
        }
        Command::Batch {
            file,
            clean,
            pretty,
        } => {
            let lines = match file {
                Some(ref path) if path != Path::new("-") => {
                    if !path.exists() {
                        anyhow::bail!("File not found: {}", path.display());
                    }
                    let file = std::fs::File::open(path)?;
                    read_citations(std::io::BufReader::new(file))?
                }
                _ => read_citations(std::io::stdin().lock())?,
            };

            tracing::debug!(count = lines.len(), "read citations");

            let parser = build_parser(config_file, clean)?;
            let results = parser.parse_batch(&lines);

            let mut stdout = std::io::stdout().lock();
            write_json(&mut stdout, &BatchOutput { results: &results }, pretty)?;
            Ok(())
        }
    }
}

/// Resolve configuration: --config flag > ALEXANDRIA_CONFIG > cascaded files.
/// An explicitly named file must exist and parse.
fn resolve_config(flag: Option<PathBuf>) -> anyhow::Result<ConfigFile> {
    let explicit = flag.or_else(|| std::env::var("ALEXANDRIA_CONFIG").ok().map(PathBuf::from));
    match explicit {
        Some(path) => Ok(config_file::read_config(&path)?),
        None => Ok(config_file::load_config()),
    }
}

fn build_parser(mut config_file: ConfigFile, clean: bool) -> anyhow::Result<CitationParser> {
    if clean {
        config_file.parsing.get_or_insert_with(Default::default).clean_input = Some(true);
    }
    let config = config_file.to_parsing_config()?;
    Ok(CitationParser::with_config(config))
}

/// `auto` selects by classification; anything else must name an extractor.
fn parse_parser_arg(value: &str) -> anyhow::Result<Option<ParserKind>> {
    if value.eq_ignore_ascii_case("auto") {
        return Ok(None);
    }
    Ok(Some(value.parse()?))
}

/// One citation per line; blank lines are skipped.
fn read_citations(reader: impl BufRead) -> std::io::Result<Vec<String>> {
    let mut citations = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            citations.push(line);
        }
    }
    Ok(citations)
}

fn write_json<T: Serialize>(w: &mut dyn Write, value: &T, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    writeln!(w, "{}", json)?;
    Ok(())
}
