use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "tedscribe",
    about = "tedscribe - Collect transcripts and metadata from TED talk pages",
    version,
    long_about = "A CLI tool for extracting spoken-word transcripts and metadata from public \
TED talk pages, one URL at a time or in sequential batches, with JSON/CSV/TXT export."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract the transcript of a single talk
    Extract {
        /// TED talk URL, e.g. https://www.ted.com/talks/<slug>
        #[arg(value_name = "URL")]
        url: String,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Print a transcript preview after extraction
        #[arg(long)]
        preview: bool,

        #[command(flatten)]
        http: HttpOptions,
    },

    /// Extract transcripts for every URL listed in a file
    Batch {
        /// File with one talk URL per line (# comments and blank lines skipped;
        /// URLs are also harvested out of free text)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        #[command(flatten)]
        http: HttpOptions,
    },

    /// Show or persist extraction settings
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },
}

/// Request pacing and resilience knobs shared by extract and batch.
#[derive(Args)]
pub struct HttpOptions {
    /// Delay between requests in seconds (default: 2.0)
    #[arg(long, value_name = "SECONDS")]
    pub delay: Option<f64>,

    /// Request timeout in seconds (default: 30)
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Maximum retry attempts for transient failures (default: 3)
    #[arg(long, value_name = "COUNT")]
    pub retries: Option<u32>,

    /// Custom User-Agent header
    #[arg(long, value_name = "STRING")]
    pub user_agent: Option<String>,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormat {
    /// JSON array of talk records
    Json,
    /// One CSV row per talk
    Csv,
    /// Human-readable text blocks
    Txt,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Txt => write!(f, "txt"),
        }
    }
}
