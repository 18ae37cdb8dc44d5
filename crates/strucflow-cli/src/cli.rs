use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use strucflow::core::frequency::KeyRule;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "The strucflow developers",
    version,
    about = "strucflow CLI - Per-record analysis of columnar macromolecular structure collections: contacts, atom statistics, backbone fragments and sequence-similarity filtering.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List atom pairs within a distance cutoff, in one selection or across two.
    Contacts(ContactsArgs),
    /// List the selected atoms of every record.
    Atoms(AtomsArgs),
    /// Count the selected atoms by a key and merge the counts over all records.
    Frequency(FrequencyArgs),
    /// Cut every polymer chain into overlapping backbone fragments.
    Fragments(FragmentsArgs),
    /// Keep the polymer chains whose sequence is similar to a reference.
    Similarity(SimilarityArgs),
    /// Keep the records that pass resolution and R-free bounds.
    Quality(QualityArgs),
}

/// Input, output and configuration shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Path to the input records, one JSON-encoded structure record per line.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the output file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Path to an analysis configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override a configuration value using a KEY=VALUE format.
    /// Can be used multiple times, e.g., -S quality.max-resolution=2.5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,
}

/// Arguments for the `contacts` subcommand.
#[derive(Args, Debug)]
pub struct ContactsArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Override the inclusive distance cutoff in Angstroms.
    #[arg(long, value_name = "FLOAT")]
    pub cutoff: Option<f64>,
}

/// Arguments for the `atoms` subcommand.
#[derive(Args, Debug)]
pub struct AtomsArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the `frequency` subcommand.
#[derive(Args, Debug)]
pub struct FrequencyArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Override how atoms are keyed (atom-name, element, group-name, group-atom-name, group-and-atom).
    #[arg(short, long, value_name = "RULE")]
    pub key: Option<KeyRule>,
}

/// Arguments for the `fragments` subcommand.
#[derive(Args, Debug)]
pub struct FragmentsArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Override the fragment length. Zero or a negative value keeps whole chains.
    #[arg(short, long, value_name = "INT", allow_negative_numbers = true)]
    pub length: Option<i64>,

    /// Override the representative atom of each residue.
    #[arg(long, value_name = "NAME")]
    pub atom: Option<String>,

    /// Write one row per whole polymer chain instead of sliding windows.
    #[arg(long, conflicts_with = "length")]
    pub whole_chains: bool,
}

/// Arguments for the `similarity` subcommand.
#[derive(Args, Debug)]
pub struct SimilarityArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Override the reference protein sequence in one-letter codes.
    #[arg(short, long, value_name = "SEQUENCE")]
    pub reference: Option<String>,

    /// Override the minimum similarity (0.0 to 1.0) a chain needs to be kept.
    #[arg(short, long, value_name = "FLOAT")]
    pub min_similarity: Option<f64>,

    /// Override the representative atom of each residue.
    #[arg(long, value_name = "NAME")]
    pub atom: Option<String>,
}

/// Arguments for the `quality` subcommand.
#[derive(Args, Debug)]
pub struct QualityArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Override the maximum (exclusive) resolution in Angstroms.
    #[arg(long, value_name = "FLOAT")]
    pub max_resolution: Option<f64>,

    /// Override the maximum (exclusive) R-free value.
    #[arg(long, value_name = "FLOAT")]
    pub max_r_free: Option<f64>,
}
