use std::path::PathBuf;

use clap::Parser;
use hiers::{ConfigError, IdentifierScheme};

#[derive(Parser)]
#[command(
    name = "hiers",
    about = "HierS scaffold decomposition of SMILES",
    version
)]
pub struct Cli {
    /// Input file, one `SMILES [name]` per line (stdin if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output file for JSON lines (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Identifier scheme: canon_smiles, kekule_smiles, structure_hash or inchi
    #[arg(long, value_name = "SCHEME", value_parser = parse_scheme)]
    pub scheme: Option<IdentifierScheme>,

    /// Skip molecules with more ring systems than this
    #[arg(long, value_name = "N")]
    pub ring_cutoff: Option<usize>,

    /// JSON engine configuration; command-line options take precedence
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG is used if omitted
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

fn parse_scheme(s: &str) -> Result<IdentifierScheme, ConfigError> {
    s.parse()
}

pub fn parse() -> Cli {
    Cli::parse()
}
