use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result};
use hiers::{EngineConfig, ScaffoldEngine};
use log::info;

mod cli;
mod io;
mod logging;

fn main() -> ExitCode {
    let cli = cli::parse();
    let _logger = match logging::init_logging(cli.log_level.as_deref()) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: cli::Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(scheme) = cli.scheme {
        config.identifier_scheme = scheme;
    }
    if let Some(cutoff) = cli.ring_cutoff {
        config.ring_cutoff = cutoff;
    }
    info!(
        "scheme={} ring_cutoff={} merge_spiro={}",
        config.identifier_scheme, config.ring_cutoff, config.merge_spiro
    );

    let ring_cutoff = config.ring_cutoff;
    let engine = ScaffoldEngine::with_config(config);

    let entries = io::open_input(cli.input.as_deref())?.read_entries()?;
    let inputs: Vec<(&str, &str)> = entries
        .iter()
        .map(|(structure, name)| (structure.as_str(), name.as_str()))
        .collect();
    let result = engine.get_scaffolds_batch(&inputs, ring_cutoff);

    let mut out = io::create_output(cli.output.as_deref())?;
    for record in &result.records {
        serde_json::to_writer(&mut out, record).context("Failed to write record")?;
        writeln!(out)?;
    }
    out.flush().context("Failed to flush output")?;

    eprintln!("{}", serde_json::to_string(&result.stats)?);
    Ok(())
}
