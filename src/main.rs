mod cli;
mod error;
mod io;
mod summary;
mod table;

use anyhow::{Result, Context};
use clap::Parser;
use log::{debug, info};
use std::fs::File;
use std::path::Path;

use crate::cli::{Cli, OutputFormat};
use crate::io::{open_output, write_lines, TableReader};
use crate::summary::{
    aggregate, format_json, format_summary, merge_into_mapping, Aggregator, SummaryConfig,
    TaxaSummary,
};
use crate::table::normalize;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(log_file) = &cli.log_file {
        let file = File::create(log_file)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.summary_config();
    debug!("Configuration: {}", serde_json::to_string(&config)?);

    if cli.category_mapping.is_some() && cli.format == OutputFormat::Json {
        return Err(anyhow::anyhow!(
            "JSON output is only available for standalone summaries, not with --category-mapping"
        ));
    }

    let reader = TableReader::new(&cli.otu_file);
    let summary = match &cli.relative_table {
        Some(relative_path) => {
            let lines = reader.read_lines()?;
            write_relative_table(&lines, relative_path)?;
            aggregate(&lines, &config)
                .with_context(|| format!("Failed to summarize {}", reader.path().display()))?
        }
        None => summarize_table(&reader, &config)?,
    };

    let output = match &cli.category_mapping {
        Some(mapping_path) => {
            info!("Adding taxa to category mapping {}", mapping_path.display());
            let mapping = TableReader::new(mapping_path).read_lines()?;
            merge_into_mapping(&summary, &mapping).with_context(|| {
                format!("Failed to merge taxa into {}", mapping_path.display())
            })?
        }
        None => match cli.format {
            OutputFormat::Tsv => format_summary(&summary),
            OutputFormat::Json => vec![format_json(&summary, config.level)?],
        },
    };

    let mut writer = open_output(cli.output.as_deref())?;
    write_lines(&mut *writer, &output)?;

    Ok(())
}

/// Aggregate the OTU table while streaming it. Relative abundance is applied
/// to the summed counts once the whole table has been read.
fn summarize_table(reader: &TableReader, config: &SummaryConfig) -> Result<TaxaSummary> {
    let mut aggregator = Aggregator::new(config);
    reader
        .process_lines(|line| Ok(aggregator.push_line(line)?))
        .with_context(|| format!("Failed to summarize {}", reader.path().display()))?;
    Ok(aggregator.finish())
}

fn write_relative_table(lines: &[String], path: &Path) -> Result<()> {
    info!("Writing relative abundance table to {}", path.display());
    let relative = normalize(lines)
        .with_context(|| format!("Failed to convert {} to relative abundance", path.display()))?;
    let mut writer = open_output(Some(path))?;
    write_lines(&mut *writer, &relative)?;
    Ok(())
}
