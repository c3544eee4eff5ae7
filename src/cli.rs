use clap::builder::{NonEmptyStringValueParser, RangedU64ValueParser};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::summary::SummaryConfig;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Summarize an OTU table by taxonomic lineage",
    long_about = "Makes a summary table of how abundant each taxon is in each sample. \
                  With --category-mapping the taxa are appended as columns to the mapping file instead; \
                  samples present in the mapping file but absent from the OTU table are not included in the output."
)]
pub struct Cli {
    /// OTU table with the taxonomic lineage in the last column
    #[arg(
        short = 'i',
        long = "otu-file",
        short_alias = 'O',
        alias = "otu_file",
        value_name = "PATH"
    )]
    pub otu_file: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long, alias = "output_file")]
    pub output: Option<PathBuf>,

    /// Number of lineage ranks to summarize at
    #[arg(
        short = 'L',
        long,
        default_value = "2",
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub level: usize,

    /// Category mapping file to add the taxon columns to
    #[arg(short = 'm', long, alias = "category_mapping", value_name = "PATH")]
    pub category_mapping: Option<PathBuf>,

    /// Separator between ranks of the lineage
    #[arg(
        short,
        long,
        alias = "delimitor",
        default_value = ";",
        value_parser = NonEmptyStringValueParser::new()
    )]
    pub delimiter: String,

    /// Report relative abundance per sample (True) or raw counts (False)
    #[arg(
        short = 'r',
        long,
        alias = "relative_abundance",
        value_name = "True|False",
        default_value = "True",
        action = clap::ArgAction::Set,
        value_parser = parse_flag
    )]
    pub relative_abundance: bool,

    /// Also write the OTU table converted to relative abundance
    #[arg(long, value_name = "PATH")]
    pub relative_table: Option<PathBuf>,

    /// Output format of the standalone summary
    #[arg(short = 'f', long, value_enum, default_value = "tsv")]
    pub format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to log file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum OutputFormat {
    Tsv,
    Json,
}

impl Cli {
    pub fn summary_config(&self) -> SummaryConfig {
        SummaryConfig {
            level: self.level,
            delimiter: self.delimiter.clone(),
            relative_abundance: self.relative_abundance,
        }
    }
}

fn parse_flag(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(format!("expected True or False, got '{}'", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["taxa-summary", "-i", "otu_table.txt"]).unwrap();
        assert_eq!(cli.otu_file, PathBuf::from("otu_table.txt"));
        assert_eq!(cli.output, None);
        assert_eq!(cli.category_mapping, None);
        assert_eq!(cli.relative_table, None);
        assert_eq!(cli.format, OutputFormat::Tsv);
        assert_eq!(cli.summary_config(), SummaryConfig::default());
    }

    #[test]
    fn test_options() {
        let cli = Cli::try_parse_from([
            "taxa-summary",
            "--otu-file",
            "otu_table.txt",
            "-L",
            "4",
            "--delimitor",
            "|",
            "-r",
            "False",
            "-m",
            "mapping.txt",
        ])
        .unwrap();
        let config = cli.summary_config();
        assert_eq!(config.level, 4);
        assert_eq!(config.delimiter, "|");
        assert!(!config.relative_abundance);
        assert_eq!(cli.category_mapping, Some(PathBuf::from("mapping.txt")));
    }

    #[test]
    fn test_underscore_aliases() {
        let cli = Cli::try_parse_from([
            "taxa-summary",
            "-O",
            "t.txt",
            "--output_file",
            "o.txt",
            "--category_mapping",
            "m.txt",
            "--relative_abundance",
            "False",
        ])
        .unwrap();
        assert_eq!(cli.otu_file, PathBuf::from("t.txt"));
        assert_eq!(cli.output, Some(PathBuf::from("o.txt")));
        assert_eq!(cli.category_mapping, Some(PathBuf::from("m.txt")));
        assert!(!cli.relative_abundance);

        let cli = Cli::try_parse_from(["taxa-summary", "--otu_file", "t.txt"]).unwrap();
        assert_eq!(cli.otu_file, PathBuf::from("t.txt"));
    }

    #[test]
    fn test_relative_table_option() {
        let cli = Cli::try_parse_from([
            "taxa-summary",
            "-i",
            "t.txt",
            "--relative-table",
            "relative.txt",
        ])
        .unwrap();
        assert_eq!(cli.relative_table, Some(PathBuf::from("relative.txt")));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Cli::try_parse_from(["taxa-summary", "-i", "t.txt", "-L", "0"]).is_err());
        assert!(Cli::try_parse_from(["taxa-summary", "-i", "t.txt", "-r", "maybe"]).is_err());
        assert!(Cli::try_parse_from(["taxa-summary", "-i", "t.txt", "-d", ""]).is_err());
        assert!(Cli::try_parse_from(["taxa-summary"]).is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("True"), Ok(true));
        assert_eq!(parse_flag("FALSE"), Ok(false));
        assert!(parse_flag("T").is_err());
    }
}
