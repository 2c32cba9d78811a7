//! `qido` - QIDO-RS query inspection tool
//!
//! Usage:
//!   qido parse --level series 'PatientName=Doe*&StudyDate=20190101-20190131&limit=10'
//!   qido resolve --dataset study.json ReferencedStudySequence.StudyDate

mod config;
mod logging;

use anyhow::Context;
use clap::{Parser, Subcommand};
use qido_query::{AttributeId, Dataset, QueryParser, ResourceType};
use serde_json::{json, Value as JsonValue};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::config::CliConfig;

#[derive(Parser, Debug)]
#[command(name = "qido")]
#[command(about = "Parse DICOMweb QIDO-RS queries and resolve attribute paths")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Maximum accepted `limit` value (overrides configuration)
    #[arg(long, global = true)]
    max_results: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a query string into a query expression
    Parse {
        /// Search level (study, series, instance)
        #[arg(short, long, default_value = "study")]
        level: ResourceType,

        /// URL-encoded query string, e.g. `PatientName=Doe*&limit=10`
        query: String,
    },

    /// Resolve an attribute path against a DICOM JSON dataset
    Resolve {
        /// DICOM JSON file (`-` for stdin)
        #[arg(short, long)]
        dataset: PathBuf,

        /// Dotted attribute path, keywords or GGGGEEEE
        path: String,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match CliConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            logging::init_simple_logging();
            tracing::error!(error = %e, "Failed to load configuration");
            return Err(e);
        }
    };
    if let Some(max_results) = args.max_results {
        config.query.max_result_count = max_results;
    }

    logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    let parser = QueryParser::new(config.query_options());
    let output = match args.command {
        Commands::Parse { level, query } => parse_query(&parser, level, &query)?,
        Commands::Resolve { dataset, path } => resolve_path(&parser, &dataset, &path)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn parse_query(parser: &QueryParser, level: ResourceType, query: &str) -> anyhow::Result<JsonValue> {
    tracing::info!(level = %level, query, "Parsing query");
    let expression = parser
        .parse_query_string(query, level)
        .with_context(|| format!("Invalid {level} query"))?;
    Ok(serde_json::to_value(&expression)?)
}

fn resolve_path(parser: &QueryParser, dataset: &Path, path: &str) -> anyhow::Result<JsonValue> {
    let text = read_input(dataset)?;
    let json: JsonValue = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse JSON from {}", dataset.display()))?;
    let dataset = Dataset::from_dicom_json(&json).context("Failed to read DICOM JSON dataset")?;

    let attribute_id = AttributeId::parse(path, &parser.tag_resolver())
        .with_context(|| format!("Invalid attribute path '{path}'"))?;
    tracing::info!(path = %attribute_id, depth = attribute_id.depth(), "Resolving attribute path");

    let values = dataset.values(&attribute_id);
    Ok(json!({
        "path": attribute_id.to_string(),
        "found": values.is_some(),
        "values": values.unwrap_or_default(),
    }))
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read dataset from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_line_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn parse_subcommand_reads_level() {
        let args = Args::parse_from(["qido", "parse", "--level", "series", "Modality=CT"]);
        match args.command {
            Commands::Parse { level, query } => {
                assert_eq!(level, ResourceType::Series);
                assert_eq!(query, "Modality=CT");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_query_emits_expression_json() {
        let parser = QueryParser::default();
        let output = parse_query(&parser, ResourceType::Study, "PatientName=Doe*&limit=10").unwrap();
        assert_eq!(output["limit"], json!(10));
        assert_eq!(
            output["filterConditions"],
            json!([{ "type": "singleValue", "tag": "00100010", "vr": "PN", "value": "Doe*" }])
        );
    }

    #[test]
    fn parse_query_reports_invalid_queries() {
        let parser = QueryParser::default();
        let err = parse_query(&parser, ResourceType::Study, "limit=1000").unwrap_err();
        assert!(err.to_string().contains("Invalid study query"));
    }

    #[test]
    fn resolve_path_reads_dataset_file() {
        let path = std::env::temp_dir().join(format!("qido-cli-test-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"00081110": {"vr": "SQ", "Value": [{"00080020": {"vr": "DA", "Value": ["20190101"]}}]}}"#,
        )
        .unwrap();

        let parser = QueryParser::default();
        let output = resolve_path(&parser, &path, "ReferencedStudySequence.StudyDate").unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(output["found"], json!(true));
        assert_eq!(output["values"], json!(["2019-01-01"]));
        assert_eq!(output["path"], json!("00081110.00080020"));
    }
}
