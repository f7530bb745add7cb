//! styleframe CLI - build a styled xlsx workbook from a JSON description

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use styleframe_cli::{run_smoke_test, schema_json, versions, CommandLineInterface, Input};

#[derive(Parser)]
#[command(name = "styleframe")]
#[command(about = "Command-line interface for the styleframe library")]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .args(["version", "json_path", "json", "show_schema", "test"]),
))]
struct Cli {
    /// Print the versions of the tool and the library then quit
    #[arg(short = 'v', long)]
    version: bool,

    /// Path to a JSON file describing the workbook
    #[arg(long = "json_path", visible_alias = "json-path")]
    json_path: Option<PathBuf>,

    /// JSON string describing the workbook
    #[arg(long)]
    json: Option<String>,

    /// Print the JSON schema used for validation and exit
    #[arg(long = "show-schema")]
    show_schema: bool,

    /// Run a built-in smoke test and exit
    #[arg(long)]
    test: bool,

    /// Path of the output workbook
    #[arg(
        long = "output_path",
        visible_alias = "output-path",
        default_value = "output.xlsx"
    )]
    output_path: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("{}", versions());
        return Ok(());
    }
    if cli.show_schema {
        println!("{}", schema_json()?);
        return Ok(());
    }
    if cli.test {
        run_smoke_test().context("Smoke test failed")?;
        println!("Smoke test passed");
        return Ok(());
    }

    let input = cli.json_path.map(Input::Path).or(cli.json.map(Input::Json));
    let output = cli.output_path.display().to_string();
    CommandLineInterface::new(input, cli.output_path)
        .parse_as_json()
        .with_context(|| format!("Failed to write '{output}'"))?;
    Ok(())
}
