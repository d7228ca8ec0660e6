use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    Yaml,
}

/// Prints `value` as JSON or YAML; human output is left to the caller.
///
/// Returns `false` for [`OutputFormat::Human`].
pub fn emit_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Json => {
            let text = serde_json::to_string_pretty(value).context("Failed to encode JSON output")?;
            println!("{text}");
            Ok(true)
        }
        OutputFormat::Yaml => {
            let text = serde_yaml::to_string(value).context("Failed to encode YAML output")?;
            print!("{text}");
            Ok(true)
        }
        OutputFormat::Human => Ok(false),
    }
}
