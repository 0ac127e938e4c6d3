//! Config file parsing with helpful error messages

use super::schema::OctoConfig;
use anyhow::{Context, Result};
use std::path::Path;

/// On-disk encoding of a config file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// `.json` files are JSON, everything else is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

/// Read and parse a config file, picking the format from its extension
pub fn parse_config_file(path: &Path) -> Result<OctoConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let parsed = match ConfigFormat::from_path(path) {
        ConfigFormat::Toml => parse_octo_toml_str(&content),
        ConfigFormat::Json => parse_legacy_json_str(&content),
    };
    parsed.with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse octo.toml content from string
pub fn parse_octo_toml_str(content: &str) -> Result<OctoConfig> {
    toml::from_str(content).map_err(|e| enhance_toml_error(e, content))
}

/// Parse the legacy `{"url": ..., "apikey": ...}` JSON file
pub fn parse_legacy_json_str(content: &str) -> Result<OctoConfig> {
    serde_json::from_str(content).context("Invalid JSON configuration")
}

/// Enhance TOML parsing errors with the offending line
fn enhance_toml_error(error: toml::de::Error, content: &str) -> anyhow::Error {
    let line_hint = error
        .span()
        .map(|span| content[..span.start.min(content.len())].matches('\n').count() + 1);

    match line_hint {
        Some(line_num) => anyhow::anyhow!(
            "TOML parsing error at line {}:\n{}\n\nError: {}",
            line_num,
            get_line_context(content, line_num),
            error.message()
        ),
        None => anyhow::anyhow!("TOML parsing error: {}", error),
    }
}

/// Get context lines around an error
fn get_line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(2);
    let end = (line_num + 2).min(lines.len());

    lines[start.min(end)..end]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            let marker = if num == line_num { ">>>" } else { "   " };
            format!("{} {:4} | {}", marker, num, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
