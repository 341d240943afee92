//! TOML parser with line-context error messages

use std::path::Path;

use anyhow::{Context, Result};

use super::schema::LauncherConfig;

/// Parse launchpad.toml from disk.
pub fn parse_launchpad_toml(path: &Path) -> Result<LauncherConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_launchpad_toml_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse and validate launchpad.toml content.
pub fn parse_launchpad_toml_str(content: &str) -> Result<LauncherConfig> {
    let config: LauncherConfig =
        toml::from_str(content).map_err(|e| describe_toml_error(e, content))?;
    config.validate()?;
    Ok(config)
}

/// Serialize a configuration to TOML.
pub fn to_toml(config: &LauncherConfig) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to serialize config to TOML")
}

fn describe_toml_error(error: toml::de::Error, content: &str) -> anyhow::Error {
    let Some(span) = error.span() else {
        return anyhow::anyhow!("TOML parsing error: {}", error.message());
    };

    let line_num = content[..span.start.min(content.len())].lines().count().max(1);
    anyhow::anyhow!(
        "TOML parsing error at line {}:\n{}\n\nError: {}",
        line_num,
        line_context(content, line_num),
        error.message()
    )
}

fn line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(2);
    let end = (line_num + 1).min(lines.len());

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
