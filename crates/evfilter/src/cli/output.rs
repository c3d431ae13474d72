//! Output formatting utilities

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::io::IsTerminal;
use std::path::Path;

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    #[default]
    JsonPretty,
}

impl OutputFormat {
    /// Parse a `--format` value; unknown names fall back to pretty JSON
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::JsonPretty,
        }
    }
}

/// Set up color output based on user preference
pub fn setup_colors(mode: &str) {
    match mode.to_lowercase().as_str() {
        "always" => colored::control::set_override(true),
        "never" => colored::control::set_override(false),
        _ => colored::control::set_override(std::io::stdout().is_terminal()),
    }
}

/// Format an error with its cause chain for display
pub fn format_error(error: &anyhow::Error) -> String {
    format!("{} {:#}", "Error:".red().bold(), error)
}

pub fn format_warning(warning: &str) -> String {
    format!("{} {}", "Warning:".yellow().bold(), warning)
}

pub fn format_success(message: &str) -> String {
    format!("{} {}", "Success:".green().bold(), message)
}

/// Write output to a file or stdout
pub fn write_output(content: &str, output_file: Option<&Path>) -> Result<()> {
    match output_file {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            eprintln!(
                "{}",
                format_success(&format!("Output written to {}", path.display()))
            );
        }
        None => println!("{}", content),
    }
    Ok(())
}

/// Serialize `value` in the requested format
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string(value),
        OutputFormat::JsonPretty => serde_json::to_string_pretty(value),
    };
    rendered.context("Failed to serialize JSON")
}

/// Print output in the specified format
pub fn print_output<T: Serialize>(
    value: &T,
    format: OutputFormat,
    output_file: Option<&Path>,
) -> Result<()> {
    write_output(&render(value, format)?, output_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("json", OutputFormat::Json)]
    #[case("JSON", OutputFormat::Json)]
    #[case("pretty", OutputFormat::JsonPretty)]
    #[case("table", OutputFormat::JsonPretty)]
    fn test_format_names(#[case] name: &str, #[case] expected: OutputFormat) {
        assert_eq!(OutputFormat::from_name(name), expected);
    }

    #[test]
    fn test_render() {
        let value = json!({"matched": true});
        assert_eq!(render(&value, OutputFormat::Json).unwrap(), r#"{"matched":true}"#);
        assert!(render(&value, OutputFormat::JsonPretty).unwrap().contains('\n'));
    }
}
