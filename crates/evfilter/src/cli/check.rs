//! Check command implementation

use super::output;
use anyhow::{Context, Result};
use evfilter_expr::ExprNode;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

/// Configuration for check command
pub struct CheckConfig {
    pub file: PathBuf,
    pub output_format: Option<String>,
    pub output_file: Option<PathBuf>,
}

/// Static summary of a compiled tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSummary {
    pub rendering: String,
    pub variables: Vec<String>,
    pub streams: usize,
    pub uses_clock: bool,
}

impl TreeSummary {
    pub fn of(node: &ExprNode) -> Self {
        Self {
            rendering: node.to_string(),
            variables: node.variable_names().into_iter().map(str::to_string).collect(),
            streams: node.stream_count(),
            uses_clock: node.uses_clock(),
        }
    }
}

/// Parse a compiled tree and print its summary
pub fn check(config: CheckConfig) -> Result<()> {
    let json = fs::read_to_string(&config.file)
        .with_context(|| format!("Failed to read expression file: {}", config.file.display()))?;
    let node = evfilter_expr::from_json(&json)
        .with_context(|| format!("Failed to parse expression file: {}", config.file.display()))?;

    let format = output::OutputFormat::from_name(config.output_format.as_deref().unwrap_or("pretty"));
    output::print_output(&TreeSummary::of(&node), format, config.output_file.as_deref())
}
