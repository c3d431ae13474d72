//! Run command implementation

use super::output;
use super::scenario::{Scenario, ScenarioRunner};
use anyhow::Result;
use std::path::PathBuf;

/// Configuration for run command
pub struct RunConfig {
    pub file: PathBuf,
    pub verbose: bool,
    pub output_format: Option<String>,
    pub output_file: Option<PathBuf>,
}

/// Replay a scenario file and print its report
pub fn run(config: RunConfig) -> Result<()> {
    if config.verbose {
        eprintln!("Running scenario: {}", config.file.display());
    }

    let scenario = Scenario::load(&config.file)?;
    let runner = ScenarioRunner::new(&scenario)?;

    if config.verbose {
        eprintln!(
            "Declared {} variable(s), {} filter(s), {} projection(s)",
            scenario.variables.len(),
            scenario.filters.len(),
            scenario.projections.len()
        );
    }

    let report = runner.run(&scenario.steps)?;

    let format = output::OutputFormat::from_name(config.output_format.as_deref().unwrap_or("pretty"));
    output::print_output(&report, format, config.output_file.as_deref())?;

    let faults = report.fault_count();
    if faults > 0 {
        eprintln!(
            "{}",
            output::format_warning(&format!("{} evaluation fault(s) reported", faults))
        );
    }
    if config.verbose {
        eprintln!(
            "{}",
            output::format_success(&format!(
                "{} event(s) replayed, {} match(es)",
                report.events.len(),
                report.match_count()
            ))
        );
    }

    Ok(())
}
