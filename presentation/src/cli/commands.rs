//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for deliberation results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Full transcript with every stage
    Full,
    /// Only the final message
    Final,
    /// JSON output
    Json,
}

impl From<OutputFormat> for council_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => council_domain::OutputFormat::Full,
            OutputFormat::Final => council_domain::OutputFormat::Final,
            OutputFormat::Json => council_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for hive-council
#[derive(Parser, Debug)]
#[command(name = "hive-council")]
#[command(author, version, about = "Agent council - five roles deliberate a task until consensus")]
#[command(long_about = r#"
Hive Council passes a task through a fixed council of reasoning roles:

  Input Processor -> Architect -> Critic -> Synthesizer -> Output Guard

Each stage sees the discussion so far. The Synthesizer declares consensus
with a `RESOLUTION: CONSENSUS` line; without it the task fails.

Configuration files are loaded from (in priority order):
1. COUNCIL_* environment variables (e.g. COUNCIL_DELIBERATION__MAX_STAGE_RETRIES=3)
2. --config <path>     Explicit config file
3. ./council.toml      Project-level config
4. ~/.config/hive-council/config.toml   Global config

Example:
  hive-council "Draft a go-to-market plan for a Nordic B2B SaaS"
  hive-council -o full "Should we migrate billing to Stripe?"
  hive-council --show-config
"#)]
pub struct Cli {
    /// The task for the council (not required with --show-config)
    pub task: Option<String>,

    /// Output format (overrides [output] format in config)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators and the live discussion
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Directory for daily rolling diagnostic log files
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Disable the stage progress bar
    #[arg(long)]
    pub no_progress: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_task_and_flags() {
        let cli = Cli::try_parse_from([
            "hive-council",
            "-vv",
            "--output",
            "json",
            "--no-progress",
            "Plan the launch",
        ])
        .unwrap();
        assert_eq!(cli.task.as_deref(), Some("Plan the launch"));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert!(cli.no_progress);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_output_defaults_to_config() {
        let cli = Cli::try_parse_from(["hive-council", "--show-config"]).unwrap();
        assert!(cli.output.is_none());
        assert!(cli.task.is_none());
        assert!(cli.show_config);
    }

    #[test]
    fn test_format_conversion() {
        assert_eq!(
            council_domain::OutputFormat::from(OutputFormat::Final),
            council_domain::OutputFormat::Final
        );
    }
}
