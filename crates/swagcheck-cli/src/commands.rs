//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use swagcheck::config::{BROWSER_VAR, CONFIG_VAR, DEFAULT_CONFIG_FILE, DEFAULT_ENV, ENV_VAR, HEADLESS_VAR};
use swagcheck::BrowserKind;

/// swagcheck: end-to-end checks for the Swag Labs storefront
#[derive(Parser, Debug)]
#[command(name = "swagcheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (only failures and the summary)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output
    #[arg(long, value_enum, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run scenarios against the storefront
    Run(RunArgs),

    /// List catalogued scenarios
    List(ListArgs),

    /// List environments defined in the settings file
    Envs(EnvsArgs),
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Environment to run against
    #[arg(short, long, env = ENV_VAR, default_value = DEFAULT_ENV)]
    pub env: String,

    /// Browser to drive
    #[arg(short, long, value_enum, env = BROWSER_VAR, default_value = "chrome", ignore_case = true)]
    pub browser: BrowserArg,

    /// Run the browser without a window
    #[arg(long, env = HEADLESS_VAR)]
    pub headless: bool,

    /// Settings file (JSON, or YAML by extension)
    #[arg(short, long, env = CONFIG_VAR, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Only run scenarios whose id or name contains this text
    #[arg(short, long)]
    pub filter: Option<String>,

    /// WebDriver server URL (required for Firefox)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Browser executable (required for Edge over CDP)
    #[arg(long)]
    pub browser_path: Option<PathBuf>,

    /// Drive the built-in simulated storefront instead of a browser
    #[arg(long)]
    pub simulate: bool,
}

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only list scenarios whose id or name contains this text
    #[arg(short, long)]
    pub filter: Option<String>,
}

/// Arguments for the envs command
#[derive(Args, Debug)]
pub struct EnvsArgs {
    /// Settings file
    #[arg(short, long, env = CONFIG_VAR, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
}

/// Browser argument
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserArg {
    /// Google Chrome / Chromium
    Chrome,
    /// Mozilla Firefox
    Firefox,
    /// Microsoft Edge
    Edge,
}

impl From<BrowserArg> for BrowserKind {
    fn from(arg: BrowserArg) -> Self {
        match arg {
            BrowserArg::Chrome => Self::Chrome,
            BrowserArg::Firefox => Self::Firefox,
            BrowserArg::Edge => Self::Edge,
        }
    }
}

/// Color argument
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorArg {
    /// Color when stdout is a terminal
    #[default]
    Auto,
    /// Always color
    Always,
    /// Never color
    Never,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_defaults() {
        let cli = Cli::try_parse_from(["swagcheck", "run", "--simulate"]).unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert!(args.simulate);
        assert_eq!(args.config, PathBuf::from("config.json"));
        assert!(args.filter.is_none());
    }

    #[test]
    fn test_browser_is_case_insensitive() {
        let cli = Cli::try_parse_from(["swagcheck", "run", "--browser", "Firefox"]).unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(BrowserKind::from(args.browser), BrowserKind::Firefox);
    }

    #[test]
    fn test_unknown_browser_rejected() {
        assert!(Cli::try_parse_from(["swagcheck", "run", "--browser", "safari"]).is_err());
    }
}
