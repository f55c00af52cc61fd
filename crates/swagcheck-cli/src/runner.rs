//! Subcommand handlers

use crate::commands::{EnvsArgs, ListArgs, RunArgs};
use crate::error::{CliError, CliResult};
use crate::output::Output;
use std::path::Path;
use swagcheck::config::{self, Settings};
use swagcheck::{scenarios, telemetry, DriverConfig, Harness, Launcher, SimDriver, SimOptions};
use tracing::info;

/// Output root used by `--simulate` when no settings file exists
pub const SIMULATED_OUTPUT_ROOT: &str = "target/swagcheck";

fn settings_for(args: &RunArgs) -> CliResult<Settings> {
    if args.simulate && !args.config.exists() {
        return Ok(Settings::new(&args.env, SimDriver::BASE_URL)
            .with_output_root(Path::new(SIMULATED_OUTPUT_ROOT)));
    }
    Ok(Settings::load(&args.config, &args.env)?)
}

fn launcher_for(args: &RunArgs) -> Launcher {
    if args.simulate {
        return Launcher::Simulated(SimOptions::default());
    }
    let mut driver = DriverConfig::new(args.browser.into()).headless(args.headless);
    if let Some(ref url) = args.webdriver_url {
        driver = driver.webdriver_url(url.as_str());
    }
    if let Some(ref path) = args.browser_path {
        driver = driver.executable_path(path);
    }
    Launcher::Browser(driver)
}

/// Run the selected scenarios and write the JSON report next to the logs
pub async fn run(args: &RunArgs, out: &Output) -> CliResult<()> {
    let selected = scenarios::select(args.filter.as_deref());
    if selected.is_empty() {
        return Err(CliError::invalid_argument(format!(
            "no scenario matches '{}'",
            args.filter.as_deref().unwrap_or_default()
        )));
    }

    let settings = config::install(settings_for(args)?);
    settings.ensure_dirs()?;
    if let Some(log) = telemetry::init(Some(&settings.output_logs)) {
        out.info(&format!("log file: {}", log.display()));
    }

    let launcher = launcher_for(args);
    if let Launcher::Browser(ref driver) = launcher {
        driver.backend()?;
    }
    let harness = Harness::new(settings.clone(), launcher);

    out.header(&format!(
        "{} scenarios on {} ({})",
        selected.len(),
        harness.settings().base_url,
        harness.launcher().browser_label()
    ));
    let summary = scenarios::run_all(&harness, selected).await;
    for result in &summary.results {
        out.case(result);
    }
    out.summary(&summary);

    let report = summary.write_json(&harness.settings().output_logs)?;
    out.info(&format!("report: {}", report.display()));
    info!(report = %report.display(), "done");

    if summary.all_passed() {
        Ok(())
    } else {
        Err(CliError::ScenariosFailed {
            failed: summary.failed(),
            total: summary.results.len(),
        })
    }
}

/// Print the catalogue
pub fn list(args: &ListArgs, out: &Output) -> CliResult<()> {
    let selected = scenarios::select(args.filter.as_deref());
    if selected.is_empty() {
        return Err(CliError::invalid_argument("no scenario matches the filter"));
    }
    for scenario in selected {
        out.info(&format!("{:<20} {}", scenario.id, scenario.name));
    }
    Ok(())
}

/// Print the environments of the settings file
pub fn envs(args: &EnvsArgs, out: &Output) -> CliResult<()> {
    for name in config::environments(&args.config)? {
        out.info(&name);
    }
    Ok(())
}
