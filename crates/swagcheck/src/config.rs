//! Run settings: target URL, output directories and wait timing per environment.
//!
//! The settings document carries top-level defaults plus an `environments`
//! map. The selected environment overrides the defaults key by key:
//!
//! ```json
//! {
//!   "output_logs": "logs",
//!   "output_screenshots": "screenshots",
//!   "environments": {
//!     "stage": { "base_url": "https://www.saucedemo.com/" }
//!   }
//! }
//! ```
//!
//! Files ending in `.yaml` / `.yml` are read as YAML, everything else as JSON.

use crate::driver::BrowserKind;
use crate::result::{SwagError, SwagResult};
use crate::wait::{WaitOptions, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::info;

/// Environment used when none is selected
pub const DEFAULT_ENV: &str = "stage";

/// Settings file looked up when none is given
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Variable naming the settings file
pub const CONFIG_VAR: &str = "SWAG_CONFIG";
/// Variable selecting the environment
pub const ENV_VAR: &str = "SWAG_ENV";
/// Variable selecting the browser
pub const BROWSER_VAR: &str = "SWAG_BROWSER";
/// Variable enabling headless mode
pub const HEADLESS_VAR: &str = "SWAG_HEADLESS";

static GLOBAL: OnceLock<Settings> = OnceLock::new();

/// Keys an environment may override
#[derive(Debug, Clone, Default, Deserialize)]
struct Layer {
    base_url: Option<String>,
    output_logs: Option<PathBuf>,
    output_screenshots: Option<PathBuf>,
    timeout_ms: Option<u64>,
    poll_interval_ms: Option<u64>,
}

impl Layer {
    fn overlay(self, over: Self) -> Self {
        Self {
            base_url: over.base_url.or(self.base_url),
            output_logs: over.output_logs.or(self.output_logs),
            output_screenshots: over.output_screenshots.or(self.output_screenshots),
            timeout_ms: over.timeout_ms.or(self.timeout_ms),
            poll_interval_ms: over.poll_interval_ms.or(self.poll_interval_ms),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    environments: BTreeMap<String, Layer>,
    #[serde(flatten)]
    defaults: Layer,
}

impl Document {
    fn parse(text: &str, format: Format) -> SwagResult<Self> {
        Ok(match format {
            Format::Json => serde_json::from_str(text)?,
            Format::Yaml => serde_yaml_ng::from_str(text)?,
        })
    }
}

/// Settings document format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// JSON
    Json,
    /// YAML
    Yaml,
}

impl Format {
    /// Format implied by a file extension
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// Resolved settings of one environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// Selected environment
    pub env: String,
    /// Storefront root, always ending in `/`
    pub base_url: String,
    /// Directory receiving run logs and reports
    pub output_logs: PathBuf,
    /// Directory receiving failure screenshots
    pub output_screenshots: PathBuf,
    /// Wait deadline in milliseconds
    pub timeout_ms: u64,
    /// Wait poll interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Settings {
    /// Settings pointing at `base_url` with default directories and timing
    #[must_use]
    pub fn new(env: impl Into<String>, base_url: &str) -> Self {
        Self {
            env: env.into(),
            base_url: normalize_base_url(base_url),
            output_logs: PathBuf::from("logs"),
            output_screenshots: PathBuf::from("screenshots"),
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }

    /// Send logs and screenshots under `root`
    #[must_use]
    pub fn with_output_root(mut self, root: &Path) -> Self {
        self.output_logs = root.join("logs");
        self.output_screenshots = root.join("screenshots");
        self
    }

    /// Resolve `env` from a settings document
    pub fn parse(text: &str, format: Format, env: &str) -> SwagResult<Self> {
        let document = Document::parse(text, format)?;
        let Some(layer) = document.environments.get(env).cloned() else {
            return Err(SwagError::UnknownEnvironment {
                env: env.to_string(),
                available: document.environments.keys().cloned().collect(),
            });
        };
        let merged = document.defaults.overlay(layer);
        let base_url = merged
            .base_url
            .ok_or_else(|| SwagError::config(format!("env '{env}' has no base_url")))?;
        let defaults = Self::new(env, &base_url);
        Ok(Self {
            output_logs: merged.output_logs.unwrap_or(defaults.output_logs),
            output_screenshots: merged
                .output_screenshots
                .unwrap_or(defaults.output_screenshots),
            timeout_ms: merged.timeout_ms.unwrap_or(defaults.timeout_ms),
            poll_interval_ms: merged.poll_interval_ms.unwrap_or(defaults.poll_interval_ms),
            ..defaults
        })
    }

    /// Load `env` from a settings file and create its output directories.
    ///
    /// Relative output directories are resolved against the file's directory.
    pub fn load(path: &Path, env: &str) -> SwagResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            SwagError::config(format!("cannot read settings {}: {e}", path.display()))
        })?;
        let mut settings = Self::parse(&text, Format::from_path(path), env)?;
        if let Some(dir) = path.parent() {
            settings.output_logs = dir.join(&settings.output_logs);
            settings.output_screenshots = dir.join(&settings.output_screenshots);
        }
        settings.ensure_dirs()?;
        info!(
            env = %settings.env,
            base_url = %settings.base_url,
            config = %path.display(),
            "settings loaded"
        );
        Ok(settings)
    }

    /// Load from `SWAG_CONFIG` / `SWAG_ENV`, falling back to the defaults
    pub fn from_env() -> SwagResult<Self> {
        let path = std::env::var(CONFIG_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let env = std::env::var(ENV_VAR).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        Self::load(Path::new(&path), &env)
    }

    /// Create the output directories
    pub fn ensure_dirs(&self) -> SwagResult<()> {
        std::fs::create_dir_all(&self.output_logs)?;
        std::fs::create_dir_all(&self.output_screenshots)?;
        Ok(())
    }

    /// Wait timing of this environment
    #[must_use]
    pub const fn wait_options(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.timeout_ms,
            poll_interval_ms: self.poll_interval_ms,
        }
    }

    /// Full URL of `path` under the storefront root
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn normalize_base_url(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}

/// Environment names defined in a settings file, sorted
pub fn environments(path: &Path) -> SwagResult<Vec<String>> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        SwagError::config(format!("cannot read settings {}: {e}", path.display()))
    })?;
    let document = Document::parse(&text, Format::from_path(path))?;
    Ok(document.environments.into_keys().collect())
}

/// Install process-wide settings.
///
/// The first call wins; later calls return the settings already installed.
pub fn install(settings: Settings) -> &'static Settings {
    GLOBAL.get_or_init(|| settings)
}

/// Process-wide settings, if installed
#[must_use]
pub fn global() -> Option<&'static Settings> {
    GLOBAL.get()
}

/// Process-wide settings, loading them from the environment on first use
pub fn global_or_load() -> SwagResult<&'static Settings> {
    if let Some(settings) = global() {
        return Ok(settings);
    }
    Ok(install(Settings::from_env()?))
}

/// Browser named by `SWAG_BROWSER`, Chrome when unset
pub fn browser_from_env() -> SwagResult<BrowserKind> {
    std::env::var(BROWSER_VAR).map_or(Ok(BrowserKind::default()), |name| name.parse())
}

/// Headless flag from `SWAG_HEADLESS` (`1`, `true`, `yes`, `on`)
#[must_use]
pub fn headless_from_env() -> bool {
    std::env::var(HEADLESS_VAR).is_ok_and(|v| parse_flag(&v))
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
