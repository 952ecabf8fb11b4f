//! Runtime settings derived from the command line.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::args::Args;
use crate::domain::DEFAULT_PROVIDER_HOST;

pub const DEFAULT_OUTPUT_FILE: &str = "hypestat_data.xlsx";
pub const DEFAULT_INPUT_COLUMN: &str = "Link";
pub const DEFAULT_DELAY: Duration = Duration::from_millis(2000);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Statistics provider host, optionally with a scheme
    pub host: String,

    /// Bound on each request, connect through body
    pub timeout: Duration,

    /// Overrides the built-in desktop browser user agent
    pub user_agent: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_PROVIDER_HOST.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("xlsx") {
            Some(ExportFormat::Xlsx)
        } else if ext.eq_ignore_ascii_case("csv") {
            Some(ExportFormat::Csv)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub fetch: FetchConfig,

    /// Pause between consecutive requests
    pub delay: Duration,

    /// Column holding the domains in spreadsheet and CSV input
    pub input_column: String,

    /// Where results are written; `None` disables export
    pub output: Option<PathBuf>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            delay: DEFAULT_DELAY,
            input_column: DEFAULT_INPUT_COLUMN.to_string(),
            output: Some(PathBuf::from(DEFAULT_OUTPUT_FILE)),
        }
    }
}

impl ScraperConfig {
    pub fn from_args(args: &Args) -> Self {
        Self {
            fetch: FetchConfig {
                host: args.host.clone(),
                timeout: Duration::from_secs(args.timeout),
                user_agent: args.user_agent.clone(),
            },
            delay: Duration::from_millis(args.delay_ms),
            input_column: args.column.clone(),
            output: if args.no_export {
                None
            } else {
                Some(args.output.clone())
            },
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.fetch.timeout.is_zero() {
            anyhow::bail!("--timeout must be greater than 0");
        }

        if self.fetch.host.trim().is_empty() {
            anyhow::bail!("--host must not be empty");
        }

        if self.input_column.trim().is_empty() {
            anyhow::bail!("--column must not be empty");
        }

        if let Some(output) = &self.output {
            if ExportFormat::from_path(output).is_none() {
                anyhow::bail!(
                    "Unsupported output file {:?}: use a .xlsx or .csv extension",
                    output
                );
            }
        }

        Ok(())
    }

    pub fn export_format(&self) -> Option<ExportFormat> {
        self.output.as_deref().and_then(ExportFormat::from_path)
    }
}
