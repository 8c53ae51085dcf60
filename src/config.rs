use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const DB_ENV: &str = "EXPENSE_INTEL_DB";
const REPORT_ENV: &str = "EXPENSE_INTEL_REPORT";
const DB_FILE: &str = "expense-intel.db";
const REPORT_FILE: &str = "expense_report.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub(crate) db_path: PathBuf,
    /// Where `report` writes when no path is given on the command line.
    pub(crate) report_path: PathBuf,
}

impl Config {
    /// Read overrides from the environment, falling back to the platform
    /// data directory for the database.
    pub(crate) fn load() -> Result<Self> {
        let data_dir = data_dir()?;
        let config = Self::resolve(env_path(DB_ENV), env_path(REPORT_ENV), &data_dir);
        tracing::debug!(db = %config.db_path.display(), report = %config.report_path.display(), "config loaded");
        Ok(config)
    }

    pub(crate) fn resolve(
        db_override: Option<PathBuf>,
        report_override: Option<PathBuf>,
        data_dir: &Path,
    ) -> Self {
        Self {
            db_path: db_override.unwrap_or_else(|| data_dir.join(DB_FILE)),
            report_path: report_override.unwrap_or_else(|| PathBuf::from(REPORT_FILE)),
        }
    }
}

/// Unset and empty variables both count as absent.
fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "expense-intel", "ExpenseIntel")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.to_path_buf())
}
