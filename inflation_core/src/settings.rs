// inflation_core/src/settings.rs

//! Configuration for the calculator front end.
//! Loads settings from a JSON file and validates them.

use anyhow::Context;
use chrono::Datelike;

use crate::index_table;

const MAX_SIMULATED_LATENCY_MS: u64 = 10_000;

/// Initial values offered to the user before they type anything.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DefaultInputs {
    #[serde(default = "default_amount")]
    pub amount: f64,
    #[serde(default = "default_start_year")]
    pub start_year: i32,
    #[serde(default = "current_year")]
    pub end_year: i32,
}

impl Default for DefaultInputs {
    fn default() -> Self {
        Self {
            amount: default_amount(),
            start_year: default_start_year(),
            end_year: current_year(),
        }
    }
}

/// Top-level settings structure.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// JSON table to use instead of the built-in CPI series.
    #[serde(default)]
    pub index_table_path: Option<std::path::PathBuf>,
    #[serde(default)]
    pub defaults: DefaultInputs,
    /// Artificial delay applied to every index lookup.
    #[serde(default)]
    pub simulated_latency_ms: u64,
}

impl Settings {
    pub fn load<P: AsRef<std::path::Path>>(settings_file_path: P) -> anyhow::Result<Self> {
        let settings_file_path = settings_file_path.as_ref();
        let contents = std::fs::read_to_string(settings_file_path)
            .with_context(|| format!("Failed to read settings '{}'", settings_file_path.display()))?;

        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> anyhow::Result<Self> {
        let settings: Settings = serde_json::from_str(contents)
            .map_err(|e| anyhow::anyhow!("Failed to parse settings JSON: {}", e))?;

        check_args(&settings)
            .map_err(|e| anyhow::anyhow!("Settings validation failed:\n{}", e))?;

        anyhow::Ok(settings)
    }

    /// The table named by `index_table_path`, or the built-in series.
    pub fn index_table(&self) -> anyhow::Result<index_table::IndexTable> {
        match &self.index_table_path {
            Some(path) => index_table::IndexTable::load(path),
            None => anyhow::Ok(index_table::IndexTable::builtin()),
        }
    }

    pub fn simulated_latency(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.simulated_latency_ms)
    }
}

fn check_args(settings: &Settings) -> anyhow::Result<()> {
    // check default amount
    {
        let amount = settings.defaults.amount;
        if !amount.is_finite() || amount <= 0.0 {
            anyhow::bail!("Default amount must be a positive number, got {}", amount);
        }
    }

    // check latency
    {
        if settings.simulated_latency_ms > MAX_SIMULATED_LATENCY_MS {
            anyhow::bail!(
                "'simulated_latency_ms' cannot exceed {}, got {}",
                MAX_SIMULATED_LATENCY_MS,
                settings.simulated_latency_ms,
            );
        }
    }

    // check table path
    {
        if let Some(path) = &settings.index_table_path {
            if path.as_os_str().is_empty() {
                anyhow::bail!("'index_table_path' cannot be empty!");
            }
        }
    }

    anyhow::Ok(())
}

fn default_amount() -> f64 {
    100.0
}

fn default_start_year() -> i32 {
    1995
}

fn current_year() -> i32 {
    chrono::Local::now().year()
}
