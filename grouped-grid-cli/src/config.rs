//! CLI settings file

use std::fs;
use std::path::Path;

use anyhow::Context;
use grouped_grid_lib::GridConfig;
use serde::Deserialize;

use crate::args::GridArgs;
use crate::paths;

/// Environment variable read for the bearer token by default.
pub const DEFAULT_TOKEN_VAR: &str = "DATAVERSE_TOKEN";

/// Contents of `config.toml`.
///
/// ```toml
/// url = "https://org.crm.dynamics.com"
///
/// [grid]
/// groupingColumn = "statuscode"
/// collapsed = true
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub grid: GridConfig,
    /// Default environment URL.
    pub url: Option<String>,
    /// Environment variable holding the bearer token.
    pub token_env: Option<String>,
    /// Log level used without `--verbose`.
    pub log_level: Option<String>,
}

impl Settings {
    /// Loads the settings file.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::read(path),
            None => match paths::config_file() {
                Some(path) if path.exists() => Self::read(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn read(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let settings = Self::from_toml(&text)
            .with_context(|| format!("Invalid settings in {}", path.display()))?;
        log::debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        let settings: Settings = toml::from_str(text)?;
        settings.grid.validate()?;
        Ok(settings)
    }

    /// Grid configuration with command-line overrides applied.
    pub fn grid_config(&self, args: &GridArgs) -> anyhow::Result<GridConfig> {
        let mut config = self.grid.clone();
        if args.group_by.is_some() {
            config.grouping_column = args.group_by.clone();
            config.grouping_column2 = args.then_by.clone();
        }
        if args.collapsed {
            config.collapsed = true;
        }
        if let Some(width) = args.width {
            config.container_width = width;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn token_var(&self) -> &str {
        self.token_env.as_deref().unwrap_or(DEFAULT_TOKEN_VAR)
    }
}
