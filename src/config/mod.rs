use std::{
    fs,
    path::{Path, PathBuf},
};

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::{
    codegen::DEFAULT_PACKAGE,
    core::{Error, ErrorKind, Result},
};

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `CREATE TABLE` statement to convert.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql_file: Option<PathBuf>,
    /// JSON catalog dump to convert, used instead of `sql_file`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    pub package_name: String,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sql_file: None,
            catalog_file: None,
            output_file: None,
            table_name: None,
            package_name: DEFAULT_PACKAGE.to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Values given on the command line, they win over the config file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub sql_file: Option<PathBuf>,
    pub catalog_file: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub table_name: Option<String>,
    pub package_name: Option<String>,
}

impl Config {
    /// Reads `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(text)?;
        if config.package_name.trim().is_empty() {
            config.package_name = DEFAULT_PACKAGE.to_string();
        }
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = toml::to_string(self).map_err(|e| {
            Error::new(
                ErrorKind::ConfigError,
                format!("failed to serialize config: {}", e),
            )
        })?;
        fs::write(path, text)?;
        Ok(())
    }

    pub fn merge(mut self, overrides: Overrides) -> Self {
        if let Some(v) = overrides.sql_file {
            self.sql_file = Some(v);
        }
        if let Some(v) = overrides.catalog_file {
            self.catalog_file = Some(v);
        }
        if let Some(v) = overrides.output_file {
            self.output_file = Some(v);
        }
        if let Some(v) = overrides.table_name {
            self.table_name = Some(v);
        }
        if let Some(v) = overrides.package_name.filter(|v| !v.trim().is_empty()) {
            self.package_name = v;
        }
        self
    }

    pub fn level_filter(&self) -> Result<LevelFilter> {
        self.log_level.parse().map_err(|_| {
            Error::new(
                ErrorKind::ConfigError,
                format!("unknown log level `{}`", self.log_level),
            )
        })
    }

    /// Checks that the configuration can be run, and creates the directory
    /// the output goes to.
    pub fn validate(&self) -> Result<()> {
        let output = self
            .output_file
            .as_ref()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| Error::new(ErrorKind::ConfigError, "output file is not set"))?;

        let input = match (&self.sql_file, &self.catalog_file) {
            (Some(sql), None) => sql,
            (None, Some(catalog)) => catalog,
            (None, None) => {
                return Err(Error::new(
                    ErrorKind::ConfigError,
                    "either a SQL file or a catalog file must be given",
                ))
            }
            (Some(_), Some(_)) => {
                return Err(Error::new(
                    ErrorKind::ConfigError,
                    "a SQL file and a catalog file cannot be used together",
                ))
            }
        };

        if !input.is_file() {
            return Err(Error::new(
                ErrorKind::ConfigError,
                format!("input file does not exist: {}", input.display()),
            ));
        }

        self.level_filter()?;

        if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        Ok(())
    }
}
