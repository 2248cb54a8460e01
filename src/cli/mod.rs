use std::{fs, io::Write, path::PathBuf};

use clap::Parser;
use log::{debug, info};

use crate::{
    catalog::{CatalogDump, DdlSource, SchemaSource},
    codegen::Generator,
    config::{Config, Overrides, DEFAULT_CONFIG_FILE},
    core::{Error, ErrorKind, Result},
    sql::Session,
};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "sql2gorm",
    version,
    about = "Generate a GORM model from a MySQL CREATE TABLE statement"
)]
pub struct Args {
    /// TOML file with default settings
    #[arg(long, env = "SQL2GORM_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// File holding one CREATE TABLE statement
    #[arg(long, conflicts_with = "catalog")]
    pub sql: Option<PathBuf>,

    /// JSON catalog dump to read the table from
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Where the Go source is written
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Table to convert
    #[arg(short, long)]
    pub table: Option<String>,

    /// Go package name of the generated file
    #[arg(short, long, env = "SQL2GORM_PACKAGE")]
    pub package: Option<String>,

    /// Write the effective settings back to the config file
    #[arg(long)]
    pub save_config: bool,

    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            sql_file: self.sql.clone(),
            catalog_file: self.catalog.clone(),
            output_file: self.output.clone(),
            table_name: self.table.clone(),
            package_name: self.package.clone(),
        }
    }
}

pub struct CliApp<O: Write> {
    config: Config,
    session: Session,

    output: O,
}

impl<O: Write> CliApp<O> {
    pub fn new(config: Config, output: O) -> Self {
        let session = Session::new(Generator::new(config.package_name.clone()));
        Self {
            config,
            session,
            output,
        }
    }

    /// Loads the config file named by `args` and applies the command line on top.
    pub fn from_args(args: &Args, output: O) -> Result<Self> {
        let config = Config::load(&args.config)?.merge(args.overrides());
        // a command line `--sql` replaces a catalog from the file, and the reverse
        let config = match (&args.sql, &args.catalog) {
            (Some(_), None) => Config {
                catalog_file: None,
                ..config
            },
            (None, Some(_)) => Config {
                sql_file: None,
                ..config
            },
            _ => config,
        };

        if args.save_config {
            config.save(&args.config)?;
            info!("Saved settings to {}", args.config.display());
        }

        Ok(Self::new(config, output))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn run(&mut self) -> Result<PathBuf> {
        self.config.validate()?;

        let source = self.load_source()?;
        let result = self
            .session
            .convert(source.as_ref(), self.config.table_name.as_deref())?;

        let path = self
            .config
            .output_file
            .clone()
            .ok_or_else(|| Error::new(ErrorKind::ConfigError, "output file is not set"))?;
        fs::write(&path, &result.code)?;
        info!("Wrote {}", path.display());

        self.print(&format!(
            "{} -> {}\n",
            result.table.name(),
            path.display()
        ))?;
        Ok(path)
    }

    fn load_source(&self) -> Result<Box<dyn SchemaSource>> {
        if let Some(path) = &self.config.sql_file {
            debug!("Reading DDL from {}", path.display());
            let sql = fs::read_to_string(path)?;
            return Ok(Box::new(DdlSource::new(sql)));
        }
        if let Some(path) = &self.config.catalog_file {
            debug!("Reading catalog from {}", path.display());
            let text = fs::read_to_string(path)?;
            return Ok(Box::new(CatalogDump::from_json(&text)?));
        }
        Err(Error::new(
            ErrorKind::ConfigError,
            "either a SQL file or a catalog file must be given",
        ))
    }

    fn print(&mut self, string: &str) -> Result<()> {
        self.output.write_all(string.as_bytes())?;
        self.output.flush()?;
        Ok(())
    }
}
