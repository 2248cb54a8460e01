use std::{error::Error as StdError, fmt::Display};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    /// Assembled source text that failed to canonicalize.
    source_text: Option<String>,
}

#[allow(clippy::enum_variant_names)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    ParseError,
    /// No type is rejected today, mapping falls back to `string`.
    MappingError,
    SynthesisError,
    SchemaError,
    ConfigError,
    IoError,
}

impl StdError for Error {}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::ParseError => write!(f, "Parse Error"),
            ErrorKind::MappingError => write!(f, "Mapping Error"),
            ErrorKind::SynthesisError => write!(f, "Synthesis Error"),
            ErrorKind::SchemaError => write!(f, "Schema Error"),
            ErrorKind::ConfigError => write!(f, "Config Error"),
            ErrorKind::IoError => write!(f, "IO Error"),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(text) = &self.source_text {
            write!(f, "\n--- assembled source ---\n{}", text)?;
        }
        Ok(())
    }
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl AsRef<str>) -> Self {
        Self {
            kind,
            message: message.as_ref().to_string(),
            source_text: None,
        }
    }

    pub fn synthesis(message: impl AsRef<str>, source_text: &str) -> Self {
        Self {
            kind: ErrorKind::SynthesisError,
            message: message.as_ref().to_string(),
            source_text: Some(source_text.to_string()),
        }
    }

    pub fn source_text(&self) -> Option<&str> {
        self.source_text.as_deref()
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::new(ErrorKind::IoError, e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::new(ErrorKind::ConfigError, e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::new(ErrorKind::ConfigError, e.to_string())
    }
}
