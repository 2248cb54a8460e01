//! Generates Go GORM model files from MySQL `CREATE TABLE` statements.
//!
//! The pipeline is `parse` (DDL to [`TableSchema`]), `map_type`/`map_tags`
//! per column, then `synthesize` for the whole file.

#[macro_use]
extern crate lazy_static;

pub mod catalog;
pub mod cli;
pub mod codegen;
pub mod config;
pub mod core;
pub mod mapper;
pub mod sql;
pub mod util;

pub use crate::core::{Error, ErrorKind, FieldSchema, Result, TableSchema};
pub use codegen::{synthesize, Generator};
pub use mapper::{map_tags, map_type, GoType};
pub use sql::extractor::parse;
