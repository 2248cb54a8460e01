use serde::Deserialize;

use self::defs::CatalogTable;
use crate::{
    core::{Error, ErrorKind, FieldSchema, Result, TableSchema},
    sql::extractor,
};

pub mod defs;

/// Something that can produce the schema of one table: DDL text, a catalog
/// dump, or a live database.
pub trait SchemaSource {
    /// `table_name` selects a table when the source holds several, and is
    /// checked against the result otherwise.
    fn load_table(&self, table_name: Option<&str>) -> Result<TableSchema>;
}

impl CatalogTable {
    pub fn to_table_schema(&self) -> Result<TableSchema> {
        let fields = self
            .columns
            .iter()
            .map(|col| {
                FieldSchema::new(col.name.clone(), col.column_type.to_lowercase())
                    .with_nullable(col.is_nullable)
                    .with_default(col.column_default.clone())
                    .with_comment(col.column_comment.clone())
                    .with_auto_increment(col.is_auto_increment())
            })
            .collect::<Vec<_>>();

        let mut primary_keys = self.primary_keys.clone();
        for col in self.columns.iter().filter(|c| c.is_primary_key) {
            if !primary_keys.contains(&col.name) {
                primary_keys.push(col.name.clone());
            }
        }

        TableSchema::new(self.name.clone(), self.comment.clone(), fields, primary_keys)
    }
}

/// Tables read from a JSON catalog dump.
#[derive(Clone, Debug, Default)]
pub struct CatalogDump {
    pub tables: Vec<CatalogTable>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DumpFormat {
    One(CatalogTable),
    Many(Vec<CatalogTable>),
    Wrapped { tables: Vec<CatalogTable> },
}

impl CatalogDump {
    /// Accepts a single table object, an array of tables, or
    /// `{"tables": [...]}`.
    pub fn from_json(text: &str) -> Result<Self> {
        let tables = match serde_json::from_str::<DumpFormat>(text)? {
            DumpFormat::One(table) => vec![table],
            DumpFormat::Many(tables) | DumpFormat::Wrapped { tables } => tables,
        };
        Ok(Self { tables })
    }

    pub fn list_tables(&self) -> Vec<String> {
        self.tables.iter().map(|t| t.name.clone()).collect()
    }
}

impl SchemaSource for CatalogDump {
    fn load_table(&self, table_name: Option<&str>) -> Result<TableSchema> {
        let table = match table_name {
            Some(name) => self.tables.iter().find(|t| t.name == name).ok_or_else(|| {
                Error::new(
                    ErrorKind::ConfigError,
                    format!(
                        "table `{}` not found in catalog, available: {}",
                        name,
                        self.list_tables().join(", ")
                    ),
                )
            })?,
            None => match self.tables.as_slice() {
                [table] => table,
                [] => return Err(Error::new(ErrorKind::ConfigError, "catalog holds no tables")),
                tables => {
                    return Err(Error::new(
                        ErrorKind::ConfigError,
                        format!(
                            "catalog holds {} tables, pick one of: {}",
                            tables.len(),
                            self.list_tables().join(", ")
                        ),
                    ))
                }
            },
        };

        table.to_table_schema()
    }
}

/// A single `CREATE TABLE` statement.
#[derive(Clone, Debug)]
pub struct DdlSource {
    pub sql: String,
}

impl DdlSource {
    pub fn new(sql: impl Into<String>) -> Self {
        Self { sql: sql.into() }
    }
}

impl SchemaSource for DdlSource {
    fn load_table(&self, table_name: Option<&str>) -> Result<TableSchema> {
        let table = extractor::parse(&self.sql)?;
        match table_name {
            Some(name) if name != table.name() => Err(Error::new(
                ErrorKind::ConfigError,
                format!(
                    "expected table `{}`, but the SQL defines `{}`",
                    name,
                    table.name()
                ),
            )),
            _ => Ok(table),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = r#"{
        "table_name": "ny_order",
        "table_comment": "orders",
        "columns": [
            {"column_name": "id", "column_type": "bigint(20) unsigned", "is_nullable": "NO",
             "extra": "auto_increment"},
            {"name": "status", "type": "tinyint", "is_nullable": true,
             "column_default": "0", "column_comment": "state"},
            {"name": "deleted_at", "column_type": "DATETIME", "column_default": "NULL"},
            {"name": "updated_at", "column_type": "timestamp", "is_nullable": "no",
             "column_default": "CURRENT_TIMESTAMP", "extra": "DEFAULT_GENERATED on update CURRENT_TIMESTAMP"}
        ],
        "primary_keys": ["id"]
    }"#;

    #[test]
    fn converts_catalog_rows() {
        let dump = CatalogDump::from_json(DUMP).unwrap();
        let table = dump.load_table(None).unwrap();

        assert_eq!(table.name(), "ny_order");
        assert_eq!(table.comment(), "orders");

        let fields = table.fields();
        assert_eq!(fields.len(), 4);
        assert!(fields[0].is_primary_key());
        assert!(fields[0].is_auto_increment());
        assert!(!fields[0].is_nullable());
        assert_eq!(fields[0].native_type(), "bigint(20) unsigned");

        assert!(fields[1].is_nullable());
        assert_eq!(fields[1].default_value(), Some("0"));
        assert_eq!(fields[1].comment(), Some("state"));

        assert!(fields[2].is_nullable());
        assert_eq!(fields[2].default_value(), Some("NULL"));
        assert_eq!(fields[2].native_type(), "datetime");

        assert!(!fields[3].is_nullable());
        assert!(!fields[3].is_auto_increment());
    }

    #[test]
    fn flagged_columns_join_primary_keys() {
        let dump = CatalogDump::from_json(
            r#"[{"name": "t", "columns": [
                {"name": "a", "column_type": "int", "is_primary_key": true},
                {"name": "b", "column_type": "int", "is_primary_key": true}
            ], "primary_keys": ["b"]}]"#,
        )
        .unwrap();
        let table = dump.load_table(Some("t")).unwrap();
        assert_eq!(table.primary_keys(), ["b", "a"]);
        assert!(table.fields().iter().all(|f| f.is_primary_key()));
    }

    #[test]
    fn selects_table_from_many() {
        let dump = CatalogDump::from_json(
            r#"{"tables": [
                {"name": "a", "columns": [{"name": "id", "column_type": "int"}]},
                {"name": "b", "columns": [{"name": "id", "column_type": "int"}]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(dump.list_tables(), vec!["a", "b"]);
        assert_eq!(dump.load_table(Some("b")).unwrap().name(), "b");

        let err = dump.load_table(None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ConfigError);
        assert!(err.message.contains("a, b"));

        assert!(dump.load_table(Some("c")).is_err());
    }

    #[test]
    fn inconsistent_catalog_is_a_schema_error() {
        let dump = CatalogDump::from_json(
            r#"{"name": "t", "columns": [{"name": "id", "column_type": "int"}],
                "primary_keys": ["uid"]}"#,
        )
        .unwrap();
        assert_eq!(dump.load_table(None).unwrap_err().kind, ErrorKind::SchemaError);
    }

    #[test]
    fn ddl_source_checks_table_name() {
        let source = DdlSource::new("CREATE TABLE ny_order (id int)");
        assert_eq!(source.load_table(None).unwrap().name(), "ny_order");
        assert_eq!(source.load_table(Some("ny_order")).unwrap().fields().len(), 1);
        let err = source.load_table(Some("ny_user")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ConfigError);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = CatalogDump::from_json("{").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ConfigError);
    }
}
