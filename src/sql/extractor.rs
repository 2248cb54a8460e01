use sqlparser::ast::{
    ColumnDef, ColumnOption, CreateTable, Expr, Ident, ObjectName, Statement, TableConstraint,
    UnaryOperator, Value,
};

use super::parser::{
    options::{
        code_words, extract_table_comment, leading_keyword, split_table_options,
        strip_index_types, trailing_statement,
    },
    parse_statement,
};
use crate::core::{Error, ErrorKind, FieldSchema, Result, TableSchema};

/// Default text recorded for `CURRENT_TIMESTAMP` and its synonyms.
pub const CURRENT_TIMESTAMP: &str = "CURRENT_TIMESTAMP";

const TIMESTAMP_FUNCTIONS: &[&str] = &[
    "CURRENT_TIMESTAMP",
    "NOW",
    "LOCALTIMESTAMP",
    "LOCALTIME",
];

/// Keywords that bring in a column source after the column list
/// (`CREATE TABLE t (..) ENGINE=InnoDB AS SELECT ..`).
const COPY_CLAUSES: &[&str] = &["AS", "SELECT", "LIKE", "IGNORE", "REPLACE"];

/// Parse a single `CREATE TABLE` statement into a [`TableSchema`].
pub fn parse(ddl_text: &str) -> Result<TableSchema> {
    if leading_keyword(ddl_text).is_some_and(|k| k != "CREATE") {
        return Err(Error::new(
            ErrorKind::ParseError,
            format!(
                "expected a CREATE TABLE statement, found `{}`",
                first_words(ddl_text)
            ),
        ));
    }

    let (definition, options) = split_table_options(ddl_text);

    if let Some(rest) = trailing_statement(options) {
        return Err(Error::new(
            ErrorKind::ParseError,
            format!(
                "expected a single CREATE TABLE statement, found trailing `{}`",
                first_words(rest)
            ),
        ));
    }

    let statement = parse_statement(&strip_index_types(definition))?;
    let comment = extract_table_comment(options);
    let table = extract_table(&statement, comment)?;

    if code_words(options)
        .iter()
        .any(|w| COPY_CLAUSES.contains(&w.as_str()))
    {
        return Err(copied_columns(table.name()));
    }

    Ok(table)
}

/// Reduce a parsed statement to the schema model.
pub fn extract_table(statement: &Statement, comment: String) -> Result<TableSchema> {
    let Statement::CreateTable(CreateTable {
        name,
        columns,
        constraints,
        query,
        like,
        clone,
        ..
    }) = statement
    else {
        return Err(Error::new(
            ErrorKind::ParseError,
            format!(
                "expected a CREATE TABLE statement, found `{}`",
                first_words(&statement.to_string())
            ),
        ));
    };

    let table_name = table_name(name)?;

    if query.is_some() || like.is_some() || clone.is_some() {
        return Err(copied_columns(&table_name));
    }

    let mut primary_keys: Vec<String> = vec![];
    let fields = columns
        .iter()
        .map(|col| {
            if is_inline_primary_key(col) {
                push_unique(&mut primary_keys, &col.name.value);
            }
            extract_column(col)
        })
        .collect::<Vec<_>>();

    // unique and plain indexes carry nothing the schema model keeps
    for constraint in constraints {
        if let TableConstraint::PrimaryKey { columns, .. } = constraint {
            for col in columns {
                push_unique(&mut primary_keys, &col.value);
            }
        }
    }

    TableSchema::new(table_name, comment, fields, primary_keys)
        .map_err(|e| Error::new(ErrorKind::ParseError, e.message))
}

fn copied_columns(table_name: &str) -> Error {
    Error::new(
        ErrorKind::ParseError,
        format!(
            "CREATE TABLE `{}` copies its columns from another source, which is not supported",
            table_name
        ),
    )
}

fn table_name(name: &ObjectName) -> Result<String> {
    match name.0.last() {
        Some(Ident { value, .. }) if !value.is_empty() => Ok(value.clone()),
        _ => Err(Error::new(ErrorKind::ParseError, "invalid table name")),
    }
}

fn extract_column(col: &ColumnDef) -> FieldSchema {
    let mut nullable = true;
    let mut auto_increment = false;
    let mut default = None;
    let mut comment = None;

    for opt in col.options.iter() {
        match &opt.option {
            ColumnOption::NotNull => nullable = false,
            ColumnOption::Null => nullable = true,
            ColumnOption::Default(expr) => default = literal_default(expr),
            ColumnOption::Comment(text) => comment = Some(text.clone()),
            ColumnOption::DialectSpecific(tokens) => {
                if tokens
                    .iter()
                    .any(|t| t.to_string().eq_ignore_ascii_case("AUTO_INCREMENT"))
                {
                    auto_increment = true;
                }
            }
            _ => {}
        }
    }

    FieldSchema::new(
        col.name.value.clone(),
        col.data_type.to_string().to_lowercase(),
    )
    .with_nullable(nullable)
    .with_auto_increment(auto_increment)
    .with_default(default)
    .with_comment(comment)
}

fn is_inline_primary_key(col: &ColumnDef) -> bool {
    col.options
        .iter()
        .any(|opt| matches!(
            opt.option,
            ColumnOption::Unique {
                is_primary: true,
                ..
            }
        ))
}

/// Only string and numeric literals are kept, plus the current-timestamp
/// functions which map to [`CURRENT_TIMESTAMP`]. `NULL` and any other
/// expression leave the default empty.
fn literal_default(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Value(Value::Number(n, _)) => Some(n.clone()),
        Expr::Value(Value::SingleQuotedString(s)) | Expr::Value(Value::DoubleQuotedString(s)) => {
            Some(s.clone())
        }
        Expr::UnaryOp {
            op: UnaryOperator::Minus,
            expr,
        } => match expr.as_ref() {
            Expr::Value(Value::Number(n, _)) => Some(format!("-{}", n)),
            _ => None,
        },
        Expr::Function(func) => {
            let name = func.name.0.last()?.value.to_ascii_uppercase();
            TIMESTAMP_FUNCTIONS
                .contains(&name.as_str())
                .then(|| CURRENT_TIMESTAMP.to_string())
        }
        Expr::Identifier(ident)
            if TIMESTAMP_FUNCTIONS.contains(&ident.value.to_ascii_uppercase().as_str()) =>
        {
            Some(CURRENT_TIMESTAMP.to_string())
        }
        Expr::Nested(inner) => literal_default(inner),
        _ => None,
    }
}

fn push_unique(keys: &mut Vec<String>, name: &str) {
    if !keys.iter().any(|k| k == name) {
        keys.push(name.to_string());
    }
}

fn first_words(text: &str) -> String {
    text.split_whitespace().take(3).collect::<Vec<_>>().join(" ")
}
