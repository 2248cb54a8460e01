use sqlparser::{ast::Statement, dialect::MySqlDialect, parser::Parser};

use crate::core::{Error, ErrorKind, Result};

pub mod options;

/// Parse SQL string into AST
pub fn parse_sql(sql_text: &str) -> Result<Vec<Statement>> {
    Parser::parse_sql(&MySqlDialect {}, sql_text)
        .map_err(|e| Error::new(ErrorKind::ParseError, e.to_string()))
}

/// Parse exactly one statement.
pub fn parse_statement(sql_text: &str) -> Result<Statement> {
    let mut statements = parse_sql(sql_text)?;

    match statements.len() {
        1 => Ok(statements.remove(0)),
        0 => Err(Error::new(ErrorKind::ParseError, "no SQL statement found")),
        n => Err(Error::new(
            ErrorKind::ParseError,
            format!("expected a single CREATE TABLE statement, found {} statements", n),
        )),
    }
}
