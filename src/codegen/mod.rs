use std::fmt::Write;

use self::{format::format_source, naming::NamingPolicy};
use crate::{
    core::{Error, ErrorKind, FieldSchema, Result, TableSchema},
    mapper::{map_type, struct_tag},
};

pub mod format;
pub mod inflect;
pub mod naming;

pub const DEFAULT_PACKAGE: &str = "models";

/// Generates a GORM model file for one table.
pub struct Generator {
    package_name: String,
    naming: NamingPolicy,
}

impl Generator {
    pub fn new(package_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            naming: NamingPolicy::default(),
        }
    }

    pub fn with_naming(mut self, naming: NamingPolicy) -> Self {
        self.naming = naming;
        self
    }

    pub fn naming(&self) -> &NamingPolicy {
        &self.naming
    }

    pub fn generate(&self, table: &TableSchema) -> Result<String> {
        let code = self.assemble(table)?;
        format_source(&code)
    }

    /// The source text before canonicalization.
    pub fn assemble(&self, table: &TableSchema) -> Result<String> {
        let struct_name = self.naming.struct_name(table.name());
        let instance_name = self.naming.instance_name(&struct_name);

        let mut fields = String::new();
        for field in table.fields() {
            self.write_field(&mut fields, field)?;
        }

        let mut code = String::new();
        write!(
            code,
            "package {package}\n\
             \n\
             var {instance} = new({name})\n\
             \n\
             // {name} {comment}\n\
             type {name} struct {{\n\
             {fields}\
             }}\n\
             \n\
             // TableName 表名称\n\
             func (own *{name}) TableName() string {{\n\
             \treturn {table}\n\
             }}\n",
            package = self.package_name,
            instance = instance_name,
            name = struct_name,
            comment = single_line(table.comment()),
            fields = fields,
            table = go_string(table.name()),
        )
        .map_err(|e| Error::new(ErrorKind::SynthesisError, e.to_string()))?;

        Ok(code)
    }

    fn write_field(&self, out: &mut String, field: &FieldSchema) -> Result<()> {
        let comment = field
            .comment()
            .map(|c| format!(" // {}", single_line(c)))
            .unwrap_or_default();

        writeln!(
            out,
            "\t{}\t{} {}{}",
            self.naming.field_name(field.name()),
            map_type(field.native_type()),
            tag_literal(&struct_tag(field)),
            comment
        )
        .map_err(|e| Error::new(ErrorKind::SynthesisError, e.to_string()))
    }
}

/// Generate the model for `schema` with the default naming policy.
pub fn synthesize(schema: &TableSchema, package_name: &str) -> Result<String> {
    Generator::new(package_name).generate(schema)
}

fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

/// Go interpreted string literal.
fn go_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Struct tags are raw strings unless they contain a backquote.
fn tag_literal(tag: &str) -> String {
    if tag.contains('`') {
        go_string(tag)
    } else {
        format!("`{}`", tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::inflect::Verbatim;

    fn order_table() -> TableSchema {
        TableSchema::new(
            "ny_order",
            "orders",
            vec![
                FieldSchema::new("id", "bigint").with_auto_increment(true),
                FieldSchema::new("order_no", "varchar(32)")
                    .with_nullable(false)
                    .with_comment(Some("order number".to_string())),
                FieldSchema::new("payload", "blob"),
            ],
            vec!["id".to_string()],
        )
        .unwrap()
    }

    #[test]
    fn generates_model_file() {
        let code = synthesize(&order_table(), "models").unwrap();
        let expected = "package models\n\
\n\
var OrderModelIns = new(OrderModel)\n\
\n\
// OrderModel orders\n\
type OrderModel struct {\n\
\tId      int64  `json:\"id\" gorm:\"column:id;primaryKey;autoIncrement\"`\n\
\tOrderNo string `json:\"order_no\" gorm:\"column:order_no;not null\"` // order number\n\
\tPayload []byte `json:\"payload\" gorm:\"column:payload\"`\n\
}\n\
\n\
// TableName 表名称\n\
func (own *OrderModel) TableName() string {\n\
\treturn \"ny_order\"\n\
}\n";
        assert_eq!(code, expected);
    }

    #[test]
    fn generation_is_deterministic() {
        let table = order_table();
        let generator = Generator::new("dao");
        assert_eq!(
            generator.generate(&table).unwrap(),
            generator.generate(&table).unwrap()
        );
    }

    #[test]
    fn empty_table_comment_leaves_bare_doc_line() {
        let table = TableSchema::new("orders", "", vec![FieldSchema::new("id", "int")], vec![])
            .unwrap();
        let code = synthesize(&table, "models").unwrap();
        assert!(code.contains("\n// OrderModel\ntype OrderModel struct {\n"));
        assert!(code.contains("var OrderModelIns = new(OrderModel)"));
        assert!(code.contains("return \"orders\""));
    }

    #[test]
    fn multi_line_comments_are_flattened() {
        let table = TableSchema::new(
            "t_user",
            "line one\nline two",
            vec![FieldSchema::new("id", "int").with_comment(Some("a\r\nb".to_string()))],
            vec![],
        )
        .unwrap();
        let code = synthesize(&table, "models").unwrap();
        assert!(code.contains("// UserModel line one line two\n"));
        assert!(code.contains("// a  b\n"));
    }

    #[test]
    fn custom_naming_policy() {
        let generator = Generator::new("models").with_naming(NamingPolicy::new(Verbatim));
        let table = TableSchema::new("ny_orders", "", vec![FieldSchema::new("id", "int")], vec![])
            .unwrap();
        let code = generator.generate(&table).unwrap();
        assert!(code.contains("type OrdersModel struct {"));
    }

    #[test]
    fn invalid_package_name_is_a_synthesis_error() {
        let err = synthesize(&order_table(), "my-models").unwrap_err();
        assert_eq!(err.kind, ErrorKind::SynthesisError);
        assert!(err.source_text().unwrap().starts_with("package my-models\n"));
    }

    #[test]
    fn unrepresentable_column_name_is_a_synthesis_error() {
        let table = TableSchema::new(
            "t_user",
            "",
            vec![FieldSchema::new("order-no", "int")],
            vec![],
        )
        .unwrap();
        let err = synthesize(&table, "models").unwrap_err();
        assert_eq!(err.kind, ErrorKind::SynthesisError);
        assert!(err.message.contains("malformed struct field"));
    }

    #[test]
    fn quoting_helpers() {
        assert_eq!(go_string("a\"b\\c"), "\"a\\\"b\\\\c\"");
        assert_eq!(tag_literal("json:\"a\""), "`json:\"a\"`");
        assert_eq!(tag_literal("json:\"a`b\""), "\"json:\\\"a`b\\\"\"");
    }
}
