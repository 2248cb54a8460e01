use crate::core::FieldSchema;

pub const TAG_SEPARATOR: &str = ";";

/// How a raw default value is written into the `gorm` tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DefaultTag {
    /// Filled by the database with the current time.
    CurrentTimestamp,
    Null,
    Literal(String),
}

impl DefaultTag {
    pub fn from_raw(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("CURRENT_TIMESTAMP") {
            DefaultTag::CurrentTimestamp
        } else if raw.eq_ignore_ascii_case("NULL") {
            DefaultTag::Null
        } else {
            DefaultTag::Literal(raw.to_string())
        }
    }

    pub fn fragment(&self) -> String {
        match self {
            DefaultTag::CurrentTimestamp => "default:CURRENT_TIMESTAMP".to_string(),
            DefaultTag::Null => "default:null".to_string(),
            DefaultTag::Literal(v) => format!("default:{}", v),
        }
    }
}

/// GORM tag fragments for a field. The order is fixed: column name,
/// primary key, auto increment, default, not null.
pub fn map_tags(field: &FieldSchema) -> Vec<String> {
    let mut tags = vec![format!("column:{}", field.name())];

    if field.is_primary_key() {
        tags.push("primaryKey".to_string());
    }

    if field.is_auto_increment() {
        tags.push("autoIncrement".to_string());
    }

    if let Some(raw) = field.default_value() {
        tags.push(DefaultTag::from_raw(raw).fragment());
    }

    if !field.is_nullable() {
        tags.push("not null".to_string());
    }

    tags
}

pub fn gorm_tag(field: &FieldSchema) -> String {
    format!("gorm:\"{}\"", map_tags(field).join(TAG_SEPARATOR))
}

pub fn json_tag(field: &FieldSchema) -> String {
    format!("json:\"{}\"", field.name())
}

/// The complete struct tag, without the enclosing backquotes.
pub fn struct_tag(field: &FieldSchema) -> String {
    format!("{} {}", json_tag(field), gorm_tag(field))
}
