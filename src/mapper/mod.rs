use std::fmt::Display;

pub mod tags;

pub use tags::*;

/// Go types a column can be mapped onto.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GoType {
    Int64,
    Float64,
    String,
    Bytes,
}

impl Display for GoType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GoType::Int64 => write!(f, "int64"),
            GoType::Float64 => write!(f, "float64"),
            GoType::String => write!(f, "string"),
            GoType::Bytes => write!(f, "[]byte"),
        }
    }
}

impl From<&str> for GoType {
    fn from(native_type: &str) -> Self {
        match base_type(native_type).as_str() {
            "tinyint" | "smallint" | "mediumint" | "int" | "integer" | "bigint" => GoType::Int64,

            "float" | "double" | "real" | "decimal" | "numeric" => GoType::Float64,

            "char" | "varchar" | "text" | "tinytext" | "mediumtext" | "longtext" => GoType::String,

            // No timezone-aware type is assumed for temporal columns.
            "date" | "datetime" | "timestamp" | "time" => GoType::String,

            "blob" | "tinyblob" | "mediumblob" | "longblob" | "binary" | "varbinary" => {
                GoType::Bytes
            }

            "json" => GoType::String,

            _ => GoType::String,
        }
    }
}

/// Map a database column type to a Go type. Never fails, unknown types map
/// to `string`.
pub fn map_type(native_type: &str) -> GoType {
    GoType::from(native_type)
}

/// Lower-cased type name without precision, length or modifiers:
/// `VARCHAR(32)` -> `varchar`, `int unsigned` -> `int`.
pub fn base_type(native_type: &str) -> String {
    native_type
        .split('(')
        .next()
        .and_then(|s| s.split_whitespace().next())
        .unwrap_or("")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_type_families() {
        let cases = [
            ("tinyint(1)", "int64"),
            ("smallint", "int64"),
            ("mediumint", "int64"),
            ("int(11)", "int64"),
            ("int unsigned", "int64"),
            ("bigint(20) unsigned", "int64"),
            ("float", "float64"),
            ("double", "float64"),
            ("decimal(10,2)", "float64"),
            ("char(2)", "string"),
            ("varchar(255)", "string"),
            ("longtext", "string"),
            ("datetime", "string"),
            ("timestamp(3)", "string"),
            ("date", "string"),
            ("time", "string"),
            ("blob", "[]byte"),
            ("longblob", "[]byte"),
            ("json", "string"),
        ];
        for (native, expected) in cases {
            assert_eq!(map_type(native).to_string(), expected, "{}", native);
        }
    }

    #[test]
    fn unknown_types_fall_back_to_string() {
        for native in ["enum('a','b')", "geometry", "", "   ", "(", "boolean"] {
            let mapped = map_type(native).to_string();
            assert_eq!(mapped, "string", "{:?}", native);
            assert!(!mapped.is_empty());
        }
    }

    #[test]
    fn base_type_is_case_insensitive() {
        assert_eq!(base_type("VARCHAR(32)"), "varchar");
        assert_eq!(map_type("BIGINT"), GoType::Int64);
        assert_eq!(base_type(""), "");
    }
}
