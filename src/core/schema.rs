use super::{Error, ErrorKind, Result};

/// One column of a table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSchema {
    name: String,
    native_type: String,
    nullable: bool,
    default_value: Option<String>,
    comment: Option<String>,
    is_primary_key: bool,
    is_auto_increment: bool,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, native_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            native_type: native_type.into(),
            nullable: true,
            default_value: None,
            comment: None,
            is_primary_key: false,
            is_auto_increment: false,
        }
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Empty text is treated as no default.
    pub fn with_default(mut self, value: Option<String>) -> Self {
        self.default_value = value.filter(|v| !v.is_empty());
        self
    }

    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment.filter(|c| !c.is_empty());
        self
    }

    pub fn with_auto_increment(mut self, auto_increment: bool) -> Self {
        self.is_auto_increment = auto_increment;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn native_type(&self) -> &str {
        &self.native_type
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn is_primary_key(&self) -> bool {
        self.is_primary_key
    }

    pub fn is_auto_increment(&self) -> bool {
        self.is_auto_increment
    }
}

/// A table definition, independent of where it was read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableSchema {
    name: String,
    comment: String,
    fields: Vec<FieldSchema>,
    primary_keys: Vec<String>,
}

impl TableSchema {
    /// Builds the table and derives `is_primary_key` for every field.
    pub fn new(
        name: impl Into<String>,
        comment: impl Into<String>,
        mut fields: Vec<FieldSchema>,
        primary_keys: Vec<String>,
    ) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::new(ErrorKind::SchemaError, "table name is empty"));
        }

        if fields.is_empty() {
            return Err(Error::new(
                ErrorKind::SchemaError,
                format!("table `{}` has no columns", name),
            ));
        }

        for (i, field) in fields.iter().enumerate() {
            if field.name.is_empty() {
                return Err(Error::new(
                    ErrorKind::SchemaError,
                    format!("column #{} of table `{}` has no name", i + 1, name),
                ));
            }
            if fields[..i].iter().any(|f| f.name == field.name) {
                return Err(Error::new(
                    ErrorKind::SchemaError,
                    format!("duplicate column `{}` in table `{}`", field.name, name),
                ));
            }
        }

        let mut keys: Vec<String> = Vec::with_capacity(primary_keys.len());
        for key in primary_keys {
            if !fields.iter().any(|f| f.name == key) {
                return Err(Error::new(
                    ErrorKind::SchemaError,
                    format!("primary key `{}` is not a column of `{}`", key, name),
                ));
            }
            if !keys.contains(&key) {
                keys.push(key);
            }
        }

        for field in fields.iter_mut() {
            field.is_primary_key = keys.iter().any(|k| *k == field.name);
        }

        Ok(Self {
            name,
            comment: comment.into(),
            fields,
            primary_keys: keys,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    pub fn primary_keys(&self) -> &[String] {
        &self.primary_keys
    }

    pub fn primary_fields(&self) -> impl Iterator<Item = &FieldSchema> {
        self.fields.iter().filter(|f| f.is_primary_key)
    }
}
