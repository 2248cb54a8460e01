use serde::{Deserialize, Deserializer, Serialize};

/// One row of `information_schema.columns`, plus the primary key flag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogColumn {
    #[serde(alias = "column_name")]
    pub name: String,
    #[serde(alias = "type")]
    pub column_type: String,
    /// `true`/`false` or the catalog's `"YES"`/`"NO"`.
    #[serde(default = "default_nullable", deserialize_with = "nullable_flag")]
    pub is_nullable: bool,
    #[serde(default)]
    pub column_default: Option<String>,
    #[serde(default)]
    pub column_comment: Option<String>,
    /// e.g. `auto_increment`, `on update CURRENT_TIMESTAMP`
    #[serde(default)]
    pub extra: String,
    #[serde(default)]
    pub is_primary_key: bool,
}

impl CatalogColumn {
    pub fn is_auto_increment(&self) -> bool {
        self.extra.to_ascii_lowercase().contains("auto_increment")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogTable {
    #[serde(alias = "table_name")]
    pub name: String,
    #[serde(default, alias = "table_comment")]
    pub comment: String,
    pub columns: Vec<CatalogColumn>,
    /// Ordered by position inside the `PRIMARY` constraint.
    #[serde(default)]
    pub primary_keys: Vec<String>,
}

fn default_nullable() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Text(String),
}

fn nullable_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(v) => v,
        Flag::Text(v) => v.trim().eq_ignore_ascii_case("YES"),
    })
}
