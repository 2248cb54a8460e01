use super::inflect::{English, Singularize};

pub const MODEL_SUFFIX: &str = "Model";
pub const INSTANCE_SUFFIX: &str = "Ins";

/// Upper-cases the first letter of every word, leaving the other letters
/// alone. Words are separated by anything that is not a letter, digit or
/// underscore.
pub fn title(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start && c.is_alphabetic() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '_');
    }
    out
}

/// `order_no` -> `OrderNo`. Every segment is kept, empty ones are skipped.
pub fn field_name(column: &str) -> String {
    column
        .split('_')
        .filter(|part| !part.is_empty())
        .map(title)
        .collect()
}

/// Decides how generated Go identifiers are named.
pub struct NamingPolicy {
    singularizer: Box<dyn Singularize + Send + Sync>,
    model_suffix: String,
    instance_suffix: String,
}

impl Default for NamingPolicy {
    fn default() -> Self {
        Self::new(English)
    }
}

impl NamingPolicy {
    pub fn new(singularizer: impl Singularize + Send + Sync + 'static) -> Self {
        Self {
            singularizer: Box::new(singularizer),
            model_suffix: MODEL_SUFFIX.to_string(),
            instance_suffix: INSTANCE_SUFFIX.to_string(),
        }
    }

    pub fn with_suffixes(
        mut self,
        model_suffix: impl Into<String>,
        instance_suffix: impl Into<String>,
    ) -> Self {
        self.model_suffix = model_suffix.into();
        self.instance_suffix = instance_suffix.into();
        self
    }

    /// `ny_order_items` -> `OrderItemModel`.
    ///
    /// The first segment is a table prefix and is dropped. A name without
    /// further segments is title-cased as a whole instead, without its
    /// trailing underscores.
    pub fn struct_name(&self, table: &str) -> String {
        let base: String = table
            .split('_')
            .skip(1)
            .filter(|part| !part.is_empty())
            .map(title)
            .collect();

        let base = if base.is_empty() {
            match table.trim_end_matches('_') {
                "" => title(table),
                trimmed => title(trimmed),
            }
        } else {
            base
        };

        format!("{}{}", self.singularizer.singularize(&base), self.model_suffix)
    }

    pub fn field_name(&self, column: &str) -> String {
        field_name(column)
    }

    pub fn instance_name(&self, struct_name: &str) -> String {
        format!("{}{}", struct_name, self.instance_suffix)
    }
}
