use log::{debug, info};

use crate::{
    catalog::SchemaSource,
    codegen::Generator,
    core::{Result, TableSchema},
};

/// Result of converting one table.
#[derive(Debug)]
pub struct Conversion {
    pub table: TableSchema,
    pub code: String,
}

pub struct Session {
    generator: Generator,
}

impl Session {
    pub fn new(generator: Generator) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    pub fn convert(
        &self,
        source: &dyn SchemaSource,
        table_name: Option<&str>,
    ) -> Result<Conversion> {
        let table = source.load_table(table_name)?;
        info!("Converting table `{}`", table.name());
        debug!(
            "{} columns, primary keys [{}]",
            table.fields().len(),
            table.primary_keys().join(", ")
        );

        let code = self.generator.generate(&table)?;
        debug!(
            "Generated {} for `{}` ({} bytes)",
            self.generator.naming().struct_name(table.name()),
            table.name(),
            code.len()
        );

        Ok(Conversion { table, code })
    }
}
