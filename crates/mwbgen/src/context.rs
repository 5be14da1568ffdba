use crate::Formatter;

use mwbgen_core::schema::{Cascade, Column, Naming, Relation, Schema, Table};
use mwbgen_core::{Catalog, Config};

/// Everything a formatter can read while rendering a table.
///
/// The configuration is always the one the catalog was built with, so names
/// computed here agree with the relation names resolved at build time.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    catalog: &'a Catalog,
    formatter: &'a dyn Formatter,
}

impl<'a> Context<'a> {
    pub fn new(catalog: &'a Catalog, formatter: &'a dyn Formatter) -> Self {
        Self { catalog, formatter }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn config(&self) -> &'a Config {
        self.catalog.config()
    }

    pub fn formatter(&self) -> &'a dyn Formatter {
        self.formatter
    }

    pub fn naming(&self) -> Naming<'a> {
        self.catalog.naming()
    }

    pub fn schema(&self, table: &Table) -> &'a Schema {
        table.schema(self.catalog)
    }

    /// The model name of `table`, as the formatter names it.
    pub fn model_name(&self, table: &Table) -> String {
        self.formatter.naming().model_name(self, table)
    }

    /// The namespace-qualified model name of `table`.
    pub fn qualified_model_name(&self, table: &Table) -> String {
        let namespace = self.formatter.naming().namespace(self, table);
        let model = self.model_name(table);

        if namespace.is_empty() {
            model
        } else {
            format!("{namespace}\\{model}")
        }
    }

    /// The table name as rendered into generated code.
    pub fn table_name(&self, table: &Table) -> String {
        self.naming().table_name(&self.schema(table).name, &table.name)
    }

    pub fn column_name(&self, column: &Column) -> String {
        self.formatter.naming().column_name(self, column)
    }

    pub fn column_type(&self, column: &Column) -> String {
        self.formatter.datatype_converter().convert(column)
    }

    pub fn relation_name(&self, relation: &Relation) -> String {
        self.formatter.naming().relation_name(self, relation)
    }

    pub fn cascade(&self, relation: &Relation) -> Vec<Cascade> {
        self.formatter.cascade_policy().cascade(self, relation)
    }
}
