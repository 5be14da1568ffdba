mod builder;

mod column;
pub use column::{Column, ColumnId};

mod comment;

mod database;
pub use database::{Schema, SchemaId};

mod diagnostic;
pub use diagnostic::Diagnostic;

mod fk;
pub use fk::{ForeignKey, ForeignKeyColumn, ForeignKeyId, ReferentialAction};

mod index;
pub use index::{Index, IndexId, IndexKind};

mod name;
pub use name::{Name, Naming};

mod options;
pub use options::{
    cascade_option, fetch_option, order_option, Cascade, Direction, ExternalRelation, Fetch,
    LifecycleCallback, OrderBy, RelationOptions, TableOptions,
};

pub mod raw;

mod relation;
pub use relation::{Relation, RelationKind};

mod resolve;

mod table;
pub use table::{Table, TableId};

mod ty;
pub use ty::DataType;

mod verify;

mod view;
pub use view::View;

use crate::{Config, Result};

/// A fully linked and resolved schema document.
///
/// Tables, columns, and foreign keys live in flat collections and refer to
/// each other by id. The catalog is immutable once built.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub schemas: Vec<Schema>,

    /// All tables, in document order. Indexed by [`TableId`].
    pub tables: Vec<Table>,

    /// All foreign keys, in document order. Indexed by [`ForeignKeyId`].
    pub foreign_keys: Vec<ForeignKey>,

    config: Config,

    diagnostics: Vec<Diagnostic>,
}

impl Catalog {
    /// Builds a catalog from parsed records.
    ///
    /// Fails on any integrity problem: unknown tables or columns, foreign keys
    /// with mismatched column counts, invalid rules, or an ambiguous owning
    /// side. Recoverable problems are collected in
    /// [`Catalog::diagnostics`].
    pub fn build(raw: &raw::RawCatalog, config: &Config) -> Result<Catalog> {
        builder::build(raw, config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn naming(&self) -> Naming<'_> {
        Naming::new(&self.config)
    }

    pub fn schemas(&self) -> impl ExactSizeIterator<Item = &Schema> {
        self.schemas.iter()
    }

    pub fn schema(&self, id: SchemaId) -> &Schema {
        &self.schemas[id.0]
    }

    pub fn schema_by_name(&self, name: &str) -> Option<&Schema> {
        self.schemas.iter().find(|schema| schema.name == name)
    }

    pub fn tables(&self) -> impl ExactSizeIterator<Item = &Table> {
        self.tables.iter()
    }

    pub fn table(&self, id: impl Into<TableId>) -> &Table {
        &self.tables[id.into().0]
    }

    /// Finds a table by `name` or `schema.name`. An unqualified name matches
    /// the first table with that name in document order.
    pub fn table_by_name(&self, name: &str) -> Option<&Table> {
        if let Some(table) = self.tables.iter().find(|table| table.name == name) {
            return Some(table);
        }

        let (schema, table) = name.split_once('.')?;
        self.schema_by_name(schema)?.table_by_name(self, table)
    }

    pub fn column(&self, id: impl Into<ColumnId>) -> &Column {
        let id = id.into();
        &self.tables[id.table.0].columns[id.index]
    }

    pub fn index(&self, id: IndexId) -> &Index {
        &self.tables[id.table.0].indices[id.index]
    }

    pub fn foreign_keys(&self) -> impl ExactSizeIterator<Item = &ForeignKey> {
        self.foreign_keys.iter()
    }

    pub fn foreign_key(&self, id: ForeignKeyId) -> &ForeignKey {
        &self.foreign_keys[id.0]
    }

    pub fn foreign_key_by_name(&self, name: &str) -> Option<&ForeignKey> {
        self.foreign_keys.iter().find(|fk| fk.name == name)
    }

    /// Foreign keys held by `table`.
    pub fn outgoing_foreign_keys(
        &self,
        table: TableId,
    ) -> impl ExactSizeIterator<Item = &ForeignKey> {
        self.table(table).outgoing_foreign_keys(self)
    }

    /// Foreign keys referencing `table`.
    pub fn incoming_foreign_keys(
        &self,
        table: TableId,
    ) -> impl ExactSizeIterator<Item = &ForeignKey> {
        self.table(table).incoming_foreign_keys(self)
    }

    /// Recoverable problems found while building, in discovery order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

impl From<&Table> for TableId {
    fn from(value: &Table) -> Self {
        value.id
    }
}
