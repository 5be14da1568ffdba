use super::{
    Catalog, Column, ColumnId, ForeignKey, ForeignKeyId, Index, Relation, Schema, SchemaId,
    TableOptions,
};

use std::fmt;

/// A table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Uniquely identifies a table
    pub id: TableId,

    pub schema: SchemaId,

    /// Name of the table, as given in the source
    pub name: String,

    pub comment: String,

    /// The table is referenced by generated code but not generated itself.
    pub external: bool,

    /// The table's columns, in source order
    pub columns: Vec<Column>,

    pub indices: Vec<Index>,

    pub primary_key: Vec<ColumnId>,

    /// Foreign keys held by this table, in source order
    pub foreign_keys: Vec<ForeignKeyId>,

    pub options: TableOptions,

    /// Derived class-like name, e.g. `User` for `users`
    pub model_name: String,

    /// Foreign keys of other tables (or this one) referencing this table
    pub(crate) incoming: Vec<ForeignKeyId>,

    pub(crate) many_to_many: bool,

    pub(crate) relations: Vec<Relation>,
}

/// Uniquely identifies a table
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct TableId(pub usize);

impl Table {
    pub fn raw_name(&self) -> &str {
        &self.name
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn schema<'a>(&self, catalog: &'a Catalog) -> &'a Schema {
        catalog.schema(self.schema)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, id: impl Into<ColumnId>) -> &Column {
        &self.columns[id.into().index]
    }

    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn indices(&self) -> &[Index] {
        &self.indices
    }

    pub fn primary_key_columns(&self) -> impl ExactSizeIterator<Item = &Column> + '_ {
        self.primary_key
            .iter()
            .map(|column_id| &self.columns[column_id.index])
    }

    /// Foreign keys held by this table.
    pub fn outgoing_foreign_keys<'a>(
        &'a self,
        catalog: &'a Catalog,
    ) -> impl ExactSizeIterator<Item = &'a ForeignKey> + 'a {
        self.foreign_keys.iter().map(|id| catalog.foreign_key(*id))
    }

    /// Foreign keys referencing this table, in catalog order.
    pub fn incoming_foreign_keys<'a>(
        &'a self,
        catalog: &'a Catalog,
    ) -> impl ExactSizeIterator<Item = &'a ForeignKey> + 'a {
        self.incoming.iter().map(|id| catalog.foreign_key(*id))
    }

    /// Classified associations of this table: outbound relations first,
    /// then inbound ones, then many-to-many relations through junctions.
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn relation_by_name(&self, name: &str) -> Option<&Relation> {
        self.relations.iter().find(|relation| relation.name == name)
    }

    /// `true` if the table only joins two other tables.
    pub fn is_many_to_many(&self) -> bool {
        self.many_to_many
    }

    /// `true` if no entity is generated for this table. Junction tables are
    /// always external.
    pub fn is_external(&self) -> bool {
        self.external || self.many_to_many
    }

    /// `true` if the listed columns, in any order, are exactly the primary
    /// key.
    pub(crate) fn is_primary_key(&self, columns: &[ColumnId]) -> bool {
        same_set(&self.primary_key, columns)
    }

    /// `true` if a unique index covers exactly the listed columns.
    pub(crate) fn is_unique_key(&self, columns: &[ColumnId]) -> bool {
        self.indices
            .iter()
            .any(|index| index.is_unique() && same_set(&index.columns, columns))
    }
}

fn same_set(a: &[ColumnId], b: &[ColumnId]) -> bool {
    !a.is_empty() && a.len() == b.len() && a.iter().all(|id| b.contains(id))
}

impl fmt::Debug for TableId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "TableId({})", self.0)
    }
}
