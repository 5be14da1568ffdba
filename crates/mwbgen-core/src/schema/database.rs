use super::{Catalog, Table, TableId, View};

use std::fmt;

/// A named group of tables and views, e.g. a MySQL database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub id: SchemaId,

    pub name: String,

    /// Tables in document order.
    pub tables: Vec<TableId>,

    pub views: Vec<View>,
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct SchemaId(pub usize);

impl Schema {
    pub fn tables<'a>(
        &'a self,
        catalog: &'a Catalog,
    ) -> impl ExactSizeIterator<Item = &'a Table> + 'a {
        self.tables.iter().map(|id| catalog.table(*id))
    }

    pub fn table_by_name<'a>(&self, catalog: &'a Catalog, name: &str) -> Option<&'a Table> {
        self.tables
            .iter()
            .map(|id| catalog.table(*id))
            .find(|table| table.name == name)
    }
}

impl fmt::Debug for SchemaId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "SchemaId({})", self.0)
    }
}
