use super::{Catalog, Column, ColumnId, TableId};

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    /// Uniquely identifies the index within the catalog
    pub id: IndexId,

    pub name: String,

    pub kind: IndexKind,

    /// Member columns, in index order.
    pub columns: Vec<ColumnId>,

    pub comment: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexKind {
    Primary,
    Unique,
    Index,
    Fulltext,
    Spatial,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct IndexId {
    pub table: TableId,
    pub index: usize,
}

impl Index {
    pub fn columns<'a>(
        &'a self,
        catalog: &'a Catalog,
    ) -> impl ExactSizeIterator<Item = &'a Column> + 'a {
        self.columns.iter().map(|id| catalog.column(*id))
    }

    pub fn is_primary(&self) -> bool {
        self.kind == IndexKind::Primary
    }

    /// `true` for primary and unique indices.
    pub fn is_unique(&self) -> bool {
        matches!(self.kind, IndexKind::Primary | IndexKind::Unique)
    }
}

impl IndexKind {
    /// Parses an index kind token. An empty token is a plain index.
    pub fn from_token(token: &str) -> Option<IndexKind> {
        match token.trim().to_ascii_uppercase().as_str() {
            "PRIMARY" | "PRIMARY KEY" => Some(IndexKind::Primary),
            "UNIQUE" | "UNIQUE KEY" => Some(IndexKind::Unique),
            "" | "INDEX" | "KEY" => Some(IndexKind::Index),
            "FULLTEXT" => Some(IndexKind::Fulltext),
            "SPATIAL" => Some(IndexKind::Spatial),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IndexKind::Primary => "PRIMARY",
            IndexKind::Unique => "UNIQUE",
            IndexKind::Index => "INDEX",
            IndexKind::Fulltext => "FULLTEXT",
            IndexKind::Spatial => "SPATIAL",
        }
    }
}

impl fmt::Debug for IndexId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "IndexId({}/{})", self.table.0, self.index)
    }
}
