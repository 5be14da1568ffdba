use super::{Catalog, DataType, ForeignKey, ForeignKeyId, TableId};
use crate::config::{Config, GeneratedValueStrategy, NullableAttribute};

use std::fmt;
use std_util::str;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Uniquely identifies the column in the catalog.
    pub id: ColumnId,

    /// The name of the column in the source schema.
    pub name: String,

    pub ty: DataType,

    /// The datatype token as given by the source, e.g.
    /// `com.mysql.rdbms.mysql.datatype.varchar`.
    pub raw_ty: String,

    pub length: Option<u32>,

    pub precision: Option<u32>,

    pub scale: Option<u32>,

    /// Whether or not the column is nullable
    pub nullable: bool,

    /// True if the column is part of the table's primary key
    pub primary_key: bool,

    pub auto_increment: bool,

    pub unsigned: bool,

    /// True if a single-column unique index covers the column.
    pub unique: bool,

    /// Literal default value. Empty and `NULL` defaults are `None`.
    pub default_value: Option<String>,

    pub comment: String,

    /// Foreign keys using this column as a local column.
    pub(crate) foreign_keys: Vec<ForeignKeyId>,

    /// Foreign keys referencing this column.
    pub(crate) referenced_by: Vec<ForeignKeyId>,
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct ColumnId {
    pub table: TableId,
    pub index: usize,
}

impl Column {
    /// The column name as a property accessor, e.g. `created_at` becomes
    /// `createdAt`.
    pub fn accessor_name(&self) -> String {
        str::camel_case(&self.name)
    }

    pub fn is_foreign_key(&self) -> bool {
        !self.foreign_keys.is_empty()
    }

    pub fn foreign_keys<'a>(
        &'a self,
        catalog: &'a Catalog,
    ) -> impl Iterator<Item = &'a ForeignKey> + 'a {
        self.foreign_keys.iter().map(|id| catalog.foreign_key(*id))
    }

    pub fn referenced_by<'a>(
        &'a self,
        catalog: &'a Catalog,
    ) -> impl Iterator<Item = &'a ForeignKey> + 'a {
        self.referenced_by.iter().map(|id| catalog.foreign_key(*id))
    }

    /// The nullability to report for this column, if any.
    ///
    /// With [`NullableAttribute::Auto`] only nullable columns report
    /// `Some(true)`; non-null is assumed by targets.
    pub fn nullable_attribute(&self, config: &Config) -> Option<bool> {
        match config.nullable_attribute {
            NullableAttribute::Always => Some(self.nullable),
            NullableAttribute::Auto => self.nullable.then_some(true),
        }
    }

    /// The identifier generation strategy, for auto-increment primary key
    /// columns.
    pub fn generated_value(&self, config: &Config) -> Option<GeneratedValueStrategy> {
        match config.generated_value_strategy {
            GeneratedValueStrategy::None => None,
            strategy if self.primary_key && self.auto_increment => Some(strategy),
            _ => None,
        }
    }

    /// `true` if a row cannot be inserted without supplying a value.
    pub(crate) fn is_required(&self) -> bool {
        !self.nullable && self.default_value.is_none() && !self.auto_increment
    }
}

impl From<&Column> for ColumnId {
    fn from(value: &Column) -> Self {
        value.id
    }
}

impl fmt::Debug for ColumnId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ColumnId({}/{})", self.table.0, self.index)
    }
}
