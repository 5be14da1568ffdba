use mwbgen_core::schema::{Column, DataType};

use std::fmt::Debug;

/// Maps a column's datatype to the type name used by an output target.
pub trait DatatypeConverter: Debug + Send + Sync {
    fn convert(&self, column: &Column) -> String;
}

/// A static conversion table.
///
/// Datatypes missing from the table, including unknown ones, convert to
/// `fallback` when set, or else to their own lowercase name.
#[derive(Debug, Clone, Copy)]
pub struct TypeMap {
    pub entries: &'static [(DataType, &'static str)],

    /// Type for `TINYINT(1)` columns, which the modeling tool uses for
    /// booleans.
    pub tiny_int_flag: Option<&'static str>,

    pub fallback: Option<&'static str>,
}

impl TypeMap {
    /// Portable type names in the style of database abstraction layers:
    /// `integer`, `string`, `datetime`, and so on.
    pub const DEFAULT: TypeMap = TypeMap {
        entries: &[
            (DataType::TinyInt, "smallint"),
            (DataType::SmallInt, "smallint"),
            (DataType::MediumInt, "integer"),
            (DataType::Int, "integer"),
            (DataType::BigInt, "bigint"),
            (DataType::Decimal, "decimal"),
            (DataType::Float, "float"),
            (DataType::Double, "float"),
            (DataType::Real, "float"),
            (DataType::Bit, "boolean"),
            (DataType::Boolean, "boolean"),
            (DataType::Date, "date"),
            (DataType::DateTime, "datetime"),
            (DataType::Timestamp, "datetime"),
            (DataType::Time, "time"),
            (DataType::Year, "smallint"),
            (DataType::Char, "string"),
            (DataType::VarChar, "string"),
            (DataType::Binary, "binary"),
            (DataType::VarBinary, "binary"),
            (DataType::TinyText, "text"),
            (DataType::Text, "text"),
            (DataType::MediumText, "text"),
            (DataType::LongText, "text"),
            (DataType::TinyBlob, "blob"),
            (DataType::Blob, "blob"),
            (DataType::MediumBlob, "blob"),
            (DataType::LongBlob, "blob"),
            (DataType::Enum, "string"),
            (DataType::Set, "simple_array"),
            (DataType::Json, "json"),
        ],
        tiny_int_flag: Some("boolean"),
        fallback: Some("string"),
    };

    pub fn get(&self, ty: &DataType) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == ty)
            .map(|(_, name)| *name)
    }
}

impl Default for TypeMap {
    fn default() -> Self {
        TypeMap::DEFAULT
    }
}

impl DatatypeConverter for TypeMap {
    fn convert(&self, column: &Column) -> String {
        if column.ty == DataType::TinyInt && column.length == Some(1) {
            if let Some(flag) = self.tiny_int_flag {
                return flag.to_string();
            }
        }

        self.get(&column.ty)
            .or(self.fallback)
            .map(str::to_string)
            .unwrap_or_else(|| column.ty.as_str().to_ascii_lowercase())
    }
}
