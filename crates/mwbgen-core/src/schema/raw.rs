//! Records produced by the document parser, before any linking.
//!
//! Every field tolerates the loose typing of the upstream format (see
//! [`loose`]). Builder methods exist so callers embedding the generator can
//! describe a schema in code.

pub mod loose;
pub use loose::{Flag, Number};

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCatalog {
    pub schemas: Vec<RawSchema>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSchema {
    #[serde(deserialize_with = "loose::string")]
    pub name: String,
    pub tables: Vec<RawTable>,
    pub views: Vec<RawView>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTable {
    #[serde(deserialize_with = "loose::string")]
    pub name: String,
    #[serde(deserialize_with = "loose::string")]
    pub comment: String,
    /// Referenced by other tables but not generated.
    #[serde(alias = "isExternal")]
    pub external: Flag,
    pub columns: Vec<RawColumn>,
    pub indices: Vec<RawIndex>,
    pub foreign_keys: Vec<RawForeignKey>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawView {
    #[serde(deserialize_with = "loose::string")]
    pub name: String,
    #[serde(deserialize_with = "loose::string")]
    pub comment: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawColumn {
    #[serde(deserialize_with = "loose::string")]
    pub name: String,
    /// Datatype token, plain (`varchar`) or qualified
    /// (`com.mysql.rdbms.mysql.datatype.varchar`).
    #[serde(rename = "type", alias = "simpleType", deserialize_with = "loose::string")]
    pub ty: String,
    pub length: Number,
    pub precision: Number,
    pub scale: Number,
    #[serde(alias = "isNotNull")]
    pub not_null: Flag,
    #[serde(alias = "isPrimary")]
    pub primary: Flag,
    pub auto_increment: Flag,
    pub unsigned: Flag,
    #[serde(deserialize_with = "loose::optional_string")]
    pub default_value: Option<String>,
    #[serde(deserialize_with = "loose::string")]
    pub comment: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawIndex {
    #[serde(deserialize_with = "loose::string")]
    pub name: String,
    /// `PRIMARY`, `UNIQUE`, `INDEX`, `FULLTEXT`, or `SPATIAL`.
    #[serde(alias = "indexType", deserialize_with = "loose::string")]
    pub kind: String,
    pub columns: Vec<String>,
    #[serde(deserialize_with = "loose::string")]
    pub comment: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawForeignKey {
    #[serde(deserialize_with = "loose::string")]
    pub name: String,
    /// Schema of the referenced table. Empty means "same schema, or the only
    /// table with that name in the catalog".
    #[serde(deserialize_with = "loose::string")]
    pub referenced_schema: String,
    #[serde(deserialize_with = "loose::string")]
    pub referenced_table: String,
    pub columns: Vec<String>,
    pub referenced_columns: Vec<String>,
    #[serde(deserialize_with = "loose::string")]
    pub delete_rule: String,
    #[serde(deserialize_with = "loose::string")]
    pub update_rule: String,
    /// Explicit cardinality from the modeling tool: `0` marks a one-to-one
    /// relation, `1` a many-to-one. Absent means "infer from the keys".
    pub many: Option<Flag>,
    #[serde(deserialize_with = "loose::string")]
    pub comment: String,
}

impl RawCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(src: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(src)?)
    }

    pub fn schema(mut self, schema: RawSchema) -> Self {
        self.schemas.push(schema);
        self
    }
}

impl RawSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn table(mut self, table: RawTable) -> Self {
        self.tables.push(table);
        self
    }

    pub fn view(mut self, name: impl Into<String>) -> Self {
        self.views.push(RawView {
            name: name.into(),
            comment: String::new(),
        });
        self
    }
}

impl RawTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn external(mut self) -> Self {
        self.external = Flag(true);
        self
    }

    pub fn column(mut self, column: RawColumn) -> Self {
        self.columns.push(column);
        self
    }

    pub fn index(mut self, index: RawIndex) -> Self {
        self.indices.push(index);
        self
    }

    /// Shorthand for a `PRIMARY` index over `columns`.
    pub fn primary_key<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index(RawIndex::new("PRIMARY", "PRIMARY", columns))
    }

    pub fn foreign_key(mut self, foreign_key: RawForeignKey) -> Self {
        self.foreign_keys.push(foreign_key);
        self
    }
}

impl RawColumn {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            ..Self::default()
        }
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = Flag(true);
        self
    }

    pub fn primary(mut self) -> Self {
        self.primary = Flag(true);
        self.not_null = Flag(true);
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = Flag(true);
        self
    }

    pub fn unsigned(mut self) -> Self {
        self.unsigned = Flag(true);
        self
    }

    pub fn length(mut self, length: u32) -> Self {
        self.length = Number(Some(length));
        self
    }

    pub fn precision(mut self, precision: u32, scale: u32) -> Self {
        self.precision = Number(Some(precision));
        self.scale = Number(Some(scale));
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

impl RawIndex {
    pub fn new<I, S>(name: impl Into<String>, kind: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            kind: kind.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            comment: String::new(),
        }
    }

    pub fn unique<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, "UNIQUE", columns)
    }
}

impl RawForeignKey {
    pub fn new<L, F, S, T>(
        name: impl Into<String>,
        columns: L,
        referenced_table: impl Into<String>,
        referenced_columns: F,
    ) -> Self
    where
        L: IntoIterator<Item = S>,
        F: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            name: name.into(),
            referenced_table: referenced_table.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            referenced_columns: referenced_columns.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn referenced_schema(mut self, schema: impl Into<String>) -> Self {
        self.referenced_schema = schema.into();
        self
    }

    pub fn on_delete(mut self, rule: impl Into<String>) -> Self {
        self.delete_rule = rule.into();
        self
    }

    pub fn on_update(mut self, rule: impl Into<String>) -> Self {
        self.update_rule = rule.into();
        self
    }

    pub fn many(mut self, many: bool) -> Self {
        self.many = Some(Flag(many));
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}
