//! Generation options, passed explicitly to the catalog builder and to
//! formatters.

mod choice;
pub(crate) use choice::impl_deserialize_choice;
pub use choice::{match_choice, parse_optional, Choice};

use crate::schema::{raw::loose, Cascade, Fetch};
use crate::{Error, Result};

use serde::{Deserialize, Deserializer};

/// Options shared by the catalog builder, the naming resolver and every
/// formatter.
///
/// Keys use the camelCase spelling of the upstream exporter so existing
/// option files keep working.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Config {
    /// When `true`, table names are used as model names without being
    /// singularized.
    pub skip_plural_name_checking: bool,

    /// When `true`, junction tables are detected from their structure. When
    /// `false`, only tables carrying an `m2m` directive are junctions.
    pub enhance_many_to_many_detection: bool,

    /// Template for relation variable names. Supports `%name%` and
    /// `%related%`.
    pub related_var_name_format: String,

    /// Template for output file names. Supports `%schema%`, `%table%`,
    /// `%entity%` and `%extension%`.
    pub filename: String,

    /// Namespace prefix for generated classes, overridable per table with the
    /// `bundleNamespace` directive.
    pub bundle_namespace: String,

    /// Entity sub-namespace appended to the bundle namespace.
    pub entity_namespace: String,

    /// Render table names as `schema.table`.
    pub extend_table_name_with_schema_name: bool,

    /// Cascade applied to relations whose foreign key has no `cascade`
    /// directive.
    #[serde(deserialize_with = "optional_choice")]
    pub default_cascade: Option<Cascade>,

    /// Fetch mode applied to relations whose foreign key has no `fetch`
    /// directive.
    #[serde(deserialize_with = "optional_choice")]
    pub default_fetch: Option<Fetch>,

    pub nullable_attribute: NullableAttribute,

    pub generated_value_strategy: GeneratedValueStrategy,
}

/// Controls when a column's nullability is reported to formatters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NullableAttribute {
    /// Only nullable columns are reported; non-null is the target default.
    #[default]
    Auto,

    /// Nullability is always reported.
    Always,
}

/// Identifier generation strategy reported for auto-increment primary keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GeneratedValueStrategy {
    #[default]
    Auto,
    Identity,
    Sequence,
    Table,
    None,
}

impl Choice for NullableAttribute {
    const OPTION: &'static str = "nullableAttribute";
    const CHOICES: &'static [(&'static str, Self)] = &[
        ("auto", NullableAttribute::Auto),
        ("always", NullableAttribute::Always),
    ];
}

impl Choice for GeneratedValueStrategy {
    const OPTION: &'static str = "generatedValueStrategy";
    const CHOICES: &'static [(&'static str, Self)] = &[
        ("auto", GeneratedValueStrategy::Auto),
        ("identity", GeneratedValueStrategy::Identity),
        ("sequence", GeneratedValueStrategy::Sequence),
        ("table", GeneratedValueStrategy::Table),
        ("none", GeneratedValueStrategy::None),
    ];
}

impl_deserialize_choice!(NullableAttribute, GeneratedValueStrategy);

impl GeneratedValueStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            GeneratedValueStrategy::Auto => "AUTO",
            GeneratedValueStrategy::Identity => "IDENTITY",
            GeneratedValueStrategy::Sequence => "SEQUENCE",
            GeneratedValueStrategy::Table => "TABLE",
            GeneratedValueStrategy::None => "NONE",
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            skip_plural_name_checking: false,
            enhance_many_to_many_detection: true,
            related_var_name_format: "%name%%related%".to_string(),
            filename: "%entity%.%extension%".to_string(),
            bundle_namespace: String::new(),
            entity_namespace: "Entity".to_string(),
            extend_table_name_with_schema_name: false,
            default_cascade: None,
            default_fetch: None,
            nullable_attribute: NullableAttribute::Auto,
            generated_value_strategy: GeneratedValueStrategy::Auto,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from a JSON object. Missing keys keep their
    /// defaults.
    pub fn from_json(src: &str) -> Result<Self> {
        serde_json::from_str(src).map_err(|err| Error::invalid_config(err.to_string()))
    }

    /// Sets a single option from its string form, as given on a command line.
    pub fn set(&mut self, key: &str, value: &str) -> Result<&mut Self> {
        match key {
            "skipPluralNameChecking" => self.skip_plural_name_checking = parse_bool(key, value)?,
            "enhanceManyToManyDetection" => {
                self.enhance_many_to_many_detection = parse_bool(key, value)?
            }
            "relatedVarNameFormat" => self.related_var_name_format = value.to_string(),
            "filename" => self.filename = value.to_string(),
            "bundleNamespace" => self.bundle_namespace = value.to_string(),
            "entityNamespace" => self.entity_namespace = value.to_string(),
            "extendTableNameWithSchemaName" => {
                self.extend_table_name_with_schema_name = parse_bool(key, value)?
            }
            "defaultCascade" => self.default_cascade = parse_optional(value)?,
            "defaultFetch" => self.default_fetch = parse_optional(value)?,
            "nullableAttribute" => {
                self.nullable_attribute = NullableAttribute::parse_choice(value)?
            }
            "generatedValueStrategy" => {
                self.generated_value_strategy = GeneratedValueStrategy::parse_choice(value)?
            }
            _ => {
                return Err(Error::invalid_config(format!(
                    "unknown configuration key `{key}`"
                )))
            }
        }

        Ok(self)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    loose::parse_flag(value).ok_or_else(|| {
        Error::invalid_config(format!("`{key}` must be a boolean; got `{value}`"))
    })
}

fn optional_choice<'de, D, T>(deserializer: D) -> core::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Choice,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) => parse_optional(&value).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
