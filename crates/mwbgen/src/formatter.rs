use crate::{Context, DatatypeConverter, Result};

use mwbgen_core::schema::{Cascade, Column, Relation, Table};
use mwbgen_core::Config;

use std::fmt::Debug;

/// An output target.
///
/// A formatter turns one table at a time into the text of one generated
/// file. Target-specific behavior is supplied through strategy objects rather
/// than by overriding the generator.
pub trait Formatter: Debug + Send + Sync {
    /// Short identifier of the target, e.g. `doctrine2-annotation`.
    fn name(&self) -> &str;

    /// Extension of generated files, without the leading dot.
    fn file_extension(&self) -> &str;

    /// Maps column datatypes to the target's type names.
    fn datatype_converter(&self) -> &dyn DatatypeConverter;

    /// Names models, columns, and relations in generated code.
    fn naming(&self) -> &dyn NamingStrategy {
        &CoreNaming
    }

    /// Decides which operations a relation cascades.
    fn cascade_policy(&self) -> &dyn CascadePolicy {
        &DirectiveCascade
    }

    /// Template for output file names. Defaults to the configured `filename`.
    fn filename_template<'a>(&'a self, config: &'a Config) -> &'a str {
        &config.filename
    }

    /// Renders the file for `table`.
    fn format_table(&self, cx: &Context<'_>, table: &Table) -> Result<String>;
}

/// Naming rules of an output target.
///
/// Every method has a default reading the names computed when the catalog
/// was built.
pub trait NamingStrategy: Debug + Send + Sync {
    fn model_name(&self, _cx: &Context<'_>, table: &Table) -> String {
        table.model_name.clone()
    }

    /// The namespace the model is generated in.
    fn namespace(&self, cx: &Context<'_>, table: &Table) -> String {
        cx.naming().namespace(&table.options)
    }

    fn column_name(&self, _cx: &Context<'_>, column: &Column) -> String {
        column.accessor_name()
    }

    fn relation_name(&self, _cx: &Context<'_>, relation: &Relation) -> String {
        relation.name.clone()
    }
}

/// Cascade rules of an output target.
pub trait CascadePolicy: Debug + Send + Sync {
    fn cascade(&self, cx: &Context<'_>, relation: &Relation) -> Vec<Cascade>;
}

/// Uses the names computed when the catalog was built.
#[derive(Debug, Default, Clone, Copy)]
pub struct CoreNaming;

impl NamingStrategy for CoreNaming {}

/// Cascades what the relation's `cascade` directive, or the configured
/// default, asks for.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectiveCascade;

impl CascadePolicy for DirectiveCascade {
    fn cascade(&self, cx: &Context<'_>, relation: &Relation) -> Vec<Cascade> {
        relation.cascade_options(cx.catalog()).to_vec()
    }
}
