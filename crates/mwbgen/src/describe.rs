//! A plain-text formatter listing what the resolver derived for each table.
//!
//! Useful to inspect a document before choosing a real target, and as the
//! reference implementation of [`Formatter`].

use crate::{Context, DatatypeConverter, Formatter, Result, TypeMap};

use mwbgen_core::schema::{Column, DataType, Relation, Table};

/// Renders one summary per entity:
///
/// ```text
/// entity Entity\User
/// table users
/// columns
///   id: integer [primary key, generated AUTO]
///   email: string(45) [nullable, unique]
/// relations
///   posts: OneToMany Post [inverse side]
/// ```
#[derive(Debug, Default)]
pub struct Describe {
    types: TypeMap,
}

impl Describe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_types(types: TypeMap) -> Self {
        Self { types }
    }
}

impl Formatter for Describe {
    fn name(&self) -> &str {
        "describe"
    }

    fn file_extension(&self) -> &str {
        "txt"
    }

    fn datatype_converter(&self) -> &dyn DatatypeConverter {
        &self.types
    }

    fn format_table(&self, cx: &Context<'_>, table: &Table) -> Result<String> {
        let mut out = Output::default();

        out.line(0, format!("entity {}", cx.qualified_model_name(table)));
        out.line(0, format!("table {}", cx.table_name(table)));

        if !table.columns().is_empty() {
            out.line(0, "columns");
            for column in table.columns() {
                out.line(1, describe_column(cx, column));
            }
        }

        if !table.relations().is_empty() {
            out.line(0, "relations");
            for relation in table.relations() {
                out.line(1, describe_relation(cx, relation));
            }
        }

        let options = &table.options;

        if !options.lifecycle_callbacks.is_empty() {
            out.line(0, "lifecycle callbacks");
            for callback in &options.lifecycle_callbacks {
                out.line(1, format!("{}: {}", callback.event, callback.methods.join(", ")));
            }
        }

        if !options.external_relations.is_empty() {
            out.line(0, "external relations");
            for relation in &options.external_relations {
                out.line(1, format!("{}: {} {}", relation.name, relation.kind, relation.target));
            }
        }

        if let Some(act_as) = &options.act_as {
            out.line(0, format!("act as {act_as}"));
        }

        Ok(out.dst)
    }
}

fn describe_column(cx: &Context<'_>, column: &Column) -> String {
    let mut ty = cx.column_type(column);
    match (column.precision, column.scale) {
        (Some(precision), Some(scale)) if column.ty == DataType::Decimal => {
            ty.push_str(&format!("({precision},{scale})"));
        }
        _ => {
            if let Some(length) = column.length.filter(|_| column.ty.is_text()) {
                ty.push_str(&format!("({length})"));
            }
        }
    }

    let mut flags = vec![];

    if column.primary_key {
        flags.push("primary key".to_string());
    }

    if let Some(strategy) = column.generated_value(cx.config()) {
        flags.push(format!("generated {}", strategy.as_str()));
    }

    match column.nullable_attribute(cx.config()) {
        Some(true) => flags.push("nullable".to_string()),
        Some(false) => flags.push("not null".to_string()),
        None => {}
    }

    if column.unique && !column.primary_key {
        flags.push("unique".to_string());
    }

    if let Some(default) = &column.default_value {
        flags.push(format!("default {default}"));
    }

    with_flags(format!("{}: {ty}", cx.column_name(column)), flags)
}

fn describe_relation(cx: &Context<'_>, relation: &Relation) -> String {
    let catalog = cx.catalog();
    let target = cx.model_name(relation.target(catalog));

    let mut line = format!("{}: {} {target}", cx.relation_name(relation), relation.kind);
    if let Some(junction) = relation.junction(catalog) {
        line.push_str(&format!(" through {}", junction.name));
    }

    let mut flags = vec![];

    flags.push(if relation.is_owning_side() { "owning side" } else { "inverse side" }.to_string());

    if !relation.bidirectional {
        flags.push("unidirectional".to_string());
    }

    let cascade = cx.cascade(relation);
    if !cascade.is_empty() {
        let cascade: Vec<&str> = cascade.iter().map(|c| c.as_str()).collect();
        flags.push(format!("cascade {}", cascade.join(" ")));
    }

    if let Some(fetch) = relation.fetch_option(catalog) {
        flags.push(format!("fetch {fetch}"));
    }

    let order = relation.order_option(catalog);
    if !order.is_empty() {
        let order: Vec<String> = order
            .iter()
            .map(|entry| format!("{} {}", entry.column, entry.direction))
            .collect();
        flags.push(format!("order by {}", order.join(" ")));
    }

    if relation.is_outbound() {
        if let Some(rule) = relation.foreign_key(catalog).delete_rule() {
            flags.push(format!("on delete {rule}"));
        }
    }

    with_flags(line, flags)
}

fn with_flags(mut line: String, flags: Vec<String>) -> String {
    if !flags.is_empty() {
        line.push_str(&format!(" [{}]", flags.join(", ")));
    }
    line
}

#[derive(Default)]
struct Output {
    dst: String,
}

impl Output {
    fn line(&mut self, depth: usize, text: impl AsRef<str>) {
        for _ in 0..depth {
            self.dst.push_str("  ");
        }
        self.dst.push_str(text.as_ref());
        self.dst.push('\n');
    }
}
