//! Relation resolution over a linked catalog.
//!
//! Runs once, right after the catalog is built:
//!
//! 1. Junction tables are detected.
//! 2. Every foreign key is classified from its owner's point of view.
//! 3. Foreign keys on both sides of an association (reciprocal one-to-one
//!    keys, or the two keys of a junction) are paired and one of them is
//!    picked as the owning side.
//! 4. Each table's relations are collected and named.

use super::diagnostic::Diagnostics;
use super::{Catalog, ColumnId, ForeignKey, ForeignKeyId, Relation, RelationKind, Table};
use crate::{Error, Result};

use std::collections::HashSet;
use std_util::str;

pub(super) fn resolve(catalog: &mut Catalog, diagnostics: &mut Diagnostics) -> Result<()> {
    let junctions: Vec<bool> = catalog
        .tables
        .iter()
        .map(|table| is_junction(catalog, table, diagnostics))
        .collect();

    for (table, junction) in catalog.tables.iter_mut().zip(junctions) {
        table.many_to_many = junction;
    }

    let kinds: Vec<RelationKind> = catalog
        .foreign_keys
        .iter()
        .map(|fk| classify(catalog, fk))
        .collect();

    for (fk, kind) in catalog.foreign_keys.iter_mut().zip(kinds) {
        fk.kind = kind;
    }

    for (a, b) in pairs(catalog) {
        let owner = owning_side(catalog.foreign_key(a), catalog.foreign_key(b))?;

        tracing::debug!(
            owning = %catalog.foreign_key(owner).name,
            a = %catalog.foreign_key(a).name,
            b = %catalog.foreign_key(b).name,
            "resolved owning side"
        );

        let fks = &mut catalog.foreign_keys;
        fks[a.0].mapped = Some(b);
        fks[b.0].mapped = Some(a);
        fks[a.0].owning_side = owner == a;
        fks[b.0].owning_side = owner == b;
    }

    let relations = catalog
        .tables
        .iter()
        .map(|table| relations(catalog, table))
        .collect::<Result<Vec<_>>>()?;

    for (table, relations) in relations.iter().enumerate() {
        let mut seen = HashSet::new();
        for relation in relations {
            if !seen.insert(relation.name.as_str()) {
                diagnostics.warn(
                    &subject(catalog, &catalog.tables[table]),
                    format!("relation name `{}` is used more than once", relation.name),
                );
            }
        }
    }

    for (table, relations) in catalog.tables.iter_mut().zip(relations) {
        table.relations = relations;
    }

    Ok(())
}

/// Junction detection. A `m2m` directive decides on its own; otherwise,
/// when structural detection is enabled, a junction holds exactly two
/// foreign keys to two distinct other tables, its primary key is exactly the
/// union of their columns, those columns are not null, and every other
/// column is optional.
fn is_junction(catalog: &Catalog, table: &Table, diagnostics: &mut Diagnostics) -> bool {
    let fks: Vec<&ForeignKey> = table.outgoing_foreign_keys(catalog).collect();
    let links_two_tables = match fks[..] {
        [a, b] => a.target != b.target && a.target != table.id && b.target != table.id,
        _ => false,
    };

    match table.options.many_to_many {
        Some(true) if !links_two_tables => {
            diagnostics.warn(
                &subject(catalog, table),
                "ignoring `m2m`; a junction table needs two foreign keys to two other tables",
            );
            return false;
        }
        Some(m2m) => return m2m,
        None if !catalog.config.enhance_many_to_many_detection => return false,
        None => {}
    }

    if !links_two_tables {
        return false;
    }

    let mut key: Vec<ColumnId> = vec![];
    for fk in &fks {
        for pair in &fk.columns {
            if !key.contains(&pair.local) {
                key.push(pair.local);
            }
        }
    }

    let junction = table.is_primary_key(&key)
        && key.iter().all(|id| !table.column(*id).nullable)
        && table
            .columns
            .iter()
            .all(|column| key.contains(&column.id) || !column.is_required());

    if junction {
        tracing::debug!(table = %table.name, "detected junction table");
    }

    junction
}

/// Cardinality of `fk` from its owner's point of view.
fn classify(catalog: &Catalog, fk: &ForeignKey) -> RelationKind {
    let owner = catalog.table(fk.owner);
    if owner.many_to_many {
        return RelationKind::ManyToMany;
    }

    match fk.many {
        Some(false) => return RelationKind::OneToOne,
        Some(true) => return RelationKind::ManyToOne,
        None => {}
    }

    let local: Vec<ColumnId> = fk.columns.iter().map(|pair| pair.local).collect();
    let required = local.iter().all(|id| !owner.column(*id).nullable);

    if required && (owner.is_primary_key(&local) || owner.is_unique_key(&local)) {
        RelationKind::OneToOne
    } else {
        RelationKind::ManyToOne
    }
}

/// Foreign keys that sit on both sides of one association.
fn pairs(catalog: &Catalog) -> Vec<(ForeignKeyId, ForeignKeyId)> {
    let mut pairs = vec![];
    let mut paired = vec![false; catalog.foreign_keys.len()];

    for table in catalog.tables.iter().filter(|table| table.many_to_many) {
        if let [a, b] = table.foreign_keys[..] {
            paired[a.0] = true;
            paired[b.0] = true;
            pairs.push((a, b));
        }
    }

    for a in &catalog.foreign_keys {
        if paired[a.id.0] || a.kind != RelationKind::OneToOne {
            continue;
        }

        let reciprocal = catalog.foreign_keys.iter().find(|b| {
            b.id != a.id
                && !paired[b.id.0]
                && b.kind == RelationKind::OneToOne
                && b.owner == a.target
                && b.target == a.owner
        });

        if let Some(b) = reciprocal {
            paired[a.id.0] = true;
            paired[b.id.0] = true;
            pairs.push((a.id, b.id));
        }
    }

    pairs
}

/// Picks the owning key of a pair. An `owningSide` directive wins, on
/// either key; otherwise the key declared first owns the association.
fn owning_side(a: &ForeignKey, b: &ForeignKey) -> Result<ForeignKeyId> {
    match (a.options.owning_side, b.options.owning_side) {
        (true, false) => Ok(a.id),
        (false, true) => Ok(b.id),
        (false, false) if a.id != b.id => Ok(a.id.min(b.id)),
        _ => Err(Error::invalid_schema(format!(
            "cannot decide the owning side between foreign keys `{}` and `{}`; \
             mark exactly one of them with `owningSide`",
            a.name, b.name
        ))),
    }
}

fn relations(catalog: &Catalog, table: &Table) -> Result<Vec<Relation>> {
    let naming = catalog.naming();
    let mut relations = vec![];

    if !table.many_to_many {
        for fk in table.outgoing_foreign_keys(catalog) {
            let related = related_by(catalog, fk);
            let name = naming.related_var_name(
                &fk.target(catalog).model_name,
                related.as_deref(),
                false,
            )?;
            let bidirectional = match fk.mapped {
                Some(_) => true,
                None => !fk.is_unidirectional(),
            };

            relations.push(Relation {
                kind: fk.kind,
                name: str::lcfirst(&name),
                table: table.id,
                target: fk.target,
                foreign_key: fk.id,
                mapped_by: fk.mapped,
                junction: None,
                owning_side: fk.owning_side,
                bidirectional,
                inverse: false,
                related,
            });
        }
    }

    for fk in table.incoming_foreign_keys(catalog) {
        let owner = fk.owner(catalog);
        if owner.many_to_many || fk.is_unidirectional() || fk.mapped.is_some() {
            continue;
        }

        let kind = fk.kind.inverse();
        let related = match related_by(catalog, fk) {
            // A single-valued self reference would otherwise share the name
            // of the outbound relation
            None if fk.is_self_referencing() && !kind.is_collection() => {
                Some(related_by_columns(catalog, fk))
            }
            related => related,
        };
        let name = match fk.foreign_alias() {
            Some(alias) => alias.to_string(),
            None => naming.related_var_name(
                &owner.model_name,
                related.as_deref(),
                kind.is_collection(),
            )?,
        };

        relations.push(Relation {
            kind,
            name: str::lcfirst(&name),
            table: table.id,
            target: fk.owner,
            foreign_key: fk.id,
            mapped_by: None,
            junction: None,
            owning_side: false,
            bidirectional: true,
            inverse: true,
            related,
        });
    }

    for fk in table.incoming_foreign_keys(catalog) {
        let junction = fk.owner(catalog);
        if !junction.many_to_many {
            continue;
        }

        let Some(other) = fk.mapped(catalog) else {
            continue;
        };

        let unidirectional = fk.is_unidirectional() || other.is_unidirectional();
        if unidirectional && !fk.owning_side {
            continue;
        }

        let target = other.target(catalog);
        let related = via(catalog, table, fk, other);
        let name = naming.related_var_name(&target.model_name, related.as_deref(), true)?;

        relations.push(Relation {
            kind: RelationKind::ManyToMany,
            name: str::lcfirst(&name),
            table: table.id,
            target: other.target,
            foreign_key: fk.id,
            mapped_by: Some(other.id),
            junction: Some(junction.id),
            owning_side: fk.owning_side,
            bidirectional: !unidirectional,
            inverse: false,
            related,
        });
    }

    Ok(relations)
}

fn subject(catalog: &Catalog, table: &Table) -> String {
    let schema = &catalog.schema(table.schema).name;
    if schema.is_empty() {
        table.name.clone()
    } else {
        format!("{schema}.{}", table.name)
    }
}

/// `RelatedBy<Columns>` when the owner of `fk` holds several foreign keys to
/// the same table.
fn related_by(catalog: &Catalog, fk: &ForeignKey) -> Option<String> {
    let siblings = fk
        .owner(catalog)
        .outgoing_foreign_keys(catalog)
        .filter(|other| other.target == fk.target)
        .count();

    (siblings > 1).then(|| related_by_columns(catalog, fk))
}

fn related_by_columns(catalog: &Catalog, fk: &ForeignKey) -> String {
    let columns: String = fk
        .local_columns(catalog)
        .map(|column| str::upper_camel_case(&column.name))
        .collect();
    format!("RelatedBy{columns}")
}

/// `Via<Junction>` when several junctions link `table` to the same table.
fn via(catalog: &Catalog, table: &Table, fk: &ForeignKey, other: &ForeignKey) -> Option<String> {
    let junctions = table
        .incoming_foreign_keys(catalog)
        .filter(|incoming| incoming.owner(catalog).many_to_many)
        .filter_map(|incoming| incoming.mapped(catalog))
        .filter(|sibling| sibling.target == other.target)
        .count();

    (junctions > 1).then(|| format!("Via{}", fk.owner(catalog).model_name))
}
