use super::diagnostic::Diagnostics;
use super::raw::{RawCatalog, RawColumn, RawForeignKey, RawIndex, RawTable};
use super::{
    resolve, Catalog, Column, ColumnId, DataType, ForeignKey, ForeignKeyColumn, ForeignKeyId,
    Index, IndexId, IndexKind, Naming, ReferentialAction, RelationKind, RelationOptions, Schema,
    SchemaId, Table, TableId, TableOptions, View,
};
use crate::{Config, Error, Result};

use indexmap::IndexMap;

/// Used to track state during the build process
struct BuildCatalog<'a> {
    config: &'a Config,

    /// Maps `(schema, table)` names to identifiers. The identifiers are
    /// reserved before the table objects are actually created.
    table_lookup: IndexMap<(&'a str, &'a str), TableId>,

    schemas: Vec<Schema>,

    /// Tables as they are built
    tables: Vec<Table>,

    foreign_keys: Vec<ForeignKey>,

    diagnostics: Diagnostics,
}

pub(super) fn build(raw: &RawCatalog, config: &Config) -> Result<Catalog> {
    let mut builder = BuildCatalog {
        config,
        table_lookup: IndexMap::new(),
        schemas: vec![],
        tables: vec![],
        foreign_keys: vec![],
        diagnostics: Diagnostics::default(),
    };

    builder.reserve_ids(raw)?;

    for (schema, raw_schema) in raw.schemas.iter().enumerate() {
        for raw_table in &raw_schema.tables {
            builder.build_table(SchemaId(schema), &raw_schema.name, raw_table)?;
        }
    }

    // Foreign keys are linked once every table has its columns, as keys may
    // reference tables declared later in the document.
    for raw_schema in &raw.schemas {
        for raw_table in &raw_schema.tables {
            let owner = builder.table_lookup[&(raw_schema.name.as_str(), raw_table.name.as_str())];

            for raw_fk in &raw_table.foreign_keys {
                builder.build_foreign_key(owner, raw_fk)?;
            }
        }
    }

    let BuildCatalog {
        schemas,
        tables,
        foreign_keys,
        mut diagnostics,
        ..
    } = builder;

    let mut catalog = Catalog {
        schemas,
        tables,
        foreign_keys,
        config: config.clone(),
        diagnostics: vec![],
    };

    catalog.verify()?;
    resolve::resolve(&mut catalog, &mut diagnostics)?;

    catalog.diagnostics = diagnostics.into_vec();

    tracing::debug!(
        schemas = catalog.schemas.len(),
        tables = catalog.tables.len(),
        foreign_keys = catalog.foreign_keys.len(),
        diagnostics = catalog.diagnostics.len(),
        "catalog built"
    );

    Ok(catalog)
}

impl<'a> BuildCatalog<'a> {
    fn reserve_ids(&mut self, raw: &'a RawCatalog) -> Result<()> {
        for (schema, raw_schema) in raw.schemas.iter().enumerate() {
            let id = SchemaId(schema);
            let mut tables = vec![];

            for raw_table in &raw_schema.tables {
                let table_id = TableId(self.table_lookup.len());
                let key = (raw_schema.name.as_str(), raw_table.name.as_str());

                if self.table_lookup.insert(key, table_id).is_some() {
                    return Err(Error::invalid_schema(format!(
                        "table `{}` is declared twice",
                        qualified(&raw_schema.name, &raw_table.name)
                    )));
                }

                tables.push(table_id);
            }

            self.schemas.push(Schema {
                id,
                name: raw_schema.name.clone(),
                tables,
                views: raw_schema
                    .views
                    .iter()
                    .map(|view| View {
                        schema: id,
                        name: view.name.clone(),
                        comment: view.comment.clone(),
                    })
                    .collect(),
            });
        }

        Ok(())
    }

    fn build_table(&mut self, schema: SchemaId, schema_name: &str, raw: &RawTable) -> Result<()> {
        let id = TableId(self.tables.len());
        let subject = qualified(schema_name, &raw.name);

        let options = TableOptions::parse(&raw.comment, &mut self.diagnostics, &subject);
        let model_name = Naming::new(self.config).model_name(&raw.name, &options);

        let mut table = Table {
            id,
            schema,
            name: raw.name.clone(),
            comment: raw.comment.clone(),
            external: raw.external.into(),
            columns: vec![],
            indices: vec![],
            primary_key: vec![],
            foreign_keys: vec![],
            options,
            model_name,
            incoming: vec![],
            many_to_many: false,
            relations: vec![],
        };

        for raw_column in &raw.columns {
            if table.column_by_name(&raw_column.name).is_some() {
                return Err(Error::invalid_schema(format!(
                    "table `{subject}` declares column `{}` twice",
                    raw_column.name
                )));
            }

            let column = self.build_column(&table, &subject, raw_column);
            table.columns.push(column);
        }

        for raw_index in &raw.indices {
            let index = build_index(&table, &subject, raw_index)?;
            table.indices.push(index);
        }

        self.build_primary_key(&mut table, &subject, raw)?;

        // Single column unique keys
        for index in &table.indices {
            if let [column] = index.columns[..] {
                if index.is_unique() {
                    table.columns[column.index].unique = true;
                }
            }
        }

        self.tables.push(table);
        Ok(())
    }

    fn build_column(&mut self, table: &Table, subject: &str, raw: &RawColumn) -> Column {
        let ty = DataType::from_token(&raw.ty);
        if ty.is_unknown() {
            self.diagnostics.warn(
                &format!("{subject}.{}", raw.name),
                format!("unknown datatype `{}`", raw.ty),
            );
        }

        let default_value = raw
            .default_value
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case("null"))
            .map(str::to_string);

        Column {
            id: ColumnId {
                table: table.id,
                index: table.columns.len(),
            },
            name: raw.name.clone(),
            ty,
            raw_ty: raw.ty.clone(),
            length: raw.length.0,
            precision: raw.precision.0,
            scale: raw.scale.0,
            nullable: !bool::from(raw.not_null),
            primary_key: false,
            auto_increment: raw.auto_increment.into(),
            unsigned: raw.unsigned.into(),
            unique: false,
            default_value,
            comment: raw.comment.clone(),
            foreign_keys: vec![],
            referenced_by: vec![],
        }
    }

    /// The primary key is the `PRIMARY` index, extended by any column the
    /// source flags as primary.
    fn build_primary_key(
        &mut self,
        table: &mut Table,
        subject: &str,
        raw: &RawTable,
    ) -> Result<()> {
        let mut primary = table.indices.iter().filter(|index| index.is_primary());

        let mut columns = match primary.next() {
            Some(index) => index.columns.clone(),
            None => vec![],
        };

        if primary.next().is_some() {
            return Err(Error::invalid_schema(format!(
                "table `{subject}` declares more than one primary key"
            )));
        }

        for (index, raw_column) in raw.columns.iter().enumerate() {
            let id = ColumnId {
                table: table.id,
                index,
            };
            if raw_column.primary.0 && !columns.contains(&id) {
                columns.push(id);
            }
        }

        for id in &columns {
            let column = &mut table.columns[id.index];
            column.primary_key = true;

            if column.nullable {
                self.diagnostics.warn(
                    &format!("{subject}.{}", column.name),
                    "primary key column is nullable; treating it as not null",
                );
                column.nullable = false;
            }
        }

        table.primary_key = columns;
        Ok(())
    }

    fn build_foreign_key(&mut self, owner: TableId, raw: &RawForeignKey) -> Result<()> {
        let id = ForeignKeyId(self.foreign_keys.len());
        let owner_table = &self.tables[owner.0];
        let owner_schema = &self.schemas[owner_table.schema.0].name;
        let subject = format!("{}.{}", qualified(owner_schema, &owner_table.name), raw.name);

        let target = self.resolve_target(owner_schema, &subject, raw)?;

        if raw.columns.len() != raw.referenced_columns.len() {
            return Err(Error::invalid_schema(format!(
                "foreign key `{subject}` has {} local columns but {} referenced columns",
                raw.columns.len(),
                raw.referenced_columns.len()
            )));
        }

        if raw.columns.is_empty() {
            return Err(Error::invalid_schema(format!(
                "foreign key `{subject}` has no columns"
            )));
        }

        let target_table = &self.tables[target.0];
        let mut columns = vec![];

        for (local, foreign) in raw.columns.iter().zip(&raw.referenced_columns) {
            let local = owner_table.column_by_name(local).ok_or_else(|| {
                Error::invalid_schema(format!(
                    "foreign key `{subject}` uses unknown column `{local}`"
                ))
            })?;

            let foreign = target_table.column_by_name(foreign).ok_or_else(|| {
                Error::invalid_schema(format!(
                    "foreign key `{subject}` references unknown column `{}.{foreign}`",
                    target_table.name
                ))
            })?;

            columns.push(ForeignKeyColumn {
                local: local.id,
                foreign: foreign.id,
            });
        }

        let on_delete = rule(&subject, "delete", &raw.delete_rule)?;
        let on_update = rule(&subject, "update", &raw.update_rule)?;
        let options =
            RelationOptions::parse(&raw.comment, self.config, &mut self.diagnostics, &subject);

        for pair in &columns {
            self.tables[owner.0].columns[pair.local.index]
                .foreign_keys
                .push(id);
            self.tables[target.0].columns[pair.foreign.index]
                .referenced_by
                .push(id);
        }

        self.tables[owner.0].foreign_keys.push(id);
        self.tables[target.0].incoming.push(id);

        self.foreign_keys.push(ForeignKey {
            id,
            name: raw.name.clone(),
            owner,
            target,
            columns,
            on_delete,
            on_update,
            many: raw.many.map(bool::from),
            comment: raw.comment.clone(),
            options,
            kind: RelationKind::ManyToOne,
            mapped: None,
            owning_side: true,
        });

        Ok(())
    }

    /// Finds the referenced table: by explicit schema, then in the owner's
    /// schema, then as the only table of that name anywhere in the catalog.
    fn resolve_target(
        &self,
        owner_schema: &str,
        subject: &str,
        raw: &RawForeignKey,
    ) -> Result<TableId> {
        let name = raw.referenced_table.as_str();

        if !raw.referenced_schema.is_empty() {
            return self
                .table_lookup
                .get(&(raw.referenced_schema.as_str(), name))
                .copied()
                .ok_or_else(|| {
                    Error::invalid_schema(format!(
                        "foreign key `{subject}` references unknown table `{}`",
                        qualified(&raw.referenced_schema, name)
                    ))
                });
        }

        if let Some(id) = self.table_lookup.get(&(owner_schema, name)) {
            return Ok(*id);
        }

        let mut candidates = self
            .table_lookup
            .iter()
            .filter(|((_, table), _)| *table == name)
            .map(|(_, id)| *id);

        match (candidates.next(), candidates.next()) {
            (Some(id), None) => Ok(id),
            (Some(_), Some(_)) => Err(Error::invalid_schema(format!(
                "foreign key `{subject}` references table `{name}`, which exists in several schemas"
            ))),
            (None, _) => Err(Error::invalid_schema(format!(
                "foreign key `{subject}` references unknown table `{name}`"
            ))),
        }
    }
}

fn build_index(table: &Table, subject: &str, raw: &RawIndex) -> Result<Index> {
    let kind = IndexKind::from_token(&raw.kind).ok_or_else(|| {
        Error::invalid_schema(format!(
            "index `{}` on `{subject}` has unknown kind `{}`",
            raw.name, raw.kind
        ))
    })?;

    let mut columns = vec![];
    for name in &raw.columns {
        let column = table.column_by_name(name).ok_or_else(|| {
            Error::invalid_schema(format!(
                "index `{}` on `{subject}` uses unknown column `{name}`",
                raw.name
            ))
        })?;
        columns.push(column.id);
    }

    if columns.is_empty() {
        return Err(Error::invalid_schema(format!(
            "index `{}` on `{subject}` has no columns",
            raw.name
        )));
    }

    Ok(Index {
        id: IndexId {
            table: table.id,
            index: table.indices.len(),
        },
        name: raw.name.clone(),
        kind,
        columns,
        comment: raw.comment.clone(),
    })
}

fn rule(subject: &str, event: &str, value: &str) -> Result<Option<ReferentialAction>> {
    ReferentialAction::from_rule(value)
        .map_err(|err| err.context(err!("on {event} rule of foreign key `{subject}`")))
}

fn qualified(schema: &str, table: &str) -> String {
    if schema.is_empty() {
        table.to_string()
    } else {
        format!("{schema}.{table}")
    }
}
