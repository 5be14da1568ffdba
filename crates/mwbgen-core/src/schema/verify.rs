use super::{Catalog, ForeignKeyId, TableId};
use crate::{Error, Result};

struct Verify<'a> {
    catalog: &'a Catalog,
}

impl Catalog {
    pub(super) fn verify(&self) -> Result<()> {
        Verify { catalog: self }.verify()
    }
}

impl Verify<'_> {
    fn verify(&self) -> Result<()> {
        debug_assert!(self.verify_ids_are_positional());

        self.verify_foreign_key_columns()?;
        self.verify_indices_are_local()?;
        Ok(())
    }

    fn verify_ids_are_positional(&self) -> bool {
        for (i, table) in self.catalog.tables.iter().enumerate() {
            assert_eq!(table.id, TableId(i));

            for (j, column) in table.columns.iter().enumerate() {
                assert_eq!(column.id.table, table.id);
                assert_eq!(column.id.index, j);
            }
        }

        for (i, fk) in self.catalog.foreign_keys.iter().enumerate() {
            assert_eq!(fk.id, ForeignKeyId(i));
        }

        true
    }

    /// Every foreign key pairs local columns of its owner with columns of its
    /// target, one to one.
    fn verify_foreign_key_columns(&self) -> Result<()> {
        for fk in &self.catalog.foreign_keys {
            if fk.columns.is_empty() {
                return Err(Error::invalid_schema(format!(
                    "foreign key `{}` has no columns",
                    fk.name
                )));
            }

            for pair in &fk.columns {
                if pair.local.table != fk.owner || pair.foreign.table != fk.target {
                    return Err(Error::invalid_schema(format!(
                        "foreign key `{}` pairs columns of unrelated tables",
                        fk.name
                    )));
                }
            }

            let mut locals: Vec<_> = fk.columns.iter().map(|pair| pair.local).collect();
            locals.sort();
            locals.dedup();
            if locals.len() != fk.columns.len() {
                return Err(Error::invalid_schema(format!(
                    "foreign key `{}` lists a local column more than once",
                    fk.name
                )));
            }
        }

        Ok(())
    }

    fn verify_indices_are_local(&self) -> Result<()> {
        for table in &self.catalog.tables {
            for index in &table.indices {
                if index.columns.iter().any(|column| column.table != table.id) {
                    return Err(Error::invalid_schema(format!(
                        "index `{}` on `{}` uses a column of another table",
                        index.name, table.name
                    )));
                }
            }
        }

        Ok(())
    }
}
