use crate::{Context, Formatter, Result};

use mwbgen_core::schema::{Diagnostic, Table, TableId};
use mwbgen_core::{err, template, Catalog};

use indexmap::IndexMap;

/// Walks a catalog and renders every generated table through a formatter.
///
/// Naming and the filename template follow the configuration the catalog
/// was built with.
#[derive(Debug)]
pub struct Generator<'a> {
    formatter: &'a dyn Formatter,
}

/// The files produced by one run, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct Output {
    pub files: Vec<GeneratedFile>,

    /// The catalog's diagnostics, followed by those found while generating.
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Relative path computed from the filename template.
    pub path: String,

    /// The table the file was generated from.
    pub table: TableId,

    pub content: String,
}

impl<'a> Generator<'a> {
    pub fn new(formatter: &'a dyn Formatter) -> Self {
        Self { formatter }
    }

    /// Renders every table that is neither external nor a junction.
    ///
    /// Fails on the first formatter error or unresolved filename placeholder;
    /// no partial output is returned.
    pub fn generate(&self, catalog: &Catalog) -> Result<Output> {
        let cx = Context::new(catalog, self.formatter);
        let mut output = Output {
            files: vec![],
            diagnostics: catalog.diagnostics().to_vec(),
        };

        // Output path -> index into `output.files`
        let mut paths = IndexMap::new();

        for schema in catalog.schemas() {
            for table in schema.tables(catalog) {
                if table.is_external() {
                    tracing::debug!(table = %table.name, "skipping external table");
                    continue;
                }

                let path = self.path(&cx, table)?;
                let content = self.formatter.format_table(&cx, table).map_err(|err| {
                    err.context(err!("formatting table `{}.{}`", schema.name, table.name))
                })?;

                if let Some(previous) = paths.insert(path.clone(), output.files.len()) {
                    let previous: &GeneratedFile = &output.files[previous];
                    output.diagnostics.push(Diagnostic {
                        subject: format!("{}.{}", schema.name, table.name),
                        message: format!(
                            "`{path}` is also generated for `{}`",
                            catalog.table(previous.table).name
                        ),
                    });
                }

                output.files.push(GeneratedFile {
                    path,
                    table: table.id,
                    content,
                });
            }
        }

        tracing::debug!(
            formatter = self.formatter.name(),
            files = output.files.len(),
            "generated"
        );

        Ok(output)
    }

    /// Computes the output path of `table` from the filename template.
    pub fn path(&self, cx: &Context<'_>, table: &Table) -> Result<String> {
        let template = self.formatter.filename_template(cx.config());
        let schema = cx.schema(table);
        let entity = cx.model_name(table);

        template::substitute(
            template,
            &[
                ("schema", schema.name.as_str()),
                ("table", table.name.as_str()),
                ("entity", entity.as_str()),
                ("extension", self.formatter.file_extension()),
            ],
        )
    }
}
