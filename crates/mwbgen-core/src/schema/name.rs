use super::{Table, TableOptions};
use crate::{template, Config, Result};

use std_util::str;

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Name {
    pub parts: Vec<String>,
}

impl Name {
    pub fn new(src: &str) -> Self {
        let snake = str::snake_case(src);
        let parts = snake
            .split('_')
            .filter(|part| !part.is_empty())
            .map(String::from)
            .collect();
        Self { parts }
    }

    pub fn camel_case(&self) -> String {
        str::camel_case(&self.snake_case())
    }

    pub fn upper_camel_case(&self) -> String {
        str::upper_camel_case(&self.snake_case())
    }

    pub fn snake_case(&self) -> String {
        self.parts.join("_")
    }

    pub fn upper_snake_case(&self) -> String {
        str::upper_snake_case(&self.snake_case())
    }
}

/// Derives model names, namespaces, and relation variable names.
///
/// Every result is a pure function of its inputs and the configuration.
#[derive(Debug, Clone, Copy)]
pub struct Naming<'a> {
    config: &'a Config,
}

impl<'a> Naming<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &'a Config {
        self.config
    }

    /// The class-like name of a table.
    ///
    /// A `modelName` directive is used verbatim. Otherwise a plural raw name
    /// is singularized, unless plural name checking is skipped, and then
    /// upper-camel-cased: `users_bureaus` becomes `UsersBureau`, `campus`
    /// stays `Campus`.
    pub fn model_name(&self, raw_name: &str, options: &TableOptions) -> String {
        if let Some(name) = &options.model_name {
            return name.clone();
        }

        let base = if !self.config.skip_plural_name_checking && str::is_plural(raw_name) {
            str::singularize(raw_name)
        } else {
            raw_name.to_string()
        };

        Name::new(&base).upper_camel_case()
    }

    /// Combines `name` with a disambiguating `related` name through the
    /// configured template, then pluralizes the result when `plural` is set.
    ///
    /// Without `related`, `name` is used as is.
    pub fn related_var_name(
        &self,
        name: &str,
        related: Option<&str>,
        plural: bool,
    ) -> Result<String> {
        let name = match related {
            Some(related) => template::substitute(
                &self.config.related_var_name_format,
                &[("name", name), ("related", related)],
            )?,
            None => name.to_string(),
        };

        Ok(if plural { str::pluralize(&name) } else { name })
    }

    /// The bundle and entity namespaces joined with `\`, e.g.
    /// `Acme\Shop\Entity`.
    pub fn entity_namespace(&self, options: &TableOptions) -> String {
        let bundle = options
            .bundle_namespace
            .as_deref()
            .unwrap_or(&self.config.bundle_namespace);

        join_namespace(&[bundle, &self.config.entity_namespace])
    }

    /// The namespace a table's class is generated in. A `package` directive
    /// replaces the computed namespace.
    pub fn namespace(&self, options: &TableOptions) -> String {
        match &options.package {
            Some(package) => package.clone(),
            None => self.entity_namespace(options),
        }
    }

    /// The fully qualified class name of a table.
    pub fn qualified_model_name(&self, table: &Table) -> String {
        join_namespace(&[&self.namespace(&table.options), &table.model_name])
    }

    /// The table name as rendered into generated code.
    pub fn table_name(&self, schema: &str, table: &str) -> String {
        if self.config.extend_table_name_with_schema_name && !schema.is_empty() {
            format!("{schema}.{table}")
        } else {
            table.to_string()
        }
    }
}

fn join_namespace(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| part.trim_matches('\\'))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\\")
}
