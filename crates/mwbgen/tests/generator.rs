use mwbgen::raw::*;
use mwbgen::schema::{Cascade, DataType, Relation, RelationKind, Table};
use mwbgen::{
    CascadePolicy, Catalog, Config, Context, DatatypeConverter, Describe, Formatter, Generator,
    NamingStrategy, Result, TypeMap,
};
use pretty_assertions::assert_eq;
use std_util::prelude::*;
use std_util::str;

/// Emits one JavaScript model definition per table.
#[derive(Debug)]
struct JsModels {
    types: TypeMap,
}

#[derive(Debug)]
struct SnakeNaming;

#[derive(Debug)]
struct PersistCollections;

impl JsModels {
    fn new() -> Self {
        JsModels {
            types: TypeMap {
                entries: &[
                    (DataType::Int, "INTEGER"),
                    (DataType::VarChar, "STRING"),
                ],
                tiny_int_flag: None,
                fallback: None,
            },
        }
    }
}

impl NamingStrategy for SnakeNaming {
    fn model_name(&self, _cx: &Context<'_>, table: &Table) -> String {
        table.name.clone()
    }

    fn namespace(&self, _cx: &Context<'_>, _table: &Table) -> String {
        String::new()
    }

    fn relation_name(&self, _cx: &Context<'_>, relation: &Relation) -> String {
        str::snake_case(&relation.name)
    }
}

impl CascadePolicy for PersistCollections {
    fn cascade(&self, _cx: &Context<'_>, relation: &Relation) -> Vec<Cascade> {
        if relation.kind.is_collection() {
            vec![Cascade::Persist]
        } else {
            vec![]
        }
    }
}

impl Formatter for JsModels {
    fn name(&self) -> &str {
        "js-models"
    }

    fn file_extension(&self) -> &str {
        "js"
    }

    fn datatype_converter(&self) -> &dyn DatatypeConverter {
        &self.types
    }

    fn naming(&self) -> &dyn NamingStrategy {
        &SnakeNaming
    }

    fn cascade_policy(&self) -> &dyn CascadePolicy {
        &PersistCollections
    }

    fn filename_template<'a>(&'a self, _config: &'a Config) -> &'a str {
        "models/%table%.%extension%"
    }

    fn format_table(&self, cx: &Context<'_>, table: &Table) -> Result<String> {
        let mut out = format!("define('{}', {{\n", cx.qualified_model_name(table));

        for column in table.columns() {
            out.push_str(&format!("  {}: '{}',\n", cx.column_name(column), cx.column_type(column)));
        }

        for relation in table.relations() {
            let cascade: Vec<&str> = cx.cascade(relation).iter().map(|c| c.as_str()).collect();
            out.push_str(&format!(
                "  // {} {} [{}]\n",
                cx.relation_name(relation),
                relation.kind,
                cascade.join(",")
            ));
        }

        out.push_str("});\n");
        Ok(out)
    }
}

/// Fails on a single table.
#[derive(Debug)]
struct Failing;

impl Formatter for Failing {
    fn name(&self) -> &str {
        "failing"
    }

    fn file_extension(&self) -> &str {
        "txt"
    }

    fn datatype_converter(&self) -> &dyn DatatypeConverter {
        &TypeMap::DEFAULT
    }

    fn format_table(&self, _cx: &Context<'_>, table: &Table) -> Result<String> {
        if table.name == "order_items" {
            mwbgen_core::bail!("no template for `{}`", table.name);
        }
        Ok(String::new())
    }
}

fn shop() -> RawCatalog {
    let orders = RawTable::new("orders")
        .column(RawColumn::new("id", "INT").primary().auto_increment())
        .column(RawColumn::new("location", "POINT"))
        .primary_key(["id"]);

    let order_items = RawTable::new("order_items")
        .column(RawColumn::new("id", "INT").primary().auto_increment())
        .column(RawColumn::new("order_id", "INT").not_null())
        .column(RawColumn::new("sku", "VARCHAR").length(32).not_null())
        .primary_key(["id"])
        .foreign_key(RawForeignKey::new("fk_items_orders", ["order_id"], "orders", ["id"]));

    let legacy = RawTable::new("legacy_codes")
        .external()
        .column(RawColumn::new("code", "CHAR").primary())
        .primary_key(["code"]);

    RawCatalog::new().schema(
        RawSchema::new("shop")
            .table(orders)
            .table(order_items)
            .table(legacy),
    )
}

fn build(config: &Config) -> Catalog {
    assert_ok!(Catalog::build(&shop(), config))
}

#[test]
fn custom_formatter_strategies() {
    let config = Config::default();
    let catalog = build(&config);
    let formatter = JsModels::new();

    let output = assert_ok!(Generator::new(&formatter).generate(&catalog));

    let paths: Vec<&str> = output.files.iter().map(|file| file.path.as_str()).collect();
    assert_eq!(paths, ["models/orders.js", "models/order_items.js"]);

    assert_eq!(
        output.files[0].content,
        "define('orders', {\n  \
         id: 'INTEGER',\n  \
         location: 'point',\n  \
         // order_items OneToMany [persist]\n\
         });\n"
    );
    assert_eq!(
        output.files[1].content,
        "define('order_items', {\n  \
         id: 'INTEGER',\n  \
         orderId: 'INTEGER',\n  \
         sku: 'STRING',\n  \
         // order ManyToOne []\n\
         });\n"
    );

    let orders = assert_some!(catalog.table_by_name("orders"));
    assert_eq!(output.files[0].table, orders.id);
    assert_eq!(orders.relations()[0].kind, RelationKind::OneToMany);
}

#[test]
fn external_tables_are_skipped() {
    let config = Config::default();
    let catalog = build(&config);
    let output = assert_ok!(Generator::new(&Describe::new()).generate(&catalog));

    assert!(output
        .files
        .iter()
        .all(|file| catalog.table(file.table).name != "legacy_codes"));
    assert_eq!(output.files.len(), 2);
}

#[test]
fn filename_template_placeholders() {
    let mut config = Config::default();
    assert_ok!(config.set("filename", "%schema%/%table%/%entity%.%extension%"));

    let catalog = build(&config);
    let output = assert_ok!(Generator::new(&Describe::new()).generate(&catalog));

    assert_eq!(output.files[1].path, "shop/order_items/OrderItem.txt");
}

#[test]
fn generation_follows_the_catalog_configuration() {
    let mut config = Config::default();
    assert_ok!(config.set("bundleNamespace", "Acme"));
    assert_ok!(config.set("filename", "%schema%/%entity%.%extension%"));

    let catalog = build(&config);
    let describe = Describe::new();
    let cx = Context::new(&catalog, &describe);
    assert_eq!(cx.config().bundle_namespace, "Acme");

    let output = assert_ok!(Generator::new(&Describe::new()).generate(&catalog));
    assert_eq!(output.files[0].path, "shop/Order.txt");
    assert!(output.files[0]
        .content
        .starts_with("entity Acme\\Entity\\Order\n"));
}

#[test]
fn unresolved_filename_placeholder() {
    let mut config = Config::default();
    assert_ok!(config.set("filename", "%entitiy%.%extension%"));

    let catalog = build(&config);
    let err = assert_err!(Generator::new(&Describe::new()).generate(&catalog));

    assert!(err.is_unresolved_placeholder());
    assert!(err.to_string().contains("`%entitiy%`"));
}

#[test]
fn formatter_errors_name_the_table() {
    let config = Config::default();
    let catalog = build(&config);
    let err = assert_err!(Generator::new(&Failing).generate(&catalog));

    assert_eq!(
        err.to_string(),
        "formatting table `shop.order_items`: no template for `order_items`"
    );
}

#[test]
fn colliding_paths_are_reported() {
    let mut config = Config::default();
    assert_ok!(config.set("filename", "entities.%extension%"));

    let catalog = build(&config);
    let output = assert_ok!(Generator::new(&Describe::new()).generate(&catalog));

    assert_eq!(output.files.len(), 2);

    let messages: Vec<String> = output.diagnostics.iter().map(ToString::to_string).collect();
    assert_eq!(
        messages,
        ["shop.order_items: `entities.txt` is also generated for `orders`"]
    );
}

#[test]
fn catalog_diagnostics_are_carried_over() {
    let raw = RawCatalog::new().schema(
        RawSchema::new("shop").table(
            RawTable::new("things")
                .column(RawColumn::new("id", "INT").primary())
                .column(RawColumn::new("shape", "HYPERCUBE"))
                .primary_key(["id"]),
        ),
    );

    let config = Config::default();
    let catalog = assert_ok!(Catalog::build(&raw, &config));
    let output = assert_ok!(Generator::new(&Describe::new()).generate(&catalog));

    assert_eq!(output.diagnostics, catalog.diagnostics());
    assert_eq!(output.diagnostics.len(), 1);

    // Unknown datatypes fall back to the table's default
    assert!(output.files[0].content.contains("shape: string [nullable]"));
}
