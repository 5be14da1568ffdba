use mwbgen_core::raw::RawCatalog;
use mwbgen_core::schema::{DataType, IndexKind, RelationKind};
use mwbgen_core::{Catalog, Config};
use pretty_assertions::assert_eq;
use std_util::prelude::*;

/// A document as handed over by the exporter: numbers as strings, booleans
/// as integers, and `null` or `-1` for missing values.
const DOCUMENT: &str = r#"{
    "schemas": [{
        "name": "shop",
        "views": [{ "name": "active_users", "comment": null }],
        "tables": [
            {
                "name": "users",
                "comment": null,
                "isExternal": "0",
                "columns": [
                    {
                        "name": "id",
                        "type": "com.mysql.rdbms.mysql.datatype.int",
                        "length": "-1",
                        "isNotNull": 1,
                        "isPrimary": "1",
                        "autoIncrement": true,
                        "unsigned": "1"
                    },
                    {
                        "name": "email",
                        "simpleType": "VARCHAR(45)",
                        "length": 45,
                        "isNotNull": "0",
                        "defaultValue": "NULL"
                    },
                    {
                        "name": "balance",
                        "type": "decimal",
                        "precision": "10",
                        "scale": 2,
                        "isNotNull": "1",
                        "defaultValue": "0.00"
                    }
                ],
                "indices": [
                    { "name": "PRIMARY", "indexType": "PRIMARY", "columns": ["id"] },
                    { "name": "email_UNIQUE", "indexType": "UNIQUE", "columns": ["email"] }
                ]
            },
            {
                "name": "orders",
                "columns": [
                    { "name": "id", "type": "INT", "isNotNull": 1 },
                    { "name": "user_id", "type": "INT", "isNotNull": 1 }
                ],
                "indices": [{ "name": "PRIMARY", "kind": "PRIMARY KEY", "columns": ["id"] }],
                "foreignKeys": [{
                    "name": "fk_orders_users",
                    "referencedTable": "users",
                    "columns": ["user_id"],
                    "referencedColumns": ["id"],
                    "deleteRule": "CASCADE",
                    "updateRule": null,
                    "many": "1",
                    "comment": "{d:fetch}lazy{/d:fetch}"
                }]
            }
        ]
    }]
}"#;

#[test]
fn loose_document() {
    let raw = assert_ok!(RawCatalog::from_json(DOCUMENT));
    let catalog = assert_ok!(Catalog::build(&raw, &Config::default()));

    assert!(catalog.diagnostics().is_empty(), "{:?}", catalog.diagnostics());

    let shop = assert_some!(catalog.schema_by_name("shop"));
    assert_eq!(shop.views.len(), 1);
    assert_eq!(shop.views[0].name, "active_users");
    assert_eq!(shop.tables(&catalog).count(), 2);

    let users = assert_some!(catalog.table_by_name("users"));
    assert!(!users.is_external());

    let id = assert_some!(users.column_by_name("id"));
    assert_eq!(id.ty, DataType::Int);
    assert_eq!(id.raw_ty, "com.mysql.rdbms.mysql.datatype.int");
    assert_none!(id.length);
    assert!(id.primary_key);
    assert!(id.auto_increment);
    assert!(id.unsigned);
    assert!(!id.nullable);

    let email = assert_some!(users.column_by_name("email"));
    assert_eq!(email.ty, DataType::VarChar);
    assert_eq!(email.length, Some(45));
    assert!(email.nullable);
    assert!(email.unique);
    assert_none!(&email.default_value);

    let balance = assert_some!(users.column_by_name("balance"));
    assert_eq!(balance.ty, DataType::Decimal);
    assert_eq!((balance.precision, balance.scale), (Some(10), Some(2)));
    assert_eq!(balance.default_value.as_deref(), Some("0.00"));

    let kinds: Vec<IndexKind> = users.indices().iter().map(|index| index.kind).collect();
    assert_eq!(kinds, [IndexKind::Primary, IndexKind::Unique]);

    let orders = assert_some!(catalog.table_by_name("orders"));
    assert_eq!(orders.primary_key_columns().count(), 1);

    let fk = assert_some!(catalog.foreign_key_by_name("fk_orders_users"));
    assert_eq!(fk.kind(), RelationKind::ManyToOne);
    assert_none!(fk.update_rule());
    assert_eq!(fk.fetch_option().map(|fetch| fetch.as_str()), Some("LAZY"));
}

#[test]
fn missing_sections_default_to_empty() {
    let raw = assert_ok!(RawCatalog::from_json(
        r#"{ "schemas": [{ "name": "empty" }, { "name": "bare", "tables": [{ "name": "t" }] }] }"#
    ));
    let catalog = assert_ok!(Catalog::build(&raw, &Config::default()));

    assert_eq!(catalog.schemas().len(), 2);

    let table = assert_some!(catalog.table_by_name("bare.t"));
    assert!(table.columns().is_empty());
    assert!(table.primary_key.is_empty());
    assert!(table.relations().is_empty());
}

#[test]
fn malformed_flag_is_rejected() {
    let err = assert_err!(RawCatalog::from_json(
        r#"{ "schemas": [{ "name": "s", "tables": [{ "name": "t", "columns": [{ "name": "c", "isNotNull": "sometimes" }] }] }] }"#
    ));

    assert!(err.to_string().contains("sometimes"));
}
