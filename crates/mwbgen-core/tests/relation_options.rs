use mwbgen_core::raw::*;
use mwbgen_core::schema::{
    Cascade, Direction, ExternalRelation, Fetch, LifecycleCallback, OrderBy, RelationKind,
};
use mwbgen_core::{Catalog, Config};
use pretty_assertions::assert_eq;
use std_util::prelude::*;

fn build_with(config: &Config, fk_comment: &str, table_comment: &str) -> Catalog {
    let users = RawTable::new("users")
        .comment(table_comment)
        .column(RawColumn::new("id", "INT").primary())
        .primary_key(["id"]);

    let posts = RawTable::new("posts")
        .column(RawColumn::new("id", "INT").primary())
        .column(RawColumn::new("user_id", "INT"))
        .primary_key(["id"])
        .foreign_key(
            RawForeignKey::new("fk_posts_users", ["user_id"], "users", ["id"]).comment(fk_comment),
        );

    let raw = RawCatalog::new().schema(RawSchema::new("app").table(users).table(posts));
    assert_ok!(Catalog::build(&raw, config))
}

fn build(fk_comment: &str) -> Catalog {
    build_with(&Config::default(), fk_comment, "")
}

fn messages(catalog: &Catalog) -> Vec<String> {
    catalog
        .diagnostics()
        .iter()
        .map(|diagnostic| diagnostic.message.clone())
        .collect()
}

#[test]
fn no_directives() {
    let catalog = build("");
    let fk = assert_some!(catalog.foreign_key_by_name("fk_posts_users"));

    assert!(fk.cascade_options().is_empty());
    assert_none!(fk.fetch_option());
    assert!(fk.order_option().is_empty());
    assert_none!(fk.foreign_alias());
    assert!(!fk.is_unidirectional());
}

#[test]
fn relation_directives() {
    let catalog = build(
        "Posts written by a user.\n\
         {d:cascade}persist, REMOVE{/d:cascade}\n\
         {d:fetch}extra_lazy{/d:fetch}\n\
         {d:order}\n\
         created_at DESC\n\
         title\n\
         {/d:order}",
    );
    assert!(catalog.diagnostics().is_empty(), "{:?}", catalog.diagnostics());

    let fk = assert_some!(catalog.foreign_key_by_name("fk_posts_users"));
    assert_eq!(fk.cascade_options(), [Cascade::Persist, Cascade::Remove]);
    assert_eq!(fk.fetch_option(), Some(Fetch::ExtraLazy));
    assert_eq!(
        fk.order_option(),
        [
            OrderBy {
                column: "created_at".to_string(),
                direction: Direction::Desc,
            },
            OrderBy {
                column: "title".to_string(),
                direction: Direction::Asc,
            },
        ]
    );

    // Relations on both sides read the same key
    let users = assert_some!(catalog.table_by_name("users"));
    let relation = &users.relations()[0];
    assert_eq!(relation.cascade_options(&catalog), [Cascade::Persist, Cascade::Remove]);
    assert_eq!(relation.fetch_option(&catalog), Some(Fetch::ExtraLazy));
    assert_eq!(relation.order_option(&catalog).len(), 2);
}

#[test]
fn unknown_cascade_tokens_are_reported() {
    let catalog = build("cascade: persist, explode");
    let fk = assert_some!(catalog.foreign_key_by_name("fk_posts_users"));

    assert_eq!(fk.cascade_options(), [Cascade::Persist]);
    assert_eq!(messages(&catalog), ["ignoring unknown cascade option `explode`"]);
    assert_eq!(catalog.diagnostics()[0].subject, "app.posts.fk_posts_users");
}

#[test]
fn configured_defaults() {
    let config = Config {
        default_cascade: Some(Cascade::All),
        default_fetch: Some(Fetch::Eager),
        ..Config::default()
    };

    let catalog = build_with(&config, "", "");
    let fk = assert_some!(catalog.foreign_key_by_name("fk_posts_users"));
    assert_eq!(fk.cascade_options(), [Cascade::All]);
    assert_eq!(fk.fetch_option(), Some(Fetch::Eager));

    // Directives replace the defaults
    let catalog = build_with(&config, "cascade: merge\nfetch: LAZY", "");
    let fk = assert_some!(catalog.foreign_key_by_name("fk_posts_users"));
    assert_eq!(fk.cascade_options(), [Cascade::Merge]);
    assert_eq!(fk.fetch_option(), Some(Fetch::Lazy));
}

#[test]
fn invalid_fetch_falls_back_to_the_default() {
    let config = Config {
        default_fetch: Some(Fetch::Eager),
        ..Config::default()
    };

    let catalog = build_with(&config, "fetch: sometimes", "");
    let fk = assert_some!(catalog.foreign_key_by_name("fk_posts_users"));

    assert_eq!(fk.fetch_option(), Some(Fetch::Eager));
    assert_eq!(
        messages(&catalog),
        ["ignoring invalid fetch mode `sometimes`; expected EAGER, LAZY, or EXTRA_LAZY"]
    );
}

#[test]
fn invalid_order_entries_are_skipped() {
    let catalog = build("order: name, rank sideways");
    let fk = assert_some!(catalog.foreign_key_by_name("fk_posts_users"));

    assert_eq!(fk.order_option().len(), 1);
    assert_eq!(messages(&catalog).len(), 1);
    assert!(messages(&catalog)[0].contains("rank sideways"));
}

#[test]
fn malformed_flag_is_reported() {
    let catalog = build("owningSide: perhaps");
    let fk = assert_some!(catalog.foreign_key_by_name("fk_posts_users"));

    assert!(!fk.options.owning_side);
    assert_eq!(
        messages(&catalog),
        ["ignoring `owningSide`; expected a boolean, got `perhaps`"]
    );
}

#[test]
fn unclosed_block_is_reported() {
    let catalog = build("{d:cascade}persist");
    let fk = assert_some!(catalog.foreign_key_by_name("fk_posts_users"));

    assert!(fk.cascade_options().is_empty());
    assert_eq!(messages(&catalog), ["unclosed directive `{d:cascade}`"]);
}

#[test]
fn table_directives() {
    let comment = "Registered users.\n\
         modelName: Member\n\
         bundleNamespace: Acme\\ShopBundle\n\
         {d:actAs}timestampable{/d:actAs}\n\
         {d:lifecycleCallbacks}\n\
         prePersist: stamp, validate\n\
         postLoad: hydrate\n\
         {/d:lifecycleCallbacks}\n\
         {d:externalRelations}\n\
         avatar:Media\\Image\n\
         tags:Tagging\\Tag:ManyToMany\n\
         {/d:externalRelations}";

    let catalog = build_with(&Config::default(), "", comment);
    assert!(catalog.diagnostics().is_empty(), "{:?}", catalog.diagnostics());

    let users = assert_some!(catalog.table_by_name("users"));
    assert_eq!(users.model_name, "Member");

    let options = &users.options;
    assert_eq!(options.bundle_namespace.as_deref(), Some("Acme\\ShopBundle"));
    assert_eq!(options.act_as.as_deref(), Some("timestampable"));
    assert_none!(&options.package);
    assert_eq!(
        options.lifecycle_callbacks,
        [
            LifecycleCallback {
                event: "prePersist".to_string(),
                methods: vec!["stamp".to_string(), "validate".to_string()],
            },
            LifecycleCallback {
                event: "postLoad".to_string(),
                methods: vec!["hydrate".to_string()],
            },
        ]
    );
    assert_eq!(
        options.external_relations,
        [
            ExternalRelation {
                name: "avatar".to_string(),
                target: "Media\\Image".to_string(),
                kind: RelationKind::ManyToOne,
            },
            ExternalRelation {
                name: "tags".to_string(),
                target: "Tagging\\Tag".to_string(),
                kind: RelationKind::ManyToMany,
            },
        ]
    );

    // The inverse relation on posts is named after the overridden model name
    let posts = assert_some!(catalog.table_by_name("posts"));
    assert_eq!(posts.relations()[0].name, "member");
}

#[test]
fn malformed_table_directives_are_reported() {
    let comment = "{d:lifecycleCallbacks}onSave: persist{/d:lifecycleCallbacks}\n\
                   {d:externalRelations}broken{/d:externalRelations}";

    let catalog = build_with(&Config::default(), "", comment);
    let users = assert_some!(catalog.table_by_name("users"));

    assert!(users.options.lifecycle_callbacks.is_empty());
    assert!(users.options.external_relations.is_empty());
    assert_eq!(
        messages(&catalog),
        [
            "unknown lifecycle event `onSave`",
            "malformed external relation `broken`; expected `name:Target[:Kind]`",
        ]
    );
}
