use mwbgen_core::raw::*;
use mwbgen_core::schema::RelationKind;
use mwbgen_core::{Catalog, Config};
use pretty_assertions::assert_eq;
use std_util::prelude::*;

fn entity(name: &str) -> RawTable {
    RawTable::new(name)
        .column(RawColumn::new("id", "INT").primary().auto_increment())
        .primary_key(["id"])
}

/// `memberships(user_id, group_id)` with both columns as primary key.
fn memberships() -> RawTable {
    RawTable::new("memberships")
        .column(RawColumn::new("user_id", "INT").not_null())
        .column(RawColumn::new("group_id", "INT").not_null())
        .primary_key(["user_id", "group_id"])
        .foreign_key(RawForeignKey::new("fk_memberships_users", ["user_id"], "users", ["id"]))
        .foreign_key(RawForeignKey::new("fk_memberships_groups", ["group_id"], "groups", ["id"]))
}

fn build_with(config: &Config, tables: Vec<RawTable>) -> Catalog {
    let mut schema = RawSchema::new("app");
    for table in tables {
        schema = schema.table(table);
    }

    assert_ok!(Catalog::build(&RawCatalog::new().schema(schema), config))
}

fn build(tables: Vec<RawTable>) -> Catalog {
    build_with(&Config::default(), tables)
}

fn names(catalog: &Catalog, table: &str) -> Vec<String> {
    assert_some!(catalog.table_by_name(table))
        .relations()
        .iter()
        .map(|relation| relation.name.clone())
        .collect()
}

fn is_junction(catalog: &Catalog, table: &str) -> bool {
    assert_some!(catalog.table_by_name(table)).is_many_to_many()
}

#[test]
fn composite_key_of_two_references_is_a_junction() {
    let catalog = build(vec![entity("users"), entity("groups"), memberships()]);

    assert!(is_junction(&catalog, "memberships"));
    assert!(names(&catalog, "memberships").is_empty());
    assert_eq!(names(&catalog, "users"), ["groups"]);
    assert_eq!(names(&catalog, "groups"), ["users"]);

    let users = assert_some!(catalog.table_by_name("users"));
    let relation = &users.relations()[0];
    assert_eq!(relation.kind, RelationKind::ManyToMany);
    assert!(relation.is_owning_side());
    assert!(relation.bidirectional);
    assert_eq!(
        assert_some!(relation.junction(&catalog)).name,
        "memberships"
    );
    assert_eq!(relation.target(&catalog).name, "groups");
    assert_eq!(relation.foreign_key(&catalog).name, "fk_memberships_users");
    assert_eq!(assert_some!(relation.mapped_by(&catalog)).name, "fk_memberships_groups");

    let groups = assert_some!(catalog.table_by_name("groups"));
    let inverse = &groups.relations()[0];
    assert!(!inverse.is_owning_side());
    assert_eq!(assert_some!(relation.counterpart(&catalog)), inverse);
    assert_eq!(assert_some!(inverse.counterpart(&catalog)), relation);
}

#[test]
fn structural_detection_can_be_disabled() {
    let config = Config {
        enhance_many_to_many_detection: false,
        ..Config::default()
    };
    let catalog = build_with(&config, vec![entity("users"), entity("groups"), memberships()]);

    assert!(!is_junction(&catalog, "memberships"));
    assert_eq!(names(&catalog, "memberships"), ["user", "group"]);
    assert_eq!(names(&catalog, "users"), ["memberships"]);
    assert_eq!(names(&catalog, "groups"), ["memberships"]);
}

#[test]
fn directive_marks_a_junction() {
    let config = Config {
        enhance_many_to_many_detection: false,
        ..Config::default()
    };

    let links = RawTable::new("links")
        .comment("{d:m2m}true{/d:m2m}")
        .column(RawColumn::new("id", "INT").primary().auto_increment())
        .column(RawColumn::new("user_id", "INT").not_null())
        .column(RawColumn::new("group_id", "INT").not_null())
        .column(RawColumn::new("role", "VARCHAR").not_null())
        .primary_key(["id"])
        .foreign_key(RawForeignKey::new("fk_links_users", ["user_id"], "users", ["id"]))
        .foreign_key(RawForeignKey::new("fk_links_groups", ["group_id"], "groups", ["id"]));

    let catalog = build_with(&config, vec![entity("users"), entity("groups"), links]);

    assert!(is_junction(&catalog, "links"));
    assert!(assert_some!(catalog.table_by_name("links")).is_external());
    assert_eq!(names(&catalog, "users"), ["groups"]);
    assert!(catalog.diagnostics().is_empty());
}

#[test]
fn directive_unmarks_a_junction() {
    let catalog = build(vec![
        entity("users"),
        entity("groups"),
        memberships().comment("m2m: false"),
    ]);

    assert!(!is_junction(&catalog, "memberships"));
    assert_eq!(names(&catalog, "users"), ["memberships"]);
}

#[test]
fn directive_on_a_table_without_two_references_is_ignored() {
    let tags = RawTable::new("tags")
        .comment("m2m: true")
        .column(RawColumn::new("user_id", "INT").not_null())
        .primary_key(["user_id"])
        .foreign_key(RawForeignKey::new("fk_tags_users", ["user_id"], "users", ["id"]));

    let catalog = build(vec![entity("users"), tags]);

    assert!(!is_junction(&catalog, "tags"));

    let [diagnostic] = catalog.diagnostics() else {
        panic!("expected one diagnostic; got {:?}", catalog.diagnostics());
    };
    assert_eq!(diagnostic.subject, "app.tags");
    assert!(diagnostic.message.contains("m2m"));
}

#[test]
fn required_payload_column_prevents_detection() {
    let catalog = build(vec![
        entity("users"),
        entity("groups"),
        memberships().column(RawColumn::new("role", "VARCHAR").not_null()),
    ]);

    assert!(!is_junction(&catalog, "memberships"));
}

#[test]
fn optional_payload_columns_are_allowed() {
    let catalog = build(vec![
        entity("users"),
        entity("groups"),
        memberships()
            .column(RawColumn::new("role", "VARCHAR").not_null().default_value("'member'"))
            .column(RawColumn::new("note", "TEXT"))
            .column(RawColumn::new("seq", "INT").not_null().auto_increment()),
    ]);

    assert!(is_junction(&catalog, "memberships"));
}

#[test]
fn own_primary_key_prevents_detection() {
    let catalog = build(vec![
        entity("users"),
        entity("groups"),
        RawTable::new("memberships")
            .column(RawColumn::new("id", "INT").primary().auto_increment())
            .column(RawColumn::new("user_id", "INT").not_null())
            .column(RawColumn::new("group_id", "INT").not_null())
            .primary_key(["id"])
            .foreign_key(RawForeignKey::new("fk_memberships_users", ["user_id"], "users", ["id"]))
            .foreign_key(RawForeignKey::new(
                "fk_memberships_groups",
                ["group_id"],
                "groups",
                ["id"],
            )),
    ]);

    assert!(!is_junction(&catalog, "memberships"));
    assert_eq!(names(&catalog, "memberships"), ["user", "group"]);
}

#[test]
fn references_to_one_table_are_not_a_junction() {
    let friendships = RawTable::new("friendships")
        .column(RawColumn::new("user_id", "INT").not_null())
        .column(RawColumn::new("friend_id", "INT").not_null())
        .primary_key(["user_id", "friend_id"])
        .foreign_key(RawForeignKey::new("fk_friendships_user", ["user_id"], "users", ["id"]))
        .foreign_key(RawForeignKey::new("fk_friendships_friend", ["friend_id"], "users", ["id"]));

    let catalog = build(vec![entity("users"), friendships]);

    assert!(!is_junction(&catalog, "friendships"));
    assert_eq!(
        names(&catalog, "friendships"),
        ["userRelatedByUserId", "userRelatedByFriendId"]
    );
    assert_eq!(
        names(&catalog, "users"),
        ["friendshipRelatedByUserIds", "friendshipRelatedByFriendIds"]
    );
}

#[test]
fn unidirectional_junction_keeps_the_owning_side() {
    let junction = RawTable::new("memberships")
        .column(RawColumn::new("user_id", "INT").not_null())
        .column(RawColumn::new("group_id", "INT").not_null())
        .primary_key(["user_id", "group_id"])
        .foreign_key(RawForeignKey::new("fk_memberships_users", ["user_id"], "users", ["id"]))
        .foreign_key(
            RawForeignKey::new("fk_memberships_groups", ["group_id"], "groups", ["id"])
                .comment("unidirectional=true"),
        );

    let catalog = build(vec![entity("users"), entity("groups"), junction]);

    assert_eq!(names(&catalog, "users"), ["groups"]);
    assert!(names(&catalog, "groups").is_empty());

    let users = assert_some!(catalog.table_by_name("users"));
    let relation = &users.relations()[0];
    assert!(relation.is_owning_side());
    assert!(!relation.bidirectional);
    assert_none!(relation.counterpart(&catalog));
}

#[test]
fn owning_side_directive_on_a_junction_key() {
    let junction = RawTable::new("memberships")
        .column(RawColumn::new("user_id", "INT").not_null())
        .column(RawColumn::new("group_id", "INT").not_null())
        .primary_key(["user_id", "group_id"])
        .foreign_key(RawForeignKey::new("fk_memberships_users", ["user_id"], "users", ["id"]))
        .foreign_key(
            RawForeignKey::new("fk_memberships_groups", ["group_id"], "groups", ["id"])
                .comment("owningSide: true"),
        );

    let catalog = build(vec![entity("users"), entity("groups"), junction]);

    let users = assert_some!(catalog.table_by_name("users"));
    let groups = assert_some!(catalog.table_by_name("groups"));
    assert!(!users.relations()[0].is_owning_side());
    assert!(groups.relations()[0].is_owning_side());
}

#[test]
fn several_junctions_to_one_table_are_disambiguated() {
    let invitations = RawTable::new("invitations")
        .column(RawColumn::new("user_id", "INT").not_null())
        .column(RawColumn::new("group_id", "INT").not_null())
        .primary_key(["user_id", "group_id"])
        .foreign_key(RawForeignKey::new("fk_invitations_users", ["user_id"], "users", ["id"]))
        .foreign_key(RawForeignKey::new("fk_invitations_groups", ["group_id"], "groups", ["id"]));

    let catalog = build(vec![entity("users"), entity("groups"), memberships(), invitations]);

    assert_eq!(
        names(&catalog, "users"),
        ["groupViaMemberships", "groupViaInvitations"]
    );
    assert_eq!(
        names(&catalog, "groups"),
        ["userViaMemberships", "userViaInvitations"]
    );
    assert!(catalog.diagnostics().is_empty());
}
