use super::{
    Catalog, Cascade, Column, ColumnId, Fetch, OrderBy, RelationKind, RelationOptions, Table,
    TableId,
};
use crate::config::{match_choice, Choice};

use std::fmt;

/// A directed edge from the table holding the key columns to the table they
/// reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    /// Catalog-wide ordinal, assigned in document order.
    pub id: ForeignKeyId,

    pub name: String,

    /// The table holding the key columns.
    pub owner: TableId,

    /// The referenced table.
    pub target: TableId,

    /// Local to foreign column pairs, in key order.
    pub columns: Vec<ForeignKeyColumn>,

    pub on_delete: Option<ReferentialAction>,

    pub on_update: Option<ReferentialAction>,

    /// Cardinality given explicitly by the source, if any.
    pub many: Option<bool>,

    pub comment: String,

    pub options: RelationOptions,

    /// Cardinality from the owner's point of view.
    pub kind: RelationKind,

    /// The foreign key on the other side: the reciprocal key of a one-to-one
    /// pair, or the sibling key of a junction table.
    pub mapped: Option<ForeignKeyId>,

    pub(crate) owning_side: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ForeignKeyColumn {
    /// Column in the owning table
    pub local: ColumnId,

    /// Column in the referenced table
    pub foreign: ColumnId,
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct ForeignKeyId(pub usize);

/// What the database does with referencing rows when the referenced row
/// changes. `NO ACTION` is represented by the absence of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferentialAction {
    Cascade,
    SetNull,
    Restrict,
    SetDefault,
}

impl ForeignKey {
    pub fn owner<'a>(&self, catalog: &'a Catalog) -> &'a Table {
        catalog.table(self.owner)
    }

    pub fn target<'a>(&self, catalog: &'a Catalog) -> &'a Table {
        catalog.table(self.target)
    }

    pub fn local_columns<'a>(
        &'a self,
        catalog: &'a Catalog,
    ) -> impl ExactSizeIterator<Item = &'a Column> + 'a {
        self.columns.iter().map(|pair| catalog.column(pair.local))
    }

    pub fn foreign_columns<'a>(
        &'a self,
        catalog: &'a Catalog,
    ) -> impl ExactSizeIterator<Item = &'a Column> + 'a {
        self.columns.iter().map(|pair| catalog.column(pair.foreign))
    }

    pub fn kind(&self) -> RelationKind {
        self.kind
    }

    pub fn mapped<'a>(&self, catalog: &'a Catalog) -> Option<&'a ForeignKey> {
        self.mapped.map(|id| catalog.foreign_key(id))
    }

    /// `true` if this key owns its association.
    ///
    /// A key without a counterpart always owns it. For reciprocal pairs, an
    /// `owningSide` directive on either key decides; otherwise the key
    /// declared first owns it.
    pub fn is_owning_side(&self) -> bool {
        self.owning_side
    }

    pub fn is_self_referencing(&self) -> bool {
        self.owner == self.target
    }

    pub fn is_unidirectional(&self) -> bool {
        self.options.unidirectional
    }

    pub fn foreign_alias(&self) -> Option<&str> {
        self.options.foreign_alias.as_deref()
    }

    pub fn delete_rule(&self) -> Option<ReferentialAction> {
        self.on_delete
    }

    pub fn update_rule(&self) -> Option<ReferentialAction> {
        self.on_update
    }

    /// Cascade operations, after applying the configured default.
    pub fn cascade_options(&self) -> &[Cascade] {
        &self.options.cascade
    }

    /// Fetch mode, after applying the configured default.
    pub fn fetch_option(&self) -> Option<Fetch> {
        self.options.fetch
    }

    pub fn order_option(&self) -> &[OrderBy] {
        &self.options.order
    }
}

impl ReferentialAction {
    /// Parses a rule as written in the source. `Ok(None)` means no action.
    ///
    /// Matching is case-insensitive, tolerates `_` for spaces, and accepts a
    /// unique prefix.
    pub fn from_rule(rule: &str) -> crate::Result<Option<ReferentialAction>> {
        let trimmed = rule.trim();
        if trimmed.is_empty() || match_choice::<NoAction>(trimmed).is_some() {
            return Ok(None);
        }

        ReferentialAction::parse_choice(trimmed).map(Some)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::SetDefault => "SET DEFAULT",
        }
    }
}

impl Choice for ReferentialAction {
    const OPTION: &'static str = "referential action";
    const CHOICES: &'static [(&'static str, Self)] = &[
        ("CASCADE", ReferentialAction::Cascade),
        ("SET NULL", ReferentialAction::SetNull),
        ("RESTRICT", ReferentialAction::Restrict),
        ("SET DEFAULT", ReferentialAction::SetDefault),
    ];
}

#[derive(Clone, Copy)]
struct NoAction;

impl Choice for NoAction {
    const OPTION: &'static str = "referential action";
    const CHOICES: &'static [(&'static str, Self)] = &[("NO ACTION", NoAction)];
}

impl fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for ForeignKeyId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ForeignKeyId({})", self.0)
    }
}
