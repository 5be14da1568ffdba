use super::{Catalog, Cascade, Fetch, ForeignKey, ForeignKeyId, OrderBy, Table, TableId};
use crate::config::{match_choice, Choice};

use std::fmt;

/// Cardinality of an association, seen from the table holding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

/// A classified association between two tables.
///
/// Relations are computed once, when the catalog is built, from both the
/// table's own foreign keys and the foreign keys referencing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub kind: RelationKind,

    /// Variable name for the relation accessor, e.g. `user` or `comments`.
    pub name: String,

    /// The table holding the relation.
    pub table: TableId,

    /// The table on the other end. For many-to-many relations this is the
    /// far side of the junction, not the junction itself.
    pub target: TableId,

    /// The foreign key the relation was derived from. For many-to-many
    /// relations, the junction's foreign key referencing [`Relation::table`].
    pub foreign_key: ForeignKeyId,

    /// The foreign key on the other side of the association, if any. For
    /// many-to-many relations, the junction's foreign key referencing
    /// [`Relation::target`].
    pub mapped_by: Option<ForeignKeyId>,

    /// The junction table of a many-to-many relation.
    pub junction: Option<TableId>,

    /// `true` if this side owns the association.
    pub owning_side: bool,

    /// `true` if the other side also carries a relation.
    pub bidirectional: bool,

    /// `true` when derived from a foreign key referencing [`Relation::table`]
    /// rather than one it holds.
    pub inverse: bool,

    /// Disambiguating suffix, set when a table owns several foreign keys to
    /// the same target.
    pub related: Option<String>,
}

impl RelationKind {
    /// `true` for kinds whose accessor holds a collection.
    pub fn is_collection(self) -> bool {
        matches!(self, RelationKind::OneToMany | RelationKind::ManyToMany)
    }

    /// The same association seen from the other side.
    pub fn inverse(self) -> RelationKind {
        match self {
            RelationKind::OneToOne => RelationKind::OneToOne,
            RelationKind::OneToMany => RelationKind::ManyToOne,
            RelationKind::ManyToOne => RelationKind::OneToMany,
            RelationKind::ManyToMany => RelationKind::ManyToMany,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RelationKind::OneToOne => "OneToOne",
            RelationKind::OneToMany => "OneToMany",
            RelationKind::ManyToOne => "ManyToOne",
            RelationKind::ManyToMany => "ManyToMany",
        }
    }

    pub(crate) fn from_token(token: &str) -> Option<RelationKind> {
        match_choice(token)
    }
}

impl Choice for RelationKind {
    const OPTION: &'static str = "relation kind";
    const CHOICES: &'static [(&'static str, Self)] = &[
        ("OneToOne", RelationKind::OneToOne),
        ("OneToMany", RelationKind::OneToMany),
        ("ManyToOne", RelationKind::ManyToOne),
        ("ManyToMany", RelationKind::ManyToMany),
        ("one to one", RelationKind::OneToOne),
        ("one to many", RelationKind::OneToMany),
        ("many to one", RelationKind::ManyToOne),
        ("many to many", RelationKind::ManyToMany),
    ];
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Relation {
    pub fn table<'a>(&self, catalog: &'a Catalog) -> &'a Table {
        catalog.table(self.table)
    }

    pub fn target<'a>(&self, catalog: &'a Catalog) -> &'a Table {
        catalog.table(self.target)
    }

    pub fn foreign_key<'a>(&self, catalog: &'a Catalog) -> &'a ForeignKey {
        catalog.foreign_key(self.foreign_key)
    }

    pub fn mapped_by<'a>(&self, catalog: &'a Catalog) -> Option<&'a ForeignKey> {
        self.mapped_by.map(|id| catalog.foreign_key(id))
    }

    pub fn junction<'a>(&self, catalog: &'a Catalog) -> Option<&'a Table> {
        self.junction.map(|id| catalog.table(id))
    }

    /// The relation on the other side of the association, if it is
    /// bidirectional.
    pub fn counterpart<'a>(&self, catalog: &'a Catalog) -> Option<&'a Relation> {
        let (foreign_key, inverse) = match self.mapped_by {
            Some(mapped) => (mapped, false),
            None => (self.foreign_key, !self.inverse),
        };

        self.target(catalog)
            .relations()
            .iter()
            .find(|other| other.foreign_key == foreign_key && other.inverse == inverse)
    }

    pub fn is_owning_side(&self) -> bool {
        self.owning_side
    }

    pub fn is_many_to_many(&self) -> bool {
        self.kind == RelationKind::ManyToMany
    }

    /// `true` when this side holds the foreign key columns.
    pub fn is_outbound(&self) -> bool {
        self.junction.is_none() && !self.inverse
    }

    pub fn cascade_options<'a>(&self, catalog: &'a Catalog) -> &'a [Cascade] {
        self.foreign_key(catalog).cascade_options()
    }

    pub fn fetch_option(&self, catalog: &Catalog) -> Option<Fetch> {
        self.foreign_key(catalog).fetch_option()
    }

    pub fn order_option<'a>(&self, catalog: &'a Catalog) -> &'a [OrderBy] {
        self.foreign_key(catalog).order_option()
    }
}
