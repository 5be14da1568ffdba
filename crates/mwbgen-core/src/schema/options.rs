use super::comment::Directives;
use super::diagnostic::Diagnostics;
use super::RelationKind;
use crate::config::{impl_deserialize_choice, Choice};
use crate::Config;

use std::fmt;

/// Operations propagated from an entity to its related entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cascade {
    Persist,
    Remove,
    Merge,
    Detach,
    All,
    Refresh,
}

/// How related entities are loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fetch {
    Eager,
    Lazy,
    ExtraLazy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Asc,
    Desc,
}

/// One entry of a relation's `order` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: Direction,
}

/// A lifecycle event and the methods to call on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleCallback {
    pub event: String,
    pub methods: Vec<String>,
}

/// A relation to an entity defined outside the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalRelation {
    /// Name of the relation property.
    pub name: String,

    /// Fully qualified name of the target entity.
    pub target: String,

    pub kind: RelationKind,
}

/// Typed directives found in a table comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableOptions {
    /// Overrides the model name derived from the table name.
    pub model_name: Option<String>,

    pub bundle_namespace: Option<String>,

    pub package: Option<String>,

    /// Explicitly marks (or unmarks) the table as a many-to-many junction.
    pub many_to_many: Option<bool>,

    /// Behaviors to attach to the model, passed through verbatim.
    pub act_as: Option<String>,

    pub lifecycle_callbacks: Vec<LifecycleCallback>,

    pub external_relations: Vec<ExternalRelation>,
}

/// Typed directives found in a foreign key comment, with configuration
/// defaults applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationOptions {
    /// The foreign key was explicitly marked as the owning side.
    pub owning_side: bool,

    /// Only the owning table gets a relation; the inverse side is omitted.
    pub unidirectional: bool,

    /// Name for the inverse side of the relation.
    pub foreign_alias: Option<String>,

    pub cascade: Vec<Cascade>,

    pub fetch: Option<Fetch>,

    pub order: Vec<OrderBy>,
}

/// Events a lifecycle callback may be attached to.
const LIFECYCLE_EVENTS: &[&str] = &[
    "prePersist",
    "postPersist",
    "preUpdate",
    "postUpdate",
    "preRemove",
    "postRemove",
    "postLoad",
    "preFlush",
];

/// Parses a comma separated cascade list.
///
/// Tokens are matched case-insensitively against the allowed set; unknown
/// tokens are dropped. An empty `value` yields `default`, if any. A value
/// holding only unknown tokens yields an empty list.
pub fn cascade_option(value: &str, default: Option<Cascade>) -> Vec<Cascade> {
    split_cascade(value, default).0
}

fn split_cascade(value: &str, default: Option<Cascade>) -> (Vec<Cascade>, Vec<&str>) {
    if value.trim().is_empty() {
        return (default.into_iter().collect(), vec![]);
    }

    let mut cascade = vec![];
    let mut unknown = vec![];

    for token in value.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match Cascade::from_token(token) {
            Some(c) if !cascade.contains(&c) => cascade.push(c),
            Some(_) => {}
            None => unknown.push(token),
        }
    }

    (cascade, unknown)
}

/// Parses a fetch mode. Only exact names are accepted (case-insensitive,
/// `-` and spaces read as `_`).
pub fn fetch_option(value: &str) -> Option<Fetch> {
    let value = value.trim().to_ascii_uppercase().replace(|c: char| c == '-' || c == ' ', "_");

    match value.as_str() {
        "EAGER" => Some(Fetch::Eager),
        "LAZY" => Some(Fetch::Lazy),
        "EXTRA_LAZY" => Some(Fetch::ExtraLazy),
        _ => None,
    }
}

/// Parses `column [ASC|DESC]` entries separated by commas or newlines.
///
/// Entries with an invalid direction are skipped and reported in the second
/// element.
pub fn order_option(value: &str) -> (Vec<OrderBy>, Vec<String>) {
    let mut order = vec![];
    let mut errors = vec![];

    for entry in value
        .split(|c: char| c == ',' || c == '\n')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
    {
        let mut parts = entry.split_whitespace();
        let Some(column) = parts.next() else {
            continue;
        };

        let direction = match (parts.next(), parts.next()) {
            (None, _) => Some(Direction::Asc),
            (Some(dir), None) => Direction::from_token(dir),
            (Some(_), Some(_)) => None,
        };

        match direction {
            Some(direction) => order.push(OrderBy {
                column: column.to_string(),
                direction,
            }),
            None => errors.push(format!(
                "invalid order entry `{entry}`; expected `column [ASC|DESC]`"
            )),
        }
    }

    (order, errors)
}

impl Cascade {
    pub fn as_str(self) -> &'static str {
        match self {
            Cascade::Persist => "persist",
            Cascade::Remove => "remove",
            Cascade::Merge => "merge",
            Cascade::Detach => "detach",
            Cascade::All => "all",
            Cascade::Refresh => "refresh",
        }
    }

    fn from_token(token: &str) -> Option<Cascade> {
        Cascade::CHOICES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(token))
            .map(|(_, cascade)| *cascade)
    }
}

impl Fetch {
    pub fn as_str(self) -> &'static str {
        match self {
            Fetch::Eager => "EAGER",
            Fetch::Lazy => "LAZY",
            Fetch::ExtraLazy => "EXTRA_LAZY",
        }
    }
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }

    fn from_token(token: &str) -> Option<Direction> {
        if token.eq_ignore_ascii_case("asc") {
            Some(Direction::Asc)
        } else if token.eq_ignore_ascii_case("desc") {
            Some(Direction::Desc)
        } else {
            None
        }
    }
}

impl Choice for Cascade {
    const OPTION: &'static str = "cascade";
    const CHOICES: &'static [(&'static str, Self)] = &[
        ("persist", Cascade::Persist),
        ("remove", Cascade::Remove),
        ("merge", Cascade::Merge),
        ("detach", Cascade::Detach),
        ("all", Cascade::All),
        ("refresh", Cascade::Refresh),
    ];
}

impl Choice for Fetch {
    const OPTION: &'static str = "fetch";
    const CHOICES: &'static [(&'static str, Self)] = &[
        ("EAGER", Fetch::Eager),
        ("LAZY", Fetch::Lazy),
        ("EXTRA_LAZY", Fetch::ExtraLazy),
    ];
}

impl_deserialize_choice!(Cascade, Fetch);

impl fmt::Display for Cascade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Fetch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TableOptions {
    pub(crate) fn parse(
        comment: &str,
        diagnostics: &mut Diagnostics,
        subject: &str,
    ) -> TableOptions {
        let d = Directives::parse(comment);
        report_malformed(&d, diagnostics, subject);

        TableOptions {
            model_name: d.text("modelName").map(str::to_string),
            bundle_namespace: d.text("bundleNamespace").map(str::to_string),
            package: d.text("package").map(str::to_string),
            many_to_many: flag(&d, "m2m", diagnostics, subject),
            act_as: d.text("actAs").map(str::to_string),
            lifecycle_callbacks: d
                .get("lifecycleCallbacks")
                .map(|value| lifecycle_callbacks(value, diagnostics, subject))
                .unwrap_or_default(),
            external_relations: d
                .get("externalRelations")
                .map(|value| external_relations(value, diagnostics, subject))
                .unwrap_or_default(),
        }
    }
}

impl RelationOptions {
    pub(crate) fn parse(
        comment: &str,
        config: &Config,
        diagnostics: &mut Diagnostics,
        subject: &str,
    ) -> RelationOptions {
        let d = Directives::parse(comment);
        report_malformed(&d, diagnostics, subject);

        let (cascade, unknown) =
            split_cascade(d.get("cascade").unwrap_or(""), config.default_cascade);
        for token in unknown {
            diagnostics.warn(subject, format!("ignoring unknown cascade option `{token}`"));
        }

        let fetch = match d.text("fetch") {
            Some(value) => fetch_option(value).or_else(|| {
                diagnostics.warn(
                    subject,
                    format!(
                        "ignoring invalid fetch mode `{value}`; expected EAGER, LAZY, or EXTRA_LAZY"
                    ),
                );
                config.default_fetch
            }),
            None => config.default_fetch,
        };

        let (order, errors) = order_option(d.get("order").unwrap_or(""));
        for message in errors {
            diagnostics.warn(subject, message);
        }

        RelationOptions {
            owning_side: flag(&d, "owningSide", diagnostics, subject).unwrap_or(false),
            unidirectional: flag(&d, "unidirectional", diagnostics, subject).unwrap_or(false),
            foreign_alias: d.text("foreignAlias").map(str::to_string),
            cascade,
            fetch,
            order,
        }
    }
}

fn report_malformed(d: &Directives, diagnostics: &mut Diagnostics, subject: &str) {
    for message in &d.malformed {
        diagnostics.warn(subject, message.clone());
    }
}

fn flag(d: &Directives, key: &str, diagnostics: &mut Diagnostics, subject: &str) -> Option<bool> {
    match d.flag(key)? {
        Ok(value) => Some(value),
        Err(value) => {
            diagnostics.warn(
                subject,
                format!("ignoring `{key}`; expected a boolean, got `{value}`"),
            );
            None
        }
    }
}

fn lifecycle_callbacks(
    value: &str,
    diagnostics: &mut Diagnostics,
    subject: &str,
) -> Vec<LifecycleCallback> {
    let mut callbacks: Vec<LifecycleCallback> = vec![];

    for line in value.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let Some((event, methods)) = line.split_once(':') else {
            diagnostics.warn(
                subject,
                format!("malformed lifecycle callback `{line}`; expected `event: method, ...`"),
            );
            continue;
        };

        let Some(event) = LIFECYCLE_EVENTS
            .iter()
            .find(|known| known.eq_ignore_ascii_case(event.trim()))
        else {
            diagnostics.warn(subject, format!("unknown lifecycle event `{}`", event.trim()));
            continue;
        };

        let methods: Vec<String> = methods
            .split(',')
            .map(str::trim)
            .filter(|method| !method.is_empty())
            .map(str::to_string)
            .collect();

        if methods.is_empty() {
            diagnostics.warn(subject, format!("lifecycle event `{event}` lists no methods"));
            continue;
        }

        match callbacks.iter_mut().find(|callback| callback.event == *event) {
            Some(callback) => callback.methods.extend(methods),
            None => callbacks.push(LifecycleCallback {
                event: event.to_string(),
                methods,
            }),
        }
    }

    callbacks
}

fn external_relations(
    value: &str,
    diagnostics: &mut Diagnostics,
    subject: &str,
) -> Vec<ExternalRelation> {
    let mut relations = vec![];

    for line in value.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let parts: Vec<&str> = line.split(':').map(str::trim).collect();

        let (name, target, kind) = match parts.as_slice() {
            [name, target] => (*name, *target, Some(RelationKind::ManyToOne)),
            [name, target, kind] => (*name, *target, RelationKind::from_token(kind)),
            _ => ("", "", None),
        };

        match kind {
            Some(kind) if !name.is_empty() && !target.is_empty() => {
                relations.push(ExternalRelation {
                    name: name.to_string(),
                    target: target.to_string(),
                    kind,
                })
            }
            _ => diagnostics.warn(
                subject,
                format!("malformed external relation `{line}`; expected `name:Target[:Kind]`"),
            ),
        }
    }

    relations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cascade_filters_and_dedupes() {
        assert_eq!(
            cascade_option("persist, bogus, REMOVE, persist", None),
            vec![Cascade::Persist, Cascade::Remove]
        );
    }

    #[test]
    fn cascade_only_unknown_is_empty() {
        assert_eq!(cascade_option("bogus", Some(Cascade::All)), Vec::<Cascade>::new());
    }

    #[test]
    fn order_entries() {
        let (order, errors) = order_option("name, created_at DESC\nid asc, rank sideways");
        assert_eq!(
            order,
            vec![
                OrderBy { column: "name".into(), direction: Direction::Asc },
                OrderBy { column: "created_at".into(), direction: Direction::Desc },
                OrderBy { column: "id".into(), direction: Direction::Asc },
            ]
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn lifecycle_lines() {
        let mut diagnostics = Diagnostics::default();
        let callbacks = lifecycle_callbacks(
            "prePersist: stamp, validate\nbogus\npreflush: flush",
            &mut diagnostics,
            "t",
        );

        assert_eq!(callbacks.len(), 2);
        assert_eq!(callbacks[0].methods, vec!["stamp", "validate"]);
        assert_eq!(callbacks[1].event, "preFlush");
        assert_eq!(diagnostics.into_vec().len(), 1);
    }
}
