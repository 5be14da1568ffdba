use super::SchemaId;

/// A view. Views are carried through for formatters that list them but take
/// no part in relation resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub schema: SchemaId,

    pub name: String,

    pub comment: String,
}
