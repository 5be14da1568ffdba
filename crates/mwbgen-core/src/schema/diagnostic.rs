use std::fmt;

/// A recoverable problem found while building a catalog.
///
/// Diagnostics never stop the build. The directive or value that caused them
/// is ignored and processing continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The table, column, or foreign key the problem was found on, e.g.
    /// `shop.users` or `shop.orders.fk_orders_users`.
    pub subject: String,

    pub message: String,
}

/// Accumulates diagnostics during the build and mirrors them to `tracing`.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub(crate) fn warn(&mut self, subject: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(subject, "{message}");

        self.items.push(Diagnostic {
            subject: subject.to_string(),
            message,
        });
    }

    pub(crate) fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject, self.message)
    }
}
