use super::Error;

/// Error when a name template still contains a `%placeholder%` after all
/// known variables were substituted.
#[derive(Debug)]
pub(super) struct UnresolvedPlaceholder {
    template: Box<str>,
    token: Box<str>,
}

impl std::error::Error for UnresolvedPlaceholder {}

impl core::fmt::Display for UnresolvedPlaceholder {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unresolved placeholder `%{}%` in template `{}`; perhaps a misspelled name?",
            self.token, self.template
        )
    }
}

impl Error {
    /// Creates an unresolved placeholder error for `token` (without the
    /// surrounding `%`).
    pub fn unresolved_placeholder(template: impl Into<String>, token: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnresolvedPlaceholder(
            UnresolvedPlaceholder {
                template: template.into().into(),
                token: token.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is (or was caused by) an unresolved placeholder error.
    pub fn is_unresolved_placeholder(&self) -> bool {
        self.any_in_chain(|kind| matches!(kind, super::ErrorKind::UnresolvedPlaceholder(_)))
    }
}
