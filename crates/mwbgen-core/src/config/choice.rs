use crate::{Error, Result};

/// An option restricted to a fixed vocabulary.
///
/// Values are matched case-insensitively against [`Choice::CHOICES`]; when no
/// name matches exactly, a prefix shared by exactly one choice selects it.
pub trait Choice: Copy + Sized + 'static {
    /// Name used when reporting an invalid value.
    const OPTION: &'static str;

    /// Accepted spellings. The first spelling of each value is its canonical
    /// name.
    const CHOICES: &'static [(&'static str, Self)];

    /// Parses `value`, failing with an invalid configuration error.
    fn parse_choice(value: &str) -> Result<Self> {
        match_choice(value).ok_or_else(|| {
            Error::invalid_config(format!(
                "`{}` must be one of {}; got `{}`",
                Self::OPTION,
                Self::names().join(", "),
                value
            ))
        })
    }

    /// Canonical spellings of every value, in declaration order.
    fn names() -> Vec<&'static str> {
        let mut names: Vec<&'static str> = vec![];
        for (i, (name, _)) in Self::CHOICES.iter().enumerate() {
            let dup = Self::CHOICES[..i]
                .iter()
                .any(|(_, seen)| discriminant_eq(seen, &Self::CHOICES[i].1));
            if !dup {
                names.push(name);
            }
        }
        names
    }
}

/// Matches `value` against `T::CHOICES` without producing an error.
pub fn match_choice<T: Choice>(value: &str) -> Option<T> {
    let needle = normalize(value);
    if needle.is_empty() {
        return None;
    }

    if let Some((_, choice)) = T::CHOICES
        .iter()
        .find(|(name, _)| normalize(name) == needle)
    {
        return Some(*choice);
    }

    let mut candidates = T::CHOICES
        .iter()
        .filter(|(name, _)| normalize(name).starts_with(&needle))
        .map(|(_, choice)| *choice);

    let first = candidates.next()?;
    if candidates.all(|other| discriminant_eq(&other, &first)) {
        Some(first)
    } else {
        None
    }
}

/// Parses an optional choice: an empty value means "unset".
pub fn parse_optional<T: Choice>(value: &str) -> Result<Option<T>> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        T::parse_choice(value).map(Some)
    }
}

/// Uppercases and collapses separators so `set_null`, `Set Null`, and
/// `SET NULL` compare equal.
fn normalize(value: &str) -> String {
    value
        .trim()
        .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_uppercase)
        .collect::<Vec<_>>()
        .join(" ")
}

fn discriminant_eq<T>(a: &T, b: &T) -> bool {
    core::mem::discriminant(a) == core::mem::discriminant(b)
}

/// Implements `serde::Deserialize` for a [`Choice`] by parsing a string.
macro_rules! impl_deserialize_choice {
    ( $($ty:ty),+ $(,)? ) => {
        $(
            impl<'de> serde::Deserialize<'de> for $ty {
                fn deserialize<D: serde::Deserializer<'de>>(
                    deserializer: D,
                ) -> core::result::Result<Self, D::Error> {
                    let value = <String as serde::Deserialize>::deserialize(deserializer)?;
                    <$ty as $crate::config::Choice>::parse_choice(&value)
                        .map_err(serde::de::Error::custom)
                }
            }
        )+
    };
}

pub(crate) use impl_deserialize_choice;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Mode {
        Eager,
        Lazy,
        ExtraLazy,
    }

    impl Choice for Mode {
        const OPTION: &'static str = "mode";
        const CHOICES: &'static [(&'static str, Self)] = &[
            ("EAGER", Mode::Eager),
            ("LAZY", Mode::Lazy),
            ("EXTRA_LAZY", Mode::ExtraLazy),
        ];
    }

    #[test]
    fn exact_match_is_case_insensitive() {
        assert_eq!(match_choice::<Mode>("lazy"), Some(Mode::Lazy));
        assert_eq!(match_choice::<Mode>("Extra Lazy"), Some(Mode::ExtraLazy));
        assert_eq!(match_choice::<Mode>("extra-lazy"), Some(Mode::ExtraLazy));
    }

    #[test]
    fn unique_prefix_matches() {
        assert_eq!(match_choice::<Mode>("ea"), Some(Mode::Eager));
        assert_eq!(match_choice::<Mode>("ex"), Some(Mode::ExtraLazy));
    }

    #[test]
    fn unknown_value_lists_choices() {
        let err = Mode::parse_choice("sometimes").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid configuration: `mode` must be one of EAGER, LAZY, EXTRA_LAZY; got `sometimes`"
        );
    }

    #[test]
    fn empty_optional_is_unset() {
        assert_eq!(parse_optional::<Mode>("  ").unwrap(), None);
    }
}
