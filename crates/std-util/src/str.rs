//! String casing and English noun inflection.

use heck::{ToLowerCamelCase, ToSnakeCase, ToShoutySnakeCase, ToUpperCamelCase};

pub fn snake_case(src: &str) -> String {
    src.to_snake_case()
}

pub fn camel_case(src: &str) -> String {
    src.to_lower_camel_case()
}

pub fn upper_camel_case(src: &str) -> String {
    src.to_upper_camel_case()
}

pub fn upper_snake_case(src: &str) -> String {
    src.to_shouty_snake_case()
}

/// Uppercase the first character, leaving the rest untouched.
pub fn ucfirst(src: &str) -> String {
    let mut chars = src.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercase the first character, leaving the rest untouched.
pub fn lcfirst(src: &str) -> String {
    let mut chars = src.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Irregular `(singular, plural)` pairs, consulted before any suffix rule.
///
/// Entries are lowercase. Uncountable nouns map to themselves.
const IRREGULAR: &[(&str, &str)] = &[
    ("status", "statuses"),
    ("cache", "caches"),
    ("bureau", "bureaus"),
    ("menu", "menus"),
    ("bus", "buses"),
    ("alias", "aliases"),
    ("campus", "campuses"),
    ("virus", "viruses"),
    ("census", "censuses"),
    ("bonus", "bonuses"),
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("foot", "feet"),
    ("tooth", "teeth"),
    ("ox", "oxen"),
    ("datum", "data"),
    ("medium", "media"),
    ("criterion", "criteria"),
    ("analysis", "analyses"),
    ("axis", "axes"),
    ("index", "indexes"),
    ("matrix", "matrices"),
    ("vertex", "vertices"),
    ("quiz", "quizzes"),
    ("photo", "photos"),
    ("video", "videos"),
    ("radio", "radios"),
    ("logo", "logos"),
    ("memo", "memos"),
    ("demo", "demos"),
    ("zoo", "zoos"),
    ("piano", "pianos"),
    ("portfolio", "portfolios"),
    ("studio", "studios"),
    ("scenario", "scenarios"),
    ("shoe", "shoes"),
    ("toe", "toes"),
    ("canoe", "canoes"),
    ("movie", "movies"),
    ("cookie", "cookies"),
    ("pie", "pies"),
    ("tie", "ties"),
    ("calorie", "calories"),
    ("rookie", "rookies"),
    ("zombie", "zombies"),
    ("niche", "niches"),
    ("cliche", "cliches"),
    ("avalanche", "avalanches"),
    ("headache", "headaches"),
    ("drive", "drives"),
    ("archive", "archives"),
    ("move", "moves"),
    ("curve", "curves"),
    ("valve", "valves"),
    ("glove", "gloves"),
    ("objective", "objectives"),
    ("directive", "directives"),
    ("detective", "detectives"),
    ("chef", "chefs"),
    ("chief", "chiefs"),
    ("roof", "roofs"),
    ("belief", "beliefs"),
    ("proof", "proofs"),
    ("day", "days"),
    ("key", "keys"),
    ("way", "ways"),
    ("boy", "boys"),
    ("toy", "toys"),
    ("guy", "guys"),
    ("survey", "surveys"),
    ("journey", "journeys"),
    ("monkey", "monkeys"),
    ("holiday", "holidays"),
    ("birthday", "birthdays"),
    ("attorney", "attorneys"),
    ("valley", "valleys"),
    ("alley", "alleys"),
    ("essay", "essays"),
    ("display", "displays"),
    ("delay", "delays"),
    ("array", "arrays"),
    ("gateway", "gateways"),
    ("relay", "relays"),
    ("tray", "trays"),
    ("play", "plays"),
    ("cactus", "cacti"),
    ("radius", "radii"),
    ("focus", "foci"),
    ("fungus", "fungi"),
    ("nucleus", "nuclei"),
    ("corpus", "corpora"),
    ("genus", "genera"),
    ("syllabus", "syllabuses"),
    ("nexus", "nexuses"),
    ("prospectus", "prospectuses"),
    ("apparatus", "apparatuses"),
    ("thesis", "theses"),
    ("crisis", "crises"),
    ("diagnosis", "diagnoses"),
    ("box", "boxes"),
    ("tax", "taxes"),
    ("fax", "faxes"),
    ("sheep", "sheep"),
    ("fish", "fish"),
    ("series", "series"),
    ("species", "species"),
    ("news", "news"),
    ("information", "information"),
    ("equipment", "equipment"),
    ("metadata", "metadata"),
];

/// Returns the plural form of `word`.
///
/// Irregular nouns are resolved through the exception dictionary first; a
/// word that is already a known plural is returned unchanged.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    if let Some(inflected) = inflect_irregular(word, |(singular, plural)| {
        (singular, plural).into()
    }) {
        return inflected;
    }

    let lower = word.to_ascii_lowercase();

    if ends_with_any(&lower, &["ch", "sh", "ss", "zz", "o"]) {
        append_suffix(word, "es")
    } else if lower.ends_with('y') {
        append_suffix(&word[..word.len() - 1], "ies")
    } else if lower.ends_with("ff") {
        append_suffix(word, "s")
    } else if lower.ends_with('f') {
        append_suffix(&word[..word.len() - 1], "ves")
    } else {
        append_suffix(word, "s")
    }
}

/// Returns the singular form of `word`.
///
/// Words not ending in a single `s` are returned unchanged.
pub fn singularize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    if let Some(inflected) = inflect_irregular(word, |(singular, plural)| {
        (plural, singular).into()
    }) {
        return inflected;
    }

    let lower = word.to_ascii_lowercase();

    if lower.len() < 2 || !lower.ends_with('s') || lower.ends_with("ss") {
        return word.to_string();
    }

    // Both strings end in an ASCII `s`
    let stem = &word[..word.len() - 1];
    let lower_stem = &lower[..lower.len() - 1];

    if ends_with_any(lower_stem, &["che", "she", "sse", "zze", "oe"]) {
        stem[..stem.len() - 1].to_string()
    } else if lower_stem.ends_with("ie") {
        append_suffix(&stem[..stem.len() - 2], "y")
    } else if lower_stem.ends_with("ve") {
        append_suffix(&stem[..stem.len() - 2], "f")
    } else {
        stem.to_string()
    }
}

/// Returns `true` if `word` is a plural noun.
pub fn is_plural(word: &str) -> bool {
    let (_, segment) = split_last_segment(word);
    let lower = segment.to_ascii_lowercase();

    for &(singular, plural) in IRREGULAR {
        if lower == plural {
            return true;
        }
        if lower == singular {
            return false;
        }
    }

    looks_plural(&word.to_ascii_lowercase())
}

fn looks_plural(lower: &str) -> bool {
    lower.len() > 1 && lower.ends_with('s') && !lower.ends_with("ss") && !lower.ends_with("us")
}

/// Appends `suffix`, upper-cased when the stem ends in an upper-case letter
/// so that `COUNTRY` becomes `COUNTRIES`.
fn append_suffix(stem: &str, suffix: &str) -> String {
    if stem.chars().next_back().is_some_and(char::is_uppercase) {
        format!("{stem}{}", suffix.to_ascii_uppercase())
    } else {
        format!("{stem}{suffix}")
    }
}

fn ends_with_any(word: &str, suffixes: &[&str]) -> bool {
    suffixes.iter().any(|suffix| word.ends_with(suffix))
}

/// Looks the trailing word segment up in the exception dictionary.
///
/// `direction` maps an entry to `(from, to)`: a segment equal to `from` is
/// replaced by `to`, a segment already equal to `to` is kept as is. A whole
/// word match returns the dictionary's own casing; a trailing segment keeps
/// the casing of its first character so that `UserStatus` becomes
/// `UserStatuses`.
fn inflect_irregular(
    word: &str,
    direction: impl Fn((&'static str, &'static str)) -> Mapping,
) -> Option<String> {
    let (prefix, segment) = split_last_segment(word);
    let lower = segment.to_ascii_lowercase();

    let target = IRREGULAR.iter().find_map(|&entry| {
        let Mapping { from, to } = direction(entry);
        (lower == from || lower == to).then_some(to)
    })?;

    if prefix.is_empty() {
        return Some(target.to_string());
    }

    let starts_upper = segment.chars().next().is_some_and(char::is_uppercase);
    let target = if starts_upper {
        ucfirst(target)
    } else {
        target.to_string()
    };

    Some(format!("{prefix}{target}"))
}

struct Mapping {
    from: &'static str,
    to: &'static str,
}

impl From<(&'static str, &'static str)> for Mapping {
    fn from((from, to): (&'static str, &'static str)) -> Self {
        Self { from, to }
    }
}

/// Splits `word` before its last segment, where segments are separated by
/// `_`, `-`, spaces, or a lower-to-upper case transition.
fn split_last_segment(word: &str) -> (&str, &str) {
    let mut split = 0;
    let mut prev: Option<char> = None;

    for (i, ch) in word.char_indices() {
        if matches!(ch, '_' | '-' | ' ') {
            split = i + ch.len_utf8();
        } else if ch.is_uppercase() && prev.is_some_and(char::is_lowercase) {
            split = i;
        }
        prev = Some(ch);
    }

    word.split_at(split)
}
