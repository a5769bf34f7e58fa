//! Naming-convention transforms for field, relation and table names:
//! snake_case for storage names, camelCase for table identifiers, plural relation tables.

use crate::request::RequestedFieldSet;
use once_cell::sync::Lazy;
use regex::Regex;

/// Convert an identifier to snake_case.
/// e.g. "userId" -> "user_id", "CreatedAt" -> "created_at", "first name" -> "first_name".
/// Already-snake input is returned unchanged, so applying it twice is the same as once.
pub fn to_snake_case(s: &str) -> String {
    if s.chars().all(|c| c.is_lowercase()) {
        return s.to_string();
    }
    // Upper-case the first letter of every word and drop the whitespace between words.
    let mut joined = String::with_capacity(s.len());
    let mut word_start = true;
    for c in s.chars() {
        if c.is_whitespace() {
            word_start = true;
        } else if word_start {
            joined.extend(c.to_uppercase());
            word_start = false;
        } else {
            joined.push(c);
        }
    }
    let mut out = String::with_capacity(joined.len() + 4);
    for (i, c) in joined.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// Convert an identifier to camelCase. `_`, `-` and spaces separate words.
/// e.g. "blog_posts" -> "blogPosts", "BlogPosts" -> "blogPosts".
pub fn to_camel_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut capitalize_next = false;
    for c in s.chars() {
        if matches!(c, '_' | '-' | ' ') {
            capitalize_next = true;
        } else if capitalize_next {
            out.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            out.push(c);
        }
    }
    let mut chars = out.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

const UNCOUNTABLE: &[&str] = &[
    "audio", "bison", "cattle", "chassis", "compensation", "data", "deer", "education", "emoji",
    "equipment", "evidence", "feedback", "firmware", "fish", "furniture", "gold", "hardware",
    "information", "kin", "knowledge", "metadata", "money", "moose", "news", "offspring", "police",
    "recommended", "related", "rice", "series", "sheep", "software", "species", "swine", "traffic",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("child", "children"),
    ("criterion", "criteria"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("man", "men"),
    ("person", "people"),
    ("tooth", "teeth"),
    ("woman", "women"),
];

/// Ordered suffix rules; the first matching pattern wins.
static PLURAL_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)(quiz)$", "${1}zes"),
        (r"(?i)^(ox)$", "${1}en"),
        (r"(?i)([ml])ouse$", "${1}ice"),
        (r"(?i)(matr|vert|ind)(ix|ex)$", "${1}ices"),
        (r"(?i)(x|ch|ss|sh)$", "${1}es"),
        (r"(?i)([^aeiouy]|qu)y$", "${1}ies"),
        (r"(?i)(hive|gulf)$", "${1}s"),
        (r"(?i)(?:([^f])fe|([lr])f)$", "${1}${2}ves"),
        (r"(?i)sis$", "ses"),
        (r"(?i)([ti])a$", "${1}a"),
        (r"(?i)([ti])um$", "${1}a"),
        (r"(?i)(buffal|tomat|potat|her|ech)o$", "${1}oes"),
        (r"(?i)(bu)s$", "${1}ses"),
        (r"(?i)(alias|status|campus)$", "${1}es"),
        (r"(?i)(octop|vir)(us|i)$", "${1}i"),
        (r"(?i)^(ax|test)is$", "${1}es"),
        (r"(?i)s$", "s"),
        (r"$", "s"),
    ]
    .into_iter()
    .filter_map(|(pattern, replacement)| Regex::new(pattern).ok().map(|re| (re, replacement)))
    .collect()
});

/// Pluralize the last `_`-separated word of an identifier.
/// e.g. "author" -> "authors", "blog_category" -> "blog_categories", "person" -> "people".
pub fn to_plural(s: &str) -> String {
    let (prefix, word) = match s.rfind('_') {
        Some(i) => s.split_at(i + 1),
        None => ("", s),
    };
    if word.is_empty() {
        return s.to_string();
    }
    format!("{}{}", prefix, match_case(&pluralize_word(word), word))
}

fn pluralize_word(word: &str) -> String {
    let lower = word.to_lowercase();
    if UNCOUNTABLE.contains(&lower.as_str()) {
        return lower;
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
        return (*plural).to_string();
    }
    for (re, replacement) in PLURAL_RULES.iter() {
        if re.is_match(&lower) {
            return re.replace(&lower, *replacement).into_owned();
        }
    }
    lower
}

/// Carry the case of `original` over to `value`: ALL CAPS stays all caps, Capitalised stays capitalised.
fn match_case(value: &str, original: &str) -> String {
    let has_letters = original.chars().any(char::is_alphabetic);
    if has_letters && original.chars().filter(|c| c.is_alphabetic()).all(char::is_uppercase) {
        return value.to_uppercase();
    }
    let mut chars = value.chars();
    match (original.chars().next(), chars.next()) {
        (Some(o), Some(first)) if o.is_uppercase() => first.to_uppercase().chain(chars).collect(),
        _ => value.to_string(),
    }
}

/// Snake-case every requested field name in every table bucket. Table keys are untouched.
pub fn fields_to_snake_case(fields: &RequestedFieldSet) -> RequestedFieldSet {
    fields
        .iter()
        .map(|(table, names)| (table.clone(), names.iter().map(|n| to_snake_case(n)).collect()))
        .collect()
}
