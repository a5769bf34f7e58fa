//! Requested fields per table, as parsed from `fields` query parameters.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::sync::RwLock;

/// Query parameter carrying the field selection.
pub const FIELDS_PARAMETER: &str = "fields";

/// Bucket key for fields requested without a table (`fields=id,title`).
pub const BASE_TABLE_KEY: &str = "_";

const DEFAULT_ARRAY_VALUE_DELIMITER: &str = ",";

/// Process-wide delimiter for array-valued parameters. Set once at boot; read on every parse.
static ARRAY_VALUE_DELIMITER: Lazy<RwLock<String>> =
    Lazy::new(|| RwLock::new(DEFAULT_ARRAY_VALUE_DELIMITER.to_string()));

/// Set the delimiter used to split array-valued parameters. `None` or an empty string is a no-op.
pub fn set_array_value_delimiter(delimiter: Option<&str>) {
    let Some(delimiter) = delimiter.filter(|d| !d.is_empty()) else {
        return;
    };
    let mut guard = ARRAY_VALUE_DELIMITER
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = delimiter.to_string();
}

/// Current delimiter for array-valued parameters (default `,`).
pub fn array_value_delimiter() -> String {
    ARRAY_VALUE_DELIMITER
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

/// Ordered mapping table identifier -> requested field names, as supplied by the client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestedFieldSet {
    by_table: IndexMap<String, Vec<String>>,
}

impl RequestedFieldSet {
    pub fn new() -> Self {
        RequestedFieldSet {
            by_table: IndexMap::new(),
        }
    }

    /// Replace the bucket for `table`.
    pub fn insert(&mut self, table: impl Into<String>, fields: Vec<String>) {
        self.by_table.insert(table.into(), fields);
    }

    /// Append one field to the bucket for `table`, creating it if needed.
    pub fn push(&mut self, table: impl Into<String>, field: impl Into<String>) {
        self.by_table.entry(table.into()).or_default().push(field.into());
    }

    pub fn get(&self, table: &str) -> Option<&[String]> {
        self.by_table.get(table).map(Vec::as_slice)
    }

    pub fn contains_table(&self, table: &str) -> bool {
        self.by_table.contains_key(table)
    }

    pub fn is_empty(&self) -> bool {
        self.by_table.is_empty()
    }

    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.by_table.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.by_table.iter()
    }

    /// Fields requested for the base table: the unqualified bucket followed by the bucket keyed by
    /// `table`, without duplicates.
    pub fn base_fields(&self, table: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let buckets = [self.get(BASE_TABLE_KEY), self.get(table)];
        for name in buckets.into_iter().flatten().flatten() {
            if !out.contains(name) {
                out.push(name.clone());
            }
        }
        out
    }
}

impl FromIterator<(String, Vec<String>)> for RequestedFieldSet {
    fn from_iter<T: IntoIterator<Item = (String, Vec<String>)>>(iter: T) -> Self {
        RequestedFieldSet {
            by_table: iter.into_iter().collect(),
        }
    }
}

/// Source of the requested fields for the current request.
pub trait RequestFieldParser {
    /// Requested fields per table. Empty, never absent, when the request selects nothing.
    fn fields(&self) -> RequestedFieldSet;
}

impl RequestFieldParser for RequestedFieldSet {
    fn fields(&self) -> RequestedFieldSet {
        self.clone()
    }
}

/// Field selection parsed from query-string pairs.
///
/// - `fields=id,title` goes to the base bucket (`_`).
/// - `fields[authors]=name,email` goes to the `authors` bucket.
/// - `fields=author.name` (dotted, unkeyed) goes to the `author` bucket as `name`.
#[derive(Clone, Debug, Default)]
pub struct QueryStringFields {
    fields: RequestedFieldSet,
}

impl QueryStringFields {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let delimiter = array_value_delimiter();
        let mut fields = RequestedFieldSet::new();
        for (key, value) in pairs {
            let Some(table) = fields_key_table(key.as_ref()) else {
                continue;
            };
            for item in value.as_ref().split(delimiter.as_str()) {
                let item = item.trim();
                if item.is_empty() {
                    continue;
                }
                match table {
                    Some(table) => fields.push(table, item),
                    None => match item.rsplit_once('.') {
                        Some((table, field)) if !table.is_empty() && !field.is_empty() => {
                            fields.push(table, field)
                        }
                        _ => fields.push(BASE_TABLE_KEY, item),
                    },
                }
            }
        }
        QueryStringFields { fields }
    }
}

/// `fields` -> `Some(None)`, `fields[table]` -> `Some(Some(table))`, anything else -> `None`.
fn fields_key_table(key: &str) -> Option<Option<&str>> {
    let rest = key.strip_prefix(FIELDS_PARAMETER)?;
    if rest.is_empty() {
        return Some(None);
    }
    let table = rest.strip_prefix('[')?.strip_suffix(']')?.trim();
    if table.is_empty() {
        Some(None)
    } else {
        Some(Some(table))
    }
}

impl RequestFieldParser for QueryStringFields {
    fn fields(&self) -> RequestedFieldSet {
        self.fields.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_unkeyed_keyed_and_dotted_fields() {
        let parsed = QueryStringFields::from_pairs([
            ("fields", "id, title,author.name"),
            ("fields[comments]", "body,,created_at"),
            ("filter[name]", "ignored"),
            ("include", "author"),
        ])
        .fields();

        assert_eq!(parsed.get(BASE_TABLE_KEY), Some(&strings(&["id", "title"])[..]));
        assert_eq!(parsed.get("author"), Some(&strings(&["name"])[..]));
        assert_eq!(parsed.get("comments"), Some(&strings(&["body", "created_at"])[..]));
        assert!(!parsed.contains_table("filter"));
    }

    #[test]
    fn empty_request_yields_empty_set() {
        let parsed = QueryStringFields::from_pairs(Vec::<(String, String)>::new()).fields();
        assert!(parsed.is_empty());
        let parsed = QueryStringFields::from_pairs([("fields", "")]).fields();
        assert!(parsed.is_empty());
    }

    #[test]
    fn base_fields_merges_unqualified_and_table_bucket() {
        let mut fields = RequestedFieldSet::new();
        fields.insert(BASE_TABLE_KEY, strings(&["id", "title"]));
        fields.insert("posts", strings(&["title", "body"]));
        fields.insert("authors", strings(&["name"]));
        assert_eq!(fields.base_fields("posts"), strings(&["id", "title", "body"]));
        assert_eq!(fields.base_fields("comments"), strings(&["id", "title"]));
    }

    #[test]
    fn empty_delimiter_is_ignored() {
        set_array_value_delimiter(None);
        set_array_value_delimiter(Some(""));
        assert!(!array_value_delimiter().is_empty());
    }
}
