//! SELECT builder fed by resolved column lists.

/// Receives the column-selection clause. Calls are additive; earlier selections are kept.
pub trait QueryExecutor {
    fn select_columns(&mut self, columns: Vec<String>);
}

/// Quote identifier for PostgreSQL (safe: names come from the allow-list).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Quote every dot-separated segment: `posts.title` -> `"posts"."title"`.
fn quoted_path(s: &str) -> String {
    s.split('.').map(quoted).collect::<Vec<_>>().join(".")
}

/// Full qualified table name.
fn qualified_table(schema: Option<&str>, table: &str) -> String {
    match schema {
        Some(schema) => format!("{}.{}", quoted(schema), quoted(table)),
        None => quoted(table),
    }
}

/// SELECT over one table. Without selected columns it renders `SELECT *`.
#[derive(Clone, Debug, Default)]
pub struct SelectQuery {
    schema: Option<String>,
    table: String,
    columns: Vec<String>,
    limit: Option<u32>,
    offset: Option<u32>,
}

impl SelectQuery {
    pub fn new(table: impl Into<String>) -> Self {
        SelectQuery {
            table: table.into(),
            ..Default::default()
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn to_sql(&self) -> String {
        let cols = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.iter().map(|c| quoted_path(c)).collect::<Vec<_>>().join(", ")
        };
        let table = qualified_table(self.schema.as_deref(), &self.table);
        let limit_clause = self.limit.map(|n| format!(" LIMIT {}", n.min(1000))).unwrap_or_default();
        let offset_clause = self.offset.map(|n| format!(" OFFSET {}", n)).unwrap_or_default();
        format!("SELECT {} FROM {}{}{}", cols, table, limit_clause, offset_clause)
    }
}

impl QueryExecutor for SelectQuery {
    fn select_columns(&mut self, columns: Vec<String>) {
        for column in columns {
            if !self.columns.contains(&column) {
                self.columns.push(column);
            }
        }
    }
}
