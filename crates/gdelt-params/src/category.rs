//! Category parameters: code <-> label lookup tables plus selection options.

use gdelt_types::Selection;
use serde_json::Value;
use std::sync::Arc;

/// Label that selects every code when a parameter allows it.
pub const ALL_LABEL: &str = "All";

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("table {table}: missing column {column}")]
    MissingColumn { table: String, column: String },
    #[error("table {table}: malformed line {line}")]
    Malformed { table: String, line: usize },
}

/// Lookup table for one category, in source order. Each code keeps the first
/// label it was seen with; several codes may share a label.
#[derive(Debug, Clone, Default)]
pub struct CategoryTable {
    name: String,
    entries: Vec<(String, String)>,
}

impl CategoryTable {
    pub fn from_pairs<I, C, L>(name: &str, pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, L)>,
        C: Into<String>,
        L: Into<String>,
    {
        let mut table = Self {
            name: name.to_string(),
            entries: Vec::new(),
        };
        for (code, label) in pairs {
            table.push(code.into(), label.into());
        }
        table
    }

    fn push(&mut self, code: String, label: String) {
        if self.label(&code).is_none() {
            self.entries.push((code, label));
        }
    }

    /// Parse tab-separated content whose first line names the columns.
    pub fn from_tsv(
        name: &str,
        content: &str,
        code_column: &str,
        label_column: &str,
    ) -> Result<Self, TableError> {
        let mut lines = content.lines().enumerate();
        let header: Vec<&str> = match lines.next() {
            Some((_, h)) => h.split('\t').map(str::trim).collect(),
            None => {
                return Err(TableError::MissingColumn {
                    table: name.to_string(),
                    column: code_column.to_string(),
                })
            }
        };
        let column = |col: &str| {
            header
                .iter()
                .position(|h| *h == col)
                .ok_or_else(|| TableError::MissingColumn {
                    table: name.to_string(),
                    column: col.to_string(),
                })
        };
        let code_idx = column(code_column)?;
        let label_idx = column(label_column)?;
        let mut table = Self::from_pairs(name, std::iter::empty::<(String, String)>());
        for (i, line) in lines {
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            match (fields.get(code_idx), fields.get(label_idx)) {
                (Some(code), Some(label)) => {
                    table.push(code.trim().to_string(), label.trim().to_string())
                }
                _ => {
                    return Err(TableError::Malformed {
                        table: name.to_string(),
                        line: i + 1,
                    })
                }
            }
        }
        Ok(table)
    }

    /// Parse tab-separated `code<TAB>label` lines without a header.
    pub fn from_headerless_tsv(name: &str, content: &str) -> Result<Self, TableError> {
        let mut table = Self::from_pairs(name, std::iter::empty::<(String, String)>());
        for (i, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match line.split_once('\t') {
                Some((code, label)) => {
                    table.push(code.trim().to_string(), label.trim().to_string())
                }
                None => {
                    return Err(TableError::Malformed {
                        table: name.to_string(),
                        line: i + 1,
                    })
                }
            }
        }
        Ok(table)
    }

    /// Keep only entries whose code satisfies `keep`.
    pub fn retain_codes(mut self, keep: impl Fn(&str) -> bool) -> Self {
        self.entries.retain(|(code, _)| keep(code));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self, code: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, l)| l.as_str())
    }

    /// First code carrying `label`.
    pub fn code(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, l)| l == label)
            .map(|(c, _)| c.as_str())
    }

    /// Distinct labels, in table order.
    pub fn labels(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::with_capacity(self.entries.len());
        for (_, label) in &self.entries {
            if !out.contains(&label.as_str()) {
                out.push(label);
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What a category input accepts besides one known label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryOptions {
    pub allow_multiple: bool,
    pub allow_all: bool,
    pub allow_null: bool,
}

/// A category parameter: a shared table plus its options.
#[derive(Debug, Clone)]
pub struct CategoryParameter {
    table: Arc<CategoryTable>,
    options: CategoryOptions,
}

impl CategoryParameter {
    pub fn new(table: Arc<CategoryTable>) -> Self {
        Self {
            table,
            options: CategoryOptions::default(),
        }
    }

    pub fn allow_multiple(mut self) -> Self {
        self.options.allow_multiple = true;
        self
    }

    pub fn allow_all(mut self) -> Self {
        self.options.allow_all = true;
        self
    }

    pub fn allow_null(mut self) -> Self {
        self.options.allow_null = true;
        self
    }

    pub fn options(&self) -> CategoryOptions {
        self.options
    }

    pub fn table(&self) -> &CategoryTable {
        &self.table
    }

    fn raw_labels(&self, raw: &Value) -> Result<Vec<String>, &'static str> {
        let labels = match raw {
            Value::Null => Vec::new(),
            Value::String(s) if self.options.allow_multiple => s
                .split(';')
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from)
                .collect(),
            Value::String(s) => {
                let s = s.trim();
                if s.is_empty() {
                    Vec::new()
                } else {
                    vec![s.to_string()]
                }
            }
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match item.as_str().map(str::trim) {
                        Some("") => {}
                        Some(l) => out.push(l.to_string()),
                        None => return Err("Wrong value"),
                    }
                }
                out
            }
            _ => return Err("Wrong value"),
        };
        Ok(labels)
    }

    /// Resolve submitted labels into a selection of codes.
    pub fn parse(&self, raw: &Value) -> Result<Selection, &'static str> {
        let labels = self.raw_labels(raw)?;
        if labels.is_empty() {
            return if self.options.allow_null {
                Ok(Selection::None)
            } else {
                Err("Value required")
            };
        }
        if labels.len() > 1 && !self.options.allow_multiple {
            return Err("Only one value allowed");
        }
        if self.options.allow_all && labels.iter().any(|l| l == ALL_LABEL) {
            return Ok(Selection::All);
        }
        let mut codes: Vec<String> = Vec::with_capacity(labels.len());
        for label in &labels {
            let code = self.table.code(label).ok_or("Wrong value")?;
            if !codes.iter().any(|c| c == code) {
                codes.push(code.to_string());
            }
        }
        Ok(Selection::Codes(codes))
    }

    /// Format a selection of codes back into the labels a form shows.
    pub fn display(&self, selection: &Selection) -> Option<String> {
        match selection {
            Selection::All => Some(ALL_LABEL.to_string()),
            Selection::None => Some(String::new()),
            Selection::Codes(codes) => {
                let labels: Option<Vec<&str>> =
                    codes.iter().map(|c| self.table.label(c)).collect();
                labels.map(|l| l.join(";"))
            }
        }
    }

    /// Labels a client may offer, with `All` first when allowed.
    pub fn choices(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.table.len() + 1);
        if self.options.allow_all {
            out.push(ALL_LABEL.to_string());
        }
        out.extend(self.table.labels().into_iter().map(String::from));
        out
    }
}
