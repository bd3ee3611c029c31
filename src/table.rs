//! Column store for the participant table.
//!
//! [`RawTable`] is what the loader produces: row-major text cells. The cleaner
//! turns it into a [`CleanTable`], which is column-major and typed, and which
//! nothing mutates after cleaning.

use std::collections::HashMap;

/// Table as read from disk. Every cell is still text.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// A single typed column. Missing cells are `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Text(Vec<Option<String>>),
    Number(Vec<Option<f64>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Text(v) => v.len(),
            Column::Number(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_text(&self) -> Option<&[Option<String>]> {
        match self {
            Column::Text(v) => Some(v),
            Column::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<&[Option<f64>]> {
        match self {
            Column::Number(v) => Some(v),
            Column::Text(_) => None,
        }
    }

    /// Count of cells holding a value.
    pub fn non_missing(&self) -> usize {
        match self {
            Column::Text(v) => v.iter().filter(|c| c.is_some()).count(),
            Column::Number(v) => v.iter().filter(|c| c.is_some()).count(),
        }
    }

    fn retain(&mut self, keep: &[bool]) {
        fn filter<T>(cells: &mut Vec<T>, keep: &[bool]) {
            let mut i = 0;
            cells.retain(|_| {
                let k = keep[i];
                i += 1;
                k
            });
        }

        match self {
            Column::Text(v) => filter(v, keep),
            Column::Number(v) => filter(v, keep),
        }
    }
}

/// Cleaned and enriched table.
#[derive(Debug, Clone, Default)]
pub struct CleanTable {
    names: Vec<String>,
    columns: HashMap<String, Column>,
    len: usize,
}

impl CleanTable {
    pub(crate) fn with_len(len: usize) -> Self {
        Self {
            names: Vec::new(),
            columns: HashMap::new(),
            len,
        }
    }

    /// Adds or replaces a column. Replacing keeps the original column position.
    pub(crate) fn insert(&mut self, name: &str, column: Column) {
        debug_assert_eq!(column.len(), self.len, "column {name} has wrong length");
        if !self.columns.contains_key(name) {
            self.names.push(name.to_string());
        }
        self.columns.insert(name.to_string(), column);
    }

    /// Drops every row whose `keep` flag is false, across all columns.
    pub(crate) fn retain_rows(&mut self, keep: &[bool]) {
        debug_assert_eq!(keep.len(), self.len);
        for column in self.columns.values_mut() {
            column.retain(keep);
        }
        self.len = keep.iter().filter(|k| **k).count();
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Column names in insertion order: source columns first, derived after.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&[Option<String>]> {
        self.column(name).and_then(Column::as_text)
    }

    pub fn numbers(&self, name: &str) -> Option<&[Option<f64>]> {
        self.column(name).and_then(Column::as_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_table_lookup() {
        let mut raw = RawTable::new(vec!["A".into(), "B".into()]);
        raw.rows.push(vec!["1".into(), "2".into()]);

        assert_eq!(raw.len(), 1);
        assert_eq!(raw.column_count(), 2);
        assert_eq!(raw.column_index("B"), Some(1));
        assert_eq!(raw.column_index("C"), None);
    }

    #[test]
    fn test_retain_rows_filters_every_column() {
        let mut table = CleanTable::with_len(3);
        table.insert(
            "T",
            Column::Text(vec![Some("a".into()), None, Some("c".into())]),
        );
        table.insert("N", Column::Number(vec![Some(1.0), Some(2.0), None]));

        table.retain_rows(&[true, false, true]);

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.text("T").unwrap(),
            &[Some("a".to_string()), Some("c".to_string())]
        );
        assert_eq!(table.numbers("N").unwrap(), &[Some(1.0), None]);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut table = CleanTable::with_len(1);
        table.insert("A", Column::Text(vec![Some("x".into())]));
        table.insert("B", Column::Text(vec![None]));
        table.insert("A", Column::Number(vec![Some(3.0)]));

        assert_eq!(table.column_names(), &["A".to_string(), "B".to_string()]);
        assert!(table.text("A").is_none());
        assert_eq!(table.numbers("A").unwrap(), &[Some(3.0)]);
        assert_eq!(table.column("B").unwrap().non_missing(), 0);
    }
}
