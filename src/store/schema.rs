//! Header validation for the backing collections. Column order is whatever a
//! file's header declares; only the presence of the required set is checked.

use crate::store::error::StoreError;

/// Static description of one backing collection.
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub file_name: &'static str,
    pub required: &'static [&'static str],
}

pub const ACTIVITIES: TableSchema = TableSchema {
    file_name: "activities.csv",
    required: &["Start", "End", "Category", "Details"],
};

pub const IDEAS: TableSchema = TableSchema {
    file_name: "daily_ideas.csv",
    required: &["Date", "Idea"],
};

pub const TODOS: TableSchema = TableSchema {
    file_name: "todos.csv",
    required: &["Text"],
};

pub const CATEGORIES_FILE: &str = "categories.json";

impl TableSchema {
    /// The header written when a file is bootstrapped, and the column order
    /// used whenever no existing header overrides it.
    pub fn default_header(&self) -> Vec<String> {
        self.required.iter().map(|c| c.to_string()).collect()
    }

    /// Checks that `header` carries every required column. On failure the
    /// error names exactly the missing columns so the user can repair the
    /// file by hand.
    pub fn validate(&self, header: &[String]) -> Result<(), StoreError> {
        let missing: Vec<String> = self
            .required
            .iter()
            .filter(|col| !header.iter().any(|h| h == *col))
            .map(|col| col.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(StoreError::Schema {
                table: self.file_name,
                missing,
                expected: self.required.join(","),
            })
        }
    }

    /// Position of `column` within `header`. Callers only reach this after
    /// [TableSchema::validate], so a required column is always found.
    pub fn column_index(header: &[String], column: &str) -> Option<usize> {
        header.iter().position(|h| h == column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_complete_header_passes() {
        ACTIVITIES
            .validate(&header(&["Start", "End", "Category", "Details"]))
            .unwrap();
        // Reordered and extended headers are still valid.
        ACTIVITIES
            .validate(&header(&["Category", "Details", "Start", "End", "Extra"]))
            .unwrap();
    }

    #[test]
    fn test_missing_columns_are_named_exactly() {
        let err = ACTIVITIES
            .validate(&header(&["Start", "End", "Details"]))
            .unwrap_err();
        match err {
            StoreError::Schema { table, missing, .. } => {
                assert_eq!(table, "activities.csv");
                assert_eq!(missing, vec!["Category".to_string()]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_error_message_lists_columns() {
        let err = IDEAS.validate(&header(&["Something"])).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Date"));
        assert!(message.contains("Idea"));
        assert!(message.contains("daily_ideas.csv"));
    }
}
