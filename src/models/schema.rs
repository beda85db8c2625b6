use serde::{Deserialize, Serialize};

/// Role a column plays in the table key, as reported by the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyRole {
    #[default]
    None,
    Primary,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ColumnSchema {
    pub name: String,
    pub data_type: String,
    pub is_nullable: bool,
    pub key: KeyRole,
}

/// A single-column unique index observed on the live table.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct IndexSchema {
    pub name: String,
    pub column: String,
}

/// Inspected actual state of one table: columns in engine order plus the
/// unique indexes covering them (the primary key is tracked per column via
/// [`KeyRole`], never as an index entry).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TableSchema {
    pub table_name: String,
    pub columns: Vec<ColumnSchema>,
    pub unique_indexes: Vec<IndexSchema>,
}

impl TableSchema {
    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Name of the unique index covering `column`, if any.
    pub fn unique_index_on(&self, column: &str) -> Option<&str> {
        self.unique_indexes
            .iter()
            .find(|ix| ix.column == column)
            .map(|ix| ix.name.as_str())
    }

    pub fn primary_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.key == KeyRole::Primary)
            .map(|c| c.name.as_str())
            .collect()
    }
}
