use serde_json::{json, Value};

use crate::db::DbClient;
use crate::errors::DbError;
use crate::models::schema::{ColumnSchema, IndexSchema, KeyRole, TableSchema};

const COLUMNS_QUERY: &str = "\
    SELECT column_name AS name, column_type AS data_type, \
           is_nullable AS is_nullable, column_key AS column_key \
    FROM information_schema.columns \
    WHERE table_schema = DATABASE() AND table_name = ? \
    ORDER BY ordinal_position";

const UNIQUE_INDEXES_QUERY: &str = "\
    SELECT index_name AS index_name, column_name AS column_name \
    FROM information_schema.statistics \
    WHERE table_schema = DATABASE() AND table_name = ? \
      AND non_unique = 0 AND index_name != 'PRIMARY' \
    ORDER BY index_name, seq_in_index";

/// Reads the live shape of a table from the engine's metadata views. Never
/// mutates state; engine failures propagate unchanged.
pub struct SchemaInspector<'a> {
    client: &'a (dyn DbClient + Send + Sync),
}

impl<'a> SchemaInspector<'a> {
    pub fn new(client: &'a (dyn DbClient + Send + Sync)) -> Self {
        SchemaInspector { client }
    }

    pub async fn table_exists(&self, table: &str) -> Result<bool, DbError> {
        let rows = self
            .client
            .query_with(
                "SELECT table_name FROM information_schema.tables \
                 WHERE table_schema = DATABASE() AND table_name = ?",
                &[json!(table)],
            )
            .await?;
        Ok(!rows.is_empty())
    }

    /// Snapshot of columns, key membership and single-column unique indexes.
    /// Returns `None` when the table does not exist.
    pub async fn snapshot(&self, table: &str) -> Result<Option<TableSchema>, DbError> {
        if !self.table_exists(table).await? {
            return Ok(None);
        }

        let rows = self
            .client
            .query_with(COLUMNS_QUERY, &[json!(table)])
            .await?;
        let columns = rows.iter().map(column_from_row).collect();

        let rows = self
            .client
            .query_with(UNIQUE_INDEXES_QUERY, &[json!(table)])
            .await?;
        let unique_indexes = rows.iter().filter_map(index_from_row).collect();

        Ok(Some(TableSchema {
            table_name: table.to_string(),
            columns,
            unique_indexes,
        }))
    }
}

fn text(row: &Value, key: &str) -> String {
    row.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn column_from_row(row: &Value) -> ColumnSchema {
    let key = if text(row, "column_key") == "PRI" {
        KeyRole::Primary
    } else {
        KeyRole::None
    };

    ColumnSchema {
        name: text(row, "name"),
        data_type: text(row, "data_type"),
        is_nullable: text(row, "is_nullable") == "YES",
        key,
    }
}

fn index_from_row(row: &Value) -> Option<IndexSchema> {
    let name = row.get("index_name")?.as_str()?.to_string();
    let column = row.get("column_name")?.as_str()?.to_string();
    Some(IndexSchema { name, column })
}
