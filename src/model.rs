use std::sync::Arc;

use log::info;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::db::mysql::quote_ident;
use crate::db::DbClient;
use crate::errors::DbError;
use crate::models::descriptor::TableDescriptor;
use crate::sync::{apply, diff, SchemaInspector};

/// Sort direction for `find_all`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Options for paginated listing. `page` is 1-based; both `page` and
/// `page_size` are clamped to at least 1.
#[derive(Debug, Clone)]
pub struct FindOptions {
    pub filter: Option<(String, Value)>,
    pub order_by: Option<String>,
    pub order: SortOrder,
    pub page: i64,
    pub page_size: i64,
}

impl Default for FindOptions {
    fn default() -> Self {
        FindOptions {
            filter: None,
            order_by: None,
            order: SortOrder::Asc,
            page: 1,
            page_size: 10,
        }
    }
}

/// One page of rows plus the pagination totals.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub rows: Vec<Value>,
    pub total: u64,
    pub pages: u64,
}

/// A table-backed model: a descriptor plus the connection it synchronizes
/// and queries through. The table name is fixed once the model is built.
///
/// Column names arriving in row maps are trusted to be declared columns;
/// run [`crate::validate::validate_fields`] on external input before it
/// reaches this layer.
pub struct Model {
    client: Arc<dyn DbClient + Send + Sync>,
    descriptor: TableDescriptor,
}

impl Model {
    pub fn new(client: Arc<dyn DbClient + Send + Sync>, descriptor: TableDescriptor) -> Self {
        Model { client, descriptor }
    }

    /// Builds the model and reconciles the live table with its descriptor
    /// before handing it out.
    pub async fn initialize(
        client: Arc<dyn DbClient + Send + Sync>,
        descriptor: TableDescriptor,
    ) -> Result<Self, DbError> {
        let model = Model::new(client, descriptor);
        model.synchronize().await?;
        Ok(model)
    }

    pub fn descriptor(&self) -> &TableDescriptor {
        &self.descriptor
    }

    pub fn table(&self) -> &str {
        self.descriptor.table()
    }

    /// Inspect, diff, apply. Safe to re-run; a converged table yields no
    /// operations. Concurrent synchronization of the same table from
    /// several processes is not coordinated here.
    pub async fn synchronize(&self) -> Result<(), DbError> {
        let inspector = SchemaInspector::new(self.client.as_ref());
        let live = inspector.snapshot(self.table()).await?;
        let ops = diff(&self.descriptor, live.as_ref());
        info!("synchronizing `{}`: {} operation(s)", self.table(), ops.len());
        apply(self.client.as_ref(), self.table(), &ops).await
    }

    /// Paginated listing with an optional single-column equality filter and
    /// optional ordering. `pages` is `ceil(total / page_size)`.
    pub async fn find_all(&self, options: FindOptions) -> Result<Page, DbError> {
        let page = options.page.max(1);
        let page_size = options.page_size.max(1);
        let offset = (page - 1) * page_size;

        let mut where_clause = String::new();
        let mut params: Vec<Value> = Vec::new();
        if let Some((column, value)) = &options.filter {
            where_clause = format!(" WHERE {} = ?", quote_ident(column));
            params.push(value.clone());
        }

        let count_sql = format!(
            "SELECT COUNT(*) AS total FROM {}{}",
            quote_ident(self.table()),
            where_clause
        );
        let rows = self.client.query_with(&count_sql, &params).await?;
        let total = rows
            .first()
            .and_then(|row| row.get("total"))
            .and_then(Value::as_u64)
            .unwrap_or(0);
        let pages = total.div_ceil(page_size as u64);

        let mut sql = format!("SELECT * FROM {}{}", quote_ident(self.table()), where_clause);
        if let Some(order_by) = &options.order_by {
            sql.push_str(&format!(
                " ORDER BY {} {}",
                quote_ident(order_by),
                options.order.as_sql()
            ));
        }
        sql.push_str(" LIMIT ? OFFSET ?");
        params.push(Value::from(page_size));
        params.push(Value::from(offset));

        let rows = self.client.query_with(&sql, &params).await?;

        Ok(Page { rows, total, pages })
    }

    pub async fn find_one(&self, column: &str, value: Value) -> Result<Option<Value>, DbError> {
        let sql = format!(
            "SELECT * FROM {} WHERE {} = ? LIMIT 1",
            quote_ident(self.table()),
            quote_ident(column)
        );
        let mut rows = self.client.query_with(&sql, &[value]).await?;
        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows.remove(0)))
        }
    }

    /// Inserts one row; returns the generated identity value when the table
    /// produced one.
    pub async fn insert(&self, data: &Map<String, Value>) -> Result<Option<u64>, DbError> {
        let columns: Vec<String> = data.keys().map(|k| quote_ident(k)).collect();
        let placeholders: Vec<&str> = data.keys().map(|_| "?").collect();
        let params: Vec<Value> = data.values().cloned().collect();

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(self.table()),
            columns.join(", "),
            placeholders.join(", ")
        );
        let result = self.client.execute_with(&sql, &params).await?;

        if result.last_insert_id == 0 {
            Ok(None)
        } else {
            Ok(Some(result.last_insert_id))
        }
    }

    /// Updates rows matching `column = value`; true when at least one row
    /// was affected.
    pub async fn update(
        &self,
        column: &str,
        value: Value,
        data: &Map<String, Value>,
    ) -> Result<bool, DbError> {
        if data.is_empty() {
            return Err(DbError::General("update with no fields".to_string()));
        }

        let assignments: Vec<String> = data
            .keys()
            .map(|k| format!("{} = ?", quote_ident(k)))
            .collect();
        let mut params: Vec<Value> = data.values().cloned().collect();
        params.push(value);

        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?",
            quote_ident(self.table()),
            assignments.join(", "),
            quote_ident(column)
        );
        let result = self.client.execute_with(&sql, &params).await?;

        Ok(result.rows_affected > 0)
    }

    /// Deletes rows matching `column = value`; true when at least one row
    /// was affected.
    pub async fn delete(&self, column: &str, value: Value) -> Result<bool, DbError> {
        let sql = format!(
            "DELETE FROM {} WHERE {} = ?",
            quote_ident(self.table()),
            quote_ident(column)
        );
        let result = self.client.execute_with(&sql, &[value]).await?;

        Ok(result.rows_affected > 0)
    }
}
