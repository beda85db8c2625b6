use async_trait::async_trait;
use serde_json::Value;
use sqlx::mysql::{MySqlArguments, MySqlPoolOptions, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, MySql, MySqlPool, Row};

use crate::db::{DbClient, ExecResult};
use crate::errors::DbError;
use crate::models::connections::ConnectionConfig;

pub struct MySqlClient {
    pub pool: MySqlPool,
}

impl MySqlClient {
    pub async fn connect(database_url: &str) -> Result<Self, DbError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(|e| DbError::Connection(e.to_string()))?;

        Ok(Self { pool })
    }

    pub async fn connect_with(config: &ConnectionConfig) -> Result<Self, DbError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await
            .map_err(|e| DbError::Connection(e.to_string()))?;

        Ok(Self { pool })
    }
}

/// Quotes an identifier for MySQL, doubling any embedded backtick.
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Renders a scalar as a MySQL literal for DDL default clauses. DML values
/// never pass through here; those are bound as statement parameters.
pub fn literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("'{}'", escape_string(s)),
        other => format!("'{}'", escape_string(&other.to_string())),
    }
}

fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "''")
}

fn bind_value<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    value: &'q Value,
) -> Query<'q, MySql, MySqlArguments> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                query.bind(i)
            } else {
                query.bind(n.as_f64().unwrap_or_default())
            }
        }
        Value::String(s) => query.bind(s.as_str()),
        other => query.bind(other.to_string()),
    }
}

fn row_to_json(row: &MySqlRow) -> Value {
    let json_map = row
        .columns()
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let value = if let Ok(val) = row.try_get::<Option<i64>, _>(i) {
                val.map(Value::from).unwrap_or(Value::Null)
            } else if let Ok(val) = row.try_get::<Option<f64>, _>(i) {
                val.map(Value::from).unwrap_or(Value::Null)
            } else if let Ok(val) = row.try_get::<Option<bool>, _>(i) {
                val.map(Value::from).unwrap_or(Value::Null)
            } else if let Ok(val) = row.try_get::<Option<String>, _>(i) {
                val.map(Value::String).unwrap_or(Value::Null)
            } else {
                Value::Null
            };

            (column.name().to_string(), value)
        })
        .collect();

    Value::Object(json_map)
}

#[async_trait]
impl DbClient for MySqlClient {
    async fn execute(&self, query: &str) -> Result<(), DbError> {
        sqlx::query(query)
            .execute(&self.pool)
            .await
            .map_err(DbError::Sqlx)?;
        Ok(())
    }

    async fn execute_with(&self, query: &str, params: &[Value]) -> Result<ExecResult, DbError> {
        let mut q = sqlx::query(query);
        for param in params {
            q = bind_value(q, param);
        }
        let result = q.execute(&self.pool).await.map_err(DbError::Sqlx)?;

        Ok(ExecResult {
            rows_affected: result.rows_affected(),
            last_insert_id: result.last_insert_id(),
        })
    }

    async fn query(&self, query: &str) -> Result<Vec<Value>, DbError> {
        let rows = sqlx::query(query)
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::Sqlx)?;

        Ok(rows.iter().map(row_to_json).collect())
    }

    async fn query_with(&self, query: &str, params: &[Value]) -> Result<Vec<Value>, DbError> {
        let mut q = sqlx::query(query);
        for param in params {
            q = bind_value(q, param);
        }
        let rows = q.fetch_all(&self.pool).await.map_err(DbError::Sqlx)?;

        Ok(rows.iter().map(row_to_json).collect())
    }
}
