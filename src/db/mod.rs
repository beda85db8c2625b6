use crate::errors::DbError;
use async_trait::async_trait;
use serde_json::Value;

pub mod mysql;

/// Outcome of a single DML statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    pub rows_affected: u64,
    /// Identity value generated by the engine, or 0 when the statement did
    /// not produce one.
    pub last_insert_id: u64,
}

#[async_trait]
pub trait DbClient {
    /// Runs a statement that carries no bound values (DDL).
    async fn execute(&self, query: &str) -> Result<(), DbError>;
    /// Runs a DML statement with `?` placeholders bound from `params`.
    async fn execute_with(&self, query: &str, params: &[Value]) -> Result<ExecResult, DbError>;
    /// Fetches rows, each as a JSON object keyed by column name.
    async fn query(&self, query: &str) -> Result<Vec<Value>, DbError>;
    /// Fetches rows with `?` placeholders bound from `params`.
    async fn query_with(&self, query: &str, params: &[Value]) -> Result<Vec<Value>, DbError>;
}
