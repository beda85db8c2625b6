pub mod db;
pub mod errors;
pub mod model;
pub mod models;
pub mod response;
pub mod sync;
pub mod validate;

pub use db::mysql::MySqlClient;
pub use db::DbClient;
pub use errors::{DbError, ErrorKind, SchemaError};
pub use model::{FindOptions, Model, Page, SortOrder};
pub use models::connections::ConnectionConfig;
pub use models::descriptor::{ColumnSpec, TableDescriptor};
pub use response::{ApiResponse, ApiStatus};
pub use sync::{diff, ChangeOp, SchemaInspector};
pub use validate::{validate_fields, ValidationReport};
