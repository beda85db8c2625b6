use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::SchemaError;

/// Declarative specification of a single column.
///
/// The serialized form matches the external input format: `type` holds the
/// engine-native type string (`varchar(36)`, `int`, `text`, ...), all flags
/// default to false and `default` to absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub auto_increment: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        ColumnSpec {
            name: name.into(),
            data_type: data_type.into(),
            required: false,
            primary: false,
            auto_increment: false,
            unique: false,
            default: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Default value for the column; `Value::Null` renders as `DEFAULT NULL`.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    fn is_integer_type(&self) -> bool {
        let ty = self.data_type.trim().to_ascii_lowercase();
        ["tinyint", "smallint", "mediumint", "int", "integer", "bigint"]
            .iter()
            .any(|base| {
                ty == *base
                    || ty.starts_with(&format!("{base}("))
                    || ty.starts_with(&format!("{base} "))
            })
    }
}

/// Desired-state description of one table: the table name plus its columns
/// in declaration order. The table name is fixed for the life of the value.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TableDescriptor {
    table: String,
    columns: Vec<ColumnSpec>,
}

impl TableDescriptor {
    /// Builds a descriptor, rejecting invalid combinations up front so they
    /// never reach the differ or the engine: duplicate column names, more
    /// than one primary column, `auto_increment` on a non-integer type, and
    /// a default on the primary column.
    pub fn new(table: impl Into<String>, columns: Vec<ColumnSpec>) -> Result<Self, SchemaError> {
        let mut primary: Option<&str> = None;
        for (i, col) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == col.name) {
                return Err(SchemaError::DuplicateColumn(col.name.clone()));
            }
            if col.primary {
                if let Some(first) = primary {
                    return Err(SchemaError::MultiplePrimaryKeys(
                        first.to_string(),
                        col.name.clone(),
                    ));
                }
                primary = Some(&col.name);
            }
            if col.auto_increment && !col.is_integer_type() {
                return Err(SchemaError::AutoIncrementNotInteger {
                    column: col.name.clone(),
                    data_type: col.data_type.clone(),
                });
            }
            if col.primary && col.default.is_some() {
                return Err(SchemaError::DefaultOnPrimary(col.name.clone()));
            }
        }

        Ok(TableDescriptor {
            table: table.into(),
            columns,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn primary_column(&self) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.primary)
    }
}
