use log::debug;

use crate::db::mysql::{literal, quote_ident};
use crate::db::DbClient;
use crate::errors::DbError;
use crate::models::descriptor::ColumnSpec;
use crate::sync::diff::{unique_index_name, ChangeOp};

/// Renders one operation as exactly one DDL statement against `table`.
pub fn render_op(table: &str, op: &ChangeOp) -> String {
    let table_q = quote_ident(table);
    match op {
        ChangeOp::CreateTable(columns) => {
            let mut defs: Vec<String> = columns.iter().map(column_def).collect();
            if let Some(pk) = columns.iter().find(|c| c.primary) {
                defs.push(format!("PRIMARY KEY ({})", quote_ident(&pk.name)));
            }
            for col in columns.iter().filter(|c| c.unique) {
                defs.push(format!(
                    "UNIQUE KEY {} ({})",
                    quote_ident(&unique_index_name(table, &col.name)),
                    quote_ident(&col.name)
                ));
            }
            format!("CREATE TABLE {} ({})", table_q, defs.join(", "))
        }
        ChangeOp::AddColumn(spec) => {
            format!("ALTER TABLE {} ADD COLUMN {}", table_q, column_def(spec))
        }
        ChangeOp::ModifyColumn(spec) => {
            format!("ALTER TABLE {} MODIFY COLUMN {}", table_q, column_def(spec))
        }
        ChangeOp::DropColumn(name) => {
            format!("ALTER TABLE {} DROP COLUMN {}", table_q, quote_ident(name))
        }
        ChangeOp::SetPrimaryKey(name) => {
            format!("ALTER TABLE {} ADD PRIMARY KEY ({})", table_q, quote_ident(name))
        }
        ChangeOp::DropPrimaryKey => format!("ALTER TABLE {} DROP PRIMARY KEY", table_q),
        ChangeOp::AddUniqueIndex { column, index_name } => format!(
            "ALTER TABLE {} ADD UNIQUE {} ({})",
            table_q,
            quote_ident(index_name),
            quote_ident(column)
        ),
        ChangeOp::DropUniqueIndex { index_name } => {
            format!("ALTER TABLE {} DROP INDEX {}", table_q, quote_ident(index_name))
        }
    }
}

fn column_def(spec: &ColumnSpec) -> String {
    let mut def = format!("{} {}", quote_ident(&spec.name), spec.data_type);
    def.push_str(if spec.required { " NOT NULL" } else { " NULL" });
    if spec.auto_increment {
        def.push_str(" AUTO_INCREMENT");
    }
    if let Some(default) = &spec.default {
        def.push_str(" DEFAULT ");
        def.push_str(&literal(default));
    }
    def
}

/// Applies the operation sequence in order, one statement per operation,
/// stopping at the first failure. MySQL auto-commits DDL, so a failure
/// partway leaves the already-applied operations in place; re-running the
/// synchronization converges from the intermediate state.
pub async fn apply(
    client: &(dyn DbClient + Send + Sync),
    table: &str,
    ops: &[ChangeOp],
) -> Result<(), DbError> {
    for op in ops {
        let sql = render_op(table, op);
        debug!("ddl: {}", sql);
        client.execute(&sql).await?;
    }
    Ok(())
}
