use crate::models::descriptor::{ColumnSpec, TableDescriptor};
use crate::models::schema::{ColumnSchema, TableSchema};

/// One structural difference between the declared shape and the live table.
///
/// Operations are pure data; only the executor gives them an effect. They
/// are produced per synchronization call and discarded after execution.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeOp {
    CreateTable(Vec<ColumnSpec>),
    AddColumn(ColumnSpec),
    ModifyColumn(ColumnSpec),
    DropColumn(String),
    SetPrimaryKey(String),
    DropPrimaryKey,
    AddUniqueIndex { column: String, index_name: String },
    DropUniqueIndex { index_name: String },
}

/// Deterministic index name for a unique column.
pub fn unique_index_name(table: &str, column: &str) -> String {
    format!("uniq_{}_{}", table, column)
}

/// Computes the ordered operation list that converges `live` onto the
/// descriptor. `None` means the table does not exist yet.
///
/// Emission order is the execution order: create, modify, add, drop column,
/// primary key changes, unique index changes. Later steps assume earlier
/// ones already committed.
pub fn diff(descriptor: &TableDescriptor, live: Option<&TableSchema>) -> Vec<ChangeOp> {
    let live = match live {
        Some(live) => live,
        None => return vec![ChangeOp::CreateTable(descriptor.columns().to_vec())],
    };

    let mut ops = Vec::new();

    // Columns: re-assert where the observed shape drifted, add what is
    // missing. Drops come last so a rename modeled as drop-and-add never
    // leaves the table without the replacement column.
    for spec in descriptor.columns() {
        match live.column(&spec.name) {
            Some(col) => {
                if !column_matches(spec, col) {
                    ops.push(ChangeOp::ModifyColumn(spec.clone()));
                }
            }
            None => ops.push(ChangeOp::AddColumn(spec.clone())),
        }
    }

    for col in &live.columns {
        if descriptor.column(&col.name).is_none() {
            ops.push(ChangeOp::DropColumn(col.name.clone()));
        }
    }

    // Primary key. A key on a freshly added column is assigned here, never
    // inline in the ADD COLUMN definition.
    let current = live.primary_columns();
    let desired = descriptor.primary_column().map(|c| c.name.as_str());
    match desired {
        None => {
            if !current.is_empty() {
                ops.push(ChangeOp::DropPrimaryKey);
            }
        }
        Some(name) => {
            if current.len() != 1 || current[0] != name {
                if !current.is_empty() {
                    ops.push(ChangeOp::DropPrimaryKey);
                }
                ops.push(ChangeOp::SetPrimaryKey(name.to_string()));
            }
        }
    }

    // Unique indexes, independent of the key step. Indexes on columns
    // dropped above go away with the column itself.
    for spec in descriptor.columns() {
        match live.unique_index_on(&spec.name) {
            None if spec.unique => ops.push(ChangeOp::AddUniqueIndex {
                column: spec.name.clone(),
                index_name: unique_index_name(descriptor.table(), &spec.name),
            }),
            Some(index_name) if !spec.unique => ops.push(ChangeOp::DropUniqueIndex {
                index_name: index_name.to_string(),
            }),
            _ => {}
        }
    }

    ops
}

/// Field-level comparison driving `ModifyColumn`: the native type is
/// compared after normalization and `required` must line up with NOT NULL.
fn column_matches(spec: &ColumnSpec, live: &ColumnSchema) -> bool {
    normalize_type(&spec.data_type) == normalize_type(&live.data_type)
        && spec.required == !live.is_nullable
}

/// Lowercases and collapses whitespace. Integer display widths are stripped
/// (`int(11)` and `int` compare equal) since newer servers no longer report
/// them, and `integer` is folded to its canonical spelling.
fn normalize_type(ty: &str) -> String {
    let ty = ty
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase();
    let (base, rest) = match ty.find(|c: char| c == '(' || c == ' ') {
        Some(pos) => ty.split_at(pos),
        None => (ty.as_str(), ""),
    };
    let base = if base == "integer" { "int" } else { base };

    if matches!(base, "tinyint" | "smallint" | "mediumint" | "int" | "bigint") {
        if let Some(inner) = rest.strip_prefix('(') {
            if let Some((width, tail)) = inner.split_once(')') {
                if !width.is_empty() && width.chars().all(|c| c.is_ascii_digit()) {
                    return format!("{}{}", base, tail);
                }
            }
        }
    }
    format!("{}{}", base, rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schema::{IndexSchema, KeyRole};

    fn descriptor(columns: Vec<ColumnSpec>) -> TableDescriptor {
        TableDescriptor::new("users", columns).unwrap()
    }

    fn live_column(name: &str, data_type: &str, nullable: bool, key: KeyRole) -> ColumnSchema {
        ColumnSchema {
            name: name.to_string(),
            data_type: data_type.to_string(),
            is_nullable: nullable,
            key,
        }
    }

    fn live_table(columns: Vec<ColumnSchema>, unique_indexes: Vec<IndexSchema>) -> TableSchema {
        TableSchema {
            table_name: "users".to_string(),
            columns,
            unique_indexes,
        }
    }

    fn unique_index(name: &str, column: &str) -> IndexSchema {
        IndexSchema {
            name: name.to_string(),
            column: column.to_string(),
        }
    }

    #[test]
    fn test_missing_table_yields_single_create() {
        let descriptor = descriptor(vec![
            ColumnSpec::new("id", "varchar(36)").required().primary(),
            ColumnSpec::new("email", "varchar(36)").required().unique(),
        ]);

        let ops = diff(&descriptor, None);

        assert_eq!(ops.len(), 1);
        match &ops[0] {
            ChangeOp::CreateTable(columns) => {
                assert_eq!(columns.len(), 2);
                assert!(columns[0].primary);
                assert!(columns[1].unique);
            }
            other => panic!("expected CreateTable, got {:?}", other),
        }
    }

    #[test]
    fn test_converged_table_yields_no_ops() {
        let descriptor = descriptor(vec![
            ColumnSpec::new("id", "varchar(36)").required().primary(),
            ColumnSpec::new("email", "varchar(36)").required().unique(),
        ]);
        let live = live_table(
            vec![
                live_column("id", "varchar(36)", false, KeyRole::Primary),
                live_column("email", "varchar(36)", false, KeyRole::None),
            ],
            vec![unique_index("uniq_users_email", "email")],
        );

        assert_eq!(diff(&descriptor, Some(&live)), vec![]);
    }

    #[test]
    fn test_type_and_nullability_normalization() {
        let descriptor = descriptor(vec![
            ColumnSpec::new("id", "INT(11)").required().primary(),
            ColumnSpec::new("name", "Varchar(36)"),
        ]);
        let live = live_table(
            vec![
                live_column("id", "int", false, KeyRole::Primary),
                live_column("name", "varchar(36)", true, KeyRole::None),
            ],
            vec![],
        );

        assert_eq!(diff(&descriptor, Some(&live)), vec![]);
    }

    #[test]
    fn test_convergent_diff_orders_modify_add_index() {
        let descriptor = descriptor(vec![
            ColumnSpec::new("id", "varchar(36)").required(),
            ColumnSpec::new("name", "varchar(100)").required(),
            ColumnSpec::new("email", "varchar(36)").unique(),
        ]);
        // Both surviving columns drifted, so each is re-asserted.
        let live = live_table(
            vec![
                live_column("id", "varchar(16)", false, KeyRole::None),
                live_column("name", "varchar(36)", true, KeyRole::None),
            ],
            vec![],
        );

        let ops = diff(&descriptor, Some(&live));

        assert_eq!(
            ops,
            vec![
                ChangeOp::ModifyColumn(descriptor.columns()[0].clone()),
                ChangeOp::ModifyColumn(descriptor.columns()[1].clone()),
                ChangeOp::AddColumn(descriptor.columns()[2].clone()),
                ChangeOp::AddUniqueIndex {
                    column: "email".to_string(),
                    index_name: "uniq_users_email".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_drop_follows_modify_and_add() {
        let descriptor = descriptor(vec![
            ColumnSpec::new("id", "int").required(),
            ColumnSpec::new("name", "varchar(100)"),
        ]);
        let live = live_table(
            vec![
                live_column("id", "varchar(36)", false, KeyRole::None),
                live_column("legacy", "text", true, KeyRole::None),
            ],
            vec![],
        );

        let ops = diff(&descriptor, Some(&live));

        assert_eq!(
            ops,
            vec![
                ChangeOp::ModifyColumn(descriptor.columns()[0].clone()),
                ChangeOp::AddColumn(descriptor.columns()[1].clone()),
                ChangeOp::DropColumn("legacy".to_string()),
            ]
        );
    }

    #[test]
    fn test_primary_key_swap_drops_then_sets() {
        let descriptor = descriptor(vec![
            ColumnSpec::new("id", "varchar(36)").required(),
            ColumnSpec::new("uuid", "varchar(36)").required().primary(),
        ]);
        let live = live_table(
            vec![
                live_column("id", "varchar(36)", false, KeyRole::Primary),
                live_column("uuid", "varchar(36)", false, KeyRole::None),
            ],
            vec![],
        );

        assert_eq!(
            diff(&descriptor, Some(&live)),
            vec![ChangeOp::DropPrimaryKey, ChangeOp::SetPrimaryKey("uuid".to_string())]
        );
    }

    #[test]
    fn test_composite_live_key_is_replaced() {
        let descriptor = descriptor(vec![
            ColumnSpec::new("a", "int").required().primary(),
            ColumnSpec::new("b", "int").required(),
        ]);
        let live = live_table(
            vec![
                live_column("a", "int", false, KeyRole::Primary),
                live_column("b", "int", false, KeyRole::Primary),
            ],
            vec![],
        );

        assert_eq!(
            diff(&descriptor, Some(&live)),
            vec![ChangeOp::DropPrimaryKey, ChangeOp::SetPrimaryKey("a".to_string())]
        );
    }

    #[test]
    fn test_unwanted_primary_key_is_dropped() {
        let descriptor = descriptor(vec![ColumnSpec::new("id", "int").required()]);
        let live = live_table(vec![live_column("id", "int", false, KeyRole::Primary)], vec![]);

        assert_eq!(diff(&descriptor, Some(&live)), vec![ChangeOp::DropPrimaryKey]);
    }

    #[test]
    fn test_new_primary_column_added_then_keyed() {
        let descriptor = descriptor(vec![
            ColumnSpec::new("id", "int").required(),
            ColumnSpec::new("uuid", "varchar(36)").required().primary(),
        ]);
        let live = live_table(vec![live_column("id", "int", false, KeyRole::None)], vec![]);

        assert_eq!(
            diff(&descriptor, Some(&live)),
            vec![
                ChangeOp::AddColumn(descriptor.columns()[1].clone()),
                ChangeOp::SetPrimaryKey("uuid".to_string()),
            ]
        );
    }

    #[test]
    fn test_stale_unique_index_dropped_by_live_name() {
        let descriptor = descriptor(vec![ColumnSpec::new("email", "varchar(36)")]);
        let live = live_table(
            vec![live_column("email", "varchar(36)", true, KeyRole::None)],
            vec![unique_index("email_key", "email")],
        );

        assert_eq!(
            diff(&descriptor, Some(&live)),
            vec![ChangeOp::DropUniqueIndex {
                index_name: "email_key".to_string(),
            }]
        );
    }

    #[test]
    fn test_indexes_on_dropped_columns_untouched() {
        let descriptor = descriptor(vec![ColumnSpec::new("id", "int").required()]);
        let live = live_table(
            vec![
                live_column("id", "int", false, KeyRole::None),
                live_column("legacy", "varchar(36)", true, KeyRole::None),
            ],
            vec![unique_index("uniq_users_legacy", "legacy")],
        );

        assert_eq!(
            diff(&descriptor, Some(&live)),
            vec![ChangeOp::DropColumn("legacy".to_string())]
        );
    }
}
