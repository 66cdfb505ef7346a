//! Statement rendering and the generation driver.
//!
//! `generate_statements` walks the operation groups; ADD builds the column
//! tree per top-level field and renders it, every other operation is a
//! stateless one-line template. The driver owns the single consumed-path
//! set and always extends it with a whole subtree at once, so each logical
//! field is emitted exactly once.

use std::collections::HashSet;

use log::warn;

use crate::descriptor::{
    FieldDescriptor, MoveColumn, Operation, ReorderColumn, ReplaceColumn, TargetField,
};
use crate::dialect;
use crate::error::DdlError;
use crate::index::PathIndex;
use crate::path::FieldPath;
use crate::tree::{self, ArrayElement, ColumnField, ColumnType, TopColumn};

/// Token left in every statement for the caller to substitute.
pub const TABLE_NAME_PLACEHOLDER: &str = "{table_name}";

/// Replace the placeholder with a concrete table name.
pub fn substitute_table_name(statement: &str, table_name: &str) -> String {
    statement.replace(TABLE_NAME_PLACEHOLDER, table_name)
}

/// Render every operation group of an evolution document, in order. ADD
/// yields one multi-line statement per group, the rest one statement per
/// column entry.
pub fn generate_statements(operations: &[Operation]) -> Result<Vec<String>, DdlError> {
    let mut statements = Vec::new();
    for operation in operations {
        match operation {
            Operation::Add(columns) => statements.push(add_statement(columns)?),
            Operation::Remove(paths) => statements.extend(remove_statements(paths)?),
            Operation::Move(columns) => statements.extend(move_statements(columns)?),
            Operation::Reorder(columns) => statements.extend(reorder_statements(columns)?),
            Operation::Replace(columns) => statements.extend(replace_statements(columns)?),
        }
    }
    Ok(statements)
}

// -------------------------------- ADD ------------------------------------- //

/// One `ADD COLUMNS (...)` statement for a flat descriptor list.
pub fn add_statement(descriptors: &[FieldDescriptor]) -> Result<String, DdlError> {
    let index = PathIndex::build(descriptors)?;
    let mut processed: HashSet<FieldPath> = HashSet::new();
    let mut definitions: Vec<String> = Vec::new();

    for top in index.top_level() {
        if processed.contains(top) {
            continue;
        }
        if let Some(column) = tree::dotted_column(&index, top, &processed) {
            definitions.push(render_top_column(&column));
            mark_subtree(&index, &mut processed, top);
        }
    }

    // Best-effort recovery for descriptors whose top-level ancestor never
    // appeared as its own entry.
    let mut remaining: Vec<FieldPath> = index
        .paths()
        .filter(|path| {
            !processed.contains(*path)
                && !path.proper_ancestors().any(|a| processed.contains(&a))
        })
        .cloned()
        .collect();
    remaining.sort_by_key(|path| index.order_of(path).unwrap_or(usize::MAX));

    let mut swept = 0usize;
    for path in remaining {
        if processed.contains(&path) {
            continue;
        }
        if let Some(column) = tree::dotted_column(&index, &path, &processed) {
            definitions.push(render_top_column(&column));
            mark_subtree(&index, &mut processed, &path);
            swept += 1;
        }
    }
    if swept > 0 {
        warn!("recovered {swept} column(s) detached from their top-level ancestor; the descriptor list is inconsistently shaped");
    }

    Ok(assemble_add(&definitions))
}

/// Consume `root` and every descriptor path below it in one step.
fn mark_subtree(index: &PathIndex, processed: &mut HashSet<FieldPath>, root: &FieldPath) {
    processed.insert(root.clone());
    for path in index.paths() {
        if path.is_descendant_of(root) {
            processed.insert(path.clone());
        }
    }
}

fn assemble_add(definitions: &[String]) -> String {
    if definitions.is_empty() {
        format!("ALTER TABLE {TABLE_NAME_PLACEHOLDER} \n    ADD COLUMNS ()")
    } else {
        format!(
            "ALTER TABLE {TABLE_NAME_PLACEHOLDER} \n    ADD COLUMNS (\n{}\n    )",
            definitions.join(",\n")
        )
    }
}

// ------------------------------ Rendering --------------------------------- //

fn indent(level: usize) -> String {
    "    ".repeat(level)
}

fn render_fields(fields: &[ColumnField], level: usize) -> String {
    fields
        .iter()
        .map(|field| render_field(field, level))
        .collect::<Vec<_>>()
        .join(",\n")
}

fn render_field(field: &ColumnField, level: usize) -> String {
    let pad = indent(level);
    let name = &field.name;
    let comment = dialect::format_comment(field.doc.as_deref());
    match &field.ty {
        ColumnType::Primitive(ty) => format!("{pad}{name}: {ty} {comment}"),
        ColumnType::Struct(members) if members.is_empty() => {
            format!("{pad}{name}: struct<> {comment}")
        }
        ColumnType::Struct(members) => {
            let body = render_fields(members, level + 1);
            format!("{pad}{name}: struct<\n{body}\n{pad}> {comment}")
        }
        ColumnType::Array(ArrayElement::Simple(ty)) => {
            format!("{pad}{name}: array<{ty}> {comment}")
        }
        ColumnType::Array(ArrayElement::Struct(members)) => {
            let body = render_fields(members, level + 1);
            format!("{pad}{name}: array<struct<\n{body}\n{pad}>> {comment}")
        }
    }
}

/// Render one top-level column definition. Struct bodies start two indent
/// levels in; a top-level array's element body starts three in, one deeper
/// than its struct counterpart.
fn render_top_column(column: &TopColumn) -> String {
    let path = column.path.quoted();
    let comment = dialect::format_comment(column.doc.as_deref());
    let after = dialect::position_clause(column.position.as_ref());
    match &column.ty {
        ColumnType::Primitive(ty) => format!("    {path} {ty} {comment}{after}"),
        ColumnType::Struct(members) if members.is_empty() => {
            format!("    {path} struct<> {comment}{after}")
        }
        ColumnType::Struct(members) => {
            let body = render_fields(members, 2);
            format!("    {path} struct<\n{body}\n    > {comment}{after}")
        }
        ColumnType::Array(ArrayElement::Simple(ty)) => {
            format!("    {path} array<{ty}> {comment}{after}")
        }
        ColumnType::Array(ArrayElement::Struct(members)) => {
            let body = render_fields(members, 3);
            format!("    {path} array<struct<\n{body}\n    >> {comment}{after}")
        }
    }
}

// ---------------------------- Non-ADD groups ------------------------------ //

pub fn remove_statements(paths: &[String]) -> Result<Vec<String>, DdlError> {
    paths
        .iter()
        .map(|raw| {
            let path = FieldPath::parse(raw)?;
            Ok(format!(
                "ALTER TABLE {TABLE_NAME_PLACEHOLDER} DROP COLUMN {}",
                path.quoted()
            ))
        })
        .collect()
}

pub fn move_statements(columns: &[MoveColumn]) -> Result<Vec<String>, DdlError> {
    columns
        .iter()
        .map(|column| {
            let path = FieldPath::parse(&column.path)?;
            Ok(format!(
                "ALTER TABLE {TABLE_NAME_PLACEHOLDER} RENAME COLUMN {} TO `{}`",
                path.quoted(),
                column.value
            ))
        })
        .collect()
}

/// `moveafter == "first"` wins; otherwise the explicit `value` target is
/// preferred over a non-`first` `moveafter`. A column with neither fails
/// before any statement is produced.
pub fn reorder_statements(columns: &[ReorderColumn]) -> Result<Vec<String>, DdlError> {
    columns
        .iter()
        .map(|column| {
            let path = FieldPath::parse(&column.path)?;
            if column.moveafter.as_deref() == Some("first") {
                return Ok(format!(
                    "ALTER TABLE {TABLE_NAME_PLACEHOLDER} ALTER COLUMN {} FIRST",
                    path.quoted()
                ));
            }
            let target = column
                .value
                .as_deref()
                .or(column.moveafter.as_deref())
                .ok_or_else(|| DdlError::MissingReorderTarget {
                    path: column.path.clone(),
                })?;
            let target = FieldPath::parse(target)?;
            Ok(format!(
                "ALTER TABLE {TABLE_NAME_PLACEHOLDER} ALTER COLUMN {} AFTER {}",
                path.quoted(),
                target.quoted()
            ))
        })
        .collect()
}

pub fn replace_statements(columns: &[ReplaceColumn]) -> Result<Vec<String>, DdlError> {
    columns
        .iter()
        .map(|column| {
            let path = FieldPath::parse(&column.path)?;
            let quoted = path.quoted();
            Ok(match column.target_field {
                TargetField::Description | TargetField::Comment => format!(
                    "ALTER TABLE {TABLE_NAME_PLACEHOLDER} ALTER COLUMN {quoted} COMMENT {}",
                    dialect::comment_literal(Some(&column.value))
                ),
                TargetField::Type => format!(
                    "ALTER TABLE {TABLE_NAME_PLACEHOLDER} ALTER COLUMN {quoted} TYPE {}",
                    dialect::spark_type(&column.value)
                ),
                TargetField::Name => format!(
                    "ALTER TABLE {TABLE_NAME_PLACEHOLDER} RENAME COLUMN {quoted} TO `{}`",
                    column.value
                ),
            })
        })
        .collect()
}
