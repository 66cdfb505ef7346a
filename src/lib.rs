//! Schema-evolution → Spark SQL DDL generator.
//!
//! An evolution document is an ordered list of operation groups (ADD,
//! REMOVE, MOVE, REORDER, REPLACE) over dotted field paths. ADD descriptors
//! arrive flat — a struct and each of its descendants are separate entries,
//! with the reserved segment `element` marking array-element levels — and
//! are reassembled here into nested `struct<...>` / `array<struct<...>>`
//! column definitions that preserve original declaration order and emit
//! each logical field exactly once.
//!
//! ```
//! let operations = sparkddl::evolution_from_str(
//!     r#"[{"operation": "ADD", "columns": [{"path": "a", "value": "string"}]}]"#,
//! )?;
//! let statements = sparkddl::generate_statements(&operations)?;
//! assert!(statements[0].starts_with("ALTER TABLE {table_name}"));
//! # Ok::<(), sparkddl::DdlError>(())
//! ```

pub mod cli;
pub mod descriptor;
pub mod dialect;
pub mod emit;
pub mod error;
pub mod index;
pub mod input;
pub mod path;
pub mod tree;

pub use descriptor::{
    FieldDescriptor, MoveColumn, NestedField, Operation, ReorderColumn, ReplaceColumn, TargetField,
};
pub use emit::{add_statement, generate_statements, substitute_table_name, TABLE_NAME_PLACEHOLDER};
pub use error::DdlError;
pub use input::{
    evolution_from_path, evolution_from_slice, evolution_from_str, evolution_from_value,
};
