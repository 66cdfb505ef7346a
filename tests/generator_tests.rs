//! End-to-end coverage of the generator over the public API: the pinned
//! statement shapes, order preservation, exactly-once emission, deep
//! nesting, and the fail-fast input paths.

use sparkddl::{
    add_statement, evolution_from_str, generate_statements, DdlError, FieldDescriptor,
};

fn descriptors(value: serde_json::Value) -> Vec<FieldDescriptor> {
    serde_json::from_value(value).expect("descriptor fixture")
}

fn generate(source: &str) -> Vec<String> {
    generate_statements(&evolution_from_str(source).expect("document fixture"))
        .expect("generation")
}

#[test]
fn single_primitive_column() {
    let columns = descriptors(serde_json::json!([
        {"path": "a", "value": "string"}
    ]));
    assert_eq!(
        add_statement(&columns).unwrap(),
        "ALTER TABLE {table_name} \n    ADD COLUMNS (\n    `a` STRING COMMENT '' \n    )"
    );
}

#[test]
fn remove_drops_each_path() {
    let statements = generate(r#"[{"operation": "REMOVE", "columns": ["a.b"]}]"#);
    assert_eq!(
        statements,
        vec!["ALTER TABLE {table_name} DROP COLUMN `a`.`b`".to_string()]
    );
}

#[test]
fn object_with_child_folds_into_one_struct() {
    let columns = descriptors(serde_json::json!([
        {"path": "x", "value": "object"},
        {"path": "x.y", "value": "string"}
    ]));
    let statement = add_statement(&columns).unwrap();
    assert_eq!(
        statement,
        "ALTER TABLE {table_name} \n    ADD COLUMNS (\n    `x` struct<\n        y: STRING COMMENT '' \n    > COMMENT '' \n    )"
    );
    // the child never reappears as its own column
    assert!(!statement.contains("`x`.`y`"));
}

#[test]
fn empty_add_list() {
    let statements = generate(r#"[{"operation": "ADD", "columns": []}]"#);
    assert_eq!(
        statements,
        vec!["ALTER TABLE {table_name} \n    ADD COLUMNS ()".to_string()]
    );
}

#[test]
fn reorder_first() {
    let statements = generate(r#"[{"operation": "REORDER", "columns": [{"path": "a", "moveafter": "first"}]}]"#);
    assert_eq!(
        statements,
        vec!["ALTER TABLE {table_name} ALTER COLUMN `a` FIRST".to_string()]
    );
}

#[test]
fn flat_columns_keep_input_order() {
    let columns = descriptors(serde_json::json!([
        {"path": "zeta", "value": "long"},
        {"path": "alpha", "value": "string"},
        {"path": "mid", "value": "boolean"}
    ]));
    let statement = add_statement(&columns).unwrap();
    let zeta = statement.find("`zeta`").unwrap();
    let alpha = statement.find("`alpha`").unwrap();
    let mid = statement.find("`mid`").unwrap();
    assert!(zeta < alpha && alpha < mid);
}

#[test]
fn struct_children_emit_exactly_once() {
    let columns = descriptors(serde_json::json!([
        {"path": "x", "value": "object"},
        {"path": "x.y", "value": "string"},
        {"path": "x.z", "value": "object"},
        {"path": "x.z.q", "value": "long"},
        {"path": "w", "value": "string"}
    ]));
    let statement = add_statement(&columns).unwrap();
    assert_eq!(statement.matches("struct<").count(), 2);
    assert_eq!(statement.matches("y: STRING").count(), 1);
    assert_eq!(statement.matches("q: BIGINT").count(), 1);
    assert!(!statement.contains("`x`.`y`"));
    assert!(!statement.contains("`x`.`z`"));
    // sibling order survives the struct fold
    assert!(statement.find("`x`").unwrap() < statement.find("`w`").unwrap());
}

#[test]
fn arrays_of_structs_nest_per_element_marker() {
    let columns = descriptors(serde_json::json!([
        {"path": "checks", "value": "array"},
        {"path": "checks.element.name", "value": "string"},
        {"path": "checks.element.requirements", "value": "array"},
        {"path": "checks.element.requirements.element.ruleValue", "value": "string"}
    ]));
    let statement = add_statement(&columns).unwrap();
    assert_eq!(
        statement,
        "ALTER TABLE {table_name} \n    ADD COLUMNS (\n    `checks` array<struct<\n            name: STRING COMMENT '' ,\n            requirements: array<struct<\n                ruleValue: STRING COMMENT '' \n            >> COMMENT '' \n    >> COMMENT '' \n    )"
    );
    // nesting depth equals the number of element markers in the deepest path
    assert_eq!(statement.matches("array<struct<").count(), 2);
}

#[test]
fn nested_fields_name_the_single_element_value() {
    let columns = descriptors(serde_json::json!([
        {"path": "tags", "value": "array",
         "nestedFields": {"name": "tagId", "type": "long", "doc": "Tag id"}}
    ]));
    let statement = add_statement(&columns).unwrap();
    assert_eq!(
        statement,
        "ALTER TABLE {table_name} \n    ADD COLUMNS (\n    `tags` array<struct<\n            tagId: BIGINT COMMENT 'Tag id' \n    >> COMMENT '' \n    )"
    );
}

#[test]
fn childless_object_renders_empty_struct() {
    let columns = descriptors(serde_json::json!([
        {"path": "meta", "value": "object"}
    ]));
    let statement = add_statement(&columns).unwrap();
    assert!(statement.contains("    `meta` struct<> COMMENT '' "));
}

#[test]
fn simple_array_defaults_element_type_to_string() {
    let columns = descriptors(serde_json::json!([
        {"path": "tags", "value": "array"},
        {"path": "ids", "value": "array", "arr_type": "long"}
    ]));
    let statement = add_statement(&columns).unwrap();
    assert!(statement.contains("    `tags` array<string> COMMENT '' "));
    assert!(statement.contains("    `ids` array<long> COMMENT '' "));
}

#[test]
fn orphaned_children_are_swept_as_dotted_columns() {
    let columns = descriptors(serde_json::json!([
        {"path": "a.b", "value": "string"},
        {"path": "a.c", "value": "long"}
    ]));
    let statement = add_statement(&columns).unwrap();
    assert!(statement.contains("    `a`.`b` STRING COMMENT '' ,\n    `a`.`c` BIGINT COMMENT '' "));
}

#[test]
fn generation_is_deterministic() {
    let source = r#"[
        {"operation": "ADD", "columns": [
            {"path": "s", "value": "object"},
            {"path": "s.a", "value": "string"},
            {"path": "arr", "value": "array"},
            {"path": "arr.element.v", "value": "double"}
        ]},
        {"operation": "REMOVE", "columns": ["old"]}
    ]"#;
    assert_eq!(generate(source), generate(source));
}

#[test]
fn operation_groups_render_in_document_order() {
    let statements = generate(
        r#"[
            {"operation": "ADD", "columns": [{"path": "a", "value": "string"}]},
            {"operation": "MOVE", "columns": [{"path": "a", "value": "b"}]},
            {"operation": "REPLACE", "columns": [
                {"path": "b", "target_field": "description", "value": "renamed"}
            ]}
        ]"#,
    );
    assert_eq!(statements.len(), 3);
    assert!(statements[0].contains("ADD COLUMNS"));
    assert_eq!(
        statements[1],
        "ALTER TABLE {table_name} RENAME COLUMN `a` TO `b`"
    );
    assert_eq!(
        statements[2],
        "ALTER TABLE {table_name} ALTER COLUMN `b` COMMENT 'renamed' "
    );
}

#[test]
fn doc_strings_are_escaped_into_the_comment_literal() {
    let columns = descriptors(serde_json::json!([
        {"path": "a", "value": "string", "doc": "it's a\\b"}
    ]));
    let statement = add_statement(&columns).unwrap();
    assert!(statement.contains("COMMENT 'it\\'s a\\\\b' "));
}

#[test]
fn blank_descriptor_fields_fail_before_rendering() {
    let blank_path = descriptors(serde_json::json!([
        {"path": "  ", "value": "string"}
    ]));
    assert!(matches!(
        add_statement(&blank_path),
        Err(DdlError::MalformedDescriptor { .. })
    ));

    let blank_kind = descriptors(serde_json::json!([
        {"path": "a", "value": " "}
    ]));
    assert!(matches!(
        add_statement(&blank_kind),
        Err(DdlError::MalformedDescriptor { .. })
    ));
}

#[test]
fn unknown_operation_and_target_field_fail_at_parse() {
    let unknown_operation = r#"[{"operation": "RENAME", "columns": []}]"#;
    assert!(matches!(
        evolution_from_str(unknown_operation),
        Err(DdlError::Input { .. })
    ));

    let unknown_target = r#"[{"operation": "REPLACE", "columns": [
        {"path": "a", "target_field": "label", "value": "x"}
    ]}]"#;
    assert!(matches!(
        evolution_from_str(unknown_target),
        Err(DdlError::Input { .. })
    ));
}
