//! Exact-text policies of the Spark DDL dialect: type-name normalization,
//! comment literals, positional clauses.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Default element type for arrays with no declared content.
pub const DEFAULT_ARRAY_TYPE: &str = "string";

/// Default synthetic element name for `nestedFields` without one.
pub const DEFAULT_NESTED_FIELD_NAME: &str = "id";

// ------------------------------ Type names -------------------------------- //

static TYPE_TABLE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("string", "STRING"),
        ("integer", "INT"),
        ("int", "INT"),
        ("long", "BIGINT"),
        ("bigint", "BIGINT"),
        ("short", "SMALLINT"),
        ("byte", "TINYINT"),
        ("float", "FLOAT"),
        ("double", "DOUBLE"),
        ("number", "DOUBLE"),
        ("boolean", "BOOLEAN"),
        ("date", "DATE"),
        ("datetime", "TIMESTAMP"),
        ("timestamp", "TIMESTAMP"),
        ("binary", "BINARY"),
        ("decimal", "DECIMAL(38,18)"),
    ])
});

static DECIMAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^decimal\((\d+)\s*,\s*(\d+)\)$").unwrap());

/// Normalize a source type name to its Spark DDL spelling. Parameterized
/// decimals keep their precision and scale; unknown names pass through
/// unchanged.
pub fn spark_type(name: &str) -> String {
    if let Some(mapped) = TYPE_TABLE.get(name) {
        return (*mapped).to_string();
    }
    if let Some(caps) = DECIMAL_RE.captures(name) {
        return format!("DECIMAL({},{})", &caps[1], &caps[2]);
    }
    name.to_string()
}

// ------------------------------- Comments --------------------------------- //

/// Single-quoted comment literal. The trailing space is part of the literal
/// shape; an absent doc renders as the empty literal.
pub fn comment_literal(doc: Option<&str>) -> String {
    match doc {
        None => "'' ".to_string(),
        Some(text) => {
            let escaped = text.replace('\\', "\\\\").replace('\'', "\\'");
            format!("'{escaped}' ")
        }
    }
}

/// Full comment clause for a column or field definition.
pub fn format_comment(doc: Option<&str>) -> String {
    format!("COMMENT {}", comment_literal(doc))
}

// -------------------------- Positional clauses ----------------------------- //

/// Placement request carried by an ADD column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Position {
    First,
    After(String),
}

impl Position {
    /// Reads a descriptor's `moveafter` value.
    pub fn from_moveafter(moveafter: &str) -> Self {
        if moveafter == "first" {
            Position::First
        } else {
            Position::After(moveafter.to_string())
        }
    }
}

/// Clause appended to a column definition; the sibling name is wrapped in a
/// single backtick pair as-is, never split on dots.
pub fn position_clause(position: Option<&Position>) -> String {
    match position {
        None => String::new(),
        Some(Position::First) => " FIRST".to_string(),
        Some(Position::After(name)) => format!(" AFTER `{name}`"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_type_names_are_mapped() {
        assert_eq!(spark_type("string"), "STRING");
        assert_eq!(spark_type("long"), "BIGINT");
        assert_eq!(spark_type("number"), "DOUBLE");
        assert_eq!(spark_type("datetime"), "TIMESTAMP");
        assert_eq!(spark_type("decimal"), "DECIMAL(38,18)");
    }

    #[test]
    fn parameterized_decimal_keeps_precision() {
        assert_eq!(spark_type("decimal(10,2)"), "DECIMAL(10,2)");
        assert_eq!(spark_type("decimal(38, 18)"), "DECIMAL(38,18)");
    }

    #[test]
    fn unknown_type_names_pass_through() {
        assert_eq!(spark_type("geometry"), "geometry");
        assert_eq!(spark_type("STRING"), "STRING");
    }

    #[test]
    fn comment_literal_escapes_and_keeps_trailing_space() {
        assert_eq!(comment_literal(None), "'' ");
        assert_eq!(comment_literal(Some("")), "'' ");
        assert_eq!(comment_literal(Some("it's")), "'it\\'s' ");
        assert_eq!(comment_literal(Some("a\\b")), "'a\\\\b' ");
        assert_eq!(format_comment(Some("doc")), "COMMENT 'doc' ");
    }

    #[test]
    fn position_clause_forms() {
        assert_eq!(position_clause(None), "");
        assert_eq!(position_clause(Some(&Position::First)), " FIRST");
        assert_eq!(
            position_clause(Some(&Position::After("prev".to_string()))),
            " AFTER `prev`"
        );
    }
}
