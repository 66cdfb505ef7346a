//! Serde model for evolution documents.
//!
//! Design goals:
//! - Closed enums for the operation tag and REPLACE target: unknown values
//!   fail at parse instead of silently producing nothing.
//! - Tolerant field spellings (`value`/`valueKind`, `arr_type`/`arrType`) and
//!   the legacy `"None"` marker for an absent `nestedFields`.

use serde::Deserialize;

/// Kind name introducing a struct column.
pub const OBJECT_KIND: &str = "object";

/// Kind name introducing an array column.
pub const ARRAY_KIND: &str = "array";

/// One operation group of an evolution document.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "operation", content = "columns")]
pub enum Operation {
    #[serde(rename = "ADD")]
    Add(Vec<FieldDescriptor>),
    #[serde(rename = "REMOVE")]
    Remove(Vec<String>),
    #[serde(rename = "MOVE")]
    Move(Vec<MoveColumn>),
    #[serde(rename = "REORDER")]
    Reorder(Vec<ReorderColumn>),
    #[serde(rename = "REPLACE")]
    Replace(Vec<ReplaceColumn>),
}

/// Flat ADD descriptor: one logical field identified by its dotted path.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FieldDescriptor {
    pub path: String,

    /// Primitive type name, `object`, or `array`.
    #[serde(rename = "value", alias = "valueKind")]
    pub value_kind: String,

    /// Element type of a simple array; emitted verbatim.
    #[serde(rename = "arr_type", alias = "arrType", default)]
    pub arr_type: Option<String>,

    /// Single synthetic element of an array whose elements are one named
    /// simple value rather than a full struct.
    #[serde(
        rename = "nestedFields",
        default,
        deserialize_with = "de_nested_fields"
    )]
    pub nested_fields: Option<NestedField>,

    #[serde(default)]
    pub doc: Option<String>,

    /// Placement request: `"first"` or a sibling name.
    #[serde(default)]
    pub moveafter: Option<String>,
}

impl FieldDescriptor {
    pub fn is_object(&self) -> bool {
        self.value_kind == OBJECT_KIND
    }

    pub fn is_array(&self) -> bool {
        self.value_kind == ARRAY_KIND
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct NestedField {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub type_: Option<String>,
    #[serde(default)]
    pub doc: Option<String>,
}

impl NestedField {
    fn is_blank(&self) -> bool {
        self.name.is_none() && self.type_.is_none() && self.doc.is_none()
    }
}

/// JSON `null`, the legacy literal string `"None"`, and an empty object all
/// mean "no nested fields".
fn de_nested_fields<'de, D>(deserializer: D) -> Result<Option<NestedField>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Marker(Option<String>),
        Fields(NestedField),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Marker(None) => Ok(None),
        Raw::Marker(Some(text)) if text == "None" => Ok(None),
        Raw::Marker(Some(text)) => Err(serde::de::Error::custom(format!(
            "invalid nestedFields marker {text:?}; expected an object, null, or \"None\""
        ))),
        Raw::Fields(fields) if fields.is_blank() => Ok(None),
        Raw::Fields(fields) => Ok(Some(fields)),
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct MoveColumn {
    pub path: String,
    /// New column name.
    pub value: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ReorderColumn {
    pub path: String,
    /// `"first"` or the sibling to follow.
    #[serde(default)]
    pub moveafter: Option<String>,
    /// Explicit target path; preferred over `moveafter` when both are given.
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ReplaceColumn {
    pub path: String,
    pub target_field: TargetField,
    pub value: String,
}

/// What a REPLACE column rewrites.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetField {
    Description,
    Comment,
    Type,
    Name,
}
