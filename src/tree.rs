//! Explicit column tree built from the path index.
//!
//! The flat descriptor list implies a struct/array hierarchy; this module
//! makes it explicit. Builders are pure readers of the index plus the
//! driver's consumed-path set; they never mutate either.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::descriptor::FieldDescriptor;
use crate::dialect::{self, Position, DEFAULT_ARRAY_TYPE, DEFAULT_NESTED_FIELD_NAME};
use crate::index::PathIndex;
use crate::path::{FieldPath, PathSegment};

/// Rendered type of one column or struct member.
#[derive(Clone, Debug)]
pub enum ColumnType {
    /// Mapped DDL type text, ready to print.
    Primitive(String),
    /// Struct members in render order; empty prints as `struct<>`.
    Struct(Vec<ColumnField>),
    Array(ArrayElement),
}

/// What an array holds.
#[derive(Clone, Debug)]
pub enum ArrayElement {
    /// Verbatim element type text of a simple array.
    Simple(String),
    /// Element struct members in render order.
    Struct(Vec<ColumnField>),
}

/// One named member inside a struct or array-element body.
#[derive(Clone, Debug)]
pub struct ColumnField {
    pub name: String,
    pub ty: ColumnType,
    pub doc: Option<String>,
}

/// One top-level column definition: full dotted path, type tree, optional
/// placement request.
#[derive(Clone, Debug)]
pub struct TopColumn {
    pub path: FieldPath,
    pub ty: ColumnType,
    pub doc: Option<String>,
    pub position: Option<Position>,
}

// --------------------------- Direct children ------------------------------ //

/// Descriptor paths that render as direct members of `parent`'s struct body.
///
/// Three membership rules: a one-segment remainder is the member itself; a
/// two-segment remainder names its first segment as a member (kept even when
/// it has descendants of its own); a deeper remainder with an interior
/// `element` marker collapses to its first segment, the containing array.
/// A remainder starting with `element` is the parent's own array content and
/// never a struct member.
fn direct_children(
    index: &PathIndex,
    parent: &FieldPath,
    processed: &HashSet<FieldPath>,
) -> Vec<FieldPath> {
    let mut children: Vec<FieldPath> = Vec::new();
    for path in index.paths() {
        if path == parent || processed.contains(path) {
            continue;
        }
        let Some(remainder) = path.strip_prefix(parent) else {
            continue;
        };
        if remainder.is_empty() || remainder[0].is_element() {
            continue;
        }
        let candidate = if remainder.len() == 1 {
            Some(path.clone())
        } else if remainder.len() == 2
            || remainder[1..remainder.len() - 1]
                .iter()
                .any(PathSegment::is_element)
        {
            let first = parent.child(remainder[0].clone());
            index.descriptor(&first).is_some().then_some(first)
        } else {
            None
        };
        if let Some(candidate) = candidate {
            if !children.contains(&candidate) {
                children.push(candidate);
            }
        }
    }
    children
}

/// Direct children in render order: first-seen `childOrder` pass, stragglers
/// appended, then a stable sort by original insertion order.
fn ordered_children(
    index: &PathIndex,
    parent: &FieldPath,
    processed: &HashSet<FieldPath>,
) -> Vec<FieldPath> {
    let direct = direct_children(index, parent, processed);
    let mut ordered: Vec<FieldPath> = Vec::new();
    for segment in index.child_order(parent) {
        let candidate = parent.child(segment.clone());
        if direct.contains(&candidate) && !ordered.contains(&candidate) {
            ordered.push(candidate);
        }
    }
    for child in direct {
        if !ordered.contains(&child) {
            ordered.push(child);
        }
    }
    ordered.sort_by_key(|path| index.order_of(path).unwrap_or(usize::MAX));
    ordered
}

// ----------------------------- Struct bodies ------------------------------ //

/// Members of the struct at `parent`, fully built.
pub fn struct_fields(
    index: &PathIndex,
    parent: &FieldPath,
    processed: &HashSet<FieldPath>,
) -> Vec<ColumnField> {
    ordered_children(index, parent, processed)
        .into_iter()
        .filter_map(|child| {
            let descriptor = index.descriptor(&child)?;
            let name = child.last()?.as_str().to_string();
            Some(ColumnField {
                name,
                ty: field_type(index, &child, descriptor, processed),
                doc: descriptor.doc.clone(),
            })
        })
        .collect()
}

/// Kind dispatch for one descriptor.
fn field_type(
    index: &PathIndex,
    path: &FieldPath,
    descriptor: &FieldDescriptor,
    processed: &HashSet<FieldPath>,
) -> ColumnType {
    if descriptor.is_object() {
        ColumnType::Struct(struct_fields(index, path, processed))
    } else if descriptor.is_array() {
        ColumnType::Array(array_element(index, path, descriptor, processed))
    } else {
        ColumnType::Primitive(dialect::spark_type(&descriptor.value_kind))
    }
}

/// Array content: element struct when any of the three element sources
/// yields a member, simple array otherwise. A simple array's element type is
/// the descriptor's `arr_type` verbatim.
fn array_element(
    index: &PathIndex,
    path: &FieldPath,
    descriptor: &FieldDescriptor,
    processed: &HashSet<FieldPath>,
) -> ArrayElement {
    let fields = element_struct_fields(index, path, processed);
    if fields.is_empty() {
        ArrayElement::Simple(
            descriptor
                .arr_type
                .clone()
                .unwrap_or_else(|| DEFAULT_ARRAY_TYPE.to_string()),
        )
    } else {
        ArrayElement::Struct(fields)
    }
}

/// Members of an array's element struct, merged by name from three sources:
/// the array's `nestedFields` (always first), its registered depth-1 element
/// fields, and its registered nested arrays. First match per name wins;
/// the latter two sort by the original order of their descriptor path.
pub fn element_struct_fields(
    index: &PathIndex,
    array: &FieldPath,
    processed: &HashSet<FieldPath>,
) -> Vec<ColumnField> {
    // sort key: (source rank, original order); nestedFields pins rank 0
    let mut merged: IndexMap<String, (u8, usize, ColumnField)> = IndexMap::new();

    if let Some(nested) = index.descriptor(array).and_then(|d| d.nested_fields.as_ref()) {
        let name = nested
            .name
            .clone()
            .unwrap_or_else(|| DEFAULT_NESTED_FIELD_NAME.to_string());
        let ty = dialect::spark_type(nested.type_.as_deref().unwrap_or(DEFAULT_ARRAY_TYPE));
        merged.insert(
            name.clone(),
            (
                0,
                0,
                ColumnField {
                    name,
                    ty: ColumnType::Primitive(ty),
                    doc: nested.doc.clone(),
                },
            ),
        );
    }

    if let Some(fields) = index.element_fields(array) {
        for (name, field_ref) in fields {
            if merged.contains_key(name) {
                continue;
            }
            let order = index
                .order_of(&field_ref.path)
                .unwrap_or(field_ref.fallback_order);
            let ty = match index.descriptor(&field_ref.path) {
                Some(descriptor) => field_type(index, &field_ref.path, descriptor, processed),
                // only deeper paths revealed this name; render them as its
                // struct members
                None => ColumnType::Struct(struct_fields(index, &field_ref.path, processed)),
            };
            let doc = index
                .descriptor(&field_ref.path)
                .and_then(|d| d.doc.clone());
            merged.insert(
                name.clone(),
                (
                    1,
                    order,
                    ColumnField {
                        name: name.clone(),
                        ty,
                        doc,
                    },
                ),
            );
        }
    }

    for nested in index.nested_arrays(array) {
        let Some(name) = nested.last().map(|s| s.as_str().to_string()) else {
            continue;
        };
        if merged.contains_key(&name) {
            continue;
        }
        let order = index.order_of(nested).unwrap_or(usize::MAX);
        let fields = element_struct_fields(index, nested, processed);
        let element = if fields.is_empty() {
            ArrayElement::Simple(
                index
                    .descriptor(nested)
                    .and_then(|d| d.arr_type.clone())
                    .unwrap_or_else(|| DEFAULT_ARRAY_TYPE.to_string()),
            )
        } else {
            ArrayElement::Struct(fields)
        };
        let doc = index.descriptor(nested).and_then(|d| d.doc.clone());
        merged.insert(
            name.clone(),
            (
                1,
                order,
                ColumnField {
                    name,
                    ty: ColumnType::Array(element),
                    doc,
                },
            ),
        );
    }

    let mut fields: Vec<(u8, usize, ColumnField)> = merged.into_values().collect();
    fields.sort_by_key(|(rank, order, _)| (*rank, *order));
    fields.into_iter().map(|(_, _, field)| field).collect()
}

// --------------------------- Top-level columns ---------------------------- //

/// Build the column definition for one descriptor addressed by its full
/// dotted path, or `None` when the descriptor is (or will be) covered by an
/// ancestor: already consumed, under a consumed path, under an object-kinded
/// descriptor with descendants, or an element field of a consumed array.
pub fn dotted_column(
    index: &PathIndex,
    path: &FieldPath,
    processed: &HashSet<FieldPath>,
) -> Option<TopColumn> {
    let descriptor = index.descriptor(path)?;
    if processed.contains(path) {
        return None;
    }
    if let Some((container, _)) = path.split_first_element() {
        if processed.contains(&container) {
            return None;
        }
    }
    for ancestor in path.proper_ancestors() {
        if processed.contains(&ancestor) {
            return None;
        }
        if let Some(parent) = index.descriptor(&ancestor) {
            if parent.is_object() && index.has_descendants(&ancestor) {
                return None;
            }
        }
    }
    Some(TopColumn {
        path: path.clone(),
        ty: field_type(index, path, descriptor, processed),
        doc: descriptor.doc.clone(),
        position: descriptor.moveafter.as_deref().map(Position::from_moveafter),
    })
}
