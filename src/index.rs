//! Single-pass index over a flat ADD descriptor list.
//!
//! One sweep over the input yields every lookup the tree build needs:
//! - descriptor map in insertion order (the index doubles as original order),
//! - top-level list (first descriptor per unseen top segment),
//! - first-seen child order per parent prefix,
//! - element-field registry per array path, each name bound to its canonical
//!   `array.element.name` path plus a fallback order,
//! - nested-array registry, followed through `element` chains to arbitrary
//!   depth.
//!
//! Join of duplicate paths keeps the first position and the last descriptor.

use std::collections::HashSet;

use indexmap::IndexMap;
use log::debug;

use crate::descriptor::FieldDescriptor;
use crate::error::DdlError;
use crate::path::{FieldPath, PathSegment};

/// One depth-1 element field of an array.
#[derive(Clone, Debug)]
pub struct ElementFieldRef {
    /// Canonical descriptor path `array.element.<name>`; may be absent from
    /// the descriptor map when only deeper paths revealed the name.
    pub path: FieldPath,
    /// Order of the first descriptor that revealed the name, used when the
    /// canonical path has no descriptor of its own.
    pub fallback_order: usize,
}

#[derive(Clone, Debug, Default)]
pub struct PathIndex {
    entries: IndexMap<FieldPath, FieldDescriptor>,
    top_level: Vec<FieldPath>,
    child_order: IndexMap<FieldPath, Vec<PathSegment>>,
    element_fields: IndexMap<FieldPath, IndexMap<String, ElementFieldRef>>,
    nested_arrays: IndexMap<FieldPath, Vec<FieldPath>>,
}

impl PathIndex {
    /// Index the descriptor list. Fails fast on a blank path or value kind,
    /// before any rendering.
    pub fn build(descriptors: &[FieldDescriptor]) -> Result<PathIndex, DdlError> {
        let mut index = PathIndex::default();
        let mut seen_roots: HashSet<PathSegment> = HashSet::new();

        for (order, descriptor) in descriptors.iter().enumerate() {
            if descriptor.value_kind.trim().is_empty() {
                return Err(DdlError::MalformedDescriptor {
                    path: descriptor.path.clone(),
                    reason: "empty value kind".to_string(),
                });
            }
            let path = FieldPath::parse(&descriptor.path)?;

            index.entries.insert(path.clone(), descriptor.clone());

            let root = path.segments()[0].clone();
            if seen_roots.insert(root) {
                index.top_level.push(path.clone());
            }

            for depth in 0..path.len() {
                let parent = FieldPath::from_segments(path.segments()[..depth].to_vec());
                let segment = path.segments()[depth].clone();
                let children = index.child_order.entry(parent).or_default();
                if !children.contains(&segment) {
                    children.push(segment);
                }
            }

            if let Some((container, remainder)) = path.split_first_element() {
                index.register_element_chain(&container, remainder, order, &path);
            }
        }

        Ok(index)
    }

    /// Register the element chain of one descriptor path. `remainder` holds
    /// the segments after `container`'s first `element` marker; a further
    /// marker inside it names a nested array, recursed into until the chain
    /// bottoms out.
    fn register_element_chain(
        &mut self,
        container: &FieldPath,
        remainder: &[PathSegment],
        order: usize,
        full_path: &FieldPath,
    ) {
        let Some(first) = remainder.first() else {
            debug!("ignoring trailing element marker in {full_path}");
            return;
        };
        if first.is_element() {
            debug!("ignoring doubled element marker in {full_path}");
            return;
        }

        match remainder.iter().position(PathSegment::is_element) {
            None => {
                let name = first.as_str().to_string();
                let fields = self.element_fields.entry(container.clone()).or_default();
                if !fields.contains_key(&name) {
                    let canonical = container
                        .child(PathSegment::Element)
                        .child(first.clone());
                    fields.insert(
                        name,
                        ElementFieldRef {
                            path: canonical,
                            fallback_order: order,
                        },
                    );
                }
            }
            Some(next) => {
                let nested = container
                    .child(PathSegment::Element)
                    .join(&remainder[..next]);
                let arrays = self.nested_arrays.entry(container.clone()).or_default();
                if !arrays.contains(&nested) {
                    arrays.push(nested.clone());
                }
                self.register_element_chain(&nested, &remainder[next + 1..], order, full_path);
            }
        }
    }

    // ------------------------------ Lookups ------------------------------- //

    pub fn descriptor(&self, path: &FieldPath) -> Option<&FieldDescriptor> {
        self.entries.get(path)
    }

    /// Insertion index of a descriptor path; the stable ordering key.
    pub fn order_of(&self, path: &FieldPath) -> Option<usize> {
        self.entries.get_index_of(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &FieldPath> {
        self.entries.keys()
    }

    /// First descriptor per unseen top-level segment, in input order. Entries
    /// may themselves be dotted paths when a child appeared before its root.
    pub fn top_level(&self) -> &[FieldPath] {
        &self.top_level
    }

    /// First-seen immediate child segments of a parent prefix.
    pub fn child_order(&self, parent: &FieldPath) -> &[PathSegment] {
        self.child_order
            .get(parent)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn element_fields(&self, array: &FieldPath) -> Option<&IndexMap<String, ElementFieldRef>> {
        self.element_fields.get(array)
    }

    pub fn nested_arrays(&self, array: &FieldPath) -> &[FieldPath] {
        self.nested_arrays
            .get(array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether any descriptor path lies strictly below `path`.
    pub fn has_descendants(&self, path: &FieldPath) -> bool {
        self.entries.keys().any(|p| p.is_descendant_of(path))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
