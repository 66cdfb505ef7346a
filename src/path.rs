// Typed dotted paths. Paths are parsed once; no raw string re-splitting past
// this module.

use crate::error::DdlError;

/// Reserved segment naming an array's element type.
pub const ELEMENT_SEGMENT: &str = "element";

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Plain field name.
    Field(String),
    /// The `element` marker; one per array nesting level.
    Element,
}

impl PathSegment {
    pub fn field(name: impl Into<String>) -> Self {
        PathSegment::Field(name.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            PathSegment::Field(name) => name.as_str(),
            PathSegment::Element => ELEMENT_SEGMENT,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, PathSegment::Element)
    }
}

/// A dotted field path, e.g. `metrics.election.element.startDate`.
///
/// The empty path is the root (parent of every top-level field); it is never
/// produced by `parse`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    pub fn root() -> Self {
        FieldPath::default()
    }

    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        FieldPath { segments }
    }

    /// Parse dotted text. Blank input and empty segments (`a..b`, leading or
    /// trailing dots) are malformed.
    pub fn parse(text: &str) -> Result<Self, DdlError> {
        if text.trim().is_empty() {
            return Err(DdlError::MalformedDescriptor {
                path: text.to_string(),
                reason: "empty path".to_string(),
            });
        }
        let mut segments = Vec::new();
        for part in text.split('.') {
            if part.is_empty() {
                return Err(DdlError::MalformedDescriptor {
                    path: text.to_string(),
                    reason: "empty path segment".to_string(),
                });
            }
            if part == ELEMENT_SEGMENT {
                segments.push(PathSegment::Element);
            } else {
                segments.push(PathSegment::Field(part.to_string()));
            }
        }
        Ok(FieldPath { segments })
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn first(&self) -> Option<&PathSegment> {
        self.segments.first()
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// `self` with one more segment appended.
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        FieldPath { segments }
    }

    /// `self` with a run of segments appended.
    pub fn join(&self, tail: &[PathSegment]) -> Self {
        let mut segments = self.segments.clone();
        segments.extend_from_slice(tail);
        FieldPath { segments }
    }

    /// Proper prefixes, shortest first; excludes the root and `self`.
    pub fn proper_ancestors(&self) -> impl Iterator<Item = FieldPath> + '_ {
        (1..self.segments.len()).map(|n| FieldPath {
            segments: self.segments[..n].to_vec(),
        })
    }

    pub fn starts_with(&self, prefix: &FieldPath) -> bool {
        self.segments.len() >= prefix.segments.len()
            && self.segments[..prefix.segments.len()] == prefix.segments[..]
    }

    /// Strictly longer than `ancestor` and extends it segment for segment.
    pub fn is_descendant_of(&self, ancestor: &FieldPath) -> bool {
        self.segments.len() > ancestor.segments.len() && self.starts_with(ancestor)
    }

    /// Segments after `prefix`, when `self` extends it.
    pub fn strip_prefix(&self, prefix: &FieldPath) -> Option<&[PathSegment]> {
        if self.starts_with(prefix) {
            Some(&self.segments[prefix.segments.len()..])
        } else {
            None
        }
    }

    /// Split at the first `element` marker: (array path, remainder after the
    /// marker). `None` when the path has no marker.
    pub fn split_first_element(&self) -> Option<(FieldPath, &[PathSegment])> {
        let idx = self.segments.iter().position(PathSegment::is_element)?;
        Some((
            FieldPath {
                segments: self.segments[..idx].to_vec(),
            },
            &self.segments[idx + 1..],
        ))
    }

    pub fn contains_element(&self) -> bool {
        self.segments.iter().any(PathSegment::is_element)
    }

    /// Dotted text without quoting.
    pub fn dotted(&self) -> String {
        self.segments
            .iter()
            .map(PathSegment::as_str)
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Statement form: every segment individually backtick-wrapped,
    /// dot-joined. The `element` marker is quoted like any other segment.
    pub fn quoted(&self) -> String {
        self.segments
            .iter()
            .map(|segment| format!("`{}`", segment.as_str()))
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.dotted())
    }
}
