//! Field paths reported by validation errors.

use std::fmt;

/// One step from a parent value to a child value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object field
    Field(String),
    /// Array element
    Index(usize),
}

/// Location of a value inside a larger value, rendered as `metrics[2].status`.
///
/// The empty path (the root value) renders as `$`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// Creates the root path.
    pub fn root() -> Self {
        Self::default()
    }

    /// Descends into an object field.
    pub fn push_field(&mut self, name: &str) {
        self.segments.push(PathSegment::Field(name.to_string()));
    }

    /// Descends into an array element.
    pub fn push_index(&mut self, index: usize) {
        self.segments.push(PathSegment::Index(index));
    }

    /// Returns to the parent value.
    pub fn pop(&mut self) {
        self.segments.pop();
    }

    /// Returns true for the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments from the root down.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("$");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if i == 0 => f.write_str(name)?,
                PathSegment::Field(name) => write!(f, ".{}", name)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}
