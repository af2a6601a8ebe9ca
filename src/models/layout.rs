use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::field::FieldDescriptor;

/// One row of the form: a single field, or several fields laid out side by side.
///
/// On the wire a group is a JSON array of descriptors and a field is an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum FieldOrGroup {
    Group(Vec<FieldDescriptor>),
    Field(FieldDescriptor),
}

impl FieldOrGroup {
    /// Fields of this row in render order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        match self {
            FieldOrGroup::Field(f) => std::slice::from_ref(f),
            FieldOrGroup::Group(g) => g,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, FieldOrGroup::Group(_))
    }
}

impl From<FieldDescriptor> for FieldOrGroup {
    fn from(f: FieldDescriptor) -> Self {
        FieldOrGroup::Field(f)
    }
}

/// Location of a descriptor in the two-level tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum FieldPath {
    /// A top-level field.
    Top { index: usize },
    /// Field `inner` of the group at `index`.
    Grouped { index: usize, inner: usize },
}

impl FieldPath {
    /// Index sequence from the root, one entry per nesting level.
    pub fn indices(&self) -> Vec<usize> {
        match *self {
            FieldPath::Top { index } => vec![index],
            FieldPath::Grouped { index, inner } => vec![index, inner],
        }
    }

    /// Index of the top-level row this path lives in.
    pub fn row(&self) -> usize {
        match *self {
            FieldPath::Top { index } | FieldPath::Grouped { index, .. } => index,
        }
    }
}

/// Every descriptor in depth-first order, with its path.
pub fn iter_fields(tree: &[FieldOrGroup]) -> impl Iterator<Item = (FieldPath, &FieldDescriptor)> {
    tree.iter().enumerate().flat_map(|(index, item)| {
        let entries: Vec<(FieldPath, &FieldDescriptor)> = match item {
            FieldOrGroup::Field(f) => vec![(FieldPath::Top { index }, f)],
            FieldOrGroup::Group(g) => g
                .iter()
                .enumerate()
                .map(|(inner, f)| (FieldPath::Grouped { index, inner }, f))
                .collect(),
        };
        entries
    })
}

/// Descriptor addressed by `path`, if any.
pub fn field_at<'a>(tree: &'a [FieldOrGroup], path: &FieldPath) -> Option<&'a FieldDescriptor> {
    match (*path, tree.get(path.row())?) {
        (FieldPath::Top { .. }, FieldOrGroup::Field(f)) => Some(f),
        (FieldPath::Grouped { inner, .. }, FieldOrGroup::Group(g)) => g.get(inner),
        _ => None,
    }
}
