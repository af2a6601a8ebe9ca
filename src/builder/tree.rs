//! Pure operations on the two-level field tree.
//!
//! Every edit returns a new tree and leaves its input untouched, so callers
//! can keep previous states around.

use crate::error::AppError;
use crate::models::{field_at, iter_fields, FieldDescriptor, FieldOrGroup, FieldPatch, FieldPath};

/// Depth-first search for the first descriptor named `name`.
pub fn find_field_path(tree: &[FieldOrGroup], name: &str) -> Option<FieldPath> {
    iter_fields(tree)
        .find(|(_, field)| field.name == name)
        .map(|(path, _)| path)
}

pub fn contains_name(tree: &[FieldOrGroup], name: &str) -> bool {
    find_field_path(tree, name).is_some()
}

fn slot_mut<'a>(
    tree: &'a mut [FieldOrGroup],
    path: &FieldPath,
) -> Option<&'a mut FieldDescriptor> {
    match (*path, tree.get_mut(path.row())?) {
        (FieldPath::Top { .. }, FieldOrGroup::Field(f)) => Some(f),
        (FieldPath::Grouped { inner, .. }, FieldOrGroup::Group(g)) => g.get_mut(inner),
        _ => None,
    }
}

fn no_field_at(path: &FieldPath) -> AppError {
    AppError::NotFound(format!("no field at path {:?}", path.indices()))
}

/// Copy of `tree` with the descriptor at `path` replaced by `merge(old, patch)`.
///
/// Renaming onto a name held by another field is rejected.
pub fn updated_tree(
    tree: &[FieldOrGroup],
    path: &FieldPath,
    patch: &FieldPatch,
) -> Result<Vec<FieldOrGroup>, AppError> {
    let mut next = tree.to_vec();
    let slot = slot_mut(&mut next, path).ok_or_else(|| no_field_at(path))?;

    if let Some(ref name) = patch.name {
        let taken = iter_fields(tree).any(|(p, f)| p != *path && f.name == *name);
        if taken {
            return Err(AppError::InvalidInput(format!(
                "field name '{name}' is already in use"
            )));
        }
    }

    *slot = slot.merged(patch);
    Ok(next)
}

/// Set every field's `rowIndex` to the top-level row it sits in.
pub fn renumber_rows(tree: &mut [FieldOrGroup]) {
    for (row, item) in tree.iter_mut().enumerate() {
        match item {
            FieldOrGroup::Field(f) => f.row_index = row,
            FieldOrGroup::Group(g) => g.iter_mut().for_each(|f| f.row_index = row),
        }
    }
}

/// Copy of `tree` without the descriptor at `path`, plus the removed descriptor.
///
/// A group emptied by the removal disappears with it.
pub fn tree_without(
    tree: &[FieldOrGroup],
    path: &FieldPath,
) -> Result<(Vec<FieldOrGroup>, FieldDescriptor), AppError> {
    let removed = field_at(tree, path).cloned().ok_or_else(|| no_field_at(path))?;
    let mut next = tree.to_vec();

    match *path {
        FieldPath::Top { index } => {
            next.remove(index);
        }
        FieldPath::Grouped { index, inner } => {
            let emptied = match &mut next[index] {
                FieldOrGroup::Group(g) => {
                    g.remove(inner);
                    g.is_empty()
                }
                FieldOrGroup::Field(_) => false,
            };
            if emptied {
                next.remove(index);
            }
        }
    }
    renumber_rows(&mut next);

    Ok((next, removed))
}

/// Copy of `tree` with the row at `from` moved to position `to`.
pub fn tree_with_moved_row(
    tree: &[FieldOrGroup],
    from: usize,
    to: usize,
) -> Result<Vec<FieldOrGroup>, AppError> {
    if from >= tree.len() || to >= tree.len() {
        return Err(AppError::NotFound(format!(
            "cannot move row {from} to {to} in a form of {} rows",
            tree.len()
        )));
    }
    let mut next = tree.to_vec();
    let row = next.remove(from);
    next.insert(to, row);
    renumber_rows(&mut next);
    Ok(next)
}
