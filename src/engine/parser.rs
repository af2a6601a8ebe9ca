use std::collections::HashSet;

use crate::error::AppError;
use crate::models::FieldDescriptor;

/// Parse a completion into field descriptors.
///
/// The text must be a bare JSON array: no code fences, no prose, no
/// recovery. Each element's `rowIndex` is set to its position. Names must
/// be unique, since they are the only way to address a field afterwards.
pub fn parse_generated_fields(text: &str) -> Result<Vec<FieldDescriptor>, AppError> {
    let mut fields: Vec<FieldDescriptor> = serde_json::from_str(text.trim())?;

    let mut seen = HashSet::with_capacity(fields.len());
    for (index, field) in fields.iter_mut().enumerate() {
        if !seen.insert(field.name.clone()) {
            return Err(AppError::Provider(format!(
                "completion repeats field name '{}'",
                field.name
            )));
        }
        field.row_index = index;
    }
    Ok(fields)
}
