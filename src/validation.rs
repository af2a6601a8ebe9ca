use crate::error::AppError;

pub fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Config(format!("{field} cannot be empty")));
    }
    Ok(())
}

pub fn require_positive(field: &str, value: u32) -> Result<(), AppError> {
    if value == 0 {
        return Err(AppError::Config(format!("{field} must be greater than zero")));
    }
    Ok(())
}

/// An interface definition is present unless it is missing or a falsy
/// JSON scalar: `null`, `false`, zero or the empty string.
///
/// Whitespace-only strings, empty objects and empty arrays count as present.
pub fn has_interface_definition(definition: Option<&serde_json::Value>) -> bool {
    use serde_json::Value;

    match definition {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}
