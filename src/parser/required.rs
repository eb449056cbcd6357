use crate::error::SchemaError;

/// Object fields are required unless their description opens with "Optional".
pub fn field_required(description: &str) -> bool {
    !description.starts_with("Optional")
}

/// Method parameters: a "Required" note in the description wins, otherwise the
/// marker column decides.
pub fn parameter_required(marker: &str, description: &str) -> Result<bool, SchemaError> {
    if description.contains("Required") {
        return Ok(true);
    }
    match marker {
        "Yes" | "True" => Ok(true),
        "Optional" | "No" => Ok(false),
        other => Err(SchemaError::UnexpectedRequired {
            text: other.to_string(),
        }),
    }
}
