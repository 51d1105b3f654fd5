#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;

use anyhow::Result;

use super::PipelineError;

/// One declared field of an operation's input or output shape.
pub struct Field {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

/// A closed, statically declared shape. Inputs are checked before any call to
/// the reasoning service is attempted; outputs are checked after receipt.
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [Field],
}

/// A named reasoning operation with its input and output contract.
pub struct Operation {
    pub name: &'static str,
    pub input: Schema,
    pub output: Schema,
}

impl Schema {
    /// Required input fields must be present, non-empty strings. Optional
    /// fields may be absent or empty, but must be strings when present.
    pub fn validate_input(&self, value: &serde_json::Value) -> Result<()> {
        let object = match value.as_object() {
            Some(object) => object,
            None => {
                return Err(PipelineError::Validation(format!(
                    "{} expects a JSON object",
                    self.name
                ))
                .into());
            }
        };

        for field in self.fields {
            match object.get(field.name) {
                None => {
                    if field.required {
                        return Err(PipelineError::Validation(format!(
                            "{} is missing required field '{}'",
                            self.name, field.name
                        ))
                        .into());
                    }
                }
                Some(entry) => {
                    let text = match entry.as_str() {
                        Some(text) => text,
                        None => {
                            return Err(PipelineError::Validation(format!(
                                "{} field '{}' must be a string",
                                self.name, field.name
                            ))
                            .into());
                        }
                    };

                    if field.required && text.trim().is_empty() {
                        return Err(PipelineError::Validation(format!(
                            "{} field '{}' must not be empty",
                            self.name, field.name
                        ))
                        .into());
                    }
                }
            }
        }

        return Ok(());
    }

    /// Outputs only need to be structurally sound. A missing or empty field is
    /// left for the caller to replace with its fallback text, never a null.
    pub fn validate_output(&self, value: &serde_json::Value) -> Result<()> {
        let object = match value.as_object() {
            Some(object) => object,
            None => {
                return Err(PipelineError::Service(format!(
                    "{} reply is not a JSON object",
                    self.name
                ))
                .into());
            }
        };

        for field in self.fields {
            if let Some(entry) = object.get(field.name) {
                if !entry.is_string() {
                    return Err(PipelineError::Service(format!(
                        "{} reply field '{}' is not a string",
                        self.name, field.name
                    ))
                    .into());
                }
            }
        }

        return Ok(());
    }
}
