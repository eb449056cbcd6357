use thiserror::Error;

/// Every way the documentation can fail to map onto the schema.
///
/// All of these abort the run; the only place parse failures are tolerated is
/// the per-candidate loop in `parser::returns`.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("unexpected type: {text}")]
    UnexpectedType { text: String },

    #[error("unexpected required marker: {text}")]
    UnexpectedRequired { text: String },

    #[error("cannot determine category of type: {name}")]
    UnresolvableCategory { name: String },

    #[error("no return type found in description of `{method}`")]
    NoReturnType { method: String },

    #[error("no documentation tables matched `{selector}`")]
    NoTables { selector: String },

    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("in `{section}`: {source}")]
    InSection {
        section: String,
        #[source]
        source: Box<SchemaError>,
    },
}

impl SchemaError {
    pub fn unexpected_type(text: &str) -> Self {
        SchemaError::UnexpectedType {
            text: text.to_string(),
        }
    }

    /// Attach the object/method (and field/parameter) the failure came from.
    pub fn in_section(self, section: impl Into<String>) -> Self {
        SchemaError::InSection {
            section: section.into(),
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
impl SchemaError {
    /// The innermost error, with location wrappers peeled off.
    pub fn root(&self) -> &SchemaError {
        match self {
            SchemaError::InSection { source, .. } => source.root(),
            other => other,
        }
    }
}
