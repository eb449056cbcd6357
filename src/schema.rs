use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Reference names that exist in generated code but never as documented objects.
pub const ABSTRACT_TYPES: [&str; 3] = [
    "AbstractInlineQueryResult",
    "AbstractInputMessageContent",
    "InputFileInterface",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Int,
    Float,
    Bool,
    String,
    Array,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TypeKind {
    Primitive { name: Primitive },
    Reference { name: String },
}

/// One alternative of a type expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeAlt {
    #[serde(flatten)]
    pub kind: TypeKind,
    pub collection: bool,
}

impl TypeAlt {
    pub fn primitive(name: Primitive) -> Self {
        TypeAlt {
            kind: TypeKind::Primitive { name },
            collection: false,
        }
    }

    /// Callers must have validated `name`; see `TypeContext::reference`.
    pub(crate) fn reference(name: &str) -> Self {
        TypeAlt {
            kind: TypeKind::Reference {
                name: name.to_string(),
            },
            collection: false,
        }
    }

    pub fn into_collection(mut self) -> Self {
        self.collection = true;
        self
    }
}

/// A type expression: a non-empty, ordered union of alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef(Vec<TypeAlt>);

impl TypeRef {
    pub fn from_alternatives(alternatives: Vec<TypeAlt>) -> Option<Self> {
        if alternatives.is_empty() {
            None
        } else {
            Some(TypeRef(alternatives))
        }
    }

    pub fn alternatives(&self) -> &[TypeAlt] {
        &self.0
    }

    pub fn into_alternatives(self) -> Vec<TypeAlt> {
        self.0
    }
}

/// Base type an object is generated under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    AbstractInlineQueryResult,
    AbstractInputMessageContent,
    AbstractObject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    pub required: bool,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectType {
    pub name: String,
    pub documentation_link: String,
    pub description: String,
    pub fields: Vec<Field>,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    pub required: bool,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: TypeRef,
    pub description: String,
    pub documentation_link: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemaDocument {
    pub objects: IndexMap<String, ObjectType>,
    pub methods: Vec<Method>,
}

impl SchemaDocument {
    /// Pretty JSON, keys in declaration order, non-ASCII left as-is.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }

    /// Serialize and write the artifact in one go. Returns the absolute path.
    pub fn write(&self, path: &Path) -> Result<PathBuf> {
        let json = self.to_json().context("Failed to serialize schema")?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        path.canonicalize()
            .with_context(|| format!("Failed to resolve {}", path.display()))
    }
}
