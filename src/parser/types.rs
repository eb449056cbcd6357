use indexmap::{IndexMap, IndexSet};

use crate::error::SchemaError;
use crate::schema::{Primitive, TypeAlt, TypeRef, ABSTRACT_TYPES};

/// Exact cell texts with a fixed meaning. Checked before any splitting, so
/// `Integer or String` stays a single string instead of becoming a union.
const LITERALS: &[(&str, Primitive, bool)] = &[
    ("Float", Primitive::Float, false),
    ("Float number", Primitive::Float, false),
    ("Integer", Primitive::Int, false),
    ("Int", Primitive::Int, false),
    ("True", Primitive::Bool, false),
    ("Boolean", Primitive::Bool, false),
    ("CallbackGame", Primitive::Array, false),
    ("Array", Primitive::Array, false),
    ("String", Primitive::String, false),
    ("Integer or String", Primitive::String, false),
    ("Array of String", Primitive::String, true),
];

const MARKERS: &[(&str, &str)] = &[
    ("InputFile", "InputFileInterface"),
    ("InlineQueryResult", "AbstractInlineQueryResult"),
    ("InputMessageContent", "AbstractInputMessageContent"),
];

const COLLECTION_PREFIX: &str = "Array of ";

/// Names a type expression may refer to. Only ever grows.
#[derive(Debug, Default, Clone)]
pub struct TypeContext {
    objects: IndexSet<String>,
    aliases: IndexMap<String, Vec<String>>,
}

impl TypeContext {
    pub fn register_object(&mut self, name: &str) {
        self.objects.insert(name.to_string());
    }

    pub fn register_alias(&mut self, name: &str, members: Vec<String>) {
        self.aliases.insert(name.to_string(), members);
    }

    pub fn is_object(&self, name: &str) -> bool {
        self.objects.contains(name)
    }

    /// Registered object whose lowercased name is `anchor` (`#message` → `Message`).
    pub fn object_for_anchor(&self, anchor: &str) -> Option<&str> {
        let anchor = anchor.trim_start_matches('#');
        self.objects
            .iter()
            .find(|name| name.eq_ignore_ascii_case(anchor))
            .map(String::as_str)
    }

    /// A named reference, rejected unless it is registered or one of the abstract bases.
    pub fn reference(&self, name: &str) -> Result<TypeAlt, SchemaError> {
        if self.is_object(name) || ABSTRACT_TYPES.contains(&name) {
            Ok(TypeAlt::reference(name))
        } else {
            Err(SchemaError::unexpected_type(name))
        }
    }

    pub fn parse(&self, text: &str) -> Result<TypeRef, SchemaError> {
        let alternatives = self.parse_alternatives(text.trim())?;
        TypeRef::from_alternatives(alternatives).ok_or_else(|| SchemaError::unexpected_type(text))
    }

    fn parse_alternatives(&self, text: &str) -> Result<Vec<TypeAlt>, SchemaError> {
        if let Some((_, primitive, collection)) = LITERALS.iter().find(|(lit, ..)| *lit == text) {
            let alt = TypeAlt::primitive(*primitive);
            return Ok(vec![if *collection { alt.into_collection() } else { alt }]);
        }

        let divider = if text.contains(" or ") {
            Some(" or ")
        } else if text.contains(" and ") {
            Some(" and ")
        } else {
            None
        };
        if let Some(divider) = divider {
            let mut alternatives = Vec::new();
            for piece in text.split(divider) {
                alternatives.extend(self.parse_alternatives(piece.trim())?);
            }
            return Ok(alternatives);
        }

        if let Some(inner) = text.strip_prefix(COLLECTION_PREFIX) {
            return Ok(self
                .parse_alternatives(inner.trim())?
                .into_iter()
                .map(TypeAlt::into_collection)
                .collect());
        }

        if let Some((_, target)) = MARKERS.iter().find(|(marker, _)| *marker == text) {
            return Ok(vec![TypeAlt::reference(target)]);
        }

        if let Some(members) = self.aliases.get(text) {
            return members.iter().map(|m| self.reference(m)).collect();
        }

        self.reference(text).map(|alt| vec![alt])
    }
}

// ── Tests ──
