use indexmap::IndexMap;
use tracing::{debug, info};

use super::category;
use super::required::{field_required, parameter_required};
use super::returns::ReturnExtractor;
use super::sections::{FieldRow, ParameterRow, Section, SectionBody};
use super::types::TypeContext;
use crate::error::SchemaError;
use crate::schema::{Category, Field, Method, ObjectType, Parameter, SchemaDocument};
use crate::settings::Settings;

struct ObjectSection<'a> {
    section: &'a Section,
    rows: &'a [FieldRow],
}

struct MethodSection<'a> {
    section: &'a Section,
    rows: &'a [ParameterRow],
}

/// Build the schema from segmented sections.
///
/// Phase 1 registers every object and alias name, so fields may refer to
/// types documented further down (or to themselves). Phase 2 parses every
/// type against the complete registry.
pub fn assemble(
    sections: &[Section],
    returns: &ReturnExtractor,
    settings: &Settings,
) -> Result<SchemaDocument, SchemaError> {
    // Later definitions replace earlier ones but keep the first position.
    let mut objects: IndexMap<&str, ObjectSection> = IndexMap::new();
    let mut methods: IndexMap<&str, MethodSection> = IndexMap::new();
    let mut aliases: IndexMap<&str, &[String]> = IndexMap::new();
    for section in sections {
        let name = section.name.as_str();
        match &section.body {
            SectionBody::Object(rows) => {
                objects.insert(name, ObjectSection { section, rows });
            }
            SectionBody::Method(rows) => {
                methods.insert(name, MethodSection { section, rows });
            }
            SectionBody::Alias(members) => {
                aliases.insert(name, members);
            }
        }
    }

    // ── Phase 1: names and categories ──
    let mut ctx = TypeContext::default();
    let mut categories: IndexMap<&str, Category> = IndexMap::new();
    for name in objects.keys() {
        let category = category::resolve(name).map_err(|e| e.in_section(*name))?;
        ctx.register_object(name);
        categories.insert(name, category);
    }
    for (name, members) in &aliases {
        ctx.register_alias(name, members.to_vec());
    }
    debug!(objects = objects.len(), aliases = aliases.len(), "Registered type names");

    // ── Phase 2: types ──
    let mut schema = SchemaDocument::default();
    for (name, object) in &objects {
        let fields = object
            .rows
            .iter()
            .map(|row| build_field(row, &ctx).map_err(|e| e.in_section(format!("{}.{}", name, row.name))))
            .collect::<Result<Vec<_>, _>>()?;
        schema.objects.insert(
            name.to_string(),
            ObjectType {
                name: name.to_string(),
                documentation_link: settings.link_for(object.section.anchor.as_deref()),
                description: object.section.description(),
                fields,
                category: categories[name],
            },
        );
    }

    for (name, method) in &methods {
        let parameters = method
            .rows
            .iter()
            .map(|row| build_parameter(row, &ctx).map_err(|e| e.in_section(format!("{}.{}", name, row.name))))
            .collect::<Result<Vec<_>, _>>()?;
        let description = method.section.description();
        let return_type = returns
            .extract(name, &description, &ctx)
            .map_err(|e| e.in_section(*name))?;
        schema.methods.push(Method {
            name: name.to_string(),
            parameters,
            return_type,
            description,
            documentation_link: settings.link_for(method.section.anchor.as_deref()),
        });
    }

    info!(
        objects = schema.objects.len(),
        methods = schema.methods.len(),
        "Schema assembled"
    );
    Ok(schema)
}

fn build_field(row: &FieldRow, ctx: &TypeContext) -> Result<Field, SchemaError> {
    Ok(Field {
        name: row.name.clone(),
        type_ref: ctx.parse(&row.type_text)?,
        required: field_required(&row.description),
        description: row.description.clone(),
    })
}

fn build_parameter(row: &ParameterRow, ctx: &TypeContext) -> Result<Parameter, SchemaError> {
    Ok(Parameter {
        name: row.name.clone(),
        type_ref: ctx.parse(&row.type_text)?,
        required: parameter_required(&row.required_text, &row.description)?,
        description: row.description.clone(),
    })
}

// ── Tests ──
