use tracing::debug;

use super::blocks::Block;

#[derive(Debug, Clone, PartialEq)]
pub struct FieldRow {
    pub name: String,
    pub type_text: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterRow {
    pub name: String,
    pub type_text: String,
    pub required_text: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionBody {
    Object(Vec<FieldRow>),
    Method(Vec<ParameterRow>),
    /// Table-less type that stands for one of several objects.
    Alias(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub name: String,
    pub anchor: Option<String>,
    /// HTML fragments between the heading and the table, in reading order.
    pub descriptions: Vec<String>,
    pub body: SectionBody,
}

impl Section {
    pub fn description(&self) -> String {
        self.descriptions.join("\n")
    }
}

struct Pending {
    name: String,
    anchor: Option<String>,
    descriptions: Vec<String>,
    alias: Vec<String>,
    had_table: bool,
}

/// Pair every table with its heading and the fragments in between.
pub fn cluster_sections(blocks: &[Block], heading_level: u8) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Option<Pending> = None;

    for block in blocks {
        match block {
            Block::Heading { level, text, anchor } => {
                if let Some(done) = current.take() {
                    sections.extend(close_tableless(done));
                }
                if *level == heading_level {
                    current = Some(Pending {
                        name: text.clone(),
                        anchor: anchor.clone(),
                        descriptions: Vec::new(),
                        alias: Vec::new(),
                        had_table: false,
                    });
                }
            }
            Block::Table { rows } => match current.as_mut() {
                Some(pending) => {
                    sections.push(table_section(pending, rows));
                    pending.descriptions.clear();
                    pending.had_table = true;
                }
                None => debug!("Skipping table with no preceding heading ({} rows)", rows.len()),
            },
            Block::List { html, links } => {
                if let Some(pending) = current.as_mut() {
                    pending.descriptions.push(html.clone());
                    if pending.alias.is_empty() {
                        pending.alias = links.clone();
                    }
                }
            }
            Block::Fragment { html } => {
                if let Some(pending) = current.as_mut() {
                    pending.descriptions.push(html.clone());
                }
            }
        }
    }

    if let Some(done) = current.take() {
        sections.extend(close_tableless(done));
    }

    sections
}

pub fn is_object_name(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

fn table_section(pending: &Pending, rows: &[Vec<String>]) -> Section {
    let body = if is_object_name(&pending.name) {
        SectionBody::Object(
            rows.iter()
                .map(|r| FieldRow {
                    name: cell(r, 0),
                    type_text: cell(r, 1),
                    description: cell(r, 2),
                })
                .collect(),
        )
    } else {
        SectionBody::Method(
            rows.iter()
                .map(|r| ParameterRow {
                    name: cell(r, 0),
                    type_text: cell(r, 1),
                    required_text: cell(r, 2),
                    description: cell(r, 3),
                })
                .collect(),
        )
    };

    Section {
        name: pending.name.clone(),
        anchor: pending.anchor.clone(),
        descriptions: pending.descriptions.clone(),
        body,
    }
}

/// Sections without a table: aliases, fieldless objects and parameterless methods.
/// Prose headings ("Making requests") are dropped.
fn close_tableless(pending: Pending) -> Option<Section> {
    if pending.had_table || !is_identifier(&pending.name) {
        return None;
    }
    let body = if !is_object_name(&pending.name) {
        SectionBody::Method(Vec::new())
    } else if !pending.alias.is_empty() {
        SectionBody::Alias(pending.alias)
    } else {
        SectionBody::Object(Vec::new())
    };
    Some(Section {
        name: pending.name,
        anchor: pending.anchor,
        descriptions: pending.descriptions,
        body,
    })
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn cell(row: &[String], idx: usize) -> String {
    row.get(idx).cloned().unwrap_or_default()
}

// ── Tests ──
