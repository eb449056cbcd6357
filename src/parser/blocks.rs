use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::error::SchemaError;

static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static HEADER_CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th").unwrap());
static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());
static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());
static ITEM: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li").unwrap());

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading {
        level: u8,
        text: String,
        anchor: Option<String>,
    },
    /// Data rows only; header rows are already dropped.
    Table { rows: Vec<Vec<String>> },
    List {
        html: String,
        /// Item texts, filled only when every item is a single link.
        links: Vec<String>,
    },
    Fragment { html: String },
}

/// Flatten the documentation container into blocks, in source order.
///
/// The container is the parent of the first table matching `table_selector`;
/// everything the segmenter needs lives among its children.
pub fn classify_document(html: &str, table_selector: &str) -> Result<Vec<Block>, SchemaError> {
    let tables = Selector::parse(table_selector).map_err(|e| SchemaError::InvalidSelector {
        selector: table_selector.to_string(),
        reason: e.to_string(),
    })?;
    let document = Html::parse_document(html);

    let container = document
        .select(&tables)
        .next()
        .and_then(|t| t.parent())
        .and_then(ElementRef::wrap)
        .ok_or_else(|| SchemaError::NoTables {
            selector: table_selector.to_string(),
        })?;

    Ok(container
        .children()
        .filter_map(ElementRef::wrap)
        .map(|el| classify_element(el, &tables))
        .collect())
}

fn classify_element(el: ElementRef, tables: &Selector) -> Block {
    let name = el.value().name();

    if let Some(level) = heading_level(name) {
        return Block::Heading {
            level,
            text: collapse(el.text()),
            anchor: el
                .select(&LINK)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(str::to_string),
        };
    }

    if tables.matches(&el) {
        return Block::Table {
            rows: table_rows(el),
        };
    }

    match name {
        "ul" | "ol" => Block::List {
            html: el.inner_html(),
            links: link_items(el),
        },
        _ => Block::Fragment {
            html: el.inner_html(),
        },
    }
}

fn heading_level(tag: &str) -> Option<u8> {
    match tag.as_bytes() {
        [b'h', d @ b'1'..=b'6'] => Some(d - b'0'),
        _ => None,
    }
}

fn table_rows(table: ElementRef) -> Vec<Vec<String>> {
    let rows: Vec<ElementRef> = table.select(&ROW).collect();
    let has_header_cells = rows.iter().any(|r| r.select(&HEADER_CELL).next().is_some());

    rows.into_iter()
        .enumerate()
        .filter(|(i, row)| {
            if has_header_cells {
                row.select(&HEADER_CELL).next().is_none()
            } else {
                *i != 0
            }
        })
        .map(|(_, row)| row.select(&CELL).map(|td| collapse(td.text())).collect())
        .collect()
}

fn link_items(list: ElementRef) -> Vec<String> {
    let mut links = Vec::new();
    for item in list.select(&ITEM) {
        let mut anchors = item.select(&LINK);
        let (Some(a), None) = (anchors.next(), anchors.next()) else {
            return Vec::new();
        };
        let text = collapse(a.text());
        if text.is_empty() || text != collapse(item.text()) {
            return Vec::new();
        }
        links.push(text);
    }
    links
}

/// Join text nodes and squeeze runs of whitespace to single spaces.
pub fn collapse<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Tests ──
