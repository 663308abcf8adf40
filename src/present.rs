//! Plain-text projection of resolved views.
//!
//! Stateless: every function reads a view tree and returns text. Fields
//! without values are left out; table cells keep their column and show `-`.

use std::fmt::{self, Write};

use crate::model::TypeSummary;
use crate::render::{EntityView, FieldView, TableView, ViewValue};
use crate::vocab;

const INDENT: &str = "  ";
const EMPTY: &str = "-";

/// One line per field, nested views indented below their field.
pub fn render_text(view: &EntityView) -> String {
    view.to_string()
}

impl fmt::Display for EntityView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_fields(f, &self.fields, 0)
    }
}

fn write_fields(out: &mut impl Write, fields: &[FieldView], level: usize) -> fmt::Result {
    let pad = INDENT.repeat(level);
    for field in fields.iter().filter(|f| !f.values.is_empty()) {
        let name = &field.property.name;
        let inline: Vec<String> = field.values.iter().filter_map(inline_text).collect();
        if inline.is_empty() {
            writeln!(out, "{pad}{name}:")?;
        } else {
            writeln!(out, "{pad}{name}: {}", inline.join(", "))?;
        }
        for value in &field.values {
            match value {
                ViewValue::Nested(nested) => write_fields(out, &nested.fields, level + 1)?,
                ViewValue::Table(table) => write_table(out, table, level + 1)?,
                _ => {}
            }
        }
    }
    Ok(())
}

fn inline_text(value: &ViewValue) -> Option<String> {
    match value {
        ViewValue::Literal { text, .. } => Some(text.clone()),
        ViewValue::Label { label, .. } => Some(label.clone()),
        ViewValue::Nested(_) | ViewValue::Table(_) => None,
    }
}

/// Short text of a value inside a table cell.
fn cell_text(value: &ViewValue) -> String {
    match value {
        ViewValue::Nested(view) => vocab::local_name(&view.entity).to_string(),
        ViewValue::Table(table) => format!("{} rows", table.rows.len()),
        other => inline_text(other).unwrap_or_default(),
    }
}

fn write_table(out: &mut impl Write, table: &TableView, level: usize) -> fmt::Result {
    let pad = INDENT.repeat(level);
    let header: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
    writeln!(out, "{pad}| {} |", header.join(" | "))?;
    for row in &table.rows {
        if row.fallback.is_some() {
            writeln!(out, "{pad}| {} |", vocab::local_name(&row.entity))?;
            continue;
        }
        let cells: Vec<String> = row
            .cells
            .iter()
            .map(|cell| match cell.values.as_slice() {
                [] => EMPTY.to_string(),
                values => values.iter().map(cell_text).collect::<Vec<_>>().join(", "),
            })
            .collect();
        writeln!(out, "{pad}| {} |", cells.join(" | "))?;
    }
    Ok(())
}

/// `Root > Parent > Current`.
pub fn breadcrumb(ancestors: &[TypeSummary], current: &TypeSummary) -> String {
    ancestors
        .iter()
        .chain(std::iter::once(current))
        .map(|t| t.label.as_str())
        .collect::<Vec<_>>()
        .join(" > ")
}
