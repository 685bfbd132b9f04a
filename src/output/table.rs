//! Table output

use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

/// One labelled value in a two-column detail table
#[derive(Debug, Tabled)]
pub struct FieldRow {
    #[tabled(rename = "FIELD")]
    pub field: String,
    #[tabled(rename = "VALUE")]
    pub value: String,
}

impl FieldRow {
    pub fn new(field: &str, value: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            value: value.into(),
        }
    }
}

/// Rounded table with centered headers, or `empty` when there are no rows
pub fn format_table<T: Tabled>(rows: &[T], empty: &str) -> String {
    if rows.is_empty() {
        return empty.to_string();
    }

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

/// Detail view: one row per field, blank values skipped
pub fn format_fields(fields: Vec<FieldRow>) -> String {
    let rows: Vec<FieldRow> = fields
        .into_iter()
        .filter(|f| !f.value.trim().is_empty())
        .collect();
    format_table(&rows, "Nothing to show.")
}
