//! Rendering command results for the terminal

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::Result;

pub mod json;
pub mod table;

pub use table::{FieldRow, format_fields, format_table};

/// Print `data` as JSON, or the table built by `render` otherwise
pub fn emit<T, F>(format: OutputFormat, data: &T, render: F) -> Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce() -> String,
{
    let output = match format {
        OutputFormat::Json => json::format_json(data)?,
        OutputFormat::Table => render(),
    };
    println!("{}", output);
    Ok(())
}
