//! One-shot generation commands: titles, badge, render

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::{CommandContext, GlobalOptions};
use crate::error::{Error, Result};
use crate::output::{self, FieldRow};
use crate::services::{self, BadgeImage, SupportedNonprofit};

#[derive(Tabled)]
struct TitleRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "TITLE")]
    title: String,
}

/// Run the titles command
pub async fn titles(opts: &GlobalOptions, names: &[String]) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let generator = ctx.generator()?;

    let titles = services::generate_titles(&generator, names).await?;

    output::emit(ctx.format, &titles, || {
        let rows: Vec<TitleRow> = titles
            .iter()
            .enumerate()
            .map(|(i, title)| TitleRow {
                index: i + 1,
                title: title.clone(),
            })
            .collect();
        output::format_table(&rows, "No titles generated.")
    })
}

/// Shorten `data:` URLs, which run to megabytes
fn display_reference(reference: &str) -> String {
    if reference.starts_with("data:") {
        format!("inline PNG ({} KB)", reference.len() / 1024)
    } else {
        reference.to_string()
    }
}

fn write_png(image: &BadgeImage, out: &Path) -> Result<()> {
    let payload = image.inline_payload().ok_or_else(|| {
        Error::Other("Only inline images can be written to a file; use the URL instead".to_string())
    })?;

    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| Error::Storage(format!("Image payload is not valid base64: {}", e)))?;
    std::fs::write(out, bytes)?;
    Ok(())
}

/// Run the badge command
pub async fn badge(opts: &GlobalOptions, title: &str, out: Option<&Path>) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let generator = ctx.generator()?;
    let store = ctx.image_store().await?;

    let image = services::generate_badge(&generator, store.as_ref(), title).await?;

    if let Some(path) = out {
        write_png(&image, path)?;
        eprintln!("{} Saved image to {}", "✓".green(), path.display());
    }

    output::emit(ctx.format, &image, || {
        output::format_fields(vec![
            FieldRow::new("Title", title.trim()),
            FieldRow::new("Image", display_reference(&image.image_reference)),
            FieldRow::new("Object key", image.object_key.clone().unwrap_or_default()),
        ])
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderSummary<'a> {
    g1: &'a str,
    g2: &'a str,
    g3: &'a str,
    text_color: &'a str,
    html: &'a str,
}

/// Run the render command
pub async fn render(opts: &GlobalOptions, title: &str, names: &[String]) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let generator = ctx.generator()?;

    let nonprofits: Vec<SupportedNonprofit> = names
        .iter()
        .map(|name| SupportedNonprofit { name: name.clone() })
        .collect();

    let page = services::render_page(&generator, title, &nonprofits).await?;
    let [g1, g2, g3] = page.palette.colors();

    let summary = RenderSummary {
        g1,
        g2,
        g3,
        text_color: page.style.text_color,
        html: &page.page_markup,
    };

    output::emit(ctx.format, &summary, || {
        let table = output::format_fields(vec![
            FieldRow::new("Gradient", format!("{} → {} → {}", g1, g2, g3)),
            FieldRow::new("Text color", page.style.text_color),
        ]);
        format!("{}\n\n{}", table, page.page_markup.dimmed())
    })
}
