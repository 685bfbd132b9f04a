//! Registry search and lookup commands

use colored::Colorize;
use tabled::Tabled;

use crate::cli::{CommandContext, GlobalOptions};
use crate::client::{Organization, OrganizationDetail};
use crate::error::{Error, Result};
use crate::output::{self, FieldRow};
use crate::services::{self, directory::MIN_QUERY_LEN};

#[derive(Tabled)]
struct OrganizationRow {
    #[tabled(rename = "EIN")]
    ein: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "LOCATION")]
    location: String,
}

impl From<&Organization> for OrganizationRow {
    fn from(org: &Organization) -> Self {
        Self {
            ein: org.ein.clone(),
            name: org.name.clone(),
            location: location(org.city.as_deref(), org.state.as_deref()),
        }
    }
}

fn location(city: Option<&str>, state: Option<&str>) -> String {
    match (city, state) {
        (Some(c), Some(s)) => format!("{}, {}", c, s),
        (Some(x), None) | (None, Some(x)) => x.to_string(),
        (None, None) => String::new(),
    }
}

/// Run the search command
pub async fn search(opts: &GlobalOptions, query: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let registry = ctx.registry()?;

    if query.trim().chars().count() < MIN_QUERY_LEN {
        eprintln!(
            "{} Enter at least {} characters to search.",
            "⚠".yellow(),
            MIN_QUERY_LEN
        );
    }

    let outcome = services::search(&registry, query).await;
    if let Some(error) = outcome.error {
        return Err(Error::Other(error));
    }

    output::emit(ctx.format, &outcome.organizations, || {
        let rows: Vec<OrganizationRow> = outcome.organizations.iter().map(Into::into).collect();
        output::format_table(&rows, "No organizations found.")
    })
}

/// Run the lookup command
pub async fn lookup(opts: &GlobalOptions, ein: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let registry = ctx.registry()?;

    let detail = services::lookup(&registry, ein).await?;

    output::emit(ctx.format, &detail, || output::format_fields(detail_rows(&detail)))
}

fn detail_rows(detail: &OrganizationDetail) -> Vec<FieldRow> {
    let field = |key: &str| {
        detail
            .0
            .get(key)
            .map(|v| match v {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            })
            .unwrap_or_default()
    };

    vec![
        FieldRow::new("Name", detail.name().unwrap_or_default()),
        FieldRow::new("EIN", detail.ein().unwrap_or_default()),
        FieldRow::new("Location", location(detail.city(), detail.state())),
        FieldRow::new("Address", field("address")),
        FieldRow::new("NTEE code", field("ntee_code")),
        FieldRow::new("Ruling date", field("ruling_date")),
    ]
}
