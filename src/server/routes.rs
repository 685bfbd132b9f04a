use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};

use super::AppState;
use super::error::RouteError;
use crate::client::OrganizationDetail;
use crate::services::render::{IMAGE_SLOT, TITLE_SLOT};
use crate::services::{self, BadgeImage, SearchOutcome, SupportedNonprofit};

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    query: String,
}

#[derive(Deserialize)]
pub struct LookupParams {
    #[serde(default)]
    ein: String,
}

/// A nonprofit given either as a bare name or as `{"name": ...}`
#[derive(Deserialize)]
#[serde(untagged)]
pub enum NameEntry {
    Plain(String),
    Named { name: String },
}

impl NameEntry {
    fn into_name(self) -> String {
        match self {
            NameEntry::Plain(name) | NameEntry::Named { name } => name,
        }
    }
}

#[derive(Deserialize)]
pub struct TitlesRequest {
    #[serde(default, alias = "names")]
    nonprofits: Vec<NameEntry>,
}

#[derive(Serialize)]
pub struct TitlesResponse {
    titles: Vec<String>,
}

#[derive(Deserialize)]
pub struct BadgeRequest {
    #[serde(default)]
    title: String,
}

#[derive(Deserialize)]
pub struct RenderRequest {
    #[serde(default)]
    title: String,
    #[serde(default)]
    nonprofits: Vec<SupportedNonprofit>,
}

/// Rendered page markup plus its palette.
///
/// `html` still holds one `imageSlot` and one `titleSlot` placeholder; the
/// caller replaces each with the badge image URL and the title.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResponse {
    html: String,
    g1: String,
    g2: String,
    g3: String,
    text_color: String,
    image_slot: &'static str,
    title_slot: &'static str,
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, RouteError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| RouteError::BadRequest(format!("Malformed payload: {}", e.body_text())))
}

pub async fn health_handler() -> &'static str {
    "ok"
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchOutcome> {
    log::info!("GET /api/search query={:?}", params.query);
    Json(services::search(state.directory.as_ref(), &params.query).await)
}

pub async fn nonprofit_handler(
    State(state): State<AppState>,
    Query(params): Query<LookupParams>,
) -> Result<Json<OrganizationDetail>, RouteError> {
    log::info!("GET /api/nonprofit ein={:?}", params.ein);

    services::lookup(state.directory.as_ref(), &params.ein)
        .await
        .map(Json)
        .map_err(|e| {
            RouteError::classify_lookup(e, "Organization not found", "Registry lookup failed")
        })
}

pub async fn titles_handler(
    State(state): State<AppState>,
    payload: Result<Json<TitlesRequest>, JsonRejection>,
) -> Result<Json<TitlesResponse>, RouteError> {
    let request = body(payload)?;
    let names: Vec<String> = request
        .nonprofits
        .into_iter()
        .map(NameEntry::into_name)
        .collect();
    log::info!("POST /api/titles for {} nonprofits", names.len());

    let titles = services::generate_titles(state.generator.as_ref(), &names)
        .await
        .map_err(|e| RouteError::classify(e, "Failed to generate titles."))?;

    Ok(Json(TitlesResponse { titles }))
}

pub async fn badge_handler(
    State(state): State<AppState>,
    payload: Result<Json<BadgeRequest>, JsonRejection>,
) -> Result<Json<BadgeImage>, RouteError> {
    let request = body(payload)?;
    log::info!("POST /api/badge title={:?}", request.title);

    services::generate_badge(state.generator.as_ref(), state.store.as_ref(), &request.title)
        .await
        .map(Json)
        .map_err(|e| RouteError::classify(e, "Failed to generate badge"))
}

pub async fn render_handler(
    State(state): State<AppState>,
    payload: Result<Json<RenderRequest>, JsonRejection>,
) -> Result<Json<RenderResponse>, RouteError> {
    let request = body(payload)?;
    log::info!(
        "POST /api/render-page title={:?} nonprofits={}",
        request.title,
        request.nonprofits.len()
    );

    let page = services::render_page(state.generator.as_ref(), &request.title, &request.nonprofits)
        .await
        .map_err(|e| RouteError::classify(e, "Render failed"))?;

    let [g1, g2, g3] = page.palette.0;
    Ok(Json(RenderResponse {
        html: page.page_markup,
        g1,
        g2,
        g3,
        text_color: page.style.text_color.to_string(),
        image_slot: IMAGE_SLOT,
        title_slot: TITLE_SLOT,
    }))
}
