//! Badge page rendering
//!
//! The text model picks a three-color gradient and writes the card listing the
//! supported nonprofits. Everything else about the page is a static template
//! with two named slots, filled in later by the presenter.

use serde::{Deserialize, Serialize};

use crate::client::{ChatRequest, GenerativeApi};
use crate::error::{ApiError, InputError, Result};
use crate::html::escape_text;

/// Slot replaced by the badge image URL
pub const IMAGE_SLOT: &str = "{{badge_image}}";

/// Slot replaced by the badge title
pub const TITLE_SLOT: &str = "{{badge_title}}";

pub const BLACK: &str = "#000000";
pub const WHITE: &str = "#FFFFFF";

/// Luminance above which black text reads better than white
const LUMINANCE_THRESHOLD: f64 = 0.55;

const SYSTEM_PROMPT: &str = "Return JSON only. No backticks.";

/// A nonprofit listed on the badge page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedNonprofit {
    pub name: String,
}

/// Three gradient colors, top to bottom, normalized to `#rrggbb`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette(pub [String; 3]);

impl Palette {
    /// Validate and normalize three hex colors
    pub fn parse(g1: &str, g2: &str, g3: &str) -> Result<Self> {
        Ok(Self([normalize_hex(g1)?, normalize_hex(g2)?, normalize_hex(g3)?]))
    }

    pub fn first(&self) -> &str {
        &self.0[0]
    }

    pub fn colors(&self) -> &[String; 3] {
        &self.0
    }
}

/// Text styling derived from the top gradient color
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageStyle {
    pub text_color: &'static str,
    pub text_shadow: &'static str,
    pub card_background: &'static str,
}

impl PageStyle {
    pub fn for_background(hex: &str) -> Result<Self> {
        let text_color = readable_text(hex)?;
        Ok(Self {
            text_color,
            text_shadow: text_shadow_for(text_color),
            card_background: card_background_for(text_color),
        })
    }
}

/// Result of a render: palette, styling, and the slotted page markup
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    pub palette: Palette,
    pub style: PageStyle,
    /// Card fragment as written by the model
    pub card_html: String,
    /// Full page markup containing [`IMAGE_SLOT`] and [`TITLE_SLOT`]
    pub page_markup: String,
}

#[derive(Deserialize)]
struct RenderReply {
    g1: String,
    g2: String,
    g3: String,
    #[serde(rename = "cardHtml")]
    card_html: String,
}

fn parse_hex(hex: &str) -> Result<[u8; 3]> {
    let invalid = || InputError::Invalid {
        field: "color",
        reason: format!("{:?} is not a hex color", hex),
    };

    let digits = hex.trim().trim_start_matches('#');
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid().into());
    }

    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return Err(invalid().into()),
    };

    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| invalid());
    Ok([channel(0)?, channel(2)?, channel(4)?])
}

fn normalize_hex(hex: &str) -> Result<String> {
    let [r, g, b] = parse_hex(hex)?;
    Ok(format!("#{:02x}{:02x}{:02x}", r, g, b))
}

/// sRGB channel (0-1) to linear light
fn linearize(c: f64) -> f64 {
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Relative luminance of a `#rgb` / `#rrggbb` color
pub fn relative_luminance(hex: &str) -> Result<f64> {
    let [r, g, b] = parse_hex(hex)?;
    let [r, g, b] = [r, g, b].map(|c| linearize(c as f64 / 255.0));
    Ok(0.2126 * r + 0.7152 * g + 0.0722 * b)
}

/// Black or white, whichever reads better on `hex`
pub fn readable_text(hex: &str) -> Result<&'static str> {
    let luminance = relative_luminance(hex)?;
    Ok(if luminance > LUMINANCE_THRESHOLD {
        BLACK
    } else {
        WHITE
    })
}

fn text_shadow_for(text_color: &str) -> &'static str {
    if text_color == BLACK {
        "0 1px 3px rgba(255,255,255,0.65)"
    } else {
        "0 2px 6px rgba(0,0,0,0.65)"
    }
}

fn card_background_for(text_color: &str) -> &'static str {
    if text_color == BLACK {
        "rgba(255,255,255,0.15)"
    } else {
        "rgba(0,0,0,0.35)"
    }
}

/// Remove Markdown code fences the model adds despite being told not to
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Language tag only; the payload may share the fence line
        text = rest
            .trim_start_matches(|c: char| c.is_ascii_alphabetic())
            .trim_start();
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

fn card_prompt(title: &str, nonprofits: &[&str]) -> String {
    let items: String = nonprofits
        .iter()
        .map(|name| {
            format!(
                "<li style=\"font-size: 0.8rem; margin-bottom: 0.25rem;\">{}</li>",
                escape_text(name)
            )
        })
        .collect();

    format!(
        "Return STRICT JSON ONLY.\n\n\
         Generate:\n\
         - g1, g2, g3: 3 hex colors for a vertical gradient inspired by the title \"{title}\"\n\
         - cardHtml: the middle card markup:\n\n\
         <div>\n  \
           <h2 style=\"font-size: .8em; padding-bottom: 10px;\">I support these Non-profits:</h2>\n  \
           <ul>\n    {items}\n  </ul>\n\
         </div>\n\n\
         NO other fields."
    )
}

/// Wrap the card fragment in the fixed page layout
pub fn page_markup(style: &PageStyle, card_html: &str) -> String {
    format!(
        r#"<main style="width: 100%; padding: 2.5rem;">
  <img id="badge-image" src="{image}" alt="Badge"
       style="display: block; width: 16rem; height: 16rem; margin: 0 auto; border-radius: 9999px; border: 4px solid #ffffff; background: rgba(255,255,255,0.8); box-shadow: 0 4px 20px rgba(0,0,0,0.25);" />

  <h1 style="margin-top: 1.2rem; text-align: center; font-size: 1.4rem; font-weight: 800; color: {text}; text-shadow: {glow};">{title}</h1>

  <div style="margin-top: 2.5rem; max-width: 700px; margin-left: auto; margin-right: auto; padding: 1.5rem; border-radius: 1rem; backdrop-filter: blur(10px); background: {card}; color: {text}; text-shadow: {glow};">
    {card_html}
  </div>
</main>"#,
        image = IMAGE_SLOT,
        title = TITLE_SLOT,
        text = style.text_color,
        glow = style.text_shadow,
        card = style.card_background,
    )
}

/// Parse the model's reply into palette and card fragment
fn parse_reply(raw: &str) -> Result<(Palette, String)> {
    let json = strip_code_fences(raw);
    let reply: RenderReply = serde_json::from_str(json).map_err(|e| {
        ApiError::InvalidResponse(format!("Render reply is not the expected JSON: {}", e))
    })?;

    let palette = Palette::parse(&reply.g1, &reply.g2, &reply.g3).map_err(|e| {
        ApiError::InvalidResponse(format!("Render reply has a bad palette: {}", e))
    })?;

    Ok((palette, reply.card_html))
}

/// Render the badge page for `title` and the supported nonprofits
pub async fn render_page(
    api: &dyn GenerativeApi,
    title: &str,
    nonprofits: &[SupportedNonprofit],
) -> Result<RenderedPage> {
    let title = title.trim();
    if title.is_empty() {
        return Err(InputError::Missing("title").into());
    }

    let names: Vec<&str> = nonprofits
        .iter()
        .map(|n| n.name.trim())
        .filter(|n| !n.is_empty())
        .collect();
    if names.is_empty() {
        return Err(InputError::Missing("nonprofits").into());
    }

    let request = ChatRequest {
        system: SYSTEM_PROMPT.to_string(),
        user: card_prompt(title, &names),
        max_tokens: 300,
        temperature: Some(0.4),
    };

    let raw = api.chat(&request).await?;
    let (palette, card_html) = parse_reply(&raw)?;
    let style = PageStyle::for_background(palette.first())?;
    let page_markup = page_markup(&style, &card_html);

    Ok(RenderedPage {
        palette,
        style,
        card_html,
        page_markup,
    })
}
