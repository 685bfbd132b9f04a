//! Final badge page assembly

use crate::html::{escape_attr, escape_text};
use crate::services::Palette;
use crate::services::render::{IMAGE_SLOT, TITLE_SLOT};
use crate::workflow::SessionStore;

const EMPTY_PAGE: &str = "<main></main>";

/// Page-level styling applied around the badge markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub background: String,
    pub font_family: String,
}

impl Theme {
    /// Top-to-bottom gradient through the palette's three colors
    pub fn from_palette(palette: &Palette) -> Self {
        let [c1, c2, c3] = palette.colors();
        Self {
            background: format!("linear-gradient(to bottom, {}, {}, {})", c1, c2, c3),
            ..Self::default()
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: "#ffffff".to_string(),
            font_family: "system-ui, -apple-system, 'Segoe UI', sans-serif".to_string(),
        }
    }
}

/// Fill the image and title slots, first occurrence of each only.
///
/// Scans left to right once, so text produced by a replacement is never
/// searched again.
pub fn bind_slots(markup: &str, image_reference: &str, title: &str) -> String {
    let image = escape_attr(image_reference);
    let title = escape_text(title);

    let mut out = String::with_capacity(markup.len() + image.len() + title.len());
    let mut rest = markup;
    let mut image_bound = false;
    let mut title_bound = false;

    loop {
        let next_image = (!image_bound).then(|| rest.find(IMAGE_SLOT)).flatten();
        let next_title = (!title_bound).then(|| rest.find(TITLE_SLOT)).flatten();

        let (at, slot, value) = match (next_image, next_title) {
            (Some(i), Some(t)) if i < t => (i, IMAGE_SLOT, &image),
            (Some(i), None) => (i, IMAGE_SLOT, &image),
            (_, Some(t)) => (t, TITLE_SLOT, &title),
            (None, None) => break,
        };

        out.push_str(&rest[..at]);
        out.push_str(value);
        rest = &rest[at + slot.len()..];

        if slot == IMAGE_SLOT {
            image_bound = true;
        } else {
            title_bound = true;
        }
    }

    out.push_str(rest);
    out
}

fn document(title: &str, theme: &Theme, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8" />
<meta name="viewport" content="width=device-width, initial-scale=1" />
<title>{title}</title>
</head>
<body style="margin: 0; min-height: 100vh; background: {background}; font-family: {font};">
{body}
</body>
</html>
"#,
        title = escape_text(title),
        background = escape_attr(&theme.background),
        font = escape_attr(&theme.font_family),
        body = body,
    )
}

/// Render the stored badge as a standalone HTML document.
///
/// When the session holds no complete artifact the body is an empty `<main>`.
/// The palette's gradient overrides the theme background.
pub fn present(session: &SessionStore, theme: &Theme) -> String {
    let Some(artifact) = session.artifact() else {
        return document("Badge", theme, EMPTY_PAGE);
    };

    let theme = Theme {
        font_family: theme.font_family.clone(),
        ..Theme::from_palette(&artifact.palette)
    };
    let body = bind_slots(&artifact.page_markup, &artifact.image_reference, &artifact.title);

    document(&artifact.title, &theme, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::BadgeArtifact;

    fn palette() -> Palette {
        Palette::parse("#ff0000", "#00ff00", "#0000ff").unwrap()
    }

    fn session(markup: &str) -> SessionStore {
        let mut store = SessionStore::new();
        store.commit(BadgeArtifact {
            title: "Hero <of> Hope".to_string(),
            image_reference: "https://cdn.example.com/a.png?x=1&y=\"2\"".to_string(),
            palette: palette(),
            page_markup: markup.to_string(),
        });
        store
    }

    #[test]
    fn test_theme_gradient() {
        let theme = Theme::from_palette(&palette());
        assert_eq!(
            theme.background,
            "linear-gradient(to bottom, #ff0000, #00ff00, #0000ff)"
        );
    }

    #[test]
    fn test_empty_session_renders_empty_page() {
        let html = present(&SessionStore::new(), &Theme::default());

        assert!(html.contains("<main></main>"));
        assert!(!html.contains(IMAGE_SLOT));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_partial_session_renders_empty_page() {
        let mut store = SessionStore::new();
        store.set_title("Only a title");
        store.set_palette(palette());

        let html = present(&store, &Theme::default());
        assert!(html.contains("<main></main>"));
        assert!(!html.contains("Only a title"));
    }

    #[test]
    fn test_present_binds_escaped_values() {
        let markup = format!(
            "<main><img src=\"{}\" /><h1>{}</h1></main>",
            IMAGE_SLOT, TITLE_SLOT
        );
        let html = present(&session(&markup), &Theme::default());

        assert!(html.contains(
            "src=\"https://cdn.example.com/a.png?x=1&amp;y=&quot;2&quot;\""
        ));
        assert!(html.contains("<h1>Hero &lt;of&gt; Hope</h1>"));
        assert!(html.contains("linear-gradient(to bottom, #ff0000, #00ff00, #0000ff)"));
        assert!(!html.contains(IMAGE_SLOT));
        assert!(!html.contains(TITLE_SLOT));
    }

    #[test]
    fn test_bind_slots_first_occurrence_only() {
        let markup = format!("{} {} | card: {} {}", IMAGE_SLOT, TITLE_SLOT, IMAGE_SLOT, TITLE_SLOT);
        let bound = bind_slots(&markup, "img.png", "Title");

        assert_eq!(bound, format!("img.png Title | card: {} {}", IMAGE_SLOT, TITLE_SLOT));
    }

    #[test]
    fn test_bind_slots_does_not_rescan_values() {
        let bound = bind_slots(
            &format!("<h1>{}</h1><img src=\"{}\">", TITLE_SLOT, IMAGE_SLOT),
            "x.png",
            "{{badge_image}}",
        );

        assert_eq!(bound, "<h1>{{badge_image}}</h1><img src=\"x.png\">");
    }
}
