//! Honorary title generation

use std::sync::LazyLock;

use regex::Regex;

use crate::client::{ChatRequest, GenerativeApi};
use crate::error::{ApiError, InputError, Result};

/// Upper bound on titles returned per request
pub const MAX_TITLES: usize = 5;

const SYSTEM_PROMPT: &str = "Respond ONLY with 5 raw title lines. No punctuation. No quotes.";

/// Leading list markers: `1.`, `2)`, `-`, `*`, `•`, possibly repeated
static LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\s*(?:\d+[.)]|[-*•]))+\s*").expect("valid list marker pattern")
});

const STRIPPED: &[char] = &[
    '"', '\'', '.', ',', ':', ';', '!', '?', '-', '\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}',
];

fn titles_prompt(names: &[&str]) -> String {
    format!(
        "Create 5 fun titles for someone who donates to:\n\
         {}.\n\n\
         RULES:\n\
         - No punctuation (NO quotes, commas, dashes, or colons).\n\
         - Titles must be short (2-6 words).\n\
         - No explanations, just the list.\n\
         - No numbering.\n\
         - Each title must be unique.",
        names.join(", ")
    )
}

fn clean_step(line: &str) -> String {
    let unnumbered = LIST_MARKER.replace(line.trim(), "");
    let stripped: String = unnumbered.chars().filter(|c| !STRIPPED.contains(c)).collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Clean one line until it stops changing.
///
/// Stripping quotes can expose a list marker (`"1) Foo"`), so a single pass
/// is not enough for the result to be stable.
fn clean_line(line: &str) -> String {
    let mut current = clean_step(line);
    loop {
        let next = clean_step(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Turn a model reply into at most five bare title strings
pub fn clean_titles(text: &str) -> Vec<String> {
    text.lines()
        .map(clean_line)
        .filter(|t| !t.is_empty())
        .take(MAX_TITLES)
        .collect()
}

/// Generate honorary titles for a supporter of the given nonprofits
pub async fn generate_titles(api: &dyn GenerativeApi, names: &[String]) -> Result<Vec<String>> {
    let names: Vec<&str> = names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .collect();

    if names.is_empty() {
        return Err(InputError::Missing("nonprofits").into());
    }

    let request = ChatRequest {
        system: SYSTEM_PROMPT.to_string(),
        user: titles_prompt(&names),
        max_tokens: 100,
        temperature: None,
    };

    let reply = api.chat(&request).await?;
    let titles = clean_titles(&reply);

    if titles.is_empty() {
        return Err(ApiError::InvalidResponse(format!("No titles in reply: {:?}", reply)).into());
    }

    Ok(titles)
}
