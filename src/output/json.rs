//! JSON output

use chrono::Utc;
use serde::Serialize;

/// Every JSON document printed by the CLI has this shape
#[derive(Debug, Serialize)]
pub struct Envelope<'a, T: ?Sized> {
    pub data: &'a T,
    pub meta: Meta,
}

#[derive(Debug, Serialize)]
pub struct Meta {
    /// RFC 3339 time the output was produced
    pub generated_at: String,
    pub version: &'static str,
}

impl Meta {
    fn now() -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

pub fn format_json<T: Serialize + ?Sized>(data: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Envelope {
        data,
        meta: Meta::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_envelope_shape() {
        let out = format_json(&vec!["Hope Hero", "Kindness Captain"]).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["data"][1], "Kindness Captain");
        assert_eq!(value["meta"]["version"], env!("CARGO_PKG_VERSION"));
        assert!(value["meta"]["generated_at"].as_str().is_some());
    }

    #[test]
    fn test_unsized_data() {
        let titles: &[&str] = &[];
        let out = format_json(titles).unwrap();
        assert!(out.contains("\"data\": []"));
    }
}
