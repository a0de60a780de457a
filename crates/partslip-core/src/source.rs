//! Sheet URL detection.
//!
//! Three URL shapes are accepted:
//!
//! - a regular Google Sheets link, fetched through the CSV export endpoint
//! - a "publish to web" link, forced to CSV output
//! - any other http(s) URL, treated as a proxy that already returns CSV

use std::fmt;

use crate::error::LoadError;

const SHEETS_HOST: &str = "docs.google.com";

/// Prefixes that introduce a spreadsheet id, tried in order. Other Google
/// documents (`/forms/d/`, `/document/d/`) match none of them.
const ID_PREFIXES: [&str; 3] = ["/spreadsheets/d/", "?key=", "&key="];

const PUBLISHED_MARKER: &str = "/spreadsheets/d/e/";

const DEFAULT_GID: &str = "0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSource {
    Export { sheet_id: String, gid: String },
    Published { url: String },
    Proxy { url: String },
}

impl SheetSource {
    pub fn parse(input: &str) -> Result<Self, LoadError> {
        let url = input.trim();
        if url.is_empty() {
            return Err(LoadError::InvalidUrl(
                "Please enter a Google Sheet URL".to_string(),
            ));
        }

        let Some(after_scheme) = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
        else {
            return Err(invalid_url());
        };

        let host_end = after_scheme
            .find(|c: char| matches!(c, '/' | '?' | '#'))
            .unwrap_or(after_scheme.len());
        let host = &after_scheme[..host_end];

        if !host.eq_ignore_ascii_case(SHEETS_HOST) {
            return Ok(SheetSource::Proxy {
                url: url.to_string(),
            });
        }

        if url.contains(PUBLISHED_MARKER) {
            return Ok(SheetSource::Published {
                url: published_csv_url(url),
            });
        }

        let sheet_id = extract_sheet_id(url).ok_or_else(invalid_url)?;
        let gid = extract_gid(url).unwrap_or(DEFAULT_GID).to_string();
        Ok(SheetSource::Export {
            sheet_id: sheet_id.to_string(),
            gid,
        })
    }

    /// The URL that returns the sheet as CSV text.
    pub fn csv_url(&self) -> String {
        match self {
            SheetSource::Export { sheet_id, gid } => format!(
                "https://{}/spreadsheets/d/{}/export?format=csv&gid={}",
                SHEETS_HOST, sheet_id, gid
            ),
            SheetSource::Published { url } | SheetSource::Proxy { url } => url.clone(),
        }
    }
}

impl fmt::Display for SheetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetSource::Export { sheet_id, gid } => {
                write!(f, "sheet {} (tab {})", sheet_id, gid)
            }
            SheetSource::Published { .. } => write!(f, "published sheet"),
            SheetSource::Proxy { url } => write!(f, "proxy {}", url),
        }
    }
}

fn invalid_url() -> LoadError {
    LoadError::InvalidUrl(
        "Invalid Google Sheet URL. Please check the URL and try again.".to_string(),
    )
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn leading<'a>(s: &'a str, pred: impl Fn(char) -> bool) -> &'a str {
    let end = s.find(|c: char| !pred(c)).unwrap_or(s.len());
    &s[..end]
}

fn extract_sheet_id(url: &str) -> Option<&str> {
    ID_PREFIXES.iter().find_map(|prefix| {
        let start = url.find(prefix)? + prefix.len();
        let id = leading(&url[start..], is_id_char);
        (!id.is_empty()).then_some(id)
    })
}

/// Tab id from `#gid=`, `&gid=` or `?gid=`.
fn extract_gid(url: &str) -> Option<&str> {
    url.match_indices("gid=")
        .filter(|(i, _)| *i > 0 && matches!(url.as_bytes()[i - 1], b'#' | b'&' | b'?'))
        .map(|(i, m)| leading(&url[i + m.len()..], |c| c.is_ascii_digit()))
        .find(|gid| !gid.is_empty())
}

/// Rewrite a publish-to-web link so it serves CSV.
fn published_csv_url(url: &str) -> String {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let (base, query) = match without_fragment.split_once('?') {
        Some((base, query)) => (base, query),
        None => (without_fragment, ""),
    };
    let base = base.replace("/pubhtml", "/pub");

    let mut params: Vec<&str> = query
        .split('&')
        .filter(|p| !p.is_empty() && !p.starts_with("output="))
        .collect();
    params.push("output=csv");
    format!("{}?{}", base, params.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_url_with_gid() {
        let source = SheetSource::parse(
            "https://docs.google.com/spreadsheets/d/1aFda4Aw_FW-CS/edit#gid=1059265414",
        )
        .expect("valid url");
        assert_eq!(
            source,
            SheetSource::Export {
                sheet_id: "1aFda4Aw_FW-CS".to_string(),
                gid: "1059265414".to_string(),
            }
        );
        assert_eq!(
            source.csv_url(),
            "https://docs.google.com/spreadsheets/d/1aFda4Aw_FW-CS/export?format=csv&gid=1059265414"
        );
    }

    #[test]
    fn test_export_url_defaults_gid() {
        let source = SheetSource::parse("  https://docs.google.com/spreadsheets/d/abc123/edit  ")
            .expect("valid url");
        assert_eq!(
            source.csv_url(),
            "https://docs.google.com/spreadsheets/d/abc123/export?format=csv&gid=0"
        );
    }

    #[test]
    fn test_export_url_key_param() {
        let source = SheetSource::parse("https://docs.google.com/ccc?key=XYZ_9&usp=sharing&gid=7")
            .expect("valid url");
        assert_eq!(
            source,
            SheetSource::Export {
                sheet_id: "XYZ_9".to_string(),
                gid: "7".to_string(),
            }
        );
    }

    #[test]
    fn test_published_url_forced_to_csv() {
        let source = SheetSource::parse(
            "https://docs.google.com/spreadsheets/d/e/2PACX-1vQ/pubhtml?gid=5&single=true#top",
        )
        .expect("valid url");
        assert_eq!(
            source.csv_url(),
            "https://docs.google.com/spreadsheets/d/e/2PACX-1vQ/pub?gid=5&single=true&output=csv"
        );

        let already_csv = SheetSource::parse(
            "https://docs.google.com/spreadsheets/d/e/2PACX-1vQ/pub?output=csv",
        )
        .expect("valid url");
        assert_eq!(
            already_csv.csv_url(),
            "https://docs.google.com/spreadsheets/d/e/2PACX-1vQ/pub?output=csv"
        );
    }

    #[test]
    fn test_proxy_url_used_verbatim() {
        let url = "https://script.google.com/macros/s/AKfy/exec";
        let source = SheetSource::parse(url).expect("valid url");
        assert!(matches!(source, SheetSource::Proxy { .. }));
        assert_eq!(source.csv_url(), url);
    }

    #[test]
    fn test_invalid_urls() {
        assert!(matches!(SheetSource::parse(""), Err(LoadError::InvalidUrl(_))));
        assert!(matches!(SheetSource::parse("   "), Err(LoadError::InvalidUrl(_))));
        assert!(matches!(
            SheetSource::parse("docs.google.com/spreadsheets/d/abc"),
            Err(LoadError::InvalidUrl(_))
        ));
        assert!(matches!(
            SheetSource::parse("https://docs.google.com/forms/"),
            Err(LoadError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_other_google_documents_rejected() {
        for url in [
            "https://docs.google.com/forms/d/1FAIpQLSe/viewform",
            "https://docs.google.com/document/d/1abcDEF/edit#gid=0",
            "https://docs.google.com/presentation/d/xyz/edit",
            "https://docs.google.com/ccc?notkey=abc",
        ] {
            assert!(
                matches!(SheetSource::parse(url), Err(LoadError::InvalidUrl(_))),
                "{} should be rejected",
                url
            );
        }
    }

    #[test]
    fn test_extract_gid_requires_separator() {
        assert_eq!(extract_gid("https://x/edit#gid=12"), Some("12"));
        assert_eq!(extract_gid("https://x/edit?usp=1&gid=3"), Some("3"));
        assert_eq!(extract_gid("https://x/edit?xgid=3"), None);
        assert_eq!(extract_gid("https://x/edit#gid="), None);
    }
}
