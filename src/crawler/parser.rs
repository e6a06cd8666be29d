//! HTML link extraction
//!
//! Yields the raw `href` attribute values of a page's anchor tags.
//! Resolution against the page URL and scope filtering happen in the
//! `scope` module, so this stays a pure text-in, strings-out step.

use scraper::{Html, Selector};

/// Extracts raw href strings from all `<a href>` tags in the document
///
/// The values are returned exactly as written in the page, relative or
/// absolute; nothing is resolved or filtered here.
///
/// # Example
///
/// ```
/// use packcrawl::crawler::extract_hrefs;
///
/// let html = r#"<html><body><a href="/page">Link</a></body></html>"#;
/// assert_eq!(extract_hrefs(html), vec!["/page".to_string()]);
/// ```
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut hrefs = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                hrefs.push(href.to_string());
            }
        }
    }

    hrefs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_anchor_hrefs() {
        let html = r#"
            <html><body>
                <a href="/one">One</a>
                <a href="https://example.test/two">Two</a>
            </body></html>
        "#;

        let hrefs = extract_hrefs(html);
        assert_eq!(hrefs, vec!["/one", "https://example.test/two"]);
    }

    #[test]
    fn test_anchor_without_href_ignored() {
        let html = r#"<html><body><a name="anchor">No href</a></body></html>"#;
        assert!(extract_hrefs(html).is_empty());
    }

    #[test]
    fn test_non_anchor_urls_ignored() {
        let html = r#"
            <html><head><link rel="stylesheet" href="/style.css"></head>
            <body><img src="/logo.png"><script src="/app.js"></script></body></html>
        "#;
        assert!(extract_hrefs(html).is_empty());
    }

    #[test]
    fn test_raw_values_preserved() {
        let html = r##"<a href="#frag">F</a><a href="mailto:a@b.com">M</a>"##;
        let hrefs = extract_hrefs(html);
        assert_eq!(hrefs, vec!["#frag", "mailto:a@b.com"]);
    }

    #[test]
    fn test_empty_document() {
        assert!(extract_hrefs("").is_empty());
    }

    #[test]
    fn test_malformed_html_does_not_panic() {
        let html = "<html><body><a href='/ok'>unclosed";
        assert_eq!(extract_hrefs(html), vec!["/ok"]);
    }
}
