//! HTML extraction passes: title, visible body text, outbound links.

use ego_tree::NodeRef;
use scraper::{Html, Node, Selector};

/// Elements whose subtrees contribute no brochure content.
const NOISE_ELEMENTS: [&str; 4] = ["script", "style", "img", "input"];

/// Sentinel title for documents without a `<title>` element.
pub(crate) const NO_TITLE: &str = "No title found";

/// Extract the `<title>` text, falling back to the sentinel.
pub(crate) fn extract_title(doc: &Html) -> String {
    let title_sel = Selector::parse("title").unwrap();
    doc.select(&title_sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string())
}

/// Extract visible text from `<body>`, with noise subtrees removed.
///
/// Text nodes are trimmed individually, empty ones dropped, and the rest
/// joined with newlines. A document without a `<body>` yields an empty
/// string.
pub(crate) fn extract_text(doc: &Html) -> String {
    let body_sel = Selector::parse("body").unwrap();
    let Some(body) = doc.select(&body_sel).next() else {
        return String::new();
    };

    let mut parts: Vec<String> = Vec::new();
    for child in body.children() {
        collect_visible_text(child, &mut parts);
    }
    parts.join("\n")
}

/// Recursive walk that skips noise subtrees entirely.
fn collect_visible_text(node: NodeRef<'_, Node>, parts: &mut Vec<String>) {
    match node.value() {
        Node::Text(text) => {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed.to_string());
            }
        }
        Node::Element(el) if NOISE_ELEMENTS.contains(&el.name()) => {}
        _ => {
            for child in node.children() {
                collect_visible_text(child, parts);
            }
        }
    }
}

/// Collect every `<a>` href in document order, dropping empty values.
///
/// Hrefs are preserved verbatim — relative and anchor-only links stay
/// as written; resolution is left to whoever consumes them.
pub(crate) fn extract_links(doc: &Html) -> Vec<String> {
    let link_sel = Selector::parse("a").unwrap();
    doc.select(&link_sel)
        .filter_map(|el| el.value().attr("href"))
        .filter(|href| !href.is_empty())
        .map(|href| href.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_extracted_and_trimmed() {
        let doc = Html::parse_document("<html><head><title>  Acme Home </title></head></html>");
        assert_eq!(extract_title(&doc), "Acme Home");
    }

    #[test]
    fn missing_title_uses_sentinel() {
        let doc = Html::parse_document("<html><body><p>hi</p></body></html>");
        assert_eq!(extract_title(&doc), NO_TITLE);
    }

    #[test]
    fn noise_elements_contribute_nothing() {
        let html = r#"<html><body>
            <p>Visible</p>
            <script>var hidden = "nope";</script>
            <style>.hidden { display: none; }</style>
            <input value="field">
            <div><script>nested();</script><span>Also visible</span></div>
        </body></html>"#;
        let doc = Html::parse_document(html);
        let text = extract_text(&doc);
        assert_eq!(text, "Visible\nAlso visible");
        assert!(!text.contains("hidden"));
        assert!(!text.contains("nested"));
    }

    #[test]
    fn text_nodes_trimmed_and_newline_joined() {
        let html = "<html><body><h1>  Acme  </h1><p>\n  We make things.  \n</p></body></html>";
        let doc = Html::parse_document(html);
        assert_eq!(extract_text(&doc), "Acme\nWe make things.");
    }

    #[test]
    fn document_without_body_yields_empty_text() {
        // A frameset document has no <body>.
        let doc = Html::parse_document("<html><frameset></frameset></html>");
        assert_eq!(extract_text(&doc), "");
    }

    #[test]
    fn links_in_document_order_empty_dropped() {
        let html = r##"<html><body>
            <a href="/about">About</a>
            <a href="">Empty</a>
            <a>No href</a>
            <a href="https://acme.com/careers">Careers</a>
            <a href="mailto:x@acme.com">Mail</a>
            <a href="#top">Top</a>
        </body></html>"##;
        let doc = Html::parse_document(html);
        let links = extract_links(&doc);
        assert_eq!(
            links,
            vec!["/about", "https://acme.com/careers", "mailto:x@acme.com", "#top"]
        );
    }

    #[test]
    fn relative_links_preserved_verbatim() {
        let doc = Html::parse_document(r#"<html><body><a href="jobs/openings">Jobs</a></body></html>"#);
        assert_eq!(extract_links(&doc), vec!["jobs/openings"]);
    }
}
