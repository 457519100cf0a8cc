use scraper::{Html, Selector};

pub trait Extractor: Send + Sync {
    /// Returns the HTML that should be converted to Markdown.
    fn extract(&self, html: &str) -> String;
}

/// Keeps `<head>` content (title, styles, scripts) out of the Markdown:
/// - returns `<body>` inner_html if present
/// - otherwise the full document HTML.
#[derive(Debug, Default, Clone, Copy)]
pub struct BodyExtractor;

impl Extractor for BodyExtractor {
    fn extract(&self, html: &str) -> String {
        let doc = Html::parse_document(html);
        let body_sel = Selector::parse("body").ok();

        if let Some(sel) = body_sel.as_ref() {
            if let Some(node) = doc.select(sel).next() {
                return node.inner_html();
            }
        }
        doc.root_element().html()
    }
}
