// src/checker/citation.rs
// =============================================================================
// This module pulls the evidence out of a search-results page.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// Two things are extracted:
// - the page text, for phrase rules ("no results", anti-bot notices)
// - every <cite> element, the short rendered URL shown under each result
//
// Citations are frequently split across nested tags, e.g.
//   <cite>https:<span>//</span>example.com</cite>
// so the fragments are glued back together with NO separator. Joining with a
// space would turn that into "https: // example.com" and break the match.
// =============================================================================

use scraper::{ElementRef, Html, Selector};

// A parsed results page
//
// Parsing is done once; both the text and the citations come from the
// same document.
pub struct ResultsPage {
    document: Html,
}

impl ResultsPage {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    // All text nodes of the document, concatenated in document order
    pub fn visible_text(&self) -> String {
        joined_text(self.document.root_element())
    }

    // Reconstructed text of every <cite> element, in document order
    pub fn citations(&self) -> Vec<String> {
        // The selector is a constant and known to be valid
        let selector = Selector::parse("cite").unwrap();

        self.document
            .select(&selector)
            .map(joined_text)
            .collect()
    }
}

// Concatenates every nested text fragment of an element, order preserved
fn joined_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract_citations(html: &str) -> Vec<String> {
        ResultsPage::parse(html).citations()
    }

    #[test]
    fn test_split_citation_is_rejoined() {
        let html = r#"<div><cite>https:<span>//</span><b>example.com</b></cite></div>"#;
        let citations = extract_citations(html);
        assert_eq!(citations, vec!["https://example.com"]);
    }

    #[test]
    fn test_citations_in_document_order() {
        let html = r#"
            <cite>first.example/a</cite>
            <p>unrelated</p>
            <cite>second.<span>example</span>/b</cite>
        "#;
        let citations = extract_citations(html);
        assert_eq!(citations, vec!["first.example/a", "second.example/b"]);
    }

    #[test]
    fn test_breadcrumb_citation_keeps_its_text() {
        let html = r#"<cite>example.com<span> › page1</span></cite>"#;
        assert_eq!(extract_citations(html), vec!["example.com › page1"]);
    }

    #[test]
    fn test_no_citations() {
        let html = "<html><body><p>nothing here</p></body></html>";
        assert!(extract_citations(html).is_empty());
    }

    #[test]
    fn test_visible_text_includes_nested_text() {
        let page = ResultsPage::parse(
            "<html><body><p>Aucun document ne <b>correspond</b> aux termes</p></body></html>",
        );
        assert!(page.visible_text().contains("Aucun document ne correspond"));
    }
}
