// src/checker/normalize.rs
// =============================================================================
// URL normalization used when matching a target URL against citations.
//
// Two forms of the target are compared:
// - the URL with trailing slashes removed ("https://example.com/page")
// - the same URL without its protocol ("example.com/page")
//
// Search results usually render citations without the protocol, so the
// second form is what matches most of the time.
// =============================================================================

const PROTOCOLS: [&str; 2] = ["https://", "http://"];

// Removes every trailing '/' from the URL
//
// Example:
//   "https://example.com/page/" -> "https://example.com/page"
pub fn trim_trailing_slash(url: &str) -> &str {
    url.trim_end_matches('/')
}

// Removes every "http://" / "https://" occurrence
//
// Repeats until none is left: removing one occurrence can join two halves
// into a new one ("hthttp://tps://"), and a single pass would then not be
// idempotent.
pub fn strip_protocol(url: &str) -> String {
    let mut rest = url.to_string();
    while PROTOCOLS.iter().any(|p| rest.contains(p)) {
        for protocol in PROTOCOLS {
            rest = rest.replace(protocol, "");
        }
    }
    rest
}

// The two forms of a target URL that count as evidence in a citation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlForms {
    pub with_protocol: String,
    pub without_protocol: String,
}

impl UrlForms {
    pub fn new(url: &str) -> Self {
        let url = url.trim();
        // Protocol goes first: trimming "https://" would leave "https:"
        let without_protocol = strip_protocol(url);

        Self {
            with_protocol: trim_trailing_slash(url).to_string(),
            without_protocol: trim_trailing_slash(&without_protocol).to_string(),
        }
    }

    // True when either form appears verbatim inside the citation text
    //
    // A URL with nothing left after its protocol never matches; otherwise
    // "https://" alone would match every https citation on the page.
    pub fn found_in(&self, citation: &str) -> bool {
        if self.without_protocol.is_empty() {
            return false;
        }
        citation.contains(self.with_protocol.as_str())
            || citation.contains(self.without_protocol.as_str())
    }
}
