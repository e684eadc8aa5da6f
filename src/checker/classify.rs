// src/checker/classify.rs
// =============================================================================
// This module decides what a single search-results page means.
//
// Priority order (first match wins):
// 1. Blocked  - rate-limit status, other HTTP error status, or an anti-bot
//               phrase (CAPTCHA page, "unusual traffic" notice)
// 2. NotFound - a "no results" phrase in the page text
// 3. Indexed  - the target URL appears inside a <cite> element
// 4. NotFound - everything else
//
// The phrases are data (PhraseRule), not literals, so another locale or
// another search provider only needs a different rule list.
// =============================================================================

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::citation::ResultsPage;
use super::normalize::UrlForms;
use super::search::{SearchError, SearchOutcome, SearchPage};

// What a phrase means when it is found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleOutcome {
    /// The engine refused to answer (CAPTCHA, unusual traffic)
    Blocked,
    /// The engine answered with an explicit "no results" message
    NotFound,
}

// Where to look for a phrase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchScope {
    /// The raw response body, markup included
    RawBody,
    /// The text content of the parsed page
    VisibleText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseRule {
    pub phrase: String,
    pub outcome: RuleOutcome,
    #[serde(default = "default_scope")]
    pub scope: MatchScope,
}

fn default_scope() -> MatchScope {
    MatchScope::VisibleText
}

impl PhraseRule {
    pub fn new(phrase: &str, outcome: RuleOutcome, scope: MatchScope) -> Self {
        Self {
            phrase: phrase.to_string(),
            outcome,
            scope,
        }
    }

    fn matches(&self, raw_body: &str, visible_text: &str) -> bool {
        let haystack = match self.scope {
            MatchScope::RawBody => raw_body,
            MatchScope::VisibleText => visible_text,
        };
        haystack.contains(&self.phrase)
    }
}

// The rule set Google France answers with
pub fn default_rules() -> Vec<PhraseRule> {
    vec![
        PhraseRule::new("CAPTCHA", RuleOutcome::Blocked, MatchScope::RawBody),
        PhraseRule::new(
            "nos systèmes ont détecté un trafic inhabituel",
            RuleOutcome::Blocked,
            MatchScope::VisibleText,
        ),
        PhraseRule::new(
            "Aucun document ne correspond",
            RuleOutcome::NotFound,
            MatchScope::VisibleText,
        ),
        PhraseRule::new(
            "Il se peut qu'aucun bon résultat ne corresponde",
            RuleOutcome::NotFound,
            MatchScope::VisibleText,
        ),
    ]
}

// Everything the classifier needs besides the page itself
pub struct Classifier<'a> {
    pub rules: &'a [PhraseRule],
    pub rate_limit_status: u16,
}

impl Classifier<'_> {
    // Classifies one response for one target URL
    pub fn classify(&self, page: &SearchPage, target: &UrlForms) -> SearchOutcome {
        if page.status == self.rate_limit_status {
            return SearchOutcome::Blocked(SearchError::RateLimited);
        }
        if !(200..300).contains(&page.status) {
            return SearchOutcome::Blocked(SearchError::HttpStatus(page.status));
        }

        let parsed = ResultsPage::parse(&page.body);
        let text = parsed.visible_text();

        // Blocked rules win over NotFound rules whatever the list order
        for wanted in [RuleOutcome::Blocked, RuleOutcome::NotFound] {
            let hit = self
                .rules
                .iter()
                .filter(|rule| rule.outcome == wanted)
                .find(|rule| rule.matches(&page.body, &text));

            if let Some(rule) = hit {
                debug!(phrase = %rule.phrase, outcome = ?wanted, "phrase rule matched");
                return match wanted {
                    RuleOutcome::Blocked => SearchOutcome::Blocked(SearchError::AntiBotChallenge),
                    RuleOutcome::NotFound => SearchOutcome::NotFound,
                };
            }
        }

        let citations = parsed.citations();
        debug!(count = citations.len(), "citations extracted");

        if citations.iter().any(|cite| target.found_in(cite)) {
            SearchOutcome::Indexed
        } else {
            SearchOutcome::NotFound
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(status: u16, body: &str) -> SearchPage {
        SearchPage {
            status,
            body: body.to_string(),
        }
    }

    fn classify(status: u16, body: &str, url: &str) -> SearchOutcome {
        let rules = default_rules();
        let classifier = Classifier {
            rules: &rules,
            rate_limit_status: 429,
        };
        classifier.classify(&page(status, body), &UrlForms::new(url))
    }

    #[test]
    fn test_rate_limit_status_is_blocked() {
        let body = "<cite>example.com/page1</cite>";
        assert_eq!(
            classify(429, body, "https://example.com/page1"),
            SearchOutcome::Blocked(SearchError::RateLimited)
        );
    }

    #[test]
    fn test_other_error_status_is_blocked_with_code() {
        assert_eq!(
            classify(503, "", "https://example.com"),
            SearchOutcome::Blocked(SearchError::HttpStatus(503))
        );
    }

    #[test]
    fn test_captcha_wins_over_citation() {
        let body = r#"<div id="captcha-form">CAPTCHA</div><cite>example.com/page1</cite>"#;
        assert_eq!(
            classify(200, body, "https://example.com/page1"),
            SearchOutcome::Blocked(SearchError::AntiBotChallenge)
        );
    }

    #[test]
    fn test_unusual_traffic_notice_is_blocked() {
        let body = "<p>Nos systèmes ont détecté un trafic inhabituel</p><p>nos systèmes ont détecté un trafic inhabituel depuis votre réseau</p>";
        assert_eq!(
            classify(200, body, "https://example.com"),
            SearchOutcome::Blocked(SearchError::AntiBotChallenge)
        );
    }

    #[test]
    fn test_no_results_phrase_is_not_found() {
        let body = "<p>Aucun document ne correspond aux termes de recherche spécifiés</p><cite>example.com/x</cite>";
        assert_eq!(classify(200, body, "https://example.com/x"), SearchOutcome::NotFound);
    }

    #[test]
    fn test_second_no_results_phrase() {
        let body = "<p>Il se peut qu'aucun bon résultat ne corresponde à votre recherche</p>";
        assert_eq!(classify(200, body, "https://example.com/x"), SearchOutcome::NotFound);
    }

    #[test]
    fn test_citation_without_protocol_is_indexed() {
        let body = "<div><cite>example.com/page1</cite></div>";
        assert_eq!(classify(200, body, "https://example.com/page1"), SearchOutcome::Indexed);
    }

    #[test]
    fn test_split_citation_is_indexed() {
        let body = "<cite>https:<span>//</span>example.com</cite>";
        assert_eq!(classify(200, body, "https://example.com"), SearchOutcome::Indexed);
    }

    #[test]
    fn test_similar_results_are_not_found() {
        let body = "<cite>example.com › other-page</cite><cite>example.com</cite>";
        assert_eq!(classify(200, body, "https://example.com/page1"), SearchOutcome::NotFound);
    }

    #[test]
    fn test_bare_scheme_does_not_match_other_citations() {
        let body = "<cite>https://other.org</cite><cite>https:<span>//</span>example.com</cite>";
        assert_eq!(classify(200, body, "https://"), SearchOutcome::NotFound);
    }

    #[test]
    fn test_blocked_rules_checked_before_not_found_rules() {
        // NotFound rule listed first, Blocked rule still wins
        let rules = vec![
            PhraseRule::new("no results", RuleOutcome::NotFound, MatchScope::VisibleText),
            PhraseRule::new("robot check", RuleOutcome::Blocked, MatchScope::VisibleText),
        ];
        let classifier = Classifier {
            rules: &rules,
            rate_limit_status: 429,
        };
        let outcome = classifier.classify(
            &page(200, "<p>robot check</p><p>no results</p>"),
            &UrlForms::new("https://example.com"),
        );
        assert_eq!(outcome, SearchOutcome::Blocked(SearchError::AntiBotChallenge));
    }

    #[test]
    fn test_rule_scope_raw_body_sees_markup() {
        let rules = vec![PhraseRule::new("captcha-form", RuleOutcome::Blocked, MatchScope::RawBody)];
        let classifier = Classifier {
            rules: &rules,
            rate_limit_status: 429,
        };
        let outcome = classifier.classify(
            &page(200, r#"<form id="captcha-form"></form>"#),
            &UrlForms::new("https://example.com"),
        );
        assert_eq!(outcome, SearchOutcome::Blocked(SearchError::AntiBotChallenge));
    }

    #[test]
    fn test_rule_deserializes_with_default_scope() {
        let rule: PhraseRule =
            serde_json::from_str(r#"{"phrase": "did not match any documents", "outcome": "not_found"}"#)
                .unwrap();
        assert_eq!(rule.scope, MatchScope::VisibleText);
        assert_eq!(rule.outcome, RuleOutcome::NotFound);
    }
}
