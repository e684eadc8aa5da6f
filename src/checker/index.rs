// src/checker/index.rs
// =============================================================================
// The two-step indexing check.
//
// How it works:
// 1. Search `site:<url>`. Indexed or Blocked -> done.
// 2. Search `"<url>"` (exact phrase). Indexed or Blocked -> done.
// 3. Neither step found the URL -> not indexed.
//
// URLs are checked one after another, never in parallel: together with the
// delay in search.rs this keeps the request rate low enough to avoid being
// blocked.
// =============================================================================

use serde::Serialize;
use std::fmt;
use tracing::info;

use super::search::{exact_phrase_query, run_query, site_query, SearchError, SearchOutcome, SearchTransport};
use crate::config::CheckerConfig;

// The two query steps, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    SiteQuery,
    ExactPhrase,
}

impl Phase {
    pub fn query(self, url: &str) -> String {
        match self {
            Phase::SiteQuery => site_query(url),
            Phase::ExactPhrase => exact_phrase_query(url),
        }
    }

    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::SiteQuery => Some(Phase::ExactPhrase),
            Phase::ExactPhrase => None,
        }
    }

    // 1-based step number shown to the user
    pub fn step(self) -> u8 {
        match self {
            Phase::SiteQuery => 1,
            Phase::ExactPhrase => 2,
        }
    }
}

// Final verdict for one URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IndexStatus {
    /// Found with the `site:` query
    IndexedViaSite,
    /// Found with the exact-phrase query
    IndexedViaExactPhrase,
    /// Neither query found it
    NotIndexed,
    /// The engine blocked us at the given step
    Blocked { step: u8, reason: SearchError },
}

impl IndexStatus {
    pub fn is_indexed(&self) -> bool {
        matches!(self, IndexStatus::IndexedViaSite | IndexStatus::IndexedViaExactPhrase)
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, IndexStatus::Blocked { .. })
    }
}

impl fmt::Display for IndexStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexStatus::IndexedViaSite => write!(f, "indexed via site-query"),
            IndexStatus::IndexedViaExactPhrase => write!(f, "indexed via exact-phrase query"),
            IndexStatus::NotIndexed => write!(f, "not indexed"),
            IndexStatus::Blocked { step, reason } => match reason {
                SearchError::HttpStatus(_) | SearchError::Connection | SearchError::Timeout => {
                    write!(f, "blocked at step {} ({})", step, reason)
                }
                _ => write!(f, "blocked at step {}", step),
            },
        }
    }
}

// Result of checking a single URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub url: String,
    #[serde(flatten)]
    pub status: IndexStatus,
    /// Human-readable form of `status`
    pub label: String,
}

impl CheckResult {
    fn new(url: &str, status: IndexStatus) -> Self {
        Self {
            url: url.to_string(),
            label: status.to_string(),
            status,
        }
    }
}

pub struct IndexChecker<T> {
    transport: T,
    config: CheckerConfig,
}

impl<T: SearchTransport> IndexChecker<T> {
    pub fn new(transport: T, config: CheckerConfig) -> Self {
        Self { transport, config }
    }

    // Checks one URL, stopping at the first conclusive step
    pub async fn check(&self, url: &str) -> CheckResult {
        let mut phase = Some(Phase::SiteQuery);

        while let Some(current) = phase {
            let query = current.query(url);
            match run_query(&self.transport, &self.config, &query, url).await {
                SearchOutcome::Indexed => {
                    let status = match current {
                        Phase::SiteQuery => IndexStatus::IndexedViaSite,
                        Phase::ExactPhrase => IndexStatus::IndexedViaExactPhrase,
                    };
                    return CheckResult::new(url, status);
                }
                SearchOutcome::Blocked(reason) => {
                    let status = IndexStatus::Blocked {
                        step: current.step(),
                        reason,
                    };
                    return CheckResult::new(url, status);
                }
                SearchOutcome::NotFound => phase = current.next(),
            }
        }

        CheckResult::new(url, IndexStatus::NotIndexed)
    }

    // Checks every URL in order
    //
    // `on_progress(index, total, url)` is called before each check, with a
    // 0-based index.
    pub async fn check_batch<F>(&self, urls: &[String], mut on_progress: F) -> Vec<CheckResult>
    where
        F: FnMut(usize, usize, &str),
    {
        let mut results = Vec::with_capacity(urls.len());

        for (i, url) in urls.iter().enumerate() {
            on_progress(i, urls.len(), url);
            let result = self.check(url).await;
            info!(url = %result.url, status = %result.label, "checked");
            results.push(result);
        }

        results
    }
}
