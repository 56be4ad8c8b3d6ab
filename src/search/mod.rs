//! Name search across every category root.
//!
//! Each category is fetched independently; a failing category is reported
//! in [`SearchOutcome::reports`] and skipped, the others still contribute.

use tracing::{debug, warn};
use url::Url;

use crate::domain::{Category, SearchResultEntry};
use crate::fetcher::{FetchError, ParallelFetcher};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryStatus {
    Searched { matches: usize },
    Failed(FetchError),
}

/// How one category fared during a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryReport {
    pub category_id: String,
    pub category_name: String,
    pub status: CategoryStatus,
}

impl CategoryReport {
    pub fn is_failure(&self) -> bool {
        matches!(self.status, CategoryStatus::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub query: String,
    /// Matches in category-declaration order, listing order within a category.
    pub results: Vec<SearchResultEntry>,
    /// One report per category, in declaration order.
    pub reports: Vec<CategoryReport>,
}

impl SearchOutcome {
    /// True when every category failed, which an empty `results` alone
    /// cannot tell apart from "nothing matched".
    pub fn all_failed(&self) -> bool {
        !self.reports.is_empty() && self.reports.iter().all(CategoryReport::is_failure)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CategoryReport> {
        self.reports.iter().filter(|r| r.is_failure())
    }
}

pub struct SearchAggregator {
    base_url: Url,
    parallel: ParallelFetcher,
}

impl SearchAggregator {
    pub fn new(base_url: Url, parallel: ParallelFetcher) -> Self {
        Self { base_url, parallel }
    }

    /// Keep the entries of each category root whose name contains `query`,
    /// ignoring case. Never fails; see [`SearchOutcome::all_failed`].
    pub async fn search(&self, query: &str, categories: &[Category]) -> SearchOutcome {
        let needle = query.to_lowercase();

        let resolved: Vec<Result<Url, FetchError>> = categories
            .iter()
            .map(|c| {
                c.resolve(&self.base_url)
                    .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", c.url, e)))
            })
            .collect();
        let urls: Vec<Url> = resolved.iter().filter_map(|r| r.clone().ok()).collect();
        let mut fetched = self.parallel.fetch_all(urls).await.into_iter();

        let mut results = Vec::new();
        let mut reports = Vec::with_capacity(categories.len());

        for (category, url) in categories.iter().zip(resolved) {
            let listing = match url {
                Ok(_) => fetched
                    .next()
                    .unwrap_or_else(|| Err(FetchError::Task("missing fetch result".into()))),
                Err(e) => Err(e),
            };

            let status = match listing {
                Ok(listing) => {
                    let before = results.len();
                    results.extend(
                        listing
                            .items
                            .into_iter()
                            .filter(|item| item.name.to_lowercase().contains(&needle))
                            .map(|entry| SearchResultEntry {
                                entry,
                                category: category.name.clone(),
                            }),
                    );
                    let matches = results.len() - before;
                    debug!("{} matches for {:?} in {}", matches, query, category.name);
                    CategoryStatus::Searched { matches }
                }
                Err(e) => {
                    warn!("Error searching in {}: {}", category.name, e);
                    CategoryStatus::Failed(e)
                }
            };

            reports.push(CategoryReport {
                category_id: category.id.clone(),
                category_name: category.name.clone(),
                status,
            });
        }

        SearchOutcome {
            query: query.to_string(),
            results,
            reports,
        }
    }
}
