//! Client-side navigation over the remote index.
//!
//! The [`Navigator`] is a small state machine over [`View`]:
//!
//! ```text
//!            navigate_to / go_up / back / forward
//!   Home ───────────────────────────────────────▶ Listing(path, category)
//!    ▲  ◀─────────── go_home / go_up at top ─────────┘
//!    │
//!    └─ search ──▶ Search(query)
//! ```
//!
//! Every operation takes `&mut self`, so navigations are serialized by the
//! caller awaiting each one before issuing the next.

pub mod breadcrumb;
pub mod history;

use std::sync::Arc;

use tracing::info;
use url::Url;

use crate::domain::{Category, ListingEntry};
use crate::fetcher::{DirectoryFetcher, FetchError};
use crate::search::{SearchAggregator, SearchOutcome};

pub use breadcrumb::{breadcrumb_for, Crumb, ROOT_LABEL, ROOT_PATH};
pub use history::History;

/// Path searched views are labelled with in the breadcrumb trail.
const SEARCH_CRUMB_PREFIX: &str = "/Buscar: ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingView {
    pub path: String,
    pub category_id: Option<String>,
    /// `None` when the path could not be turned into a URL.
    pub url: Option<Url>,
    /// The entries, or the error to show in their place.
    pub content: Result<Vec<ListingEntry>, FetchError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchView {
    pub query: String,
    pub outcome: SearchOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Home,
    Listing(ListingView),
    Search(SearchView),
}

impl View {
    pub fn breadcrumb(&self) -> Vec<Crumb> {
        match self {
            View::Home => breadcrumb_for(""),
            View::Listing(listing) => breadcrumb_for(&listing.path),
            View::Search(search) => {
                breadcrumb_for(&format!("{}{}", SEARCH_CRUMB_PREFIX, search.query))
            }
        }
    }
}

/// Navigation state owned by a [`Navigator`]. Read-only from outside.
#[derive(Debug, Clone, Default)]
pub struct NavigatorState {
    history: History,
    current_path: Option<String>,
    current_category_id: Option<String>,
}

impl NavigatorState {
    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn current_path(&self) -> Option<&str> {
        self.current_path.as_deref()
    }

    pub fn current_category_id(&self) -> Option<&str> {
        self.current_category_id.as_deref()
    }
}

pub struct Navigator {
    base_url: Url,
    fetcher: Arc<dyn DirectoryFetcher + Send + Sync>,
    categories: Vec<Category>,
    search: SearchAggregator,
    state: NavigatorState,
    view: View,
}

impl Navigator {
    pub fn new(
        base_url: Url,
        fetcher: Arc<dyn DirectoryFetcher + Send + Sync>,
        categories: Vec<Category>,
        search: SearchAggregator,
    ) -> Self {
        Self {
            base_url,
            fetcher,
            categories,
            search,
            state: NavigatorState::default(),
            view: View::Home,
        }
    }

    pub fn state(&self) -> &NavigatorState {
        &self.state
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn current_path(&self) -> Option<&str> {
        self.state.current_path()
    }

    pub fn current_category_id(&self) -> Option<&str> {
        self.state.current_category_id()
    }

    pub fn can_go_back(&self) -> bool {
        self.state.history.can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.state.history.can_go_forward()
    }

    pub fn breadcrumb(&self) -> Vec<Crumb> {
        self.view.breadcrumb()
    }

    /// Entries of the current listing, empty for any other view.
    pub fn entries(&self) -> &[ListingEntry] {
        match &self.view {
            View::Listing(ListingView {
                content: Ok(items), ..
            }) => items.as_slice(),
            _ => &[],
        }
    }

    /// Open `location` (a site path such as `/Series/`, or an absolute URL)
    /// and record it in history. A failed fetch still lands on the listing,
    /// with the error in place of the entries.
    pub async fn navigate_to(&mut self, location: &str, category_id: Option<&str>) -> &View {
        match self.base_url.join(location) {
            Ok(url) => {
                self.state.history.push(url.clone());
                self.load(url, category_id).await;
            }
            Err(e) => {
                self.state.current_path = Some(location.to_string());
                self.state.current_category_id = category_id.map(String::from);
                self.view = View::Listing(ListingView {
                    path: location.to_string(),
                    category_id: category_id.map(String::from),
                    url: None,
                    content: Err(FetchError::InvalidUrl(format!("{}: {}", location, e))),
                });
            }
        }
        &self.view
    }

    /// Replay the previous history entry. Returns `false` at the start.
    pub async fn go_back(&mut self) -> bool {
        let Some(url) = self.state.history.back().cloned() else {
            return false;
        };
        self.load(url, None).await;
        true
    }

    /// Replay the next history entry. Returns `false` at the end.
    pub async fn go_forward(&mut self) -> bool {
        let Some(url) = self.state.history.forward().cloned() else {
            return false;
        };
        self.load(url, None).await;
        true
    }

    /// Navigate to the parent of the current path, or home when the current
    /// path has a single segment. Purely lexical; does nothing at home.
    pub async fn go_up(&mut self) {
        let Some(path) = self.state.current_path.clone() else {
            return;
        };

        match parent_path(&path) {
            Some(parent) => {
                self.navigate_to(&parent, None).await;
            }
            None => self.go_home(),
        }
    }

    /// Back to the welcome state. History and cursor are kept, so back and
    /// forward keep working afterwards.
    pub fn go_home(&mut self) {
        self.state.current_path = None;
        self.state.current_category_id = None;
        self.view = View::Home;
    }

    /// Search every category for `query`. Blank queries are ignored.
    /// Searching is not recorded in history.
    pub async fn search(&mut self, query: &str) -> &View {
        let query = query.trim();
        if query.is_empty() {
            return &self.view;
        }

        info!("Searching {:?} across {} categories", query, self.categories.len());
        let outcome = self.search.search(query, &self.categories).await;

        self.state.current_path = None;
        self.state.current_category_id = None;
        self.view = View::Search(SearchView {
            query: query.to_string(),
            outcome,
        });
        &self.view
    }

    async fn load(&mut self, url: Url, category_id: Option<&str>) {
        let path = url.path().to_string();
        let category_id = category_id
            .map(String::from)
            .or_else(|| self.category_for_path(&path));

        info!("Navigating to {}", url);
        self.state.current_path = Some(path.clone());
        self.state.current_category_id = category_id.clone();

        let content = self
            .fetcher
            .fetch_directory(&url)
            .await
            .map(|listing| listing.items);

        self.view = View::Listing(ListingView {
            path,
            category_id,
            url: Some(url),
            content,
        });
    }

    fn category_for_path(&self, path: &str) -> Option<String> {
        self.categories
            .iter()
            .find(|c| c.contains_path(path))
            .map(|c| c.id.clone())
    }
}

/// `/Series/Temporada1/` → `/Series/`. `None` when fewer than two segments.
pub fn parent_path(path: &str) -> Option<String> {
    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() < 2 {
        return None;
    }
    segments.pop();
    Some(format!("/{}/", segments.join("/")))
}
