use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::trace;
use url::Url;

use crate::domain::{FileType, ListingEntry};
use crate::listing::classifier;

/// Anchor text the index server uses for the link to the enclosing directory.
const PARENT_DIRECTORY: &str = "Parent Directory";

static TABLE: LazyLock<Selector> = LazyLock::new(|| selector("table"));
static ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a"));
static CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));
static DIR_MARKER: LazyLock<Selector> = LazyLock::new(|| selector(r#"img[alt="[DIR]"]"#));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

/// The fields of one `<tr>` that matter for a listing, extracted once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub anchor_text: String,
    pub href: Option<String>,
    pub has_dir_marker: bool,
    pub cells: Vec<String>,
}

impl RawRow {
    fn from_element(row: ElementRef<'_>) -> Self {
        let anchor = row.select(&ANCHOR).next();

        Self {
            anchor_text: anchor
                .map(|a| a.text().collect::<String>().trim().to_string())
                .unwrap_or_default(),
            href: anchor.and_then(|a| a.value().attr("href")).map(String::from),
            has_dir_marker: row.select(&DIR_MARKER).next().is_some(),
            cells: row
                .select(&CELL)
                .map(|td| td.text().collect::<String>().trim().to_string())
                .collect(),
        }
    }

    fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }

    /// Turn the row into an entry, or `None` when the row is not a listing
    /// row (no anchor text, parent link, unresolvable href).
    pub fn into_entry(self, base: &Url) -> Option<ListingEntry> {
        let name = self.anchor_text.as_str();
        if name.is_empty() || name == PARENT_DIRECTORY {
            return None;
        }

        let Some(href) = self.href.as_deref() else {
            trace!("Skipping row {:?}: anchor has no href", name);
            return None;
        };
        let url = match base.join(href) {
            Ok(url) => url,
            Err(e) => {
                trace!("Skipping row {:?}: bad href {:?}: {}", name, href, e);
                return None;
            }
        };

        let is_directory = self.has_dir_marker || name.ends_with('/');
        let size = self.cell(2);
        let size = (!is_directory && !size.is_empty()).then(|| size.to_string());
        let date = self.cell(1).to_string();
        let file_type = if is_directory {
            FileType::Folder
        } else {
            classifier::classify(name)
        };

        Some(ListingEntry {
            name: self.anchor_text,
            is_directory,
            url: url.to_string(),
            size,
            date,
            file_type,
        })
    }
}

/// Parser for the index server's tabular directory listing.
///
/// Best effort: malformed rows are dropped, a document without a table
/// yields no entries. It never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListingParser;

impl ListingParser {
    pub fn new() -> Self {
        Self
    }

    /// Project every data row of the first table into a [`RawRow`].
    /// The header row is not included.
    pub fn rows(&self, html: &str) -> Vec<RawRow> {
        let document = Html::parse_document(html);
        let Some(table) = document.select(&TABLE).next() else {
            return Vec::new();
        };

        table
            .select(&ROW)
            .skip(1)
            .map(RawRow::from_element)
            .collect()
    }

    pub fn parse(&self, html: &str, base: &Url) -> Vec<ListingEntry> {
        self.rows(html)
            .into_iter()
            .filter_map(|row| row.into_entry(base))
            .collect()
    }
}
