pub mod category;
pub mod entry;
pub mod record;
pub mod size;

pub use category::Category;
pub use entry::{FileType, ListingEntry, SearchResultEntry};
pub use record::{DownloadRecord, DownloadStatus, Favorite, VisitRecord};
pub use size::{format_bytes, parse_size};
