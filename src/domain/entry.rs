use serde::{Deserialize, Serialize};

/// Semantic category of a listing row.
///
/// `Folder` is reserved for directories; every other variant comes from the
/// file extension (see [`crate::listing::classifier`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Folder,
    Video,
    Archive,
    Subtitle,
    Image,
    Text,
    Document,
    Unknown,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Folder => "folder",
            FileType::Video => "video",
            FileType::Archive => "archive",
            FileType::Subtitle => "subtitle",
            FileType::Image => "image",
            FileType::Text => "text",
            FileType::Document => "document",
            FileType::Unknown => "unknown",
        }
    }

    pub fn from_name(s: &str) -> Self {
        match s {
            "folder" => FileType::Folder,
            "video" => FileType::Video,
            "archive" => FileType::Archive,
            "subtitle" => FileType::Subtitle,
            "image" => FileType::Image,
            "text" => FileType::Text,
            "document" => FileType::Document,
            _ => FileType::Unknown,
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    /// Display name exactly as shown in the index, trailing slash included.
    pub name: String,
    pub is_directory: bool,
    /// Absolute URL, resolved against the listing's own URL.
    pub url: String,
    /// Raw size text; `None` for directories and blank cells.
    pub size: Option<String>,
    /// Raw modified-date text, empty when the cell is missing.
    pub date: String,
    #[serde(rename = "type")]
    pub file_type: FileType,
}

impl ListingEntry {
    /// Name without the directory marker slash.
    pub fn display_name(&self) -> &str {
        self.name.trim_end_matches('/')
    }

    pub fn display_size(&self) -> &str {
        self.size.as_deref().filter(|s| !s.is_empty()).unwrap_or("--")
    }
}

/// A listing entry annotated with the display name of the category it came
/// from. Only produced by aggregated search, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResultEntry {
    #[serde(flatten)]
    pub entry: ListingEntry,
    pub category: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, is_directory: bool, size: Option<&str>) -> ListingEntry {
        ListingEntry {
            name: name.into(),
            is_directory,
            url: format!("https://example.com/{}", name),
            size: size.map(String::from),
            date: String::new(),
            file_type: if is_directory {
                FileType::Folder
            } else {
                FileType::Unknown
            },
        }
    }

    #[test]
    fn test_display_name_strips_trailing_slash() {
        assert_eq!(entry("Temporada 1/", true, None).display_name(), "Temporada 1");
        assert_eq!(entry("movie.mkv", false, None).display_name(), "movie.mkv");
    }

    #[test]
    fn test_display_size_placeholder() {
        assert_eq!(entry("dir/", true, None).display_size(), "--");
        assert_eq!(entry("a.mp4", false, Some("")).display_size(), "--");
        assert_eq!(entry("a.mp4", false, Some("1.2G")).display_size(), "1.2G");
    }

    #[test]
    fn test_file_type_name_round_trip() {
        for ty in [
            FileType::Folder,
            FileType::Video,
            FileType::Archive,
            FileType::Subtitle,
            FileType::Image,
            FileType::Text,
            FileType::Document,
            FileType::Unknown,
        ] {
            assert_eq!(FileType::from_name(ty.as_str()), ty);
        }
        assert_eq!(FileType::from_name("bogus"), FileType::Unknown);
    }

    #[test]
    fn test_entry_serializes_type_field() {
        let json = serde_json::to_value(entry("Series/", true, None)).unwrap();
        assert_eq!(json["type"], "folder");
        assert_eq!(json["is_directory"], true);
    }
}
