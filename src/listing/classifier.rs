use std::path::Path;

use crate::domain::FileType;

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m3u8"];

/// Lowercased extension of the last path component, if any.
fn extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Classify a file by its extension. Directories are never passed here.
pub fn classify(file_name: &str) -> FileType {
    let Some(ext) = extension(file_name) else {
        return FileType::Unknown;
    };

    match ext.as_str() {
        e if VIDEO_EXTENSIONS.contains(&e) => FileType::Video,
        "zip" | "rar" | "7z" | "tar" | "gz" => FileType::Archive,
        "srt" | "sub" => FileType::Subtitle,
        "jpg" | "jpeg" | "png" | "gif" => FileType::Image,
        "txt" => FileType::Text,
        "pdf" => FileType::Document,
        _ => FileType::Unknown,
    }
}

pub fn is_playable_video(file_name: &str) -> bool {
    extension(file_name).is_some_and(|ext| VIDEO_EXTENSIONS.contains(&ext.as_str()))
}

/// Short human description for the details view.
pub fn describe(file_name: &str) -> &'static str {
    match extension(file_name).as_deref() {
        Some("mp4") => "Video MP4",
        Some("mkv") => "Video MKV",
        Some("avi") => "Video AVI",
        Some("mov") => "Video MOV",
        Some("zip") => "Archivo ZIP",
        Some("rar") => "Archivo RAR",
        Some("srt") => "Subtítulos",
        Some("pdf") => "Documento PDF",
        Some("txt") => "Archivo de texto",
        _ => "Archivo",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify("movie.MP4"), FileType::Video);
        assert_eq!(classify("Movie.Mkv"), FileType::Video);
    }

    #[test]
    fn test_classify_mapping() {
        assert_eq!(classify("notes.txt"), FileType::Text);
        assert_eq!(classify("book.pdf"), FileType::Document);
        assert_eq!(classify("cover.jpeg"), FileType::Image);
        assert_eq!(classify("episode.es.srt"), FileType::Subtitle);
        assert_eq!(classify("pack.7z"), FileType::Archive);
        assert_eq!(classify("stream.m3u8"), FileType::Video);
    }

    #[test]
    fn test_classify_uses_last_extension() {
        assert_eq!(classify("archive.tar.gz"), FileType::Archive);
        assert_eq!(classify("movie.mp4.part"), FileType::Unknown);
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify("noext"), FileType::Unknown);
        assert_eq!(classify("trailing."), FileType::Unknown);
        assert_eq!(classify(".hidden"), FileType::Unknown);
        assert_eq!(classify("setup.exe"), FileType::Unknown);
    }

    #[test]
    fn test_is_playable_video() {
        assert!(is_playable_video("clip.webm"));
        assert!(is_playable_video("CLIP.FLV"));
        assert!(!is_playable_video("clip.srt"));
        assert!(!is_playable_video("clip"));
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe("a.MKV"), "Video MKV");
        assert_eq!(describe("a.srt"), "Subtítulos");
        assert_eq!(describe("a.webm"), "Archivo");
    }
}
