use std::io::Write;
use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;
use url::Url;

use crate::app::{AppContext, Result, VisualesError};
use crate::domain::{format_bytes, DownloadRecord, DownloadStatus, Favorite, FileType, ListingEntry};
use crate::download::{
    download_folder, sanitize_file_name, DownloadEvent, DownloadProgress, DownloadRequest,
    DownloadService, FolderObserver,
};
use crate::listing::classify;
use crate::navigator::breadcrumb_for;
use crate::store::Store;

/// Last non-empty path segment of a URL, percent-decoded.
pub fn name_from_url(url: &Url) -> String {
    url.path()
        .split('/')
        .filter(|s| !s.is_empty())
        .next_back()
        .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
        .unwrap_or_else(|| url.host_str().unwrap_or_default().to_string())
}

pub fn print_entries(entries: &[ListingEntry]) {
    if entries.is_empty() {
        println!("No content in this folder");
        return;
    }

    for (i, entry) in entries.iter().enumerate() {
        println!(
            "{:>4}  {:<8} {:>10}  {:<17} {}",
            i + 1,
            entry.file_type,
            entry.display_size(),
            entry.date,
            entry.name
        );
    }
}

fn progress_line(p: &DownloadProgress) -> String {
    match (p.percent, p.total_bytes) {
        (Some(percent), Some(total)) => format!(
            "{}% - {} / {}",
            percent,
            format_bytes(p.bytes_received),
            format_bytes(total)
        ),
        _ => format_bytes(p.bytes_received),
    }
}

/// Print progress on a single terminal line.
fn render_event(event: &DownloadEvent) {
    match event {
        DownloadEvent::Progress(p) => {
            eprint!("\r  {}: {}   ", p.file_name, progress_line(p));
            let _ = std::io::stderr().flush();
        }
        DownloadEvent::Completed { file_name, path } => {
            eprintln!("\r  Done {} -> {}", file_name, path.display());
        }
        DownloadEvent::Failed { file_name, error } => {
            eprintln!("\r  Could not download {}: {}", file_name, error);
        }
    }
}

pub fn list_categories(ctx: &AppContext) -> Result<()> {
    for category in &ctx.config.categories {
        println!("{} {:<14} {:<14} {}", category.icon, category.id, category.name, category.url);
    }
    Ok(())
}

pub async fn list_directory(ctx: &AppContext, location: &str, json: bool) -> Result<()> {
    let url = ctx.resolve(location)?;
    let listing = ctx.fetcher.fetch_directory(&url).await?;

    record_visit(ctx, &url);

    if json {
        println!("{}", serde_json::to_string_pretty(&listing.items)?);
        return Ok(());
    }

    let trail: Vec<_> = breadcrumb_for(url.path())
        .into_iter()
        .map(|c| c.label)
        .collect();
    println!("{}\n", trail.join(" / "));
    print_entries(&listing.items);
    Ok(())
}

/// Store a browsing-history entry; failures are logged, never surfaced.
pub fn record_visit(ctx: &AppContext, url: &Url) {
    if let Err(e) = ctx.store.record_visit(url.path(), &name_from_url(url)) {
        tracing::warn!("Could not record visit to {}: {}", url, e);
    }
}

pub async fn search(ctx: &AppContext, query: &str, json: bool) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        return Err(VisualesError::Other("Search query is empty".into()));
    }

    let outcome = ctx
        .search_aggregator()
        .search(query, &ctx.config.categories)
        .await;

    for failure in outcome.failures() {
        eprintln!("  Error searching in {}", failure.category_name);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.results)?);
        return Ok(());
    }

    if outcome.all_failed() {
        println!("Could not reach any category");
    } else if outcome.results.is_empty() {
        println!("No results for \"{}\"", query);
    } else {
        for (i, result) in outcome.results.iter().enumerate() {
            println!(
                "{:>4}  {:<14} {:<8} {:>10}  {}",
                i + 1,
                result.category,
                result.entry.file_type,
                result.entry.display_size(),
                result.entry.name
            );
        }
    }

    Ok(())
}

fn destination(ctx: &AppContext, dest: Option<PathBuf>) -> Result<PathBuf> {
    match dest {
        Some(dir) => Ok(dir),
        None => ctx.download_dir(),
    }
}

/// Pending download-log row for `request`, pointing at the file the
/// downloader will actually write.
fn pending_record(request: &DownloadRequest) -> DownloadRecord {
    let stored_name =
        sanitize_file_name(&request.file_name).unwrap_or_else(|| request.file_name.clone());
    DownloadRecord::new(
        request.file_name.clone(),
        request.url.to_string(),
        request
            .destination_dir
            .join(stored_name)
            .to_string_lossy()
            .into_owned(),
    )
}

/// Download one file, keeping the download log in sync.
pub async fn download_file(ctx: &AppContext, url: Url, file_name: &str, dest: &Path) -> Result<PathBuf> {
    let request = DownloadRequest {
        url,
        file_name: file_name.to_string(),
        destination_dir: dest.to_path_buf(),
    };
    let id = ctx.store.add_download(&pending_record(&request))?;

    println!("Downloading {}", file_name);
    let handle = ctx.downloader.request_download(request);

    match handle.wait_with(render_event).await {
        Ok(path) => {
            ctx.store
                .set_download_status(id, DownloadStatus::Completed, None)?;
            Ok(path)
        }
        Err(error) => {
            ctx.store
                .set_download_status(id, DownloadStatus::Failed, Some(&error))?;
            Err(VisualesError::Download(error))
        }
    }
}

pub async fn download(ctx: &AppContext, location: &str, dest: Option<PathBuf>) -> Result<()> {
    let url = ctx.resolve(location)?;
    let dest = destination(ctx, dest)?;
    let file_name = name_from_url(&url);
    download_file(ctx, url, &file_name, &dest).await?;
    Ok(())
}

/// Mirrors a folder download into the download log: a pending row per file
/// before it is requested, settled by its terminal event.
struct FolderLog<'a> {
    ctx: &'a AppContext,
    current: Option<i64>,
}

impl FolderObserver for FolderLog<'_> {
    fn file_started(&mut self, request: &DownloadRequest) {
        self.current = match self.ctx.store.add_download(&pending_record(request)) {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!("Could not record download of {}: {}", request.file_name, e);
                None
            }
        };
    }

    fn on_event(&mut self, event: &DownloadEvent) {
        render_event(event);
        let (status, error) = match event {
            DownloadEvent::Completed { .. } => (DownloadStatus::Completed, None),
            DownloadEvent::Failed { error, .. } => (DownloadStatus::Failed, Some(error.as_str())),
            DownloadEvent::Progress(_) => return,
        };
        if let Some(id) = self.current.take() {
            if let Err(e) = self.ctx.store.set_download_status(id, status, error) {
                tracing::warn!("Could not update download {}: {}", id, e);
            }
        }
    }
}

pub async fn download_directory(ctx: &AppContext, location: &str, dest: Option<PathBuf>) -> Result<()> {
    let url = ctx.resolve(location)?;
    let dest = destination(ctx, dest)?;
    let name = name_from_url(&url);

    let mut log = FolderLog { ctx, current: None };
    let outcomes = download_folder(
        ctx.fetcher.as_ref(),
        ctx.downloader.as_ref(),
        &url,
        &name,
        &dest,
        &mut log,
    )
    .await?;

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    println!(
        "Folder \"{}\" downloaded: {} files, {} errors",
        name,
        outcomes.len() - failed,
        failed
    );
    Ok(())
}

pub fn favorite_for(url: &Url) -> Favorite {
    let name = name_from_url(url);
    let file_type = if url.path().ends_with('/') {
        FileType::Folder
    } else {
        classify(&name)
    };
    Favorite::new(url.to_string(), name, file_type)
}

pub fn add_favorite(ctx: &AppContext, location: &str) -> Result<()> {
    let url = ctx.resolve(location)?;
    let favorite = favorite_for(&url);
    if ctx.store.add_favorite(&favorite)? {
        println!("Added to favorites: {}", favorite.name);
    } else {
        println!("Already a favorite: {}", favorite.name);
    }
    Ok(())
}

pub fn remove_favorite(ctx: &AppContext, location: &str) -> Result<()> {
    let url = ctx.resolve(location)?;
    if !ctx.store.remove_favorite(url.as_str())? {
        return Err(VisualesError::EntryNotFound(url.to_string()));
    }
    println!("Removed favorite: {}", url);
    Ok(())
}

pub fn list_favorites(ctx: &AppContext) -> Result<()> {
    let favorites = ctx.store.favorites()?;
    if favorites.is_empty() {
        println!("No favorites yet");
        return Ok(());
    }
    for favorite in favorites {
        println!("{:<8} {}\n  {}", favorite.file_type, favorite.name, favorite.url);
    }
    Ok(())
}

pub fn list_history(ctx: &AppContext, limit: usize) -> Result<()> {
    let visits = ctx.store.recent_visits(limit)?;
    if visits.is_empty() {
        println!("No history");
        return Ok(());
    }
    for visit in visits {
        println!(
            "{}  {:<30} {}",
            visit.visited_at.format("%Y-%m-%d %H:%M"),
            visit.name,
            visit.path
        );
    }
    Ok(())
}

pub fn list_downloads(ctx: &AppContext) -> Result<()> {
    let downloads = ctx.store.downloads()?;
    if downloads.is_empty() {
        println!("No downloads");
        return Ok(());
    }
    for d in &downloads {
        println!(
            "{:>4}  {:<9} {}  {}",
            d.id,
            d.status.as_str(),
            d.created_at.format("%Y-%m-%d %H:%M"),
            d.name
        );
        if let Some(error) = &d.error {
            println!("        {}", error);
        }
    }
    println!("{} active", ctx.store.active_download_count()?);
    Ok(())
}

pub fn remove_download(ctx: &AppContext, id: i64) -> Result<()> {
    if !ctx.store.remove_download(id)? {
        return Err(VisualesError::EntryNotFound(format!("download {}", id)));
    }
    println!("Removed download {}", id);
    Ok(())
}

pub fn set_download_path(ctx: &AppContext, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    ctx.set_download_dir(dir)?;
    println!("Downloads will be saved to {}", dir.display());
    Ok(())
}

pub fn open_external(ctx: &AppContext, location: &str) -> Result<()> {
    let url = ctx.resolve(location)?;
    open::that(url.as_str())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_name_from_url() {
        let url = Url::parse("https://visuales.uclv.cu/Series/Temporada%201/").unwrap();
        assert_eq!(name_from_url(&url), "Temporada 1");

        let url = Url::parse("https://visuales.uclv.cu/Peliculas/Dune%20(2021).mkv").unwrap();
        assert_eq!(name_from_url(&url), "Dune (2021).mkv");

        let url = Url::parse("https://visuales.uclv.cu/").unwrap();
        assert_eq!(name_from_url(&url), "visuales.uclv.cu");
    }

    #[test]
    fn test_favorite_for_types() {
        let dir = Url::parse("https://visuales.uclv.cu/Series/Lost/").unwrap();
        assert_eq!(favorite_for(&dir).file_type, FileType::Folder);

        let file = Url::parse("https://visuales.uclv.cu/Series/Lost/e01.srt").unwrap();
        let favorite = favorite_for(&file);
        assert_eq!(favorite.file_type, FileType::Subtitle);
        assert_eq!(favorite.name, "e01.srt");
    }

    #[test]
    fn test_progress_line() {
        let p = DownloadProgress {
            file_name: "a".into(),
            percent: Some(50),
            bytes_received: 1024,
            total_bytes: Some(2048),
        };
        assert_eq!(progress_line(&p), "50% - 1 KB / 2 KB");

        let p = DownloadProgress {
            percent: None,
            total_bytes: None,
            ..p
        };
        assert_eq!(progress_line(&p), "1 KB");
    }

    #[test]
    fn test_pending_record_uses_listed_url_and_written_path() {
        let request = DownloadRequest {
            url: Url::parse("https://visuales.uclv.cu/Cursos/a%23b.mkv").unwrap(),
            file_name: "../a#b.mkv".into(),
            destination_dir: PathBuf::from("/downloads/Cursos"),
        };

        let record = pending_record(&request);

        assert_eq!(record.url, "https://visuales.uclv.cu/Cursos/a%23b.mkv");
        assert_eq!(record.name, "../a#b.mkv");
        assert_eq!(
            PathBuf::from(&record.path),
            PathBuf::from("/downloads/Cursos").join("a#b.mkv")
        );
        assert_eq!(record.status, DownloadStatus::Pending);
    }

    #[test]
    fn test_folder_log_counts_in_flight_files() {
        let ctx = AppContext::in_memory(Config::default()).unwrap();
        let mut log = FolderLog {
            ctx: &ctx,
            current: None,
        };
        let request = DownloadRequest {
            url: Url::parse("https://visuales.uclv.cu/Cursos/a%23b.mkv").unwrap(),
            file_name: "a#b.mkv".into(),
            destination_dir: PathBuf::from("/downloads/Cursos"),
        };

        log.file_started(&request);
        assert_eq!(ctx.store.active_download_count().unwrap(), 1);

        log.on_event(&DownloadEvent::Completed {
            file_name: "a#b.mkv".into(),
            path: PathBuf::from("/downloads/Cursos/a#b.mkv"),
        });
        assert_eq!(ctx.store.active_download_count().unwrap(), 0);

        let downloads = ctx.store.downloads().unwrap();
        assert_eq!(downloads.len(), 1);
        assert_eq!(downloads[0].url, "https://visuales.uclv.cu/Cursos/a%23b.mkv");
        assert_eq!(downloads[0].status, DownloadStatus::Completed);
    }
}
