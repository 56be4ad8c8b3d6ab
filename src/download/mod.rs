//! Download service boundary.
//!
//! A download is fire-and-forget: [`DownloadService::request_download`]
//! starts the transfer and hands back a [`DownloadHandle`], a typed stream
//! of [`DownloadEvent`]s ending in `Completed` or `Failed`. Dropping the
//! handle does not cancel the transfer.

mod http_downloader;

pub use http_downloader::HttpDownloader;

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tracing::info;
use url::Url;

use crate::app::{Result, VisualesError};
use crate::fetcher::DirectoryFetcher;

const EVENT_BUFFER: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: Url,
    pub file_name: String,
    pub destination_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadProgress {
    pub file_name: String,
    /// Rounded percentage, only known when the server sent a length.
    pub percent: Option<u8>,
    pub bytes_received: u64,
    pub total_bytes: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadEvent {
    Progress(DownloadProgress),
    Completed { file_name: String, path: PathBuf },
    Failed { file_name: String, error: String },
}

impl DownloadEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, DownloadEvent::Progress(_))
    }
}

pub struct DownloadHandle {
    file_name: String,
    rx: mpsc::Receiver<DownloadEvent>,
}

impl DownloadHandle {
    /// Create a handle and the sender a transfer task reports through.
    pub fn channel(file_name: &str) -> (mpsc::Sender<DownloadEvent>, Self) {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let handle = Self {
            file_name: file_name.to_string(),
            rx,
        };
        (tx, handle)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Next event, or `None` once the transfer task is gone.
    pub async fn next_event(&mut self) -> Option<DownloadEvent> {
        self.rx.recv().await
    }

    /// Drain events until the transfer ends, passing each one to `on_event`.
    pub async fn wait_with<F>(mut self, mut on_event: F) -> std::result::Result<PathBuf, String>
    where
        F: FnMut(&DownloadEvent),
    {
        while let Some(event) = self.rx.recv().await {
            on_event(&event);
            match event {
                DownloadEvent::Completed { path, .. } => return Ok(path),
                DownloadEvent::Failed { error, .. } => return Err(error),
                DownloadEvent::Progress(_) => {}
            }
        }
        Err(format!("download of {} ended without a result", self.file_name))
    }

    pub async fn wait(self) -> std::result::Result<PathBuf, String> {
        self.wait_with(|_| {}).await
    }
}

pub trait DownloadService {
    fn request_download(&self, request: DownloadRequest) -> DownloadHandle;
}

/// Reduce a listing name to a single safe path component.
///
/// `"Temporada 1/"` → `"Temporada 1"`, `"../../etc/passwd"` → `"passwd"`.
/// Returns `None` when nothing usable is left.
pub fn sanitize_file_name(name: &str) -> Option<String> {
    let last = name
        .trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()?
        .trim();

    match last {
        "" | "." | ".." => None,
        s => Some(s.to_string()),
    }
}

/// Outcome of one file of a folder download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub file_name: String,
    /// Absolute URL the file was listed under.
    pub url: String,
    pub result: std::result::Result<PathBuf, String>,
}

/// Follows a folder download file by file.
pub trait FolderObserver {
    /// Called right before each file is requested.
    fn file_started(&mut self, _request: &DownloadRequest) {}

    fn on_event(&mut self, event: &DownloadEvent);
}

/// Download every file directly inside the listing at `url` into
/// `destination_root/<name>`, one at a time. Subdirectories are not entered.
pub async fn download_folder<O: FolderObserver>(
    fetcher: &(dyn DirectoryFetcher + Send + Sync),
    downloader: &(dyn DownloadService + Send + Sync),
    url: &Url,
    name: &str,
    destination_root: &Path,
    observer: &mut O,
) -> Result<Vec<FileOutcome>> {
    let folder_name = sanitize_file_name(name)
        .ok_or_else(|| VisualesError::Download(format!("invalid folder name {:?}", name)))?;
    let listing = fetcher.fetch_directory(url).await?;
    let folder = destination_root.join(folder_name);
    tokio::fs::create_dir_all(&folder).await?;

    let files: Vec<_> = listing
        .items
        .into_iter()
        .filter(|item| !item.is_directory)
        .collect();
    info!("Downloading {} files into {}", files.len(), folder.display());

    let mut outcomes = Vec::with_capacity(files.len());
    for file in files {
        let result = match Url::parse(&file.url) {
            Ok(file_url) => {
                let request = DownloadRequest {
                    url: file_url,
                    file_name: file.name.clone(),
                    destination_dir: folder.clone(),
                };
                observer.file_started(&request);
                let handle = downloader.request_download(request);
                handle.wait_with(|e| observer.on_event(e)).await
            }
            Err(e) => Err(e.to_string()),
        };
        outcomes.push(FileOutcome {
            file_name: file.name,
            url: file.url,
            result,
        });
    }

    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::fetcher::FetchError;
    use crate::test_support::StubFetcher;

    /// Completes every request immediately, failing names that contain "bad".
    #[derive(Default)]
    struct InstantDownloader {
        requests: Mutex<Vec<DownloadRequest>>,
    }

    impl DownloadService for InstantDownloader {
        fn request_download(&self, request: DownloadRequest) -> DownloadHandle {
            let (tx, handle) = DownloadHandle::channel(&request.file_name);
            let event = if request.file_name.contains("bad") {
                DownloadEvent::Failed {
                    file_name: request.file_name.clone(),
                    error: "interrupted".into(),
                }
            } else {
                DownloadEvent::Completed {
                    file_name: request.file_name.clone(),
                    path: request.destination_dir.join(&request.file_name),
                }
            };
            tx.try_send(event).unwrap();
            self.requests.lock().unwrap().push(request);
            handle
        }
    }

    #[derive(Default)]
    struct Recorder {
        started: Vec<String>,
        events: usize,
    }

    impl FolderObserver for Recorder {
        fn file_started(&mut self, request: &DownloadRequest) {
            self.started.push(request.url.to_string());
        }

        fn on_event(&mut self, _event: &DownloadEvent) {
            self.events += 1;
        }
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("movie.mkv").as_deref(), Some("movie.mkv"));
        assert_eq!(sanitize_file_name("Temporada 1/").as_deref(), Some("Temporada 1"));
        assert_eq!(sanitize_file_name("../../etc/passwd").as_deref(), Some("passwd"));
        assert_eq!(sanitize_file_name("a\\b.txt").as_deref(), Some("b.txt"));
        assert_eq!(sanitize_file_name(".."), None);
        assert_eq!(sanitize_file_name("/"), None);
        assert_eq!(sanitize_file_name(""), None);
    }

    #[tokio::test]
    async fn test_wait_returns_terminal_event() {
        let (tx, handle) = DownloadHandle::channel("a.mp4");
        tx.send(DownloadEvent::Progress(DownloadProgress {
            file_name: "a.mp4".into(),
            percent: Some(50),
            bytes_received: 5,
            total_bytes: Some(10),
        }))
        .await
        .unwrap();
        tx.send(DownloadEvent::Completed {
            file_name: "a.mp4".into(),
            path: PathBuf::from("/tmp/a.mp4"),
        })
        .await
        .unwrap();

        let mut seen = Vec::new();
        let result = handle.wait_with(|e| seen.push(e.clone())).await;

        assert_eq!(result, Ok(PathBuf::from("/tmp/a.mp4")));
        assert_eq!(seen.len(), 2);
        assert!(!seen[0].is_terminal());
        assert!(seen[1].is_terminal());
    }

    #[tokio::test]
    async fn test_wait_without_terminal_event_is_an_error() {
        let (tx, handle) = DownloadHandle::channel("a.mp4");
        drop(tx);
        assert!(handle.wait().await.is_err());
    }

    #[tokio::test]
    async fn test_download_folder_fetches_files_only() {
        let dir = tempfile::tempdir().unwrap();
        let stub = StubFetcher::new().with_listing(
            "/Series/Lost/",
            &["Extras/", "e01.mkv", "e01-bad.srt", "e02.mkv"],
        );
        let downloader = InstantDownloader::default();
        let url = Url::parse("https://visuales.uclv.cu/Series/Lost/").unwrap();

        let mut recorder = Recorder::default();
        let outcomes = download_folder(&stub, &downloader, &url, "Lost/", dir.path(), &mut recorder)
            .await
            .unwrap();

        let folder = dir.path().join("Lost");
        assert!(folder.is_dir());
        assert_eq!(recorder.events, 3);
        assert_eq!(recorder.started.len(), 3);
        assert_eq!(outcomes[0].url, "https://visuales.uclv.cu/Series/Lost/e01.mkv");
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].result, Ok(folder.join("e01.mkv")));
        assert_eq!(outcomes[1].result, Err("interrupted".to_string()));
        assert_eq!(outcomes[2].file_name, "e02.mkv");

        let requests = downloader.requests.lock().unwrap();
        assert!(requests.iter().all(|r| r.destination_dir == folder));
        assert_eq!(
            requests[0].url.as_str(),
            "https://visuales.uclv.cu/Series/Lost/e01.mkv"
        );
    }

    #[tokio::test]
    async fn test_download_folder_listing_failure() {
        let dir = tempfile::tempdir().unwrap();
        let stub =
            StubFetcher::new().with_failure("/Series/Lost/", FetchError::Timeout("lost".into()));
        let url = Url::parse("https://visuales.uclv.cu/Series/Lost/").unwrap();

        let err = download_folder(
            &stub,
            &InstantDownloader::default(),
            &url,
            "Lost",
            dir.path(),
            &mut Recorder::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, VisualesError::Fetch(FetchError::Timeout(_))));
        assert!(!dir.path().join("Lost").exists());
    }

    #[tokio::test]
    async fn test_download_folder_keeps_listed_urls() {
        let dir = tempfile::tempdir().unwrap();
        let stub = StubFetcher::new().with_listing("/Cursos/", &["Clase 1.mkv", "50%.pdf"]);
        let downloader = InstantDownloader::default();
        let url = Url::parse("https://visuales.uclv.cu/Cursos/").unwrap();

        let mut recorder = Recorder::default();
        let outcomes = download_folder(&stub, &downloader, &url, "Cursos", dir.path(), &mut recorder)
            .await
            .unwrap();

        let listed: Vec<_> = outcomes.iter().map(|o| o.url.clone()).collect();
        assert_eq!(recorder.started, listed);
        let requests = downloader.requests.lock().unwrap();
        assert_eq!(requests[0].url.as_str(), listed[0]);
    }
}
