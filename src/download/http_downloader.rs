use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::app::{Result, VisualesError};
use crate::config::HttpConfig;
use crate::download::{
    sanitize_file_name, DownloadEvent, DownloadHandle, DownloadProgress, DownloadRequest,
    DownloadService,
};

/// Streams files to disk with reqwest. Each request runs on its own task.
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        // Per-read timeout only: a large file may take far longer than a listing.
        let stall = Duration::from_secs(config.timeout_secs);
        let client = Client::builder()
            .connect_timeout(stall)
            .read_timeout(stall)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }
}

impl DownloadService for HttpDownloader {
    fn request_download(&self, request: DownloadRequest) -> DownloadHandle {
        let (tx, handle) = DownloadHandle::channel(&request.file_name);
        let client = self.client.clone();

        tokio::spawn(async move {
            let file_name = request.file_name.clone();
            let event = match transfer(&client, &request, &tx).await {
                Ok(path) => {
                    info!("Downloaded {} to {}", file_name, path.display());
                    DownloadEvent::Completed { file_name, path }
                }
                Err(e) => {
                    warn!("Download of {} failed: {}", file_name, e);
                    DownloadEvent::Failed {
                        file_name,
                        error: e.to_string(),
                    }
                }
            };
            // Receiver may be gone; the download still counts as done
            let _ = tx.send(event).await;
        });

        handle
    }
}

fn percent_of(received: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    ((received as f64 / total as f64) * 100.0).round().min(100.0) as u8
}

async fn transfer(
    client: &Client,
    request: &DownloadRequest,
    tx: &mpsc::Sender<DownloadEvent>,
) -> Result<PathBuf> {
    let file_name = sanitize_file_name(&request.file_name).ok_or_else(|| {
        VisualesError::Download(format!("invalid file name {:?}", request.file_name))
    })?;

    tokio::fs::create_dir_all(&request.destination_dir).await?;
    let path = request.destination_dir.join(file_name);

    let mut response = client
        .get(request.url.clone())
        .send()
        .await?
        .error_for_status()?;
    let total = response.content_length();

    let mut file = tokio::fs::File::create(&path).await?;
    let mut received: u64 = 0;

    let copied: Result<()> = async {
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            received += chunk.len() as u64;

            let progress = DownloadProgress {
                file_name: request.file_name.clone(),
                percent: total.map(|t| percent_of(received, t)),
                bytes_received: received,
                total_bytes: total,
            };
            let _ = tx.send(DownloadEvent::Progress(progress)).await;
        }
        file.flush().await?;
        Ok(())
    }
    .await;

    if let Err(e) = copied {
        drop(file);
        let _ = tokio::fs::remove_file(&path).await;
        return Err(e);
    }

    Ok(path)
}
