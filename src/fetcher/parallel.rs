use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use url::Url;

use crate::fetcher::{DirectoryFetcher, FetchError, Listing};

pub const DEFAULT_WORKERS: usize = 4;

/// Fans directory fetches out over tokio tasks, bounded by a semaphore.
pub struct ParallelFetcher {
    fetcher: Arc<dyn DirectoryFetcher + Send + Sync>,
    semaphore: Arc<Semaphore>,
}

impl ParallelFetcher {
    pub fn new(fetcher: Arc<dyn DirectoryFetcher + Send + Sync>) -> Self {
        Self::with_workers(fetcher, DEFAULT_WORKERS)
    }

    pub fn with_workers(fetcher: Arc<dyn DirectoryFetcher + Send + Sync>, workers: usize) -> Self {
        Self {
            fetcher,
            semaphore: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    /// Fetch every URL. The result at index `i` belongs to `urls[i]`,
    /// whatever order the requests complete in.
    pub async fn fetch_all(&self, urls: Vec<Url>) -> Vec<Result<Listing, FetchError>> {
        let handles: Vec<_> = urls
            .into_iter()
            .map(|url| {
                let fetcher = self.fetcher.clone();
                let semaphore = self.semaphore.clone();

                tokio::spawn(async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|e| FetchError::Task(e.to_string()))?;
                    fetcher.fetch_directory(&url).await
                })
            })
            .collect();

        join_all(handles)
            .await
            .into_iter()
            .map(|joined| match joined {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!("Task join error: {}", e);
                    Err(FetchError::Task(e.to_string()))
                }
            })
            .collect()
    }
}
