use std::future::Future;
use std::sync::Arc;

use futures::future::try_join_all;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::error::Result;

/// Bounded pool of tokio tasks. At most `max_concurrent` spawned futures run
/// at once; further `spawn` calls wait for a free slot.
pub struct LimitedSpawner {
    semaphore: Arc<Semaphore>,
}

impl LimitedSpawner {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
        }
    }

    pub async fn spawn<F>(&self, f: F) -> Result<JoinHandle<F::Output>>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let permit = Arc::clone(&self.semaphore).acquire_owned().await?;
        // the permit drops with the task, even on panic
        let handle = tokio::spawn(async move {
            let _permit = permit;
            f.await
        });
        Ok(handle)
    }

    /// Spawns every future in order and waits for all of them. Outputs come
    /// back in submission order regardless of completion order.
    pub async fn run_all<I, F>(&self, futures: I) -> Result<Vec<F::Output>>
    where
        I: IntoIterator<Item = F>,
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let mut handles = Vec::new();
        for f in futures {
            handles.push(self.spawn(f).await?);
        }
        Ok(try_join_all(handles).await?)
    }
}
