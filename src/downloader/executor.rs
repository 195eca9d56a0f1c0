use std::path::Path;

use reqwest::StatusCode;
use tokio::fs;
use tracing::{debug, warn};

use crate::downloader::planer::Action;
use crate::downloader::{Failure, Outcome};
use crate::error::Result;
use crate::utils::limited_spawner::LimitedSpawner;

/// Fetches one book and writes it to `path`. Never fails the caller: every
/// problem is folded into the returned [`Outcome`].
pub async fn download_one(client: &reqwest::Client, title: &str, url: &str, path: &Path) -> Outcome {
    debug!(%url, path = %path.display(), "downloading");

    let outcome = match fetch_and_write(client, url, path).await {
        Ok(bytes) => {
            Outcome::Downloaded {
                title: title.to_string(),
                path: path.to_path_buf(),
                bytes,
            }
        }
        Err(reason) => {
            if !matches!(reason, Failure::Status(_)) {
                warn!(%url, %reason, "download failed");
            }
            Outcome::Failed {
                title: title.to_string(),
                reason,
            }
        }
    };
    println!("{}", outcome);
    outcome
}

async fn fetch_and_write(
    client: &reqwest::Client,
    url: &str,
    path: &Path,
) -> std::result::Result<usize, Failure> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if status != StatusCode::OK {
        return Err(Failure::Status(status.as_u16()));
    }
    let body = response.bytes().await?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, &body).await?;
    Ok(body.len())
}

async fn execute_action(client: reqwest::Client, action: Action) -> Result<Option<Outcome>> {
    Ok(match action {
        Action::Download { title, url, path } => {
            Some(download_one(&client, &title, &url, &path).await)
        }
        Action::MakeDir { path } => {
            fs::create_dir_all(&path).await?;
            None
        }
    })
}

/// Runs every action on a pool of `concurrency` workers and waits for all of
/// them. Download outcomes come back in plan order.
///
/// Leading `MakeDir` actions run first, before anything is spawned, so a
/// directory that cannot be created stops the run before any request goes out.
pub async fn execute_actions(
    client: &reqwest::Client,
    actions: Vec<Action>,
    concurrency: usize,
) -> Result<Vec<Outcome>> {
    let mut actions = actions.into_iter().peekable();
    while let Some(action) = actions.next_if(|a| matches!(a, Action::MakeDir { .. })) {
        if let Action::MakeDir { path } = action {
            fs::create_dir_all(&path).await?;
        }
    }

    let spawner = LimitedSpawner::new(concurrency);
    let results = spawner
        .run_all(actions.map(|action| execute_action(client.clone(), action)))
        .await?;

    let mut outcomes = Vec::with_capacity(results.len());
    for result in results {
        if let Some(outcome) = result? {
            outcomes.push(outcome);
        }
    }
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, routing::get};
    use std::net::SocketAddr;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;
    use tokio::net::TcpListener;

    async fn start_mock_site(app: Router) -> String {
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_download_one_writes_body() {
        let base_url = start_mock_site(
            Router::new().route("/ebooks/84.txt.utf-8", get(|| async { "It was on a dreary night" })),
        )
        .await;
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("books").join("Frankenstein.txt");

        let client = reqwest::Client::new();
        let outcome = download_one(
            &client,
            "Frankenstein",
            &format!("{}/ebooks/84.txt.utf-8", base_url),
            &path,
        )
        .await;

        assert_eq!(
            outcome,
            Outcome::Downloaded {
                title: "Frankenstein".to_string(),
                path: path.clone(),
                bytes: 24,
            }
        );
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "It was on a dreary night");
    }

    #[tokio::test]
    async fn test_download_one_non_200_writes_nothing() {
        let base_url = start_mock_site(Router::new()).await;
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Missing.txt");

        let client = reqwest::Client::new();
        let outcome = download_one(
            &client,
            "Missing",
            &format!("{}/ebooks/0.txt.utf-8", base_url),
            &path,
        )
        .await;

        assert_eq!(
            outcome,
            Outcome::Failed {
                title: "Missing".to_string(),
                reason: Failure::Status(404),
            }
        );
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_download_one_transport_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Nowhere.txt");

        let client = reqwest::Client::new();
        let outcome = download_one(
            &client,
            "Nowhere",
            "http://invalid-url:9999/ebooks/1.txt.utf-8",
            &path,
        )
        .await;

        assert!(matches!(
            outcome,
            Outcome::Failed {
                reason: Failure::Transport(_),
                ..
            }
        ));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_download_one_write_error() {
        let base_url =
            start_mock_site(Router::new().route("/ebooks/1.txt.utf-8", get(|| async { "text" })))
                .await;
        let dir = TempDir::new().unwrap();
        // a regular file where the parent directory should be
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        let path = blocker.join("Book.txt");

        let client = reqwest::Client::new();
        let outcome =
            download_one(&client, "Book", &format!("{}/ebooks/1.txt.utf-8", base_url), &path).await;

        assert!(matches!(
            outcome,
            Outcome::Failed {
                reason: Failure::Io(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_execute_actions_skips_make_dir_outcomes() {
        let base_url =
            start_mock_site(Router::new().route("/ebooks/1.txt.utf-8", get(|| async { "one" })))
                .await;
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("archive");

        let actions = vec![
            Action::MakeDir { path: out.clone() },
            Action::Download {
                title: "One".to_string(),
                url: format!("{}/ebooks/1.txt.utf-8", base_url),
                path: out.join("One.txt"),
            },
        ];

        let client = reqwest::Client::new();
        let outcomes = execute_actions(&client, actions, 2).await.unwrap();

        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].is_downloaded());
        assert!(out.is_dir());
    }

    #[tokio::test]
    async fn test_concurrent_make_dir() {
        let base_url =
            start_mock_site(Router::new().route("/ebooks/1.txt.utf-8", get(|| async { "text" })))
                .await;
        let dir = TempDir::new().unwrap();
        let out: PathBuf = dir.path().join("archive").join("nested");

        // no leading MakeDir: every worker creates the missing parent itself
        let actions = (0..32)
            .map(|i| Action::Download {
                title: format!("Book {}", i),
                url: format!("{}/ebooks/1.txt.utf-8", base_url),
                path: out.join(format!("Book {}.txt", i)),
            })
            .collect::<Vec<_>>();

        let client = reqwest::Client::new();
        let outcomes = execute_actions(&client, actions, 16).await.unwrap();

        assert_eq!(outcomes.len(), 32);
        assert!(outcomes.iter().all(|o| o.is_downloaded()));
        assert!(out.is_dir());
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 32);
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[tokio::test]
    async fn test_make_dir_failure_stops_before_downloading() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let base_url = start_mock_site(Router::new().route(
            "/ebooks/1.txt.utf-8",
            get(move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    "text"
                }
            }),
        ))
        .await;

        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        let out = blocker.join("archive");

        let actions = vec![
            Action::MakeDir { path: out.clone() },
            Action::Download {
                title: "One".to_string(),
                url: format!("{}/ebooks/1.txt.utf-8", base_url),
                path: out.join("One.txt"),
            },
            Action::Download {
                title: "Two".to_string(),
                url: format!("{}/ebooks/1.txt.utf-8", base_url),
                path: out.join("Two.txt"),
            },
        ];

        let client = reqwest::Client::new();
        let result = execute_actions(&client, actions, 2).await;

        assert!(result.is_err());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_make_dir_failure_propagates() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();

        let client = reqwest::Client::new();
        let result = execute_actions(
            &client,
            vec![Action::MakeDir {
                path: blocker.join("archive"),
            }],
            1,
        )
        .await;

        assert!(result.is_err());
    }
}
