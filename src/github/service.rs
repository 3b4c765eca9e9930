use crate::error::{ServiceError, ServiceResult};
use crate::github::{client::GitHubClient, models::Repository};
use std::panic::{catch_unwind, AssertUnwindSafe};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

type Callback<T> = Box<dyn FnOnce(ServiceResult<T>) + Send + 'static>;

/// Single-fire reply slot.
///
/// Fires the callback with the result passed to [`Reply::send`], or with a
/// "worker not running" error if dropped unanswered.
struct Reply<T> {
    callback: Option<Callback<T>>,
}

impl<T> Reply<T> {
    fn new(callback: Callback<T>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    fn send(mut self, result: ServiceResult<T>) {
        if let Some(callback) = self.callback.take() {
            invoke(callback, result);
        }
    }
}

impl<T> Drop for Reply<T> {
    fn drop(&mut self) {
        if let Some(callback) = self.callback.take() {
            invoke(callback, Err(stopped()));
        }
    }
}

/// A panicking callback must not take the worker down with it
fn invoke<T>(callback: Callback<T>, result: ServiceResult<T>) {
    if catch_unwind(AssertUnwindSafe(|| callback(result))).is_err() {
        error!("GitHub service callback panicked");
    }
}

enum Job {
    List {
        page: u32,
        reply: Reply<Vec<Repository>>,
    },
    Readme {
        owner: String,
        name: String,
        reply: Reply<String>,
    },
}

/// Callback front end for [`GitHubClient`].
///
/// A single worker task owns the client and runs queued calls one after
/// another. Each callback is invoked exactly once, from that worker, in the
/// order the calls were queued. Handles are cheap to clone; the worker stops
/// once every handle is dropped and the queue is drained.
#[derive(Clone)]
pub struct GitHubService {
    sender: mpsc::UnboundedSender<Job>,
}

impl GitHubService {
    /// Start the worker task. Must be called inside a tokio runtime.
    pub fn spawn(client: GitHubClient) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(run(client, receiver));
        Self { sender }
    }

    /// Queue a repository listing
    pub fn list<F>(&self, page: u32, callback: F)
    where
        F: FnOnce(ServiceResult<Vec<Repository>>) + Send + 'static,
    {
        self.enqueue(Job::List {
            page,
            reply: Reply::new(Box::new(callback)),
        });
    }

    /// Queue a README lookup
    pub fn get_readme<F>(&self, owner: &str, name: &str, callback: F)
    where
        F: FnOnce(ServiceResult<String>) + Send + 'static,
    {
        self.enqueue(Job::Readme {
            owner: owner.to_string(),
            name: name.to_string(),
            reply: Reply::new(Box::new(callback)),
        });
    }

    /// Queue a README lookup for a listed repository
    pub fn get_readme_for<F>(&self, repository: &Repository, callback: F)
    where
        F: FnOnce(ServiceResult<String>) + Send + 'static,
    {
        self.get_readme(repository.owner().login(), repository.name(), callback);
    }

    /// Queue a listing and wait for its result
    pub async fn list_async(&self, page: u32) -> ServiceResult<Vec<Repository>> {
        let (tx, rx) = oneshot::channel();
        self.list(page, move |result| {
            let _ = tx.send(result);
        });
        rx.await.unwrap_or_else(|_| Err(stopped()))
    }

    /// Queue a README lookup and wait for its result
    pub async fn get_readme_async(&self, owner: &str, name: &str) -> ServiceResult<String> {
        let (tx, rx) = oneshot::channel();
        self.get_readme(owner, name, move |result| {
            let _ = tx.send(result);
        });
        rx.await.unwrap_or_else(|_| Err(stopped()))
    }

    fn enqueue(&self, job: Job) {
        // A closed queue hands the job back; dropping it fires the callback
        if self.sender.send(job).is_err() {
            debug!("GitHub service worker is not running");
        }
    }
}

fn stopped() -> ServiceError {
    ServiceError::Network("GitHub service worker is not running".to_string())
}

async fn run(client: GitHubClient, mut receiver: mpsc::UnboundedReceiver<Job>) {
    info!("GitHub service worker started");

    while let Some(job) = receiver.recv().await {
        match job {
            Job::List { page, reply } => {
                debug!("Listing repositories, page {}", page);
                reply.send(client.list(page).await);
            }
            Job::Readme { owner, name, reply } => {
                debug!("Fetching README for {}/{}", owner, name);
                reply.send(client.get_readme(&owner, &name).await);
            }
        }
    }

    info!("GitHub service worker stopped");
}
