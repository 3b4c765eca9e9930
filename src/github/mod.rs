pub mod client;
pub mod config;
pub mod models;
pub mod parser;
pub mod service;

pub use client::GitHubClient;
pub use config::GitHubConfig;
pub use models::{FileContent, Repository, RepositoryUser, SearchPage};
pub use parser::{parse_repository_ref, RepositoryRef};
pub use service::GitHubService;
