use crate::github::{parse_repository_ref, GitHubService, Repository};
use crate::utils::form_codec;
use crate::{Error, Result};
use std::collections::BTreeMap;
use tracing::info;

/// List one page of repositories
pub async fn list(service: &GitHubService, page: u32) -> Result<()> {
    let repositories = service.list_async(page).await?;
    info!("Fetched {} repositories (page {})", repositories.len(), page);

    print!("{}", format_repositories(&repositories, page));
    Ok(())
}

/// Print the README of a repository
pub async fn readme(service: &GitHubService, repository: &str) -> Result<()> {
    let repository = parse_repository_ref(repository)?;
    let text = service
        .get_readme_async(&repository.owner, &repository.name)
        .await?;

    println!("{text}");
    Ok(())
}

/// Encode `key=value` arguments as a query string
pub fn encode(pairs: &[String]) -> Result<()> {
    let params = pairs
        .iter()
        .map(|pair| parse_pair(pair))
        .collect::<Result<BTreeMap<_, _>>>()?;

    println!("{}", form_codec::encode(&params)?);
    Ok(())
}

/// Decode a query string and print one parameter per line
pub fn decode(query: &str) -> Result<()> {
    let params: BTreeMap<_, _> = form_codec::decode(query)?.into_iter().collect();

    for (key, value) in params {
        println!("{key} = {value}");
    }
    Ok(())
}

fn parse_pair(pair: &str) -> Result<(&str, &str)> {
    pair.split_once('=')
        .ok_or_else(|| Error::Validation(format!("Expected key=value, got: {pair}")))
}

fn format_repositories(repositories: &[Repository], page: u32) -> String {
    if repositories.is_empty() {
        return format!("No repositories on page {page}\n");
    }

    let mut out = format!(
        "\n{:<40} {:>8} {:>8} {:>8}\n{}\n",
        "Repository",
        "Stars",
        "Watchers",
        "Forks",
        "-".repeat(67)
    );

    for repo in repositories {
        out.push_str(&format!(
            "{:<40} {:>8} {:>8} {:>8}\n",
            truncate(repo.full_name(), 38),
            repo.stars_count(),
            repo.watcher_count(),
            repo.fork_count()
        ));
    }

    out.push_str(&format!("\nPage {page}\n"));
    out
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
