mod common;

use ios_repos::github::{GitHubClient, GitHubConfig, GitHubService};
use ios_repos::ServiceError;
use mockito::{Matcher, Server};
use std::time::Duration;
use tokio::sync::mpsc;

fn page_body(name: &str) -> String {
    format!(
        r#"{{"total_count": 3, "incomplete_results": false, "items": [
            {{"id": 1, "name": "{name}", "full_name": "o/{name}", "html_url": "https://github.com/o/{name}",
              "stargazers_count": 1, "watchers_count": 1, "forks_count": 1,
              "owner": {{"id": 9, "login": "o", "html_url": "https://github.com/o"}}}}
        ]}}"#
    )
}

#[tokio::test]
async fn test_callbacks_fire_once_in_call_order() {
    let mut server = Server::new_async().await;
    for (page, name) in [("1", "first"), ("2", "second"), ("3", "third")] {
        server
            .mock("GET", "/search/repositories")
            .match_query(Matcher::UrlEncoded("page".into(), page.into()))
            .with_status(200)
            .with_body(page_body(name))
            .expect(1)
            .create_async()
            .await;
    }

    let config = GitHubConfig::default().with_base_url(server.url());
    let service = GitHubService::spawn(GitHubClient::new(config).unwrap());

    let (tx, mut rx) = mpsc::unbounded_channel();
    for page in 1..=3 {
        let tx = tx.clone();
        service.list(page, move |result| {
            let _ = tx.send((page, result));
        });
    }
    drop(tx);

    let mut completions = Vec::new();
    while let Some((page, result)) =
        tokio::time::timeout(Duration::from_secs(10), rx.recv()).await.unwrap()
    {
        let repos = result.expect("list failed");
        completions.push((page, repos[0].name().to_string()));
    }

    // Channel closes only after every callback has run and been dropped
    assert_eq!(
        completions,
        vec![
            (1, "first".to_string()),
            (2, "second".to_string()),
            (3, "third".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_async_readme_through_service() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/repos/octocat/Hello-World/contents/README.md")
        .with_status(200)
        .with_body(r#"{"name": "README.md", "sha": "1", "size": 5, "content": "SGVsbG8="}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/repos/octocat/Missing/contents/README.md")
        .with_status(404)
        .create_async()
        .await;

    let config = GitHubConfig::default().with_base_url(server.url());
    let service = GitHubService::spawn(GitHubClient::new(config).unwrap());

    let text = service.get_readme_async("octocat", "Hello-World").await;
    tokio_test::assert_ok!(&text);
    assert_eq!(text.unwrap(), "Hello");

    let missing = service.get_readme_async("octocat", "Missing").await;
    assert_eq!(missing, Err(ServiceError::NotFound));
}

#[tokio::test]
async fn test_service_network_error() {
    let config = GitHubConfig::default().with_base_url("http://127.0.0.1:1");
    let service = GitHubService::spawn(GitHubClient::new(config).unwrap());

    let result = service.list_async(1).await;
    tokio_test::assert_err!(&result);
    assert!(matches!(result, Err(ServiceError::Network(_))));
}

#[tokio::test]
async fn test_panicking_callback_does_not_drop_queued_calls() {
    // Page 0 fails before any network traffic
    let service = GitHubService::spawn(GitHubClient::new(GitHubConfig::default()).unwrap());

    let (tx, mut rx) = mpsc::unbounded_channel();
    service.list(0, |_| panic!("callback failure"));
    for page in 1..=3 {
        let tx = tx.clone();
        service.list(0, move |result| {
            let _ = tx.send((page, result));
        });
    }
    drop(tx);

    let mut fired = Vec::new();
    while let Some((page, result)) =
        tokio::time::timeout(Duration::from_secs(5), rx.recv()).await.unwrap()
    {
        assert!(matches!(result, Err(ServiceError::Request(_))));
        fired.push(page);
    }
    assert_eq!(fired, vec![1, 2, 3]);

    // The worker is still serving
    let result = service.list_async(0).await;
    assert!(matches!(result, Err(ServiceError::Request(_))));
}
