#![allow(dead_code)]

use ios_repos::utils::form_codec;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// One-item search page whose repository is named `page-<page>`
pub fn search_body(page: &str) -> String {
    format!(
        r#"{{"total_count": 3, "incomplete_results": false, "items": [
            {{"id": 1, "name": "page-{page}", "full_name": "o/page-{page}",
              "html_url": "https://github.com/o/page-{page}",
              "stargazers_count": 1, "watchers_count": 1, "forks_count": 1,
              "owner": {{"id": 9, "login": "o", "html_url": "https://github.com/o"}}}}
        ]}}"#
    )
}

/// Accepts connections and never answers
pub async fn spawn_silent_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    format!("http://{addr}")
}

/// Search server that answers each request after `delay` and records how
/// many requests it was handling at once and which pages were asked for.
pub struct SlowSearchServer {
    pub url: String,
    pub max_in_flight: Arc<AtomicUsize>,
    pub pages: Arc<Mutex<Vec<String>>>,
}

pub async fn spawn_slow_search_server(delay: Duration) -> SlowSearchServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    let in_flight = Arc::new(AtomicUsize::new(0));
    let max_in_flight = Arc::new(AtomicUsize::new(0));
    let pages = Arc::new(Mutex::new(Vec::new()));

    {
        let max_in_flight = max_in_flight.clone();
        let pages = pages.clone();
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                let in_flight = in_flight.clone();
                let max_in_flight = max_in_flight.clone();
                let pages = pages.clone();
                tokio::spawn(async move {
                    let _ = answer(socket, delay, &in_flight, &max_in_flight, &pages).await;
                });
            }
        });
    }

    SlowSearchServer {
        url,
        max_in_flight,
        pages,
    }
}

async fn answer(
    mut socket: TcpStream,
    delay: Duration,
    in_flight: &AtomicUsize,
    max_in_flight: &AtomicUsize,
    pages: &Mutex<Vec<String>>,
) -> std::io::Result<()> {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut buf).await?;
        if n == 0 {
            return Ok(());
        }
        request.extend_from_slice(&buf[..n]);
    }

    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    max_in_flight.fetch_max(now, Ordering::SeqCst);

    // GET /search/repositories?<query> HTTP/1.1
    let request = String::from_utf8_lossy(&request);
    let target = request.split_whitespace().nth(1).unwrap_or_default();
    let query = target.split_once('?').map(|(_, q)| q).unwrap_or_default();
    let page = form_codec::decode(query)
        .ok()
        .and_then(|mut params| params.remove("page"))
        .unwrap_or_default();
    pages.lock().unwrap().push(page.clone());

    tokio::time::sleep(delay).await;
    // Leave before replying so the next serialized request never overlaps
    in_flight.fetch_sub(1, Ordering::SeqCst);

    let body = search_body(&page);
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    socket.write_all(response.as_bytes()).await?;
    socket.shutdown().await
}
