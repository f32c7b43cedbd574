use std::time::{Duration, Instant};

use mockito::{Matcher, Server};
use ym_playlist::{Endpoints, FetchOutcome, LinkKind, PlaylistFetcher, RequesterConfig};

fn requester(max_retries: u32, sleep_secs: f64) -> RequesterConfig {
    RequesterConfig {
        session_id: "Session_id=abc".to_string(),
        max_retries,
        between_attempt_sleep_time: sleep_secs,
        timeout: 5.0,
    }
}

fn old_kind() -> LinkKind {
    LinkKind::Old {
        owner: "alice".to_string(),
        kinds: "3".to_string(),
    }
}

fn new_kind() -> LinkKind {
    LinkKind::New {
        id: "lk.abc".to_string(),
    }
}

fn old_query() -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("owner".into(), "alice".into()),
        Matcher::UrlEncoded("kinds".into(), "3".into()),
    ])
}

fn new_query() -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("resumestream".into(), "false".into()),
        Matcher::UrlEncoded("richtracks".into(), "true".into()),
    ])
}

#[tokio::test]
async fn old_format_sends_session_cookie_and_browser_headers() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/handlers/playlist.jsx")
        .match_query(old_query())
        .match_header("cookie", "Session_id=abc")
        .match_header("user-agent", Matcher::Regex("OPR/126".to_string()))
        .match_header("accept", Matcher::Regex("^text/html".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"playlist": {"title": "Road"}}"#)
        .expect(1)
        .create_async()
        .await;

    let fetcher =
        PlaylistFetcher::with_endpoints(requester(2, 0.0), Endpoints::single(server.url()))
            .unwrap();
    let outcome = fetcher.fetch(&old_kind()).await;

    mock.assert_async().await;
    match outcome {
        FetchOutcome::Success {
            payload,
            attempts_used,
        } => {
            assert_eq!(payload["playlist"]["title"], "Road");
            assert_eq!(attempts_used, 1);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn new_format_is_called_without_session_cookie() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/playlist/lk.abc")
        .match_query(new_query())
        .match_header("cookie", Matcher::Missing)
        .with_status(200)
        .with_body(r#"{"result": {"title": "Shared"}}"#)
        .expect(1)
        .create_async()
        .await;

    let fetcher =
        PlaylistFetcher::with_endpoints(requester(0, 0.0), Endpoints::single(server.url()))
            .unwrap();
    let outcome = fetcher.fetch(&new_kind()).await;

    mock.assert_async().await;
    assert!(outcome.is_success());
}

#[tokio::test]
async fn undecodable_bodies_use_every_attempt() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/playlist/lk.abc")
        .match_query(new_query())
        .with_status(200)
        .with_body("{\"result\": truncat")
        .expect(3)
        .create_async()
        .await;

    let fetcher =
        PlaylistFetcher::with_endpoints(requester(2, 0.0), Endpoints::single(server.url()))
            .unwrap();
    let outcome = fetcher.fetch(&new_kind()).await;

    mock.assert_async().await;
    assert_eq!(
        outcome,
        FetchOutcome::DecodeError {
            raw_body_snippet: "{\"result\": truncat".to_string(),
            attempts_used: 3,
        }
    );
}

#[tokio::test]
async fn decode_error_snippet_is_truncated() {
    let mut server = Server::new_async().await;
    let body = "x".repeat(2000);
    let _mock = server
        .mock("GET", "/playlist/lk.abc")
        .match_query(new_query())
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    let fetcher =
        PlaylistFetcher::with_endpoints(requester(0, 0.0), Endpoints::single(server.url()))
            .unwrap();

    match fetcher.fetch(&new_kind()).await {
        FetchOutcome::DecodeError {
            raw_body_snippet,
            attempts_used,
        } => {
            assert_eq!(raw_body_snippet.len(), 500);
            assert_eq!(attempts_used, 1);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn retries_sleep_between_attempts() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/playlist/lk.abc")
        .match_query(new_query())
        .with_status(200)
        .with_body("not json")
        .expect(3)
        .create_async()
        .await;

    let fetcher =
        PlaylistFetcher::with_endpoints(requester(2, 0.1), Endpoints::single(server.url()))
            .unwrap();

    let started = Instant::now();
    let outcome = fetcher.fetch(&new_kind()).await;

    assert!(started.elapsed() >= Duration::from_millis(200));
    assert_eq!(outcome.attempts_used(), Some(3));
}

#[tokio::test]
async fn valid_first_response_never_sleeps_or_retries() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/playlist/lk.abc")
        .match_query(new_query())
        .with_status(200)
        .with_body(r#"{"result": {}}"#)
        .expect(1)
        .create_async()
        .await;

    let fetcher =
        PlaylistFetcher::with_endpoints(requester(5, 30.0), Endpoints::single(server.url()))
            .unwrap();

    let outcome = tokio::time::timeout(Duration::from_secs(10), fetcher.fetch(&new_kind()))
        .await
        .expect("fetch should not sleep");

    mock.assert_async().await;
    assert_eq!(outcome.attempts_used(), Some(1));
}

#[tokio::test]
async fn non_200_is_not_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/handlers/playlist.jsx")
        .match_query(old_query())
        .with_status(500)
        .with_body(r#"{"message": "Internal"}"#)
        .expect(1)
        .create_async()
        .await;

    let fetcher =
        PlaylistFetcher::with_endpoints(requester(3, 0.0), Endpoints::single(server.url()))
            .unwrap();
    let outcome = fetcher.fetch(&old_kind()).await;

    mock.assert_async().await;
    assert_eq!(
        outcome,
        FetchOutcome::UpstreamError {
            status_code: 500,
            raw_body: r#"{"message": "Internal"}"#.to_string(),
            attempts_used: 1,
        }
    );
}

#[tokio::test]
async fn non_json_error_body_is_upstream_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/playlist/lk.abc")
        .match_query(new_query())
        .with_status(503)
        .with_body("<html>Service Unavailable</html>")
        .create_async()
        .await;

    let fetcher =
        PlaylistFetcher::with_endpoints(requester(3, 0.0), Endpoints::single(server.url()))
            .unwrap();

    match fetcher.fetch(&new_kind()).await {
        FetchOutcome::UpstreamError {
            status_code,
            attempts_used,
            ..
        } => {
            assert_eq!(status_code, 503);
            assert_eq!(attempts_used, 1);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn not_found_message_is_definitive() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/playlist/lk.abc")
        .match_query(new_query())
        .with_status(404)
        .with_body(r#"{"message": "Not Found"}"#)
        .expect(1)
        .create_async()
        .await;

    let fetcher =
        PlaylistFetcher::with_endpoints(requester(3, 0.0), Endpoints::single(server.url()))
            .unwrap();
    let outcome = fetcher.fetch(&new_kind()).await;

    mock.assert_async().await;
    assert_eq!(outcome, FetchOutcome::NotFound);
}

#[tokio::test]
async fn unanswered_request_times_out_without_retry() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let mut config = requester(3, 0.0);
    config.timeout = 0.3;
    let fetcher =
        PlaylistFetcher::with_endpoints(config, Endpoints::single(format!("http://{}", addr)))
            .unwrap();

    let outcome = fetcher.fetch(&new_kind()).await;
    assert_eq!(outcome, FetchOutcome::Timeout { attempts_used: 1 });
}

#[tokio::test]
async fn refused_connection_is_transport_error() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let fetcher = PlaylistFetcher::with_endpoints(
        requester(3, 0.0),
        Endpoints::single(format!("http://{}", addr)),
    )
    .unwrap();

    match fetcher.fetch(&old_kind()).await {
        FetchOutcome::TransportError {
            detail,
            attempts_used,
        } => {
            assert!(!detail.is_empty());
            assert_eq!(attempts_used, 1);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}
