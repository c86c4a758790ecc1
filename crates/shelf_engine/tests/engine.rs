use std::sync::{mpsc, Arc};
use std::time::Duration;

use serde_json::json;
use shelf_engine::{
    ApiSettings, ChannelEventSink, EngineEvent, EngineHandle, FailureKind, ListingQuery,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WAIT: Duration = Duration::from_secs(5);

fn engine(server: &MockServer) -> (EngineHandle, mpsc::Receiver<EngineEvent>) {
    let (tx, rx) = mpsc::channel();
    let settings = ApiSettings {
        base_url: format!("{}/api", server.uri()),
        ..ApiSettings::default()
    };
    let handle =
        EngineHandle::new(settings, Arc::new(ChannelEventSink::new(tx))).expect("engine starts");
    (handle, rx)
}

#[tokio::test]
async fn page_results_carry_their_generation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books/genre/Fiction"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "books": [],
            "currentPage": 3,
            "totalBooks": 4,
            "totalPages": 2
        })))
        .mount(&server)
        .await;

    let (engine, events) = engine(&server);
    engine.fetch_page(
        "token",
        7,
        ListingQuery {
            genre: Some("Fiction".into()),
            page: 3,
            limit: 2,
        },
    );

    let event = tokio::task::spawn_blocking(move || events.recv_timeout(WAIT))
        .await
        .unwrap()
        .expect("page event");
    match event {
        EngineEvent::PageFetched {
            generation,
            page,
            result,
        } => {
            assert_eq!(generation, 7);
            assert_eq!(page, 3);
            let listing = result.expect("listing");
            assert!(listing.books.is_empty());
            assert_eq!(listing.total_pages, 2);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn genre_failures_are_reported_not_swallowed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books/active-genres"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (engine, events) = engine(&server);
    engine.fetch_genres("token", 4);

    let event = tokio::task::spawn_blocking(move || events.recv_timeout(WAIT))
        .await
        .unwrap()
        .expect("genre event");
    match event {
        EngineEvent::GenresFetched { request_id, result } => {
            assert_eq!(request_id, 4);
            assert_eq!(result.unwrap_err().kind, FailureKind::HttpStatus(503));
        }
        other => panic!("unexpected event {other:?}"),
    }
}
