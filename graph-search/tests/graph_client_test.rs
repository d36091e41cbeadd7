//! Graph search client against a mock `/search/query` endpoint.

use std::time::Duration;

use graph_search::{GraphError, GraphSearchClient, GraphSearchRequest};
use serde_json::{json, Value};
use typeahead::{CancellationToken, FetchError, SuggestionFetcher};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn drive_hit(id: &str, name: &str) -> Value {
    json!({
        "hitId": id,
        "rank": 1,
        "summary": "",
        "resource": {
            "@odata.type": "#microsoft.graph.driveItem",
            "id": id,
            "name": name,
            "webUrl": format!("https://contoso.sharepoint.com/{name}"),
            "size": 2048,
            "file": { "mimeType": "application/pdf" },
            "createdBy": { "user": { "displayName": "Ada Lovelace" } }
        }
    })
}

fn message_hit(id: &str, subject: &str) -> Value {
    json!({
        "hitId": id,
        "resource": {
            "@odata.type": "#microsoft.graph.message",
            "id": id,
            "subject": subject,
            "from": { "emailAddress": { "name": "Grace Hopper" } },
            "webLink": format!("https://outlook.office.com/{id}")
        }
    })
}

async fn client_for(server: &MockServer) -> GraphSearchClient {
    GraphSearchClient::new(&server.uri())
        .expect("mock server uri is a valid base url")
        .with_access_token("graph-token")
}

#[tokio::test]
async fn test_suggestions_merge_hit_containers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search/query"))
        .and(header("Authorization", "Bearer graph-token"))
        .and(body_partial_json(json!({ "requests": [
            { "entityType": "driveItem", "size": 10 },
            { "entityType": "message", "size": 10 },
            { "entityType": "event", "size": 10 }
        ] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [
            { "hitsContainers": [
                { "hits": [drive_hit("d1", "Budget.pdf")], "total": 1, "moreResultsAvailable": false },
                { "hits": [message_hit("m1", "Budget sign-off")], "total": 1, "moreResultsAvailable": false }
            ] }
        ] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let items = client
        .fetch("budget", &CancellationToken::new(), 10)
        .await
        .unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, "d1");
    assert_eq!(items[0].title, "Budget.pdf");
    assert_eq!(items[0].file_type.as_deref(), Some("pdf"));
    assert_eq!(items[1].title, "Budget sign-off");
    assert_eq!(items[1].path, "https://outlook.office.com/m1");
}

#[tokio::test]
async fn test_page_size_is_capped() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search/query"))
        .and(body_partial_json(json!({ "requests": [{ "entityType": "driveItem", "size": 25 }] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server)
        .await
        .with_entity_types(vec!["driveItem".to_string()]);

    let items = client.fetch_suggestions("budget", 100).await.unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_throttling_degrades_or_surfaces() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search/query"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "code": "TooManyRequests", "message": "Too many requests" }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;

    let items = client
        .fetch("budget", &CancellationToken::new(), 10)
        .await
        .unwrap();
    assert!(items.is_empty());

    match client.fetch_suggestions("budget", 10).await {
        Err(GraphError::Api { status, info }) => {
            assert_eq!(status, 429);
            assert!(info.is_retryable);
        }
        other => panic!("expected throttling error, got {:?}", other),
    }

    let surfacing = client.surfacing_errors(true);
    assert!(matches!(
        surfacing.fetch("budget", &CancellationToken::new(), 10).await,
        Err(FetchError::Transport(_))
    ));
}

#[tokio::test]
async fn test_forbidden_surfaces_as_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search/query"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = client_for(&server).await.surfacing_errors(true);

    assert_eq!(
        client.fetch("budget", &CancellationToken::new(), 10).await,
        Err(FetchError::Unauthorized)
    );
}

#[tokio::test]
async fn test_cancellation_abandons_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search/query"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "value": [] }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let started = std::time::Instant::now();
    let result = client.fetch("budget", &token, 10).await;

    assert_eq!(result, Err(FetchError::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn test_full_search_is_cached() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [
            { "hitsContainers": [
                { "hits": [drive_hit("d1", "Budget.pdf"), { "hitId": "broken" }], "total": 30, "moreResultsAvailable": true }
            ] }
        ] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let request = GraphSearchRequest::new("budget", ["driveItem"]);

    let first = client.search(&request).await.unwrap();
    let second = client.search(&request).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.items.len(), 1);
    assert_eq!(first.items[0].author, "Ada Lovelace");
    assert_eq!(first.items[0].summary, "PDF • 2.0 KB");
    assert_eq!(first.total_items, 30);
    assert!(first.more_results_available);
}
