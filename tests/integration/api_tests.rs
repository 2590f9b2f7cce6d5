use crate::{mount_page, test_config, UNREACHABLE_URL};
use contact_ripple::api::{self, AppState};
use contact_ripple::batch::{BatchOptions, BatchRunner};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use wiremock::MockServer;

/// Starts the API on an ephemeral port and returns its base URL
async fn spawn_api() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to read local address");

    let runner = BatchRunner::from_config(&test_config()).expect("Failed to build runner");
    let state = AppState::new(runner, BatchOptions::default());
    tokio::spawn(api::serve(listener, state));

    format!("http://{}", addr)
}

async fn post_batch(base: &str, body: String) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(format!("{}/scrape-emails", base))
        .header("content-type", "application/json")
        .body(body)
        .send()
        .await
        .expect("Request failed");

    let status = response.status().as_u16();
    let text = response.text().await.expect("Failed to read body");
    let value = serde_json::from_str(&text).expect("Response is not JSON");
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let base = spawn_api().await;

    let response = reqwest::get(format!("{}/health", base))
        .await
        .expect("Request failed");
    assert_eq!(response.status().as_u16(), 200);

    let value: Value = serde_json::from_str(&response.text().await.unwrap()).unwrap();
    assert_eq!(value, json!({"status": "healthy", "service": "email-scraper"}));
}

#[tokio::test]
async fn test_missing_websites_is_rejected() {
    let base = spawn_api().await;

    let (status, value) = post_batch(&base, json!({"concurrent": true}).to_string()).await;
    assert_eq!(status, 400);
    assert_eq!(value, json!({"error": "Missing websites data"}));

    let (status, value) = post_batch(&base, String::new()).await;
    assert_eq!(status, 400);
    assert_eq!(value, json!({"error": "Missing websites data"}));
}

#[tokio::test]
async fn test_websites_must_be_a_list() {
    let base = spawn_api().await;

    let (status, value) = post_batch(&base, json!({"websites": "a.com"}).to_string()).await;

    assert_eq!(status, 400);
    assert_eq!(value, json!({"error": "Websites must be a list"}));
}

#[tokio::test]
async fn test_invalid_json_is_rejected() {
    let base = spawn_api().await;

    let (status, value) = post_batch(&base, "{not json".to_string()).await;

    assert_eq!(status, 400);
    assert!(value["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid JSON body"));
}

#[tokio::test]
async fn test_full_batch_round_trip() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", r#"<a href="/contact">Contact</a>"#).await;
    mount_page(&mock_server, "/contact", "Email info@example.com").await;

    let base = spawn_api().await;
    let body = json!({
        "websites": [
            {
                "Name": "Known",
                "Website": "https://known.invalid",
                "Email": "x@y.com",
                "Description": "Pre-filled"
            },
            {
                "Name": "Mock",
                "Website": format!("{}/", mock_server.uri()),
                "Email": null,
                "Description": "Served by wiremock"
            },
            {
                "Name": "Offline",
                "Website": UNREACHABLE_URL,
                "Description": "Nothing listening"
            }
        ],
        "concurrent": true,
        "max_workers": 2
    });

    let (status, value) = post_batch(&base, body.to_string()).await;

    assert_eq!(status, 200);
    assert_eq!(value["total_websites"], 3);
    assert_eq!(value["found_emails"], 2);
    assert_eq!(value["errors"], 1);
    assert!(value["processing_time_seconds"].is_number());

    let results = value["results"].as_array().unwrap();
    assert_eq!(results[0]["Status"], "Already exists");
    assert_eq!(results[0]["Email"], "x@y.com");
    assert_eq!(results[1]["Status"], "Found");
    assert_eq!(results[1]["Email"], "info@example.com");
    assert_eq!(results[1]["Description"], "Served by wiremock");
    assert!(results[2]["Status"].as_str().unwrap().starts_with("Error: "));
    assert!(results[2]["Email"].is_null());
}

#[tokio::test]
async fn test_max_count_override() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", r#"<a href="/contact">Contact</a>"#).await;
    mount_page(&mock_server, "/contact", "Email info@example.com").await;

    let base = spawn_api().await;
    let body = json!({
        "websites": [{"Name": "Mock", "Website": format!("{}/", mock_server.uri())}],
        "concurrent": false,
        "max_count": 1
    });

    let (status, value) = post_batch(&base, body.to_string()).await;

    assert_eq!(status, 200);
    assert_eq!(value["results"][0]["Status"], "Not found");
    assert_eq!(value["found_emails"], 0);
}
