use crate::{mount_page, test_config, UNREACHABLE_URL};
use contact_ripple::batch::{BatchOptions, BatchRunner, SiteRecord, SiteStatus};
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn runner() -> BatchRunner {
    BatchRunner::from_config(&test_config()).expect("failed to build runner")
}

#[tokio::test]
async fn test_unreachable_site_reports_error() {
    let records = vec![SiteRecord::new("Offline Co", UNREACHABLE_URL)];

    let batch = runner().run_batch(records, &BatchOptions::default()).await;

    assert_eq!(batch.total_websites, 1);
    assert_eq!(batch.errors, 1);
    assert_eq!(batch.found_emails, 0);
    assert!(batch.results[0].status.is_error());
    assert_eq!(batch.results[0].email, None);
}

#[tokio::test]
async fn test_known_email_and_discovered_email() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", "Questions? info@example.com").await;

    let records = vec![
        SiteRecord::new("Known", "https://known.invalid/").with_email("x@y.com"),
        SiteRecord::new("Crawled", format!("{}/", mock_server.uri())),
    ];

    let batch = runner().run_batch(records, &BatchOptions::default()).await;

    assert_eq!(batch.found_emails, 2);
    assert_eq!(batch.errors, 0);
    assert_eq!(batch.results[0].status, SiteStatus::AlreadyExists);
    assert_eq!(batch.results[0].email.as_deref(), Some("x@y.com"));
    assert_eq!(batch.results[1].status, SiteStatus::Found);
    assert_eq!(batch.results[1].email.as_deref(), Some("info@example.com"));
}

#[tokio::test]
async fn test_known_email_performs_no_fetch() {
    let mock_server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_string("other@example.com"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let records = vec![SiteRecord::new("Known", format!("{}/", mock_server.uri()))
        .with_email("owner@example.com")];

    let batch = runner().run_batch(records, &BatchOptions::default()).await;

    assert_eq!(batch.results[0].status, SiteStatus::AlreadyExists);
    assert_eq!(batch.results[0].email.as_deref(), Some("owner@example.com"));
}

#[tokio::test]
async fn test_modes_agree() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/found", "sales@example.com").await;
    mount_page(&mock_server, "/quiet", "<p>nothing to see</p>").await;

    let records = vec![
        SiteRecord::new("Found", format!("{}/found", mock_server.uri())),
        SiteRecord::new("Quiet", format!("{}/quiet", mock_server.uri())),
        SiteRecord::new("Broken", "not a url"),
    ];

    let concurrent = runner()
        .run_batch(
            records.clone(),
            &BatchOptions {
                concurrent: true,
                max_workers: 2,
                max_pages: None,
            },
        )
        .await;
    let cooperative = runner()
        .run_batch(
            records,
            &BatchOptions {
                concurrent: false,
                max_workers: 2,
                max_pages: None,
            },
        )
        .await;

    for batch in [&concurrent, &cooperative] {
        assert_eq!(batch.total_websites, 3);
        assert_eq!(batch.found_emails, 1);
        assert_eq!(batch.errors, 1);

        let status_of = |name: &str| {
            batch
                .results
                .iter()
                .find(|r| r.name == name)
                .map(|r| r.status.clone())
                .unwrap()
        };
        assert_eq!(status_of("Found"), SiteStatus::Found);
        assert_eq!(status_of("Quiet"), SiteStatus::NotFound);
        assert!(status_of("Broken").is_error());
    }
}
