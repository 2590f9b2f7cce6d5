use crate::{mount_page, test_config, UNREACHABLE_URL};
use contact_ripple::crawler::{crawl_site, StopReason};
use contact_ripple::RippleError;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_email_on_homepage() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", "Write to info@example.com").await;

    let seed = format!("{}/", mock_server.uri());
    let outcome = crawl_site(&test_config(), &seed).await.expect("crawl failed");

    assert_eq!(outcome.stop, StopReason::EmailFound);
    assert_eq!(outcome.first_email(), Some("info@example.com"));
    assert_eq!(outcome.pages_fetched, 1);
}

#[tokio::test]
async fn test_follows_links_to_contact_page() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        r#"<a href="/about/">About</a> <a href="products.html">Products</a>"#,
    )
    .await;
    mount_page(&mock_server, "/about/", r#"<a href="team.html">Team</a>"#).await;
    mount_page(&mock_server, "/products.html", "No contact here").await;
    mount_page(&mock_server, "/about/team.html", "Reach us: team@example.org").await;

    let seed = format!("{}/", mock_server.uri());
    let outcome = crawl_site(&test_config(), &seed).await.expect("crawl failed");

    assert_eq!(outcome.first_email(), Some("team@example.org"));
    assert_eq!(outcome.pages_fetched, 4);
}

#[tokio::test]
async fn test_error_pages_are_skipped() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        r#"<a href="/gone">Gone</a><a href="/broken">Broken</a><a href="/contact">Contact</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/contact", "hello@example.com").await;

    let seed = format!("{}/", mock_server.uri());
    let outcome = crawl_site(&test_config(), &seed).await.expect("crawl failed");

    assert_eq!(outcome.first_email(), Some("hello@example.com"));
    assert_eq!(outcome.pages_fetched, 2);
}

#[tokio::test]
async fn test_seed_http_error_is_not_an_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let seed = format!("{}/", mock_server.uri());
    let outcome = crawl_site(&test_config(), &seed).await.expect("crawl failed");

    assert!(outcome.emails.is_empty());
    assert_eq!(outcome.stop, StopReason::FrontierExhausted);
}

#[tokio::test]
async fn test_slow_page_times_out_and_is_skipped() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        r#"<a href="/slow">Slow</a><a href="/fast">Fast</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("slow@example.com")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/fast", "fast@example.com").await;

    let seed = format!("{}/", mock_server.uri());
    let outcome = crawl_site(&test_config(), &seed).await.expect("crawl failed");

    assert_eq!(outcome.first_email(), Some("fast@example.com"));
}

#[tokio::test]
async fn test_slow_seed_is_unreachable() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("never@example.com")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let seed = format!("{}/", mock_server.uri());
    let result = crawl_site(&test_config(), &seed).await;

    assert!(matches!(result, Err(RippleError::SeedUnreachable { .. })));
}

#[tokio::test]
async fn test_unreachable_host() {
    let result = crawl_site(&test_config(), UNREACHABLE_URL).await;
    assert!(matches!(result, Err(RippleError::SeedUnreachable { .. })));
}

#[tokio::test]
async fn test_skipped_extensions_never_requested() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        r#"<a href="/brochure.pdf">Brochure</a><a href="/logo.PNG">Logo</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/brochure.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_string("pdf@example.com"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let seed = format!("{}/", mock_server.uri());
    let outcome = crawl_site(&test_config(), &seed).await.expect("crawl failed");

    assert!(outcome.emails.is_empty());
    assert_eq!(outcome.stop, StopReason::FrontierExhausted);
}

#[tokio::test]
async fn test_page_ceiling_limits_requests() {
    let mock_server = MockServer::start().await;
    let links: String = (0..10)
        .map(|i| format!(r#"<a href="/page{}">{}</a>"#, i, i))
        .collect();
    mount_page(&mock_server, "/", &links).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>nothing</p>"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let mut config = test_config();
    config.crawler.max_pages = 3;

    let seed = format!("{}/", mock_server.uri());
    let outcome = crawl_site(&config, &seed).await.expect("crawl failed");

    assert_eq!(outcome.stop, StopReason::PageLimit);
    assert_eq!(outcome.pages_fetched, 3);
}
