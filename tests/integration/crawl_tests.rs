//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run crawlers
//! through the registry and the real HTTP fetcher end-to-end.

use ripple_crawl::config::load_config;
use ripple_crawl::events::PageDataAcquiredEvent;
use ripple_crawl::registry::SequentialIds;
use ripple_crawl::{CrawlerConfig, CrawlerId, CrawlerRegistry, CrawlerState, HttpFetcher, TypeGroup};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::time::timeout;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USER_AGENT: &str = "ripple-test/1.0";

/// Creates a registry backed by the real HTTP fetcher
fn create_registry() -> CrawlerRegistry {
    let fetcher = HttpFetcher::new().expect("Failed to build HTTP client");
    CrawlerRegistry::new(Handle::current(), Arc::new(fetcher))
        .with_id_provider(SequentialIds::default())
}

/// Creates a crawler configuration seeded with the root of the mock server
fn create_test_config(base_url: &str) -> CrawlerConfig {
    CrawlerConfig::builder()
        .initial_url(Url::parse(&format!("{}/", base_url)).expect("Failed to parse base URL"))
        .user_agent(USER_AGENT)
        .build()
}

fn html_page(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into_bytes(), "text/html")
}

async fn mount_page(server: &MockServer, page: &str, title: &str, links: &[String]) {
    let anchors: String = links
        .iter()
        .map(|link| format!(r#"<a href="{}">link</a>"#, link))
        .collect();

    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html_page(format!(
            "<html><head><title>{}</title></head><body>{}</body></html>",
            title, anchors
        )))
        .mount(server)
        .await;
}

async fn wait_done(registry: &CrawlerRegistry, id: CrawlerId) -> CrawlerState {
    timeout(Duration::from_secs(10), registry.wait_until_done(id))
        .await
        .expect("Crawl did not finish in time")
        .expect("Crawler is not registered")
}

#[tokio::test]
async fn test_full_crawl_single_host() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    // Index page: one relative link, one absolute link, an image and an
    // off-host link
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", USER_AGENT))
        .respond_with(html_page(format!(
            r#"<html><head><title>Home</title></head><body>
            <a href="/page1">Page 1</a>
            <a href="{}/page2">Page 2</a>
            <a href="/logo.png">Logo</a>
            <a href="http://other.test/c">Elsewhere</a>
            <a href="mailto:admin@example.com">Mail</a>
            </body></html>"#,
            base_url
        )))
        .expect(1)
        .mount(&server)
        .await;

    mount_page(
        &server,
        "/page1",
        "Page 1",
        &["/".to_string(), "/page2?ref=page1".to_string()],
    )
    .await;
    mount_page(&server, "/page2", "Page 2", &[]).await;

    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let registry = create_registry();
    let config = CrawlerConfig::builder()
        .initial_url(Url::parse(&format!("{}/", base_url)).unwrap())
        .exclude(TypeGroup::images())
        .user_agent(USER_AGENT)
        .build();
    let id = registry.register(config).expect("Failed to register crawler");

    let (tx, mut pages) = mpsc::unbounded_channel();
    registry.subscribe_page_data_acquired(id, move |e: &PageDataAcquiredEvent| {
        let _ = tx.send(e.clone());
    });

    registry.start(id);
    assert_eq!(wait_done(&registry, id).await, CrawlerState::Finished);

    let mut titles = Vec::new();
    for _ in 0..3 {
        let page = timeout(Duration::from_secs(2), pages.recv())
            .await
            .expect("Missing page event")
            .expect("Event channel closed");
        titles.push(page.title.clone());

        if page.title == "Home" {
            let on_host: Vec<String> = page.links_on_domain.iter().map(|u| u.path().to_string()).collect();
            assert_eq!(on_host, vec!["/page1", "/page2"]);
            assert_eq!(
                page.links_off_domain,
                vec![Url::parse("http://other.test/c").unwrap()]
            );
        }
    }
    assert_eq!(titles, vec!["Home", "Page 1", "Page 2"]);

    let info = registry.get_info(id).unwrap();
    assert_eq!(info.frontier.succeeded, 3);
    assert_eq!(info.frontier.failed, 0);
    assert_eq!(info.frontier.pending, 0);
}

#[tokio::test]
async fn test_seed_not_found_fails_crawler() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let registry = create_registry();
    let id = registry.register(create_test_config(&server.uri())).unwrap();

    let (tx, mut states) = mpsc::unbounded_channel();
    registry.subscribe_state_changed(id, move |e| {
        let _ = tx.send((e.old_state, e.new_state));
    });

    registry.start(id);
    assert_eq!(wait_done(&registry, id).await, CrawlerState::Failed);

    assert_eq!(
        states.recv().await,
        Some((CrawlerState::New, CrawlerState::Running))
    );
    assert_eq!(
        states.recv().await,
        Some((CrawlerState::Running, CrawlerState::Failed))
    );

    let info = registry.get_info(id).unwrap();
    assert_eq!(info.frontier.failed, 1);
    assert_eq!(info.frontier.pending, 0);
}

#[tokio::test]
async fn test_broken_links_do_not_stop_crawl() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        "Home",
        &["/gone".to_string(), "/data.json".to_string(), "/ok".to_string()],
    )
    .await;
    mount_page(&server, "/ok", "Ok", &[]).await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"{}".to_vec(), "application/json"))
        .mount(&server)
        .await;

    let registry = create_registry();
    let id = registry.register(create_test_config(&server.uri())).unwrap();

    registry.start(id);
    assert_eq!(wait_done(&registry, id).await, CrawlerState::Finished);

    let info = registry.get_info(id).unwrap();
    assert_eq!(info.frontier.succeeded, 2);
    assert_eq!(info.frontier.failed, 2);
}

#[tokio::test]
async fn test_stop_running_crawler() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            html_page(r#"<html><body><a href="/next">Next</a></body></html>"#.to_string())
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(html_page("<html></html>".to_string()))
        .expect(0)
        .mount(&server)
        .await;

    let registry = create_registry();
    let id = registry.register(create_test_config(&server.uri())).unwrap();

    registry.start(id);
    tokio::time::sleep(Duration::from_millis(100)).await;
    registry.stop(id);

    assert_eq!(wait_done(&registry, id).await, CrawlerState::Stopped);

    // Stopped is final
    registry.resume(id);
    registry.start(id);
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(registry.get_info(id).unwrap().state, CrawlerState::Stopped);
}

#[tokio::test]
async fn test_pause_and_resume_through_registry() {
    let server = MockServer::start().await;

    mount_page(&server, "/", "Home", &["/a".to_string()]).await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(
            html_page(r#"<html><body><a href="/b">B</a></body></html>"#.to_string())
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;
    mount_page(&server, "/b", "B", &[]).await;

    let registry = create_registry();
    let id = registry.register(create_test_config(&server.uri())).unwrap();

    registry.start(id);
    tokio::time::sleep(Duration::from_millis(100)).await;

    registry.pause(id).await;
    assert_eq!(registry.get_info(id).unwrap().state, CrawlerState::Paused);

    let paused = registry.get_info(id).unwrap().frontier;
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(registry.get_info(id).unwrap().frontier, paused);

    registry.resume(id);
    assert_eq!(wait_done(&registry, id).await, CrawlerState::Finished);
    assert_eq!(registry.get_info(id).unwrap().frontier.succeeded, 3);
}

#[tokio::test]
async fn test_crawlers_from_config_file() {
    let first = MockServer::start().await;
    mount_page(&first, "/", "First", &["/skipped".to_string()]).await;
    Mock::given(method("GET"))
        .and(path("/skipped"))
        .respond_with(html_page("<html></html>".to_string()))
        .expect(0)
        .mount(&first)
        .await;

    let second = MockServer::start().await;
    mount_page(&second, "/docs", "Docs", &[]).await;

    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[defaults]
user-agent = "{ua}"

[[crawler]]
name = "first"
seeds = ["{first}/"]
skip = ["{first}/skipped"]
excluded-types = ["images", "archives"]

[[crawler]]
seeds = ["{second}/docs"]
crawl-delay-ms = 10
"#,
        ua = USER_AGENT,
        first = first.uri(),
        second = second.uri(),
    )
    .unwrap();

    let config = load_config(file.path()).expect("Failed to load config");
    let registry = create_registry();

    let mut ids = Vec::new();
    for crawler_config in config.crawler_configs().unwrap() {
        ids.push(registry.register(crawler_config).unwrap());
    }
    assert_eq!(registry.list().len(), 2);

    for &id in &ids {
        registry.start(id);
    }
    for &id in &ids {
        assert_eq!(wait_done(&registry, id).await, CrawlerState::Finished);
    }

    // Skipped URLs count as already succeeded
    let succeeded: Vec<usize> = registry
        .list()
        .iter()
        .map(|info| info.frontier.succeeded)
        .collect();
    assert_eq!(succeeded, vec![2, 1]);
}
