mod common;

use common::{crawler, page, recipe_json, stored_files, ScriptedProvider};
use recipe_crawler::{CrawlError, CrawlSummary, StepOutcome};
use std::collections::HashSet;
use std::sync::atomic::Ordering;
use tempfile::TempDir;

#[tokio::test]
async fn test_depth_first_expansion_keeps_rediscovered_link_once() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();

    let _a = server
        .mock("GET", "/a")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(page("page alpha"))
        .create_async()
        .await;
    let _b = server
        .mock("GET", "/b")
        .with_status(200)
        .with_body(page("page bravo"))
        .expect(1)
        .create_async()
        .await;
    let _c = server
        .mock("GET", "/c")
        .with_status(200)
        .with_body(page("page charlie"))
        .expect(1)
        .create_async()
        .await;

    let provider = ScriptedProvider::new()
        .on(
            "page alpha",
            recipe_json("Alpha", &[format!("{base}/b?ref=1"), format!("{base}/c")]),
        )
        .on("page charlie", recipe_json("Charlie", &[format!("{base}/b")]))
        .on("page bravo", recipe_json("Bravo", &[]));

    let dir = TempDir::new().unwrap();
    let mut crawler = crawler(provider, dir.path());

    let outcome = crawler.process_url(&format!("{base}/a")).await;
    assert!(matches!(outcome, StepOutcome::Persisted { discovered: 2, .. }));
    assert_eq!(
        crawler.state().frontier(),
        [format!("{base}/b"), format!("{base}/c")]
    );
    assert_eq!(crawler.state().visited().len(), 1);
    assert!(crawler.state().is_visited(&format!("{base}/a")));

    // Last appended is visited first.
    let outcome = crawler.process_next().await.unwrap();
    match outcome {
        StepOutcome::Persisted { stored, .. } => {
            assert_eq!(stored.record.title.as_deref(), Some("Charlie"));
            assert_eq!(stored.record.source_url, Some(format!("{base}/c")));
        }
        other => panic!("expected charlie to be persisted, got {other:?}"),
    }
    assert_eq!(crawler.state().frontier(), [format!("{base}/b")]);

    let summary = crawler.run_frontier().await;
    assert_eq!(
        summary,
        CrawlSummary {
            attempted: 1,
            persisted: 1,
            skipped: 0,
            errored: 0,
        }
    );
    assert!(crawler.state().frontier().is_empty());
    assert_eq!(crawler.state().visited().len(), 3);
    assert_eq!(stored_files(dir.path()), 3);
}

#[tokio::test]
async fn test_reported_error_persists_nothing_and_adds_no_links() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();
    let _a = server
        .mock("GET", "/impressum")
        .with_status(200)
        .with_body(page("page imprint"))
        .create_async()
        .await;

    let provider =
        ScriptedProvider::new().on("page imprint", r#"{"error": "missing ingredients"}"#);
    let dir = TempDir::new().unwrap();
    let mut crawler = crawler(provider, dir.path());

    let outcome = crawler.process_url(&format!("{base}/impressum")).await;

    match outcome {
        StepOutcome::Skipped { reason } => assert_eq!(reason, "missing ingredients"),
        other => panic!("expected a skipped page, got {other:?}"),
    }
    assert!(crawler.state().frontier().is_empty());
    assert!(crawler.state().is_visited(&format!("{base}/impressum")));
    assert_eq!(stored_files(dir.path()), 0);
}

#[tokio::test]
async fn test_non_json_response_continues_with_next_entry() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();
    let mut mocks = Vec::new();
    for (path, marker) in [("/a", "page alpha"), ("/b", "page bravo"), ("/c", "page charlie")] {
        let mock = server
            .mock("GET", path)
            .with_status(200)
            .with_body(page(marker))
            .create_async()
            .await;
        mocks.push(mock);
    }

    let provider = ScriptedProvider::new()
        .on(
            "page alpha",
            recipe_json("Alpha", &[format!("{base}/b"), format!("{base}/c")]),
        )
        .on("page charlie", "I'm sorry, this page has no recipe I can read.")
        .on("page bravo", format!("```json\n{}\n```", recipe_json("Bravo", &[])));

    let dir = TempDir::new().unwrap();
    let mut crawler = crawler(provider, dir.path());

    let summary = crawler.crawl(&format!("{base}/a")).await;

    assert_eq!(summary.attempted, 3);
    assert_eq!(summary.persisted, 2);
    assert_eq!(summary.errored, 1);
    assert!(crawler.state().is_visited(&format!("{base}/c")));
    assert!(crawler.state().frontier().is_empty());
    assert_eq!(stored_files(dir.path()), 2);
}

#[tokio::test]
async fn test_not_found_page_is_visited_and_run_continues() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();
    let _a = server
        .mock("GET", "/a")
        .with_status(200)
        .with_body(page("page alpha"))
        .create_async()
        .await;
    let _gone = server
        .mock("GET", "/gone")
        .with_status(404)
        .expect(1)
        .create_async()
        .await;
    let _b = server
        .mock("GET", "/b")
        .with_status(200)
        .with_body(page("page bravo"))
        .create_async()
        .await;

    let provider = ScriptedProvider::new()
        .on(
            "page alpha",
            recipe_json("Alpha", &[format!("{base}/b"), format!("{base}/gone")]),
        )
        .on("page bravo", recipe_json("Bravo", &[format!("{base}/gone#comments")]));
    let calls = provider.calls();

    let dir = TempDir::new().unwrap();
    let mut crawler = crawler(provider, dir.path());

    crawler.process_url(&format!("{base}/a")).await;
    let outcome = crawler.process_next().await.unwrap();
    match outcome {
        StepOutcome::Errored { error } => {
            assert!(matches!(error, CrawlError::Fetch { status: 404, .. }))
        }
        other => panic!("expected a fetch failure, got {other:?}"),
    }
    assert!(crawler.state().is_visited(&format!("{base}/gone")));
    assert_eq!(crawler.state().frontier(), [format!("{base}/b")]);

    let summary = crawler.run_frontier().await;

    // bravo's link back to the missing page is not fetched again
    assert_eq!(summary.attempted, 1);
    assert_eq!(summary.persisted, 1);
    assert!(crawler.state().frontier().is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(stored_files(dir.path()), 2);
}

#[tokio::test]
async fn test_reprocessed_page_gets_new_identifier() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();
    let _a = server
        .mock("GET", "/a")
        .with_status(200)
        .with_body(page("page alpha"))
        .expect(2)
        .create_async()
        .await;

    let provider = ScriptedProvider::new().on("page alpha", recipe_json("Alpha", &[]));
    let dir = TempDir::new().unwrap();
    let mut crawler = crawler(provider, dir.path());

    let mut ids = HashSet::new();
    for _ in 0..2 {
        match crawler.process_url(&format!("{base}/a")).await {
            StepOutcome::Persisted { stored, .. } => {
                assert_eq!(stored.record.source_url, Some(format!("{base}/a")));
                ids.insert(stored.id);
            }
            other => panic!("expected a persisted recipe, got {other:?}"),
        }
    }

    assert_eq!(ids.len(), 2);
    assert_eq!(crawler.state().visited().len(), 1);
    assert_eq!(crawler.store().records().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_max_pages_leaves_rest_in_frontier() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();
    let mut mocks = Vec::new();
    for (path, marker) in [("/a", "page alpha"), ("/b", "page bravo"), ("/c", "page charlie")] {
        let mock = server
            .mock("GET", path)
            .with_status(200)
            .with_body(page(marker))
            .create_async()
            .await;
        mocks.push(mock);
    }

    let provider = ScriptedProvider::new()
        .on(
            "page alpha",
            recipe_json("Alpha", &[format!("{base}/b"), format!("{base}/c")]),
        )
        .on("page bravo", recipe_json("Bravo", &[]))
        .on("page charlie", recipe_json("Charlie", &[]));

    let dir = TempDir::new().unwrap();
    let mut crawler = crawler(provider, dir.path()).with_max_pages(Some(1));

    let summary = crawler.crawl(&format!("{base}/a")).await;

    assert_eq!(summary.attempted, 2);
    assert_eq!(crawler.state().frontier(), [format!("{base}/b")]);
}

#[tokio::test]
async fn test_visited_and_frontier_stay_disjoint() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();
    let mut mocks = Vec::new();
    for (path, marker) in [
        ("/a", "page alpha"),
        ("/b", "page bravo"),
        ("/c", "page charlie"),
        ("/d", "page delta"),
    ] {
        let mock = server
            .mock("GET", path)
            .with_status(200)
            .with_body(page(marker))
            .create_async()
            .await;
        mocks.push(mock);
    }

    let link = |p: &str| format!("{base}{p}");
    let provider = ScriptedProvider::new()
        .on("page alpha", recipe_json("Alpha", &[link("/b"), link("/c?x=1"), link("/a")]))
        .on("page charlie", recipe_json("Charlie", &[link("/a"), link("/b#top"), link("/d")]))
        .on("page delta", recipe_json("Delta", &[link("/c"), link("/b")]))
        .on("page bravo", recipe_json("Bravo", &[link("/a"), link("/d")]));

    let dir = TempDir::new().unwrap();
    let mut crawler = crawler(provider, dir.path());

    crawler.process_url(&link("/a")).await;
    while crawler.process_next().await.is_some() {
        let state = crawler.state();
        for pending in state.frontier() {
            assert!(!state.visited().contains(pending), "{pending} is pending and visited");
        }
        let unique: HashSet<_> = state.frontier().iter().collect();
        assert_eq!(unique.len(), state.frontier().len());
    }

    assert_eq!(crawler.state().visited().len(), 4);
    assert_eq!(stored_files(dir.path()), 4);
}

#[tokio::test]
async fn test_failed_save_is_isolated_to_its_page() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();
    let a = server
        .mock("GET", "/a")
        .with_status(200)
        .with_body(page("page alpha"))
        .expect(1)
        .create_async()
        .await;
    let b = server
        .mock("GET", "/b")
        .with_status(200)
        .with_body(page("page bravo"))
        .expect(1)
        .create_async()
        .await;

    let provider = ScriptedProvider::new()
        .on("page alpha", recipe_json("Alpha", &[format!("{base}/c")]))
        .on("page bravo", recipe_json("Bravo", &[format!("{base}/d")]));
    let calls = provider.calls();

    // The output directory is an existing file, so every save fails.
    let dir = TempDir::new().unwrap();
    let blocked = dir.path().join("recipes");
    std::fs::write(&blocked, "not a directory").unwrap();
    let mut crawler = crawler(provider, &blocked);
    crawler.enqueue(&format!("{base}/b"));
    crawler.enqueue(&format!("{base}/a"));

    match crawler.process_next().await.unwrap() {
        StepOutcome::Errored { error } => assert!(matches!(error, CrawlError::Io(_))),
        other => panic!("expected a failed save, got {other:?}"),
    }
    assert!(crawler.state().is_visited(&format!("{base}/a")));
    assert_eq!(crawler.state().frontier(), [format!("{base}/b")]);

    let summary = crawler.run_frontier().await;

    assert_eq!(summary.attempted, 1);
    assert_eq!(summary.errored, 1);
    assert!(crawler.state().is_visited(&format!("{base}/b")));
    assert!(crawler.state().frontier().is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    a.assert_async().await;
    b.assert_async().await;
}
