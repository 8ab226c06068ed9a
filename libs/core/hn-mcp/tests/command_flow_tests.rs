//! End-to-end command flows: MCP handler -> dispatcher -> HTTP client -> fake upstream

mod common;

use common::FakeUpstream;
use hn_mcp::{
    CommandOutput, Dispatcher, Error, HackerNewsClient, ItemId, McpHandler, SessionState,
};
use std::collections::HashSet;
use std::sync::Arc;

fn best_feed() -> FakeUpstream {
    FakeUpstream::new()
        .with_feed("beststories.json", &[501, 502, 503, 504, 505, 506, 507])
        .with_story(501, "Launch HN: One", &[])
        .with_story(502, "Launch HN: Two", &[])
        .with_story(503, "Launch HN: Three", &[601, 602, 603])
        .with_story(504, "Launch HN: Four", &[])
        .with_story(505, "Launch HN: Five", &[])
        .with_comment(601, "Great <i>launch</i> &amp; congrats", &[701, 702])
        .failing(602)
        .with_comment(603, "Pricing?", &[])
        .with_story(3, "Literal story three", &[])
        .with_story(99_999_999, "Far away story", &[])
}

async fn dispatcher_for(upstream: &Arc<FakeUpstream>) -> Dispatcher<HackerNewsClient<hn_mcp::Ready>> {
    let client = HackerNewsClient::new()
        .with_base_url(upstream.serve().await)
        .init()
        .unwrap();
    Dispatcher::new(Arc::new(client), Arc::new(SessionState::new()))
}

fn listing_ids(output: &CommandOutput) -> Vec<u64> {
    match output {
        CommandOutput::Listing { stories, .. } => stories.iter().map(|s| s.id.get()).collect(),
        other => panic!("expected listing, got {other:?}"),
    }
}

#[tokio::test]
async fn test_listing_respects_count_order_and_uniqueness() {
    let upstream = Arc::new(best_feed());
    let dispatcher = dispatcher_for(&upstream).await;

    for count in [1u64, 3, 5, 50] {
        let output = dispatcher
            .dispatch("best", Some(&format!("--{count}")))
            .await
            .unwrap();
        let ids = listing_ids(&output);

        assert!(ids.len() as u64 <= count);
        assert_eq!(ids.iter().collect::<HashSet<_>>().len(), ids.len());
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted, "feed order is ascending in this fixture");
    }
}

#[tokio::test]
async fn test_repeated_feed_ids_are_listed_once() {
    let upstream = Arc::new(
        FakeUpstream::new()
            .with_feed("topstories.json", &[504, 504, 501, 504, 503, 501, 505])
            .with_story(501, "Launch HN: One", &[])
            .with_story(503, "Launch HN: Three", &[601])
            .with_story(504, "Launch HN: Four", &[])
            .with_story(505, "Launch HN: Five", &[])
            .with_comment(601, "First!", &[]),
    );
    let dispatcher = dispatcher_for(&upstream).await;

    let output = dispatcher.dispatch("top", Some("--3")).await.unwrap();
    assert_eq!(listing_ids(&output), vec![504, 501, 503]);

    // Positions follow the deduplicated listing
    let output = dispatcher.dispatch("comments", Some("--3")).await.unwrap();
    let CommandOutput::Comments { story, .. } = output else {
        panic!("expected comments");
    };
    assert_eq!(story.id, ItemId::new(503));
}

#[tokio::test]
async fn test_comments_by_position_after_best_listing() {
    let upstream = Arc::new(best_feed());
    let dispatcher = dispatcher_for(&upstream).await;

    let listing = dispatcher.dispatch("best", Some("--5")).await.unwrap();
    assert_eq!(listing_ids(&listing), vec![501, 502, 503, 504, 505]);

    let output = dispatcher.dispatch("comments", Some("--3")).await.unwrap();

    let CommandOutput::Comments { story, comments } = output else {
        panic!("expected comments");
    };
    assert_eq!(story.id, ItemId::new(503));
    // 602 fails upstream and is omitted, order of the rest is kept
    let ids: Vec<u64> = comments.iter().map(|c| c.id.get()).collect();
    assert_eq!(ids, vec![601, 603]);
    assert_eq!(comments[0].text, "Great launch & congrats");
    assert_eq!(comments[0].reply_count, 2);
}

#[tokio::test]
async fn test_comments_without_listing_uses_literal_id() {
    let upstream = Arc::new(best_feed());
    let dispatcher = dispatcher_for(&upstream).await;

    let output = dispatcher.dispatch("comments", Some("--3")).await.unwrap();
    let CommandOutput::NoComments { story } = output else {
        panic!("expected no-comments marker");
    };
    assert_eq!(story.title, "Literal story three");

    let output = dispatcher
        .dispatch("comments", Some("--99999999"))
        .await
        .unwrap();
    assert!(matches!(output, CommandOutput::NoComments { story } if story.id == ItemId::new(99_999_999)));
}

#[tokio::test]
async fn test_empty_comments_differs_from_not_found() {
    let upstream = Arc::new(best_feed());
    let dispatcher = dispatcher_for(&upstream).await;

    let empty = dispatcher.dispatch("comments", Some("--501")).await.unwrap();
    assert!(matches!(empty, CommandOutput::NoComments { .. }));

    let missing = dispatcher
        .dispatch("comments", Some("--424242"))
        .await
        .unwrap_err();
    assert!(matches!(missing, Error::NotFound { .. }));
}

#[tokio::test]
async fn test_invalid_history_makes_no_requests() {
    let upstream = Arc::new(best_feed());
    let dispatcher = dispatcher_for(&upstream).await;

    assert!(matches!(
        dispatcher.dispatch("history", None).await.unwrap_err(),
        Error::MissingParameter { .. }
    ));
    assert!(matches!(
        dispatcher.dispatch("history", Some("--abc")).await.unwrap_err(),
        Error::InvalidParameter { .. }
    ));
    assert_eq!(upstream.requests(), 0);
}

#[tokio::test]
async fn test_mcp_round_trip_over_json_lines() {
    let upstream = Arc::new(best_feed());
    let handler = McpHandler::new(dispatcher_for(&upstream).await);

    let line = handler
        .handle_json(
            r#"{"jsonrpc":"2.0","id":7,"method":"tools/call","params":{"name":"hn","arguments":{"command":"BEST","param":"--2"}}}"#,
        )
        .await
        .unwrap();
    let response: serde_json::Value = serde_json::from_str(&line).unwrap();

    assert_eq!(response["id"], 7);
    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.starts_with("1. Launch HN: One\n   ID: 501"));
    assert!(text.contains("2. Launch HN: Two"));
    assert_eq!(response["result"]["structuredContent"]["feed"], "best");

    let line = handler
        .handle_json(
            r#"{"jsonrpc":"2.0","id":8,"method":"tools/call","params":{"name":"hn","arguments":{"command":"history","param":"--424242"}}}"#,
        )
        .await
        .unwrap();
    let response: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(response["error"]["message"], "No story found with ID 424242");
}
