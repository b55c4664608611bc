// tests/integration/pipeline_test.rs

//! End-to-end request matching through the engine: single commands, command
//! lists, error terminators and batch aborts.

use super::test_helpers::TestContext;
use mpdpipe::MpdError;
use std::time::Duration;

#[tokio::test]
async fn single_command_resolves_with_its_data_lines() {
    let mut ctx = TestContext::ready().await;
    let client = ctx.client.clone();
    let reply = tokio::spawn(async move { client.send_command("status").await });

    ctx.daemon.wake().await;
    ctx.daemon.expect("status").await;
    ctx.daemon.send("volume: 50\nstate: stop\nOK\n").await;

    let lines = reply.await.unwrap().unwrap();
    assert_eq!(lines, vec!["volume: 50", "state: stop"]);
    // Pipeline empty again, so the client goes back to idle.
    ctx.daemon.expect("idle").await;
}

#[tokio::test]
async fn commands_queued_together_share_one_list() {
    let mut ctx = TestContext::ready().await;
    let client = ctx.client.clone();
    let replies = tokio::spawn(async move {
        client
            .send_commands(["currentsong", "status", "stats"])
            .await
    });

    ctx.daemon.wake().await;
    ctx.daemon.expect_list(&["currentsong", "status", "stats"]).await;
    ctx.daemon
        .send("file: a.mp3\nlist_OK\nstate: play\nlist_OK\nsongs: 3\nlist_OK\nOK\n")
        .await;

    let replies = replies.await.unwrap().unwrap();
    assert_eq!(replies.len(), 3);
    assert_eq!(replies[0].as_ref().unwrap(), &vec!["file: a.mp3".to_string()]);
    assert_eq!(replies[1].as_ref().unwrap(), &vec!["state: play".to_string()]);
    assert_eq!(replies[2].as_ref().unwrap(), &vec!["songs: 3".to_string()]);
    ctx.daemon.expect("idle").await;
}

#[tokio::test]
async fn list_closed_by_plain_ok_on_last_member() {
    let mut ctx = TestContext::ready().await;
    let client = ctx.client.clone();
    let replies = tokio::spawn(async move { client.send_commands(["ping", "status"]).await });

    ctx.daemon.wake().await;
    ctx.daemon.expect_list(&["ping", "status"]).await;
    ctx.daemon.send("list_OK\nstate: stop\nOK\n").await;

    let replies = replies.await.unwrap().unwrap();
    assert!(replies[0].as_ref().unwrap().is_empty());
    assert_eq!(replies[1].as_ref().unwrap(), &vec!["state: stop".to_string()]);
}

#[tokio::test]
async fn command_error_is_scoped_to_one_request() {
    let mut ctx = TestContext::ready().await;
    let client = ctx.client.clone();
    let reply = tokio::spawn(async move { client.send_command("play 99").await });

    ctx.daemon.wake().await;
    ctx.daemon.expect("play 99").await;
    ctx.daemon.send("ACK [2@0] {play} Bad song index\n").await;

    let err = reply.await.unwrap().unwrap_err();
    assert_eq!(err.error_code(), Some(2));
    assert_eq!(err.error_message(), Some("Bad song index"));
    assert!(!err.is_fatal());

    // The connection survives and keeps serving.
    ctx.daemon.expect("idle").await;
    let client = ctx.client.clone();
    let reply = tokio::spawn(async move { client.send_command("ping").await });
    ctx.daemon.wake().await;
    ctx.daemon.expect("ping").await;
    ctx.daemon.send("OK\n").await;
    assert!(reply.await.unwrap().is_ok());
}

#[tokio::test]
async fn batch_abort_requeues_unexecuted_commands() {
    let mut ctx = TestContext::ready().await;
    let client = ctx.client.clone();
    let replies = tokio::spawn(async move {
        client
            .send_commands(["stop", "play 50", "status"])
            .await
    });

    ctx.daemon.wake().await;
    ctx.daemon.expect_list(&["stop", "play 50", "status"]).await;
    ctx.daemon
        .send("list_OK\nACK [50@1] {play} song doesn't exist\n")
        .await;

    // The unexecuted third command is re-offered on its own.
    ctx.daemon.expect("status").await;
    ctx.daemon.send("state: stop\nOK\n").await;

    let replies = replies.await.unwrap().unwrap();
    assert!(replies[0].is_ok());
    match &replies[1] {
        Err(MpdError::Command(ack)) => {
            assert_eq!(ack.code, 50);
            assert_eq!(ack.index, 1);
            assert_eq!(ack.command, "play");
            assert_eq!(ack.message, "song doesn't exist");
        }
        other => panic!("expected a command error, got {other:?}"),
    }
    assert_eq!(replies[2].as_ref().unwrap(), &vec!["state: stop".to_string()]);
}

#[tokio::test]
async fn responses_split_across_chunks_are_reassembled() {
    let mut ctx = TestContext::ready().await;
    let client = ctx.client.clone();
    let reply = tokio::spawn(async move { client.send_command("stats").await });

    ctx.daemon.wake().await;
    ctx.daemon.expect("stats").await;
    for piece in ["art", "ists: 1", "2\nalb", "ums: 3\nO", "K", "\n"] {
        ctx.daemon.send(piece).await;
        tokio::task::yield_now().await;
    }

    let lines = reply.await.unwrap().unwrap();
    assert_eq!(lines, vec!["artists: 12", "albums: 3"]);
}

#[tokio::test]
async fn commands_sent_before_greeting_wait_for_it() {
    let mut ctx = TestContext::connect().await;
    let client = ctx.client.clone();
    let reply = tokio::spawn(async move { client.send_command("ping").await });
    // Let the engine take the request before the daemon speaks.
    tokio::time::sleep(Duration::from_millis(20)).await;

    ctx.daemon.send("OK MPD 0.21.0\n").await;
    // Real work is pending, so no idle is issued first.
    ctx.daemon.expect("ping").await;
    ctx.daemon.send("OK\n").await;

    assert!(reply.await.unwrap().is_ok());
    assert_eq!(ctx.client.version().map(|v| v.minor), Some(21));
}
