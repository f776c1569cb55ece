//! Loopback tests for the oracle request/response channels.
//!
//! Each test stands up a scripted TCP endpoint on an ephemeral port and
//! drives the manager against it, covering the roundtrip, timeout,
//! disconnect, reconnect, and disabled paths.

use std::time::{Duration, Instant};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use tetris_oracle::core::Game;
use tetris_oracle::oracle::{OracleConfig, OracleManager};

async fn bind() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr").to_string();
    (listener, addr)
}

fn manager_for(suggest_addr: &str, move_addr: &str, timeout_ms: u64) -> OracleManager {
    OracleManager::new(OracleConfig {
        suggest_addr: suggest_addr.to_string(),
        move_addr: move_addr.to_string(),
        request_timeout_ms: timeout_ms,
        ..OracleConfig::default()
    })
}

/// Accept one connection and answer every request line with `response`.
async fn scripted_responder(listener: TcpListener, response: &'static str) {
    let (stream, _) = listener.accept().await.expect("accept");
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();
    while let Ok(Some(request)) = lines.next_line().await {
        let value: serde_json::Value = serde_json::from_str(&request).expect("request is JSON");
        assert_eq!(value["board"].as_array().expect("board rows").len(), 20);
        assert!(value["current_piece"]["type"].is_string());

        write_half.write_all(response.as_bytes()).await.expect("write");
        write_half.write_all(b"\n").await.expect("newline");
        write_half.flush().await.expect("flush");
    }
}

#[tokio::test]
async fn suggestion_roundtrip() {
    let (listener, addr) = bind().await;
    tokio::spawn(scripted_responder(
        listener,
        r#"{"confidence":"high","best_move":{"rotation":1,"column":3,"final_y":17}}"#,
    ));

    let mut manager = manager_for(&addr, "127.0.0.1:1", 2000);
    let game = Game::new(1);
    let suggestion = manager
        .request_suggestion(&game.snapshot())
        .await
        .expect("suggestion");

    assert_eq!(suggestion.confidence, "high");
    assert_eq!(suggestion.rotation, 1);
    assert_eq!(suggestion.column, 3);
    assert_eq!(suggestion.final_y, 17);
    assert!(manager.suggest_open());
}

#[tokio::test]
async fn move_roundtrip() {
    let (listener, addr) = bind().await;
    tokio::spawn(scripted_responder(
        listener,
        r#"{"rotation":0,"column":6}"#,
    ));

    let mut manager = manager_for("127.0.0.1:1", &addr, 2000);
    let game = Game::new(1);
    let mv = manager.request_move(&game.snapshot()).await.expect("move");

    assert_eq!(mv.rotation, 0);
    assert_eq!(mv.column, 6);
}

#[tokio::test]
async fn silent_endpoint_resolves_to_no_answer_at_the_timeout() {
    let (listener, addr) = bind().await;
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let mut lines = BufReader::new(stream).lines();
        // Read the request, never answer, keep the socket open.
        let _ = lines.next_line().await;
        tokio::time::sleep(Duration::from_secs(10)).await;
    });

    let mut manager = manager_for(&addr, "127.0.0.1:1", 150);
    let game = Game::new(1);
    let started = Instant::now();
    assert!(manager.request_suggestion(&game.snapshot()).await.is_none());
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn endpoint_disconnect_releases_the_waiter_immediately() {
    let (listener, addr) = bind().await;
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let mut lines = BufReader::new(stream).lines();
        let _ = lines.next_line().await;
        // Drop the socket with the request unanswered.
    });

    // Generous timeout: the disconnect must resolve the call, not the clock.
    let mut manager = manager_for(&addr, "127.0.0.1:1", 10_000);
    let game = Game::new(1);
    let started = Instant::now();
    assert!(manager.request_suggestion(&game.snapshot()).await.is_none());
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn refused_connection_resolves_to_no_answer() {
    // Bind then drop, so the port is known-dead.
    let (listener, addr) = bind().await;
    drop(listener);

    let mut manager = manager_for(&addr, "127.0.0.1:1", 1000);
    let game = Game::new(1);
    assert!(manager.request_suggestion(&game.snapshot()).await.is_none());
}

#[tokio::test]
async fn malformed_response_resolves_to_no_answer() {
    let (listener, addr) = bind().await;
    tokio::spawn(scripted_responder(listener, "this is not json"));

    let mut manager = manager_for(&addr, "127.0.0.1:1", 2000);
    let game = Game::new(1);
    assert!(manager.request_suggestion(&game.snapshot()).await.is_none());
}

#[tokio::test]
async fn late_answer_is_never_delivered_to_a_newer_request() {
    let (listener, addr) = bind().await;
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let (read_half, mut write_half) = stream.into_split();
        let mut lines = BufReader::new(read_half).lines();

        // Answer the first request only after the caller has given up on it.
        let _ = lines.next_line().await;
        tokio::time::sleep(Duration::from_millis(400)).await;
        write_half
            .write_all(b"{\"rotation\":0,\"column\":1}\n")
            .await
            .expect("write late answer");

        let _ = lines.next_line().await;
        write_half
            .write_all(b"{\"rotation\":0,\"column\":2}\n")
            .await
            .expect("write fresh answer");
    });

    let mut manager = manager_for("127.0.0.1:1", &addr, 300);
    let game = Game::new(1);

    // First call times out; its answer is still on the wire.
    assert!(manager.request_move(&game.snapshot()).await.is_none());

    // The stale line must be consumed and discarded, not handed to this call.
    let mv = manager.request_move(&game.snapshot()).await.expect("move");
    assert_eq!(mv.column, 2);
}

#[tokio::test]
async fn closed_channel_reopens_on_the_next_request() {
    let (listener, addr) = bind().await;
    tokio::spawn(async move {
        // Serve two consecutive connections.
        for _ in 0..2 {
            let (stream, _) = listener.accept().await.expect("accept");
            let (read_half, mut write_half) = stream.into_split();
            let mut lines = BufReader::new(read_half).lines();
            while let Ok(Some(_)) = lines.next_line().await {
                write_half
                    .write_all(b"{\"rotation\":1,\"column\":2}\n")
                    .await
                    .expect("write");
            }
        }
    });

    let mut manager = manager_for("127.0.0.1:1", &addr, 2000);
    let game = Game::new(1);

    assert!(manager.request_move(&game.snapshot()).await.is_some());
    manager.close_all();
    assert!(!manager.move_open());

    assert!(manager.request_move(&game.snapshot()).await.is_some());
    assert!(manager.move_open());
}

#[tokio::test]
async fn request_issued_while_connecting_is_flushed_after_accept() {
    let (listener, addr) = bind().await;
    tokio::spawn(async move {
        // Hold the connection back; the request must wait in the queue.
        tokio::time::sleep(Duration::from_millis(200)).await;
        scripted_responder(listener, r#"{"rotation":1,"column":4}"#).await;
    });

    let mut manager = manager_for("127.0.0.1:1", &addr, 2000);
    let game = Game::new(1);
    let mv = manager.request_move(&game.snapshot()).await.expect("move");
    assert_eq!(mv.column, 4);
}

#[tokio::test]
async fn disabled_oracle_never_connects() {
    let mut manager = OracleManager::new(OracleConfig {
        suggest_addr: "127.0.0.1:1".to_string(),
        move_addr: "127.0.0.1:1".to_string(),
        disabled: true,
        ..OracleConfig::default()
    });
    let game = Game::new(1);

    let started = Instant::now();
    assert!(manager.request_suggestion(&game.snapshot()).await.is_none());
    assert!(manager.request_move(&game.snapshot()).await.is_none());
    assert!(started.elapsed() < Duration::from_millis(500));
    assert!(!manager.suggest_open());
    assert!(!manager.move_open());
}

#[tokio::test]
async fn no_request_is_sent_without_an_active_piece() {
    let mut manager = manager_for("127.0.0.1:1", "127.0.0.1:1", 1000);
    let mut game = Game::new(11);
    for _ in 0..200 {
        if game.game_over() {
            break;
        }
        game.hard_drop();
    }
    assert!(game.game_over());
    // Topped out: no active piece, so the call resolves locally.
    assert!(manager.request_suggestion(&game.snapshot()).await.is_none());
    assert!(!manager.suggest_open());
}
